use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen_futures::spawn_local;

use crate::app::SessionSignal;
use crate::share;
use crate::time_format::format_event_when;

#[component]
pub fn NextCleanupCard() -> impl IntoView {
    let session: SessionSignal = expect_context();
    let next = session.with_untracked(|s| s.next_cleanup().clone());

    let on_join = move |_| {
        session.update(|s| s.join_next_cleanup(chrono::Utc::now()));
    };
    let on_directions = move |_| {
        let Some(url) = session.update(|s| s.directions()) else {
            return;
        };
        info!("opening directions: {url}");
        let opened = web_sys::window().map(|w| w.open_with_url_and_target(&url, "_blank"));
        if !matches!(opened, Some(Ok(_))) {
            warn!("could not open directions window");
        }
    };
    let on_share = move |_| {
        spawn_local(share::share_next_cleanup(session));
    };

    view! {
        <div class="next-cleanup-card" style="padding: 20px; border-radius: 12px; background: white; box-shadow: 0 2px 8px rgba(0,0,0,0.08);">
            <h3 style="margin: 0 0 8px; color: #0066CC;">{next.name.clone()}</h3>
            <div class="event-detail">{format!("\u{1F4CD} {}", next.location_label)}</div>
            <div class="event-detail">{format!("\u{1F4C5} {}", format_event_when(&next.date, &next.time))}</div>
            <div class="event-detail">{format!("\u{1F465} {} members going", next.members)}</div>
            <div class="event-detail" style="font-size: 0.85rem; color: #666;">
                {format!(
                    "{:.6}\u{00B0}N, {:.6}\u{00B0}E",
                    next.location.latitude(),
                    next.location.longitude(),
                )}
            </div>
            <div style="display: flex; flex-wrap: wrap; gap: 8px; margin-top: 16px;">
                <button class="btn btn-primary" on:click=on_join>"Join Cleanup"</button>
                <button class="btn btn-secondary" on:click=on_directions>"Get Directions"</button>
                <button class="btn btn-secondary" on:click=on_share>"Share"</button>
            </div>
        </div>
    }
}
