use leptos::prelude::*;

use shoresquad_shared::LeaderboardTab;
use shoresquad_shared::leaderboard::{BadgeTier, RenderedRow};

use crate::app::SessionSignal;

fn badge_style(badge: BadgeTier) -> &'static str {
    match badge {
        BadgeTier::Gold => "background: #f5c542; color: #3a2c00;",
        BadgeTier::Silver => "background: #c9ced6; color: #2b2f36;",
        BadgeTier::Bronze => "background: #cd8a4f; color: #2e1a08;",
        BadgeTier::Default => "background: #e6eef7; color: #0066CC;",
    }
}

#[component]
pub fn LeaderboardPanel() -> impl IntoView {
    let session: SessionSignal = expect_context();
    let active_tab = Memo::new(move |_| session.with(|s| s.state().active_tab));
    let list = Memo::new(move |_| session.with(|s| s.leaderboard()));

    view! {
        <div class="leaderboard">
            <div class="tabs" role="tablist" style="display: flex; gap: 8px; margin-bottom: 16px;">
                {LeaderboardTab::ALL
                    .into_iter()
                    .map(|tab| {
                        let is_active = move || active_tab.get() == tab;
                        view! {
                            <button
                                class="tab-btn"
                                class:active=is_active
                                role="tab"
                                aria-selected=move || is_active().to_string()
                                data-tab=tab.key()
                                on:click=move |_| {
                                    session.update(|s| s.select_tab(tab));
                                }
                            >
                                {tab.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            <ol class="leaderboard-list" style="list-style: none; margin: 0; padding: 0;">
                <For
                    each=move || list.get().rows
                    key=|row: &RenderedRow| (row.rank, row.name.clone())
                    children=move |row: RenderedRow| {
                        view! {
                            <li
                                class="leaderboard-item"
                                style="display: flex; align-items: center; gap: 12px; padding: 10px 0; border-bottom: 1px solid rgba(0,0,0,0.06);"
                            >
                                <span
                                    class=format!("rank-badge {}", row.badge.css_class().unwrap_or_default())
                                    style=format!(
                                        "width: 32px; height: 32px; border-radius: 50%; display: flex; align-items: center; justify-content: center; font-weight: bold; {}",
                                        badge_style(row.badge),
                                    )
                                >
                                    {row.rank}
                                </span>
                                <div>
                                    <div style="font-weight: 600;">{row.name}</div>
                                    <div style="font-size: 0.85rem; color: #666;">{row.stat_line}</div>
                                </div>
                            </li>
                        }
                    }
                />
            </ol>
        </div>
    }
}
