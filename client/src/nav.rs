use leptos::prelude::*;

use shoresquad_shared::config::APP_NAME;
use shoresquad_shared::modal::ModalKind;

use crate::app::SessionSignal;

const NAV_LINKS: &[(&str, &str)] = &[
    ("#map", "Events"),
    ("#weather", "Weather"),
    ("#leaderboard", "Leaderboard"),
    ("#crews", "Crews"),
];

#[component]
pub fn Header() -> impl IntoView {
    let session: SessionSignal = expect_context();
    let nav_open = Memo::new(move |_| session.with(|s| s.nav_open()));
    let dark_mode = Memo::new(move |_| session.with(|s| s.state().dark_mode));

    view! {
        <header class="navbar" style="position: sticky; top: 0; z-index: 800; display: flex; align-items: center; justify-content: space-between; padding: 12px 24px; background: white; box-shadow: 0 1px 4px rgba(0,0,0,0.08);">
            <a href="#" class="logo" style="font-weight: bold; font-size: 1.3rem; color: #0066CC; text-decoration: none;">
                {format!("\u{1F30A} {APP_NAME}")}
            </a>
            <button
                class="hamburger"
                aria-label="Toggle navigation"
                aria-controls="nav-menu"
                aria-expanded=move || nav_open.get().to_string()
                on:click=move |_| {
                    session.update(|s| s.toggle_nav());
                }
            >
                <span></span>
                <span></span>
                <span></span>
            </button>
            <nav id="nav-menu" class="nav-menu" class:active=move || nav_open.get()>
                {NAV_LINKS
                    .iter()
                    .map(|&(href, label)| {
                        view! {
                            <a
                                class="nav-link"
                                href=href
                                on:click=move |_| {
                                    session.update(|s| s.close_nav());
                                }
                            >
                                {label}
                            </a>
                        }
                    })
                    .collect_view()}
                <button
                    class="theme-toggle"
                    aria-pressed=move || dark_mode.get().to_string()
                    title="Toggle dark mode"
                    on:click=move |_| {
                        session.update(|s| s.toggle_dark_mode());
                    }
                >
                    {move || if dark_mode.get() { "\u{2600}\u{FE0F}" } else { "\u{1F319}" }}
                </button>
                <button
                    class="btn btn-primary"
                    on:click=move |_| {
                        session.update(|s| s.open_modal(ModalKind::Login));
                    }
                >
                    "Sign In"
                </button>
            </nav>
        </header>
    }
}
