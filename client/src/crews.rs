use leptos::prelude::*;

use shoresquad_shared::modal::ModalKind;
use shoresquad_shared::{Crew, crew_accent};

use crate::app::SessionSignal;
use crate::colors::rgba_css;

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

#[component]
pub fn CrewList() -> impl IntoView {
    let session: SessionSignal = expect_context();
    let crews = Memo::new(move |_| session.with(|s| s.crews().iter().cloned().collect::<Vec<_>>()));
    let selected = Memo::new(move |_| session.with(|s| s.state().selected_crew.clone()));

    view! {
        <div class="crews-grid" style="display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 16px;">
            <For
                each=move || crews.get()
                key=|crew: &Crew| crew.id.clone()
                children=move |crew: Crew| {
                    let (r, g, b) = crew_accent(&crew.name);
                    let id = crew.id.clone();
                    let is_selected = {
                        let id = id.clone();
                        move || selected.get().as_ref() == Some(&id)
                    };
                    view! {
                        <div
                            class="crew-card"
                            class:selected=is_selected
                            style=format!(
                                "padding: 16px; border-radius: 12px; background: white; box-shadow: 0 2px 8px rgba(0,0,0,0.08); border-top: 4px solid {};",
                                rgba_css(r, g, b, 1.0),
                            )
                        >
                            <div style="display: flex; align-items: center; gap: 12px; margin-bottom: 8px;">
                                <span style=format!(
                                    "width: 40px; height: 40px; border-radius: 50%; display: flex; align-items: center; justify-content: center; color: white; font-weight: bold; background: {};",
                                    rgba_css(r, g, b, 0.9),
                                )>
                                    {initials(&crew.name)}
                                </span>
                                <div>
                                    <h3 style="margin: 0; font-size: 1.1rem;">{crew.name.clone()}</h3>
                                    <div style="font-size: 0.85rem; color: #666;">{format!("\u{1F4CD} {}", crew.home_beach)}</div>
                                </div>
                            </div>
                            <p style="margin: 0 0 8px; color: #444;">{crew.description.clone()}</p>
                            <div style="display: flex; gap: 12px; font-size: 0.85rem; color: #444; margin-bottom: 12px;">
                                <span>{format!("\u{1F465} {} members", crew.members)}</span>
                                <span>{format!("\u{1F4C5} {} events", crew.events)}</span>
                            </div>
                            <div style="font-size: 0.85rem; color: #00AA66; margin-bottom: 12px;">{format!("\u{267B}\u{FE0F} {}", crew.impact)}</div>
                            <button
                                class="btn btn-secondary"
                                on:click=move |_| {
                                    session.update(|s| s.view_crew(&id));
                                }
                            >
                                "View Crew"
                            </button>
                        </div>
                    }
                }
            />
            <button
                class="crew-card create-crew"
                style="padding: 16px; border-radius: 12px; border: 2px dashed #0066CC; background: transparent; color: #0066CC; font-weight: 600; cursor: pointer; min-height: 160px;"
                on:click=move |_| {
                    session.update(|s| s.open_modal(ModalKind::CreateCrew));
                }
            >
                "+ Create New Crew"
            </button>
        </div>
    }
}
