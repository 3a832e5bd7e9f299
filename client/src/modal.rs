use leptos::prelude::*;
use log::{debug, warn};

use shoresquad_shared::modal::{FieldSpec, FormValues, InputKind, ModalId, ModalKind, OpenModal};

use crate::app::SessionSignal;

const INPUT_STYLE: &str = "width: 100%; box-sizing: border-box; padding: 12px; margin-bottom: 12px; border: 1px solid #ccd6e0; border-radius: 8px; font: inherit;";

/// Every open overlay, stacked in opening order.
#[component]
pub fn ModalHost() -> impl IntoView {
    let session: SessionSignal = expect_context();
    let open = Memo::new(move |_| session.with(|s| s.modals().iter().copied().collect::<Vec<_>>()));

    view! {
        <For
            each=move || open.get()
            key=|modal: &OpenModal| modal.id
            children=move |modal: OpenModal| view! { <ModalOverlay id=modal.id kind=modal.kind /> }
        />
    }
}

#[component]
fn FormField(field: FieldSpec, values: RwSignal<FormValues>) -> impl IntoView {
    let key = field.key;
    let on_input = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        values.update(|v| {
            v.insert(key, value);
        });
    };
    match field.kind {
        InputKind::TextArea { rows } => view! {
            <textarea
                name=key
                placeholder=field.placeholder
                rows=rows.to_string()
                required=field.required
                style=INPUT_STYLE
                on:input=on_input
            ></textarea>
        }
        .into_any(),
        kind => view! {
            <input
                name=key
                type=kind.html_type().unwrap_or("text")
                placeholder=field.placeholder
                required=field.required
                style=INPUT_STYLE
                on:input=on_input
            />
        }
        .into_any(),
    }
}

#[component]
fn ModalOverlay(id: ModalId, kind: ModalKind) -> impl IntoView {
    let session: SessionSignal = expect_context();
    let form = kind.form();
    let values: RwSignal<FormValues> = RwSignal::new(FormValues::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let submitted = values.get_untracked();
        match session.update(|s| s.submit_modal(id, &submitted)) {
            Some(Ok(())) => debug!("{kind:?} form submitted"),
            Some(Err(err)) => warn!("{kind:?} form rejected: {err}"),
            None => {}
        }
    };

    let footer = form.footer.map(|link| {
        view! {
            <p style="text-align: center; margin-top: 10px;">
                {link.prompt}
                " "
                <a
                    href="#"
                    on:click=move |ev: web_sys::MouseEvent| {
                        ev.prevent_default();
                        session.update(|s| s.open_modal(link.opens));
                    }
                >
                    {link.label}
                </a>
            </p>
        }
    });

    view! {
        <div
            class="modal"
            role="dialog"
            aria-modal="true"
            style="position: fixed; inset: 0; z-index: 900; display: flex; align-items: center; justify-content: center; background: rgba(0, 0, 0, 0.5);"
        >
            <div
                class="modal-content"
                style="position: relative; width: min(420px, 92vw); padding: 32px 28px 24px; background: white; border-radius: 12px; box-shadow: 0 12px 32px rgba(0, 0, 0, 0.2);"
            >
                <button
                    class="modal-close"
                    aria-label="Close"
                    style="position: absolute; top: 8px; right: 12px; border: none; background: none; font-size: 1.6rem; cursor: pointer; color: #666;"
                    on:click=move |_| {
                        session.update(|s| s.close_modal(id));
                    }
                >
                    "\u{00D7}"
                </button>
                <h2 style="margin-top: 0;">{form.title}</h2>
                <form on:submit=on_submit>
                    {form
                        .fields
                        .iter()
                        .map(|field| view! { <FormField field=*field values=values /> })
                        .collect_view()}
                    <button type="submit" class="btn btn-primary btn-large" style="width: 100%;">
                        {form.submit_label}
                    </button>
                    {footer}
                </form>
            </div>
        </div>
    }
}
