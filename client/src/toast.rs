use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use shoresquad_shared::notify::{Toast, ToastId, ToastPhase, toast_schedule};

use crate::app::SessionSignal;

/// Give a toast its own timers: start the exit animation, then remove it.
pub(crate) fn arm(session: SessionSignal, id: ToastId) {
    for (delay, action) in toast_schedule() {
        Timeout::new(delay, move || {
            let _ = session.0.try_update(|s| s.toasts_mut().fire(id, action));
        })
        .forget();
    }
}

/// Bottom-right stack of status messages, newest last.
#[component]
pub fn ToastHost() -> impl IntoView {
    let session: SessionSignal = expect_context();
    let toasts = Memo::new(move |_| session.with(|s| s.toasts().visible().to_vec()));

    view! {
        <div
            aria-live="polite"
            style="position: fixed; bottom: 20px; right: 20px; z-index: 1000; display: flex; flex-direction: column; gap: 8px; align-items: flex-end; pointer-events: none;"
        >
            <For
                each=move || toasts.get()
                key=|toast: &Toast| toast.id
                children=move |toast: Toast| {
                    let id = toast.id;
                    let leaving = move || {
                        toasts
                            .get()
                            .iter()
                            .any(|t| t.id == id && t.phase == ToastPhase::Leaving)
                    };
                    view! {
                        <div
                            class="notification"
                            class:leaving=leaving
                            style="background: #00AA66; color: white; padding: 16px 24px; border-radius: 8px; box-shadow: 0 4px 12px rgba(0, 0, 0, 0.15); max-width: 360px;"
                        >
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
