use std::cell::RefCell;

use js_sys::{Function, Reflect};
use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{JsFuture, spawn_local};

use shoresquad_shared::modal::ModalKind;
use shoresquad_shared::session::Session;
use shoresquad_shared::{MapError, MapScene};

use crate::crews::CrewList;
use crate::geolocation;
use crate::leaderboard::LeaderboardPanel;
use crate::map_view::MapPanel;
use crate::modal::ModalHost;
use crate::nav::Header;
use crate::next_cleanup::NextCleanupCard;
use crate::storage::BrowserStore;
use crate::toast::{self, ToastHost};
use crate::weather::{self, WeatherWidget};

pub(crate) type ClientSession = Session<BrowserStore, MapScene>;

/// The page's single session. Components read it through `with` and
/// mutate it only through `update`.
#[derive(Clone, Copy)]
pub(crate) struct SessionSignal(pub RwSignal<ClientSession>);

impl SessionSignal {
    pub fn with<R>(self, f: impl FnOnce(&ClientSession) -> R) -> R {
        self.0.with(f)
    }

    pub fn with_untracked<R>(self, f: impl FnOnce(&ClientSession) -> R) -> R {
        self.0.with_untracked(f)
    }

    /// Run one mutation, then arm dismissal timers for any toast it raised.
    /// `None` once the app has been unmounted.
    pub fn update<R>(self, f: impl FnOnce(&mut ClientSession) -> R) -> Option<R> {
        let (result, raised) = self.0.try_update(|session| {
            let result = f(session);
            (result, session.toasts_mut().take_unscheduled())
        })?;
        for id in raised {
            toast::arm(self, id);
        }
        Some(result)
    }
}

/// Log a map precondition failure and drop it.
pub(crate) fn report<T>(context: &str, result: Result<T, MapError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            error!("{context}: {err}");
            None
        }
    }
}

struct KeydownBinding {
    window: web_sys::Window,
    _handler: wasm_bindgen::closure::Closure<dyn Fn(web_sys::KeyboardEvent)>,
}

thread_local! {
    static KEYDOWN_BINDING: RefCell<Option<KeydownBinding>> = const { RefCell::new(None) };
}

fn register_service_worker() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let navigator = window.navigator();
    let Ok(container) = Reflect::get(navigator.as_ref(), &JsValue::from_str("serviceWorker")) else {
        return;
    };
    if container.is_undefined() {
        return;
    }
    let Ok(register) = Reflect::get(&container, &JsValue::from_str("register"))
        .and_then(|f| f.dyn_into::<Function>())
    else {
        return;
    };
    let Ok(promise) = register.call1(&container, &JsValue::from_str("sw.js")) else {
        info!("service worker registration skipped");
        return;
    };
    let Ok(promise) = promise.dyn_into::<js_sys::Promise>() else {
        return;
    };
    spawn_local(async move {
        if JsFuture::from(promise).await.is_err() {
            info!("service worker registration skipped");
        }
    });
}

fn set_dark_mode_class(enabled: bool) {
    let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    else {
        return;
    };
    body.class_list().toggle_with_force("dark-mode", enabled).ok();
}

/// Root application component. Boots the session and provides it via context.
#[component]
pub fn App() -> impl IntoView {
    let booted = Session::boot(BrowserStore, MapScene::new());
    let session = match booted {
        Ok(session) => SessionSignal(RwSignal::new(session)),
        Err(err) => {
            error!("could not start the map: {err}");
            return view! {
                <p style="padding: 24px; font-family: sans-serif;">
                    "ShoreSquad could not start. Please reload the page."
                </p>
            }
            .into_any();
        }
    };
    provide_context(session);

    // Global keyboard shortcuts
    Effect::new(move || {
        use wasm_bindgen::prelude::*;
        let Some(window) = web_sys::window() else {
            return;
        };

        KEYDOWN_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                let _ = old.window.remove_event_listener_with_callback(
                    "keydown",
                    old._handler.as_ref().unchecked_ref(),
                );
            }
        });

        let handler =
            Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(move |e: web_sys::KeyboardEvent| {
                if e.key() == "Escape" {
                    session.update(|s| {
                        s.dismiss_overlays();
                        s.close_nav();
                    });
                }
            });
        if window
            .add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            KEYDOWN_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(KeydownBinding {
                    window: window.clone(),
                    _handler: handler,
                });
            });
        }
    });

    // Weather for the last known location, then the one location request.
    Effect::new(move || {
        weather::refresh(session);
        spawn_local(async move {
            let result = geolocation::request_location().await;
            let transition = session.update(|s| s.on_location(result));
            if let Some(transition) = transition {
                report("recentering on location", transition);
                weather::refresh(session);
            }
        });
        register_service_worker();
        info!("ShoreSquad ready");
    });

    let dark_mode = Memo::new(move |_| session.with(|s| s.state().dark_mode));
    Effect::new(move || {
        set_dark_mode_class(dark_mode.get());
    });

    view! {
        <Header />
        <main>
            <section class="hero" style="padding: 48px 24px; text-align: center; background: linear-gradient(135deg, #0066CC, #00AA66); color: white;">
                <h1 style="margin: 0 0 12px; font-size: 2.4rem;">"Rally your crew. Clean the shore."</h1>
                <p style="margin: 0 0 24px; font-size: 1.1rem;">"Find beach cleanups near you, track the weather and climb the leaderboard."</p>
                <button
                    class="btn btn-primary btn-large"
                    on:click=move |_| {
                        session.update(|s| s.open_modal(ModalKind::CreateCrew));
                    }
                >
                    "Start a Crew"
                </button>
            </section>
            <section id="map" class="section">
                <h2>"Beach Cleanups Near You"</h2>
                <MapPanel />
            </section>
            <div class="section-grid">
                <section id="weather" class="section">
                    <h2>"Beach Weather"</h2>
                    <WeatherWidget />
                </section>
                <section id="next-cleanup" class="section">
                    <h2>"Next Cleanup"</h2>
                    <NextCleanupCard />
                </section>
            </div>
            <section id="leaderboard" class="section">
                <h2>"Leaderboard"</h2>
                <LeaderboardPanel />
            </section>
            <section id="crews" class="section">
                <h2>"My Crews"</h2>
                <CrewList />
            </section>
        </main>
        <ToastHost />
        <ModalHost />
    }
    .into_any()
}
