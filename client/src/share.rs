use js_sys::{Function, Promise, Reflect};
use log::{error, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use shoresquad_shared::events::{SHARE_COPIED_MESSAGE, share_fallback_message};

use crate::app::SessionSignal;

/// Look up `target[name]` as a callable, if present.
fn method(target: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
}

async fn await_call(promise: Result<JsValue, JsValue>) -> Result<JsValue, JsValue> {
    let promise = promise?.dyn_into::<Promise>()?;
    JsFuture::from(promise).await
}

/// Share the next cleanup: the native share sheet when available, else
/// the clipboard, else show the text itself.
pub(crate) async fn share_next_cleanup(session: SessionSignal) {
    info!("sharing cleanup event");
    let Some(window) = web_sys::window() else {
        return;
    };
    let page_url = window.location().href().unwrap_or_default();
    let data = session.with_untracked(|s| s.share_data(&page_url));
    let navigator: JsValue = window.navigator().into();

    if let Some(share) = method(&navigator, "share") {
        match serde_wasm_bindgen::to_value(&data) {
            Ok(payload) => {
                if let Err(err) = await_call(share.call1(&navigator, &payload)).await {
                    info!("share cancelled or failed: {err:?}");
                }
                return;
            }
            Err(err) => error!("could not build share payload: {err}"),
        }
    }

    let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard"))
        .unwrap_or(JsValue::UNDEFINED);
    let copied = match method(&clipboard, "writeText") {
        Some(write_text) => await_call(write_text.call1(&clipboard, &JsValue::from_str(&data.text)))
            .await
            .map(|_| ()),
        None => Err(JsValue::from_str("clipboard unavailable")),
    };
    match copied {
        Ok(()) => {
            session.update(|s| s.notify(SHARE_COPIED_MESSAGE));
        }
        Err(err) => {
            error!("copy failed: {err:?}");
            session.update(|s| s.notify(share_fallback_message(&data.text)));
        }
    }
}
