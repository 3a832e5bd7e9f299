use shoresquad_shared::{KeyValueStore, StoreError};
use wasm_bindgen::JsValue;

/// `window.localStorage`. Storage can be missing or refused (disabled,
/// sandboxed iframes, some private modes); that surfaces as [`StoreError`]
/// and the caller falls back.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Read,
    Write,
}

impl Access {
    fn error(self, reason: String) -> StoreError {
        match self {
            Access::Read => StoreError::Unavailable(reason),
            Access::Write => StoreError::WriteRejected(reason),
        }
    }
}

fn describe(err: JsValue) -> String {
    err.as_string()
        .or_else(|| {
            js_sys::Reflect::get(&err, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{err:?}"))
}

/// Map each way of not getting a storage handle to the error for `access`.
/// `lookup` is `None` when there is no window at all.
fn storage_handle<H>(
    lookup: Option<Result<Option<H>, String>>,
    access: Access,
) -> Result<H, StoreError> {
    match lookup {
        None => Err(access.error("no window".into())),
        Some(Err(reason)) => Err(access.error(reason)),
        Some(Ok(None)) => Err(access.error("local storage disabled".into())),
        Some(Ok(Some(handle))) => Ok(handle),
    }
}

fn local_storage(access: Access) -> Result<web_sys::Storage, StoreError> {
    let lookup = web_sys::window().map(|w| w.local_storage().map_err(describe));
    storage_handle(lookup, access)
}

impl KeyValueStore for BrowserStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        local_storage(Access::Read)?
            .get_item(key)
            .map_err(|err| Access::Read.error(describe(err)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        local_storage(Access::Write)?
            .set_item(key, value)
            .map_err(|err| Access::Write.error(describe(err)))
    }
}
