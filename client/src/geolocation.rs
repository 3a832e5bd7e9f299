use js_sys::{Function, Promise, Reflect};
use shoresquad_shared::Coordinate;
use shoresquad_shared::location::LocationError;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::JsFuture;

fn number(target: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_f64())
}

fn coordinate_from(position: &JsValue) -> Result<Coordinate, LocationError> {
    let coords = Reflect::get(position, &JsValue::from_str("coords"))
        .map_err(|_| LocationError::Other("position has no coords".into()))?;
    let (Some(lat), Some(lng)) = (number(&coords, "latitude"), number(&coords, "longitude")) else {
        return Err(LocationError::Other("coords missing latitude/longitude".into()));
    };
    Ok(Coordinate::new(lat, lng)?)
}

fn error_from(error: &JsValue) -> LocationError {
    let message = Reflect::get(error, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_default();
    match number(error, "code") {
        Some(code) => LocationError::from_code(code as u16, message),
        None => LocationError::Other(message),
    }
}

/// One-shot device position request. No retries and no timeout of our own.
pub async fn request_location() -> Result<Coordinate, LocationError> {
    let Some(window) = web_sys::window() else {
        return Err(LocationError::Unsupported);
    };
    let navigator = window.navigator();
    let supported =
        Reflect::has(navigator.as_ref(), &JsValue::from_str("geolocation")).unwrap_or(false);
    if !supported {
        return Err(LocationError::Unsupported);
    }
    let geolocation = navigator
        .geolocation()
        .map_err(|_| LocationError::Unsupported)?;

    let mut executor = |resolve: Function, reject: Function| {
        let on_success = Closure::once_into_js(move |position: JsValue| {
            let _ = resolve.call1(&JsValue::NULL, &position);
        });
        let reject_on_error = reject.clone();
        let on_error = Closure::once_into_js(move |error: JsValue| {
            let _ = reject_on_error.call1(&JsValue::NULL, &error);
        });
        if let Err(err) = geolocation.get_current_position_with_error_callback(
            on_success.unchecked_ref(),
            Some(on_error.unchecked_ref()),
        ) {
            let _ = reject.call1(&JsValue::NULL, &err);
        }
    };

    match JsFuture::from(Promise::new(&mut executor)).await {
        Ok(position) => coordinate_from(&position),
        Err(error) => Err(error_from(&error)),
    }
}
