use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use shoresquad_shared::Coordinate;
use shoresquad_shared::config::weather_api_key;
use shoresquad_shared::weather::{
    WEATHER_UNAVAILABLE, WeatherError, WeatherPanel, WeatherReport, openweather_url,
    parse_openweather,
};

use crate::app::SessionSignal;

/// Current conditions at `at`. Without a compiled-in API key this is the sample report.
pub async fn fetch_weather(at: Coordinate) -> Result<WeatherReport, WeatherError> {
    let Some(key) = weather_api_key() else {
        return Ok(WeatherReport::mock());
    };
    let resp = gloo_net::http::Request::get(&openweather_url(at, key))
        .send()
        .await
        .map_err(|e| WeatherError::Request(e.to_string()))?;

    if !resp.ok() {
        return Err(WeatherError::Status(resp.status()));
    }

    let body = resp
        .text()
        .await
        .map_err(|e| WeatherError::Request(e.to_string()))?;
    parse_openweather(&body)
}

/// Refetch for the session's current location; a no-op until one is known.
/// A result that arrives after a newer fetch started is dropped.
pub(crate) fn refresh(session: SessionSignal) {
    let Some((at, ticket)) = session.update(|s| s.begin_weather_fetch()).flatten() else {
        return;
    };
    spawn_local(async move {
        let panel = WeatherPanel::from_result(fetch_weather(at).await);
        session.update(|s| s.finish_weather_fetch(ticket, panel));
    });
}

#[component]
pub fn WeatherWidget() -> impl IntoView {
    let session: SessionSignal = expect_context();
    let panel = Memo::new(move |_| session.with(|s| s.weather().clone()));

    view! {
        <div class="weather-widget">
            {move || match panel.get() {
                WeatherPanel::Loading => {
                    view! { <div class="loading">"Loading weather..."</div> }.into_any()
                }
                WeatherPanel::Unavailable => {
                    view! { <div class="loading">{WEATHER_UNAVAILABLE}</div> }.into_any()
                }
                WeatherPanel::Ready(report) => {
                    view! { <WeatherReportView report=report /> }.into_any()
                }
            }}
        </div>
    }
}

#[component]
fn WeatherReportView(report: WeatherReport) -> impl IntoView {
    let uv = report
        .uv_index
        .map(|uv| uv.to_string())
        .unwrap_or_else(|| "\u{2014}".to_string());
    view! {
        <div style="text-align: center; margin-bottom: 20px;">
            <div style="font-size: 48px; margin-bottom: 10px;">{report.icon}</div>
            <div style="font-size: 28px; color: #0066CC; font-weight: bold;">{format!("{}\u{00B0}F", report.temp_f)}</div>
            <div style="font-size: 18px; color: #666;">{report.condition}</div>
        </div>
        <div class="weather-item">
            <span>"\u{1F4A7} Humidity"</span>
            <span>{format!("{}%", report.humidity)}</span>
        </div>
        <div class="weather-item">
            <span>"\u{1F4A8} Wind Speed"</span>
            <span>{format!("{} mph", report.wind_mph)}</span>
        </div>
        <div class="weather-item">
            <span>"\u{2600}\u{FE0F} UV Index"</span>
            <span>{uv}</span>
        </div>
    }
}
