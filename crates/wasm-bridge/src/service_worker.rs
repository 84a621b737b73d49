//! Offline worker registration

use config_system::ServiceWorkerConfig;
use js_sys::Reflect;
use shared_types::PredictorResult;
use wasm_bindgen_futures::JsFuture;
use web_sys::Window;

/// Register the worker script. Browsers without service workers are
/// skipped; returns whether a registration happened.
pub async fn register(window: &Window, script_url: &str) -> PredictorResult<bool> {
    let navigator = window.navigator();
    if !Reflect::has(&navigator, &"serviceWorker".into()).unwrap_or(false) {
        log::debug!("Service workers unsupported");
        return Ok(false);
    }

    let promise = navigator.service_worker().register(script_url);
    JsFuture::from(promise).await?;
    Ok(true)
}

/// Fire-and-forget registration; failures are only logged
pub fn spawn_registration(window: Window, config: &ServiceWorkerConfig) {
    if !config.enabled {
        return;
    }
    let script_url = config.script_url.clone();

    wasm_bindgen_futures::spawn_local(async move {
        match register(&window, &script_url).await {
            Ok(true) => log::info!("SW registered: {script_url}"),
            Ok(false) => {}
            Err(e) => log::warn!("SW registration failed: {e}"),
        }
    });
}
