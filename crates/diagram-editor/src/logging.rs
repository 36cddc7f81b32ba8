/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Installs the process-wide logger. `log` records from every crate,
/// eframe and egui included, end up in the same output.
#[cfg(not(target_arch = "wasm32"))]
pub fn init() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("logger already installed: {e}");
    }
}

/// Installs the process-wide logger, writing to the browser console.
#[cfg(target_arch = "wasm32")]
pub fn init() {
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        let message = format!("logger already installed: {e}");
        web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(&message));
    }
}
