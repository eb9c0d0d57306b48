#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    // Desktop dev: pick up FOLIO_* overrides (including the runtime API key) from .env
    let _ = dotenvy::dotenv();
}

#[cfg(target_arch = "wasm32")]
fn load_dotenv() {
    // The browser has no environment; the bundled config.env is read by ChatConfig::load
}

fn main() {
    load_dotenv();
    // dioxus::launch installs its own tracing subscriber
    dioxus::launch(folio::ui::App);
}
