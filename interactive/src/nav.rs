use chrono::NaiveDateTime;
use wasm_bindgen::JsValue;
use web_sys::window;

pub fn alert(message: &str) {
    if let Some(w) = window() {
        let _ = w.alert_with_message(message);
    }
}

pub fn confirm(message: &str) -> bool {
    window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Full reload; the next load rebuilds all page state from the server.
pub fn reload() {
    if let Some(w) = window() {
        let _ = w.location().reload();
    }
}

pub fn push_and_reload(path: &str) {
    let Some(w) = window() else {
        return;
    };
    if let Ok(history) = w.history() {
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
    }
    let _ = w.location().reload();
}

/// Browser-local wall clock, comparable with the server's naive timestamps.
pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
