mod api;
mod auth;
mod config;
mod nav;
mod vote;

use leptos::prelude::*;
use wasm_bindgen::JsCast;

fn main() {
    console_error_panic_hook::set_once();

    let config = config::ClientConfig::from_document();
    let _ = console_log::init_with_level(config.log_level);
    log::info!("vibe fiction client starting (api: {:?})", config::api_base());

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::error!("no document to mount into");
        return;
    };

    // Mount header login/logout if the mount point exists
    if let Some(el) = document.get_element_by_id("vibefiction-auth") {
        let html_el: web_sys::HtmlElement = el.unchecked_into();
        leptos::mount::mount_to(html_el, move || {
            view! {
                <auth::AuthProvider>
                    <auth::AuthPanel />
                </auth::AuthProvider>
            }
        })
        .forget();
    }

    // Mount the vote page if the mount point exists
    if let Some(el) = document.get_element_by_id("vibefiction-vote") {
        let html_el: web_sys::HtmlElement = el.unchecked_into();
        leptos::mount::mount_to(html_el, move || {
            view! {
                <auth::AuthProvider>
                    <vote::VoteApp />
                </auth::AuthProvider>
            }
        })
        .forget();
    }
}
