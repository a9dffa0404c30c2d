use web_sys::window;

/// localStorage key holding the bearer token.
pub const TOKEN_KEY: &str = "vibe_fiction_token";

/// Countdown tick period.
pub const TICK_MILLIS: u32 = 1_000;

const API_META: &str = "vibefiction-api";
const LOG_META: &str = "vibefiction-log";

/// Settings the host page passes in through `<meta>` tags.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub log_level: log::Level,
}

impl ClientConfig {
    pub fn from_document() -> Self {
        Self {
            log_level: meta_content(LOG_META)
                .and_then(|level| level.parse().ok())
                .unwrap_or(log::Level::Info),
        }
    }
}

/// API origin. Empty means same origin as the page.
pub fn api_base() -> String {
    meta_content(API_META).unwrap_or_default()
}

fn meta_content(name: &str) -> Option<String> {
    let document = window()?.document()?;
    let el = document
        .query_selector(&format!("meta[name='{name}']"))
        .ok()
        .flatten()?;
    el.get_attribute("content").filter(|c| !c.is_empty())
}
