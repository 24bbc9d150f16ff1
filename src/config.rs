use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.tcgmarketplace.app/api";
/// Environment variable that overrides [`DEFAULT_API_BASE`].
pub const API_BASE_ENV: &str = "TCG_API_BASE_URL";
/// Public web origin used when building share links.
pub const SHARE_WEB_BASE: &str = "https://tcgmarketplace.app/share";
pub const APP_DEEP_LINK_SCHEME: &str = "tcgapp";

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// Conversation refresh cadence while a thread is open.
pub const MESSAGE_POLL_INTERVAL: Duration = Duration::from_secs(4);
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);
/// Error lines rendered literally in a batch report before "and N more".
pub const MAX_BATCH_ERROR_LINES: usize = 5;
pub const TEMPLATE_PAGE_SIZE: u32 = 24;

pub const SESSION_FILE: &str = "session.json";

/// Resolve the API base URL: explicit value, then environment, then default.
pub fn api_base_url(explicit: Option<&str>) -> String {
    let base = match explicit {
        Some(url) => url.to_string(),
        None => std::env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
    };
    base.trim_end_matches('/').to_string()
}

pub fn default_session_dir() -> PathBuf {
    if let Some(data) = dirs::data_local_dir() {
        data.join("tcg-merchant")
    } else {
        PathBuf::from(".tcg-merchant")
    }
}
