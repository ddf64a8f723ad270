use std::path::PathBuf;

/// Desktop Chrome identity presented to the storefront.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Storefront origin, e.g. `https://blinkit.com`.
    pub base_url: String,
    pub categories_path: PathBuf,
    pub locations_path: PathBuf,
    pub output_dir: PathBuf,
    pub log_level: String,
    pub user_agent: String,
    /// `None` leaves requests without an explicit timeout.
    pub request_timeout_secs: Option<u64>,
    /// Pause after every listing request.
    pub inter_request_delay_ms: u64,
    /// Pause after the initial storefront visit.
    pub warmup_delay_ms: u64,
}
