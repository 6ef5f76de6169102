use crate::gallery::GalleryMode;
use serde::Deserialize;

/// High-level landing configuration.
///
/// The on-disk format is sectioned (see `tables.rs`); this flat shape is what
/// the rest of the crate reads.
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
pub struct LandingConfig {
    #[serde(default)]
    pub storefront_endpoint: Option<String>,
    #[serde(default)]
    pub storefront_access_token: Option<String>,
    #[serde(default = "crate::config::defaults::default_product_query")]
    pub product_query: String,
    #[serde(default)]
    pub snapshot_path: Option<String>,
    #[serde(default = "crate::config::defaults::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "crate::config::defaults::default_colors")]
    pub colors: Vec<String>,
    #[serde(default = "crate::config::defaults::default_sizes")]
    pub sizes: Vec<String>,
    #[serde(default = "crate::config::defaults::default_size")]
    pub default_size: String,
    #[serde(default = "crate::config::defaults::default_color_option_names")]
    pub color_option_names: Vec<String>,
    #[serde(default = "crate::config::defaults::default_size_option_names")]
    pub size_option_names: Vec<String>,
    #[serde(default = "crate::config::defaults::default_gallery_mode")]
    pub gallery_mode: GalleryMode,
    #[serde(default = "crate::config::defaults::default_gallery_limit")]
    pub gallery_limit: Option<usize>,
    #[serde(default = "crate::config::defaults::default_track_role")]
    pub track_role: String,
    #[serde(default = "crate::config::defaults::default_video_path")]
    pub video_path: String,
    #[serde(default = "crate::config::defaults::default_poster_path")]
    pub poster_path: String,
    #[serde(default = "crate::config::defaults::default_sticky_root_margin")]
    pub sticky_root_margin: String,
    #[serde(default = "crate::config::defaults::default_sticky_threshold")]
    pub sticky_threshold: f64,
    #[serde(default = "crate::config::defaults::default_cache_dir")]
    pub cache_dir: String,
    #[serde(default = "crate::config::defaults::default_catalog_cache_ttl_secs")]
    pub catalog_cache_ttl_secs: u64,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for LandingConfig {
    fn default() -> Self {
        LandingConfig {
            storefront_endpoint: None,
            storefront_access_token: None,
            product_query: crate::config::defaults::default_product_query(),
            snapshot_path: None,
            request_timeout_secs: crate::config::defaults::default_request_timeout_secs(),
            colors: crate::config::defaults::default_colors(),
            sizes: crate::config::defaults::default_sizes(),
            default_size: crate::config::defaults::default_size(),
            color_option_names: crate::config::defaults::default_color_option_names(),
            size_option_names: crate::config::defaults::default_size_option_names(),
            gallery_mode: crate::config::defaults::default_gallery_mode(),
            gallery_limit: crate::config::defaults::default_gallery_limit(),
            track_role: crate::config::defaults::default_track_role(),
            video_path: crate::config::defaults::default_video_path(),
            poster_path: crate::config::defaults::default_poster_path(),
            sticky_root_margin: crate::config::defaults::default_sticky_root_margin(),
            sticky_threshold: crate::config::defaults::default_sticky_threshold(),
            cache_dir: crate::config::defaults::default_cache_dir(),
            catalog_cache_ttl_secs: crate::config::defaults::default_catalog_cache_ttl_secs(),
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
