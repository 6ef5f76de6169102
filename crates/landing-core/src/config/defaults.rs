use crate::gallery::GalleryMode;

pub(crate) fn default_product_query() -> String {
    "title:Laredo".to_string()
}

pub(crate) fn default_request_timeout_secs() -> u64 {
    10
}

pub(crate) fn default_colors() -> Vec<String> {
    vec!["Verde Oliva".to_string(), "Negro".to_string()]
}

pub(crate) fn default_sizes() -> Vec<String> {
    vec![
        "S".to_string(),
        "M".to_string(),
        "L".to_string(),
        "XL".to_string(),
    ]
}

pub(crate) fn default_size() -> String {
    "M".to_string()
}

pub(crate) fn default_color_option_names() -> Vec<String> {
    vec!["color".to_string(), "colour".to_string()]
}

pub(crate) fn default_size_option_names() -> Vec<String> {
    vec!["size".to_string(), "talla".to_string()]
}

pub(crate) fn default_gallery_mode() -> GalleryMode {
    GalleryMode::Filter
}

pub(crate) fn default_gallery_limit() -> Option<usize> {
    Some(6)
}

pub(crate) fn default_track_role() -> String {
    "hero-container".to_string()
}

pub(crate) fn default_video_path() -> String {
    "/video-scroll.mp4".to_string()
}

pub(crate) fn default_poster_path() -> String {
    "/poster-hero.jpg".to_string()
}

pub(crate) fn default_sticky_root_margin() -> String {
    "-100px 0px 0px 0px".to_string()
}

pub(crate) fn default_sticky_threshold() -> f64 {
    0.0
}

pub(crate) fn default_cache_dir() -> String {
    ".cache".to_string()
}

pub(crate) fn default_catalog_cache_ttl_secs() -> u64 {
    600
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}
