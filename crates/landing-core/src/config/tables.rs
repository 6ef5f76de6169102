use super::defaults;
use super::models::{LandingConfig, LogLevel};
use crate::gallery::GalleryMode;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    storefront: StorefrontConfig,
    #[serde(default)]
    catalog: CatalogConfig,
    #[serde(default)]
    gallery: GalleryConfig,
    #[serde(default)]
    scrub: ScrubConfig,
    #[serde(default)]
    sticky_bar: StickyBarConfig,
    #[serde(default)]
    cache: CacheConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for LandingConfig {
    fn from(tables: ConfigTables) -> Self {
        LandingConfig {
            storefront_endpoint: non_blank(tables.storefront.endpoint),
            storefront_access_token: non_blank(tables.storefront.access_token),
            product_query: tables.storefront.product_query,
            snapshot_path: non_blank(tables.storefront.snapshot_path),
            request_timeout_secs: tables.storefront.timeout_secs,
            colors: tables.catalog.colors,
            sizes: tables.catalog.sizes,
            default_size: tables.catalog.default_size,
            color_option_names: tables.catalog.color_option_names,
            size_option_names: tables.catalog.size_option_names,
            gallery_mode: tables.gallery.mode,
            // 0 disables the display limit.
            gallery_limit: (tables.gallery.limit > 0).then_some(tables.gallery.limit),
            track_role: tables.scrub.track_role,
            video_path: tables.scrub.video_path,
            poster_path: tables.scrub.poster_path,
            sticky_root_margin: tables.sticky_bar.root_margin,
            sticky_threshold: tables.sticky_bar.threshold,
            cache_dir: tables.cache.dir,
            catalog_cache_ttl_secs: tables.cache.ttl_secs,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&LandingConfig> for ConfigTables {
    fn from(config: &LandingConfig) -> Self {
        ConfigTables {
            storefront: StorefrontConfig {
                endpoint: config.storefront_endpoint.clone(),
                access_token: config.storefront_access_token.clone(),
                product_query: config.product_query.clone(),
                snapshot_path: config.snapshot_path.clone(),
                timeout_secs: config.request_timeout_secs,
            },
            catalog: CatalogConfig {
                colors: config.colors.clone(),
                sizes: config.sizes.clone(),
                default_size: config.default_size.clone(),
                color_option_names: config.color_option_names.clone(),
                size_option_names: config.size_option_names.clone(),
            },
            gallery: GalleryConfig {
                mode: config.gallery_mode,
                limit: config.gallery_limit.unwrap_or(0),
            },
            scrub: ScrubConfig {
                track_role: config.track_role.clone(),
                video_path: config.video_path.clone(),
                poster_path: config.poster_path.clone(),
            },
            sticky_bar: StickyBarConfig {
                root_margin: config.sticky_root_margin.clone(),
                threshold: config.sticky_threshold,
            },
            cache: CacheConfig {
                dir: config.cache_dir.clone(),
                ttl_secs: config.catalog_cache_ttl_secs,
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct StorefrontConfig {
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default = "defaults::default_product_query")]
    product_query: String,
    #[serde(default)]
    snapshot_path: Option<String>,
    #[serde(default = "defaults::default_request_timeout_secs")]
    timeout_secs: u64,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        StorefrontConfig {
            endpoint: None,
            access_token: None,
            product_query: defaults::default_product_query(),
            snapshot_path: None,
            timeout_secs: defaults::default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct CatalogConfig {
    #[serde(default = "defaults::default_colors")]
    colors: Vec<String>,
    #[serde(default = "defaults::default_sizes")]
    sizes: Vec<String>,
    #[serde(default = "defaults::default_size")]
    default_size: String,
    #[serde(default = "defaults::default_color_option_names")]
    color_option_names: Vec<String>,
    #[serde(default = "defaults::default_size_option_names")]
    size_option_names: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            colors: defaults::default_colors(),
            sizes: defaults::default_sizes(),
            default_size: defaults::default_size(),
            color_option_names: defaults::default_color_option_names(),
            size_option_names: defaults::default_size_option_names(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct GalleryConfig {
    #[serde(default = "defaults::default_gallery_mode")]
    mode: GalleryMode,
    #[serde(default = "default_gallery_limit_raw")]
    limit: usize,
}

fn default_gallery_limit_raw() -> usize {
    defaults::default_gallery_limit().unwrap_or(0)
}

impl Default for GalleryConfig {
    fn default() -> Self {
        GalleryConfig {
            mode: defaults::default_gallery_mode(),
            limit: default_gallery_limit_raw(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ScrubConfig {
    #[serde(default = "defaults::default_track_role")]
    track_role: String,
    #[serde(default = "defaults::default_video_path")]
    video_path: String,
    #[serde(default = "defaults::default_poster_path")]
    poster_path: String,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        ScrubConfig {
            track_role: defaults::default_track_role(),
            video_path: defaults::default_video_path(),
            poster_path: defaults::default_poster_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct StickyBarConfig {
    #[serde(default = "defaults::default_sticky_root_margin")]
    root_margin: String,
    #[serde(default = "defaults::default_sticky_threshold")]
    threshold: f64,
}

impl Default for StickyBarConfig {
    fn default() -> Self {
        StickyBarConfig {
            root_margin: defaults::default_sticky_root_margin(),
            threshold: defaults::default_sticky_threshold(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct CacheConfig {
    #[serde(default = "defaults::default_cache_dir")]
    dir: String,
    #[serde(default = "defaults::default_catalog_cache_ttl_secs")]
    ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            dir: defaults::default_cache_dir(),
            ttl_secs: defaults::default_catalog_cache_ttl_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}
