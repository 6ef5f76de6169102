//! Configuration loading for the landing page.
//!
//! All tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back to
//! defaults that reproduce the stock Laredo page, so the server can always
//! render something.

mod defaults;
mod io;
mod models;
mod tables;

pub use io::{load_config, parse_config, serialize_config};
pub use models::{LandingConfig, LogLevel};
