//! Server-side host for the Laredo landing page.
//!
//! Loads `conf/config.toml`, resolves the product (snapshot, cache,
//! storefront or fallback), applies the shopper selections given on the
//! command line and prints the hydration payload as JSON. `--preview-scrub`
//! additionally replays a scroll through the hero on a headless page.

mod preview;

use anyhow::{Context, Result, anyhow, bail};
use landing_core::config::{LandingConfig, load_config, serialize_config};
use landing_core::session::{LandingSession, LandingView, SelectionPatch};
use landing_core::storefront::load_product;
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const USAGE: &str = "Usage: laredo-landing [--config <path>] [--snapshot <path>] \
[--color <name>] [--size <label>] [--height <cm>] [--weight <kg>] \
[--preview-scrub [steps]] [--print-config]";

#[derive(Debug, Default)]
struct CliArgs {
    config_path: Option<PathBuf>,
    snapshot_path: Option<PathBuf>,
    patch: SelectionPatch,
    preview_steps: Option<usize>,
    print_config: bool,
}

#[derive(Debug, Serialize)]
struct Output {
    view: LandingView,
    #[serde(skip_serializing_if = "Option::is_none")]
    scrub_preview: Option<Vec<preview::ScrubFrame>>,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    let config_path = args
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("conf/config.toml"));
    let mut config = load_config(&config_path);
    if let Some(snapshot) = &args.snapshot_path {
        config.snapshot_path = Some(snapshot.to_string_lossy().into_owned());
    }
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        config = %config_path.display(),
        level = %config.log_level,
        "Starting landing host"
    );

    if args.print_config {
        println!("{}", serialize_config(&config)?);
        return Ok(());
    }

    let output = build_output(config, args)?;
    let json = serde_json::to_string_pretty(&output).context("failed to serialize landing view")?;
    println!("{json}");
    Ok(())
}

fn build_output(config: LandingConfig, args: CliArgs) -> Result<Output> {
    let product = load_product(&config);
    let mut session = LandingSession::new(product, config.clone());
    session.apply(args.patch);

    let view = session.view();
    info!(
        product = %view.product_id,
        variant = view.selected_variant.as_ref().map(|v| v.id.as_str()).unwrap_or("none"),
        purchasable = view.purchasable,
        gallery = view.gallery.len(),
        "Resolved landing view"
    );
    let scrub_preview = match args.preview_steps {
        Some(steps) => Some(preview::run_scrub_preview(&config, steps)?),
        None => None,
    };
    Ok(Output {
        view,
        scrub_preview,
    })
}

fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter().peekable();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => parsed.config_path = Some(PathBuf::from(value_for(&arg, &mut args)?)),
            "--snapshot" => {
                let path = PathBuf::from(value_for(&arg, &mut args)?);
                if !path.exists() {
                    bail!("Snapshot not found: {}", path.display());
                }
                parsed.snapshot_path = Some(path);
            }
            "--color" => parsed.patch.color = Some(value_for(&arg, &mut args)?),
            "--size" => parsed.patch.size = Some(value_for(&arg, &mut args)?),
            "--height" => parsed.patch.height = Some(value_for(&arg, &mut args)?),
            "--weight" => parsed.patch.weight = Some(value_for(&arg, &mut args)?),
            "--preview-scrub" => {
                let steps = match args.next_if(|next| !next.starts_with("--")) {
                    Some(raw) => raw
                        .parse::<usize>()
                        .map_err(|err| anyhow!("Invalid step count {raw:?}: {err}"))?,
                    None => preview::DEFAULT_STEPS,
                };
                parsed.preview_steps = Some(steps);
            }
            "--print-config" => parsed.print_config = true,
            "-h" | "--help" => bail!("{USAGE}"),
            other => bail!("Unknown argument {other:?}\n{USAGE}"),
        }
    }
    Ok(parsed)
}

fn value_for<I>(flag: &str, args: &mut I) -> Result<String>
where
    I: Iterator<Item = String>,
{
    args.next()
        .ok_or_else(|| anyhow!("Missing value for {flag}\n{USAGE}"))
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    if env::var_os("RUST_LOG").is_some() {
        return;
    }
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_selection_flags() {
        let parsed = parse_args(args(&[
            "--color", "Negro", "--size", "L", "--height", "180", "--weight", "82",
        ]))
        .expect("valid args");
        assert_eq!(parsed.patch.color.as_deref(), Some("Negro"));
        assert_eq!(parsed.patch.size.as_deref(), Some("L"));
        assert_eq!(parsed.patch.weight.as_deref(), Some("82"));
        assert!(parsed.preview_steps.is_none());
    }

    #[test]
    fn preview_step_count_is_optional() {
        let parsed = parse_args(args(&["--preview-scrub", "--color", "Negro"])).unwrap();
        assert_eq!(parsed.preview_steps, Some(preview::DEFAULT_STEPS));

        let parsed = parse_args(args(&["--preview-scrub", "4"])).unwrap();
        assert_eq!(parsed.preview_steps, Some(4));
    }

    #[test]
    fn rejects_bad_usage() {
        assert!(parse_args(args(&["--preview-scrub", "many"])).is_err());
        assert!(parse_args(args(&["--color"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["--snapshot", "/nonexistent/laredo.json"])).is_err());
    }

    #[test]
    fn output_for_fallback_catalog() {
        let parsed = parse_args(args(&["--color", "Negro", "--preview-scrub", "2"])).unwrap();
        let output = build_output(LandingConfig::default(), parsed).expect("output builds");
        assert!(output.view.using_fallback);
        assert!(output.view.purchasable);
        assert_eq!(output.scrub_preview.map(|frames| frames.len()), Some(3));
    }
}
