//! Headless replay of the hero scroll: a phone-sized page with the hero track,
//! the video inside it and the main CTA below, scrolled top to bottom.

use anyhow::{Context, Result};
use landing_core::config::LandingConfig;
use landing_core::host::memory::{HeadlessPage, PageNode, ScriptedMedia};
use landing_core::host::{NodeId, ObserverOptions, Viewport};
use landing_core::scrub::{ScrollScrubEngine, ScrubOptions};
use landing_core::visibility::{RootMargin, ViewportVisibilityTrigger};
use serde::Serialize;
use std::rc::Rc;
use tracing::debug;

pub const DEFAULT_STEPS: usize = 10;

const VIEWPORT: Viewport = Viewport {
    width: 390.0,
    height: 844.0,
};
const HERO_SCREENS: f64 = 3.0;
const VIDEO_SECONDS: f64 = 8.0;

const ROOT: NodeId = NodeId(1);
const HERO: NodeId = NodeId(2);
const VIDEO: NodeId = NodeId(3);
const CTA: NodeId = NodeId(4);

#[derive(Debug, Clone, Serialize)]
pub struct ScrubFrame {
    pub scroll_y: f64,
    pub progress: Option<f64>,
    pub media_time: f64,
    pub video_ready: bool,
    pub sticky_bar_visible: bool,
}

pub fn run_scrub_preview(config: &LandingConfig, steps: usize) -> Result<Vec<ScrubFrame>> {
    let steps = steps.max(1);
    let hero_height = VIEWPORT.height * HERO_SCREENS;
    let page = Rc::new(HeadlessPage::new(VIEWPORT));
    page.insert(ROOT, PageNode::new(None, 0.0, VIEWPORT.width, hero_height + 1_200.0));
    page.insert(
        HERO,
        PageNode::new(Some(ROOT), 0.0, VIEWPORT.width, hero_height).with_role(&config.track_role),
    );
    page.insert(
        VIDEO,
        PageNode::new(Some(HERO), 0.0, VIEWPORT.width, VIEWPORT.height),
    );
    page.insert(
        CTA,
        PageNode::new(Some(ROOT), hero_height + 420.0, VIEWPORT.width - 40.0, 56.0),
    );

    let media = ScriptedMedia::with_duration(VIDEO_SECONDS);
    let root_margin: RootMargin = config
        .sticky_root_margin
        .parse()
        .context("invalid sticky bar root margin")?;
    let trigger = ViewportVisibilityTrigger::attach(
        page.clone(),
        CTA,
        ObserverOptions {
            root_margin,
            threshold: config.sticky_threshold.clamp(0.0, 1.0),
        },
    );
    let engine = ScrollScrubEngine::attach(
        page.clone(),
        page.clone(),
        Some(Box::new(media.clone())),
        VIDEO,
        ScrubOptions {
            track_role: config.track_role.clone(),
        },
    );
    page.notify_observers();
    media.deliver_data();

    // Past the CTA, so the sticky bar comes back at the end.
    let max_scroll = hero_height + 600.0;
    let mut frames = Vec::with_capacity(steps + 1);
    for step in 0..=steps {
        let scroll_y = max_scroll * step as f64 / steps as f64;
        page.scroll_to(scroll_y);
        let frame = ScrubFrame {
            scroll_y,
            progress: engine.last_progress(),
            media_time: media.current_time(),
            video_ready: engine.is_ready(),
            sticky_bar_visible: trigger.is_off_screen(),
        };
        debug!(?frame, "Scrub preview frame");
        frames.push(frame);
    }

    engine.detach();
    drop(trigger);
    debug!(listeners = page.listener_count(), "Scrub preview finished");
    Ok(frames)
}
