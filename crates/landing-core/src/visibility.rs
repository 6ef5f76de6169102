//! Sticky call-to-action visibility: a flag that is true while the main CTA
//! anchor is off-screen.

use crate::host::{NodeId, ObservationId, ObserverOptions, Rect, Viewport, ViewportObserver};
use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use std::str::FromStr;
use tracing::{debug, trace};
use ts_rs::TS;

/// Grows (positive) or shrinks (negative) the viewport before intersection
/// testing, in CSS pixels. Parsed from the CSS `rootMargin` shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The viewport rectangle after applying the margin.
    pub fn root_rect(&self, viewport: Viewport) -> Rect {
        Rect::new(
            -self.top,
            -self.left,
            viewport.width + self.left + self.right,
            viewport.height + self.top + self.bottom,
        )
    }

    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

impl FromStr for RootMargin {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let values = raw
            .split_whitespace()
            .map(parse_px)
            .collect::<Result<Vec<f64>>>()?;
        // CSS shorthand expansion.
        let margin = match values.as_slice() {
            [all] => Self::new(*all, *all, *all, *all),
            [vertical, horizontal] => Self::new(*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => Self::new(*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => Self::new(*top, *right, *bottom, *left),
            _ => bail!("root margin needs 1 to 4 values, got {:?}", raw),
        };
        Ok(margin)
    }
}

fn parse_px(token: &str) -> Result<f64> {
    let number = token.strip_suffix("px").unwrap_or(token);
    if number != token || number == "0" || number == "-0" {
        let value: f64 = number
            .parse()
            .map_err(|err| anyhow!("invalid margin value {token:?}: {err}"))?;
        if value.is_finite() {
            return Ok(value);
        }
    }
    bail!("unsupported margin value {token:?}; only px lengths are accepted")
}

/// Intersection test as a viewport observer performs it.
///
/// With a zero threshold, touching the (margin-adjusted) viewport edge counts
/// as intersecting. Otherwise the visible fraction of the target must reach
/// the threshold.
pub fn is_intersecting(target: Rect, viewport: Viewport, options: &ObserverOptions) -> bool {
    let root = options.root_margin.root_rect(viewport);
    let top = target.top.max(root.top);
    let bottom = target.bottom().min(root.bottom());
    let left = target.left.max(root.left);
    let right = target.right().min(root.right());
    if bottom < top || right < left {
        return false;
    }
    if options.threshold <= 0.0 {
        return true;
    }
    let area = target.width * target.height;
    if area <= 0.0 {
        return false;
    }
    ((bottom - top) * (right - left)) / area >= options.threshold
}

#[derive(Debug, Default)]
struct TriggerState {
    off_screen: Cell<bool>,
    live: Cell<bool>,
}

pub struct ViewportVisibilityTrigger {
    state: Rc<TriggerState>,
    observer: Rc<dyn ViewportObserver>,
    observation: Option<ObservationId>,
}

impl ViewportVisibilityTrigger {
    /// Starts observing `anchor`. The flag starts `false` (anchor assumed
    /// visible) until the observer reports otherwise.
    pub fn attach(
        observer: Rc<dyn ViewportObserver>,
        anchor: NodeId,
        options: ObserverOptions,
    ) -> Self {
        let state = Rc::new(TriggerState {
            off_screen: Cell::new(false),
            live: Cell::new(true),
        });
        let weak = Rc::downgrade(&state);
        let observation = observer.observe(
            anchor,
            options,
            Box::new(move |entry| {
                let Some(state) = weak.upgrade() else {
                    return;
                };
                if !state.live.get() {
                    return;
                }
                let off_screen = !entry.is_intersecting;
                if state.off_screen.replace(off_screen) != off_screen {
                    debug!(off_screen, anchor = entry.target.0, "Sticky bar visibility changed");
                }
            }),
        );
        trace!(anchor = anchor.0, margin = %options.root_margin.to_css(), "Observing CTA anchor");
        Self {
            state,
            observer,
            observation: Some(observation),
        }
    }

    pub fn is_off_screen(&self) -> bool {
        self.state.off_screen.get()
    }

    pub fn is_attached(&self) -> bool {
        self.observation.is_some()
    }

    /// Stops observing. The flag keeps its last value. Safe to call twice.
    pub fn detach(&mut self) {
        self.state.live.set(false);
        if let Some(id) = self.observation.take() {
            self.observer.disconnect(id);
        }
    }
}

impl Drop for ViewportVisibilityTrigger {
    fn drop(&mut self) {
        self.detach();
    }
}
