//! Scroll-synchronized video scrubbing for the hero section.
//!
//! The hero video sits in a thin absolutely-positioned layer inside a much
//! taller scroll track. Scrolling through the track maps linearly onto the
//! video's timeline: top of the track at the top of the viewport is frame 0,
//! bottom of the track at the bottom of the viewport is the last frame.

use crate::host::{
    LayoutTree, ListenerGuard, ListenerOptions, MediaHandle, NodeId, PageEvent, Rect,
    ScrollSource,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, trace};

/// Upper bound on ancestor walks; layouts deeper than this are treated as
/// having no track.
const MAX_TRACK_DEPTH: usize = 256;

/// Fraction of the track traversed, or `None` when the track is not taller
/// than the viewport (nothing to scrub through).
pub fn compute_progress(track: Rect, viewport_height: f64) -> Option<f64> {
    let total_distance = track.height - viewport_height;
    if !total_distance.is_finite() || total_distance <= 0.0 {
        return None;
    }
    let scrolled = -track.top;
    if !scrolled.is_finite() {
        return None;
    }
    Some((scrolled / total_distance).clamp(0.0, 1.0))
}

/// Seeks the media to `progress` of its duration. Returns the time written,
/// or `None` when the duration is not yet known.
pub fn apply_progress(media: &mut dyn MediaHandle, progress: f64) -> Option<f64> {
    let duration = media.duration();
    if !duration.is_finite() || duration <= 0.0 || !progress.is_finite() {
        return None;
    }
    let time = duration * progress.clamp(0.0, 1.0);
    media.set_current_time(time);
    Some(time)
}

/// Nearest element at or above `anchor` carrying `role`, else `anchor`.
pub fn find_track(layout: &dyn LayoutTree, anchor: NodeId, role: &str) -> NodeId {
    let mut current = Some(anchor);
    for _ in 0..MAX_TRACK_DEPTH {
        let Some(node) = current else {
            break;
        };
        if layout.has_role(node, role) {
            return node;
        }
        current = layout.parent(node);
    }
    anchor
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrubOptions {
    pub track_role: String,
}

impl Default for ScrubOptions {
    fn default() -> Self {
        Self {
            track_role: "hero-container".to_string(),
        }
    }
}

struct ScrubCore {
    media: Option<Box<dyn MediaHandle>>,
    layout: Rc<dyn LayoutTree>,
    anchor: NodeId,
    track_role: String,
    progress: Option<f64>,
}

impl ScrubCore {
    fn recompute(&mut self, viewport_height: f64) -> Option<f64> {
        let Some(media) = self.media.as_mut() else {
            trace!("No media attached; skipping scrub");
            return None;
        };
        if !media.duration().is_finite() {
            trace!("Media duration unknown; skipping scrub");
            return None;
        }

        // Re-derived every tick: the anchor may have been re-parented.
        let track = find_track(self.layout.as_ref(), self.anchor, &self.track_role);
        let Some(rect) = self.layout.bounding_rect(track) else {
            trace!(track = track.0, "Track has no geometry yet");
            return None;
        };
        let Some(progress) = compute_progress(rect, viewport_height) else {
            trace!(
                track = track.0,
                height = rect.height,
                viewport_height,
                "Track fits in viewport; leaving media position unchanged"
            );
            return None;
        };

        let time = apply_progress(media.as_mut(), progress)?;
        trace!(progress, time, "Scrubbed media");
        self.progress = Some(progress);
        Some(progress)
    }
}

/// Drives a media element's playback position from page scroll.
///
/// While attached, the engine is the only writer of the media position.
/// Listeners are released on [`detach`](Self::detach), on
/// [`swap_anchor`](Self::swap_anchor) and on drop.
pub struct ScrollScrubEngine {
    core: Rc<RefCell<ScrubCore>>,
    ready: Rc<Cell<bool>>,
    source: Rc<dyn ScrollSource>,
    listeners: ListenerGuard,
}

impl ScrollScrubEngine {
    pub fn attach(
        source: Rc<dyn ScrollSource>,
        layout: Rc<dyn LayoutTree>,
        media: Option<Box<dyn MediaHandle>>,
        anchor: NodeId,
        options: ScrubOptions,
    ) -> Self {
        let ready = Rc::new(Cell::new(false));
        let mut media = media;
        if let Some(media) = media.as_mut() {
            media.load();
            // Either signal may come first; they are OR'd.
            if media.can_render_frame() {
                ready.set(true);
            }
            let flag = Rc::clone(&ready);
            media.on_data_available(Box::new(move || flag.set(true)));
        }

        let core = Rc::new(RefCell::new(ScrubCore {
            media,
            layout,
            anchor,
            track_role: options.track_role,
            progress: None,
        }));
        let listeners = register_listeners(&source, &core);
        let engine = Self {
            core,
            ready,
            source,
            listeners,
        };
        debug!(
            anchor = anchor.0,
            ready = engine.is_ready(),
            "Attached scroll scrub engine"
        );
        // Consistent state before any interaction, e.g. after back-navigation
        // restored a scroll offset.
        engine.recompute();
        engine
    }

    /// Runs one scroll/resize tick by hand.
    pub fn recompute(&self) -> Option<f64> {
        let viewport = self.source.viewport();
        self.core.borrow_mut().recompute(viewport.height)
    }

    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    pub fn is_attached(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Progress most recently written to the media.
    pub fn last_progress(&self) -> Option<f64> {
        self.core.borrow().progress
    }

    /// The element whose geometry currently drives scrubbing.
    pub fn current_track(&self) -> NodeId {
        let core = self.core.borrow();
        find_track(core.layout.as_ref(), core.anchor, &core.track_role)
    }

    /// Re-targets the engine at a new reference element. Old listeners are
    /// removed before new ones are registered.
    pub fn swap_anchor(&mut self, anchor: NodeId) {
        self.listeners.release();
        self.core.borrow_mut().anchor = anchor;
        self.listeners = register_listeners(&self.source, &self.core);
        debug!(anchor = anchor.0, "Scroll scrub engine re-targeted");
        self.recompute();
    }

    pub fn detach(mut self) {
        self.listeners.release();
        debug!("Detached scroll scrub engine");
    }
}

fn register_listeners(
    source: &Rc<dyn ScrollSource>,
    core: &Rc<RefCell<ScrubCore>>,
) -> ListenerGuard {
    let mut guard = ListenerGuard::new(Rc::clone(source));
    for event in [PageEvent::Scroll, PageEvent::Resize] {
        // Weak handles: the source owns the listener, the engine owns the
        // source handle.
        let weak_core = Rc::downgrade(core);
        let weak_source = Rc::downgrade(source);
        let id = source.add_listener(
            event,
            ListenerOptions { passive: true },
            Box::new(move || {
                let (Some(core), Some(source)) = (weak_core.upgrade(), weak_source.upgrade())
                else {
                    return;
                };
                let viewport_height = source.viewport().height;
                if let Ok(mut core) = core.try_borrow_mut() {
                    core.recompute(viewport_height);
                }
            }),
        );
        guard.push(id);
    }
    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Viewport;
    use crate::host::memory::{HeadlessPage, PageNode, ScriptedMedia};
    use proptest::prelude::*;

    const TRACK: NodeId = NodeId(1);
    const FRAME: NodeId = NodeId(2);
    const LAYER: NodeId = NodeId(3);
    const VIEWPORT_HEIGHT: f64 = 800.0;
    const TRACK_HEIGHT: f64 = 2_000.0;

    /// A 2000px track containing a sticky frame containing the video layer.
    fn hero_page() -> Rc<HeadlessPage> {
        let page = Rc::new(HeadlessPage::new(Viewport {
            width: 390.0,
            height: VIEWPORT_HEIGHT,
        }));
        page.insert(
            TRACK,
            PageNode::new(None, 0.0, 390.0, TRACK_HEIGHT).with_role("hero-container"),
        );
        page.insert(FRAME, PageNode::new(Some(TRACK), 0.0, 390.0, VIEWPORT_HEIGHT));
        page.insert(LAYER, PageNode::new(Some(FRAME), 0.0, 390.0, VIEWPORT_HEIGHT));
        page
    }

    fn attach(page: &Rc<HeadlessPage>, media: &ScriptedMedia) -> ScrollScrubEngine {
        ScrollScrubEngine::attach(
            page.clone(),
            page.clone(),
            Some(Box::new(media.clone())),
            LAYER,
            ScrubOptions::default(),
        )
    }

    #[test]
    fn progress_is_scrolled_fraction_of_track_overflow() {
        let rect = Rect::new(-600.0, 0.0, 390.0, 2_000.0);
        assert_eq!(compute_progress(rect, 800.0), Some(0.5));
        assert_eq!(
            compute_progress(Rect::new(100.0, 0.0, 390.0, 2_000.0), 800.0),
            Some(0.0)
        );
        assert_eq!(
            compute_progress(Rect::new(-5_000.0, 0.0, 390.0, 2_000.0), 800.0),
            Some(1.0)
        );
    }

    #[test]
    fn short_track_yields_no_progress() {
        assert_eq!(
            compute_progress(Rect::new(0.0, 0.0, 390.0, 800.0), 800.0),
            None
        );
        assert_eq!(
            compute_progress(Rect::new(-50.0, 0.0, 390.0, 300.0), 800.0),
            None
        );
        assert_eq!(
            compute_progress(Rect::new(f64::NAN, 0.0, 390.0, 2_000.0), 800.0),
            None
        );
    }

    #[test]
    fn apply_progress_requires_known_positive_duration() {
        for duration in [f64::NAN, f64::INFINITY, 0.0, -3.0] {
            let media = ScriptedMedia::with_duration(duration);
            let mut handle = media.clone();
            assert_eq!(apply_progress(&mut handle, 0.5), None);
            assert_eq!(media.seek_count(), 0, "duration {duration} must not seek");
        }

        let media = ScriptedMedia::new();
        let mut handle = media.clone();
        assert_eq!(apply_progress(&mut handle, 0.5), None);

        let media = ScriptedMedia::with_duration(12.0);
        let mut handle = media.clone();
        assert_eq!(apply_progress(&mut handle, 0.25), Some(3.0));
        assert_eq!(media.current_time(), 3.0);
    }

    #[test]
    fn track_is_nearest_ancestor_with_role() {
        let page = hero_page();
        assert_eq!(find_track(page.as_ref(), LAYER, "hero-container"), TRACK);
        assert_eq!(find_track(page.as_ref(), TRACK, "hero-container"), TRACK);
        assert_eq!(find_track(page.as_ref(), LAYER, "missing-role"), LAYER);
    }

    #[test]
    fn attach_registers_passive_listeners_and_syncs_immediately() {
        let page = hero_page();
        page.set_scroll_y(600.0);
        let media = ScriptedMedia::with_duration(10.0);

        let engine = attach(&page, &media);

        assert_eq!(page.listener_count(), 2);
        assert_eq!(page.passive_listener_count(), 2);
        assert_eq!(media.load_count(), 1);
        assert_eq!(engine.last_progress(), Some(0.5));
        assert!((media.current_time() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn scrolling_drives_media_time() {
        let page = hero_page();
        let media = ScriptedMedia::with_duration(8.0);
        let engine = attach(&page, &media);

        page.scroll_to(300.0);
        assert!((media.current_time() - 2.0).abs() < 1e-9);

        page.scroll_to(1_200.0);
        assert!((media.current_time() - 8.0).abs() < 1e-9);

        page.scroll_to(5_000.0);
        assert_eq!(engine.last_progress(), Some(1.0));
        assert!((media.current_time() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_duration_is_a_silent_no_op_until_metadata_loads() {
        let page = hero_page();
        let media = ScriptedMedia::new();
        let engine = attach(&page, &media);

        page.scroll_to(600.0);
        assert_eq!(media.seek_count(), 0);
        assert_eq!(engine.last_progress(), None);

        media.set_duration(4.0);
        page.scroll_to(600.0);
        assert!((media.current_time() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn resize_that_swallows_the_track_keeps_position() {
        let page = hero_page();
        let media = ScriptedMedia::with_duration(10.0);
        let engine = attach(&page, &media);

        page.scroll_to(600.0);
        let seeks = media.seek_count();

        page.resize(Viewport {
            width: 390.0,
            height: 2_400.0,
        });
        assert_eq!(media.seek_count(), seeks);
        assert_eq!(engine.last_progress(), Some(0.5));
    }

    #[test]
    fn missing_media_is_tolerated() {
        let page = hero_page();
        let engine = ScrollScrubEngine::attach(
            page.clone(),
            page.clone(),
            None,
            LAYER,
            ScrubOptions::default(),
        );
        page.scroll_to(400.0);
        assert_eq!(engine.last_progress(), None);
        assert!(!engine.is_ready());
    }

    #[test]
    fn readiness_from_cached_media_is_immediate() {
        let page = hero_page();
        let media = ScriptedMedia::with_duration(10.0);
        media.prebuffer();
        let engine = attach(&page, &media);
        assert!(engine.is_ready());
    }

    #[test]
    fn readiness_flips_when_data_arrives() {
        let page = hero_page();
        let media = ScriptedMedia::with_duration(10.0);
        let engine = attach(&page, &media);
        assert!(!engine.is_ready());

        media.deliver_data();
        assert!(engine.is_ready());
    }

    #[test]
    fn detach_removes_listeners_and_stops_seeking() {
        let page = hero_page();
        let media = ScriptedMedia::with_duration(10.0);
        let engine = attach(&page, &media);
        assert!(engine.is_attached());

        engine.detach();
        assert_eq!(page.listener_count(), 0);

        let seeks = media.seek_count();
        page.scroll_to(900.0);
        assert_eq!(media.seek_count(), seeks);
    }

    #[test]
    fn dropping_the_engine_releases_listeners() {
        let page = hero_page();
        let media = ScriptedMedia::with_duration(10.0);
        {
            let _engine = attach(&page, &media);
            assert_eq!(page.listener_count(), 2);
        }
        assert_eq!(page.listener_count(), 0);
    }

    #[test]
    fn swap_anchor_keeps_a_single_listener_set() {
        let page = hero_page();
        let second_track = NodeId(10);
        let second_layer = NodeId(11);
        page.insert(
            second_track,
            PageNode::new(None, 2_000.0, 390.0, 4_800.0).with_role("hero-container"),
        );
        page.insert(
            second_layer,
            PageNode::new(Some(second_track), 2_000.0, 390.0, VIEWPORT_HEIGHT),
        );
        let media = ScriptedMedia::with_duration(10.0);
        let mut engine = attach(&page, &media);

        engine.swap_anchor(second_layer);
        assert_eq!(page.listener_count(), 2);
        assert_eq!(engine.current_track(), second_track);

        // 2000px into a 4800px track with 800px viewport: half way.
        page.scroll_to(4_000.0);
        assert_eq!(engine.last_progress(), Some(0.5));
    }

    #[test]
    fn reparenting_is_picked_up_on_next_tick() {
        let page = hero_page();
        let media = ScriptedMedia::with_duration(10.0);
        let engine = attach(&page, &media);
        assert_eq!(engine.current_track(), TRACK);

        page.reparent(FRAME, None);
        assert_eq!(engine.current_track(), LAYER);

        // The layer alone is viewport-sized: scrubbing pauses.
        let seeks = media.seek_count();
        page.scroll_to(700.0);
        assert_eq!(media.seek_count(), seeks);

        page.reparent(FRAME, Some(TRACK));
        page.scroll_to(600.0);
        assert_eq!(engine.last_progress(), Some(0.5));
    }

    proptest! {
        #[test]
        fn progress_is_bounded_and_monotonic(
            viewport in 1.0f64..2_000.0,
            extra in 1.0f64..10_000.0,
            mut offsets in proptest::collection::vec(-5_000.0f64..20_000.0, 2..32),
        ) {
            let height = viewport + extra;
            offsets.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let mut previous = 0.0f64;
            for scroll in offsets {
                let rect = Rect::new(-scroll, 0.0, 390.0, height);
                let progress = compute_progress(rect, viewport).expect("track overflows viewport");
                prop_assert!((0.0..=1.0).contains(&progress));
                prop_assert!(progress >= previous);
                previous = progress;
            }
        }

        #[test]
        fn short_tracks_never_move_the_media(
            viewport in 1.0f64..2_000.0,
            shrink in 0.0f64..1.0,
            scroll in -5_000.0f64..5_000.0,
        ) {
            let page = Rc::new(HeadlessPage::new(Viewport { width: 390.0, height: viewport }));
            page.insert(TRACK, PageNode::new(None, 0.0, 390.0, viewport * shrink).with_role("hero-container"));
            page.insert(LAYER, PageNode::new(Some(TRACK), 0.0, 390.0, viewport * shrink));
            let media = ScriptedMedia::with_duration(10.0);
            let engine = attach(&page, &media);

            page.scroll_to(scroll);
            prop_assert_eq!(engine.last_progress(), None);
            prop_assert_eq!(media.seek_count(), 0);
        }
    }
}
