//! Capabilities the landing core needs from whatever is rendering the page.
//!
//! Everything here is single-threaded: callbacks are invoked from the host's
//! event loop and may call back into the host (for example to read the
//! viewport height), so implementations must not hold interior borrows while
//! dispatching.

pub mod memory;

use crate::visibility::RootMargin;
use std::rc::Rc;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Viewport-relative box, as reported by `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageEvent {
    Scroll,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    pub passive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

pub type Listener = Box<dyn FnMut()>;

/// Page-level scroll and resize notifications.
pub trait ScrollSource {
    fn viewport(&self) -> Viewport;
    fn add_listener(&self, event: PageEvent, options: ListenerOptions, listener: Listener)
    -> ListenerId;
    fn remove_listener(&self, id: ListenerId);
}

/// Read-only view of the element tree and its current geometry.
pub trait LayoutTree {
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn has_role(&self, node: NodeId, role: &str) -> bool;
    /// `None` while the element has not been laid out.
    fn bounding_rect(&self, node: NodeId) -> Option<Rect>;
}

/// A video element, reduced to what scrubbing needs.
pub trait MediaHandle {
    fn load(&mut self);
    /// True once enough data is buffered to paint the current frame.
    fn can_render_frame(&self) -> bool;
    /// Registers a one-shot notification for when frame data arrives.
    fn on_data_available(&mut self, callback: Box<dyn FnOnce()>);
    /// Seconds; NaN or infinite until metadata has loaded.
    fn duration(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    pub root_margin: RootMargin,
    pub threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationId(pub u64);

pub type IntersectionCallback = Box<dyn FnMut(IntersectionEntry)>;

/// Viewport intersection notifications for a single target.
pub trait ViewportObserver {
    fn observe(
        &self,
        target: NodeId,
        options: ObserverOptions,
        callback: IntersectionCallback,
    ) -> ObservationId;
    fn disconnect(&self, id: ObservationId);
}

/// Owns listener registrations and removes them when released or dropped, so
/// no exit path can leak a listener into the next page or track.
pub struct ListenerGuard {
    source: Rc<dyn ScrollSource>,
    ids: Vec<ListenerId>,
}

impl ListenerGuard {
    pub fn new(source: Rc<dyn ScrollSource>) -> Self {
        Self {
            source,
            ids: Vec::new(),
        }
    }

    pub fn push(&mut self, id: ListenerId) {
        self.ids.push(id);
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn release(&mut self) {
        for id in self.ids.drain(..) {
            trace!(listener = id.0, "Removing page listener");
            self.source.remove_listener(id);
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}
