//! In-memory page and media used for headless previews and tests.
//!
//! `HeadlessPage` keeps document-space geometry for a handful of nodes and
//! derives viewport-relative rects from its scroll offset, the way a browser
//! would. Events are dispatched synchronously from `scroll_to`/`resize`.

use super::{
    IntersectionCallback, IntersectionEntry, LayoutTree, Listener, ListenerId, ListenerOptions,
    MediaHandle, NodeId, ObservationId, ObserverOptions, PageEvent, Rect, ScrollSource, Viewport,
    ViewportObserver,
};
use crate::visibility::is_intersecting;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Document-space geometry of one element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageNode {
    pub parent: Option<NodeId>,
    pub roles: Vec<String>,
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl PageNode {
    pub fn new(parent: Option<NodeId>, top: f64, width: f64, height: f64) -> Self {
        Self {
            parent,
            roles: Vec::new(),
            top,
            left: 0.0,
            width,
            height,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }
}

struct Registration {
    id: ListenerId,
    event: PageEvent,
    options: ListenerOptions,
    listener: Option<Listener>,
}

struct Observation {
    id: ObservationId,
    target: NodeId,
    options: ObserverOptions,
    last: Option<bool>,
    callback: Option<IntersectionCallback>,
}

pub struct HeadlessPage {
    viewport: Cell<Viewport>,
    scroll_y: Cell<f64>,
    nodes: RefCell<BTreeMap<NodeId, PageNode>>,
    listeners: RefCell<Vec<Registration>>,
    observations: RefCell<Vec<Observation>>,
    next_id: Cell<u64>,
}

impl HeadlessPage {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport: Cell::new(viewport),
            scroll_y: Cell::new(0.0),
            nodes: RefCell::new(BTreeMap::new()),
            listeners: RefCell::new(Vec::new()),
            observations: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    pub fn insert(&self, id: NodeId, node: PageNode) {
        self.nodes.borrow_mut().insert(id, node);
    }

    pub fn reparent(&self, id: NodeId, parent: Option<NodeId>) {
        if let Some(node) = self.nodes.borrow_mut().get_mut(&id) {
            node.parent = parent;
        }
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    /// Sets the scroll offset without notifying anyone, like a restored
    /// position on back-navigation before any script runs.
    pub fn set_scroll_y(&self, y: f64) {
        self.scroll_y.set(y);
    }

    pub fn scroll_to(&self, y: f64) {
        self.scroll_y.set(y);
        self.dispatch(PageEvent::Scroll);
    }

    pub fn resize(&self, viewport: Viewport) {
        self.viewport.set(viewport);
        self.dispatch(PageEvent::Resize);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn passive_listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|reg| reg.options.passive)
            .count()
    }

    pub fn observation_count(&self) -> usize {
        self.observations.borrow().len()
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn dispatch(&self, event: PageEvent) {
        let ids: Vec<ListenerId> = self
            .listeners
            .borrow()
            .iter()
            .filter(|reg| reg.event == event)
            .map(|reg| reg.id)
            .collect();

        for id in ids {
            // Take the listener out so it can call back into the page.
            let listener = self
                .listeners
                .borrow_mut()
                .iter_mut()
                .find(|reg| reg.id == id)
                .and_then(|reg| reg.listener.take());
            let Some(mut listener) = listener else {
                continue;
            };
            listener();
            if let Some(reg) = self
                .listeners
                .borrow_mut()
                .iter_mut()
                .find(|reg| reg.id == id)
            {
                reg.listener = Some(listener);
            }
        }

        self.notify_observers();
    }

    /// Delivers an entry to every observation whose intersection state changed
    /// (or that has not been told anything yet).
    pub fn notify_observers(&self) {
        let ids: Vec<ObservationId> = self.observations.borrow().iter().map(|o| o.id).collect();
        let viewport = self.viewport.get();

        for id in ids {
            let pending = {
                let mut observations = self.observations.borrow_mut();
                let Some(obs) = observations.iter_mut().find(|o| o.id == id) else {
                    continue;
                };
                let Some(rect) = self.bounding_rect(obs.target) else {
                    continue;
                };
                let now = is_intersecting(rect, viewport, &obs.options);
                if obs.last == Some(now) {
                    continue;
                }
                obs.last = Some(now);
                obs.callback.take().map(|cb| (cb, obs.target, now))
            };
            let Some((mut callback, target, now)) = pending else {
                continue;
            };
            callback(IntersectionEntry {
                target,
                is_intersecting: now,
            });
            if let Some(obs) = self
                .observations
                .borrow_mut()
                .iter_mut()
                .find(|o| o.id == id)
            {
                obs.callback = Some(callback);
            }
        }
    }
}

impl ScrollSource for HeadlessPage {
    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    fn add_listener(
        &self,
        event: PageEvent,
        options: ListenerOptions,
        listener: Listener,
    ) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.borrow_mut().push(Registration {
            id,
            event,
            options,
            listener: Some(listener),
        });
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|reg| reg.id != id);
    }
}

impl LayoutTree for HeadlessPage {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow().get(&node).and_then(|n| n.parent)
    }

    fn has_role(&self, node: NodeId, role: &str) -> bool {
        self.nodes
            .borrow()
            .get(&node)
            .is_some_and(|n| n.roles.iter().any(|r| r == role))
    }

    fn bounding_rect(&self, node: NodeId) -> Option<Rect> {
        let nodes = self.nodes.borrow();
        let node = nodes.get(&node)?;
        Some(Rect::new(
            node.top - self.scroll_y.get(),
            node.left,
            node.width,
            node.height,
        ))
    }
}

impl ViewportObserver for HeadlessPage {
    fn observe(
        &self,
        target: NodeId,
        options: ObserverOptions,
        callback: IntersectionCallback,
    ) -> ObservationId {
        let id = ObservationId(self.next_id());
        self.observations.borrow_mut().push(Observation {
            id,
            target,
            options,
            last: None,
            callback: Some(callback),
        });
        id
    }

    fn disconnect(&self, id: ObservationId) {
        self.observations.borrow_mut().retain(|o| o.id != id);
    }
}

#[derive(Default)]
struct MediaState {
    duration: Option<f64>,
    current_time: f64,
    seek_count: usize,
    load_count: usize,
    buffered: bool,
    pending: Vec<Box<dyn FnOnce()>>,
}

/// Media handle whose metadata and buffering are driven by the caller.
/// Clones share state, so a test can keep one and hand the other out.
#[derive(Clone, Default)]
pub struct ScriptedMedia {
    state: Rc<RefCell<MediaState>>,
}

impl ScriptedMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(seconds: f64) -> Self {
        let media = Self::default();
        media.set_duration(seconds);
        media
    }

    pub fn set_duration(&self, seconds: f64) {
        self.state.borrow_mut().duration = Some(seconds);
    }

    /// Marks frame data as available before anyone asks, as when the file is
    /// already in the browser cache.
    pub fn prebuffer(&self) {
        self.state.borrow_mut().buffered = true;
    }

    /// Marks frame data as available and fires pending notifications.
    pub fn deliver_data(&self) {
        let pending = {
            let mut state = self.state.borrow_mut();
            state.buffered = true;
            std::mem::take(&mut state.pending)
        };
        for callback in pending {
            callback();
        }
    }

    pub fn current_time(&self) -> f64 {
        self.state.borrow().current_time
    }

    pub fn seek_count(&self) -> usize {
        self.state.borrow().seek_count
    }

    pub fn load_count(&self) -> usize {
        self.state.borrow().load_count
    }
}

impl MediaHandle for ScriptedMedia {
    fn load(&mut self) {
        self.state.borrow_mut().load_count += 1;
    }

    fn can_render_frame(&self) -> bool {
        self.state.borrow().buffered
    }

    fn on_data_available(&mut self, callback: Box<dyn FnOnce()>) {
        self.state.borrow_mut().pending.push(callback);
    }

    fn duration(&self) -> f64 {
        self.state.borrow().duration.unwrap_or(f64::NAN)
    }

    fn set_current_time(&mut self, seconds: f64) {
        let mut state = self.state.borrow_mut();
        state.current_time = seconds;
        state.seek_count += 1;
    }
}
