//! The node: a box of sinks and sources with optional embedded content.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use egui::{Pos2, Rect, Vec2};

use crate::config::LayoutConfig;
use crate::content::NodeContent;
use crate::dock::{Dock, DockRef, Sink, Source};
use crate::draw::DrawContext;
use crate::error::{FlowError, Result};
use crate::layout::NodeState;
use crate::signal::SubscriptionId;
use crate::types::{DockId, DockKind, NodeId, ViewId};

/// A draggable box owning ordered lists of sinks and sources.
///
/// Every mutation grows the allocation to the new minimum size before it
/// returns, so a following draw or hit-test always sees consistent geometry.
pub struct Node {
    id: NodeId,
    state: Rc<RefCell<NodeState>>,
    subscriptions: HashMap<DockId, SubscriptionId>,
    content: Option<Box<dyn NodeContent>>,
    owning_view: Option<ViewId>,
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        let node = Self {
            id: NodeId::new(),
            state: Rc::new(RefCell::new(NodeState::new(LayoutConfig {
                border_width: config.border_width.max(0.0),
                ..config
            }))),
            subscriptions: HashMap::new(),
            content: None,
            owning_view: None,
        };
        node.recalculate_size();
        node
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    // -----------------------------------------------------------------------
    // Port registry
    // -----------------------------------------------------------------------

    pub fn add_sink(&mut self, sink: &Rc<Sink>) -> Result<()> {
        if self.has_sink(sink) {
            return Err(self.already_has(&**sink));
        }
        self.check_unbound(&**sink)?;
        self.state.borrow_mut().sinks.push(sink.clone());
        self.attach(&**sink);
        Ok(())
    }

    pub fn add_source(&mut self, source: &Rc<Source>) -> Result<()> {
        if self.has_source(source) {
            return Err(self.already_has(&**source));
        }
        self.check_unbound(&**source)?;
        self.state.borrow_mut().sources.push(source.clone());
        self.attach(&**source);
        Ok(())
    }

    pub fn remove_sink(&mut self, sink: &Sink) -> Result<()> {
        {
            let mut state = self.state.borrow_mut();
            let index = state
                .sinks
                .iter()
                .position(|s| s.id() == sink.id())
                .ok_or_else(|| self.no_such_dock(sink))?;
            state.sinks.remove(index);
        }
        self.detach(sink);
        Ok(())
    }

    pub fn remove_source(&mut self, source: &Source) -> Result<()> {
        {
            let mut state = self.state.borrow_mut();
            let index = state
                .sources
                .iter()
                .position(|s| s.id() == source.id())
                .ok_or_else(|| self.no_such_dock(source))?;
            state.sources.remove(index);
        }
        self.detach(source);
        Ok(())
    }

    pub fn has_sink(&self, sink: &Sink) -> bool {
        self.state.borrow().sinks.iter().any(|s| s.id() == sink.id())
    }

    pub fn has_source(&self, source: &Source) -> bool {
        self.state.borrow().sources.iter().any(|s| s.id() == source.id())
    }

    pub fn has_dock(&self, dock: &dyn Dock) -> bool {
        let state = self.state.borrow();
        match dock.kind() {
            DockKind::Sink => state.sinks.iter().any(|s| s.id() == dock.id()),
            DockKind::Source => state.sources.iter().any(|s| s.id() == dock.id()),
        }
    }

    pub fn sinks(&self) -> Vec<Rc<Sink>> {
        self.state.borrow().sinks.clone()
    }

    pub fn sources(&self) -> Vec<Rc<Source>> {
        self.state.borrow().sources.clone()
    }

    /// Look up a dock of this node by id.
    pub fn dock(&self, id: DockId) -> Option<DockRef> {
        let state = self.state.borrow();
        if let Some(sink) = state.sinks.iter().find(|s| s.id() == id) {
            return Some(DockRef::Sink(sink.clone()));
        }
        state
            .sources
            .iter()
            .find(|s| s.id() == id)
            .map(|source| DockRef::Source(source.clone()))
    }

    fn check_unbound(&self, dock: &dyn Dock) -> Result<()> {
        match dock.node() {
            Some(bound_to) => Err(FlowError::DockAlreadyBoundToNode {
                dock: dock.id(),
                bound_to,
            }),
            None => Ok(()),
        }
    }

    fn already_has(&self, dock: &dyn Dock) -> FlowError {
        FlowError::AlreadyHasDock {
            node: self.id,
            dock: dock.id(),
            kind: dock.kind(),
        }
    }

    fn no_such_dock(&self, dock: &dyn Dock) -> FlowError {
        FlowError::NoSuchDock {
            node: self.id,
            dock: dock.id(),
            kind: dock.kind(),
        }
    }

    /// Bind a freshly listed dock, resize, and follow its size changes.
    fn attach(&mut self, dock: &dyn Dock) {
        dock.core().bind(Some(self.id));
        self.recalculate_size();

        let state: Weak<RefCell<NodeState>> = Rc::downgrade(&self.state);
        let subscription = dock.size_changed().connect(move || {
            let Some(state) = state.upgrade() else {
                return;
            };
            // A busy borrow means the node is mid-mutation and resizes itself afterwards.
            if let Ok(mut state) = state.try_borrow_mut() {
                state.recalculate_size();
            }
        });
        self.subscriptions.insert(dock.id(), subscription);
        log::debug!("Node {} gained {} {}", self.id, dock.kind(), dock.id());
    }

    fn detach(&mut self, dock: &dyn Dock) {
        dock.core().bind(None);
        self.recalculate_size();
        if let Some(subscription) = self.subscriptions.remove(&dock.id()) {
            dock.size_changed().disconnect(subscription);
        }
        log::debug!("Node {} lost {} {}", self.id, dock.kind(), dock.id());
    }

    // -----------------------------------------------------------------------
    // Size
    // -----------------------------------------------------------------------

    pub fn minimum_width(&self) -> f32 {
        self.state.borrow().minimum_width()
    }

    pub fn minimum_height(&self) -> f32 {
        self.state.borrow().minimum_height()
    }

    /// Grow the allocation to at least the minimum size. Never shrinks it.
    pub fn recalculate_size(&self) {
        self.state.borrow_mut().recalculate_size();
    }

    pub fn allocation(&self) -> Rect {
        self.state.borrow().allocation
    }

    /// Set the allocation; it is still grown to the minimum size.
    pub fn set_allocation(&mut self, rect: Rect) {
        self.state.borrow_mut().allocation = rect;
        self.recalculate_size();
    }

    pub fn set_position(&mut self, pos: Pos2) {
        let mut state = self.state.borrow_mut();
        state.allocation = Rect::from_min_size(pos, state.allocation.size());
    }

    pub fn move_by(&mut self, delta: Vec2) {
        let mut state = self.state.borrow_mut();
        state.allocation = state.allocation.translate(delta);
    }

    pub fn border_width(&self) -> f32 {
        self.state.borrow().border_width()
    }

    /// Negative widths are clamped to zero.
    pub fn set_border_width(&mut self, border_width: f32) {
        self.state.borrow_mut().config.border_width = border_width.max(0.0);
        self.recalculate_size();
    }

    pub fn layout_config(&self) -> LayoutConfig {
        self.state.borrow().config.clone()
    }

    pub fn set_layout_config(&mut self, config: LayoutConfig) {
        self.state.borrow_mut().config = LayoutConfig {
            border_width: config.border_width.max(0.0),
            ..config
        };
        self.recalculate_size();
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    /// Canvas position where connections attach to `dock`.
    pub fn dock_position(&self, dock: &dyn Dock) -> Result<Pos2> {
        let state = self.state.borrow();
        let hit_box = match dock.kind() {
            DockKind::Sink if state.sinks.iter().any(|s| s.id() == dock.id()) => {
                state.hit_box_of(dock.id())
            }
            DockKind::Source if state.sources.iter().any(|s| s.id() == dock.id()) => {
                state.hit_box_of(dock.id())
            }
            _ => None,
        };
        hit_box
            .map(|rect| rect.center())
            .ok_or_else(|| self.no_such_dock(dock))
    }

    /// The dock whose handle covers `point`, sinks checked first.
    pub fn dock_at_point(&self, point: Pos2) -> Option<DockRef> {
        self.state.borrow().dock_at_point(point)
    }

    // -----------------------------------------------------------------------
    // Embedded content
    // -----------------------------------------------------------------------

    /// Embed `content`, returning the content it replaces.
    pub fn set_content(&mut self, mut content: Box<dyn NodeContent>) -> Option<Box<dyn NodeContent>> {
        let previous = self.take_content();
        content.on_parent(self.id);
        self.state.borrow_mut().content_size = Some(content.preferred_size());
        self.content = Some(content);
        self.recalculate_size();
        log::debug!("Node {} embedded content", self.id);
        previous
    }

    pub fn take_content(&mut self) -> Option<Box<dyn NodeContent>> {
        let mut content = self.content.take()?;
        content.on_unparent();
        self.state.borrow_mut().content_size = None;
        self.recalculate_size();
        Some(content)
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// Size the content last occupied.
    pub fn content_size(&self) -> Option<Vec2> {
        self.state.borrow().content_size
    }

    // -----------------------------------------------------------------------
    // Owning view
    // -----------------------------------------------------------------------

    pub fn owning_view(&self) -> Option<ViewId> {
        self.owning_view
    }

    pub fn set_owning_view(&mut self, view: Option<ViewId>) {
        self.owning_view = view;
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn draw(&mut self, ctx: &mut dyn DrawContext) {
        let (allocation, sinks, sources, inner_width, content_rect) = {
            let state = self.state.borrow();
            let slots = state.slots();
            let sinks: Vec<_> = state
                .sinks
                .iter()
                .zip(&slots.sinks)
                .map(|(sink, &offset)| (sink.clone(), state.sink_origin(offset)))
                .collect();
            let sources: Vec<_> = state
                .sources
                .iter()
                .zip(&slots.sources)
                .map(|(source, &offset)| (source.clone(), state.source_origin(offset)))
                .collect();
            (
                state.allocation,
                sinks,
                sources,
                state.inner_width(),
                state.content_rect(),
            )
        };

        ctx.render_frame(allocation);
        for (sink, origin) in &sinks {
            sink.draw_as_sink(ctx, *origin);
        }
        for (source, origin) in &sources {
            source.draw_as_source(ctx, *origin, inner_width);
        }

        if let Some(content) = self.content.as_deref_mut() {
            let used = ctx.draw_child(content, content_rect);
            self.state.borrow_mut().content_size = Some(used.size());
            self.recalculate_size();
        }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let state = self.state.borrow();
        let docks = state
            .sinks
            .iter()
            .map(|s| &**s as &dyn Dock)
            .chain(state.sources.iter().map(|s| &**s as &dyn Dock));
        for dock in docks {
            dock.core().bind(None);
            if let Some(subscription) = self.subscriptions.get(&dock.id()) {
                dock.size_changed().disconnect(*subscription);
            }
        }
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("allocation", &state.allocation)
            .field("sinks", &state.sinks.len())
            .field("sources", &state.sources.len())
            .field("has_content", &self.content.is_some())
            .field("owning_view", &self.owning_view)
            .finish()
    }
}
