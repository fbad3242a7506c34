//! Docks: the typed connection points a node carries.
//!
//! [`Sink`] (input) and [`Source`] (output) share their state through
//! [`DockCore`] and expose it through the [`Dock`] capability trait. Docks are
//! shared as `Rc<Sink>` / `Rc<Source>` between the caller and the node they are
//! added to; the back reference to the node is a plain [`NodeId`] that only the
//! node writes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use egui::{Align2, Pos2, Rect, Vec2};

use crate::draw::DrawContext;
use crate::signal::SizeSignal;
use crate::types::{DockId, DockKind, NodeId};

/// Side length of a dock's handle and hit box.
pub const DOCK_SIZE: f32 = 16.0;
/// Gap between a dock's handle and its label, and below each dock row.
pub const DOCK_SPACING: f32 = 4.0;
/// Average glyph advance used to estimate label width without a font backend.
pub const LABEL_CHAR_WIDTH: f32 = 7.0;

/// State shared by every dock variant.
pub struct DockCore {
    id: DockId,
    label: RefCell<String>,
    type_name: String,
    min_size: Cell<Vec2>,
    node: Cell<Option<NodeId>>,
    size_changed: SizeSignal,
}

impl DockCore {
    pub fn new(label: &str, type_name: &str) -> Self {
        Self {
            id: DockId::new(),
            label: RefCell::new(label.to_string()),
            type_name: type_name.to_string(),
            min_size: Cell::new(estimate_size(label)),
            node: Cell::new(None),
            size_changed: SizeSignal::new(),
        }
    }

    pub(crate) fn bind(&self, node: Option<NodeId>) {
        self.node.set(node);
    }

    fn set_min_size(&self, size: Vec2) {
        // Never smaller than the handle, or stacked hit boxes would overlap.
        let size = size.max(Vec2::splat(DOCK_SIZE));
        if self.min_size.get() != size {
            self.min_size.set(size);
            self.size_changed.emit();
        }
    }
}

impl std::fmt::Debug for DockCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockCore")
            .field("id", &self.id)
            .field("label", &self.label.borrow())
            .field("type_name", &self.type_name)
            .field("min_size", &self.min_size.get())
            .field("node", &self.node.get())
            .finish()
    }
}

/// Minimum size for a dock showing `label` next to its handle.
pub fn estimate_size(label: &str) -> Vec2 {
    let chars = label.chars().count() as f32;
    let label_w = if chars > 0.0 {
        DOCK_SPACING + chars * LABEL_CHAR_WIDTH
    } else {
        0.0
    };
    Vec2::new(DOCK_SIZE + label_w, DOCK_SIZE + DOCK_SPACING)
}

/// Capability shared by sinks and sources.
pub trait Dock {
    fn core(&self) -> &DockCore;

    fn kind(&self) -> DockKind;

    fn id(&self) -> DockId {
        self.core().id
    }

    fn label(&self) -> String {
        self.core().label.borrow().clone()
    }

    fn type_name(&self) -> &str {
        &self.core().type_name
    }

    fn min_size(&self) -> Vec2 {
        self.core().min_size.get()
    }

    fn min_width(&self) -> f32 {
        self.min_size().x
    }

    fn min_height(&self) -> f32 {
        self.min_size().y
    }

    /// The node this dock is currently bound to.
    fn node(&self) -> Option<NodeId> {
        self.core().node.get()
    }

    fn size_changed(&self) -> &SizeSignal {
        &self.core().size_changed
    }

    /// Replace the label and re-estimate the minimum size.
    fn set_label(&self, label: &str) {
        *self.core().label.borrow_mut() = label.to_string();
        self.core().set_min_size(estimate_size(label));
    }

    /// Override the minimum size, raised to at least [`DOCK_SIZE`] on each
    /// axis. Notifies observers only if it changed.
    fn set_min_size(&self, size: Vec2) {
        self.core().set_min_size(size);
    }

    /// Draw as an input: handle at `origin`, label to its right.
    fn draw_as_sink(&self, ctx: &mut dyn DrawContext, origin: Pos2) {
        let handle = Rect::from_min_size(origin, Vec2::splat(DOCK_SIZE));
        ctx.render_port(handle, self.id(), DockKind::Sink, self.type_name());
        ctx.render_label(
            Pos2::new(handle.right() + DOCK_SPACING, handle.center().y),
            Align2::LEFT_CENTER,
            &self.label(),
        );
    }

    /// Draw as an output: handle right-aligned within `available_width`
    /// starting at `origin`, label to its left.
    fn draw_as_source(&self, ctx: &mut dyn DrawContext, origin: Pos2, available_width: f32) {
        let handle = Rect::from_min_size(
            Pos2::new(origin.x + available_width - DOCK_SIZE, origin.y),
            Vec2::splat(DOCK_SIZE),
        );
        ctx.render_port(handle, self.id(), DockKind::Source, self.type_name());
        ctx.render_label(
            Pos2::new(handle.left() - DOCK_SPACING, handle.center().y),
            Align2::RIGHT_CENTER,
            &self.label(),
        );
    }
}

/// An input dock.
#[derive(Debug)]
pub struct Sink {
    core: DockCore,
}

impl Sink {
    pub fn new(label: &str, type_name: &str) -> Self {
        Self {
            core: DockCore::new(label, type_name),
        }
    }
}

impl Dock for Sink {
    fn core(&self) -> &DockCore {
        &self.core
    }

    fn kind(&self) -> DockKind {
        DockKind::Sink
    }
}

/// An output dock.
#[derive(Debug)]
pub struct Source {
    core: DockCore,
}

impl Source {
    pub fn new(label: &str, type_name: &str) -> Self {
        Self {
            core: DockCore::new(label, type_name),
        }
    }
}

impl Dock for Source {
    fn core(&self) -> &DockCore {
        &self.core
    }

    fn kind(&self) -> DockKind {
        DockKind::Source
    }
}

/// A shared handle to either dock variant, as returned by hit-testing.
#[derive(Clone, Debug)]
pub enum DockRef {
    Sink(Rc<Sink>),
    Source(Rc<Source>),
}

impl DockRef {
    pub fn as_dock(&self) -> &dyn Dock {
        match self {
            DockRef::Sink(sink) => &**sink,
            DockRef::Source(source) => &**source,
        }
    }

    pub fn id(&self) -> DockId {
        self.as_dock().id()
    }

    pub fn kind(&self) -> DockKind {
        self.as_dock().kind()
    }
}

impl PartialEq for DockRef {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.id() == other.id()
    }
}

impl Eq for DockRef {}
