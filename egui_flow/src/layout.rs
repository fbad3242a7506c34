//! Geometry of a single node: minimum size, dock slots and hit boxes.
//!
//! Drawing, [`dock_position`](crate::Node::dock_position) and
//! [`dock_at_point`](crate::Node::dock_at_point) all read their coordinates
//! from [`NodeState::slots`], so what is painted is what can be clicked.

use std::rc::Rc;

use egui::{Pos2, Rect, Vec2};

use crate::config::{ContentHeight, LayoutConfig, RowLayout};
use crate::dock::{DOCK_SIZE, Dock, DockRef, Sink, Source};
use crate::types::DockId;

/// Mutable layout state of a node, shared with dock size observers.
pub(crate) struct NodeState {
    pub sinks: Vec<Rc<Sink>>,
    pub sources: Vec<Rc<Source>>,
    pub allocation: Rect,
    pub config: LayoutConfig,
    /// Size the embedded content last occupied; `None` without content.
    pub content_size: Option<Vec2>,
}

/// Vertical offsets of every dock relative to the inner top edge.
pub(crate) struct Slots {
    pub sinks: Vec<f32>,
    pub sources: Vec<f32>,
    /// Offset just below the lowest dock row.
    pub end: f32,
}

impl NodeState {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            sinks: Vec::new(),
            sources: Vec::new(),
            allocation: Rect::from_min_size(Pos2::ZERO, Vec2::ZERO),
            config,
            content_size: None,
        }
    }

    pub fn border_width(&self) -> f32 {
        self.config.border_width
    }

    pub fn slots(&self) -> Slots {
        let mut offset = 0.0;
        let sinks = self
            .sinks
            .iter()
            .map(|sink| {
                let top = offset;
                offset += sink.min_height();
                top
            })
            .collect();
        let sinks_end = offset;

        if self.config.row_layout == RowLayout::Columns {
            offset = 0.0;
        }
        let sources = self
            .sources
            .iter()
            .map(|source| {
                let top = offset;
                offset += source.min_height();
                top
            })
            .collect();

        Slots {
            sinks,
            sources,
            end: offset.max(sinks_end),
        }
    }

    pub fn minimum_height(&self) -> f32 {
        let content_h = self.content_size.map_or(0.0, |size| size.y);
        2.0 * self.border_width() + self.slots().end + content_h
    }

    pub fn minimum_width(&self) -> f32 {
        let widest_sink = self.sinks.iter().map(|d| d.min_width()).fold(0.0, f32::max);
        let widest_source = self.sources.iter().map(|d| d.min_width()).fold(0.0, f32::max);
        let docks_w = match self.config.row_layout {
            RowLayout::Continuous => widest_sink.max(widest_source),
            RowLayout::Columns => widest_sink + widest_source,
        };
        let content_w = self.content_size.map_or(0.0, |size| size.x);
        docks_w.max(content_w) + 2.0 * self.border_width()
    }

    /// Grow the allocation to the minimum size. Returns whether it changed.
    pub fn recalculate_size(&mut self) -> bool {
        let min_w = self.minimum_width();
        let min_h = self.minimum_height();
        let mut size = self.allocation.size();
        if size.x < min_w {
            size.x = min_w;
        }
        if size.y < min_h {
            size.y = min_h;
        }
        if size == self.allocation.size() {
            return false;
        }
        log::debug!(
            "Node allocation grows from {:?} to {:?}",
            self.allocation.size(),
            size
        );
        self.allocation = Rect::from_min_size(self.allocation.min, size);
        true
    }

    /// Top-left corner of the slot at `offset` in the sink column.
    pub fn sink_origin(&self, offset: f32) -> Pos2 {
        let b = self.border_width();
        Pos2::new(self.allocation.left() + b, self.allocation.top() + b + offset)
    }

    /// Origin handed to a source's `draw_as_source`. It is the left inset,
    /// same as a sink's; the source right-aligns its handle within
    /// [`inner_width`](Self::inner_width), landing on
    /// [`source_hit_box`](Self::source_hit_box).
    pub fn source_origin(&self, offset: f32) -> Pos2 {
        self.sink_origin(offset)
    }

    pub fn inner_width(&self) -> f32 {
        (self.allocation.width() - 2.0 * self.border_width()).max(0.0)
    }

    pub fn sink_hit_box(&self, offset: f32) -> Rect {
        Rect::from_min_size(self.sink_origin(offset), Vec2::splat(DOCK_SIZE))
    }

    pub fn source_hit_box(&self, offset: f32) -> Rect {
        let b = self.border_width();
        let min = Pos2::new(
            self.allocation.right() - b - DOCK_SIZE,
            self.allocation.top() + b + offset,
        );
        Rect::from_min_size(min, Vec2::splat(DOCK_SIZE))
    }

    /// Hit box of the dock with `id`, sinks searched first.
    pub fn hit_box_of(&self, id: DockId) -> Option<Rect> {
        let slots = self.slots();
        if let Some(i) = self.sinks.iter().position(|d| d.id() == id) {
            return Some(self.sink_hit_box(slots.sinks[i]));
        }
        self.sources
            .iter()
            .position(|d| d.id() == id)
            .map(|i| self.source_hit_box(slots.sources[i]))
    }

    pub fn dock_at_point(&self, point: Pos2) -> Option<DockRef> {
        let slots = self.slots();
        for (sink, &offset) in self.sinks.iter().zip(&slots.sinks) {
            if self.sink_hit_box(offset).contains(point) {
                return Some(DockRef::Sink(sink.clone()));
            }
        }
        for (source, &offset) in self.sources.iter().zip(&slots.sources) {
            if self.source_hit_box(offset).contains(point) {
                return Some(DockRef::Source(source.clone()));
            }
        }
        None
    }

    /// Rectangle handed to the embedded content below the dock rows.
    pub fn content_rect(&self) -> Rect {
        let b = self.border_width();
        let min = self.sink_origin(self.slots().end);
        let height = match self.config.content_height {
            // `max` also maps NaN to zero.
            ContentHeight::Fixed(h) => h.max(0.0),
            ContentHeight::Remaining => (self.allocation.bottom() - b - min.y).max(0.0),
        };
        Rect::from_min_size(min, Vec2::new(self.inner_width(), height))
    }
}
