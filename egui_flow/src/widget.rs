//! egui widget showing a single [`Node`] on a canvas.

use egui::{self, Pos2, Sense};

use crate::dock::DockRef;
use crate::draw::EguiDrawContext;
use crate::node::Node;
use crate::theme::FlowTheme;
use crate::types::DockId;

/// What happened to a node during one frame.
pub struct NodeResponse {
    pub response: egui::Response,
    /// Dock under the pointer.
    pub hovered_dock: Option<DockRef>,
    /// Dock a drag started on; the canvas turns this into a connection.
    pub dragged_dock: Option<DockRef>,
}

/// Draws a node and makes it draggable. Dragging that starts on a dock is
/// reported in [`NodeResponse::dragged_dock`] instead of moving the node.
pub struct NodeWidget<'a> {
    node: &'a mut Node,
    theme: &'a FlowTheme,
    origin: Option<Pos2>,
}

impl<'a> NodeWidget<'a> {
    pub fn new(node: &'a mut Node, theme: &'a FlowTheme) -> Self {
        Self {
            node,
            theme,
            origin: None,
        }
    }

    /// Screen position of the canvas origin. Defaults to the top-left of the ui.
    pub fn origin(mut self, origin: Pos2) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> NodeResponse {
        let offset = self.origin.unwrap_or_else(|| ui.max_rect().min).to_vec2();
        let id = ui.id().with(self.node.id().as_uuid());
        let response = ui.interact(
            self.node.allocation().translate(offset),
            id,
            Sense::click_and_drag(),
        );

        let hovered_dock = response
            .hover_pos()
            .and_then(|p| self.node.dock_at_point(p - offset));

        if response.drag_started() {
            // The drag is only recognised once the pointer has left the
            // click radius, so look up the dock where the press happened.
            let grabbed: Option<DockId> = ui
                .input(|i| i.pointer.press_origin())
                .and_then(|p| self.node.dock_at_point(p - offset))
                .map(|dock| dock.id());
            ui.memory_mut(|m| m.data.insert_temp(id, grabbed));
        }
        let grabbed = ui
            .memory_mut(|m| m.data.get_temp::<Option<DockId>>(id))
            .flatten();

        let mut dragged_dock = None;
        if response.dragged() {
            match grabbed {
                Some(dock_id) => dragged_dock = self.node.dock(dock_id),
                None => self.node.move_by(response.drag_delta()),
            }
        }
        if response.drag_stopped() {
            ui.memory_mut(|m| m.data.remove::<Option<DockId>>(id));
        }

        let visuals = *ui.style().interact(&response);
        let hovered_id = hovered_dock.as_ref().map(|dock| dock.id());
        let mut ctx = EguiDrawContext::new(ui, self.theme, offset)
            .with_visuals(visuals)
            .with_hovered(hovered_id);
        self.node.draw(&mut ctx);

        NodeResponse {
            response,
            hovered_dock,
            dragged_dock,
        }
    }
}
