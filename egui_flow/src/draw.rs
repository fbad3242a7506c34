//! Drawing primitives a node needs from its host.

use egui::style::WidgetVisuals;
use egui::{Align2, FontId, Pos2, Rect, Stroke, StrokeKind, UiBuilder, Vec2};

use crate::content::NodeContent;
use crate::theme::FlowTheme;
use crate::types::{DockId, DockKind};

/// Immediate-mode drawing surface. All coordinates are canvas coordinates.
pub trait DrawContext {
    /// Background and frame of a node, styled like an interactive control.
    fn render_frame(&mut self, rect: Rect);

    /// Handle of a dock inside its hit box.
    fn render_port(&mut self, rect: Rect, dock: DockId, kind: DockKind, type_name: &str);

    fn render_label(&mut self, anchor: Pos2, align: Align2, text: &str);

    /// Let `content` paint itself inside `rect`. Returns the rectangle it used.
    fn draw_child(&mut self, content: &mut dyn NodeContent, rect: Rect) -> Rect;
}

/// [`DrawContext`] painting into an [`egui::Ui`].
pub struct EguiDrawContext<'a> {
    ui: &'a mut egui::Ui,
    theme: &'a FlowTheme,
    /// Canvas origin in screen space.
    offset: Vec2,
    visuals: WidgetVisuals,
    hovered: Option<DockId>,
}

impl<'a> EguiDrawContext<'a> {
    pub fn new(ui: &'a mut egui::Ui, theme: &'a FlowTheme, offset: Vec2) -> Self {
        let visuals = ui.style().visuals.widgets.inactive;
        Self {
            ui,
            theme,
            offset,
            visuals,
            hovered: None,
        }
    }

    /// Use the visuals egui picked for the node's interaction state.
    pub fn with_visuals(mut self, visuals: WidgetVisuals) -> Self {
        self.visuals = visuals;
        self
    }

    pub fn with_hovered(mut self, hovered: Option<DockId>) -> Self {
        self.hovered = hovered;
        self
    }
}

impl DrawContext for EguiDrawContext<'_> {
    fn render_frame(&mut self, rect: Rect) {
        self.ui.painter().rect(
            rect.translate(self.offset),
            self.visuals.corner_radius,
            self.visuals.bg_fill,
            self.visuals.bg_stroke,
            StrokeKind::Inside,
        );
    }

    fn render_port(&mut self, rect: Rect, dock: DockId, _kind: DockKind, type_name: &str) {
        let color = if self.hovered == Some(dock) {
            self.theme.dock_hover_color
        } else {
            (self.theme.dock_color)(type_name)
        };
        let center = rect.translate(self.offset).center();
        let painter = self.ui.painter();
        painter.circle_filled(center, self.theme.dock_radius, color);
        painter.circle_stroke(
            center,
            self.theme.dock_radius,
            Stroke::new(1.0, self.theme.dock_outline_color),
        );
    }

    fn render_label(&mut self, anchor: Pos2, align: Align2, text: &str) {
        if text.is_empty() {
            return;
        }
        self.ui.painter().text(
            anchor + self.offset,
            align,
            text,
            FontId::proportional(self.theme.label_font_size),
            self.theme.label_color,
        );
    }

    fn draw_child(&mut self, content: &mut dyn NodeContent, rect: Rect) -> Rect {
        let screen_rect = rect.translate(self.offset);
        let mut child = self.ui.new_child(UiBuilder::new().max_rect(screen_rect));
        content.ui(&mut child);
        child.min_rect().translate(-self.offset)
    }
}
