//! The optional child a node embeds below its docks.

use egui::Vec2;

use crate::types::NodeId;

/// Content embedded in a node, e.g. a parameter editor.
///
/// The node treats the content as its single child: it parents it on
/// [`Node::set_content`](crate::Node::set_content), assigns it the rectangle
/// below the docks when drawing, and reserves room for the size the content
/// last occupied.
pub trait NodeContent {
    /// Size to reserve before the content has been drawn once.
    fn preferred_size(&self) -> Vec2 {
        Vec2::ZERO
    }

    /// Paint the content into `ui`, whose max rect is the assigned sub-rectangle.
    fn ui(&mut self, ui: &mut egui::Ui);

    fn on_parent(&mut self, node: NodeId) {
        let _ = node;
    }

    fn on_unparent(&mut self) {}
}

/// Closures can be embedded directly.
impl<F> NodeContent for F
where
    F: FnMut(&mut egui::Ui),
{
    fn ui(&mut self, ui: &mut egui::Ui) {
        self(ui)
    }
}
