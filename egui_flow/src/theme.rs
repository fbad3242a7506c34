//! Theming for the egui rendering of nodes.

use egui::Color32;

/// Colors and metrics used by [`EguiDrawContext`](crate::draw::EguiDrawContext).
///
/// The node frame itself follows the egui widget visuals of the current style.
pub struct FlowTheme {
    /// Dock handle color based on the dock's type name.
    pub dock_color: Box<dyn Fn(&str) -> Color32>,
    /// Dock handle color while hovered.
    pub dock_hover_color: Color32,
    /// Outline around dock handles.
    pub dock_outline_color: Color32,
    /// Dock handle radius; the hit box stays `DOCK_SIZE` square.
    pub dock_radius: f32,
    /// Dock label color.
    pub label_color: Color32,
    /// Dock label font size.
    pub label_font_size: f32,
}

impl Default for FlowTheme {
    fn default() -> Self {
        Self {
            dock_color: Box::new(default_dock_color),
            dock_hover_color: Color32::WHITE,
            dock_outline_color: Color32::from_rgb(30, 30, 30),
            dock_radius: 5.0,
            label_color: Color32::from_rgb(200, 200, 200),
            label_font_size: 11.0,
        }
    }
}

fn default_dock_color(type_name: &str) -> Color32 {
    match type_name {
        "bool" => Color32::from_rgb(238, 109, 130), // Red-pink
        "int" | "i32" | "i64" | "u32" | "u64" => Color32::from_rgb(109, 200, 238), // Cyan
        "float" | "f32" | "f64" => Color32::from_rgb(109, 238, 150), // Green
        "string" | "str" | "text" => Color32::from_rgb(238, 207, 109), // Yellow
        "color" => Color32::from_rgb(200, 140, 238), // Light purple
        "image" => Color32::from_rgb(238, 200, 150), // Peach
        _ => Color32::from_rgb(150, 150, 150),      // Grey
    }
}
