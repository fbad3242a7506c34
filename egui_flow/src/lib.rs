//! Node widget for egui-based flow graph editors.
//!
//! A [`Node`] owns ordered [`Sink`] (input) and [`Source`] (output) docks and
//! an optional embedded [`NodeContent`]. It computes its own minimum size,
//! hit-tests canvas points against its docks and renders itself through a
//! [`DrawContext`]. The layout engine has no egui state of its own; the
//! [`NodeWidget`] wires it to an [`egui::Ui`].

pub mod config;
pub mod content;
pub mod dock;
pub mod draw;
pub mod error;
mod layout;
pub mod node;
pub mod signal;
pub mod theme;
pub mod types;
pub mod widget;

pub use config::{ContentHeight, FlowConfig, LayoutConfig, RowLayout};
pub use content::NodeContent;
pub use dock::{DOCK_SIZE, Dock, DockRef, Sink, Source};
pub use draw::{DrawContext, EguiDrawContext};
pub use error::{FlowError, Result};
pub use node::Node;
pub use theme::FlowTheme;
pub use types::{DockId, DockKind, NodeId, ViewId};
pub use widget::{NodeResponse, NodeWidget};
