use thiserror::Error;

use crate::types::{DockId, DockKind, NodeId};

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Incompatible source type: {0}")]
    IncompatibleSourceType(String),
    #[error("Incompatible sink type: {0}")]
    IncompatibleSinkType(String),
    #[error("Incompatible value: {0}")]
    IncompatibleValue(String),
    #[error("Sink has no source: {0}")]
    NoSource(String),
    #[error("No dock at position ({x}, {y})")]
    NoDockOnPosition { x: f32, y: f32 },
    #[error("Node {node} already has {kind} {dock}")]
    AlreadyHasDock {
        node: NodeId,
        dock: DockId,
        kind: DockKind,
    },
    #[error("Dock {dock} is already bound to node {bound_to}")]
    DockAlreadyBoundToNode { dock: DockId, bound_to: NodeId },
    #[error("Node {node} has no {kind} {dock}")]
    NoSuchDock {
        node: NodeId,
        dock: DockId,
        kind: DockKind,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parsing error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("Config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, FlowError>;
