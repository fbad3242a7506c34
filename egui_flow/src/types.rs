//! Identifier and classification types shared across the crate.

use std::fmt;

use uuid::Uuid;

/// Identity of a [`Node`](crate::Node). Docks refer back to their node by id only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(Uuid);

/// Identity of a dock (sink or source).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DockId(Uuid);

/// Identity of the canvas/view currently displaying a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewId(Uuid);

macro_rules! uuid_id {
    ($name:ident) => {
        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

uuid_id!(NodeId);
uuid_id!(DockId);
uuid_id!(ViewId);

/// Which side of a node a dock lives on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DockKind {
    /// Input, stacked along the node's left edge.
    Sink,
    /// Output, stacked along the node's right edge.
    Source,
}

impl fmt::Display for DockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DockKind::Sink => f.write_str("sink"),
            DockKind::Source => f.write_str("source"),
        }
    }
}
