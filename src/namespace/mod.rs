//! In-memory hierarchical namespace.
//!
//! This module provides a virtual filesystem tree where every node lives
//! in a single owning arena, directories guard their own child sets, and
//! a namespace facade exposes creation, `cd`-style navigation and the
//! printable working-directory path.

mod arena;
mod namespace;
mod node;
mod path;

pub use arena::{CreateNodeError, NodeArena, ResolvePathError};
pub use namespace::Namespace;
pub use node::{NodeId, NodeKind};
