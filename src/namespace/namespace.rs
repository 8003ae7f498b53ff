use std::sync::RwLock;

use snafu::ensure;
use tracing::debug;

use crate::namespace::arena::{
    CreateNodeError, InvalidNameSnafu, NodeArena, NotADirectorySnafu, ResolvePathError,
};
use crate::namespace::node::{NodeId, NodeKind};
use crate::namespace::path;

/// One namespace: an owned node arena plus the current-directory cursor
/// the `cd`-style operations act on.
///
/// All operations take `&self` and may be called from multiple threads.
/// The cursor carries its own guard, so concurrent `change_directory`
/// calls are serialized with the last writer winning; callers that need
/// a stable cursor across several operations must serialize externally.
#[derive(Debug)]
pub struct Namespace {
    arena: NodeArena,
    current: RwLock<NodeId>,
}

impl Namespace {
    /// Creates a namespace containing only the root directory, with the
    /// cursor at `/`.
    pub fn new() -> Self {
        let arena = NodeArena::new();
        let current = RwLock::new(arena.root());

        Namespace { arena, current }
    }

    /// Creates a directory named `name` in the current directory.
    pub fn create_directory(&self, name: &str) -> Result<NodeId, CreateNodeError> {
        self.create_node(name, NodeKind::Directory)
    }

    /// Creates a file named `name` in the current directory.
    pub fn create_file(&self, name: &str) -> Result<NodeId, CreateNodeError> {
        self.create_node(name, NodeKind::File)
    }

    fn create_node(&self, name: &str, kind: NodeKind) -> Result<NodeId, CreateNodeError> {
        ensure!(path::is_valid_name(name), InvalidNameSnafu { name });

        let current = *self.current.read().unwrap();
        self.arena.create_child(current, name, kind)
    }

    /// Moves the cursor to `path`.
    ///
    /// Absolute paths resolve from the root, relative ones from the
    /// current directory; the empty path is a no-op. The cursor moves
    /// only when the whole path resolves to a directory, and on any
    /// failure it stays exactly where it was.
    pub fn change_directory(&self, path: &str) -> Result<(), ResolvePathError> {
        if path.is_empty() {
            return Ok(());
        }

        let start = if path::is_absolute(path) {
            self.arena.root()
        } else {
            *self.current.read().unwrap()
        };

        let target = self.arena.resolve(start, path)?;
        ensure!(
            self.arena.kind(target) == NodeKind::Directory,
            NotADirectorySnafu {
                path,
                segment: self.arena.name(target),
            }
        );

        *self.current.write().unwrap() = target;
        debug!("Changed directory to '{}'", self.arena.path_string(target));

        Ok(())
    }

    /// Canonical absolute path of the current directory.
    pub fn current_path(&self) -> String {
        self.arena.path_string(*self.current.read().unwrap())
    }
}
