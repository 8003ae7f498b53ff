use std::sync::RwLock;

use snafu::Snafu;
use tracing::debug;

use crate::namespace::node::{Node, NodeId, NodeKind};
use crate::namespace::path;

/// Single owning store for every node of one namespace.
///
/// Parent and child links are arena indices rather than references, so a
/// back-pointer can never dangle: the arena owns all nodes for its whole
/// lifetime and only ever appends.
///
/// Lock order is fixed. The arena lock is taken before any per-directory
/// child-map mutex, and no two child-map mutexes are ever held at once,
/// so guard acquisition cannot deadlock.
#[derive(Debug)]
pub struct NodeArena {
    nodes: RwLock<Vec<Node>>,
}

impl NodeArena {
    /// Creates an arena holding only the root directory `"/"`.
    pub fn new() -> Self {
        let root = Node::new("/", None, NodeKind::Directory);
        NodeArena {
            nodes: RwLock::new(vec![root]),
        }
    }

    /// Id of the root directory; index 0 by construction.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes.read().unwrap()[id.0].kind()
    }

    pub fn name(&self, id: NodeId) -> String {
        self.nodes.read().unwrap()[id.0].name().to_string()
    }

    /// Creates a `kind` child named `name` under `parent`.
    ///
    /// The node is constructed and appended before the parent's guard is
    /// taken; the guard covers exactly the duplicate check and the
    /// insert. Concurrent creations under one directory therefore have a
    /// single winner per name, and creations under different directories
    /// do not contend on each other's guard.
    ///
    /// A creation that loses the duplicate race leaves its appended node
    /// unreferenced in the arena. Nothing can observe such a node, and
    /// without a delete operation the slot count is bounded by the number
    /// of failed creations.
    pub fn create_child(
        &self,
        parent: NodeId,
        name: &str,
        kind: NodeKind,
    ) -> Result<NodeId, CreateNodeError> {
        let child = Node::new(name, Some(parent), kind);
        let child_id = {
            let mut nodes = self.nodes.write().unwrap();
            nodes.push(child);
            NodeId(nodes.len() - 1)
        };

        let nodes = self.nodes.read().unwrap();
        let children = nodes[parent.0]
            .children()
            .expect("children are only ever created under a directory");

        let mut children = children.lock().unwrap();
        if children.contains_key(name) {
            return AlreadyExistsSnafu { name }.fail();
        }
        children.insert(name.to_string(), child_id);
        debug!("Created {} '{}' under '{}'", kind, name, nodes[parent.0].name());

        Ok(child_id)
    }

    /// Resolves `raw_path` starting at `start`, walking one segment at a
    /// time.
    ///
    /// The empty path, and any path consisting solely of separators,
    /// resolves to `start`. A segment that does not exist fails
    /// immediately, as does descending through a file; the terminal node
    /// may be of either kind. Resolution never mutates the tree, and each
    /// segment lookup takes the owning directory's guard so it observes a
    /// consistent snapshot of that child set.
    pub fn resolve(&self, start: NodeId, raw_path: &str) -> Result<NodeId, ResolvePathError> {
        let nodes = self.nodes.read().unwrap();

        let mut current = start;
        for segment in path::segments(raw_path) {
            let node = &nodes[current.0];
            let children = node.children().ok_or_else(|| ResolvePathError::NotADirectory {
                path: raw_path.to_string(),
                segment: node.name().to_string(),
            })?;

            let children = children.lock().unwrap();
            match children.get(segment) {
                Some(&child) => current = child,
                None => return SegmentNotFoundSnafu { path: raw_path, segment }.fail(),
            }
        }

        Ok(current)
    }

    /// Canonical absolute path of `id`, assembled by walking the parent
    /// chain up to the root. The root itself renders as `"/"`.
    pub fn path_string(&self, id: NodeId) -> String {
        let nodes = self.nodes.read().unwrap();

        let mut names = Vec::new();
        let mut current = id;
        while let Some(parent) = nodes[current.0].parent() {
            names.push(nodes[current.0].name().to_string());
            current = parent;
        }

        if names.is_empty() {
            return "/".to_string();
        }
        names.reverse();
        format!("/{}", names.join("/"))
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CreateNodeError {
    #[snafu(display("'{}' already exists", name))]
    AlreadyExists { name: String },
    #[snafu(display("'{}' is not a valid node name", name))]
    InvalidName { name: String },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ResolvePathError {
    #[snafu(display("'{}' is not a valid path: '{}' does not exist", path, segment))]
    SegmentNotFound { path: String, segment: String },
    #[snafu(display("'{}' is not a valid path: '{}' is not a directory", path, segment))]
    NotADirectory { path: String, segment: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn fresh_arena_holds_only_the_root() {
        let arena = NodeArena::new();

        assert_eq!(arena.kind(arena.root()), NodeKind::Directory);
        assert_eq!(arena.path_string(arena.root()), "/");
    }

    #[test]
    fn create_child_rejects_duplicate_names() {
        let arena = NodeArena::new();

        arena
            .create_child(arena.root(), "hello", NodeKind::Directory)
            .expect("first creation succeeds");
        let second = arena.create_child(arena.root(), "hello", NodeKind::File);

        assert!(matches!(
            second,
            Err(CreateNodeError::AlreadyExists { name }) if name == "hello"
        ));
    }

    #[test]
    fn same_name_is_allowed_under_different_parents() {
        let arena = NodeArena::new();

        let first = arena
            .create_child(arena.root(), "hello", NodeKind::Directory)
            .unwrap();
        arena
            .create_child(first, "hello", NodeKind::Directory)
            .expect("nested duplicate of an ancestor name is fine");
    }

    #[test]
    fn resolve_walks_multiple_segments() {
        let arena = NodeArena::new();
        let hello = arena
            .create_child(arena.root(), "hello", NodeKind::Directory)
            .unwrap();
        let world = arena.create_child(hello, "world", NodeKind::Directory).unwrap();

        assert_eq!(arena.resolve(arena.root(), "hello/world").unwrap(), world);
        assert_eq!(arena.resolve(hello, "world").unwrap(), world);
    }

    #[test]
    fn resolve_of_the_empty_path_is_the_start() {
        let arena = NodeArena::new();
        let hello = arena
            .create_child(arena.root(), "hello", NodeKind::Directory)
            .unwrap();

        assert_eq!(arena.resolve(hello, "").unwrap(), hello);
        assert_eq!(arena.resolve(arena.root(), "/").unwrap(), arena.root());
    }

    #[test]
    fn resolve_fails_on_the_first_missing_segment() {
        let arena = NodeArena::new();
        arena
            .create_child(arena.root(), "hello", NodeKind::Directory)
            .unwrap();

        let result = arena.resolve(arena.root(), "hello/missing/deeper");

        assert!(matches!(
            result,
            Err(ResolvePathError::SegmentNotFound { segment, .. }) if segment == "missing"
        ));
    }

    #[test]
    fn resolve_refuses_to_descend_through_a_file() {
        let arena = NodeArena::new();
        arena
            .create_child(arena.root(), "notes.txt", NodeKind::File)
            .unwrap();

        let result = arena.resolve(arena.root(), "notes.txt/deeper");

        assert!(matches!(
            result,
            Err(ResolvePathError::NotADirectory { segment, .. }) if segment == "notes.txt"
        ));
    }

    #[test]
    fn resolve_may_end_on_a_file() {
        let arena = NodeArena::new();
        let file = arena
            .create_child(arena.root(), "notes.txt", NodeKind::File)
            .unwrap();

        assert_eq!(arena.resolve(arena.root(), "notes.txt").unwrap(), file);
    }

    #[test]
    fn path_string_renders_the_parent_chain() {
        let arena = NodeArena::new();
        let hello = arena
            .create_child(arena.root(), "hello", NodeKind::Directory)
            .unwrap();
        let world = arena.create_child(hello, "world", NodeKind::Directory).unwrap();

        assert_eq!(arena.path_string(hello), "/hello");
        assert_eq!(arena.path_string(world), "/hello/world");
    }

    #[test]
    fn concurrent_distinct_creations_all_become_visible() {
        let arena = NodeArena::new();
        let names: Vec<String> = (0..16).map(|i| format!("dir{i}")).collect();

        thread::scope(|scope| {
            for name in &names {
                let arena = &arena;
                scope.spawn(move || {
                    arena
                        .create_child(arena.root(), name, NodeKind::Directory)
                        .expect("distinct names never collide");
                });
            }
        });

        for name in &names {
            assert!(arena.resolve(arena.root(), name).is_ok(), "lost insert of '{name}'");
        }
    }

    #[test]
    fn concurrent_duplicate_creations_have_exactly_one_winner() {
        let arena = NodeArena::new();

        let results: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| arena.create_child(arena.root(), "clash", NodeKind::Directory)))
                .collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect()
        });

        let successes = results.iter().filter(|result| result.is_ok()).count();
        assert_eq!(successes, 1);
        assert!(results.iter().all(|result| matches!(
            result,
            Ok(_) | Err(CreateNodeError::AlreadyExists { .. })
        )));
    }

    #[test]
    fn concurrent_creations_under_different_parents_all_succeed() {
        let arena = NodeArena::new();
        let left = arena
            .create_child(arena.root(), "left", NodeKind::Directory)
            .unwrap();
        let right = arena
            .create_child(arena.root(), "right", NodeKind::Directory)
            .unwrap();

        thread::scope(|scope| {
            for parent in [left, right] {
                let arena = &arena;
                scope.spawn(move || {
                    for i in 0..8 {
                        arena
                            .create_child(parent, &format!("child{i}"), NodeKind::File)
                            .expect("parents never contend");
                    }
                });
            }
        });

        for parent in ["left", "right"] {
            for i in 0..8 {
                assert!(arena.resolve(arena.root(), &format!("{parent}/child{i}")).is_ok());
            }
        }
    }
}
