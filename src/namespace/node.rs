use std::collections::HashMap;
use std::sync::Mutex;

use derive_more::Display;

/// Stable index of a node inside its owning arena.
///
/// Ids are handed out in insertion order and are never reused or
/// invalidated, since the namespace has no delete operation. Holding a
/// `NodeId` is therefore always safe, unlike a raw parent back-pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// The two entry kinds. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NodeKind {
    #[display("file")]
    File,
    #[display("directory")]
    Directory,
}

/// State that differs between the two kinds: files carry nothing (content
/// storage is out of scope), directories own the mapping from child name
/// to child id.
///
/// The mutex serializes check-then-insert on one directory's child set;
/// distinct directories never share a guard.
#[derive(Debug)]
enum NodePayload {
    File,
    Directory {
        children: Mutex<HashMap<String, NodeId>>,
    },
}

#[derive(Debug)]
pub struct Node {
    name: String,
    parent: Option<NodeId>,
    payload: NodePayload,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>, parent: Option<NodeId>, kind: NodeKind) -> Self {
        let payload = match kind {
            NodeKind::File => NodePayload::File,
            NodeKind::Directory => NodePayload::Directory {
                children: Mutex::new(HashMap::new()),
            },
        };

        Node {
            name: name.into(),
            parent,
            payload,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        match self.payload {
            NodePayload::File => NodeKind::File,
            NodePayload::Directory { .. } => NodeKind::Directory,
        }
    }

    /// The containing directory, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The guarded child map, or `None` for files.
    pub(crate) fn children(&self) -> Option<&Mutex<HashMap<String, NodeId>>> {
        match &self.payload {
            NodePayload::File => None,
            NodePayload::Directory { children } => Some(children),
        }
    }
}
