//! Forest data structures for thread reconstruction
//!
//! Threading works on a "node" abstraction that represents both real
//! messages and placeholders (messages that are replied to but are not part
//! of the record set being converted).

use std::collections::HashMap;

use crate::models::{Record, ThreadInfo};

/// Index of a node inside a [`Forest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in creation order
    pub fn index(self) -> usize {
        self.0
    }
}

/// A position in the thread forest.
///
/// ## Placeholders
///
/// A node without a message stands in for a parent that is referenced by an
/// `In-Reply-To` header but missing from the input. Placeholders carry
/// synthetic headers so a thread rooted at one can still be named.
#[derive(Debug, Clone)]
pub struct Node {
    /// Index into the forest's records (None for placeholders)
    pub message: Option<usize>,

    /// Parent node (None for top-level nodes)
    pub parent: Option<NodeId>,

    /// Replies, ordered once the chains are built
    pub children: Vec<NodeId>,

    /// Synthetic identity, only set on placeholders
    pub synthetic: Option<ThreadInfo>,
}

impl Node {
    /// Create a node for a real record
    pub fn with_message(record: usize) -> Self {
        Node {
            message: Some(record),
            parent: None,
            children: Vec::new(),
            synthetic: None,
        }
    }

    /// Create a placeholder for a missing message.
    ///
    /// The subject is filled in later from the first child.
    pub fn placeholder(message_id: String) -> Self {
        Node {
            message: None,
            parent: None,
            children: Vec::new(),
            synthetic: Some(ThreadInfo {
                message_id,
                subject: String::new(),
            }),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.message.is_none()
    }
}

/// Arena holding every record and every node built from them.
///
/// Nodes are addressed by [`NodeId`] so placeholders can be created and
/// fused without fighting over ownership of subtrees. Creation order is
/// preserved, which keeps every traversal deterministic for a given input
/// order.
#[derive(Debug, Default)]
pub struct Forest {
    records: Vec<Record>,
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
}

impl Forest {
    pub fn new(records: Vec<Record>) -> Self {
        Forest {
            nodes: Vec::with_capacity(records.len()),
            index: HashMap::with_capacity(records.len()),
            records,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn record(&self, index: usize) -> &Record {
        &self.records[index]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Look up the node registered under a message id
    pub fn lookup(&self, message_id: &str) -> Option<NodeId> {
        self.index.get(message_id).copied()
    }

    /// Append a node without registering it under any key.
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Append a node and register it under `message_id`.
    ///
    /// An existing registration is replaced.
    pub fn insert(&mut self, message_id: String, node: Node) -> NodeId {
        let id = self.push(node);
        self.index.insert(message_id, id);
        id
    }

    /// All node ids in creation order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// The record of a node, if it is not a placeholder
    pub fn message(&self, id: NodeId) -> Option<&Record> {
        self.node(id).message.map(|index| &self.records[index])
    }

    /// Attach `child` under `parent`, keeping both sides in sync
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Remove `child` from its parent, making it top-level
    pub fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.nodes[child.0].parent.take() {
            self.nodes[parent.0].children.retain(|&id| id != child);
        }
    }

    /// Identity of the thread rooted at `id`.
    ///
    /// Real nodes use their own headers, placeholders their synthetic ones.
    pub fn thread_info(&self, id: NodeId) -> ThreadInfo {
        match (self.message(id), &self.node(id).synthetic) {
            (Some(record), _) => ThreadInfo {
                message_id: record.message_id.clone(),
                subject: record.subject.clone(),
            },
            (None, Some(synthetic)) => synthetic.clone(),
            (None, None) => ThreadInfo {
                message_id: String::new(),
                subject: String::new(),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
