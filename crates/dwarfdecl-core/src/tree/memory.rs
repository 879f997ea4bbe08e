//! In-memory debug information tree.
//!
//! [`MemoryTree`] builds a DIE tree by hand, for rendering declarations that
//! did not come from a binary and for exercising the traversal without one.
//!
//! ```rust
//! use dwarfdecl_core::tree::memory::MemoryTree;
//! use dwarfdecl_core::tree::EntryKind;
//!
//! let mut tree = MemoryTree::new();
//! let root = tree.root_id();
//! let int = tree.add(root, EntryKind::Other(0x24)).named("int").id();
//! let point = tree.add(root, EntryKind::STRUCT).named("Point").decl_file(1).id();
//! tree.add(point, EntryKind::Member).named("x").typed(int).id();
//! ```

use gimli::constants;

use super::{DieTree, EntryKind};
use crate::error::{DeclError, Result};

/// Handle to a node of a [`MemoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct MemoryNode
{
    // None marks an entry whose tag cannot be read.
    kind: Option<EntryKind>,
    name: Option<String>,
    declaration: bool,
    decl_file: Option<u64>,
    type_ref: Option<NodeId>,
    // DW_AT_type present in a form that yields no reference.
    opaque_type: bool,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

/// A hand-built DIE tree with a `DW_TAG_compile_unit` root.
#[derive(Debug, Clone)]
pub struct MemoryTree
{
    nodes: Vec<MemoryNode>,
    version: u16,
}

impl Default for MemoryTree
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl MemoryTree
{
    /// Create a tree holding only the compilation unit root (DWARF 5).
    pub fn new() -> Self
    {
        let root = MemoryNode {
            kind: Some(EntryKind::from(constants::DW_TAG_compile_unit)),
            ..MemoryNode::default()
        };
        Self {
            nodes: vec![root],
            version: 5,
        }
    }

    /// Report `version` as the unit's DWARF version.
    #[must_use]
    pub fn with_version(mut self, version: u16) -> Self
    {
        self.version = version;
        self
    }

    /// The compilation unit root.
    #[must_use]
    pub fn root_id(&self) -> NodeId
    {
        NodeId(0)
    }

    /// A reference that points at no node, for unresolvable `DW_AT_type`s.
    #[must_use]
    pub fn dangling(&self) -> NodeId
    {
        NodeId(usize::MAX)
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize
    {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.nodes.is_empty()
    }

    /// Append a child of `kind` as the last child of `parent`.
    ///
    /// ## Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn add(&mut self, parent: NodeId, kind: EntryKind) -> NodeBuilder<'_>
    {
        self.append(parent, Some(kind))
    }

    /// Append a child whose tag cannot be read.
    ///
    /// ## Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn add_unreadable(&mut self, parent: NodeId) -> NodeBuilder<'_>
    {
        self.append(parent, None)
    }

    fn append(&mut self, parent: NodeId, kind: Option<EntryKind>) -> NodeBuilder<'_>
    {
        assert!(parent.0 < self.nodes.len(), "parent {parent:?} is not part of this tree");

        let id = NodeId(self.nodes.len());
        self.nodes.push(MemoryNode {
            kind,
            ..MemoryNode::default()
        });

        match self.nodes[parent.0].last_child.replace(id) {
            Some(previous) => self.nodes[previous.0].next_sibling = Some(id),
            None => self.nodes[parent.0].first_child = Some(id),
        }

        NodeBuilder { tree: self, id }
    }

    fn node(&self, id: NodeId) -> Option<&MemoryNode>
    {
        self.nodes.get(id.0)
    }
}

/// Sets the attributes of a freshly added node.
#[derive(Debug)]
pub struct NodeBuilder<'a>
{
    tree: &'a mut MemoryTree,
    id: NodeId,
}

impl NodeBuilder<'_>
{
    fn node_mut(&mut self) -> &mut MemoryNode
    {
        &mut self.tree.nodes[self.id.0]
    }

    /// Set `DW_AT_name`.
    #[must_use]
    pub fn named(mut self, name: &str) -> Self
    {
        self.node_mut().name = Some(name.to_string());
        self
    }

    /// Mark the node as a non-defining declaration (`DW_AT_declaration`).
    #[must_use]
    pub fn declaration(mut self) -> Self
    {
        self.node_mut().declaration = true;
        self
    }

    /// Set the raw `DW_AT_decl_file` value.
    #[must_use]
    pub fn decl_file(mut self, file: u64) -> Self
    {
        self.node_mut().decl_file = Some(file);
        self
    }

    /// Point `DW_AT_type` at `target`.
    #[must_use]
    pub fn typed(mut self, target: NodeId) -> Self
    {
        self.node_mut().type_ref = Some(target);
        self
    }

    /// Give the node a `DW_AT_type` that does not lead to any reference.
    #[must_use]
    pub fn opaque_type(mut self) -> Self
    {
        self.node_mut().opaque_type = true;
        self
    }

    /// The id of the node being built.
    pub fn id(self) -> NodeId
    {
        self.id
    }
}

impl DieTree for MemoryTree
{
    type Node = NodeId;
    type Reference = NodeId;

    fn version(&self) -> u16
    {
        self.version
    }

    fn root(&self) -> Option<NodeId>
    {
        self.node(self.root_id()).map(|_| self.root_id())
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId>
    {
        self.node(node)?.first_child
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId>
    {
        self.node(node)?.next_sibling
    }

    fn kind(&self, node: NodeId) -> Result<EntryKind>
    {
        self.node(node)
            .and_then(|entry| entry.kind)
            .ok_or_else(|| DeclError::Dwarf(format!("no readable tag for node {}", node.0)))
    }

    fn name(&self, node: NodeId) -> Option<String>
    {
        self.node(node)?.name.clone()
    }

    fn is_declaration(&self, node: NodeId) -> bool
    {
        self.node(node).is_some_and(|entry| entry.declaration)
    }

    fn decl_file(&self, node: NodeId) -> Option<u64>
    {
        self.node(node)?.decl_file
    }

    fn has_type_attribute(&self, node: NodeId) -> bool
    {
        self.node(node)
            .is_some_and(|entry| entry.type_ref.is_some() || entry.opaque_type)
    }

    fn type_reference(&self, node: NodeId) -> Option<NodeId>
    {
        self.node(node)?.type_ref
    }

    fn name_at(&self, reference: NodeId) -> Option<String>
    {
        self.name(reference)
    }
}
