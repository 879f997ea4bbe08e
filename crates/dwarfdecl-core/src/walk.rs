//! # Tree Walking
//!
//! Pre-order traversal of a [`DieTree`] and the loop that feeds it to a
//! [`Renderer`].
//!
//! [`PreOrder`] only knows how to move through the tree. Whether a subtree is
//! entered is decided by its consumer, which calls [`PreOrder::skip_subtree`]
//! after looking at an entry and before asking for the next one:
//!
//! ```rust
//! use dwarfdecl_core::tree::memory::MemoryTree;
//! use dwarfdecl_core::tree::{DieTree, EntryKind};
//! use dwarfdecl_core::walk::PreOrder;
//!
//! let mut tree = MemoryTree::new();
//! let root = tree.root_id();
//! let skipped = tree.add(root, EntryKind::STRUCT).named("Fwd").id();
//! tree.add(skipped, EntryKind::Member).named("hidden").id();
//!
//! let mut entries = PreOrder::new(&tree, root);
//! let mut seen = Vec::new();
//! while let Some((node, depth)) = entries.next() {
//!     seen.push((tree.name(node), depth));
//!     if node == skipped {
//!         entries.skip_subtree();
//!     }
//! }
//! assert_eq!(seen, [(None, 0), (Some("Fwd".to_string()), 1)]);
//! ```

use std::io::Write;

use tracing::trace;

use crate::error::Result;
use crate::render::{type_name, Renderer, Visit};
use crate::tree::DieTree;

/// Lazy pre-order iterator over `(node, depth)` pairs.
///
/// Starts at a node at depth 0 and covers that node's sibling list and all of
/// their descendants. Cloning or calling [`PreOrder::restart`] starts over.
pub struct PreOrder<'t, T: DieTree>
{
    tree: &'t T,
    start: T::Node,
    // Entries still to yield; the next one is on top.
    pending: Vec<(T::Node, usize)>,
    // Last yielded entry, expanded lazily on the following call.
    current: Option<(T::Node, usize)>,
    skip_current: bool,
}

impl<'t, T: DieTree> PreOrder<'t, T>
{
    pub fn new(tree: &'t T, start: T::Node) -> Self
    {
        Self {
            tree,
            start,
            pending: vec![(start, 0)],
            current: None,
            skip_current: false,
        }
    }

    /// Do not descend into the children of the entry yielded last.
    pub fn skip_subtree(&mut self)
    {
        self.skip_current = true;
    }

    /// Go back to the starting node.
    pub fn restart(&mut self)
    {
        self.pending.clear();
        self.pending.push((self.start, 0));
        self.current = None;
        self.skip_current = false;
    }
}

impl<T: DieTree> Clone for PreOrder<'_, T>
{
    fn clone(&self) -> Self
    {
        Self {
            tree: self.tree,
            start: self.start,
            pending: self.pending.clone(),
            current: self.current,
            skip_current: self.skip_current,
        }
    }
}

impl<T: DieTree> Iterator for PreOrder<'_, T>
{
    type Item = (T::Node, usize);

    fn next(&mut self) -> Option<Self::Item>
    {
        if let Some((node, depth)) = self.current.take() {
            // Sibling first so the child ends up on top.
            if let Some(sibling) = self.tree.next_sibling(node) {
                self.pending.push((sibling, depth));
            }
            if !std::mem::take(&mut self.skip_current) {
                if let Some(child) = self.tree.first_child(node) {
                    self.pending.push((child, depth + 1));
                }
            }
        }

        let next = self.pending.pop()?;
        self.current = Some(next);
        Some(next)
    }
}

/// Keeps only subtrees whose referenced type has a given name.
///
/// Applies to entries that carry a `DW_AT_type`; entries without one always
/// pass, so the records and namespaces around a matching member stay visible.
/// A `DW_AT_type` that does not resolve to a name never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeFilter(String);

impl TypeFilter
{
    pub fn new(type_name: impl Into<String>) -> Self
    {
        Self(type_name.into())
    }

    pub fn type_name(&self) -> &str
    {
        &self.0
    }

    /// Whether `node` and its subtree should be rendered.
    pub fn admits<T: DieTree>(&self, tree: &T, node: T::Node) -> bool
    {
        if !tree.has_type_attribute(node) {
            return true;
        }
        let resolved = type_name(tree, node);
        trace!(?node, resolved = resolved.as_deref(), wanted = %self.0, "comparing type names");
        resolved.as_deref() == Some(self.0.as_str())
    }
}

/// Counters for one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary
{
    /// Entries handed to the renderer.
    pub visited: usize,
    /// Entries whose subtree the type filter removed.
    pub filtered: usize,
    /// Visited entries whose children the renderer declined.
    pub pruned: usize,
}

impl WalkSummary
{
    pub fn merge(&mut self, other: WalkSummary)
    {
        self.visited += other.visited;
        self.filtered += other.filtered;
        self.pruned += other.pruned;
    }
}

/// Render every entry reachable from `root` in pre-order.
///
/// ## Errors
///
/// Returns the first error the renderer reports (output write failures).
pub fn walk<T, W>(tree: &T, root: T::Node, renderer: &mut Renderer<W>, filter: Option<&TypeFilter>) -> Result<WalkSummary>
where
    T: DieTree,
    W: Write,
{
    let mut summary = WalkSummary::default();
    let mut entries = PreOrder::new(tree, root);

    while let Some((node, depth)) = entries.next() {
        if let Some(filter) = filter {
            if !filter.admits(tree, node) {
                summary.filtered += 1;
                entries.skip_subtree();
                continue;
            }
        }

        summary.visited += 1;
        if renderer.visit(tree, node, depth)? == Visit::SkipChildren {
            summary.pruned += 1;
            entries.skip_subtree();
        }
    }

    Ok(summary)
}
