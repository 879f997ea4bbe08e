//! # Debug Information Trees
//!
//! The contract the traversal and rendering code consume from a debug
//! information source.
//!
//! A [`DieTree`] is one compilation unit's tree of debug information entries
//! (DIEs). Nodes are cheap `Copy` handles; everything about a node is read
//! through the tree. Reads that can be absent return `Option` so callers decide
//! their own fallback, and link reads (`first_child`, `next_sibling`) end the
//! list on failure.
//!
//! Two implementations ship with the crate:
//! - [`crate::dwarf::UnitTree`]: a unit of real DWARF, read with `gimli`
//! - [`memory::MemoryTree`]: an in-memory tree built by hand

pub mod kind;
pub mod memory;

use std::fmt::Debug;

pub use kind::{EntryKind, RecordKind};

use crate::error::Result;

/// One compilation unit's tree of debug information entries.
pub trait DieTree
{
    /// Handle to one entry of this tree.
    type Node: Copy + Debug;
    /// Target of a `DW_AT_type` attribute, possibly outside this tree.
    type Reference: Copy + Debug;

    /// DWARF version of the unit header.
    fn version(&self) -> u16;

    /// The unit's root entry (usually `DW_TAG_compile_unit`).
    fn root(&self) -> Option<Self::Node>;

    /// First child of `node`, if it has any.
    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;

    /// Next entry in `node`'s sibling list.
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// Kind of `node`.
    ///
    /// ## Errors
    ///
    /// Returns an error if the entry cannot be read at all.
    fn kind(&self, node: Self::Node) -> Result<EntryKind>;

    /// `DW_AT_name` of `node`.
    fn name(&self, node: Self::Node) -> Option<String>;

    /// Whether `node` carries `DW_AT_declaration`, i.e. is not a definition.
    fn is_declaration(&self, node: Self::Node) -> bool;

    /// Raw `DW_AT_decl_file` value of `node`.
    fn decl_file(&self, node: Self::Node) -> Option<u64>;

    /// Whether `node` carries `DW_AT_type` at all, resolvable or not.
    fn has_type_attribute(&self, node: Self::Node) -> bool;

    /// `DW_AT_type` of `node`, dereferenced to a tree-wide target.
    fn type_reference(&self, node: Self::Node) -> Option<Self::Reference>;

    /// `DW_AT_name` of the entry a reference points at.
    fn name_at(&self, reference: Self::Reference) -> Option<String>;
}
