//! One compilation unit seen as a [`DieTree`].

use gimli::{constants, AttributeValue, DebugInfoOffset, DebugTypeSignature, DwAt, Unit, UnitOffset};
use tracing::{trace, warn};

use super::{DebugInfo, OwnedReader};
use crate::error::{map_dwarf_error, Result};
use crate::tree::{DieTree, EntryKind};

/// Where a `DW_AT_type` attribute points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeReference
{
    /// Entry in the same unit (`DW_FORM_ref*`).
    Local(UnitOffset),
    /// Entry anywhere in `.debug_info` (`DW_FORM_ref_addr`).
    Section(DebugInfoOffset),
    /// Type unit with this signature (`DW_FORM_ref_sig8`).
    Signature(DebugTypeSignature),
}

/// A compilation unit of a [`DebugInfo`], addressed by unit offsets.
///
/// Every read re-parses the entry at the given offset. Read failures other
/// than the tag are logged and reported as absent values.
#[derive(Clone, Copy)]
pub struct UnitTree<'a>
{
    info: &'a DebugInfo,
    unit: &'a Unit<OwnedReader>,
    index: usize,
}

impl std::fmt::Debug for UnitTree<'_>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("UnitTree")
            .field("index", &self.index)
            .field("offset", &self.unit.header.offset())
            .field("version", &self.unit.header.version())
            .finish()
    }
}

impl<'a> UnitTree<'a>
{
    pub(super) fn new(info: &'a DebugInfo, unit: &'a Unit<OwnedReader>, index: usize) -> Self
    {
        Self { info, unit, index }
    }

    /// Position of the unit in `.debug_info`, counting from zero.
    pub fn index(&self) -> usize
    {
        self.index
    }

    fn settle<V>(&self, context: &str, result: gimli::Result<Option<V>>) -> Option<V>
    {
        result.unwrap_or_else(|err| {
            warn!(unit = self.index, %err, "{}", context);
            None
        })
    }

    fn attr_value(&self, node: UnitOffset, name: DwAt) -> Option<AttributeValue<OwnedReader>>
    {
        let value = self
            .unit
            .entry(node)
            .and_then(|entry| entry.attr(name).map(|attr| attr.map(|attr| attr.value())));
        self.settle("reading attribute", value)
    }

    fn try_first_child(&self, node: UnitOffset) -> gimli::Result<Option<UnitOffset>>
    {
        let mut cursor = self.unit.entries_at_offset(node)?;
        let has_children = match cursor.next_dfs()? {
            Some((_, entry)) => entry.has_children(),
            None => false,
        };
        if !has_children {
            return Ok(None);
        }

        // An empty child list reads as a null entry, which moves back up.
        Ok(match cursor.next_dfs()? {
            Some((delta, child)) if delta > 0 => Some(child.offset()),
            _ => None,
        })
    }

    fn try_next_sibling(&self, node: UnitOffset) -> gimli::Result<Option<UnitOffset>>
    {
        let mut cursor = self.unit.entries_at_offset(node)?;
        if cursor.next_dfs()?.is_none() {
            return Ok(None);
        }
        Ok(cursor.next_sibling()?.map(|entry| entry.offset()))
    }
}

impl DieTree for UnitTree<'_>
{
    type Node = UnitOffset;
    type Reference = TypeReference;

    fn version(&self) -> u16
    {
        self.unit.header.version()
    }

    fn root(&self) -> Option<UnitOffset>
    {
        let mut cursor = self.unit.entries();
        let root = cursor.next_dfs().map(|next| next.map(|(_, entry)| entry.offset()));
        self.settle("reading unit root", root)
    }

    fn first_child(&self, node: UnitOffset) -> Option<UnitOffset>
    {
        let child = self.try_first_child(node);
        self.settle("reading first child", child)
    }

    fn next_sibling(&self, node: UnitOffset) -> Option<UnitOffset>
    {
        let sibling = self.try_next_sibling(node);
        self.settle("reading next sibling", sibling)
    }

    fn kind(&self, node: UnitOffset) -> Result<EntryKind>
    {
        self.unit
            .entry(node)
            .map(|entry| EntryKind::from(entry.tag()))
            .map_err(|err| map_dwarf_error("reading DW_TAG", err))
    }

    fn name(&self, node: UnitOffset) -> Option<String>
    {
        let name = self.info.entry_name(self.unit, node);
        self.settle("reading DW_AT_name", name)
    }

    fn is_declaration(&self, node: UnitOffset) -> bool
    {
        self.attr_value(node, constants::DW_AT_declaration)
            .is_some_and(|value| !matches!(value, AttributeValue::Flag(false)))
    }

    fn decl_file(&self, node: UnitOffset) -> Option<u64>
    {
        match self.attr_value(node, constants::DW_AT_decl_file)? {
            AttributeValue::FileIndex(index) => Some(index),
            other => other.udata_value(),
        }
    }

    fn has_type_attribute(&self, node: UnitOffset) -> bool
    {
        self.attr_value(node, constants::DW_AT_type).is_some()
    }

    fn type_reference(&self, node: UnitOffset) -> Option<TypeReference>
    {
        match self.attr_value(node, constants::DW_AT_type)? {
            AttributeValue::UnitRef(offset) => Some(TypeReference::Local(offset)),
            AttributeValue::DebugInfoRef(offset) => Some(TypeReference::Section(offset)),
            AttributeValue::DebugTypesRef(signature) => Some(TypeReference::Signature(signature)),
            other => {
                trace!(?node, value = ?other, "unsupported DW_AT_type form");
                None
            }
        }
    }

    fn name_at(&self, reference: TypeReference) -> Option<String>
    {
        let (unit, offset) = match reference {
            TypeReference::Local(offset) => (self.unit, offset),
            TypeReference::Section(offset) => self.info.unit_containing(offset)?,
            TypeReference::Signature(signature) => self.info.type_unit(signature)?,
        };
        let name = self.info.entry_name(unit, offset);
        self.settle("reading referenced type name", name)
    }
}
