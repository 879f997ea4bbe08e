//! Entry kinds the renderer distinguishes.

use std::fmt;

use gimli::{constants, DwTag};

/// Record-like type definitions rendered as a braced block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind
{
    /// `DW_TAG_structure_type`
    Struct,
    /// `DW_TAG_class_type`
    Class,
    /// `DW_TAG_union_type`
    Union,
}

impl RecordKind
{
    /// Keyword printed in front of the record's name.
    #[must_use]
    pub fn keyword(self) -> &'static str
    {
        match self {
            RecordKind::Struct => "struct",
            RecordKind::Class => "class",
            RecordKind::Union => "union",
        }
    }
}

impl fmt::Display for RecordKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.keyword())
    }
}

/// Category of a debug information entry, as far as rendering cares.
///
/// Every tag that is not listed here maps to [`EntryKind::Other`] and is
/// walked through without producing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind
{
    /// `DW_TAG_namespace`
    Namespace,
    /// A struct, class or union type.
    Record(RecordKind),
    /// `DW_TAG_member`
    Member,
    /// Any other tag, carrying its raw value for logging.
    Other(u16),
}

impl EntryKind
{
    /// Shorthand for `EntryKind::Record(RecordKind::Struct)`.
    pub const STRUCT: EntryKind = EntryKind::Record(RecordKind::Struct);
}

impl From<DwTag> for EntryKind
{
    fn from(tag: DwTag) -> Self
    {
        match tag {
            constants::DW_TAG_namespace => EntryKind::Namespace,
            constants::DW_TAG_structure_type => EntryKind::Record(RecordKind::Struct),
            constants::DW_TAG_class_type => EntryKind::Record(RecordKind::Class),
            constants::DW_TAG_union_type => EntryKind::Record(RecordKind::Union),
            constants::DW_TAG_member => EntryKind::Member,
            other => EntryKind::Other(other.0),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_rendered_tags_map_to_their_kind()
    {
        assert_eq!(EntryKind::from(constants::DW_TAG_namespace), EntryKind::Namespace);
        assert_eq!(EntryKind::from(constants::DW_TAG_structure_type), EntryKind::STRUCT);
        assert_eq!(
            EntryKind::from(constants::DW_TAG_class_type),
            EntryKind::Record(RecordKind::Class)
        );
        assert_eq!(
            EntryKind::from(constants::DW_TAG_union_type),
            EntryKind::Record(RecordKind::Union)
        );
        assert_eq!(EntryKind::from(constants::DW_TAG_member), EntryKind::Member);
    }

    #[test]
    fn test_other_tags_keep_raw_value()
    {
        let kind = EntryKind::from(constants::DW_TAG_base_type);
        assert_eq!(kind, EntryKind::Other(constants::DW_TAG_base_type.0));
    }

    #[test]
    fn test_record_keywords()
    {
        assert_eq!(RecordKind::Struct.keyword(), "struct");
        assert_eq!(RecordKind::Class.to_string(), "class");
        assert_eq!(RecordKind::Union.keyword(), "union");
    }
}
