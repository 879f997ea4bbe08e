//! Member type name resolution.

use tracing::trace;

use crate::tree::DieTree;

/// Label printed for a member whose type cannot be named.
pub const UNKNOWN_TYPE_NAME: &str = "unknown";

/// Name of the type `node`'s `DW_AT_type` points at.
///
/// `None` when the node has no type reference, the reference does not lead to
/// an entry, or that entry has no name (pointers, cv-qualified types and other
/// anonymous types).
pub fn type_name<T: DieTree>(tree: &T, node: T::Node) -> Option<String>
{
    let reference = tree.type_reference(node)?;
    let name = tree.name_at(reference);
    trace!(?node, ?reference, name = name.as_deref(), "resolved type reference");
    name
}
