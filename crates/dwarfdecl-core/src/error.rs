//! # Error Types
//!
//! General error handling for loading and rendering debug information.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.
//!
//! Most malformed input never reaches this type: absent attributes and
//! unresolved references are replaced by fallback labels where they are read.
//! What remains is the small set of conditions that stop a run.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for dwarfdecl operations
///
/// ## Error Categories
///
/// 1. **Input errors**: Io, ObjectParse (the binary could not be opened)
/// 2. **Debug info errors**: Dwarf (gimli reported a parse failure)
/// 3. **Caller errors**: InvalidArgument
#[derive(Error, Debug)]
pub enum DeclError
{
    /// The input is not an object file `object` knows how to read
    ///
    /// This happens when:
    /// - The path points at a text file, archive, or truncated binary
    /// - The object format is not enabled in the `object` crate
    #[error("Failed to parse {}: {details}", path.display())]
    ObjectParse
    {
        /// Path of the file that failed to parse
        path: PathBuf,
        /// Message reported by the object parser
        details: String,
    },

    /// gimli failed while reading DWARF data
    ///
    /// The string carries the operation that was in progress, see
    /// [`map_dwarf_error`].
    #[error("DWARF error: {0}")]
    Dwarf(String),

    /// Invalid argument passed to a dwarfdecl function
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error (reading the input binary, writing declarations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for `Result<T, DeclError>`
///
/// ```rust
/// use dwarfdecl_core::error::Result;
/// fn foo() -> Result<()>
/// {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, DeclError>;

/// Map a gimli DWARF error to a `DeclError` with context.
///
/// `context` describes the operation being performed when the error occurred
/// (e.g. "reading DW_TAG").
pub fn map_dwarf_error(context: &str, err: gimli::Error) -> DeclError
{
    DeclError::Dwarf(format!("{context}: {err}"))
}
