//! # Declaration Rendering
//!
//! Turns a pre-order stream of debug information entries into indented
//! pseudo-C++ declarations:
//!
//! ```text
//! 		struct A::B { // file 1
//! 			int x;
//! 		};
//! 	} // namespace A
//! ```
//!
//! - [`scope`]: which struct and namespace blocks are open, and at what depth
//! - [`resolve`]: names for the types members refer to
//! - [`renderer`]: the per-entry decisions, driven by [`crate::walk`]
//!
//! Namespaces only print their closing line. Entries other than namespaces,
//! records and members print nothing but are still descended into, so records
//! nested under functions or lexical blocks are found.

pub mod renderer;
pub mod resolve;
pub mod scope;

pub use renderer::{Renderer, Visit, UNKNOWN_STRUCT_NAME, UNREADABLE_TAG_LINE};
pub use resolve::{type_name, UNKNOWN_TYPE_NAME};
pub use scope::{ScopeFrame, ScopeKind, ScopeStack};

/// Output formatting options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions
{
    /// Text repeated once per depth level in front of every line.
    pub indent: String,
}

impl Default for RenderOptions
{
    fn default() -> Self
    {
        Self {
            indent: "\t".to_string(),
        }
    }
}

impl RenderOptions
{
    /// Indent with `width` spaces per level instead of a tab.
    #[must_use]
    pub fn spaces(width: usize) -> Self
    {
        Self {
            indent: " ".repeat(width),
        }
    }
}
