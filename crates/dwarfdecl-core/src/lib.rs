//! # dwarfdecl-core
//!
//! Reconstructs struct and namespace declarations from the DWARF debug
//! information of a compiled binary.
//!
//! This crate provides:
//! - Loading a binary's DWARF with `object` and `gimli` ([`dwarf`])
//! - A small tree contract over debug information entries ([`tree`])
//! - Pre-order traversal with subtree skipping and type filtering ([`walk`])
//! - Rendering of records, members and namespace scopes as text ([`render`])
//! - One fresh traversal per compilation unit ([`driver`])
//!
//! ## Example
//!
//! ```rust,no_run
//! use dwarfdecl_core::render::RenderOptions;
//! use dwarfdecl_core::walk::TypeFilter;
//!
//! fn main() -> dwarfdecl_core::Result<()>
//! {
//!     let filter = TypeFilter::new("int");
//!     let mut stdout = std::io::stdout().lock();
//!     dwarfdecl_core::render_file("./a.out", Some(&filter), &RenderOptions::default(), &mut stdout)?;
//!     Ok(())
//! }
//! ```

pub mod driver;
pub mod dwarf;
pub mod error;
pub mod prelude;
pub mod render;
pub mod tree;
pub mod walk;

pub use driver::{render_debug_info, render_file, render_units, RunSummary};
pub use error::{DeclError, Result};
