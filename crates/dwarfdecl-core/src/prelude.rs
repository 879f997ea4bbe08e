//! Common module for library exports

pub use crate::driver::{render_debug_info, render_file, render_units, RunSummary};
pub use crate::dwarf::{DebugInfo, UnitTree};
pub use crate::error::{DeclError, Result};
pub use crate::render::{RenderOptions, Renderer, Visit};
pub use crate::tree::{DieTree, EntryKind, RecordKind};
pub use crate::walk::{walk, PreOrder, TypeFilter, WalkSummary};
