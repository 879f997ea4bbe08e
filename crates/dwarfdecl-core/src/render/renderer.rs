//! Per-entry declaration rendering.

use std::fmt;
use std::io::{self, Write};

use tracing::{trace, warn};

use super::resolve::{type_name, UNKNOWN_TYPE_NAME};
use super::scope::{ClosedFrames, ScopeFrame, ScopeKind, ScopeStack};
use super::RenderOptions;
use crate::error::Result;
use crate::tree::{DieTree, EntryKind, RecordKind};

/// Name printed for an entry without `DW_AT_name`.
pub const UNKNOWN_STRUCT_NAME: &str = "unknown_struct";

/// Diagnostic printed in place of an entry whose tag cannot be read.
pub const UNREADABLE_TAG_LINE: &str = "could not read DW_TAG";

/// What the walker should do with the children of a visited entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit
{
    Descend,
    SkipChildren,
}

/// Renders one compilation unit's declarations as indented text.
///
/// Feed it entries in pre-order through [`Renderer::visit`], then call
/// [`Renderer::finish`] to close whatever is still open. A renderer owns the
/// scope stack of a single unit; build a new one for every unit.
pub struct Renderer<W: Write>
{
    out: W,
    scopes: ScopeStack,
    options: RenderOptions,
}

impl<W: Write> Renderer<W>
{
    pub fn new(out: W, options: RenderOptions) -> Self
    {
        Self {
            out,
            scopes: ScopeStack::new(),
            options,
        }
    }

    /// Scopes currently open.
    pub fn scopes(&self) -> &ScopeStack
    {
        &self.scopes
    }

    /// Render `node`, found at `depth` below the unit root.
    ///
    /// Scopes opened at `depth` or deeper are closed first, since reaching
    /// this depth again means their subtrees are done.
    ///
    /// ## Errors
    ///
    /// Only failures to write to the output are returned. Unreadable entries
    /// and missing attributes are rendered with fallback text.
    pub fn visit<T: DieTree>(&mut self, tree: &T, node: T::Node, depth: usize) -> Result<Visit>
    {
        let closed = self.scopes.close_at(depth);
        self.emit_closing(closed)?;

        let kind = match tree.kind(node) {
            Ok(kind) => kind,
            Err(err) => {
                warn!(?node, depth, %err, "could not read entry tag");
                self.line(depth, format_args!("{UNREADABLE_TAG_LINE}"))?;
                return Ok(Visit::Descend);
            }
        };
        trace!(?node, depth, ?kind, "visiting entry");

        match kind {
            EntryKind::Namespace => Ok(self.open_namespace(tree, node, depth)),
            EntryKind::Record(record) => self.open_record(tree, node, record, depth),
            EntryKind::Member => self.member(tree, node, depth),
            EntryKind::Other(_) => Ok(Visit::Descend),
        }
    }

    /// Close every scope still open and hand back the output.
    ///
    /// ## Errors
    ///
    /// Returns an error if writing or flushing the output fails.
    pub fn finish(mut self) -> Result<W>
    {
        let closed = self.scopes.drain();
        self.emit_closing(closed)?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn open_namespace<T: DieTree>(&mut self, tree: &T, node: T::Node, depth: usize) -> Visit
    {
        self.scopes.push(ScopeFrame::namespace(display_name(tree, node), depth));
        Visit::Descend
    }

    fn open_record<T: DieTree>(&mut self, tree: &T, node: T::Node, record: RecordKind, depth: usize) -> Result<Visit>
    {
        // Forward declarations carry no members worth printing.
        if tree.is_declaration(node) {
            trace!(?node, "skipping non-defining declaration");
            return Ok(Visit::SkipChildren);
        }

        let name = display_name(tree, node);
        let prefix = self.scopes.qualified_prefix();
        match tree.decl_file(node) {
            Some(file) => self.line(depth, format_args!("{record} {prefix}{name} {{ // file {file}"))?,
            None => self.line(depth, format_args!("{record} {prefix}{name} {{ // no file index information"))?,
        }
        self.scopes.push(ScopeFrame::record(record, name, depth));
        Ok(Visit::Descend)
    }

    fn member<T: DieTree>(&mut self, tree: &T, node: T::Node, depth: usize) -> Result<Visit>
    {
        let name = display_name(tree, node);
        let ty = type_name(tree, node);
        let ty = ty.as_deref().unwrap_or(UNKNOWN_TYPE_NAME);
        self.line(depth, format_args!("{ty} {name};"))?;
        Ok(Visit::Descend)
    }

    fn emit_closing(&mut self, closed: ClosedFrames) -> io::Result<()>
    {
        for frame in closed {
            match frame.kind {
                ScopeKind::Record(_) => self.line(frame.depth, format_args!("}};"))?,
                ScopeKind::Namespace => self.line(frame.depth, format_args!("}} // namespace {}", frame.name))?,
            }
        }
        Ok(())
    }

    fn line(&mut self, depth: usize, text: fmt::Arguments<'_>) -> io::Result<()>
    {
        for _ in 0..depth {
            self.out.write_all(self.options.indent.as_bytes())?;
        }
        self.out.write_fmt(text)?;
        self.out.write_all(b"\n")
    }
}

fn display_name<T: DieTree>(tree: &T, node: T::Node) -> String
{
    tree.name(node).unwrap_or_else(|| UNKNOWN_STRUCT_NAME.to_string())
}
