//! Open struct and namespace scopes of one unit's traversal.

use smallvec::SmallVec;

use crate::tree::RecordKind;

/// What kind of block a frame keeps open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind
{
    /// A record definition; its header has been printed.
    Record(RecordKind),
    /// A namespace; nothing is printed until it closes.
    Namespace,
}

/// A block opened at a given tree depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFrame
{
    pub kind: ScopeKind,
    pub name: String,
    /// Depth of the entry that opened the block.
    pub depth: usize,
}

impl ScopeFrame
{
    pub fn record(kind: RecordKind, name: impl Into<String>, depth: usize) -> Self
    {
        Self {
            kind: ScopeKind::Record(kind),
            name: name.into(),
            depth,
        }
    }

    pub fn namespace(name: impl Into<String>, depth: usize) -> Self
    {
        Self {
            kind: ScopeKind::Namespace,
            name: name.into(),
            depth,
        }
    }
}

/// Frames closed by one call, innermost first.
pub type ClosedFrames = SmallVec<[ScopeFrame; 2]>;

/// Stack of open scopes, innermost on top.
///
/// Depths strictly increase from bottom to top. A frame is closed once the
/// traversal comes back to its own depth or shallower, which in pre-order
/// means every entry of its subtree has been seen.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack
{
    frames: SmallVec<[ScopeFrame; 8]>,
}

impl ScopeStack
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Open a new innermost scope.
    ///
    /// ## Panics
    ///
    /// In debug builds, panics if `frame` is not deeper than the current top.
    pub fn push(&mut self, frame: ScopeFrame)
    {
        debug_assert!(
            self.top().is_none_or(|top| top.depth < frame.depth),
            "scope {} at depth {} opened inside a scope at the same or a deeper level",
            frame.name,
            frame.depth
        );
        self.frames.push(frame);
    }

    /// Pop every frame opened at `depth` or deeper.
    pub fn close_at(&mut self, depth: usize) -> ClosedFrames
    {
        let mut closed = ClosedFrames::new();
        while self.top().is_some_and(|top| top.depth >= depth) {
            closed.extend(self.frames.pop());
        }
        closed
    }

    /// Pop every frame, innermost first.
    pub fn drain(&mut self) -> ClosedFrames
    {
        self.close_at(0)
    }

    /// Every open namespace, outermost first, each followed by `::`.
    pub fn qualified_prefix(&self) -> String
    {
        self.iter()
            .filter(|frame| frame.kind == ScopeKind::Namespace)
            .fold(String::new(), |mut prefix, frame| {
                prefix.push_str(&frame.name);
                prefix.push_str("::");
                prefix
            })
    }

    pub fn top(&self) -> Option<&ScopeFrame>
    {
        self.frames.last()
    }

    pub fn len(&self) -> usize
    {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.frames.is_empty()
    }

    /// Open frames, outermost first.
    pub fn iter(&self) -> impl Iterator<Item = &ScopeFrame>
    {
        self.frames.iter()
    }
}
