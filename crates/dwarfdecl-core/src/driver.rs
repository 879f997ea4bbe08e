//! # Compilation-Unit Driver
//!
//! Runs one walk per compilation unit, each with a fresh [`Renderer`], so no
//! open scope carries over from one unit to the next.

use std::io::Write;
use std::path::Path;

use tracing::{debug, info, info_span, warn};

use crate::dwarf::DebugInfo;
use crate::error::Result;
use crate::render::{RenderOptions, Renderer};
use crate::tree::DieTree;
use crate::walk::{walk, TypeFilter, WalkSummary};

/// Totals over a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary
{
    /// Units walked.
    pub units: usize,
    /// Units skipped because their root could not be read.
    pub empty_units: usize,
    pub nodes: WalkSummary,
}

/// Render every unit of `units`, in order, to `out`.
///
/// ## Errors
///
/// Returns an error if writing to `out` fails.
pub fn render_units<T, I, W>(units: I, filter: Option<&TypeFilter>, options: &RenderOptions, out: &mut W) -> Result<RunSummary>
where
    T: DieTree,
    I: IntoIterator<Item = T>,
    W: Write,
{
    let mut summary = RunSummary::default();

    for (index, unit) in units.into_iter().enumerate() {
        let _span = info_span!("unit", index).entered();
        debug!(version = unit.version(), "rendering compilation unit");

        let Some(root) = unit.root() else {
            warn!("compilation unit has no root entry");
            summary.empty_units += 1;
            continue;
        };

        let mut renderer = Renderer::new(&mut *out, options.clone());
        let walked = walk(&unit, root, &mut renderer, filter)?;
        renderer.finish()?;

        debug!(
            visited = walked.visited,
            filtered = walked.filtered,
            pruned = walked.pruned,
            "finished compilation unit"
        );
        summary.units += 1;
        summary.nodes.merge(walked);
    }

    Ok(summary)
}

/// Open the binary at `path` and render all of its compilation units.
///
/// ## Errors
///
/// Returns an error if the binary cannot be opened or writing to `out` fails.
pub fn render_file<W: Write>(
    path: impl AsRef<Path>,
    filter: Option<&TypeFilter>,
    options: &RenderOptions,
    out: &mut W,
) -> Result<RunSummary>
{
    let info = DebugInfo::open(path)?;
    render_debug_info(&info, filter, options, out)
}

/// Render all compilation units of an already opened binary.
///
/// ## Errors
///
/// Returns an error if writing to `out` fails.
pub fn render_debug_info<W: Write>(
    info: &DebugInfo,
    filter: Option<&TypeFilter>,
    options: &RenderOptions,
    out: &mut W,
) -> Result<RunSummary>
{
    info!(
        path = %info.path().display(),
        architecture = ?info.architecture(),
        units = info.unit_count(),
        "opened DWARF file"
    );
    if let Some(filter) = filter {
        info!(type_name = filter.type_name(), "filtering by type");
    }

    let summary = render_units(info.units(), filter, options, out)?;
    info!(
        units = summary.units,
        visited = summary.nodes.visited,
        filtered = summary.nodes.filtered,
        pruned = summary.nodes.pruned,
        "rendered declarations"
    );
    Ok(summary)
}
