//! # DWARF Access
//!
//! Loads the DWARF of a binary with `object` and `gimli` and exposes each
//! compilation unit as a [`DieTree`](crate::tree::DieTree).
//!
//! All units of `.debug_info` (and the type units of `.debug_types`) are
//! parsed up front so that type references into another unit resolve. Units
//! whose header or abbreviations fail to parse are logged and left out; the
//! rest of the file is still rendered.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dwarfdecl_core::dwarf::DebugInfo;
//! use dwarfdecl_core::tree::DieTree;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>>
//! {
//!     let info = DebugInfo::open("/path/to/binary")?;
//!     for unit in info.units() {
//!         println!("unit {} uses DWARF {}", unit.index(), unit.version());
//!     }
//!     Ok(())
//! }
//! ```

mod sections;
mod unit;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gimli::{
    constants, DebugInfoOffset, DebugTypeSignature, Dwarf, EndianArcSlice, Reader, RunTimeEndian, SectionId, Unit,
    UnitHeader, UnitOffset, UnitSectionOffset, UnitType,
};
pub use sections::{load_sections, LoadedSections, SectionMap};
use tracing::{debug, warn};
pub use unit::{TypeReference, UnitTree};

use crate::error::{map_dwarf_error, Result};

pub(crate) type OwnedReader = EndianArcSlice<RunTimeEndian>;
pub(crate) type OwnedDwarf = Dwarf<OwnedReader>;

/// The parsed DWARF of one binary.
pub struct DebugInfo
{
    path: PathBuf,
    architecture: Option<object::Architecture>,
    dwarf: OwnedDwarf,
    units: Vec<Unit<OwnedReader>>,
    type_units: Vec<Unit<OwnedReader>>,
}

impl std::fmt::Debug for DebugInfo
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("DebugInfo")
            .field("path", &self.path)
            .field("architecture", &self.architecture)
            .field("units", &self.units.len())
            .field("type_units", &self.type_units.len())
            .finish_non_exhaustive()
    }
}

impl DebugInfo
{
    /// Open the binary at `path` and parse its DWARF.
    ///
    /// A binary without debug information opens fine and has no units.
    ///
    /// ## Errors
    ///
    /// Returns an error if the file cannot be read or is not an object file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self>
    {
        let path = path.as_ref();
        let loaded = load_sections(path)?;
        let mut info = Self::from_sections(path, loaded.endian, &loaded.sections)?;
        info.architecture = Some(loaded.architecture);
        Ok(info)
    }

    /// Parse DWARF from section bytes that were already extracted.
    ///
    /// `sections` is keyed by ELF section name (`.debug_info`, `.debug_abbrev`,
    /// ...); missing sections read as empty.
    ///
    /// ## Errors
    ///
    /// Returns an error if gimli rejects the section set as a whole.
    pub fn from_sections(path: impl Into<PathBuf>, endian: RunTimeEndian, sections: &SectionMap) -> Result<Self>
    {
        let dwarf = Dwarf::load(|id| Ok::<_, gimli::Error>(section_reader(sections, id, endian)))
            .map_err(|err| map_dwarf_error("loading DWARF sections", err))?;

        let mut headers = dwarf.units();
        let units = collect_units(&dwarf, "compilation unit", || headers.next());
        let mut type_headers = dwarf.type_units();
        let type_units = collect_units(&dwarf, "type unit", || type_headers.next());

        let path = path.into();
        debug!(
            path = %path.display(),
            units = units.len(),
            type_units = type_units.len(),
            "parsed DWARF units"
        );

        Ok(Self {
            path,
            architecture: None,
            dwarf,
            units,
            type_units,
        })
    }

    pub fn path(&self) -> &Path
    {
        &self.path
    }

    /// Architecture reported by the object file, when loaded from one.
    pub fn architecture(&self) -> Option<object::Architecture>
    {
        self.architecture
    }

    /// Number of compilation units that parsed.
    pub fn unit_count(&self) -> usize
    {
        self.units.len()
    }

    /// Compilation units in `.debug_info` order.
    pub fn units(&self) -> impl Iterator<Item = UnitTree<'_>> + '_
    {
        self.units
            .iter()
            .enumerate()
            .map(move |(index, unit)| UnitTree::new(self, unit, index))
    }

    fn entry_name(&self, unit: &Unit<OwnedReader>, offset: UnitOffset) -> gimli::Result<Option<String>>
    {
        let entry = unit.entry(offset)?;
        let Some(attr) = entry.attr(constants::DW_AT_name)? else {
            return Ok(None);
        };
        let reader = self.dwarf.attr_string(unit, attr.value())?;
        let name = match reader.to_string() {
            Ok(cow) => cow.into_owned(),
            Err(_) => reader.to_string_lossy()?.into_owned(),
        };
        Ok(Some(name))
    }

    fn unit_containing(&self, offset: DebugInfoOffset) -> Option<(&Unit<OwnedReader>, UnitOffset)>
    {
        let target = UnitSectionOffset::from(offset);
        self.units
            .iter()
            .find_map(|unit| target.to_unit_offset(unit).map(|offset| (unit, offset)))
    }

    fn type_unit(&self, signature: DebugTypeSignature) -> Option<(&Unit<OwnedReader>, UnitOffset)>
    {
        // DWARF 5 type units sit in .debug_info next to the compilation units.
        self.units
            .iter()
            .chain(&self.type_units)
            .find_map(|unit| match unit.header.type_() {
                UnitType::Type {
                    type_signature,
                    type_offset,
                }
                | UnitType::SplitType {
                    type_signature,
                    type_offset,
                } if type_signature == signature => Some((unit, type_offset)),
                _ => None,
            })
    }
}

fn section_reader(sections: &SectionMap, id: SectionId, endian: RunTimeEndian) -> OwnedReader
{
    let data = sections
        .get(id.name())
        .cloned()
        .unwrap_or_else(|| Arc::<[u8]>::from(Vec::new()));
    EndianArcSlice::new(data, endian)
}

fn collect_units(
    dwarf: &OwnedDwarf,
    what: &str,
    mut next_header: impl FnMut() -> gimli::Result<Option<UnitHeader<OwnedReader>>>,
) -> Vec<Unit<OwnedReader>>
{
    let mut units = Vec::new();
    loop {
        let header = match next_header() {
            Ok(Some(header)) => header,
            Ok(None) => break,
            Err(err) => {
                // Header lengths chain the units, nothing after a bad one is reachable.
                warn!(%err, "stopped reading {} headers", what);
                break;
            }
        };

        let offset = header.offset();
        match dwarf.unit(header) {
            Ok(unit) => units.push(unit),
            Err(err) => warn!(?offset, %err, "skipping unparsable {}", what),
        }
    }
    units
}
