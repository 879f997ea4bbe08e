//! Object file parsing and DWARF section extraction.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use gimli::RunTimeEndian;
use object::{Object, ObjectSection};
use tracing::debug;

use crate::error::{DeclError, Result};

/// Section bytes keyed by canonical ELF section name (`.debug_info`, ...).
pub type SectionMap = HashMap<&'static str, Arc<[u8]>>;

/// DWARF sections read from one object file.
#[derive(Debug, Clone)]
pub struct LoadedSections
{
    pub endian: RunTimeEndian,
    pub architecture: object::Architecture,
    pub sections: SectionMap,
}

// Canonical name first, then the names other formats use for it.
const DWARF_SECTIONS: &[(&str, &[&str])] = &[
    (".debug_abbrev", &[".debug_abbrev", "__debug_abbrev"]),
    (".debug_addr", &[".debug_addr", "__debug_addr"]),
    (".debug_info", &[".debug_info", "__debug_info"]),
    (".debug_line", &[".debug_line", "__debug_line"]),
    (".debug_line_str", &[".debug_line_str", "__debug_line_str"]),
    (".debug_ranges", &[".debug_ranges", "__debug_ranges"]),
    (".debug_rnglists", &[".debug_rnglists", "__debug_rnglists"]),
    (".debug_str", &[".debug_str", "__debug_str"]),
    (".debug_str_offsets", &[".debug_str_offsets", "__debug_str_offsets"]),
    (".debug_types", &[".debug_types", "__debug_types"]),
    (".debug_loc", &[".debug_loc", "__debug_loc"]),
    (".debug_loclists", &[".debug_loclists", "__debug_loclists"]),
    (".debug_cu_index", &[".debug_cu_index"]),
    (".debug_tu_index", &[".debug_tu_index"]),
];

/// Read `path` and copy out its DWARF sections.
///
/// Sections the file does not have are left out of the map; readers treat
/// them as empty.
///
/// ## Errors
///
/// Returns an error if the file cannot be read, is not an object file, or a
/// present section cannot be decompressed.
pub fn load_sections(path: &Path) -> Result<LoadedSections>
{
    let bytes = fs::read(path)?;
    let file = object::File::parse(&*bytes).map_err(|err| DeclError::ObjectParse {
        path: path.to_path_buf(),
        details: err.to_string(),
    })?;

    let endian = if file.is_little_endian() {
        RunTimeEndian::Little
    } else {
        RunTimeEndian::Big
    };

    let mut sections = SectionMap::new();
    for (canonical, aliases) in DWARF_SECTIONS {
        if let Some(data) = load_section_bytes(&file, aliases)? {
            debug!(section = canonical, bytes = data.len(), "loaded DWARF section");
            sections.insert(*canonical, data);
        }
    }

    Ok(LoadedSections {
        endian,
        architecture: file.architecture(),
        sections,
    })
}

fn load_section_bytes(file: &object::File<'_>, names: &[&str]) -> Result<Option<Arc<[u8]>>>
{
    for name in names {
        if let Some(section) = file.section_by_name(name) {
            let data = section
                .uncompressed_data()
                .map_err(|err| DeclError::InvalidArgument(format!("failed to read {name}: {err}")))?;
            return Ok(Some(match data {
                Cow::Borrowed(bytes) => Arc::<[u8]>::from(bytes),
                Cow::Owned(vec) => vec.into(),
            }));
        }
    }

    Ok(None)
}
