//! Rendering real DWARF produced with `gimli::write`.

use std::sync::Arc;

use dwarfdecl_core::dwarf::{DebugInfo, SectionMap};
use dwarfdecl_core::render::RenderOptions;
use dwarfdecl_core::render_units;
use dwarfdecl_core::tree::DieTree;
use dwarfdecl_core::walk::TypeFilter;
use gimli::write::{self, AttributeValue, DwarfUnit, EndianVec, LineProgram, Reference, Sections, UnitEntryId};
use gimli::{constants, DebugTypeSignature, Encoding, Format, LittleEndian, RunTimeEndian};

fn encoding(version: u16) -> Encoding
{
    Encoding {
        format: Format::Dwarf32,
        version,
        address_size: 8,
    }
}

fn section_map(sections: &Sections<EndianVec<LittleEndian>>) -> SectionMap
{
    let mut map = SectionMap::new();
    sections
        .for_each(|id, data| {
            if !data.slice().is_empty() {
                map.insert(id.name(), Arc::from(data.slice()));
            }
            Ok::<(), write::Error>(())
        })
        .unwrap();
    map
}

fn named(unit: &mut write::Unit, parent: UnitEntryId, tag: constants::DwTag, name: &str) -> UnitEntryId
{
    let id = unit.add(parent, tag);
    unit.get_mut(id)
        .set(constants::DW_AT_name, AttributeValue::String(name.as_bytes().to_vec()));
    id
}

// namespace A { struct B { int x; char *p; }; struct Fwd; }
fn sample_unit(version: u16) -> SectionMap
{
    let mut dwarf = DwarfUnit::new(encoding(version));
    let unit = &mut dwarf.unit;
    let root = unit.root();

    let int = named(unit, root, constants::DW_TAG_base_type, "int");
    let char_ptr = unit.add(root, constants::DW_TAG_pointer_type);

    let a = named(unit, root, constants::DW_TAG_namespace, "A");
    let b = named(unit, a, constants::DW_TAG_structure_type, "B");
    unit.get_mut(b).set(constants::DW_AT_decl_file, AttributeValue::Udata(1));

    let x = named(unit, b, constants::DW_TAG_member, "x");
    unit.get_mut(x).set(constants::DW_AT_type, AttributeValue::UnitRef(int));
    let p = named(unit, b, constants::DW_TAG_member, "p");
    unit.get_mut(p).set(constants::DW_AT_type, AttributeValue::UnitRef(char_ptr));

    let fwd = named(unit, a, constants::DW_TAG_structure_type, "Fwd");
    unit.get_mut(fwd).set(constants::DW_AT_declaration, AttributeValue::Flag(true));

    let mut sections = Sections::new(EndianVec::new(LittleEndian));
    dwarf.write(&mut sections).unwrap();
    section_map(&sections)
}

fn render(info: &DebugInfo) -> String
{
    render_filtered(info, None)
}

fn render_filtered(info: &DebugInfo, filter: Option<&TypeFilter>) -> String
{
    let mut out = Vec::new();
    render_units(info.units(), filter, &RenderOptions::default(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

// Append a DWARF 5 `DW_UT_type` unit for `struct <name>` to `.debug_info`,
// with its own abbreviation table at the end of `.debug_abbrev`.
fn append_type_unit(sections: &mut SectionMap, signature: u64, name: &str)
{
    let mut abbrev = sections.get(".debug_abbrev").map(|data| data.to_vec()).unwrap_or_default();
    let abbrev_offset = u32::try_from(abbrev.len()).unwrap();
    abbrev.extend_from_slice(&[
        1, 0x41, 1, 0, 0, // DW_TAG_type_unit, has children
        2, 0x13, 0, 0x03, 0x08, 0, 0, // DW_TAG_structure_type: DW_AT_name, DW_FORM_string
        0,
    ]);

    // unit_length, version, unit_type, address_size, abbrev offset, signature, type_offset
    const HEADER_LEN: u32 = 4 + 2 + 1 + 1 + 4 + 8 + 4;
    let mut dies = vec![1, 2];
    dies.extend_from_slice(name.as_bytes());
    dies.extend_from_slice(&[0, 0]);

    let mut unit = Vec::new();
    let unit_length = HEADER_LEN - 4 + u32::try_from(dies.len()).unwrap();
    unit.extend_from_slice(&unit_length.to_le_bytes());
    unit.extend_from_slice(&5u16.to_le_bytes());
    unit.push(0x02); // DW_UT_type
    unit.push(8);
    unit.extend_from_slice(&abbrev_offset.to_le_bytes());
    unit.extend_from_slice(&signature.to_le_bytes());
    unit.extend_from_slice(&(HEADER_LEN + 1).to_le_bytes()); // the structure follows the root
    unit.extend_from_slice(&dies);

    let mut info = sections.get(".debug_info").map(|data| data.to_vec()).unwrap_or_default();
    info.extend_from_slice(&unit);
    sections.insert(".debug_info", Arc::from(info));
    sections.insert(".debug_abbrev", Arc::from(abbrev));
}

#[test]
fn test_struct_in_namespace_dwarf4()
{
    let info = DebugInfo::from_sections("sample.o", RunTimeEndian::Little, &sample_unit(4)).unwrap();
    assert_eq!(info.unit_count(), 1);
    assert!(info.architecture().is_none());

    assert_eq!(
        render(&info),
        "\t\tstruct A::B { // file 1\n\
         \t\t\tint x;\n\
         \t\t\tunknown p;\n\
         \t\t};\n\
         \t} // namespace A\n"
    );
}

#[test]
fn test_struct_in_namespace_dwarf5()
{
    let info = DebugInfo::from_sections("sample.o", RunTimeEndian::Little, &sample_unit(5)).unwrap();
    let unit = info.units().next().unwrap();
    assert_eq!(unit.version(), 5);

    let output = render(&info);
    assert!(output.starts_with("\t\tstruct A::B { // file 1\n"));
    assert!(!output.contains("Fwd"));
}

#[test]
fn test_unit_tree_navigation()
{
    let info = DebugInfo::from_sections("sample.o", RunTimeEndian::Little, &sample_unit(4)).unwrap();
    let unit = info.units().next().unwrap();

    let root = unit.root().unwrap();
    let int = unit.first_child(root).unwrap();
    assert_eq!(unit.name(int).as_deref(), Some("int"));
    assert!(unit.first_child(int).is_none());

    let pointer = unit.next_sibling(int).unwrap();
    assert!(unit.name(pointer).is_none());

    let namespace = unit.next_sibling(pointer).unwrap();
    assert_eq!(unit.name(namespace).as_deref(), Some("A"));
    assert!(unit.next_sibling(namespace).is_none());

    let b = unit.first_child(namespace).unwrap();
    assert_eq!(unit.decl_file(b), Some(1));
    assert!(!unit.is_declaration(b));

    let fwd = unit.next_sibling(b).unwrap();
    assert!(unit.is_declaration(fwd));
    assert!(unit.decl_file(fwd).is_none());
}

#[test]
fn test_reference_into_another_unit()
{
    let mut dwarf = write::Dwarf::new();

    let types = dwarf.units.add(write::Unit::new(encoding(4), LineProgram::none()));
    let unit = dwarf.units.get_mut(types);
    let root = unit.root();
    let widget = named(unit, root, constants::DW_TAG_structure_type, "Widget");

    let users = dwarf.units.add(write::Unit::new(encoding(4), LineProgram::none()));
    let unit = dwarf.units.get_mut(users);
    let root = unit.root();
    let holder = named(unit, root, constants::DW_TAG_structure_type, "Holder");
    let member = named(unit, holder, constants::DW_TAG_member, "w");
    unit.get_mut(member).set(
        constants::DW_AT_type,
        AttributeValue::DebugInfoRef(Reference::Entry(types, widget)),
    );

    let mut sections = Sections::new(EndianVec::new(LittleEndian));
    dwarf.write(&mut sections).unwrap();
    let info = DebugInfo::from_sections("two-units.o", RunTimeEndian::Little, &section_map(&sections)).unwrap();
    assert_eq!(info.unit_count(), 2);

    assert_eq!(
        render(&info),
        "\tstruct Widget { // no file index information\n\
         \t};\n\
         \tstruct Holder { // no file index information\n\
         \t\tWidget w;\n\
         \t};\n"
    );
}

#[test]
fn test_no_debug_sections_means_no_units()
{
    let info = DebugInfo::from_sections("stripped", RunTimeEndian::Little, &SectionMap::new()).unwrap();
    assert_eq!(info.unit_count(), 0);
    assert_eq!(render(&info), "");
}

#[test]
fn test_signature_reference_into_dwarf5_type_unit()
{
    const SIGNATURE: u64 = 0x1122_3344_5566_7788;

    let mut dwarf = DwarfUnit::new(encoding(5));
    let unit = &mut dwarf.unit;
    let root = unit.root();
    let holder = named(unit, root, constants::DW_TAG_structure_type, "Holder");
    let member = named(unit, holder, constants::DW_TAG_member, "g");
    unit.get_mut(member).set(
        constants::DW_AT_type,
        AttributeValue::DebugTypesRef(DebugTypeSignature(SIGNATURE)),
    );

    let mut sections = Sections::new(EndianVec::new(LittleEndian));
    dwarf.write(&mut sections).unwrap();
    let mut map = section_map(&sections);
    append_type_unit(&mut map, SIGNATURE, "Gadget");

    let info = DebugInfo::from_sections("types.o", RunTimeEndian::Little, &map).unwrap();
    assert_eq!(info.unit_count(), 2);

    assert_eq!(
        render(&info),
        "\tstruct Holder { // no file index information\n\
         \t\tGadget g;\n\
         \t};\n\
         \tstruct Gadget { // no file index information\n\
         \t};\n"
    );
}

#[test]
fn test_filter_rejects_type_attribute_without_reference()
{
    let mut dwarf = DwarfUnit::new(encoding(4));
    let unit = &mut dwarf.unit;
    let root = unit.root();
    let int = named(unit, root, constants::DW_TAG_base_type, "int");
    let s = named(unit, root, constants::DW_TAG_structure_type, "S");
    let kept = named(unit, s, constants::DW_TAG_member, "kept");
    unit.get_mut(kept).set(constants::DW_AT_type, AttributeValue::UnitRef(int));
    let odd = named(unit, s, constants::DW_TAG_member, "odd");
    unit.get_mut(odd).set(constants::DW_AT_type, AttributeValue::Udata(7));

    let mut sections = Sections::new(EndianVec::new(LittleEndian));
    dwarf.write(&mut sections).unwrap();
    let info = DebugInfo::from_sections("odd.o", RunTimeEndian::Little, &section_map(&sections)).unwrap();

    let unfiltered = render(&info);
    assert!(unfiltered.contains("\t\tunknown odd;\n"));

    let filter = TypeFilter::new("int");
    let filtered = render_filtered(&info, Some(&filter));
    assert!(filtered.contains("\t\tint kept;\n"));
    assert!(!filtered.contains("odd"));
}
