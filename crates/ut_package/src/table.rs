//! The export and import tables and the references that select between them.
//!
//! An [`ObjectRef`] is a signed compact index:
//!
//! | Value | Refers to                  |
//! |-------|----------------------------|
//! | `0`   | nothing                    |
//! | `< 0` | import table `[-value - 1]` |
//! | `> 0` | export table `[value - 1]` |

use std::io::{Read, Seek};
use std::sync::OnceLock;

use binrw::{BinRead, BinResult, Endian};
use derive_more::derive::{Display, From};
use tracing::instrument;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::compact::CompactIndex;
use crate::error::{Error, Result};
use crate::flags::ObjectFlags;
use crate::header::PackageHeader;
use crate::names::NameRef;
use crate::objects::ObjectData;
use crate::property::PropertyBlock;
use crate::reader::PackageReader;

/// Reference to an entry of the export or import table
#[derive(Debug, Display, From, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct ObjectRef(pub i32);

impl ObjectRef {
    pub const NULL: ObjectRef = ObjectRef(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Reference to the export at zero based `index`
    pub fn export(index: usize) -> Self {
        ObjectRef(i32::try_from(index).map_or(i32::MAX, |i| i.saturating_add(1)))
    }

    /// Reference to the import at zero based `index`
    pub fn import(index: usize) -> Self {
        ObjectRef(i32::try_from(index).map_or(i32::MIN, |i| -i - 1))
    }

    /// Zero based export position, for references into the export table
    pub fn export_index(self) -> Option<usize> {
        (self.0 > 0).then(|| (self.0 - 1) as usize)
    }

    /// Zero based import position, for references into the import table
    pub fn import_index(self) -> Option<usize> {
        (self.0 < 0).then(|| (-(i64::from(self.0)) - 1) as usize)
    }
}

impl BinRead for ObjectRef {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        _: Self::Args<'_>,
    ) -> BinResult<Self> {
        CompactIndex::read_options(reader, endian, ()).map(|index| ObjectRef(index.0))
    }
}

/// Lazily decoded data of an export
#[derive(Debug, Clone, Default)]
pub(crate) struct ExportCache {
    pub(crate) properties: OnceLock<PropertyBlock>,
    pub(crate) data: OnceLock<ObjectData>,
}

impl PartialEq for ExportCache {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

/// An object stored in this package
#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct ExportEntry {
    pub class_index: ObjectRef,
    pub super_index: ObjectRef,
    #[br(map = |index: i32| ObjectRef(index))]
    pub package_index: ObjectRef,
    pub object_name_index: NameRef,
    #[br(map = |bits: u32| ObjectFlags::from_bits_retain(bits))]
    pub object_flags: ObjectFlags,
    pub serial_size: CompactIndex,
    #[br(if(serial_size.0 > 0))]
    pub serial_offset: Option<CompactIndex>,

    #[br(ignore)]
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) cache: ExportCache,
}

impl ExportEntry {
    /// Whether the export has a serialized body
    pub fn has_data(&self) -> bool {
        self.serial_size.0 > 0
    }

    pub fn has_flag(&self, flag: ObjectFlags) -> bool {
        self.object_flags.intersects(flag)
    }

    pub fn flag_names(&self) -> Vec<&'static str> {
        self.object_flags.names()
    }

    /// Start of the serialized body, when there is one
    pub fn body_offset(&self) -> Option<u64> {
        self.serial_offset
            .filter(|_| self.has_data())
            .and_then(|offset| u64::try_from(offset.0).ok())
    }
}

/// An object that lives in another package
#[derive(BinRead, Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct ImportEntry {
    pub class_package_index: NameRef,
    pub class_name_index: NameRef,
    #[br(map = |index: i32| ObjectRef(index))]
    pub package_index: ObjectRef,
    pub object_name_index: NameRef,
}

/// A resolved [`ObjectRef`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectEntry<'p> {
    Export(&'p ExportEntry),
    Import(&'p ImportEntry),
}

impl ObjectEntry<'_> {
    pub fn object_name_index(&self) -> NameRef {
        match self {
            ObjectEntry::Export(export) => export.object_name_index,
            ObjectEntry::Import(import) => import.object_name_index,
        }
    }

    pub fn package_index(&self) -> ObjectRef {
        match self {
            ObjectEntry::Export(export) => export.package_index,
            ObjectEntry::Import(import) => import.package_index,
        }
    }

    pub fn is_import(&self) -> bool {
        matches!(self, ObjectEntry::Import(_))
    }
}

impl<'p> From<&'p ExportEntry> for ObjectEntry<'p> {
    fn from(export: &'p ExportEntry) -> Self {
        ObjectEntry::Export(export)
    }
}

impl<'p> From<&'p ImportEntry> for ObjectEntry<'p> {
    fn from(import: &'p ImportEntry) -> Self {
        ObjectEntry::Import(import)
    }
}

/// Both object tables of a package
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ObjectTables {
    pub exports: Vec<ExportEntry>,
    pub imports: Vec<ImportEntry>,
}

impl ObjectTables {
    #[instrument(skip_all, err)]
    pub fn parse(data: &[u8], header: &PackageHeader) -> Result<Self> {
        let exports = read_table(data, header.export_offset, header.export_count)?;
        let imports = read_table(data, header.import_offset, header.import_count)?;
        Ok(ObjectTables { exports, imports })
    }

    /// Resolve a reference; the null reference resolves to `None`
    pub fn resolve(&self, index: ObjectRef) -> Result<Option<ObjectEntry<'_>>> {
        if index.is_null() {
            return Ok(None);
        }

        let entry = match index.import_index() {
            Some(i) => self.imports.get(i).map(ObjectEntry::Import),
            None => index
                .export_index()
                .and_then(|i| self.exports.get(i))
                .map(ObjectEntry::Export),
        };

        entry.map(Some).ok_or(Error::UnresolvedReference {
            index: index.0,
            imports: self.imports.len(),
            exports: self.exports.len(),
        })
    }

    /// Total number of entries in both tables
    pub fn len(&self) -> usize {
        self.exports.len() + self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn read_table<T>(data: &[u8], offset: u32, count: u32) -> Result<Vec<T>>
where
    T: for<'a> BinRead<Args<'a> = ()>,
{
    let mut reader = PackageReader::at(data, offset.into());
    let count = u64::from(count);
    if count > reader.remaining() {
        return Err(Error::OutOfBounds {
            offset: reader.position(),
            size: reader.len(),
        });
    }

    (0..count).map(|_| reader.read()).collect()
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinRead;
    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::flags::ObjectFlags;
    use crate::names::NameRef;
    use crate::table::{ExportEntry, ImportEntry, ObjectEntry, ObjectRef, ObjectTables};

    #[test]
    fn read_export() -> binrw::BinResult<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new([
            0x81,                   // class
            0x00,                   // super
            0x02, 0x00, 0x00, 0x00, // package
            0x05,                   // name
            0x04, 0x00, 0x07, 0x00, // flags
            0x40, 0x01,             // serial size
            0x3F,                   // serial offset
        ]);

        let export = ExportEntry::read_le(&mut input)?;
        assert_eq!(export.class_index, ObjectRef(-1));
        assert_eq!(export.package_index, ObjectRef(2));
        assert_eq!(export.object_name_index, NameRef(5));
        assert!(export.has_flag(ObjectFlags::PUBLIC));
        assert_eq!(export.serial_size.0, 64);
        assert_eq!(export.body_offset(), Some(63));
        assert_eq!(input.position(), 14);

        Ok(())
    }

    #[test]
    fn export_without_body_has_no_offset() -> binrw::BinResult<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new([
            0x01, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x03,
            0x00, 0x00, 0x00, 0x00,
            0x00,                   // serial size
            0x09,                   // next entry
        ]);

        let export = ExportEntry::read_le(&mut input)?;
        assert!(!export.has_data());
        assert_eq!(export.serial_offset, None);
        assert_eq!(input.position(), 12);

        Ok(())
    }

    #[test]
    fn read_import() -> binrw::BinResult<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new([
            0x01,                   // class package
            0x02,                   // class name
            0xFF, 0xFF, 0xFF, 0xFF, // package
            0x03,                   // name
        ]);

        let import = ImportEntry::read_le(&mut input)?;
        assert_eq!(
            import,
            ImportEntry {
                class_package_index: NameRef(1),
                class_name_index: NameRef(2),
                package_index: ObjectRef(-1),
                object_name_index: NameRef(3),
            }
        );

        Ok(())
    }

    fn tables() -> ObjectTables {
        ObjectTables {
            exports: (1..=3)
                .map(|name| ExportEntry {
                    object_name_index: NameRef(name),
                    ..Default::default()
                })
                .collect(),
            imports: (10..=11)
                .map(|name| ImportEntry {
                    object_name_index: NameRef(name),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn resolve_references() -> Result<()> {
        let tables = tables();

        assert_eq!(tables.resolve(ObjectRef::NULL)?, None);
        for i in 1..=3 {
            let entry = tables.resolve(ObjectRef(i))?;
            assert_eq!(entry, Some(ObjectEntry::Export(&tables.exports[i as usize - 1])));
        }
        for k in 0..2 {
            let entry = tables.resolve(ObjectRef(-(k + 1)))?;
            assert_eq!(entry, Some(ObjectEntry::Import(&tables.imports[k as usize])));
        }

        Ok(())
    }

    #[test]
    fn resolve_outside_tables() {
        let tables = tables();

        assert!(matches!(
            tables.resolve(ObjectRef(4)),
            Err(Error::UnresolvedReference { index: 4, imports: 2, exports: 3 })
        ));
        assert!(matches!(
            tables.resolve(ObjectRef(-3)),
            Err(Error::UnresolvedReference { .. })
        ));
        assert!(tables.resolve(ObjectRef(i32::MIN)).is_err());
    }

    #[test]
    fn reference_constructors() {
        assert_eq!(ObjectRef::export(0), ObjectRef(1));
        assert_eq!(ObjectRef::import(0), ObjectRef(-1));
        assert_eq!(ObjectRef(-1).import_index(), Some(0));
        assert_eq!(ObjectRef(3).export_index(), Some(2));
        assert_eq!(ObjectRef(3).import_index(), None);
    }
}
