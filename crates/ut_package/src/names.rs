//! The name table, the package's deduplicated string pool.

use std::io::{Read, Seek};

use binrw::{BinRead, BinResult, Endian};
use derive_more::derive::{Deref, Display, From};
use tracing::{instrument, trace};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::compact::CompactIndex;
use crate::error::{Error, Result};
use crate::header::PackageHeader;
use crate::reader::PackageReader;
use crate::text::{RawText, TextDecoder};

/// Last version storing names as NUL terminated strings
const NUL_TERMINATED_VERSION: u16 = 63;

/// Index into the name table, stored as a compact index
#[derive(Debug, Display, From, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct NameRef(pub i32);

impl BinRead for NameRef {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        _: Self::Args<'_>,
    ) -> BinResult<Self> {
        CompactIndex::read_options(reader, endian, ()).map(|index| NameRef(index.0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NameEntry {
    pub name: String,
    pub flags: u32,
}

/// Every name of a package, in table order
#[derive(Debug, Deref, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct NameTable(Vec<NameEntry>);

impl NameTable {
    /// Read `header.name_count` entries starting at `header.name_offset`
    #[instrument(skip_all, err)]
    pub fn parse(data: &[u8], header: &PackageHeader, decoder: &dyn TextDecoder) -> Result<Self> {
        let mut reader = PackageReader::at(data, header.name_offset.into());
        let count = u64::from(header.name_count);
        if count > reader.remaining() {
            return Err(Error::OutOfBounds {
                offset: reader.position(),
                size: reader.len(),
            });
        }

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let raw = if header.version <= NUL_TERMINATED_VERSION {
                RawText::single_byte(reader.null_terminated()?)
            } else {
                reader.sized_text()?
            };
            let flags = reader.u32()?;

            let name = decoder.decode(&raw);
            trace!(%name, flags, "read name");
            entries.push(NameEntry { name, flags });
        }

        Ok(NameTable(entries))
    }

    /// Look up a name, failing for indices outside the table
    pub fn get(&self, index: NameRef) -> Result<&str> {
        usize::try_from(index.0)
            .ok()
            .and_then(|i| self.0.get(i))
            .map(|entry| entry.name.as_str())
            .ok_or(Error::InvalidNameIndex {
                index: index.0,
                count: self.0.len(),
            })
    }

    /// Position of the first entry equal to `name`, ignoring ASCII case
    pub fn find(&self, name: &str) -> Option<NameRef> {
        self.0
            .iter()
            .position(|entry| entry.name.eq_ignore_ascii_case(name))
            .and_then(|i| i32::try_from(i).ok())
            .map(NameRef)
    }
}

impl From<Vec<NameEntry>> for NameTable {
    fn from(entries: Vec<NameEntry>) -> Self {
        NameTable(entries)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::header::{Lineage, PackageHeader};
    use crate::flags::PackageFlags;
    use crate::names::{NameRef, NameTable};
    use crate::text::DefaultTextDecoder;

    fn header(version: u16, name_count: u32) -> PackageHeader {
        PackageHeader {
            signature: crate::header::PACKAGE_SIGNATURE,
            version,
            licensee_version: 0,
            package_flags: PackageFlags::empty(),
            name_count,
            name_offset: 0,
            export_count: 0,
            export_offset: 0,
            import_count: 0,
            import_offset: 0,
            lineage: Lineage::Heritage { count: 0, offset: 0 },
        }
    }

    #[test]
    fn read_sized_names() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            0x05, b'N', b'o', b'n', b'e', 0x00, // name
            0x10, 0x04, 0x07, 0x00,             // flags
            0x05, b'C', b'o', b'r', b'e', 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];

        let names = NameTable::parse(&input, &header(68, 2), &DefaultTextDecoder)?;
        assert_eq!(names.len(), 2);
        assert_eq!(names[0].flags, 0x0007_0410);
        assert_eq!(names.get(NameRef(1))?, "Core");
        assert_eq!(names.find("none"), Some(NameRef(0)));

        Ok(())
    }

    #[test]
    fn read_terminated_names() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            b'N', b'o', b'n', b'e', 0x00,
            0x00, 0x00, 0x00, 0x00,
            b'M', b'y', b'L', b'e', b'v', b'e', b'l', 0x00,
            0x01, 0x00, 0x00, 0x00,
        ];

        let names = NameTable::parse(&input, &header(61, 2), &DefaultTextDecoder)?;
        assert_eq!(names.len(), 2);
        assert_eq!(names.get(NameRef(1))?, "MyLevel");
        assert_eq!(names[1].flags, 1);

        Ok(())
    }

    #[test]
    fn name_index_out_of_range() -> Result<()> {
        let input = [0x01, 0x00, 0x00, 0x00, 0x00, 0x00];
        let names = NameTable::parse(&input, &header(68, 1), &DefaultTextDecoder)?;

        assert_eq!(names.get(NameRef(0))?, "");
        assert!(matches!(
            names.get(NameRef(1)),
            Err(Error::InvalidNameIndex { index: 1, count: 1 })
        ));
        assert!(names.get(NameRef(-1)).is_err());

        Ok(())
    }

    #[test]
    fn name_count_larger_than_input() {
        let input = [0x01, 0x00];
        assert!(matches!(
            NameTable::parse(&input, &header(68, 1000), &DefaultTextDecoder),
            Err(Error::OutOfBounds { .. })
        ));
    }
}
