//! The package preamble.

use std::fmt;

use binrw::{BinRead, BinResult};
use byteorder::{LittleEndian, ReadBytesExt};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::compact::read_counted;
use crate::error::{Error, Result};
use crate::flags::PackageFlags;
use crate::reader::PackageReader;

/// First four bytes of every package
pub const PACKAGE_SIGNATURE: u32 = 0x9E2A_83C1;

/// First version that replaced the heritage table with a GUID and generations
pub const GENERATIONS_VERSION: u16 = 68;

/// Package header
///
/// | Offset | Field            | Size |
/// |--------|------------------|------|
/// | 0x00   | Signature        | 4    |
/// | 0x04   | Version          | 2    |
/// | 0x06   | Licensee version | 2    |
/// | 0x08   | Package flags    | 4    |
/// | 0x0C   | Name count       | 4    |
/// | 0x10   | Name offset      | 4    |
/// | 0x14   | Export count     | 4    |
/// | 0x18   | Export offset    | 4    |
/// | 0x1C   | Import count     | 4    |
/// | 0x20   | Import offset    | 4    |
/// | 0x24   | [`Lineage`]      | 8+   |
#[derive(BinRead, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct PackageHeader {
    pub signature: u32,
    pub version: u16,
    pub licensee_version: u16,
    #[br(map = |bits: u32| PackageFlags::from_bits_retain(bits))]
    pub package_flags: PackageFlags,
    pub name_count: u32,
    pub name_offset: u32,
    pub export_count: u32,
    pub export_offset: u32,
    pub import_count: u32,
    pub import_offset: u32,
    #[br(args(version))]
    pub lineage: Lineage,
}

/// Version dependent tail of the header
#[derive(BinRead, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little, import(version: u16))]
pub enum Lineage {
    /// Before version 68
    #[br(pre_assert(version < GENERATIONS_VERSION))]
    Heritage { count: u32, offset: u32 },

    /// Version 68 and later
    #[br(pre_assert(version >= GENERATIONS_VERSION))]
    Generations {
        guid: Guid,
        #[br(parse_with = generation_list)]
        generations: Vec<Generation>,
    },
}

/// Table sizes recorded for each time the package was saved
#[derive(BinRead, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct Generation {
    pub export_count: u32,
    pub name_count: u32,
}

/// 128 bit identifier stored as four little endian words
#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[br(little)]
pub struct Guid(pub [u32; 4]);

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in self.0 {
            write!(f, "{part:08X}")?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl Serialize for Guid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[binrw::parser(reader, endian)]
fn generation_list() -> BinResult<Vec<Generation>> {
    let count = u32::read_options(reader, endian, ())?;
    read_counted(reader, endian, count.into(), ())
}

impl PackageHeader {
    /// Read the header from the start of a package
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut magic = data;
        let signature = magic
            .read_u32::<LittleEndian>()
            .map_err(|_| Error::OutOfBounds {
                offset: 0,
                size: data.len() as u64,
            })?;

        if signature != PACKAGE_SIGNATURE {
            return Err(Error::MalformedHeader { signature });
        }

        let header: PackageHeader = PackageReader::new(data).read()?;
        debug!(
            version = header.version,
            names = header.name_count,
            exports = header.export_count,
            imports = header.import_count,
            "read package header"
        );

        Ok(header)
    }

    /// GUID of packages from version 68 on
    pub fn guid(&self) -> Option<Guid> {
        match &self.lineage {
            Lineage::Generations { guid, .. } => Some(*guid),
            Lineage::Heritage { .. } => None,
        }
    }

    pub fn generations(&self) -> &[Generation] {
        match &self.lineage {
            Lineage::Generations { generations, .. } => generations,
            Lineage::Heritage { .. } => &[],
        }
    }

    /// Heritage table count and offset of packages before version 68
    pub fn heritage(&self) -> Option<(u32, u32)> {
        match self.lineage {
            Lineage::Heritage { count, offset } => Some((count, offset)),
            Lineage::Generations { .. } => None,
        }
    }
}
