//! The compact index codec and the arrays it prefixes.
//!
//! A compact index stores a signed 32 bit value in one to five bytes:
//!
//! | Byte | Bits                                                         |
//! |------|--------------------------------------------------------------|
//! | 0    | bit 7 sign, bit 6 continue, bits 0-5 value bits 0-5          |
//! | 1-3  | bit 7 continue, bits 0-6 next seven value bits               |
//! | 4    | bits 0-4 value bits 27-31, no continuation bit               |

use std::io::{self, Read, Seek, SeekFrom, Write};

use binrw::{BinRead, BinResult, BinWrite, Endian};
use derive_more::derive::{Deref, Display, From};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Longest encoding of a compact index
pub const MAX_COMPACT_INDEX_LEN: usize = 5;

/// Variable length signed integer used for counts, indices and sizes
#[derive(Debug, Display, From, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct CompactIndex(pub i32);

impl CompactIndex {
    /// Decode a compact index from the start of `bytes`.
    ///
    /// Returns the value and the number of bytes it occupied, or `None` when
    /// `bytes` ends before the encoding does. Magnitudes above `i32::MAX`
    /// wrap the same way the engine's 32 bit accumulator does.
    pub fn decode(bytes: &[u8]) -> Option<(i32, usize)> {
        let first = *bytes.first()?;
        let negative = first & 0x80 != 0;

        let mut magnitude = u32::from(first & 0x3F);
        let mut len = 1;

        if first & 0x40 != 0 {
            let mut shift = 6;
            loop {
                let byte = *bytes.get(len)?;
                len += 1;

                if len == MAX_COMPACT_INDEX_LEN {
                    magnitude |= u32::from(byte & 0x1F) << shift;
                    break;
                }

                magnitude |= u32::from(byte & 0x7F) << shift;
                shift += 7;

                if byte & 0x80 == 0 {
                    break;
                }
            }
        }

        let value = magnitude as i32;
        Some((if negative { value.wrapping_neg() } else { value }, len))
    }

    /// Encode `value` using the shortest form.
    pub fn encode(value: i32) -> Vec<u8> {
        let mut magnitude = value.unsigned_abs();
        let mut out = Vec::with_capacity(MAX_COMPACT_INDEX_LEN);

        let mut first = (magnitude & 0x3F) as u8;
        if value < 0 {
            first |= 0x80;
        }
        magnitude >>= 6;
        if magnitude != 0 {
            first |= 0x40;
        }
        out.push(first);

        while magnitude != 0 {
            if out.len() == MAX_COMPACT_INDEX_LEN - 1 {
                out.push((magnitude & 0x1F) as u8);
                break;
            }

            let mut byte = (magnitude & 0x7F) as u8;
            magnitude >>= 7;
            if magnitude != 0 {
                byte |= 0x80;
            }
            out.push(byte);
        }

        out
    }

    /// Number of bytes `value` occupies when encoded
    pub fn encoded_len(value: i32) -> usize {
        Self::encode(value).len()
    }
}

impl BinRead for CompactIndex {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        _: Self::Args<'_>,
    ) -> BinResult<Self> {
        let mut buffer = [0u8; MAX_COMPACT_INDEX_LEN];
        buffer[0] = u8::read_options(reader, endian, ())?;

        let mut len = 1;
        if buffer[0] & 0x40 != 0 {
            while len < MAX_COMPACT_INDEX_LEN {
                buffer[len] = u8::read_options(reader, endian, ())?;
                len += 1;
                if buffer[len - 1] & 0x80 == 0 {
                    break;
                }
            }
        }

        let (value, _) = Self::decode(&buffer[..len]).ok_or_else(|| eof("compact index"))?;
        Ok(CompactIndex(value))
    }
}

impl BinWrite for CompactIndex {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _: Endian,
        _: Self::Args<'_>,
    ) -> BinResult<()> {
        writer.write_all(&Self::encode(self.0))?;
        Ok(())
    }
}

/// A compact index prefixed array
#[derive(Debug, Deref, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct TArray<T>(pub Vec<T>);

impl<T> TArray<T> {
    /// Unwrap the elements
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> BinRead for TArray<T>
where
    T: BinRead,
    for<'a> T::Args<'a>: Clone,
{
    type Args<'a> = T::Args<'a>;

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let pos = reader.stream_position()?;
        let count = CompactIndex::read_options(reader, endian, ())?;
        let count = u64::try_from(count.0).map_err(|_| binrw::Error::AssertFail {
            pos,
            message: format!("negative array count {}", count.0),
        })?;

        read_counted(reader, endian, count, args).map(TArray)
    }
}

/// Read `count` elements, refusing counts the remaining input cannot hold.
///
/// Every element of the format occupies at least one byte, so a count larger
/// than the bytes left is rejected before anything is allocated.
pub(crate) fn read_counted<'a, T, R>(
    reader: &mut R,
    endian: Endian,
    count: u64,
    args: T::Args<'a>,
) -> BinResult<Vec<T>>
where
    T: BinRead,
    T::Args<'a>: Clone,
    R: Read + Seek,
{
    let available = remaining(reader)?;
    if count > available {
        return Err(eof(&format!(
            "{count} elements requested with {available} bytes left"
        )));
    }

    let mut items = Vec::with_capacity(count as usize);
    for _ in 0..count {
        items.push(T::read_options(reader, endian, args.clone())?);
    }
    Ok(items)
}

/// `parse_with` target for arrays whose count is stored in another field
pub(crate) fn counted<R, T, A>(reader: &mut R, endian: Endian, (count, args): (u64, A)) -> BinResult<Vec<T>>
where
    R: Read + Seek,
    A: Clone,
    T: for<'a> BinRead<Args<'a> = A>,
{
    read_counted(reader, endian, count, args)
}

/// Read a compact index prefixed run of raw bytes
#[binrw::parser(reader, endian)]
pub(crate) fn compact_bytes() -> BinResult<Vec<u8>> {
    let pos = reader.stream_position()?;
    let count = CompactIndex::read_options(reader, endian, ())?;
    let count = u64::try_from(count.0).map_err(|_| binrw::Error::AssertFail {
        pos,
        message: format!("negative byte count {}", count.0),
    })?;

    read_bytes(reader, count)
}

pub(crate) fn read_bytes<R: Read + Seek>(reader: &mut R, count: u64) -> BinResult<Vec<u8>> {
    let available = remaining(reader)?;
    if count > available {
        return Err(eof(&format!(
            "{count} bytes requested with {available} bytes left"
        )));
    }

    let mut buffer = vec![0u8; count as usize];
    reader.read_exact(&mut buffer)?;
    Ok(buffer)
}

pub(crate) fn remaining<R: Seek>(reader: &mut R) -> BinResult<u64> {
    let pos = reader.stream_position()?;
    let end = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(pos))?;
    Ok(end.saturating_sub(pos))
}

pub(crate) fn eof(message: &str) -> binrw::Error {
    binrw::Error::Io(io::Error::new(io::ErrorKind::UnexpectedEof, message.to_owned()))
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::{BinRead, BinWrite};
    use pretty_assertions::assert_eq;

    use crate::compact::{CompactIndex, TArray};

    #[test]
    fn round_trip_lengths() {
        let cases = [
            (0, 1),
            (63, 1),
            (64, 2),
            (8191, 2),
            (8192, 3),
            (0x000F_FFFF, 3),
            (0x0010_0000, 4),
            (0x07FF_FFFF, 4),
            (0x0800_0000, 5),
            (i32::MAX, 5),
        ];

        for (value, len) in cases {
            for value in [value, -value] {
                let encoded = CompactIndex::encode(value);
                assert_eq!(encoded.len(), len, "encoded length of {value}");
                assert_eq!(CompactIndex::decode(&encoded), Some((value, len)));
            }
        }
    }

    #[test]
    fn decode_known_bytes() {
        assert_eq!(CompactIndex::decode(&[0x05]), Some((5, 1)));
        assert_eq!(CompactIndex::decode(&[0x85]), Some((-5, 1)));
        assert_eq!(CompactIndex::decode(&[0x40, 0x01]), Some((64, 2)));
        assert_eq!(CompactIndex::decode(&[0xC0, 0x01]), Some((-64, 2)));
        assert_eq!(CompactIndex::decode(&[0x7F, 0xFF, 0xFF, 0xFF, 0x1F]), Some((-1, 5)));
    }

    #[test]
    fn fifth_byte_keeps_five_bits() {
        // the upper three bits of the last byte are ignored
        assert_eq!(
            CompactIndex::decode(&[0x40, 0x80, 0x80, 0x80, 0xE1]),
            Some((1 << 27, 5))
        );
    }

    #[test]
    fn decode_truncated() {
        assert_eq!(CompactIndex::decode(&[]), None);
        assert_eq!(CompactIndex::decode(&[0x40]), None);
        assert_eq!(CompactIndex::decode(&[0x40, 0x80, 0x80]), None);
    }

    #[test]
    fn read_and_write_through_binrw() -> binrw::BinResult<()> {
        let mut buffer = Cursor::new(Vec::new());
        CompactIndex(-8192).write_le(&mut buffer)?;
        CompactIndex(7).write_le(&mut buffer)?;

        buffer.set_position(0);
        assert_eq!(CompactIndex::read_le(&mut buffer)?, CompactIndex(-8192));
        assert_eq!(CompactIndex::read_le(&mut buffer)?, CompactIndex(7));
        assert_eq!(buffer.position(), 4);

        Ok(())
    }

    #[test]
    fn read_array() -> binrw::BinResult<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x03,                   // Count
            0x01, 0x00,             // u16
            0x02, 0x00,             // u16
            0x03, 0x00,             // u16
        ]);

        let array = TArray::<u16>::read_le(&mut input)?;
        assert_eq!(array.0, vec![1, 2, 3]);

        Ok(())
    }

    #[test]
    fn read_array_count_too_large() {
        let mut input = Cursor::new(vec![0x3F, 0x00, 0x00]);
        let err = TArray::<u8>::read_le(&mut input).unwrap_err();
        assert!(err.is_eof());
    }

    #[test]
    fn read_array_negative_count() {
        let mut input = Cursor::new(vec![0x81, 0x00]);
        assert!(TArray::<u8>::read_le(&mut input).is_err());
    }
}
