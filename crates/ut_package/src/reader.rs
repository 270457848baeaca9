//! Positioned reads over the package buffer.

use std::io::Cursor;

use binrw::{BinRead, Endian};
use tracing::trace;

use crate::compact::{read_bytes, CompactIndex};
use crate::error::{Error, Result};
use crate::text::{read_terminated, RawText, TextEncoding};

/// A cursor over the whole package buffer.
///
/// Each decode owns its own reader, created at the offset it starts from, so
/// independent objects can be decoded from the same buffer at the same time.
#[derive(Debug, Clone)]
pub struct PackageReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> PackageReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        PackageReader {
            cursor: Cursor::new(data),
        }
    }

    /// Create a reader positioned at `offset`
    pub fn at(data: &'a [u8], offset: u64) -> Self {
        let mut reader = Self::new(data);
        reader.seek(offset);
        reader
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Move to an absolute offset. Reads past the end fail, seeking does not.
    pub fn seek(&mut self, offset: u64) {
        self.cursor.set_position(offset);
    }

    /// Size of the backing buffer
    pub fn len(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.position())
    }

    pub fn data(&self) -> &'a [u8] {
        self.cursor.get_ref()
    }

    fn ensure(&self, needed: u64) -> Result<()> {
        if needed > self.remaining() {
            return Err(Error::OutOfBounds {
                offset: self.position(),
                size: self.len(),
            });
        }
        Ok(())
    }

    /// Read a value that takes no arguments
    pub fn read<T>(&mut self) -> Result<T>
    where
        T: for<'b> BinRead<Args<'b> = ()>,
    {
        self.read_args(())
    }

    /// Read a value, handing it the arguments it imports
    pub fn read_args<T: BinRead>(&mut self, args: T::Args<'_>) -> Result<T> {
        let offset = self.position();
        let size = self.len();

        T::read_options(&mut self.cursor, Endian::Little, args)
            .map_err(|err| convert_error(err, offset, size))
    }

    pub fn u8(&mut self) -> Result<u8> {
        self.read()
    }

    pub fn u16(&mut self) -> Result<u16> {
        self.read()
    }

    pub fn u32(&mut self) -> Result<u32> {
        self.read()
    }

    pub fn i32(&mut self) -> Result<i32> {
        self.read()
    }

    pub fn f32(&mut self) -> Result<f32> {
        self.read()
    }

    pub fn compact_index(&mut self) -> Result<i32> {
        let offset = self.position();
        let rest = self.data().get(offset as usize..).unwrap_or_default();

        let (value, len) = CompactIndex::decode(rest).ok_or(Error::OutOfBounds {
            offset,
            size: self.len(),
        })?;
        self.seek(offset + len as u64);

        Ok(value)
    }

    /// Read a compact index element count, rejecting negative counts and
    /// counts larger than the remaining input
    pub fn count(&mut self) -> Result<u64> {
        let offset = self.position();
        let count = self.compact_index()?;
        let count = u64::try_from(count).map_err(|_| Error::NegativeCount { offset, count })?;
        self.ensure(count)?;
        Ok(count)
    }

    pub fn skip(&mut self, len: u64) -> Result<()> {
        self.ensure(len)?;
        self.seek(self.position() + len);
        Ok(())
    }

    /// Borrow `len` bytes from the buffer
    pub fn bytes(&mut self, len: u64) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let start = self.position() as usize;
        self.seek(self.position() + len);
        Ok(&self.data()[start..start + len as usize])
    }

    /// Bytes up to a NUL; the NUL is consumed but not returned
    pub fn null_terminated(&mut self) -> Result<&'a [u8]> {
        let start = self.position();
        let rest = self.data().get(start as usize..).unwrap_or_default();
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(Error::OutOfBounds {
                offset: start,
                size: self.len(),
            })?;

        self.seek(start + len as u64 + 1);
        Ok(&rest[..len])
    }

    /// Text prefixed by a one byte length that includes the trailing NUL
    pub fn sized_text(&mut self) -> Result<RawText> {
        let size = self.u8()?;
        let bytes = self.terminated(size.into(), 1)?;
        Ok(RawText::single_byte(bytes))
    }

    /// The payload of a `Str` property.
    ///
    /// A negative length selects UTF-16LE, a positive one the single byte
    /// code page; the length counts code units including the terminator.
    pub fn string_property(&mut self) -> Result<RawText> {
        let length = self.compact_index()?;
        let encoding = if length < 0 {
            TextEncoding::Utf16Le
        } else {
            TextEncoding::SingleByte
        };

        let units = u64::from(length.unsigned_abs());
        trace!(units, ?encoding, "string property");

        let bytes = self.terminated(units, encoding.width() as u64)?;
        Ok(RawText { encoding, bytes })
    }

    fn terminated(&mut self, units: u64, width: u64) -> Result<Vec<u8>> {
        let offset = self.position();
        let size = self.len();

        read_terminated(&mut self.cursor, units, width)
            .map_err(|err| convert_error(err, offset, size))
    }

    /// Copy `len` bytes out of the buffer
    pub fn byte_vec(&mut self, len: u64) -> Result<Vec<u8>> {
        let offset = self.position();
        let size = self.len();
        read_bytes(&mut self.cursor, len).map_err(|err| convert_error(err, offset, size))
    }
}

/// Whether a decode failed because the input ended, looking through the
/// per-variant failures binrw collects for enums
pub(crate) fn is_eof(err: &binrw::Error) -> bool {
    match err {
        binrw::Error::EnumErrors { variant_errors, .. } => {
            variant_errors.iter().any(|(_, err)| is_eof(err))
        }
        binrw::Error::Backtrace(backtrace) => is_eof(&backtrace.error),
        other => other.is_eof(),
    }
}

/// End of input becomes [`Error::OutOfBounds`], anything else stays a binrw error
pub(crate) fn convert_error(err: binrw::Error, offset: u64, size: u64) -> Error {
    if is_eof(&err) {
        Error::OutOfBounds { offset, size }
    } else {
        Error::BinRWError(err)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::Error;
    use crate::reader::PackageReader;
    use crate::text::TextEncoding;

    #[test]
    fn primitive_reads_advance() -> crate::error::Result<()> {
        #[rustfmt::skip]
        let input = [
            0x01,                   // u8
            0x02, 0x00,             // u16
            0x03, 0x00, 0x00, 0x00, // u32
            0x00, 0x00, 0x80, 0x3F, // f32
        ];

        let mut reader = PackageReader::new(&input);
        assert_eq!(reader.u8()?, 1);
        assert_eq!(reader.u16()?, 2);
        assert_eq!(reader.u32()?, 3);
        assert_eq!(reader.f32()?, 1.0);
        assert_eq!(reader.position(), 11);
        assert_eq!(reader.remaining(), 0);

        Ok(())
    }

    #[test]
    fn read_past_end() {
        let input = [0x01, 0x02];
        let mut reader = PackageReader::new(&input);

        assert!(matches!(
            reader.u32(),
            Err(Error::OutOfBounds { offset: 0, size: 2 })
        ));
        assert!(matches!(reader.skip(3), Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn compact_index_past_end() {
        let input = [0x40];
        let mut reader = PackageReader::new(&input);
        assert!(matches!(
            reader.compact_index(),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn negative_count() {
        let input = [0x82];
        let mut reader = PackageReader::new(&input);
        assert!(matches!(
            reader.count(),
            Err(Error::NegativeCount { count: -2, .. })
        ));
    }

    #[test]
    fn single_byte_string_property() -> crate::error::Result<()> {
        let input = [0x04, b'a', b'b', b'c', 0x00, 0xAA];
        let mut reader = PackageReader::new(&input);

        let text = reader.string_property()?;
        assert_eq!(text.encoding, TextEncoding::SingleByte);
        assert_eq!(text.bytes, b"abc");
        assert_eq!(reader.position(), 5);

        Ok(())
    }

    #[test]
    fn utf16_string_property() -> crate::error::Result<()> {
        #[rustfmt::skip]
        let input = [
            0x83,                   // -3 code units
            b'h', 0x00, b'i', 0x00, // text
            0x00, 0x00,             // terminator
        ];
        let mut reader = PackageReader::new(&input);

        let text = reader.string_property()?;
        assert_eq!(text.encoding, TextEncoding::Utf16Le);
        assert_eq!(text.to_string_lossy(), "hi");
        assert_eq!(reader.position(), 7);

        Ok(())
    }

    #[test]
    fn null_terminated() -> crate::error::Result<()> {
        let input = [b'N', b'o', b'n', b'e', 0x00, 0x10];
        let mut reader = PackageReader::new(&input);

        assert_eq!(reader.null_terminated()?, b"None");
        assert_eq!(reader.position(), 5);
        assert!(reader.null_terminated().is_err());

        Ok(())
    }
}
