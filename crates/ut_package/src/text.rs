//! Text stored inside packages.
//!
//! The format only ever uses two encodings: a single byte code page
//! (Windows-1252) and UTF-16LE. Decoders hand back the raw bytes tagged with
//! the encoding; turning them into a [`String`] is the job of a [`TextDecoder`].

use std::fmt::Debug;
use std::io::{Read, Seek};

use binrw::{BinRead, BinResult};
use widestring::U16Str;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::compact::read_bytes;

/// The encoding of a [`RawText`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TextEncoding {
    /// One byte per character, Windows-1252 code page
    #[default]
    SingleByte,
    /// Two bytes per character, little endian UTF-16
    Utf16Le,
}

impl TextEncoding {
    /// Bytes per code unit
    pub const fn width(self) -> usize {
        match self {
            TextEncoding::SingleByte => 1,
            TextEncoding::Utf16Le => 2,
        }
    }
}

/// Undecoded text, terminator excluded
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RawText {
    pub encoding: TextEncoding,
    pub bytes: Vec<u8>,
}

impl RawText {
    pub fn single_byte(bytes: impl Into<Vec<u8>>) -> Self {
        RawText {
            encoding: TextEncoding::SingleByte,
            bytes: bytes.into(),
        }
    }

    pub fn utf16(bytes: impl Into<Vec<u8>>) -> Self {
        RawText {
            encoding: TextEncoding::Utf16Le,
            bytes: bytes.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode with the [`DefaultTextDecoder`]
    pub fn to_string_lossy(&self) -> String {
        DefaultTextDecoder.decode(self)
    }
}

/// Service turning [`RawText`] into a [`String`]
pub trait TextDecoder: Debug + Send + Sync {
    fn decode(&self, text: &RawText) -> String;
}

/// Windows-1252 for single byte text, lossy UTF-16LE for wide text
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTextDecoder;

/// Windows-1252 code points for 0x80..=0x9F; the rest of the page matches Latin-1
#[rustfmt::skip]
const WINDOWS_1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

impl TextDecoder for DefaultTextDecoder {
    fn decode(&self, text: &RawText) -> String {
        match text.encoding {
            TextEncoding::SingleByte => text
                .bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => WINDOWS_1252_HIGH[usize::from(b - 0x80)],
                    _ => char::from(b),
                })
                .collect(),
            TextEncoding::Utf16Le => {
                let units = text
                    .bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect::<Vec<u16>>();
                U16Str::from_slice(&units).to_string_lossy()
            }
        }
    }
}

/// Text prefixed by a one byte length that counts the trailing NUL
#[binrw::parser(reader, endian)]
pub(crate) fn sized_text() -> BinResult<RawText> {
    let size = u8::read_options(reader, endian, ())?;
    Ok(RawText::single_byte(read_terminated(reader, size.into(), 1)?))
}

/// A compact index counted list of [`sized_text`] entries
#[binrw::parser(reader, endian)]
pub(crate) fn sized_text_list() -> BinResult<Vec<RawText>> {
    let pos = reader.stream_position()?;
    let count = crate::compact::CompactIndex::read_options(reader, endian, ())?;
    let count = u64::try_from(count.0).map_err(|_| binrw::Error::AssertFail {
        pos,
        message: format!("negative text count {}", count.0),
    })?;

    let available = crate::compact::remaining(reader)?;
    if count > available {
        return Err(crate::compact::eof("text list longer than remaining input"));
    }

    (0..count).map(|_| sized_text(reader, endian, ())).collect()
}

/// Read `units` code units of `width` bytes, dropping the final (terminating) unit
pub(crate) fn read_terminated<R: Read + Seek>(
    reader: &mut R,
    units: u64,
    width: u64,
) -> BinResult<Vec<u8>> {
    let mut bytes = read_bytes(reader, units * width)?;
    bytes.truncate(units.saturating_sub(1) as usize * width as usize);
    Ok(bytes)
}
