//! Sounds and music: a format tag and an opaque byte range.

use std::io::{Seek, SeekFrom};

use binrw::{BinRead, BinResult};
use byteorder::{ByteOrder, LittleEndian};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::compact::{eof, remaining, CompactIndex};
use crate::names::NameRef;

/// Body of both `Sound` and `Music` exports
#[derive(BinRead, Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little, import(version: u16))]
pub struct Audio {
    /// Name of the container format, e.g. `WAV` or `it`
    pub format: NameRef,
    #[br(if(version >= 63))]
    pub next_object_offset: Option<u32>,
    #[br(parse_with = audio_range)]
    pub range: AudioRange,
}

/// Location of the audio bytes in the package buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AudioRange {
    pub offset: u64,
    pub size: u64,
}

impl AudioRange {
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }

    /// The audio bytes, or `None` if the range lies outside `data`
    pub fn slice<'a>(&self, data: &'a [u8]) -> Option<&'a [u8]> {
        let start = usize::try_from(self.offset).ok()?;
        let end = usize::try_from(self.end()).ok()?;
        data.get(start..end)
    }
}

/// Reads the compact size and skips the bytes it covers
#[binrw::parser(reader, endian)]
fn audio_range() -> BinResult<AudioRange> {
    let pos = reader.stream_position()?;
    let size = CompactIndex::read_options(reader, endian, ())?;
    let size = u64::try_from(size.0).map_err(|_| binrw::Error::AssertFail {
        pos,
        message: format!("negative audio size {}", size.0),
    })?;

    let offset = reader.stream_position()?;
    let available = remaining(reader)?;
    if size > available {
        return Err(eof(&format!(
            "audio of {size} bytes with {available} bytes left"
        )));
    }
    reader.seek(SeekFrom::Start(offset + size))?;

    Ok(AudioRange { offset, size })
}

const SUBCHUNK_SIZE_PCM: u16 = 0x10;
const WAVE_FORMAT_PCM: u16 = 0x01;

/// Format chunk of an uncompressed RIFF wave file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct WaveFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub bit_depth: u16,
}

impl WaveFormat {
    /// Read the format chunk at its usual fixed position.
    ///
    /// Files with extra chunks before `fmt ` or a compressed format are not
    /// recognized and give `None`.
    pub fn parse(audio: &[u8]) -> Option<Self> {
        if audio.len() < 36 {
            return None;
        }
        if LittleEndian::read_u16(&audio[16..]) != SUBCHUNK_SIZE_PCM
            || LittleEndian::read_u16(&audio[20..]) != WAVE_FORMAT_PCM
        {
            return None;
        }

        Some(WaveFormat {
            channels: LittleEndian::read_u16(&audio[22..]),
            sample_rate: LittleEndian::read_u32(&audio[24..]),
            byte_rate: LittleEndian::read_u32(&audio[28..]),
            bit_depth: LittleEndian::read_u16(&audio[34..]),
        })
    }
}
