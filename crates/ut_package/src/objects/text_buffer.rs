use std::io::Seek;

use binrw::{BinRead, BinResult};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::compact::CompactIndex;
use crate::text::{read_terminated, RawText};

/// Script source and other stored text
#[derive(BinRead, Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct TextBuffer {
    pub pos: u32,
    pub top: u32,
    /// `None` when the stored size is zero
    #[br(parse_with = contents)]
    pub contents: Option<RawText>,
}

/// A compact size counting the terminator, then the text
#[binrw::parser(reader, endian)]
fn contents() -> BinResult<Option<RawText>> {
    let pos = reader.stream_position()?;
    let size = CompactIndex::read_options(reader, endian, ())?;
    let size = u64::try_from(size.0).map_err(|_| binrw::Error::AssertFail {
        pos,
        message: format!("negative text size {}", size.0),
    })?;

    if size == 0 {
        return Ok(None);
    }
    Ok(Some(RawText::single_byte(read_terminated(reader, size, 1)?)))
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinRead;
    use pretty_assertions::assert_eq;

    use crate::objects::text_buffer::TextBuffer;

    #[test]
    fn read_text_buffer() -> binrw::BinResult<()> {
        #[rustfmt::skip]
        let input = [
            0x01, 0x00, 0x00, 0x00, // pos
            0x02, 0x00, 0x00, 0x00, // top
            0x04,                   // size
            b'a', b'b', b'c', 0x00,
            0xEE,
        ];
        let mut cursor = Cursor::new(input);
        let text = TextBuffer::read_le(&mut cursor)?;

        assert_eq!((text.pos, text.top), (1, 2));
        assert_eq!(text.contents.map(|raw| raw.to_string_lossy()), Some("abc".to_owned()));
        assert_eq!(cursor.position(), 13);

        Ok(())
    }

    #[test]
    fn empty_text_buffer() -> binrw::BinResult<()> {
        let input = [0, 0, 0, 0, 0, 0, 0, 0, 0x00];
        let text = TextBuffer::read_le(&mut Cursor::new(input))?;

        assert_eq!(text.contents, None);

        Ok(())
    }
}
