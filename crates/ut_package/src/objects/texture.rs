use binrw::{binread, BinRead};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::compact::{compact_bytes, counted, TArray};
use crate::error::{Error, Result};
use crate::types::Color;

/// A palette indexed image and its reduced resolution copies
#[binread]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little, import(version: u16))]
pub struct Texture {
    #[br(temp)]
    mip_count: u8,
    #[br(parse_with = counted, args(u64::from(mip_count), (version,)))]
    pub mips: Vec<MipMap>,
}

impl Texture {
    /// The full resolution image
    pub fn first_mip(&self) -> Option<&MipMap> {
        self.mips.first()
    }
}

#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little, import(version: u16))]
pub struct MipMap {
    /// Offset just past this mip's pixel data
    #[br(if(version >= 63))]
    pub width_offset: Option<u32>,
    /// One palette index per pixel
    #[br(parse_with = compact_bytes)]
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub bits_width: u8,
    pub bits_height: u8,
}

impl MipMap {
    /// Look every pixel up in `palette`
    pub fn expand(&self, palette: &Palette) -> Result<Vec<Color>> {
        self.data
            .iter()
            .map(|&index| {
                palette
                    .colors
                    .get(usize::from(index))
                    .copied()
                    .ok_or(Error::PaletteIndex {
                        index,
                        len: palette.colors.len(),
                    })
            })
            .collect()
    }
}

/// Color table shared by textures
#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct Palette {
    pub colors: TArray<Color>,
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinRead;
    use pretty_assertions::assert_eq;

    use crate::compact::TArray;
    use crate::error::Error;
    use crate::objects::texture::{MipMap, Palette, Texture};
    use crate::types::Color;

    const RED: Color = Color::new(255, 0, 0, 255);
    const GREEN: Color = Color::new(0, 255, 0, 255);

    #[rustfmt::skip]
    const TEXTURE: [u8; 20] = [
        0x01,                   // mip count
        0x13, 0x00, 0x00, 0x00, // width offset
        0x04,                   // size
        0x00, 0x01, 0x01, 0x00, // pixels
        0x02, 0x00, 0x00, 0x00, // width
        0x02, 0x00, 0x00, 0x00, // height
        0x01,                   // bits width
        0x01,                   // bits height
    ];

    #[test]
    fn read_texture() -> binrw::BinResult<()> {
        let mut input = Cursor::new(TEXTURE);
        let texture = Texture::read_le_args(&mut input, (68,))?;

        assert_eq!(texture.mips.len(), 1);
        let mip = &texture.mips[0];
        assert_eq!(mip.width_offset, Some(0x13));
        assert_eq!(mip.data, vec![0, 1, 1, 0]);
        assert_eq!((mip.width, mip.height), (2, 2));
        assert_eq!(input.position(), 20);

        Ok(())
    }

    #[test]
    fn read_texture_without_width_offset() -> binrw::BinResult<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new([
            0x01,
            0x01, 0x07,
            0x01, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ]);
        let texture = Texture::read_le_args(&mut input, (61,))?;

        assert_eq!(texture.mips[0].width_offset, None);
        assert_eq!(texture.mips[0].data, vec![7]);
        assert_eq!(input.position(), 13);

        Ok(())
    }

    #[test]
    fn read_palette() -> binrw::BinResult<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new([
            0x02,                   // count
            0xFF, 0x00, 0x00, 0xFF,
            0x00, 0xFF, 0x00, 0xFF,
        ]);
        let palette = Palette::read_le(&mut input)?;

        assert_eq!(palette.colors.0, vec![RED, GREEN]);

        Ok(())
    }

    #[test]
    fn expand_pixels() -> crate::error::Result<()> {
        let palette = Palette {
            colors: TArray(vec![RED, GREEN]),
        };
        let mip = MipMap {
            data: vec![0, 1, 1, 0],
            width: 2,
            height: 2,
            ..Default::default()
        };

        assert_eq!(mip.expand(&palette)?, vec![RED, GREEN, GREEN, RED]);

        Ok(())
    }

    #[test]
    fn expand_index_outside_palette() {
        let palette = Palette {
            colors: TArray(vec![RED]),
        };
        let mip = MipMap {
            data: vec![0, 3],
            ..Default::default()
        };

        assert!(matches!(
            mip.expand(&palette),
            Err(Error::PaletteIndex { index: 3, len: 1 })
        ));
    }

    #[test]
    fn truncated_pixels() {
        let mut input = Cursor::new(&TEXTURE[..8]);
        let err = Texture::read_le_args(&mut input, (68,)).unwrap_err();
        assert!(crate::reader::is_eof(&err));
    }
}
