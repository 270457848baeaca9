use binrw::{binread, BinRead};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::compact::{counted, TArray};
use crate::table::ObjectRef;

#[binread]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct Font {
    #[br(temp)]
    texture_count: u8,
    #[br(parse_with = counted, args(u64::from(texture_count), ()))]
    pub textures: Vec<FontTexture>,
}

/// Glyphs cut out of one texture page
#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct FontTexture {
    pub texture: ObjectRef,
    pub characters: TArray<FontCharacter>,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct FontCharacter {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}
