use binrw::{binread, BinRead};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::compact::{counted, CompactIndex};
use crate::flags::PolyFlags;
use crate::names::NameRef;
use crate::table::ObjectRef;
use crate::types::Vector;

/// The editable polygons of a brush
#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct Polys {
    pub poly_count: u32,
    /// The count is stored twice; the copy is skipped
    #[br(pad_before = 4, parse_with = counted, args(u64::from(poly_count), ()))]
    pub polygons: Vec<Polygon>,
}

#[binread]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct Polygon {
    #[br(temp)]
    vertex_count: u8,
    pub origin: Vector,
    pub normal: Vector,
    pub texture_u: Vector,
    pub texture_v: Vector,
    #[br(parse_with = counted, args(u64::from(vertex_count), ()))]
    pub vertices: Vec<Vector>,
    #[br(map = |bits: u32| PolyFlags::from_bits_retain(bits))]
    pub flags: PolyFlags,
    pub actor: ObjectRef,
    pub texture: ObjectRef,
    pub item_name: NameRef,
    pub link: CompactIndex,
    pub brush_poly: CompactIndex,
    #[br(map = |value: u16| pan(value))]
    pub pan_u: i32,
    #[br(map = |value: u16| pan(value))]
    pub pan_v: i32,
}

/// Texture pans are stored as 16 bits and sign extended above 0x8000
fn pan(value: u16) -> i32 {
    if value > 0x8000 {
        i32::from(value) - 0x1_0000
    } else {
        i32::from(value)
    }
}
