//! BSP models: level geometry and brushes.

use binrw::{binread, BinRead};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::compact::{counted, CompactIndex, TArray};
use crate::table::ObjectRef;
use crate::types::{BoundingBox, Plane, Primitive, Vector};

#[derive(BinRead, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little, import(version: u16))]
pub struct Model {
    #[br(args(version))]
    pub primitive: Primitive,
    #[br(args(version))]
    pub geometry: ModelGeometry,
    /// The [`crate::objects::Polys`] the model was built from
    pub polys: ObjectRef,
    pub light_maps: TArray<LightMap>,
    pub light_bits: TArray<u8>,
    pub bounds: TArray<BoundingBox>,
    pub leaf_hulls: TArray<i32>,
    pub leaves: TArray<BspLeaf>,
    pub lights: TArray<ObjectRef>,
    #[br(if(version <= 61))]
    pub leaf_zone: Option<CompactIndex>,
    #[br(if(version <= 61))]
    pub leaf_leaf: Option<CompactIndex>,
    #[br(map = |value: u32| value > 0)]
    pub root_outside: bool,
    #[br(map = |value: u32| value > 0)]
    pub linked: bool,
}

impl Model {
    /// The BSP arrays, absent in packages up to version 61
    pub fn bsp(&self) -> Option<&BspGeometry> {
        match &self.geometry {
            ModelGeometry::Bsp(bsp) => Some(bsp),
            ModelGeometry::Legacy { .. } => None,
        }
    }
}

#[derive(BinRead, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little, import(version: u16))]
pub enum ModelGeometry {
    /// Placeholders that early packages store instead of the arrays
    #[br(pre_assert(version <= 61))]
    Legacy {
        vectors: CompactIndex,
        points: CompactIndex,
        nodes: CompactIndex,
        surfaces: CompactIndex,
        vertices: CompactIndex,
    },
    #[br(pre_assert(version > 61))]
    Bsp(#[br(args(version))] BspGeometry),
}

#[binread]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little, import(version: u16))]
pub struct BspGeometry {
    pub vectors: TArray<Vector>,
    pub points: TArray<Vector>,
    pub nodes: TArray<BspNode>,
    pub surfaces: TArray<BspSurface>,
    pub vertices: TArray<ModelVertex>,
    pub shared_sides: i32,
    #[br(temp, assert(zone_count >= 0, "negative zone count {}", zone_count))]
    zone_count: i32,
    #[br(parse_with = counted, args(zone_count as u64, (version,)))]
    pub zones: Vec<Zone>,
}

#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct BspNode {
    pub plane: Plane,
    pub zone_mask: u64,
    pub node_flags: u8,
    pub i_vert_pool: CompactIndex,
    pub i_surf: CompactIndex,
    pub i_front: CompactIndex,
    pub i_back: CompactIndex,
    pub i_plane: CompactIndex,
    pub i_collision_bound: CompactIndex,
    pub i_render_bound: CompactIndex,
    pub i_zone: [CompactIndex; 2],
    pub vertices: u8,
    pub i_leaf: [u32; 2],
}

#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct BspSurface {
    pub texture: ObjectRef,
    pub poly_flags: u32,
    pub p_base: CompactIndex,
    pub v_normal: CompactIndex,
    pub v_texture_u: CompactIndex,
    pub v_texture_v: CompactIndex,
    pub i_light_map: CompactIndex,
    pub i_brush_poly: CompactIndex,
    pub pan_u: i16,
    pub pan_v: i16,
    pub actor: ObjectRef,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct ModelVertex {
    pub vertex: CompactIndex,
    pub i_side: CompactIndex,
}

#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little, import(version: u16))]
pub struct Zone {
    pub actor: ObjectRef,
    pub connectivity: u64,
    pub visibility: u64,
    #[br(if(version < 63))]
    pub last_render_time: Option<f32>,
}

#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct LightMap {
    pub data_offset: u32,
    pub pan: Vector,
    pub u_clamp: CompactIndex,
    pub v_clamp: CompactIndex,
    pub u_scale: f32,
    pub v_scale: f32,
    pub i_light_actors: i32,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct BspLeaf {
    pub i_zone: CompactIndex,
    pub i_permeating: CompactIndex,
    pub i_volumetric: CompactIndex,
    pub visible_zones: u64,
}
