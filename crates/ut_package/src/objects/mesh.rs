//! Vertex animated meshes and the skeletal meshes built on top of them.
//!
//! Each class extends the previous one: a [`LodMesh`] is a [`Mesh`] followed
//! by its level of detail arrays, and a [`SkeletalMesh`] is a [`LodMesh`]
//! followed by its skeleton.

use std::io::{Read, Seek};

use binrw::{BinRead, BinResult, Endian};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::compact::TArray;
use crate::names::NameRef;
use crate::table::ObjectRef;
use crate::types::{BoundingBox, BoundingSphere, Primitive, Quaternion, Rotator, Vector};

#[derive(BinRead, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little, import(version: u16))]
pub struct Mesh {
    #[br(args(version))]
    pub primitive: Primitive,
    #[br(if(version > 61))]
    pub vertices_jump: Option<u32>,
    pub vertices: TArray<MeshVertex>,
    #[br(if(version > 61))]
    pub triangles_jump: Option<u32>,
    pub triangles: TArray<MeshTriangle>,
    pub anim_sequences: TArray<MeshAnimSequence>,
    pub connects_jump: u32,
    pub connections: TArray<MeshConnection>,
    pub bounding_box_2: BoundingBox,
    #[br(args(version))]
    pub bounding_sphere_2: BoundingSphere,
    pub vert_links_jump: u32,
    pub vert_links: TArray<u32>,
    pub textures: TArray<ObjectRef>,
    pub bounding_boxes: TArray<BoundingBox>,
    #[br(args(version))]
    pub bounding_spheres: TArray<BoundingSphere>,
    pub frame_verts: u32,
    pub anim_frames: u32,
    pub and_flags: u32,
    pub or_flags: u32,
    pub scale: Vector,
    pub origin: Vector,
    pub rotation_origin: Rotator,
    pub cur_poly: u32,
    pub cur_vertex: u32,
    #[br(args(version))]
    pub texture_lod: TextureLod,
}

/// Vertex position packed into 32 bits: 11 bits x, 11 bits y, 10 bits z
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MeshVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl MeshVertex {
    pub fn unpack(packed: u32) -> Self {
        let wrap = |value: f32| if value > 128.0 { value - 256.0 } else { value };

        MeshVertex {
            x: wrap((packed & 0x7FF) as f32 / 8.0),
            y: wrap(((packed >> 11) & 0x7FF) as f32 / 8.0),
            z: wrap(((packed >> 22) & 0x3FF) as f32 / 4.0),
        }
    }
}

impl BinRead for MeshVertex {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        _: Self::Args<'_>,
    ) -> BinResult<Self> {
        u32::read_options(reader, endian, ()).map(Self::unpack)
    }
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct MeshTriangle {
    pub vertex_indices: [u16; 3],
    /// Texture coordinates of the three corners
    pub uvs: [TexCoord; 3],
    pub flags: u32,
    pub texture_index: u32,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct TexCoord {
    pub u: u8,
    pub v: u8,
}

#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct MeshAnimSequence {
    pub name: NameRef,
    pub group: NameRef,
    pub start_frame: u32,
    pub frame_count: u32,
    pub notifications: TArray<MeshAnimNotify>,
    pub rate: f32,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct MeshAnimNotify {
    pub time: u32,
    pub function_name: NameRef,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct MeshConnection {
    pub num_vert_triangles: u32,
    pub triangle_list_offset: u32,
}

/// Texture level of detail multipliers
#[derive(BinRead, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little, import(version: u16))]
pub enum TextureLod {
    #[br(pre_assert(version < 65))]
    Absent,
    #[br(pre_assert(version == 65))]
    Single(f32),
    #[br(pre_assert(version >= 66))]
    PerLevel(TArray<f32>),
}

impl TextureLod {
    pub fn values(&self) -> &[f32] {
        match self {
            TextureLod::Absent => &[],
            TextureLod::Single(value) => std::slice::from_ref(value),
            TextureLod::PerLevel(values) => values,
        }
    }
}

#[derive(BinRead, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little, import(version: u16))]
pub struct LodMesh {
    #[br(args(version))]
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub mesh: Mesh,
    pub collapse_point_thus: TArray<u16>,
    pub face_level: TArray<u16>,
    pub faces: TArray<LodMeshFace>,
    pub collapse_wedge_thus: TArray<u16>,
    pub wedges: TArray<LodMeshWedge>,
    pub materials: TArray<LodMeshMaterial>,
    pub special_faces: TArray<LodMeshFace>,
    pub model_vertices: u32,
    pub special_vertices: u32,
    pub mesh_scale_max: f32,
    pub lod_hysteresis: f32,
    pub lod_strength: f32,
    pub lod_min_verts: u32,
    pub lod_morph: f32,
    pub lod_z_displace: f32,
    pub remap_anim_vertices: TArray<u16>,
    pub old_frame_verts: u32,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct LodMeshFace {
    pub wedge_indices: [u16; 3],
    pub material_index: u16,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct LodMeshWedge {
    pub vertex_index: u16,
    pub s: u8,
    pub t: u8,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct LodMeshMaterial {
    pub flags: u32,
    pub texture_index: u32,
}

#[derive(BinRead, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little, import(version: u16))]
pub struct SkeletalMesh {
    #[br(args(version))]
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub lod_mesh: LodMesh,
    pub ext_wedges: TArray<ExtWedge>,
    pub points: TArray<Vector>,
    pub bones: TArray<MeshBone>,
    pub bone_weight_indices: TArray<BoneWeightIndex>,
    pub bone_weights: TArray<BoneWeight>,
    pub local_points: TArray<Vector>,
    pub skeletal_depth: u32,
    pub default_animation: ObjectRef,
    pub weapon_bone_index: u32,
    pub weapon_adjust: WeaponAdjust,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct ExtWedge {
    pub i_vertex: u16,
    pub flags: u16,
    pub u: f32,
    pub v: f32,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct MeshBone {
    pub name: NameRef,
    pub flags: u32,
    pub orientation: Quaternion,
    pub position: Vector,
    pub length: f32,
    pub x_size: f32,
    pub y_size: f32,
    pub z_size: f32,
    pub children_count: u32,
    pub parent_index: u32,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct BoneWeightIndex {
    pub weight_index: u16,
    pub number: u16,
    pub detail_a: u16,
    pub detail_b: u16,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct BoneWeight {
    pub point_index: u16,
    pub bone_weight: u16,
}

/// Where a weapon attaches to the weapon bone
#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct WeaponAdjust {
    pub origin: Vector,
    pub x_axis: Vector,
    pub y_axis: Vector,
    pub z_axis: Vector,
}
