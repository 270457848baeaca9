use binrw::BinRead;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::compact::TArray;
use crate::names::NameRef;
use crate::objects::mesh::MeshAnimSequence;
use crate::types::{BoundingBox, Plane, Primitive, Rotator, Scale, Vector};

/// Polygon groups of a skeletal model mesh
pub const NUM_POLYGROUPS: usize = 16;

/// Skeletal model with its own joint hierarchy and per frame joint states
#[derive(BinRead, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little, import(version: u16))]
pub struct SkelModel {
    #[br(args(version))]
    pub primitive: Primitive,
    pub num_meshes: i32,
    pub num_joints: i32,
    pub num_frames: i32,
    pub num_sequences: i32,
    pub num_skins: i32,
    pub root_joint: i32,
    pub meshes: TArray<RMesh>,
    pub joints: TArray<RJoint>,
    pub anim_sequences: TArray<RSkelAnimSeq>,
    pub frames: TArray<RAnimFrame>,
    pub pos_offset: Vector,
    pub rot_offset: Rotator,
}

#[derive(BinRead, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct RMesh {
    pub num_verts: i32,
    pub num_tris: i32,
    pub triangles: TArray<RTriangle>,
    pub vertices: TArray<RVertex>,
    pub dec_count: i32,
    pub dec: TArray<i8>,
    pub poly_groups: [PolyGroup; NUM_POLYGROUPS],
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct PolyGroup {
    pub flags: i32,
    pub skin_name: NameRef,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct RTriangle {
    pub vertex_indices: [i16; 3],
    pub uvs: [i8; 6],
    pub polygroup: i8,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct RVertex {
    pub point1: Vector,
    pub point2: Vector,
    pub joint1: i32,
    pub joint2: i32,
    pub weight1: f32,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct RJoint {
    pub parent: i32,
    pub children: [i32; 4],
    pub name: NameRef,
    pub joint_group: i32,
    pub flags: i32,
    pub base_rot: Rotator,
    pub planes: [Plane; 6],
}

#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct RSkelAnimSeq {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub sequence: MeshAnimSequence,
    pub anim_data: TArray<i8>,
}

#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct RAnimFrame {
    pub sequence_id: i16,
    pub event: NameRef,
    pub bounds: BoundingBox,
    pub joint_anim: TArray<JointState>,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct JointState {
    pub pos: Vector,
    pub rot: Rotator,
    pub scale: Scale,
}
