use binrw::BinRead;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::compact::TArray;
use crate::names::NameRef;
use crate::objects::mesh::MeshAnimSequence;
use crate::types::{Quaternion, Vector};

/// Skeletal animation keyframes shared by skeletal meshes
#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct Animation {
    pub bones: TArray<BoneReference>,
    pub movements: TArray<BoneMovement>,
    pub sequences: TArray<MeshAnimSequence>,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct BoneReference {
    pub name: NameRef,
    pub flags: u32,
    pub parent_index: u32,
}

/// Tracks of one animation sequence
#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct BoneMovement {
    pub root_speed: Vector,
    pub track_time: f32,
    pub start_bone: u32,
    pub flags: u32,
    pub bones: TArray<u32>,
    pub tracks: TArray<AnimationTrack>,
    pub root_track: AnimationTrack,
}

#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct AnimationTrack {
    pub flags: u32,
    pub key_quaternions: TArray<Quaternion>,
    pub key_positions: TArray<Vector>,
    pub key_times: TArray<f32>,
}
