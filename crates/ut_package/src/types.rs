//! Small geometry structs shared by properties and native objects.

use binrw::BinRead;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::table::ObjectRef;

/// Three 32 bit floats
#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Rotation in engine units, 65536 to a full turn. Values are not normalized.
#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct Rotator {
    pub pitch: i32,
    pub yaw: i32,
    pub roll: i32,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct Plane {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

/// An RGBA color
#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }
}

/// Scale with an optional sheer along one axis pair
#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct Scale {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub sheer_rate: u32,
    /// Index into [`SHEER_AXES`]
    pub sheer_axis: u8,
}

/// Engine names of the [`Scale::sheer_axis`] values
pub const SHEER_AXES: [&str; 7] = [
    "SHEER_None",
    "SHEER_XY",
    "SHEER_XZ",
    "SHEER_YX",
    "SHEER_YZ",
    "SHEER_ZX",
    "SHEER_ZY",
];

impl Scale {
    /// Engine name of the sheer axis, if it is a known one
    pub fn sheer_axis_name(&self) -> Option<&'static str> {
        SHEER_AXES.get(usize::from(self.sheer_axis)).copied()
    }
}

/// Location of an actor in the BSP
#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct PointRegion {
    pub zone: ObjectRef,
    pub i_leaf: u32,
    pub zone_number: u8,
}

/// Axis aligned box
#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct BoundingBox {
    pub min: Vector,
    pub max: Vector,
    #[br(map = |valid: u8| valid > 0)]
    pub valid: bool,
}

/// Sphere around a primitive; packages up to version 61 only store the center
#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little, import(version: u16))]
pub struct BoundingSphere {
    pub center: Vector,
    #[br(if(version > 61))]
    pub radius: Option<f32>,
}

/// Bounds every primitive (models and meshes) starts with
#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little, import(version: u16))]
pub struct Primitive {
    pub bounding_box: BoundingBox,
    #[br(args(version))]
    pub bounding_sphere: BoundingSphere,
}
