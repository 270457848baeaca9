//! Native bodies that follow the property stream of certain classes.
//!
//! Every decoder here starts reading at [`crate::PropertyBlock::end_offset`]
//! and takes the package version as its only argument.

pub mod animation;
pub mod audio;
pub mod font;
pub mod level;
pub mod mesh;
pub mod model;
pub mod polys;
pub mod skel;
pub mod text_buffer;
pub mod texture;

use std::fmt;

use tracing::debug;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::Result;
use crate::reader::PackageReader;

pub use animation::Animation;
pub use audio::{Audio, AudioRange};
pub use font::Font;
pub use level::{Level, LevelBase};
pub use mesh::{LodMesh, Mesh, SkeletalMesh};
pub use model::Model;
pub use polys::Polys;
pub use skel::SkelModel;
pub use text_buffer::TextBuffer;
pub use texture::{MipMap, Palette, Texture};

/// Classes whose exports carry a native body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum NativeClass {
    Animation,
    Font,
    Level,
    LevelBase,
    LodMesh,
    Mesh,
    Model,
    Music,
    Palette,
    Polys,
    SkeletalMesh,
    SkelModel,
    Sound,
    TextBuffer,
    Texture,
}

impl NativeClass {
    /// Match a class name exactly as the engine spells it
    pub fn from_name(name: &str) -> Option<Self> {
        let class = match name {
            "Animation" => NativeClass::Animation,
            "Font" => NativeClass::Font,
            "Level" => NativeClass::Level,
            "LevelBase" => NativeClass::LevelBase,
            "LodMesh" => NativeClass::LodMesh,
            "Mesh" => NativeClass::Mesh,
            "Model" => NativeClass::Model,
            "Music" => NativeClass::Music,
            "Palette" => NativeClass::Palette,
            "Polys" => NativeClass::Polys,
            "SkeletalMesh" => NativeClass::SkeletalMesh,
            "SkelModel" => NativeClass::SkelModel,
            "Sound" => NativeClass::Sound,
            "TextBuffer" => NativeClass::TextBuffer,
            "Texture" => NativeClass::Texture,
            _ => return None,
        };
        Some(class)
    }
}

impl fmt::Display for NativeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A decoded native body
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(tag = "class", content = "data"))]
pub enum ObjectData {
    Animation(Animation),
    Font(Font),
    Level(Level),
    LevelBase(LevelBase),
    LodMesh(Box<LodMesh>),
    Mesh(Box<Mesh>),
    Model(Model),
    Music(Audio),
    Palette(Palette),
    Polys(Polys),
    SkeletalMesh(Box<SkeletalMesh>),
    SkelModel(Box<SkelModel>),
    Sound(Audio),
    TextBuffer(TextBuffer),
    Texture(Texture),
    /// The class has no native body
    None,
}

impl ObjectData {
    /// Decode the body of `class` at the reader's position
    pub fn decode(class: Option<NativeClass>, reader: &mut PackageReader<'_>, version: u16) -> Result<Self> {
        let Some(class) = class else {
            return Ok(ObjectData::None);
        };
        debug!(%class, offset = reader.position(), "decoding native body");

        let args = (version,);
        let data = match class {
            NativeClass::Animation => ObjectData::Animation(reader.read()?),
            NativeClass::Font => ObjectData::Font(reader.read()?),
            NativeClass::Level => ObjectData::Level(reader.read_args(args)?),
            NativeClass::LevelBase => ObjectData::LevelBase(reader.read()?),
            NativeClass::LodMesh => ObjectData::LodMesh(Box::new(reader.read_args(args)?)),
            NativeClass::Mesh => ObjectData::Mesh(Box::new(reader.read_args(args)?)),
            NativeClass::Model => ObjectData::Model(reader.read_args(args)?),
            NativeClass::Music => ObjectData::Music(reader.read_args(args)?),
            NativeClass::Palette => ObjectData::Palette(reader.read()?),
            NativeClass::Polys => ObjectData::Polys(reader.read()?),
            NativeClass::SkeletalMesh => {
                ObjectData::SkeletalMesh(Box::new(reader.read_args(args)?))
            }
            NativeClass::SkelModel => ObjectData::SkelModel(Box::new(reader.read_args(args)?)),
            NativeClass::Sound => ObjectData::Sound(reader.read_args(args)?),
            NativeClass::TextBuffer => ObjectData::TextBuffer(reader.read()?),
            NativeClass::Texture => ObjectData::Texture(reader.read_args(args)?),
        };

        Ok(data)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ObjectData::None)
    }

    pub fn as_texture(&self) -> Option<&Texture> {
        match self {
            ObjectData::Texture(texture) => Some(texture),
            _ => None,
        }
    }

    pub fn as_palette(&self) -> Option<&Palette> {
        match self {
            ObjectData::Palette(palette) => Some(palette),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&Model> {
        match self {
            ObjectData::Model(model) => Some(model),
            _ => None,
        }
    }

    pub fn as_polys(&self) -> Option<&Polys> {
        match self {
            ObjectData::Polys(polys) => Some(polys),
            _ => None,
        }
    }

    /// Audio of both sounds and music
    pub fn as_audio(&self) -> Option<&Audio> {
        match self {
            ObjectData::Sound(audio) | ObjectData::Music(audio) => Some(audio),
            _ => None,
        }
    }

    pub fn as_level(&self) -> Option<&Level> {
        match self {
            ObjectData::Level(level) => Some(level),
            _ => None,
        }
    }

    pub fn as_text_buffer(&self) -> Option<&TextBuffer> {
        match self {
            ObjectData::TextBuffer(text) => Some(text),
            _ => None,
        }
    }
}
