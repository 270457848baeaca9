//! Builds small packages in memory for the integration tests.
#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use ut_package::CompactIndex;

pub const SIGNATURE: u32 = 0x9E2A_83C1;

/// Object flag marking a state frame ahead of the properties
pub const HAS_STACK: u32 = 0x0200_0000;

/// A property value as written to the stream
#[derive(Debug, Clone)]
pub enum Value {
    Byte(u8),
    Int(i32),
    Bool(bool),
    Float(f32),
    Object(i32),
    Name(&'static str),
    Str(&'static str),
}

struct Import {
    class_package: i32,
    class_name: i32,
    package: i32,
    name: i32,
}

struct Export {
    class: i32,
    package: i32,
    name: i32,
    flags: u32,
    body: Vec<u8>,
}

pub struct PackageBuilder {
    version: u16,
    names: Vec<String>,
    imports: Vec<Import>,
    exports: Vec<Export>,
}

impl PackageBuilder {
    pub fn new(version: u16) -> Self {
        let mut builder = PackageBuilder {
            version,
            names: Vec::new(),
            imports: Vec::new(),
            exports: Vec::new(),
        };
        builder.name("None");
        builder
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    /// Index of `name` in the name table, adding it when missing
    pub fn name(&mut self, name: &str) -> i32 {
        let index = match self.names.iter().position(|known| known == name) {
            Some(index) => index,
            None => {
                self.names.push(name.to_owned());
                self.names.len() - 1
            }
        };
        index as i32
    }

    /// Add an import and return its object reference
    pub fn import(&mut self, class_package: &str, class_name: &str, package: i32, name: &str) -> i32 {
        let import = Import {
            class_package: self.name(class_package),
            class_name: self.name(class_name),
            package,
            name: self.name(name),
        };
        self.imports.push(import);
        -(self.imports.len() as i32)
    }

    /// Import a class from `Engine`, creating the package import on first use
    pub fn engine_class(&mut self, class: &str) -> i32 {
        let engine = self.top_level_import("Engine");
        self.import("Core", "Class", engine, class)
    }

    /// Import of a top level package
    pub fn top_level_import(&mut self, package: &str) -> i32 {
        let name = self.name(package);
        let class = self.name("Package");
        match self
            .imports
            .iter()
            .position(|import| import.name == name && import.class_name == class && import.package == 0)
        {
            Some(index) => -(index as i32) - 1,
            None => self.import("Core", "Package", 0, package),
        }
    }

    /// Add an export and return its object reference
    pub fn export(&mut self, class: i32, package: i32, name: &str, flags: u32, body: Vec<u8>) -> i32 {
        let export = Export {
            class,
            package,
            name: self.name(name),
            flags,
            body,
        };
        self.exports.push(export);
        self.exports.len() as i32
    }

    /// A property stream ending in `None`
    pub fn properties(&mut self, properties: &[(&str, Value)]) -> Vec<u8> {
        let mut out = Vec::new();
        for (name, value) in properties {
            out.extend(CompactIndex::encode(self.name(name)));
            match value {
                Value::Byte(value) => {
                    out.push(0x01);
                    out.push(*value);
                }
                Value::Int(value) => {
                    out.push(0x22);
                    out.write_i32::<LittleEndian>(*value).unwrap();
                }
                Value::Bool(value) => out.push(if *value { 0x83 } else { 0x03 }),
                Value::Float(value) => {
                    out.push(0x24);
                    out.write_f32::<LittleEndian>(*value).unwrap();
                }
                Value::Object(value) => {
                    let payload = CompactIndex::encode(*value);
                    out.push(0x55);
                    out.push(payload.len() as u8);
                    out.extend(payload);
                }
                Value::Name(value) => {
                    let payload = CompactIndex::encode(self.name(value));
                    out.push(0x56);
                    out.push(payload.len() as u8);
                    out.extend(payload);
                }
                Value::Str(value) => {
                    let mut payload = CompactIndex::encode(value.len() as i32 + 1);
                    payload.extend(value.as_bytes());
                    payload.push(0);
                    out.push(0x5D);
                    out.push(payload.len() as u8);
                    out.extend(payload);
                }
            }
        }
        out.extend(CompactIndex::encode(self.name("None")));
        out
    }

    fn header_len(&self) -> usize {
        if self.version >= 68 {
            36 + 16 + 4 + 8
        } else {
            36 + 8
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let bodies_start = self.header_len();
        let bodies_len: usize = self.exports.iter().map(|export| export.body.len()).sum();

        let mut names = Vec::new();
        for name in &self.names {
            if self.version <= 63 {
                names.extend(name.as_bytes());
                names.push(0);
            } else {
                names.push(name.len() as u8 + 1);
                names.extend(name.as_bytes());
                names.push(0);
            }
            names.write_u32::<LittleEndian>(0x0007_0010).unwrap();
        }

        let mut imports = Vec::new();
        for import in &self.imports {
            imports.extend(CompactIndex::encode(import.class_package));
            imports.extend(CompactIndex::encode(import.class_name));
            imports.write_i32::<LittleEndian>(import.package).unwrap();
            imports.extend(CompactIndex::encode(import.name));
        }

        let mut exports = Vec::new();
        let mut offset = bodies_start;
        for export in &self.exports {
            exports.extend(CompactIndex::encode(export.class));
            exports.extend(CompactIndex::encode(0));
            exports.write_i32::<LittleEndian>(export.package).unwrap();
            exports.extend(CompactIndex::encode(export.name));
            exports.write_u32::<LittleEndian>(export.flags).unwrap();
            exports.extend(CompactIndex::encode(export.body.len() as i32));
            if !export.body.is_empty() {
                exports.extend(CompactIndex::encode(offset as i32));
            }
            offset += export.body.len();
        }

        let name_offset = bodies_start + bodies_len;
        let import_offset = name_offset + names.len();
        let export_offset = import_offset + imports.len();

        let mut out = Vec::new();
        out.write_u32::<LittleEndian>(SIGNATURE).unwrap();
        out.write_u16::<LittleEndian>(self.version).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u32::<LittleEndian>(0x0000_0001).unwrap();
        out.write_u32::<LittleEndian>(self.names.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(name_offset as u32).unwrap();
        out.write_u32::<LittleEndian>(self.exports.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(export_offset as u32).unwrap();
        out.write_u32::<LittleEndian>(self.imports.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(import_offset as u32).unwrap();
        if self.version >= 68 {
            for part in [0x0123_4567u32, 0x89AB_CDEF, 0x0011_2233, 0x4455_6677] {
                out.write_u32::<LittleEndian>(part).unwrap();
            }
            out.write_u32::<LittleEndian>(1).unwrap();
            out.write_u32::<LittleEndian>(self.exports.len() as u32).unwrap();
            out.write_u32::<LittleEndian>(self.names.len() as u32).unwrap();
        } else {
            out.write_u32::<LittleEndian>(1).unwrap();
            out.write_u32::<LittleEndian>(0).unwrap();
        }
        assert_eq!(out.len(), bodies_start);

        for export in &self.exports {
            out.extend(&export.body);
        }
        out.extend(names);
        out.extend(imports);
        out.extend(exports);
        out
    }
}

/// Native body of a one mip texture
pub fn texture_body(version: u16, width: u32, height: u32, pixels: &[u8]) -> Vec<u8> {
    let mut out = vec![0x01];
    if version >= 63 {
        out.write_u32::<LittleEndian>(0).unwrap();
    }
    out.extend(CompactIndex::encode(pixels.len() as i32));
    out.extend(pixels);
    out.write_u32::<LittleEndian>(width).unwrap();
    out.write_u32::<LittleEndian>(height).unwrap();
    out.push(width.trailing_zeros() as u8);
    out.push(height.trailing_zeros() as u8);
    out
}

/// Native body of a palette
pub fn palette_body(colors: &[[u8; 4]]) -> Vec<u8> {
    let mut out = CompactIndex::encode(colors.len() as i32);
    for color in colors {
        out.extend(color);
    }
    out
}

/// Native body of a sound holding `audio`
pub fn sound_body(version: u16, format: i32, audio: &[u8]) -> Vec<u8> {
    let mut out = CompactIndex::encode(format);
    if version >= 63 {
        out.write_u32::<LittleEndian>(0).unwrap();
    }
    out.extend(CompactIndex::encode(audio.len() as i32));
    out.extend(audio);
    out
}

/// A minimal RIFF file with a PCM format chunk
pub fn wave_file(channels: u16, sample_rate: u32, bit_depth: u16) -> Vec<u8> {
    let block_align = channels * bit_depth / 8;
    let mut out = b"RIFF".to_vec();
    out.write_u32::<LittleEndian>(36).unwrap();
    out.extend(b"WAVEfmt ");
    out.write_u32::<LittleEndian>(0x10).unwrap();
    out.write_u16::<LittleEndian>(1).unwrap();
    out.write_u16::<LittleEndian>(channels).unwrap();
    out.write_u32::<LittleEndian>(sample_rate).unwrap();
    out.write_u32::<LittleEndian>(sample_rate * u32::from(block_align))
        .unwrap();
    out.write_u16::<LittleEndian>(block_align).unwrap();
    out.write_u16::<LittleEndian>(bit_depth).unwrap();
    out.extend(b"data");
    out.write_u32::<LittleEndian>(0).unwrap();
    out
}

/// Native body of a version 68 model with empty BSP arrays
pub fn model_body(polys: i32) -> Vec<u8> {
    // bounding box and sphere
    let mut out = vec![0; 25 + 16];
    // vectors, points, nodes, surfaces, vertices
    out.extend([0x00; 5]);
    // shared sides, zone count
    out.extend([0x00; 8]);
    out.extend(CompactIndex::encode(polys));
    // light maps, light bits, bounds, leaf hulls, leaves, lights
    out.extend([0x00; 6]);
    out.write_u32::<LittleEndian>(1).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out
}

/// Native body of a polygon list holding one triangle per texture
pub fn polys_body(textures: &[i32], flags: u32) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u32::<LittleEndian>(textures.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(textures.len() as u32).unwrap();
    for &texture in textures {
        out.push(3);
        // origin, normal, texture u, texture v
        for value in [0.0f32, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
            out.write_f32::<LittleEndian>(value).unwrap();
        }
        for value in [0.0f32, 0.0, 0.0, 64.0, 0.0, 0.0, 0.0, 64.0, 0.0] {
            out.write_f32::<LittleEndian>(value).unwrap();
        }
        out.write_u32::<LittleEndian>(flags).unwrap();
        out.extend(CompactIndex::encode(0));
        out.extend(CompactIndex::encode(texture));
        out.extend(CompactIndex::encode(0));
        out.extend(CompactIndex::encode(-1));
        out.extend(CompactIndex::encode(0));
        out.write_u16::<LittleEndian>(0xFFF0).unwrap();
        out.write_u16::<LittleEndian>(16).unwrap();
    }
    out
}

/// A state frame without a node, as written ahead of the properties of
/// objects flagged [`HAS_STACK`]
pub fn empty_state_frame() -> Vec<u8> {
    let mut out = vec![0x00, 0x00];
    out.write_i64::<LittleEndian>(-1).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out
}
