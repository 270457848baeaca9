//! The tagged property stream that starts every serialized export.
//!
//! Each property is introduced by a name reference and an info byte:
//!
//! | Bits | Meaning                                                 |
//! |------|---------------------------------------------------------|
//! | 0-3  | [`PropertyType`] tag                                    |
//! | 4-6  | Size selector: 1, 2, 4, 12, 16 bytes, or a u8/u16/u32 that holds the size |
//! | 7    | Array element marker, or the value of a boolean property |
//!
//! Struct properties follow the info byte with the struct name. The stream
//! ends with a property named `None`.

use binrw::BinRead;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::compact::CompactIndex;
use crate::error::Result;
use crate::flags::ObjectFlags;
use crate::names::{NameRef, NameTable};
use crate::reader::PackageReader;
use crate::table::ObjectRef;
use crate::text::TextDecoder;
use crate::types::{Color, PointRegion, Rotator, Scale, Vector};

/// Name of the property that ends a stream
pub const TERMINATOR: &str = "None";

/// Subtype given to the elements of a static array
pub const ARRAY_SUBTYPE: &str = "Array";

/// Type tag of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum PropertyType {
    Unknown,
    Byte,
    Integer,
    Boolean,
    Float,
    Object,
    Name,
    String,
    Class,
    Array,
    Struct,
    Vector,
    Rotator,
    Str,
    Map,
    FixedArray,
}

impl PropertyType {
    /// Type for the low four bits of an info byte
    pub fn from_tag(tag: u8) -> Self {
        match tag & 0x0F {
            1 => PropertyType::Byte,
            2 => PropertyType::Integer,
            3 => PropertyType::Boolean,
            4 => PropertyType::Float,
            5 => PropertyType::Object,
            6 => PropertyType::Name,
            7 => PropertyType::String,
            8 => PropertyType::Class,
            9 => PropertyType::Array,
            10 => PropertyType::Struct,
            11 => PropertyType::Vector,
            12 => PropertyType::Rotator,
            13 => PropertyType::Str,
            14 => PropertyType::Map,
            15 => PropertyType::FixedArray,
            _ => PropertyType::Unknown,
        }
    }

    /// Engine name of the type
    pub fn name(self) -> &'static str {
        match self {
            PropertyType::Unknown => "Unknown",
            PropertyType::Byte => "Byte",
            PropertyType::Integer => "Integer",
            PropertyType::Boolean => "Boolean",
            PropertyType::Float => "Float",
            PropertyType::Object => "Object",
            PropertyType::Name => "Name",
            PropertyType::String => "String",
            PropertyType::Class => "Class",
            PropertyType::Array => "Array",
            PropertyType::Struct => "Struct",
            PropertyType::Vector => "Vector",
            PropertyType::Rotator => "Rotator",
            PropertyType::Str => "Str",
            PropertyType::Map => "Map",
            PropertyType::FixedArray => "Fixed Array",
        }
    }
}

/// Value of a struct property
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(untagged))]
pub enum StructValue {
    Color(Color),
    Vector(Vector),
    Rotator(Rotator),
    Scale(Scale),
    PointRegion(PointRegion),
}

/// Decoded value of a property
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(untagged))]
pub enum PropertyValue {
    Byte(u8),
    Integer(i32),
    Boolean(bool),
    Float(f32),
    /// Unresolved reference, see [`crate::Package::resolve`]
    Object(ObjectRef),
    Name(String),
    Struct(StructValue),
    Str(String),
    /// Class properties carry no value in the stream
    Unset,
    /// A payload shape that is not decoded; its bytes were stepped over
    Skipped { offset: u64, size: u32 },
}

impl PropertyValue {
    pub fn as_object(&self) -> Option<ObjectRef> {
        match self {
            PropertyValue::Object(index) => Some(*index),
            _ => None,
        }
    }

    /// Text of `Name` and `Str` values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Name(text) | PropertyValue::Str(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric value of `Byte`, `Integer` and `Float` values
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Byte(value) => Some(f64::from(*value)),
            PropertyValue::Integer(value) => Some(f64::from(*value)),
            PropertyValue::Float(value) => Some(f64::from(*value)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Property {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: PropertyType,
    /// Struct name for struct properties, [`ARRAY_SUBTYPE`] for other array elements
    pub subtype: Option<String>,
    /// Position within a static array
    pub array_index: Option<u32>,
    /// Declared payload length
    pub size: u32,
    pub value: PropertyValue,
}

impl Property {
    pub fn is_array_element(&self) -> bool {
        self.array_index.is_some()
    }
}

/// Execution state saved ahead of the properties of objects with
/// [`ObjectFlags::HAS_STACK`]
#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct StateFrame {
    pub node: ObjectRef,
    pub state_node: ObjectRef,
    pub probe_mask: i64,
    pub latent_action: u32,
    #[br(if(!node.is_null()))]
    pub offset: Option<CompactIndex>,
}

/// The decoded property stream of an export
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PropertyBlock {
    pub state_frame: Option<StateFrame>,
    pub properties: Vec<Property>,
    /// Offset just past the terminating `None`, where the native body starts
    pub end_offset: u64,
}

impl PropertyBlock {
    /// Decode the stream starting at `offset` of `data`
    pub fn decode(
        data: &[u8],
        offset: u64,
        names: &NameTable,
        decoder: &dyn TextDecoder,
        flags: ObjectFlags,
    ) -> Result<Self> {
        let mut reader = PackageReader::at(data, offset);
        decode_properties(&mut reader, names, decoder, flags)
    }

    /// First property called `name`, ignoring ASCII case
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|property| property.name.eq_ignore_ascii_case(name))
    }

    pub fn value(&self, name: &str) -> Option<&PropertyValue> {
        self.get(name).map(|property| &property.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl<'a> IntoIterator for &'a PropertyBlock {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub(crate) fn decode_properties(
    reader: &mut PackageReader<'_>,
    names: &NameTable,
    decoder: &dyn TextDecoder,
    flags: ObjectFlags,
) -> Result<PropertyBlock> {
    let state_frame = if flags.contains(ObjectFlags::HAS_STACK) {
        Some(reader.read::<StateFrame>()?)
    } else {
        None
    };

    let mut properties: Vec<Property> = Vec::new();
    loop {
        let name = names.get(reader.read::<NameRef>()?)?;
        if name.eq_ignore_ascii_case(TERMINATOR) {
            break;
        }

        let info = reader.u8()?;
        let kind = PropertyType::from_tag(info);
        let subtype = match kind {
            PropertyType::Struct => Some(names.get(reader.read::<NameRef>()?)?.to_owned()),
            _ => None,
        };

        let size = match (info >> 4) & 0x07 {
            0 => 1,
            1 => 2,
            2 => 4,
            3 => 12,
            4 => 16,
            5 => u32::from(reader.u8()?),
            6 => u32::from(reader.u16()?),
            _ => reader.u32()?,
        };
        let flag = info & 0x80 != 0;

        let mut property = Property {
            name: name.to_owned(),
            kind,
            subtype,
            array_index: None,
            size,
            value: PropertyValue::Unset,
        };

        if kind != PropertyType::Boolean && flag {
            let index = read_array_index(reader, properties.last_mut(), name)?;
            property.array_index = Some(index);
            property
                .subtype
                .get_or_insert_with(|| ARRAY_SUBTYPE.to_owned());
        }

        property.value = read_value(reader, &property, flag, names, decoder)?;
        trace!(
            property = %property.name,
            kind = property.kind.name(),
            size,
            index = ?property.array_index,
            "read property"
        );
        properties.push(property);
    }

    Ok(PropertyBlock {
        state_frame,
        properties,
        end_offset: reader.position(),
    })
}

/// Read the index of an array element.
///
/// The first element of an array is written without the marker, so when the
/// previous property has the same name it is retagged as element zero. The
/// width of the index follows the index of the previous property.
fn read_array_index(
    reader: &mut PackageReader<'_>,
    previous: Option<&mut Property>,
    name: &str,
) -> Result<u32> {
    let Some(previous) = previous else {
        return reader.u8().map(u32::from);
    };

    if previous.name == name && previous.subtype.is_none() {
        previous.subtype = Some(ARRAY_SUBTYPE.to_owned());
        previous.array_index = Some(0);
    }

    match previous.array_index {
        Some(last) if last >= 0x3FFF => Ok(reader.u32()? & 0x3FFF_FFFF),
        Some(last) if last >= 0x7F => Ok(u32::from(reader.u16()? & 0x7FFF)),
        _ => reader.u8().map(u32::from),
    }
}

fn read_value(
    reader: &mut PackageReader<'_>,
    property: &Property,
    flag: bool,
    names: &NameTable,
    decoder: &dyn TextDecoder,
) -> Result<PropertyValue> {
    let value = match property.kind {
        PropertyType::Byte => PropertyValue::Byte(reader.u8()?),
        PropertyType::Integer => PropertyValue::Integer(reader.i32()?),
        PropertyType::Boolean => PropertyValue::Boolean(flag),
        PropertyType::Float => PropertyValue::Float(reader.f32()?),
        PropertyType::Object => PropertyValue::Object(reader.read()?),
        PropertyType::Name => PropertyValue::Name(names.get(reader.read()?)?.to_owned()),
        PropertyType::Class => PropertyValue::Unset,
        PropertyType::Str => PropertyValue::Str(decoder.decode(&reader.string_property()?)),
        PropertyType::Struct => {
            let subtype = property.subtype.as_deref().unwrap_or_default();
            match subtype.to_ascii_lowercase().as_str() {
                "color" => PropertyValue::Struct(StructValue::Color(reader.read()?)),
                "vector" => PropertyValue::Struct(StructValue::Vector(reader.read()?)),
                "rotator" => PropertyValue::Struct(StructValue::Rotator(reader.read()?)),
                "scale" => PropertyValue::Struct(StructValue::Scale(reader.read()?)),
                "pointregion" => {
                    PropertyValue::Struct(StructValue::PointRegion(reader.read()?))
                }
                _ => skip(reader, property)?,
            }
        }
        PropertyType::Unknown
        | PropertyType::String
        | PropertyType::Array
        | PropertyType::Vector
        | PropertyType::Rotator
        | PropertyType::Map
        | PropertyType::FixedArray => skip(reader, property)?,
    };

    Ok(value)
}

fn skip(reader: &mut PackageReader<'_>, property: &Property) -> Result<PropertyValue> {
    let offset = reader.position();
    reader.skip(property.size.into())?;

    debug!(
        property = %property.name,
        kind = property.kind.name(),
        subtype = ?property.subtype,
        offset,
        size = property.size,
        "skipped property payload"
    );

    Ok(PropertyValue::Skipped {
        offset,
        size: property.size,
    })
}
