//! This library reads the package files used by *Unreal Tournament* and other games of the same engine generation.
//!
//! # Package Format Documentation
//!
//! Code (`.u`), textures (`.utx`), sounds (`.uax`), music (`.umx`) and maps (`.unr`) all share one container
//! format. A package is a header, a name table, an import table, an export table and the serialized objects the
//! export table points at. The tables may appear in any order; the header records where each one starts.
//!
//! ## Header
//!
//! | Offset (bytes) | Field            | Description                                                   |
//! |----------------|------------------|---------------------------------------------------------------|
//! | 0x0000         | Signature        | 4 bytes: `0x9E2A83C1`                                         |
//! | 0x0004         | Version          | 2 bytes: package version, 61 to 69 for the games covered here |
//! | 0x0006         | Licensee version | 2 bytes                                                       |
//! | 0x0008         | Package flags    | 4 bytes: see [`flags::PackageFlags`]                          |
//! | 0x000C         | Name count       | 4 bytes                                                       |
//! | 0x0010         | Name offset      | 4 bytes                                                       |
//! | 0x0014         | Export count     | 4 bytes                                                       |
//! | 0x0018         | Export offset    | 4 bytes                                                       |
//! | 0x001C         | Import count     | 4 bytes                                                       |
//! | 0x0020         | Import offset    | 4 bytes                                                       |
//!
//! Packages older than version 68 follow this with the heritage count and offset. Version 68 and later store a
//! 16 byte GUID, a generation count, and one `(export count, name count)` pair per generation.
//!
//! ## Compact Indices
//!
//! Most counts, sizes and references are stored as compact indices, a signed variable length integer of one to
//! five bytes:
//!
//! | Byte  | Bit 7    | Bit 6    | Bits 5-0 / 6-0 |
//! |-------|----------|----------|----------------|
//! | first | sign     | continue | value bits 0-5 |
//! | next  | continue |          | next 7 bits    |
//!
//! A fifth byte, when present, carries the top five value bits. See [`compact::CompactIndex`].
//!
//! ## Name Table
//!
//! Up to version 63 each name is a NUL terminated string, later versions prefix it with a one byte length that
//! counts the NUL. Every name is followed by 4 bytes of flags.
//!
//! ## Import and Export Tables
//!
//! | Export field      | Encoding | Import field  | Encoding |
//! |-------------------|----------|---------------|----------|
//! | Class             | compact  | Class package | compact  |
//! | Super             | compact  | Class name    | compact  |
//! | Package           | 4 bytes  | Package       | 4 bytes  |
//! | Object name       | compact  | Object name   | compact  |
//! | Object flags      | 4 bytes  |               |          |
//! | Serial size       | compact  |               |          |
//! | Serial offset     | compact  |               |          |
//!
//! The serial offset is only present when the serial size is positive. Object references are resolved with
//! [`table::ObjectRef`]: zero is no object, negative values select an import, positive values an export.
//!
//! ## Object Data
//!
//! An export's serialized body is a property stream terminated by the name `None`, optionally preceded by a
//! state frame for objects flagged [`flags::ObjectFlags::HAS_STACK`]. Some classes continue with a native body
//! decoded by the types in [`objects`].
//!
//! ```no_run
//! fn print_summary(data: Vec<u8>) -> ut_package::error::Result<()> {
//!     let package = ut_package::Package::new(data)?;
//!
//!     for (name, value) in package.level_summary(false)? {
//!         println!("{name}: {value:?}");
//!     }
//!     for dependency in package.dependencies()? {
//!         println!("needs {}", dependency.name);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers and floats
//! - **Text**: single byte strings use the Windows-1252 code page, wide strings are UTF-16LE
//!

pub mod catalog;
pub mod compact;
pub mod error;
pub mod flags;
pub mod header;
pub mod names;
pub mod objects;
pub mod package;
pub mod property;
pub mod query;
pub mod reader;
pub mod table;
pub mod text;
pub mod types;

pub use compact::CompactIndex;
pub use header::PackageHeader;
pub use names::{NameRef, NameTable};
pub use objects::{NativeClass, ObjectData};
pub use package::{Package, PackageOptions};
pub use property::{Property, PropertyBlock, PropertyType, PropertyValue};
pub use query::DependencyOptions;
pub use table::{ExportEntry, ImportEntry, ObjectEntry, ObjectRef};
pub use text::{DefaultTextDecoder, RawText, TextDecoder};
