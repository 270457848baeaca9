//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// The file does not start with the package signature
    #[error("invalid package signature: {signature:#010x}")]
    #[diagnostic(
        code(ut_package::malformed_header),
        help("unreal packages start with the signature 0x9e2a83c1")
    )]
    MalformedHeader {
        /// The value found where the signature was expected
        signature: u32,
    },

    /// A read would run past the end of the package data
    #[error("read at offset {offset:#x} runs past the end of the package ({size} bytes)")]
    #[diagnostic(code(ut_package::out_of_bounds))]
    OutOfBounds {
        /// Offset the failing read started at
        offset: u64,
        /// Size of the backing buffer
        size: u64,
    },

    /// An object reference points outside the import or export table
    #[error("object reference {index} is outside the import ({imports}) and export ({exports}) tables")]
    #[diagnostic(code(ut_package::unresolved_reference))]
    UnresolvedReference {
        /// The raw reference value
        index: i32,
        /// Number of entries in the import table
        imports: usize,
        /// Number of entries in the export table
        exports: usize,
    },

    /// A name reference points outside the name table
    #[error("name index {index} is outside the name table ({count} entries)")]
    #[diagnostic(code(ut_package::invalid_name))]
    InvalidNameIndex {
        /// The raw name index
        index: i32,
        /// Number of entries in the name table
        count: usize,
    },

    /// A count prefix decoded to a negative value
    #[error("negative count {count} at offset {offset:#x}")]
    #[diagnostic(code(ut_package::negative_count))]
    NegativeCount {
        /// Offset of the count prefix
        offset: u64,
        /// The decoded count
        count: i32,
    },

    /// Walking the package chain of an object never reached a top level package
    #[error("package chain of object {index} does not terminate")]
    #[diagnostic(code(ut_package::package_cycle))]
    PackageCycle {
        /// Reference of the object the walk started at
        index: i32,
    },

    /// A texture pixel refers to a color the palette does not have
    #[error("palette index {index} is outside the palette ({len} colors)")]
    PaletteIndex {
        /// The pixel value
        index: u8,
        /// Number of colors in the palette
        len: usize,
    },

    /// An object lacks data needed for the requested lookup
    #[error("{0}")]
    MissingData(String),

    /// Decoding a single export failed
    #[error("unable to decode export {index}")]
    #[diagnostic(code(ut_package::object))]
    Object {
        /// Zero based position in the export table
        index: usize,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap a failure that happened while decoding the export at `index`
    pub(crate) fn in_export(self, index: usize) -> Self {
        match self {
            Error::Object { .. } => self,
            other => Error::Object {
                index,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping per-export wrappers
    pub fn root(&self) -> &Error {
        match self {
            Error::Object { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
