//! Opening a package and decoding its exports on demand.

use std::fmt::{self, Debug};
use std::sync::Arc;

use bon::Builder;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::header::PackageHeader;
use crate::names::{NameRef, NameTable};
use crate::objects::{Audio, NativeClass, ObjectData};
use crate::property::PropertyBlock;
use crate::reader::PackageReader;
use crate::table::{ExportEntry, ImportEntry, ObjectEntry, ObjectRef, ObjectTables};
use crate::text::{DefaultTextDecoder, RawText, TextDecoder};

/// Options used when opening a [`Package`]
///
/// ```
/// let options = ut_package::PackageOptions::builder()
///     .strict_names(true)
///     .build();
/// ```
#[derive(Debug, Clone, Builder)]
pub struct PackageOptions {
    /// Turns stored text into strings
    #[builder(default = default_text_decoder())]
    pub text_decoder: Arc<dyn TextDecoder>,
    /// Check every name index of both object tables while opening
    #[builder(default)]
    pub strict_names: bool,
}

fn default_text_decoder() -> Arc<dyn TextDecoder> {
    Arc::new(DefaultTextDecoder)
}

impl Default for PackageOptions {
    fn default() -> Self {
        PackageOptions::builder().build()
    }
}

/// A package read into memory
///
/// The header and the three tables are read when the package is opened.
/// Properties and native bodies are decoded the first time they are asked
/// for and kept for later calls, which may come from several threads.
///
/// ```no_run
/// fn list_exports(data: Vec<u8>) -> ut_package::error::Result<()> {
///     let package = ut_package::Package::new(data)?;
///
///     for (i, export) in package.exports().iter().enumerate() {
///         let class = package.class_name(export.into())?.unwrap_or("Class");
///         println!("{}: {}", package.name(export.object_name_index)?, class);
///         println!("{} properties", package.properties(i)?.len());
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Package {
    data: Arc<[u8]>,
    options: PackageOptions,
    header: PackageHeader,
    names: NameTable,
    tables: ObjectTables,
}

impl Debug for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Package")
            .field("size", &self.data.len())
            .field("header", &self.header)
            .field("names", &self.names.len())
            .field("exports", &self.tables.exports.len())
            .field("imports", &self.tables.imports.len())
            .finish()
    }
}

impl Package {
    /// Open a package with the default [`PackageOptions`]
    pub fn new(data: impl Into<Arc<[u8]>>) -> Result<Self> {
        Self::with_options(data, PackageOptions::default())
    }

    #[instrument(skip_all, err)]
    pub fn with_options(data: impl Into<Arc<[u8]>>, options: PackageOptions) -> Result<Self> {
        let data = data.into();
        let header = PackageHeader::parse(&data)?;
        let names = NameTable::parse(&data, &header, options.text_decoder.as_ref())?;
        let tables = ObjectTables::parse(&data, &header)?;

        if options.strict_names {
            check_names(&names, &tables)?;
        }

        debug!(
            size = data.len(),
            version = header.version,
            names = names.len(),
            exports = tables.exports.len(),
            imports = tables.imports.len(),
            "opened package"
        );

        Ok(Package {
            data,
            options,
            header,
            names,
            tables,
        })
    }

    pub fn header(&self) -> &PackageHeader {
        &self.header
    }

    pub fn version(&self) -> u16 {
        self.header.version
    }

    pub fn names(&self) -> &NameTable {
        &self.names
    }

    pub fn exports(&self) -> &[ExportEntry] {
        &self.tables.exports
    }

    pub fn imports(&self) -> &[ImportEntry] {
        &self.tables.imports
    }

    pub fn tables(&self) -> &ObjectTables {
        &self.tables
    }

    /// The whole package buffer
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn options(&self) -> &PackageOptions {
        &self.options
    }

    pub fn name(&self, index: NameRef) -> Result<&str> {
        self.names.get(index)
    }

    /// Resolve a reference; the null reference resolves to `None`
    pub fn resolve(&self, index: ObjectRef) -> Result<Option<ObjectEntry<'_>>> {
        self.tables.resolve(index)
    }

    /// The export at zero based `index`
    pub fn export(&self, index: usize) -> Result<&ExportEntry> {
        self.tables
            .exports
            .get(index)
            .ok_or(Error::UnresolvedReference {
                index: ObjectRef::export(index).0,
                imports: self.tables.imports.len(),
                exports: self.tables.exports.len(),
            })
    }

    pub fn object_name(&self, entry: ObjectEntry<'_>) -> Result<&str> {
        self.names.get(entry.object_name_index())
    }

    /// Name of the object's class.
    ///
    /// Exports name their class through a reference, which is null for
    /// classes themselves. Imports store the class name directly.
    pub fn class_name(&self, entry: ObjectEntry<'_>) -> Result<Option<&str>> {
        match entry {
            ObjectEntry::Export(export) => match self.resolve(export.class_index)? {
                Some(class) => self.object_name(class).map(Some),
                None => Ok(None),
            },
            ObjectEntry::Import(import) => self.names.get(import.class_name_index).map(Some),
        }
    }

    /// The package directly containing the object
    pub fn package_of(&self, entry: ObjectEntry<'_>) -> Result<Option<ObjectEntry<'_>>> {
        self.resolve(entry.package_index())
    }

    pub fn package_name(&self, entry: ObjectEntry<'_>) -> Result<Option<&str>> {
        match self.package_of(entry)? {
            Some(package) => self.object_name(package).map(Some),
            None => Ok(None),
        }
    }

    /// Follow the package chain of `index` up to the outermost object.
    ///
    /// An object without a package is its own outermost package. A chain
    /// longer than both tables together fails with [`Error::PackageCycle`].
    pub fn uppermost_package(&self, index: ObjectRef) -> Result<Option<ObjectEntry<'_>>> {
        let Some(mut current) = self.resolve(index)? else {
            return Ok(None);
        };

        for _ in 0..=self.tables.len() {
            match self.package_of(current)? {
                Some(parent) => current = parent,
                None => return Ok(Some(current)),
            }
        }

        warn!(index = index.0, "package chain does not terminate");
        Err(Error::PackageCycle { index: index.0 })
    }

    pub fn uppermost_package_name(&self, index: ObjectRef) -> Result<Option<&str>> {
        match self.uppermost_package(index)? {
            Some(package) => self.object_name(package).map(Some),
            None => Ok(None),
        }
    }

    /// The native decoder for an export's class, if it has one
    pub fn native_class(&self, index: usize) -> Result<Option<NativeClass>> {
        let export = self.export(index)?;
        Ok(self
            .class_name(export.into())?
            .and_then(NativeClass::from_name))
    }

    /// Property stream of the export at `index`, decoded on first use
    #[instrument(skip(self), err)]
    pub fn properties(&self, index: usize) -> Result<&PropertyBlock> {
        let export = self.export(index)?;
        if let Some(block) = export.cache.properties.get() {
            return Ok(block);
        }

        let block = self
            .decode_properties(export)
            .map_err(|err| err.in_export(index))?;
        Ok(export.cache.properties.get_or_init(|| block))
    }

    fn decode_properties(&self, export: &ExportEntry) -> Result<PropertyBlock> {
        let Some(offset) = export.body_offset() else {
            return Ok(PropertyBlock::default());
        };

        PropertyBlock::decode(
            &self.data,
            offset,
            &self.names,
            self.options.text_decoder.as_ref(),
            export.object_flags,
        )
    }

    /// Native body of the export at `index`, decoded on first use.
    ///
    /// The body starts where the property stream ends. Classes without a
    /// native decoder and exports without serialized data give
    /// [`ObjectData::None`].
    #[instrument(skip(self), err)]
    pub fn object_data(&self, index: usize) -> Result<&ObjectData> {
        let export = self.export(index)?;
        if let Some(data) = export.cache.data.get() {
            return Ok(data);
        }

        let data = self
            .decode_object_data(index, export)
            .map_err(|err| err.in_export(index))?;
        Ok(export.cache.data.get_or_init(|| data))
    }

    fn decode_object_data(&self, index: usize, export: &ExportEntry) -> Result<ObjectData> {
        let class = self.native_class(index)?;
        if class.is_none() || !export.has_data() {
            return Ok(ObjectData::None);
        }

        let offset = self.properties(index)?.end_offset;
        let mut reader = PackageReader::at(&self.data, offset);
        ObjectData::decode(class, &mut reader, self.header.version)
    }

    /// Decode stored text with the configured decoder
    pub fn text(&self, text: &RawText) -> String {
        self.options.text_decoder.decode(text)
    }

    /// The raw audio bytes of a sound or music body
    pub fn audio_bytes(&self, audio: &Audio) -> Result<&[u8]> {
        audio.range.slice(&self.data).ok_or(Error::OutOfBounds {
            offset: audio.range.offset,
            size: self.data.len() as u64,
        })
    }
}

fn check_names(names: &NameTable, tables: &ObjectTables) -> Result<()> {
    for export in &tables.exports {
        names.get(export.object_name_index)?;
    }
    for import in &tables.imports {
        names.get(import.class_package_index)?;
        names.get(import.class_name_index)?;
        names.get(import.object_name_index)?;
    }
    Ok(())
}
