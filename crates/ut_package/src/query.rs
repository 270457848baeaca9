//! Read-only lookups built on top of [`Package`].

use bon::Builder;
use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::catalog::{default_package_ext, file_type, is_core_package, BRUSH_CLASSES, MESH_CLASSES, MOVER_CLASSES};
use crate::error::{Error, Result};
use crate::objects::audio::WaveFormat;
use crate::objects::{AudioRange, Model, Polys};
use crate::package::Package;
use crate::property::PropertyValue;
use crate::table::ObjectRef;
use crate::types::Color;

/// Export holding the level's settings in map packages
pub const LEVEL_INFO: &str = "LevelInfo0";

/// Properties listed by a short [`Package::level_summary`]
pub const SUMMARY_PROPERTIES: [&str; 5] = ["Author", "IdealPlayerCount", "LevelEnterText", "Song", "Title"];

/// Summary properties reported as the name of their outermost package
pub const PACKAGE_VALUED_PROPERTIES: [&str; 5] = ["Song", "DefaultGameType", "Summary", "NavigationPointList", "Level"];

const SCREENSHOT: &str = "Screenshot";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TextureGroups {
    /// Texture names by the name of their containing package
    pub grouped: IndexMap<String, Vec<String>>,
    pub ungrouped: Vec<String>,
    pub total: usize,
}

/// A sound export with its format details
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SoundInfo {
    pub index: usize,
    pub name: String,
    pub package: Option<String>,
    pub format: String,
    pub next_object_offset: Option<u32>,
    pub range: AudioRange,
    /// Present for uncompressed `WAV` audio
    pub wave: Option<WaveFormat>,
}

/// Light color as hue degrees, saturation and lightness percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Hsl {
    pub h: i32,
    pub s: i32,
    pub l: i32,
}

impl Default for Hsl {
    fn default() -> Self {
        Hsl { h: 0, s: 100, l: 25 }
    }
}

/// Decoded data of an export, with its position in the export table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Exported<'p, T> {
    pub index: usize,
    pub data: &'p T,
}

/// A brush actor with the model it references and the polygons the model was built from
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BrushData<'p> {
    pub brush: usize,
    pub model: Option<Exported<'p, Model>>,
    pub polys: Option<Exported<'p, Polys>>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(untagged))]
pub enum SummaryValue {
    /// Outermost package name of an object valued property
    Package(String),
    Value(PropertyValue),
}

impl SummaryValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SummaryValue::Package(name) => Some(name),
            SummaryValue::Value(value) => value.as_str(),
        }
    }
}

/// A top level package imported by this one
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Dependency {
    pub name: String,
    /// Ships with the stock game
    pub default: bool,
    pub ext: Option<&'static str>,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, Builder)]
pub struct DependencyOptions {
    /// Leave out the stock packages nearly every package imports
    #[builder(default = true)]
    pub ignore_core: bool,
}

impl Default for DependencyOptions {
    fn default() -> Self {
        DependencyOptions::builder().build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FilteredDependencies {
    pub default: Vec<Dependency>,
    pub custom: Vec<Dependency>,
    pub total: usize,
}

/// The first mip map of a texture with its palette applied
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TexturePixels {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl Package {
    fn exports_where_class(&self, matches: impl Fn(&str) -> bool) -> Result<Vec<usize>> {
        let mut found = Vec::new();
        for (i, export) in self.exports().iter().enumerate() {
            if self.class_name(export.into())?.is_some_and(&matches) {
                found.push(i);
            }
        }
        Ok(found)
    }

    /// Positions of the exports of class `class`, compared exactly
    pub fn exports_by_class(&self, class: &str) -> Result<Vec<usize>> {
        self.exports_where_class(|name| name == class)
    }

    /// Brush actors, movers included
    pub fn brush_exports(&self) -> Result<Vec<usize>> {
        self.exports_where_class(|name| BRUSH_CLASSES.contains(&name))
    }

    pub fn mover_exports(&self) -> Result<Vec<usize>> {
        self.exports_where_class(|name| MOVER_CLASSES.contains(&name))
    }

    pub fn mesh_exports(&self) -> Result<Vec<usize>> {
        self.exports_where_class(|name| MESH_CLASSES.contains(&name))
    }

    pub fn export_by_name(&self, name: &str) -> Option<usize> {
        self.exports()
            .iter()
            .position(|export| self.object_name(export.into()).is_ok_and(|found| found == name))
    }

    pub fn import_by_name(&self, name: &str) -> Option<usize> {
        self.imports()
            .iter()
            .position(|import| self.object_name(import.into()).is_ok_and(|found| found == name))
    }

    pub fn exports_by_name(&self, name: &str) -> Vec<usize> {
        self.exports()
            .iter()
            .enumerate()
            .filter(|(_, export)| self.object_name((*export).into()).is_ok_and(|found| found == name))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn imports_by_name(&self, name: &str) -> Vec<usize> {
        self.imports()
            .iter()
            .enumerate()
            .filter(|(_, import)| self.object_name((*import).into()).is_ok_and(|found| found == name))
            .map(|(i, _)| i)
            .collect()
    }

    /// Name of the referenced object, `"None"` when there is none
    pub fn object_name_or_none(&self, index: ObjectRef) -> &str {
        match self.resolve(index) {
            Ok(Some(entry)) => self.object_name(entry).unwrap_or("None"),
            _ => "None",
        }
    }

    /// Number of exports per lowercase class name, in order of first appearance
    pub fn class_counts(&self) -> Result<IndexMap<String, usize>> {
        let mut counts = IndexMap::new();
        for export in self.exports() {
            if let Some(class) = self.class_name(export.into())? {
                *counts.entry(class.to_lowercase()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    pub fn texture_groups(&self) -> Result<TextureGroups> {
        let mut groups = TextureGroups::default();
        for index in self.exports_by_class("Texture")? {
            let export = self.export(index)?;
            let name = self.object_name(export.into())?.to_owned();
            match self.package_name(export.into())? {
                Some(group) => groups.grouped.entry(group.to_owned()).or_default().push(name),
                None => groups.ungrouped.push(name),
            }
            groups.total += 1;
        }
        Ok(groups)
    }

    pub fn sound(&self, index: usize) -> Result<SoundInfo> {
        let export = self.export(index)?;
        let audio = self
            .object_data(index)?
            .as_audio()
            .ok_or_else(|| Error::MissingData(format!("export {index} has no audio")))?;

        let format = self.name(audio.format)?;
        let wave = if format.eq_ignore_ascii_case("WAV") {
            WaveFormat::parse(self.audio_bytes(audio)?)
        } else {
            None
        };

        Ok(SoundInfo {
            index,
            name: self.object_name(export.into())?.to_owned(),
            package: self.package_name(export.into())?.map(str::to_owned),
            format: format.to_owned(),
            next_object_offset: audio.next_object_offset,
            range: audio.range,
            wave,
        })
    }

    /// Every `Sound` export; a failing sound does not hide the others
    pub fn sounds(&self) -> Result<Vec<Result<SoundInfo>>> {
        Ok(self
            .exports_by_class("Sound")?
            .into_iter()
            .map(|index| self.sound(index))
            .collect())
    }

    /// Color of a light actor from its `LightHue`, `LightSaturation` and
    /// `VolumeBrightness` properties
    pub fn light_hsl(&self, index: usize) -> Result<Hsl> {
        let mut hsl = Hsl::default();
        for property in self.properties(index)? {
            let Some(value) = property.value.as_f64() else {
                continue;
            };
            match property.name.to_ascii_lowercase().as_str() {
                "lighthue" => hsl.h = scale(value, 360.0),
                "lightsaturation" => hsl.s = 100 - scale(value, 100.0),
                "volumebrightness" => hsl.l = scale(value, 100.0),
                _ => {}
            }
        }
        Ok(hsl)
    }

    pub fn brush_data(&self, index: usize) -> Result<BrushData<'_>> {
        let mut brush = BrushData {
            brush: index,
            model: None,
            polys: None,
        };

        let Some(model_index) = self
            .properties(index)?
            .value("Brush")
            .and_then(PropertyValue::as_object)
            .and_then(ObjectRef::export_index)
        else {
            return Ok(brush);
        };

        let model = self
            .object_data(model_index)?
            .as_model()
            .ok_or_else(|| Error::MissingData(format!("export {model_index} is not a model")))?;
        brush.model = Some(Exported {
            index: model_index,
            data: model,
        });

        if let Some(polys_index) = model.polys.export_index() {
            let polys = self
                .object_data(polys_index)?
                .as_polys()
                .ok_or_else(|| Error::MissingData(format!("export {polys_index} is not a polygon list")))?;
            brush.polys = Some(Exported {
                index: polys_index,
                data: polys,
            });
        }

        Ok(brush)
    }

    /// [`Package::brush_data`] of every brush export
    pub fn all_brush_data(&self) -> Result<Vec<Result<BrushData<'_>>>> {
        Ok(self
            .brush_exports()?
            .into_iter()
            .map(|index| self.brush_data(index))
            .collect())
    }

    /// Properties of the level's [`LEVEL_INFO`] export, empty for packages without one.
    ///
    /// Unless `all` is set only [`SUMMARY_PROPERTIES`] are kept.
    pub fn level_summary(&self, all: bool) -> Result<IndexMap<String, SummaryValue>> {
        let mut summary = IndexMap::new();
        let Some(level_info) = self.export_by_name(LEVEL_INFO) else {
            return Ok(summary);
        };

        for property in self.properties(level_info)? {
            let name = property.name.as_str();
            if !all && !SUMMARY_PROPERTIES.contains(&name) {
                continue;
            }

            let package = match property.value.as_object() {
                Some(object) if PACKAGE_VALUED_PROPERTIES.contains(&name) => {
                    self.uppermost_package_name(object)?
                }
                _ => None,
            };
            let value = match package {
                Some(package) => SummaryValue::Package(package.to_owned()),
                None => SummaryValue::Value(property.value.clone()),
            };
            summary.insert(property.name.clone(), value);
        }

        Ok(summary)
    }

    /// Top level packages this package imports from
    pub fn dependencies(&self) -> Result<Vec<Dependency>> {
        let summary = self.level_summary(false)?;
        let music = summary.get("Song").and_then(SummaryValue::as_str);

        let mut dependencies = Vec::new();
        for import in self.imports() {
            if !import.package_index.is_null() || self.name(import.class_name_index)? != "Package" {
                continue;
            }

            let name = self.name(import.object_name_index)?;
            let stock = default_package_ext(name);
            let ext = stock.or_else(|| (music == Some(name)).then_some("umx"));
            dependencies.push(Dependency {
                name: name.to_owned(),
                default: stock.is_some(),
                ext,
                kind: ext.and_then(file_type),
            });
        }

        Ok(dependencies)
    }

    /// [`Package::dependencies`] split into stock and custom packages
    pub fn dependencies_filtered(&self, options: DependencyOptions) -> Result<FilteredDependencies> {
        let mut filtered = FilteredDependencies::default();
        for dependency in self.dependencies()? {
            if dependency.default {
                if options.ignore_core && is_core_package(&dependency.name) {
                    continue;
                }
                filtered.default.push(dependency);
            } else {
                filtered.custom.push(dependency);
            }
            filtered.total += 1;
        }
        Ok(filtered)
    }

    /// Textures named `Screenshot` or `ScreenshotN`, ordered by `N`.
    ///
    /// Without such textures the texture the level info names as its
    /// screenshot is used, provided it is stored in this package.
    pub fn screenshot_textures(&self) -> Result<Vec<usize>> {
        let mut screenshots = Vec::new();
        for index in self.exports_by_class("Texture")? {
            let name = self.object_name(self.export(index)?.into())?;
            if let Some(number) = screenshot_number(name) {
                screenshots.push((number, index));
            }
        }

        if !screenshots.is_empty() {
            screenshots.sort_by_key(|(number, _)| *number);
            return Ok(screenshots.into_iter().map(|(_, index)| index).collect());
        }

        let Some(level_info) = self.export_by_name(LEVEL_INFO) else {
            return Ok(Vec::new());
        };
        Ok(self
            .properties(level_info)?
            .value(SCREENSHOT)
            .and_then(PropertyValue::as_object)
            .and_then(ObjectRef::export_index)
            .into_iter()
            .collect())
    }

    /// Expand the first mip map of a texture through its `Palette` property
    pub fn texture_pixels(&self, index: usize) -> Result<TexturePixels> {
        let texture = self
            .object_data(index)?
            .as_texture()
            .ok_or_else(|| Error::MissingData(format!("export {index} is not a texture")))?;
        let mip = texture
            .first_mip()
            .ok_or_else(|| Error::MissingData(format!("texture {index} has no mip maps")))?;

        let palette_index = self
            .properties(index)?
            .value("Palette")
            .and_then(PropertyValue::as_object)
            .and_then(ObjectRef::export_index)
            .ok_or_else(|| Error::MissingData(format!("texture {index} has no palette in this package")))?;
        let palette = self
            .object_data(palette_index)?
            .as_palette()
            .ok_or_else(|| Error::MissingData(format!("export {palette_index} is not a palette")))?;

        Ok(TexturePixels {
            width: mip.width,
            height: mip.height,
            pixels: mip.expand(palette)?,
        })
    }

    /// Script text of a `TextBuffer` export
    pub fn text_buffer(&self, index: usize) -> Result<Option<String>> {
        let buffer = self
            .object_data(index)?
            .as_text_buffer()
            .ok_or_else(|| Error::MissingData(format!("export {index} is not a text buffer")))?;
        Ok(buffer.contents.as_ref().map(|text| self.text(text)))
    }
}

/// A byte valued setting out of 256, scaled to `range` and rounded
fn scale(value: f64, range: f64) -> i32 {
    (value / 256.0 * range).round() as i32
}

/// `Screenshot` is number 0
fn screenshot_number(name: &str) -> Option<u64> {
    let prefix = name.get(..SCREENSHOT.len())?;
    if !prefix.eq_ignore_ascii_case(SCREENSHOT) {
        return None;
    }

    let digits = &name[SCREENSHOT.len()..];
    if digits.is_empty() {
        return Some(0);
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}
