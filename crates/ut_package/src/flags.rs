//! Bit sets stored in the header, the export table and polygon lists.

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::Serialize;

bitflags! {
    /// Flags of a package as a whole
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
    pub struct PackageFlags: u32 {
        const ALLOW_DOWNLOAD = 0x0000_0001;
        const CLIENT_OPTIONAL = 0x0000_0002;
        const SERVER_SIDE_ONLY = 0x0000_0004;
        const BROKEN_LINKS = 0x0000_0008;
        const UNSECURE = 0x0000_0010;
        const NEED = 0x0000_8000;
    }
}

bitflags! {
    /// Flags of an exported object
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
    pub struct ObjectFlags: u32 {
        const TRANSACTIONAL = 0x0000_0001;
        const UNREACHABLE = 0x0000_0002;
        const PUBLIC = 0x0000_0004;
        const TAG_IMP = 0x0000_0008;
        const TAG_EXP = 0x0000_0010;
        const SOURCE_MODIFIED = 0x0000_0020;
        const TAG_GARBAGE = 0x0000_0040;
        const NEED_LOAD = 0x0000_0200;
        const HIGHLIGHTED_NAME = 0x0000_0400;
        const IN_SINGULAR_FUNC = 0x0000_0800;
        const SUPPRESS = 0x0000_1000;
        const IN_END_STATE = 0x0000_2000;
        const TRANSIENT = 0x0000_4000;
        const PRE_LOADING = 0x0000_8000;
        const LOAD_FOR_CLIENT = 0x0001_0000;
        const LOAD_FOR_SERVER = 0x0002_0000;
        const LOAD_FOR_EDIT = 0x0004_0000;
        const STANDALONE = 0x0008_0000;
        const NOT_FOR_CLIENT = 0x0010_0000;
        const NOT_FOR_SERVER = 0x0020_0000;
        const NOT_FOR_EDIT = 0x0040_0000;
        const DESTROYED = 0x0080_0000;
        const NEED_POST_LOAD = 0x0100_0000;
        /// The property stream is preceded by a state frame
        const HAS_STACK = 0x0200_0000;
        const NATIVE = 0x0400_0000;
        const MARKED = 0x0800_0000;
        const ERROR_SHUTDOWN = 0x1000_0000;
        const DEBUG_POST_LOAD = 0x2000_0000;
        const DEBUG_SERIALIZE = 0x4000_0000;
        const DEBUG_DESTROY = 0x8000_0000;
    }
}

bitflags! {
    /// Surface flags of a polygon.
    ///
    /// Some bits carry two names depending on whether they are read by the
    /// renderer or the editor; both names are defined.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
    pub struct PolyFlags: u32 {
        const INVISIBLE = 0x0000_0001;
        const MASKED = 0x0000_0002;
        const TRANSLUCENT = 0x0000_0004;
        const NOT_SOLID = 0x0000_0008;
        const ENVIRONMENT = 0x0000_0010;
        const FORCE_VIEW_ZONE = 0x0000_0010;
        const SEMISOLID = 0x0000_0020;
        const MODULATED = 0x0000_0040;
        const FAKE_BACKDROP = 0x0000_0080;
        const TWO_SIDED = 0x0000_0100;
        const AUTO_U_PAN = 0x0000_0200;
        const AUTO_V_PAN = 0x0000_0400;
        const NO_SMOOTH = 0x0000_0800;
        const BIG_WAVY = 0x0000_1000;
        const SPECIAL_POLY = 0x0000_1000;
        const SMALL_WAVY = 0x0000_2000;
        const FLAT = 0x0000_4000;
        const LOW_SHADOW_DETAIL = 0x0000_8000;
        const NO_MERGE = 0x0001_0000;
        const CLOUD_WAVY = 0x0002_0000;
        const DIRTY_SHADOWS = 0x0004_0000;
        const BRIGHT_CORNERS = 0x0008_0000;
        const SPECIAL_LIT = 0x0010_0000;
        const GOURAUD = 0x0020_0000;
        const NO_BOUND_REJECTION = 0x0020_0000;
        const UNLIT = 0x0040_0000;
        const HIGH_SHADOW_DETAIL = 0x0080_0000;
        const PORTAL = 0x0400_0000;
        const MIRRORED = 0x0800_0000;
    }
}

/// Names of every defined flag set in `bits`, aliases included
fn defined_names<F: bitflags::Flags + Copy>(bits: F) -> Vec<&'static str> {
    F::FLAGS
        .iter()
        .filter(|flag| !flag.value().is_empty() && bits.contains(*flag.value()))
        .map(|flag| flag.name())
        .collect()
}

impl ObjectFlags {
    pub fn names(self) -> Vec<&'static str> {
        defined_names(self)
    }
}

impl PolyFlags {
    pub fn names(self) -> Vec<&'static str> {
        defined_names(self)
    }
}

impl PackageFlags {
    pub fn names(self) -> Vec<&'static str> {
        defined_names(self)
    }
}
