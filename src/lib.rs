/*!
A safe, zero-copy character to glyph mapping engine for
[TrueType](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6cmap.html)
and [OpenType](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap)
`cmap` tables.

## Features

- Formats 0, 4, 6, 10, 12 and 13 are fully supported.
- Unicode Variation Sequences (format 14).
- Legacy (non-Unicode) subtables, through an explicit encoding registry.
- Character set enumeration and reverse glyph lookup, both cached.
- Zero unsafe.
- Table data is never copied. All arrays are decoded on access.
- `no_std` compatible, when only the low-level `cmap` module is required.

## Safety

- The library must not panic. Any panic considered as a critical bug and should be reported.
- The library forbids the unsafe code.
- All reads are bounds checked. Malformed tables produce wrong, but never unsafe, results.

## Error handling

Low-level parsing methods in the [`cmap`] module return `Option::None`
on malformed data.
[`Processor`] methods return [`Error`] when a subtable format
is not supported, while [`Processor::lookup`] never fails
and falls back to the `.notdef` glyph instead.

Some methods may print warnings, when the `logging` feature is enabled.
*/

#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]

#[cfg(feature = "std")]
#[macro_use]
extern crate std;

#[cfg(feature = "logging")]
macro_rules! warn {
    ($($arg:tt)+) => (
        log::log!(log::Level::Warn, $($arg)+);
    )
}

#[cfg(not(feature = "logging"))]
macro_rules! warn {
    ($($arg:tt)+) => () // do nothing
}

#[cfg(all(feature = "logging", feature = "std"))]
macro_rules! debug {
    ($($arg:tt)+) => (
        log::log!(log::Level::Debug, $($arg)+);
    )
}

#[cfg(all(not(feature = "logging"), feature = "std"))]
macro_rules! debug {
    ($($arg:tt)+) => () // do nothing
}

mod tables;
pub mod parser;

#[cfg(feature = "std")] mod cache;
#[cfg(feature = "std")] pub mod encoding;
#[cfg(feature = "std")] mod processor;

#[cfg(feature = "std")] pub use encoding::{Encoding, EncodingRegistry, Encodings, RemapTable};
#[cfg(feature = "std")] pub use processor::Processor;

pub use tables::cmap;

use parser::FromData;


/// A type-safe wrapper for glyph ID.
///
/// Stored as `u32`, since format 12 and 13 subtables
/// can reference glyphs past `u16::MAX`.
#[repr(transparent)]
#[derive(Clone, Copy, Default, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub struct GlyphId(pub u32);

impl GlyphId {
    /// The `.notdef` glyph.
    ///
    /// Every lookup falls back to it.
    pub const NOTDEF: GlyphId = GlyphId(0);

    /// Checks that this is the `.notdef` glyph.
    #[inline]
    pub fn is_notdef(&self) -> bool {
        self.0 == 0
    }
}

impl From<u16> for GlyphId {
    #[inline]
    fn from(id: u16) -> Self {
        GlyphId(u32::from(id))
    }
}

impl FromData for GlyphId {
    const SIZE: usize = 2;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        u16::parse(data).map(GlyphId::from)
    }
}


/// A platform ID.
///
/// <https://docs.microsoft.com/en-us/typography/opentype/spec/name#platform-ids>
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[allow(missing_docs)]
pub enum PlatformId {
    Unicode,
    Macintosh,
    Iso,
    Windows,
    Custom,
}

impl FromData for PlatformId {
    const SIZE: usize = 2;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        match u16::parse(data)? {
            0 => Some(PlatformId::Unicode),
            1 => Some(PlatformId::Macintosh),
            2 => Some(PlatformId::Iso),
            3 => Some(PlatformId::Windows),
            4 => Some(PlatformId::Custom),
            _ => None,
        }
    }
}


/// A list of errors that can occur while mapping characters.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum Error {
    /// Neither a Unicode nor a known legacy encoding subtable is present.
    ///
    /// The font cannot be used for text lookup.
    #[error("could not find a supported cmap subtable")]
    NoSupportedCmap,

    /// The `cmap` table header or its encoding records are malformed.
    #[error("malformed cmap table")]
    MalformedTable,

    /// A recognized subtable format that is intentionally not supported
    /// by the requested operation.
    #[error("cmap format {0} is not implemented")]
    UnimplementedFormat(u16),

    /// A subtable format outside of the recognized set.
    #[error("unknown cmap format {0}")]
    UnknownFormat(u16),
}
