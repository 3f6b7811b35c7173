/*!
A [character to glyph index mapping](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap)
table implementation.

This module provides a low-level alternative to the [`Processor`](crate::Processor).
It doesn't select a subtable and doesn't allocate,
so it's available in `no_std` environments as well.
*/

use crate::{Error, GlyphId, PlatformId};
use crate::parser::{FromData, LazyArray16, NumFrom, Stream};

mod format0;
mod format4;
mod format6;
mod format8;
mod format10;
mod format12;
mod format13;
mod format14;

pub use format0::Subtable0;
pub use format4::Subtable4;
pub use format6::TrimmedTable;
pub use format8::Subtable8;
pub use format12::{SequentialMapGroup, Subtable12};
pub use format13::Subtable13;
pub use format14::{
    GlyphVariationResult, Subtable14, UnicodeRangeRecord, UvsMapping, VariationSelectorRecord,
};


/// A [Character to Glyph Index Mapping Table](
/// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap).
#[derive(Clone, Copy, Debug)]
pub struct Table<'a> {
    /// Table version. Always 0 in practice.
    pub version: u16,
    /// A list of subtables.
    pub subtables: Subtables<'a>,
}

impl<'a> Table<'a> {
    /// Parses a table from raw data.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        let version: u16 = s.read()?;
        let count: u16 = s.read()?;
        let records = s.read_array16::<EncodingRecord>(count)?;
        Some(Table { version, subtables: Subtables { data, records } })
    }
}


#[derive(Clone, Copy)]
struct EncodingRecord {
    platform_id: PlatformId,
    encoding_id: u16,
    offset: u32,
}

impl FromData for EncodingRecord {
    const SIZE: usize = 8;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(EncodingRecord {
            platform_id: s.read::<PlatformId>()?,
            encoding_id: s.read::<u16>()?,
            offset: s.read::<u32>()?,
        })
    }
}


/// A list of [character encoding](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap)
/// subtables, in table order.
#[derive(Clone, Copy, Default)]
pub struct Subtables<'a> {
    data: &'a [u8],
    records: LazyArray16<'a, EncodingRecord>,
}

impl<'a> Subtables<'a> {
    /// Returns a subtable at an index.
    ///
    /// Returns `None` when the encoding record or the subtable header is malformed.
    pub fn get(&self, index: u16) -> Option<Subtable<'a>> {
        let record = self.records.get(index)?;
        let data = self.data.get(usize::num_from(record.offset)..)?;
        let format = Format::parse(data)?;
        Some(Subtable {
            platform_id: record.platform_id,
            encoding_id: record.encoding_id,
            format,
        })
    }

    /// Returns the number of encoding records.
    #[inline]
    pub fn len(&self) -> u16 {
        self.records.len()
    }

    /// Checks if there are any encoding records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl core::fmt::Debug for Subtables<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Subtables {{ ... }}")
    }
}

impl<'a> IntoIterator for Subtables<'a> {
    type Item = Subtable<'a>;
    type IntoIter = SubtablesIter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        SubtablesIter { subtables: self, index: 0 }
    }
}

/// An iterator over [`Subtables`].
///
/// Malformed subtables are skipped.
#[derive(Clone, Copy)]
#[allow(missing_debug_implementations)]
pub struct SubtablesIter<'a> {
    subtables: Subtables<'a>,
    index: u16,
}

impl<'a> Iterator for SubtablesIter<'a> {
    type Item = Subtable<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.subtables.len() {
            let index = self.index;
            self.index += 1;

            match self.subtables.get(index) {
                Some(subtable) => return Some(subtable),
                None => {
                    warn!("cmap encoding record {} is malformed. Skipped.", index);
                }
            }
        }

        None
    }
}


/// A character encoding subtable.
#[derive(Clone, Copy, Debug)]
pub struct Subtable<'a> {
    /// Subtable platform.
    pub platform_id: PlatformId,
    /// Subtable encoding.
    pub encoding_id: u16,
    /// A subtable format.
    pub format: Format<'a>,
}

impl<'a> Subtable<'a> {
    /// Returns subtable's language.
    ///
    /// 0 means language-independent.
    #[inline]
    pub fn language(&self) -> u32 {
        self.format.language()
    }
}


/// A character map encoding format.
#[derive(Clone, Copy, Debug)]
pub enum Format<'a> {
    /// Format 0.
    ByteEncodingTable(Subtable0<'a>),
    /// Format 4.
    SegmentMappingToDeltaValues(Subtable4<'a>),
    /// Format 6.
    TrimmedTableMapping(TrimmedTable<'a>),
    /// Format 8. Only the header is parsed.
    MixedCoverage(Subtable8),
    /// Format 10.
    TrimmedArray(TrimmedTable<'a>),
    /// Format 12.
    SegmentedCoverage(Subtable12<'a>),
    /// Format 13.
    ManyToOneRangeMappings(Subtable13<'a>),
    /// Format 14.
    UnicodeVariationSequences(Subtable14<'a>),
    /// Any other format number, including format 2.
    Unknown(u16),
}

impl<'a> Format<'a> {
    /// Parses a subtable from raw data, starting at the format field.
    ///
    /// Returns `None` when the header of a known format is malformed.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let format: u16 = Stream::read_at(data, 0)?;
        let format = match format {
            0 => Format::ByteEncodingTable(Subtable0::parse(data)?),
            4 => Format::SegmentMappingToDeltaValues(Subtable4::parse(data)?),
            6 => Format::TrimmedTableMapping(TrimmedTable::parse(data)?),
            8 => Format::MixedCoverage(Subtable8::parse(data)?),
            10 => Format::TrimmedArray(format10::parse(data)?),
            12 => Format::SegmentedCoverage(Subtable12::parse(data)?),
            13 => Format::ManyToOneRangeMappings(Subtable13::parse(data)?),
            14 => Format::UnicodeVariationSequences(Subtable14::parse(data)?),
            n => Format::Unknown(n),
        };

        Some(format)
    }

    /// Returns the format number.
    pub fn version(&self) -> u16 {
        match self {
            Format::ByteEncodingTable(..) => 0,
            Format::SegmentMappingToDeltaValues(..) => 4,
            Format::TrimmedTableMapping(..) => 6,
            Format::MixedCoverage(..) => 8,
            Format::TrimmedArray(..) => 10,
            Format::SegmentedCoverage(..) => 12,
            Format::ManyToOneRangeMappings(..) => 13,
            Format::UnicodeVariationSequences(..) => 14,
            Format::Unknown(n) => *n,
        }
    }

    /// Returns subtable's language.
    ///
    /// Formats without a language field return 0.
    pub fn language(&self) -> u32 {
        match self {
            Format::ByteEncodingTable(t) => u32::from(t.language),
            Format::SegmentMappingToDeltaValues(t) => u32::from(t.language),
            Format::TrimmedTableMapping(t) | Format::TrimmedArray(t) => t.language,
            Format::MixedCoverage(t) => t.language,
            Format::SegmentedCoverage(t) => t.language,
            Format::ManyToOneRangeMappings(t) => t.language,
            Format::UnicodeVariationSequences(..) | Format::Unknown(..) => 0,
        }
    }

    /// Maps a code point to a glyph ID.
    ///
    /// Unmapped code points resolve to `GlyphId(0)`.
    /// Format 8 and format 14 cannot be used for this
    /// and return `Error::UnimplementedFormat`.
    pub fn glyph_index(&self, code_point: u32) -> Result<GlyphId, Error> {
        let glyph = match self {
            Format::ByteEncodingTable(t) => t.glyph_index(code_point),
            Format::SegmentMappingToDeltaValues(t) => t.glyph_index(code_point),
            Format::TrimmedTableMapping(t) | Format::TrimmedArray(t) => t.glyph_index(code_point),
            Format::SegmentedCoverage(t) => t.glyph_index(code_point),
            Format::ManyToOneRangeMappings(t) => t.glyph_index(code_point),
            Format::MixedCoverage(..) | Format::UnicodeVariationSequences(..) => {
                return Err(Error::UnimplementedFormat(self.version()));
            }
            Format::Unknown(n) => return Err(Error::UnknownFormat(*n)),
        };

        Ok(glyph.unwrap_or_default())
    }

    /// Calls `f` for all codepoints contained in this subtable.
    ///
    /// Note that this may list codepoints for which `glyph_index` still returns
    /// `GlyphId(0)` because this method finds all codepoints which were _defined_ in
    /// this subtable. The subtable may still map them to glyph ID `0`.
    pub fn codepoints(&self, f: impl FnMut(u32)) -> Result<(), Error> {
        match self {
            Format::ByteEncodingTable(t) => t.codepoints(f),
            Format::SegmentMappingToDeltaValues(t) => t.codepoints(f),
            Format::TrimmedTableMapping(t) | Format::TrimmedArray(t) => t.codepoints(f),
            Format::SegmentedCoverage(t) => t.codepoints(f),
            Format::ManyToOneRangeMappings(t) => t.codepoints(f),
            Format::MixedCoverage(..) | Format::UnicodeVariationSequences(..) => {
                return Err(Error::UnimplementedFormat(self.version()));
            }
            Format::Unknown(n) => return Err(Error::UnknownFormat(*n)),
        }

        Ok(())
    }

    /// Calls `f` for all codepoints that map to `glyph_id`.
    ///
    /// Only formats 0, 4, 12 and 13 support reverse lookup.
    pub fn codepoints_for_glyph(&self, glyph_id: GlyphId, f: impl FnMut(u32)) -> Result<(), Error> {
        match self {
            Format::ByteEncodingTable(t) => t.codepoints_for_glyph(glyph_id, f),
            Format::SegmentMappingToDeltaValues(t) => t.codepoints_for_glyph(glyph_id, f),
            Format::SegmentedCoverage(t) => t.codepoints_for_glyph(glyph_id, f),
            Format::ManyToOneRangeMappings(t) => t.codepoints_for_glyph(glyph_id, f),
            Format::TrimmedTableMapping(..)
            | Format::TrimmedArray(..)
            | Format::MixedCoverage(..)
            | Format::UnicodeVariationSequences(..) => {
                return Err(Error::UnimplementedFormat(self.version()));
            }
            Format::Unknown(n) => return Err(Error::UnknownFormat(*n)),
        }

        Ok(())
    }
}
