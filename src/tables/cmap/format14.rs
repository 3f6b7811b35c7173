// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-14-unicode-variation-sequences

use core::cmp::Ordering;

use crate::GlyphId;
use crate::parser::{FromData, LazyArray32, Offset32, Stream, U24};

/// A variation selector with its default and non-default tables.
#[derive(Clone, Copy, Debug)]
pub struct VariationSelectorRecord {
    /// Variation selector code point.
    pub var_selector: u32,
    /// Offset to a default UVS table, from the start of the subtable.
    pub default_uvs_offset: Option<Offset32>,
    /// Offset to a non-default UVS table, from the start of the subtable.
    pub non_default_uvs_offset: Option<Offset32>,
}

impl FromData for VariationSelectorRecord {
    const SIZE: usize = 11;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(VariationSelectorRecord {
            var_selector: s.read::<U24>()?.0,
            default_uvs_offset: s.read::<Option<Offset32>>()?,
            non_default_uvs_offset: s.read::<Option<Offset32>>()?,
        })
    }
}


/// A non-default variation glyph.
#[derive(Clone, Copy, Debug)]
pub struct UvsMapping {
    /// Base character code point.
    pub unicode_value: u32,
    /// Glyph of the variation sequence.
    pub glyph_id: GlyphId,
}

impl FromData for UvsMapping {
    const SIZE: usize = 5;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(UvsMapping {
            unicode_value: s.read::<U24>()?.0,
            glyph_id: s.read::<GlyphId>()?,
        })
    }
}


/// A range of base characters that use their default glyph.
#[derive(Clone, Copy, Debug)]
pub struct UnicodeRangeRecord {
    /// First code point in the range.
    pub start_unicode_value: u32,
    /// Number of code points in the range, excluding the first one.
    pub additional_count: u8,
}

impl UnicodeRangeRecord {
    /// Checks that the range contains a code point.
    pub fn contains(&self, c: u32) -> bool {
        // Never overflows, since `start_unicode_value` is actually u24.
        let end = self.start_unicode_value + u32::from(self.additional_count);
        (self.start_unicode_value..=end).contains(&c)
    }

    fn cmp_code_point(&self, c: u32) -> Ordering {
        if self.contains(c) {
            Ordering::Equal
        } else if self.start_unicode_value > c {
            Ordering::Greater
        } else {
            Ordering::Less
        }
    }
}

impl FromData for UnicodeRangeRecord {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(UnicodeRangeRecord {
            start_unicode_value: s.read::<U24>()?.0,
            additional_count: s.read::<u8>()?,
        })
    }
}


/// A result of a variation glyph mapping.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum GlyphVariationResult {
    /// Glyph was found in the variation encoding table.
    Found(GlyphId),
    /// Glyph should be looked in other, non-variation tables.
    ///
    /// Basically, you should use `Format::glyph_index` or `Processor::lookup`
    /// without a variation selector in this case.
    UseDefault,
}


/// A [format 14](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-14-unicode-variation-sequences)
/// subtable.
#[derive(Clone, Copy)]
pub struct Subtable14<'a> {
    /// Variation selector records, sorted by selector.
    pub records: LazyArray32<'a, VariationSelectorRecord>,
    // The whole subtable, since the offsets start from its beginning.
    data: &'a [u8],
}

impl<'a> Subtable14<'a> {
    /// Parses a subtable from raw data.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>(); // format
        s.skip::<u32>(); // length
        let count: u32 = s.read()?;
        let records = s.read_array32::<VariationSelectorRecord>(count)?;
        Some(Subtable14 { records, data })
    }

    /// Returns a glyph index for a code point and a variation selector.
    ///
    /// Returns `None` when the selector is not present
    /// or the code point is not a part of its tables.
    pub fn glyph_index(&self, code_point: u32, variation: u32) -> Option<GlyphVariationResult> {
        let (_, record) = self.records.binary_search_by(|v| v.var_selector.cmp(&variation))?;

        if let Some(offset) = record.default_uvs_offset {
            let data = self.data.get(offset.to_usize()..)?;
            let mut s = Stream::new(data);
            let count: u32 = s.read()?;
            let ranges = s.read_array32::<UnicodeRangeRecord>(count)?;
            if ranges.binary_search_by(|r| r.cmp_code_point(code_point)).is_some() {
                return Some(GlyphVariationResult::UseDefault);
            }
        }

        if let Some(offset) = record.non_default_uvs_offset {
            let data = self.data.get(offset.to_usize()..)?;
            let mut s = Stream::new(data);
            let count: u32 = s.read()?;
            let uvs_mappings = s.read_array32::<UvsMapping>(count)?;
            let (_, mapping) = uvs_mappings.binary_search_by(|v| v.unicode_value.cmp(&code_point))?;
            return Some(GlyphVariationResult::Found(mapping.glyph_id));
        }

        None
    }
}

impl core::fmt::Debug for Subtable14<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Subtable14 {{ ... }}")
    }
}
