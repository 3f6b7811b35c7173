// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-13-many-to-one-range-mappings

use crate::parser::LazyArray32;
use crate::GlyphId;
use super::format12::{parse_groups, SequentialMapGroup};

/// A [format 13](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-13-many-to-one-range-mappings)
/// subtable.
#[derive(Clone, Copy)]
pub struct Subtable13<'a> {
    /// Subtable language.
    pub language: u32,
    /// Character ranges, sorted by start code.
    pub groups: LazyArray32<'a, SequentialMapGroup>,
}

impl<'a> Subtable13<'a> {
    /// Parses a subtable from raw data.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let (language, groups) = parse_groups(data)?;
        Some(Subtable13 { language, groups })
    }

    /// Returns a glyph index for a code point.
    pub fn glyph_index(&self, code_point: u32) -> Option<GlyphId> {
        let (_, group) = self.groups.binary_search_by(|g| g.cmp_code_point(code_point))?;
        if group.start_glyph_id != 0 { Some(GlyphId(group.start_glyph_id)) } else { None }
    }

    /// Calls `f` for each codepoint defined in this table.
    pub fn codepoints(&self, mut f: impl FnMut(u32)) {
        for group in self.groups {
            group.codepoints(&mut f);
        }
    }

    /// Calls `f` for each codepoint that maps to `glyph_id`.
    pub fn codepoints_for_glyph(&self, glyph_id: GlyphId, mut f: impl FnMut(u32)) {
        for group in self.groups {
            if group.start_glyph_id == glyph_id.0 {
                group.codepoints(&mut f);
            }
        }
    }
}

impl core::fmt::Debug for Subtable13<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Subtable13 {{ ... }}")
    }
}
