// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-12-segmented-coverage

use core::cmp::Ordering;

use crate::parser::{FromData, LazyArray32, Stream};
use crate::GlyphId;

/// The last valid Unicode code point.
///
/// Enumeration never goes past it, even when a malformed group does.
pub(crate) const MAX_CODE_POINT: u32 = 0x10FFFF;

/// A character range mapped to glyphs.
///
/// Shared by formats 12 and 13.
#[derive(Clone, Copy, Debug)]
pub struct SequentialMapGroup {
    /// First character code in the group.
    pub start_char_code: u32,
    /// Last character code in the group, inclusive.
    pub end_char_code: u32,
    /// Glyph ID of the first character code.
    ///
    /// Format 13 maps the whole group to it.
    pub start_glyph_id: u32,
}

impl SequentialMapGroup {
    // Orders the group relative to a code point.
    #[inline]
    pub(crate) fn cmp_code_point(&self, code_point: u32) -> Ordering {
        if self.start_char_code > code_point {
            Ordering::Greater
        } else if self.end_char_code < code_point {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }

    #[inline]
    pub(crate) fn codepoints(&self, mut f: impl FnMut(u32)) {
        for code_point in self.start_char_code..=self.end_char_code.min(MAX_CODE_POINT) {
            f(code_point);
        }
    }
}

impl FromData for SequentialMapGroup {
    const SIZE: usize = 12;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(SequentialMapGroup {
            start_char_code: s.read::<u32>()?,
            end_char_code: s.read::<u32>()?,
            start_glyph_id: s.read::<u32>()?,
        })
    }
}

// Formats 12 and 13 share the same layout.
pub(crate) fn parse_groups(data: &[u8]) -> Option<(u32, LazyArray32<'_, SequentialMapGroup>)> {
    let mut s = Stream::new(data);
    s.skip::<u16>(); // format
    s.skip::<u16>(); // reserved
    s.skip::<u32>(); // length
    let language: u32 = s.read()?;
    let count: u32 = s.read()?;
    let groups = s.read_array32::<SequentialMapGroup>(count)?;
    Some((language, groups))
}


/// A [format 12](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-12-segmented-coverage)
/// subtable.
#[derive(Clone, Copy)]
pub struct Subtable12<'a> {
    /// Subtable language.
    pub language: u32,
    /// Character ranges, sorted by start code.
    pub groups: LazyArray32<'a, SequentialMapGroup>,
}

impl<'a> Subtable12<'a> {
    /// Parses a subtable from raw data.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let (language, groups) = parse_groups(data)?;
        Some(Subtable12 { language, groups })
    }

    /// Returns a glyph index for a code point.
    pub fn glyph_index(&self, code_point: u32) -> Option<GlyphId> {
        let (_, group) = self.groups.binary_search_by(|g| g.cmp_code_point(code_point))?;
        let id = group.start_glyph_id.checked_add(code_point - group.start_char_code)?;
        if id != 0 { Some(GlyphId(id)) } else { None }
    }

    /// Calls `f` for each codepoint defined in this table.
    pub fn codepoints(&self, mut f: impl FnMut(u32)) {
        for group in self.groups {
            group.codepoints(&mut f);
        }
    }

    /// Calls `f` for each codepoint that maps to `glyph_id`.
    ///
    /// Groups are not required to have unique glyph ranges,
    /// so all of them are checked.
    pub fn codepoints_for_glyph(&self, glyph_id: GlyphId, mut f: impl FnMut(u32)) {
        for group in self.groups {
            let code_point = glyph_id.0.checked_sub(group.start_glyph_id)
                .and_then(|offset| group.start_char_code.checked_add(offset));

            if let Some(code_point) = code_point {
                if code_point <= group.end_char_code {
                    f(code_point);
                }
            }
        }
    }
}

impl core::fmt::Debug for Subtable12<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Subtable12 {{ ... }}")
    }
}
