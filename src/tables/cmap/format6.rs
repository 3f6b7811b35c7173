// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-6-trimmed-table-mapping

use crate::parser::{LazyArray32, Stream};
use crate::GlyphId;

/// A [format 6](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-6-trimmed-table-mapping)
/// or a [format 10](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-10-trimmed-array)
/// subtable.
///
/// Both formats map a single dense range of code points
/// and differ only in the header field sizes.
#[derive(Clone, Copy, Debug)]
pub struct TrimmedTable<'a> {
    /// Subtable language.
    pub language: u32,
    /// First code point covered by the table.
    pub first_code_point: u32,
    /// Glyph IDs for the dense code point range.
    pub glyphs: LazyArray32<'a, u16>,
}

impl<'a> TrimmedTable<'a> {
    /// Parses a format 6 subtable from raw data.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>(); // format
        s.skip::<u16>(); // length
        let language: u16 = s.read()?;
        let first_code_point: u16 = s.read()?;
        let count: u16 = s.read()?;
        let glyphs = s.read_array32::<u16>(u32::from(count))?;
        Some(TrimmedTable {
            language: u32::from(language),
            first_code_point: u32::from(first_code_point),
            glyphs,
        })
    }

    /// Returns a glyph index for a code point.
    pub fn glyph_index(&self, code_point: u32) -> Option<GlyphId> {
        let index = code_point.checked_sub(self.first_code_point)?;
        match self.glyphs.get(index)? {
            0 => None,
            id => Some(GlyphId::from(id)),
        }
    }

    /// Calls `f` for each codepoint defined in this table.
    pub fn codepoints(&self, mut f: impl FnMut(u32)) {
        for i in 0..self.glyphs.len() {
            if let Some(code_point) = self.first_code_point.checked_add(i) {
                f(code_point);
            }
        }
    }
}
