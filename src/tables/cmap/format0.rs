// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-0-byte-encoding-table

use core::convert::TryFrom;

use crate::parser::{LazyArray16, Stream};
use crate::GlyphId;

/// A [format 0](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-0-byte-encoding-table)
/// subtable.
#[derive(Clone, Copy, Debug)]
pub struct Subtable0<'a> {
    /// Subtable language.
    pub language: u16,
    /// Just a list of 256 8bit glyph IDs.
    pub glyph_ids: LazyArray16<'a, u8>,
}

impl<'a> Subtable0<'a> {
    /// Parses a subtable from raw data.
    ///
    /// A truncated glyph array is accepted. Missing codes are simply unmapped.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>(); // format
        s.skip::<u16>(); // length
        let language = s.read::<u16>()?;
        let count = s.tail()?.len().min(256) as u16;
        let glyph_ids = s.read_array16::<u8>(count)?;
        Some(Subtable0 { language, glyph_ids })
    }

    /// Returns a glyph index for a code point.
    ///
    /// Returns `None` for code points past 255 and for unmapped ones.
    pub fn glyph_index(&self, code_point: u32) -> Option<GlyphId> {
        let glyph_id = self.glyph_ids.get(u16::try_from(code_point).ok()?)?;
        // Make sure that the glyph is not zero, the array always has length 256,
        // but some codepoints may be mapped to zero.
        if glyph_id != 0 {
            Some(GlyphId::from(u16::from(glyph_id)))
        } else {
            None
        }
    }

    /// Calls `f` for each codepoint defined in this table.
    ///
    /// Every slot of the array is defined, including the ones set to zero.
    pub fn codepoints(&self, mut f: impl FnMut(u32)) {
        for code_point in 0..u32::from(self.glyph_ids.len()) {
            f(code_point);
        }
    }

    /// Calls `f` for each codepoint that maps to `glyph_id`.
    pub fn codepoints_for_glyph(&self, glyph_id: GlyphId, mut f: impl FnMut(u32)) {
        for (code_point, id) in (0u32..).zip(self.glyph_ids) {
            if u32::from(id) == glyph_id.0 {
                f(code_point);
            }
        }
    }
}
