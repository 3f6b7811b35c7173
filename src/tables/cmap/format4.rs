// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values

use core::convert::TryFrom;

use crate::parser::{LazyArray16, LazyArray32, Stream};
use crate::GlyphId;

/// A [format 4](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values)
/// subtable.
#[derive(Clone, Copy)]
pub struct Subtable4<'a> {
    /// Subtable language.
    pub language: u16,
    /// Segment start character codes.
    pub start_codes: LazyArray16<'a, u16>,
    /// Segment end character codes.
    pub end_codes: LazyArray16<'a, u16>,
    /// Segment deltas.
    pub id_deltas: LazyArray16<'a, i16>,
    /// Segment offsets into the glyph index array, in bytes.
    pub id_range_offsets: LazyArray16<'a, u16>,
    glyph_index_data: &'a [u8],
}

impl<'a> Subtable4<'a> {
    /// Parses a subtable from raw data.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>(); // format
        let length: u16 = s.read()?;
        let language: u16 = s.read()?;
        let seg_count_x2: u16 = s.read()?;
        if seg_count_x2 < 2 {
            return None;
        }

        let seg_count = seg_count_x2 / 2;
        s.advance(6); // searchRange + entrySelector + rangeShift

        let end_codes = s.read_array16::<u16>(seg_count)?;
        s.skip::<u16>(); // reservedPad
        let start_codes = s.read_array16::<u16>(seg_count)?;
        let id_deltas = s.read_array16::<i16>(seg_count)?;
        let id_range_offsets = s.read_array16::<u16>(seg_count)?;
        // The glyph index array ends with the subtable.
        // A `length` that doesn't cover the fixed arrays or overflows the data
        // is ignored, since some fonts store garbage there.
        let glyph_index_data = match data.get(s.offset()..usize::from(length)) {
            Some(glyph_index_data) => glyph_index_data,
            None => s.tail().unwrap_or(&[]),
        };

        Some(Subtable4 {
            language,
            start_codes,
            end_codes,
            id_deltas,
            id_range_offsets,
            glyph_index_data,
        })
    }

    /// Returns the number of segments.
    #[inline]
    pub fn seg_count(&self) -> u16 {
        self.end_codes.len()
    }

    /// Returns the glyph index array.
    #[inline]
    pub fn glyph_index_array(&self) -> LazyArray32<'a, u16> {
        LazyArray32::new(self.glyph_index_data)
    }

    /// Returns a glyph index for a code point.
    pub fn glyph_index(&self, code_point: u32) -> Option<GlyphId> {
        // This subtable supports code points only in a u16 range.
        let code_point = u16::try_from(code_point).ok()?;
        let index = self.find_segment(code_point)?;
        match self.segment_glyph(index, code_point)? {
            0 => None,
            id => Some(GlyphId::from(id)),
        }
    }

    /// Calls `f` for each codepoint defined in this table.
    pub fn codepoints(&self, mut f: impl FnMut(u32)) {
        for (start, end) in self.start_codes.into_iter().zip(self.end_codes) {
            for code_point in start..=end {
                f(u32::from(code_point));
            }
        }
    }

    /// Calls `f` for each codepoint that maps to `glyph_id`.
    ///
    /// Every codepoint of every segment has to be resolved,
    /// so this is the most expensive query of the table.
    pub fn codepoints_for_glyph(&self, glyph_id: GlyphId, mut f: impl FnMut(u32)) {
        let glyph_id = match u16::try_from(glyph_id.0) {
            Ok(id) => id,
            Err(_) => return,
        };

        for index in 0..self.seg_count() {
            let (start, end) = match (self.start_codes.get(index), self.end_codes.get(index)) {
                (Some(start), Some(end)) => (start, end),
                _ => continue,
            };

            for code_point in start..=end {
                if self.segment_glyph(index, code_point).unwrap_or(0) == glyph_id {
                    f(u32::from(code_point));
                }
            }
        }
    }

    // A custom binary search, since a segment must be checked on both bounds.
    fn find_segment(&self, code_point: u16) -> Option<u16> {
        let mut min = 0i32;
        let mut max = i32::from(self.seg_count()) - 1;
        while min <= max {
            let mid = (min + max) / 2;
            let index = u16::try_from(mid).ok()?;
            if code_point < self.start_codes.get(index)? {
                max = mid - 1;
            } else if code_point > self.end_codes.get(index)? {
                min = mid + 1;
            } else {
                return Some(index);
            }
        }

        None
    }

    // Resolves a code point inside of the segment at `index`.
    //
    // Returns 0 for a missing glyph and `None` for an unreadable segment.
    fn segment_glyph(&self, index: u16, code_point: u16) -> Option<u16> {
        let start_code = self.start_codes.get(index)?;
        let id_delta = self.id_deltas.get(index)?;
        let id_range_offset = self.id_range_offsets.get(index)?;
        if id_range_offset == 0 {
            return Some(code_point.wrapping_add(id_delta as u16));
        }

        // `idRangeOffset` is relative to its own position inside the offsets array,
        // so we have to rebase it on the start of the glyph index array.
        let offset = i64::from(id_range_offset)
            + 2 * (i64::from(code_point) - i64::from(start_code))
            - 2 * (i64::from(self.seg_count()) - i64::from(index));

        // Out of bounds and misaligned reads, including the negative ones,
        // are treated as a missing glyph.
        let glyph_array_value = usize::try_from(offset).ok()
            .filter(|offset| offset % 2 == 0)
            .and_then(|offset| Stream::read_at::<u16>(self.glyph_index_data, offset))
            .unwrap_or(0);

        // 0 indicates missing glyph.
        if glyph_array_value == 0 {
            return Some(0);
        }

        Some(glyph_array_value.wrapping_add(id_delta as u16))
    }
}

impl core::fmt::Debug for Subtable4<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Subtable4 {{ ... }}")
    }
}
