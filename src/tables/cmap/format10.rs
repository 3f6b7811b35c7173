// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-10-trimmed-array

use crate::parser::Stream;
use super::format6::TrimmedTable;

/// Parses a format 10 subtable from raw data.
///
/// The result is the same trimmed table as format 6 produces,
/// but with 32-bit header fields.
pub fn parse(data: &[u8]) -> Option<TrimmedTable<'_>> {
    let mut s = Stream::new(data);
    s.skip::<u16>(); // format
    s.skip::<u16>(); // reserved
    s.skip::<u32>(); // length
    let language: u32 = s.read()?;
    let first_code_point: u32 = s.read()?;
    let count: u32 = s.read()?;
    let glyphs = s.read_array32::<u16>(count)?;
    Some(TrimmedTable { language, first_code_point, glyphs })
}
