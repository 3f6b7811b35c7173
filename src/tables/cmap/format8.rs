// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-8-mixed-16-bit-and-32-bit-coverage

use crate::parser::Stream;

/// A [format 8](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-8-mixed-16-bit-and-32-bit-coverage)
/// subtable.
///
/// Only the header is parsed. Lookups in this format are not supported.
#[derive(Clone, Copy, Debug)]
pub struct Subtable8 {
    /// Subtable language.
    pub language: u32,
}

impl Subtable8 {
    /// Parses a subtable from raw data.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>(); // format
        s.skip::<u16>(); // reserved
        s.skip::<u32>(); // length
        let language: u32 = s.read()?;
        Some(Subtable8 { language })
    }
}
