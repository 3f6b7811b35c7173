#[macro_use]
extern crate afl;

const CODE_POINTS: &[u32] = &[
    0x0000,
    0x0041,
    0x0424,
    0x00E9,
    0xD7FF,
    0xFFFF,
    0x1F600,
    0x10FFFF,
];

fn main() {
    afl::fuzz!(|data: &[u8]| {
        if let Ok(processor) = ttf_cmap::Processor::from_data(data) {
            for c in CODE_POINTS {
                let _ = processor.lookup(*c, None);
                let _ = processor.lookup(*c, Some(0xFE00));
            }

            let _ = processor.character_set();
            let _ = processor.codepoints_for_glyph(ttf_cmap::GlyphId(1));
        }
    });
}
