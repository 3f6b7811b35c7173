use std::collections::BTreeSet;
use std::sync::Arc;

use ttf_cmap::{
    Encoding, EncodingRegistry, Encodings, Error, GlyphId, PlatformId, Processor, RemapTable,
};

use crate::*;

fn set(codepoints: impl IntoIterator<Item = u32>) -> BTreeSet<u32> {
    codepoints.into_iter().collect()
}

mod selection {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unicode_priority() {
        let format6_a = trimmed_table(0x41, &[1]);
        let format6_b = trimmed_table(0x41, &[2]);
        let data = cmap_table(&[
            (0, 0, &format6_a[..]),
            (3, 1, &format6_b[..]),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(processor.lookup(0x41, None), GlyphId(2));
        assert_eq!(processor.subtable().platform_id, PlatformId::Windows);
        assert!(!processor.is_legacy());
    }

    #[test]
    fn full_repertoire_first() {
        let format6 = trimmed_table(0x41, &[1]);
        let data = cmap_table(&[
            (3, 1, &format6[..]),
            (0, 4, FORMAT12),
            (3, 10, FORMAT13),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(processor.subtable().encoding_id, 10);
        assert_eq!(processor.lookup(0x20, None), GlyphId(7));
    }

    #[test]
    fn first_record_wins() {
        let format6_a = trimmed_table(0x41, &[1]);
        let format6_b = trimmed_table(0x41, &[2]);
        let data = cmap_table(&[
            (3, 1, &format6_a[..]),
            (3, 1, &format6_b[..]),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(processor.lookup(0x41, None), GlyphId(1));
    }

    #[test]
    fn malformed_unicode_subtable_is_skipped() {
        let format6 = trimmed_table(0x41, &[1]);
        let data = cmap_table(&[
            (0, 3, &format6[..]),
            (3, 1, &[0x00, 0x06, 0x00][..]), // truncated format 6
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(processor.subtable().platform_id, PlatformId::Unicode);
        assert_eq!(processor.lookup(0x41, None), GlyphId(1));
    }

    #[test]
    fn no_supported_cmap() {
        let format6 = trimmed_table(0x41, &[1]);
        let data = cmap_table(&[
            (1, 1, &format6[..]), // Shift-JIS has no remap table
            (3, 0, &format6[..]), // Windows Symbol neither
        ]);

        assert_eq!(Processor::from_data(&data).unwrap_err(), Error::NoSupportedCmap);
    }

    #[test]
    fn variation_subtable() {
        let data = cmap_table(&[
            (0, 3, FORMAT4_A_TO_F),
            (0, 5, FORMAT14),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert!(processor.variation_subtable().is_some());
    }

    #[test]
    fn non_format14_variation_subtable_is_discarded() {
        let data = cmap_table(&[
            (0, 3, FORMAT4_A_TO_F),
            (0, 5, FORMAT4_A_TO_F),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert!(processor.variation_subtable().is_none());
        assert_eq!(processor.lookup(0x41, Some(0xFE00)), GlyphId(0x41));
    }
}

mod legacy {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mac_roman_fallback() {
        let format0 = byte_encoding_table(0, &[(0x41, 7), (0x8E, 42)]);
        let data = cmap_table(&[
            (1, 0, &format0[..]),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert!(processor.is_legacy());
        // ASCII is passed as is.
        assert_eq!(processor.lookup(u32::from('A'), None), GlyphId(7));
        // U+00E9 is 0x8E in Mac Roman.
        assert_eq!(processor.lookup(u32::from('é'), None), GlyphId(42));
        assert_eq!(processor.lookup(u32::from('€'), None), GlyphId::NOTDEF);
        // Variation selectors are ignored.
        assert_eq!(processor.lookup(u32::from('A'), Some(0xFE00)), GlyphId(7));
    }

    #[test]
    fn first_legacy_subtable_wins() {
        let format0_a = byte_encoding_table(0, &[(0x41, 1)]);
        let format0_b = byte_encoding_table(0, &[(0x41, 2)]);
        let data = cmap_table(&[
            (1, 0, &format0_a[..]),
            (1, 0, &format0_b[..]),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(processor.lookup(0x41, None), GlyphId(1));
    }

    #[test]
    fn language_specific_encoding() {
        // Language 18 is Turkish (17) plus one, which uses its own encoding.
        let format0 = byte_encoding_table(18, &[(0x41, 1)]);
        let data = cmap_table(&[
            (1, 0, &format0[..]),
        ]);

        assert_eq!(Processor::from_data(&data).unwrap_err(), Error::NoSupportedCmap);

        // Language 1 is English (0) plus one, which is plain Mac Roman.
        let format0 = byte_encoding_table(1, &[(0x41, 1)]);
        let data = cmap_table(&[
            (1, 0, &format0[..]),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(processor.lookup(0x41, None), GlyphId(1));
    }

    struct ShiftJisRegistry;

    impl EncodingRegistry for ShiftJisRegistry {
        fn encoding(&self, platform_id: PlatformId, encoding_id: u16, language: Option<u16>) -> Option<Encoding> {
            Encodings.encoding(platform_id, encoding_id, language)
        }

        fn mapping(&self, encoding: Encoding) -> Option<RemapTable<'_>> {
            match encoding {
                // HIRAGANA LETTER A
                Encoding::ShiftJis => Some(RemapTable::new(&[(0x3042, 0x82A0)])),
                _ => None,
            }
        }
    }

    #[test]
    fn custom_registry() {
        let format6 = trimmed_table(0x82A0, &[9]);
        let data = cmap_table(&[
            (1, 1, &format6[..]),
        ]);

        let table = ttf_cmap::cmap::Table::parse(&data).unwrap();
        assert_eq!(Processor::new(&table).unwrap_err(), Error::NoSupportedCmap);

        let registry = ShiftJisRegistry;
        let processor = Processor::with_registry(&table, &registry).unwrap();
        assert_eq!(processor.lookup(0x3042, None), GlyphId(9));
        assert_eq!(processor.lookup(0x3044, None), GlyphId::NOTDEF);
    }
}

mod lookup {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn format4_delta() {
        let data = cmap_table(&[
            (3, 1, FORMAT4_A_TO_F),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(processor.lookup(65, None), GlyphId(65));
        assert_eq!(processor.lookup(70, None), GlyphId(70));
        assert_eq!(processor.lookup(71, None), GlyphId(0));
        assert_eq!(processor.lookup(0x10041, None), GlyphId(0));
    }

    #[test]
    fn format4_glyph_array() {
        let data = cmap_table(&[
            (3, 1, FORMAT4_GLYPH_ARRAY),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(processor.lookup(0x41, None), GlyphId(1));
        assert_eq!(processor.lookup(0x42, None), GlyphId(0));
        assert_eq!(processor.lookup(0x43, None), GlyphId(100));
        assert_eq!(processor.lookup(0x45, None), GlyphId(10000));
    }

    #[test]
    fn format4_glyph_array_ends_with_subtable() {
        let mut format4 = FORMAT4_A_TO_F.to_vec();
        format4[29] = 0x04; // offset [0]: 4, while the glyph index array is empty
        let format6 = trimmed_table(0x41, &[1]);
        let data = cmap_table(&[
            (3, 1, &format4[..]),
            (1, 0, &format6[..]),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(processor.lookup(0x41, None), GlyphId(0));
        assert_eq!(processor.lookup(0x42, None), GlyphId(0));
    }

    #[test]
    fn format12() {
        let data = cmap_table(&[
            (3, 10, FORMAT12),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(processor.lookup(0x10002, None), GlyphId(502));
        assert_eq!(processor.lookup(0x10006, None), GlyphId(0));
        assert_eq!(*processor.codepoints_for_glyph(GlyphId(502)).unwrap(), set(vec![0x10002]));
    }

    #[test]
    fn format13() {
        let data = cmap_table(&[
            (3, 10, FORMAT13),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        for c in 0x20..=0x25 {
            assert_eq!(processor.lookup(c, None), GlyphId(7));
        }
        assert_eq!(processor.lookup(0x26, None), GlyphId(0));
        assert_eq!(*processor.codepoints_for_glyph(GlyphId(7)).unwrap(), set(0x20..=0x25));
    }

    #[test]
    fn format10() {
        let data = &[
            0x00, 0x0A, // format: 10
            0x00, 0x00, // reserved
            0x00, 0x00, 0x00, 0x18, // length: 24
            0x00, 0x00, 0x00, 0x00, // language: 0
            0x00, 0x01, 0xF6, 0x00, // first code point: 128512
            0x00, 0x00, 0x00, 0x02, // count: 2
            0x00, 0x0A, // glyph ID [0]: 10
            0x00, 0x0B, // glyph ID [1]: 11
        ];
        let data = cmap_table(&[
            (0, 4, &data[..]),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(processor.lookup(0x1F601, None), GlyphId(11));
        assert_eq!(processor.lookup(0x1F602, None), GlyphId(0));
        assert_eq!(*processor.character_set().unwrap(), set(vec![0x1F600, 0x1F601]));
        assert_eq!(processor.codepoints_for_glyph(GlyphId(10)).unwrap_err(),
                   Error::UnimplementedFormat(10));
    }

    #[test]
    fn unknown_format() {
        let data = cmap_table(&[
            (3, 1, &[0x00, 0xFF, 0x00, 0x00][..]),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(processor.character_set().unwrap_err(), Error::UnknownFormat(255));
        assert_eq!(processor.codepoints_for_glyph(GlyphId(1)).unwrap_err(), Error::UnknownFormat(255));
        assert_eq!(processor.try_lookup(0x41, None), Err(Error::UnknownFormat(255)));
        assert_eq!(processor.lookup(0x41, None), GlyphId::NOTDEF);
    }

    #[test]
    fn high_byte_mapping_is_unknown() {
        let data = cmap_table(&[
            (3, 1, &[0x00, 0x02, 0x02, 0x06, 0x00, 0x00][..]),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(processor.try_lookup(0x41, None), Err(Error::UnknownFormat(2)));
    }

    #[test]
    fn mixed_coverage() {
        let data = cmap_table(&[
            (3, 1, FORMAT8),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(processor.try_lookup(0x41, None), Err(Error::UnimplementedFormat(8)));
        assert_eq!(processor.lookup(0x41, None), GlyphId::NOTDEF);
        assert_eq!(processor.character_set().unwrap_err(), Error::UnimplementedFormat(8));
    }

    #[test]
    fn variation_sequences_as_primary() {
        let data = cmap_table(&[
            (0, 3, FORMAT14),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert!(processor.variation_subtable().is_none());
        assert_eq!(processor.try_lookup(0x40, Some(0xFE00)), Err(Error::UnimplementedFormat(14)));
        assert_eq!(processor.character_set().unwrap_err(), Error::UnimplementedFormat(14));
        assert_eq!(processor.codepoints_for_glyph(GlyphId(99)).unwrap_err(),
                   Error::UnimplementedFormat(14));
    }
}

mod variations {
    use super::*;
    use pretty_assertions::assert_eq;

    fn processor_data() -> Vec<u8> {
        // Maps 0x30..=0x41 to 1..=18.
        let glyphs: Vec<u16> = (1..=18).collect();
        let format6 = trimmed_table(0x30, &glyphs);
        cmap_table(&[
            (0, 3, &format6[..]),
            (0, 5, FORMAT14),
        ])
    }

    #[test]
    fn default_range() {
        let data = processor_data();
        let processor = Processor::from_data(&data).unwrap();
        // The selector is known, but this is the default glyph.
        assert_eq!(processor.resolve(0x31, 0xFE00), GlyphId(0));
        assert_eq!(processor.lookup(0x31, Some(0xFE00)), GlyphId(2));
    }

    #[test]
    fn explicit_mapping() {
        let data = processor_data();
        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(processor.resolve(0x40, 0xFE00), GlyphId(99));
        assert_eq!(processor.resolve(0x41, 0xFE00), GlyphId(0));
        assert_eq!(processor.lookup(0x40, Some(0xFE00)), GlyphId(99));
        assert_eq!(processor.lookup(0x41, Some(0xFE00)), GlyphId(18));
        assert_eq!(processor.lookup(0x40, None), GlyphId(17));
    }

    #[test]
    fn unknown_selector() {
        let data = processor_data();
        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(processor.resolve(0x40, 0xFE0F), GlyphId(0));
        assert_eq!(processor.lookup(0x40, Some(0xFE0F)), GlyphId(17));
    }

    #[test]
    fn no_variation_subtable() {
        let data = cmap_table(&[
            (0, 3, FORMAT4_A_TO_F),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(processor.resolve(0x41, 0xFE00), GlyphId(0));
        assert_eq!(processor.lookup(0x41, Some(0xFE00)), GlyphId(0x41));
    }
}

mod enumeration {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn format0() {
        let format0 = byte_encoding_table(0, &[(0x41, 7)]);
        let data = cmap_table(&[
            (0, 3, &format0[..]),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(*processor.character_set().unwrap(), set(0..256));
        assert_eq!(*processor.codepoints_for_glyph(GlyphId(7)).unwrap(), set(vec![0x41]));
    }

    #[test]
    fn format4() {
        let data = cmap_table(&[
            (3, 1, FORMAT4_A_TO_F),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        let expected = set((0x41..=0x46).chain(Some(0xFFFF)));
        assert_eq!(*processor.character_set().unwrap(), expected);
        assert_eq!(*processor.codepoints_for_glyph(GlyphId(0x43)).unwrap(), set(vec![0x43]));
    }

    #[test]
    fn consistent_with_lookup() {
        let format0 = byte_encoding_table(0, &[(0x41, 7), (0x42, 7), (0xE9, 42)]);
        let subtables: [&[u8]; 4] = [&format0[..], FORMAT4_GLYPH_ARRAY, FORMAT12, FORMAT13];
        for subtable in subtables {
            let data = cmap_table(&[
                (3, 10, subtable),
            ]);

            let processor = Processor::from_data(&data).unwrap();
            let character_set = processor.character_set().unwrap();
            let mut mapped = 0;
            for c in (0..=0xFFFF).chain(0x10000..0x10010) {
                let glyph_id = processor.lookup(c, None);
                if !glyph_id.is_notdef() {
                    mapped += 1;
                    assert!(character_set.contains(&c));
                    assert!(processor.codepoints_for_glyph(glyph_id).unwrap().contains(&c));
                }
            }

            assert!(mapped > 0);
        }
    }

    #[test]
    fn format4_shared_glyph() {
        let data = cmap_table(&[
            (3, 1, FORMAT4_GLYPH_ARRAY),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        assert_eq!(*processor.codepoints_for_glyph(GlyphId(1)).unwrap(), set(vec![0x41, 0x44]));
    }

    #[test]
    fn idempotence() {
        let data = cmap_table(&[
            (3, 10, FORMAT12),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        let a = processor.character_set().unwrap();
        let b = processor.character_set().unwrap();
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a, &b));

        let a = processor.codepoints_for_glyph(GlyphId(501)).unwrap();
        let b = processor.codepoints_for_glyph(GlyphId(501)).unwrap();
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn shared_between_threads() {
        let data = cmap_table(&[
            (3, 10, FORMAT12),
        ]);

        let processor = Processor::from_data(&data).unwrap();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    assert_eq!(processor.character_set().unwrap().len(), 6);
                    assert_eq!(processor.lookup(0x10000, None), GlyphId(500));
                });
            }
        });
    }
}

#[test]
fn truncated_tables_never_panic() {
    let format0 = byte_encoding_table(0, &[(0x41, 7)]);
    let data = cmap_table(&[
        (0, 3, FORMAT4_GLYPH_ARRAY),
        (3, 10, FORMAT12),
        (3, 1, FORMAT13),
        (0, 5, FORMAT14),
        (1, 0, &format0[..]),
    ]);

    for len in 0..data.len() {
        if let Ok(processor) = Processor::from_data(&data[..len]) {
            for c in [0x30, 0x40, 0x41, 0x45, 0x10002, 0x10FFFF] {
                let _ = processor.lookup(c, None);
                let _ = processor.lookup(c, Some(0xFE00));
            }

            let _ = processor.character_set();
            let _ = processor.codepoints_for_glyph(GlyphId(1));
        }
    }
}
