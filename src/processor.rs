use core::convert::TryFrom;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::cache::{CacheKey, ResultCache};
use crate::cmap::{Format, GlyphVariationResult, Subtable, Subtable14, Table};
use crate::encoding::{EncodingRegistry, RemapTable, DEFAULT_ENCODINGS};
use crate::{Error, GlyphId, PlatformId};

/// Unicode subtables in the order of preference.
///
/// Full repertoire subtables come first.
const UNICODE_SUBTABLES: &[(PlatformId, u16)] = &[
    // 32-bit subtables
    (PlatformId::Windows, 10),
    (PlatformId::Unicode, 6),
    (PlatformId::Unicode, 4),
    // 16-bit subtables
    (PlatformId::Windows, 1),
    (PlatformId::Unicode, 3),
    (PlatformId::Unicode, 2),
    (PlatformId::Unicode, 1),
    (PlatformId::Unicode, 0),
];

// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#unicode-platform-platform-id--0
const UNICODE_VARIATION_SEQUENCES_ENCODING_ID: u16 = 5;

/// A character to glyph mapping processor.
///
/// Selects the best subtable of a `cmap` table once
/// and then answers lookup and enumeration queries against it.
///
/// Enumeration results are cached per processor.
/// The processor is `Send` and `Sync`, so it can be shared between threads.
///
/// # Example
///
/// ```
/// use ttf_cmap::{cmap, GlyphId, Processor};
///
/// let data = &[
///     0x00, 0x00, // version: 0
///     0x00, 0x01, // number of tables: 1
///     0x00, 0x03, 0x00, 0x01, // platform: Windows, encoding: Unicode BMP
///     0x00, 0x00, 0x00, 0x0C, // offset: 12
///     // Format 6 subtable
///     0x00, 0x06, // format: 6
///     0x00, 0x0E, // length: 14
///     0x00, 0x00, // language: 0
///     0x00, 0x41, // first code point: 65
///     0x00, 0x02, // count: 2
///     0x00, 0x03, // glyph ID [0]: 3
///     0x00, 0x04, // glyph ID [1]: 4
/// ];
///
/// let table = cmap::Table::parse(data).unwrap();
/// let processor = Processor::new(&table).unwrap();
/// assert_eq!(processor.lookup(u32::from('B'), None), GlyphId(4));
/// assert_eq!(processor.lookup(u32::from('C'), None), GlyphId::NOTDEF);
/// ```
#[derive(Debug)]
pub struct Processor<'a> {
    subtable: Subtable<'a>,
    variations: Option<Subtable14<'a>>,
    remap: Option<RemapTable<'a>>,
    cache: ResultCache,
}

impl<'a> Processor<'a> {
    /// Creates a new processor using the built-in encodings registry.
    ///
    /// Returns `Error::NoSupportedCmap` when the table has neither
    /// a Unicode subtable nor a remappable legacy one.
    pub fn new(table: &Table<'a>) -> Result<Self, Error> {
        Self::with_registry(table, &DEFAULT_ENCODINGS)
    }

    /// Creates a new processor using a custom encodings registry.
    ///
    /// The registry is consulted only when the table has no Unicode subtable.
    pub fn with_registry(table: &Table<'a>, registry: &'a dyn EncodingRegistry) -> Result<Self, Error> {
        let (subtable, remap) = match select_unicode(table) {
            Some(subtable) => (subtable, None),
            None => {
                let (subtable, remap) = select_legacy(table, registry).ok_or(Error::NoSupportedCmap)?;
                debug!(
                    "No Unicode cmap subtable. Falling back to a legacy {:?}/{} one.",
                    subtable.platform_id, subtable.encoding_id,
                );
                (subtable, Some(remap))
            }
        };

        debug!(
            "Using a cmap subtable {:?}/{} with format {}.",
            subtable.platform_id, subtable.encoding_id, subtable.format.version(),
        );

        Ok(Processor {
            subtable,
            variations: select_variations(table),
            remap,
            cache: ResultCache::default(),
        })
    }

    /// Parses a `cmap` table and creates a new processor for it.
    ///
    /// Returns `Error::MalformedTable` when the table header cannot be parsed.
    pub fn from_data(data: &'a [u8]) -> Result<Self, Error> {
        let table = Table::parse(data).ok_or(Error::MalformedTable)?;
        Self::new(&table)
    }

    /// Returns the active subtable.
    #[inline]
    pub fn subtable(&self) -> Subtable<'a> {
        self.subtable
    }

    /// Returns the Unicode Variation Sequences subtable, if any.
    #[inline]
    pub fn variation_subtable(&self) -> Option<Subtable14<'a>> {
        self.variations
    }

    /// Checks that the active subtable uses a legacy encoding.
    #[inline]
    pub fn is_legacy(&self) -> bool {
        self.remap.is_some()
    }

    /// Maps a code point to a glyph.
    ///
    /// Never fails. Unmapped code points and unsupported subtables
    /// resolve to `GlyphId::NOTDEF`.
    pub fn lookup(&self, code_point: u32, variation: Option<u32>) -> GlyphId {
        match self.try_lookup(code_point, variation) {
            Ok(id) => id,
            Err(e) => {
                warn!("Failed to map U+{:04X}: {}.", code_point, e);
                GlyphId::NOTDEF
            }
        }
    }

    /// Maps a code point to a glyph.
    ///
    /// Unlike [`lookup`](Self::lookup), reports unsupported subtable formats.
    ///
    /// Variation selectors are ignored for legacy subtables,
    /// since Unicode Variation Sequences are defined only for Unicode.
    pub fn try_lookup(&self, code_point: u32, variation: Option<u32>) -> Result<GlyphId, Error> {
        let code_point = match self.remap {
            // Unmapped code points are passed as is, which covers ASCII.
            Some(remap) => remap.get(code_point).unwrap_or(code_point),
            None => {
                if let Some(variation) = variation {
                    let id = self.resolve(code_point, variation);
                    if !id.is_notdef() {
                        return Ok(id);
                    }
                }

                code_point
            }
        };

        self.subtable.format.glyph_index(code_point)
    }

    /// Resolves a variation sequence to a glyph.
    ///
    /// Returns `GlyphId::NOTDEF` when there is no variations subtable,
    /// the selector is unknown or the code point should use its default glyph.
    /// In all of these cases an ordinary lookup should be used instead.
    pub fn resolve(&self, code_point: u32, variation: u32) -> GlyphId {
        match self.variations.and_then(|t| t.glyph_index(code_point, variation)) {
            Some(GlyphVariationResult::Found(id)) => id,
            Some(GlyphVariationResult::UseDefault) | None => GlyphId::NOTDEF,
        }
    }

    /// Returns all code points defined by the active subtable.
    ///
    /// Some of them may still map to `GlyphId::NOTDEF`.
    pub fn character_set(&self) -> Result<Arc<BTreeSet<u32>>, Error> {
        self.cache.get_or_try_insert_with(CacheKey::CharacterSet, || {
            let mut set = BTreeSet::new();
            self.subtable.format.codepoints(|c| {
                set.insert(c);
            })?;
            Ok(set)
        })
    }

    /// Returns all code points that map to `glyph_id`.
    ///
    /// For legacy subtables, code points are in the subtable encoding.
    pub fn codepoints_for_glyph(&self, glyph_id: GlyphId) -> Result<Arc<BTreeSet<u32>>, Error> {
        self.cache.get_or_try_insert_with(CacheKey::CodepointsForGlyph(glyph_id), || {
            let mut set = BTreeSet::new();
            self.subtable.format.codepoints_for_glyph(glyph_id, |c| {
                set.insert(c);
            })?;
            Ok(set)
        })
    }
}

fn find_subtable<'a>(table: &Table<'a>, platform_id: PlatformId, encoding_id: u16) -> Option<Subtable<'a>> {
    table.subtables.into_iter().find(|s| s.platform_id == platform_id && s.encoding_id == encoding_id)
}

fn select_unicode<'a>(table: &Table<'a>) -> Option<Subtable<'a>> {
    UNICODE_SUBTABLES.iter().find_map(|&(platform_id, encoding_id)| {
        find_subtable(table, platform_id, encoding_id)
    })
}

fn select_legacy<'a>(
    table: &Table<'a>,
    registry: &'a dyn EncodingRegistry,
) -> Option<(Subtable<'a>, RemapTable<'a>)> {
    table.subtables.into_iter().find_map(|subtable| {
        // The language field stores a Macintosh language code plus one.
        // 0 is language-independent.
        let language = subtable.language().checked_sub(1).and_then(|l| u16::try_from(l).ok());
        let encoding = registry.encoding(subtable.platform_id, subtable.encoding_id, language)?;
        let remap = registry.mapping(encoding)?;
        Some((subtable, remap))
    })
}

fn select_variations<'a>(table: &Table<'a>) -> Option<Subtable14<'a>> {
    let subtable = find_subtable(table, PlatformId::Unicode, UNICODE_VARIATION_SEQUENCES_ENCODING_ID)?;
    match subtable.format {
        Format::UnicodeVariationSequences(t) => Some(t),
        _ => {
            warn!(
                "A Unicode Variation Sequences subtable has format {}. Ignored.",
                subtable.format.version(),
            );
            None
        }
    }
}
