//! Legacy (non-Unicode) encodings support.
//!
//! Fonts without a Unicode subtable can still be used for Unicode text,
//! as long as their subtable encoding can be remapped.
//! Resolution goes through an [`EncodingRegistry`],
//! which is passed to the [`Processor`](crate::Processor) explicitly.

use core::convert::TryFrom;

use crate::PlatformId;

/// A logical character encoding of a subtable.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[allow(missing_docs)]
pub enum Encoding {
    Ascii,
    Utf16Be,
    WindowsSymbol,
    ShiftJis,
    Gb18030,
    Big5,
    Wansung,
    Johab,
    MacRoman,
    EucKr,
    Iso8859_6,
    Iso8859_8,
    MacGreek,
    MacCyrillic,
    MacSymbol,
    MacDevanagari,
    MacGurmukhi,
    MacGujarati,
    Oriya,
    Bengali,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Sinhalese,
    Burmese,
    Khmer,
    MacThai,
    Laotian,
    Georgian,
    Armenian,
    Gb2312,
    Tibetan,
    Mongolian,
    Geez,
    MacCentralEurope,
    Vietnamese,
    Sindhi,
    MacIcelandic,
    MacTurkish,
    MacCroatian,
    MacRomanian,
    MacInuit,
    MacGaelic,
}


/// A Unicode to legacy code remap table.
#[derive(Clone, Copy)]
pub struct RemapTable<'a> {
    // Pairs of (unicode, code), sorted by unicode.
    pairs: &'a [(u16, u16)],
}

impl<'a> RemapTable<'a> {
    /// Creates a new table from `(unicode, code)` pairs.
    ///
    /// Pairs must be sorted by the Unicode value.
    #[inline]
    pub const fn new(pairs: &'a [(u16, u16)]) -> Self {
        RemapTable { pairs }
    }

    /// Returns a legacy code for a Unicode code point.
    pub fn get(&self, code_point: u32) -> Option<u32> {
        let code_point = u16::try_from(code_point).ok()?;
        let index = self.pairs.binary_search_by_key(&code_point, |(unicode, _)| *unicode).ok()?;
        self.pairs.get(index).map(|(_, code)| u32::from(*code))
    }

    /// Returns the number of remapped code points.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Checks if the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl core::fmt::Debug for RemapTable<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "RemapTable {{ len: {} }}", self.len())
    }
}


/// A source of legacy encodings.
pub trait EncodingRegistry {
    /// Resolves a subtable encoding.
    ///
    /// `language` is a Macintosh language code, which is the subtable
    /// language field minus one. `None` stands for a language-independent subtable.
    fn encoding(&self, platform_id: PlatformId, encoding_id: u16, language: Option<u16>) -> Option<Encoding>;

    /// Checks that a subtable encoding is known.
    fn encoding_exists(&self, platform_id: PlatformId, encoding_id: u16, language: Option<u16>) -> bool {
        self.encoding(platform_id, encoding_id, language).is_some()
    }

    /// Returns a remap table for an encoding.
    ///
    /// Encodings without a table cannot be used for lookups.
    fn mapping(&self, encoding: Encoding) -> Option<RemapTable<'_>>;
}


/// The built-in encodings registry.
///
/// Recognizes all platform encodings, but can remap only Mac Roman.
#[derive(Clone, Copy, Default, Debug)]
pub struct Encodings;

pub(crate) static DEFAULT_ENCODINGS: Encodings = Encodings;

impl EncodingRegistry for Encodings {
    fn encoding(&self, platform_id: PlatformId, encoding_id: u16, language: Option<u16>) -> Option<Encoding> {
        if platform_id == PlatformId::Macintosh {
            if let Some(encoding) = language.and_then(mac_language_encoding) {
                return Some(encoding);
            }
        }

        let encodings = match platform_id {
            PlatformId::Unicode => UNICODE_ENCODINGS,
            PlatformId::Macintosh => MAC_ENCODINGS,
            PlatformId::Iso => ISO_ENCODINGS,
            PlatformId::Windows => WINDOWS_ENCODINGS,
            PlatformId::Custom => return None,
        };

        encodings.get(usize::from(encoding_id)).copied().flatten()
    }

    fn mapping(&self, encoding: Encoding) -> Option<RemapTable<'_>> {
        match encoding {
            Encoding::MacRoman => Some(RemapTable::new(MAC_ROMAN)),
            _ => None,
        }
    }
}

// Some Macintosh languages use their own variant of the script encoding.
fn mac_language_encoding(language: u16) -> Option<Encoding> {
    let encoding = match language {
        15 | 30 => Encoding::MacIcelandic,
        17 => Encoding::MacTurkish,
        18 => Encoding::MacCroatian,
        24..=28 | 38..=40 => Encoding::MacCentralEurope,
        37 => Encoding::MacRomanian,
        143 => Encoding::MacInuit,
        146 => Encoding::MacGaelic,
        _ => return None,
    };

    Some(encoding)
}

// https://docs.microsoft.com/en-us/typography/opentype/spec/name#unicode-encoding-ids
const UNICODE_ENCODINGS: &[Option<Encoding>] = &[
    Some(Encoding::Utf16Be), // Unicode 1.0
    Some(Encoding::Utf16Be), // Unicode 1.1
    Some(Encoding::Utf16Be), // ISO/IEC 10646
    Some(Encoding::Utf16Be), // Unicode 2.0 BMP
    Some(Encoding::Utf16Be), // Unicode 2.0 full repertoire
    Some(Encoding::Utf16Be), // Unicode Variation Sequences
];

// https://docs.microsoft.com/en-us/typography/opentype/spec/name#macintosh-encoding-ids-script-manager-codes
const MAC_ENCODINGS: &[Option<Encoding>] = &[
    Some(Encoding::MacRoman),
    Some(Encoding::ShiftJis),
    Some(Encoding::Big5),
    Some(Encoding::EucKr),
    Some(Encoding::Iso8859_6),
    Some(Encoding::Iso8859_8),
    Some(Encoding::MacGreek),
    Some(Encoding::MacCyrillic),
    Some(Encoding::MacSymbol),
    Some(Encoding::MacDevanagari),
    Some(Encoding::MacGurmukhi),
    Some(Encoding::MacGujarati),
    Some(Encoding::Oriya),
    Some(Encoding::Bengali),
    Some(Encoding::Tamil),
    Some(Encoding::Telugu),
    Some(Encoding::Kannada),
    Some(Encoding::Malayalam),
    Some(Encoding::Sinhalese),
    Some(Encoding::Burmese),
    Some(Encoding::Khmer),
    Some(Encoding::MacThai),
    Some(Encoding::Laotian),
    Some(Encoding::Georgian),
    Some(Encoding::Armenian),
    Some(Encoding::Gb2312),
    Some(Encoding::Tibetan),
    Some(Encoding::Mongolian),
    Some(Encoding::Geez),
    Some(Encoding::MacCentralEurope),
    Some(Encoding::Vietnamese),
    Some(Encoding::Sindhi),
];

// Deprecated.
const ISO_ENCODINGS: &[Option<Encoding>] = &[
    Some(Encoding::Ascii),
];

// https://docs.microsoft.com/en-us/typography/opentype/spec/name#windows-encoding-ids
const WINDOWS_ENCODINGS: &[Option<Encoding>] = &[
    Some(Encoding::WindowsSymbol),
    Some(Encoding::Utf16Be), // Unicode BMP
    Some(Encoding::ShiftJis),
    Some(Encoding::Gb18030), // PRC
    Some(Encoding::Big5),
    Some(Encoding::Wansung),
    Some(Encoding::Johab),
    None, // reserved
    None, // reserved
    None, // reserved
    Some(Encoding::Utf16Be), // Unicode full repertoire
];

/// Unicode to Mac Roman pairs, sorted by Unicode value.
///
/// Only the upper half is listed. ASCII maps onto itself.
#[rustfmt::skip]
static MAC_ROMAN: &[(u16, u16)] = &[
    (160, 202), (161, 193), (162, 162), (163, 163),
    (165, 180), (167, 164), (168, 172), (169, 169),
    (170, 187), (171, 199), (172, 194), (174, 168),
    (175, 248), (176, 161), (177, 177), (180, 171),
    (181, 181), (182, 166), (183, 225), (184, 252),
    (186, 188), (187, 200), (191, 192), (192, 203),
    (193, 231), (194, 229), (195, 204), (196, 128),
    (197, 129), (198, 174), (199, 130), (200, 233),
    (201, 131), (202, 230), (203, 232), (204, 237),
    (205, 234), (206, 235), (207, 236), (209, 132),
    (210, 241), (211, 238), (212, 239), (213, 205),
    (214, 133), (216, 175), (217, 244), (218, 242),
    (219, 243), (220, 134), (223, 167), (224, 136),
    (225, 135), (226, 137), (227, 139), (228, 138),
    (229, 140), (230, 190), (231, 141), (232, 143),
    (233, 142), (234, 144), (235, 145), (236, 147),
    (237, 146), (238, 148), (239, 149), (241, 150),
    (242, 152), (243, 151), (244, 153), (245, 155),
    (246, 154), (247, 214), (248, 191), (249, 157),
    (250, 156), (251, 158), (252, 159), (255, 216),
    (305, 245), (338, 206), (339, 207), (376, 217),
    (402, 196), (710, 246), (711, 255), (728, 249),
    (729, 250), (730, 251), (731, 254), (732, 247),
    (733, 253), (937, 189), (960, 185), (8211, 208),
    (8212, 209), (8216, 212), (8217, 213), (8218, 226),
    (8220, 210), (8221, 211), (8222, 227), (8224, 160),
    (8225, 224), (8226, 165), (8230, 201), (8240, 228),
    (8249, 220), (8250, 221), (8260, 218), (8364, 219),
    (8482, 170), (8706, 182), (8710, 198), (8719, 184),
    (8721, 183), (8730, 195), (8734, 176), (8747, 186),
    (8776, 197), (8800, 173), (8804, 178), (8805, 179),
    (9674, 215), (63743, 240), (64257, 222), (64258, 223),
];
