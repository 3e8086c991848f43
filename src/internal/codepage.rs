use encoding_rs::Encoding;
use std::borrow::Cow;

// ========================================================================= //

/// The character encoding declared in a string pool header.
///
/// Only the code pages that installers are known to declare are listed; any
/// other id is reported as unknown and the pool falls back to UTF-8.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum CodePage {
    /// Windows-1250 (Latin 2)
    Windows1250,
    /// Windows-1251 (Cyrillic)
    Windows1251,
    /// Windows-1252 (Latin 1)
    Windows1252,
    /// Windows-1253 (Greek)
    Windows1253,
    /// Windows-1254 (Turkish)
    Windows1254,
    /// Windows-1255 (Hebrew)
    Windows1255,
    /// Windows-1256 (Arabic)
    Windows1256,
    /// Windows-1257 (Baltic)
    Windows1257,
    /// Windows-1258 (Vietnamese)
    Windows1258,
    /// Mac OS Roman
    MacintoshRoman,
    /// Macintosh Cyrillic
    MacintoshCyrillic,
    /// US-ASCII
    UsAscii,
    /// ISO-8859-1 (Latin 1)
    Iso88591,
    /// ISO-8859-2 (Latin 2)
    Iso88592,
    /// ISO-8859-5 (Cyrillic)
    Iso88595,
    /// ISO-8859-7 (Greek)
    Iso88597,
    /// UTF-8
    #[default]
    Utf8,
}

impl CodePage {
    /// Returns the code page (if any) with the given ID number.  An ID of
    /// zero means "no code page specified" and maps to the default.
    pub fn from_id(id: i32) -> Option<CodePage> {
        match id {
            0 => Some(CodePage::default()),
            1250 => Some(CodePage::Windows1250),
            1251 => Some(CodePage::Windows1251),
            1252 => Some(CodePage::Windows1252),
            1253 => Some(CodePage::Windows1253),
            1254 => Some(CodePage::Windows1254),
            1255 => Some(CodePage::Windows1255),
            1256 => Some(CodePage::Windows1256),
            1257 => Some(CodePage::Windows1257),
            1258 => Some(CodePage::Windows1258),
            10000 => Some(CodePage::MacintoshRoman),
            10007 => Some(CodePage::MacintoshCyrillic),
            20127 => Some(CodePage::UsAscii),
            28591 => Some(CodePage::Iso88591),
            28592 => Some(CodePage::Iso88592),
            28595 => Some(CodePage::Iso88595),
            28597 => Some(CodePage::Iso88597),
            65001 => Some(CodePage::Utf8),
            _ => None,
        }
    }

    /// Returns the numeric id of this code page.
    pub fn id(&self) -> i32 {
        match *self {
            CodePage::Windows1250 => 1250,
            CodePage::Windows1251 => 1251,
            CodePage::Windows1252 => 1252,
            CodePage::Windows1253 => 1253,
            CodePage::Windows1254 => 1254,
            CodePage::Windows1255 => 1255,
            CodePage::Windows1256 => 1256,
            CodePage::Windows1257 => 1257,
            CodePage::Windows1258 => 1258,
            CodePage::MacintoshRoman => 10000,
            CodePage::MacintoshCyrillic => 10007,
            CodePage::UsAscii => 20127,
            CodePage::Iso88591 => 28591,
            CodePage::Iso88592 => 28592,
            CodePage::Iso88595 => 28595,
            CodePage::Iso88597 => 28597,
            CodePage::Utf8 => 65001,
        }
    }

    /// Decodes bytes with this code page, substituting U+FFFD for anything
    /// that does not map.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        match *self {
            // encoding_rs treats both of these labels as windows-1252, which
            // disagrees with them in the 0x80..0xa0 range.
            CodePage::UsAscii => bytes
                .iter()
                .map(|&byte| {
                    if byte < 0x80 {
                        byte as char
                    } else {
                        '\u{fffd}'
                    }
                })
                .collect::<String>()
                .into(),
            CodePage::Iso88591 => bytes
                .iter()
                .map(|&byte| byte as char)
                .collect::<String>()
                .into(),
            _ => self.encoding().decode_without_bom_handling(bytes).0,
        }
    }

    /// Decodes a byte array using this code page, returning `None` if the
    /// bytes are not valid in this encoding.
    pub fn decode_strict<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match *self {
            CodePage::UsAscii if !bytes.is_ascii() => None,
            CodePage::UsAscii | CodePage::Iso88591 => Some(self.decode(bytes)),
            _ => self
                .encoding()
                .decode_without_bom_handling_and_without_replacement(bytes),
        }
    }

    fn encoding(&self) -> &'static Encoding {
        match *self {
            CodePage::Windows1250 => encoding_rs::WINDOWS_1250,
            CodePage::Windows1251 => encoding_rs::WINDOWS_1251,
            CodePage::Windows1252 => encoding_rs::WINDOWS_1252,
            CodePage::Windows1253 => encoding_rs::WINDOWS_1253,
            CodePage::Windows1254 => encoding_rs::WINDOWS_1254,
            CodePage::Windows1255 => encoding_rs::WINDOWS_1255,
            CodePage::Windows1256 => encoding_rs::WINDOWS_1256,
            CodePage::Windows1257 => encoding_rs::WINDOWS_1257,
            CodePage::Windows1258 => encoding_rs::WINDOWS_1258,
            CodePage::MacintoshRoman => encoding_rs::MACINTOSH,
            CodePage::MacintoshCyrillic => encoding_rs::X_MAC_CYRILLIC,
            CodePage::UsAscii | CodePage::Iso88591 => {
                encoding_rs::WINDOWS_1252
            }
            CodePage::Iso88592 => encoding_rs::ISO_8859_2,
            CodePage::Iso88595 => encoding_rs::ISO_8859_5,
            CodePage::Iso88597 => encoding_rs::ISO_8859_7,
            CodePage::Utf8 => encoding_rs::UTF_8,
        }
    }
}

// ========================================================================= //


// ========================================================================= //
