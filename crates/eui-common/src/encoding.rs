//! Text encodings of source and output tables.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use encoding_rs::{SHIFT_JIS, UTF_8};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encoding of a CSV file on disk.
///
/// The Japanese survey data ships in the legacy Shift_JIS family (the
/// WHATWG/Windows-31J variant, which covers `㎡`). Everything produced by the
/// pipeline is UTF-8, with a BOM when spreadsheet tools must detect it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    /// Plain UTF-8. A leading BOM is tolerated when decoding.
    #[default]
    Utf8,
    /// UTF-8 with a leading byte order mark.
    Utf8Bom,
    /// Shift_JIS (Windows-31J).
    ShiftJis,
}

impl TextEncoding {
    /// Decodes raw bytes, replacing malformed sequences.
    ///
    /// Returns the text and whether any replacement happened.
    pub fn decode(self, bytes: &[u8]) -> (Cow<'_, str>, bool) {
        match self {
            Self::Utf8 | Self::Utf8Bom => {
                let (text, _, had_errors) = UTF_8.decode(bytes);
                (text, had_errors)
            }
            Self::ShiftJis => {
                let (text, had_errors) = SHIFT_JIS.decode_without_bom_handling(bytes);
                (text, had_errors)
            }
        }
    }

    /// Encodes text, adding a BOM for [`TextEncoding::Utf8Bom`].
    ///
    /// Returns the bytes and whether any character was unmappable.
    pub fn encode(self, text: &str) -> (Vec<u8>, bool) {
        match self {
            Self::Utf8 => (text.as_bytes().to_vec(), false),
            Self::Utf8Bom => {
                let mut bytes = Vec::with_capacity(text.len() + UTF8_BOM.len());
                bytes.extend_from_slice(UTF8_BOM);
                bytes.extend_from_slice(text.as_bytes());
                (bytes, false)
            }
            Self::ShiftJis => {
                let (bytes, _, had_errors) = SHIFT_JIS.encode(text);
                (bytes.into_owned(), had_errors)
            }
        }
    }

    /// Canonical name used in configuration and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf8Bom => "utf-8-sig",
            Self::ShiftJis => "shift_jis",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "utf8" | "utf_8" => Ok(Self::Utf8),
            "utf_8_sig" | "utf8_sig" => Ok(Self::Utf8Bom),
            "shift_jis" | "shift_jisx0213" | "sjis" | "cp932" | "windows_31j" => {
                Ok(Self::ShiftJis)
            }
            other => Err(format!("unsupported text encoding '{other}'")),
        }
    }
}
