//! Japanese survey regions and the prefecture table.
//!
//! DECC building identifiers start with a letter `A`–`H` naming one of eight
//! survey regions. That leading letter is the bucket the survey statistics
//! are grouped by, and prefecture polygons are joined to buckets through
//! [`PREFECTURES`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Survey region bucket, keyed by the leading identifier letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegionBucket {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl RegionBucket {
    /// Every bucket in identifier order.
    pub const ALL: [RegionBucket; 8] = [
        RegionBucket::A,
        RegionBucket::B,
        RegionBucket::C,
        RegionBucket::D,
        RegionBucket::E,
        RegionBucket::F,
        RegionBucket::G,
        RegionBucket::H,
    ];

    /// Bucket for a leading identifier character.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            'E' => Some(Self::E),
            'F' => Some(Self::F),
            'G' => Some(Self::G),
            'H' => Some(Self::H),
            _ => None,
        }
    }

    /// Bucket of a building identifier, `None` for malformed identifiers.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        identifier.trim().chars().next().and_then(Self::from_letter)
    }

    pub fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::F => 'F',
            Self::G => 'G',
            Self::H => 'H',
        }
    }

    /// Region name used in output column headers (`EUI_<name>`).
    pub fn region_name(self) -> &'static str {
        match self {
            Self::A => "北海道",
            Self::B => "東北",
            Self::C => "北信越",
            Self::D => "關東",
            Self::E => "中部",
            Self::F => "關西",
            Self::G => "中國四國",
            Self::H => "九州",
        }
    }

    /// Bucket for a region name as written in output headers.
    pub fn from_region_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.region_name() == name.trim())
    }
}

impl fmt::Display for RegionBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One prefecture and the survey region it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefecture {
    /// Official name including the 都/道/府/県 suffix.
    pub kanji: &'static str,
    /// Romanised name without suffix or macrons.
    pub romaji: &'static str,
    pub bucket: RegionBucket,
}

const fn pref(kanji: &'static str, romaji: &'static str, bucket: RegionBucket) -> Prefecture {
    Prefecture {
        kanji,
        romaji,
        bucket,
    }
}

/// All 47 prefectures. Yamanashi is grouped with Kanto.
pub const PREFECTURES: [Prefecture; 47] = [
    pref("北海道", "Hokkaido", RegionBucket::A),
    pref("青森県", "Aomori", RegionBucket::B),
    pref("岩手県", "Iwate", RegionBucket::B),
    pref("宮城県", "Miyagi", RegionBucket::B),
    pref("秋田県", "Akita", RegionBucket::B),
    pref("山形県", "Yamagata", RegionBucket::B),
    pref("福島県", "Fukushima", RegionBucket::B),
    pref("新潟県", "Niigata", RegionBucket::C),
    pref("富山県", "Toyama", RegionBucket::C),
    pref("石川県", "Ishikawa", RegionBucket::C),
    pref("福井県", "Fukui", RegionBucket::C),
    pref("長野県", "Nagano", RegionBucket::C),
    pref("茨城県", "Ibaraki", RegionBucket::D),
    pref("栃木県", "Tochigi", RegionBucket::D),
    pref("群馬県", "Gunma", RegionBucket::D),
    pref("埼玉県", "Saitama", RegionBucket::D),
    pref("千葉県", "Chiba", RegionBucket::D),
    pref("東京都", "Tokyo", RegionBucket::D),
    pref("神奈川県", "Kanagawa", RegionBucket::D),
    pref("山梨県", "Yamanashi", RegionBucket::D),
    pref("岐阜県", "Gifu", RegionBucket::E),
    pref("静岡県", "Shizuoka", RegionBucket::E),
    pref("愛知県", "Aichi", RegionBucket::E),
    pref("三重県", "Mie", RegionBucket::E),
    pref("滋賀県", "Shiga", RegionBucket::F),
    pref("京都府", "Kyoto", RegionBucket::F),
    pref("大阪府", "Osaka", RegionBucket::F),
    pref("兵庫県", "Hyogo", RegionBucket::F),
    pref("奈良県", "Nara", RegionBucket::F),
    pref("和歌山県", "Wakayama", RegionBucket::F),
    pref("鳥取県", "Tottori", RegionBucket::G),
    pref("島根県", "Shimane", RegionBucket::G),
    pref("岡山県", "Okayama", RegionBucket::G),
    pref("広島県", "Hiroshima", RegionBucket::G),
    pref("山口県", "Yamaguchi", RegionBucket::G),
    pref("徳島県", "Tokushima", RegionBucket::G),
    pref("香川県", "Kagawa", RegionBucket::G),
    pref("愛媛県", "Ehime", RegionBucket::G),
    pref("高知県", "Kochi", RegionBucket::G),
    pref("福岡県", "Fukuoka", RegionBucket::H),
    pref("佐賀県", "Saga", RegionBucket::H),
    pref("長崎県", "Nagasaki", RegionBucket::H),
    pref("熊本県", "Kumamoto", RegionBucket::H),
    pref("大分県", "Oita", RegionBucket::H),
    pref("宮崎県", "Miyazaki", RegionBucket::H),
    pref("鹿児島県", "Kagoshima", RegionBucket::H),
    pref("沖縄県", "Okinawa", RegionBucket::H),
];

/// Looks up the prefecture for a polygon name.
///
/// Accepts the official kanji name with or without its suffix, and romaji in
/// any case, with or without macrons, `-ken`/`-fu`/`-to` or ` Prefecture`.
pub fn prefecture_region(name: &str) -> Result<&'static Prefecture> {
    let trimmed = name.trim();
    if let Some(found) = PREFECTURES
        .iter()
        .find(|p| p.kanji == trimmed || strip_kanji_suffix(p.kanji) == trimmed)
    {
        return Ok(found);
    }
    let folded = fold_romaji(trimmed);
    PREFECTURES
        .iter()
        .find(|p| p.romaji.to_ascii_lowercase() == folded)
        .ok_or_else(|| ModelError::UnknownPrefecture {
            name: trimmed.to_string(),
        })
}

fn strip_kanji_suffix(kanji: &str) -> &str {
    if kanji == "北海道" {
        return kanji;
    }
    kanji
        .strip_suffix('県')
        .or_else(|| kanji.strip_suffix('府'))
        .or_else(|| kanji.strip_suffix('都'))
        .unwrap_or(kanji)
}

fn fold_romaji(name: &str) -> String {
    let mut folded: String = name
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'ō' | 'ô' => 'o',
            'ū' | 'û' => 'u',
            other => other,
        })
        .collect();
    if let Some(stripped) = folded.strip_suffix(" prefecture") {
        folded = stripped.to_string();
    }
    for suffix in ["-ken", "-fu", "-to"] {
        if let Some(stripped) = folded.strip_suffix(suffix) {
            folded = stripped.to_string();
            break;
        }
    }
    folded.retain(|c| c != '-' && !c.is_whitespace());
    folded
}
