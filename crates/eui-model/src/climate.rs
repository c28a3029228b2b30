//! IECC climate zones and the eight coarse zones used for US lookups.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Coarse climate zone of the climate-projection study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CoarseClimateZone {
    HotHumid,
    HotDry,
    HotMarine,
    MixedHumid,
    MixedDry,
    MixedMarine,
    ColdHumid,
    ColdDry,
}

impl CoarseClimateZone {
    pub const ALL: [CoarseClimateZone; 8] = [
        CoarseClimateZone::HotHumid,
        CoarseClimateZone::HotDry,
        CoarseClimateZone::HotMarine,
        CoarseClimateZone::MixedHumid,
        CoarseClimateZone::MixedDry,
        CoarseClimateZone::MixedMarine,
        CoarseClimateZone::ColdHumid,
        CoarseClimateZone::ColdDry,
    ];

    /// Name used by the climate-projection source table.
    pub fn projection_name(self) -> &'static str {
        match self {
            Self::HotHumid => "Hot-humid",
            Self::HotDry => "Hot-dry",
            Self::HotMarine => "Hot-marine",
            Self::MixedHumid => "Mixed-humid",
            Self::MixedDry => "Mixed-dry",
            Self::MixedMarine => "Mixed-marine",
            Self::ColdHumid => "Cold-humid",
            Self::ColdDry => "Cold-dry",
        }
    }

    /// Name used in output column headers (`EUI_<name>`).
    pub fn label(self) -> &'static str {
        match self {
            Self::HotHumid => "溼熱氣候區",
            Self::HotDry => "乾熱氣候區",
            Self::HotMarine => "海洋性熱氣候區",
            Self::MixedHumid => "溼混合氣候區",
            Self::MixedDry => "乾混合氣候區",
            Self::MixedMarine => "海洋性混合氣候區",
            Self::ColdHumid => "溼冷氣候區",
            Self::ColdDry => "乾冷氣候區",
        }
    }

    /// Parses a projection name such as `Cold-dry` (case-insensitive).
    pub fn from_projection_name(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|zone| zone.projection_name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownZoneName {
                name: trimmed.to_string(),
            })
    }

    /// Parses an output label such as `乾冷氣候區`.
    pub fn from_label(label: &str) -> Result<Self> {
        let trimmed = label.trim();
        Self::ALL
            .into_iter()
            .find(|zone| zone.label() == trimmed)
            .ok_or_else(|| ModelError::UnknownZoneName {
                name: trimmed.to_string(),
            })
    }
}

impl fmt::Display for CoarseClimateZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.projection_name())
    }
}

/// IECC code to coarse zone. Zones 7 and 8 carry no moisture regime and fall
/// into the coldest bucket; 5C keeps its marine regime.
pub const IECC_ZONE_TABLE: [(&str, CoarseClimateZone); 16] = [
    ("1A", CoarseClimateZone::HotHumid),
    ("2A", CoarseClimateZone::HotHumid),
    ("3A", CoarseClimateZone::HotHumid),
    ("2B", CoarseClimateZone::HotDry),
    ("3B", CoarseClimateZone::HotDry),
    ("3C", CoarseClimateZone::HotMarine),
    ("4A", CoarseClimateZone::MixedHumid),
    ("4B", CoarseClimateZone::MixedDry),
    ("4C", CoarseClimateZone::MixedMarine),
    ("5C", CoarseClimateZone::MixedMarine),
    ("5A", CoarseClimateZone::ColdHumid),
    ("6A", CoarseClimateZone::ColdHumid),
    ("5B", CoarseClimateZone::ColdDry),
    ("6B", CoarseClimateZone::ColdDry),
    ("7", CoarseClimateZone::ColdDry),
    ("8", CoarseClimateZone::ColdDry),
];

/// Reduces a two-part IECC code (`"5A"`, `"7"`) to its coarse zone.
///
/// A moisture letter on zones 7 or 8 is ignored.
pub fn reduce_iecc_zone(code: &str) -> Result<CoarseClimateZone> {
    let normalized = code.trim().to_ascii_uppercase();
    let lookup = |key: &str| {
        IECC_ZONE_TABLE
            .iter()
            .find(|(iecc, _)| *iecc == key)
            .map(|(_, zone)| *zone)
    };
    if let Some(zone) = lookup(normalized.as_str()) {
        return Ok(zone);
    }
    let number = normalized.get(..1).unwrap_or_default();
    if matches!(number, "7" | "8")
        && let Some(zone) = lookup(number)
    {
        return Ok(zone);
    }
    Err(ModelError::UnknownClimateZone {
        code: code.trim().to_string(),
    })
}
