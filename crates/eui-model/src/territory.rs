//! Fixes applied to the world administrative boundaries layer.
//!
//! Several disputed or overseas areas carry no ISO 3166-1 code. When the
//! global layer is built for merging they are attached to the country that
//! administers them so every polygon receives a carbon-intensity coefficient.

/// Boundary name to the ISO 3166-1 alpha-2 code it is merged into.
pub const TERRITORY_ISO_FIXES: [(&str, &str); 13] = [
    ("Ma'tan al-Sarra", "LY"),
    ("Jersey", "GB"),
    ("Glorioso Islands", "FR"),
    ("Guernsey", "GB"),
    ("Abyei", "SD"),
    ("Ilemi Triangle", "KE"),
    ("Guantanamo", "US"),
    ("Midway Is.", "US"),
    ("Jarvis Island", "US"),
    ("Isle of Man", "GB"),
    ("South Georgia & the South Sandwich Islands", "GB"),
    ("Hala'ib Triangle", "SD"),
    ("Madeira Islands", "PT"),
];

/// Boundaries removed before merging.
pub const DROPPED_TERRITORIES: [&str; 1] = ["Kuril Islands"];

/// ISO codes removed from the global layer in every mode.
pub const EXCLUDED_ISO_CODES: [&str; 1] = ["PR"];

/// ISO code override for a boundary name, if any.
pub fn territory_iso_fix(name: &str) -> Option<&'static str> {
    TERRITORY_ISO_FIXES
        .iter()
        .find(|(territory, _)| *territory == name)
        .map(|(_, iso)| *iso)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_territory_iso_fix() {
        assert_eq!(territory_iso_fix("Guantanamo"), Some("US"));
        assert_eq!(territory_iso_fix("Madeira Islands"), Some("PT"));
        assert_eq!(territory_iso_fix("France"), None);
    }

    #[test]
    fn test_fixes_are_two_letter_codes() {
        for (_, iso) in TERRITORY_ISO_FIXES {
            assert_eq!(iso.len(), 2);
            assert!(iso.chars().all(|c| c.is_ascii_uppercase()));
        }
    }
}
