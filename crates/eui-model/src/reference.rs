//! US reference tables used for climate adjustment.

/// One sector/zone EUI of the climate-projection study.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionRecord {
    /// `Commercial` or `Residential`.
    pub sector: String,
    /// Zone name as written in the study, e.g. `Hot-humid`.
    pub zone: String,
    /// 2010 EUI in kWh/m².
    pub eui: f64,
}

/// One Energy Star reference building type.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyStarRecord {
    pub market_sector: String,
    pub property_type: String,
    /// Site EUI in kBtu/ft², `None` when not published.
    pub site_eui_kbtu: Option<f64>,
}
