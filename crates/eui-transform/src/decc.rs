//! DECC survey summary: filter, convert, group and fill.

use eui_model::columns::{
    DECC_ELECTRICITY, DECC_ELECTRICITY_SOURCE, DECC_PRIMARY_ENERGY, DECC_PRIMARY_ENERGY_SOURCE,
};
use eui_model::{GroupTable, ObservationTable};

use crate::aggregate::group_by_bucket;
use crate::error::Result;
use crate::fill::{fill_missing_counts, fill_missing_means};
use crate::units::{MJ_TO_KWH, convert_metric, rename_metric};

/// Counts reported by [`summarize_decc`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeccSummaryStats {
    pub observations: usize,
    pub dropped: usize,
    pub building_types: usize,
    pub filled_means: usize,
    pub filled_counts: usize,
}

/// Turns the raw survey into grouped, filled statistics.
///
/// Rows whose identifier does not start with `A`–`H` are dropped, primary
/// energy is converted from MJ to kWh, and both metrics get their output
/// names before grouping.
pub fn summarize_decc(
    mut observations: ObservationTable,
) -> Result<(GroupTable, DeccSummaryStats)> {
    let total = observations.len();
    let dropped = observations.retain_bucketed();
    if dropped > 0 {
        tracing::warn!(dropped, "dropped survey rows without a region letter");
    }

    convert_metric(
        &mut observations,
        DECC_PRIMARY_ENERGY_SOURCE,
        MJ_TO_KWH,
        DECC_PRIMARY_ENERGY,
    )?;
    rename_metric(&mut observations, DECC_ELECTRICITY_SOURCE, DECC_ELECTRICITY)?;

    let mut grouped = group_by_bucket(&observations);
    let filled_means = fill_missing_means(&mut grouped);
    let filled_counts = fill_missing_counts(&mut grouped);

    let stats = DeccSummaryStats {
        observations: total,
        dropped,
        building_types: grouped.rows.len(),
        filled_means,
        filled_counts,
    };
    tracing::info!(
        observations = stats.observations,
        building_types = stats.building_types,
        filled_means,
        "summarised DECC survey"
    );
    Ok((grouped, stats))
}
