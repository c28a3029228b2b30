//! Pipeline stages.
//!
//! Each stage reads its inputs from the data root, runs inside an
//! `info_span!` named after the stage and writes its outputs back under the
//! root, so stages can run one at a time or chained by [`run_pipeline`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use polars::prelude::DataFrame;
use tracing::{info, info_span, warn};

use eui_common::{TextEncoding, frame_to_csv_bytes};
use eui_ingest::{
    COLLATERAL_MAPPING, SPACE_MAPPING, US_MAPPING, first_shapefile, load_carbon_intensity,
    load_classified_table, load_climate_adjusted, load_climate_projection,
    load_decc_observations, load_decc_region_means, load_eewh_means, load_energy_star,
    load_last_column, load_mapping_rules, load_pipeline_config,
};
use eui_layer::japan::JAPAN_COUNTRY;
use eui_layer::us::US_COUNTRY;
use eui_layer::{
    BASIC_DIGITS, BasicInputs, CountryLayer, REGION_DIGITS, WorldMode, attribute_frame,
    back_fill, build_basic_layer, build_japan_layer, build_us_layer, merge_layers,
    points_frame, random_points, read_layer, seeded_rng, trim_overlaps, write_csv,
    write_layer, write_points,
};
use eui_model::columns::{
    COLLATERAL_CODE, COLLATERAL_NAME, DECC_BUILDING_TYPE, SPACE_CODE, SPACE_NAME, US_SECTOR,
};
use eui_model::{PipelineConfig, SamplingTarget};
use eui_transform::{
    OutputLanguage, TargetColumns, adjusted_source_table, classified_frame, climate_adjust,
    constant_lookup, group_table_frame, map_pass, pivot_summary_rows, region_lookup,
    source_table_frame, summarize_decc,
};

use crate::paths::{BASIC_REGION, BASIC_SUFFIX, DataRoot, JAPAN_REGION, US_REGION};

/// Decimals of every CSV table written by the tabular stages.
pub const TABLE_DIGITS: u32 = 2;

/// Lookup key under which the EEWH means are broadcast to every polygon.
const EEWH_KEY: &str = "EEWH";

const SPACE_TARGET: TargetColumns<'static> = TargetColumns {
    code: SPACE_CODE,
    label: SPACE_NAME,
};

const COLLATERAL_TARGET: TargetColumns<'static> = TargetColumns {
    code: COLLATERAL_CODE,
    label: COLLATERAL_NAME,
};

/// One file written by a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput {
    pub path: PathBuf,
    /// Rows for tables, features for layers.
    pub rows: usize,
}

/// What a stage wrote, for the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: &'static str,
    pub outputs: Vec<StageOutput>,
    pub notes: Vec<String>,
}

impl StageReport {
    fn new(stage: &'static str) -> Self {
        Self {
            stage,
            outputs: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn output(&mut self, path: PathBuf, rows: usize) {
        self.outputs.push(StageOutput { path, rows });
    }

    fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }
}

/// Options of the stages run by [`run_pipeline`].
///
/// The DECC table is always written in Chinese there, since the Japan
/// mapping stage reads it back as UTF-8 with its index column.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Translate US sector and property labels to Chinese.
    pub translate: bool,
    pub world_mode: WorldMode,
    /// Prefecture name field of the Japan boundary layer.
    pub prefecture_field: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            translate: true,
            world_mode: WorldMode::default(),
            prefecture_field: eui_layer::DEFAULT_PREFECTURE_FIELD.to_string(),
        }
    }
}

/// Writes a frame as CSV, creating parent directories. Returns the row count.
pub fn write_table(df: &mut DataFrame, path: &Path, encoding: TextEncoding) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let (bytes, lossy) = frame_to_csv_bytes(df, encoding)
        .with_context(|| format!("serialise {}", path.display()))?;
    if lossy {
        warn!(
            path = %path.display(),
            encoding = encoding.as_str(),
            "some characters are not representable and were escaped"
        );
    }
    std::fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), rows = df.height(), "wrote table");
    Ok(df.height())
}

/// Loads `Config.json` from the data root or an explicit path.
pub fn load_config(root: &DataRoot, path: Option<&Path>) -> Result<PipelineConfig> {
    let path = path.map_or_else(|| root.config(), Path::to_path_buf);
    load_pipeline_config(&path).with_context(|| format!("load configuration {}", path.display()))
}

// === Tabular stages ===

/// Groups the DECC survey into per-region means and counts.
pub fn run_decc(root: &DataRoot, language: OutputLanguage) -> Result<StageReport> {
    let span = info_span!("decc", language = %language);
    let _guard = span.enter();
    let mut report = StageReport::new("decc");

    let source = root.decc_source();
    let observations = load_decc_observations(&source, TextEncoding::ShiftJis)
        .with_context(|| format!("load DECC survey {}", source.display()))?;
    let (grouped, stats) = summarize_decc(observations).context("summarise DECC survey")?;

    let encoding = match language {
        OutputLanguage::Chinese => TextEncoding::Utf8Bom,
        OutputLanguage::Japanese => TextEncoding::ShiftJis,
    };
    let mut df = group_table_frame(&grouped, language, TABLE_DIGITS)?;
    let output = root.decc_output();
    let rows = write_table(&mut df, &output, encoding)?;
    report.output(output, rows);
    if stats.dropped > 0 {
        report.note(format!(
            "{} of {} survey rows without region letter",
            stats.dropped, stats.observations
        ));
    }
    if stats.filled_means > 0 {
        report.note(format!("{} means filled from type mean", stats.filled_means));
    }
    Ok(report)
}

/// Maps DECC region means onto space classes, then collateral classes.
pub fn run_map_japan(root: &DataRoot) -> Result<StageReport> {
    let span = info_span!("map_japan");
    let _guard = span.enter();
    let mut report = StageReport::new("map-japan");

    let means_path = root.decc_output();
    let means = load_decc_region_means(&means_path)
        .with_context(|| format!("load DECC means {}", means_path.display()))?;
    let space_path = root.japan_space_config();
    let space_rules = load_mapping_rules(&space_path, &SPACE_MAPPING)
        .with_context(|| format!("load space mapping {}", space_path.display()))?;
    let collateral_path = root.japan_collateral_config();
    let collateral_rules = load_mapping_rules(&collateral_path, &COLLATERAL_MAPPING)
        .with_context(|| format!("load collateral mapping {}", collateral_path.display()))?;

    let space = map_pass(&means, &space_rules, SPACE_TARGET);
    let collateral = map_pass(&space.clone().into_source(), &collateral_rules, COLLATERAL_TARGET);

    let output = root.japan_space_output();
    let rows = write_table(
        &mut classified_frame(&space, TABLE_DIGITS)?,
        &output,
        TextEncoding::Utf8Bom,
    )?;
    report.output(output, rows);
    let output = root.japan_collateral_output();
    let rows = write_table(
        &mut classified_frame(&collateral, TABLE_DIGITS)?,
        &output,
        TextEncoding::Utf8Bom,
    )?;
    report.output(output, rows);
    Ok(report)
}

/// Scales Energy Star EUIs by the projection's climate zone factors.
pub fn run_climate_adjust(root: &DataRoot, translate: bool) -> Result<StageReport> {
    let span = info_span!("climate_adjust", translate);
    let _guard = span.enter();
    let mut report = StageReport::new("climate-adjust");

    let projection_path = root.us_projection();
    let projection = load_climate_projection(&projection_path)
        .with_context(|| format!("load climate projection {}", projection_path.display()))?;
    let energy_star_path = root.us_energy_star();
    let energy_star = load_energy_star(&energy_star_path)
        .with_context(|| format!("load Energy Star table {}", energy_star_path.display()))?;

    let adjusted = climate_adjust(&projection, &energy_star).context("adjust EUI by climate")?;
    let table = adjusted_source_table(&adjusted, translate)?;
    let output = root.us_adjusted_output();
    let rows = write_table(
        &mut source_table_frame(&table, TABLE_DIGITS)?,
        &output,
        TextEncoding::Utf8Bom,
    )?;
    report.output(output, rows);
    report.note(format!("{} climate zones", adjusted.zones.len()));
    Ok(report)
}

/// Maps climate-adjusted building types onto collateral classes.
pub fn run_map_us(root: &DataRoot) -> Result<StageReport> {
    let span = info_span!("map_us");
    let _guard = span.enter();
    let mut report = StageReport::new("map-us");

    let adjusted_path = root.us_adjusted_output();
    let adjusted = load_climate_adjusted(&adjusted_path)
        .with_context(|| format!("load climate-adjusted EUI {}", adjusted_path.display()))?;
    let rules_path = root.us_mapping_config();
    let rules = load_mapping_rules(&rules_path, &US_MAPPING)
        .with_context(|| format!("load US mapping {}", rules_path.display()))?;

    let mapped = map_pass(&adjusted, &rules, COLLATERAL_TARGET);
    let output = root.us_mapping_output();
    let rows = write_table(
        &mut classified_frame(&mapped, TABLE_DIGITS)?,
        &output,
        TextEncoding::Utf8Bom,
    )?;
    report.output(output, rows);
    Ok(report)
}

// === Layer stages ===

/// Builds the world layer of the basic coefficient method.
pub fn run_layer_basic(root: &DataRoot, mode: WorldMode) -> Result<StageReport> {
    let span = info_span!("layer_basic", mode = ?mode);
    let _guard = span.enter();
    let mut report = StageReport::new("layer-basic");

    let world_path = root.world_boundaries();
    let world = read_layer(&world_path)
        .with_context(|| format!("read world boundaries {}", world_path.display()))?;
    let coefficients_path = root.carbon_intensity();
    let coefficients = load_carbon_intensity(&coefficients_path)
        .with_context(|| format!("load carbon intensity {}", coefficients_path.display()))?;

    let space_path = root.eewh_space_means();
    let mut eewh = load_eewh_means(&space_path, SPACE_CODE, false)
        .with_context(|| format!("load EEWH space means {}", space_path.display()))?;
    let collateral_path = root.eewh_collateral_means();
    eewh.extend(
        load_eewh_means(&collateral_path, COLLATERAL_CODE, true)
            .with_context(|| format!("load EEWH collateral means {}", collateral_path.display()))?,
    );
    let eewh = constant_lookup(EEWH_KEY, &eewh);

    let singapore_path = root.singapore_eui();
    let singapore = if singapore_path.is_file() {
        Some(
            load_last_column(&singapore_path)
                .with_context(|| format!("load Singapore EUI {}", singapore_path.display()))?,
        )
    } else {
        warn!(path = %singapore_path.display(), "no Singapore EUI table, keeping EEWH values");
        None
    };

    let layer = build_basic_layer(
        &world,
        mode,
        BasicInputs {
            coefficients: &coefficients,
            eewh: &eewh,
            eewh_key: EEWH_KEY,
            singapore: singapore.as_deref(),
        },
    )
    .context("build basic coefficient layer")?;

    let output = root.layer_path(BASIC_REGION, BASIC_SUFFIX);
    let rows = write_layer(&layer, &output, BASIC_DIGITS)
        .with_context(|| format!("write layer {}", output.display()))?;
    report.output(output, rows);
    Ok(report)
}

/// Builds the US county layer keyed by coarse climate zone.
pub fn run_layer_us(root: &DataRoot) -> Result<StageReport> {
    let span = info_span!("layer_us");
    let _guard = span.enter();
    let mut report = StageReport::new("layer-us");

    let counties_path = root.us_counties();
    let counties = read_layer(&counties_path)
        .with_context(|| format!("read county boundaries {}", counties_path.display()))?;
    let mapping_path = root.us_mapping_output();
    let mapped = load_classified_table(
        &mapping_path,
        COLLATERAL_CODE,
        COLLATERAL_NAME,
        &[US_SECTOR, DECC_BUILDING_TYPE],
    )
    .with_context(|| format!("load US mapping output {}", mapping_path.display()))?;

    let layer = build_us_layer(&counties, &pivot_summary_rows(&mapped))
        .context("build US county layer")?;
    let output = root.layer_path(US_REGION, US_COUNTRY);
    let rows = write_layer(&layer, &output, REGION_DIGITS)
        .with_context(|| format!("write layer {}", output.display()))?;
    report.output(output, rows);
    Ok(report)
}

/// Builds the Japan prefecture layer keyed by survey region.
pub fn run_layer_japan(root: &DataRoot, name_field: &str) -> Result<StageReport> {
    let span = info_span!("layer_japan", name_field);
    let _guard = span.enter();
    let mut report = StageReport::new("layer-japan");

    let prefectures_path = root.japan_prefectures();
    let prefectures = read_layer(&prefectures_path)
        .with_context(|| format!("read prefecture boundaries {}", prefectures_path.display()))?;
    let space_path = root.japan_space_output();
    let space = load_classified_table(&space_path, SPACE_CODE, SPACE_NAME, &[DECC_BUILDING_TYPE])
        .with_context(|| format!("load space mapping output {}", space_path.display()))?;
    let collateral_path = root.japan_collateral_output();
    let collateral =
        load_classified_table(&collateral_path, COLLATERAL_CODE, COLLATERAL_NAME, &[SPACE_NAME])
            .with_context(|| {
                format!("load collateral mapping output {}", collateral_path.display())
            })?;

    let lookup = region_lookup(&[&space, &collateral]).context("pivot Japan mapping tables")?;
    let layer = build_japan_layer(&prefectures, name_field, &lookup)
        .context("build Japan prefecture layer")?;
    let output = root.layer_path(JAPAN_REGION, JAPAN_COUNTRY);
    let rows = write_layer(&layer, &output, REGION_DIGITS)
        .with_context(|| format!("write layer {}", output.display()))?;
    report.output(output, rows);
    Ok(report)
}

// === Global layer ===

/// Merges the basic layer with the country layers of `Method2_CountryEUI`.
///
/// The attribute CSV is written before back-fill; the shapefile after
/// back-fill and the optional overlap trim.
pub fn run_merge(root: &DataRoot, config: &PipelineConfig) -> Result<StageReport> {
    let span = info_span!("merge", countries = config.country_eui.len());
    let _guard = span.enter();
    let mut report = StageReport::new("merge");

    let basic_path = root.layer_path(BASIC_REGION, BASIC_SUFFIX);
    let basic = read_layer(&basic_path)
        .with_context(|| format!("read basic layer {}", basic_path.display()))?;
    let mut countries = Vec::with_capacity(config.country_eui.len());
    for iso in &config.country_eui {
        let dir = root.country_layer_dir(iso);
        let path = first_shapefile(&dir)
            .with_context(|| format!("find layer of {iso} in {}", dir.display()))?;
        let layer = read_layer(&path)
            .with_context(|| format!("read layer of {iso} {}", path.display()))?;
        countries.push(CountryLayer {
            iso: iso.clone(),
            layer,
        });
    }

    let (mut merged, merge_report) = merge_layers(basic, countries).context("merge layers")?;
    if !merge_report.missing_coefficients.is_empty() {
        report.note(format!(
            "no Coef_CIE for {}",
            merge_report.missing_coefficients.join(", ")
        ));
    }

    let csv_path = root.merged_csv();
    let mut attributes = attribute_frame(&merged, BASIC_DIGITS)?;
    write_csv(&mut attributes, &csv_path)
        .with_context(|| format!("write {}", csv_path.display()))?;
    report.output(csv_path, attributes.height());

    let filled = back_fill(&mut merged, &config.back_fill).context("back-fill EUI columns")?;
    if filled > 0 {
        report.note(format!(
            "{filled} cells back-filled from {}",
            config.back_fill.reference_country
        ));
    }
    if config.trim_overlap.enabled {
        let trimmed = trim_overlaps(&mut merged, config.trim_overlap.threshold);
        report.note(format!("{} overlapping polygons trimmed", trimmed.dropped.len()));
    }

    let output = root.merged_layer();
    let rows = write_layer(&merged, &output, BASIC_DIGITS)
        .with_context(|| format!("write layer {}", output.display()))?;
    report.output(output, rows);
    Ok(report)
}

/// Drops near-duplicate polygons from the merged layer.
///
/// Writes to `output`, or back over the merged layer.
pub fn run_trim(root: &DataRoot, threshold: f64, output: Option<&Path>) -> Result<StageReport> {
    let span = info_span!("trim", threshold);
    let _guard = span.enter();
    let mut report = StageReport::new("trim");

    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(anyhow!("overlap threshold must be in (0, 1], got {threshold}"));
    }
    let input = root.merged_layer();
    let mut layer =
        read_layer(&input).with_context(|| format!("read merged layer {}", input.display()))?;
    let trimmed = trim_overlaps(&mut layer, threshold);
    report.note(format!(
        "{} of {} candidate pairs dropped",
        trimmed.dropped.len(),
        trimmed.pairs_checked
    ));

    let output = output.map_or(input, Path::to_path_buf);
    let rows = write_layer(&layer, &output, BASIC_DIGITS)
        .with_context(|| format!("write layer {}", output.display()))?;
    report.output(output, rows);
    Ok(report)
}

/// Samples points inside the configured countries of the merged layer.
///
/// Without a seed one is drawn and logged so the run can be repeated.
pub fn run_random_points(
    root: &DataRoot,
    targets: &[SamplingTarget],
    seed: Option<u64>,
) -> Result<StageReport> {
    let seed = seed.unwrap_or_else(|| {
        let seed = rand::random::<u64>();
        info!(seed, "no seed given, drew one");
        seed
    });
    let span = info_span!("random_points", seed);
    let _guard = span.enter();
    let mut report = StageReport::new("random-points");

    let input = root.merged_layer();
    let layer =
        read_layer(&input).with_context(|| format!("read merged layer {}", input.display()))?;
    let points = random_points(&layer, targets, &mut seeded_rng(seed))
        .context("sample random points")?;

    let csv_path = root.random_points_csv();
    let mut frame = points_frame(&points)?;
    write_csv(&mut frame, &csv_path).with_context(|| format!("write {}", csv_path.display()))?;
    report.output(csv_path, points.len());
    let shp_path = root.random_points_layer();
    write_points(&points, &shp_path)
        .with_context(|| format!("write points {}", shp_path.display()))?;
    report.output(shp_path, points.len());
    report.note(format!("seed {seed}"));
    Ok(report)
}

// === Whole pipeline ===

/// Stages completed by [`run_pipeline`] and the failure that stopped it.
#[derive(Debug)]
pub struct PipelineRun {
    pub reports: Vec<StageReport>,
    pub failure: Option<anyhow::Error>,
}

/// Runs every stage in order up to and including the merge, stopping at the
/// first failure.
pub fn run_pipeline(root: &DataRoot, config: &PipelineConfig, options: &RunOptions) -> PipelineRun {
    let span = info_span!("run", root = %root.path().display());
    let _guard = span.enter();

    type Stage<'a> = Box<dyn Fn() -> Result<StageReport> + 'a>;
    let stages: Vec<Stage<'_>> = vec![
        Box::new(|| run_decc(root, OutputLanguage::Chinese)),
        Box::new(|| run_map_japan(root)),
        Box::new(|| run_climate_adjust(root, options.translate)),
        Box::new(|| run_map_us(root)),
        Box::new(|| run_layer_basic(root, options.world_mode)),
        Box::new(|| run_layer_us(root)),
        Box::new(|| run_layer_japan(root, &options.prefecture_field)),
        Box::new(|| run_merge(root, config)),
    ];

    let mut reports = Vec::with_capacity(stages.len());
    for stage in stages {
        match stage() {
            Ok(report) => reports.push(report),
            Err(error) => {
                return PipelineRun {
                    reports,
                    failure: Some(error),
                };
            }
        }
    }
    info!(stages = reports.len(), "pipeline complete");
    PipelineRun {
        reports,
        failure: None,
    }
}
