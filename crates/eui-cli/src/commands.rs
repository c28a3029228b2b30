use anyhow::Result;

use eui_cli::paths::DataRoot;
use eui_cli::pipeline::{
    PipelineRun, RunOptions, StageReport, load_config, run_climate_adjust, run_decc,
    run_layer_basic, run_layer_japan, run_layer_us, run_map_japan, run_map_us, run_merge,
    run_pipeline, run_random_points, run_trim,
};
use eui_layer::WorldMode;
use eui_transform::OutputLanguage;

use crate::cli::{Command, LanguageArg};

fn world_mode(standalone: bool) -> WorldMode {
    if standalone {
        WorldMode::Standalone
    } else {
        WorldMode::Merge
    }
}

/// Runs one subcommand. `run` may stop part way; every other command
/// yields a single report or an error.
pub fn run_command(root: &DataRoot, command: &Command) -> Result<PipelineRun> {
    let report = match command {
        Command::Decc(args) => {
            let language = match args.language {
                LanguageArg::Chinese => OutputLanguage::Chinese,
                LanguageArg::Japanese => OutputLanguage::Japanese,
            };
            run_decc(root, language)?
        }
        Command::MapJapan => run_map_japan(root)?,
        Command::ClimateAdjust(args) => run_climate_adjust(root, !args.no_translate)?,
        Command::MapUs => run_map_us(root)?,
        Command::LayerBasic(args) => run_layer_basic(root, world_mode(args.standalone))?,
        Command::LayerUs => run_layer_us(root)?,
        Command::LayerJapan(args) => run_layer_japan(root, &args.name_field)?,
        Command::Merge(args) => {
            let config = load_config(root, args.config.as_deref())?;
            run_merge(root, &config)?
        }
        Command::Trim(args) => {
            let threshold = match args.threshold {
                Some(threshold) => threshold,
                None => {
                    load_config(root, args.config.config.as_deref())?
                        .trim_overlap
                        .threshold
                }
            };
            run_trim(root, threshold, args.output.as_deref())?
        }
        Command::RandomPoints(args) => {
            let config = load_config(root, args.config.config.as_deref())?;
            run_random_points(root, &config.random_points, args.seed)?
        }
        Command::Run(args) => {
            let config = load_config(root, args.config.config.as_deref())?;
            let options = RunOptions {
                translate: !args.no_translate,
                world_mode: world_mode(args.standalone),
                prefecture_field: args.name_field.clone(),
            };
            return Ok(run_pipeline(root, &config, &options));
        }
    };
    Ok(single(report))
}

fn single(report: StageReport) -> PipelineRun {
    PipelineRun {
        reports: vec![report],
        failure: None,
    }
}
