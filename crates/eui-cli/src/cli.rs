//! CLI argument definitions for the EUI pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "eui",
    version,
    about = "EUI collateral mapping - building energy use intensity by region and collateral class",
    long_about = "Turn building energy surveys into EUI tables per bank collateral class \
                  and publish them as a global polygon layer.\n\n\
                  Stages read and write conventional paths under --root; `eui run` \
                  executes them in order."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Data root holding the Japan, US, Basic_Coef and Layer_Output trees.
    #[arg(long = "root", value_name = "DIR", default_value = ".", global = true)]
    pub root: PathBuf,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Group the DECC survey into means and sample counts per region.
    Decc(DeccArgs),

    /// Map DECC region means onto space and collateral classes.
    MapJapan,

    /// Scale Energy Star EUIs by climate zone.
    ClimateAdjust(ClimateAdjustArgs),

    /// Map climate-adjusted EUIs onto collateral classes.
    MapUs,

    /// Build the world layer of the basic coefficient method.
    LayerBasic(LayerBasicArgs),

    /// Build the US county layer.
    LayerUs,

    /// Build the Japan prefecture layer.
    LayerJapan(LayerJapanArgs),

    /// Merge the basic layer with the country layers.
    Merge(ConfigArgs),

    /// Drop near-duplicate polygons from the merged layer.
    Trim(TrimArgs),

    /// Sample random points inside countries of the merged layer.
    RandomPoints(RandomPointsArgs),

    /// Run every stage from the DECC survey to the merged layer.
    Run(RunArgs),
}

#[derive(Args)]
pub struct DeccArgs {
    /// Language of the grouped table.
    #[arg(long = "language", value_enum, default_value = "chinese")]
    pub language: LanguageArg,
}

#[derive(Args)]
pub struct ClimateAdjustArgs {
    /// Keep the Energy Star sector and property labels in English.
    #[arg(long = "no-translate")]
    pub no_translate: bool,
}

#[derive(Args)]
pub struct LayerBasicArgs {
    /// Drop polygons without an ISO code instead of assigning territories.
    #[arg(long = "standalone")]
    pub standalone: bool,
}

#[derive(Args)]
pub struct LayerJapanArgs {
    /// Prefecture name field of the boundary layer.
    #[arg(long = "name-field", value_name = "FIELD", default_value = eui_layer::DEFAULT_PREFECTURE_FIELD)]
    pub name_field: String,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration file (default: <ROOT>/Layer_Output/Config.json).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct TrimArgs {
    /// Overlap share above which a polygon pair counts as duplicate
    /// (default: TrimOverlap.Threshold of the configuration).
    #[arg(long = "threshold", value_name = "RATIO")]
    pub threshold: Option<f64>,

    /// Write the trimmed layer here instead of over the merged layer.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args)]
pub struct RandomPointsArgs {
    /// Seed for reproducible sampling.
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args)]
pub struct RunArgs {
    /// Keep the Energy Star sector and property labels in English.
    #[arg(long = "no-translate")]
    pub no_translate: bool,

    /// Drop world polygons without an ISO code.
    #[arg(long = "standalone")]
    pub standalone: bool,

    /// Prefecture name field of the Japan boundary layer.
    #[arg(long = "name-field", value_name = "FIELD", default_value = eui_layer::DEFAULT_PREFECTURE_FIELD)]
    pub name_field: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Language of the grouped DECC table.
#[derive(Clone, Copy, ValueEnum)]
pub enum LanguageArg {
    Chinese,
    Japanese,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_trim_options() {
        let cli = Cli::try_parse_from([
            "eui", "--root", "data", "trim", "--threshold", "0.5", "--config", "c.json",
        ])
        .unwrap();
        assert_eq!(cli.root, PathBuf::from("data"));
        let Command::Trim(args) = cli.command else {
            panic!("expected trim");
        };
        assert_eq!(args.threshold, Some(0.5));
        assert_eq!(args.config.config, Some(PathBuf::from("c.json")));
    }

    #[test]
    fn test_root_after_subcommand() {
        let cli = Cli::try_parse_from(["eui", "run", "--root", "data", "--seed", "1"]);
        assert!(cli.is_err());
        let cli = Cli::try_parse_from(["eui", "run", "--root", "data"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("data"));
    }
}
