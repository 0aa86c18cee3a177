use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::constants::DEFAULT_RETURN_PERIODS;

#[derive(Parser)]
#[command(name = "streamflow-processor")]
#[command(about = "Flood-frequency analysis and hydrologic indicators for daily streamflow records")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Suppress progress output")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Frequency analysis of streamflow extremes
    FrequencyAnalysis {
        #[arg(short, long, help = "Time-series file (.csv or .nc)")]
        ts: PathBuf,

        #[arg(
            long,
            default_value = "high",
            help = "Extreme type: 'high' for floods, 'low' for low flows"
        )]
        extreme_type: String,

        #[arg(
            long,
            default_value = "year",
            help = "Analysis period: 'year', a season name or abbreviation, or a month number"
        )]
        period: String,

        #[arg(
            long,
            default_value = "gumbel_r",
            help = "Distribution family: gamma, genextreme, gumbel_r, lognorm or pearson3"
        )]
        distribution: String,

        #[arg(
            long,
            default_value = DEFAULT_RETURN_PERIODS,
            help = "Comma-separated return periods in years"
        )]
        return_periods: String,

        #[arg(short, long, default_value = ".", help = "Directory for output files")]
        output_dir: PathBuf,
    },

    /// Compute the 28-indicator hydrologic battery
    Indicators {
        #[arg(short, long, help = "Time-series file (.csv or .nc)")]
        ts: PathBuf,

        #[arg(
            long,
            default_value = "gumbel_r",
            help = "Distribution family used by the quantile indicators"
        )]
        distribution: String,

        #[arg(short, long, default_value = ".", help = "Directory for output files")]
        output_dir: PathBuf,

        #[arg(long, help = "Also write the battery as JSON")]
        json: bool,
    },

    /// Run the external Raven model against a forcing file
    Raven {
        #[arg(long, help = "Path to the Raven executable")]
        executable: PathBuf,

        #[arg(short, long, help = "Forcing-data file passed through to the model")]
        ts: PathBuf,

        #[arg(long, help = "Comma-separated model parameter vector")]
        params: String,

        #[arg(
            short,
            long,
            help = "Working directory for model outputs [default: fresh raven-run-* directory]"
        )]
        output_dir: Option<PathBuf>,
    },
}
