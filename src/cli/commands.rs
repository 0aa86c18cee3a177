use std::fs::{self, File};
use std::io::Write;
use tracing_subscriber::EnvFilter;

use crate::analyzers::{compute_indicators, extract_extrema, fit_and_evaluate};
use crate::cli::args::{Cli, Commands};
use crate::error::{AnalysisError, Result};
use crate::models::{AnalysisWindow, DistFamily, ExtremeKind, FrequencyRequest};
use crate::raven::{HydrologicalModel, RavenRunner};
use crate::readers::read_flow_file;
use crate::utils::constants::{
    FREQUENCY_PVALUE_FILE, FREQUENCY_RESULTS_FILE, INDICATORS_FILE, INDICATORS_JSON_FILE,
};
use crate::utils::progress::ProgressReporter;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    match cli.command {
        Commands::FrequencyAnalysis {
            ts,
            extreme_type,
            period,
            distribution,
            return_periods,
            output_dir,
        } => {
            let request = FrequencyRequest {
                extreme_kind: extreme_type.parse::<ExtremeKind>()?,
                window: period.parse::<AnalysisWindow>()?,
                family: distribution.parse::<DistFamily>()?,
                return_periods: parse_float_list(&return_periods)?,
            };
            request.validate_request()?;

            println!("Reading streamflow record from {}", ts.display());
            let series = read_flow_file(&ts)?;
            println!("Loaded {} daily observations", series.len());

            let extrema = extract_extrema(&series, request.window, request.extreme_kind)?;
            println!(
                "Extracted {} {} extrema over '{}' windows",
                extrema.len(),
                request.extreme_kind.label(),
                request.window
            );

            let analysis = fit_and_evaluate(
                &extrema,
                request.family,
                request.extreme_kind,
                &request.return_periods,
            )?;

            fs::create_dir_all(&output_dir)?;
            let results_path = output_dir.join(FREQUENCY_RESULTS_FILE);
            let mut results = File::create(&results_path)?;
            for quantile in &analysis.quantiles {
                writeln!(results, "{:.10e}", quantile.quantile)?;
            }

            let pvalue_path = output_dir.join(FREQUENCY_PVALUE_FILE);
            let mut pvalue = File::create(&pvalue_path)?;
            writeln!(pvalue, "{:.10e}", analysis.p_value())?;

            println!("\nFitted {} parameters: {:?}", request.family, analysis.fit.params);
            println!("Goodness-of-fit p-value: {:.4}", analysis.p_value());
            for quantile in &analysis.quantiles {
                println!("  T = {:>7.1} yr  ->  {:.3}", quantile.period, quantile.quantile);
            }
            println!("\nResults written to {}", results_path.display());
            println!("P-value written to {}", pvalue_path.display());
        }

        Commands::Indicators {
            ts,
            distribution,
            output_dir,
            json,
        } => {
            let family = distribution.parse::<DistFamily>()?;

            println!("Reading streamflow record from {}", ts.display());
            let series = read_flow_file(&ts)?;

            let progress =
                ProgressReporter::new_spinner("Computing hydrologic indicators...", cli.quiet);
            let indicators = compute_indicators(&series, family)?;
            progress.finish_with_message(&format!("Computed {} indicators", indicators.len()));

            fs::create_dir_all(&output_dir)?;
            let table_path = output_dir.join(INDICATORS_FILE);
            fs::write(&table_path, indicators.to_table())?;
            println!("\n{}", indicators.to_table());
            println!("Indicator table written to {}", table_path.display());

            if json {
                let json_path = output_dir.join(INDICATORS_JSON_FILE);
                let rendered = serde_json::to_string_pretty(indicators.entries())
                    .map_err(|e| AnalysisError::InvalidFormat(e.to_string()))?;
                fs::write(&json_path, rendered)?;
                println!("JSON written to {}", json_path.display());
            }
        }

        Commands::Raven {
            executable,
            ts,
            params,
            output_dir,
        } => {
            let params = parse_float_list(&params)?;
            let workdir = match output_dir {
                Some(dir) => dir,
                None => tempfile::Builder::new()
                    .prefix("raven-run-")
                    .tempdir_in(".")?
                    .into_path(),
            };

            println!(
                "Running {} with {} parameters",
                executable.display(),
                params.len()
            );
            let progress = ProgressReporter::new_spinner("Running hydrological model...", cli.quiet);
            let runner = RavenRunner::new(executable);
            let artifact = runner.run(&params, &ts, &workdir)?;
            progress.finish_with_message("Model run complete");

            println!("Hydrograph:  {}", artifact.hydrograph.display());
            println!("Storage:     {}", artifact.storage.display());
            println!("Solution:    {}", artifact.solution.display());
            println!("Diagnostics: {}", artifact.diagnostics.display());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Parse a comma-separated list of floats, e.g. `"2, 5, 10, 25, 50, 100"`.
fn parse_float_list(input: &str) -> Result<Vec<f64>> {
    input
        .split(',')
        .map(|token| {
            let token = token.trim();
            token.parse::<f64>().map_err(|_| {
                AnalysisError::InvalidFormat(format!("invalid numeric value: '{}'", token))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float_list() {
        assert_eq!(
            parse_float_list("2, 5, 10, 25, 50, 100").unwrap(),
            vec![2.0, 5.0, 10.0, 25.0, 50.0, 100.0]
        );
        assert_eq!(parse_float_list("2.5").unwrap(), vec![2.5]);
        assert!(parse_float_list("2, five").is_err());
        assert!(parse_float_list("").is_err());
    }
}
