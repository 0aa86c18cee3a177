use chrono::{Datelike, Duration, NaiveDate};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

use streamflow_processor::analyzers::{compute_indicators, extract_extrema, fit_and_evaluate};
use streamflow_processor::error::AnalysisError;
use streamflow_processor::models::{AnalysisWindow, DistFamily, ExtremeKind, Season};
use streamflow_processor::readers::read_flow_file;

/// Write a 12-year daily CSV record with a seasonal cycle and a
/// deterministic year-to-year wobble.
fn write_test_record(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("streamflow.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "Year,Month,Day,Qobs").unwrap();

    let mut date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2001, 12, 31).unwrap();
    while date <= end {
        let doy = date.ordinal() as f64;
        let wobble = ((date.year() * 17) % 13) as f64;
        let flow = 60.0 + 35.0 * (2.0 * std::f64::consts::PI * doy / 365.25).sin() + wobble;
        writeln!(
            file,
            "{},{},{},{:.3}",
            date.year(),
            date.month(),
            date.day(),
            flow
        )
        .unwrap();
        date += Duration::days(1);
    }
    path
}

#[test]
fn test_full_pipeline_from_csv() {
    let dir = TempDir::new().unwrap();
    let path = write_test_record(&dir);

    let series = read_flow_file(&path).unwrap();
    assert_eq!(series.len(), 4383); // 12 years incl. 3 leap days

    let extrema = extract_extrema(&series, AnalysisWindow::Year, ExtremeKind::High).unwrap();
    assert_eq!(extrema.len(), 12);

    let analysis = fit_and_evaluate(
        &extrema,
        DistFamily::Gumbel,
        ExtremeKind::High,
        &[2.0, 10.0, 100.0],
    )
    .unwrap();

    let quantiles = analysis.quantile_values();
    assert!(quantiles[0] < quantiles[1] && quantiles[1] < quantiles[2]);
    assert!((0.0..=1.0).contains(&analysis.p_value()));
}

#[test]
fn test_pipeline_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let path = write_test_record(&dir);

    let run = || {
        let series = read_flow_file(&path).unwrap();
        let extrema = extract_extrema(
            &series,
            AnalysisWindow::Season(Season::Spring),
            ExtremeKind::Low,
        )
        .unwrap();
        fit_and_evaluate(&extrema, DistFamily::Gev, ExtremeKind::Low, &[2.0, 50.0]).unwrap()
    };

    let first = run();
    let second = run();
    assert_eq!(first, second);
}

#[test]
fn test_every_family_on_every_window_kind() {
    let dir = TempDir::new().unwrap();
    let path = write_test_record(&dir);
    let series = read_flow_file(&path).unwrap();

    for token in ["year", "winter", "spring", "summer", "autumn", "1", "6", "12"] {
        let window: AnalysisWindow = token.parse().unwrap();
        for kind in [ExtremeKind::High, ExtremeKind::Low] {
            let extrema = extract_extrema(&series, window, kind).unwrap();
            assert!(extrema.len() >= 10, "{}: only {} extrema", window, extrema.len());
            for family in DistFamily::ALL {
                let analysis =
                    fit_and_evaluate(&extrema, family, kind, &[2.0, 5.0, 10.0, 20.0, 100.0])
                        .unwrap();
                assert_eq!(analysis.quantiles.len(), 5);
                let p = analysis.p_value();
                assert!((0.0..=1.0).contains(&p), "{} {}: p = {}", window, family, p);
            }
        }
    }
}

#[test]
fn test_unsupported_format_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("streamflow.xlsx");
    std::fs::write(&path, b"not a spreadsheet").unwrap();

    let err = read_flow_file(&path).unwrap_err();
    assert!(matches!(err, AnalysisError::UnsupportedFormat { .. }));
}

#[test]
fn test_invalid_window_tokens_are_rejected() {
    for token in ["13", "XX", "0", "yearly"] {
        let err = token.parse::<AnalysisWindow>().unwrap_err();
        assert!(
            matches!(err, AnalysisError::InvalidWindow(_)),
            "token '{}' should be invalid",
            token
        );
    }
}

#[test]
fn test_unsupported_distribution_is_rejected() {
    let err = "weibull_min".parse::<DistFamily>().unwrap_err();
    assert!(matches!(err, AnalysisError::UnsupportedDistribution(_)));
}

#[test]
fn test_indicator_battery_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = write_test_record(&dir);
    let series = read_flow_file(&path).unwrap();

    let indicators = compute_indicators(&series, DistFamily::Gumbel).unwrap();
    assert_eq!(indicators.len(), 28);

    let table = indicators.to_table();
    assert!(table.starts_with("indicator,Streamflow\n"));
    assert_eq!(table.trim_end().lines().count(), 29);
}
