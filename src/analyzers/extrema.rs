//! Extremum extraction over calendar-partitioned analysis windows.
//!
//! Windows are enumerated directly from the series' date span. A window is
//! kept only when it lies entirely inside the span; incomplete leading and
//! trailing windows are dropped, and windows with no usable observations
//! are skipped rather than padded.

use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::models::{AnalysisWindow, ExtremaSeries, ExtremeKind, FlowSeries, Season, WindowExtremum};

/// One candidate window: inclusive date bounds plus a display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

/// Reduce each complete window of the series to its single extreme value.
pub fn extract_extrema(
    series: &FlowSeries,
    window: AnalysisWindow,
    kind: ExtremeKind,
) -> Result<ExtremaSeries> {
    if let AnalysisWindow::Month(month) = window {
        if !(1..=12).contains(&month) {
            return Err(AnalysisError::InvalidWindow(month.to_string()));
        }
    }
    let (first, last) = series
        .span()
        .ok_or_else(|| AnalysisError::MissingData("empty streamflow series".to_string()))?;

    let windows = enumerate_windows(window, first, last);
    let mut entries = Vec::with_capacity(windows.len());

    for bounds in windows {
        let extremum = series
            .observations_between(bounds.start, bounds.end)
            .map(|r| r.flow)
            .fold(None, |acc: Option<f64>, v| {
                Some(match acc {
                    None => v,
                    Some(best) => match kind {
                        ExtremeKind::High => best.max(v),
                        ExtremeKind::Low => best.min(v),
                    },
                })
            });

        if let Some(value) = extremum {
            entries.push(WindowExtremum {
                label: bounds.label,
                value,
            });
        }
    }

    debug!(
        window = %window,
        kind = kind.label(),
        extrema = entries.len(),
        "extracted extrema series"
    );
    Ok(ExtremaSeries::new(entries))
}

/// Enumerate every window of the requested kind that fits entirely within
/// `[first, last]`.
pub(crate) fn enumerate_windows(
    window: AnalysisWindow,
    first: NaiveDate,
    last: NaiveDate,
) -> Vec<WindowBounds> {
    match window {
        AnalysisWindow::Year => complete_year_windows(first, last),
        AnalysisWindow::Season(season) => season_windows(first, last, season),
        AnalysisWindow::Month(month) => month_windows(first, last, month),
    }
}

/// Calendar years fully covered by `[first, last]`.
pub(crate) fn complete_year_windows(first: NaiveDate, last: NaiveDate) -> Vec<WindowBounds> {
    let mut windows = Vec::new();
    for year in first.year()..=last.year() {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap();
        if start >= first && end <= last {
            windows.push(WindowBounds {
                start,
                end,
                label: year.to_string(),
            });
        }
    }
    windows
}

fn season_windows(first: NaiveDate, last: NaiveDate, season: Season) -> Vec<WindowBounds> {
    let start_month = season.start_month();
    let mut windows = Vec::new();
    // December-anchored quarters can begin the year before the first record
    for year in (first.year() - 1)..=last.year() {
        let start = NaiveDate::from_ymd_opt(year, start_month, 1).unwrap();
        let end_exclusive = add_months(start, 3);
        let end = end_exclusive - Duration::days(1);
        if start >= first && end <= last {
            windows.push(WindowBounds {
                start,
                end,
                label: format!("{}", start.format("%Y-%m")),
            });
        }
    }
    windows
}

fn month_windows(first: NaiveDate, last: NaiveDate, month: u32) -> Vec<WindowBounds> {
    let mut windows = Vec::new();
    for year in first.year()..=last.year() {
        let start = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        let end = add_months(start, 1) - Duration::days(1);
        if start >= first && end <= last {
            windows.push(WindowBounds {
                start,
                end,
                label: format!("{}", start.format("%Y-%m")),
            });
        }
    }
    windows
}

/// First day of the month `n` months after `date` (which must be a first
/// of month).
fn add_months(date: NaiveDate, n: u32) -> NaiveDate {
    let zero_based = date.month0() + n;
    let year = date.year() + (zero_based / 12) as i32;
    let month = zero_based % 12 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}
