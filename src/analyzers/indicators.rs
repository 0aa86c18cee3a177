//! The fixed battery of 28 hydrologic indicators computed from a daily
//! streamflow record: interannual and calendar means, mean annual extremes,
//! and return-period quantiles of the annual maxima and minima.

use serde::Serialize;
use tracing::debug;

use crate::analyzers::extrema::{complete_year_windows, extract_extrema};
use crate::analyzers::frequency::fit_and_evaluate;
use crate::error::{AnalysisError, Result};
use crate::models::{AnalysisWindow, DistFamily, ExtremeKind, FlowSeries, Season};
use crate::utils::constants::INDICATOR_COUNT;

const MONTH_NAMES: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

/// Return periods used for the quantile indicators, in years.
const INDICATOR_PERIODS: [f64; 4] = [2.0, 10.0, 20.0, 100.0];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Indicator {
    pub name: String,
    pub value: f64,
}

/// The labeled indicator battery, in its fixed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSet {
    entries: Vec<Indicator>,
}

impl IndicatorSet {
    pub fn entries(&self) -> &[Indicator] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// CSV rendering: one `indicator,Streamflow` header plus one row per
    /// indicator.
    pub fn to_table(&self) -> String {
        let mut table = String::from("indicator,Streamflow\n");
        for entry in &self.entries {
            table.push_str(&format!("{},{:.6}\n", entry.name, entry.value));
        }
        table
    }
}

/// Compute all 28 indicators. Quantile indicators fit the requested
/// distribution family to the annual maxima (floods) and annual minima
/// (low flows).
pub fn compute_indicators(series: &FlowSeries, family: DistFamily) -> Result<IndicatorSet> {
    if series.is_empty() {
        return Err(AnalysisError::MissingData(
            "empty streamflow series".to_string(),
        ));
    }

    let mut entries = Vec::with_capacity(INDICATOR_COUNT);
    let mut push = |name: String, value: f64| {
        entries.push(Indicator { name, value });
    };

    // 1: interannual mean flow
    push("mean_flow_annual".to_string(), pooled_mean(series, &(1..=12).collect::<Vec<_>>())?);

    // 2-13: calendar-month means
    for month in 1..=12u32 {
        push(
            format!("mean_flow_{}", MONTH_NAMES[(month - 1) as usize]),
            pooled_mean(series, &[month])?,
        );
    }

    // 14-17: seasonal means
    for season in Season::ALL {
        push(
            format!("mean_flow_{}", season.label()),
            pooled_mean(series, &season.months())?,
        );
    }

    // 18-19: mean annual extremes
    let annual_maxima = extract_extrema(series, AnalysisWindow::Year, ExtremeKind::High)?;
    let annual_minima = extract_extrema(series, AnalysisWindow::Year, ExtremeKind::Low)?;
    if annual_maxima.is_empty() {
        return Err(AnalysisError::MissingData(
            "no complete calendar year in the streamflow series".to_string(),
        ));
    }
    push("mean_annual_maximum".to_string(), mean(&annual_maxima.values()));
    push("mean_annual_minimum".to_string(), mean(&annual_minima.values()));

    // 20-23: flood quantiles from the annual maxima
    let floods = fit_and_evaluate(&annual_maxima, family, ExtremeKind::High, &INDICATOR_PERIODS)?;
    for quantile in &floods.quantiles {
        push(format!("flood_q{}", quantile.period as u32), quantile.quantile);
    }

    // 24-27: low-flow quantiles from the annual minima
    let low_flows = fit_and_evaluate(&annual_minima, family, ExtremeKind::Low, &INDICATOR_PERIODS)?;
    for quantile in &low_flows.quantiles {
        push(format!("low_flow_q{}", quantile.period as u32), quantile.quantile);
    }

    // 28: interannual coefficient of variation of the yearly mean flows
    push("cv_interannual".to_string(), interannual_cv(series)?);

    debug!(family = %family, indicators = entries.len(), "indicator battery complete");
    debug_assert_eq!(entries.len(), INDICATOR_COUNT);
    Ok(IndicatorSet { entries })
}

/// Mean of every non-missing observation falling in the given calendar
/// months, pooled across all years.
fn pooled_mean(series: &FlowSeries, months: &[u32]) -> Result<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &month in months {
        for record in series.observations_in_month(month) {
            sum += record.flow;
            count += 1;
        }
    }
    if count == 0 {
        return Err(AnalysisError::MissingData(format!(
            "no observations in calendar months {:?}",
            months
        )));
    }
    Ok(sum / count as f64)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Coefficient of variation of the complete-year mean flows.
fn interannual_cv(series: &FlowSeries) -> Result<f64> {
    let (first, last) = series
        .span()
        .ok_or_else(|| AnalysisError::MissingData("empty streamflow series".to_string()))?;

    let mut yearly_means = Vec::new();
    for window in complete_year_windows(first, last) {
        let values: Vec<f64> = series
            .observations_between(window.start, window.end)
            .map(|r| r.flow)
            .collect();
        if !values.is_empty() {
            yearly_means.push(mean(&values));
        }
    }

    if yearly_means.len() < 2 {
        return Err(AnalysisError::MissingData(format!(
            "interannual variability needs at least 2 complete years, got {}",
            yearly_means.len()
        )));
    }

    let overall = mean(&yearly_means);
    let var = yearly_means
        .iter()
        .map(|&m| (m - overall) * (m - overall))
        .sum::<f64>()
        / (yearly_means.len() - 1) as f64;
    Ok(var.sqrt() / overall)
}
