//! Frequency analysis: distribution fitting, goodness of fit, and
//! quantile inversion at return-period-derived probabilities.

use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::models::{
    DistFamily, DistributionFit, ExtremaSeries, ExtremeKind, FrequencyAnalysis,
    ReturnPeriodQuantile,
};
use crate::stats::{distributions, fit_mle, ks_test};

/// Fit `family` to the extrema by maximum likelihood, evaluate the
/// Kolmogorov-Smirnov fit of the sample against the fitted CDF, and invert
/// the CDF at each requested return period. Quantiles come back in the
/// caller's request order.
pub fn fit_and_evaluate(
    extrema: &ExtremaSeries,
    family: DistFamily,
    kind: ExtremeKind,
    return_periods: &[f64],
) -> Result<FrequencyAnalysis> {
    let values = extrema.values();
    let params = fit_mle(family, &values)?;

    // the fit check deliberately reuses the fitted parameters
    let (statistic, p_value) = ks_test(&values, |x| distributions::cdf(family, &params, x));
    debug!(family = %family, statistic, p_value, "goodness-of-fit evaluated");

    let mut quantiles = Vec::with_capacity(return_periods.len());
    for &period in return_periods {
        let p = kind.non_exceedance(period);
        if !(p > 0.0 && p < 1.0) {
            return Err(AnalysisError::InvalidFormat(format!(
                "return period {} yields a degenerate non-exceedance probability {}",
                period, p
            )));
        }
        let quantile = distributions::ppf(family, &params, p)?;
        quantiles.push(ReturnPeriodQuantile { period, quantile });
    }

    Ok(FrequencyAnalysis {
        quantiles,
        fit: DistributionFit {
            family,
            params,
            p_value,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WindowExtremum;

    const FLOOD_MAXIMA: [f64; 10] =
        [120.0, 98.0, 145.0, 133.0, 110.0, 160.0, 102.0, 99.0, 121.0, 140.0];

    fn extrema_from(values: &[f64]) -> ExtremaSeries {
        ExtremaSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| WindowExtremum {
                    label: (1990 + i).to_string(),
                    value: v,
                })
                .collect(),
        )
    }

    /// A longer deterministic sample: Gumbel(100, 20) plotting positions.
    fn long_sample() -> Vec<f64> {
        (1..=30)
            .map(|i| {
                let p = i as f64 / 31.0;
                100.0 - 20.0 * (-p.ln()).ln()
            })
            .collect()
    }

    #[test]
    fn test_flood_quantiles_increase_with_return_period() {
        let extrema = extrema_from(&FLOOD_MAXIMA);
        let analysis =
            fit_and_evaluate(&extrema, DistFamily::Gumbel, ExtremeKind::High, &[2.0, 10.0, 100.0])
                .unwrap();
        let q = analysis.quantile_values();
        assert_eq!(q.len(), 3);
        assert!(q[0] < q[1], "Q(2) = {} should be below Q(10) = {}", q[0], q[1]);
        assert!(q[1] < q[2], "Q(10) = {} should be below Q(100) = {}", q[1], q[2]);
    }

    #[test]
    fn test_low_flow_quantiles_decrease_with_return_period() {
        let extrema = extrema_from(&FLOOD_MAXIMA);
        let analysis =
            fit_and_evaluate(&extrema, DistFamily::Gumbel, ExtremeKind::Low, &[2.0, 10.0, 100.0])
                .unwrap();
        let q = analysis.quantile_values();
        assert!(q[0] > q[1] && q[1] > q[2], "low-flow tail should fall: {:?}", q);
    }

    #[test]
    fn test_both_kinds_agree_at_the_median_event() {
        // T = 2 maps to p = 0.5 for floods and for low flows alike
        let extrema = extrema_from(&FLOOD_MAXIMA);
        let high =
            fit_and_evaluate(&extrema, DistFamily::Gumbel, ExtremeKind::High, &[2.0]).unwrap();
        let low = fit_and_evaluate(&extrema, DistFamily::Gumbel, ExtremeKind::Low, &[2.0]).unwrap();
        assert_eq!(high.quantiles[0].quantile, low.quantiles[0].quantile);
    }

    #[test]
    fn test_high_uses_the_upper_tail() {
        let extrema = extrema_from(&long_sample());
        let analysis =
            fit_and_evaluate(&extrema, DistFamily::Gumbel, ExtremeKind::High, &[100.0]).unwrap();
        let median =
            fit_and_evaluate(&extrema, DistFamily::Gumbel, ExtremeKind::High, &[2.0]).unwrap();
        assert!(analysis.quantiles[0].quantile > median.quantiles[0].quantile);
        // p = 0.99 quantile of Gumbel(100, 20) sits near 192
        let q100 = analysis.quantiles[0].quantile;
        assert!((150.0..250.0).contains(&q100), "Q(100) = {}", q100);
    }

    #[test]
    fn test_p_value_in_unit_interval_for_every_family() {
        let extrema = extrema_from(&long_sample());
        for family in DistFamily::ALL {
            let analysis =
                fit_and_evaluate(&extrema, family, ExtremeKind::High, &[2.0, 20.0]).unwrap();
            let p = analysis.p_value();
            assert!((0.0..=1.0).contains(&p), "{}: p = {}", family, p);
        }
    }

    #[test]
    fn test_request_order_is_preserved() {
        let extrema = extrema_from(&FLOOD_MAXIMA);
        let periods = [50.0, 2.0, 10.0];
        let analysis =
            fit_and_evaluate(&extrema, DistFamily::Gumbel, ExtremeKind::High, &periods).unwrap();
        let requested: Vec<f64> = analysis.quantiles.iter().map(|q| q.period).collect();
        assert_eq!(requested, periods.to_vec());
    }

    #[test]
    fn test_rerun_is_bit_identical() {
        let extrema = extrema_from(&FLOOD_MAXIMA);
        let a = fit_and_evaluate(&extrema, DistFamily::Gev, ExtremeKind::High, &[2.0, 100.0])
            .unwrap();
        let b = fit_and_evaluate(&extrema, DistFamily::Gev, ExtremeKind::High, &[2.0, 100.0])
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_too_short_series_fails_loudly() {
        let extrema = extrema_from(&[42.0]);
        let err = fit_and_evaluate(&extrema, DistFamily::Gumbel, ExtremeKind::High, &[2.0])
            .unwrap_err();
        assert!(matches!(err, AnalysisError::FitFailure(_)));
    }

    #[test]
    fn test_unit_return_period_is_rejected() {
        let extrema = extrema_from(&FLOOD_MAXIMA);
        let err = fit_and_evaluate(&extrema, DistFamily::Gumbel, ExtremeKind::High, &[1.0])
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidFormat(_)));
    }
}
