//! Maximum-likelihood parameter estimation.
//!
//! All five families go through the same derivative-free minimization of
//! the negative log-likelihood; scales (and the strictly positive shapes)
//! are optimized on a log scale so the simplex can roam freely.

use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::models::DistFamily;
use crate::stats::distributions;
use crate::utils::constants::MIN_EXTREMA_POINTS;

const MAX_ITERATIONS: usize = 4000;
const F_TOLERANCE: f64 = 1.0e-10;

/// Fit `family` to `data` by maximum likelihood. The returned vector is
/// `[loc, scale]` or `[shape, loc, scale]` depending on the family's arity.
pub fn fit_mle(family: DistFamily, data: &[f64]) -> Result<Vec<f64>> {
    if data.len() < MIN_EXTREMA_POINTS {
        return Err(AnalysisError::FitFailure(format!(
            "at least {} extrema are required, got {}",
            MIN_EXTREMA_POINTS,
            data.len()
        )));
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::FitFailure(
            "extrema series contains non-finite values".to_string(),
        ));
    }
    let min = data.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max - min <= 0.0 {
        return Err(AnalysisError::FitFailure(
            "degenerate extrema series: all values identical".to_string(),
        ));
    }

    let start = distributions::initial_params(family, data);
    let raw0 = to_raw(family, &start);

    let objective = |raw: &[f64]| {
        let params = from_raw(family, raw);
        -distributions::ln_likelihood(family, &params, data)
    };

    let raw_best = nelder_mead(&objective, &raw0, MAX_ITERATIONS, F_TOLERANCE).ok_or_else(|| {
        AnalysisError::FitFailure(format!(
            "maximum-likelihood optimizer did not converge for {}",
            family
        ))
    })?;

    let params = from_raw(family, &raw_best);
    let nll = objective(&raw_best);
    if !nll.is_finite() {
        return Err(AnalysisError::FitFailure(format!(
            "optimizer finished on a non-finite likelihood for {}",
            family
        )));
    }
    debug!(family = %family, ?params, nll, "maximum-likelihood fit complete");
    Ok(params)
}

/// Map natural parameters onto the unconstrained optimization space.
fn to_raw(family: DistFamily, params: &[f64]) -> Vec<f64> {
    match (family, params) {
        (DistFamily::Gumbel, [loc, scale]) => vec![*loc, scale.ln()],
        (DistFamily::Gev, [shape, loc, scale]) => vec![*shape, *loc, scale.ln()],
        (DistFamily::Gamma, [shape, loc, scale]) => vec![shape.ln(), *loc, scale.ln()],
        (DistFamily::LogNormal, [shape, loc, scale]) => vec![shape.ln(), *loc, scale.ln()],
        (DistFamily::PearsonIii, [shape, loc, scale]) => vec![*shape, *loc, scale.ln()],
        _ => params.to_vec(),
    }
}

fn from_raw(family: DistFamily, raw: &[f64]) -> Vec<f64> {
    match (family, raw) {
        (DistFamily::Gumbel, [loc, ln_scale]) => vec![*loc, ln_scale.exp()],
        (DistFamily::Gev, [shape, loc, ln_scale]) => vec![*shape, *loc, ln_scale.exp()],
        (DistFamily::Gamma, [ln_shape, loc, ln_scale]) => {
            vec![ln_shape.exp(), *loc, ln_scale.exp()]
        }
        (DistFamily::LogNormal, [ln_shape, loc, ln_scale]) => {
            vec![ln_shape.exp(), *loc, ln_scale.exp()]
        }
        (DistFamily::PearsonIii, [shape, loc, ln_scale]) => vec![*shape, *loc, ln_scale.exp()],
        _ => raw.to_vec(),
    }
}

/// Plain Nelder-Mead simplex search. Returns the best vertex once the
/// simplex's function values have collapsed within tolerance, or `None`
/// when the iteration budget runs out first.
fn nelder_mead<F>(f: &F, x0: &[f64], max_iterations: usize, f_tol: f64) -> Option<Vec<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    const ALPHA: f64 = 1.0; // reflection
    const GAMMA: f64 = 2.0; // expansion
    const RHO: f64 = 0.5; // contraction
    const SIGMA: f64 = 0.5; // shrink

    let dim = x0.len();
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(x0.to_vec());
    for i in 0..dim {
        let mut vertex = x0.to_vec();
        if vertex[i] != 0.0 {
            vertex[i] *= 1.05;
        } else {
            vertex[i] = 0.00025;
        }
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| f(v)).collect();

    for _ in 0..max_iterations {
        // order vertices best-to-worst
        let mut order: Vec<usize> = (0..simplex.len()).collect();
        order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(std::cmp::Ordering::Equal));
        let best = order[0];
        let worst = order[dim];
        let second_worst = order[dim - 1];

        if (values[worst] - values[best]).abs() <= f_tol * (1.0 + values[best].abs()) {
            return Some(simplex[best].clone());
        }

        // centroid of all but the worst vertex
        let mut centroid = vec![0.0; dim];
        for &idx in order.iter().take(dim) {
            for (c, x) in centroid.iter_mut().zip(&simplex[idx]) {
                *c += x / dim as f64;
            }
        }

        let reflected: Vec<f64> = centroid
            .iter()
            .zip(&simplex[worst])
            .map(|(c, w)| c + ALPHA * (c - w))
            .collect();
        let f_reflected = f(&reflected);

        if f_reflected < values[best] {
            let expanded: Vec<f64> = centroid
                .iter()
                .zip(&reflected)
                .map(|(c, r)| c + GAMMA * (r - c))
                .collect();
            let f_expanded = f(&expanded);
            if f_expanded < f_reflected {
                simplex[worst] = expanded;
                values[worst] = f_expanded;
            } else {
                simplex[worst] = reflected;
                values[worst] = f_reflected;
            }
            continue;
        }

        if f_reflected < values[second_worst] {
            simplex[worst] = reflected;
            values[worst] = f_reflected;
            continue;
        }

        let contracted: Vec<f64> = centroid
            .iter()
            .zip(&simplex[worst])
            .map(|(c, w)| c + RHO * (w - c))
            .collect();
        let f_contracted = f(&contracted);
        if f_contracted < values[worst] {
            simplex[worst] = contracted;
            values[worst] = f_contracted;
            continue;
        }

        // shrink everything toward the best vertex
        let anchor = simplex[best].clone();
        for idx in 0..simplex.len() {
            if idx == best {
                continue;
            }
            for (x, a) in simplex[idx].iter_mut().zip(&anchor) {
                *x = a + SIGMA * (*x - a);
            }
            values[idx] = f(&simplex[idx]);
        }
    }

    None
}
