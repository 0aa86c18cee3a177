//! Density, CDF and quantile functions for the five supported families.
//!
//! Parameter vectors use the conventional ordering: `[loc, scale]` for the
//! two-parameter Gumbel fit, `[shape, loc, scale]` for the rest. Consumers
//! split the vector by its length, not by family name.

use statrs::distribution::{ContinuousCDF, Gamma as GammaDist, Normal};
use statrs::function::gamma::{gamma_lr, ln_gamma};

use crate::error::{AnalysisError, Result};
use crate::models::DistFamily;

const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_7;

/// Below this magnitude a GEV shape or Pearson III skew collapses to its
/// limiting form (Gumbel and normal respectively).
const SHAPE_EPS: f64 = 1.0e-9;

enum ParamView {
    LocScale { loc: f64, scale: f64 },
    ShapeLocScale { shape: f64, loc: f64, scale: f64 },
}

fn view(params: &[f64]) -> Option<ParamView> {
    match params {
        &[loc, scale] => Some(ParamView::LocScale { loc, scale }),
        &[shape, loc, scale] => Some(ParamView::ShapeLocScale { shape, loc, scale }),
        _ => None,
    }
}

/// Sum of log-densities over the sample; `-inf` when any point falls
/// outside the support or the parameters are infeasible.
pub fn ln_likelihood(family: DistFamily, params: &[f64], data: &[f64]) -> f64 {
    data.iter().map(|&x| ln_pdf(family, params, x)).sum()
}

pub fn ln_pdf(family: DistFamily, params: &[f64], x: f64) -> f64 {
    let Some(view) = view(params) else {
        return f64::NEG_INFINITY;
    };
    match (family, view) {
        (DistFamily::Gumbel, ParamView::LocScale { loc, scale }) => gumbel_ln_pdf(loc, scale, x),
        (DistFamily::Gev, ParamView::ShapeLocScale { shape, loc, scale }) => {
            gev_ln_pdf(shape, loc, scale, x)
        }
        (DistFamily::Gamma, ParamView::ShapeLocScale { shape, loc, scale }) => {
            gamma_ln_pdf(shape, loc, scale, x)
        }
        (DistFamily::LogNormal, ParamView::ShapeLocScale { shape, loc, scale }) => {
            lognorm_ln_pdf(shape, loc, scale, x)
        }
        (DistFamily::PearsonIii, ParamView::ShapeLocScale { shape, loc, scale }) => {
            pearson3_ln_pdf(shape, loc, scale, x)
        }
        _ => f64::NEG_INFINITY,
    }
}

pub fn cdf(family: DistFamily, params: &[f64], x: f64) -> f64 {
    let Some(view) = view(params) else {
        return f64::NAN;
    };
    match (family, view) {
        (DistFamily::Gumbel, ParamView::LocScale { loc, scale }) => gumbel_cdf(loc, scale, x),
        (DistFamily::Gev, ParamView::ShapeLocScale { shape, loc, scale }) => {
            gev_cdf(shape, loc, scale, x)
        }
        (DistFamily::Gamma, ParamView::ShapeLocScale { shape, loc, scale }) => {
            gamma_cdf(shape, loc, scale, x)
        }
        (DistFamily::LogNormal, ParamView::ShapeLocScale { shape, loc, scale }) => {
            lognorm_cdf(shape, loc, scale, x)
        }
        (DistFamily::PearsonIii, ParamView::ShapeLocScale { shape, loc, scale }) => {
            pearson3_cdf(shape, loc, scale, x)
        }
        _ => f64::NAN,
    }
}

/// Percent-point function (inverse CDF) at non-exceedance probability
/// `p`, which must lie strictly inside (0, 1).
pub fn ppf(family: DistFamily, params: &[f64], p: f64) -> Result<f64> {
    if !(0.0..1.0).contains(&p) || p == 0.0 {
        return Err(AnalysisError::FitFailure(format!(
            "non-exceedance probability {} is outside (0, 1)",
            p
        )));
    }
    let Some(view) = view(params) else {
        return Err(AnalysisError::FitFailure(format!(
            "parameter vector of length {} (expected 2 or 3)",
            params.len()
        )));
    };
    let x = match (family, view) {
        (DistFamily::Gumbel, ParamView::LocScale { loc, scale }) => gumbel_ppf(loc, scale, p),
        (DistFamily::Gev, ParamView::ShapeLocScale { shape, loc, scale }) => {
            gev_ppf(shape, loc, scale, p)
        }
        (DistFamily::Gamma, ParamView::ShapeLocScale { shape, loc, scale }) => {
            gamma_ppf(shape, loc, scale, p)?
        }
        (DistFamily::LogNormal, ParamView::ShapeLocScale { shape, loc, scale }) => {
            lognorm_ppf(shape, loc, scale, p)
        }
        (DistFamily::PearsonIii, ParamView::ShapeLocScale { shape, loc, scale }) => {
            pearson3_ppf(shape, loc, scale, p)?
        }
        _ => {
            return Err(AnalysisError::FitFailure(format!(
                "parameter vector of length {} does not match family {}",
                params.len(),
                family
            )))
        }
    };
    if x.is_finite() {
        Ok(x)
    } else {
        Err(AnalysisError::FitFailure(format!(
            "quantile inversion produced a non-finite value at p = {}",
            p
        )))
    }
}

/// Moment-based starting parameters for the numerical fit.
pub fn initial_params(family: DistFamily, data: &[f64]) -> Vec<f64> {
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let var = data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0).max(1.0);
    let std = var.sqrt().max(1.0e-9);
    let min = data.iter().cloned().fold(f64::INFINITY, f64::min);

    match family {
        DistFamily::Gumbel => {
            let scale = std * 6.0_f64.sqrt() / std::f64::consts::PI;
            let loc = mean - 0.577_215_664_901_532_9 * scale;
            vec![loc, scale]
        }
        DistFamily::Gev => {
            let scale = std * 6.0_f64.sqrt() / std::f64::consts::PI;
            let loc = mean - 0.577_215_664_901_532_9 * scale;
            vec![0.1, loc, scale]
        }
        DistFamily::Gamma => {
            let loc = min - std;
            let shifted_mean = mean - loc;
            let shape = (shifted_mean / std) * (shifted_mean / std);
            let scale = var / shifted_mean;
            vec![shape, loc, scale]
        }
        DistFamily::LogNormal => {
            let loc = min - std;
            let logs: Vec<f64> = data.iter().map(|&x| (x - loc).ln()).collect();
            let log_mean = logs.iter().sum::<f64>() / n;
            let log_var =
                logs.iter().map(|&l| (l - log_mean) * (l - log_mean)).sum::<f64>() / (n - 1.0).max(1.0);
            vec![log_var.sqrt().max(1.0e-3), loc, log_mean.exp()]
        }
        DistFamily::PearsonIii => {
            let m3 = data.iter().map(|&x| (x - mean).powi(3)).sum::<f64>() / n;
            let skew = m3 / std.powi(3);
            let skew = if skew.abs() < 0.05 {
                0.05_f64.copysign(if skew == 0.0 { 1.0 } else { skew })
            } else {
                skew.clamp(-4.0, 4.0)
            };
            vec![skew, mean, std]
        }
    }
}

fn std_normal() -> Normal {
    Normal::new(0.0, 1.0).unwrap()
}

// --- Gumbel (right-skewed, maximum domain) ---

fn gumbel_ln_pdf(loc: f64, scale: f64, x: f64) -> f64 {
    if scale <= 0.0 {
        return f64::NEG_INFINITY;
    }
    let z = (x - loc) / scale;
    -scale.ln() - z - (-z).exp()
}

fn gumbel_cdf(loc: f64, scale: f64, x: f64) -> f64 {
    let z = (x - loc) / scale;
    (-(-z).exp()).exp()
}

fn gumbel_ppf(loc: f64, scale: f64, p: f64) -> f64 {
    loc - scale * (-p.ln()).ln()
}

// --- Generalized extreme value, shape convention cdf = exp(-(1 - c z)^(1/c)) ---

fn gev_ln_pdf(c: f64, loc: f64, scale: f64, x: f64) -> f64 {
    if scale <= 0.0 {
        return f64::NEG_INFINITY;
    }
    let z = (x - loc) / scale;
    if c.abs() < SHAPE_EPS {
        return -scale.ln() - z - (-z).exp();
    }
    let t = 1.0 - c * z;
    if t <= 0.0 {
        return f64::NEG_INFINITY;
    }
    -scale.ln() + (1.0 / c - 1.0) * t.ln() - t.powf(1.0 / c)
}

fn gev_cdf(c: f64, loc: f64, scale: f64, x: f64) -> f64 {
    let z = (x - loc) / scale;
    if c.abs() < SHAPE_EPS {
        return (-(-z).exp()).exp();
    }
    let t = 1.0 - c * z;
    if t <= 0.0 {
        // beyond the finite endpoint: upper for c > 0, lower for c < 0
        return if c > 0.0 { 1.0 } else { 0.0 };
    }
    (-t.powf(1.0 / c)).exp()
}

fn gev_ppf(c: f64, loc: f64, scale: f64, p: f64) -> f64 {
    if c.abs() < SHAPE_EPS {
        return gumbel_ppf(loc, scale, p);
    }
    loc + scale * (1.0 - (-p.ln()).powf(c)) / c
}

// --- Three-parameter gamma ---

fn gamma_ln_pdf(shape: f64, loc: f64, scale: f64, x: f64) -> f64 {
    if shape <= 0.0 || scale <= 0.0 {
        return f64::NEG_INFINITY;
    }
    let y = (x - loc) / scale;
    if y <= 0.0 {
        return f64::NEG_INFINITY;
    }
    (shape - 1.0) * y.ln() - y - ln_gamma(shape) - scale.ln()
}

fn gamma_cdf(shape: f64, loc: f64, scale: f64, x: f64) -> f64 {
    if shape <= 0.0 || scale <= 0.0 {
        return f64::NAN;
    }
    let y = (x - loc) / scale;
    if y <= 0.0 {
        0.0
    } else {
        gamma_lr(shape, y)
    }
}

fn gamma_ppf(shape: f64, loc: f64, scale: f64, p: f64) -> Result<f64> {
    let standard = GammaDist::new(shape, 1.0).map_err(|e| {
        AnalysisError::FitFailure(format!("gamma quantile with shape {}: {}", shape, e))
    })?;
    Ok(loc + scale * standard.inverse_cdf(p))
}

// --- Log-normal with location shift ---

fn lognorm_ln_pdf(s: f64, loc: f64, scale: f64, x: f64) -> f64 {
    if s <= 0.0 || scale <= 0.0 {
        return f64::NEG_INFINITY;
    }
    let y = (x - loc) / scale;
    if y <= 0.0 {
        return f64::NEG_INFINITY;
    }
    let ln_y = y.ln();
    -(ln_y * ln_y) / (2.0 * s * s) - ln_y - s.ln() - scale.ln() - LN_SQRT_2PI
}

fn lognorm_cdf(s: f64, loc: f64, scale: f64, x: f64) -> f64 {
    let y = (x - loc) / scale;
    if y <= 0.0 {
        0.0
    } else {
        std_normal().cdf(y.ln() / s)
    }
}

fn lognorm_ppf(s: f64, loc: f64, scale: f64, p: f64) -> f64 {
    loc + scale * (s * std_normal().inverse_cdf(p)).exp()
}

// --- Pearson type III, parameterized by skew ---

fn pearson3_abz(skew: f64, loc: f64, scale: f64) -> (f64, f64, f64) {
    let beta = 2.0 / (skew * scale);
    let alpha = 4.0 / (skew * skew);
    let zeta = loc - alpha / beta;
    (alpha, beta, zeta)
}

fn pearson3_ln_pdf(skew: f64, loc: f64, scale: f64, x: f64) -> f64 {
    if scale <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if skew.abs() < SHAPE_EPS {
        let z = (x - loc) / scale;
        return -0.5 * z * z - scale.ln() - LN_SQRT_2PI;
    }
    let (alpha, beta, zeta) = pearson3_abz(skew, loc, scale);
    let u = beta * (x - zeta);
    if u <= 0.0 {
        return f64::NEG_INFINITY;
    }
    beta.abs().ln() + (alpha - 1.0) * u.ln() - u - ln_gamma(alpha)
}

fn pearson3_cdf(skew: f64, loc: f64, scale: f64, x: f64) -> f64 {
    if skew.abs() < SHAPE_EPS {
        return std_normal().cdf((x - loc) / scale);
    }
    let (alpha, beta, zeta) = pearson3_abz(skew, loc, scale);
    let u = beta * (x - zeta);
    if skew > 0.0 {
        if u <= 0.0 {
            0.0
        } else {
            gamma_lr(alpha, u)
        }
    } else if u <= 0.0 {
        // negative skew flips the support above its upper endpoint
        1.0
    } else {
        1.0 - gamma_lr(alpha, u)
    }
}

fn pearson3_ppf(skew: f64, loc: f64, scale: f64, p: f64) -> Result<f64> {
    if skew.abs() < SHAPE_EPS {
        return Ok(loc + scale * std_normal().inverse_cdf(p));
    }
    let (alpha, beta, zeta) = pearson3_abz(skew, loc, scale);
    let standard = GammaDist::new(alpha, 1.0).map_err(|e| {
        AnalysisError::FitFailure(format!("pearson3 quantile with skew {}: {}", skew, e))
    })?;
    let u = if skew > 0.0 {
        standard.inverse_cdf(p)
    } else {
        standard.inverse_cdf(1.0 - p)
    };
    Ok(zeta + u / beta)
}
