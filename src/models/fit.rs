use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;

/// The closed set of distribution families available for frequency analysis.
/// Names follow the conventional right-skewed parameterizations; nothing
/// outside this set is accepted, whatever a permissive lookup might resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistFamily {
    Gamma,
    Gev,
    Gumbel,
    LogNormal,
    PearsonIii,
}

impl DistFamily {
    pub const ALL: [DistFamily; 5] = [
        DistFamily::Gamma,
        DistFamily::Gev,
        DistFamily::Gumbel,
        DistFamily::LogNormal,
        DistFamily::PearsonIii,
    ];

    /// Canonical wire name.
    pub fn name(&self) -> &'static str {
        match self {
            DistFamily::Gamma => "gamma",
            DistFamily::Gev => "genextreme",
            DistFamily::Gumbel => "gumbel_r",
            DistFamily::LogNormal => "lognorm",
            DistFamily::PearsonIii => "pearson3",
        }
    }

    /// Number of free parameters the family's fit produces.
    pub fn arity(&self) -> usize {
        match self {
            DistFamily::Gumbel => 2,
            _ => 3,
        }
    }
}

impl fmt::Display for DistFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DistFamily {
    type Err = AnalysisError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim() {
            "gamma" => Ok(DistFamily::Gamma),
            "genextreme" => Ok(DistFamily::Gev),
            "gumbel_r" => Ok(DistFamily::Gumbel),
            "lognorm" => Ok(DistFamily::LogNormal),
            "pearson3" => Ok(DistFamily::PearsonIii),
            other => Err(AnalysisError::UnsupportedDistribution(other.to_string())),
        }
    }
}

/// A fitted distribution: family, maximum-likelihood parameter vector
/// (`[loc, scale]` or `[shape, loc, scale]`), and the goodness-of-fit
/// p-value obtained with those same parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionFit {
    pub family: DistFamily,
    pub params: Vec<f64>,
    pub p_value: f64,
}

/// A quantile estimate for one requested return period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPeriodQuantile {
    /// Return period in years.
    pub period: f64,
    /// Estimated flow magnitude.
    pub quantile: f64,
}

/// The result of one frequency analysis: quantiles in the caller's request
/// order, plus the fit they were derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyAnalysis {
    pub quantiles: Vec<ReturnPeriodQuantile>,
    pub fit: DistributionFit,
}

impl FrequencyAnalysis {
    pub fn p_value(&self) -> f64 {
        self.fit.p_value
    }

    pub fn quantile_values(&self) -> Vec<f64> {
        self.quantiles.iter().map(|q| q.quantile).collect()
    }
}
