use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AnalysisError;

/// Which tail of the record is of interest: window maxima for flood
/// analysis, window minima for low-flow analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtremeKind {
    High,
    Low,
}

impl ExtremeKind {
    /// Probability of non-exceedance at return period `t` (years).
    /// Floods look up the upper tail, low flows the lower tail.
    pub fn non_exceedance(&self, t: f64) -> f64 {
        match self {
            ExtremeKind::High => 1.0 - 1.0 / t,
            ExtremeKind::Low => 1.0 / t,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExtremeKind::High => "high",
            ExtremeKind::Low => "low",
        }
    }
}

impl FromStr for ExtremeKind {
    type Err = AnalysisError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(ExtremeKind::High),
            "low" => Ok(ExtremeKind::Low),
            _ => Err(AnalysisError::InvalidFormat(format!(
                "extreme type '{}' is not supported (expected 'high' or 'low')",
                token
            ))),
        }
    }
}

/// One reduced value per analysis window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowExtremum {
    /// Window identifier, e.g. `1998` or `1998-12`.
    pub label: String,
    pub value: f64,
}

/// The extrema series derived from a flow record: one entry per complete,
/// non-empty window, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremaSeries {
    entries: Vec<WindowExtremum>,
}

impl ExtremaSeries {
    pub fn new(entries: Vec<WindowExtremum>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[WindowExtremum] {
        &self.entries
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.value).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_exceedance_convention() {
        // T = 2 is the median event for both kinds
        assert_eq!(ExtremeKind::High.non_exceedance(2.0), 0.5);
        assert_eq!(ExtremeKind::Low.non_exceedance(2.0), 0.5);
        // T = 100: floods look up the upper tail, low flows the lower
        assert_eq!(ExtremeKind::High.non_exceedance(100.0), 0.99);
        assert_eq!(ExtremeKind::Low.non_exceedance(100.0), 0.01);
    }

    #[test]
    fn test_extreme_kind_parsing() {
        assert_eq!("high".parse::<ExtremeKind>().unwrap(), ExtremeKind::High);
        assert_eq!("LOW".parse::<ExtremeKind>().unwrap(), ExtremeKind::Low);
        assert!("median".parse::<ExtremeKind>().is_err());
    }

    #[test]
    fn test_values_preserve_order() {
        let series = ExtremaSeries::new(vec![
            WindowExtremum {
                label: "1998".to_string(),
                value: 120.0,
            },
            WindowExtremum {
                label: "1999".to_string(),
                value: 98.0,
            },
        ]);
        assert_eq!(series.values(), vec![120.0, 98.0]);
    }
}
