use validator::Validate;

use crate::error::{AnalysisError, Result};
use crate::models::{AnalysisWindow, DistFamily, ExtremeKind};

/// A validated frequency-analysis request, assembled by the CLI before the
/// pipeline runs.
#[derive(Debug, Clone, Validate)]
pub struct FrequencyRequest {
    pub extreme_kind: ExtremeKind,
    pub window: AnalysisWindow,
    pub family: DistFamily,

    #[validate(length(min = 1, message = "at least one return period is required"))]
    pub return_periods: Vec<f64>,
}

impl FrequencyRequest {
    /// Field-level constraints plus the return-period sanity check: periods
    /// must exceed one year for both tails, otherwise the non-exceedance
    /// probability degenerates to 0 or 1.
    pub fn validate_request(&self) -> Result<()> {
        for &t in &self.return_periods {
            if !t.is_finite() || t <= 1.0 {
                return Err(AnalysisError::InvalidFormat(format!(
                    "return period {} must be a finite value greater than 1 year",
                    t
                )));
            }
        }
        self.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(periods: Vec<f64>) -> FrequencyRequest {
        FrequencyRequest {
            extreme_kind: ExtremeKind::High,
            window: AnalysisWindow::Year,
            family: DistFamily::Gumbel,
            return_periods: periods,
        }
    }

    #[test]
    fn test_accepts_usual_periods() {
        assert!(request(vec![2.0, 5.0, 10.0, 25.0, 50.0, 100.0])
            .validate_request()
            .is_ok());
    }

    #[test]
    fn test_rejects_empty_periods() {
        assert!(request(vec![]).validate_request().is_err());
    }

    #[test]
    fn test_rejects_degenerate_periods() {
        assert!(request(vec![2.0, 1.0]).validate_request().is_err());
        assert!(request(vec![0.5]).validate_request().is_err());
        assert!(request(vec![f64::NAN]).validate_request().is_err());
    }
}
