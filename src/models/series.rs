use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// A single dated streamflow observation. Missing observations are carried
/// as `f64::NAN` so the record keeps its place in the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub date: NaiveDate,
    pub flow: f64,
}

impl FlowRecord {
    pub fn new(date: NaiveDate, flow: f64) -> Self {
        Self { date, flow }
    }

    pub fn is_missing(&self) -> bool {
        !self.flow.is_finite()
    }
}

/// An ordered daily streamflow record. Dates are strictly increasing;
/// the series is immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowSeries {
    records: Vec<FlowRecord>,
}

impl FlowSeries {
    pub fn new(records: Vec<FlowRecord>) -> Result<Self> {
        for pair in records.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(AnalysisError::InvalidFormat(format!(
                    "timestamps must be strictly increasing: {} follows {}",
                    pair[1].date, pair[0].date
                )));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[FlowRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last observation dates, if any.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// Non-missing observations falling within `[start, end]` inclusive.
    pub fn observations_between(&self, start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = &FlowRecord> {
        self.records
            .iter()
            .filter(move |r| r.date >= start && r.date <= end && !r.is_missing())
    }

    /// Non-missing observations whose date falls in the given calendar month.
    pub fn observations_in_month(&self, month: u32) -> impl Iterator<Item = &FlowRecord> {
        self.records
            .iter()
            .filter(move |r| r.date.month() == month && !r.is_missing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_strictly_increasing_enforced() {
        let ok = FlowSeries::new(vec![
            FlowRecord::new(d(2000, 1, 1), 1.0),
            FlowRecord::new(d(2000, 1, 2), 2.0),
        ]);
        assert!(ok.is_ok());

        let duplicate = FlowSeries::new(vec![
            FlowRecord::new(d(2000, 1, 1), 1.0),
            FlowRecord::new(d(2000, 1, 1), 2.0),
        ]);
        assert!(duplicate.is_err());

        let regressing = FlowSeries::new(vec![
            FlowRecord::new(d(2000, 1, 2), 1.0),
            FlowRecord::new(d(2000, 1, 1), 2.0),
        ]);
        assert!(regressing.is_err());
    }

    #[test]
    fn test_missing_records_excluded_from_window_queries() {
        let series = FlowSeries::new(vec![
            FlowRecord::new(d(2000, 1, 1), 1.0),
            FlowRecord::new(d(2000, 1, 2), f64::NAN),
            FlowRecord::new(d(2000, 1, 3), 3.0),
        ])
        .unwrap();

        let values: Vec<f64> = series
            .observations_between(d(2000, 1, 1), d(2000, 1, 3))
            .map(|r| r.flow)
            .collect();
        assert_eq!(values, vec![1.0, 3.0]);
    }

    #[test]
    fn test_span() {
        let series = FlowSeries::new(vec![
            FlowRecord::new(d(1998, 6, 12), 1.0),
            FlowRecord::new(d(2001, 2, 3), 2.0),
        ])
        .unwrap();
        assert_eq!(series.span(), Some((d(1998, 6, 12), d(2001, 2, 3))));

        let empty = FlowSeries::new(vec![]).unwrap();
        assert_eq!(empty.span(), None);
    }
}
