use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::path::Path;
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::models::{FlowRecord, FlowSeries};
use crate::utils::constants::{FLOW_COLUMN_CANDIDATES, MISSING_FLOW_SENTINEL};

/// Reader for the tabular encoding: a delimited file with a header row and
/// separate `Year`, `Month`, `Day` integer columns plus one flow column.
pub struct TableFlowReader {
    delimiter: u8,
}

impl TableFlowReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn read(&self, path: &Path) -> Result<FlowSeries> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let year_col = find_column(&headers, &["year"])?;
        let month_col = find_column(&headers, &["month"])?;
        let day_col = find_column(&headers, &["day"])?;
        let flow_col = find_column(&headers, FLOW_COLUMN_CANDIDATES)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            if row.iter().all(|field| field.is_empty()) {
                continue;
            }

            let year = parse_int(&row, year_col, "year")?;
            let month = parse_int(&row, month_col, "month")? as u32;
            let day = parse_int(&row, day_col, "day")? as u32;
            let date = NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(|| {
                AnalysisError::InvalidFormat(format!(
                    "invalid calendar date {}-{}-{}",
                    year, month, day
                ))
            })?;

            let flow = parse_flow(&row, flow_col)?;
            records.push(FlowRecord::new(date, flow));
        }

        debug!(path = %path.display(), records = records.len(), "read tabular flow file");
        FlowSeries::new(records)
    }
}

impl Default for TableFlowReader {
    fn default() -> Self {
        Self::new()
    }
}

fn find_column(headers: &csv::StringRecord, candidates: &[&str]) -> Result<usize> {
    for (idx, name) in headers.iter().enumerate() {
        let lowered = name.trim().to_ascii_lowercase();
        if candidates.contains(&lowered.as_str()) {
            return Ok(idx);
        }
    }
    Err(AnalysisError::InvalidFormat(format!(
        "no column matching [{}] in header '{}'",
        candidates.join(", "),
        headers.iter().collect::<Vec<_>>().join(",")
    )))
}

fn parse_int(row: &csv::StringRecord, idx: usize, what: &str) -> Result<i64> {
    let field = row.get(idx).unwrap_or("");
    field.parse::<i64>().map_err(|_| {
        AnalysisError::InvalidFormat(format!("invalid {} value: '{}'", what, field))
    })
}

fn parse_flow(row: &csv::StringRecord, idx: usize) -> Result<f64> {
    let field = row.get(idx).unwrap_or("");
    if field.is_empty() {
        return Ok(f64::NAN);
    }
    let value = field.parse::<f64>().map_err(|_| {
        AnalysisError::InvalidFormat(format!("invalid flow value: '{}'", field))
    })?;
    if value == MISSING_FLOW_SENTINEL || !value.is_finite() {
        Ok(f64::NAN)
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_basic_table() {
        let file = write_csv(
            "Year,Month,Day,Qobs\n\
             2000,1,1,12.5\n\
             2000,1,2,13.0\n\
             2000,1,3,11.75\n",
        );
        let series = TableFlowReader::new().read(file.path()).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.records()[0].flow, 12.5);
        assert_eq!(
            series.records()[2].date,
            NaiveDate::from_ymd_opt(2000, 1, 3).unwrap()
        );
    }

    #[test]
    fn test_missing_sentinel_becomes_nan() {
        let file = write_csv(
            "Year,Month,Day,Flow\n\
             2000,1,1,12.5\n\
             2000,1,2,-9999\n\
             2000,1,3,\n",
        );
        let series = TableFlowReader::new().read(file.path()).unwrap();
        assert_eq!(series.len(), 3);
        assert!(series.records()[1].is_missing());
        assert!(series.records()[2].is_missing());
    }

    #[test]
    fn test_flow_column_is_found_case_insensitively() {
        let file = write_csv("YEAR,MONTH,DAY,STREAMFLOW\n1999,12,31,8.25\n");
        let series = TableFlowReader::new().read(file.path()).unwrap();
        assert_eq!(series.records()[0].flow, 8.25);
    }

    #[test]
    fn test_rejects_missing_columns() {
        let file = write_csv("Year,Month,Qobs\n2000,1,5.0\n");
        assert!(TableFlowReader::new().read(file.path()).is_err());
    }

    #[test]
    fn test_rejects_invalid_date() {
        let file = write_csv("Year,Month,Day,Qobs\n2000,2,30,5.0\n");
        let err = TableFlowReader::new().read(file.path()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidFormat(_)));
    }

    #[test]
    fn test_rejects_duplicate_dates() {
        let file = write_csv(
            "Year,Month,Day,Qobs\n\
             2000,1,1,1.0\n\
             2000,1,1,2.0\n",
        );
        assert!(TableFlowReader::new().read(file.path()).is_err());
    }
}
