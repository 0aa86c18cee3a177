use chrono::{Duration, NaiveDate};
use netcdf3::{DataVector, FileReader};
use std::path::Path;
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::models::{FlowRecord, FlowSeries};
use crate::utils::constants::{
    MATLAB_DATENUM_UNIX_EPOCH, MISSING_FLOW_SENTINEL, NETCDF_DATES_VAR, NETCDF_FILL_THRESHOLD,
    NETCDF_FLOW_VAR,
};

/// Reader for the array encoding: a classic NetCDF file with a `dates`
/// variable holding MATLAB datenums and a `Qobs` flow variable.
pub struct NetcdfFlowReader;

impl NetcdfFlowReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&self, path: &Path) -> Result<FlowSeries> {
        let mut reader = FileReader::open(path)
            .map_err(|e| AnalysisError::NetCdf(format!("{}: {:?}", path.display(), e)))?;

        let datenums = read_numeric_var(&mut reader, NETCDF_DATES_VAR)?;
        let flows = read_numeric_var(&mut reader, NETCDF_FLOW_VAR)?;

        if datenums.len() != flows.len() {
            return Err(AnalysisError::InvalidFormat(format!(
                "'{}' has {} entries but '{}' has {}",
                NETCDF_DATES_VAR,
                datenums.len(),
                NETCDF_FLOW_VAR,
                flows.len()
            )));
        }

        let unix_epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        let mut records = Vec::with_capacity(flows.len());
        for (datenum, flow) in datenums.into_iter().zip(flows) {
            let date = datenum_to_date(datenum, unix_epoch)?;
            records.push(FlowRecord::new(date, normalize_flow(flow)));
        }

        debug!(path = %path.display(), records = records.len(), "read NetCDF flow file");
        FlowSeries::new(records)
    }
}

impl Default for NetcdfFlowReader {
    fn default() -> Self {
        Self::new()
    }
}

fn read_numeric_var(reader: &mut FileReader, name: &str) -> Result<Vec<f64>> {
    let data = reader
        .read_var(name)
        .map_err(|e| AnalysisError::NetCdf(format!("variable '{}': {:?}", name, e)))?;
    Ok(match data {
        DataVector::I8(v) => v.into_iter().map(|x| x as f64).collect(),
        DataVector::U8(v) => v.into_iter().map(|x| x as f64).collect(),
        DataVector::I16(v) => v.into_iter().map(|x| x as f64).collect(),
        DataVector::I32(v) => v.into_iter().map(|x| x as f64).collect(),
        DataVector::F32(v) => v.into_iter().map(|x| x as f64).collect(),
        DataVector::F64(v) => v,
    })
}

/// MATLAB datenums count days from year 0; datenum 719529 is 1970-01-01.
/// Fractional day parts (time of day) are discarded.
fn datenum_to_date(datenum: f64, unix_epoch: NaiveDate) -> Result<NaiveDate> {
    if !datenum.is_finite() {
        return Err(AnalysisError::InvalidFormat(format!(
            "non-finite datenum {}",
            datenum
        )));
    }
    let days = datenum.floor() as i64 - MATLAB_DATENUM_UNIX_EPOCH;
    unix_epoch
        .checked_add_signed(Duration::days(days))
        .ok_or_else(|| AnalysisError::InvalidFormat(format!("datenum {} out of range", datenum)))
}

fn normalize_flow(value: f64) -> f64 {
    if value == MISSING_FLOW_SENTINEL || value.abs() >= NETCDF_FILL_THRESHOLD || !value.is_finite() {
        f64::NAN
    } else {
        value
    }
}
