pub mod netcdf_reader;
pub mod table_reader;

pub use netcdf_reader::NetcdfFlowReader;
pub use table_reader::TableFlowReader;

use std::path::Path;

use crate::error::{AnalysisError, Result};
use crate::models::FlowSeries;

/// Load a streamflow record, dispatching on the file extension:
/// `.csv` for the tabular encoding, `.nc` for the array encoding.
pub fn read_flow_file(path: &Path) -> Result<FlowSeries> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") => TableFlowReader::new().read(path),
        Some("nc") => NetcdfFlowReader::new().read(path),
        _ => Err(AnalysisError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}
