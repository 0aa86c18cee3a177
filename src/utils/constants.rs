/// Offset between MATLAB datenums and the Unix epoch, in days.
/// datenum 719529 is 1970-01-01.
pub const MATLAB_DATENUM_UNIX_EPOCH: i64 = 719529;

/// Sentinel used for missing flow observations in tabular sources.
pub const MISSING_FLOW_SENTINEL: f64 = -9999.0;

/// NetCDF fill values come through at this magnitude or above.
pub const NETCDF_FILL_THRESHOLD: f64 = 1.0e35;

/// NetCDF variable names expected in array-format sources.
pub const NETCDF_DATES_VAR: &str = "dates";
pub const NETCDF_FLOW_VAR: &str = "Qobs";

/// Column name candidates for the flow column in tabular sources.
pub const FLOW_COLUMN_CANDIDATES: &[&str] = &["qobs", "flow", "q", "streamflow"];

/// Minimum number of extrema required before a distribution fit is attempted.
pub const MIN_EXTREMA_POINTS: usize = 2;

/// Default return periods, in years.
pub const DEFAULT_RETURN_PERIODS: &str = "2, 5, 10, 25, 50, 100";

/// Number of indicators in the hydrologic indicator battery.
pub const INDICATOR_COUNT: usize = 28;

/// Output file names
pub const FREQUENCY_RESULTS_FILE: &str = "FreqAnalysis.txt";
pub const FREQUENCY_PVALUE_FILE: &str = "Pvalue.txt";
pub const INDICATORS_FILE: &str = "HydroIndicatorsAnalysis.txt";
pub const INDICATORS_JSON_FILE: &str = "HydroIndicatorsAnalysis.json";
