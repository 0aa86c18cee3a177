pub mod extrema;
pub mod fit;
pub mod request;
pub mod series;
pub mod window;

pub use extrema::{ExtremaSeries, ExtremeKind, WindowExtremum};
pub use fit::{DistFamily, DistributionFit, FrequencyAnalysis, ReturnPeriodQuantile};
pub use request::FrequencyRequest;
pub use series::{FlowRecord, FlowSeries};
pub use window::{AnalysisWindow, Season};
