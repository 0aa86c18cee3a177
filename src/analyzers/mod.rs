pub mod extrema;
pub mod frequency;
pub mod indicators;

pub use extrema::extract_extrema;
pub use frequency::fit_and_evaluate;
pub use indicators::{compute_indicators, Indicator, IndicatorSet};
