pub mod distributions;
pub mod fitting;
pub mod ks;

pub use fitting::fit_mle;
pub use ks::ks_test;
