pub mod estimator;
pub mod stats;

pub use estimator::*;
pub use stats::*;
