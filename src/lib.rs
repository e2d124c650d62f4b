pub mod api;
pub mod assessment;
pub mod baseline;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod reference;
pub mod validator;

#[cfg(test)]
mod tests;

pub use api::*;
pub use assessment::{Assessment, AssessmentOutcome, Assessor};
pub use baseline::BaselineEstimator;
pub use classifier::BandClassifier;
pub use config::{AppConfig, Environment};
pub use error::Error;
pub use models::*;
pub use reference::{ReferenceTable, ACSM_TABLE};
pub use validator::Validator;

use tracing::Level;

/// Installs the global fmt subscriber. `LOG_LEVEL` picks the maximum level
/// (trace, debug, info, warn, error); anything else falls back to info.
pub fn init_logging() {
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}
