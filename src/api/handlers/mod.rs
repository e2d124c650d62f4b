// Submodules
pub mod common;  // Request parsing and error mapping shared by handlers
pub mod health;  // Health check endpoint

// Assessment endpoints
pub mod assessment;
pub mod reference;

// Re-exports
pub use health::health_check;

pub use assessment::{get_assessment, post_assessment};
pub use reference::get_reference;
