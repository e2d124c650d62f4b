use serde::{Deserialize, Serialize};
use crate::assessment::Assessment;
use crate::models::{BaselineStatistics, DecadeEntry, SampleRow, Sex};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub sample_rows: usize,
    pub timestamp: String,
}

/// Raw query parameters; parsed by hand so malformed numbers produce the
/// same validation messages as out-of-range ones.
#[derive(Debug, Default, Deserialize)]
pub struct AssessmentQuery {
    pub sex: Option<String>,
    pub age: Option<String>,
    pub vo2max: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssessmentBody {
    pub sex: Option<String>,
    pub age: Option<i64>,
    pub vo2max: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// A fully validated assessment request.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentRequest {
    pub sex: Sex,
    pub age: u32,
    pub vo2max: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub vo2max: f64,
    pub sex: Sex,
    pub age: u32,
    pub min: f64,
    pub max: f64,
    pub assessment: Assessment,
    pub statistics: BaselineStatistics,
    pub dataset: Vec<SampleRow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReferenceResponse {
    pub sex: Sex,
    pub decades: Vec<DecadeEntry>,
}
