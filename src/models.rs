use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;
use crate::error::Error;
use crate::validator::SEX_MESSAGE;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub fn code(&self) -> char {
        match self {
            Sex::Male => 'M',
            Sex::Female => 'F',
        }
    }

    /// Loose match used for dataset rows, which may spell the sex out
    /// ("male", "Female") or use the single-letter code.
    pub fn matches(&self, raw: &str) -> bool {
        raw.trim().to_uppercase().starts_with(self.code())
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Sex::Male),
            "F" => Ok(Sex::Female),
            _ => Err(Error::Validation(SEX_MESSAGE.to_string())),
        }
    }
}

/// ACSM fitness categories, ordered from worst to best. `CriticallyLow` is
/// synthetic: it never appears in the reference table and is only assigned
/// to values below a decade's lowest band.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FitnessLabel {
    #[serde(rename = "Critically Low")]
    CriticallyLow,
    #[serde(rename = "Very Poor")]
    VeryPoor,
    Poor,
    Fair,
    Good,
    Excellent,
    Superior,
}

impl FitnessLabel {
    pub const BANDED: [FitnessLabel; 6] = [
        FitnessLabel::VeryPoor,
        FitnessLabel::Poor,
        FitnessLabel::Fair,
        FitnessLabel::Good,
        FitnessLabel::Excellent,
        FitnessLabel::Superior,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessLabel::CriticallyLow => "Critically Low",
            FitnessLabel::VeryPoor => "Very Poor",
            FitnessLabel::Poor => "Poor",
            FitnessLabel::Fair => "Fair",
            FitnessLabel::Good => "Good",
            FitnessLabel::Excellent => "Excellent",
            FitnessLabel::Superior => "Superior",
        }
    }

    pub fn zone(&self) -> Zone {
        match self {
            FitnessLabel::CriticallyLow | FitnessLabel::VeryPoor | FitnessLabel::Poor => Zone::Low,
            FitnessLabel::Fair | FitnessLabel::Good => Zone::Medium,
            FitnessLabel::Excellent | FitnessLabel::Superior => Zone::High,
        }
    }

    pub fn health_risk(&self) -> HealthRisk {
        match self {
            FitnessLabel::CriticallyLow | FitnessLabel::VeryPoor => HealthRisk::VeryHigh,
            FitnessLabel::Poor => HealthRisk::High,
            FitnessLabel::Fair => HealthRisk::Moderate,
            FitnessLabel::Good | FitnessLabel::Excellent => HealthRisk::Low,
            FitnessLabel::Superior => HealthRisk::VeryLow,
        }
    }
}

impl fmt::Display for FitnessLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Zone {
    Low,
    Medium,
    High,
}

impl Zone {
    pub fn color(&self) -> &'static str {
        match self {
            Zone::Low => "#dc4446",
            Zone::Medium => "#fab005",
            Zone::High => "#51cf66",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Low => write!(f, "Low"),
            Zone::Medium => write!(f, "Medium"),
            Zone::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HealthRisk {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

/// One normative band. `upper` is exclusive; `None` marks the open-ended
/// top band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub label: FitnessLabel,
    pub lower: f64,
    pub upper: Option<f64>,
}

impl Band {
    pub const fn new(label: FitnessLabel, lower: f64, upper: f64) -> Self {
        Self { label, lower, upper: Some(upper) }
    }

    pub const fn open(label: FitnessLabel, lower: f64) -> Self {
        Self { label, lower, upper: None }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && self.upper.map_or(true, |upper| value < upper)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecadeEntry {
    /// Inclusive age range.
    pub ages: (u32, u32),
    pub bands: Vec<Band>,
}

impl DecadeEntry {
    pub fn covers(&self, age: u32) -> bool {
        age >= self.ages.0 && age <= self.ages.1
    }

    pub fn band(&self, label: FitnessLabel) -> Option<&Band> {
        self.bands.iter().find(|band| band.label == label)
    }

    pub fn lowest_bound(&self) -> Option<f64> {
        self.bands.first().map(|band| band.lower)
    }
}

/// One reference observation from the sample dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    pub age: u32,
    pub sex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub vo2max_ml_kg_min: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hr_rest: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethnicity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
}

impl SampleRow {
    pub fn new(age: u32, sex: &str, group: Option<&str>, vo2max_ml_kg_min: f64) -> Self {
        Self {
            age,
            sex: sex.to_string(),
            group: group.map(str::to_string),
            vo2max_ml_kg_min,
            bmi: None,
            hr_rest: None,
            ethnicity: None,
            activity_level: None,
        }
    }

    pub fn with_profile(mut self, bmi: f64, activity_level: &str) -> Self {
        self.bmi = Some(bmi);
        self.activity_level = Some(activity_level.to_string());
        self
    }

    /// Untagged rows count as healthy.
    pub fn is_healthy(&self) -> bool {
        self.group
            .as_deref()
            .map_or(true, |group| group.eq_ignore_ascii_case("healthy"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub label: FitnessLabel,
    pub zone: Zone,
    pub confidence: f64,
    pub percentile: u32,
    pub health_risk: HealthRisk,
}

/// Which rung of the fallback chain produced a set of baseline statistics.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticsSource {
    ExactSample,
    TableDerived,
    DemographicHeuristic,
    LastResort,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineStatistics {
    pub mean: f64,
    pub median: f64,
    pub standard_deviation: f64,
    pub sample_size: u64,
    pub confidence_interval: [f64; 2],
    pub source: StatisticsSource,
}

impl BaselineStatistics {
    /// Statistics for a synthesized baseline where the median is taken to
    /// equal the mean and the interval is a fixed half-width.
    pub fn synthetic(
        mean: f64,
        standard_deviation: f64,
        sample_size: u64,
        half_width: f64,
        source: StatisticsSource,
    ) -> Self {
        Self {
            mean,
            median: mean,
            standard_deviation,
            sample_size,
            confidence_interval: [mean - half_width, mean + half_width],
            source,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.mean.is_finite()
            && self.median.is_finite()
            && self.standard_deviation.is_finite()
            && self.confidence_interval.iter().all(|bound| bound.is_finite())
    }
}
