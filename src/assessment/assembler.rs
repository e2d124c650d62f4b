use serde::Serialize;
use crate::baseline::BaselineEstimator;
use crate::classifier::BandClassifier;
use crate::error::{Error, Result};
use crate::models::{BaselineStatistics, ClassificationResult, FitnessLabel, HealthRisk, SampleRow, Sex, Zone};
use crate::reference::ReferenceTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub label: FitnessLabel,
    pub zone: Zone,
    pub baseline: f64,
    pub percentage_vs_baseline: f64,
    pub zone_color: &'static str,
    pub confidence: f64,
    pub percentile: u32,
    pub health_risk: HealthRisk,
}

/// Rounds half-up to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Unrounded deviation from the baseline mean in percent; 0 for a
/// non-positive mean.
pub fn percentage_vs_baseline(value: f64, mean: f64) -> f64 {
    if mean > 0.0 {
        (value - mean) / mean * 100.0
    } else {
        0.0
    }
}

pub fn assemble(value: f64, classification: &ClassificationResult, statistics: &BaselineStatistics) -> Assessment {
    Assessment {
        label: classification.label,
        zone: classification.zone,
        baseline: round1(statistics.mean),
        percentage_vs_baseline: round1(percentage_vs_baseline(value, statistics.mean)),
        zone_color: classification.zone.color(),
        confidence: classification.confidence,
        percentile: classification.percentile,
        health_risk: classification.health_risk,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentOutcome {
    pub assessment: Assessment,
    pub statistics: BaselineStatistics,
}

/// Runs classification and baseline estimation for one measurement and
/// merges them.
pub struct Assessor<'a> {
    classifier: BandClassifier<'a>,
    estimator: BaselineEstimator<'a>,
    dataset: &'a [SampleRow],
}

impl<'a> Assessor<'a> {
    pub fn new(table: &'a ReferenceTable, dataset: &'a [SampleRow]) -> Self {
        Self {
            classifier: BandClassifier::new(table),
            estimator: BaselineEstimator::new(table),
            dataset,
        }
    }

    pub fn assess(&self, sex: Sex, age: u32, value: f64) -> Result<AssessmentOutcome> {
        let classification = self.classifier.classify(sex, age, value)?;
        let statistics = self.estimator.estimate(self.dataset, sex, age)?;
        let assessment = assemble(value, &classification, &statistics);

        if !assessment.baseline.is_finite() || !assessment.percentage_vs_baseline.is_finite() {
            return Err(Error::Internal(format!(
                "non-finite assessment for sex {} age {} value {}",
                sex, age, value
            )));
        }

        Ok(AssessmentOutcome { assessment, statistics })
    }

    /// Dataset rows of the same sex within the slice span of `age`.
    pub fn demographic_slice(&self, sex: Sex, age: u32, span: u32) -> Vec<SampleRow> {
        self.dataset
            .iter()
            .filter(|row| sex.matches(&row.sex) && row.age.abs_diff(age) <= span)
            .cloned()
            .collect()
    }
}
