use tracing::{debug, warn};
use crate::error::Result;
use crate::models::{ClassificationResult, DecadeEntry, FitnessLabel, Sex};
use crate::reference::{DecadeMatch, ReferenceTable};
use crate::validator::{check_age, check_vo2max};

pub const EXACT_DECADE_CONFIDENCE: f64 = 0.95;
pub const FALLBACK_DECADE_CONFIDENCE: f64 = 0.75;
pub const EXTREME_CONFIDENCE: f64 = 0.99;
pub const BOUNDARY_CONFIDENCE_CAP: f64 = 0.85;

/// Representative value of the open-ended top band sits this far above its
/// lower bound.
pub const OPEN_BAND_OFFSET: f64 = 10.0;

/// Places a measured VO2max into the ACSM band for the subject's sex and age.
pub struct BandClassifier<'a> {
    table: &'a ReferenceTable,
}

impl<'a> BandClassifier<'a> {
    pub fn new(table: &'a ReferenceTable) -> Self {
        Self { table }
    }

    pub fn classify(&self, sex: Sex, age: u32, value: f64) -> Result<ClassificationResult> {
        let age = check_age(age)?;
        let value = check_vo2max(value)?;

        let (decade, matched) = self.table.find_or_lowest(sex, age)?;
        let base_confidence = match matched {
            DecadeMatch::Exact => EXACT_DECADE_CONFIDENCE,
            DecadeMatch::Fallback => {
                warn!(
                    "No ACSM decade for sex {} age {}, using {}-{}",
                    sex, age, decade.ages.0, decade.ages.1
                );
                FALLBACK_DECADE_CONFIDENCE
            }
        };

        let result = classify_within(decade, value, base_confidence);
        debug!(
            "Classified {} ml/kg/min (sex {}, age {}) as {} ({}), percentile {}, confidence {:.2}",
            value, sex, age, result.label, result.zone, result.percentile, result.confidence
        );

        Ok(result)
    }
}

/// Classifies `value` against one decade's bands. The decade must hold at
/// least one band.
pub fn classify_within(decade: &DecadeEntry, value: f64, base_confidence: f64) -> ClassificationResult {
    let lowest = decade.lowest_bound().unwrap_or(0.0);

    let (label, mut confidence) = if value < lowest {
        (FitnessLabel::CriticallyLow, EXTREME_CONFIDENCE)
    } else {
        let label = decade
            .bands
            .iter()
            .find(|band| band.contains(value))
            .map_or(FitnessLabel::Superior, |band| band.label);
        (label, base_confidence)
    };

    let percentile = if label == FitnessLabel::CriticallyLow {
        extreme_low_percentile(value, lowest)
    } else {
        band_percentile(decade, value)
    };

    if decade.bands.iter().any(|band| band.lower == value) {
        confidence = confidence.min(BOUNDARY_CONFIDENCE_CAP);
    }

    ClassificationResult {
        label,
        zone: label.zone(),
        confidence,
        percentile,
        health_risk: label.health_risk(),
    }
}

/// Share of band representatives (midpoints, or lower + offset for the open
/// band) lying strictly below `value`, as a whole percentage. Coarse by
/// construction: it can only take `bands + 1` distinct values.
pub fn band_percentile(decade: &DecadeEntry, value: f64) -> u32 {
    if decade.bands.is_empty() {
        return 0;
    }

    let below = decade
        .bands
        .iter()
        .map(|band| match band.upper {
            Some(upper) => (band.lower + upper) / 2.0,
            None => band.lower + OPEN_BAND_OFFSET,
        })
        .filter(|representative| *representative < value)
        .count();

    (below as f64 / decade.bands.len() as f64 * 100.0).round() as u32
}

/// Proportional estimate for values under the lowest band, never below 1.
pub fn extreme_low_percentile(value: f64, lowest: f64) -> u32 {
    if lowest <= 0.0 {
        return 1;
    }
    ((value / lowest) * 5.0).round().max(1.0) as u32
}
