use tracing::{debug, warn};
use crate::baseline::stats::{SampleSummary, Z_95};
use crate::error::Result;
use crate::models::{BaselineStatistics, DecadeEntry, FitnessLabel, SampleRow, Sex, StatisticsSource};
use crate::reference::ReferenceTable;
use crate::validator::check_age;

/// Fewer matching rows than this and the sample is not trusted.
pub const MIN_SAMPLE_ROWS: usize = 3;

const TABLE_SAMPLE_SIZE: u64 = 1000;
const TABLE_HALF_WIDTH: f64 = 2.0;
const HEURISTIC_SAMPLE_SIZE: u64 = 100;
const HEURISTIC_HALF_WIDTH: f64 = 3.0;
const HEURISTIC_CV: f64 = 0.15;
const LAST_RESORT_STD_DEV: f64 = 5.0;
const LAST_RESORT_SAMPLE_SIZE: u64 = 50;
const LAST_RESORT_HALF_WIDTH: f64 = 3.0;

/// Estimates the peer-group baseline for a sex and age from the sample
/// dataset, falling back through
/// exact sample -> table-derived -> demographic heuristic -> last resort.
pub struct BaselineEstimator<'a> {
    table: &'a ReferenceTable,
}

impl<'a> BaselineEstimator<'a> {
    pub fn new(table: &'a ReferenceTable) -> Self {
        Self { table }
    }

    /// Only fails on an out-of-range age; sparse or empty samples fall back.
    pub fn estimate(&self, rows: &[SampleRow], sex: Sex, age: u32) -> Result<BaselineStatistics> {
        let age = check_age(age)?;
        let (low, high) = containing_decade(age);
        let values = matching_values(rows, sex, low, high);

        let statistics = if values.len() >= MIN_SAMPLE_ROWS {
            match exact_sample(&values) {
                Some(statistics) if statistics.is_finite() => statistics,
                _ => {
                    warn!(
                        "Sample statistics for sex {} ages {}-{} were not computable, using last-resort baseline",
                        sex, low, high
                    );
                    last_resort(sex)
                }
            }
        } else if let Some(decade) = self.table.find(sex, age).filter(|decade| !decade.bands.is_empty()) {
            debug!(
                "Only {} sample rows for sex {} ages {}-{}, deriving baseline from ACSM bands",
                values.len(), sex, low, high
            );
            table_derived(decade, sex)
        } else {
            warn!("No ACSM data for sex {} age {}, using demographic baseline", sex, age);
            demographic_heuristic(sex, age)
        };

        debug!(
            "Baseline for sex {} age {}: mean {:.2}, n {}, source {:?}",
            sex, age, statistics.mean, statistics.sample_size, statistics.source
        );

        Ok(statistics)
    }
}

/// Inclusive decade containing `age`, e.g. 45 -> (40, 49).
pub fn containing_decade(age: u32) -> (u32, u32) {
    let low = age / 10 * 10;
    (low, low + 9)
}

/// Values of healthy (or untagged) rows of the given sex within [low, high].
pub fn matching_values(rows: &[SampleRow], sex: Sex, low: u32, high: u32) -> Vec<f64> {
    rows.iter()
        .filter(|row| sex.matches(&row.sex) && row.is_healthy() && (low..=high).contains(&row.age))
        .map(|row| row.vo2max_ml_kg_min)
        .collect()
}

pub fn exact_sample(values: &[f64]) -> Option<BaselineStatistics> {
    let stats = SampleSummary::create(values).to_stats()?;
    let margin = Z_95 * stats.std_error;

    Some(BaselineStatistics {
        mean: stats.mean,
        median: stats.median,
        standard_deviation: stats.std_dev,
        sample_size: stats.sample_count,
        confidence_interval: [stats.mean - margin, stats.mean + margin],
        source: StatisticsSource::ExactSample,
    })
}

/// Centres the baseline on the Good-to-Excellent span of the decade's bands:
/// from the Good lower bound up to the Excellent band's ceiling.
pub fn table_derived(decade: &DecadeEntry, sex: Sex) -> BaselineStatistics {
    let good = decade
        .band(FitnessLabel::Good)
        .map(|band| band.lower)
        .unwrap_or(match sex {
            Sex::Male => 45.0,
            Sex::Female => 38.0,
        });
    let excellent_ceiling = decade
        .band(FitnessLabel::Excellent)
        .and_then(|band| band.upper)
        .unwrap_or(good + 5.0);

    BaselineStatistics::synthetic(
        (good + excellent_ceiling) / 2.0,
        (excellent_ceiling - good) / 4.0,
        TABLE_SAMPLE_SIZE,
        TABLE_HALF_WIDTH,
        StatisticsSource::TableDerived,
    )
}

pub fn demographic_heuristic(sex: Sex, age: u32) -> BaselineStatistics {
    let mean = match (sex, age) {
        (Sex::Male, a) if a < 25 => 50.0,
        (Sex::Male, a) if a < 35 => 46.0,
        (Sex::Male, a) if a < 50 => 42.0,
        (Sex::Male, _) => 35.0,
        (Sex::Female, a) if a < 25 => 42.0,
        (Sex::Female, a) if a < 35 => 38.0,
        (Sex::Female, a) if a < 50 => 34.0,
        (Sex::Female, _) => 28.0,
    };

    BaselineStatistics::synthetic(
        mean,
        mean * HEURISTIC_CV,
        HEURISTIC_SAMPLE_SIZE,
        HEURISTIC_HALF_WIDTH,
        StatisticsSource::DemographicHeuristic,
    )
}

pub fn last_resort(sex: Sex) -> BaselineStatistics {
    let mean = match sex {
        Sex::Male => 42.0,
        Sex::Female => 35.0,
    };

    BaselineStatistics::synthetic(
        mean,
        LAST_RESORT_STD_DEV,
        LAST_RESORT_SAMPLE_SIZE,
        LAST_RESORT_HALF_WIDTH,
        StatisticsSource::LastResort,
    )
}
