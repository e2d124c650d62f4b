use std::collections::BTreeMap;
use tracing::{info, warn, error};
use crate::baseline::{containing_decade, MIN_SAMPLE_ROWS};
use crate::constants::{MAX_AGE, MIN_AGE};
use crate::error::Result;
use crate::models::{SampleRow, Sex};
use crate::reference::ReferenceTable;
use crate::validator::check_vo2max;

#[derive(Debug, Clone, PartialEq)]
pub struct RowIssue {
    pub index: usize,
    pub reason: String,
}

/// Per-group row count; groups below `MIN_SAMPLE_ROWS` will be served by a
/// fallback baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCoverage {
    pub sex: Sex,
    pub decade: (u32, u32),
    pub healthy_rows: usize,
}

impl GroupCoverage {
    pub fn is_sparse(&self) -> bool {
        self.healthy_rows < MIN_SAMPLE_ROWS
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub total_rows: usize,
    pub issues: Vec<RowIssue>,
    pub coverage: Vec<GroupCoverage>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn sparse_groups(&self) -> impl Iterator<Item = &GroupCoverage> {
        self.coverage.iter().filter(|group| group.is_sparse())
    }
}

/// Checks the reference table and sample dataset the service starts with.
pub struct Validator<'a> {
    table: &'a ReferenceTable,
    dataset: &'a [SampleRow],
}

impl<'a> Validator<'a> {
    pub fn new(table: &'a ReferenceTable, dataset: &'a [SampleRow]) -> Self {
        Self { table, dataset }
    }

    /// Fails only if the reference table is malformed; dataset problems are
    /// collected into the report.
    pub fn validate_all(&self) -> Result<ValidationReport> {
        self.table.validate()?;

        let mut report = ValidationReport {
            total_rows: self.dataset.len(),
            ..Default::default()
        };

        let mut groups: BTreeMap<(char, u32), usize> = BTreeMap::new();
        for (index, row) in self.dataset.iter().enumerate() {
            if let Some(reason) = Self::row_issue(row) {
                report.issues.push(RowIssue { index, reason });
                continue;
            }

            if row.is_healthy() {
                if let Some(sex) = Self::row_sex(row) {
                    *groups.entry((sex.code(), containing_decade(row.age).0)).or_default() += 1;
                }
            }
        }

        for sex in [Sex::Male, Sex::Female] {
            for decade in self.table.decades(sex) {
                // Baselines are grouped by calendar decade, so a table entry
                // such as 60-99 spans several sample groups.
                let mut start = containing_decade(decade.ages.0).0;
                while start <= decade.ages.1 {
                    report.coverage.push(GroupCoverage {
                        sex,
                        decade: (start, start + 9),
                        healthy_rows: groups.get(&(sex.code(), start)).copied().unwrap_or(0),
                    });
                    start += 10;
                }
            }
        }

        self.log_validation_results(&report);
        Ok(report)
    }

    fn row_sex(row: &SampleRow) -> Option<Sex> {
        [Sex::Male, Sex::Female].into_iter().find(|sex| sex.matches(&row.sex))
    }

    fn row_issue(row: &SampleRow) -> Option<String> {
        if Self::row_sex(row).is_none() {
            return Some(format!("unrecognised sex {:?}", row.sex));
        }
        if !(MIN_AGE..=MAX_AGE).contains(&row.age) {
            return Some(format!("age {} outside {}-{}", row.age, MIN_AGE, MAX_AGE));
        }
        if check_vo2max(row.vo2max_ml_kg_min).is_err() {
            return Some(format!("VO2max {} outside physiological range", row.vo2max_ml_kg_min));
        }
        None
    }

    fn log_validation_results(&self, report: &ValidationReport) {
        for issue in &report.issues {
            error!("Dataset row {} rejected: {}", issue.index, issue.reason);
        }

        for group in report.sparse_groups() {
            warn!(
                "Sparse sample for sex {} ages {}-{}: {} healthy rows, baseline will fall back to reference bands",
                group.sex, group.decade.0, group.decade.1, group.healthy_rows
            );
        }

        info!(
            "Validated {} dataset rows: {} rejected, {} of {} groups covered by samples",
            report.total_rows,
            report.issues.len(),
            report.coverage.iter().filter(|group| !group.is_sparse()).count(),
            report.coverage.len()
        );
    }
}
