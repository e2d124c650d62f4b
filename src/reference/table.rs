use itertools::Itertools;
use lazy_static::lazy_static;
use serde::Serialize;
use crate::constants::{RawDecade, ACSM_FEMALE, ACSM_MALE};
use crate::error::{Error, Result};
use crate::models::{DecadeEntry, Sex};

lazy_static! {
    pub static ref ACSM_TABLE: ReferenceTable = ReferenceTable::acsm();
}

/// How a decade was chosen for an age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecadeMatch {
    /// The decade's age range contains the age.
    Exact,
    /// No decade contains the age; the lowest decade was substituted.
    Fallback,
}

/// Normative bands keyed by sex, then by age decade. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceTable {
    male: Vec<DecadeEntry>,
    female: Vec<DecadeEntry>,
}

impl ReferenceTable {
    /// Build a table, rejecting any that breaks the ordering invariants.
    pub fn new(male: Vec<DecadeEntry>, female: Vec<DecadeEntry>) -> Result<Self> {
        let table = Self { male, female };
        table.validate()?;
        Ok(table)
    }

    pub fn acsm() -> Self {
        Self {
            male: Self::from_raw(&ACSM_MALE),
            female: Self::from_raw(&ACSM_FEMALE),
        }
    }

    fn from_raw(raw: &[RawDecade]) -> Vec<DecadeEntry> {
        raw.iter()
            .map(|(low, high, bands)| DecadeEntry {
                ages: (*low, *high),
                bands: bands.to_vec(),
            })
            .collect()
    }

    pub fn decades(&self, sex: Sex) -> &[DecadeEntry] {
        match sex {
            Sex::Male => &self.male,
            Sex::Female => &self.female,
        }
    }

    /// Decade whose inclusive range contains `age`, if any.
    pub fn find(&self, sex: Sex, age: u32) -> Option<&DecadeEntry> {
        self.decades(sex).iter().find(|decade| decade.covers(age))
    }

    /// Decade for `age`, substituting the lowest-defined decade when none
    /// contains it.
    pub fn find_or_lowest(&self, sex: Sex, age: u32) -> Result<(&DecadeEntry, DecadeMatch)> {
        if let Some(decade) = self.find(sex, age) {
            return Ok((decade, DecadeMatch::Exact));
        }

        self.decades(sex)
            .iter()
            .min_by_key(|decade| decade.ages.0)
            .map(|decade| (decade, DecadeMatch::Fallback))
            .ok_or_else(|| Error::Internal(format!("no reference decades defined for sex {}", sex)))
    }

    /// Checks that every sex has decades, that decades are ordered and do not
    /// overlap, and that each decade's bands are contiguous, increasing and
    /// end in a single open-ended band.
    pub fn validate(&self) -> Result<()> {
        for sex in [Sex::Male, Sex::Female] {
            let decades = self.decades(sex);
            if decades.is_empty() {
                return Err(Error::ReferenceTable(format!("sex {} has no decades", sex)));
            }

            for (prev, next) in decades.iter().tuple_windows() {
                if next.ages.0 <= prev.ages.1 {
                    return Err(Error::ReferenceTable(format!(
                        "sex {}: decade {}-{} overlaps or precedes {}-{}",
                        sex, next.ages.0, next.ages.1, prev.ages.0, prev.ages.1
                    )));
                }
            }

            for decade in decades {
                Self::validate_decade(sex, decade)?;
            }
        }

        Ok(())
    }

    fn validate_decade(sex: Sex, decade: &DecadeEntry) -> Result<()> {
        let (low, high) = decade.ages;
        if low > high {
            return Err(Error::ReferenceTable(format!(
                "sex {}: decade {}-{} has an inverted age range",
                sex, low, high
            )));
        }

        let Some(last) = decade.bands.last() else {
            return Err(Error::ReferenceTable(format!(
                "sex {}: decade {}-{} has no bands",
                sex, low, high
            )));
        };
        if last.upper.is_some() {
            return Err(Error::ReferenceTable(format!(
                "sex {}: decade {}-{} top band {} must be open-ended",
                sex, low, high, last.label
            )));
        }

        for (prev, next) in decade.bands.iter().tuple_windows() {
            let contiguous = prev.upper.is_some_and(|upper| upper == next.lower);
            if !contiguous || prev.lower >= next.lower || prev.label >= next.label {
                return Err(Error::ReferenceTable(format!(
                    "sex {}: decade {}-{} bands {} and {} are not contiguous and increasing",
                    sex, low, high, prev.label, next.label
                )));
            }
        }

        Ok(())
    }
}
