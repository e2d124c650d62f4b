use crate::constants::{MAX_AGE, MAX_VO2MAX, MIN_AGE, MIN_VO2MAX};
use crate::error::{Error, Result};
use crate::models::Sex;

pub const SEX_MESSAGE: &str = "Invalid sex parameter. Must be M or F.";
pub const AGE_MESSAGE: &str = "Age must be between 10 and 99";
pub const VO2MAX_MESSAGE: &str = "VO2max value out of physiological range (0-150)";

pub fn parse_sex(raw: &str) -> Result<Sex> {
    raw.trim().parse()
}

pub fn check_age(age: u32) -> Result<u32> {
    if (MIN_AGE..=MAX_AGE).contains(&age) {
        Ok(age)
    } else {
        Err(Error::Validation(AGE_MESSAGE.to_string()))
    }
}

/// Accepts whole numbers, and truncates fractional ages ("25.7" is 25).
pub fn parse_age(raw: &str) -> Result<u32> {
    let raw = raw.trim();
    let age = match raw.parse::<i64>() {
        Ok(age) => age,
        Err(_) => raw
            .parse::<f64>()
            .ok()
            .filter(|age| age.is_finite())
            .map(|age| age.trunc() as i64)
            .ok_or_else(|| Error::Validation(AGE_MESSAGE.to_string()))?,
    };

    u32::try_from(age)
        .map_err(|_| Error::Validation(AGE_MESSAGE.to_string()))
        .and_then(check_age)
}

pub fn check_vo2max(value: f64) -> Result<f64> {
    if value.is_finite() && (MIN_VO2MAX..=MAX_VO2MAX).contains(&value) {
        Ok(value)
    } else {
        Err(Error::Validation(VO2MAX_MESSAGE.to_string()))
    }
}

pub fn parse_vo2max(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| Error::Validation(VO2MAX_MESSAGE.to_string()))
        .and_then(check_vo2max)
}

/// Gauge display bounds are passed through untouched but must be numbers.
pub fn parse_gauge_bound(name: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| Error::Validation(format!("{} must be a number", name)))
}
