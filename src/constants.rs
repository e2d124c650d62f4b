use lazy_static::lazy_static;
use crate::models::{Band, FitnessLabel::*, SampleRow};

pub const MIN_AGE: u32 = 10;
pub const MAX_AGE: u32 = 99;
pub const MIN_VO2MAX: f64 = 0.0;
pub const MAX_VO2MAX: f64 = 150.0;

pub const DEFAULT_GAUGE_MIN: f64 = 20.0;
pub const DEFAULT_GAUGE_MAX: f64 = 75.0;

/// Rows of the demographic slice returned alongside an assessment lie within
/// this many years of the requested age.
pub const DATASET_SLICE_AGE_SPAN: u32 = 10;

pub type RawDecade = (u32, u32, [Band; 6]);

// ACSM normative VO2max bands (ml/kg/min). The 15-19 decade extends the
// published tables downwards and doubles as the fallback for younger ages.
pub const ACSM_MALE: [RawDecade; 6] = [
    (15, 19, [
        Band::new(VeryPoor, 35.0, 38.0), Band::new(Poor, 38.0, 41.3), Band::new(Fair, 41.3, 48.1),
        Band::new(Good, 48.1, 53.9), Band::new(Excellent, 53.9, 58.9), Band::open(Superior, 58.9),
    ]),
    (20, 29, [
        Band::new(VeryPoor, 32.0, 35.0), Band::new(Poor, 35.0, 38.3), Band::new(Fair, 38.3, 45.1),
        Band::new(Good, 45.1, 50.9), Band::new(Excellent, 50.9, 55.9), Band::open(Superior, 55.9),
    ]),
    (30, 39, [
        Band::new(VeryPoor, 30.0, 33.0), Band::new(Poor, 33.0, 36.4), Band::new(Fair, 36.4, 42.4),
        Band::new(Good, 42.4, 46.4), Band::new(Excellent, 46.4, 52.4), Band::open(Superior, 52.4),
    ]),
    (40, 49, [
        Band::new(VeryPoor, 28.0, 30.5), Band::new(Poor, 30.5, 34.4), Band::new(Fair, 34.4, 40.9),
        Band::new(Good, 40.9, 44.9), Band::new(Excellent, 44.9, 49.4), Band::open(Superior, 49.4),
    ]),
    (50, 59, [
        Band::new(VeryPoor, 24.0, 26.1), Band::new(Poor, 26.1, 30.9), Band::new(Fair, 30.9, 35.7),
        Band::new(Good, 35.7, 40.9), Band::new(Excellent, 40.9, 45.3), Band::open(Superior, 45.3),
    ]),
    (60, 99, [
        Band::new(VeryPoor, 18.0, 20.5), Band::new(Poor, 20.5, 26.0), Band::new(Fair, 26.0, 32.2),
        Band::new(Good, 32.2, 36.4), Band::new(Excellent, 36.4, 44.2), Band::open(Superior, 44.2),
    ]),
];

pub const ACSM_FEMALE: [RawDecade; 6] = [
    (15, 19, [
        Band::new(VeryPoor, 27.0, 30.0), Band::new(Poor, 30.0, 33.9), Band::new(Fair, 33.9, 38.9),
        Band::new(Good, 38.9, 44.0), Band::new(Excellent, 44.0, 48.0), Band::open(Superior, 48.0),
    ]),
    (20, 29, [
        Band::new(VeryPoor, 24.0, 27.0), Band::new(Poor, 27.0, 30.9), Band::new(Fair, 30.9, 35.9),
        Band::new(Good, 35.9, 41.0), Band::new(Excellent, 41.0, 45.0), Band::open(Superior, 45.0),
    ]),
    (30, 39, [
        Band::new(VeryPoor, 23.0, 26.0), Band::new(Poor, 26.0, 29.9), Band::new(Fair, 29.9, 33.9),
        Band::new(Good, 33.9, 39.0), Band::new(Excellent, 39.0, 44.9), Band::open(Superior, 44.9),
    ]),
    (40, 49, [
        Band::new(VeryPoor, 22.0, 25.8), Band::new(Poor, 25.8, 28.9), Band::new(Fair, 28.9, 32.9),
        Band::new(Good, 32.9, 36.9), Band::new(Excellent, 36.9, 41.0), Band::open(Superior, 41.0),
    ]),
    (50, 59, [
        Band::new(VeryPoor, 21.0, 24.5), Band::new(Poor, 24.5, 27.0), Band::new(Fair, 27.0, 31.4),
        Band::new(Good, 31.4, 35.6), Band::new(Excellent, 35.6, 40.0), Band::open(Superior, 40.0),
    ]),
    (60, 99, [
        Band::new(VeryPoor, 17.0, 20.2), Band::new(Poor, 20.2, 24.4), Band::new(Fair, 24.4, 30.2),
        Band::new(Good, 30.2, 31.4), Band::new(Excellent, 31.4, 35.7), Band::open(Superior, 35.7),
    ]),
];

lazy_static! {
    pub static ref SAMPLE_DATASET: Vec<SampleRow> = vec![
        // Males 20-29
        SampleRow::new(25, "M", Some("healthy"), 52.3).with_profile(23.1, "moderate"),
        SampleRow::new(27, "M", Some("healthy"), 48.7).with_profile(24.2, "light"),
        SampleRow::new(29, "M", Some("healthy"), 51.8).with_profile(22.9, "moderate"),
        SampleRow::new(23, "M", Some("healthy"), 56.2).with_profile(21.8, "vigorous"),
        SampleRow::new(28, "M", Some("healthy"), 45.1).with_profile(25.5, "light"),
        // Females 20-29
        SampleRow::new(23, "F", Some("healthy"), 42.1).with_profile(21.5, "moderate"),
        SampleRow::new(26, "F", Some("healthy"), 39.8).with_profile(22.3, "light"),
        SampleRow::new(28, "F", Some("healthy"), 43.2).with_profile(20.8, "moderate"),
        SampleRow::new(24, "F", Some("healthy"), 47.5).with_profile(20.2, "vigorous"),
        SampleRow::new(29, "F", Some("healthy"), 38.9).with_profile(23.8, "light"),
        // Males 30-39
        SampleRow::new(35, "M", Some("healthy"), 46.8).with_profile(24.7, "moderate"),
        SampleRow::new(32, "M", Some("healthy"), 49.2).with_profile(23.5, "moderate"),
        SampleRow::new(38, "M", Some("healthy"), 42.6).with_profile(26.1, "light"),
        // Females 30-39
        SampleRow::new(33, "F", Some("healthy"), 37.4).with_profile(23.2, "moderate"),
        SampleRow::new(36, "F", Some("healthy"), 35.8).with_profile(24.1, "light"),
        SampleRow::new(39, "F", Some("healthy"), 41.2).with_profile(22.0, "moderate"),
    ];
}
