pub use crate::*;

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::assessment::{assemble, percentage_vs_baseline, round1};
    use crate::baseline::{
        containing_decade, demographic_heuristic, exact_sample, last_resort, matching_values,
        quantile, table_derived, SampleSummary,
    };
    use crate::classifier::{band_percentile, extreme_low_percentile, BOUNDARY_CONFIDENCE_CAP};
    use crate::constants::{ACSM_FEMALE, ACSM_MALE, SAMPLE_DATASET};
    use crate::reference::DecadeMatch;
    use crate::validator::{parse_age, parse_vo2max, check_age, check_vo2max};
    use rand::prelude::*;
    use statrs::statistics::Statistics;

    const EPSILON: f64 = 1e-9;

    fn approx(computed: f64, expected: f64) -> bool {
        (computed - expected).abs() < EPSILON
    }

    fn classifier() -> BandClassifier<'static> {
        BandClassifier::new(&ACSM_TABLE)
    }

    fn estimator() -> BaselineEstimator<'static> {
        BaselineEstimator::new(&ACSM_TABLE)
    }

    // --- Reference table ---

    #[test]
    fn test_acsm_table_is_valid() {
        assert!(ACSM_TABLE.validate().is_ok());
        assert_eq!(ACSM_TABLE.decades(Sex::Male).len(), ACSM_MALE.len());
        assert_eq!(ACSM_TABLE.decades(Sex::Female).len(), ACSM_FEMALE.len());
    }

    #[test]
    fn test_table_covers_every_supported_age() {
        for sex in [Sex::Male, Sex::Female] {
            for age in 15..=99 {
                assert!(ACSM_TABLE.find(sex, age).is_some(), "sex {} age {} uncovered", sex, age);
            }
            for age in 10..15 {
                let (decade, matched) = ACSM_TABLE.find_or_lowest(sex, age).unwrap();
                assert_eq!(matched, DecadeMatch::Fallback);
                assert_eq!(decade.ages, (15, 19));
            }
        }
    }

    #[test]
    fn test_table_rejects_gapped_bands() {
        let mut male = ACSM_TABLE.decades(Sex::Male).to_vec();
        male[1].bands[2].lower = 39.0;
        let female = ACSM_TABLE.decades(Sex::Female).to_vec();

        let err = ReferenceTable::new(male, female).unwrap_err();
        assert!(matches!(err, Error::ReferenceTable(_)), "unexpected error {:?}", err);
    }

    #[test]
    fn test_table_rejects_overlapping_decades() {
        let mut male = ACSM_TABLE.decades(Sex::Male).to_vec();
        male[2].ages = (25, 39);
        let female = ACSM_TABLE.decades(Sex::Female).to_vec();

        assert!(ReferenceTable::new(male, female).is_err());
    }

    #[test]
    fn test_table_rejects_closed_top_band_and_missing_sex() {
        let mut male = ACSM_TABLE.decades(Sex::Male).to_vec();
        male[0].bands[5].upper = Some(70.0);
        let female = ACSM_TABLE.decades(Sex::Female).to_vec();
        assert!(ReferenceTable::new(male, female.clone()).is_err());

        assert!(ReferenceTable::new(Vec::new(), female).is_err());
    }

    // --- BandClassifier ---

    #[test]
    fn test_classify_superior_male() {
        let result = classifier().classify(Sex::Male, 25, 68.2).unwrap();

        assert_eq!(result.label, FitnessLabel::Superior);
        assert_eq!(result.zone, Zone::High);
        assert_eq!(result.health_risk, HealthRisk::VeryLow);
        assert_eq!(result.percentile, 100);
        assert!(approx(result.confidence, 0.95));
    }

    #[test]
    fn test_classify_critically_low_female() {
        let result = classifier().classify(Sex::Female, 45, 20.0).unwrap();

        assert_eq!(result.label, FitnessLabel::CriticallyLow);
        assert_eq!(result.zone, Zone::Low);
        assert_eq!(result.health_risk, HealthRisk::VeryHigh);
        assert!(result.confidence >= 0.99);
        // round(20 / 22 * 5)
        assert_eq!(result.percentile, 5);
    }

    #[test]
    fn test_classify_boundary_caps_confidence() {
        let result = classifier().classify(Sex::Male, 25, 45.1).unwrap();

        assert_eq!(result.label, FitnessLabel::Good);
        assert!(result.confidence <= BOUNDARY_CONFIDENCE_CAP);
        assert_eq!(result.percentile, 50);

        let inside = classifier().classify(Sex::Male, 25, 45.2).unwrap();
        assert!(approx(inside.confidence, 0.95));
    }

    #[test]
    fn test_classify_lower_bound_is_inclusive_for_every_band() {
        for sex in [Sex::Male, Sex::Female] {
            for decade in ACSM_TABLE.decades(sex) {
                for age in decade.ages.0.max(10)..=decade.ages.1.min(99) {
                    for band in &decade.bands {
                        let at_lower = classifier().classify(sex, age, band.lower).unwrap();
                        assert_eq!(at_lower.label, band.label, "sex {} age {} value {}", sex, age, band.lower);

                        if let Some(upper) = band.upper {
                            let below_upper = classifier().classify(sex, age, upper - 0.01).unwrap();
                            assert_eq!(below_upper.label, band.label);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_classify_young_age_uses_lowest_decade() {
        let result = classifier().classify(Sex::Male, 12, 45.0).unwrap();
        assert_eq!(result.label, FitnessLabel::Fair);
        assert!(approx(result.confidence, 0.75));
        assert_eq!(result.percentile, 50);

        let extreme = classifier().classify(Sex::Female, 11, 20.0).unwrap();
        assert_eq!(extreme.label, FitnessLabel::CriticallyLow);
        assert!(extreme.confidence >= 0.99);
    }

    #[test]
    fn test_classify_rejects_out_of_range_input() {
        for age in [0, 9, 100, 150] {
            for sex in [Sex::Male, Sex::Female] {
                let err = classifier().classify(sex, age, 40.0).unwrap_err();
                assert!(err.is_validation());
            }
        }

        for value in [-0.1, 150.1, f64::NAN, f64::INFINITY] {
            assert!(classifier().classify(Sex::Male, 40, value).unwrap_err().is_validation());
        }

        assert!(classifier().classify(Sex::Male, 10, 0.0).is_ok());
        assert!(classifier().classify(Sex::Female, 99, 150.0).is_ok());
    }

    #[test]
    fn test_zero_value_has_minimum_percentile() {
        let result = classifier().classify(Sex::Male, 40, 0.0).unwrap();
        assert_eq!(result.label, FitnessLabel::CriticallyLow);
        assert_eq!(result.percentile, 1);
    }

    #[test]
    fn test_zone_mapping_for_every_table_label() {
        let expected = |label: FitnessLabel| match label {
            FitnessLabel::CriticallyLow | FitnessLabel::VeryPoor | FitnessLabel::Poor => Zone::Low,
            FitnessLabel::Fair | FitnessLabel::Good => Zone::Medium,
            FitnessLabel::Excellent | FitnessLabel::Superior => Zone::High,
        };

        assert_eq!(FitnessLabel::CriticallyLow.zone(), Zone::Low);
        for sex in [Sex::Male, Sex::Female] {
            for decade in ACSM_TABLE.decades(sex) {
                let labels: Vec<_> = decade.bands.iter().map(|band| band.label).collect();
                assert_eq!(labels, FitnessLabel::BANDED.to_vec());
                for label in labels {
                    assert_eq!(label.zone(), expected(label));
                }
            }
        }
    }

    #[test]
    fn test_health_risk_is_monotonic_in_label() {
        let mut labels = vec![FitnessLabel::CriticallyLow];
        labels.extend(FitnessLabel::BANDED);

        for pair in labels.windows(2) {
            assert!(pair[0].health_risk() >= pair[1].health_risk());
        }
        assert_eq!(FitnessLabel::CriticallyLow.health_risk(), HealthRisk::VeryHigh);
        assert_eq!(FitnessLabel::Superior.health_risk(), HealthRisk::VeryLow);
    }

    #[test]
    fn test_band_percentile_steps() {
        let decade = ACSM_TABLE.find(Sex::Male, 25).unwrap();

        assert_eq!(band_percentile(decade, 32.0), 0);
        // Midpoint of Very Poor is 33.5
        assert_eq!(band_percentile(decade, 33.6), 17);
        // Open band representative is 55.9 + 10
        assert_eq!(band_percentile(decade, 65.9), 83);
        assert_eq!(band_percentile(decade, 66.0), 100);

        assert_eq!(extreme_low_percentile(1.0, 32.0), 1);
        assert_eq!(extreme_low_percentile(31.0, 32.0), 5);
    }

    #[test]
    fn test_classify_random_inputs() {
        let mut rng = thread_rng();
        for _ in 0..2000 {
            let sex = if rng.gen_bool(0.5) { Sex::Male } else { Sex::Female };
            let age = rng.gen_range(10..=99);
            let value = rng.gen_range(0.0..=150.0);

            let result = classifier().classify(sex, age, value).unwrap();
            assert!(result.confidence > 0.0 && result.confidence <= 1.0);
            assert!(result.percentile <= 100);
            assert_eq!(result.zone, result.label.zone());

            let (decade, _) = ACSM_TABLE.find_or_lowest(sex, age).unwrap();
            if value < decade.lowest_bound().unwrap() {
                assert_eq!(result.label, FitnessLabel::CriticallyLow);
                assert!(result.confidence >= 0.99);
            }
        }
    }

    // --- Descriptive statistics ---

    #[test]
    fn test_quantile_interpolates() {
        assert!(approx(quantile(&[1.0, 2.0, 3.0, 4.0], 0.5), 2.5));
        assert!(approx(quantile(&[1.0, 2.0, 3.0], 0.5), 2.0));
        assert!(approx(quantile(&[7.0], 0.5), 7.0));
        assert!(approx(quantile(&[], 0.5), 0.0));
    }

    #[test]
    fn test_sample_summary_matches_statrs() {
        let mut rng = thread_rng();
        let values: Vec<f64> = (0..50).map(|_| rng.gen_range(20.0..60.0)).collect();

        let stats = SampleSummary::create(&values).to_stats().unwrap();
        let expected_mean = values.iter().mean();
        let expected_std_dev = values.iter().std_dev();

        assert!((stats.mean - expected_mean).abs() < 1e-9);
        assert!((stats.std_dev - expected_std_dev).abs() < 1e-9);
        assert_eq!(stats.sample_count, 50);
    }

    #[test]
    fn test_sample_summary_needs_two_values() {
        assert!(SampleSummary::create(&[]).to_stats().is_none());
        assert!(SampleSummary::create(&[42.0]).to_stats().is_none());
        assert!(SampleSummary::create(&[]).is_empty());
    }

    // --- BaselineEstimator ---

    #[test]
    fn test_estimate_male_twenties_from_sample() {
        let statistics = estimator().estimate(&SAMPLE_DATASET, Sex::Male, 25).unwrap();

        assert_eq!(statistics.source, StatisticsSource::ExactSample);
        assert_eq!(statistics.sample_size, 5);
        assert!((statistics.mean - 50.82).abs() < 1e-9);
        assert!(approx(statistics.median, 51.8));

        let values = [52.3, 48.7, 51.8, 56.2, 45.1];
        let expected_std_dev = values.iter().std_dev();
        assert!((statistics.standard_deviation - expected_std_dev).abs() < 1e-9);

        let margin = 1.96 * expected_std_dev / 5f64.sqrt();
        assert!((statistics.confidence_interval[0] - (50.82 - margin)).abs() < 1e-9);
        assert!((statistics.confidence_interval[1] - (50.82 + margin)).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_even_count_median() {
        let rows = vec![
            SampleRow::new(41, "F", None, 30.0),
            SampleRow::new(42, "F", Some("healthy"), 34.0),
            SampleRow::new(43, "female", Some("Healthy"), 32.0),
            SampleRow::new(44, "F", None, 36.0),
        ];

        let statistics = estimator().estimate(&rows, Sex::Female, 45).unwrap();
        assert_eq!(statistics.sample_size, 4);
        assert!(approx(statistics.median, 33.0));
        assert!(approx(statistics.mean, 33.0));
    }

    #[test]
    fn test_estimate_female_forties_falls_back_to_table() {
        let statistics = estimator().estimate(&SAMPLE_DATASET, Sex::Female, 45).unwrap();

        assert_eq!(statistics.source, StatisticsSource::TableDerived);
        assert!((statistics.mean - 36.95).abs() < 1e-9);
        assert!((statistics.median - 36.95).abs() < 1e-9);
        assert!((statistics.standard_deviation - 2.025).abs() < 1e-9);
        assert_eq!(statistics.sample_size, 1000);
        assert!((statistics.confidence_interval[0] - 34.95).abs() < 1e-9);
        assert!((statistics.confidence_interval[1] - 38.95).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_young_age_uses_demographic_heuristic() {
        let male = estimator().estimate(&SAMPLE_DATASET, Sex::Male, 12).unwrap();
        assert_eq!(male.source, StatisticsSource::DemographicHeuristic);
        assert!(approx(male.mean, 50.0));
        assert!(approx(male.standard_deviation, 7.5));
        assert_eq!(male.sample_size, 100);
        assert!(approx(male.confidence_interval[0], 47.0));

        let female = estimator().estimate(&[], Sex::Female, 14).unwrap();
        assert!(approx(female.mean, 42.0));

        assert!(approx(demographic_heuristic(Sex::Male, 30).mean, 46.0));
        assert!(approx(demographic_heuristic(Sex::Male, 45).mean, 42.0));
        assert!(approx(demographic_heuristic(Sex::Female, 60).mean, 28.0));
    }

    #[test]
    fn test_estimate_excludes_non_healthy_and_other_sex() {
        let rows = vec![
            SampleRow::new(25, "M", Some("athlete"), 70.0),
            SampleRow::new(26, "M", Some("cardiac"), 20.0),
            SampleRow::new(27, "F", None, 40.0),
            SampleRow::new(28, "male", None, 50.0),
            SampleRow::new(31, "M", None, 45.0),
        ];

        assert_eq!(matching_values(&rows, Sex::Male, 20, 29), vec![50.0]);

        // Only one usable row, so the table decade takes over.
        let statistics = estimator().estimate(&rows, Sex::Male, 25).unwrap();
        assert_eq!(statistics.source, StatisticsSource::TableDerived);
        // Good 45.1 up to Excellent ceiling 55.9
        assert!((statistics.mean - 50.5).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_non_finite_sample_uses_last_resort() {
        let rows = vec![
            SampleRow::new(25, "F", None, 40.0),
            SampleRow::new(26, "F", None, f64::NAN),
            SampleRow::new(27, "F", None, 42.0),
        ];

        let statistics = estimator().estimate(&rows, Sex::Female, 25).unwrap();
        assert_eq!(statistics, last_resort(Sex::Female));
        assert!(approx(statistics.mean, 35.0));
        assert_eq!(statistics.sample_size, 50);
    }

    #[test]
    fn test_estimate_never_fails_for_supported_ages() {
        for sex in [Sex::Male, Sex::Female] {
            for age in 10..=99 {
                for rows in [&SAMPLE_DATASET[..], &[][..]] {
                    let statistics = estimator().estimate(rows, sex, age).unwrap();
                    assert!(statistics.sample_size >= 1);
                    assert!(statistics.is_finite());
                    assert!(statistics.confidence_interval[0] <= statistics.mean);
                    assert!(statistics.confidence_interval[1] >= statistics.mean);
                }
            }
        }
    }

    #[test]
    fn test_estimate_rejects_out_of_range_age() {
        assert!(estimator().estimate(&SAMPLE_DATASET, Sex::Male, 9).unwrap_err().is_validation());
        assert!(estimator().estimate(&SAMPLE_DATASET, Sex::Female, 100).unwrap_err().is_validation());
    }

    #[test]
    fn test_fallback_tiers_in_isolation() {
        assert_eq!(containing_decade(45), (40, 49));
        assert_eq!(containing_decade(10), (10, 19));
        assert_eq!(containing_decade(99), (90, 99));

        assert!(exact_sample(&[50.0]).is_none());
        let exact = exact_sample(&[40.0, 50.0, 60.0]).unwrap();
        assert!(approx(exact.mean, 50.0));
        assert!(approx(exact.standard_deviation, 10.0));

        let mut decade = ACSM_TABLE.find(Sex::Male, 65).unwrap().clone();
        let derived = table_derived(&decade, Sex::Male);
        // Good 32.2 up to Excellent ceiling 44.2
        assert!((derived.mean - 38.2).abs() < 1e-9);
        assert!((derived.standard_deviation - 3.0).abs() < 1e-9);

        decade.bands.retain(|band| band.label != FitnessLabel::Good && band.label != FitnessLabel::Excellent);
        let defaulted = table_derived(&decade, Sex::Male);
        assert!(approx(defaulted.mean, 47.5));
        assert!(approx(defaulted.standard_deviation, 1.25));

        assert!(approx(last_resort(Sex::Male).mean, 42.0));
        assert_eq!(last_resort(Sex::Male).source, StatisticsSource::LastResort);
    }

    // --- Assessment assembler ---

    #[test]
    fn test_assess_superior_male() {
        let outcome = Assessor::new(&ACSM_TABLE, &SAMPLE_DATASET)
            .assess(Sex::Male, 25, 68.2)
            .unwrap();

        assert_eq!(outcome.assessment.label, FitnessLabel::Superior);
        assert_eq!(outcome.assessment.zone, Zone::High);
        assert_eq!(outcome.assessment.zone_color, "#51cf66");
        assert!(approx(outcome.assessment.baseline, 50.8));
        assert!(approx(outcome.assessment.percentage_vs_baseline, 34.2));
        assert_eq!(outcome.statistics.sample_size, 5);
    }

    #[test]
    fn test_assess_critically_low_female() {
        let outcome = Assessor::new(&ACSM_TABLE, &SAMPLE_DATASET)
            .assess(Sex::Female, 45, 20.0)
            .unwrap();

        assert_eq!(outcome.assessment.label, FitnessLabel::CriticallyLow);
        assert_eq!(outcome.assessment.zone, Zone::Low);
        assert_eq!(outcome.assessment.zone_color, "#dc4446");
        assert!((outcome.statistics.mean - 36.95).abs() < 1e-9);
        assert!(approx(outcome.assessment.percentage_vs_baseline, -45.9));
    }

    #[test]
    fn test_assess_validates_before_computing() {
        let assessor = Assessor::new(&ACSM_TABLE, &SAMPLE_DATASET);
        assert!(assessor.assess(Sex::Male, 5, 40.0).unwrap_err().is_validation());
        assert!(assessor.assess(Sex::Male, 40, 151.0).unwrap_err().is_validation());
    }

    #[test]
    fn test_percentage_vs_baseline() {
        assert_eq!(percentage_vs_baseline(50.0, 0.0), 0.0);
        assert_eq!(percentage_vs_baseline(50.0, -3.0), 0.0);
        assert!(approx(percentage_vs_baseline(55.0, 50.0), 10.0));

        let statistics = BaselineStatistics::synthetic(0.0, 1.0, 1, 1.0, StatisticsSource::LastResort);
        let classification = classifier().classify(Sex::Male, 30, 40.0).unwrap();
        let assessment = assemble(40.0, &classification, &statistics);
        assert_eq!(assessment.percentage_vs_baseline, 0.0);
        assert_eq!(assessment.zone_color, Zone::Medium.color());
    }

    #[test]
    fn test_round1() {
        assert!(approx(round1(34.199), 34.2));
        assert!(approx(round1(50.82), 50.8));
        assert!(approx(round1(-45.873), -45.9));
        assert!(approx(round1(0.0), 0.0));
    }

    #[test]
    fn test_demographic_slice() {
        let assessor = Assessor::new(&ACSM_TABLE, &SAMPLE_DATASET);
        let slice = assessor.demographic_slice(Sex::Male, 25, 10);

        assert_eq!(slice.len(), 7);
        assert!(slice.iter().all(|row| row.sex == "M" && row.age.abs_diff(25) <= 10));
    }

    // --- Input parsing and validation ---

    #[test]
    fn test_input_parsing() {
        assert_eq!("M".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("F".parse::<Sex>().unwrap(), Sex::Female);
        assert!("m".parse::<Sex>().is_err());
        assert!("X".parse::<Sex>().is_err());

        assert_eq!(parse_age("45").unwrap(), 45);
        assert_eq!(parse_age("25.7").unwrap(), 25);
        assert!(parse_age("abc").is_err());
        assert!(parse_age("-5").is_err());
        assert!(parse_age("100").is_err());
        assert!(check_age(10).is_ok() && check_age(99).is_ok());

        assert!(approx(parse_vo2max("68.2").unwrap(), 68.2));
        assert!(parse_vo2max("NaN").is_err());
        assert!(parse_vo2max("").is_err());
        assert!(check_vo2max(0.0).is_ok() && check_vo2max(150.0).is_ok());
    }

    #[test]
    fn test_sample_row_matching() {
        assert!(Sex::Male.matches("male"));
        assert!(Sex::Female.matches(" Female"));
        assert!(!Sex::Male.matches("F"));
        assert!(SampleRow::new(30, "M", None, 40.0).is_healthy());
        assert!(SampleRow::new(30, "M", Some("HEALTHY"), 40.0).is_healthy());
        assert!(!SampleRow::new(30, "M", Some("copd"), 40.0).is_healthy());
    }

    // --- Dataset validator ---

    #[test]
    fn test_validator_reports_coverage() {
        let report = Validator::new(&ACSM_TABLE, &SAMPLE_DATASET).validate_all().unwrap();

        assert!(report.is_clean());
        assert_eq!(report.total_rows, 16);

        let male_twenties = report
            .coverage
            .iter()
            .find(|group| group.sex == Sex::Male && group.decade == (20, 29))
            .unwrap();
        assert_eq!(male_twenties.healthy_rows, 5);
        assert!(!male_twenties.is_sparse());

        assert!(report
            .sparse_groups()
            .any(|group| group.sex == Sex::Female && group.decade == (40, 49)));
    }

    #[test]
    fn test_validator_flags_bad_rows() {
        let rows = vec![
            SampleRow::new(25, "X", None, 40.0),
            SampleRow::new(5, "M", None, 40.0),
            SampleRow::new(25, "F", None, 180.0),
            SampleRow::new(25, "F", None, 40.0),
        ];

        let report = Validator::new(&ACSM_TABLE, &rows).validate_all().unwrap();
        let indices: Vec<_> = report.issues.iter().map(|issue| issue.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    // --- Configuration ---

    #[test]
    fn test_environment_parsing() {
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
        assert!(Environment::Development.exposes_error_details());
        assert!(!AppConfig::default().environment.exposes_error_details());
    }

    #[test]
    fn test_load_dataset_file() {
        let path = std::env::temp_dir().join(format!("vo2max-dataset-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"age": 44, "sex": "F", "vo2max_ml_kg_min": 33.1},
                {"age": 47, "sex": "female", "group": "healthy", "vo2max_ml_kg_min": 35.4, "bmi": 22.5}]"#,
        )
        .unwrap();

        let config = AppConfig {
            dataset_path: Some(path.clone()),
            ..AppConfig::default()
        };
        let rows = config.load_dataset().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].group, None);
        assert_eq!(rows[1].bmi, Some(22.5));

        assert_eq!(AppConfig::default().load_dataset().unwrap().len(), SAMPLE_DATASET.len());
    }
}
