use ordered_float::OrderedFloat;
use serde::{Serialize, Deserialize};

/// z-score of the two-sided 95% normal interval.
pub const Z_95: f64 = 1.96;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub mean: f64,
    pub median: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub std_error: f64,
    pub sample_count: u64,
}

/// Exact summary of a small in-memory sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSummary {
    n: u64,
    mean: f64,
    m2: f64,   // Sum of squared deviations from the mean
    sorted: Vec<f64>,
}

impl SampleSummary {
    pub fn create(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by_key(|value| OrderedFloat(*value));

        let n = sorted.len() as u64;
        if n == 0 {
            return Self { n, mean: 0.0, m2: 0.0, sorted };
        }

        let mean = sorted.iter().sum::<f64>() / n as f64;
        let m2 = sorted
            .iter()
            .map(|x| {
                let delta = x - mean;
                delta * delta
            })
            .sum();

        Self { n, mean, m2, sorted }
    }

    pub fn len(&self) -> u64 {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// `None` below two observations, where the sample variance is undefined.
    pub fn to_stats(&self) -> Option<DescriptiveStats> {
        if self.n < 2 {
            return None;
        }

        let n = self.n as f64;

        // Bessel's correction
        let variance = self.m2 / (n - 1.0);
        let std_dev = variance.sqrt();

        Some(DescriptiveStats {
            mean: self.mean,
            median: quantile(&self.sorted, 0.5),
            variance,
            std_dev,
            std_error: std_dev / n.sqrt(),
            sample_count: self.n,
        })
    }
}

/// Linear-interpolated quantile of an ascending slice; `q` in [0, 1].
pub fn quantile(sorted_values: &[f64], q: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    if sorted_values.len() == 1 {
        return sorted_values[0];
    }

    let rank = (sorted_values.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let k = rank.floor() as usize;
    let d = rank - k as f64;

    if k + 1 >= sorted_values.len() {
        sorted_values[sorted_values.len() - 1]
    } else {
        (1.0 - d) * sorted_values[k] + d * sorted_values[k + 1]
    }
}
