//! Outlier-resistant averaging over a window of samples.

/// Result of a [`filtered_average`] pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOutcome {
    /// Mean of the retained samples; `None` when nothing was retained.
    pub average: Option<f64>,
    /// Samples that survived filtering, in input order.
    pub retained: Vec<f64>,
    /// Number of samples discarded as outliers.
    pub removed: usize,
}

/// Unweighted mean, `None` for an empty slice.
///
/// Accumulated incrementally so large finite samples cannot overflow a
/// running sum.
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let mut mu = 0.0_f64;
    for (k, v) in samples.iter().enumerate() {
        mu += (v - mu) / (k + 1) as f64;
    }
    mu.is_finite().then_some(mu)
}

/// Population standard deviation around `mu`.
fn std_dev(samples: &[f64], mu: f64) -> f64 {
    let variance = samples.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / samples.len() as f64;
    variance.sqrt()
}

/// Average `samples`, discarding values further than `sigmas` standard
/// deviations from the raw mean.
///
/// Filtering only kicks in once there are at least `min_samples` values;
/// below that the plain mean of everything is returned. Pure: no state, no I/O.
pub fn filtered_average(samples: &[f64], min_samples: usize, sigmas: f64) -> FilterOutcome {
    let Some(mu) = mean(samples) else {
        return FilterOutcome::default();
    };

    if samples.len() < min_samples {
        return FilterOutcome {
            average:  Some(mu),
            retained: samples.to_vec(),
            removed:  0,
        };
    }

    let threshold = sigmas * std_dev(samples, mu);
    let retained: Vec<f64> = samples
        .iter()
        .copied()
        .filter(|v| (v - mu).abs() <= threshold)
        .collect();
    let removed = samples.len() - retained.len();

    FilterOutcome {
        average: mean(&retained),
        retained,
        removed,
    }
}
