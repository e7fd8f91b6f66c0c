//! Softmax normalization and arg-max selection.
//!
//! # Algorithm
//! `p_i = exp(x_i - max) / Σ exp(x_j - max)`, evaluated in `f64`, then each
//! `p_i` is rounded to [`PRECISION`] decimal places (ties to even). Shifting
//! by the maximum leaves the result unchanged and keeps `exp` finite, so the
//! denominator is always ≥ 1.

use super::ClassifyError;

/// Decimal places kept in each probability.
pub const PRECISION: i32 = 4;

/// Turn raw class scores into a rounded probability distribution.
pub fn softmax(raw: &[f32]) -> Result<Vec<f32>, ClassifyError> {
    if raw.is_empty() {
        return Err(ClassifyError::EmptyOutput);
    }
    if let Some(index) = raw.iter().position(|v| !v.is_finite()) {
        return Err(ClassifyError::NonFiniteScore { index });
    }

    let max = raw.iter().copied().fold(f32::NEG_INFINITY, f32::max) as f64;
    let exps: Vec<f64> = raw.iter().map(|&v| (v as f64 - max).exp()).collect();
    let sum: f64 = exps.iter().sum();

    let scale = 10f64.powi(PRECISION);
    Ok(exps
        .iter()
        .map(|e| ((e / sum) * scale).round_ties_even() / scale)
        .map(|p| p as f32)
        .collect())
}

/// Index of the largest value; ties go to the lowest index.
///
/// Returns `None` for an empty slice.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sums_to_one(p: &[f32]) {
        let sum: f32 = p.iter().sum();
        assert!((sum - 1.0).abs() < 1e-3, "sum = {sum}");
    }

    #[test]
    fn test_uniform_scores_give_uniform_distribution() {
        let p = softmax(&[0.0; 4]).unwrap();
        assert_eq!(p, vec![0.25; 4]);
    }

    #[test]
    fn test_rounding_to_four_places() {
        let p = softmax(&[1.0, 2.0, 3.0]).unwrap();
        // exp-normalized: 0.09003, 0.24473, 0.66524
        assert_eq!(p, vec![0.09, 0.2447, 0.6652]);
        assert_sums_to_one(&p);
    }

    #[test]
    fn test_large_inputs_do_not_overflow() {
        let p = softmax(&[1000.0, 999.0, -1000.0, 88.0]).unwrap();
        assert!(p.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)));
        assert_sums_to_one(&p);
        assert_eq!(argmax(&p), Some(0));
    }

    #[test]
    fn test_sums_to_one_for_varied_inputs() {
        let cases: [&[f32]; 4] = [
            &[-3.2, 7.1, 0.0, 2.5, -0.4, 1.1, 9.9, -8.0, 3.3, 4.4],
            &[5.0],
            &[-50.0, -49.0, -48.0],
            &[0.001, 0.002, 0.003, 0.004, 0.005, 0.006, 0.007, 0.008, 0.009, 0.01],
        ];
        for raw in cases {
            assert_sums_to_one(&softmax(raw).unwrap());
        }
    }

    #[test]
    fn test_empty_and_non_finite_rejected() {
        assert!(matches!(softmax(&[]), Err(ClassifyError::EmptyOutput)));
        assert!(matches!(
            softmax(&[0.0, f32::NAN]),
            Err(ClassifyError::NonFiniteScore { index: 1 })
        ));
        assert!(matches!(
            softmax(&[f32::INFINITY]),
            Err(ClassifyError::NonFiniteScore { index: 0 })
        ));
    }

    #[test]
    fn test_argmax_ties_take_first() {
        assert_eq!(argmax(&[0.1, 0.4, 0.4, 0.1]), Some(1));
        assert_eq!(argmax(&[0.7]), Some(0));
        assert_eq!(argmax(&[]), None);
    }
}
