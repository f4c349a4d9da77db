//! Distribution vector utilities.
//!
//! These helpers operate on plain `&[f64]` probability vectors so that the
//! propagation and explanation code in bn-core stays free of ad-hoc loops for
//! normalization and arg-max.

/// Scale a non-negative weight vector so it sums to one.
///
/// Returns `None` when the total mass is zero or not finite, since no
/// distribution is proportional to such a vector.
pub fn normalize(weights: &[f64]) -> Option<Vec<f64>> {
    let z: f64 = weights.iter().sum();
    if !z.is_finite() || z <= 0.0 {
        return None;
    }
    Some(weights.iter().map(|w| w / z).collect())
}

/// Index of the largest entry, preferring the lowest index on ties.
///
/// Only a strictly greater value replaces the current best, so `[0.5, 0.5]`
/// yields `0`. Returns `None` for an empty slice.
pub fn arg_max(values: &[f64]) -> Option<usize> {
    let (first, rest) = values.split_first()?;
    let mut index = 0;
    let mut max = *first;
    for (i, &v) in rest.iter().enumerate() {
        if max < v {
            max = v;
            index = i + 1;
        }
    }
    Some(index)
}

/// Vector of length `len` with `1.0` at `hot` and `0.0` elsewhere.
pub fn one_hot(len: usize, hot: usize) -> Vec<f64> {
    let mut row = vec![0.0; len];
    if let Some(slot) = row.get_mut(hot) {
        *slot = 1.0;
    }
    row
}

/// Element-wise product of two equally sized vectors.
pub fn hadamard(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).collect()
}

/// Largest absolute element-wise difference between two vectors.
pub fn max_divergence(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
