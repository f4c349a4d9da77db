//! Log-domain helpers.
//!
//! Products of many probabilities underflow quickly; callers that need the
//! result in log space sum [`ln_prob`] terms instead.

/// Natural log that maps zero (and negative round-off) to negative infinity.
pub fn ln_prob(p: f64) -> f64 {
    if p <= 0.0 {
        f64::NEG_INFINITY
    } else {
        p.ln()
    }
}
