//! Mixed-radix row indexing for conditional probability tables.
//!
//! A CPT row stands for one combination of parent states. The row index is a
//! mixed-radix number whose digit `k` is the state of parent `k` and whose
//! base `k` is that parent's cardinality. Digit 0 varies fastest:
//!
//! ```text
//! digit[0] = row mod base[0]
//! digit[k] = (row / (base[0] * .. * base[k-1])) mod base[k]
//! ```
//!
//! Reversing the digit order yields a different, internally consistent table,
//! so the order here must match the order parents are listed in.

/// Mixed-radix codec over a fixed list of bases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixedRadix {
    bases: Vec<usize>,
}

impl MixedRadix {
    /// Create a codec for the given bases (one per parent, in parent order).
    pub fn new(bases: Vec<usize>) -> Self {
        Self { bases }
    }

    /// Number of distinct digit combinations (1 for an empty base list).
    ///
    /// Returns `None` on overflow.
    pub fn span(&self) -> Option<usize> {
        self.bases
            .iter()
            .try_fold(1usize, |acc, &b| acc.checked_mul(b))
    }

    /// Decode a row index into per-position digits.
    pub fn decode(&self, row: usize) -> Vec<usize> {
        let mut digits = Vec::with_capacity(self.bases.len());
        let mut stride = 1usize;
        for &base in &self.bases {
            digits.push(row / stride % base);
            stride = stride.saturating_mul(base);
        }
        digits
    }

    /// Encode digits back into a row index.
    ///
    /// Returns `None` if the digit count differs from the base count or any
    /// digit is out of range for its base.
    pub fn encode(&self, digits: &[usize]) -> Option<usize> {
        if digits.len() != self.bases.len() {
            return None;
        }
        let mut row = 0usize;
        let mut stride = 1usize;
        for (&digit, &base) in digits.iter().zip(&self.bases) {
            if digit >= base {
                return None;
            }
            row = row.checked_add(digit.checked_mul(stride)?)?;
            stride = stride.checked_mul(base)?;
        }
        Some(row)
    }
}
