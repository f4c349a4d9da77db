//! Discrete random variables and their conditional probability tables.
//!
//! A [`Variable`] is built standalone: name, cardinality, and references to
//! its parents. Parent references capture the parent's name and cardinality
//! at construction time, which is all CPT validation needs. Ids, resolved
//! parent ids, and children are filled in when the variable is registered
//! with a [`Network`](super::Network).

use std::collections::BTreeSet;

use bn_common::{CptDefect, Error, Result, VariableId};
use bn_config::DEFAULT_CPT_TOLERANCE;
use bn_math::MixedRadix;

/// A parent as seen by its child: name and state count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub name: String,
    pub num_states: usize,
}

/// Validated conditional probability table.
///
/// Row `r` holds the child's distribution for the parent-state combination
/// obtained by mixed-radix decoding of `r`, first parent fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct Cpt {
    rows: Vec<Vec<f64>>,
    radix: MixedRadix,
}

impl Cpt {
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Parent states encoded by row `index`, in parent order.
    pub fn parent_states(&self, index: usize) -> Vec<usize> {
        self.radix.decode(index)
    }

    /// Row holding the distribution for the given parent states.
    pub fn row_index(&self, parent_states: &[usize]) -> Option<usize> {
        self.radix.encode(parent_states)
    }
}

/// A discrete random variable.
#[derive(Debug, Clone)]
pub struct Variable {
    id: Option<VariableId>,
    name: String,
    num_states: usize,
    parents: Vec<ParentRef>,
    parent_ids: Vec<VariableId>,
    children: BTreeSet<VariableId>,
    cpt: Option<Cpt>,
}

impl Variable {
    /// Create a variable with the given parents (in CPT digit order).
    ///
    /// The name is lower-cased.
    pub fn new(name: &str, num_states: usize, parents: &[&Variable]) -> Result<Self> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Err(Error::InvalidVariable {
                name,
                reason: "name must not be empty".to_string(),
            });
        }
        if num_states == 0 {
            return Err(Error::InvalidVariable {
                name,
                reason: "must have at least one state".to_string(),
            });
        }
        Ok(Self {
            id: None,
            name,
            num_states,
            parents: parents
                .iter()
                .map(|p| ParentRef {
                    name: p.name.clone(),
                    num_states: p.num_states,
                })
                .collect(),
            parent_ids: Vec::new(),
            children: BTreeSet::new(),
            cpt: None,
        })
    }

    /// Create a variable without parents.
    pub fn root(name: &str, num_states: usize) -> Result<Self> {
        Self::new(name, num_states, &[])
    }

    /// Builder form of [`Variable::set_cpt`].
    pub fn with_cpt(mut self, rows: Vec<Vec<f64>>) -> Result<Self> {
        self.set_cpt(rows)?;
        Ok(self)
    }

    /// Install a CPT using the default row-sum tolerance.
    pub fn set_cpt(&mut self, rows: Vec<Vec<f64>>) -> Result<()> {
        self.set_cpt_with_tolerance(rows, DEFAULT_CPT_TOLERANCE)
    }

    /// Install a CPT, requiring each row to sum into `(1 - tolerance, 1]`.
    ///
    /// On failure the previous table (if any) is left in place.
    pub fn set_cpt_with_tolerance(&mut self, rows: Vec<Vec<f64>>, tolerance: f64) -> Result<()> {
        let radix = MixedRadix::new(self.parents.iter().map(|p| p.num_states).collect());
        validate_rows(&rows, self.num_states, &radix, tolerance).map_err(|defect| {
            Error::InvalidCpt {
                variable: self.name.clone(),
                defect,
            }
        })?;
        self.cpt = Some(Cpt { rows, radix });
        Ok(())
    }

    /// Id assigned at registration; `None` while standalone.
    pub fn id(&self) -> Option<VariableId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn parents(&self) -> &[ParentRef] {
        &self.parents
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Resolved parent ids, parallel to [`Variable::parents`].
    pub fn parent_ids(&self) -> &[VariableId] {
        &self.parent_ids
    }

    /// Registered variables that list this one as a parent.
    pub fn children(&self) -> &BTreeSet<VariableId> {
        &self.children
    }

    pub fn cpt(&self) -> Option<&Cpt> {
        self.cpt.as_ref()
    }

    pub(crate) fn require_cpt(&self) -> Result<&Cpt> {
        self.cpt.as_ref().ok_or_else(|| Error::InvalidCpt {
            variable: self.name.clone(),
            defect: CptDefect::Missing,
        })
    }

    pub(crate) fn bind(&mut self, id: VariableId, parent_ids: Vec<VariableId>) {
        self.id = Some(id);
        self.parent_ids = parent_ids;
    }

    pub(crate) fn children_mut(&mut self) -> &mut BTreeSet<VariableId> {
        &mut self.children
    }
}

fn validate_rows(
    rows: &[Vec<f64>],
    num_states: usize,
    radix: &MixedRadix,
    tolerance: f64,
) -> std::result::Result<(), CptDefect> {
    if rows.is_empty() {
        return Err(CptDefect::Empty);
    }
    let expected = radix.span().unwrap_or(usize::MAX);
    if rows.len() != expected {
        return Err(CptDefect::RowCount {
            expected,
            actual: rows.len(),
        });
    }
    let lower = 1.0 - tolerance;
    for (r, row) in rows.iter().enumerate() {
        if row.len() != num_states {
            return Err(CptDefect::RowLength {
                row: r,
                expected: num_states,
                actual: row.len(),
            });
        }
        if row.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(CptDefect::BadEntry { row: r });
        }
        let sum: f64 = row.iter().sum();
        if !(sum > lower && sum <= 1.0) {
            return Err(CptDefect::RowSum { row: r, sum, lower });
        }
    }
    Ok(())
}
