//! Most probable explanation (MPE).
//!
//! Picks, for every variable, the state with the highest marginal
//! probability in a [`JointTable`]. Ties go to the lowest state index.

use std::fmt;

use bn_common::{Error, Result, VariableId};
use bn_math::arg_max;
use serde::Serialize;

use super::propagation::JointTable;

/// Winning state for one variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainedState {
    pub id: VariableId,
    pub name: String,
    pub state: usize,
    /// Marginal probability of `state`.
    pub probability: f64,
}

/// MPE assignment, in id order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    states: Vec<ExplainedState>,
}

impl Explanation {
    /// Winning state of the named variable (case-insensitive).
    pub fn state_of(&self, name: &str) -> Option<usize> {
        let key = name.trim().to_lowercase();
        self.states.iter().find(|s| s.name == key).map(|s| s.state)
    }

    pub fn by_id(&self, id: VariableId) -> Option<usize> {
        self.states.get(id.index()).map(|s| s.state)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExplainedState> {
        self.states.iter()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.states {
            writeln!(f, "{} = {} (p = {:.4})", s.name, s.state, s.probability)?;
        }
        Ok(())
    }
}

/// Derive the arg-max state of every variable in `table`.
pub fn most_probable_explanation(table: &JointTable) -> Result<Explanation> {
    let states = table
        .iter()
        .map(|m| {
            let state =
                arg_max(&m.distribution).ok_or_else(|| Error::EmptyDistribution(m.name.clone()))?;
            Ok(ExplainedState {
                id: m.id,
                name: m.name.clone(),
                state,
                probability: m.distribution[state],
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Explanation { states })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Network, Variable};

    #[test]
    fn picks_highest_state_with_low_index_ties() {
        let a = Variable::root("a", 3)
            .unwrap()
            .with_cpt(vec![vec![0.25, 0.5, 0.25]])
            .unwrap();
        let b = Variable::root("b", 2)
            .unwrap()
            .with_cpt(vec![vec![0.5, 0.5]])
            .unwrap();
        let net = Network::new(vec![a, b]).unwrap();
        let table = net.joint_probability().unwrap();
        let mpe = most_probable_explanation(&table).unwrap();
        assert_eq!(mpe.state_of("A"), Some(1));
        assert_eq!(mpe.state_of("b"), Some(0));
        assert_eq!(mpe.by_id(VariableId(0)), Some(1));
        assert_eq!(mpe.len(), 2);
        assert!(mpe.to_string().contains("a = 1 (p = 0.5000)"));
    }

    #[test]
    fn follows_clamped_state() {
        let a = Variable::root("a", 2)
            .unwrap()
            .with_cpt(vec![vec![0.9, 0.1]])
            .unwrap();
        let mut net = Network::new(vec![a]).unwrap();
        net.clamp_variable("a", 1).unwrap();
        let mpe = net.most_probable_explanation().unwrap();
        assert_eq!(mpe.state_of("a"), Some(1));
        assert_eq!(mpe.iter().next().unwrap().probability, 1.0);
    }
}
