//! Probability of a complete assignment via the chain rule.
//!
//! `P(x) = Π_v P(v = x_v | parents(v) = x_parents(v))`, read straight from
//! the CPTs. Evidence on the network is not consulted; the assignment itself
//! fixes every variable.

use bn_common::{Error, Result, VariableId};
use bn_math::ln_prob;

use crate::model::Network;

/// Resolve `(name, state)` pairs into a dense state vector indexed by id.
fn resolve(network: &Network, assignment: &[(&str, usize)]) -> Result<Vec<usize>> {
    let mut states: Vec<Option<usize>> = vec![None; network.len()];
    for &(name, state) in assignment {
        let v = network.get_variable(name)?;
        if state >= v.num_states() {
            return Err(Error::InvalidEvidence {
                variable: v.name().to_string(),
                state,
                num_states: v.num_states(),
            });
        }
        if let Some(id) = v.id() {
            states[id.index()] = Some(state);
        }
    }

    let given = states.iter().filter(|s| s.is_some()).count();
    if given != network.len() || assignment.len() != network.len() {
        return Err(Error::IncompleteAssignment {
            given,
            expected: network.len(),
        });
    }
    Ok(states.into_iter().flatten().collect())
}

/// Per-variable factors `P(v = x_v | parents)`, in id order.
fn factors(network: &Network, states: &[usize]) -> Result<Vec<f64>> {
    network
        .variables()
        .iter()
        .enumerate()
        .map(|(index, v)| {
            let cpt = v.require_cpt()?;
            let parent_states: Vec<usize> = v
                .parent_ids()
                .iter()
                .map(|p: &VariableId| states[p.index()])
                .collect();
            let row = cpt
                .row_index(&parent_states)
                .and_then(|r| cpt.row(r))
                .ok_or(Error::IdNotFound(index))?;
            Ok(row[states[index]])
        })
        .collect()
}

/// Probability of the complete assignment.
pub fn assignment_probability(network: &Network, assignment: &[(&str, usize)]) -> Result<f64> {
    let states = resolve(network, assignment)?;
    Ok(factors(network, &states)?.into_iter().product())
}

/// Natural log of the probability of the complete assignment.
///
/// Summed in log space; `-inf` when any factor is zero.
pub fn log_assignment_probability(
    network: &Network,
    assignment: &[(&str, usize)],
) -> Result<f64> {
    let states = resolve(network, assignment)?;
    Ok(factors(network, &states)?.into_iter().map(ln_prob).sum())
}
