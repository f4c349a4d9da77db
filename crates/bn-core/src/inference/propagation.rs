//! Propagation of distributions through the network.
//!
//! Without evidence every variable's distribution is computed from its CPT
//! and its parents' already-computed marginals:
//!
//! ```text
//! out[i] = Σ_r  Π_k dist[parent_k][state_k(r)] · cpt[r][i]
//! ```
//!
//! where `state_k(r)` is the mixed-radix decoding of row `r` (first parent
//! fastest). Parents are treated as independent, which is exact for
//! tree-shaped networks and an approximation when paths reconverge.
//!
//! # Evidence
//!
//! With clamped variables the engine passes messages along every edge in
//! both directions:
//!
//! - `π_{u→x}`: what parent `u` knows from everything outside the subtree
//!   through `x`;
//! - `λ_{y→x}`: the likelihood child `y` reports for each state of `x`.
//!
//! A variable's belief is `normalize(π(x) ⊙ λ(x))`, where `π(x)` is the rule
//! above with parent marginals replaced by incoming π messages and `λ(x)` is
//! the product of incoming λ messages. A clamped variable sends one-hot π
//! messages and ignores what its children report, which cuts every path
//! through it. Sweeps alternate forward (π) and reverse (λ) until no message
//! moves. The result is exact whenever the network, with clamped variables
//! cut out, is a polytree.

use std::fmt;

use bn_common::{Error, Result, VariableId};
use bn_math::{hadamard, max_divergence, normalize, one_hot};
use serde::Serialize;
use tracing::{debug, trace, warn};

use super::ordering::{topological_order, Ordering};
use crate::model::{Network, Variable};

/// Marginal distribution of one variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marginal {
    pub id: VariableId,
    pub name: String,
    pub distribution: Vec<f64>,
    /// State the variable was clamped to, if it was observed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clamped: Option<usize>,
}

/// Result of a propagation query: one marginal per variable, in id order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointTable {
    marginals: Vec<Marginal>,
}

impl JointTable {
    pub fn len(&self) -> usize {
        self.marginals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marginals.is_empty()
    }

    /// Distribution of the named variable (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        let key = name.trim().to_lowercase();
        self.marginals
            .iter()
            .find(|m| m.name == key)
            .map(|m| m.distribution.as_slice())
    }

    pub fn by_id(&self, id: VariableId) -> Option<&[f64]> {
        self.marginals
            .get(id.index())
            .map(|m| m.distribution.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marginal> {
        self.marginals.iter()
    }
}

impl fmt::Display for JointTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.marginals {
            let cells: Vec<String> = m.distribution.iter().map(|p| format!("{p:.4}")).collect();
            write!(f, "{}: [{}]", m.name, cells.join(", "))?;
            if let Some(state) = m.clamped {
                write!(f, " (clamped to {state})")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Upper bound on message sweeps, per variable.
const SWEEPS_PER_VARIABLE: usize = 2;

/// Sweeping stops once no message moves by more than this.
const CONVERGENCE_TOL: f64 = 1e-13;

/// Compute every variable's marginal under the network's current evidence.
pub fn joint_probability(network: &Network) -> Result<JointTable> {
    let ordering = topological_order(network)?;
    debug!(
        variables = network.len(),
        clamped = network.evidence().len(),
        "computing joint probability"
    );

    let table = if network.evidence().is_empty() {
        forward_pass(network, &ordering)?
    } else {
        propagate_evidence(network, &ordering)?
    };

    let marginals = table
        .into_iter()
        .enumerate()
        .map(|(index, distribution)| {
            let id = VariableId(index);
            Marginal {
                id,
                name: network.variable_at(id).name().to_string(),
                distribution,
                clamped: network.clamped_state(id),
            }
        })
        .collect();
    Ok(JointTable { marginals })
}

/// Evidence-free sweep in processing order. Returns distributions by id.
fn forward_pass(network: &Network, ordering: &Ordering) -> Result<Vec<Vec<f64>>> {
    let mut dist: Vec<Vec<f64>> = vec![Vec::new(); network.len()];
    for &id in ordering.order() {
        let v = network.variable_at(id);
        let parents: Vec<&[f64]> = v
            .parent_ids()
            .iter()
            .map(|p| dist[p.index()].as_slice())
            .collect();
        dist[id.index()] = evaluate_cpt(v, &parents)?;
    }
    Ok(dist)
}

/// Apply a variable's CPT to one distribution per parent, in parent order.
fn evaluate_cpt<P: AsRef<[f64]>>(v: &Variable, parents: &[P]) -> Result<Vec<f64>> {
    let cpt = v.require_cpt()?;
    let mut out = vec![0.0; v.num_states()];
    for (r, row) in cpt.rows().iter().enumerate() {
        let weight: f64 = parents
            .iter()
            .zip(cpt.parent_states(r))
            .map(|(p, s)| p.as_ref()[s])
            .product();
        for (acc, p) in out.iter_mut().zip(row) {
            *acc += weight * p;
        }
    }
    Ok(out)
}

fn inconsistent(v: &Variable) -> Error {
    Error::InconsistentEvidence {
        variable: v.name().to_string(),
    }
}

/// Messages on every edge, in both directions.
struct Messages {
    /// `pi[x][k]`: from the `k`-th parent of `x`.
    pi: Vec<Vec<Vec<f64>>>,
    /// `lambda[x][j]`: from the `j`-th child of `x`, children in id order.
    lambda: Vec<Vec<Vec<f64>>>,
    children: Vec<Vec<VariableId>>,
}

impl Messages {
    /// Uninformative messages everywhere.
    fn new(network: &Network) -> Self {
        let uniform = |n: usize| vec![1.0 / n as f64; n];
        let pi = network
            .variables()
            .iter()
            .map(|v| {
                v.parent_ids()
                    .iter()
                    .map(|&p| uniform(network.variable_at(p).num_states()))
                    .collect()
            })
            .collect();
        let children: Vec<Vec<VariableId>> = network
            .variables()
            .iter()
            .map(|v| v.children().iter().copied().collect())
            .collect();
        let lambda = network
            .variables()
            .iter()
            .zip(&children)
            .map(|(v, kids)| kids.iter().map(|_| uniform(v.num_states())).collect())
            .collect();
        Self {
            pi,
            lambda,
            children,
        }
    }

    /// `π(x)`: the CPT applied to incoming π messages.
    fn prior(&self, v: &Variable, id: VariableId) -> Result<Vec<f64>> {
        evaluate_cpt(v, &self.pi[id.index()])
    }

    /// `λ(x)`: one-hot when clamped, else the product of child messages.
    fn likelihood(&self, network: &Network, id: VariableId) -> Vec<f64> {
        let v = network.variable_at(id);
        if let Some(state) = network.clamped_state(id) {
            return one_hot(v.num_states(), state);
        }
        self.lambda[id.index()]
            .iter()
            .fold(vec![1.0; v.num_states()], |acc, m| hadamard(&acc, m))
    }

    /// Store a message, returning how far it moved.
    fn replace(slot: &mut Vec<f64>, message: Vec<f64>) -> f64 {
        let moved = max_divergence(slot, &message);
        *slot = message;
        moved
    }

    /// Send π messages from every variable to its children.
    fn forward_sweep(&mut self, network: &Network, ordering: &Ordering) -> Result<f64> {
        let mut moved: f64 = 0.0;
        for &id in ordering.order() {
            if self.children[id.index()].is_empty() {
                continue;
            }
            let v = network.variable_at(id);
            let clamped = network.clamped_state(id);
            let base = match clamped {
                Some(state) => one_hot(v.num_states(), state),
                None => self.prior(v, id)?,
            };
            let incoming = &self.lambda[id.index()];
            for (j, &child) in self.children[id.index()].iter().enumerate() {
                let message = if clamped.is_some() {
                    base.clone()
                } else {
                    let unnormalized = incoming
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != j)
                        .fold(base.clone(), |acc, (_, m)| hadamard(&acc, m));
                    normalize(&unnormalized).ok_or_else(|| inconsistent(v))?
                };
                let slot = parent_slot(network.variable_at(child), id)?;
                moved = moved.max(Self::replace(&mut self.pi[child.index()][slot], message));
            }
        }
        Ok(moved)
    }

    /// Send λ messages from every variable to its parents.
    fn reverse_sweep(&mut self, network: &Network, ordering: &Ordering) -> Result<f64> {
        let mut moved: f64 = 0.0;
        for &id in ordering.order().iter().rev() {
            let v = network.variable_at(id);
            if v.is_root() {
                continue;
            }
            let lambda = self.likelihood(network, id);
            for (slot, &parent) in v.parent_ids().iter().enumerate() {
                let message = likelihood_message(v, slot, &self.pi[id.index()], &lambda)?;
                let message = normalize(&message).ok_or_else(|| inconsistent(v))?;
                let j = self.children[parent.index()]
                    .iter()
                    .position(|&c| c == id)
                    .ok_or(Error::IdNotFound(id.index()))?;
                moved = moved.max(Self::replace(&mut self.lambda[parent.index()][j], message));
            }
        }
        Ok(moved)
    }
}

fn parent_slot(child: &Variable, parent: VariableId) -> Result<usize> {
    child
        .parent_ids()
        .iter()
        .position(|&p| p == parent)
        .ok_or(Error::IdNotFound(parent.index()))
}

/// Likelihood message from `child` to its parent in position `slot`.
///
/// For each parent state `j`, sums over the CPT rows where that parent is in
/// `j`, weighting each row by the other parents' π messages and by how well
/// the row explains the child's likelihood.
fn likelihood_message(
    child: &Variable,
    slot: usize,
    pi_in: &[Vec<f64>],
    lambda: &[f64],
) -> Result<Vec<f64>> {
    let cpt = child.require_cpt()?;
    let mut msg = vec![0.0; pi_in[slot].len()];
    for (r, row) in cpt.rows().iter().enumerate() {
        let states = cpt.parent_states(r);
        let others: f64 = pi_in
            .iter()
            .zip(&states)
            .enumerate()
            .filter(|(k, _)| *k != slot)
            .map(|(_, (pi, &s))| pi[s])
            .product();
        let fit: f64 = row.iter().zip(lambda).map(|(p, l)| p * l).sum();
        msg[states[slot]] += others * fit;
    }
    Ok(msg)
}

/// Beliefs under evidence via π/λ message passing.
fn propagate_evidence(network: &Network, ordering: &Ordering) -> Result<Vec<Vec<f64>>> {
    let mut messages = Messages::new(network);
    let max_sweeps = SWEEPS_PER_VARIABLE * network.len() + 2;

    let mut converged = false;
    let mut sweeps = 0;
    while sweeps < max_sweeps {
        sweeps += 1;
        let moved = messages
            .forward_sweep(network, ordering)?
            .max(messages.reverse_sweep(network, ordering)?);
        trace!(sweep = sweeps, moved, "message sweep");
        if moved <= CONVERGENCE_TOL {
            converged = true;
            break;
        }
    }
    if converged {
        debug!(sweeps, "messages converged");
    } else {
        warn!(sweeps, "messages still moving at the sweep limit");
    }

    let mut beliefs: Vec<Vec<f64>> = vec![Vec::new(); network.len()];
    for &id in ordering.order() {
        let v = network.variable_at(id);
        let prior = messages.prior(v, id)?;
        beliefs[id.index()] = match network.clamped_state(id) {
            Some(state) => {
                if prior[state] <= 0.0 {
                    return Err(inconsistent(v));
                }
                one_hot(v.num_states(), state)
            }
            None => {
                let lambda = messages.likelihood(network, id);
                normalize(&hadamard(&prior, &lambda)).ok_or_else(|| inconsistent(v))?
            }
        };
        trace!(variable = v.name(), belief = ?beliefs[id.index()], "belief");
    }
    Ok(beliefs)
}
