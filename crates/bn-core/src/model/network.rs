//! Bayesian network container and evidence management.
//!
//! The network owns its variables in a flat vector indexed by
//! [`VariableId`]; parent and child links are ids into that vector. Evidence
//! (clamped states) is an explicit field. Inference borrows the network
//! immutably while evidence changes need `&mut self`, so a network shared
//! across threads must sit behind a lock that serializes the two.

use std::collections::{BTreeMap, HashMap};

use bn_common::{CptDefect, Error, GraphDefect, InferenceKind, Result, VariableId};
use tracing::{debug, trace};

use super::variable::Variable;
use crate::inference::{self, ordering, Explanation, JointTable};

/// A discrete Bayesian network.
#[derive(Debug, Clone, Default)]
pub struct Network {
    variables: Vec<Variable>,
    evidence: BTreeMap<VariableId, usize>,
}

impl Network {
    /// Build a network, registering `variables` in order.
    pub fn new(variables: Vec<Variable>) -> Result<Self> {
        let mut network = Self::default();
        network.add_variables(variables)?;
        Ok(network)
    }

    /// Register a batch of variables.
    ///
    /// Each variable gets the next id in sequence. Parent references are
    /// resolved by name against the variables already registered and the
    /// rest of the batch. The batch is applied atomically: on error the
    /// network is unchanged.
    pub fn add_variables(&mut self, variables: Vec<Variable>) -> Result<()> {
        let base = self.variables.len();

        let mut by_name: HashMap<&str, usize> = HashMap::with_capacity(base + variables.len());
        for (index, v) in self.variables.iter().chain(variables.iter()).enumerate() {
            if by_name.insert(v.name(), index).is_some() {
                return Err(Error::MalformedGraph(GraphDefect::DuplicateName(
                    v.name().to_string(),
                )));
            }
        }

        let cardinality = |index: usize| {
            if index < base {
                self.variables[index].num_states()
            } else {
                variables[index - base].num_states()
            }
        };

        let mut resolved: Vec<Vec<VariableId>> = Vec::with_capacity(variables.len());
        for v in &variables {
            if v.cpt().is_none() {
                return Err(Error::InvalidCpt {
                    variable: v.name().to_string(),
                    defect: CptDefect::Missing,
                });
            }
            let mut ids = Vec::with_capacity(v.parents().len());
            for parent in v.parents() {
                let index = *by_name
                    .get(parent.name.as_str())
                    .ok_or_else(|| Error::NotFound(parent.name.clone()))?;
                let actual = cardinality(index);
                if actual != parent.num_states {
                    return Err(Error::MalformedGraph(GraphDefect::CardinalityMismatch {
                        child: v.name().to_string(),
                        parent: parent.name.clone(),
                        expected: parent.num_states,
                        actual,
                    }));
                }
                let id = VariableId(index);
                if ids.contains(&id) {
                    return Err(Error::MalformedGraph(GraphDefect::DuplicateParent {
                        child: v.name().to_string(),
                        parent: parent.name.clone(),
                    }));
                }
                ids.push(id);
            }
            resolved.push(ids);
        }

        let parent_lists: Vec<&[VariableId]> = self
            .variables
            .iter()
            .map(Variable::parent_ids)
            .chain(resolved.iter().map(Vec::as_slice))
            .collect();
        let unseeded = vec![false; parent_lists.len()];
        if let Err(index) = ordering::depths(&parent_lists, &unseeded) {
            let name = if index < base {
                self.variables[index].name()
            } else {
                variables[index - base].name()
            };
            return Err(Error::MalformedGraph(GraphDefect::Cycle(name.to_string())));
        }

        for (offset, (mut v, parent_ids)) in variables.into_iter().zip(resolved).enumerate() {
            v.bind(VariableId(base + offset), parent_ids);
            self.variables.push(v);
        }
        self.derive_children();

        debug!(
            added = self.variables.len() - base,
            total = self.variables.len(),
            "registered variables"
        );
        Ok(())
    }

    fn derive_children(&mut self) {
        for v in &mut self.variables {
            v.children_mut().clear();
        }
        let edges: Vec<(VariableId, VariableId)> = self
            .variables
            .iter()
            .enumerate()
            .flat_map(|(child, v)| v.parent_ids().iter().map(move |&p| (p, VariableId(child))))
            .collect();
        for (parent, child) in edges {
            self.variables[parent.index()].children_mut().insert(child);
        }
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Variables in insertion (id) order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Case-insensitive lookup by name.
    pub fn get_variable(&self, name: &str) -> Result<&Variable> {
        self.lookup(name).map(|(_, v)| v)
    }

    fn lookup(&self, name: &str) -> Result<(VariableId, &Variable)> {
        let key = name.trim().to_lowercase();
        self.variables
            .iter()
            .enumerate()
            .find(|(_, v)| v.name() == key)
            .map(|(index, v)| (VariableId(index), v))
            .ok_or(Error::NotFound(key))
    }

    pub fn get_variable_by_id(&self, id: VariableId) -> Result<&Variable> {
        self.variables
            .get(id.index())
            .ok_or(Error::IdNotFound(id.index()))
    }

    pub(crate) fn variable_at(&self, id: VariableId) -> &Variable {
        &self.variables[id.index()]
    }

    // ── Evidence ────────────────────────────────────────────────────────

    /// Observe `name` in `state`, replacing any earlier observation.
    pub fn clamp_variable(&mut self, name: &str, state: usize) -> Result<()> {
        let (id, v) = self.lookup(name)?;
        if state >= v.num_states() {
            return Err(Error::InvalidEvidence {
                variable: v.name().to_string(),
                state,
                num_states: v.num_states(),
            });
        }
        debug!(variable = v.name(), state, "clamped variable");
        self.evidence.insert(id, state);
        Ok(())
    }

    /// Drop the observation on `name`, returning the state it was clamped to.
    pub fn release_variable(&mut self, name: &str) -> Result<Option<usize>> {
        let (id, _) = self.lookup(name)?;
        let previous = self.evidence.remove(&id);
        trace!(variable = %id, ?previous, "released variable");
        Ok(previous)
    }

    pub fn clear_evidence(&mut self) {
        debug!(cleared = self.evidence.len(), "cleared evidence");
        self.evidence.clear();
    }

    /// Current observations keyed by variable id.
    pub fn evidence(&self) -> &BTreeMap<VariableId, usize> {
        &self.evidence
    }

    pub fn clamped_state(&self, id: VariableId) -> Option<usize> {
        self.evidence.get(&id).copied()
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Run inference with an explicitly chosen algorithm.
    pub fn query(&self, kind: InferenceKind) -> Result<JointTable> {
        if !kind.is_supported() {
            return Err(Error::UnsupportedInference(kind));
        }
        inference::propagation::joint_probability(self)
    }

    /// Marginal distribution of every variable given current evidence.
    pub fn joint_probability(&self) -> Result<JointTable> {
        self.query(InferenceKind::FullJoint)
    }

    /// Marginal distribution of a single variable given current evidence.
    pub fn marginal(&self, name: &str) -> Result<Vec<f64>> {
        let (id, v) = self.lookup(name)?;
        let table = self.joint_probability()?;
        table
            .by_id(id)
            .map(<[f64]>::to_vec)
            .ok_or_else(|| Error::NotFound(v.name().to_string()))
    }

    /// Highest-probability state of every variable given current evidence.
    pub fn most_probable_explanation(&self) -> Result<Explanation> {
        let table = self.joint_probability()?;
        inference::explain::most_probable_explanation(&table)
    }

    /// Chain-rule probability of a complete assignment, ignoring evidence.
    pub fn assignment_probability(&self, assignment: &[(&str, usize)]) -> Result<f64> {
        inference::assignment::assignment_probability(self, assignment)
    }

    /// Natural log of [`Network::assignment_probability`].
    pub fn log_assignment_probability(&self, assignment: &[(&str, usize)]) -> Result<f64> {
        inference::assignment::log_assignment_probability(self, assignment)
    }
}
