//! Evidence-aware topological ordering.
//!
//! The depth of a variable is 0 for roots and `1 + max(depth(parent))`
//! otherwise. Clamped variables are seeded at depth 0 before the walk, since
//! their distribution is fixed by the observation. Variables are processed by
//! ascending depth with ties kept in insertion order, so every unclamped
//! variable comes after all of its parents.
//!
//! The walk is iterative with an explicit stack. A parent that is still on the
//! stack when it is reached again closes a cycle.

use bn_common::{Error, GraphDefect, Result, VariableId};
use tracing::trace;

use crate::model::Network;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Active,
    Done(usize),
}

/// Processing order for one inference call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    order: Vec<VariableId>,
    depths: Vec<usize>,
}

impl Ordering {
    /// Variable ids, parents before children.
    pub fn order(&self) -> &[VariableId] {
        &self.order
    }

    /// Depth of a variable, indexed by id.
    pub fn depth(&self, id: VariableId) -> Option<usize> {
        self.depths.get(id.index()).copied()
    }
}

/// Compute depths for a parent graph given as one parent list per variable.
///
/// `seeded[i]` pins variable `i` at depth 0. On a cycle, returns the index of
/// a variable on it.
pub(crate) fn depths<P: AsRef<[VariableId]>>(
    parents: &[P],
    seeded: &[bool],
) -> std::result::Result<Vec<usize>, usize> {
    let n = parents.len();
    let mut marks: Vec<Mark> = (0..n)
        .map(|i| {
            if seeded.get(i).copied().unwrap_or(false) {
                Mark::Done(0)
            } else {
                Mark::Unvisited
            }
        })
        .collect();

    // (variable, next parent to visit)
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for start in 0..n {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        marks[start] = Mark::Active;
        stack.push((start, 0));

        while let Some(&(node, cursor)) = stack.last() {
            let node_parents = parents[node].as_ref();
            if let Some(parent) = node_parents.get(cursor) {
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                let p = parent.index();
                match marks[p] {
                    Mark::Unvisited => {
                        marks[p] = Mark::Active;
                        stack.push((p, 0));
                    }
                    Mark::Active => return Err(p),
                    Mark::Done(_) => {}
                }
            } else {
                let depth = node_parents
                    .iter()
                    .map(|p| match marks[p.index()] {
                        Mark::Done(d) => d + 1,
                        _ => 0,
                    })
                    .max()
                    .unwrap_or(0);
                marks[node] = Mark::Done(depth);
                stack.pop();
            }
        }
    }

    Ok(marks
        .into_iter()
        .map(|m| match m {
            Mark::Done(d) => d,
            _ => 0,
        })
        .collect())
}

/// Order the network's variables for propagation under its current evidence.
pub fn topological_order(network: &Network) -> Result<Ordering> {
    let parents: Vec<&[VariableId]> = network
        .variables()
        .iter()
        .map(|v| v.parent_ids())
        .collect();
    let seeded: Vec<bool> = (0..network.len())
        .map(|i| network.clamped_state(VariableId(i)).is_some())
        .collect();

    let depths = depths(&parents, &seeded).map_err(|index| {
        let name = network.variable_at(VariableId(index)).name().to_string();
        Error::MalformedGraph(GraphDefect::Cycle(name))
    })?;

    let mut order: Vec<VariableId> = (0..network.len()).map(VariableId).collect();
    order.sort_by_key(|id| depths[id.index()]);
    trace!(?order, "topological order");

    Ok(Ordering { order, depths })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Variable;

    fn ids(raw: &[usize]) -> Vec<VariableId> {
        raw.iter().copied().map(VariableId).collect()
    }

    #[test]
    fn depths_follow_longest_parent_chain() {
        // 0 -> 1 -> 3, 0 -> 2 -> 3, 2 -> 4
        let parents = vec![ids(&[]), ids(&[0]), ids(&[0]), ids(&[2, 1]), ids(&[2])];
        let d = depths(&parents, &[false; 5]).unwrap();
        assert_eq!(d, vec![0, 1, 1, 2, 2]);
    }

    #[test]
    fn parents_listed_after_children_still_resolve() {
        let parents = vec![ids(&[1]), ids(&[2]), ids(&[])];
        assert_eq!(depths(&parents, &[false; 3]).unwrap(), vec![2, 1, 0]);
    }

    #[test]
    fn seeding_pins_depth_zero() {
        let parents = vec![ids(&[]), ids(&[0]), ids(&[1])];
        let d = depths(&parents, &[false, true, false]).unwrap();
        assert_eq!(d, vec![0, 0, 1]);
    }

    #[test]
    fn cycles_are_reported() {
        let parents = vec![ids(&[1]), ids(&[0])];
        assert!(depths(&parents, &[false; 2]).is_err());
        let self_loop = vec![ids(&[0])];
        assert_eq!(depths(&self_loop, &[false]), Err(0));
    }

    #[test]
    fn deep_chains_do_not_recurse() {
        let n = 50_000;
        let parents: Vec<Vec<VariableId>> = (0..n)
            .map(|i| if i == 0 { vec![] } else { vec![VariableId(i - 1)] })
            .collect();
        let d = depths(&parents, &vec![false; n]).unwrap();
        assert_eq!(d[n - 1], n - 1);
    }

    fn sprinkler() -> Network {
        let cloudy = Variable::root("cloudy", 2)
            .unwrap()
            .with_cpt(vec![vec![0.5, 0.5]])
            .unwrap();
        let sprinkler = Variable::new("sprinkler", 2, &[&cloudy])
            .unwrap()
            .with_cpt(vec![vec![0.5, 0.5], vec![0.9, 0.1]])
            .unwrap();
        let rain = Variable::new("rain", 2, &[&cloudy])
            .unwrap()
            .with_cpt(vec![vec![0.8, 0.2], vec![0.2, 0.8]])
            .unwrap();
        let grass = Variable::new("grass", 2, &[&rain, &sprinkler])
            .unwrap()
            .with_cpt(vec![
                vec![1.0, 0.0],
                vec![0.1, 0.9],
                vec![0.1, 0.9],
                vec![0.01, 0.99],
            ])
            .unwrap();
        // Insert grass first to exercise reordering.
        Network::new(vec![grass, cloudy, sprinkler, rain]).unwrap()
    }

    #[test]
    fn orders_parents_before_children() {
        let net = sprinkler();
        let ordering = topological_order(&net).unwrap();
        let names: Vec<&str> = ordering
            .order()
            .iter()
            .map(|id| net.variable_at(*id).name())
            .collect();
        assert_eq!(names, vec!["cloudy", "sprinkler", "rain", "grass"]);
        assert_eq!(ordering.depth(VariableId(0)), Some(2));
    }

    #[test]
    fn clamped_variables_move_to_front() {
        let mut net = sprinkler();
        net.clamp_variable("grass", 1).unwrap();
        let ordering = topological_order(&net).unwrap();
        assert_eq!(ordering.order()[0], VariableId(0));
        assert_eq!(ordering.depth(VariableId(0)), Some(0));
    }
}
