//! Property-based tests for propagation invariants on generated networks.

use bn_core::{Network, Variable};
use bn_math::{arg_max, max_divergence};
use proptest::prelude::*;

/// Deterministic network built from a stream of raw draws.
///
/// Every CPT entry is a positive multiple of 1/64, so rows sum to exactly
/// one and no evidence is ever impossible.
fn build_network(size: usize, raw: &[u32], max_parents: usize) -> Network {
    let mut cursor = raw.iter().copied().cycle();
    let mut next = move || cursor.next().unwrap_or(0) as usize;

    let mut vars: Vec<Variable> = Vec::with_capacity(size);
    for i in 0..size {
        let states = 2 + next() % 2;
        let mut picks: Vec<usize> = Vec::new();
        if i > 0 {
            let count = next() % (i.min(max_parents) + 1);
            while picks.len() < count {
                let candidate = next() % i;
                let chosen = if picks.contains(&candidate) {
                    (0..i).find(|p| !picks.contains(p)).unwrap()
                } else {
                    candidate
                };
                picks.push(chosen);
            }
        }

        let parents: Vec<&Variable> = picks.iter().map(|&p| &vars[p]).collect();
        let rows: usize = parents.iter().map(|p| p.num_states()).product();
        let cpt: Vec<Vec<f64>> = (0..rows)
            .map(|_| {
                let mut weights: Vec<usize> = (0..states - 1).map(|_| 1 + next() % 20).collect();
                weights.push(64 - weights.iter().sum::<usize>());
                weights.into_iter().map(|w| w as f64 / 64.0).collect()
            })
            .collect();
        let var = Variable::new(&format!("v{i}"), states, &parents)
            .unwrap()
            .with_cpt(cpt)
            .unwrap();
        vars.push(var);
    }
    Network::new(vars).unwrap()
}

/// Every complete assignment, first variable fastest.
fn assignments(network: &Network) -> Vec<Vec<usize>> {
    let bases: Vec<usize> = network.variables().iter().map(|v| v.num_states()).collect();
    let total: usize = bases.iter().product();
    let mut out = Vec::with_capacity(total);
    let mut digits = vec![0usize; bases.len()];
    for _ in 0..total {
        out.push(digits.clone());
        for (d, &base) in digits.iter_mut().zip(&bases) {
            *d += 1;
            if *d < base {
                break;
            }
            *d = 0;
        }
    }
    out
}

fn probability_of(network: &Network, digits: &[usize]) -> f64 {
    let assignment: Vec<(&str, usize)> = network
        .variables()
        .iter()
        .map(|v| v.name())
        .zip(digits.iter().copied())
        .collect();
    network.assignment_probability(&assignment).unwrap()
}

/// Exact marginals by enumerating every complete assignment consistent with
/// the `(variable index, state)` observations.
fn brute_force(network: &Network, evidence: &[(usize, usize)]) -> Vec<Vec<f64>> {
    let mut acc: Vec<Vec<f64>> = network
        .variables()
        .iter()
        .map(|v| vec![0.0; v.num_states()])
        .collect();
    for digits in assignments(network) {
        if evidence.iter().any(|&(var, state)| digits[var] != state) {
            continue;
        }
        let p = probability_of(network, &digits);
        for (var, &state) in digits.iter().enumerate() {
            acc[var][state] += p;
        }
    }

    acc.into_iter()
        .map(|row| {
            let z: f64 = row.iter().sum();
            row.into_iter().map(|p| p / z).collect()
        })
        .collect()
}

/// Clamp `count` distinct variables, chosen and set from `picks`.
fn clamp_several(network: &mut Network, picks: &[usize], count: usize) -> Vec<(usize, usize)> {
    let size = network.len();
    let mut targets: Vec<usize> = Vec::with_capacity(count);
    for &pick in picks {
        if targets.len() == count {
            break;
        }
        let mut target = pick % size;
        while targets.contains(&target) {
            target = (target + 1) % size;
        }
        targets.push(target);
    }

    targets
        .into_iter()
        .zip(picks.iter().rev())
        .map(|(target, &state_pick)| {
            let name = format!("v{target}");
            let state = state_pick % network.get_variable(&name).unwrap().num_states();
            network.clamp_variable(&name, state).unwrap();
            (target, state)
        })
        .collect()
}

fn raw_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(any::<u32>(), 16..96)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn marginals_are_distributions(size in 1usize..8, raw in raw_strategy()) {
        let net = build_network(size, &raw, 3);
        let table = net.joint_probability().unwrap();
        prop_assert_eq!(table.len(), size);
        for m in table.iter() {
            let sum: f64 = m.distribution.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9, "{} sums to {}", m.name, sum);
            prop_assert!(m.distribution.iter().all(|p| (0.0..=1.0 + 1e-12).contains(p)));
        }
    }

    #[test]
    fn clamped_variables_are_one_hot(
        size in 1usize..8,
        raw in raw_strategy(),
        pick in any::<usize>(),
        state_pick in any::<usize>(),
    ) {
        let mut net = build_network(size, &raw, 3);
        let target = pick % size;
        let name = format!("v{target}");
        let state = state_pick % net.get_variable(&name).unwrap().num_states();
        net.clamp_variable(&name, state).unwrap();

        let table = net.joint_probability().unwrap();
        let dist = table.get(&name).unwrap();
        for (i, p) in dist.iter().enumerate() {
            prop_assert_eq!(*p, if i == state { 1.0 } else { 0.0 });
        }
        for m in table.iter() {
            let sum: f64 = m.distribution.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9, "{} sums to {}", m.name, sum);
        }
    }

    #[test]
    fn mpe_picks_each_arg_max(size in 1usize..8, raw in raw_strategy()) {
        let net = build_network(size, &raw, 2);
        let table = net.joint_probability().unwrap();
        let mpe = net.most_probable_explanation().unwrap();
        prop_assert_eq!(mpe.len(), size);
        for m in table.iter() {
            prop_assert_eq!(mpe.by_id(m.id), arg_max(&m.distribution));
        }
        prop_assert_eq!(net.most_probable_explanation().unwrap(), mpe);
    }

    #[test]
    fn releasing_evidence_restores_priors(
        size in 1usize..8,
        raw in raw_strategy(),
        pick in any::<usize>(),
    ) {
        let mut net = build_network(size, &raw, 3);
        let before = net.joint_probability().unwrap();
        let name = format!("v{}", pick % size);
        net.clamp_variable(&name, 1).unwrap();
        prop_assert_eq!(net.release_variable(&name).unwrap(), Some(1));
        prop_assert_eq!(net.joint_probability().unwrap(), before);
    }

    #[test]
    fn assignments_sum_to_one(size in 1usize..6, raw in raw_strategy()) {
        let net = build_network(size, &raw, 3);
        let total: f64 = assignments(&net)
            .iter()
            .map(|digits| probability_of(&net, digits))
            .sum();
        prop_assert!((total - 1.0).abs() < 1e-9, "total = {}", total);
    }

    #[test]
    fn forests_match_enumeration_without_evidence(size in 1usize..7, raw in raw_strategy()) {
        let net = build_network(size, &raw, 1);
        let exact = brute_force(&net, &[]);
        let table = net.joint_probability().unwrap();
        for (m, truth) in table.iter().zip(&exact) {
            let gap = max_divergence(&m.distribution, truth);
            prop_assert!(gap < 1e-9, "{}: {:?} vs {:?}", m.name, m.distribution, truth);
        }
    }

    #[test]
    fn forests_match_enumeration_with_one_observation(
        size in 2usize..7,
        raw in raw_strategy(),
        pick in any::<usize>(),
        state_pick in any::<usize>(),
    ) {
        let mut net = build_network(size, &raw, 1);
        let target = pick % size;
        let name = format!("v{target}");
        let state = state_pick % net.get_variable(&name).unwrap().num_states();
        net.clamp_variable(&name, state).unwrap();

        let exact = brute_force(&net, &[(target, state)]);
        let table = net.joint_probability().unwrap();
        for (m, truth) in table.iter().zip(&exact) {
            let gap = max_divergence(&m.distribution, truth);
            prop_assert!(gap < 1e-9, "{}: {:?} vs {:?}", m.name, m.distribution, truth);
        }
    }

    #[test]
    fn forests_match_enumeration_with_several_observations(
        size in 3usize..7,
        raw in raw_strategy(),
        picks in prop::collection::vec(any::<usize>(), 3),
        count in 2usize..4,
    ) {
        let mut net = build_network(size, &raw, 1);
        let evidence = clamp_several(&mut net, &picks, count);
        prop_assert_eq!(evidence.len(), count);

        let exact = brute_force(&net, &evidence);
        let table = net.joint_probability().unwrap();
        for (m, truth) in table.iter().zip(&exact) {
            let gap = max_divergence(&m.distribution, truth);
            prop_assert!(gap < 1e-9, "{}: {:?} vs {:?}", m.name, m.distribution, truth);
        }
    }
}
