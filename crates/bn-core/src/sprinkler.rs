//! The classic cloudy / sprinkler / rain / wet-grass network.
//!
//! ```text
//!          cloudy
//!         /      \
//!   sprinkler    rain
//!         \      /
//!          grass
//! ```
//!
//! All variables are binary. `grass` lists `rain` first, so `rain` is the
//! fastest-varying digit of its CPT rows.

use bn_common::Result;
use bn_config::DEFAULT_CPT_TOLERANCE;

use crate::model::{Network, Variable};

/// Build the reference network with the default CPT tolerance.
pub fn sprinkler_network() -> Result<Network> {
    sprinkler_network_with_tolerance(DEFAULT_CPT_TOLERANCE)
}

/// Build the reference network, validating CPTs with `tolerance`.
pub fn sprinkler_network_with_tolerance(tolerance: f64) -> Result<Network> {
    let mut cloudy = Variable::root("cloudy", 2)?;
    cloudy.set_cpt_with_tolerance(vec![vec![0.5, 0.5]], tolerance)?;

    let mut sprinkler = Variable::new("sprinkler", 2, &[&cloudy])?;
    sprinkler.set_cpt_with_tolerance(vec![vec![0.5, 0.5], vec![0.9, 0.1]], tolerance)?;

    let mut rain = Variable::new("rain", 2, &[&cloudy])?;
    rain.set_cpt_with_tolerance(vec![vec![0.8, 0.2], vec![0.2, 0.8]], tolerance)?;

    let mut grass = Variable::new("grass", 2, &[&rain, &sprinkler])?;
    grass.set_cpt_with_tolerance(
        vec![
            vec![1.0, 0.0],
            vec![0.1, 0.9],
            vec![0.1, 0.9],
            vec![0.01, 0.99],
        ],
        tolerance,
    )?;

    Network::new(vec![cloudy, sprinkler, rain, grass])
}
