//! Scenario builders: populations, groups and role wiring for each demo.
//!
//! Every builder follows the same shape: spawn the populations, create one
//! group per population, then subscribe each population to the groups that
//! serve its roles.

mod bees;
mod food_chain;
mod rock_paper_scissors;
mod space;
mod traffic;

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::agent::{AgentId, AgentKind, Chaser, Wanderer};
use super::boundary::BoundaryPolicy;
use super::error::{Result, SwarmError};
use super::params::{ChaserConfig, Params, WandererConfig};
use super::swarm::Swarm;

/// The available demos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Bees seeking wandering flowers.
    #[default]
    Bees,
    /// Rock, paper and scissors chasing each other in a ring.
    RockPaperScissors,
    /// Dogs chase cats, cats chase mice.
    FoodChain,
    /// Spaceships pulled by wandering planets.
    SpaceGravity,
    /// Cars stopping for wandering red lights and crossing traffic.
    Traffic,
}

impl ScenarioKind {
    /// Every scenario, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Bees,
        Self::RockPaperScissors,
        Self::FoodChain,
        Self::SpaceGravity,
        Self::Traffic,
    ];

    /// Stable name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Bees => "bees",
            Self::RockPaperScissors => "rock_paper_scissors",
            Self::FoodChain => "food_chain",
            Self::SpaceGravity => "space_gravity",
            Self::Traffic => "traffic",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioKind {
    type Err = SwarmError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "rps" => Ok(Self::RockPaperScissors),
            "space" => Ok(Self::SpaceGravity),
            name => Self::ALL
                .into_iter()
                .find(|kind| kind.name() == name)
                .ok_or_else(|| SwarmError::InvalidConfig(format!("unknown scenario `{s}`"))),
        }
    }
}

/// Builds the world for `params.scenario`.
///
/// # Arguments
///
/// * `params` - Validated before anything is allocated
///
/// # Returns
///
/// A world with all populations spawned, grouped and wired, ready for its
/// first frame.
pub fn build(params: &Params) -> Result<Swarm> {
    params.validate()?;

    let mut swarm = Swarm::new(params.bounds(), params.seed)?;
    swarm.set_trails_enabled(params.trails_enabled);

    let strategy = params.strategy;
    match params.scenario {
        ScenarioKind::Bees => bees::build(&mut swarm, &params.bees, strategy)?,
        ScenarioKind::RockPaperScissors => {
            rock_paper_scissors::build(&mut swarm, &params.rock_paper_scissors, strategy)?;
        }
        ScenarioKind::FoodChain => food_chain::build(&mut swarm, &params.food_chain, strategy)?,
        ScenarioKind::SpaceGravity => space::build(&mut swarm, &params.space, strategy)?,
        ScenarioKind::Traffic => traffic::build(&mut swarm, &params.traffic, strategy)?,
    }

    let census = swarm
        .census()
        .iter()
        .map(|(tag, count)| format!("{count} {tag}"))
        .collect::<Vec<_>>()
        .join(", ");
    log::info!(
        "scenario {} built: {} ({} groups, {:?} index)",
        params.scenario,
        census,
        swarm.groups().len(),
        strategy
    );
    Ok(swarm)
}

fn random_heading(swarm: &mut Swarm) -> f64 {
    swarm.rng_mut().random::<f64>() * TAU
}

fn spawn_wanderers(
    swarm: &mut Swarm,
    tag: &'static str,
    config: &WandererConfig,
    policy: BoundaryPolicy,
) -> Vec<AgentId> {
    (0..config.count)
        .map(|_| {
            let speed = config.speed.sample(swarm.rng_mut());
            let max_turn_rate = config.max_turn_rate.sample(swarm.rng_mut());
            let heading = random_heading(swarm);
            let kind = AgentKind::Wanderer(Wanderer::new(speed, max_turn_rate, heading, policy));
            swarm.spawn(tag, heading, kind)
        })
        .collect()
}

fn spawn_chasers(swarm: &mut Swarm, tag: &'static str, config: &ChaserConfig) -> Vec<AgentId> {
    (0..config.count)
        .map(|_| {
            let chaser = Chaser {
                max_speed: config.max_speed.sample(swarm.rng_mut()),
                min_distance: config.min_distance,
                repulsion_strength: config.repulsion_strength,
                flee_strength: config.flee_strength,
                chase_strength: config.chase_strength,
                jitter: config.jitter,
                policy: BoundaryPolicy::SoftClamp {
                    margin: config.margin,
                },
                ..Chaser::default()
            };
            swarm.spawn(tag, 0.0, AgentKind::Chaser(chaser))
        })
        .collect()
}
