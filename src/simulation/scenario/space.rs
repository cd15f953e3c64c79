//! Spaceships drift under the pull of the three nearest wandering planets.

use geo::coord;
use rand::Rng;

use super::super::agent::{AgentId, AgentKind, Planet, Spaceship, roles};
use super::super::boundary::BoundaryPolicy;
use super::super::error::Result;
use super::super::params::SpaceConfig;
use super::super::spatial::IndexStrategy;
use super::super::swarm::Swarm;
use super::random_heading;

pub(super) fn build(swarm: &mut Swarm, config: &SpaceConfig, strategy: IndexStrategy) -> Result<()> {
    let planets: Vec<AgentId> = (0..config.planets.count)
        .map(|_| {
            let speed = config.planets.speed.sample(swarm.rng_mut());
            let max_turn_rate = config.planets.max_turn_rate.sample(swarm.rng_mut());
            let heading = random_heading(swarm);
            let size = config.planet_size.sample(swarm.rng_mut());
            let planet = Planet::new(size, speed, max_turn_rate, heading);
            swarm.spawn("planet", heading, AgentKind::Planet(planet))
        })
        .collect();

    let ships: Vec<AgentId> = (0..config.spaceships)
        .map(|_| {
            let rng = swarm.rng_mut();
            let velocity = coord! {
                x: (rng.random::<f64>() - 0.5) * config.max_speed,
                y: (rng.random::<f64>() - 0.5) * config.max_speed
            };
            let ship = Spaceship {
                max_speed: config.max_speed,
                drag: config.drag,
                radius: config.radius,
                gravity: config.gravity,
                max_gravity_distance: config.max_gravity_distance,
                attractor_count: config.attractor_count,
                policy: BoundaryPolicy::Bounce { restitution: 1.0 },
                ..Spaceship::new(velocity)
            };
            swarm.spawn("spaceship", 0.0, AgentKind::Spaceship(ship))
        })
        .collect();

    let planet_group = swarm.create_group("planets", strategy, &planets)?;
    swarm.subscribe_all(&ships, roles::MASSIVE, planet_group)
}
