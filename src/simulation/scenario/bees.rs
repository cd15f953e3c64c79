//! Bees seek the nearest flower and keep their distance from each other.

use super::super::agent::{AgentId, AgentKind, Seeker, roles};
use super::super::boundary::BoundaryPolicy;
use super::super::error::Result;
use super::super::params::BeesConfig;
use super::super::spatial::IndexStrategy;
use super::super::swarm::Swarm;
use super::spawn_wanderers;

pub(super) fn build(swarm: &mut Swarm, config: &BeesConfig, strategy: IndexStrategy) -> Result<()> {
    let bees: Vec<AgentId> = (0..config.bees)
        .map(|_| {
            let seeker = Seeker {
                max_speed: config.max_speed,
                acceleration: config.acceleration,
                min_distance: config.min_distance,
                repulsion_strength: config.repulsion_strength,
                policy: BoundaryPolicy::Bounce {
                    restitution: config.restitution,
                },
                ..Seeker::default()
            };
            swarm.spawn("bee", 0.0, AgentKind::Seeker(seeker))
        })
        .collect();
    let flowers = spawn_wanderers(
        swarm,
        "flower",
        &config.flowers,
        BoundaryPolicy::Bounce { restitution: 1.0 },
    );

    let flower_group = swarm.create_group("flowers", strategy, &flowers)?;
    let bee_group = swarm.create_group("bees", strategy, &bees)?;

    swarm.subscribe_all(&bees, roles::ATTRACTOR, flower_group)?;
    swarm.subscribe_all(&bees, roles::SAME, bee_group)
}
