//! Dogs chase cats, cats flee dogs and chase mice, mice flee cats.

use super::super::agent::roles;
use super::super::error::Result;
use super::super::params::FoodChainConfig;
use super::super::spatial::IndexStrategy;
use super::super::swarm::Swarm;
use super::spawn_chasers;

pub(super) fn build(
    swarm: &mut Swarm,
    config: &FoodChainConfig,
    strategy: IndexStrategy,
) -> Result<()> {
    let dogs = spawn_chasers(swarm, "dog", &config.dogs);
    let cats = spawn_chasers(swarm, "cat", &config.cats);
    let mice = spawn_chasers(swarm, "mouse", &config.mice);

    let dog_group = swarm.create_group("dogs", strategy, &dogs)?;
    let cat_group = swarm.create_group("cats", strategy, &cats)?;
    let mouse_group = swarm.create_group("mice", strategy, &mice)?;

    swarm.subscribe_all(&dogs, roles::SAME, dog_group)?;
    swarm.subscribe_all(&dogs, roles::TARGET, cat_group)?;

    swarm.subscribe_all(&cats, roles::SAME, cat_group)?;
    swarm.subscribe_all(&cats, roles::ATTACKER, dog_group)?;
    swarm.subscribe_all(&cats, roles::TARGET, mouse_group)?;

    swarm.subscribe_all(&mice, roles::SAME, mouse_group)?;
    swarm.subscribe_all(&mice, roles::ATTACKER, cat_group)
}
