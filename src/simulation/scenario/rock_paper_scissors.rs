//! Rock chases scissors, scissors chase paper, paper chases rock.

use super::super::agent::roles;
use super::super::error::Result;
use super::super::params::RockPaperScissorsConfig;
use super::super::spatial::IndexStrategy;
use super::super::swarm::Swarm;
use super::spawn_chasers;

pub(super) fn build(
    swarm: &mut Swarm,
    config: &RockPaperScissorsConfig,
    strategy: IndexStrategy,
) -> Result<()> {
    let rocks = spawn_chasers(swarm, "rock", &config.each);
    let papers = spawn_chasers(swarm, "paper", &config.each);
    let scissors = spawn_chasers(swarm, "scissors", &config.each);

    let rock_group = swarm.create_group("rocks", strategy, &rocks)?;
    let paper_group = swarm.create_group("papers", strategy, &papers)?;
    let scissors_group = swarm.create_group("scissors", strategy, &scissors)?;

    // (population, same, attacker, target)
    let wiring = [
        (&rocks, rock_group, paper_group, scissors_group),
        (&papers, paper_group, scissors_group, rock_group),
        (&scissors, scissors_group, rock_group, paper_group),
    ];
    for (members, same, attacker, target) in wiring {
        swarm.subscribe_all(members, roles::SAME, same)?;
        swarm.subscribe_all(members, roles::ATTACKER, attacker)?;
        swarm.subscribe_all(members, roles::TARGET, target)?;
    }
    Ok(())
}
