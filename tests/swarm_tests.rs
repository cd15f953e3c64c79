#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use geo::coord;
use swarm::simulation::agent::{AgentId, AgentKind, Seeker, roles};
use swarm::simulation::error::SwarmError;
use swarm::simulation::geometry::{WorldBounds, distance};
use swarm::simulation::group::GroupId;
use swarm::simulation::locatable::Locatable;
use swarm::simulation::params::Params;
use swarm::simulation::scenario::{self, ScenarioKind};
use swarm::simulation::session::{Session, SessionState};
use swarm::simulation::spatial::{DEFAULT_CAPACITY, IndexStrategy};
use swarm::simulation::swarm::Swarm;

fn small_params(scenario: ScenarioKind) -> Params {
    let mut params = Params {
        scenario,
        ..Params::default()
    };
    params.bees.bees = 20;
    params.traffic.vertical_cars = 10;
    params.traffic.horizontal_cars = 10;
    params.space.spaceships = 10;
    params
}

#[test]
fn test_every_scenario_builds_and_runs() {
    for kind in ScenarioKind::ALL {
        let swarm = scenario::build(&small_params(kind)).expect("scenario");
        assert!(!swarm.agents().is_empty(), "{kind}");
        assert!(!swarm.groups().is_empty(), "{kind}");

        let (mut session, _stop) = Session::start(swarm);
        assert_eq!(session.run(1.0, 50), 50);

        let bounds = session.swarm().bounds();
        for agent in session.swarm().agents() {
            let p = agent.position();
            assert!(p.x.is_finite() && p.y.is_finite(), "{kind}: {p:?}");
            assert!(bounds.contains(p), "{kind}: {} escaped to {p:?}", agent.tag());
        }
    }
}

#[test]
fn test_default_populations_match_the_demos() {
    let counts = |kind| {
        scenario::build(&Params {
            scenario: kind,
            ..Params::default()
        })
        .expect("scenario")
        .census()
    };
    assert_eq!(counts(ScenarioKind::Bees), vec![("bee", 128), ("flower", 8)]);
    assert_eq!(
        counts(ScenarioKind::RockPaperScissors),
        vec![("rock", 30), ("paper", 30), ("scissors", 30)]
    );
    assert_eq!(
        counts(ScenarioKind::FoodChain),
        vec![("dog", 20), ("cat", 30), ("mouse", 40)]
    );
    assert_eq!(
        counts(ScenarioKind::SpaceGravity),
        vec![("planet", 10), ("spaceship", 50)]
    );
    assert_eq!(
        counts(ScenarioKind::Traffic),
        vec![("vertical_car", 120), ("horizontal_car", 80), ("red_light", 6)]
    );
}

#[test]
fn test_same_seed_replays_identically() {
    let run = |strategy| {
        let params = Params {
            strategy,
            ..small_params(ScenarioKind::RockPaperScissors)
        };
        let mut swarm = scenario::build(&params).expect("scenario");
        for _ in 0..40 {
            swarm.step(params.dt);
        }
        swarm
            .agents()
            .iter()
            .map(Locatable::position)
            .collect::<Vec<_>>()
    };
    assert_eq!(run(IndexStrategy::Linear), run(IndexStrategy::Linear));
}

#[test]
fn test_strategies_drive_the_same_simulation() {
    let run = |strategy| {
        let params = Params {
            strategy,
            ..small_params(ScenarioKind::Bees)
        };
        let mut swarm = scenario::build(&params).expect("scenario");
        for _ in 0..10 {
            swarm.step(params.dt);
        }
        swarm
            .agents()
            .iter()
            .map(Locatable::position)
            .collect::<Vec<_>>()
    };
    let linear = run(IndexStrategy::Linear);
    for strategy in [
        IndexStrategy::QuadTree {
            capacity: DEFAULT_CAPACITY,
        },
        IndexStrategy::KdTree,
    ] {
        let other = run(strategy);
        for (a, b) in linear.iter().zip(&other) {
            assert!((a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6, "{strategy:?}");
        }
    }
}

#[test]
fn test_stop_handle_ends_the_session() {
    let swarm = scenario::build(&small_params(ScenarioKind::Bees)).expect("scenario");
    let (mut session, stop) = Session::start(swarm);
    assert_eq!(session.state(), SessionState::Idle);

    assert!(session.tick(1.0));
    assert_eq!(session.state(), SessionState::Running);

    stop.stop();
    assert!(stop.is_stopped());
    assert!(!session.tick(1.0));
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(session.run(1.0, 10), 0);
    assert_eq!(session.swarm().frame(), 1);
}

#[test]
fn test_run_until_stopped_ends_when_the_hook_stops_it() {
    let swarm = scenario::build(&small_params(ScenarioKind::Bees)).expect("scenario");
    let (mut session, stop) = Session::start(swarm);

    let mut seen = Vec::new();
    let ran = session.run_until_stopped(1.0, |swarm| {
        seen.push(swarm.frame());
        if swarm.frame() == 5 {
            stop.stop();
        }
    });

    assert_eq!(ran, 5);
    assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    assert_eq!(session.swarm().frame(), 5);
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(session.run_until_stopped(1.0, |_| {}), 0);
}

#[test]
fn test_nearby_lists_subscribed_members_within_radius() {
    let swarm = scenario::build(&small_params(ScenarioKind::Bees)).expect("scenario");
    let me = swarm
        .agents()
        .iter()
        .find(|agent| agent.tag() == "bee")
        .map(Locatable::id)
        .expect("bee");
    let here = swarm.agent(me).expect("bee").position();
    let radius = 300.0;

    let hits = swarm.nearby(me, roles::SAME, radius);
    let mut expected: Vec<AgentId> = swarm
        .agents()
        .iter()
        .filter(|agent| agent.tag() == "bee" && agent.id() != me)
        .filter(|agent| distance(here, agent.position()) <= radius)
        .map(Locatable::id)
        .collect();
    let mut got: Vec<AgentId> = hits.iter().map(|hit| hit.id).collect();
    expected.sort();
    got.sort();

    assert_eq!(got, expected);
    assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    assert!(swarm.nearby(me, "unknown", radius).is_empty());
    assert!(swarm.nearby(AgentId(10_000), roles::SAME, radius).is_empty());
}

#[test]
fn test_resize_applies_at_next_frame() {
    let swarm = scenario::build(&small_params(ScenarioKind::SpaceGravity)).expect("scenario");
    let (mut session, _stop) = Session::start(swarm);
    let smaller = WorldBounds::from_size(300.0, 200.0);

    session.resize(smaller).expect("resize");
    assert_ne!(session.swarm().bounds(), smaller);

    session.tick(1.0);
    assert_eq!(session.swarm().bounds(), smaller);
    for (_, group) in session.swarm().groups().iter() {
        assert_eq!(group.bounds(), smaller);
    }
    assert!(session.resize(WorldBounds::from_size(0.0, 10.0)).is_err());
}

#[test]
fn test_render_frame_exposes_presentation_state() {
    let mut params = small_params(ScenarioKind::SpaceGravity);
    params.trails_enabled = true;
    let mut swarm = scenario::build(&params).expect("scenario");
    swarm.step(1.0);
    swarm.step(1.0);

    let frame = swarm.render_frame();
    assert!(frame.trails_enabled);
    assert_eq!(frame.frame, 2);
    assert_eq!(frame.agents.len(), swarm.agents().len());
    for view in &frame.agents {
        assert_eq!(view.history.len(), 2);
        assert_eq!(view.history.latest(), Some(view.position));
    }

    swarm.set_trails_enabled(false);
    assert!(!swarm.render_frame().trails_enabled);
}

#[test]
fn test_wiring_rejects_unknown_ids() {
    let mut swarm = Swarm::new(WorldBounds::from_size(100.0, 100.0), 1).expect("world");
    let bee = swarm.spawn_at(
        "bee",
        coord! { x: 1.0, y: 1.0 },
        0.0,
        AgentKind::Seeker(Seeker::default()),
    );

    assert!(matches!(
        swarm.create_group("ghosts", IndexStrategy::Linear, &[AgentId(5)]),
        Err(SwarmError::UnknownAgent(AgentId(5)))
    ));
    assert!(matches!(
        swarm.subscribe(bee, roles::SAME, GroupId(3)),
        Err(SwarmError::UnknownGroup(GroupId(3)))
    ));

    let group = swarm
        .create_group("bees", IndexStrategy::Linear, &[bee])
        .expect("group");
    assert!(matches!(
        swarm.subscribe(AgentId(9), roles::SAME, group),
        Err(SwarmError::UnknownAgent(AgentId(9)))
    ));
    swarm.subscribe(bee, roles::SAME, group).expect("subscribe");
    assert!(swarm.find_nearest(bee, roles::SAME, None).is_none());
    assert_eq!(swarm.unsubscribe(bee, roles::SAME).expect("unsubscribe"), Some(group));
}

#[test]
fn test_invalid_world_bounds_are_rejected() {
    assert!(matches!(
        Swarm::new(WorldBounds::from_size(-1.0, 10.0), 0),
        Err(SwarmError::InvalidBounds(_))
    ));
    assert!(Swarm::new(WorldBounds::new(f64::NAN, 0.0, 10.0, 10.0), 0).is_err());
}

#[test]
fn test_scenario_names_parse() {
    for kind in ScenarioKind::ALL {
        assert_eq!(kind.name().parse::<ScenarioKind>().ok(), Some(kind));
    }
    assert_eq!("rps".parse::<ScenarioKind>().ok(), Some(ScenarioKind::RockPaperScissors));
    assert_eq!(
        "space-gravity".parse::<ScenarioKind>().ok(),
        Some(ScenarioKind::SpaceGravity)
    );
    assert!("aquarium".parse::<ScenarioKind>().is_err());
}
