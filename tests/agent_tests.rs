#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::f64::consts::PI;

use geo::coord;
use swarm::simulation::agent::{AgentKind, Axis, Car, Chaser, Planet, Seeker, Spaceship, Wanderer, roles};
use swarm::simulation::boundary::BoundaryPolicy;
use swarm::simulation::force::{attract, flee, gravity, repel};
use swarm::simulation::geometry::{WorldBounds, distance};
use swarm::simulation::history::{HISTORY_CAPACITY, History};
use swarm::simulation::locatable::Locatable;
use swarm::simulation::spatial::IndexStrategy;
use swarm::simulation::swarm::Swarm;

fn world() -> Swarm {
    Swarm::new(WorldBounds::from_size(800.0, 600.0), 7).expect("world")
}

#[test]
fn test_history_keeps_most_recent_first() {
    let mut history = History::default();
    for i in 0..130 {
        history.push(coord! { x: f64::from(i), y: 0.0 });
    }
    assert_eq!(history.len(), HISTORY_CAPACITY);
    assert_eq!(history.capacity(), HISTORY_CAPACITY);
    assert_eq!(history.latest(), Some(coord! { x: 129.0, y: 0.0 }));
    let xs: Vec<f64> = history.iter().map(|p| p.x).collect();
    assert_eq!(xs.first(), Some(&129.0));
    assert_eq!(xs.last(), Some(&2.0));
}

#[test]
fn test_bounce_clamps_and_reflects() {
    let bounds = WorldBounds::from_size(800.0, 600.0);
    let policy = BoundaryPolicy::Bounce { restitution: 0.8 };
    let mut position = coord! { x: -5.0, y: 300.0 };
    let mut velocity = coord! { x: -3.0, y: 1.0 };

    let crossing = policy.apply(&mut position, &mut velocity, &bounds);

    assert!(crossing.x && !crossing.y);
    assert_eq!(position.x, 0.0);
    assert!((velocity.x - 2.4).abs() < 1e-12);
    assert_eq!(velocity.y, 1.0);
}

#[test]
fn test_wrap_teleports_to_opposite_edge() {
    let bounds = WorldBounds::from_size(800.0, 600.0);
    let mut position = coord! { x: 801.0, y: -1.0 };
    let mut velocity = coord! { x: 1.0, y: -1.0 };

    BoundaryPolicy::Wrap.apply(&mut position, &mut velocity, &bounds);

    assert_eq!(position, coord! { x: 0.0, y: 600.0 });
    assert_eq!(velocity, coord! { x: 1.0, y: -1.0 });
}

#[test]
fn test_soft_clamp_keeps_inner_area() {
    let bounds = WorldBounds::from_size(1000.0, 500.0);
    let mut position = coord! { x: 10.0, y: 480.0 };
    let mut velocity = coord! { x: -1.0, y: 1.0 };

    BoundaryPolicy::SoftClamp { margin: 0.1 }.apply(&mut position, &mut velocity, &bounds);

    assert!((position.x - 100.0).abs() < 1e-9);
    assert!((position.y - 450.0).abs() < 1e-9);
    assert_eq!(velocity, coord! { x: -1.0, y: 1.0 });
}

#[test]
fn test_forces_skip_coincident_neighbors() {
    let p = coord! { x: 3.0, y: 3.0 };
    for force in [
        attract(p, p, 0.0, 1.0),
        flee(p, p, 0.0, 1.0),
        repel(p, p, 0.0, 60.0, 1.0),
        gravity(p, p, 0.0, 10.0, 5.0),
    ] {
        assert_eq!(force, coord! { x: 0.0, y: 0.0 });
    }
}

#[test]
fn test_repel_fades_with_distance() {
    let here = coord! { x: 0.0, y: 0.0 };
    let near = repel(here, coord! { x: 10.0, y: 0.0 }, 10.0, 60.0, 1.0);
    let far = repel(here, coord! { x: 50.0, y: 0.0 }, 50.0, 60.0, 1.0);
    let outside = repel(here, coord! { x: 70.0, y: 0.0 }, 70.0, 60.0, 1.0);

    assert!(near.x < far.x && far.x < 0.0);
    assert_eq!(outside, coord! { x: 0.0, y: 0.0 });
}

#[test]
fn test_seeker_moves_towards_attractor() {
    let mut swarm = world();
    let flower = swarm.spawn_at(
        "flower",
        coord! { x: 600.0, y: 300.0 },
        0.0,
        AgentKind::Wanderer(Wanderer::new(0.0, 0.0, 0.0, BoundaryPolicy::default())),
    );
    let bee = swarm.spawn_at(
        "bee",
        coord! { x: 100.0, y: 300.0 },
        0.0,
        AgentKind::Seeker(Seeker::default()),
    );
    let flowers = swarm
        .create_group("flowers", IndexStrategy::Linear, &[flower])
        .expect("group");
    swarm.subscribe(bee, roles::ATTRACTOR, flowers).expect("subscribe");

    let start = distance(
        swarm.agent(bee).expect("bee").position(),
        coord! { x: 600.0, y: 300.0 },
    );
    for _ in 0..30 {
        swarm.step(1.0);
    }
    let end = distance(
        swarm.agent(bee).expect("bee").position(),
        coord! { x: 600.0, y: 300.0 },
    );
    assert!(end < start);
    assert_eq!(swarm.agent(bee).expect("bee").history().len(), 30);
}

#[test]
fn test_chaser_flees_attacker() {
    let mut swarm = world();
    let prey = swarm.spawn_at(
        "mouse",
        coord! { x: 400.0, y: 300.0 },
        0.0,
        AgentKind::Chaser(Chaser {
            jitter: 0.0,
            ..Chaser::default()
        }),
    );
    let cat = swarm.spawn_at(
        "cat",
        coord! { x: 380.0, y: 300.0 },
        0.0,
        AgentKind::Chaser(Chaser {
            max_speed: 0.0,
            jitter: 0.0,
            ..Chaser::default()
        }),
    );
    let cats = swarm
        .create_group("cats", IndexStrategy::Linear, &[cat])
        .expect("group");
    swarm.subscribe(prey, roles::ATTACKER, cats).expect("subscribe");

    swarm.step(1.0);

    let x = swarm.agent(prey).expect("prey").position().x;
    assert!(x > 400.0);
}

#[test]
fn test_spaceship_feels_planet_and_remembers_it() {
    let mut swarm = world();
    let planet = swarm.spawn_at(
        "planet",
        coord! { x: 400.0, y: 300.0 },
        0.0,
        AgentKind::Planet(Planet::new(2.0, 0.0, 0.0, 0.0)),
    );
    let ship = swarm.spawn_at(
        "spaceship",
        coord! { x: 300.0, y: 300.0 },
        0.0,
        AgentKind::Spaceship(Spaceship::default()),
    );
    let planets = swarm
        .create_group("planets", IndexStrategy::KdTree, &[planet])
        .expect("group");
    swarm.subscribe(ship, roles::MASSIVE, planets).expect("subscribe");

    swarm.step(1.0);

    let agent = swarm.agent(ship).expect("ship");
    assert!(agent.position().x > 300.0);
    assert_eq!(agent.kind().links().len(), 1);
    assert_eq!(agent.kind().links()[0].id, planet);
    assert_eq!(swarm.group(planets).expect("group").size(), 1);
}

#[test]
fn test_spaceship_bounces_off_planet_surface() {
    let mut swarm = world();
    let planet = swarm.spawn_at(
        "planet",
        coord! { x: 400.0, y: 300.0 },
        0.0,
        AgentKind::Planet(Planet::new(1.0, 0.0, 0.0, 0.0)),
    );
    let ship = swarm.spawn_at(
        "spaceship",
        coord! { x: 390.0, y: 300.0 },
        0.0,
        AgentKind::Spaceship(Spaceship {
            gravity: 0.0,
            ..Spaceship::new(coord! { x: 1.0, y: 0.0 })
        }),
    );
    let planets = swarm
        .create_group("planets", IndexStrategy::Linear, &[planet])
        .expect("group");
    swarm.subscribe(ship, roles::MASSIVE, planets).expect("subscribe");

    swarm.step(1.0);

    let AgentKind::Spaceship(state) = swarm.agent(ship).expect("ship").kind() else {
        panic!("not a spaceship");
    };
    assert!(state.velocity.x < 0.0);
    // Pushed out to the contact distance (12 + 18), then moved one step.
    assert!(swarm.agent(ship).expect("ship").position().x < 371.0);
}

#[test]
fn test_car_stops_near_obstacle_and_reverses_at_edge() {
    let mut swarm = world();
    let light = swarm.spawn_at(
        "red_light",
        coord! { x: 100.0, y: 100.0 },
        0.0,
        AgentKind::Wanderer(Wanderer::new(0.0, 0.0, 0.0, BoundaryPolicy::default())),
    );
    let stopped = swarm.spawn_at(
        "horizontal_car",
        coord! { x: 150.0, y: 100.0 },
        0.0,
        AgentKind::Car(Car::new(Axis::Horizontal, 3.0, 1.0)),
    );
    let edge = swarm.spawn_at(
        "vertical_car",
        coord! { x: 700.0, y: 599.0 },
        0.0,
        AgentKind::Car(Car::new(Axis::Vertical, 3.0, 1.0)),
    );
    let lights = swarm
        .create_group("red_lights", IndexStrategy::Linear, &[light])
        .expect("group");
    swarm.subscribe_all(&[stopped, edge], roles::OBSTACLE, lights).expect("subscribe");

    swarm.step(1.0);

    assert_eq!(swarm.agent(stopped).expect("car").position().x, 150.0);
    let car = swarm.agent(edge).expect("car");
    assert_eq!(car.position().y, 600.0);
    let AgentKind::Car(state) = car.kind() else {
        panic!("not a car");
    };
    assert_eq!(state.direction, -1.0);
    assert_eq!(car.heading(), -PI / 2.0);
}

#[test]
fn test_wanderer_bounce_reflects_heading() {
    let mut swarm = world();
    let id = swarm.spawn_at(
        "flower",
        coord! { x: 799.0, y: 300.0 },
        0.0,
        AgentKind::Wanderer(Wanderer {
            target_change_probability: 0.0,
            ..Wanderer::new(5.0, 0.1, 0.0, BoundaryPolicy::Bounce { restitution: 1.0 })
        }),
    );

    swarm.step(1.0);

    let agent = swarm.agent(id).expect("flower");
    assert_eq!(agent.position().x, 800.0);
    assert!((agent.heading() - PI).abs() < 1e-12);
}

#[test]
fn test_wanderer_tolerates_negative_or_nan_turn_rate() {
    let mut swarm = world();
    let negative = swarm.spawn_at(
        "flower",
        coord! { x: 400.0, y: 300.0 },
        0.0,
        AgentKind::Wanderer(Wanderer {
            target_heading: PI / 2.0,
            target_change_probability: 0.0,
            ..Wanderer::new(1.0, -0.1, 0.0, BoundaryPolicy::default())
        }),
    );
    let frozen = swarm.spawn_at(
        "planet",
        coord! { x: 200.0, y: 200.0 },
        0.0,
        AgentKind::Planet(Planet::new(1.0, 0.5, f64::NAN, 0.0)),
    );

    for _ in 0..5 {
        swarm.step(1.0);
    }

    let turned = swarm.agent(negative).expect("flower").heading();
    assert!(turned != 0.0 && turned.abs() <= 0.5 + 1e-12, "{turned}");
    assert_eq!(swarm.agent(frozen).expect("planet").heading(), 0.0);
}
