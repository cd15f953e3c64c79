//! Cars drive along one axis and stop for red lights; horizontal cars also
//! yield to vertical ones.

use geo::coord;
use rand::Rng;

use super::super::agent::{AgentId, AgentKind, Axis, Car, roles};
use super::super::boundary::BoundaryPolicy;
use super::super::error::Result;
use super::super::params::TrafficConfig;
use super::super::spatial::IndexStrategy;
use super::super::swarm::Swarm;
use super::spawn_wanderers;

pub(super) fn build(
    swarm: &mut Swarm,
    config: &TrafficConfig,
    strategy: IndexStrategy,
) -> Result<()> {
    let vertical = spawn_cars(swarm, config, Axis::Vertical, config.vertical_cars);
    let horizontal = spawn_cars(swarm, config, Axis::Horizontal, config.horizontal_cars);
    let red_lights = spawn_wanderers(
        swarm,
        "red_light",
        &config.red_lights,
        BoundaryPolicy::Bounce { restitution: 1.0 },
    );

    let light_group = swarm.create_group("red_lights", strategy, &red_lights)?;
    let vertical_group = swarm.create_group("vertical_cars", strategy, &vertical)?;
    swarm.create_group("horizontal_cars", strategy, &horizontal)?;

    swarm.subscribe_all(&vertical, roles::OBSTACLE, light_group)?;
    swarm.subscribe_all(&horizontal, roles::OBSTACLE, light_group)?;
    swarm.subscribe_all(&horizontal, roles::CROSS_TRAFFIC, vertical_group)
}

/// Cars start on the edge they drive away from.
fn spawn_cars(swarm: &mut Swarm, config: &TrafficConfig, axis: Axis, count: usize) -> Vec<AgentId> {
    let bounds = swarm.bounds();
    let (min, max) = (bounds.min(), bounds.max());

    (0..count)
        .map(|_| {
            let rng = swarm.rng_mut();
            let speed = config.car_speed.sample(rng);
            let direction = if rng.random::<bool>() { 1.0 } else { -1.0 };
            let along = rng.random::<f64>();
            let position = match axis {
                Axis::Vertical => coord! {
                    x: min.x + along * bounds.width,
                    y: if direction > 0.0 { min.y } else { max.y }
                },
                Axis::Horizontal => coord! {
                    x: if direction > 0.0 { min.x } else { max.x },
                    y: min.y + along * bounds.height
                },
            };

            let mut car = Car::new(axis, speed, direction);
            car.stop_distance = config.stop_distance;
            if axis == Axis::Horizontal {
                car.yield_distance = Some(config.yield_distance);
            }
            let heading = car.heading();
            swarm.spawn_at(car_tag(axis), position, heading, AgentKind::Car(car))
        })
        .collect()
}

fn car_tag(axis: Axis) -> &'static str {
    match axis {
        Axis::Vertical => "vertical_car",
        Axis::Horizontal => "horizontal_car",
    }
}
