use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::{Result, SwarmError};
use super::geometry::WorldBounds;
use super::scenario::ScenarioKind;
use super::spatial::IndexStrategy;

/// Simulation parameters: the world, the selected scenario and the tuning of
/// every scenario.
///
/// Missing JSON fields fall back to their defaults, so a config file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// World width.
    pub width: f64,
    /// World height.
    pub height: f64,
    /// Seed of the simulation RNG.
    pub seed: u64,
    /// Time scale per frame; 1.0 is one nominal 60 Hz frame.
    pub dt: f64,
    /// Nearest-neighbor index used by every group.
    pub strategy: IndexStrategy,
    /// Whether the renderer keeps previous frames.
    pub trails_enabled: bool,
    /// Scenario to build.
    pub scenario: ScenarioKind,
    /// Bees and flowers.
    pub bees: BeesConfig,
    /// Rock, paper, scissors.
    pub rock_paper_scissors: RockPaperScissorsConfig,
    /// Dogs, cats and mice.
    pub food_chain: FoodChainConfig,
    /// Planets and spaceships.
    pub space: SpaceConfig,
    /// Red lights and cars.
    pub traffic: TrafficConfig,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            seed: 42,
            dt: 1.0,
            strategy: IndexStrategy::default(),
            trails_enabled: false,
            scenario: ScenarioKind::default(),
            bees: BeesConfig::default(),
            rock_paper_scissors: RockPaperScissorsConfig::default(),
            food_chain: FoodChainConfig::default(),
            space: SpaceConfig::default(),
            traffic: TrafficConfig::default(),
        }
    }
}

impl Params {
    /// World extent at the origin.
    pub fn bounds(&self) -> WorldBounds {
        WorldBounds::from_size(self.width, self.height)
    }

    /// Rejects values no scenario can run with.
    pub fn validate(&self) -> Result<()> {
        self.bounds().validate()?;
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(invalid(format!("dt must be positive, got {}", self.dt)));
        }
        if let IndexStrategy::QuadTree { capacity: 0 } = self.strategy {
            return Err(invalid("quadtree capacity must be at least 1".to_string()));
        }
        self.bees.validate()?;
        self.rock_paper_scissors.validate()?;
        self.food_chain.validate()?;
        self.space.validate()?;
        self.traffic.validate()
    }

    /// Saves the parameters to a JSON file.
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads parameters from a JSON file and validates them.
    pub fn load_from_file(path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }
}

/// Closed interval values are drawn from uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Lower end.
    pub min: f64,
    /// Upper end.
    pub max: f64,
}

impl Span {
    /// Interval `[min, max]`.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Degenerate interval holding only `value`.
    pub const fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    /// Uniform sample; `min` for a degenerate interval.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max > self.min {
            rng.random_range(self.min..=self.max)
        } else {
            self.min
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max || self.min < 0.0
        {
            return Err(invalid(format!(
                "{name}: expected 0 <= min <= max, got {}..{}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Tuning shared by every chasing population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaserConfig {
    /// Population size.
    pub count: usize,
    /// Speed cap, drawn per agent.
    pub max_speed: Span,
    /// Separation distance from the nearest same-kind member.
    pub min_distance: f64,
    /// Separation push at contact.
    pub repulsion_strength: f64,
    /// Push away from the nearest attacker.
    pub flee_strength: f64,
    /// Pull towards the nearest target.
    pub chase_strength: f64,
    /// Width of the per-frame random nudge.
    pub jitter: f64,
    /// Fraction of the world kept clear on every side.
    pub margin: f64,
}

impl Default for ChaserConfig {
    fn default() -> Self {
        Self {
            count: 30,
            max_speed: Span::fixed(2.0),
            min_distance: 60.0,
            repulsion_strength: 0.5,
            flee_strength: 0.3,
            chase_strength: 0.2,
            jitter: 0.1,
            margin: 0.1,
        }
    }
}

impl ChaserConfig {
    fn validate(&self, name: &str) -> Result<()> {
        self.max_speed.validate(&format!("{name}.max_speed"))?;
        non_negative(&format!("{name}.min_distance"), self.min_distance)?;
        non_negative(&format!("{name}.repulsion_strength"), self.repulsion_strength)?;
        non_negative(&format!("{name}.flee_strength"), self.flee_strength)?;
        non_negative(&format!("{name}.chase_strength"), self.chase_strength)?;
        non_negative(&format!("{name}.jitter"), self.jitter)?;
        if !(0.0..0.5).contains(&self.margin) {
            return Err(invalid(format!(
                "{name}.margin must lie in [0, 0.5), got {}",
                self.margin
            )));
        }
        Ok(())
    }
}

/// Tuning of wandering agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WandererConfig {
    /// Population size.
    pub count: usize,
    /// Distance per frame, drawn per agent.
    pub speed: Span,
    /// Turn rate cap in radians per frame, drawn per agent.
    pub max_turn_rate: Span,
}

impl Default for WandererConfig {
    fn default() -> Self {
        Self {
            count: 8,
            speed: Span::new(4.0, 6.0),
            max_turn_rate: Span::new(0.03, 0.07),
        }
    }
}

impl WandererConfig {
    fn validate(&self, name: &str) -> Result<()> {
        self.speed.validate(&format!("{name}.speed"))?;
        self.max_turn_rate.validate(&format!("{name}.max_turn_rate"))
    }
}

/// Bees seeking wandering flowers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeesConfig {
    /// Flowers.
    pub flowers: WandererConfig,
    /// Number of bees.
    pub bees: usize,
    /// Bee speed cap.
    pub max_speed: f64,
    /// Pull towards the nearest flower.
    pub acceleration: f64,
    /// Separation distance between bees.
    pub min_distance: f64,
    /// Separation push at contact.
    pub repulsion_strength: f64,
    /// Speed kept after bouncing off an edge.
    pub restitution: f64,
}

impl Default for BeesConfig {
    fn default() -> Self {
        Self {
            flowers: WandererConfig::default(),
            bees: 128,
            max_speed: 1.5,
            acceleration: 0.05,
            min_distance: 80.0,
            repulsion_strength: 0.2,
            restitution: 0.8,
        }
    }
}

impl BeesConfig {
    fn validate(&self) -> Result<()> {
        self.flowers.validate("bees.flowers")?;
        non_negative("bees.max_speed", self.max_speed)?;
        non_negative("bees.acceleration", self.acceleration)?;
        non_negative("bees.min_distance", self.min_distance)?;
        non_negative("bees.repulsion_strength", self.repulsion_strength)?;
        non_negative("bees.restitution", self.restitution)
    }
}

/// Three equally tuned populations chasing each other in a ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RockPaperScissorsConfig {
    /// Tuning of each of the three populations.
    pub each: ChaserConfig,
}

impl Default for RockPaperScissorsConfig {
    fn default() -> Self {
        Self {
            each: ChaserConfig {
                count: 30,
                max_speed: Span::new(1.5, 2.5),
                repulsion_strength: 0.1,
                ..ChaserConfig::default()
            },
        }
    }
}

impl RockPaperScissorsConfig {
    fn validate(&self) -> Result<()> {
        self.each.validate("rock_paper_scissors.each")
    }
}

/// Dogs chase cats, cats chase mice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodChainConfig {
    /// Top of the chain.
    pub dogs: ChaserConfig,
    /// Middle of the chain.
    pub cats: ChaserConfig,
    /// Bottom of the chain.
    pub mice: ChaserConfig,
}

impl Default for FoodChainConfig {
    fn default() -> Self {
        Self {
            dogs: ChaserConfig {
                count: 20,
                max_speed: Span::fixed(1.5),
                repulsion_strength: 1.0,
                ..ChaserConfig::default()
            },
            cats: ChaserConfig {
                count: 30,
                max_speed: Span::fixed(2.0),
                repulsion_strength: 0.5,
                ..ChaserConfig::default()
            },
            mice: ChaserConfig {
                count: 40,
                max_speed: Span::fixed(5.0),
                repulsion_strength: 0.35,
                ..ChaserConfig::default()
            },
        }
    }
}

impl FoodChainConfig {
    fn validate(&self) -> Result<()> {
        self.dogs.validate("food_chain.dogs")?;
        self.cats.validate("food_chain.cats")?;
        self.mice.validate("food_chain.mice")
    }
}

/// Spaceships pulled by wandering planets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceConfig {
    /// Planet motion.
    pub planets: WandererConfig,
    /// Relative planet size, drawn per planet.
    pub planet_size: Span,
    /// Number of spaceships.
    pub spaceships: usize,
    /// Spaceship speed cap; initial velocities lie within half of it per axis.
    pub max_speed: f64,
    /// Per-frame velocity retention.
    pub drag: f64,
    /// Spaceship collision radius.
    pub radius: f64,
    /// Gravitational constant.
    pub gravity: f64,
    /// Planets at or beyond this distance do not pull.
    pub max_gravity_distance: f64,
    /// How many planets pull each spaceship.
    pub attractor_count: usize,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            planets: WandererConfig {
                count: 10,
                speed: Span::new(0.2, 0.5),
                max_turn_rate: Span::new(0.02, 0.05),
            },
            planet_size: Span::new(0.8, 2.3),
            spaceships: 50,
            max_speed: 2.0,
            drag: 0.999,
            radius: 12.0,
            gravity: 10.0,
            max_gravity_distance: 500.0,
            attractor_count: 3,
        }
    }
}

impl SpaceConfig {
    fn validate(&self) -> Result<()> {
        self.planets.validate("space.planets")?;
        self.planet_size.validate("space.planet_size")?;
        non_negative("space.max_speed", self.max_speed)?;
        non_negative("space.radius", self.radius)?;
        non_negative("space.gravity", self.gravity)?;
        non_negative("space.max_gravity_distance", self.max_gravity_distance)?;
        if !(0.0..=1.0).contains(&self.drag) {
            return Err(invalid(format!(
                "space.drag must lie in [0, 1], got {}",
                self.drag
            )));
        }
        Ok(())
    }
}

/// Cars on two axes stopping for wandering red lights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    /// Red light motion.
    pub red_lights: WandererConfig,
    /// Number of cars driving up and down.
    pub vertical_cars: usize,
    /// Number of cars driving left and right.
    pub horizontal_cars: usize,
    /// Cruising speed, drawn per car.
    pub car_speed: Span,
    /// Cars stop while a red light is closer than this.
    pub stop_distance: f64,
    /// Horizontal cars stop while a vertical car is closer than this.
    pub yield_distance: f64,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            red_lights: WandererConfig {
                count: 6,
                speed: Span::new(3.0, 5.0),
                max_turn_rate: Span::new(0.03, 0.07),
            },
            vertical_cars: 120,
            horizontal_cars: 80,
            car_speed: Span::new(2.0, 4.0),
            stop_distance: 120.0,
            yield_distance: 80.0,
        }
    }
}

impl TrafficConfig {
    fn validate(&self) -> Result<()> {
        self.red_lights.validate("traffic.red_lights")?;
        self.car_speed.validate("traffic.car_speed")?;
        non_negative("traffic.stop_distance", self.stop_distance)?;
        non_negative("traffic.yield_distance", self.yield_distance)
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be finite and >= 0, got {value}")))
    }
}

fn invalid(message: String) -> SwarmError {
    SwarmError::InvalidConfig(message)
}
