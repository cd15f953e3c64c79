use std::process::ExitCode;

use clap::Parser;
use swarm::simulation::error::Result;
use swarm::simulation::geometry::length;
use swarm::simulation::params::Params;
use swarm::simulation::scenario::{self, ScenarioKind};
use swarm::simulation::session::Session;
use swarm::simulation::spatial::IndexStrategy;
use swarm::simulation::swarm::Swarm;

#[derive(Parser, Debug)]
#[command(
    name = "swarm",
    version,
    about = "Run an agent swarm scenario headless and log what happens"
)]
struct Cli {
    /// Scenario to run (bees, rock_paper_scissors, food_chain, space_gravity, traffic).
    scenario: Option<ScenarioKind>,

    /// JSON parameter file; missing fields keep their defaults.
    #[arg(short, long)]
    config: Option<String>,

    /// Number of frames to run.
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Override the RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the nearest-neighbor index (linear, quadtree, kdtree).
    #[arg(long)]
    strategy: Option<IndexStrategy>,

    /// Log a summary every this many frames.
    #[arg(long, default_value_t = 120)]
    report_every: u64,

    /// Write the effective parameters to this file before running.
    #[arg(long)]
    save_config: Option<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(&Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut params = match &cli.config {
        Some(path) => Params::load_from_file(path)?,
        None => Params::default(),
    };
    if let Some(scenario) = cli.scenario {
        params.scenario = scenario;
    }
    if let Some(seed) = cli.seed {
        params.seed = seed;
    }
    if let Some(strategy) = cli.strategy {
        params.strategy = strategy;
    }
    params.validate()?;

    if let Some(path) = &cli.save_config {
        params.save_to_file(path)?;
        log::info!("parameters written to {path}");
    }

    let (mut session, stop) = Session::start(scenario::build(&params)?);

    let report_every = cli.report_every.max(1);
    let frames = cli.frames;
    if frames > 0 {
        session.run_until_stopped(params.dt, |swarm| {
            let frame = swarm.frame();
            if frame % report_every == 0 || frame >= frames {
                report(swarm);
            }
            if frame >= frames {
                stop.stop();
            }
        });
    }

    log::info!(
        "finished {} frames of {} (t = {:.1})",
        session.swarm().frame(),
        params.scenario,
        session.swarm().time()
    );
    Ok(())
}

fn report(swarm: &Swarm) {
    let frame = swarm.render_frame();
    let count = frame.agents.len().max(1) as f64;
    let (sx, sy) = frame
        .agents
        .iter()
        .fold((0.0, 0.0), |(x, y), agent| (x + agent.position.x, y + agent.position.y));
    let speed: f64 = frame.agents.iter().map(|agent| length(agent.velocity)).sum();
    let links: usize = frame.agents.iter().map(|agent| agent.links.len()).sum();

    log::info!(
        "frame {}: {} agents, centroid ({:.1}, {:.1}), mean speed {:.2}, {} active links",
        frame.frame,
        frame.agents.len(),
        sx / count,
        sy / count,
        speed / count,
        links
    );
    for (id, group) in swarm.groups().iter() {
        log::debug!("group {} ({:?}): {} members", group.name(), id, group.size());
    }
}
