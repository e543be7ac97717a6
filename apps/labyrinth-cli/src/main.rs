use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec3;
use labyrinth_input::{FrameInput, KeyScript};
use labyrinth_kernel::{SimulationConfig, SimulationWorld};
use labyrinth_render::{DebugTextRenderer, RenderView, Renderer};
use labyrinth_tools::{FrameTimer, SimulationInspector};
use tracing_subscriber::EnvFilter;

/// Wall-clock budget of one 60 Hz frame.
const FRAME_BUDGET: Duration = Duration::from_micros(16_667);

#[derive(Parser)]
#[command(name = "labyrinth-cli", about = "Headless driver for the labyrinth simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the maze layout with spawns and the player start
    Maze {
        /// Optional YAML config
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the default configuration as YAML
    Config,
    /// Run a scripted session headlessly
    Run {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// RNG seed (overrides the config)
        #[arg(short, long)]
        seed: Option<u64>,
        /// Seconds per frame
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Optional YAML config
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Key script, e.g. "w*30,w+m,look:90:0,-*10"
        #[arg(long)]
        script: Option<String>,
        /// Print the final poses as JSON
        #[arg(long)]
        json: bool,
        /// Print a debug render of the final frame
        #[arg(long)]
        render: bool,
        /// Print the event log
        #[arg(long)]
        events: bool,
    },
    /// Run the same session twice and compare state hashes
    ReplayCheck {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Key script to drive both runs
        #[arg(long)]
        script: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("labyrinth-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("maze: {}", labyrinth_maze::crate_info());
            println!("input: {}", labyrinth_input::crate_info());
            println!("kernel: {}", labyrinth_kernel::crate_info());
            println!("render: {}", labyrinth_render::crate_info());
            println!("tools: {}", labyrinth_tools::crate_info());
        }
        Commands::Maze { config } => {
            let config = load_config(config.as_deref(), None)?;
            let world = SimulationWorld::new(config);
            println!("{}", ascii_map(&world));
            println!(
                "walls={} goal={:?} enemies={}",
                world.grid().wall_count(),
                world.grid().goal(),
                world.enemies().len()
            );
        }
        Commands::Config => {
            print!("{}", SimulationConfig::default().to_yaml()?);
        }
        Commands::Run {
            frames,
            seed,
            dt,
            config,
            script,
            json,
            render,
            events,
        } => {
            let config = load_config(config.as_deref(), seed)?;
            let inputs = scripted_inputs(script.as_deref(), frames)?;
            println!(
                "Running: seed={} frames={} dt={dt}",
                config.seed,
                inputs.len()
            );

            let mut world = SimulationWorld::new(config);
            let mut timer = FrameTimer::new(120);
            let mut last = world.poses();
            for input in &inputs {
                let start = Instant::now();
                last = world.advance(dt, input);
                timer.record(start.elapsed());
                if let Some(end) = world.take_session_end() {
                    println!("Session ended at tick {}: {end:?}", world.tick());
                    break;
                }
            }

            println!("{}", SimulationInspector::summary(&world));
            for enemy in SimulationInspector::enemies(&world) {
                println!("  {enemy}");
            }
            println!(
                "Timing: {timer} over_budget={}",
                timer.over_budget(FRAME_BUDGET)
            );
            println!("{}", ascii_map(&world));

            if events {
                for event in world.drain_events() {
                    println!("  {event:?}");
                }
            }
            if render {
                let view = RenderView::from(&last.camera);
                print!("{}", DebugTextRenderer::new().render(&last, &view));
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&last)?);
            }
        }
        Commands::ReplayCheck {
            frames,
            seed,
            script,
        } => {
            let inputs = scripted_inputs(script.as_deref(), frames)?;
            let run = || {
                let mut world = SimulationWorld::new(SimulationConfig::with_seed(seed));
                for input in &inputs {
                    world.advance(1.0 / 60.0, input);
                }
                (world.tick(), world.state_hash())
            };
            let (tick_a, hash_a) = run();
            let (tick_b, hash_b) = run();
            println!("Run 1: tick={tick_a} hash={hash_a:016x}");
            println!("Run 2: tick={tick_b} hash={hash_b:016x}");
            if tick_a != tick_b || hash_a != hash_b {
                anyhow::bail!("replay mismatch for seed {seed}");
            }
            println!("Match: OK");
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> anyhow::Result<SimulationConfig> {
    let mut config = match path {
        Some(p) => SimulationConfig::from_yaml_file(p)
            .with_context(|| format!("loading config {}", p.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    Ok(config)
}

/// Script frames padded (or cut) to `frames`.
fn scripted_inputs(script: Option<&str>, frames: u64) -> anyhow::Result<Vec<FrameInput>> {
    let mut inputs = match script {
        Some(src) => KeyScript::parse(src)
            .with_context(|| format!("parsing key script {src:?}"))?
            .frames(),
        None => Vec::new(),
    };
    inputs.resize(frames as usize, FrameInput::idle());
    Ok(inputs)
}

fn ascii_map(world: &SimulationWorld) -> String {
    let mut marks: Vec<(Vec3, char)> = world
        .config()
        .lava_tiles
        .iter()
        .filter(|_| world.config().capabilities.has_lava)
        .map(|t| (Vec3::new(t.x, 0.0, t.y), '~'))
        .collect();
    marks.extend(world.enemies().iter().map(|e| (e.position, 'E')));
    marks.push((world.camera().position, '@'));
    world.grid().render_ascii(&marks)
}
