use clap::Parser;
use splash_sim_core::{
    Appearance, ConfigResult, EntityKind, FixedTimestep, FrameClock, RenderSink, RunSummary,
    Scene, SceneConfig, SimulationDriver, WallClock,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Headless rain and splash simulation
#[derive(Parser, Debug)]
#[command(name = "splash-sim-demo")]
#[command(about = "Falling water drops with triggered splashes, no window", long_about = None)]
struct Args {
    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Fixed timestep in seconds (also the frame pacing for --wall-clock)
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Random seed (omit for an OS-seeded run)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Fire the splash trigger every N frames (0 = never)
    #[arg(long, default_value_t = 60)]
    splash_every: u64,

    /// Override the per-frame drop spawn probability (0-1)
    #[arg(short = 'p', long)]
    spawn_probability: Option<f32>,

    /// Load scene configuration from a JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a report row every N frames
    #[arg(short, long, default_value_t = 60)]
    report_interval: u64,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Measure real elapsed time instead of using the fixed timestep
    #[arg(long)]
    wall_clock: bool,
}

/// Render sink that tallies what would have been drawn
#[derive(Debug)]
struct TallySink {
    drops: usize,
    splashes: usize,
    lowest_drop: f32,
}

impl Default for TallySink {
    fn default() -> Self {
        TallySink {
            drops: 0,
            splashes: 0,
            lowest_drop: f32::INFINITY,
        }
    }
}

impl RenderSink for TallySink {
    fn draw(&mut self, appearance: &Appearance) {
        match appearance.kind {
            EntityKind::WaterDrop => {
                self.drops += 1;
                self.lowest_drop = self.lowest_drop.min(appearance.position.y);
            }
            EntityKind::SplashParticle => self.splashes += 1,
        }
    }
}

/// Wall clock that sleeps out each frame so the run advances in real time
struct PacedClock {
    inner: WallClock,
    frame: Duration,
}

impl FrameClock for PacedClock {
    fn tick(&mut self) -> f32 {
        std::thread::sleep(self.frame);
        self.inner.tick()
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn load_config(args: &Args) -> ConfigResult<SceneConfig> {
    let mut config = match &args.config {
        Some(path) => {
            println!("Loading config from {}", path.display());
            SceneConfig::from_json_file(path)?
        }
        None => SceneConfig::default(),
    };
    if let Some(p) = args.spawn_probability {
        config.spawn_probability = p;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> ConfigResult<()> {
    println!("=== Splash Simulation Demo ===\n");

    let config = load_config(args)?;
    let scene = match args.seed {
        Some(seed) => {
            println!("Seed: {}", seed);
            Scene::seeded(config, seed)?
        }
        None => {
            println!("Seed: OS entropy");
            Scene::new(config)?
        }
    };

    let config = scene.config();
    println!(
        "Spawn probability: {:.3}/frame, floor: {:.2} m, splash lifetime: {:.2} s",
        config.spawn_probability, config.floor_y, config.splash_time_to_live
    );
    if args.splash_every == 0 {
        println!("Splash trigger: disabled");
    } else {
        println!("Splash trigger: every {} frames", args.splash_every);
    }

    let mut clock: Box<dyn FrameClock> = if args.wall_clock {
        println!("Clock: wall time, paced at {:.4} s", args.dt);
        Box::new(PacedClock {
            inner: WallClock::new(),
            frame: Duration::try_from_secs_f32(args.dt).unwrap_or_default(),
        })
    } else {
        println!("Clock: fixed {:.4} s", args.dt);
        Box::new(FixedTimestep::new(args.dt))
    };

    let mut driver = SimulationDriver::new(scene);
    let mut sink = TallySink::default();
    let mut total = RunSummary::default();
    let splash_every = args.splash_every;
    let interval = args.report_interval.max(1);
    let started = Instant::now();

    println!("\nRunning {} frames...\n", args.frames);
    println!("  Frame |  Time(s) | Drops | Splashes | Pending | Spawned | Expired");
    println!("--------|----------|-------|----------|---------|---------|--------");

    while total.frames < args.frames {
        let chunk = interval.min(args.frames - total.frames);
        let part = driver.run(
            clock.as_mut(),
            chunk,
            |frame| splash_every != 0 && frame % splash_every == 0,
            &mut sink,
        );
        total.merge(&part);

        let stats = driver.scene().stats();
        println!(
            "{:7} | {:8.2} | {:5} | {:8} | {:7} | {:7} | {:7}",
            stats.frames,
            stats.simulation_time,
            stats.live_drops,
            stats.live_splashes,
            stats.pending,
            stats.total_spawned,
            stats.total_expired
        );
    }

    let stats = driver.scene().stats();
    println!("\n=== Simulation Complete ===");
    println!("Frames: {} ({:.2} s simulated)", total.frames, stats.simulation_time);
    println!("Drops spawned: {}", total.drops_spawned);
    println!(
        "Splash triggers: {} ({} particles)",
        total.triggers, total.splashes_spawned
    );
    println!("Entities expired: {}", total.expired);
    println!("Peak live entities: {}", total.peak_live);
    println!(
        "Draw calls: {} drops, {} splashes",
        sink.drops, sink.splashes
    );
    if sink.lowest_drop.is_finite() {
        println!("Lowest drawn drop: {:.3} m", sink.lowest_drop);
    }
    println!("Wall time: {:.3} s", started.elapsed().as_secs_f32());

    info!(
        frames = total.frames,
        live = driver.scene().len(),
        "Demo finished"
    );

    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(&args.log_level);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
