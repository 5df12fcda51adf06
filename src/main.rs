use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, error, info, trace, warn};
use particle_life::{history, Config, SimulationWorld, Snapshot, SnapshotStore, DEFAULT_GROUP_SIZE};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Messagepack,
}

/// Headless particle life run: simulate, keep a snapshot history, export it.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Optional config.toml; stock parameters are used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of steps (frames) to simulate
    #[arg(long, default_value_t = 600)]
    steps: u32,

    /// Seed for placement and gains (entropy if not given)
    #[arg(long)]
    seed: Option<u64>,

    /// Particles per palette color
    #[arg(long, default_value_t = DEFAULT_GROUP_SIZE)]
    per_group: usize,

    /// Capture a snapshot every N steps
    #[arg(long, default_value_t = 60)]
    capture_every: u32,

    /// Snapshot history export format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Base name for output files
    #[arg(short, long, default_value = "particle_life")]
    output: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("Starting particle life (headless)...");

    // --- Load Configuration ---
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => {
            info!("No config file given, using stock parameters.");
            Config::default()
        }
    };
    debug!("Configuration: {:#?}", config);

    // --- Initialize World ---
    let mut world = match args.seed {
        Some(seed) => SimulationWorld::with_seed(seed),
        None => SimulationWorld::new(),
    };
    world.populate_default(args.per_group, &config)?;
    info!("World initialized with {} particles in {} groups.", world.particle_count(), world.groups().len());

    let mut store = SnapshotStore::new();
    capture(&mut store, &world, &config);

    // --- Simulation Loop ---
    let capture_every = if args.capture_every == 0 {
        warn!("capture_every is 0, capturing every step.");
        1
    } else {
        args.capture_every
    };

    info!("Starting simulation loop for {} steps...", args.steps);
    let start_time = Instant::now();
    let mut previous_print_time = start_time;

    for step in 0..args.steps {
        let step_start_time = Instant::now();
        world.step(&config);
        let step_duration = step_start_time.elapsed();

        let is_capture_step = (step + 1) % capture_every == 0;
        let should_print_status = previous_print_time.elapsed().as_secs_f64() >= 5.0;

        if should_print_status || is_capture_step {
            let pressure = world.collision_pressure();
            info!(
                "Step [{}/{}] | Collisions: {} (intensity {:.3}) | Step Time: {:6.2} ms | Elapsed: {:.2} s",
                step + 1,
                args.steps,
                pressure.collisions,
                pressure.intensity(world.particle_count()),
                step_duration.as_secs_f64() * 1000.0,
                start_time.elapsed().as_secs_f64()
            );
            previous_print_time = Instant::now();
            if is_capture_step {
                capture(&mut store, &world, &config);
            }
        } else {
            trace!("Step [{}/{}] completed in {:.2} ms", step + 1, args.steps, step_duration.as_secs_f64() * 1000.0);
        }
    }

    info!("Simulation finished in {:.3} seconds.", start_time.elapsed().as_secs_f64());

    // Check the newest capture decodes and applies cleanly before exporting it.
    if let Some(latest) = store.latest().cloned() {
        let encoded = history::encode(&latest)?;
        let decoded = history::decode(&encoded)?;
        let mut replay = SimulationWorld::new();
        let mut replay_config = config.clone();
        SnapshotStore::restore(&mut replay, &mut replay_config, &decoded)?;
        debug!("Latest snapshot verified ({} particles).", replay.particle_count());

        let filename = format!("{}_latest.snapshot", args.output);
        std::fs::write(&filename, encoded).with_context(|| format!("Failed to write '{}'", filename))?;
        info!("Latest snapshot saved to {}", filename);
    }

    // --- Save Recorded Data ---
    let snapshots: Vec<Snapshot> = store.snapshots().cloned().collect();
    save_history(&snapshots, args.format, &args.output)?;
    save_final_positions(&world, &args.output)?;

    info!("Simulation Complete.");
    Ok(())
}

fn capture(store: &mut SnapshotStore, world: &SimulationWorld, config: &Config) {
    if let Err(e) = store.capture_and_push(world, config) {
        error!("Error capturing snapshot: {}", e);
    }
}

fn save_history(snapshots: &[Snapshot], format: OutputFormat, base: &str) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let filename = format!("{}_snapshots.json", base);
            let mut file = File::create(&filename).with_context(|| format!("Error creating snapshot file '{}'", filename))?;
            let json_string = serde_json::to_string(snapshots).context("Error serializing snapshots to JSON")?;
            file.write_all(json_string.as_bytes())
                .with_context(|| format!("Error writing snapshot JSON to file '{}'", filename))?;
            info!("{} snapshots saved to {}", snapshots.len(), filename);
        }
        OutputFormat::Messagepack => {
            let filename = format!("{}_snapshots.msgpack", base);
            let mut file =
                File::create(&filename).with_context(|| format!("Error creating snapshot file '{}'", filename))?;
            rmp_serde::encode::write_named(&mut file, snapshots).context("Error serializing snapshots to MessagePack")?;
            info!("{} snapshots saved to {} (MessagePack format)", snapshots.len(), filename);
        }
    }
    Ok(())
}

fn save_final_positions(world: &SimulationWorld, base: &str) -> Result<()> {
    let filename = format!("{}_final_positions.csv", base);
    let mut writer = csv::Writer::from_path(&filename).with_context(|| format!("Error creating CSV file '{}'", filename))?;
    writer.write_record(["group", "x", "y", "z", "radius"])?;
    for particle in world.particles() {
        writer.write_record([
            world.group_color(particle).to_string(),
            format!("{:.4}", particle.position.x),
            format!("{:.4}", particle.position.y),
            format!("{:.4}", particle.position.z),
            format!("{:.2}", particle.radius),
        ])?;
    }
    writer.flush()?;
    info!("Final positions saved to {}", filename);
    Ok(())
}
