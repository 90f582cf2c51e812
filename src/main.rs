use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use forage_core::batch::run_batch;
use forage_core::config::SimConfig;
use forage_core::metrics;
use forage_core::simulation::Simulation;
use forage_io::{archive_file_name, load_config, load_experiments, StatsArchive};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Evolutionary foraging simulator", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single simulation and save its statistics
    Run {
        /// Config file path; defaults are used if it does not exist
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// Number of days to simulate (overrides `world.max_days`)
        #[arg(short, long)]
        days: Option<u32>,

        /// RNG seed (overrides `world.seed`)
        #[arg(short, long)]
        seed: Option<u64>,

        #[arg(short, long, default_value = "stats.json.gz")]
        output: PathBuf,
    },
    /// Run every experiment of a plan in parallel
    Batch {
        /// Experiment plan (TOML with `[[experiment]]` tables)
        #[arg(short, long, default_value = "experiments.toml")]
        experiments: PathBuf,

        /// Base config for everything but the population
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        #[arg(short, long, default_value_t = 500)]
        days: u32,

        #[arg(short, long)]
        seed: Option<u64>,

        /// Directory receiving one archive per run
        #[arg(short, long, default_value = "runs")]
        output: PathBuf,
    },
}

fn base_config(path: &Path, seed: Option<u64>) -> Result<SimConfig> {
    let mut config = if path.exists() {
        load_config(path).with_context(|| format!("loading {}", path.display()))?
    } else {
        tracing::info!(path = %path.display(), "Config file not found, using defaults");
        SimConfig::default()
    };
    if seed.is_some() {
        config.world.seed = seed;
    }
    Ok(config)
}

fn main() -> Result<()> {
    metrics::init_logging();
    let args = Args::parse();

    match args.command {
        Command::Run {
            config,
            days,
            seed,
            output,
        } => {
            let config = base_config(&config, seed)?;
            let mut sim = Simulation::new(config.clone())?;
            let stats = sim.run(days);

            let archive = StatsArchive::new("run", &config, Some(sim.seed()), stats);
            archive.save(&output)?;
            println!(
                "Simulated {} days, final population {}. Statistics saved to {}",
                sim.day(),
                sim.population(),
                output.display()
            );
        }
        Command::Batch {
            experiments,
            config,
            days,
            seed,
            output,
        } => {
            let plan = load_experiments(&experiments)?;
            let config = base_config(&config, seed)?;
            std::fs::create_dir_all(&output)?;

            let runs = run_batch(&config, &plan, days)?;
            for run in &runs {
                let path = output.join(archive_file_name(&run.name, run.repeat));
                let archive =
                    StatsArchive::new(run.name.clone(), &config, Some(run.seed), run.stats.clone());
                archive.save(&path)?;
            }
            println!("Saved {} runs to {}", runs.len(), output.display());
        }
    }

    Ok(())
}
