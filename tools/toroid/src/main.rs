//! Terminal driver for toroidal rule-table automata.
//!
//!   `toroid elementary --rule 30 --cells 101 --generations 50`
//!   `toroid live --dim 2 --width 40 --height 20 --rule 4294967294 --frames 10`
//!   `toroid live --dim 3 --words 621375902,2960227347,4095321793,2586228668`
//!   `toroid config scene.json`
//!
//! Logging goes to stderr; set `--log-level debug` or `RUST_LOG` for details.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use rhizome_resin_toroid::{
    Dimensionality, Extents, RuleId, SeedMode, Simulation, SimulationConfig, elementary_rules,
    history_art, rules_2d, rules_3d,
};
use std::path::{Path, PathBuf};
use std::{fs, thread};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(name = "toroid", version, about = "Toroidal cellular automata in the terminal")]
struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a 1D automaton as a stack of generations.
    Elementary {
        /// Rule number (0-255).
        #[arg(long, default_value_t = elementary_rules::RULE_30)]
        rule: u64,
        /// Number of cells per generation.
        #[arg(long, default_value_t = 201)]
        cells: usize,
        /// Number of generations (rows) to print.
        #[arg(long, default_value_t = 200)]
        generations: usize,
    },
    /// Print successive generations of a 2D or 3D automaton.
    Live(LiveArgs),
    /// Run the simulation described by a JSON configuration file.
    Config {
        /// Path to a serialized `SimulationConfig`.
        path: PathBuf,
        /// Generations to print after the first (live mode only).
        #[arg(long, default_value_t = 20)]
        frames: usize,
    },
}

#[derive(Debug, Args)]
struct LiveArgs {
    /// Dimensionality (2 or 3).
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=3))]
    dim: u8,
    /// Lattice width.
    #[arg(long, default_value_t = 17)]
    width: usize,
    /// Lattice height.
    #[arg(long, default_value_t = 17)]
    height: usize,
    /// Lattice depth (3D only).
    #[arg(long, default_value_t = 17)]
    depth: usize,
    /// Rule number.
    #[arg(long, conflicts_with = "words")]
    rule: Option<u64>,
    /// Rule as comma-separated 32-bit words, word 0 first.
    #[arg(long, value_delimiter = ',')]
    words: Option<Vec<u32>>,
    /// Generations per second.
    #[arg(long, default_value_t = 10)]
    fps: u32,
    /// Generations to print after the first.
    #[arg(long, default_value_t = 20)]
    frames: usize,
    /// Seed randomly; each cell stays empty with this probability.
    #[arg(long)]
    random: Option<f32>,
    /// Seed for the random fill.
    #[arg(long, requires = "random")]
    seed: Option<u64>,
}

impl LiveArgs {
    fn to_config(&self) -> SimulationConfig {
        let extents = match self.dim {
            2 => Extents::D2(self.width, self.height),
            _ => Extents::D3(self.width, self.height, self.depth),
        };
        let rule = match (&self.words, self.rule) {
            (Some(words), _) => RuleId::Words(words.clone()),
            (None, Some(rule)) => RuleId::Number(rule),
            (None, None) if self.dim == 2 => RuleId::Number(rules_2d::GROWTH),
            (None, None) => RuleId::from(rules_3d::DEFAULT),
        };
        let seed = match self.random {
            Some(density) => SeedMode::Random {
                density,
                seed: self.seed,
            },
            None => SeedMode::Center,
        };
        SimulationConfig::new(extents, rule)
            .with_fps(self.fps)
            .with_seed(seed)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Command::Elementary {
            rule,
            cells,
            generations,
        } => {
            let config = SimulationConfig::elementary(cells, rule).with_generations(generations);
            print_history(&config)
        }
        Command::Live(args) => run_live(&args.to_config(), args.frames),
        Command::Config { path, frames } => {
            let config = load_config(&path)?;
            match config.extents.dimensionality() {
                Dimensionality::One => print_history(&config),
                _ => run_live(&config, frames),
            }
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &Path) -> Result<SimulationConfig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Prints the whole precomputed stack, one generation per row.
fn print_history(config: &SimulationConfig) -> Result<()> {
    if config.extents.dimensionality() != Dimensionality::One {
        bail!("history mode needs a 1D configuration, got {}", config.extents);
    }
    let sim = Simulation::new(config.clone()).context("invalid configuration")?;
    print!("{}", history_art(&sim.history()));
    Ok(())
}

/// Prints generation 0, then one generation per frame interval.
fn run_live(config: &SimulationConfig, frames: usize) -> Result<()> {
    let mut sim = Simulation::new(config.clone()).context("invalid configuration")?;
    let interval = config.frame_interval();
    info!(?interval, frames, "running live");

    print_frame(&sim);
    for _ in 0..frames {
        thread::sleep(interval);
        if sim.tick().is_none() {
            break;
        }
        print_frame(&sim);
    }
    Ok(())
}

fn print_frame(sim: &Simulation) {
    let lattice = sim.lattice();
    println!(
        "generation {} ({} filled)",
        sim.generation(),
        lattice.population()
    );
    println!("{}", lattice.to_string_art());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_elementary_defaults() {
        let cli = Cli::try_parse_from(["toroid", "elementary"]).unwrap();
        match cli.command {
            Command::Elementary {
                rule,
                cells,
                generations,
            } => {
                assert_eq!(rule, 30);
                assert_eq!(cells, 201);
                assert_eq!(generations, 200);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_live_words() {
        let cli = Cli::try_parse_from(["toroid", "live", "--dim", "3", "--words", "1,2,3,4"]).unwrap();
        let Command::Live(args) = cli.command else {
            panic!("expected live");
        };
        let config = args.to_config();
        assert_eq!(config.extents, Extents::D3(17, 17, 17));
        assert_eq!(config.rule, RuleId::Words(vec![1, 2, 3, 4]));
        assert_eq!(config.validate().unwrap().len(), 128);
    }

    #[test]
    fn test_live_random_seed() {
        let cli = Cli::try_parse_from([
            "toroid", "live", "--width", "8", "--height", "4", "--rule", "7", "--random", "0.25",
            "--seed", "9",
        ])
        .unwrap();
        let Command::Live(args) = cli.command else {
            panic!("expected live");
        };
        let config = args.to_config();
        assert_eq!(config.extents, Extents::D2(8, 4));
        assert_eq!(
            config.seed,
            SeedMode::Random {
                density: 0.25,
                seed: Some(9)
            }
        );
    }

    #[test]
    fn test_live_rejects_dim_one() {
        assert!(Cli::try_parse_from(["toroid", "live", "--dim", "1"]).is_err());
    }

    #[test]
    fn test_rule_and_words_conflict() {
        assert!(Cli::try_parse_from(["toroid", "live", "--rule", "1", "--words", "1"]).is_err());
    }

    #[test]
    fn test_demo_configs_parse() {
        let scene: SimulationConfig =
            serde_json::from_str(include_str!("../../../demos/scene_3d.json")).unwrap();
        assert_eq!(scene, SimulationConfig::default_3d().with_fps(10));

        let rule_30: SimulationConfig =
            serde_json::from_str(include_str!("../../../demos/rule_30.json")).unwrap();
        assert_eq!(rule_30, SimulationConfig::elementary(101, 30).with_generations(50));

        let random: SimulationConfig =
            serde_json::from_str(include_str!("../../../demos/random_2d.json")).unwrap();
        assert_eq!(random.rule, RuleId::Number(rules_2d::PARITY));
        assert!(random.validate().is_ok());
    }

    #[test]
    fn test_history_rejects_live_config() {
        assert!(print_history(&SimulationConfig::planar(4, 4, 0)).is_err());
    }
}
