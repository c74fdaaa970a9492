//! Flappy Sim entry point
//!
//! Runs the reference gap-following heuristic through the parallel evaluator
//! and prints the fitness report as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use flappy_sim::{EvalConfig, GapFollower, ResetPolicy, SimConfig, evaluate_population};

#[derive(Parser, Debug)]
#[command(version, about = "Evaluate gap-following policies in the flappy simulation")]
struct Cli {
    /// JSON simulation config; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base PCG seed shared by every trial
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of heuristic policies to evaluate
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
    policies: u32,

    /// Obstacle handling on reset (clear | keep)
    #[arg(long, value_parser = parse_reset_policy)]
    reset: Option<ResetPolicy>,
}

fn parse_reset_policy(s: &str) -> Result<ResetPolicy, String> {
    ResetPolicy::from_str(s).ok_or_else(|| format!("expected `clear` or `keep`, got `{s}`"))
}

fn run(cli: Cli) -> flappy_sim::Result<()> {
    let mut sim = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            SimConfig::from_json(&json)?
        }
        None => SimConfig::default(),
    };
    if let Some(reset) = cli.reset {
        sim.reset_policy = reset;
    }
    sim.validate()?;
    log::info!("Simulation config:\n{}", sim.to_json()?);

    let eval = EvalConfig {
        base_seed: cli.seed,
        ..EvalConfig::default()
    };

    // Spread margins over [0, 0.1)
    let count = cli.policies;
    let policies: Vec<GapFollower> = (0..count)
        .map(|i| GapFollower {
            margin: 0.1 * i as f32 / count as f32,
        })
        .collect();

    let results = evaluate_population(&policies, &sim, &eval)?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::init();
    log::info!("Flappy Sim starting...");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
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
    fn test_defaults() {
        let cli = Cli::try_parse_from(["flappy-sim"]).expect("no flags needed");
        assert_eq!(cli.config, None);
        assert_eq!(cli.seed, 0);
        assert_eq!(cli.policies, 4);
        assert_eq!(cli.reset, None);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "flappy-sim",
            "--config",
            "sim.json",
            "--seed",
            "42",
            "--policies",
            "8",
            "--reset",
            "keep",
        ])
        .expect("valid flags");
        assert_eq!(cli.config, Some(PathBuf::from("sim.json")));
        assert_eq!(cli.seed, 42);
        assert_eq!(cli.policies, 8);
        assert_eq!(cli.reset, Some(ResetPolicy::KeepObstacles));
    }

    #[test]
    fn test_bad_flags_rejected() {
        assert!(Cli::try_parse_from(["flappy-sim", "--reset", "maybe"]).is_err());
        assert!(Cli::try_parse_from(["flappy-sim", "--seed", "-1"]).is_err());
        assert!(Cli::try_parse_from(["flappy-sim", "--policies", "0"]).is_err());
        assert!(Cli::try_parse_from(["flappy-sim", "--seed"]).is_err());
        assert!(Cli::try_parse_from(["flappy-sim", "--frames", "3"]).is_err());
    }
}
