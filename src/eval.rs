//! Parallel fitness evaluation
//!
//! Every (policy, trial) pair runs in its own [`Environment`] on its own PCG
//! stream, so results are identical no matter how rayon schedules the work.
//! A policy's fitness is its worst trial.

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::env::Environment;
use crate::error::{Result, SimError};
use crate::policy::Policy;
use crate::sim::Termination;
use crate::sim::state::RngState;

/// Evaluation harness settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Trials per policy; fitness is the minimum across them
    pub runs_per_policy: u32,
    /// Worker threads (None = rayon's global pool)
    pub workers: Option<usize>,
    /// PCG seed shared by all trials; trials differ by stream
    pub base_seed: u64,
    /// Optional hard cap on ticks per trial
    pub tick_limit: Option<u64>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            runs_per_policy: 5,
            workers: Some(4),
            base_seed: 0,
            tick_limit: None,
        }
    }
}

impl EvalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.runs_per_policy == 0 {
            return Err(SimError::InvalidConfig(
                "runs_per_policy must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// PCG stream for a given policy index and trial
    pub fn stream(&self, policy_index: usize, trial: u32) -> u64 {
        policy_index as u64 * u64::from(self.runs_per_policy) + u64::from(trial)
    }
}

/// Outcome of one episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// Score after the last surviving tick
    pub fitness: u64,
    /// Ticks stepped, including the fatal one
    pub ticks: u64,
    /// How the episode ended; None when the tick limit stopped it
    pub termination: Option<Termination>,
}

/// Fitness of one policy across its trials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyFitness {
    /// Position of the policy in the evaluated population
    pub index: usize,
    /// Worst trial fitness
    pub fitness: u64,
    pub episodes: Vec<EpisodeReport>,
}

/// Drive `policy` from the environment's current state until it dies
pub fn run_episode<P: Policy + ?Sized>(
    env: &mut Environment,
    policy: &P,
    tick_limit: Option<u64>,
) -> EpisodeReport {
    let mut fitness = 0;
    let mut ticks = 0;
    let mut termination = None;

    loop {
        if tick_limit.is_some_and(|limit| ticks >= limit) {
            break;
        }
        let action = policy.act(env.observe());
        ticks += 1;
        if !env.step(action) {
            termination = env.termination();
            break;
        }
        fitness = env.score();
    }

    log::debug!(
        "episode ended after {} ticks: fitness={} termination={:?}",
        ticks,
        fitness,
        termination
    );

    EpisodeReport {
        fitness,
        ticks,
        termination,
    }
}

/// Run every trial of one policy and keep the worst fitness
pub fn evaluate_policy<P: Policy + ?Sized>(
    policy: &P,
    sim: &SimConfig,
    eval: &EvalConfig,
    index: usize,
) -> Result<PolicyFitness> {
    eval.validate()?;

    let episodes = (0..eval.runs_per_policy)
        .into_par_iter()
        .map(|trial| -> Result<EpisodeReport> {
            let rng_state = RngState::with_stream(eval.base_seed, eval.stream(index, trial));
            let mut env = Environment::with_rng_state(sim.clone(), rng_state)?;
            Ok(run_episode(&mut env, policy, eval.tick_limit))
        })
        .collect::<Result<Vec<_>>>()?;

    let fitness = episodes.iter().map(|e| e.fitness).min().unwrap_or(0);

    Ok(PolicyFitness {
        index,
        fitness,
        episodes,
    })
}

/// Evaluate a population of policies in parallel
///
/// Results come back in population order.
pub fn evaluate_population<P: Policy>(
    policies: &[P],
    sim: &SimConfig,
    eval: &EvalConfig,
) -> Result<Vec<PolicyFitness>> {
    sim.validate()?;
    eval.validate()?;

    let run = || {
        policies
            .par_iter()
            .enumerate()
            .map(|(index, policy)| evaluate_policy(policy, sim, eval, index))
            .collect::<Result<Vec<_>>>()
    };

    let results = match eval.workers {
        Some(workers) => ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()?
            .install(run)?,
        None => run()?,
    };

    if let Some(best) = results.iter().max_by_key(|r| r.fitness) {
        log::info!(
            "evaluated {} policies x {} runs: best #{} fitness={}",
            results.len(),
            eval.runs_per_policy,
            best.index,
            best.fitness
        );
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Action, GapFollower};
    use crate::sim::Observation;

    fn wait(_: Observation) -> Action {
        Action::Wait
    }

    #[test]
    fn test_free_fall_episode() {
        // Falling from 300 reaches the floor (560) on tick 33
        let mut env = Environment::new(SimConfig::default(), 0).expect("valid");
        let report = run_episode(&mut env, &wait, None);
        assert_eq!(report.ticks, 33);
        assert_eq!(report.fitness, 64);
        assert_eq!(report.termination, Some(Termination::OutOfBounds));
    }

    #[test]
    fn test_tick_limit_stops_episode() {
        let mut env = Environment::new(SimConfig::default(), 0).expect("valid");
        let report = run_episode(&mut env, &wait, Some(10));
        assert_eq!(report.ticks, 10);
        assert_eq!(report.fitness, 20);
        assert_eq!(report.termination, None);
    }

    #[test]
    fn test_score_cap_is_success() {
        let sim = SimConfig {
            max_score: 20,
            ..SimConfig::default()
        };
        let mut env = Environment::new(sim, 0).expect("valid");
        let report = run_episode(&mut env, &wait, None);
        assert_eq!(report.ticks, 11);
        assert_eq!(report.fitness, 20);
        assert_eq!(report.termination, Some(Termination::ScoreCap));
        assert!(report.termination.is_some_and(|t| t.is_success()));
    }

    #[test]
    fn test_fitness_is_worst_trial() {
        let eval = EvalConfig {
            runs_per_policy: 4,
            workers: None,
            base_seed: 11,
            tick_limit: Some(2_000),
        };
        let result = evaluate_policy(&GapFollower::default(), &SimConfig::default(), &eval, 0)
            .expect("evaluates");
        assert_eq!(result.episodes.len(), 4);
        let worst = result.episodes.iter().map(|e| e.fitness).min();
        assert_eq!(Some(result.fitness), worst);
    }

    #[test]
    fn test_zero_runs_rejected() {
        let eval = EvalConfig {
            runs_per_policy: 0,
            ..EvalConfig::default()
        };
        let policies = [GapFollower::default()];
        assert!(matches!(
            evaluate_population(&policies, &SimConfig::default(), &eval),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_results_independent_of_worker_count() {
        let policies: Vec<GapFollower> = [0.0, 0.02, 0.05, 0.1]
            .into_iter()
            .map(|margin| GapFollower { margin })
            .collect();
        let sim = SimConfig::default();
        let single = EvalConfig {
            runs_per_policy: 3,
            workers: Some(1),
            base_seed: 7,
            tick_limit: Some(3_000),
        };
        let pooled = EvalConfig {
            workers: Some(4),
            ..single.clone()
        };

        let a = evaluate_population(&policies, &sim, &single).expect("evaluates");
        let b = evaluate_population(&policies, &sim, &pooled).expect("evaluates");
        assert_eq!(a, b);
        assert_eq!(a.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_trials_use_distinct_streams() {
        let eval = EvalConfig {
            runs_per_policy: 5,
            ..EvalConfig::default()
        };
        assert_eq!(eval.stream(0, 0), 0);
        assert_eq!(eval.stream(0, 4), 4);
        assert_eq!(eval.stream(1, 0), 5);
        assert_eq!(eval.stream(2, 3), 13);
    }
}
