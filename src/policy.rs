//! Actions and the controller seam
//!
//! Controllers speak in loosely typed actions (integers, booleans, raw network
//! outputs). All of them are normalized into [`Action`] before they reach the
//! simulation: any nonzero value requests a flap.

use serde::{Deserialize, Serialize};

use crate::sim::Observation;

/// Discrete action for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Action {
    /// Do nothing
    #[default]
    Wait,
    /// Request a flap (ignored while on cooldown)
    Flap,
}

impl Action {
    #[inline]
    pub fn is_flap(&self) -> bool {
        matches!(self, Action::Flap)
    }

    /// Pick the action with the highest controller output
    ///
    /// Index 0 is "wait", every other index requests a flap. Ties go to the
    /// lowest index, NaN outputs never win, and an empty slice waits.
    pub fn from_outputs(outputs: &[f32]) -> Self {
        let mut best: Option<(usize, f32)> = None;
        for (i, &value) in outputs.iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((i, value)),
            }
        }
        match best {
            Some((index, _)) => Action::from(index),
            None => Action::Wait,
        }
    }
}

impl From<bool> for Action {
    fn from(flap: bool) -> Self {
        if flap { Action::Flap } else { Action::Wait }
    }
}

macro_rules! action_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Action {
                fn from(value: $t) -> Self {
                    Action::from(value != 0)
                }
            }
        )*
    };
}

action_from_int!(u8, i32, i64, u32, usize);

/// A controller mapping observations to actions
///
/// `Sync` so the evaluator can share one policy across worker threads.
pub trait Policy: Sync {
    fn act(&self, observation: Observation) -> Action;
}

impl<F> Policy for F
where
    F: Fn(Observation) -> Action + Sync,
{
    fn act(&self, observation: Observation) -> Action {
        self(observation)
    }
}

/// Reference heuristic: flap whenever the gap centre is above the body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapFollower {
    /// Normalized dead zone around "aligned" (0.5) before flapping
    pub margin: f32,
}

impl Default for GapFollower {
    fn default() -> Self {
        Self { margin: 0.02 }
    }
}

impl Policy for GapFollower {
    fn act(&self, observation: Observation) -> Action {
        Action::from(observation.dy < 0.5 - self.margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_normalization() {
        assert_eq!(Action::from(0i32), Action::Wait);
        assert_eq!(Action::from(1i32), Action::Flap);
        assert_eq!(Action::from(2i32), Action::Flap);
        assert_eq!(Action::from(-1i64), Action::Flap);
        assert_eq!(Action::from(255u8), Action::Flap);
        assert_eq!(Action::from(0usize), Action::Wait);
        assert_eq!(Action::from(true), Action::Flap);
        assert_eq!(Action::from(false), Action::Wait);
    }

    #[test]
    fn test_argmax_outputs() {
        assert_eq!(Action::from_outputs(&[0.9, 0.1]), Action::Wait);
        assert_eq!(Action::from_outputs(&[0.1, 0.9]), Action::Flap);
        // Ties go to the first index
        assert_eq!(Action::from_outputs(&[0.5, 0.5]), Action::Wait);
        assert_eq!(Action::from_outputs(&[f32::NAN, 0.2]), Action::Flap);
        assert_eq!(Action::from_outputs(&[]), Action::Wait);
        // Extra outputs beyond the two known ones still mean "flap"
        assert_eq!(Action::from_outputs(&[0.0, 0.1, 0.7]), Action::Flap);
    }

    #[test]
    fn test_closure_policy() {
        let always = |_: Observation| Action::Flap;
        let observation = Observation { dx: 0.5, dy: 0.5 };
        assert_eq!(always.act(observation), Action::Flap);
    }

    #[test]
    fn test_gap_follower() {
        let policy = GapFollower { margin: 0.05 };
        assert_eq!(policy.act(Observation { dx: 0.5, dy: 0.40 }), Action::Flap);
        assert_eq!(policy.act(Observation { dx: 0.5, dy: 0.47 }), Action::Wait);
        assert_eq!(policy.act(Observation { dx: 0.5, dy: 0.80 }), Action::Wait);
    }
}
