//! Aggregate strength of both sides.
//!
//! Callers evaluate before and after a simulation and compare the two
//! [`IntEvaluation`]s; the core only guarantees the arithmetic.

use serde::{Deserialize, Serialize};

use crate::agent::Agent;

/// Scoring function counting health and shields equally.
#[must_use]
pub fn health_and_shield(agent: &Agent) -> i32 {
    agent.health() + agent.shields()
}

/// Scoring function counting shields at half the value of health.
#[must_use]
pub fn health_and_halved_shield(agent: &Agent) -> i32 {
    agent.health() + agent.shields() / 2
}

/// Summed scores of side A and side B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IntEvaluation {
    /// Score of side A.
    pub eval_a: i32,
    /// Score of side B.
    pub eval_b: i32,
}

impl IntEvaluation {
    /// Create an evaluation from two scores.
    #[must_use]
    pub const fn new(eval_a: i32, eval_b: i32) -> Self {
        Self { eval_a, eval_b }
    }

    /// Sum `score` over both groups.
    pub fn of<F>(group_a: &[Agent], group_b: &[Agent], score: F) -> Self
    where
        F: Fn(&Agent) -> i32,
    {
        Self {
            eval_a: group_a.iter().map(&score).sum(),
            eval_b: group_b.iter().map(&score).sum(),
        }
    }

    /// `eval_a - eval_b`. Comparing the delta before and after a simulation
    /// tells which side gained.
    #[must_use]
    pub const fn delta(&self) -> i32 {
        self.eval_a - self.eval_b
    }

    /// Pairwise difference, e.g. `before.subtract(&after)` gives each
    /// side's loss.
    #[must_use]
    pub const fn subtract(&self, other: &Self) -> Self {
        Self {
            eval_a: self.eval_a - other.eval_a,
            eval_b: self.eval_b - other.eval_b,
        }
    }

    /// `a * other.a - b * other.b`.
    #[must_use]
    pub fn dot(&self, other: &Self) -> i64 {
        i64::from(self.eval_a) * i64::from(other.eval_a)
            - i64::from(self.eval_b) * i64::from(other.eval_b)
    }

    /// `a * other.b - b * other.a`. The sign flips when the advantage
    /// rotates between the two evaluations.
    #[must_use]
    pub fn cross(&self, other: &Self) -> i64 {
        i64::from(self.eval_a) * i64::from(other.eval_b)
            - i64::from(self.eval_b) * i64::from(other.eval_a)
    }

    /// Share of side A in the total, 0.5 when both are zero.
    #[must_use]
    pub fn share_a(&self) -> f64 {
        let total = f64::from(self.eval_a) + f64::from(self.eval_b);
        if total == 0.0 {
            return 0.5;
        }
        f64::from(self.eval_a) / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_functions() {
        let zealot = Agent::new("Zealot").with_max_health(100).with_max_shields(60);
        assert_eq!(health_and_shield(&zealot), 160);
        assert_eq!(health_and_halved_shield(&zealot), 130);
    }

    #[test]
    fn test_of_sums_groups() {
        let a = vec![
            Agent::new("A1").with_max_health(40),
            Agent::new("A2").with_max_health(60),
        ];
        let b = vec![Agent::new("B1").with_max_health(35)];
        let eval = IntEvaluation::of(&a, &b, health_and_shield);
        assert_eq!(eval, IntEvaluation::new(100, 35));
        assert_eq!(eval.delta(), 65);
    }

    #[test]
    fn test_subtract() {
        let before = IntEvaluation::new(100, 80);
        let after = IntEvaluation::new(70, 20);
        assert_eq!(before.subtract(&after), IntEvaluation::new(30, 60));
    }

    #[test]
    fn test_dot_and_cross() {
        let before = IntEvaluation::new(3, 2);
        let after = IntEvaluation::new(1, 4);
        assert_eq!(before.dot(&after), 3 - 8);
        assert_eq!(before.cross(&after), 12 - 2);
        // Rotating the other way flips the sign
        assert_eq!(after.cross(&before), -10);
    }

    #[test]
    fn test_dot_does_not_overflow() {
        let big = IntEvaluation::new(i32::MAX, 0);
        assert_eq!(big.dot(&big), i64::from(i32::MAX) * i64::from(i32::MAX));
    }

    #[test]
    fn test_share_a() {
        assert!((IntEvaluation::new(0, 0).share_a() - 0.5).abs() < f64::EPSILON);
        assert!((IntEvaluation::new(30, 0).share_a() - 1.0).abs() < f64::EPSILON);
        assert!((IntEvaluation::new(1, 3).share_a() - 0.25).abs() < f64::EPSILON);
    }
}
