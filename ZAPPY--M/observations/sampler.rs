use std::fmt;

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::{error::ObservationError, plan::Plan};

/// Removal rate used when none is configured.
pub const DEFAULT_REMOVAL_RATE: f64 = 0.2;
/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Fraction of actions dropped from each plan, always in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct RemovalRate(f64);

impl RemovalRate {
    /// Validates and wraps a rate.
    ///
    /// # Errors
    /// Returns [`ObservationError::InvalidRate`] for values outside `[0, 1)`
    /// (NaN included).
    pub fn new(value: f64) -> Result<Self, ObservationError> {
        if (0.0..1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ObservationError::InvalidRate(value))
        }
    }

    /// Raw fraction.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Number of actions removed from a plan of `len` actions: `floor(len * rate)`.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn removal_count(self, len: usize) -> usize {
        let count = (len as f64 * self.0).floor() as usize;
        count.min(len)
    }

    /// Rate as a percentage with at most two decimals (`0.2` renders as `20`).
    #[must_use]
    pub fn as_percent(self) -> String {
        let formatted = format!("{:.2}", self.0 * 100.0);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

impl Default for RemovalRate {
    fn default() -> Self {
        Self(DEFAULT_REMOVAL_RATE)
    }
}

impl TryFrom<f64> for RemovalRate {
    type Error = ObservationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RemovalRate> for f64 {
    fn from(rate: RemovalRate) -> Self {
        rate.0
    }
}

impl fmt::Display for RemovalRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

/// Uniform action remover backed by a single seeded generator.
///
/// The generator state advances across calls, so sampling a sequence of plans
/// is reproducible given the seed and the order the plans are fed in.
#[derive(Debug, Clone)]
pub struct PlanSampler {
    rng: ChaCha8Rng,
}

impl PlanSampler {
    /// Creates a sampler with a deterministic seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Drops `floor(len * rate)` actions chosen uniformly without replacement,
    /// keeping the survivors in their original order.
    ///
    /// Empty plans and zero removal counts return the plan untouched without
    /// consuming randomness.
    #[must_use]
    pub fn sample(&mut self, plan: &Plan, rate: RemovalRate) -> Plan {
        let total = plan.len();
        let remove = rate.removal_count(total);
        if total == 0 || remove == 0 {
            return plan.clone();
        }

        let mut indices: Vec<usize> = (0..total).collect();
        let (chosen, _) = indices.partial_shuffle(&mut self.rng, remove);
        let mut dropped = vec![false; total];
        for &idx in chosen.iter() {
            dropped[idx] = true;
        }

        plan.iter()
            .zip(dropped)
            .filter(|(_, drop)| !drop)
            .map(|(action, _)| action.clone())
            .collect()
    }
}

impl Default for PlanSampler {
    fn default() -> Self {
        Self::seeded(DEFAULT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::parse_plan, plan::Action};

    fn numbered(len: usize) -> Plan {
        (0..len).map(|i| Action::new(format!("(step s{i})"))).collect()
    }

    #[test]
    fn rejects_rates_outside_unit_interval() {
        assert!(RemovalRate::new(0.0).is_ok());
        assert!(RemovalRate::new(0.999).is_ok());
        assert!(RemovalRate::new(1.0).is_err());
        assert!(RemovalRate::new(-0.1).is_err());
        assert!(RemovalRate::new(f64::NAN).is_err());
    }

    #[test]
    fn removal_count_truncates() {
        let rate = RemovalRate::default();
        assert_eq!(rate.removal_count(0), 0);
        assert_eq!(rate.removal_count(4), 0);
        assert_eq!(rate.removal_count(5), 1);
        assert_eq!(rate.removal_count(9), 1);
        assert_eq!(rate.removal_count(10), 2);
        assert_eq!(rate.removal_count(37), 7);
    }

    #[test]
    fn percent_rendering_strips_trailing_zeros() {
        assert_eq!(RemovalRate::default().as_percent(), "20");
        assert_eq!(RemovalRate::new(0.125).unwrap().as_percent(), "12.5");
        assert_eq!(RemovalRate::new(0.0).unwrap().as_percent(), "0");
        assert_eq!(RemovalRate::new(0.05).unwrap().to_string(), "5%");
    }

    #[test]
    fn output_length_and_order_hold_for_many_sizes() {
        let mut sampler = PlanSampler::seeded(7);
        for rate in [0.0, 0.2, 0.5, 0.9] {
            let rate = RemovalRate::new(rate).unwrap();
            for len in 0..60 {
                let plan = numbered(len);
                let partial = sampler.sample(&plan, rate);
                assert_eq!(partial.len(), len - rate.removal_count(len));
                assert!(partial.is_subsequence_of(&plan));
            }
        }
    }

    #[test]
    fn boundaries_return_plan_unchanged() {
        let mut sampler = PlanSampler::default();
        assert!(sampler
            .sample(&Plan::default(), RemovalRate::default())
            .is_empty());
        let plan = numbered(12);
        assert_eq!(sampler.sample(&plan, RemovalRate::new(0.0).unwrap()), plan);
        let short = numbered(4);
        assert_eq!(sampler.sample(&short, RemovalRate::default()), short);
    }

    #[test]
    fn stack_scenario_drops_exactly_one_action() {
        let plan = parse_plan(
            "(stack b1 b2)(stack b2 b3)(stack b3 b4)(stack b4 b5)(stack b5 b6)",
        );
        let partial = PlanSampler::seeded(DEFAULT_SEED).sample(&plan, RemovalRate::default());
        assert_eq!(partial.len(), 4);
        assert!(partial.is_subsequence_of(&plan));
    }

    #[test]
    fn same_seed_reproduces_the_same_sequence_of_draws() {
        let plans: Vec<Plan> = [8, 15, 3, 40].into_iter().map(numbered).collect();
        let run = |seed| {
            let mut sampler = PlanSampler::seeded(seed);
            plans
                .iter()
                .map(|plan| sampler.sample(plan, RemovalRate::default()))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn every_position_can_be_removed() {
        let plan = numbered(5);
        let mut sampler = PlanSampler::seeded(3);
        let mut seen_removed = [false; 5];
        for _ in 0..200 {
            let partial = sampler.sample(&plan, RemovalRate::default());
            for (idx, action) in plan.iter().enumerate() {
                if !partial.actions().contains(action) {
                    seen_removed[idx] = true;
                }
            }
        }
        assert!(seen_removed.iter().all(|removed| *removed));
    }
}
