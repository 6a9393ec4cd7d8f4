//! Reference plan-choice strategies

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use super::errors::{AdapterError, AdapterResult};
use super::PlanAdapter;

/// Always picks the first candidate
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPlanAdapter;

impl PlanAdapter for FirstPlanAdapter {
    fn choose_plan(&mut self, plans: &[Value]) -> AdapterResult<usize> {
        if plans.is_empty() {
            return Err(AdapterError::NoCandidates);
        }
        Ok(0)
    }
}

/// Picks a candidate uniformly at random
#[derive(Debug, Clone)]
pub struct RandomAdapter {
    rng: StdRng,
}

impl RandomAdapter {
    /// Seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence of choices for a given seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanAdapter for RandomAdapter {
    fn choose_plan(&mut self, plans: &[Value]) -> AdapterResult<usize> {
        if plans.is_empty() {
            return Err(AdapterError::NoCandidates);
        }
        Ok(self.rng.gen_range(0..plans.len()))
    }
}

/// Picks the candidate with the lowest planner-estimated total cost.
///
/// Reads `Plan."Total Cost"` from `EXPLAIN (FORMAT JSON)` documents, either
/// the bare object or the one-element array PostgreSQL emits. Candidates
/// without a readable cost rank after all costed ones; ties keep the
/// earliest index.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowestCostAdapter;

/// `Plan."Total Cost"` of an EXPLAIN JSON document, if present
pub fn plan_total_cost(plan: &Value) -> Option<f64> {
    let root = match plan {
        Value::Array(items) => items.first()?,
        other => other,
    };
    root.get("Plan")?.get("Total Cost")?.as_f64()
}

impl PlanAdapter for LowestCostAdapter {
    fn choose_plan(&mut self, plans: &[Value]) -> AdapterResult<usize> {
        if plans.is_empty() {
            return Err(AdapterError::NoCandidates);
        }

        let mut best: Option<(usize, f64)> = None;
        for (index, plan) in plans.iter().enumerate() {
            let Some(cost) = plan_total_cost(plan) else {
                continue;
            };
            match best {
                Some((_, best_cost)) if cost >= best_cost => {}
                _ => best = Some((index, cost)),
            }
        }

        Ok(best.map(|(index, _)| index).unwrap_or(0))
    }
}

/// Names of the built-in strategies, for configuration and the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    First,
    Random,
    LowestCost,
}

impl AdapterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterKind::First => "first",
            AdapterKind::Random => "random",
            AdapterKind::LowestCost => "lowest-cost",
        }
    }

    /// Instantiate the strategy. `seed` only affects `random`.
    pub fn build(&self, seed: Option<u64>) -> Box<dyn PlanAdapter> {
        match self {
            AdapterKind::First => Box::new(FirstPlanAdapter),
            AdapterKind::Random => Box::new(match seed {
                Some(seed) => RandomAdapter::with_seed(seed),
                None => RandomAdapter::new(),
            }),
            AdapterKind::LowestCost => Box::new(LowestCostAdapter),
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdapterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(AdapterKind::First),
            "random" => Ok(AdapterKind::Random),
            "lowest-cost" => Ok(AdapterKind::LowestCost),
            other => Err(format!(
                "unknown adapter '{}': expected first, random or lowest-cost",
                other
            )),
        }
    }
}
