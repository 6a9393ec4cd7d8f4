//! Adapter contract: choose one plan out of a list of candidates
//!
//! An adapter is any decision strategy. It receives the candidates as
//! parsed JSON documents and answers with the index of the chosen one:
//!
//! ```ignore
//! use pgl::adapter::{PlanAdapter, AdapterResult};
//! use serde_json::Value;
//!
//! struct Smallest;
//!
//! impl PlanAdapter for Smallest {
//!     fn choose_plan(&mut self, plans: &[Value]) -> AdapterResult<usize> {
//!         // ...
//!     }
//! }
//! ```
//!
//! # Contract
//!
//! - Non-empty input: return `i` with `0 <= i < plans.len()`
//! - Empty input: return `AdapterError::NoCandidates`
//! - The candidates are borrowed immutably and are never modified
//!
//! Drivers call adapters through [`choose_checked`], which turns an
//! out-of-range answer into `AdapterError::IndexOutOfRange`.

mod errors;
mod strategies;

use serde_json::Value;

pub use errors::{AdapterError, AdapterResult};
pub use strategies::{
    plan_total_cost, AdapterKind, FirstPlanAdapter, LowestCostAdapter, RandomAdapter,
};

/// A plan-choice strategy
pub trait PlanAdapter {
    /// Index of the chosen plan in `plans`
    fn choose_plan(&mut self, plans: &[Value]) -> AdapterResult<usize>;
}

impl<A: PlanAdapter + ?Sized> PlanAdapter for Box<A> {
    fn choose_plan(&mut self, plans: &[Value]) -> AdapterResult<usize> {
        (**self).choose_plan(plans)
    }
}

impl<A: PlanAdapter + ?Sized> PlanAdapter for &mut A {
    fn choose_plan(&mut self, plans: &[Value]) -> AdapterResult<usize> {
        (**self).choose_plan(plans)
    }
}

/// Ask `adapter` for a choice and hold it to the contract.
pub fn choose_checked<A: PlanAdapter + ?Sized>(
    adapter: &mut A,
    plans: &[Value],
) -> AdapterResult<usize> {
    if plans.is_empty() {
        return Err(AdapterError::NoCandidates);
    }

    let index = adapter.choose_plan(plans)?;
    if index >= plans.len() {
        return Err(AdapterError::IndexOutOfRange {
            index,
            len: plans.len(),
        });
    }
    Ok(index)
}
