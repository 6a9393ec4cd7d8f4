//! Request handling around a single adapter

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::adapter::{choose_checked, PlanAdapter};
use crate::observability::Logger;

use super::errors::{ServerError, ServerResult};

/// A plan-choice request: every candidate as JSON text, as the extension's
/// remote planner mode sends them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoosePlanRequest {
    pub plans: Vec<String>,
}

/// The answer to a [`ChoosePlanRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoosePlanResponse {
    pub chosen_plan_index: i32,
}

/// Hosts one adapter and answers plan-choice requests
pub struct PlanServer<A: PlanAdapter> {
    adapter: A,
    served: u64,
}

impl<A: PlanAdapter> PlanServer<A> {
    pub fn new(adapter: A) -> Self {
        Self { adapter, served: 0 }
    }

    /// Number of requests answered successfully
    pub fn served(&self) -> u64 {
        self.served
    }

    pub fn into_adapter(self) -> A {
        self.adapter
    }

    /// Parse the candidates, ask the adapter, and check its answer.
    pub fn handle(&mut self, request: &ChoosePlanRequest) -> ServerResult<ChoosePlanResponse> {
        let plans = request
            .plans
            .iter()
            .enumerate()
            .map(|(index, text)| {
                serde_json::from_str::<Value>(text).map_err(|e| ServerError::MalformedPlan {
                    index,
                    reason: e.to_string(),
                })
            })
            .collect::<ServerResult<Vec<_>>>()?;

        let index = choose_checked(&mut self.adapter, &plans)?;
        let chosen_plan_index = i32::try_from(index).map_err(|_| {
            ServerError::InvalidRequest(format!("{} candidates do not fit an i32 index", plans.len()))
        })?;

        self.served += 1;
        Ok(ChoosePlanResponse { chosen_plan_index })
    }

    /// Answer one request line with one response object.
    ///
    /// `{"status":"ok","data":{"chosen_plan_index":N}}` on success,
    /// `{"status":"error","code":...,"message":...}` otherwise.
    pub fn handle_line(&mut self, line: &str) -> Value {
        let result = serde_json::from_str::<ChoosePlanRequest>(line)
            .map_err(|e| ServerError::InvalidRequest(e.to_string()))
            .and_then(|request| self.handle(&request));

        match result {
            Ok(response) => json!({
                "status": "ok",
                "data": response,
            }),
            Err(e) => {
                let message = e.to_string();
                Logger::warn(
                    "CHOOSE_PLAN_REJECTED",
                    &[("code", e.code()), ("reason", &message)],
                );
                json!({
                    "status": "error",
                    "code": e.code(),
                    "message": message,
                })
            }
        }
    }
}
