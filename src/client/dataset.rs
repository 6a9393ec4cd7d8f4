//! Dataset client: plan collection from `pgl_qdataset_collect`

use postgres::{Client, NoTls};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::observability::{Logger, ObservationScope};

use super::cursor::PgPlanCursor;
use super::errors::{ClientError, ClientResult};
use super::records::{PlanRecord, PlanRecords};

/// Offset sentinel: continue from the server-tracked position
pub const RESUME_OFFSET: i64 = -1;

/// Arm sentinel: no specific arm, the server iterates them
pub const ANY_ARM: i32 = -1;

/// Default number of queries per collect call
pub const DEFAULT_LIMIT: i64 = 10;

/// The extension's default planning method
pub const DEFAULT_METHOD: &str = "default";

/// Rows pulled from the server-side cursor per round trip
pub const DEFAULT_FETCH_SIZE: usize = 64;

/// Arguments of one `pgl_qdataset_collect` call.
///
/// Nothing here is validated locally; the extension is the authority on
/// dataset names, methods and arms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectRequest {
    pub dataset: String,
    pub offset: i64,
    pub limit: i64,
    pub method: String,
    pub arm: i32,
}

impl CollectRequest {
    /// A request with the defaults: resume, 10 queries, default method, any arm.
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            offset: RESUME_OFFSET,
            limit: DEFAULT_LIMIT,
            method: DEFAULT_METHOD.to_string(),
            arm: ANY_ARM,
        }
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_arm(mut self, arm: i32) -> Self {
        self.arm = arm;
        self
    }

    /// Whether the server-tracked position is used instead of `offset`
    pub fn is_resume(&self) -> bool {
        self.offset == RESUME_OFFSET
    }
}

/// Stateless client for the pglearned dataset functions.
///
/// Holds only the connection string. Every operation opens its own
/// connection and releases it before (or, for [`collect`](Self::collect),
/// when the returned iterator is finished with) returning.
#[derive(Debug, Clone)]
pub struct DatasetClient {
    db_url: String,
    fetch_size: usize,
}

impl DatasetClient {
    /// Create a client. The connection string is passed through unchecked.
    pub fn new(db_url: impl Into<String>) -> Self {
        Self {
            db_url: db_url.into(),
            fetch_size: DEFAULT_FETCH_SIZE,
        }
    }

    /// Set how many rows are pulled per cursor round trip
    pub fn with_fetch_size(mut self, fetch_size: usize) -> Self {
        self.fetch_size = fetch_size;
        self
    }

    pub fn db_url(&self) -> &str {
        &self.db_url
    }

    pub fn fetch_size(&self) -> usize {
        self.fetch_size
    }

    pub(crate) fn connect(&self) -> ClientResult<Client> {
        Client::connect(&self.db_url, NoTls).map_err(ClientError::Connection)
    }

    /// Call `pgl_qdataset_collect` and stream back its `(id, plan)` rows.
    ///
    /// Rows arrive in server order. With `offset = -1` the server decides
    /// where to start, so repeated calls may return different records.
    pub fn collect(&self, request: &CollectRequest) -> ClientResult<PlanRecords> {
        let offset = request.offset.to_string();
        let limit = request.limit.to_string();
        let arm = request.arm.to_string();
        Logger::trace(
            "COLLECT_OPEN",
            &[
                ("arm", &arm),
                ("dataset", &request.dataset),
                ("limit", &limit),
                ("method", &request.method),
                ("offset", &offset),
            ],
        );

        let cursor = PgPlanCursor::open(&self.db_url, request)?;
        Ok(PlanRecords::new(cursor, self.fetch_size))
    }

    /// Collect a whole dataset, batch after batch, keeping only the plans.
    ///
    /// The first batch starts at offset 0, or at the server-tracked position
    /// when `resume` is set; later batches always resume. Stops on an empty
    /// batch or on one shorter than `batch_limit`.
    pub fn drain(
        &self,
        dataset: &str,
        resume: bool,
        batch_limit: i64,
        method: &str,
        arm: i32,
    ) -> ClientResult<Vec<Value>> {
        let from = if resume { "resume" } else { "start" };
        let scope = ObservationScope::with_fields("DRAIN", &[("dataset", dataset), ("from", from)]);

        let first = CollectRequest::new(dataset)
            .with_offset(if resume { RESUME_OFFSET } else { 0 })
            .with_limit(batch_limit)
            .with_method(method)
            .with_arm(arm);

        let result = drain_batches(&first, |request| {
            self.collect(request)?.collect::<ClientResult<Vec<_>>>()
        });

        match result {
            Ok(plans) => {
                scope.complete_with_fields(&[("plans", &plans.len().to_string())]);
                Ok(plans)
            }
            Err(e) => {
                scope.fail(&e.to_string());
                Err(e)
            }
        }
    }
}

/// Batch loop behind [`DatasetClient::drain`], independent of the transport.
pub(crate) fn drain_batches<F>(first: &CollectRequest, mut fetch: F) -> ClientResult<Vec<Value>>
where
    F: FnMut(&CollectRequest) -> ClientResult<Vec<PlanRecord>>,
{
    let mut request = first.clone();
    let mut plans = Vec::new();

    loop {
        let batch = fetch(&request)?;
        let batch_len = batch.len();
        Logger::trace(
            "DRAIN_BATCH",
            &[("dataset", &request.dataset), ("rows", &batch_len.to_string())],
        );

        if batch_len == 0 {
            break;
        }
        plans.extend(batch.into_iter().map(|r| r.plan));

        // Every query yields at least one plan, so a short batch means the
        // dataset ran out of queries.
        if request.limit <= 0 || (batch_len as i64) < request.limit {
            break;
        }
        request.offset = RESUME_OFFSET;
    }

    Ok(plans)
}
