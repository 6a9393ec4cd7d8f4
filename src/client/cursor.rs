//! Server-side cursor over `pgl_qdataset_collect`
//!
//! A collect call runs inside its own transaction on its own connection:
//!
//! ```text
//! BEGIN
//! DECLARE pgl_collect_cursor NO SCROLL CURSOR FOR
//!     SELECT id, plan FROM pgl_qdataset_collect($1, $2, $3, $4, $5)
//! FETCH FORWARD n FROM pgl_collect_cursor      -- repeated
//! CLOSE pgl_collect_cursor; COMMIT             -- or ROLLBACK
//! ```
//!
//! Dropping the cursor drops the connection.

use postgres::{Client, NoTls, Row};
use serde_json::Value;

use super::dataset::CollectRequest;
use super::errors::{ClientError, ClientResult};
use super::records::PlanRecord;

/// The collect call, bound positionally as
/// `(dataset_name text, offset int8, limit int8, method text, arm int4)`.
pub const COLLECT_SQL: &str = "SELECT id, plan FROM pgl_qdataset_collect($1, $2, $3, $4, $5)";

/// Name of the server-side cursor declared per collect call
pub const COLLECT_CURSOR_NAME: &str = "pgl_collect_cursor";

const DECLARE_COLLECT_CURSOR_SQL: &str = "DECLARE pgl_collect_cursor NO SCROLL CURSOR FOR \
     SELECT id, plan FROM pgl_qdataset_collect($1, $2, $3, $4, $5)";

/// Source of plan rows for a [`PlanRecords`](super::PlanRecords) iterator.
///
/// `fetch` returns at most `max_rows` records; fewer means the source is
/// exhausted. `close` ends the session, keeping its effects when `commit` is
/// true and discarding them otherwise. `close` is called at most once.
pub trait PlanCursor {
    fn fetch(&mut self, max_rows: usize) -> ClientResult<Vec<PlanRecord>>;

    fn close(&mut self, commit: bool) -> ClientResult<()>;
}

/// [`PlanCursor`] backed by a PostgreSQL connection owned for one call
pub struct PgPlanCursor {
    client: Client,
}

impl PgPlanCursor {
    /// Connect, open a transaction, and declare the collect cursor.
    pub fn open(db_url: &str, request: &CollectRequest) -> ClientResult<Self> {
        let mut client = Client::connect(db_url, NoTls).map_err(ClientError::Connection)?;

        client.batch_execute("BEGIN").map_err(ClientError::Query)?;
        client
            .execute(
                DECLARE_COLLECT_CURSOR_SQL,
                &[
                    &request.dataset,
                    &request.offset,
                    &request.limit,
                    &request.method,
                    &request.arm,
                ],
            )
            .map_err(ClientError::Query)?;

        Ok(Self { client })
    }

    fn decode(row: &Row) -> ClientResult<PlanRecord> {
        let id: i32 = row.try_get("id").map_err(ClientError::Query)?;
        let plan: Value = row.try_get("plan").map_err(ClientError::Query)?;
        Ok(PlanRecord { id, plan })
    }
}

impl PlanCursor for PgPlanCursor {
    fn fetch(&mut self, max_rows: usize) -> ClientResult<Vec<PlanRecord>> {
        let sql = format!("FETCH FORWARD {} FROM {}", max_rows, COLLECT_CURSOR_NAME);
        let rows = self.client.query(sql.as_str(), &[]).map_err(ClientError::Query)?;
        rows.iter().map(Self::decode).collect()
    }

    fn close(&mut self, commit: bool) -> ClientResult<()> {
        let sql = if commit {
            format!("CLOSE {}; COMMIT", COLLECT_CURSOR_NAME)
        } else {
            "ROLLBACK".to_string()
        };
        self.client.batch_execute(&sql).map_err(ClientError::Query)
    }
}
