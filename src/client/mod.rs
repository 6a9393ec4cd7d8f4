//! Dataset client for the pglearned extension
//!
//! A thin, stateless pass-through to the extension's SQL functions:
//! - `collect`: stream `(id, plan)` rows from `pgl_qdataset_collect`
//! - `drain`: collect a whole dataset batch by batch
//! - dataset management: list, create, delete, insert, import
//!
//! # Resources
//!
//! Every call owns one connection. `collect` hands its connection to the
//! returned [`PlanRecords`] iterator, which releases it on exhaustion, on
//! error, or on drop. Nothing is cached or retried between calls.

mod admin;
mod cursor;
mod dataset;
mod errors;
mod records;

pub use admin::DatasetStatus;
pub use cursor::{PgPlanCursor, PlanCursor, COLLECT_CURSOR_NAME, COLLECT_SQL};
pub use dataset::{
    CollectRequest, DatasetClient, ANY_ARM, DEFAULT_FETCH_SIZE, DEFAULT_LIMIT, DEFAULT_METHOD,
    RESUME_OFFSET,
};
pub use errors::{ClientError, ClientResult};
pub use records::{PlanRecord, PlanRecords};
