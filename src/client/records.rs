//! Plan records and the lazy iterator that yields them

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::observability::Logger;

use super::cursor::{PgPlanCursor, PlanCursor};
use super::errors::ClientResult;

/// One row returned by `pgl_qdataset_collect`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    /// Row identifier assigned by the extension
    pub id: i32,
    /// Plan document, opaque to this crate
    pub plan: Value,
}

impl PlanRecord {
    pub fn into_pair(self) -> (i32, Value) {
        (self.id, self.plan)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Streaming,
    Exhausted,
    Failed,
}

/// Lazy, finite, non-restartable sequence of [`PlanRecord`]s.
///
/// Owns the cursor (and through it the connection) of one collect call.
/// The cursor is released as soon as the remote side reports exhaustion,
/// when an error is yielded, or when the iterator is dropped, whichever
/// comes first. Effects are committed only after exhaustion; a failed
/// commit is yielded as an error in place of the final batch.
///
/// After yielding an error the iterator is fused.
pub struct PlanRecords<C: PlanCursor = PgPlanCursor> {
    cursor: Option<C>,
    buffer: VecDeque<PlanRecord>,
    fetch_size: usize,
    state: StreamState,
}

impl<C: PlanCursor> PlanRecords<C> {
    /// Wrap an open cursor. `fetch_size` rows are pulled per round trip.
    pub fn new(cursor: C, fetch_size: usize) -> Self {
        Self {
            cursor: Some(cursor),
            buffer: VecDeque::new(),
            fetch_size: fetch_size.max(1),
            state: StreamState::Streaming,
        }
    }

    /// Whether the underlying cursor has already been closed
    pub fn is_released(&self) -> bool {
        self.cursor.is_none()
    }

    /// Roll back and close a cursor that was not read to the end
    fn release(&mut self) {
        let Some(mut cursor) = self.cursor.take() else {
            return;
        };

        if let Err(e) = cursor.close(false) {
            let reason = e.to_string();
            Logger::warn("COLLECT_CURSOR_CLOSE_FAILED", &[("reason", &reason)]);
        }
    }

    fn fill(&mut self) -> ClientResult<()> {
        let Some(cursor) = self.cursor.as_mut() else {
            self.state = StreamState::Exhausted;
            return Ok(());
        };

        let batch = cursor.fetch(self.fetch_size)?;
        if batch.len() < self.fetch_size {
            // the last batch only counts once its effects are committed
            if let Some(mut cursor) = self.cursor.take() {
                cursor.close(true)?;
            }
            self.state = StreamState::Exhausted;
        }
        self.buffer.extend(batch);
        Ok(())
    }
}

impl<C: PlanCursor> Iterator for PlanRecords<C> {
    type Item = ClientResult<PlanRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(record) = self.buffer.pop_front() {
            return Some(Ok(record));
        }
        if self.state != StreamState::Streaming {
            return None;
        }

        if let Err(e) = self.fill() {
            self.state = StreamState::Failed;
            self.release();
            return Some(Err(e));
        }
        self.buffer.pop_front().map(Ok)
    }
}

impl<C: PlanCursor> Drop for PlanRecords<C> {
    fn drop(&mut self) {
        self.release();
    }
}
