//! Best-effort match telemetry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::state::Score;
use crate::team::Team;

/// Summary of one finished match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub final_score: Score,
    pub winner: Option<Team>,
    pub move_count: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl SessionRecord {
    pub fn duration(&self) -> chrono::Duration {
        self.end_time - self.start_time
    }
}

/// Receives finished-match records. Failures are logged by the match and
/// never change its state.
pub trait SessionSink {
    fn submit(&mut self, record: &SessionRecord) -> Result<(), SessionError>;
}

/// Writes each record to the log as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSessionSink;

impl SessionSink for LogSessionSink {
    fn submit(&mut self, record: &SessionRecord) -> Result<(), SessionError> {
        let json = serde_json::to_string(record)?;
        log::info!("session finished: {json}");
        Ok(())
    }
}

/// Keeps records in memory.
impl SessionSink for Vec<SessionRecord> {
    fn submit(&mut self, record: &SessionRecord) -> Result<(), SessionError> {
        self.push(record.clone());
        Ok(())
    }
}

/// Counts moves for the running match.
#[derive(Debug, Clone)]
pub struct SessionTracker {
    start_time: DateTime<Utc>,
    move_count: u32,
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTracker {
    pub fn new() -> Self {
        Self {
            start_time: Utc::now(),
            move_count: 0,
        }
    }

    /// Begin a new session.
    pub fn start(&mut self) {
        *self = Self::new();
    }

    pub fn record_move(&mut self) {
        self.move_count += 1;
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn finish(&self, final_score: Score, winner: Option<Team>) -> SessionRecord {
        SessionRecord {
            final_score,
            winner,
            move_count: self.move_count,
            start_time: self.start_time,
            end_time: Utc::now(),
        }
    }
}
