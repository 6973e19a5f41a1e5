//! Research event log.
//!
//! The engine reports every prompt/response pair to an [`EventSink`]. Sinks
//! are fire-and-forget: a failing sink is logged and otherwise ignored.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analyzer::MapMetrics;
use crate::classifier::ResponseType;
use crate::error::{SinkError, SinkResult};
use crate::types::{Intensity, ScaffoldingType};

/// One logged engine event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldEvent {
    /// Unique event id.
    pub id: Uuid,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// Session the round belongs to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    /// Round number (1-4).
    pub round: u8,
    /// Event payload.
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Event payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    /// A round began.
    RoundStarted {
        /// Scaffolding type of the round.
        scaffolding_type: ScaffoldingType,
        /// Scaffolding intensity of the round.
        scaffolding_intensity: Intensity,
        /// Opening prompt.
        prompt: String,
        /// Metrics of the map the round started from.
        metrics: MapMetrics,
    },
    /// A learner response was processed.
    LearnerTurn {
        /// Zero-based turn of the response.
        turn: u32,
        /// Message the learner answered.
        agent_message: String,
        /// The learner's response.
        user_response: String,
        /// Classification of the response.
        response_type: ResponseType,
        /// Reply sent back.
        #[serde(skip_serializing_if = "Option::is_none")]
        follow_up: Option<String>,
    },
    /// A round ended.
    RoundConcluded {
        /// Turns taken.
        turns: u32,
        /// Closing remark.
        conclusion: String,
    },
}

impl ScaffoldEvent {
    /// Stamp a new event.
    pub fn new(session_id: Option<Uuid>, round: u8, kind: EventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            session_id,
            round,
            kind,
        }
    }
}

/// Destination for engine events.
pub trait EventSink: Send + Sync {
    /// Record an event.
    fn record(&self, event: &ScaffoldEvent) -> SinkResult<()>;
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &ScaffoldEvent) -> SinkResult<()> {
        Ok(())
    }
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ScaffoldEvent>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all recorded events.
    pub fn events(&self) -> Vec<ScaffoldEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: &ScaffoldEvent) -> SinkResult<()> {
        let mut events = self.events.lock().map_err(|_| SinkError::Unavailable {
            message: "memory sink lock poisoned".to_string(),
        })?;
        events.push(event.clone());
        Ok(())
    }
}

/// Appends events as newline-delimited JSON.
#[derive(Debug)]
pub struct JsonLinesSink {
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesSink {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> SinkResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl EventSink for JsonLinesSink {
    fn record(&self, event: &ScaffoldEvent) -> SinkResult<()> {
        let line = serde_json::to_string(event)?;
        let mut writer = self.writer.lock().map_err(|_| SinkError::Unavailable {
            message: "event log lock poisoned".to_string(),
        })?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}
