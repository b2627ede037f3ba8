//! Wire protocol between callers and the worker.
//!
//! One JSON object per line in each direction. Requests are tagged by `action`:
//! `get` turns events into ICS text, `put` turns ICS text into events.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::event::CalendarEvent;
use crate::ics::SkippedEvent;

pub const STATUS_OK: u16 = 200;

/// Request sent to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Request {
    /// Events to ICS text
    #[serde(rename = "get")]
    Encode { events: Vec<CalendarEvent> },
    /// ICS text to events
    #[serde(rename = "put")]
    Decode { ics: String },
}

impl Request {
    pub fn action(&self) -> &'static str {
        match self {
            Request::Encode { .. } => "get",
            Request::Decode { .. } => "put",
        }
    }
}

/// Reply sent back by the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Encoded {
        ics: String,
        status: u16,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        skipped: Vec<SkippedEvent>,
    },
    Decoded {
        events: Vec<CalendarEvent>,
        status: u16,
    },
    Failure {
        status: u16,
        error: String,
        message: String,
    },
}

impl Reply {
    pub fn failure(err: &CodecError) -> Self {
        Reply::Failure {
            status: err.status(),
            error: err.kind().to_string(),
            message: err.to_string(),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Reply::Encoded { status, .. }
            | Reply::Decoded { status, .. }
            | Reply::Failure { status, .. } => *status,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Reply::Failure { .. })
    }

    /// Serialize as a single JSON line (no trailing newline).
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            serde_json::json!({
                "status": 500,
                "error": "Serialization",
                "message": e.to_string(),
            })
            .to_string()
        })
    }
}
