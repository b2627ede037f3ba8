//! ICS generation and parsing.
//!
//! This module converts between [`CalendarEvent`] batches and RFC 5545 text
//! (VCALENDAR with VEVENT components only).

mod envelope;
mod generate;
mod parse;

pub use envelope::{CALSCALE, DEFAULT_PRODUCT_ID, Envelope, ICS_VERSION};
pub use generate::{EncodedCalendar, SkippedEvent, generate_ics};
pub use parse::parse_events;

use chrono::{DateTime, Utc};

use crate::error::CodecResult;
use crate::event::CalendarEvent;

/// Stateless codec between structured events and ICS text.
#[derive(Debug, Clone, Default)]
pub struct IcsCodec {
    envelope: Envelope,
    /// Fixed DTSTAMP; the current time when unset
    stamp: Option<DateTime<Utc>>,
}

impl IcsCodec {
    pub fn new(envelope: Envelope) -> Self {
        IcsCodec {
            envelope,
            stamp: None,
        }
    }

    /// Pin DTSTAMP so repeated encodes of the same input are byte-identical.
    pub fn with_stamp(mut self, stamp: DateTime<Utc>) -> Self {
        self.stamp = Some(stamp);
        self
    }

    /// Events to ICS text. Never fails as a whole; see [`EncodedCalendar::skipped`].
    pub fn encode(&self, events: &[CalendarEvent]) -> EncodedCalendar {
        let stamp = self.stamp.unwrap_or_else(Utc::now);
        generate_ics(events, &self.envelope, stamp)
    }

    /// ICS text to events.
    pub fn decode(&self, ics: &str) -> CodecResult<Vec<CalendarEvent>> {
        parse_events(ics)
    }
}
