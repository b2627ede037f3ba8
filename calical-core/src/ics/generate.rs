//! ICS generation from structured events.

use chrono::{DateTime, NaiveDateTime, Utc};
use icalendar::{Component, EventLike, Property, ValueType};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{CodecError, CodecResult};
use crate::event::{CalendarEvent, non_empty};
use crate::ics::envelope::Envelope;
use crate::moment;

/// Result of encoding a batch: the document plus the events left out of it.
#[derive(Debug, Clone)]
pub struct EncodedCalendar {
    pub ics: String,
    pub skipped: Vec<SkippedEvent>,
}

/// An input event that could not be encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEvent {
    /// Position in the input batch
    pub index: usize,
    pub error: String,
    pub message: String,
}

impl SkippedEvent {
    fn new(index: usize, err: &CodecError) -> Self {
        SkippedEvent {
            index,
            error: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Generate a calendar document for a batch of events.
///
/// Events whose instants do not parse are dropped and reported; the rest are
/// emitted in input order.
pub fn generate_ics(
    events: &[CalendarEvent],
    envelope: &Envelope,
    stamp: DateTime<Utc>,
) -> EncodedCalendar {
    let dtstamp = stamp.format("%Y%m%dT%H%M%SZ").to_string();
    let mut vevents = Vec::with_capacity(events.len());
    let mut skipped = Vec::new();

    for (index, event) in events.iter().enumerate() {
        match build_vevent(event, &dtstamp) {
            Ok(vevent) => vevents.push(vevent),
            Err(e) => {
                warn!(index, title = %event.title, error = %e, "Skipping event");
                skipped.push(SkippedEvent::new(index, &e));
            }
        }
    }

    EncodedCalendar {
        ics: envelope.wrap(vevents),
        skipped,
    }
}

fn build_vevent(event: &CalendarEvent, dtstamp: &str) -> CodecResult<icalendar::Event> {
    let start = moment::parse(&event.start_moment)?;
    let end = moment::parse(&event.end_moment)?;

    let mut ics_event = icalendar::Event::new();

    let uid = non_empty(event.ics_uid.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    ics_event.uid(&uid);
    ics_event.add_property("DTSTAMP", dtstamp);

    if event.all_day {
        // Only the start date is carried; multi-day spans collapse to one day
        if start.date() != end.date() {
            debug!(
                start = %event.start_moment,
                end = %event.end_moment,
                "All-day event end date not represented"
            );
        }
        add_date_property(&mut ics_event, "DTSTART", &start);
    } else {
        add_datetime_property(&mut ics_event, "DTSTART", &start);
        add_datetime_property(&mut ics_event, "DTEND", &end);
    }

    if !event.title.is_empty() {
        ics_event.summary(&event.title);
    }

    if let Some(loc) = non_empty(event.location.as_deref()) {
        ics_event.location(loc);
    }

    if let Some(desc) = non_empty(event.description.as_deref()) {
        ics_event.description(desc);
    }

    Ok(ics_event.done())
}

/// `NAME;VALUE=DATE:YYYYMMDD`
fn add_date_property(ics_event: &mut icalendar::Event, name: &str, time: &NaiveDateTime) {
    let mut prop = Property::new(name, time.format("%Y%m%d").to_string());
    prop.append_parameter(ValueType::Date);
    ics_event.append_property(prop);
}

/// Floating `NAME:YYYYMMDDTHHMMSS`, no Z and no TZID.
fn add_datetime_property(ics_event: &mut icalendar::Event, name: &str, time: &NaiveDateTime) {
    ics_event.add_property(name, time.format("%Y%m%dT%H%M%S").to_string());
}
