//! Core of the calical worker.
//!
//! This crate converts between structured calendar events and iCalendar text:
//! - `event` holds the caller-facing event record
//! - `moment` parses and formats the fixed instant pattern
//! - `ics` generates and parses VCALENDAR/VEVENT text
//! - `protocol` and `worker` define the request/reply loop

pub mod config;
pub mod error;
pub mod event;
pub mod ics;
pub mod moment;
pub mod protocol;
pub mod worker;

pub use error::{CodecError, CodecResult};
pub use event::CalendarEvent;
pub use ics::IcsCodec;
pub use protocol::{Reply, Request};
pub use worker::Worker;
