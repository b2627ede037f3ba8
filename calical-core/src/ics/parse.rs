//! ICS parsing into structured events, using the icalendar crate's parser.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use icalendar::parser::{Component, Property, read_calendar, unfold};
use tracing::{debug, warn};

use crate::error::{CodecError, CodecResult};
use crate::event::{CalendarEvent, non_empty};
use crate::ics::envelope;
use crate::moment;

/// Parse a calendar document into events, in component order.
///
/// Fails only when the text is not a calendar at all. Components other than
/// VEVENT are ignored, and a VEVENT without a readable DTSTART is dropped.
pub fn parse_events(content: &str) -> CodecResult<Vec<CalendarEvent>> {
    let unfolded = unfold(content);
    envelope::check_framing(&unfolded)?;

    let calendar =
        read_calendar(&unfolded).map_err(|e| CodecError::MalformedDocument(e.to_string()))?;

    if let Some(prodid) = envelope::product_id_of(&unfolded) {
        debug!(prodid, "Parsing calendar");
    }

    let mut vevents = Vec::new();
    collect_vevents(&calendar.components, &mut vevents);

    let events = vevents
        .into_iter()
        .enumerate()
        .filter_map(|(index, vevent)| match parse_vevent(vevent) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(index, error = %e, "Skipping VEVENT");
                None
            }
        })
        .collect();

    Ok(events)
}

/// VEVENTs in document order. Descends into VCALENDAR in case the parser did
/// not already flatten it.
fn collect_vevents<'a, 'c>(components: &'c [Component<'a>], out: &mut Vec<&'c Component<'a>>) {
    for component in components {
        let name = component.name.as_ref();
        if name.eq_ignore_ascii_case("VEVENT") {
            out.push(component);
        } else if name.eq_ignore_ascii_case("VCALENDAR") {
            collect_vevents(&component.components, out);
        }
    }
}

fn parse_vevent(vevent: &Component) -> CodecResult<CalendarEvent> {
    let dtstart = vevent
        .find_prop("DTSTART")
        .ok_or_else(|| CodecError::malformed_property("DTSTART", "<missing>"))?;

    let all_day = has_value_date(dtstart);
    let mut start = parse_ics_time("DTSTART", dtstart.val.as_ref())?;

    let mut end = match vevent.find_prop("DTEND") {
        Some(dtend) => parse_ics_time("DTEND", dtend.val.as_ref())?,
        None => match vevent.find_prop("DURATION") {
            Some(duration) => {
                let value = duration.val.as_ref();
                start
                    .checked_add_signed(parse_duration(value)?)
                    .ok_or_else(|| CodecError::malformed_property("DURATION", value))?
            }
            None => start,
        },
    };

    if all_day {
        start = moment::to_midnight(&start);
        end = moment::to_midnight(&end);
    }

    Ok(CalendarEvent {
        start_moment: moment::format(&start),
        end_moment: moment::format(&end),
        title: text_prop(vevent, "SUMMARY").unwrap_or_default(),
        ics_uid: text_prop(vevent, "UID"),
        all_day,
        location: text_prop(vevent, "LOCATION"),
        description: text_prop(vevent, "DESCRIPTION"),
    })
}

/// Property value, `None` when absent or empty.
fn text_prop(vevent: &Component, name: &str) -> Option<String> {
    let prop = vevent.find_prop(name)?;
    non_empty(Some(prop.val.as_ref())).map(str::to_string)
}

/// `DTSTART;VALUE=DATE:...`
fn has_value_date(prop: &Property) -> bool {
    prop.params.iter().any(|p| {
        p.key.as_ref().eq_ignore_ascii_case("VALUE")
            && p.val.as_ref().map(|v| v.as_ref()) == Some("DATE")
    })
}

/// Read a DATE or DATE-TIME value as a naive instant.
///
/// - `20240110` is midnight of that day
/// - `20240110T090000Z` and `20240110T090000` are the same wall-clock time;
///   the Z and any TZID parameter are ignored, not converted
fn parse_ics_time(name: &str, value: &str) -> CodecResult<NaiveDateTime> {
    let value = value.trim();
    let parsed = if value.len() == 8 {
        NaiveDate::parse_from_str(value, "%Y%m%d").map(|d| d.and_time(NaiveTime::MIN))
    } else {
        NaiveDateTime::parse_from_str(value.trim_end_matches('Z'), "%Y%m%dT%H%M%S")
    };
    parsed.map_err(|_| CodecError::malformed_property(name, value))
}

/// Parse a DURATION value (`PT1H`, `-P1D`, ...) into a signed chrono duration.
fn parse_duration(value: &str) -> CodecResult<chrono::Duration> {
    let value = value.trim();
    let is_negative = value.starts_with('-');
    let duration_str = value.trim_start_matches(['-', '+']);

    let duration = iso8601::duration(duration_str)
        .map_err(|_| CodecError::malformed_property("DURATION", value))?;
    let std_duration: std::time::Duration = duration.into();
    let duration = chrono::Duration::from_std(std_duration)
        .map_err(|_| CodecError::malformed_property("DURATION", value))?;

    Ok(if is_negative { -duration } else { duration })
}
