//! Structured calendar events, as exchanged with callers.
//!
//! Instants stay as strings here: they are only parsed when an event is encoded,
//! so one bad value drops that event instead of failing the whole request.

use serde::{Deserialize, Serialize};

/// A calendar event in the caller's JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// `yyyy-MM-ddTHH:mm:ss.SSSZ`
    #[serde(default)]
    pub start_moment: String,
    /// `yyyy-MM-ddTHH:mm:ss.SSSZ`
    #[serde(default)]
    pub end_moment: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Opaque UID, passed through as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ics_uid: Option<String>,

    /// Date-only event; both instants are midnight of their day
    #[serde(
        default,
        rename = "allday",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub all_day: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CalendarEvent {
    pub fn new(
        start_moment: impl Into<String>,
        end_moment: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        CalendarEvent {
            start_moment: start_moment.into(),
            end_moment: end_moment.into(),
            title: title.into(),
            ..Default::default()
        }
    }
}

/// `Some(s)` only when `s` is non-empty.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_wire_shape() {
        let value = json!({
            "startMoment": "2024-01-10T09:00:00.000Z",
            "endMoment": "2024-01-10T10:00:00.000Z",
            "title": "Standup",
            "icsUid": "abc-123",
            "allday": true,
            "location": "Room 4",
            "recurrence": false,
            "parentId": "ignored"
        });

        let event: CalendarEvent = serde_json::from_value(value).unwrap();
        assert_eq!(event.start_moment, "2024-01-10T09:00:00.000Z");
        assert_eq!(event.ics_uid.as_deref(), Some("abc-123"));
        assert!(event.all_day);
        assert_eq!(event.location.as_deref(), Some("Room 4"));
        assert_eq!(event.description, None);
    }

    #[test]
    fn test_serialize_omits_unset_fields() {
        let event = CalendarEvent::new(
            "2024-01-10T09:00:00.000Z",
            "2024-01-10T10:00:00.000Z",
            "Standup",
        );
        let value = serde_json::to_value(&event).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), 3, "Unexpected keys: {:?}", obj.keys());
        assert!(!obj.contains_key("location"));
        assert!(!obj.contains_key("allday"));
        assert!(!obj.contains_key("icsUid"));
    }

    #[test]
    fn test_serialize_allday_only_when_true() {
        let mut event = CalendarEvent::new("a", "b", "c");
        event.all_day = true;
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["allday"], json!(true));
    }
}
