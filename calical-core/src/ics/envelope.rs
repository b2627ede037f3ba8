//! Calendar-level properties wrapping every encoded document.

use icalendar::Calendar;

use crate::error::{CodecError, CodecResult};

pub const DEFAULT_PRODUCT_ID: &str = "-//OpenENT Calendar 1.0//EN";
pub const ICS_VERSION: &str = "2.0";
pub const CALSCALE: &str = "GREGORIAN";

const ENVELOPE_PROPERTIES: [&str; 3] = ["VERSION:", "PRODID:", "CALSCALE:"];

/// Builds the VCALENDAR around a list of VEVENTs.
#[derive(Debug, Clone)]
pub struct Envelope {
    product_id: String,
}

impl Default for Envelope {
    fn default() -> Self {
        Envelope::new(DEFAULT_PRODUCT_ID)
    }
}

impl Envelope {
    pub fn new(product_id: impl Into<String>) -> Self {
        Envelope {
            product_id: product_id.into(),
        }
    }

    /// Wrap events into a calendar and render it as CRLF-terminated text.
    pub fn wrap(&self, events: Vec<icalendar::Event>) -> String {
        let mut cal = Calendar::new();
        for event in events {
            cal.push(event);
        }
        let cal = cal.done();

        self.rewrite_header(&cal.to_string())
    }

    /// Replace whatever header the icalendar crate wrote with our fixed
    /// VERSION, PRODID, CALSCALE lines, in that order.
    fn rewrite_header(&self, ics: &str) -> String {
        let mut result = String::with_capacity(ics.len() + self.product_id.len());
        let mut depth = 0usize;
        let mut dropping = false;

        for line in ics.lines() {
            // Continuation of a folded line we are dropping
            if dropping && (line.starts_with(' ') || line.starts_with('\t')) {
                continue;
            }
            dropping = false;

            if depth == 1 && ENVELOPE_PROPERTIES.iter().any(|p| line.starts_with(p)) {
                dropping = true;
                continue;
            }

            result.push_str(line);
            result.push_str("\r\n");

            if line.starts_with("BEGIN:") {
                depth += 1;
                if depth == 1 {
                    result.push_str(&format!("VERSION:{}\r\n", ICS_VERSION));
                    result.push_str(&format!("PRODID:{}\r\n", self.product_id));
                    result.push_str(&format!("CALSCALE:{}\r\n", CALSCALE));
                }
            } else if line.starts_with("END:") {
                depth = depth.saturating_sub(1);
            }
        }

        result
    }
}

/// Check that unfolded text is framed as a single VCALENDAR.
///
/// The header properties themselves are not validated.
pub(crate) fn check_framing(unfolded: &str) -> CodecResult<()> {
    let mut lines = unfolded.lines().map(str::trim).filter(|l| !l.is_empty());

    let first = lines
        .next()
        .ok_or_else(|| CodecError::MalformedDocument("document is empty".into()))?;
    if !first.eq_ignore_ascii_case("BEGIN:VCALENDAR") {
        return Err(CodecError::MalformedDocument(format!(
            "expected BEGIN:VCALENDAR, found '{}'",
            first
        )));
    }

    let last = lines.last().unwrap_or(first);
    if !last.eq_ignore_ascii_case("END:VCALENDAR") {
        return Err(CodecError::MalformedDocument(format!(
            "expected END:VCALENDAR, found '{}'",
            last
        )));
    }

    Ok(())
}

/// PRODID of a document, if it declares one at calendar level.
pub(crate) fn product_id_of(unfolded: &str) -> Option<&str> {
    unfolded
        .lines()
        .find_map(|l| l.strip_prefix("PRODID:"))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_empty_calendar_has_fixed_header() {
        let ics = Envelope::default().wrap(vec![]);
        let lines: Vec<&str> = ics.lines().collect();

        assert_eq!(
            lines,
            vec![
                "BEGIN:VCALENDAR",
                "VERSION:2.0",
                "PRODID:-//OpenENT Calendar 1.0//EN",
                "CALSCALE:GREGORIAN",
                "END:VCALENDAR",
            ],
            "ICS:\n{}",
            ics
        );
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn test_wrap_uses_configured_product_id() {
        let ics = Envelope::new("-//Example//Test//EN").wrap(vec![]);
        assert!(ics.contains("PRODID:-//Example//Test//EN\r\n"), "ICS:\n{}", ics);
        assert_eq!(ics.matches("PRODID:").count(), 1);
    }

    #[test]
    fn test_check_framing() {
        assert!(check_framing("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n").is_ok());
        assert!(check_framing("\n\nbegin:vcalendar\nend:vcalendar\n\n").is_ok());

        for bad in [
            "",
            "   \r\n",
            "hello world",
            "BEGIN:VEVENT\r\nEND:VEVENT",
            "BEGIN:VCALENDAR\r\nVERSION:2.0",
        ] {
            assert!(
                matches!(check_framing(bad), Err(CodecError::MalformedDocument(_))),
                "Expected MalformedDocument for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_product_id_of() {
        let ics = "BEGIN:VCALENDAR\nPRODID:-//Acme//EN\nEND:VCALENDAR";
        assert_eq!(product_id_of(ics), Some("-//Acme//EN"));
        assert_eq!(product_id_of("BEGIN:VCALENDAR\nEND:VCALENDAR"), None);
    }
}
