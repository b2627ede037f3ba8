//! Request/reply handling and the line-delimited serve loop.
//!
//! Requests are handled strictly one at a time: a request is read, converted and
//! answered before the next one is read. Nothing is kept between requests.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::config::WorkerConfig;
use crate::error::CodecError;
use crate::ics::{Envelope, IcsCodec};
use crate::protocol::{Reply, Request, STATUS_OK};

#[derive(Debug, Clone, Default)]
pub struct Worker {
    codec: IcsCodec,
}

impl Worker {
    pub fn new(codec: IcsCodec) -> Self {
        Worker { codec }
    }

    pub fn from_config(config: &WorkerConfig) -> Self {
        Worker::new(IcsCodec::new(Envelope::new(&config.product_id)))
    }

    pub fn handle(&self, request: Request) -> Reply {
        debug!(action = request.action(), "Handling request");

        match request {
            Request::Encode { events } => {
                let encoded = self.codec.encode(&events);
                Reply::Encoded {
                    ics: encoded.ics,
                    status: STATUS_OK,
                    skipped: encoded.skipped,
                }
            }
            Request::Decode { ics } => match self.codec.decode(&ics) {
                Ok(events) => Reply::Decoded {
                    events,
                    status: STATUS_OK,
                },
                Err(e) => {
                    warn!(error = %e, "Failed to decode ICS document");
                    Reply::failure(&e)
                }
            },
        }
    }

    /// Handle one raw JSON request line.
    pub fn handle_line(&self, line: &str) -> Reply {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(request),
            Err(e) => {
                let err = CodecError::InvalidRequest(format!("Failed to parse request: {}", e));
                warn!(error = %err, "Rejecting request");
                Reply::failure(&err)
            }
        }
    }

    /// Serve newline-delimited requests until EOF, writing one reply line each.
    ///
    /// Returns the number of requests answered. Only I/O errors end the loop early.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut handled = 0;

        while let Some(line) = lines.next_line().await? {
            // Skip empty lines
            if line.trim().is_empty() {
                continue;
            }

            let reply = self.handle_line(&line);
            writer.write_all(reply.to_line().as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
            handled += 1;
        }

        Ok(handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CalendarEvent;

    fn event(start: &str, uid: &str) -> CalendarEvent {
        let mut e = CalendarEvent::new(start, "2024-01-10T10:00:00.000Z", uid);
        e.ics_uid = Some(uid.to_string());
        e
    }

    #[test]
    fn test_handle_encode_skips_bad_event() {
        let worker = Worker::default();
        let reply = worker.handle(Request::Encode {
            events: vec![
                event("2024-01-10T09:00:00.000Z", "one"),
                event("2024-01-10 09:00", "two"),
                event("2024-01-10T09:30:00.000Z", "three"),
            ],
        });

        match reply {
            Reply::Encoded {
                ics,
                status,
                skipped,
            } => {
                assert_eq!(status, 200);
                assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
                let uids: Vec<&str> = ics.lines().filter_map(|l| l.strip_prefix("UID:")).collect();
                assert_eq!(uids, vec!["one", "three"]);
                assert_eq!(skipped.len(), 1);
                assert_eq!(skipped[0].index, 1);
            }
            other => panic!("Expected Encoded reply, got {:?}", other),
        }
    }

    #[test]
    fn test_handle_decode_malformed_document() {
        let worker = Worker::default();
        let reply = worker.handle(Request::Decode { ics: String::new() });

        assert_eq!(reply.status(), 400);
        match reply {
            Reply::Failure { error, .. } => assert_eq!(error, "MalformedDocument"),
            other => panic!("Expected Failure reply, got {:?}", other),
        }
    }

    #[test]
    fn test_handle_line_rejects_garbage() {
        let worker = Worker::default();
        for line in ["not json", r#"{"action":"sync"}"#, r#"{"action":"put"}"#] {
            match worker.handle_line(line) {
                Reply::Failure { error, status, .. } => {
                    assert_eq!(error, "InvalidRequest");
                    assert_eq!(status, 400);
                }
                other => panic!("Expected Failure for {:?}, got {:?}", line, other),
            }
        }
    }

    #[test]
    fn test_from_config_uses_product_id() {
        let config = WorkerConfig {
            product_id: "-//Example//Test//EN".to_string(),
            ..Default::default()
        };
        let reply = Worker::from_config(&config).handle(Request::Encode { events: vec![] });

        match reply {
            Reply::Encoded { ics, .. } => assert!(ics.contains("PRODID:-//Example//Test//EN")),
            other => panic!("Expected Encoded reply, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_serve_answers_each_line_in_order() {
        let input = concat!(
            "{\"action\":\"put\",\"ics\":\"\"}\n",
            "\n",
            "{\"action\":\"get\",\"events\":[]}\n",
        );
        let mut output = Vec::new();

        let handled = Worker::default()
            .serve(input.as_bytes(), &mut output)
            .await
            .unwrap();
        assert_eq!(handled, 2);

        let replies: Vec<Reply> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(replies.len(), 2);
        assert!(!replies[0].is_success());
        assert!(matches!(replies[1], Reply::Encoded { status: 200, .. }));
    }
}
