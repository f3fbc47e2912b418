//! Key event loop
//!
//! A single dedicated thread owns the device's event stream for the life
//! of the process. It blocks on the device between events, decodes key
//! events, and forwards presses over a channel. Releases and auto-repeat
//! are logged but never forwarded.

use super::{EventStream, KeyEvent, KeyState, RawEvent};
use crate::error::InputError;
use tokio::sync::mpsc;

/// A liveness line is logged after this many raw events
pub const HEARTBEAT_INTERVAL: u64 = 10;

/// Decodes a raw event stream into key events
///
/// Iterating blocks between events. The sequence ends after the first
/// stream error, which is yielded once.
pub struct EventReader {
    stream: Box<dyn EventStream>,
    received: u64,
    finished: bool,
}

impl EventReader {
    pub fn new(stream: Box<dyn EventStream>) -> Self {
        Self {
            stream,
            received: 0,
            finished: false,
        }
    }

    /// Total raw events seen so far, of any type
    pub fn received(&self) -> u64 {
        self.received
    }

    fn next_key_event(&mut self) -> Result<KeyEvent, InputError> {
        loop {
            let raw = self.stream.next_event()?;

            self.received += 1;
            if self.received % HEARTBEAT_INTERVAL == 0 {
                tracing::info!("Events received: {}", self.received);
            }

            let (key, value) = match raw {
                RawEvent::Key { key, value } => (key, value),
                RawEvent::Other { event_type } => {
                    tracing::trace!("Ignoring event type {}", event_type);
                    continue;
                }
            };

            match KeyState::from_value(value) {
                Some(state) => {
                    tracing::info!("KEY: {} state={}", key, state);
                    return Ok(KeyEvent::new(key, state));
                }
                None => {
                    tracing::trace!("Ignoring {} with value {}", key, value);
                }
            }
        }
    }
}

impl Iterator for EventReader {
    type Item = Result<KeyEvent, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.next_key_event();
        if result.is_err() {
            self.finished = true;
        }
        Some(result)
    }
}

impl std::iter::FusedIterator for EventReader {}

/// Start the reader thread for a device stream
///
/// The receiver yields key presses in order. A stream fault is delivered
/// as the final `Err` item before the channel closes.
pub fn spawn_reader(
    stream: Box<dyn EventStream>,
) -> std::io::Result<mpsc::Receiver<Result<KeyEvent, InputError>>> {
    let (tx, rx) = mpsc::channel(64);

    std::thread::Builder::new()
        .name("key-reader".to_string())
        .spawn(move || reader_loop(EventReader::new(stream), tx))?;

    Ok(rx)
}

fn reader_loop(reader: EventReader, tx: mpsc::Sender<Result<KeyEvent, InputError>>) {
    for item in reader {
        let forward = match &item {
            Ok(event) => event.state == KeyState::Pressed,
            Err(_) => true,
        };

        if forward && tx.blocking_send(item).is_err() {
            tracing::debug!("Key event receiver dropped, reader stopping");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::capture;
    use std::collections::VecDeque;

    /// Replays a fixed list of events, then fails like a disconnected device
    struct Scripted(VecDeque<RawEvent>);

    impl EventStream for Scripted {
        fn next_event(&mut self) -> Result<RawEvent, InputError> {
            self.0
                .pop_front()
                .ok_or_else(|| InputError::StreamFault("No such device (os error 19)".into()))
        }
    }

    fn key(name: &str, value: i32) -> RawEvent {
        RawEvent::Key {
            key: name.to_string(),
            value,
        }
    }

    fn syn() -> RawEvent {
        RawEvent::Other { event_type: 0 }
    }

    fn reader(events: Vec<RawEvent>) -> EventReader {
        EventReader::new(Box::new(Scripted(events.into())))
    }

    #[test]
    fn test_non_key_events_are_dropped() {
        let mut reader = reader(vec![
            syn(),
            RawEvent::Other { event_type: 2 },
            key("KEY_A", 1),
            syn(),
        ]);

        assert_eq!(
            reader.next().unwrap().unwrap(),
            KeyEvent::new("KEY_A", KeyState::Pressed)
        );
        assert_eq!(reader.received(), 3);
    }

    #[test]
    fn test_all_states_are_decoded() {
        let events: Vec<_> = reader(vec![key("KEY_A", 1), key("KEY_A", 2), key("KEY_A", 0)])
            .take(3)
            .map(Result::unwrap)
            .map(|e| e.state)
            .collect();

        assert_eq!(
            events,
            vec![KeyState::Pressed, KeyState::Repeated, KeyState::Released]
        );
    }

    #[test]
    fn test_unknown_values_are_skipped() {
        let mut reader = reader(vec![key("KEY_A", 7), key("KEY_B", 1)]);
        assert_eq!(reader.next().unwrap().unwrap().key, "KEY_B");
    }

    #[test]
    fn test_stream_fault_ends_sequence() {
        let mut reader = reader(vec![key("KEY_A", 1)]);
        assert!(reader.next().unwrap().is_ok());
        assert!(matches!(
            reader.next(),
            Some(Err(InputError::StreamFault(_)))
        ));
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_decoded_key_events_logged_at_default_level() {
        let output = capture::logged(|| {
            let events: Vec<_> = reader(vec![key("KEY_A", 1), syn(), key("KEY_A", 0)]).collect();
            assert_eq!(events.len(), 3);
        });

        assert!(output.contains("KEY: KEY_A state=pressed"), "{}", output);
        assert!(output.contains("KEY: KEY_A state=released"), "{}", output);
    }

    #[test]
    fn test_heartbeat_counts_every_event_type() {
        // 25 raw events: key presses interleaved with sync and relative-motion events
        let events: Vec<RawEvent> = (0..25)
            .map(|i| match i % 3 {
                0 => key("KEY_J", 1),
                1 => syn(),
                _ => RawEvent::Other { event_type: 2 },
            })
            .collect();

        let output = capture::logged(|| {
            let mut reader = reader(events);
            for _ in reader.by_ref() {}
            assert_eq!(reader.received(), 25);
        });

        let heartbeats: Vec<&str> = output
            .lines()
            .filter(|line| line.contains("Events received:"))
            .map(str::trim)
            .collect();
        assert_eq!(
            heartbeats,
            vec!["INFO Events received: 10", "INFO Events received: 20"]
        );
    }

    #[tokio::test]
    async fn test_spawn_reader_forwards_presses_only() {
        let stream = Scripted(
            vec![
                key("KEY_A", 1),
                syn(),
                key("KEY_A", 0),
                syn(),
                key("KEY_SPACE", 1),
                key("KEY_SPACE", 2),
                key("KEY_SPACE", 0),
            ]
            .into(),
        );
        let mut rx = spawn_reader(Box::new(stream)).unwrap();

        assert_eq!(rx.recv().await.unwrap().unwrap().key, "KEY_A");
        assert_eq!(rx.recv().await.unwrap().unwrap().key, "KEY_SPACE");
        assert!(matches!(
            rx.recv().await,
            Some(Err(InputError::StreamFault(_)))
        ));
        assert!(rx.recv().await.is_none());
    }
}
