use fillgauge_core::{Batch, KeyedReading, Message, Reading};
use serde_json::{Map, Value};
use tracing::debug;

/// Everything the feed listener can report.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A new connection (or stdin) started delivering lines.
    Connected,
    /// One decoded batch.
    Batch(Batch),
    /// A line we could not decode — carries the raw line for debugging.
    Malformed(String),
    /// The connection closed or stdin hit EOF.
    Disconnected,
}

impl From<FeedEvent> for Message {
    fn from(event: FeedEvent) -> Self {
        match event {
            FeedEvent::Connected => Message::SessionStarted,
            FeedEvent::Batch(batch) => Message::Batch(batch),
            FeedEvent::Malformed(line) => Message::Malformed(line),
            FeedEvent::Disconnected => Message::SessionEnded,
        }
    }
}

/// Parse one feed line into a [`FeedEvent`]. Blank lines yield `None`.
///
/// Two shapes are accepted:
/// - object: `{"red": 55.2, "blue": "48%", "green": null}`
/// - array:  `[{"key": "red", "reading": 55.2}, {"key": "red"}]`
///
/// The array form preserves order and allows repeated keys; a missing
/// `reading` is treated as an invalid reading. In the object form keys come
/// out sorted and a repeated key keeps only its last value, so senders that
/// need several readings per entity in one batch must use the array form.
pub fn parse_line(line: &str) -> Option<FeedEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let event = match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(map)) => FeedEvent::Batch(from_object(map)),
        Ok(Value::Array(items)) => FeedEvent::Batch(from_array(items)),
        _ => FeedEvent::Malformed(line.to_string()),
    };
    Some(event)
}

fn from_object(map: Map<String, Value>) -> Batch {
    map.into_iter()
        .map(|(key, value)| KeyedReading {
            reading: classify(&value),
            key,
        })
        .collect()
}

fn from_array(items: Vec<Value>) -> Batch {
    items
        .iter()
        .filter_map(|item| {
            let Some(key) = item.get("key").and_then(Value::as_str) else {
                debug!("skipping batch entry without a string key: {item}");
                return None;
            };
            let reading = item.get("reading").map_or(Reading::Invalid, classify);
            Some(KeyedReading::new(key, reading))
        })
        .collect()
}

/// Total classification of a JSON value into a [`Reading`].
fn classify(value: &Value) -> Reading {
    match value {
        Value::Number(n) => n.as_f64().map_or(Reading::Invalid, Reading::from_number),
        Value::String(s) => Reading::parse(s),
        _ => Reading::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(line: &str) -> Batch {
        match parse_line(line) {
            Some(FeedEvent::Batch(b)) => b,
            other => panic!("expected batch, got {other:?}"),
        }
    }

    #[test]
    fn parse_object_batch() {
        let mut b = batch(r#"{"red": 55.5, "blue": "48%", "green": null, "pink": true}"#);
        b.sort_by(|x, y| x.key.cmp(&y.key));
        assert_eq!(
            b,
            vec![
                KeyedReading::new("blue", 48.0),
                KeyedReading::new("green", Reading::Invalid),
                KeyedReading::new("pink", Reading::Invalid),
                KeyedReading::new("red", 55.5),
            ]
        );
    }

    #[test]
    fn parse_array_batch_keeps_order() {
        let b = batch(
            r#"[{"key":"red","reading":10},{"key":"red"},{"reading":3},{"key":"red","reading":"12"}]"#,
        );
        assert_eq!(
            b,
            vec![
                KeyedReading::new("red", 10.0),
                KeyedReading::new("red", Reading::Invalid),
                KeyedReading::new("red", 12.0),
            ]
        );
    }

    #[test]
    fn object_form_keeps_last_value_of_repeated_key() {
        let b = batch(r#"{"red": 50, "red": null}"#);
        assert_eq!(b, vec![KeyedReading::new("red", Reading::Invalid)]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn non_batch_json_is_malformed() {
        assert!(matches!(parse_line("42"), Some(FeedEvent::Malformed(_))));
        assert!(matches!(parse_line("{red: 1"), Some(FeedEvent::Malformed(_))));
    }

    #[test]
    fn feed_events_map_to_session_messages() {
        assert_eq!(Message::from(FeedEvent::Connected), Message::SessionStarted);
        assert_eq!(Message::from(FeedEvent::Disconnected), Message::SessionEnded);
        assert_eq!(
            Message::from(FeedEvent::Batch(vec![])),
            Message::Batch(vec![])
        );
    }
}
