//! WebSocket wire types: inbound chat envelope and the error envelope.
//!
//! Inbound text frames carry `{ message, content, sender, timestamp }`.
//! Browser clients send the identifier under `id` instead of `message`;
//! both are accepted. Only `content` is required.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{ChatMessage, MessageId, Sender};

/// Text of the only error the relay ever reports.
pub const INVALID_FORMAT: &str = "Invalid message format";

const INVALID_FORMAT_JSON: &str = r#"{"error":"Invalid message format"}"#;

/// Inbound chat envelope as sent by clients.
///
/// Every field is kept as a raw JSON value so that loosely typed clients
/// never fail deserialization on fields the relay does not care about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundEnvelope {
    /// Message identifier (server-side name).
    #[serde(default)]
    pub message: Option<Value>,
    /// Message identifier (browser client name).
    #[serde(default)]
    pub id: Option<Value>,
    /// Text content to relay.
    #[serde(default)]
    pub content: Option<Value>,
    /// Sender tag, normally `"user"`.
    #[serde(default)]
    pub sender: Option<Value>,
    /// Unix epoch milliseconds.
    #[serde(default)]
    pub timestamp: Option<Value>,
}

/// Error envelope written back for frames that cannot be relayed.
///
/// Serializes to exactly `{"error":"Invalid message format"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    /// Human-readable error text.
    pub error: String,
}

impl ErrorEnvelope {
    /// The envelope for malformed or unusable frames.
    #[must_use]
    pub fn invalid_format() -> Self {
        Self {
            error: INVALID_FORMAT.to_string(),
        }
    }

    /// Serializes the envelope to its JSON text.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| INVALID_FORMAT_JSON.to_string())
    }
}

/// Reasons a frame could not be turned into a [`ChatMessage`].
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Frame text is not JSON.
    #[error("malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
    /// Binary frame is not valid UTF-8.
    #[error("binary frame is not valid UTF-8")]
    NotUtf8,
    /// Frame is JSON but not an object.
    #[error("payload is not a JSON object")]
    NotAnObject,
    /// `content` is absent or `null`.
    #[error("missing content field")]
    MissingContent,
}

/// Parses a text frame into the chat message it carries.
///
/// Non-null `content` is converted to text the way a JavaScript
/// `toString()` would (see [`content_to_string`]). Missing identifier or
/// timestamp are filled in by [`ChatMessage::from_user`].
///
/// # Errors
///
/// Returns a [`FrameError`] for anything that is not a JSON object with a
/// non-null `content` field.
pub fn parse_frame(text: &str) -> Result<ChatMessage, FrameError> {
    let value: Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(FrameError::NotAnObject);
    }
    let envelope: InboundEnvelope = serde_json::from_value(value)?;

    let content = match envelope.content {
        None | Some(Value::Null) => return Err(FrameError::MissingContent),
        Some(Value::String(s)) => s,
        Some(other) => content_to_string(&other),
    };

    let id = envelope
        .message
        .as_ref()
        .and_then(MessageId::from_json)
        .or_else(|| envelope.id.as_ref().and_then(MessageId::from_json));
    let timestamp = envelope.timestamp.as_ref().and_then(Value::as_i64);

    if let Some(tag) = envelope.sender.as_ref().and_then(Value::as_str)
        && Sender::parse(tag).is_none()
    {
        tracing::debug!(sender = tag, "unrecognized sender tag");
    }

    Ok(ChatMessage::from_user(id, content, timestamp))
}

/// Converts a JSON value to text with JavaScript `toString()` rules.
///
/// - numbers use the shortest round-trip form, integral values without a
///   fraction (`1.0` → `1`, `1e2` → `100`), exponent notation below `1e-6`
///   and from `1e21` (`1e-7`, `1e+21`)
/// - arrays join their elements with `,`, with `null` elements empty
/// - objects become `[object Object]`
#[must_use]
pub fn content_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), number_to_string),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => content_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_to_string(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{f}");
    }
    // `{:e}` yields the shortest digits with an unsigned positive exponent.
    let exp = format!("{f:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

/// Parses a binary frame by decoding it as UTF-8 first.
///
/// # Errors
///
/// Returns [`FrameError::NotUtf8`] for undecodable payloads, otherwise the
/// same errors as [`parse_frame`].
pub fn parse_binary_frame(bytes: &[u8]) -> Result<ChatMessage, FrameError> {
    let text = std::str::from_utf8(bytes).map_err(|_| FrameError::NotUtf8)?;
    parse_frame(text)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_is_exact_literal() {
        assert_eq!(
            ErrorEnvelope::invalid_format().to_json(),
            r#"{"error":"Invalid message format"}"#
        );
    }

    #[test]
    fn full_envelope_parses() {
        let text = r#"{"message":"m1","content":"hello","sender":"user","timestamp":1700000000000}"#;
        let Ok(msg) = parse_frame(text) else {
            panic!("expected a message");
        };
        assert_eq!(msg.id.as_str(), "m1");
        assert_eq!(msg.content, "hello");
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.timestamp, 1_700_000_000_000);
    }

    #[test]
    fn browser_id_field_is_accepted() {
        let text = r#"{"id":"1700000000123","content":"hi","sender":"user","timestamp":1}"#;
        let Ok(msg) = parse_frame(text) else {
            panic!("expected a message");
        };
        assert_eq!(msg.id.as_str(), "1700000000123");
    }

    #[test]
    fn message_field_wins_over_id() {
        let Ok(msg) = parse_frame(r#"{"message":"a","id":"b","content":"x"}"#) else {
            panic!("expected a message");
        };
        assert_eq!(msg.id.as_str(), "a");
    }

    #[test]
    fn content_only_is_enough() {
        let Ok(msg) = parse_frame(r#"{"content":"just text"}"#) else {
            panic!("expected a message");
        };
        assert_eq!(msg.content, "just text");
    }

    #[test]
    fn scalar_content_is_stringified() {
        let Ok(num) = parse_frame(r#"{"content":42}"#) else {
            panic!("number content");
        };
        assert_eq!(num.content, "42");

        let Ok(flag) = parse_frame(r#"{"content":true}"#) else {
            panic!("bool content");
        };
        assert_eq!(flag.content, "true");
    }

    #[test]
    fn empty_string_content_is_valid() {
        let Ok(msg) = parse_frame(r#"{"content":""}"#) else {
            panic!("empty content");
        };
        assert_eq!(msg.content, "");
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            parse_frame("not json"),
            Err(FrameError::MalformedJson(_))
        ));
        assert!(matches!(
            parse_frame(r#"{"content":"x""#),
            Err(FrameError::MalformedJson(_))
        ));
    }

    #[test]
    fn non_object_json_is_rejected() {
        assert!(matches!(parse_frame("\"hello\""), Err(FrameError::NotAnObject)));
        assert!(matches!(parse_frame("[\"a\"]"), Err(FrameError::NotAnObject)));
        assert!(matches!(parse_frame("null"), Err(FrameError::NotAnObject)));
        assert!(matches!(parse_frame("7"), Err(FrameError::NotAnObject)));
    }

    #[test]
    fn missing_or_null_content_is_rejected() {
        assert!(matches!(parse_frame("{}"), Err(FrameError::MissingContent)));
        assert!(matches!(
            parse_frame(r#"{"content":null}"#),
            Err(FrameError::MissingContent)
        ));
    }

    fn content_of(text: &str) -> Option<String> {
        parse_frame(text).ok().map(|msg| msg.content)
    }

    #[test]
    fn integral_floats_drop_the_fraction() {
        assert_eq!(content_of(r#"{"content":1.0}"#).as_deref(), Some("1"));
        assert_eq!(content_of(r#"{"content":1e2}"#).as_deref(), Some("100"));
        assert_eq!(content_of(r#"{"content":-0.0}"#).as_deref(), Some("0"));
        assert_eq!(content_of(r#"{"content":1.5}"#).as_deref(), Some("1.5"));
    }

    #[test]
    fn extreme_numbers_use_exponent_notation() {
        assert_eq!(content_of(r#"{"content":1e21}"#).as_deref(), Some("1e+21"));
        assert_eq!(content_of(r#"{"content":1.5e-7}"#).as_deref(), Some("1.5e-7"));
        assert_eq!(content_of(r#"{"content":0.000001}"#).as_deref(), Some("0.000001"));
        assert_eq!(
            content_of(r#"{"content":12345678901234567890}"#).as_deref(),
            Some("12345678901234567000")
        );
    }

    #[test]
    fn arrays_join_with_commas() {
        assert_eq!(content_of(r#"{"content":[1,2]}"#).as_deref(), Some("1,2"));
        assert_eq!(
            content_of(r#"{"content":["a",null,[true,"b"]]}"#).as_deref(),
            Some("a,,true,b")
        );
        assert_eq!(content_of(r#"{"content":[]}"#).as_deref(), Some(""));
    }

    #[test]
    fn objects_become_object_tag() {
        assert_eq!(
            content_of(r#"{"content":{"a":1}}"#).as_deref(),
            Some("[object Object]")
        );
        assert_eq!(
            content_of(r#"{"content":[{"a":1},2]}"#).as_deref(),
            Some("[object Object],2")
        );
    }

    #[test]
    fn unknown_sender_still_parses() {
        let Ok(msg) = parse_frame(r#"{"content":"x","sender":"robot"}"#) else {
            panic!("expected a message");
        };
        assert_eq!(msg.sender, Sender::User);
    }

    #[test]
    fn binary_frames_decode_as_utf8() {
        let Ok(msg) = parse_binary_frame(br#"{"content":"bin"}"#) else {
            panic!("expected a message");
        };
        assert_eq!(msg.content, "bin");
        assert!(matches!(
            parse_binary_frame(&[0xff, 0xfe, 0x00]),
            Err(FrameError::NotUtf8)
        ));
    }
}
