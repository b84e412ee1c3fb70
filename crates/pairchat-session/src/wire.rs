//! The JSON payload carried in each transport frame.
//!
//! Exactly one application message per text frame, no batching, no
//! fragmentation:
//!
//! ```json
//! { "message": "hello", "uuid": "00005f5e10000002" }
//! ```
//!
//! `uuid` is the fixed-width hex form of [`Tag`]. Frames above
//! [`MAX_FRAME_BYTES`] are rejected the same way malformed ones are.

use pairchat_core::{DecodeError, Message, Tag};
use serde::{Deserialize, Serialize};

/// Ceiling on a single frame's payload size.
pub const MAX_FRAME_BYTES: usize = 64 * 1024;

/// Serialized shape of one message on the wire.
#[derive(Debug, Serialize, Deserialize)]
struct Frame {
    message: String,
    uuid: String,
}

/// Serialize a message into its frame payload.
pub fn encode_frame(message: &Message) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Frame {
        message: message.text.clone(),
        uuid: message.tag.encode(),
    })
}

/// Parse a frame payload back into a message.
///
/// Rejects oversized payloads, non-JSON payloads, payloads missing either
/// field, and payloads whose `uuid` is not a valid tag.
pub fn decode_frame(payload: &str) -> Result<Message, DecodeError> {
    if payload.len() > MAX_FRAME_BYTES {
        return Err(DecodeError::FrameTooLarge {
            got: payload.len(),
            limit: MAX_FRAME_BYTES,
        });
    }
    let frame: Frame =
        serde_json::from_str(payload).map_err(|e| DecodeError::BadFrame(e.to_string()))?;
    let tag = Tag::decode(&frame.uuid)?;
    Ok(Message::new(tag, frame.message))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pairchat_core::DeviceId;

    #[test]
    fn frame_shape_matches_wire_contract() {
        let tag = Tag::new(1_600_000_000, DeviceId::new(2)).unwrap();
        let payload = encode_frame(&Message::new(tag, "hello")).unwrap();

        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["message"], "hello");
        assert_eq!(value["uuid"], "00005f5e10000002");
    }

    #[test]
    fn round_trip() {
        let tag = Tag::new(1_600_000_000, DeviceId::new(2)).unwrap();
        let original = Message::new(tag, "hello");
        let back = decode_frame(&encode_frame(&original).unwrap()).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn malformed_tag_is_decode_error() {
        let err = decode_frame(r#"{"message":"hi","uuid":"zz"}"#).unwrap_err();
        assert_matches!(err, DecodeError::BadLength(2));
    }

    #[test]
    fn non_json_is_bad_frame() {
        assert_matches!(decode_frame("not json"), Err(DecodeError::BadFrame(_)));
    }

    #[test]
    fn missing_field_is_bad_frame() {
        assert_matches!(
            decode_frame(r#"{"message":"hi"}"#),
            Err(DecodeError::BadFrame(_))
        );
    }

    #[test]
    fn oversized_payload_rejected() {
        let big = format!(
            r#"{{"message":"{}","uuid":"00005f5e10000002"}}"#,
            "x".repeat(MAX_FRAME_BYTES)
        );
        assert_matches!(
            decode_frame(&big),
            Err(DecodeError::FrameTooLarge { .. })
        );
    }

    #[test]
    fn unicode_text_survives() {
        let tag = Tag::new(7, DeviceId::new(0xffff)).unwrap();
        let original = Message::new(tag, "héllo ↔ wörld");
        let back = decode_frame(&encode_frame(&original).unwrap()).unwrap();
        assert_eq!(back.text, "héllo ↔ wörld");
    }
}
