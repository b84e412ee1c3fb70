//! Error types for the tag codec.
//!
//! Codec errors are always recoverable at the point of use: an offending
//! message is logged and dropped, the session stays up. Transport and
//! configuration errors live with the crates that produce them
//! (`pairchat-session::transport`, `pairchat-client::config`).

use thiserror::Error;

use crate::tag::TAG_HEX_LEN;

/// A tag could not be produced from the given parts.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The timestamp does not fit in the 6-byte wire field.
    #[error("timestamp {0} exceeds the 48-bit range")]
    TimestampOutOfRange(u64),
}

/// An inbound tag or frame could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The tag string is not exactly [`TAG_HEX_LEN`] characters.
    #[error("tag must be {TAG_HEX_LEN} hex characters, got {0}")]
    BadLength(usize),

    /// The tag string contains a character outside `[0-9a-fA-F]`.
    #[error("tag contains non-hex characters")]
    NotHex,

    /// The surrounding frame was not valid JSON of the expected shape.
    #[error("malformed frame: {0}")]
    BadFrame(String),

    /// The frame exceeds the configured size ceiling.
    #[error("frame of {got} bytes exceeds the {limit}-byte ceiling")]
    FrameTooLarge {
        /// Observed frame size.
        got: usize,
        /// Configured ceiling.
        limit: usize,
    },
}

/// A configured device ID string could not be parsed into 2 bytes.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid device id {0:?}: expected 0x-prefixed hex or a decimal in 0..=65535")]
pub struct DeviceIdParseError(pub String);
