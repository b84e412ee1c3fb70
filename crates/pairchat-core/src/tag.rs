//! The 8-byte message tag and its wire codec.
//!
//! A tag combines a 48-bit Unix-seconds timestamp with the sending peer's
//! 2-byte [`DeviceId`]. On the wire it is a fixed-width string of 16 lowercase
//! hex characters: the first 12 are the timestamp (big-endian), the last 4 the
//! device ID. Both ends of a connection use this one representation; there is
//! no per-message negotiation.
//!
//! Encode and decode are exact inverses over the whole valid domain
//! (`timestamp < 2^48`, any `u16` device ID).

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::device::DeviceId;
use crate::errors::{DecodeError, EncodeError};

/// Width of the encoded tag: 8 bytes as hex.
pub const TAG_HEX_LEN: usize = 16;

/// Hex digits holding the timestamp (6 bytes).
const TIMESTAMP_HEX_LEN: usize = 12;

/// First timestamp value that no longer fits in 6 bytes.
const TIMESTAMP_LIMIT: u64 = 1 << 48;

/// Identifies who sent a message and when.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
    timestamp_secs: u64,
    device: DeviceId,
}

impl Tag {
    /// Create a tag from its parts.
    ///
    /// Fails if `timestamp_secs` does not fit in the 6-byte wire field.
    pub fn new(timestamp_secs: u64, device: DeviceId) -> Result<Self, EncodeError> {
        if timestamp_secs >= TIMESTAMP_LIMIT {
            return Err(EncodeError::TimestampOutOfRange(timestamp_secs));
        }
        Ok(Self {
            timestamp_secs,
            device,
        })
    }

    /// Create a tag stamped with the current wall-clock time.
    #[must_use]
    pub fn now(device: DeviceId) -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self {
            // Wall clocks stay inside 48 bits for the next few million years;
            // the clamp keeps the type invariant unconditional.
            timestamp_secs: secs.min(TIMESTAMP_LIMIT - 1),
            device,
        }
    }

    /// Seconds since the Unix epoch at which the message was sent.
    #[must_use]
    pub fn timestamp_secs(&self) -> u64 {
        self.timestamp_secs
    }

    /// The sending peer's device ID.
    #[must_use]
    pub fn device(&self) -> DeviceId {
        self.device
    }

    /// Encode to the 16-character hex wire form.
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "{:012x}{:04x}",
            self.timestamp_secs,
            self.device.as_u16()
        )
    }

    /// Decode from the 16-character hex wire form.
    ///
    /// Accepts either case on input; rejects any other length or any
    /// non-hex character.
    pub fn decode(s: &str) -> Result<Self, DecodeError> {
        if s.len() != TAG_HEX_LEN {
            return Err(DecodeError::BadLength(s.len()));
        }
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(DecodeError::NotHex);
        }
        let (ts_hex, dev_hex) = s.split_at(TIMESTAMP_HEX_LEN);
        // Both parses are infallible after the hexdigit check above.
        let timestamp_secs =
            u64::from_str_radix(ts_hex, 16).map_err(|_| DecodeError::NotHex)?;
        let device =
            u16::from_str_radix(dev_hex, 16).map_err(|_| DecodeError::NotHex)?;
        Ok(Self {
            timestamp_secs,
            device: DeviceId::new(device),
        })
    }

    /// Packed big-endian byte form: 6 timestamp bytes then 2 device bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 8] {
        let ts = self.timestamp_secs.to_be_bytes();
        let dev = self.device.as_u16().to_be_bytes();
        [ts[2], ts[3], ts[4], ts[5], ts[6], ts[7], dev[0], dev[1]]
    }

    /// Inverse of [`Tag::to_bytes`].
    #[must_use]
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        let mut ts = [0u8; 8];
        ts[2..].copy_from_slice(&bytes[..6]);
        let device = u16::from_be_bytes([bytes[6], bytes[7]]);
        Self {
            timestamp_secs: u64::from_be_bytes(ts),
            device: DeviceId::new(device),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
