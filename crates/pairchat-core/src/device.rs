//! Device identity newtype.
//!
//! Every peer carries a 2-byte device ID, set once in its local configuration
//! (e.g. `0x0002`). The width bound is enforced by the `u16` representation;
//! anything wider fails at parse time, before a session exists.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DeviceIdParseError;

/// The 2-byte identifier naming one peer installation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(u16);

impl DeviceId {
    /// Create from a raw 2-byte value.
    #[must_use]
    pub fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// The raw 2-byte value.
    #[must_use]
    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl From<u16> for DeviceId {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

impl FromStr for DeviceId {
    type Err = DeviceIdParseError;

    /// Parse a device ID from its configured form.
    ///
    /// Accepts `0x`-prefixed hex (`"0x0002"`) or a bare decimal integer
    /// (`"2"`). Values wider than 2 bytes are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u16::from_str_radix(hex, 16)
        } else {
            s.parse::<u16>()
        };
        parsed
            .map(Self)
            .map_err(|_| DeviceIdParseError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_form() {
        let id: DeviceId = "0x0002".parse().unwrap();
        assert_eq!(id.as_u16(), 2);
    }

    #[test]
    fn parse_uppercase_prefix() {
        let id: DeviceId = "0XFFFF".parse().unwrap();
        assert_eq!(id.as_u16(), 0xffff);
    }

    #[test]
    fn parse_decimal_form() {
        let id: DeviceId = "513".parse().unwrap();
        assert_eq!(id.as_u16(), 513);
    }

    #[test]
    fn parse_trims_whitespace() {
        let id: DeviceId = " 0x0a1b ".parse().unwrap();
        assert_eq!(id.as_u16(), 0x0a1b);
    }

    #[test]
    fn reject_too_wide() {
        assert!("0x10000".parse::<DeviceId>().is_err());
        assert!("65536".parse::<DeviceId>().is_err());
    }

    #[test]
    fn reject_garbage() {
        assert!("".parse::<DeviceId>().is_err());
        assert!("device-two".parse::<DeviceId>().is_err());
        assert!("-1".parse::<DeviceId>().is_err());
    }

    #[test]
    fn display_is_fixed_width_hex() {
        assert_eq!(DeviceId::new(2).to_string(), "0x0002");
        assert_eq!(DeviceId::new(0xbeef).to_string(), "0xbeef");
    }

    #[test]
    fn serde_is_transparent() {
        let id = DeviceId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: DeviceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
