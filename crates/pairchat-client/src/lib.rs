//! # pairchat-client
//!
//! Host-side collaborators around the session core: device-ID configuration,
//! the tokio-tungstenite transport adapter, the stdin input source, and the
//! terminal display sink. The `pairchat` binary in `main.rs` wires these
//! together.

#![deny(unsafe_code)]

pub mod config;
pub mod display;
pub mod input;
pub mod ws;
