//! # pairchat-core
//!
//! Foundation types for the pairchat messaging system.
//!
//! This crate provides the shared vocabulary the session and client crates
//! depend on:
//!
//! - **Device identity**: [`device::DeviceId`], the 2-byte per-peer ID
//! - **Tag codec**: [`tag::Tag`], the 8-byte sender+time identifier and its
//!   fixed-width hex wire representation
//! - **Messages**: [`message::Message`], a tagged line of text
//! - **Errors**: [`errors::EncodeError`] / [`errors::DecodeError`] via `thiserror`
//! - **Logging**: [`logging::init_subscriber`] for `tracing` setup
//!
//! ## Crate position
//!
//! Foundation crate. Depended on by `pairchat-session` and `pairchat-client`.

#![deny(unsafe_code)]

pub mod device;
pub mod errors;
pub mod logging;
pub mod message;
pub mod tag;

pub use device::DeviceId;
pub use errors::{DecodeError, EncodeError};
pub use message::Message;
pub use tag::Tag;
