//! Core logic for the resmgr device broker.
//!
//! This crate holds everything that does not touch a socket:
//!
//! - [`Device`]: the bounded byte buffer shared by every client
//! - [`access`]: the permission × operation policy
//! - [`Command`]: parsing of one received chunk into an operation
//! - [`dispatch`]: applying a command to the device and producing a [`Reply`]
//!
//! ## Architecture
//!
//! ```text
//! resmgr-server (session)
//!   └─ dispatch(&mut Device, chunk) -> Reply
//!        ├─ Command::parse     (grammar)
//!        ├─ access::allowed    (policy)
//!        └─ Device             (buffer, size, flags, permission)
//! ```
//!
//! The caller owns the synchronization. [`dispatch`] takes `&mut Device`, so
//! whoever calls it must already hold the device lock for the whole
//! check-then-mutate sequence.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod access;
mod command;
mod device;
mod dispatch;
mod reply;

pub use access::{Operation, allowed};
pub use command::{Command, ParseError};
pub use device::{DEFAULT_CAPACITY, Device, DeviceFlags, Permission};
pub use dispatch::dispatch;
pub use reply::Reply;
