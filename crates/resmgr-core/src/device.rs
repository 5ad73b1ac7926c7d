//! Device state.
//!
//! The device is a fixed-capacity byte buffer with an occupied length, a set
//! of status flags and a permission mode. It performs no I/O and no locking;
//! the server wraps a single instance in a mutex.
//!
//! # Invariants
//!
//! - `size <= capacity` at all times
//! - The backing storage is allocated once and never resized
//! - `clear()` only resets `size`; stale bytes stay in place until overwritten

use std::fmt;

use bitflags::bitflags;

/// Capacity of the device buffer used by the server unless configured
/// otherwise.
pub const DEFAULT_CAPACITY: usize = 4096;

bitflags! {
    /// Device status flags.
    ///
    /// `OPEN` is sticky: once any client has connected it is never cleared.
    /// `BUSY` tracks whether a session is connected. `ERROR` is reserved.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeviceFlags: u32 {
        /// The device has been opened by at least one session.
        const OPEN = 1;
        /// A session is currently attached.
        const BUSY = 2;
        /// Reserved error marker.
        const ERROR = 4;
    }
}

/// Access mode of the device.
///
/// The discriminants are the values reported by `INFO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Permission {
    /// Every command is allowed.
    #[default]
    ReadWrite = 0,
    /// `WRITE` and `CLEAR` are denied.
    ReadOnly = 1,
    /// `READ` is denied.
    WriteOnly = 2,
}

impl Permission {
    /// All permission modes.
    pub const ALL: [Self; 3] = [Self::ReadWrite, Self::ReadOnly, Self::WriteOnly];

    /// Parse a `SETPERM` argument.
    ///
    /// Only the first two bytes are significant, so `rwx` selects
    /// [`Permission::ReadWrite`]. Returns `None` for anything else.
    pub fn from_token(token: &[u8]) -> Option<Self> {
        match token.get(..2)? {
            b"rw" => Some(Self::ReadWrite),
            b"ro" => Some(Self::ReadOnly),
            b"wo" => Some(Self::WriteOnly),
            _ => None,
        }
    }

    /// The `SETPERM` token selecting this mode.
    pub const fn token(self) -> &'static str {
        match self {
            Self::ReadWrite => "rw",
            Self::ReadOnly => "ro",
            Self::WriteOnly => "wo",
        }
    }

    /// Numeric code as reported on the wire.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The shared, bounded byte buffer.
pub struct Device {
    buffer: Box<[u8]>,
    size: usize,
    flags: DeviceFlags,
    permission: Permission,
    sessions: usize,
}

impl Device {
    /// Create a device with [`DEFAULT_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a device with the given buffer capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            size: 0,
            flags: DeviceFlags::empty(),
            permission: Permission::default(),
            sessions: 0,
        }
    }

    /// Fixed capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Number of occupied bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bytes still available for writing.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.size
    }

    /// Current status flags.
    pub fn flags(&self) -> DeviceFlags {
        self.flags
    }

    /// Current permission mode.
    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// The occupied prefix of the buffer.
    pub fn contents(&self) -> &[u8] {
        &self.buffer[..self.size]
    }

    /// Append `data`, truncated to the remaining capacity.
    ///
    /// Returns the number of bytes actually written. A full buffer yields 0.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(self.remaining());
        self.buffer[self.size..self.size + n].copy_from_slice(&data[..n]);
        self.size += n;
        n
    }

    /// Reset the occupied length to zero.
    pub fn clear(&mut self) {
        self.size = 0;
    }

    /// Change the permission mode.
    pub fn set_permission(&mut self, permission: Permission) {
        self.permission = permission;
    }

    /// Number of sessions currently attached.
    pub fn sessions(&self) -> usize {
        self.sessions
    }

    /// Attach a session. Sets `OPEN | BUSY`.
    pub fn open_session(&mut self) {
        self.sessions += 1;
        self.flags |= DeviceFlags::OPEN | DeviceFlags::BUSY;
    }

    /// Detach a session. `BUSY` is cleared once the last session has gone;
    /// `OPEN` is never cleared.
    pub fn close_session(&mut self) {
        self.sessions = self.sessions.saturating_sub(1);
        if self.sessions == 0 {
            self.flags.remove(DeviceFlags::BUSY);
        }
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("capacity", &self.capacity())
            .field("size", &self.size)
            .field("flags", &self.flags)
            .field("permission", &self.permission)
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}
