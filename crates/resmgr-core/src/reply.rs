//! Reply encoding.
//!
//! Each command produces exactly one reply. The encodings are fixed strings
//! that existing clients match on, so they must not change.

use bytes::Bytes;

use crate::{
    command::ParseError,
    device::{DeviceFlags, Permission},
};

/// Response to one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Buffer contents, sent as-is with no terminator.
    Data(Bytes),
    /// `READ` on an empty buffer.
    Empty,
    /// `WRITE` succeeded with this many bytes stored.
    Written(usize),
    /// `INFO` snapshot.
    Info {
        /// Occupied length.
        size: usize,
        /// Status flags.
        flags: DeviceFlags,
        /// Permission mode.
        permission: Permission,
    },
    /// `CLEAR` succeeded.
    Cleared,
    /// `SETPERM` succeeded.
    PermissionSet,
    /// Access control rejected the command.
    PermissionDenied,
    /// `SETPERM` argument not recognized.
    UnknownPermission,
    /// No keyword matched.
    UnknownCommand,
}

impl Reply {
    /// Wire encoding of the reply.
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Self::Data(data) => data.clone(),
            Self::Empty => Bytes::from_static(b"<buffer empty>\n"),
            Self::Written(n) => Bytes::from(format!("OK, {n} bytes written\n")),
            Self::Info { size, flags, permission } => Bytes::from(format!(
                "Size={size}, Flags={}, Permissions={}\n",
                flags.bits(),
                permission.code()
            )),
            Self::Cleared => Bytes::from_static(b"Buffer cleared\n"),
            Self::PermissionSet => Bytes::from_static(b"Permission set\n"),
            Self::PermissionDenied => Bytes::from_static(b"Permission denied\n"),
            Self::UnknownPermission => Bytes::from_static(b"Unknown permission\n"),
            Self::UnknownCommand => Bytes::from_static(b"Unknown command\n"),
        }
    }

    /// Whether the reply reports a rejected command.
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::UnknownPermission | Self::UnknownCommand)
    }
}

impl From<ParseError> for Reply {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::UnknownCommand => Self::UnknownCommand,
            ParseError::UnknownPermission => Self::UnknownPermission,
        }
    }
}
