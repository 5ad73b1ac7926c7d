//! Command grammar.
//!
//! One received chunk is one command. There is no framing: the chunk is cut
//! at its first NUL byte and matched against the keywords below, all
//! case-sensitive.
//!
//! | Chunk                 | Command                          |
//! |-----------------------|----------------------------------|
//! | `READ...`             | [`Command::Read`], rest ignored  |
//! | `WRITE <data>`        | [`Command::Write`], data verbatim|
//! | `INFO[\r]\n`          | [`Command::Info`]                |
//! | `CLEAR[\r]\n`         | [`Command::Clear`]               |
//! | `SETPERM rw\|ro\|wo`  | [`Command::SetPerm`]             |

use thiserror::Error;

use crate::{access::Operation, device::Permission};

const READ: &[u8] = b"READ";
const WRITE: &[u8] = b"WRITE ";
const INFO: &[u8] = b"INFO";
const CLEAR: &[u8] = b"CLEAR";
const SETPERM: &[u8] = b"SETPERM ";

/// A parsed command, borrowing its payload from the receive buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Return the whole buffer.
    Read,
    /// Append the payload. Trailing newlines are part of the payload.
    Write(&'a [u8]),
    /// Report size, flags and permission.
    Info,
    /// Reset the buffer length.
    Clear,
    /// Change the permission mode.
    SetPerm(Permission),
}

/// Reasons a chunk does not parse into a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No keyword matched.
    #[error("unknown command")]
    UnknownCommand,

    /// `SETPERM` with an argument other than `rw`, `ro` or `wo`.
    #[error("unknown permission")]
    UnknownPermission,
}

impl<'a> Command<'a> {
    /// Parse one received chunk.
    pub fn parse(chunk: &'a [u8]) -> Result<Self, ParseError> {
        let chunk = until_nul(chunk);

        if chunk.starts_with(READ) {
            return Ok(Self::Read);
        }
        if let Some(data) = chunk.strip_prefix(WRITE) {
            return Ok(Self::Write(data));
        }
        if is_bare_keyword(chunk, INFO) {
            return Ok(Self::Info);
        }
        if is_bare_keyword(chunk, CLEAR) {
            return Ok(Self::Clear);
        }
        if let Some(arg) = chunk.strip_prefix(SETPERM) {
            return Permission::from_token(arg)
                .map(Self::SetPerm)
                .ok_or(ParseError::UnknownPermission);
        }

        Err(ParseError::UnknownCommand)
    }

    /// The access-control operation this command requires.
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Read => Operation::Read,
            Self::Write(_) => Operation::Write,
            Self::Info => Operation::Info,
            Self::Clear => Operation::Clear,
            Self::SetPerm(_) => Operation::SetPerm,
        }
    }
}

/// Clients send C strings; anything after a NUL is not part of the command.
fn until_nul(chunk: &[u8]) -> &[u8] {
    chunk.iter().position(|&b| b == 0).map_or(chunk, |end| &chunk[..end])
}

/// `keyword` alone, optionally terminated by `\n` or `\r\n`.
fn is_bare_keyword(chunk: &[u8], keyword: &[u8]) -> bool {
    matches!(chunk.strip_prefix(keyword), Some(b"" | b"\n" | b"\r\n"))
}
