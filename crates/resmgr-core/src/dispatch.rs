//! Command dispatcher.
//!
//! Applies one received chunk to the device. The whole parse, permission
//! check and mutation happen on a single `&mut Device`, so a caller holding
//! the device lock for the duration of [`dispatch`] gets an atomic
//! check-then-act.

use bytes::Bytes;

use crate::{access::allowed, command::Command, device::Device, reply::Reply};

/// Interpret `chunk` as one command against `device`.
pub fn dispatch(device: &mut Device, chunk: &[u8]) -> Reply {
    let command = match Command::parse(chunk) {
        Ok(command) => command,
        Err(err) => return err.into(),
    };

    if !allowed(device.permission(), command.operation()) {
        tracing::debug!(
            permission = %device.permission(),
            operation = ?command.operation(),
            "command denied"
        );
        return Reply::PermissionDenied;
    }

    match command {
        Command::Read => {
            if device.size() == 0 {
                Reply::Empty
            } else {
                Reply::Data(Bytes::copy_from_slice(device.contents()))
            }
        },
        Command::Write(data) => {
            let written = device.write(data);
            if written < data.len() {
                tracing::debug!(requested = data.len(), written, "write truncated");
            }
            Reply::Written(written)
        },
        Command::Info => Reply::Info {
            size: device.size(),
            flags: device.flags(),
            permission: device.permission(),
        },
        Command::Clear => {
            device.clear();
            Reply::Cleared
        },
        Command::SetPerm(permission) => {
            device.set_permission(permission);
            Reply::PermissionSet
        },
    }
}
