//! Access control.
//!
//! Maps a permission mode and a requested operation to allow/deny. Stateless;
//! the dispatcher consults it while holding the device lock so the mode
//! cannot change between the check and the mutation.

use crate::device::Permission;

/// Operations subject to access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Read the buffer contents.
    Read,
    /// Append to the buffer.
    Write,
    /// Report size, flags and permission.
    Info,
    /// Reset the buffer length.
    Clear,
    /// Change the permission mode.
    SetPerm,
}

impl Operation {
    /// All operations.
    pub const ALL: [Self; 5] = [Self::Read, Self::Write, Self::Info, Self::Clear, Self::SetPerm];
}

/// Whether `operation` is permitted under `permission`.
pub const fn allowed(permission: Permission, operation: Operation) -> bool {
    match (permission, operation) {
        (Permission::ReadOnly, Operation::Write | Operation::Clear)
        | (Permission::WriteOnly, Operation::Read) => false,
        _ => true,
    }
}

impl Permission {
    /// Whether this mode permits `operation`. See [`allowed`].
    pub const fn allows(self, operation: Operation) -> bool {
        allowed(self, operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_write_allows_everything() {
        for op in Operation::ALL {
            assert!(allowed(Permission::ReadWrite, op), "{op:?} should be allowed");
        }
    }

    #[test]
    fn read_only_denies_mutation() {
        assert!(allowed(Permission::ReadOnly, Operation::Read));
        assert!(!allowed(Permission::ReadOnly, Operation::Write));
        assert!(allowed(Permission::ReadOnly, Operation::Info));
        assert!(!allowed(Permission::ReadOnly, Operation::Clear));
        assert!(allowed(Permission::ReadOnly, Operation::SetPerm));
    }

    #[test]
    fn write_only_denies_read() {
        assert!(!allowed(Permission::WriteOnly, Operation::Read));
        assert!(allowed(Permission::WriteOnly, Operation::Write));
        assert!(allowed(Permission::WriteOnly, Operation::Info));
        assert!(allowed(Permission::WriteOnly, Operation::Clear));
        assert!(allowed(Permission::WriteOnly, Operation::SetPerm));
    }

    #[test]
    fn setperm_and_info_always_allowed() {
        for perm in Permission::ALL {
            assert!(perm.allows(Operation::SetPerm));
            assert!(perm.allows(Operation::Info));
        }
    }
}
