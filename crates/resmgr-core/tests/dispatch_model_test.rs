//! Model-based property tests for the dispatcher.
//!
//! Random command sequences are applied both to a real [`Device`] through
//! [`dispatch`] and to a tiny reference model. Replies and observable state
//! must agree after every step.
//!
//! ```text
//! proptest generates: Vec<Op>
//!                       │
//!            ┌──────────┴──────────┐
//!            ▼                     ▼
//!        ModelDevice        dispatch(&mut Device)
//!            └──────── compare ────┘
//! ```

use proptest::prelude::*;
use resmgr_core::{Device, Operation, Permission, Reply, allowed, dispatch};

const CAPACITY: usize = 64;

#[derive(Debug, Clone)]
enum Op {
    Read,
    Write(Vec<u8>),
    Info,
    Clear,
    SetPerm(Permission),
    SetPermBogus,
    Unknown,
}

impl Op {
    fn to_chunk(&self) -> Vec<u8> {
        match self {
            Self::Read => b"READ\n".to_vec(),
            Self::Write(data) => [b"WRITE ".as_slice(), data.as_slice()].concat(),
            Self::Info => b"INFO\n".to_vec(),
            Self::Clear => b"CLEAR\n".to_vec(),
            Self::SetPerm(perm) => format!("SETPERM {}\n", perm.token()).into_bytes(),
            Self::SetPermBogus => b"SETPERM xx\n".to_vec(),
            Self::Unknown => b"FROB\n".to_vec(),
        }
    }
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // NUL would end the command early; keep payloads printable.
    let payload = prop::collection::vec(0x20u8..0x7f, 0..24);
    let perm = prop::sample::select(Permission::ALL.to_vec());

    prop_oneof![
        3 => Just(Op::Read),
        5 => payload.prop_map(Op::Write),
        1 => Just(Op::Info),
        1 => Just(Op::Clear),
        2 => perm.prop_map(Op::SetPerm),
        1 => Just(Op::SetPermBogus),
        1 => Just(Op::Unknown),
    ]
}

/// Reference model: a growable vector capped at `CAPACITY`.
struct ModelDevice {
    data: Vec<u8>,
    permission: Permission,
}

impl ModelDevice {
    fn new() -> Self {
        Self { data: Vec::new(), permission: Permission::ReadWrite }
    }

    fn apply(&mut self, op: &Op) -> Vec<u8> {
        let permission = self.permission;
        let denied = |op| !allowed(permission, op);
        match op {
            Op::Read if denied(Operation::Read) => b"Permission denied\n".to_vec(),
            Op::Read if self.data.is_empty() => b"<buffer empty>\n".to_vec(),
            Op::Read => self.data.clone(),
            Op::Write(_) if denied(Operation::Write) => b"Permission denied\n".to_vec(),
            Op::Write(data) => {
                let n = data.len().min(CAPACITY - self.data.len());
                self.data.extend_from_slice(&data[..n]);
                format!("OK, {n} bytes written\n").into_bytes()
            },
            Op::Info => format!(
                "Size={}, Flags=0, Permissions={}\n",
                self.data.len(),
                self.permission.code()
            )
            .into_bytes(),
            Op::Clear if denied(Operation::Clear) => b"Permission denied\n".to_vec(),
            Op::Clear => {
                self.data.clear();
                b"Buffer cleared\n".to_vec()
            },
            Op::SetPerm(perm) => {
                self.permission = *perm;
                b"Permission set\n".to_vec()
            },
            Op::SetPermBogus => b"Unknown permission\n".to_vec(),
            Op::Unknown => b"Unknown command\n".to_vec(),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_dispatch_matches_model(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut device = Device::with_capacity(CAPACITY);
        let mut model = ModelDevice::new();

        for op in &ops {
            let real = dispatch(&mut device, &op.to_chunk()).to_bytes();
            let expected = model.apply(op);

            prop_assert_eq!(real.as_ref(), expected.as_slice(), "reply mismatch for {:?}", op);
            prop_assert_eq!(device.contents(), model.data.as_slice());
            prop_assert_eq!(device.permission(), model.permission);
            prop_assert!(device.size() <= device.capacity());
        }
    }

    #[test]
    fn prop_denied_iff_not_allowed(
        perm in prop::sample::select(Permission::ALL.to_vec()),
        op in prop::sample::select(vec![Operation::Read, Operation::Write, Operation::Clear]),
    ) {
        let mut device = Device::new();
        device.set_permission(perm);

        let chunk: &[u8] = match op {
            Operation::Read => b"READ\n",
            Operation::Write => b"WRITE x",
            _ => b"CLEAR\n",
        };

        let reply = dispatch(&mut device, chunk);
        prop_assert_eq!(reply == Reply::PermissionDenied, !allowed(perm, op));
    }

    #[test]
    fn prop_reads_return_concatenated_writes(
        writes in prop::collection::vec(prop::collection::vec(0x20u8..0x7f, 1..32), 1..16),
    ) {
        let mut device = Device::with_capacity(CAPACITY);
        let mut expected = Vec::new();

        for data in &writes {
            let before = device.size();
            let chunk = [b"WRITE ".as_slice(), data.as_slice()].concat();
            let reply = dispatch(&mut device, &chunk);

            let n = data.len().min(CAPACITY - before);
            prop_assert_eq!(reply, Reply::Written(n));
            prop_assert_eq!(device.size(), (before + data.len()).min(CAPACITY));
            expected.extend_from_slice(&data[..n]);
        }

        let read = dispatch(&mut device, b"READ").to_bytes();
        prop_assert_eq!(read.as_ref(), expected.as_slice());
    }
}
