//! Fuzz target for the command dispatcher.
//!
//! Feeds arbitrary chunk sequences through `dispatch` against a small device.
//!
//! # Invariants
//!
//! - NEVER panic on any input
//! - `size <= capacity` after every command
//! - A denied or unknown command leaves buffer contents and permission as
//!   they were
//! - `WRITE` never reports more bytes than the headroom before it ran

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use resmgr_core::{Device, Reply, dispatch};

#[derive(Debug, Clone, Arbitrary)]
struct FuzzInput {
    /// Device capacity (kept small so truncation is exercised).
    capacity: u8,
    /// Raw chunks, one per simulated receive.
    chunks: Vec<Vec<u8>>,
}

fuzz_target!(|input: FuzzInput| {
    let mut device = Device::with_capacity(usize::from(input.capacity));

    for chunk in &input.chunks {
        let contents_before = device.contents().to_vec();
        let permission_before = device.permission();
        let headroom = device.remaining();

        let reply = dispatch(&mut device, chunk);

        assert!(device.size() <= device.capacity());

        if reply.is_error() {
            assert_eq!(device.contents(), contents_before.as_slice());
            assert_eq!(device.permission(), permission_before);
        }

        if let Reply::Written(n) = reply {
            assert!(n <= headroom);
        }

        let _ = reply.to_bytes();
    }
});
