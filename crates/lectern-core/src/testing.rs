//! Deterministic environment for unit tests.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Instant,
};

use crate::env::Environment;

/// Counter-driven environment: bytes are a simple function of the seed and
/// call count, so tests are reproducible.
#[derive(Clone)]
pub(crate) struct TestEnv {
    seed: u64,
    calls: Arc<AtomicU64>,
}

impl TestEnv {
    pub(crate) fn new(seed: u64) -> Self {
        Self { seed, calls: Arc::new(AtomicU64::new(0)) }
    }
}

impl Environment for TestEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        let mut state =
            self.seed.wrapping_add(call).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        for byte in buffer.iter_mut() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            *byte = state.to_le_bytes()[0];
        }
    }
}
