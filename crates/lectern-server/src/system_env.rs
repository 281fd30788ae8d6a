//! Production Environment implementation using system time and RNG.

use std::time::Instant;

use lectern_core::Environment;

/// Production environment using system time and cryptographic RNG.
///
/// This implementation:
/// - Uses `std::time::Instant::now()` for time
/// - Uses `getrandom` for cryptographic randomness
#[derive(Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer).unwrap_or_else(|e| {
            // NOTE: Only fails on unsupported platforms. Zeros keep the server
            // up; the worst outcome is a predictable claim secret or a
            // connection id collision, which the registry rejects.
            tracing::error!("getrandom failed: {}", e);
            buffer.fill(0);
        });
    }
}
