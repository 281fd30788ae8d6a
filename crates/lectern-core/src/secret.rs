//! Claim secret generation.
//!
//! The secret is a short token an operator reads off the server log and hands
//! to the intended presenter. It gates `claim-presenter`; it is not meant to
//! resist a determined attacker.

use std::sync::OnceLock;

use crate::env::Environment;

/// Length of generated secrets, in hex characters.
pub const DEFAULT_SECRET_LEN: usize = 4;

/// Shared secret authorizing presenter claims.
///
/// # Security
///
/// - **Debug Redaction**: `Debug` never prints the value. Use
///   [`ClaimSecret::expose`] for the one place it must be shown.
#[derive(Clone, PartialEq, Eq)]
pub struct ClaimSecret(String);

impl ClaimSecret {
    /// Wrap an externally supplied secret.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generate a random lowercase-hex secret of `len` characters.
    pub fn generate<E: Environment>(env: &E, len: usize) -> Self {
        let mut bytes = vec![0u8; len.div_ceil(2)];
        env.random_bytes(&mut bytes);

        let mut token = hex::encode(&bytes);
        token.truncate(len);
        Self(token)
    }

    /// Whether a claimed password matches.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }

    /// The secret in clear text.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ClaimSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClaimSecret(<redacted {} bytes>)", self.0.len())
    }
}

/// Supplies the claim secret for a process lifetime.
///
/// Returns the externally configured secret if one was given (an empty string
/// counts as none), otherwise generates a token on first access and returns
/// the same token on every later call.
pub struct SecretProvider<E: Environment> {
    env: E,
    configured: Option<ClaimSecret>,
    generated: OnceLock<ClaimSecret>,
    len: usize,
}

impl<E: Environment> SecretProvider<E> {
    /// Create a provider, optionally with an operator-supplied secret.
    pub fn new(env: E, configured: Option<String>) -> Self {
        Self {
            env,
            configured: configured.filter(|s| !s.is_empty()).map(ClaimSecret::new),
            generated: OnceLock::new(),
            len: DEFAULT_SECRET_LEN,
        }
    }

    /// Override the generated secret length.
    #[must_use]
    pub fn with_length(mut self, len: usize) -> Self {
        self.len = len.max(1);
        self
    }

    /// The session secret.
    pub fn secret(&self) -> &ClaimSecret {
        if let Some(secret) = &self.configured {
            return secret;
        }
        self.generated.get_or_init(|| ClaimSecret::generate(&self.env, self.len))
    }

    /// Whether the secret was generated rather than configured.
    pub fn is_generated(&self) -> bool {
        self.configured.is_none()
    }
}

impl<E: Environment> std::fmt::Debug for SecretProvider<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretProvider")
            .field("configured", &self.configured.is_some())
            .field("generated", &self.generated.get().is_some())
            .field("len", &self.len)
            .finish()
    }
}
