//! Navigation payloads.

use serde::{Deserialize, Serialize};

/// Move to a slide.
///
/// Sent by the presenter; relayed verbatim by the server to every other
/// connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goto {
    /// Target slide index
    pub slide: u32,
}
