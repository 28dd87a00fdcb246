//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Message author roles understood by chat-style generation services.
///
/// # Examples
///
/// ```
/// use almanac_core::Role;
///
/// assert_eq!(Role::System.as_wire(), "system");
/// assert_eq!(format!("{}", Role::User), "User");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Role {
    /// Fixed instructions describing who the model is
    System,
    /// The prompt for a single pipeline step
    User,
    /// Generated text
    Assistant,
}

impl Role {
    /// Lowercase role name used on the wire.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}
