//! Session Context
//!
//! The principal every facade call acts on behalf of.

/// Authenticated owner; stamped into `user_id` on every insert and used to
/// scope list reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}
