//! Success response wrapper shared by all services.

use serde::{Deserialize, Serialize};

/// Successful result carrying data plus optional human-readable notices.
///
/// Notices are informational only: an envelope with messages is still a
/// success. Failures never travel in an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Envelope<T> {
    pub succeeded: bool,
    #[serde(default)]
    pub messages: Vec<String>,
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wraps data with no notices.
    pub fn success(data: T) -> Self {
        Self {
            succeeded: true,
            messages: Vec::new(),
            data,
        }
    }

    /// Wraps data together with a single notice.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            messages: vec![message.into()],
            data,
        }
    }

    /// Returns true if any notice contains the given fragment.
    pub fn has_message(&self, fragment: &str) -> bool {
        self.messages.iter().any(|m| m.contains(fragment))
    }
}
