//! Callback context carried between invocations

use serde::{Deserialize, Serialize};

/// Where a re-invoked handler picks up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumePoint {
    /// No mutation has been issued yet
    #[default]
    Start,
    /// The mutation was issued; only polling remains
    Stabilizing,
}

/// Opaque state the caller hands back on the next invocation
///
/// Once `resume` is `Stabilizing`, the mutating remote call is never issued
/// again for this operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackContext {
    #[serde(default)]
    pub resume: ResumePoint,

    /// Identifier assigned by the remote API, once known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    /// Number of in-progress polls so far
    #[serde(default)]
    pub polls: u32,
}

impl CallbackContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_stabilizing(&self) -> bool {
        self.resume == ResumePoint::Stabilizing
    }

    /// Context to hand back after an in-progress poll
    pub fn next_poll(self, resource_id: impl Into<String>) -> Self {
        Self {
            resume: ResumePoint::Stabilizing,
            resource_id: Some(resource_id.into()),
            polls: self.polls.saturating_add(1),
        }
    }
}
