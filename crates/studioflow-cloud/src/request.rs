//! Handler request envelope

use serde::{Deserialize, Serialize};

/// One invocation's input, as delivered by the reconciliation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceHandlerRequest<M> {
    /// Idempotency token forwarded on mutating calls
    #[serde(default)]
    pub client_request_token: String,

    pub desired_resource_state: M,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_resource_state: Option<M>,

    /// Continuation token for list operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl<M> ResourceHandlerRequest<M> {
    pub fn new(client_request_token: impl Into<String>, desired_resource_state: M) -> Self {
        Self {
            client_request_token: client_request_token.into(),
            desired_resource_state,
            previous_resource_state: None,
            next_token: None,
        }
    }

    pub fn with_next_token(mut self, next_token: Option<String>) -> Self {
        self.next_token = next_token;
        self
    }

    pub fn with_previous(mut self, previous: M) -> Self {
        self.previous_resource_state = Some(previous);
        self
    }
}
