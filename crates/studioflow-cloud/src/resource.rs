//! Resource kind capability trait

use crate::error::{HandlerError, RemoteFault, Result};
use crate::state::{Observation, StateTable};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Identifies one remote resource instance
///
/// The resource id is only known once the remote create call returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    /// Parent scope (e.g. the owning studio); `None` for top-level kinds
    pub parent_id: Option<String>,

    pub resource_id: Option<String>,
}

impl ResourceHandle {
    pub fn root(resource_id: Option<String>) -> Self {
        Self {
            parent_id: None,
            resource_id,
        }
    }

    pub fn scoped(parent_id: Option<String>, resource_id: Option<String>) -> Self {
        Self {
            parent_id,
            resource_id,
        }
    }

    /// Same parent scope, no resource id
    pub fn scope(&self) -> Self {
        Self {
            parent_id: self.parent_id.clone(),
            resource_id: None,
        }
    }

    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Resource id, or `InvalidRequest` when it is missing or blank
    pub fn identifier(&self, type_name: &str) -> Result<&str> {
        match self.resource_id.as_deref() {
            Some(id) if !id.trim().is_empty() => Ok(id),
            _ => Err(HandlerError::InvalidRequest(format!(
                "{} identifier is required",
                type_name
            ))),
        }
    }

    /// Parent id or empty string, for remote calls that take it positionally
    pub fn parent(&self) -> &str {
        self.parent_id.as_deref().unwrap_or_default()
    }
}

impl std::fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let id = self.resource_id.as_deref().unwrap_or("?");
        match &self.parent_id {
            Some(parent) => write!(f, "{}/{}", parent, id),
            None => write!(f, "{}", id),
        }
    }
}

/// Whether a kind's update call needs stabilization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateMode {
    /// Poll UPDATE_IN_PROGRESS until READY
    #[default]
    Stabilize,
    /// The remote update is synchronous; go straight to read
    Immediate,
}

/// One page of remote resources
#[derive(Debug, Clone)]
pub struct Page<R> {
    pub items: Vec<R>,
    pub next_token: Option<String>,
}

impl<R> Page<R> {
    pub fn new(items: Vec<R>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }
}

/// Everything the orchestrator needs to know about one resource kind
///
/// The translators are pure. The remote calls return the kind's own error
/// type, which the engine classifies at every call site.
#[async_trait]
pub trait ResourceKind: Send + Sync {
    /// Public model exchanged with the reconciliation engine
    type Model: Clone + Send + Sync + Serialize + DeserializeOwned + 'static;

    /// Remote representation returned by get/list/create
    type Resource: Send + Sync + 'static;

    type CreateRequest: Send + 'static;

    type UpdateRequest: Send + 'static;

    type Error: RemoteFault + Send + Sync + 'static;

    /// Schema type name, e.g. "AWS::NimbleStudio::Studio"
    fn type_name(&self) -> &'static str;

    fn state_table(&self) -> &StateTable {
        &StateTable::STANDARD
    }

    fn update_mode(&self) -> UpdateMode {
        UpdateMode::Stabilize
    }

    /// Parent scope and id carried by a model
    fn handle(&self, model: &Self::Model) -> ResourceHandle;

    /// Write a remote-assigned id into the model
    fn assign_identifier(&self, model: &mut Self::Model, identifier: &str);

    fn observe(&self, resource: &Self::Resource) -> Observation;

    fn create_request(&self, model: &Self::Model, client_token: &str) -> Self::CreateRequest;

    /// Sparse: only set, non-blank fields are carried
    fn update_request(&self, model: &Self::Model, client_token: &str) -> Self::UpdateRequest;

    fn to_model(&self, scope: &ResourceHandle, resource: &Self::Resource) -> Self::Model;

    async fn create(
        &self,
        request: Self::CreateRequest,
    ) -> std::result::Result<Self::Resource, Self::Error>;

    async fn get(
        &self,
        handle: &ResourceHandle,
    ) -> std::result::Result<Self::Resource, Self::Error>;

    async fn update(
        &self,
        handle: &ResourceHandle,
        request: Self::UpdateRequest,
    ) -> std::result::Result<(), Self::Error>;

    async fn delete(
        &self,
        handle: &ResourceHandle,
        client_token: &str,
    ) -> std::result::Result<(), Self::Error>;

    async fn list(
        &self,
        scope: &ResourceHandle,
        next_token: Option<&str>,
    ) -> std::result::Result<Page<Self::Resource>, Self::Error>;
}
