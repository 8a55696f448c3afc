//! Lifecycle states of remote resources
//!
//! Every state value the remote API can report is classified, per polled
//! mutation, as still in progress, terminal success, or terminal failure.
//! [`StateTable`] holds that classification for one resource kind.

use serde::{Deserialize, Serialize};

/// Lifecycle state reported by the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceState {
    CreateInProgress,
    Ready,
    UpdateInProgress,
    DeleteInProgress,
    Deleted,
    CreateFailed,
    UpdateFailed,
    DeleteFailed,
    /// Any value this build does not recognize
    #[serde(other)]
    Unknown,
}

impl ResourceState {
    pub const ALL: [ResourceState; 9] = [
        ResourceState::CreateInProgress,
        ResourceState::Ready,
        ResourceState::UpdateInProgress,
        ResourceState::DeleteInProgress,
        ResourceState::Deleted,
        ResourceState::CreateFailed,
        ResourceState::UpdateFailed,
        ResourceState::DeleteFailed,
        ResourceState::Unknown,
    ];

    /// Parse a wire value; unrecognized values become `Unknown`
    pub fn parse(value: &str) -> Self {
        match value {
            "CREATE_IN_PROGRESS" => Self::CreateInProgress,
            "READY" => Self::Ready,
            "UPDATE_IN_PROGRESS" => Self::UpdateInProgress,
            "DELETE_IN_PROGRESS" => Self::DeleteInProgress,
            "DELETED" => Self::Deleted,
            "CREATE_FAILED" => Self::CreateFailed,
            "UPDATE_FAILED" => Self::UpdateFailed,
            "DELETE_FAILED" => Self::DeleteFailed,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateInProgress => "CREATE_IN_PROGRESS",
            Self::Ready => "READY",
            Self::UpdateInProgress => "UPDATE_IN_PROGRESS",
            Self::DeleteInProgress => "DELETE_IN_PROGRESS",
            Self::Deleted => "DELETED",
            Self::CreateFailed => "CREATE_FAILED",
            Self::UpdateFailed => "UPDATE_FAILED",
            Self::DeleteFailed => "DELETE_FAILED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for ResourceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ResourceState {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// What the engine reads off one fetched resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Remote identifier of the resource
    pub identifier: String,

    /// Classified state
    pub state: ResourceState,

    /// State exactly as reported, kept for diagnostics
    pub state_label: String,

    pub status_code: Option<String>,

    pub status_message: Option<String>,
}

impl Observation {
    pub fn new(identifier: impl Into<String>, state: &str) -> Self {
        Self {
            identifier: identifier.into(),
            state: ResourceState::parse(state),
            state_label: state.to_string(),
            status_code: None,
            status_message: None,
        }
    }

    pub fn with_status(mut self, code: Option<String>, message: Option<String>) -> Self {
        self.status_code = code;
        self.status_message = message;
        self
    }

    /// Message for a resource that reported a failure state
    pub fn failure_message(&self) -> String {
        format!(
            "Unexpected state {}: {} - {}",
            self.state_label,
            self.status_code.as_deref().unwrap_or("-"),
            self.status_message.as_deref().unwrap_or("-")
        )
    }
}

/// Mutating operations whose outcome is reached by polling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

impl Mutation {
    /// Noun used in log lines ("creation in progress")
    pub fn noun(&self) -> &'static str {
        match self {
            Mutation::Create => "creation",
            Mutation::Update => "update",
            Mutation::Delete => "deletion",
        }
    }
}

/// How one poll result should be treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    InProgress,
    Success,
    TerminalFailure,
}

/// Expected states while one mutation settles
#[derive(Debug, Clone, Copy)]
pub struct Transitions {
    /// States that mean "poll again"
    pub pending: &'static [ResourceState],

    /// States that mean the mutation completed
    pub done: &'static [ResourceState],
}

impl Transitions {
    /// Total: anything neither pending nor done is a terminal failure
    pub fn verdict(&self, state: ResourceState) -> Verdict {
        if self.pending.contains(&state) {
            Verdict::InProgress
        } else if self.done.contains(&state) {
            Verdict::Success
        } else {
            Verdict::TerminalFailure
        }
    }
}

/// State classification for one resource kind
#[derive(Debug, Clone, Copy)]
pub struct StateTable {
    pub create: Transitions,
    pub update: Transitions,
    pub delete: Transitions,

    /// States in which the resource is treated as not existing
    pub absent: &'static [ResourceState],
}

impl StateTable {
    /// Table shared by every studio resource kind
    pub const STANDARD: StateTable = StateTable {
        create: Transitions {
            pending: &[ResourceState::CreateInProgress],
            done: &[ResourceState::Ready],
        },
        update: Transitions {
            pending: &[ResourceState::UpdateInProgress],
            done: &[ResourceState::Ready],
        },
        delete: Transitions {
            pending: &[ResourceState::DeleteInProgress],
            done: &[ResourceState::Deleted, ResourceState::CreateFailed],
        },
        absent: &[ResourceState::Deleted, ResourceState::CreateFailed],
    };

    pub fn transitions(&self, mutation: Mutation) -> &Transitions {
        match mutation {
            Mutation::Create => &self.create,
            Mutation::Update => &self.update,
            Mutation::Delete => &self.delete,
        }
    }

    pub fn verdict(&self, mutation: Mutation, state: ResourceState) -> Verdict {
        self.transitions(mutation).verdict(state)
    }

    pub fn is_absent(&self, state: ResourceState) -> bool {
        self.absent.contains(&state)
    }
}
