//! Handler actions, outcomes and progress events

use crate::context::CallbackContext;
use crate::error::{HandlerError, HandlerErrorCode, Result};
use serde::{Deserialize, Serialize};

/// Lifecycle action requested of a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::List,
    ];
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Create => write!(f, "create"),
            Action::Read => write!(f, "read"),
            Action::Update => write!(f, "update"),
            Action::Delete => write!(f, "delete"),
            Action::List => write!(f, "list"),
        }
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Action::Create),
            "read" => Ok(Action::Read),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            "list" => Ok(Action::List),
            other => Err(format!("unknown action: {}", other)),
        }
    }
}

/// Status of a progress event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    InProgress,
    Success,
    Failed,
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationStatus::InProgress => write!(f, "IN_PROGRESS"),
            OperationStatus::Success => write!(f, "SUCCESS"),
            OperationStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Result of one handler invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<M> {
    /// Re-invoke after the delay with the returned model and context
    InProgress {
        model: M,
        context: CallbackContext,
        callback_delay_seconds: u64,
    },
    /// Operation completed; delete carries no model
    Success { model: Option<M> },
    Failed(HandlerError),
}

impl<M> Outcome<M> {
    pub fn status(&self) -> OperationStatus {
        match self {
            Outcome::InProgress { .. } => OperationStatus::InProgress,
            Outcome::Success { .. } => OperationStatus::Success,
            Outcome::Failed(_) => OperationStatus::Failed,
        }
    }

    pub fn model(&self) -> Option<&M> {
        match self {
            Outcome::InProgress { model, .. } => Some(model),
            Outcome::Success { model } => model.as_ref(),
            Outcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&HandlerError> {
        match self {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress { .. })
    }
}

impl<M> From<Result<Outcome<M>>> for Outcome<M> {
    fn from(result: Result<Outcome<M>>) -> Self {
        result.unwrap_or_else(Outcome::Failed)
    }
}

/// One page of listed models
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<M> {
    pub models: Vec<M>,
    pub next_token: Option<String>,
}

/// Serializable event returned to the reconciliation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent<M> {
    pub status: OperationStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_model: Option<M>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_models: Option<Vec<M>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_context: Option<CallbackContext>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_delay_seconds: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<HandlerErrorCode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<M> ProgressEvent<M> {
    fn empty(status: OperationStatus) -> Self {
        Self {
            status,
            resource_model: None,
            resource_models: None,
            callback_context: None,
            callback_delay_seconds: None,
            next_token: None,
            error_code: None,
            message: None,
        }
    }

    pub fn failed(error: &HandlerError) -> Self {
        Self {
            error_code: Some(error.code()),
            message: Some(error.to_string()),
            ..Self::empty(OperationStatus::Failed)
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status != OperationStatus::InProgress
    }
}

impl<M> From<Outcome<M>> for ProgressEvent<M> {
    fn from(outcome: Outcome<M>) -> Self {
        match outcome {
            Outcome::InProgress {
                model,
                context,
                callback_delay_seconds,
            } => Self {
                resource_model: Some(model),
                callback_context: Some(context),
                callback_delay_seconds: Some(callback_delay_seconds),
                ..Self::empty(OperationStatus::InProgress)
            },
            Outcome::Success { model } => Self {
                resource_model: model,
                ..Self::empty(OperationStatus::Success)
            },
            Outcome::Failed(err) => Self::failed(&err),
        }
    }
}

impl<M> From<Result<ListPage<M>>> for ProgressEvent<M> {
    fn from(result: Result<ListPage<M>>) -> Self {
        match result {
            Ok(page) => Self {
                resource_models: Some(page.models),
                next_token: page.next_token,
                ..Self::empty(OperationStatus::Success)
            },
            Err(err) => Self::failed(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse() {
        assert_eq!("create".parse::<Action>().unwrap(), Action::Create);
        assert_eq!("DELETE".parse::<Action>().unwrap(), Action::Delete);
        assert!("describe".parse::<Action>().is_err());
        for action in Action::ALL {
            assert_eq!(action.to_string().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn test_in_progress_event() {
        let outcome = Outcome::InProgress {
            model: "m".to_string(),
            context: CallbackContext::new().next_poll("r1"),
            callback_delay_seconds: 5,
        };
        let event = ProgressEvent::from(outcome);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["status"], "IN_PROGRESS");
        assert_eq!(json["resourceModel"], "m");
        assert_eq!(json["callbackDelaySeconds"], 5);
        assert_eq!(json["callbackContext"]["resourceId"], "r1");
        assert!(json.get("errorCode").is_none());
    }

    #[test]
    fn test_failed_event_carries_code_and_message() {
        let err = HandlerError::Throttling("slow down".to_string());
        let event: ProgressEvent<String> = Outcome::Failed(err).into();

        assert_eq!(event.status, OperationStatus::Failed);
        assert_eq!(event.error_code, Some(HandlerErrorCode::Throttling));
        assert_eq!(event.message.as_deref(), Some("Rate exceeded: slow down"));
        assert!(event.resource_model.is_none());
    }

    #[test]
    fn test_delete_success_has_no_model() {
        let event: ProgressEvent<String> = Outcome::Success { model: None }.into();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, serde_json::json!({"status": "SUCCESS"}));
    }

    #[test]
    fn test_list_event() {
        let page = ListPage {
            models: vec!["a".to_string(), "b".to_string()],
            next_token: Some("2".to_string()),
        };
        let result: Result<ListPage<String>> = Ok(page);
        let event = ProgressEvent::from(result);
        assert_eq!(event.status, OperationStatus::Success);
        assert_eq!(event.resource_models.as_ref().map(Vec::len), Some(2));
        assert_eq!(event.next_token.as_deref(), Some("2"));
    }
}
