//! Lifecycle orchestrator
//!
//! [`ResourceHandler`] sequences translate, mutate, stabilize and read for
//! any [`ResourceKind`]. Every entry point performs a small fixed number of
//! remote calls and returns; long-running stabilization is expressed as an
//! `InProgress` outcome the caller re-invokes with the returned context.

use crate::classify::classify;
use crate::context::CallbackContext;
use crate::error::{HandlerError, Result};
use crate::event::{Action, Outcome, ProgressEvent};
use crate::poller::{Poll, Stabilizer};
use crate::request::ResourceHandlerRequest;
use crate::resource::{ResourceHandle, ResourceKind, UpdateMode};
use crate::state::{Mutation, ResourceState, Verdict};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, info, info_span, warn};

fn default_callback_delay_seconds() -> u64 {
    5
}

/// Engine-side knobs; never read from files or the environment here
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerSettings {
    /// Delay hint attached to every `InProgress` outcome
    #[serde(default = "default_callback_delay_seconds")]
    pub callback_delay_seconds: u64,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            callback_delay_seconds: default_callback_delay_seconds(),
        }
    }
}

/// Generic orchestrator for one resource kind
pub struct ResourceHandler<K> {
    pub(crate) kind: K,
    settings: HandlerSettings,
}

impl<K: ResourceKind> ResourceHandler<K> {
    pub fn new(kind: K) -> Self {
        Self::with_settings(kind, HandlerSettings::default())
    }

    pub fn with_settings(kind: K, settings: HandlerSettings) -> Self {
        Self { kind, settings }
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn settings(&self) -> HandlerSettings {
        self.settings
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Single entry point used by the reconciliation engine
    pub async fn handle(
        &self,
        action: Action,
        request: &ResourceHandlerRequest<K::Model>,
        context: CallbackContext,
    ) -> ProgressEvent<K::Model> {
        match action {
            Action::Create => self.create(request, context).await.into(),
            Action::Read => self.read(request).await.into(),
            Action::Update => self.update(request, context).await.into(),
            Action::Delete => self.delete(request, context).await.into(),
            Action::List => self.list(request).await.into(),
        }
    }

    pub async fn create(
        &self,
        request: &ResourceHandlerRequest<K::Model>,
        context: CallbackContext,
    ) -> Outcome<K::Model> {
        let span = info_span!("handler", type_name = self.type_name(), action = %Action::Create);
        self.try_create(request, context).instrument(span).await.into()
    }

    pub async fn read(&self, request: &ResourceHandlerRequest<K::Model>) -> Outcome<K::Model> {
        let span = info_span!("handler", type_name = self.type_name(), action = %Action::Read);
        let handle = self.kind.handle(&request.desired_resource_state);
        self.read_model(&handle).instrument(span).await.into()
    }

    pub async fn update(
        &self,
        request: &ResourceHandlerRequest<K::Model>,
        context: CallbackContext,
    ) -> Outcome<K::Model> {
        let span = info_span!("handler", type_name = self.type_name(), action = %Action::Update);
        self.try_update(request, context).instrument(span).await.into()
    }

    pub async fn delete(
        &self,
        request: &ResourceHandlerRequest<K::Model>,
        context: CallbackContext,
    ) -> Outcome<K::Model> {
        let span = info_span!("handler", type_name = self.type_name(), action = %Action::Delete);
        self.try_delete(request, context).instrument(span).await.into()
    }

    async fn try_create(
        &self,
        request: &ResourceHandlerRequest<K::Model>,
        context: CallbackContext,
    ) -> Result<Outcome<K::Model>> {
        let type_name = self.type_name();
        let mut model = request.desired_resource_state.clone();

        if context.is_stabilizing() {
            if let Some(id) = context.resource_id.as_deref() {
                self.kind.assign_identifier(&mut model, id);
            }
        } else {
            let target = self.kind.handle(&model);
            let create_request = self
                .kind
                .create_request(&model, &request.client_request_token);
            let created = self
                .kind
                .create(create_request)
                .await
                .map_err(|err| self.remote_error("create", &target, err))?;

            let identifier = self.kind.observe(&created).identifier;
            if identifier.trim().is_empty() {
                return Err(HandlerError::GeneralServiceError(format!(
                    "{} create returned no identifier",
                    type_name
                )));
            }
            info!("{} [{}] creation requested successfully", type_name, identifier);
            self.kind.assign_identifier(&mut model, &identifier);
        }

        let handle = self.kind.handle(&model);
        let identifier = handle.identifier(type_name)?.to_string();

        match self.poll(Mutation::Create, &handle, &identifier).await? {
            Poll::Pending(_) => Ok(self.in_progress(model, context, &identifier)),
            Poll::Stable(_) => self.read_model(&handle).await,
        }
    }

    async fn try_update(
        &self,
        request: &ResourceHandlerRequest<K::Model>,
        context: CallbackContext,
    ) -> Result<Outcome<K::Model>> {
        let type_name = self.type_name();
        let model = request.desired_resource_state.clone();
        let handle = self.resume_handle(&model, &context);
        let identifier = handle.identifier(type_name)?.to_string();

        if !context.is_stabilizing() {
            self.ensure_present(&handle, &identifier).await?;

            let update_request = self
                .kind
                .update_request(&model, &request.client_request_token);
            self.kind
                .update(&handle, update_request)
                .await
                .map_err(|err| self.remote_error("update", &handle, err))?;
            info!("{} [{}] update requested successfully", type_name, identifier);

            if self.kind.update_mode() == UpdateMode::Immediate {
                return self.read_model(&handle).await;
            }
        }

        match self.poll(Mutation::Update, &handle, &identifier).await? {
            Poll::Pending(_) => Ok(self.in_progress(model, context, &identifier)),
            Poll::Stable(_) => self.read_model(&handle).await,
        }
    }

    async fn try_delete(
        &self,
        request: &ResourceHandlerRequest<K::Model>,
        context: CallbackContext,
    ) -> Result<Outcome<K::Model>> {
        let type_name = self.type_name();
        let model = request.desired_resource_state.clone();
        let handle = self.resume_handle(&model, &context);
        let identifier = handle.identifier(type_name)?.to_string();

        if !context.is_stabilizing() {
            let state = self.ensure_present(&handle, &identifier).await?;
            let transitions = self.kind.state_table().transitions(Mutation::Delete);

            if transitions.verdict(state) == Verdict::InProgress {
                info!(
                    "{} [{}] deletion already in progress, skipping delete call",
                    type_name, identifier
                );
            } else {
                self.kind
                    .delete(&handle, &request.client_request_token)
                    .await
                    .map_err(|err| self.remote_error("delete", &handle, err))?;
                info!("{} [{}] deletion requested successfully", type_name, identifier);
            }
        }

        match self.poll(Mutation::Delete, &handle, &identifier).await? {
            Poll::Pending(_) => Ok(self.in_progress(model, context, &identifier)),
            Poll::Stable(_) => Ok(Outcome::Success { model: None }),
        }
    }

    /// Fetch, reject absent resources, translate
    async fn read_model(&self, handle: &ResourceHandle) -> Result<Outcome<K::Model>> {
        let type_name = self.type_name();
        let identifier = handle.identifier(type_name)?;

        let resource = self
            .kind
            .get(handle)
            .await
            .map_err(|err| self.remote_error("describe", handle, err))?;
        let observation = self.kind.observe(&resource);

        if self.kind.state_table().is_absent(observation.state) {
            info!(
                "{} [{}] is {}, reporting not found",
                type_name, identifier, observation.state_label
            );
            return Err(HandlerError::not_found(type_name, identifier));
        }

        debug!("{} [{}] read succeeded", type_name, identifier);
        Ok(Outcome::Success {
            model: Some(self.kind.to_model(handle, &resource)),
        })
    }

    /// Pre-check shared by update and delete
    async fn ensure_present(
        &self,
        handle: &ResourceHandle,
        identifier: &str,
    ) -> Result<ResourceState> {
        let resource = self
            .kind
            .get(handle)
            .await
            .map_err(|err| self.remote_error("describe", handle, err))?;
        let observation = self.kind.observe(&resource);

        if self.kind.state_table().is_absent(observation.state) {
            info!(
                "{} [{}] is {}, reporting not found",
                self.type_name(),
                identifier,
                observation.state_label
            );
            return Err(HandlerError::not_found(self.type_name(), identifier));
        }
        Ok(observation.state)
    }

    async fn poll(
        &self,
        mutation: Mutation,
        handle: &ResourceHandle,
        identifier: &str,
    ) -> Result<Poll> {
        let transitions = self.kind.state_table().transitions(mutation);
        Stabilizer::new(self.type_name(), identifier, mutation, transitions)
            .poll(self.kind.get(handle), |resource| self.kind.observe(resource))
            .await
    }

    /// Model handle, with the id from a resumed context taking precedence
    fn resume_handle(&self, model: &K::Model, context: &CallbackContext) -> ResourceHandle {
        let handle = self.kind.handle(model);
        match (&context.resource_id, context.is_stabilizing()) {
            (Some(id), true) => handle.with_resource_id(id.clone()),
            _ => handle,
        }
    }

    fn in_progress(
        &self,
        mut model: K::Model,
        context: CallbackContext,
        identifier: &str,
    ) -> Outcome<K::Model> {
        self.kind.assign_identifier(&mut model, identifier);
        Outcome::InProgress {
            model,
            context: context.next_poll(identifier),
            callback_delay_seconds: self.settings.callback_delay_seconds,
        }
    }

    pub(crate) fn remote_error(
        &self,
        call: &str,
        target: &ResourceHandle,
        err: K::Error,
    ) -> HandlerError {
        let classified = classify(self.type_name(), &err);
        warn!(
            "{} [{}] {} failed: {}",
            self.type_name(),
            target,
            call,
            classified
        );
        classified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HandlerErrorCode, RemoteErrorKind};
    use crate::event::OperationStatus;
    use crate::fake::{Call, ScriptedKind, Widget};

    fn request(model: Widget) -> ResourceHandlerRequest<Widget> {
        ResourceHandlerRequest::new("t1", model)
    }

    fn in_progress_context(outcome: &Outcome<Widget>) -> CallbackContext {
        match outcome {
            Outcome::InProgress { context, .. } => context.clone(),
            other => panic!("expected in progress, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_polls_then_chains_read() {
        let handler = ResourceHandler::new(
            ScriptedKind::new("r1").with_states(&["CREATE_IN_PROGRESS", "READY"]),
        );
        let request = request(Widget::named("lamp"));

        let first = handler.create(&request, CallbackContext::new()).await;
        assert_eq!(first.status(), OperationStatus::InProgress);
        assert_eq!(first.model().and_then(|m| m.widget_id.as_deref()), Some("r1"));
        let context = in_progress_context(&first);
        assert!(context.is_stabilizing());
        assert_eq!(context.resource_id.as_deref(), Some("r1"));

        let second = handler.create(&request, context).await;
        assert_eq!(second.status(), OperationStatus::Success);
        let model = second.model().unwrap();
        assert_eq!(model.widget_id.as_deref(), Some("r1"));
        // from the chained read, not the sparse create response
        assert_eq!(model.color.as_deref(), Some("red"));
        assert_eq!(model.name.as_deref(), Some("lamp"));

        assert_eq!(handler.kind().calls(Call::Create), 1);
        assert_eq!(handler.kind().last_create_token().as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn test_create_result_equals_read() {
        let handler = ResourceHandler::new(ScriptedKind::new("r1").with_states(&["READY"]));
        let created = handler
            .create(&request(Widget::named("lamp")), CallbackContext::new())
            .await;
        let created = created.model().cloned().unwrap();

        let read = handler.read(&request(created.clone())).await;
        assert_eq!(read.model(), Some(&created));
    }

    #[tokio::test]
    async fn test_create_finding_deleted_is_general_service_error() {
        let handler = ResourceHandler::new(ScriptedKind::new("r1").with_states(&["DELETED"]));
        let outcome = handler
            .create(&request(Widget::named("lamp")), CallbackContext::new())
            .await;
        assert_eq!(
            outcome.error().map(HandlerError::code),
            Some(HandlerErrorCode::GeneralServiceError)
        );
    }

    #[tokio::test]
    async fn test_create_failed_state_reports_status() {
        let handler = ResourceHandler::new(
            ScriptedKind::new("r1")
                .with_states(&["CREATE_FAILED"])
                .with_status("INTERNAL_ERROR", "subnet missing"),
        );
        let outcome = handler
            .create(&request(Widget::named("lamp")), CallbackContext::new())
            .await;
        assert_eq!(
            outcome.error(),
            Some(&HandlerError::GeneralServiceError(
                "Unexpected state CREATE_FAILED: INTERNAL_ERROR - subnet missing".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_resumed_create_does_not_recreate() {
        let handler = ResourceHandler::new(ScriptedKind::new("r1").with_states(&["READY"]));
        let context = CallbackContext::new().next_poll("r1");

        let outcome = handler.create(&request(Widget::named("lamp")), context).await;
        assert_eq!(outcome.status(), OperationStatus::Success);
        assert_eq!(handler.kind().calls(Call::Create), 0);
    }

    #[tokio::test]
    async fn test_delete_absent_is_not_found_without_delete_call() {
        for state in ["DELETED", "CREATE_FAILED"] {
            let handler = ResourceHandler::new(ScriptedKind::new("r1").with_states(&[state]));
            let outcome = handler
                .delete(&request(Widget::existing("r1")), CallbackContext::new())
                .await;

            assert_eq!(
                outcome.error().map(HandlerError::code),
                Some(HandlerErrorCode::NotFound)
            );
            assert_eq!(handler.kind().calls(Call::Delete), 0);
        }
    }

    #[tokio::test]
    async fn test_delete_stabilizes_with_one_delete_call() {
        let handler = ResourceHandler::new(
            ScriptedKind::new("r1").with_states(&["READY", "DELETE_IN_PROGRESS", "DELETED"]),
        );
        let request = request(Widget::existing("r1"));

        let first = handler.delete(&request, CallbackContext::new()).await;
        assert_eq!(first.status(), OperationStatus::InProgress);

        let second = handler.delete(&request, in_progress_context(&first)).await;
        assert_eq!(second, Outcome::Success { model: None });
        assert_eq!(handler.kind().calls(Call::Delete), 1);
    }

    #[tokio::test]
    async fn test_delete_in_flight_skips_delete_call() {
        let handler = ResourceHandler::new(
            ScriptedKind::new("r1").with_states(&["DELETE_IN_PROGRESS", "DELETED"]),
        );
        let outcome = handler
            .delete(&request(Widget::existing("r1")), CallbackContext::new())
            .await;

        assert_eq!(outcome, Outcome::Success { model: None });
        assert_eq!(handler.kind().calls(Call::Delete), 0);
    }

    #[tokio::test]
    async fn test_delete_requires_identifier() {
        let handler = ResourceHandler::new(ScriptedKind::new("r1"));
        let outcome = handler
            .delete(&request(Widget::named("lamp")), CallbackContext::new())
            .await;
        assert_eq!(
            outcome.error().map(HandlerError::code),
            Some(HandlerErrorCode::InvalidRequest)
        );
        assert!(handler.kind().call_log().is_empty());
    }

    #[tokio::test]
    async fn test_update_on_deleted_is_not_found() {
        let handler = ResourceHandler::new(ScriptedKind::new("r1").with_states(&["DELETED"]));
        let outcome = handler
            .update(&request(Widget::existing("r1")), CallbackContext::new())
            .await;

        assert_eq!(
            outcome.error().map(HandlerError::code),
            Some(HandlerErrorCode::NotFound)
        );
        assert_eq!(handler.kind().calls(Call::Update), 0);
    }

    #[tokio::test]
    async fn test_update_is_sparse() {
        let handler = ResourceHandler::new(
            ScriptedKind::new("r1").with_states(&["READY", "UPDATE_IN_PROGRESS", "READY"]),
        );
        let desired = Widget {
            name: Some("renamed".to_string()),
            color: Some("  ".to_string()),
            ..Widget::existing("r1")
        };
        let request = request(desired);

        let first = handler.update(&request, CallbackContext::new()).await;
        assert_eq!(first.status(), OperationStatus::InProgress);

        let sent = handler.kind().last_update().unwrap();
        assert_eq!(sent.name.as_deref(), Some("renamed"));
        assert_eq!(sent.color, None);

        let second = handler.update(&request, in_progress_context(&first)).await;
        let model = second.model().unwrap();
        assert_eq!(model.name.as_deref(), Some("renamed"));
        assert_eq!(model.color.as_deref(), Some("red"));
        assert_eq!(handler.kind().calls(Call::Update), 1);
    }

    #[tokio::test]
    async fn test_immediate_update_skips_stabilization() {
        let handler = ResourceHandler::new(
            ScriptedKind::new("r1")
                .with_states(&["READY"])
                .with_update_mode(UpdateMode::Immediate),
        );
        let desired = Widget {
            name: Some("renamed".to_string()),
            ..Widget::existing("r1")
        };

        let outcome = handler.update(&request(desired), CallbackContext::new()).await;
        assert_eq!(outcome.status(), OperationStatus::Success);
        assert_eq!(
            handler.kind().call_log(),
            vec![Call::Get, Call::Update, Call::Get]
        );
    }

    #[tokio::test]
    async fn test_read_absent_is_not_found() {
        let handler = ResourceHandler::new(ScriptedKind::new("r1").with_states(&["CREATE_FAILED"]));
        let outcome = handler.read(&request(Widget::existing("r1"))).await;
        assert_eq!(
            outcome.error(),
            Some(&HandlerError::not_found("Test::Widget", "r1"))
        );
    }

    #[tokio::test]
    async fn test_read_is_idempotent() {
        let handler = ResourceHandler::new(ScriptedKind::new("r1").with_states(&["READY"]));
        let request = request(Widget::existing("r1"));

        let first = handler.read(&request).await;
        let second = handler.read(&request).await;
        assert_eq!(first.status(), OperationStatus::Success);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_throttling_surfaces_from_every_step() {
        let steps = [
            (Action::Create, Call::Create, Widget::named("lamp"), vec!["READY"]),
            (Action::Create, Call::Get, Widget::named("lamp"), vec!["READY"]),
            (Action::Read, Call::Get, Widget::existing("r1"), vec!["READY"]),
            (Action::Update, Call::Get, Widget::existing("r1"), vec!["READY"]),
            (Action::Update, Call::Update, Widget::existing("r1"), vec!["READY"]),
            (Action::Delete, Call::Get, Widget::existing("r1"), vec!["READY"]),
            (Action::Delete, Call::Delete, Widget::existing("r1"), vec!["READY"]),
            (Action::List, Call::List, Widget::existing("r1"), vec!["READY"]),
        ];

        for (action, call, model, states) in steps {
            let handler = ResourceHandler::new(
                ScriptedKind::new("r1")
                    .with_states(&states)
                    .fail_on(call, RemoteErrorKind::Throttling),
            );
            let event = handler
                .handle(action, &request(model), CallbackContext::new())
                .await;

            assert_eq!(event.status, OperationStatus::Failed, "{} / {:?}", action, call);
            assert_eq!(
                event.error_code,
                Some(HandlerErrorCode::Throttling),
                "{} / {:?}",
                action,
                call
            );
        }
    }

    #[tokio::test]
    async fn test_delete_poll_seeing_ready_fails() {
        let handler = ResourceHandler::new(ScriptedKind::new("r1").with_states(&["READY"]));
        let outcome = handler
            .delete(&request(Widget::existing("r1")), CallbackContext::new())
            .await;

        assert_eq!(
            outcome.error().map(HandlerError::code),
            Some(HandlerErrorCode::GeneralServiceError)
        );
        assert_eq!(handler.kind().calls(Call::Delete), 1);
    }

    #[tokio::test]
    async fn test_resumed_poll_error_is_classified() {
        let request = request(Widget::existing("r1"));
        let handler = ResourceHandler::new(
            ScriptedKind::new("r1")
                .with_states(&["DELETE_IN_PROGRESS"])
                .fail_on(Call::Get, RemoteErrorKind::AccessDenied),
        );
        let context = CallbackContext::new().next_poll("r1");
        let outcome = handler.delete(&request, context).await;
        assert_eq!(
            outcome.error().map(HandlerError::code),
            Some(HandlerErrorCode::AccessDenied)
        );
        assert_eq!(handler.kind().calls(Call::Delete), 0);
    }

    #[tokio::test]
    async fn test_callback_delay_from_settings() {
        let handler = ResourceHandler::with_settings(
            ScriptedKind::new("r1").with_states(&["CREATE_IN_PROGRESS"]),
            HandlerSettings {
                callback_delay_seconds: 30,
            },
        );
        let event = handler
            .handle(
                Action::Create,
                &request(Widget::named("lamp")),
                CallbackContext::new(),
            )
            .await;

        assert_eq!(event.status, OperationStatus::InProgress);
        assert_eq!(event.callback_delay_seconds, Some(30));
        assert_eq!(event.callback_context.map(|c| c.polls), Some(1));
    }
}
