//! Scripted resource kind used by the engine tests

use crate::error::{RemoteErrorKind, RemoteFault};
use crate::resource::{Page, ResourceHandle, ResourceKind, UpdateMode};
use crate::state::Observation;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub const TYPE_NAME: &str = "Test::Widget";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Widget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Widget {
    pub fn named(name: &str) -> Self {
        Self {
            parent_id: Some("p1".to_string()),
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn existing(id: &str) -> Self {
        Self {
            parent_id: Some("p1".to_string()),
            widget_id: Some(id.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RemoteWidget {
    pub id: String,
    pub parent: String,
    pub name: String,
    pub color: String,
    pub state: String,
    pub status_code: Option<String>,
    pub status_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WidgetCreate {
    pub token: String,
    pub parent: String,
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetUpdate {
    pub token: String,
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("scripted {0:?}")]
pub struct FakeError(pub RemoteErrorKind);

impl RemoteFault for FakeError {
    fn kind(&self) -> RemoteErrorKind {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    Create,
    Get,
    Update,
    Delete,
    List,
}

#[derive(Default)]
struct Script {
    states: VecDeque<String>,
    record: RemoteWidget,
    failures: HashMap<Call, RemoteErrorKind>,
    calls: Vec<Call>,
    listing: Vec<RemoteWidget>,
    list_token: Option<String>,
    last_update: Option<WidgetUpdate>,
    last_list_token: Option<String>,
    last_create_token: Option<String>,
}

impl Script {
    fn enter(&mut self, call: Call) -> Result<(), FakeError> {
        self.calls.push(call);
        match self.failures.remove(&call) {
            Some(kind) => Err(FakeError(kind)),
            None => Ok(()),
        }
    }

    /// Last scripted state is sticky
    fn next_state(&mut self) -> String {
        if self.states.len() > 1 {
            self.states.pop_front().unwrap_or_default()
        } else {
            self.states.front().cloned().unwrap_or_else(|| "READY".to_string())
        }
    }
}

/// Replays scripted `get` states and records every remote call
pub struct ScriptedKind {
    script: Mutex<Script>,
    update_mode: UpdateMode,
}

impl ScriptedKind {
    pub fn new(created_id: &str) -> Self {
        let script = Script {
            record: RemoteWidget {
                id: created_id.to_string(),
                parent: "p1".to_string(),
                name: "original".to_string(),
                color: "red".to_string(),
                ..RemoteWidget::default()
            },
            ..Script::default()
        };
        Self {
            script: Mutex::new(script),
            update_mode: UpdateMode::Stabilize,
        }
    }

    pub fn with_states(self, states: &[&str]) -> Self {
        self.lock().states = states.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_status(self, code: &str, message: &str) -> Self {
        {
            let mut script = self.lock();
            script.record.status_code = Some(code.to_string());
            script.record.status_message = Some(message.to_string());
        }
        self
    }

    pub fn with_update_mode(mut self, mode: UpdateMode) -> Self {
        self.update_mode = mode;
        self
    }

    pub fn with_listing(self, states: &[&str], next_token: Option<&str>) -> Self {
        {
            let mut script = self.lock();
            script.listing = states
                .iter()
                .enumerate()
                .map(|(i, state)| RemoteWidget {
                    id: format!("w{}", i),
                    parent: "p1".to_string(),
                    name: format!("widget {}", i),
                    color: "blue".to_string(),
                    state: state.to_string(),
                    ..RemoteWidget::default()
                })
                .collect();
            script.list_token = next_token.map(str::to_string);
        }
        self
    }

    pub fn fail_on(self, call: Call, kind: RemoteErrorKind) -> Self {
        self.lock().failures.insert(call, kind);
        self
    }

    pub fn calls(&self, call: Call) -> usize {
        self.lock().calls.iter().filter(|c| **c == call).count()
    }

    pub fn call_log(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn last_update(&self) -> Option<WidgetUpdate> {
        self.lock().last_update.clone()
    }

    pub fn last_list_token(&self) -> Option<String> {
        self.lock().last_list_token.clone()
    }

    pub fn last_create_token(&self) -> Option<String> {
        self.lock().last_create_token.clone()
    }

    pub fn record(&self) -> RemoteWidget {
        self.lock().record.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

#[async_trait]
impl ResourceKind for ScriptedKind {
    type Model = Widget;
    type Resource = RemoteWidget;
    type CreateRequest = WidgetCreate;
    type UpdateRequest = WidgetUpdate;
    type Error = FakeError;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn update_mode(&self) -> UpdateMode {
        self.update_mode
    }

    fn handle(&self, model: &Widget) -> ResourceHandle {
        ResourceHandle::scoped(model.parent_id.clone(), model.widget_id.clone())
    }

    fn assign_identifier(&self, model: &mut Widget, identifier: &str) {
        model.widget_id = Some(identifier.to_string());
    }

    fn observe(&self, resource: &RemoteWidget) -> Observation {
        Observation::new(&resource.id, &resource.state)
            .with_status(resource.status_code.clone(), resource.status_message.clone())
    }

    fn create_request(&self, model: &Widget, client_token: &str) -> WidgetCreate {
        WidgetCreate {
            token: client_token.to_string(),
            parent: model.parent_id.clone().unwrap_or_default(),
            name: non_blank(&model.name),
            color: non_blank(&model.color),
        }
    }

    fn update_request(&self, model: &Widget, client_token: &str) -> WidgetUpdate {
        WidgetUpdate {
            token: client_token.to_string(),
            name: non_blank(&model.name),
            color: non_blank(&model.color),
        }
    }

    fn to_model(&self, scope: &ResourceHandle, resource: &RemoteWidget) -> Widget {
        Widget {
            parent_id: scope.parent_id.clone(),
            widget_id: Some(resource.id.clone()),
            name: Some(resource.name.clone()),
            color: Some(resource.color.clone()),
        }
    }

    async fn create(&self, request: WidgetCreate) -> Result<RemoteWidget, FakeError> {
        let mut script = self.lock();
        script.enter(Call::Create)?;
        script.last_create_token = Some(request.token);
        if let Some(name) = request.name {
            script.record.name = name;
        }
        if let Some(color) = request.color {
            script.record.color = color;
        }
        // Create responses carry only id and state
        Ok(RemoteWidget {
            id: script.record.id.clone(),
            state: "CREATE_IN_PROGRESS".to_string(),
            ..RemoteWidget::default()
        })
    }

    async fn get(&self, _handle: &ResourceHandle) -> Result<RemoteWidget, FakeError> {
        let mut script = self.lock();
        script.enter(Call::Get)?;
        let state = script.next_state();
        Ok(RemoteWidget {
            state,
            ..script.record.clone()
        })
    }

    async fn update(&self, _handle: &ResourceHandle, request: WidgetUpdate) -> Result<(), FakeError> {
        let mut script = self.lock();
        script.enter(Call::Update)?;
        if let Some(name) = &request.name {
            script.record.name = name.clone();
        }
        if let Some(color) = &request.color {
            script.record.color = color.clone();
        }
        script.last_update = Some(request);
        Ok(())
    }

    async fn delete(&self, _handle: &ResourceHandle, _client_token: &str) -> Result<(), FakeError> {
        self.lock().enter(Call::Delete)
    }

    async fn list(
        &self,
        _scope: &ResourceHandle,
        next_token: Option<&str>,
    ) -> Result<Page<RemoteWidget>, FakeError> {
        let mut script = self.lock();
        script.enter(Call::List)?;
        script.last_list_token = next_token.map(str::to_string);
        Ok(Page::new(script.listing.clone(), script.list_token.clone()))
    }
}
