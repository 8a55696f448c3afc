//! In-memory Nimble Studio service
//!
//! Backs the CLI and the integration tests. Resources move through the same
//! lifecycle states as the real service: a create, update or delete puts
//! the resource into a transitional state that it leaves after a fixed
//! number of `get` calls.

use crate::api::{
    CreateLaunchProfileRequest, CreateStreamingImageRequest, CreateStudioComponentRequest,
    CreateStudioRequest, Lifecycle, NimbleApi, RemoteLaunchProfile, RemoteStreamingImage,
    RemoteStudio, RemoteStudioComponent, UpdateLaunchProfileRequest, UpdateStreamingImageRequest,
    UpdateStudioComponentRequest, UpdateStudioRequest,
};
use crate::error::{NimbleError, NimbleErrorKind, Result};
use crate::resource_type::ResourceType;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Mutex, MutexGuard};
use studioflow_cloud::{Page, ResourceState};
use tracing::debug;

pub const DEFAULT_SETTLE_AFTER_POLLS: u32 = 2;
pub const DEFAULT_PAGE_SIZE: usize = 25;
pub const DEFAULT_REGION: &str = "us-west-2";

/// Remote operation, for fault injection and call counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Get,
    Update,
    Delete,
    List,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Get => write!(f, "get"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
            Operation::List => write!(f, "list"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApiCall {
    pub resource: ResourceType,
    pub operation: Operation,
}

impl ApiCall {
    pub fn new(resource: ResourceType, operation: Operation) -> Self {
        Self {
            resource,
            operation,
        }
    }
}

fn status_prefix(kind: ResourceType) -> String {
    kind.slug().replace('-', "_").to_ascii_uppercase()
}

fn is_transitional(state: ResourceState) -> bool {
    matches!(
        state,
        ResourceState::CreateInProgress
            | ResourceState::UpdateInProgress
            | ResourceState::DeleteInProgress
    )
}

struct Entry<T> {
    resource: T,
    /// Gets left before a transitional state settles
    remaining: u32,
    /// Set by `force_state`; the state no longer advances
    pinned: bool,
    client_token: String,
    /// Debug rendering of the create request
    fingerprint: String,
}

impl<T: Stored> Entry<T> {
    fn transition(&mut self, state: ResourceState, settle: u32) {
        let verb = match state {
            ResourceState::CreateInProgress => "CREATE_IN_PROGRESS",
            ResourceState::UpdateInProgress => "UPDATE_IN_PROGRESS",
            ResourceState::DeleteInProgress => "DELETE_IN_PROGRESS",
            other => other.as_str(),
        };
        let message = format!("{} {}", T::KIND.slug(), verb.to_ascii_lowercase().replace('_', " "));
        self.resource.lifecycle_mut().set(
            state,
            &format!("{}_{}", status_prefix(T::KIND), verb),
            &message,
        );
        self.remaining = settle;
        self.pinned = false;
    }

    /// One `get` worth of progress
    fn advance(&mut self) {
        if self.pinned {
            return;
        }
        let (settled, code, message) = match self.resource.lifecycle().state() {
            ResourceState::CreateInProgress => (ResourceState::Ready, "CREATED", "Create complete"),
            ResourceState::UpdateInProgress => (ResourceState::Ready, "UPDATED", "Update complete"),
            ResourceState::DeleteInProgress => (ResourceState::Deleted, "DELETED", "Delete complete"),
            _ => return,
        };
        if self.remaining > 0 {
            self.remaining -= 1;
            return;
        }
        self.resource.lifecycle_mut().set(
            settled,
            &format!("{}_{}", status_prefix(T::KIND), code),
            message,
        );
    }
}

/// Idempotency key of one create call
struct CreateKey {
    parent_id: String,
    client_token: String,
    fingerprint: String,
}

impl CreateKey {
    fn of(parent_id: &str, client_token: &str, request: &impl Debug) -> Self {
        Self {
            parent_id: parent_id.to_string(),
            client_token: client_token.to_string(),
            fingerprint: format!("{:?}", request),
        }
    }
}

/// Shared access to the four kinds' tables
trait Stored: Clone {
    const KIND: ResourceType;

    fn id(&self) -> &str;

    /// Owning studio, empty for studios
    fn parent_id(&self) -> &str;

    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    fn entries(store: &Store) -> &Vec<Entry<Self>>;

    fn entries_mut(store: &mut Store) -> &mut Vec<Entry<Self>>;
}

impl Stored for RemoteStudio {
    const KIND: ResourceType = ResourceType::Studio;

    fn id(&self) -> &str {
        &self.studio_id
    }

    fn parent_id(&self) -> &str {
        ""
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn entries(store: &Store) -> &Vec<Entry<Self>> {
        &store.studios
    }

    fn entries_mut(store: &mut Store) -> &mut Vec<Entry<Self>> {
        &mut store.studios
    }
}

impl Stored for RemoteStudioComponent {
    const KIND: ResourceType = ResourceType::StudioComponent;

    fn id(&self) -> &str {
        &self.studio_component_id
    }

    fn parent_id(&self) -> &str {
        &self.studio_id
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn entries(store: &Store) -> &Vec<Entry<Self>> {
        &store.studio_components
    }

    fn entries_mut(store: &mut Store) -> &mut Vec<Entry<Self>> {
        &mut store.studio_components
    }
}

impl Stored for RemoteLaunchProfile {
    const KIND: ResourceType = ResourceType::LaunchProfile;

    fn id(&self) -> &str {
        &self.launch_profile_id
    }

    fn parent_id(&self) -> &str {
        &self.studio_id
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn entries(store: &Store) -> &Vec<Entry<Self>> {
        &store.launch_profiles
    }

    fn entries_mut(store: &mut Store) -> &mut Vec<Entry<Self>> {
        &mut store.launch_profiles
    }
}

impl Stored for RemoteStreamingImage {
    const KIND: ResourceType = ResourceType::StreamingImage;

    fn id(&self) -> &str {
        &self.streaming_image_id
    }

    fn parent_id(&self) -> &str {
        &self.studio_id
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn entries(store: &Store) -> &Vec<Entry<Self>> {
        &store.streaming_images
    }

    fn entries_mut(store: &mut Store) -> &mut Vec<Entry<Self>> {
        &mut store.streaming_images
    }
}

#[derive(Default)]
struct Store {
    studios: Vec<Entry<RemoteStudio>>,
    studio_components: Vec<Entry<RemoteStudioComponent>>,
    launch_profiles: Vec<Entry<RemoteLaunchProfile>>,
    streaming_images: Vec<Entry<RemoteStreamingImage>>,
    sequences: HashMap<ResourceType, u64>,
    failures: HashMap<ApiCall, NimbleErrorKind>,
    calls: HashMap<ApiCall, usize>,
}

impl Store {
    /// Count the call and consume an injected failure, if any
    fn enter(&mut self, resource: ResourceType, operation: Operation) -> Result<()> {
        let call = ApiCall::new(resource, operation);
        *self.calls.entry(call).or_default() += 1;
        match self.failures.remove(&call) {
            Some(kind) => Err(NimbleError::new(
                kind,
                format!("injected failure on {} {}", resource, operation),
            )),
            None => Ok(()),
        }
    }

    fn next_id(&mut self, kind: ResourceType) -> String {
        let n = self.sequences.entry(kind).or_insert(0);
        *n += 1;
        format!("{}-{}", kind.id_prefix(), n)
    }

    /// A child may only be created under a live studio
    fn require_live_studio(&self, studio_id: &str) -> Result<()> {
        if studio_id.trim().is_empty() {
            return Err(NimbleError::validation("studioId is required"));
        }
        let live = self.studios.iter().any(|entry| {
            entry.resource.studio_id == studio_id
                && !matches!(
                    entry.resource.lifecycle.state(),
                    ResourceState::Deleted | ResourceState::CreateFailed
                )
        });
        if live {
            Ok(())
        } else {
            Err(NimbleError::not_found("studio", studio_id))
        }
    }

    fn find_mut<T: Stored>(&mut self, parent_id: &str, id: &str) -> Result<&mut Entry<T>> {
        T::entries_mut(self)
            .iter_mut()
            .find(|entry| entry.resource.id() == id && entry.resource.parent_id() == parent_id)
            .ok_or_else(|| NimbleError::not_found(T::KIND.slug(), id))
    }

    /// Replay of a create already seen under the same parent and client token.
    /// A reused token with a different request is a validation error.
    fn replay<T: Stored>(&self, key: &CreateKey) -> Result<Option<T>> {
        if key.client_token.is_empty() {
            return Ok(None);
        }
        let seen = T::entries(self).iter().find(|entry| {
            entry.client_token == key.client_token && entry.resource.parent_id() == key.parent_id
        });
        match seen {
            Some(entry) if entry.fingerprint != key.fingerprint => Err(NimbleError::validation(
                format!(
                    "client token {} was already used with a different {} request",
                    key.client_token,
                    T::KIND.slug()
                ),
            )),
            Some(entry) => Ok(Some(entry.resource.clone())),
            None => Ok(None),
        }
    }

    fn insert<T: Stored>(&mut self, resource: T, key: CreateKey, settle: u32) -> T {
        let mut entry = Entry {
            resource,
            remaining: settle,
            pinned: false,
            client_token: key.client_token,
            fingerprint: key.fingerprint,
        };
        entry.transition(ResourceState::CreateInProgress, settle);
        let created = entry.resource.clone();
        T::entries_mut(self).push(entry);
        created
    }

    fn force<T: Stored>(&mut self, id: &str, state: ResourceState) -> bool {
        match T::entries_mut(self)
            .iter_mut()
            .find(|entry| entry.resource.id() == id)
        {
            Some(entry) => {
                entry.resource.lifecycle_mut().set(
                    state,
                    &format!("{}_{}", status_prefix(T::KIND), state.as_str()),
                    &format!("state forced to {}", state),
                );
                entry.pinned = true;
                true
            }
            None => false,
        }
    }
}

/// Reject mutations of deleted or still-transitioning resources
fn check_mutable(kind: ResourceType, id: &str, state: ResourceState) -> Result<()> {
    if state == ResourceState::Deleted {
        return Err(NimbleError::not_found(kind.slug(), id));
    }
    if is_transitional(state) {
        return Err(NimbleError::conflict(kind.slug(), id, state.as_str()));
    }
    Ok(())
}

/// Simulated Nimble Studio service
pub struct InMemoryNimble {
    store: Mutex<Store>,
    settle_after_polls: u32,
    page_size: usize,
    region: String,
}

impl Default for InMemoryNimble {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNimble {
    pub fn new() -> Self {
        Self::with_settle_after_polls(DEFAULT_SETTLE_AFTER_POLLS)
    }

    pub fn with_settle_after_polls(settle_after_polls: u32) -> Self {
        Self {
            store: Mutex::new(Store::default()),
            settle_after_polls,
            page_size: DEFAULT_PAGE_SIZE,
            region: DEFAULT_REGION.to_string(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Make the next matching call fail with `kind`
    pub fn fail_next(&self, resource: ResourceType, operation: Operation, kind: NimbleErrorKind) {
        self.lock()
            .failures
            .insert(ApiCall::new(resource, operation), kind);
    }

    /// Pin a resource in `state` until the next mutation; false if unknown
    pub fn force_state(&self, id: &str, state: ResourceState) -> bool {
        let mut store = self.lock();
        match ResourceType::from_id(id) {
            Some(ResourceType::Studio) => store.force::<RemoteStudio>(id, state),
            Some(ResourceType::StudioComponent) => store.force::<RemoteStudioComponent>(id, state),
            Some(ResourceType::LaunchProfile) => store.force::<RemoteLaunchProfile>(id, state),
            Some(ResourceType::StreamingImage) => store.force::<RemoteStreamingImage>(id, state),
            None => false,
        }
    }

    /// Number of calls made so far, failed ones included
    pub fn calls(&self, resource: ResourceType, operation: Operation) -> usize {
        self.lock()
            .calls
            .get(&ApiCall::new(resource, operation))
            .copied()
            .unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn get<T: Stored>(&self, parent_id: &str, id: &str) -> Result<T> {
        let mut store = self.lock();
        store.enter(T::KIND, Operation::Get)?;
        let entry = store.find_mut::<T>(parent_id, id)?;
        entry.advance();
        debug!("in-memory {} [{}] is {}", T::KIND, id, entry.resource.lifecycle().state);
        Ok(entry.resource.clone())
    }

    fn update<T: Stored>(
        &self,
        parent_id: &str,
        id: &str,
        synchronous: bool,
        apply: impl FnOnce(&mut T),
    ) -> Result<T> {
        let settle = self.settle_after_polls;
        let mut store = self.lock();
        store.enter(T::KIND, Operation::Update)?;
        let entry = store.find_mut::<T>(parent_id, id)?;
        check_mutable(T::KIND, id, entry.resource.lifecycle().state())?;

        apply(&mut entry.resource);
        if !synchronous {
            entry.transition(ResourceState::UpdateInProgress, settle);
        }
        Ok(entry.resource.clone())
    }

    fn delete<T: Stored>(&self, parent_id: &str, id: &str) -> Result<T> {
        let settle = self.settle_after_polls;
        let mut store = self.lock();
        store.enter(T::KIND, Operation::Delete)?;
        let entry = store.find_mut::<T>(parent_id, id)?;
        check_mutable(T::KIND, id, entry.resource.lifecycle().state())?;

        entry.transition(ResourceState::DeleteInProgress, settle);
        Ok(entry.resource.clone())
    }

    fn list<T: Stored>(&self, parent_id: &str, next_token: Option<&str>) -> Result<Page<T>> {
        let mut store = self.lock();
        store.enter(T::KIND, Operation::List)?;
        if T::KIND.parent().is_some() {
            if parent_id.trim().is_empty() {
                return Err(NimbleError::validation("studioId is required"));
            }
            if !store.studios.iter().any(|e| e.resource.studio_id == parent_id) {
                return Err(NimbleError::not_found("studio", parent_id));
            }
        }

        let offset = match next_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| NimbleError::validation(format!("invalid nextToken: {}", token)))?,
            None => 0,
        };

        let matching: Vec<&Entry<T>> = T::entries(&*store)
            .iter()
            .filter(|entry| entry.resource.parent_id() == parent_id)
            .collect();
        let items: Vec<T> = matching
            .iter()
            .skip(offset)
            .take(self.page_size)
            .map(|entry| entry.resource.clone())
            .collect();

        let consumed = offset + items.len();
        let next_token = (consumed < matching.len()).then(|| consumed.to_string());
        Ok(Page::new(items, next_token))
    }

    fn create<T: Stored>(
        &self,
        key: CreateKey,
        build: impl FnOnce(&mut Store) -> Result<T>,
    ) -> Result<T> {
        let mut store = self.lock();
        store.enter(T::KIND, Operation::Create)?;
        if let Some(existing) = store.replay::<T>(&key)? {
            debug!("in-memory {} replayed client token {}", T::KIND, key.client_token);
            return Ok(existing);
        }
        let resource = build(&mut *store)?;
        let created = store.insert(resource, key, self.settle_after_polls);
        debug!("in-memory {} [{}] created", T::KIND, created.id());
        Ok(created)
    }
}

fn required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(NimbleError::validation(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

#[async_trait]
impl NimbleApi for InMemoryNimble {
    async fn create_studio(&self, request: CreateStudioRequest) -> Result<RemoteStudio> {
        let region = self.region.clone();
        let key = CreateKey::of("", &request.client_token, &request);
        self.create(key, |store| {
            required("studioName", &request.studio_name)?;
            required("adminRoleArn", &request.admin_role_arn)?;
            required("userRoleArn", &request.user_role_arn)?;

            let studio_id = store.next_id(ResourceType::Studio);
            Ok(RemoteStudio {
                sso_client_id: format!("sso-{}", studio_id),
                studio_url: format!(
                    "https://{}.{}.nimblestudio.aws.example",
                    request.studio_name, region
                ),
                studio_id,
                studio_name: request.studio_name,
                display_name: request.display_name,
                admin_role_arn: request.admin_role_arn,
                user_role_arn: request.user_role_arn,
                home_region: region,
                encryption_configuration: request.encryption_configuration,
                tags: request.tags,
                lifecycle: Lifecycle::default(),
            })
        })
    }

    async fn get_studio(&self, studio_id: &str) -> Result<RemoteStudio> {
        self.get("", studio_id)
    }

    async fn update_studio(&self, request: UpdateStudioRequest) -> Result<RemoteStudio> {
        self.update("", &request.studio_id, false, |studio: &mut RemoteStudio| {
            if let Some(display_name) = request.display_name {
                studio.display_name = display_name;
            }
            if let Some(admin_role_arn) = request.admin_role_arn {
                studio.admin_role_arn = admin_role_arn;
            }
            if let Some(user_role_arn) = request.user_role_arn {
                studio.user_role_arn = user_role_arn;
            }
        })
    }

    async fn delete_studio(&self, studio_id: &str, _client_token: &str) -> Result<RemoteStudio> {
        self.delete("", studio_id)
    }

    async fn list_studios(&self, next_token: Option<&str>) -> Result<Page<RemoteStudio>> {
        self.list("", next_token)
    }

    async fn create_studio_component(
        &self,
        request: CreateStudioComponentRequest,
    ) -> Result<RemoteStudioComponent> {
        let key = CreateKey::of(&request.studio_id, &request.client_token, &request);
        self.create(key, |store| {
            store.require_live_studio(&request.studio_id)?;
            required("name", &request.name)?;
            required("type", &request.component_type)?;

            Ok(RemoteStudioComponent {
                studio_component_id: store.next_id(ResourceType::StudioComponent),
                studio_id: request.studio_id,
                name: request.name,
                description: request.description,
                component_type: request.component_type,
                subtype: request.subtype,
                configuration: request.configuration,
                ec2_security_group_ids: request.ec2_security_group_ids.unwrap_or_default(),
                initialization_scripts: request.initialization_scripts.unwrap_or_default(),
                script_parameters: request.script_parameters.unwrap_or_default(),
                tags: request.tags,
                lifecycle: Lifecycle::default(),
            })
        })
    }

    async fn get_studio_component(
        &self,
        studio_id: &str,
        studio_component_id: &str,
    ) -> Result<RemoteStudioComponent> {
        self.get(studio_id, studio_component_id)
    }

    async fn update_studio_component(
        &self,
        request: UpdateStudioComponentRequest,
    ) -> Result<RemoteStudioComponent> {
        let (studio_id, id) = (request.studio_id.clone(), request.studio_component_id.clone());
        self.update(&studio_id, &id, false, |component: &mut RemoteStudioComponent| {
            if let Some(name) = request.name {
                component.name = name;
            }
            if let Some(description) = request.description {
                component.description = Some(description);
            }
            if let Some(component_type) = request.component_type {
                component.component_type = component_type;
            }
            if let Some(configuration) = request.configuration {
                component.configuration = Some(configuration);
            }
            if let Some(ids) = request.ec2_security_group_ids {
                component.ec2_security_group_ids = ids;
            }
            if let Some(scripts) = request.initialization_scripts {
                component.initialization_scripts = scripts;
            }
            if let Some(parameters) = request.script_parameters {
                component.script_parameters = parameters;
            }
        })
    }

    async fn delete_studio_component(
        &self,
        studio_id: &str,
        studio_component_id: &str,
        _client_token: &str,
    ) -> Result<RemoteStudioComponent> {
        self.delete(studio_id, studio_component_id)
    }

    async fn list_studio_components(
        &self,
        studio_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<RemoteStudioComponent>> {
        self.list(studio_id, next_token)
    }

    async fn create_launch_profile(
        &self,
        request: CreateLaunchProfileRequest,
    ) -> Result<RemoteLaunchProfile> {
        let key = CreateKey::of(&request.studio_id, &request.client_token, &request);
        self.create(key, |store| {
            store.require_live_studio(&request.studio_id)?;
            required("name", &request.name)?;
            if request.stream_configuration.is_none() {
                return Err(NimbleError::validation("streamConfiguration is required"));
            }

            Ok(RemoteLaunchProfile {
                launch_profile_id: store.next_id(ResourceType::LaunchProfile),
                studio_id: request.studio_id,
                name: request.name,
                description: request.description,
                ec2_subnet_ids: request.ec2_subnet_ids,
                launch_profile_protocol_versions: request.launch_profile_protocol_versions,
                stream_configuration: request.stream_configuration,
                studio_component_ids: request.studio_component_ids,
                tags: request.tags,
                lifecycle: Lifecycle::default(),
            })
        })
    }

    async fn get_launch_profile(
        &self,
        studio_id: &str,
        launch_profile_id: &str,
    ) -> Result<RemoteLaunchProfile> {
        self.get(studio_id, launch_profile_id)
    }

    async fn update_launch_profile(
        &self,
        request: UpdateLaunchProfileRequest,
    ) -> Result<RemoteLaunchProfile> {
        let (studio_id, id) = (request.studio_id.clone(), request.launch_profile_id.clone());
        self.update(&studio_id, &id, false, |profile: &mut RemoteLaunchProfile| {
            if let Some(name) = request.name {
                profile.name = name;
            }
            if let Some(description) = request.description {
                profile.description = Some(description);
            }
            if let Some(stream_configuration) = request.stream_configuration {
                profile.stream_configuration = Some(stream_configuration);
            }
            if let Some(versions) = request.launch_profile_protocol_versions {
                profile.launch_profile_protocol_versions = versions;
            }
            if let Some(ids) = request.studio_component_ids {
                profile.studio_component_ids = ids;
            }
        })
    }

    async fn delete_launch_profile(
        &self,
        studio_id: &str,
        launch_profile_id: &str,
        _client_token: &str,
    ) -> Result<RemoteLaunchProfile> {
        self.delete(studio_id, launch_profile_id)
    }

    async fn list_launch_profiles(
        &self,
        studio_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<RemoteLaunchProfile>> {
        self.list(studio_id, next_token)
    }

    async fn create_streaming_image(
        &self,
        request: CreateStreamingImageRequest,
    ) -> Result<RemoteStreamingImage> {
        let key = CreateKey::of(&request.studio_id, &request.client_token, &request);
        self.create(key, |store| {
            store.require_live_studio(&request.studio_id)?;
            required("name", &request.name)?;
            required("ec2ImageId", &request.ec2_image_id)?;

            Ok(RemoteStreamingImage {
                streaming_image_id: store.next_id(ResourceType::StreamingImage),
                studio_id: request.studio_id,
                name: request.name,
                description: request.description,
                ec2_image_id: request.ec2_image_id,
                owner: "self".to_string(),
                platform: "LINUX".to_string(),
                eula_ids: Vec::new(),
                encryption_configuration: None,
                tags: request.tags,
                lifecycle: Lifecycle::default(),
            })
        })
    }

    async fn get_streaming_image(
        &self,
        studio_id: &str,
        streaming_image_id: &str,
    ) -> Result<RemoteStreamingImage> {
        self.get(studio_id, streaming_image_id)
    }

    async fn update_streaming_image(
        &self,
        request: UpdateStreamingImageRequest,
    ) -> Result<RemoteStreamingImage> {
        let (studio_id, id) = (request.studio_id.clone(), request.streaming_image_id.clone());
        self.update(&studio_id, &id, true, |image: &mut RemoteStreamingImage| {
            if let Some(name) = request.name {
                image.name = name;
            }
            if let Some(description) = request.description {
                image.description = Some(description);
            }
        })
    }

    async fn delete_streaming_image(
        &self,
        studio_id: &str,
        streaming_image_id: &str,
        _client_token: &str,
    ) -> Result<RemoteStreamingImage> {
        self.delete(studio_id, streaming_image_id)
    }

    async fn list_streaming_images(
        &self,
        studio_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<RemoteStreamingImage>> {
        self.list(studio_id, next_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn studio_request(token: &str) -> CreateStudioRequest {
        CreateStudioRequest {
            client_token: token.to_string(),
            studio_name: "weta".to_string(),
            display_name: "Weta".to_string(),
            admin_role_arn: "arn:admin".to_string(),
            user_role_arn: "arn:user".to_string(),
            ..CreateStudioRequest::default()
        }
    }

    #[test]
    fn test_create_settles_after_configured_polls() {
        let nimble = InMemoryNimble::with_settle_after_polls(2);
        let created = tokio_test::block_on(nimble.create_studio(studio_request("t1"))).unwrap();
        assert_eq!(created.studio_id, "studio-1");
        assert_eq!(created.lifecycle.state(), ResourceState::CreateInProgress);

        let states: Vec<ResourceState> = (0..3)
            .map(|_| {
                tokio_test::block_on(nimble.get_studio("studio-1"))
                    .unwrap()
                    .lifecycle
                    .state()
            })
            .collect();
        assert_eq!(
            states,
            vec![
                ResourceState::CreateInProgress,
                ResourceState::CreateInProgress,
                ResourceState::Ready
            ]
        );
        assert_eq!(nimble.calls(ResourceType::Studio, Operation::Get), 3);
    }

    #[test]
    fn test_client_token_replay() {
        let nimble = InMemoryNimble::new();
        let first = tokio_test::block_on(nimble.create_studio(studio_request("t1"))).unwrap();
        let again = tokio_test::block_on(nimble.create_studio(studio_request("t1"))).unwrap();
        let other = tokio_test::block_on(nimble.create_studio(studio_request("t2"))).unwrap();

        assert_eq!(first.studio_id, again.studio_id);
        assert_eq!(other.studio_id, "studio-2");
    }

    fn image_request(token: &str, studio_id: &str) -> CreateStreamingImageRequest {
        CreateStreamingImageRequest {
            client_token: token.to_string(),
            studio_id: studio_id.to_string(),
            name: "base".to_string(),
            ec2_image_id: "ami-1".to_string(),
            ..CreateStreamingImageRequest::default()
        }
    }

    #[test]
    fn test_client_token_is_scoped_by_studio() {
        let nimble = InMemoryNimble::new();
        tokio_test::block_on(nimble.create_studio(studio_request("sa"))).unwrap();
        tokio_test::block_on(nimble.create_studio(studio_request("sb"))).unwrap();
        nimble.force_state("studio-1", ResourceState::Ready);
        nimble.force_state("studio-2", ResourceState::Ready);

        let first =
            tokio_test::block_on(nimble.create_streaming_image(image_request("same", "studio-1")))
                .unwrap();
        let second =
            tokio_test::block_on(nimble.create_streaming_image(image_request("same", "studio-2")))
                .unwrap();

        assert_eq!((first.streaming_image_id.as_str(), first.studio_id.as_str()), ("si-1", "studio-1"));
        assert_eq!((second.streaming_image_id.as_str(), second.studio_id.as_str()), ("si-2", "studio-2"));
    }

    #[test]
    fn test_client_token_reused_with_different_request_is_invalid() {
        let nimble = InMemoryNimble::new();
        tokio_test::block_on(nimble.create_studio(studio_request("t1"))).unwrap();

        let mut changed = studio_request("t1");
        changed.display_name = "Weta Digital".to_string();
        let err = tokio_test::block_on(nimble.create_studio(changed)).unwrap_err();

        assert_eq!(err.kind, NimbleErrorKind::Validation);
        assert!(err.message.contains("t1"));
        assert_eq!(nimble.calls(ResourceType::Studio, Operation::Create), 2);
        assert!(tokio_test::block_on(nimble.get_studio("studio-2")).is_err());
    }

    #[test]
    fn test_mutation_during_transition_conflicts() {
        let nimble = InMemoryNimble::new();
        tokio_test::block_on(nimble.create_studio(studio_request("t1"))).unwrap();

        let err = tokio_test::block_on(nimble.delete_studio("studio-1", "t2")).unwrap_err();
        assert_eq!(err.kind, NimbleErrorKind::Conflict);
    }

    #[test]
    fn test_child_requires_live_studio() {
        let nimble = InMemoryNimble::new();
        let err = tokio_test::block_on(nimble.create_streaming_image(CreateStreamingImageRequest {
            client_token: "t1".to_string(),
            studio_id: "studio-9".to_string(),
            name: "base".to_string(),
            ec2_image_id: "ami-1".to_string(),
            ..CreateStreamingImageRequest::default()
        }))
        .unwrap_err();
        assert_eq!(err.kind, NimbleErrorKind::ResourceNotFound);
    }

    #[test]
    fn test_pagination_tokens() {
        let nimble = InMemoryNimble::with_settle_after_polls(0).with_page_size(2);
        for token in ["a", "b", "c"] {
            tokio_test::block_on(nimble.create_studio(studio_request(token))).unwrap();
        }

        let first = tokio_test::block_on(nimble.list_studios(None)).unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.next_token.as_deref(), Some("2"));

        let second = tokio_test::block_on(nimble.list_studios(first.next_token.as_deref())).unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].studio_id, "studio-3");
        assert_eq!(second.next_token, None);

        let err = tokio_test::block_on(nimble.list_studios(Some("bogus"))).unwrap_err();
        assert_eq!(err.kind, NimbleErrorKind::Validation);
    }

    #[test]
    fn test_fail_next_is_one_shot() {
        let nimble = InMemoryNimble::new();
        nimble.fail_next(ResourceType::Studio, Operation::List, NimbleErrorKind::Throttling);

        let err = tokio_test::block_on(nimble.list_studios(None)).unwrap_err();
        assert_eq!(err.kind, NimbleErrorKind::Throttling);
        assert!(tokio_test::block_on(nimble.list_studios(None)).is_ok());
        assert_eq!(nimble.calls(ResourceType::Studio, Operation::List), 2);
    }

    #[test]
    fn test_force_state_pins() {
        let nimble = InMemoryNimble::with_settle_after_polls(0);
        tokio_test::block_on(nimble.create_studio(studio_request("t1"))).unwrap();

        assert!(nimble.force_state("studio-1", ResourceState::CreateFailed));
        for _ in 0..3 {
            let studio = tokio_test::block_on(nimble.get_studio("studio-1")).unwrap();
            assert_eq!(studio.lifecycle.state(), ResourceState::CreateFailed);
        }
        assert!(!nimble.force_state("lp-40", ResourceState::Ready));
    }
}
