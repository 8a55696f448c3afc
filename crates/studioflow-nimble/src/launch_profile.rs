//! AWS::NimbleStudio::LaunchProfile

use crate::api::{
    CreateLaunchProfileRequest, NimbleApi, RemoteLaunchProfile, UpdateLaunchProfileRequest,
};
use crate::error::NimbleError;
use crate::resource_type::ResourceType;
use crate::translate::{list_model, non_blank, tags_model, tags_of};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use studioflow_cloud::{Observation, Page, ResourceHandle, ResourceKind};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamingSessionStorageRoot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linux: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamConfigurationSessionStorage {
    /// e.g. ["UPLOAD"]
    #[serde(default)]
    pub mode: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<StreamingSessionStorageRoot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamConfiguration {
    /// ENABLED or DISABLED
    pub clipboard_mode: String,

    #[serde(default)]
    pub ec2_instance_types: Vec<String>,

    #[serde(default)]
    pub streaming_image_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_session_length_in_minutes: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stopped_session_length_in_minutes: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_storage: Option<StreamConfigurationSessionStorage>,
}

/// Public launch profile model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LaunchProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_profile_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ec2_subnet_ids: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_profile_protocol_versions: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_configuration: Option<StreamConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio_component_ids: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

impl LaunchProfile {
    pub fn to_create_request(&self, client_token: &str) -> CreateLaunchProfileRequest {
        CreateLaunchProfileRequest {
            client_token: client_token.to_string(),
            studio_id: self.studio_id.clone().unwrap_or_default(),
            name: self.name.clone().unwrap_or_default(),
            description: non_blank(&self.description),
            ec2_subnet_ids: self.ec2_subnet_ids.clone().unwrap_or_default(),
            launch_profile_protocol_versions: self
                .launch_profile_protocol_versions
                .clone()
                .unwrap_or_default(),
            stream_configuration: self.stream_configuration.clone(),
            studio_component_ids: self.studio_component_ids.clone().unwrap_or_default(),
            tags: tags_of(&self.tags),
        }
    }

    /// Subnets and tags are create-only
    pub fn to_update_request(&self, client_token: &str) -> UpdateLaunchProfileRequest {
        UpdateLaunchProfileRequest {
            client_token: client_token.to_string(),
            studio_id: self.studio_id.clone().unwrap_or_default(),
            launch_profile_id: self.launch_profile_id.clone().unwrap_or_default(),
            name: non_blank(&self.name),
            description: non_blank(&self.description),
            stream_configuration: self.stream_configuration.clone(),
            launch_profile_protocol_versions: self.launch_profile_protocol_versions.clone(),
            studio_component_ids: self.studio_component_ids.clone(),
        }
    }

    pub fn from_remote(profile: &RemoteLaunchProfile) -> Self {
        Self {
            studio_id: Some(profile.studio_id.clone()),
            launch_profile_id: Some(profile.launch_profile_id.clone()),
            name: Some(profile.name.clone()),
            description: profile.description.clone(),
            ec2_subnet_ids: list_model(&profile.ec2_subnet_ids),
            launch_profile_protocol_versions: list_model(&profile.launch_profile_protocol_versions),
            stream_configuration: profile.stream_configuration.clone(),
            studio_component_ids: list_model(&profile.studio_component_ids),
            tags: tags_model(&profile.tags),
        }
    }
}

/// Launch profile descriptor, scoped by studio
pub struct LaunchProfileResource<C: ?Sized> {
    client: Arc<C>,
}

impl<C: NimbleApi + ?Sized> LaunchProfileResource<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: NimbleApi + ?Sized + 'static> ResourceKind for LaunchProfileResource<C> {
    type Model = LaunchProfile;
    type Resource = RemoteLaunchProfile;
    type CreateRequest = CreateLaunchProfileRequest;
    type UpdateRequest = UpdateLaunchProfileRequest;
    type Error = NimbleError;

    fn type_name(&self) -> &'static str {
        ResourceType::LaunchProfile.type_name()
    }

    fn handle(&self, model: &LaunchProfile) -> ResourceHandle {
        ResourceHandle::scoped(model.studio_id.clone(), model.launch_profile_id.clone())
    }

    fn assign_identifier(&self, model: &mut LaunchProfile, identifier: &str) {
        model.launch_profile_id = Some(identifier.to_string());
    }

    fn observe(&self, resource: &RemoteLaunchProfile) -> Observation {
        resource.lifecycle.observe(&resource.launch_profile_id)
    }

    fn create_request(&self, model: &LaunchProfile, client_token: &str) -> CreateLaunchProfileRequest {
        model.to_create_request(client_token)
    }

    fn update_request(&self, model: &LaunchProfile, client_token: &str) -> UpdateLaunchProfileRequest {
        model.to_update_request(client_token)
    }

    fn to_model(&self, _scope: &ResourceHandle, resource: &RemoteLaunchProfile) -> LaunchProfile {
        LaunchProfile::from_remote(resource)
    }

    async fn create(
        &self,
        request: CreateLaunchProfileRequest,
    ) -> Result<RemoteLaunchProfile, NimbleError> {
        self.client.create_launch_profile(request).await
    }

    async fn get(&self, handle: &ResourceHandle) -> Result<RemoteLaunchProfile, NimbleError> {
        let id = handle.resource_id.as_deref().unwrap_or_default();
        self.client.get_launch_profile(handle.parent(), id).await
    }

    async fn update(
        &self,
        _handle: &ResourceHandle,
        request: UpdateLaunchProfileRequest,
    ) -> Result<(), NimbleError> {
        self.client.update_launch_profile(request).await.map(|_| ())
    }

    async fn delete(&self, handle: &ResourceHandle, client_token: &str) -> Result<(), NimbleError> {
        let id = handle.resource_id.as_deref().unwrap_or_default();
        self.client
            .delete_launch_profile(handle.parent(), id, client_token)
            .await
            .map(|_| ())
    }

    async fn list(
        &self,
        scope: &ResourceHandle,
        next_token: Option<&str>,
    ) -> Result<Page<RemoteLaunchProfile>, NimbleError> {
        self.client
            .list_launch_profiles(scope.parent(), next_token)
            .await
    }
}
