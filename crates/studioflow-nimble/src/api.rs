//! Nimble Studio remote API surface
//!
//! Request and response shapes plus the [`NimbleApi`] trait. Responses carry
//! a [`Lifecycle`] with the resource state and its status code and message.

use crate::error::Result;
use crate::launch_profile::StreamConfiguration;
use crate::streaming_image::StreamingImageEncryptionConfiguration;
use crate::studio::StudioEncryptionConfiguration;
use crate::studio_component::{
    ScriptParameterKeyValue, StudioComponentConfiguration, StudioComponentInitializationScript,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use studioflow_cloud::{Observation, Page, ResourceState};

/// State plus diagnostics reported with every resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lifecycle {
    pub state: String,
    pub status_code: Option<String>,
    pub status_message: Option<String>,
}

impl Lifecycle {
    pub fn new(state: ResourceState) -> Self {
        Self {
            state: state.as_str().to_string(),
            status_code: None,
            status_message: None,
        }
    }

    pub fn state(&self) -> ResourceState {
        ResourceState::parse(&self.state)
    }

    pub fn set(&mut self, state: ResourceState, status_code: &str, status_message: &str) {
        self.state = state.as_str().to_string();
        self.status_code = Some(status_code.to_string());
        self.status_message = Some(status_message.to_string());
    }

    pub fn observe(&self, identifier: &str) -> Observation {
        Observation::new(identifier, &self.state)
            .with_status(self.status_code.clone(), self.status_message.clone())
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new(ResourceState::CreateInProgress)
    }
}

// Studio

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteStudio {
    pub studio_id: String,
    pub studio_name: String,
    pub display_name: String,
    pub admin_role_arn: String,
    pub user_role_arn: String,
    pub home_region: String,
    pub sso_client_id: String,
    pub studio_url: String,
    pub encryption_configuration: Option<StudioEncryptionConfiguration>,
    pub tags: BTreeMap<String, String>,
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateStudioRequest {
    pub client_token: String,
    pub studio_name: String,
    pub display_name: String,
    pub admin_role_arn: String,
    pub user_role_arn: String,
    pub encryption_configuration: Option<StudioEncryptionConfiguration>,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateStudioRequest {
    pub client_token: String,
    pub studio_id: String,
    pub display_name: Option<String>,
    pub admin_role_arn: Option<String>,
    pub user_role_arn: Option<String>,
}

// Studio component

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteStudioComponent {
    pub studio_id: String,
    pub studio_component_id: String,
    pub name: String,
    pub description: Option<String>,
    pub component_type: String,
    pub subtype: Option<String>,
    pub configuration: Option<StudioComponentConfiguration>,
    pub ec2_security_group_ids: Vec<String>,
    pub initialization_scripts: Vec<StudioComponentInitializationScript>,
    pub script_parameters: Vec<ScriptParameterKeyValue>,
    pub tags: BTreeMap<String, String>,
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateStudioComponentRequest {
    pub client_token: String,
    pub studio_id: String,
    pub name: String,
    pub description: Option<String>,
    pub component_type: String,
    pub subtype: Option<String>,
    pub configuration: Option<StudioComponentConfiguration>,
    pub ec2_security_group_ids: Option<Vec<String>>,
    pub initialization_scripts: Option<Vec<StudioComponentInitializationScript>>,
    pub script_parameters: Option<Vec<ScriptParameterKeyValue>>,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateStudioComponentRequest {
    pub client_token: String,
    pub studio_id: String,
    pub studio_component_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub component_type: Option<String>,
    pub configuration: Option<StudioComponentConfiguration>,
    pub ec2_security_group_ids: Option<Vec<String>>,
    pub initialization_scripts: Option<Vec<StudioComponentInitializationScript>>,
    pub script_parameters: Option<Vec<ScriptParameterKeyValue>>,
}

// Launch profile

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteLaunchProfile {
    pub studio_id: String,
    pub launch_profile_id: String,
    pub name: String,
    pub description: Option<String>,
    pub ec2_subnet_ids: Vec<String>,
    pub launch_profile_protocol_versions: Vec<String>,
    pub stream_configuration: Option<StreamConfiguration>,
    pub studio_component_ids: Vec<String>,
    pub tags: BTreeMap<String, String>,
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateLaunchProfileRequest {
    pub client_token: String,
    pub studio_id: String,
    pub name: String,
    pub description: Option<String>,
    pub ec2_subnet_ids: Vec<String>,
    pub launch_profile_protocol_versions: Vec<String>,
    pub stream_configuration: Option<StreamConfiguration>,
    pub studio_component_ids: Vec<String>,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateLaunchProfileRequest {
    pub client_token: String,
    pub studio_id: String,
    pub launch_profile_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub stream_configuration: Option<StreamConfiguration>,
    pub launch_profile_protocol_versions: Option<Vec<String>>,
    pub studio_component_ids: Option<Vec<String>>,
}

// Streaming image

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteStreamingImage {
    pub studio_id: String,
    pub streaming_image_id: String,
    pub name: String,
    pub description: Option<String>,
    pub ec2_image_id: String,
    pub owner: String,
    pub platform: String,
    pub eula_ids: Vec<String>,
    pub encryption_configuration: Option<StreamingImageEncryptionConfiguration>,
    pub tags: BTreeMap<String, String>,
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateStreamingImageRequest {
    pub client_token: String,
    pub studio_id: String,
    pub name: String,
    pub description: Option<String>,
    pub ec2_image_id: String,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateStreamingImageRequest {
    pub client_token: String,
    pub studio_id: String,
    pub streaming_image_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Remote calls for every Nimble Studio resource kind
#[async_trait]
pub trait NimbleApi: Send + Sync {
    async fn create_studio(&self, request: CreateStudioRequest) -> Result<RemoteStudio>;
    async fn get_studio(&self, studio_id: &str) -> Result<RemoteStudio>;
    async fn update_studio(&self, request: UpdateStudioRequest) -> Result<RemoteStudio>;
    async fn delete_studio(&self, studio_id: &str, client_token: &str) -> Result<RemoteStudio>;
    async fn list_studios(&self, next_token: Option<&str>) -> Result<Page<RemoteStudio>>;

    async fn create_studio_component(
        &self,
        request: CreateStudioComponentRequest,
    ) -> Result<RemoteStudioComponent>;
    async fn get_studio_component(
        &self,
        studio_id: &str,
        studio_component_id: &str,
    ) -> Result<RemoteStudioComponent>;
    async fn update_studio_component(
        &self,
        request: UpdateStudioComponentRequest,
    ) -> Result<RemoteStudioComponent>;
    async fn delete_studio_component(
        &self,
        studio_id: &str,
        studio_component_id: &str,
        client_token: &str,
    ) -> Result<RemoteStudioComponent>;
    async fn list_studio_components(
        &self,
        studio_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<RemoteStudioComponent>>;

    async fn create_launch_profile(
        &self,
        request: CreateLaunchProfileRequest,
    ) -> Result<RemoteLaunchProfile>;
    async fn get_launch_profile(
        &self,
        studio_id: &str,
        launch_profile_id: &str,
    ) -> Result<RemoteLaunchProfile>;
    async fn update_launch_profile(
        &self,
        request: UpdateLaunchProfileRequest,
    ) -> Result<RemoteLaunchProfile>;
    async fn delete_launch_profile(
        &self,
        studio_id: &str,
        launch_profile_id: &str,
        client_token: &str,
    ) -> Result<RemoteLaunchProfile>;
    async fn list_launch_profiles(
        &self,
        studio_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<RemoteLaunchProfile>>;

    async fn create_streaming_image(
        &self,
        request: CreateStreamingImageRequest,
    ) -> Result<RemoteStreamingImage>;
    async fn get_streaming_image(
        &self,
        studio_id: &str,
        streaming_image_id: &str,
    ) -> Result<RemoteStreamingImage>;
    async fn update_streaming_image(
        &self,
        request: UpdateStreamingImageRequest,
    ) -> Result<RemoteStreamingImage>;
    async fn delete_streaming_image(
        &self,
        studio_id: &str,
        streaming_image_id: &str,
        client_token: &str,
    ) -> Result<RemoteStreamingImage>;
    async fn list_streaming_images(
        &self,
        studio_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<RemoteStreamingImage>>;
}
