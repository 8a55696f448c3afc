//! AWS::NimbleStudio::StudioComponent

use crate::api::{
    CreateStudioComponentRequest, NimbleApi, RemoteStudioComponent, UpdateStudioComponentRequest,
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
pub struct ActiveDirectoryComputerAttribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActiveDirectoryConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computer_attributes: Option<Vec<ActiveDirectoryComputerAttribute>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizational_unit_distinguished_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComputeFarmConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_directory_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LicenseServiceConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SharedFileSystemConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_system_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linux_mount_point: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows_mount_drive: Option<String>,
}

/// At most one of these is expected to be set, matching the component type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StudioComponentConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_directory_configuration: Option<ActiveDirectoryConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_farm_configuration: Option<ComputeFarmConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_service_configuration: Option<LicenseServiceConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_file_system_configuration: Option<SharedFileSystemConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StudioComponentInitializationScript {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_profile_protocol_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScriptParameterKeyValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Public studio component model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StudioComponent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio_component_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// ACTIVE_DIRECTORY, SHARED_FILE_SYSTEM, COMPUTE_FARM, LICENSE_SERVICE or CUSTOM
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<StudioComponentConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ec2_security_group_ids: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initialization_scripts: Option<Vec<StudioComponentInitializationScript>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_parameters: Option<Vec<ScriptParameterKeyValue>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

impl StudioComponent {
    pub fn to_create_request(&self, client_token: &str) -> CreateStudioComponentRequest {
        CreateStudioComponentRequest {
            client_token: client_token.to_string(),
            studio_id: self.studio_id.clone().unwrap_or_default(),
            name: self.name.clone().unwrap_or_default(),
            description: non_blank(&self.description),
            component_type: self.component_type.clone().unwrap_or_default(),
            subtype: non_blank(&self.subtype),
            configuration: self.configuration.clone(),
            ec2_security_group_ids: self.ec2_security_group_ids.clone(),
            initialization_scripts: self.initialization_scripts.clone(),
            script_parameters: self.script_parameters.clone(),
            tags: tags_of(&self.tags),
        }
    }

    /// Subtype and tags are create-only
    pub fn to_update_request(&self, client_token: &str) -> UpdateStudioComponentRequest {
        UpdateStudioComponentRequest {
            client_token: client_token.to_string(),
            studio_id: self.studio_id.clone().unwrap_or_default(),
            studio_component_id: self.studio_component_id.clone().unwrap_or_default(),
            name: non_blank(&self.name),
            description: non_blank(&self.description),
            component_type: non_blank(&self.component_type),
            configuration: self.configuration.clone(),
            ec2_security_group_ids: self.ec2_security_group_ids.clone(),
            initialization_scripts: self.initialization_scripts.clone(),
            script_parameters: self.script_parameters.clone(),
        }
    }

    pub fn from_remote(component: &RemoteStudioComponent) -> Self {
        Self {
            studio_id: Some(component.studio_id.clone()),
            studio_component_id: Some(component.studio_component_id.clone()),
            name: Some(component.name.clone()),
            description: component.description.clone(),
            component_type: Some(component.component_type.clone()),
            subtype: component.subtype.clone(),
            configuration: component.configuration.clone(),
            ec2_security_group_ids: list_model(&component.ec2_security_group_ids),
            initialization_scripts: if component.initialization_scripts.is_empty() {
                None
            } else {
                Some(component.initialization_scripts.clone())
            },
            script_parameters: if component.script_parameters.is_empty() {
                None
            } else {
                Some(component.script_parameters.clone())
            },
            tags: tags_model(&component.tags),
        }
    }
}

/// Studio component descriptor, scoped by studio
pub struct StudioComponentResource<C: ?Sized> {
    client: Arc<C>,
}

impl<C: NimbleApi + ?Sized> StudioComponentResource<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: NimbleApi + ?Sized + 'static> ResourceKind for StudioComponentResource<C> {
    type Model = StudioComponent;
    type Resource = RemoteStudioComponent;
    type CreateRequest = CreateStudioComponentRequest;
    type UpdateRequest = UpdateStudioComponentRequest;
    type Error = NimbleError;

    fn type_name(&self) -> &'static str {
        ResourceType::StudioComponent.type_name()
    }

    fn handle(&self, model: &StudioComponent) -> ResourceHandle {
        ResourceHandle::scoped(model.studio_id.clone(), model.studio_component_id.clone())
    }

    fn assign_identifier(&self, model: &mut StudioComponent, identifier: &str) {
        model.studio_component_id = Some(identifier.to_string());
    }

    fn observe(&self, resource: &RemoteStudioComponent) -> Observation {
        resource.lifecycle.observe(&resource.studio_component_id)
    }

    fn create_request(
        &self,
        model: &StudioComponent,
        client_token: &str,
    ) -> CreateStudioComponentRequest {
        model.to_create_request(client_token)
    }

    fn update_request(
        &self,
        model: &StudioComponent,
        client_token: &str,
    ) -> UpdateStudioComponentRequest {
        model.to_update_request(client_token)
    }

    fn to_model(&self, _scope: &ResourceHandle, resource: &RemoteStudioComponent) -> StudioComponent {
        StudioComponent::from_remote(resource)
    }

    async fn create(
        &self,
        request: CreateStudioComponentRequest,
    ) -> Result<RemoteStudioComponent, NimbleError> {
        self.client.create_studio_component(request).await
    }

    async fn get(&self, handle: &ResourceHandle) -> Result<RemoteStudioComponent, NimbleError> {
        let id = handle.resource_id.as_deref().unwrap_or_default();
        self.client.get_studio_component(handle.parent(), id).await
    }

    async fn update(
        &self,
        _handle: &ResourceHandle,
        request: UpdateStudioComponentRequest,
    ) -> Result<(), NimbleError> {
        self.client.update_studio_component(request).await.map(|_| ())
    }

    async fn delete(&self, handle: &ResourceHandle, client_token: &str) -> Result<(), NimbleError> {
        let id = handle.resource_id.as_deref().unwrap_or_default();
        self.client
            .delete_studio_component(handle.parent(), id, client_token)
            .await
            .map(|_| ())
    }

    async fn list(
        &self,
        scope: &ResourceHandle,
        next_token: Option<&str>,
    ) -> Result<Page<RemoteStudioComponent>, NimbleError> {
        self.client
            .list_studio_components(scope.parent(), next_token)
            .await
    }
}
