//! AWS::NimbleStudio::Studio

use crate::api::{CreateStudioRequest, NimbleApi, RemoteStudio, UpdateStudioRequest};
use crate::error::NimbleError;
use crate::resource_type::ResourceType;
use crate::translate::{non_blank, tags_model, tags_of};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use studioflow_cloud::{Observation, Page, ResourceHandle, ResourceKind};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StudioEncryptionConfiguration {
    /// AWS_OWNED_KEY or CUSTOMER_MANAGED_KEY
    pub key_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_arn: Option<String>,
}

/// Public studio model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Studio {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_role_arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_role_arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio_encryption_configuration: Option<StudioEncryptionConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sso_client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

impl Studio {
    pub fn to_create_request(&self, client_token: &str) -> CreateStudioRequest {
        CreateStudioRequest {
            client_token: client_token.to_string(),
            studio_name: self.studio_name.clone().unwrap_or_default(),
            display_name: self.display_name.clone().unwrap_or_default(),
            admin_role_arn: self.admin_role_arn.clone().unwrap_or_default(),
            user_role_arn: self.user_role_arn.clone().unwrap_or_default(),
            encryption_configuration: self.studio_encryption_configuration.clone(),
            tags: tags_of(&self.tags),
        }
    }

    /// Only display name and role ARNs are updatable
    pub fn to_update_request(&self, client_token: &str) -> UpdateStudioRequest {
        UpdateStudioRequest {
            client_token: client_token.to_string(),
            studio_id: self.studio_id.clone().unwrap_or_default(),
            display_name: non_blank(&self.display_name),
            admin_role_arn: non_blank(&self.admin_role_arn),
            user_role_arn: non_blank(&self.user_role_arn),
        }
    }

    pub fn from_remote(studio: &RemoteStudio) -> Self {
        Self {
            studio_id: Some(studio.studio_id.clone()),
            studio_name: Some(studio.studio_name.clone()),
            display_name: Some(studio.display_name.clone()),
            admin_role_arn: Some(studio.admin_role_arn.clone()),
            user_role_arn: Some(studio.user_role_arn.clone()),
            studio_encryption_configuration: studio.encryption_configuration.clone(),
            home_region: Some(studio.home_region.clone()),
            sso_client_id: Some(studio.sso_client_id.clone()),
            studio_url: Some(studio.studio_url.clone()),
            tags: tags_model(&studio.tags),
        }
    }
}

/// Studio descriptor for the lifecycle engine
pub struct StudioResource<C: ?Sized> {
    client: Arc<C>,
}

impl<C: NimbleApi + ?Sized> StudioResource<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: NimbleApi + ?Sized + 'static> ResourceKind for StudioResource<C> {
    type Model = Studio;
    type Resource = RemoteStudio;
    type CreateRequest = CreateStudioRequest;
    type UpdateRequest = UpdateStudioRequest;
    type Error = NimbleError;

    fn type_name(&self) -> &'static str {
        ResourceType::Studio.type_name()
    }

    fn handle(&self, model: &Studio) -> ResourceHandle {
        ResourceHandle::root(model.studio_id.clone())
    }

    fn assign_identifier(&self, model: &mut Studio, identifier: &str) {
        model.studio_id = Some(identifier.to_string());
    }

    fn observe(&self, resource: &RemoteStudio) -> Observation {
        resource.lifecycle.observe(&resource.studio_id)
    }

    fn create_request(&self, model: &Studio, client_token: &str) -> CreateStudioRequest {
        model.to_create_request(client_token)
    }

    fn update_request(&self, model: &Studio, client_token: &str) -> UpdateStudioRequest {
        model.to_update_request(client_token)
    }

    fn to_model(&self, _scope: &ResourceHandle, resource: &RemoteStudio) -> Studio {
        Studio::from_remote(resource)
    }

    async fn create(&self, request: CreateStudioRequest) -> Result<RemoteStudio, NimbleError> {
        self.client.create_studio(request).await
    }

    async fn get(&self, handle: &ResourceHandle) -> Result<RemoteStudio, NimbleError> {
        let studio_id = handle.resource_id.as_deref().unwrap_or_default();
        self.client.get_studio(studio_id).await
    }

    async fn update(
        &self,
        _handle: &ResourceHandle,
        request: UpdateStudioRequest,
    ) -> Result<(), NimbleError> {
        self.client.update_studio(request).await.map(|_| ())
    }

    async fn delete(&self, handle: &ResourceHandle, client_token: &str) -> Result<(), NimbleError> {
        let studio_id = handle.resource_id.as_deref().unwrap_or_default();
        self.client
            .delete_studio(studio_id, client_token)
            .await
            .map(|_| ())
    }

    async fn list(
        &self,
        _scope: &ResourceHandle,
        next_token: Option<&str>,
    ) -> Result<Page<RemoteStudio>, NimbleError> {
        self.client.list_studios(next_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desired() -> Studio {
        Studio {
            studio_id: Some("studio-1".to_string()),
            studio_name: Some("weta".to_string()),
            display_name: Some("Weta".to_string()),
            admin_role_arn: Some("arn:aws:iam::1:role/admin".to_string()),
            user_role_arn: Some("arn:aws:iam::1:role/user".to_string()),
            ..Studio::default()
        }
    }

    #[test]
    fn test_update_request_is_sparse() {
        let model = Studio {
            admin_role_arn: Some(String::new()),
            user_role_arn: None,
            ..desired()
        };
        let request = model.to_update_request("t1");

        assert_eq!(request.studio_id, "studio-1");
        assert_eq!(request.display_name.as_deref(), Some("Weta"));
        assert_eq!(request.admin_role_arn, None);
        assert_eq!(request.user_role_arn, None);
    }

    #[test]
    fn test_model_uses_schema_names() {
        let json = serde_json::to_value(desired()).unwrap();
        assert_eq!(json["StudioId"], "studio-1");
        assert_eq!(json["AdminRoleArn"], "arn:aws:iam::1:role/admin");
        assert!(json.get("Tags").is_none());

        let parsed: Studio = serde_json::from_value(serde_json::json!({
            "StudioName": "weta",
            "StudioEncryptionConfiguration": {"KeyType": "AWS_OWNED_KEY"}
        }))
        .unwrap();
        assert_eq!(
            parsed.studio_encryption_configuration.map(|c| c.key_type),
            Some("AWS_OWNED_KEY".to_string())
        );
    }

    #[test]
    fn test_create_request_carries_tags() {
        let mut tags = BTreeMap::new();
        tags.insert("team".to_string(), "fx".to_string());
        let model = Studio {
            tags: Some(tags.clone()),
            ..desired()
        };

        let request = model.to_create_request("t1");
        assert_eq!(request.client_token, "t1");
        assert_eq!(request.studio_name, "weta");
        assert_eq!(request.tags, tags);
    }
}
