//! AWS::NimbleStudio::StreamingImage
//!
//! The remote update call completes synchronously, so this kind skips
//! update stabilization.

use crate::api::{
    CreateStreamingImageRequest, NimbleApi, RemoteStreamingImage, UpdateStreamingImageRequest,
};
use crate::error::NimbleError;
use crate::resource_type::ResourceType;
use crate::translate::{list_model, non_blank, tags_model, tags_of};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use studioflow_cloud::{Observation, Page, ResourceHandle, ResourceKind, UpdateMode};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamingImageEncryptionConfiguration {
    pub key_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_arn: Option<String>,
}

/// Public streaming image model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamingImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming_image_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ec2_image_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eula_ids: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_configuration: Option<StreamingImageEncryptionConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

impl StreamingImage {
    pub fn to_create_request(&self, client_token: &str) -> CreateStreamingImageRequest {
        CreateStreamingImageRequest {
            client_token: client_token.to_string(),
            studio_id: self.studio_id.clone().unwrap_or_default(),
            name: self.name.clone().unwrap_or_default(),
            description: non_blank(&self.description),
            ec2_image_id: self.ec2_image_id.clone().unwrap_or_default(),
            tags: tags_of(&self.tags),
        }
    }

    pub fn to_update_request(&self, client_token: &str) -> UpdateStreamingImageRequest {
        UpdateStreamingImageRequest {
            client_token: client_token.to_string(),
            studio_id: self.studio_id.clone().unwrap_or_default(),
            streaming_image_id: self.streaming_image_id.clone().unwrap_or_default(),
            name: non_blank(&self.name),
            description: non_blank(&self.description),
        }
    }

    pub fn from_remote(image: &RemoteStreamingImage) -> Self {
        Self {
            studio_id: Some(image.studio_id.clone()),
            streaming_image_id: Some(image.streaming_image_id.clone()),
            name: Some(image.name.clone()),
            description: image.description.clone(),
            ec2_image_id: Some(image.ec2_image_id.clone()),
            owner: Some(image.owner.clone()),
            platform: Some(image.platform.clone()),
            eula_ids: list_model(&image.eula_ids),
            encryption_configuration: image.encryption_configuration.clone(),
            tags: tags_model(&image.tags),
        }
    }
}

/// Streaming image descriptor, scoped by studio
pub struct StreamingImageResource<C: ?Sized> {
    client: Arc<C>,
}

impl<C: NimbleApi + ?Sized> StreamingImageResource<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: NimbleApi + ?Sized + 'static> ResourceKind for StreamingImageResource<C> {
    type Model = StreamingImage;
    type Resource = RemoteStreamingImage;
    type CreateRequest = CreateStreamingImageRequest;
    type UpdateRequest = UpdateStreamingImageRequest;
    type Error = NimbleError;

    fn type_name(&self) -> &'static str {
        ResourceType::StreamingImage.type_name()
    }

    fn update_mode(&self) -> UpdateMode {
        UpdateMode::Immediate
    }

    fn handle(&self, model: &StreamingImage) -> ResourceHandle {
        ResourceHandle::scoped(model.studio_id.clone(), model.streaming_image_id.clone())
    }

    fn assign_identifier(&self, model: &mut StreamingImage, identifier: &str) {
        model.streaming_image_id = Some(identifier.to_string());
    }

    fn observe(&self, resource: &RemoteStreamingImage) -> Observation {
        resource.lifecycle.observe(&resource.streaming_image_id)
    }

    fn create_request(
        &self,
        model: &StreamingImage,
        client_token: &str,
    ) -> CreateStreamingImageRequest {
        model.to_create_request(client_token)
    }

    fn update_request(
        &self,
        model: &StreamingImage,
        client_token: &str,
    ) -> UpdateStreamingImageRequest {
        model.to_update_request(client_token)
    }

    fn to_model(&self, _scope: &ResourceHandle, resource: &RemoteStreamingImage) -> StreamingImage {
        StreamingImage::from_remote(resource)
    }

    async fn create(
        &self,
        request: CreateStreamingImageRequest,
    ) -> Result<RemoteStreamingImage, NimbleError> {
        self.client.create_streaming_image(request).await
    }

    async fn get(&self, handle: &ResourceHandle) -> Result<RemoteStreamingImage, NimbleError> {
        let id = handle.resource_id.as_deref().unwrap_or_default();
        self.client.get_streaming_image(handle.parent(), id).await
    }

    async fn update(
        &self,
        _handle: &ResourceHandle,
        request: UpdateStreamingImageRequest,
    ) -> Result<(), NimbleError> {
        self.client.update_streaming_image(request).await.map(|_| ())
    }

    async fn delete(&self, handle: &ResourceHandle, client_token: &str) -> Result<(), NimbleError> {
        let id = handle.resource_id.as_deref().unwrap_or_default();
        self.client
            .delete_streaming_image(handle.parent(), id, client_token)
            .await
            .map(|_| ())
    }

    async fn list(
        &self,
        scope: &ResourceHandle,
        next_token: Option<&str>,
    ) -> Result<Page<RemoteStreamingImage>, NimbleError> {
        self.client
            .list_streaming_images(scope.parent(), next_token)
            .await
    }
}
