#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use studioflow_cloud::{
    Action, DriveOptions, DriveReport, ResourceHandler, ResourceHandlerRequest, ResourceKind,
    drive,
};
use studioflow_nimble::launch_profile::StreamConfiguration;
use studioflow_nimble::{
    InMemoryNimble, LaunchProfile, StreamingImage, Studio, StudioComponent, StudioResource,
};

pub fn nimble() -> Arc<InMemoryNimble> {
    Arc::new(InMemoryNimble::with_settle_after_polls(2))
}

pub fn options() -> DriveOptions {
    DriveOptions {
        max_attempts: 20,
        honor_delay: false,
    }
}

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// A client request token no other call in this test binary uses
pub fn unique_token(action: Action) -> String {
    format!("token-{}-{}", action, NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
}

pub async fn run<K: ResourceKind>(
    handler: &ResourceHandler<K>,
    action: Action,
    model: K::Model,
) -> DriveReport<K::Model> {
    let request = ResourceHandlerRequest::new(unique_token(action), model);
    drive(handler, action, request, &options()).await
}

/// Final model of a successful run
pub fn settled<M: Clone>(report: &DriveReport<M>) -> M {
    assert!(report.succeeded(), "run failed: {:?}", report.last().map(|e| &e.message));
    report
        .last()
        .and_then(|event| event.resource_model.clone())
        .unwrap()
}

pub fn studio_model(name: &str) -> Studio {
    let mut tags = BTreeMap::new();
    tags.insert("team".to_string(), "fx".to_string());
    Studio {
        studio_name: Some(name.to_string()),
        display_name: Some(name.to_uppercase()),
        admin_role_arn: Some("arn:aws:iam::123456789012:role/admin".to_string()),
        user_role_arn: Some("arn:aws:iam::123456789012:role/user".to_string()),
        tags: Some(tags),
        ..Studio::default()
    }
}

/// Create a studio through the handler and return its id
pub async fn seed_studio(nimble: &Arc<InMemoryNimble>, name: &str) -> String {
    let handler = ResourceHandler::new(StudioResource::new(nimble.clone()));
    let report = run(&handler, Action::Create, studio_model(name)).await;
    settled(&report).studio_id.unwrap()
}

pub fn component_model(studio_id: &str) -> StudioComponent {
    StudioComponent {
        studio_id: Some(studio_id.to_string()),
        name: Some("shared-storage".to_string()),
        component_type: Some("SHARED_FILE_SYSTEM".to_string()),
        subtype: Some("AMAZON_FSX_FOR_LUSTRE".to_string()),
        ec2_security_group_ids: Some(vec!["sg-1".to_string()]),
        ..StudioComponent::default()
    }
}

pub fn launch_profile_model(studio_id: &str) -> LaunchProfile {
    LaunchProfile {
        studio_id: Some(studio_id.to_string()),
        name: Some("artists".to_string()),
        ec2_subnet_ids: Some(vec!["subnet-1".to_string()]),
        launch_profile_protocol_versions: Some(vec!["2021-03-31".to_string()]),
        studio_component_ids: Some(vec!["sc-1".to_string()]),
        stream_configuration: Some(StreamConfiguration {
            clipboard_mode: "ENABLED".to_string(),
            ec2_instance_types: vec!["g4dn.xlarge".to_string()],
            streaming_image_ids: vec!["si-1".to_string()],
            max_session_length_in_minutes: Some(690),
            ..StreamConfiguration::default()
        }),
        ..LaunchProfile::default()
    }
}

pub fn streaming_image_model(studio_id: &str) -> StreamingImage {
    StreamingImage {
        studio_id: Some(studio_id.to_string()),
        name: Some("base-linux".to_string()),
        description: Some("stock image".to_string()),
        ec2_image_id: Some("ami-0123456789".to_string()),
        ..StreamingImage::default()
    }
}
