//! Nimble Studio resource kinds for StudioFlow
//!
//! This crate plugs the four Nimble Studio resource kinds into the
//! `studioflow-cloud` lifecycle engine:
//!
//! - `AWS::NimbleStudio::Studio`
//! - `AWS::NimbleStudio::StudioComponent` (scoped by studio)
//! - `AWS::NimbleStudio::LaunchProfile` (scoped by studio)
//! - `AWS::NimbleStudio::StreamingImage` (scoped by studio, synchronous update)
//!
//! Each kind talks to the service through the [`NimbleApi`] trait.
//! [`InMemoryNimble`] implements it without a network and is what the CLI
//! and the tests run against.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use studioflow_cloud::{drive, Action, DriveOptions, ResourceHandler, ResourceHandlerRequest};
//! use studioflow_nimble::{InMemoryNimble, Studio, StudioResource};
//!
//! let nimble = Arc::new(InMemoryNimble::new());
//! let handler = ResourceHandler::new(StudioResource::new(nimble));
//!
//! let request = ResourceHandlerRequest::new("token-1", studio);
//! let report = drive(&handler, Action::Create, request, &DriveOptions::default()).await;
//! assert!(report.succeeded());
//! ```

pub mod api;
pub mod error;
pub mod launch_profile;
pub mod memory;
pub mod resource_type;
pub mod streaming_image;
pub mod studio;
pub mod studio_component;

mod translate;

pub use api::{Lifecycle, NimbleApi};
pub use error::{NimbleError, NimbleErrorKind, Result};
pub use launch_profile::{LaunchProfile, LaunchProfileResource, StreamConfiguration};
pub use memory::{ApiCall, InMemoryNimble, Operation};
pub use resource_type::ResourceType;
pub use streaming_image::{StreamingImage, StreamingImageResource};
pub use studio::{Studio, StudioResource};
pub use studio_component::{StudioComponent, StudioComponentResource};
