//! StudioFlow Cloud Lifecycle Engine
//!
//! This crate drives remote resources whose creation and deletion are
//! asynchronous: issue the mutating call, poll until the resource reaches a
//! terminal state, and hand back a uniform progress event.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │          Reconciliation engine / driver          │
//! │        (re-invokes while IN_PROGRESS)            │
//! └─────────────────┬───────────────────────────────┘
//!                   │ handle(action, request, context)
//! ┌─────────────────▼───────────────────────────────┐
//! │               studioflow-cloud                   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │       ResourceHandler<K> (orchestrator)   │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │  Stabilizer  │  │  Classifier  │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │ trait ResourceKind { ... }
//! ┌───────▼───────┐
//! │ resource kinds│
//! │ (nimble, ...) │
//! └───────────────┘
//! ```

pub mod classify;
pub mod context;
pub mod driver;
pub mod error;
pub mod event;
pub mod handler;
pub mod list;
pub mod poller;
pub mod request;
pub mod resource;
pub mod state;

#[cfg(test)]
mod fake;

// Re-exports
pub use classify::classify;
pub use context::{CallbackContext, ResumePoint};
pub use driver::{DriveOptions, DriveReport, drive};
pub use error::{HandlerError, HandlerErrorCode, RemoteErrorKind, RemoteFault, Result};
pub use event::{Action, ListPage, OperationStatus, Outcome, ProgressEvent};
pub use handler::{HandlerSettings, ResourceHandler};
pub use poller::{Poll, Stabilizer};
pub use request::ResourceHandlerRequest;
pub use resource::{Page, ResourceHandle, ResourceKind, UpdateMode};
pub use state::{Mutation, Observation, ResourceState, StateTable, Transitions, Verdict};
