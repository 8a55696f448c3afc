//! Stabilization poller
//!
//! One call is one poll: fetch the resource once, classify its state against
//! the expected transitions, and report. The poller never sleeps and never
//! counts attempts; re-invocation and the delay between polls belong to the
//! caller.

use crate::classify::classify;
use crate::error::{HandlerError, RemoteFault, Result};
use crate::state::{Mutation, Observation, Transitions, Verdict};
use std::future::Future;
use tracing::{debug, info, warn};

/// Result of a single poll that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll {
    /// Still transitioning; poll again later
    Pending(Observation),
    /// Reached the expected terminal state
    Stable(Observation),
}

impl Poll {
    pub fn observation(&self) -> &Observation {
        match self {
            Poll::Pending(observation) | Poll::Stable(observation) => observation,
        }
    }

    pub fn is_stable(&self) -> bool {
        matches!(self, Poll::Stable(_))
    }
}

/// Polls one resource while one mutation settles
#[derive(Debug, Clone, Copy)]
pub struct Stabilizer<'a> {
    pub type_name: &'a str,
    pub identifier: &'a str,
    pub mutation: Mutation,
    pub transitions: &'a Transitions,
}

impl<'a> Stabilizer<'a> {
    pub fn new(
        type_name: &'a str,
        identifier: &'a str,
        mutation: Mutation,
        transitions: &'a Transitions,
    ) -> Self {
        Self {
            type_name,
            identifier,
            mutation,
            transitions,
        }
    }

    /// Fetch once and evaluate
    ///
    /// Fetch errors are classified and returned; a failure state reported by
    /// the resource itself becomes `GeneralServiceError`.
    pub async fn poll<R, E, Fut, O>(&self, fetch: Fut, observe: O) -> Result<Poll>
    where
        Fut: Future<Output = std::result::Result<R, E>>,
        E: RemoteFault,
        O: FnOnce(&R) -> Observation,
    {
        let resource = fetch.await.map_err(|err| {
            let classified = classify(self.type_name, &err);
            warn!(
                "{} [{}] describe failed during {}: {}",
                self.type_name,
                self.identifier,
                self.mutation.noun(),
                classified
            );
            classified
        })?;

        let observation = observe(&resource);
        debug!(
            "{} [{}] observed {} ({})",
            self.type_name, self.identifier, observation.state_label, observation.state
        );

        match self.transitions.verdict(observation.state) {
            Verdict::InProgress => {
                info!(
                    "{} [{}] {} in progress",
                    self.type_name,
                    self.identifier,
                    self.mutation.noun()
                );
                Ok(Poll::Pending(observation))
            }
            Verdict::Success => {
                info!(
                    "{} [{}] {} has stabilized",
                    self.type_name,
                    self.identifier,
                    self.mutation.noun()
                );
                Ok(Poll::Stable(observation))
            }
            Verdict::TerminalFailure => {
                let message = observation.failure_message();
                warn!(
                    "{} [{}] {} failed: {}",
                    self.type_name,
                    self.identifier,
                    self.mutation.noun(),
                    message
                );
                Err(HandlerError::GeneralServiceError(message))
            }
        }
    }
}
