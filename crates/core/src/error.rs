//! The error taxonomy for `arrowline` pipelines.
//!
//! Grounded on `cuenv-core`'s `errors.rs`: one `thiserror`-derived enum, one
//! `Result` alias, free constructor functions for the common cases, and
//! `#[source]` on variants wrapping an inner error.

use std::fmt;

/// Result type alias used throughout `arrowline`.
pub type Result<T> = std::result::Result<T, Error>;

/// The error taxonomy from the contract & propagation design (spec §7).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A builder received a value of the wrong shape: a bind function that
    /// did not return a state value, a wire argument missing a required
    /// key, or a non-morphism passed where a morphism was expected.
    #[error("contract violation: {message}")]
    ContractViolation { message: String },

    /// A choice operation (`left`, `right`, `+++`, `|||`) encountered an
    /// `Either` value tagged in a way the operator doesn't recognise.
    #[error("branch-tag violation: {message}")]
    BranchTagViolation { message: String },

    /// A user-supplied function raised while a task body ran on the worker
    /// pool; the failure travelled inside a `Deferred` value and surfaced
    /// at the first `result()` that forced it.
    #[error("user task failed: {message}")]
    UserTaskFailure {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The injected worker pool's `submit` failed to schedule a task.
    #[error("worker pool rejected submission: {message}")]
    PoolSubmission { message: String },
}

impl Error {
    pub fn contract_violation(message: impl fmt::Display) -> Self {
        let message = message.to_string();
        tracing::error!(%message, "contract violation");
        Error::ContractViolation { message }
    }

    pub fn branch_tag_violation(message: impl fmt::Display) -> Self {
        let message = message.to_string();
        tracing::error!(%message, "branch-tag violation");
        Error::BranchTagViolation { message }
    }

    pub fn user_task_failure(message: impl fmt::Display) -> Self {
        Error::UserTaskFailure {
            message: message.to_string(),
            source: None,
        }
    }

    pub fn user_task_failure_with_source(
        message: impl fmt::Display,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Error::UserTaskFailure {
            message: message.to_string(),
            source: Some(source),
        }
    }

    pub fn pool_submission(message: impl fmt::Display) -> Self {
        Error::PoolSubmission {
            message: message.to_string(),
        }
    }
}
