//! Error types for otd-bot

use crate::services::ServiceError;
use thiserror::Error;

/// Workflow error type
#[derive(Debug, Error)]
pub enum BotError {
    /// Catalog, configuration or I/O failure
    #[error(transparent)]
    Common(#[from] otd_common::Error),

    /// Remote API failure that aborts the run
    #[error("{context}: {source}")]
    Service {
        context: String,
        #[source]
        source: ServiceError,
    },
}

impl BotError {
    /// Attach a short description of the failed step to a service error
    pub fn service(context: impl Into<String>) -> impl FnOnce(ServiceError) -> BotError {
        let context = context.into();
        move |source| BotError::Service { context, source }
    }
}

impl From<ServiceError> for BotError {
    fn from(source: ServiceError) -> Self {
        BotError::Service {
            context: "Remote service error".to_string(),
            source,
        }
    }
}

/// Result type for workflows
pub type BotResult<T> = Result<T, BotError>;
