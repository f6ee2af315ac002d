use std::error::Error as StdError;

use thiserror::Error;

use crate::{config::LoadError, domain::error::EncodeError, infra::error::InfraError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Config(#[from] LoadError),
}

impl AppError {
    /// Short machine-friendly label for log fields.
    pub fn source_label(&self) -> &'static str {
        match self {
            AppError::Encode(EncodeError::UnresolvableResourceType { .. }) => "schema",
            AppError::Encode(EncodeError::InvalidSerializeDirective) => "directive",
            AppError::Encode(EncodeError::Serialization(_)) => "serialization",
            AppError::Infra(InfraError::Fixture { .. }) | AppError::Infra(InfraError::Io(_)) => {
                "fixture"
            }
            AppError::Infra(InfraError::Telemetry(_)) => "telemetry",
            AppError::Config(_) => "configuration",
        }
    }

    /// This error's message followed by each underlying cause.
    pub fn messages(&self) -> Vec<String> {
        let mut messages = vec![self.to_string()];
        let mut current = self.source();
        while let Some(inner) = current {
            let message = inner.to_string();
            if messages.last() != Some(&message) {
                messages.push(message);
            }
            current = inner.source();
        }
        messages
    }
}
