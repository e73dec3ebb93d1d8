use super::validation::ValidationError;
use crate::config::ConfigError;
use thiserror::Error;

/// Errors that abort dataset generation. Nothing partial is returned.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cannot generate {entity}: no {parent} to reference")]
    MissingParents {
        entity: &'static str,
        parent: &'static str,
    },

    #[error("Generated dataset is inconsistent ({} problems), first: {}", .0.len(), first_problem(.0))]
    Inconsistent(Vec<ValidationError>),
}

fn first_problem(errors: &[ValidationError]) -> String {
    errors
        .first()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "none".to_string())
}
