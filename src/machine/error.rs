//! Configuration errors for machine definitions.

use thiserror::Error;

/// Name used in errors for the machine-wide fallback transitions.
pub const MACHINE_SCOPE: &str = "(machine)";

/// A single problem found in a machine definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Initial context not specified. Call .context(value) before .build()")]
    MissingContext,

    #[error("State '{state}' has a transition with an empty event key")]
    EmptyEventKey { state: String },

    #[error("Transition '{event}' from '{state}' has an empty target")]
    EmptyTarget { state: String, event: String },

    #[error("Transition '{event}' from '{state}' uses the reserved override event key")]
    ReservedEventKey { state: String, event: String },

    #[error("Transition '{event}' from '{state}' lists an empty action name")]
    EmptyActionName { state: String, event: String },

    #[error("Machine definition could not be parsed: {0}")]
    Parse(String),
}

/// Every problem found while validating a machine definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid machine definition: {}", join(.errors))]
pub struct ConfigErrors {
    errors: Vec<ConfigError>,
}

impl ConfigErrors {
    pub fn new(errors: Vec<ConfigError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[ConfigError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_vec(self) -> Vec<ConfigError> {
        self.errors
    }
}

impl From<ConfigError> for ConfigErrors {
    fn from(error: ConfigError) -> Self {
        Self::new(vec![error])
    }
}

fn join(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_error() {
        let errors = ConfigErrors::new(vec![
            ConfigError::MissingInitialState,
            ConfigError::EmptyTarget {
                state: "idle".to_string(),
                event: "GO".to_string(),
            },
        ]);
        let message = errors.to_string();
        assert!(message.contains("Initial state not specified"));
        assert!(message.contains("Transition 'GO' from 'idle' has an empty target"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn single_error_converts() {
        let errors: ConfigErrors = ConfigError::MissingContext.into();
        assert_eq!(errors.errors(), &[ConfigError::MissingContext]);
    }
}
