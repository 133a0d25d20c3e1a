//! Validated, immutable machine definitions.

use super::config::{MachineConfig, TransitionTarget};
use super::error::ConfigErrors;
use crate::core::EventKey;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use stillwater::validation::Validation;

/// A machine definition that passed validation.
///
/// Holds an identifier, the initial state and context, and the transition
/// table. There is no way to mutate it after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct StateMachine<C> {
    config: MachineConfig<C>,
}

impl<C> StateMachine<C> {
    /// Validate `config`, failing with every problem found.
    pub fn new(config: MachineConfig<C>) -> Result<Self, ConfigErrors> {
        match config.validate() {
            Validation::Success(()) => Ok(Self { config }),
            Validation::Failure(errors) => Err(ConfigErrors::new(errors.iter().cloned().collect())),
        }
    }

    /// Parse and validate the declarative JSON form.
    pub fn from_json(json: &str) -> Result<Self, ConfigErrors>
    where
        C: DeserializeOwned,
    {
        let config = MachineConfig::from_json(json).map_err(ConfigErrors::from)?;
        Self::new(config)
    }

    pub fn id(&self) -> Option<&str> {
        self.config.id.as_deref()
    }

    pub fn initial(&self) -> &str {
        &self.config.initial
    }

    pub fn initial_context(&self) -> &C {
        &self.config.context
    }

    pub fn config(&self) -> &MachineConfig<C> {
        &self.config
    }

    pub fn resolve<Ev>(&self, state: &str, event: &Ev) -> Option<&TransitionTarget>
    where
        Ev: EventKey + ?Sized,
    {
        self.config.resolve(state, event)
    }

    pub fn resolve_transition<Ev>(&self, state: &str, event: &Ev) -> Option<&str>
    where
        Ev: EventKey + ?Sized,
    {
        self.config.resolve_transition(state, event)
    }

    pub fn enabled_events(&self, state: &str) -> BTreeSet<String> {
        self.config.enabled_events(state)
    }
}

impl<C> TryFrom<MachineConfig<C>> for StateMachine<C> {
    type Error = ConfigErrors;

    fn try_from(config: MachineConfig<C>) -> Result<Self, Self::Error> {
        Self::new(config)
    }
}
