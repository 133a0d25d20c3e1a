//! Machine definitions: transition tables, validation and builders.
//!
//! A definition is built once, either from the declarative serde form or
//! through [`MachineBuilder`], validated, and never mutated afterwards.

pub mod builder;
pub mod config;
pub mod definition;
pub mod error;

pub use builder::MachineBuilder;
pub use config::{MachineConfig, StateNodeConfig, TransitionTarget};
pub use definition::StateMachine;
pub use error::{ConfigError, ConfigErrors};
