//! Error types for the wiring container

use thiserror::Error;

/// Result type for wiring operations
pub type WireResult<T> = Result<T, WireError>;

/// Errors raised while registering, wiring or verifying instances.
///
/// Every variant is fatal for the operation that produced it; the container
/// never retries and never continues past a failure.
#[derive(Error, Debug)]
pub enum WireError {
    #[error("An implementation of type `{type_name}` has been registered already!")]
    DuplicateRegistration { type_name: String },

    #[error("A mock of type `{role}` tries to take the role of an already registered implementation: {bound_to}")]
    RoleConflict { role: String, bound_to: String },

    #[error("No instance (or mock) of type `{role}` has been wired so far!")]
    MissingWiring { role: String },

    #[error(
        "{owner} misses dependency for field {field} of type {field_type}\n\
         It may be the case a dependency has been added to {owner} that now simply needs to be mocked via `container.wire_mock::<{field_type}>()`"
    )]
    MissingDependency {
        owner: String,
        field: String,
        field_type: String,
    },

    #[error(
        "{role} is not required but has been mocked.\n\
         It may be that an implementation under test has been refactored so a dependency disappeared. The dependency should also be removed from the test."
    )]
    UnusedMock { role: String },

    #[error("Failed to invoke setter {owner}::{setter}: {source}")]
    Invocation {
        owner: String,
        setter: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to read field {owner}::{field}: {message}")]
    FieldAccess {
        owner: String,
        field: String,
        message: String,
    },

    #[error("Failed to instantiate `{type_name}`: {source}")]
    Instantiation {
        type_name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("The mock policy cannot create a mock of type `{role}`")]
    MockUnavailable { role: String },

    #[error("The mock policy produced a mock of the wrong type for `{role}`")]
    MockTypeMismatch { role: String },

    #[error("Invalid settings: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
