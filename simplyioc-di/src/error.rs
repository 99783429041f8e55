use crate::instance_provider::ErrorPtr;
use thiserror::Error;

/// Errors related to discovering, creating and wiring components. Any of them aborts container
/// construction.
#[derive(Error, Clone, Debug)]
pub enum ContainerError {
    #[error("Cannot locate any component in namespace: {0}")]
    Discovery(String),
    #[error("Cannot find a registered component type named: {0}")]
    UnknownComponentType(String),
    #[error("No usable constructor found for component: {0}")]
    NoUsableConstructor(String),
    #[error("Error constructing component {type_name}: {error}")]
    ConstructorError { type_name: String, error: ErrorPtr },
    #[error("Error injecting dependencies into {type_name} via {member}: {error}")]
    InjectionError {
        type_name: String,
        member: String,
        error: ErrorPtr,
    },
    #[error("No bean found for dependency {dependency} required by {required_by}")]
    BeanNotFound {
        dependency: String,
        required_by: String,
    },
    #[error("Component {type_name} is misconfigured: {reason}")]
    MisconfiguredComponent { type_name: String, reason: String },
    #[error("Bean {provided_by} cannot be used as dependency {dependency}")]
    IncompatibleComponent {
        dependency: String,
        provided_by: String,
    },
    #[error("Injection argument mismatch - expected: {0}")]
    ArgumentMismatch(String),
    #[error("Cyclic constructor dependency detected: {}", .0.join(" -> "))]
    CyclicDependency(Vec<String>),
    #[error(transparent)]
    DefinitionRegistry(#[from] ComponentDefinitionRegistryError),
}

/// Error related to component definition registries.
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum ComponentDefinitionRegistryError {
    #[error("Attempted to re-register a concrete component type: {0}")]
    DuplicateComponentType(String),
    #[error("Missing base component of type {target_type} for alias: {alias_type}")]
    MissingBaseComponent {
        alias_type: String,
        target_type: String,
    },
    #[error("Missing base component for injectable members: {0}")]
    MissingMembersComponent(String),
    #[error("Injectable members registered more than once for component: {0}")]
    DuplicateComponentMembers(String),
}
