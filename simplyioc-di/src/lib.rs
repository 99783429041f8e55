//! A minimal inversion-of-control container. Components are discovered by namespace, created once
//! as singletons and wired together by their declared dependencies.
//!
//! Please see the [component] module for declaring components and the [container] module for
//! building a container.

pub mod bean_registry;
pub mod component;
pub mod component_registry;
pub mod container;
pub mod dependency_graph;
mod error;
pub mod injection;
pub mod instance_provider;
pub mod resolver;
pub mod scanner;

pub use error::{ComponentDefinitionRegistryError, ContainerError};

#[cfg(feature = "derive")]
pub use simplyioc_di_derive::*;
