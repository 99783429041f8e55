//! Namespace scanning - discovering component definitions by module path.
//!
//! A namespace is a `::`-separated module path, e.g. `my_app::services`. A component belongs to a
//! namespace if it's declared in that module or any of its submodules.

use crate::component_registry::{ComponentDefinition, ComponentDefinitionRegistry};
use crate::error::ContainerError;
use fxhash::FxHashSet;
use itertools::Itertools;
use tracing::{debug, info};

const NAMESPACE_SEPARATOR: &str = "::";

/// Enumerates component definitions reachable under a namespace.
pub trait NamespaceScanner {
    /// Returns all definitions declared in the given namespace, or a
    /// [Discovery](ContainerError::Discovery) error if the namespace is invalid or empty.
    fn scan(&self, namespace: &str) -> Result<Vec<ComponentDefinition>, ContainerError>;
}

impl<R: ComponentDefinitionRegistry + ?Sized> NamespaceScanner for R {
    fn scan(&self, namespace: &str) -> Result<Vec<ComponentDefinition>, ContainerError> {
        if !is_valid_namespace(namespace) {
            return Err(ContainerError::Discovery(namespace.to_string()));
        }

        info!("Scanning namespace: {namespace}");

        let definitions = self
            .all_definitions()
            .into_iter()
            .filter(|definition| is_in_namespace(&definition.namespace, namespace))
            .inspect(|definition| debug!("Scanned component: {}", definition.type_name))
            .collect_vec();

        if definitions.is_empty() {
            Err(ContainerError::Discovery(namespace.to_string()))
        } else {
            Ok(definitions)
        }
    }
}

/// Scans all given namespaces and returns the union of found definitions. Definitions reachable
/// through multiple overlapping namespaces are returned once.
pub fn scan_namespaces<S: NamespaceScanner + ?Sized>(
    scanner: &S,
    namespaces: &[String],
) -> Result<Vec<ComponentDefinition>, ContainerError> {
    let mut seen = FxHashSet::default();
    let mut result = vec![];

    for namespace in namespaces {
        for definition in scanner.scan(namespace)? {
            if seen.insert(definition.type_id) {
                result.push(definition);
            }
        }
    }

    Ok(result)
}

/// Checks if a module path lies within a namespace.
pub fn is_in_namespace(module_path: &str, namespace: &str) -> bool {
    module_path
        .strip_prefix(namespace)
        .map(|rest| rest.is_empty() || rest.starts_with(NAMESPACE_SEPARATOR))
        .unwrap_or(false)
}

fn is_valid_namespace(namespace: &str) -> bool {
    !namespace.is_empty()
        && namespace.split(NAMESPACE_SEPARATOR).all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_')
        })
}

#[cfg(test)]
mod tests {
    use crate::component_registry::{ComponentDefinition, MockComponentDefinitionRegistry};
    use crate::error::ContainerError;
    use crate::instance_provider::ComponentInstanceAnyPtr;
    use crate::scanner::{is_in_namespace, scan_namespaces, NamespaceScanner};
    use std::any::{Any, TypeId};

    fn cast(instance: ComponentInstanceAnyPtr) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
        Err(instance)
    }

    fn create_definition<T: 'static>(namespace: &str) -> ComponentDefinition {
        ComponentDefinition {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>().to_string(),
            namespace: namespace.to_string(),
            names: vec![],
            constructors: vec![],
            fields: vec![],
            methods: vec![],
            aliases: vec![],
            cast,
        }
    }

    fn create_registry() -> MockComponentDefinitionRegistry {
        let mut registry = MockComponentDefinitionRegistry::new();
        registry.expect_all_definitions().return_const(vec![
            create_definition::<i8>("app::metier"),
            create_definition::<i16>("app::metier::impls"),
            create_definition::<i32>("app::metier_ext"),
            create_definition::<i64>("app::dao"),
        ]);
        registry
    }

    #[test]
    fn should_match_namespace_boundaries() {
        assert!(is_in_namespace("app::metier", "app::metier"));
        assert!(is_in_namespace("app::metier::impls", "app::metier"));
        assert!(!is_in_namespace("app::metier_ext", "app::metier"));
        assert!(!is_in_namespace("app", "app::metier"));
    }

    #[test]
    fn should_scan_recursively() {
        let registry = create_registry();
        let definitions = registry.scan("app::metier").unwrap();

        assert_eq!(definitions.len(), 2);
        assert!(definitions
            .iter()
            .all(|definition| definition.namespace.starts_with("app::metier")));
    }

    #[test]
    fn should_fail_on_empty_namespace() {
        let registry = create_registry();
        assert!(matches!(
            registry.scan("app::missing").unwrap_err(),
            ContainerError::Discovery(namespace) if namespace == "app::missing"
        ));
    }

    #[test]
    fn should_fail_on_invalid_namespace() {
        let registry = create_registry();
        assert!(matches!(
            registry.scan("").unwrap_err(),
            ContainerError::Discovery(_)
        ));
        assert!(matches!(
            registry.scan("app::::dao").unwrap_err(),
            ContainerError::Discovery(_)
        ));
        assert!(matches!(
            registry.scan("app.dao").unwrap_err(),
            ContainerError::Discovery(_)
        ));
    }

    #[test]
    fn should_deduplicate_overlapping_namespaces() {
        let registry = create_registry();
        let definitions = scan_namespaces(
            &registry,
            &[
                "app".to_string(),
                "app::metier".to_string(),
                "app::dao".to_string(),
            ],
        )
        .unwrap();

        assert_eq!(definitions.len(), 4);
    }
}
