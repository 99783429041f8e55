//! Dependency resolution against the [BeanRegistry].
//!
//! How beans are registered and looked up is decided by a [ResolutionStrategy], chosen when the
//! container is built:
//!
//! * [TypeResolutionStrategy] - the default; dependencies are matched by their type, which can be
//! a concrete component type or an alias
//! * [IdentifierResolutionStrategy] - dependencies are matched by the identifier of the field or
//! parameter they are injected into, compared with bean identifiers
//!
//! With identifier resolution, fields, constructor parameters and `#[inject]` method parameters
//! are all matched by their own identifier, never by the name of their type. A different
//! identifier can be requested with `#[inject(name = "...")]` on the field or parameter.

use crate::bean_registry::{BeanKey, BeanRegistry};
use crate::component_registry::ComponentDefinition;
use crate::error::ContainerError;
use crate::injection::{Dependency, InjectionArguments};
use itertools::Itertools;
#[cfg(test)]
use mockall::automock;
use std::any::Any;

#[cfg(not(feature = "threadsafe"))]
pub type ResolutionStrategyPtr = Box<dyn ResolutionStrategy>;
#[cfg(feature = "threadsafe")]
pub type ResolutionStrategyPtr = Box<dyn ResolutionStrategy + Send + Sync>;

/// A component scheduled for creation, along with the identifiers it's known by.
#[derive(Clone, Debug)]
pub struct BeanDeclaration {
    pub identifiers: Vec<String>,
    pub definition: ComponentDefinition,
}

impl From<ComponentDefinition> for BeanDeclaration {
    fn from(definition: ComponentDefinition) -> Self {
        Self {
            identifiers: definition.names.clone(),
            definition,
        }
    }
}

/// Policy deciding how beans are keyed and how dependencies are matched with them.
#[cfg_attr(test, automock)]
pub trait ResolutionStrategy {
    /// Keys under which a newly created bean is registered.
    fn registration_keys(&self, declaration: &BeanDeclaration) -> Vec<BeanKey>;

    /// Key used to look up the bean satisfying given dependency.
    fn dependency_key(&self, dependency: &Dependency) -> BeanKey;
}

fn type_keys(declaration: &BeanDeclaration) -> impl Iterator<Item = BeanKey> + '_ {
    declaration.definition.provided_types().map(BeanKey::Type)
}

/// Registers beans under their concrete type and all alias types; resolves by type.
#[derive(Default, Copy, Clone, Eq, PartialEq, Debug)]
pub struct TypeResolutionStrategy;

impl ResolutionStrategy for TypeResolutionStrategy {
    fn registration_keys(&self, declaration: &BeanDeclaration) -> Vec<BeanKey> {
        type_keys(declaration).collect()
    }

    #[inline]
    fn dependency_key(&self, dependency: &Dependency) -> BeanKey {
        BeanKey::Type(dependency.type_id)
    }
}

/// Registers beans under their identifiers (and types, for lookup); resolves by the identifier of
/// the injected field or parameter.
#[derive(Default, Copy, Clone, Eq, PartialEq, Debug)]
pub struct IdentifierResolutionStrategy;

impl ResolutionStrategy for IdentifierResolutionStrategy {
    fn registration_keys(&self, declaration: &BeanDeclaration) -> Vec<BeanKey> {
        declaration
            .identifiers
            .iter()
            .cloned()
            .map(BeanKey::Name)
            .chain(type_keys(declaration))
            .collect()
    }

    #[inline]
    fn dependency_key(&self, dependency: &Dependency) -> BeanKey {
        BeanKey::Name(dependency.name.clone())
    }
}

/// Resolves dependencies against a snapshot of the registry. No caching is performed beyond the
/// registry itself.
pub struct DependencyResolver<'a, S: ResolutionStrategy + ?Sized> {
    registry: &'a BeanRegistry,
    strategy: &'a S,
}

impl<'a, S: ResolutionStrategy + ?Sized> DependencyResolver<'a, S> {
    pub fn new(registry: &'a BeanRegistry, strategy: &'a S) -> Self {
        Self { registry, strategy }
    }

    /// Returns a boxed `ComponentInstancePtr` of the dependency type, or `None` if there's no
    /// matching bean.
    pub fn resolve(&self, dependency: &Dependency) -> Result<Option<Box<dyn Any>>, ContainerError> {
        let bean = match self
            .registry
            .lookup(&self.strategy.dependency_key(dependency))
        {
            Some(bean) => bean,
            None => return Ok(None),
        };

        let incompatible = || ContainerError::IncompatibleComponent {
            dependency: dependency.type_name.clone(),
            provided_by: bean.definition.type_name.clone(),
        };

        let cast = bean
            .definition
            .cast_for(dependency.type_id)
            .ok_or_else(incompatible)?;

        cast(bean.instance.clone())
            .map(Some)
            .map_err(|_| incompatible())
    }

    /// Resolves all given dependencies, failing with
    /// [BeanNotFound](ContainerError::BeanNotFound) on the first missing one.
    pub fn resolve_all(
        &self,
        dependencies: &[Dependency],
        required_by: &str,
    ) -> Result<InjectionArguments, ContainerError> {
        dependencies
            .iter()
            .map(|dependency| {
                self.resolve(dependency)?
                    .ok_or_else(|| ContainerError::BeanNotFound {
                        dependency: describe(dependency, self.strategy),
                        required_by: required_by.to_string(),
                    })
            })
            .try_collect()
            .map(InjectionArguments::new)
    }
}

fn describe<S: ResolutionStrategy + ?Sized>(dependency: &Dependency, strategy: &S) -> String {
    match strategy.dependency_key(dependency) {
        BeanKey::Type(_) => dependency.type_name.clone(),
        BeanKey::Name(name) => format!("'{name}' ({})", dependency.type_name),
    }
}

#[cfg(test)]
mod tests {
    use crate::bean_registry::{Bean, BeanKey, BeanRegistry};
    use crate::component::{Component, ComponentDowncast, Injectable};
    use crate::component_registry::ComponentDefinition;
    use crate::error::ContainerError;
    use crate::injection::Dependency;
    use crate::instance_provider::{ComponentInstanceAnyPtr, ComponentInstancePtr};
    use crate::resolver::{
        BeanDeclaration, DependencyResolver, IdentifierResolutionStrategy,
        MockResolutionStrategy, ResolutionStrategy, TypeResolutionStrategy,
    };
    use mockall::predicate::*;
    use std::any::{Any, TypeId};

    struct TestComponent(i8);

    impl Injectable for TestComponent {}

    impl ComponentDowncast<TestComponent> for TestComponent {
        fn downcast(
            source: ComponentInstanceAnyPtr,
        ) -> Result<ComponentInstancePtr<Self>, ComponentInstanceAnyPtr> {
            source.downcast()
        }
    }

    impl Component for TestComponent {}

    struct OtherComponent;

    impl Injectable for OtherComponent {}

    fn cast(instance: ComponentInstanceAnyPtr) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
        TestComponent::downcast(instance).map(|p| Box::new(p) as Box<dyn Any>)
    }

    fn create_declaration() -> BeanDeclaration {
        ComponentDefinition {
            type_id: TypeId::of::<TestComponent>(),
            type_name: std::any::type_name::<TestComponent>().to_string(),
            namespace: "app".to_string(),
            names: vec!["test_component".to_string()],
            constructors: vec![],
            fields: vec![],
            methods: vec![],
            aliases: vec![],
            cast,
        }
        .into()
    }

    fn create_registry<S: ResolutionStrategy>(strategy: &S) -> BeanRegistry {
        let declaration = create_declaration();

        let mut registry = BeanRegistry::default();
        registry.register(
            strategy.registration_keys(&declaration),
            Bean {
                instance: ComponentInstancePtr::new(TestComponent(7)) as ComponentInstanceAnyPtr,
                definition: declaration.definition,
            },
        );
        registry
    }

    #[test]
    fn should_resolve_by_type() {
        let strategy = TypeResolutionStrategy;
        let registry = create_registry(&strategy);
        let resolver = DependencyResolver::new(&registry, &strategy);

        let mut arguments = resolver
            .resolve_all(&[Dependency::of::<TestComponent>("unrelated")], "test")
            .unwrap();
        assert_eq!(arguments.take::<TestComponent>().unwrap().0, 7);
    }

    #[test]
    fn should_report_missing_type() {
        let strategy = TypeResolutionStrategy;
        let registry = create_registry(&strategy);
        let resolver = DependencyResolver::new(&registry, &strategy);

        assert!(resolver
            .resolve(&Dependency::of::<OtherComponent>("other"))
            .unwrap()
            .is_none());
        assert!(matches!(
            resolver
                .resolve_all(&[Dependency::of::<OtherComponent>("other")], "test")
                .unwrap_err(),
            ContainerError::BeanNotFound { required_by, .. } if required_by == "test"
        ));
    }

    #[test]
    fn should_resolve_by_identifier() {
        let strategy = IdentifierResolutionStrategy;
        let registry = create_registry(&strategy);
        let resolver = DependencyResolver::new(&registry, &strategy);

        assert!(resolver
            .resolve(&Dependency::of::<TestComponent>("test_component"))
            .unwrap()
            .is_some());
        assert!(resolver
            .resolve(&Dependency::of::<TestComponent>("unrelated"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn should_reject_incompatible_identifier() {
        let strategy = IdentifierResolutionStrategy;
        let registry = create_registry(&strategy);
        let resolver = DependencyResolver::new(&registry, &strategy);

        assert!(matches!(
            resolver
                .resolve(&Dependency::of::<OtherComponent>("test_component"))
                .unwrap_err(),
            ContainerError::IncompatibleComponent { .. }
        ));
    }

    #[test]
    fn should_use_strategy_key() {
        let registry = create_registry(&TypeResolutionStrategy);
        let dependency = Dependency::of::<OtherComponent>("other");

        let mut strategy = MockResolutionStrategy::new();
        strategy
            .expect_dependency_key()
            .with(eq(dependency.clone()))
            .times(1)
            .return_const(BeanKey::Type(TypeId::of::<TestComponent>()));

        let resolver = DependencyResolver::new(&registry, &strategy);
        assert!(matches!(
            resolver.resolve(&dependency).unwrap_err(),
            ContainerError::IncompatibleComponent { .. }
        ));
    }
}
