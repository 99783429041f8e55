//! The container - creates every discovered component exactly once and wires them together.
//!
//! Construction runs through the following states:
//!
//! 1. [Scanning](ContainerState::Scanning) - definitions are collected from the namespace of the
//!    root component and any additional namespaces, then sorted by fully-qualified type name. The
//!    order is significant, since constructor dependencies are resolved against components created
//!    so far. Before anything gets created, constructor dependencies are checked for parameters no
//!    component provides, and for cycles (unless disabled).
//! 2. [Creating](ContainerState::Creating) - each component is created with its first
//!    `#[autowired]` constructor, or the zero-argument one.
//! 3. [Injecting](ContainerState::Injecting) - `#[inject]` fields and methods are populated with
//!    all components available.
//! 4. [Ready](ContainerState::Ready) - the [Container] is returned. Any error moves the bootstrap
//!    to [Failed](ContainerState::Failed) instead, and no container is returned.

use crate::bean_registry::{Bean, BeanKey, BeanRegistry};
use crate::component::{Component, Injectable};
use crate::component_registry::{ComponentDefinitionRegistry, StaticComponentDefinitionRegistry};
use crate::dependency_graph::{selected_constructor, ConstructorGraph};
use crate::error::ContainerError;
use crate::instance_provider::{
    CastFunction, ComponentInstanceAnyPtr, ComponentInstancePtr, ComponentInstanceProvider,
    TypedComponentInstanceProvider,
};
use crate::resolver::{
    BeanDeclaration, DependencyResolver, ResolutionStrategy, ResolutionStrategyPtr,
    TypeResolutionStrategy,
};
use crate::scanner::scan_namespaces;
use itertools::Itertools;
use std::any::{type_name, TypeId};
use std::slice;
use tracing::{debug, error, info};

#[cfg(not(feature = "threadsafe"))]
pub type ComponentDefinitionRegistryPtr = Box<dyn ComponentDefinitionRegistry>;
#[cfg(feature = "threadsafe")]
pub type ComponentDefinitionRegistryPtr = Box<dyn ComponentDefinitionRegistry + Send + Sync>;

/// State of container construction.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ContainerState {
    Scanning,
    Creating,
    Injecting,
    Ready,
    Failed,
}

/// A bean declared explicitly by identifier and fully-qualified component type name, rather than
/// discovered by scanning.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct DeclaredBean {
    pub id: String,
    pub type_name: String,
}

/// Builder for [Container] with sensible defaults, for easy construction.
pub struct ContainerBuilder {
    definition_registry: ComponentDefinitionRegistryPtr,
    namespaces: Vec<String>,
    strategy: ResolutionStrategyPtr,
    detect_cycles: bool,
}

impl ContainerBuilder {
    /// Creates a new builder with a default configuration: statically registered components,
    /// resolution by type and cycle detection enabled.
    pub fn new() -> Result<Self, ContainerError> {
        Ok(Self::with_registry(Box::new(
            StaticComponentDefinitionRegistry::new()?,
        )))
    }

    fn with_registry(definition_registry: ComponentDefinitionRegistryPtr) -> Self {
        Self {
            definition_registry,
            namespaces: vec![],
            strategy: Box::new(TypeResolutionStrategy),
            detect_cycles: true,
        }
    }

    /// Sets new [ComponentDefinitionRegistry].
    pub fn with_definition_registry(
        mut self,
        definition_registry: ComponentDefinitionRegistryPtr,
    ) -> Self {
        self.definition_registry = definition_registry;
        self
    }

    /// Adds a namespace to scan in addition to the namespace of the root component.
    pub fn with_namespace<T: ToString>(mut self, namespace: T) -> Self {
        self.namespaces.push(namespace.to_string());
        self
    }

    /// Adds namespaces to scan in addition to the namespace of the root component.
    pub fn with_namespaces<T: ToString, I: IntoIterator<Item = T>>(mut self, namespaces: I) -> Self {
        self.namespaces
            .extend(namespaces.into_iter().map(|namespace| namespace.to_string()));
        self
    }

    /// Sets new [ResolutionStrategy].
    pub fn with_resolution_strategy(mut self, strategy: ResolutionStrategyPtr) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enables or disables the constructor dependency cycle check. With the check disabled, a
    /// cycle surfaces as [BeanNotFound](ContainerError::BeanNotFound) during creation.
    pub fn with_cycle_detection(mut self, detect_cycles: bool) -> Self {
        self.detect_cycles = detect_cycles;
        self
    }

    /// Builds a [Container] from components discovered in the namespace of `Root` and any
    /// additional namespaces. `Root` itself must be a registered component.
    pub fn build<Root: Component>(self) -> Result<Container, ContainerError> {
        let mut bootstrap = Bootstrap::new(self.strategy.as_ref(), self.detect_cycles);
        let definition_registry = &self.definition_registry;
        let namespaces = self.namespaces;

        bootstrap.run(|| {
            let root = definition_registry
                .component_by_type(TypeId::of::<Root>())
                .ok_or_else(|| ContainerError::MisconfiguredComponent {
                    type_name: type_name::<Root>().to_string(),
                    reason: "root type is not a registered component".to_string(),
                })?;

            let namespaces = [root.namespace]
                .into_iter()
                .chain(namespaces)
                .collect_vec();

            Ok(scan_namespaces(definition_registry.as_ref(), &namespaces)?
                .into_iter()
                .sorted_by(|lhs, rhs| lhs.type_name.cmp(&rhs.type_name))
                .map(BeanDeclaration::from)
                .collect())
        })?;

        Ok(bootstrap.into_container())
    }

    /// Builds a [Container] from explicitly declared beans, created in the given order. Each bean
    /// is known by its declared id only. Usually combined with
    /// [IdentifierResolutionStrategy](crate::resolver::IdentifierResolutionStrategy).
    pub fn build_declared<I: IntoIterator<Item = DeclaredBean>>(
        self,
        beans: I,
    ) -> Result<Container, ContainerError> {
        let mut bootstrap = Bootstrap::new(self.strategy.as_ref(), self.detect_cycles);
        let definition_registry = &self.definition_registry;

        bootstrap.run(|| {
            beans
                .into_iter()
                .map(|bean| -> Result<_, ContainerError> {
                    let definition = definition_registry
                        .component_by_type_name(&bean.type_name)
                        .ok_or_else(|| ContainerError::UnknownComponentType(bean.type_name))?;

                    debug!("Declared bean {} of type {}", bean.id, definition.type_name);

                    Ok(BeanDeclaration {
                        identifiers: vec![bean.id],
                        definition,
                    })
                })
                .try_collect()
        })?;

        Ok(bootstrap.into_container())
    }
}

struct Bootstrap<'a, S: ResolutionStrategy + ?Sized> {
    strategy: &'a S,
    detect_cycles: bool,
    state: ContainerState,
    registry: BeanRegistry,
}

impl<'a, S: ResolutionStrategy + ?Sized> Bootstrap<'a, S> {
    fn new(strategy: &'a S, detect_cycles: bool) -> Self {
        Self {
            strategy,
            detect_cycles,
            state: ContainerState::Scanning,
            registry: Default::default(),
        }
    }

    fn run<F>(&mut self, scan: F) -> Result<(), ContainerError>
    where
        F: FnOnce() -> Result<Vec<BeanDeclaration>, ContainerError>,
    {
        let result = self.execute(scan);
        match &result {
            Ok(_) => self.transition(ContainerState::Ready),
            Err(error) => {
                error!("Container construction failed in {:?}: {error}", self.state);
                self.transition(ContainerState::Failed);
            }
        }

        result
    }

    fn execute<F>(&mut self, scan: F) -> Result<(), ContainerError>
    where
        F: FnOnce() -> Result<Vec<BeanDeclaration>, ContainerError>,
    {
        let declarations = scan()?;
        self.validate(&declarations)?;

        self.transition(ContainerState::Creating);
        for declaration in &declarations {
            self.create(declaration)?;
        }

        self.transition(ContainerState::Injecting);
        self.inject()
    }

    fn transition(&mut self, state: ContainerState) {
        debug!("Container state: {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn validate(&self, declarations: &[BeanDeclaration]) -> Result<(), ContainerError> {
        let graph = ConstructorGraph::build(declarations, self.strategy)?;
        if !self.detect_cycles {
            return Ok(());
        }

        match graph.find_cycle() {
            Some(cycle) => Err(ContainerError::CyclicDependency(
                cycle
                    .into_iter()
                    .map(|index| declarations[index].definition.type_name.clone())
                    .collect(),
            )),
            None => Ok(()),
        }
    }

    fn create(&mut self, declaration: &BeanDeclaration) -> Result<(), ContainerError> {
        let definition = &declaration.definition;
        let constructor = selected_constructor(declaration)?;

        info!(
            "Creating bean {} with constructor {}",
            definition.type_name, constructor.name
        );

        let arguments = DependencyResolver::new(&self.registry, self.strategy)
            .resolve_all(&constructor.parameters, &definition.type_name)?;
        let instance = (constructor.constructor)(arguments)?;

        self.registry.register(
            self.strategy.registration_keys(declaration),
            Bean {
                instance,
                definition: definition.clone(),
            },
        );

        Ok(())
    }

    fn inject(&self) -> Result<(), ContainerError> {
        let resolver = DependencyResolver::new(&self.registry, self.strategy);

        for bean in self.registry.beans() {
            let type_name = &bean.definition.type_name;

            for field in &bean.definition.fields {
                debug!("Injecting field {}::{}", type_name, field.name);

                let arguments =
                    resolver.resolve_all(slice::from_ref(&field.dependency), type_name)?;
                (field.inject)(&bean.instance, arguments)?;
            }

            for method in &bean.definition.methods {
                debug!("Calling injection method {}::{}", type_name, method.name);

                let arguments = resolver.resolve_all(&method.parameters, type_name)?;
                (method.inject)(&bean.instance, arguments)?;
            }
        }

        Ok(())
    }

    fn into_container(self) -> Container {
        info!("Container ready with {} beans.", self.registry.len());
        Container {
            registry: self.registry,
        }
    }
}

/// A fully wired container. Owns every bean for its whole lifetime, so fields populated by
/// injection stay valid only as long as the container is alive.
#[derive(Debug)]
pub struct Container {
    registry: BeanRegistry,
}

impl Container {
    /// Creates a container with the default [ContainerBuilder] configuration, scanning the
    /// namespace of `Root` and all `extra_namespaces`.
    pub fn new<Root: Component>(extra_namespaces: &[&str]) -> Result<Self, ContainerError> {
        ContainerBuilder::new()?
            .with_namespaces(extra_namespaces)
            .build::<Root>()
    }

    /// Returns the bean registered for the given type, which can be a concrete component type or
    /// an alias. Absence is not an error.
    #[inline]
    pub fn bean<T: Injectable + ?Sized>(&self) -> Option<ComponentInstancePtr<T>> {
        self.primary_instance_typed::<T>()
    }

    /// Returns the bean registered under the given identifier. Identifiers are only registered by
    /// the [IdentifierResolutionStrategy](crate::resolver::IdentifierResolutionStrategy).
    #[inline]
    pub fn bean_by_name<T: Injectable + ?Sized>(
        &self,
        name: &str,
    ) -> Option<ComponentInstancePtr<T>> {
        self.instance_by_name_typed::<T>(name)
    }

    /// Returns fully-qualified type names of all beans, in creation order.
    pub fn bean_type_names(&self) -> Vec<&str> {
        self.registry
            .beans()
            .iter()
            .map(|bean| bean.definition.type_name.as_str())
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    fn typed_bean(
        &self,
        key: &BeanKey,
        type_id: TypeId,
    ) -> Option<(ComponentInstanceAnyPtr, CastFunction)> {
        let bean = self.registry.lookup(key)?;
        bean.definition
            .cast_for(type_id)
            .map(|cast| (bean.instance.clone(), cast))
    }
}

impl ComponentInstanceProvider for Container {
    fn primary_instance(&self, type_id: TypeId) -> Option<(ComponentInstanceAnyPtr, CastFunction)> {
        self.typed_bean(&BeanKey::Type(type_id), type_id)
    }

    fn instance_by_name(
        &self,
        name: &str,
        type_id: TypeId,
    ) -> Option<(ComponentInstanceAnyPtr, CastFunction)> {
        self.typed_bean(&BeanKey::Name(name.to_string()), type_id)
    }
}
