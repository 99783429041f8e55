//! Functionality related to the registration table - definitions of components which the
//! container can discover and create. Definitions can be registered automatically, via the derive
//! macros, or manually.

use crate::component::{Component, ComponentDowncast, Injectable};
use crate::error::{ComponentDefinitionRegistryError, ContainerError};
use crate::injection::{Dependency, InjectionArguments};
use crate::instance_provider::{CastFunction, ComponentInstanceAnyPtr};
use derivative::Derivative;
use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;
#[cfg(test)]
use mockall::automock;
use std::any::{type_name, TypeId};
use tracing::debug;

/// Creates a type-erased component instance from resolved constructor arguments.
pub type ConstructorFunction =
    fn(arguments: InjectionArguments) -> Result<ComponentInstanceAnyPtr, ContainerError>;

/// Injects resolved arguments into an existing, type-erased component instance.
pub type InjectorFunction = fn(
    instance: &ComponentInstanceAnyPtr,
    arguments: InjectionArguments,
) -> Result<(), ContainerError>;

/// A way to create a component.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct ConstructorDefinition {
    pub name: String,

    /// Autowired constructors take precedence over the zero-argument one.
    pub is_autowired: bool,

    pub parameters: Vec<Dependency>,

    #[derivative(Debug = "ignore")]
    pub constructor: ConstructorFunction,
}

/// A field populated after all components have been created.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct FieldInjectionPoint {
    pub name: String,

    pub dependency: Dependency,

    #[derivative(Debug = "ignore")]
    pub inject: InjectorFunction,
}

/// A method called with resolved arguments after all components have been created.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct MethodInjectionPoint {
    pub name: String,

    pub parameters: Vec<Dependency>,

    #[derivative(Debug = "ignore")]
    pub inject: InjectorFunction,
}

/// An additional type, usually a `dyn Trait`, under which a component is available.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct AliasDefinition {
    pub type_id: TypeId,

    pub type_name: String,

    #[derivative(Debug = "ignore")]
    pub cast: CastFunction,
}

/// Definition for a [Component] registered in a definition registry.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct ComponentDefinition {
    pub type_id: TypeId,

    /// Fully-qualified type name, which also establishes the creation order.
    pub type_name: String,

    /// Module path of the component, used for namespace scanning.
    pub namespace: String,

    /// Identifiers used when resolving by name. Derive-based components have their name
    /// generated from type name by converting it to snake case.
    pub names: Vec<String>,

    /// All known constructors: autowired ones in declaration order, followed by the
    /// zero-argument one, if present.
    pub constructors: Vec<ConstructorDefinition>,

    pub fields: Vec<FieldInjectionPoint>,

    pub methods: Vec<MethodInjectionPoint>,

    pub aliases: Vec<AliasDefinition>,

    /// Cast function for the concrete type. Please see the documentation for [CastFunction] for
    /// details on usage.
    #[derivative(Debug = "ignore")]
    pub cast: CastFunction,
}

impl ComponentDefinition {
    /// Returns the constructor used to create the component: the first autowired one, or the
    /// zero-argument one as a fallback.
    pub fn selected_constructor(&self) -> Option<&ConstructorDefinition> {
        self.constructors
            .iter()
            .find(|constructor| constructor.is_autowired)
            .or_else(|| {
                self.constructors
                    .iter()
                    .find(|constructor| constructor.parameters.is_empty())
            })
    }

    /// Returns the cast function producing a pointer of the given type, if the component is
    /// available as such.
    pub fn cast_for(&self, type_id: TypeId) -> Option<CastFunction> {
        if type_id == self.type_id {
            return Some(self.cast);
        }

        self.aliases
            .iter()
            .find(|alias| alias.type_id == type_id)
            .map(|alias| alias.cast)
    }

    /// Concrete type followed by all alias types.
    pub fn provided_types(&self) -> impl Iterator<Item = TypeId> + '_ {
        [self.type_id]
            .into_iter()
            .chain(self.aliases.iter().map(|alias| alias.type_id))
    }
}

/// Registration information for a [Component]. Please see [ComponentDefinition] for information
/// about the meaning of the fields.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct ComponentMetadata {
    pub names: Vec<String>,

    pub namespace: String,

    #[derivative(Debug = "ignore")]
    pub default_constructor: Option<ConstructorFunction>,

    pub fields: Vec<FieldInjectionPoint>,

    #[derivative(Debug = "ignore")]
    pub cast: CastFunction,
}

/// Registration information for an alias for a [Component] registered in a definition registry.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct ComponentAliasMetadata {
    #[derivative(Debug = "ignore")]
    pub cast: CastFunction,
}

/// Registration information for autowired constructors and injection methods of a [Component].
#[derive(Clone, Debug, Default)]
pub struct ComponentMembersMetadata {
    pub constructors: Vec<ConstructorDefinition>,
    pub methods: Vec<MethodInjectionPoint>,
}

/// A registry of component definitions - the registration table scanned by the container.
#[cfg_attr(test, automock)]
pub trait ComponentDefinitionRegistry {
    /// Adds a new definition for a given type.
    fn register_component(
        &mut self,
        target: TypeId,
        target_name: &str,
        metadata: &ComponentMetadata,
    ) -> Result<(), ComponentDefinitionRegistryError>;

    /// Makes the component of type `target` available also as `alias_type`. If the component
    /// cannot be cast to the alias, resolving it will fail.
    fn register_alias(
        &mut self,
        alias_type: TypeId,
        target_type: TypeId,
        alias_name: &str,
        target_name: &str,
        metadata: &ComponentAliasMetadata,
    ) -> Result<(), ComponentDefinitionRegistryError>;

    /// Adds autowired constructors and injection methods to an already registered component.
    fn register_members(
        &mut self,
        target: TypeId,
        target_name: &str,
        metadata: &ComponentMembersMetadata,
    ) -> Result<(), ComponentDefinitionRegistryError>;

    /// Returns the definition of a given concrete type.
    fn component_by_type(&self, type_id: TypeId) -> Option<ComponentDefinition>;

    /// Returns the definition with the given fully-qualified type name.
    fn component_by_type_name(&self, type_name: &str) -> Option<ComponentDefinition>;

    /// Returns all registered definitions.
    fn all_definitions(&self) -> Vec<ComponentDefinition>;
}

/// Helper trait for [ComponentDefinitionRegistry] providing strongly-typed access.
pub trait TypedComponentDefinitionRegistry {
    /// Typesafe version of [ComponentDefinitionRegistry::register_component].
    fn register_component_typed<T: Component>(
        &mut self,
        metadata: &ComponentMetadata,
    ) -> Result<(), ComponentDefinitionRegistryError>;

    /// Typesafe version of [ComponentDefinitionRegistry::register_alias].
    fn register_alias_typed<Source: ComponentDowncast<Target> + ?Sized, Target: Component>(
        &mut self,
        metadata: &ComponentAliasMetadata,
    ) -> Result<(), ComponentDefinitionRegistryError>;

    /// Typesafe version of [ComponentDefinitionRegistry::register_members].
    fn register_members_typed<T: Component>(
        &mut self,
        metadata: &ComponentMembersMetadata,
    ) -> Result<(), ComponentDefinitionRegistryError>;

    /// Typesafe version of [ComponentDefinitionRegistry::component_by_type].
    fn component_by_type_typed<T: Injectable>(&self) -> Option<ComponentDefinition>;
}

impl<R: ComponentDefinitionRegistry + ?Sized> TypedComponentDefinitionRegistry for R {
    #[inline]
    fn register_component_typed<T: Component>(
        &mut self,
        metadata: &ComponentMetadata,
    ) -> Result<(), ComponentDefinitionRegistryError> {
        self.register_component(TypeId::of::<T>(), type_name::<T>(), metadata)
    }

    #[inline]
    fn register_alias_typed<Source: ComponentDowncast<Target> + ?Sized, Target: Component>(
        &mut self,
        metadata: &ComponentAliasMetadata,
    ) -> Result<(), ComponentDefinitionRegistryError> {
        self.register_alias(
            TypeId::of::<Source>(),
            TypeId::of::<Target>(),
            type_name::<Source>(),
            type_name::<Target>(),
            metadata,
        )
    }

    #[inline]
    fn register_members_typed<T: Component>(
        &mut self,
        metadata: &ComponentMembersMetadata,
    ) -> Result<(), ComponentDefinitionRegistryError> {
        self.register_members(TypeId::of::<T>(), type_name::<T>(), metadata)
    }

    #[inline]
    fn component_by_type_typed<T: Injectable>(&self) -> Option<ComponentDefinition> {
        self.component_by_type(TypeId::of::<T>())
    }
}

/// Registry of component definitions initialized from statically registered definitions. Each
/// registerer produced by the derive macros is invoked exactly once, when the registry is built.
/// The [Default] registry is empty and meant for manual registration.
#[derive(Clone, Debug, Default)]
pub struct StaticComponentDefinitionRegistry {
    definitions: FxHashMap<TypeId, ComponentDefinition>,
    registered_members: FxHashSet<TypeId>,
}

impl StaticComponentDefinitionRegistry {
    pub fn new() -> Result<Self, ComponentDefinitionRegistryError> {
        let mut registry = Self::default();

        for definition in inventory::iter::<internal::ComponentDefinitionRegisterer>
            .into_iter()
            .map(|registerer| (registerer.register)())
        {
            registry.register_component(
                definition.target,
                definition.target_name,
                &definition.metadata,
            )?;
        }

        // members and aliases refer to components, so they need to go last
        for definition in inventory::iter::<internal::ComponentMembersRegisterer>
            .into_iter()
            .map(|registerer| (registerer.register)())
        {
            registry.register_members(
                definition.target,
                definition.target_name,
                &definition.metadata,
            )?;
        }

        for definition in inventory::iter::<internal::ComponentAliasRegisterer>
            .into_iter()
            .map(|registerer| (registerer.register)())
        {
            registry.register_alias(
                definition.alias_type,
                definition.target_type,
                definition.alias_name,
                definition.target_name,
                &definition.metadata,
            )?;
        }

        debug!(
            components = registry.definitions.len(),
            "Built static component definition registry."
        );

        Ok(registry)
    }
}

impl ComponentDefinitionRegistry for StaticComponentDefinitionRegistry {
    fn register_component(
        &mut self,
        target: TypeId,
        target_name: &str,
        metadata: &ComponentMetadata,
    ) -> Result<(), ComponentDefinitionRegistryError> {
        if self.definitions.contains_key(&target) {
            return Err(ComponentDefinitionRegistryError::DuplicateComponentType(
                target_name.to_string(),
            ));
        }

        let constructors = metadata
            .default_constructor
            .map(|constructor| ConstructorDefinition {
                name: "default".to_string(),
                is_autowired: false,
                parameters: vec![],
                constructor,
            })
            .into_iter()
            .collect_vec();

        self.definitions.insert(
            target,
            ComponentDefinition {
                type_id: target,
                type_name: target_name.to_string(),
                namespace: metadata.namespace.clone(),
                names: metadata.names.clone(),
                constructors,
                fields: metadata.fields.clone(),
                methods: vec![],
                aliases: vec![],
                cast: metadata.cast,
            },
        );

        Ok(())
    }

    fn register_alias(
        &mut self,
        alias_type: TypeId,
        target_type: TypeId,
        alias_name: &str,
        target_name: &str,
        metadata: &ComponentAliasMetadata,
    ) -> Result<(), ComponentDefinitionRegistryError> {
        let definition = self.definitions.get_mut(&target_type).ok_or_else(|| {
            ComponentDefinitionRegistryError::MissingBaseComponent {
                alias_type: alias_name.to_string(),
                target_type: target_name.to_string(),
            }
        })?;

        definition.aliases.retain(|alias| alias.type_id != alias_type);
        definition.aliases.push(AliasDefinition {
            type_id: alias_type,
            type_name: alias_name.to_string(),
            cast: metadata.cast,
        });

        Ok(())
    }

    fn register_members(
        &mut self,
        target: TypeId,
        target_name: &str,
        metadata: &ComponentMembersMetadata,
    ) -> Result<(), ComponentDefinitionRegistryError> {
        let definition = self.definitions.get_mut(&target).ok_or_else(|| {
            ComponentDefinitionRegistryError::MissingMembersComponent(target_name.to_string())
        })?;

        if !self.registered_members.insert(target) {
            return Err(ComponentDefinitionRegistryError::DuplicateComponentMembers(
                target_name.to_string(),
            ));
        }

        let mut constructors = metadata.constructors.clone();
        constructors.append(&mut definition.constructors);

        definition.constructors = constructors;
        definition.methods.extend(metadata.methods.iter().cloned());

        Ok(())
    }

    #[inline]
    fn component_by_type(&self, type_id: TypeId) -> Option<ComponentDefinition> {
        self.definitions.get(&type_id).cloned()
    }

    fn component_by_type_name(&self, type_name: &str) -> Option<ComponentDefinition> {
        self.definitions
            .values()
            .find(|definition| definition.type_name == type_name)
            .cloned()
    }

    #[inline]
    fn all_definitions(&self) -> Vec<ComponentDefinition> {
        self.definitions.values().cloned().collect()
    }
}

#[doc(hidden)]
pub mod internal {
    use crate::component_registry::{
        ComponentAliasMetadata, ComponentMembersMetadata, ComponentMetadata,
    };
    use inventory::collect;
    pub use inventory::submit;
    use std::any::TypeId;

    #[derive(Clone)]
    pub struct TypedComponentDefinition {
        pub target: TypeId,
        pub target_name: &'static str,
        pub metadata: ComponentMetadata,
    }

    pub struct ComponentDefinitionRegisterer {
        pub register: fn() -> TypedComponentDefinition,
    }

    #[derive(Clone)]
    pub struct ComponentAliasDefinition {
        pub alias_type: TypeId,
        pub target_type: TypeId,
        pub alias_name: &'static str,
        pub target_name: &'static str,
        pub metadata: ComponentAliasMetadata,
    }

    pub struct ComponentAliasRegisterer {
        pub register: fn() -> ComponentAliasDefinition,
    }

    #[derive(Clone)]
    pub struct ComponentMembersDefinition {
        pub target: TypeId,
        pub target_name: &'static str,
        pub metadata: ComponentMembersMetadata,
    }

    pub struct ComponentMembersRegisterer {
        pub register: fn() -> ComponentMembersDefinition,
    }

    collect!(ComponentDefinitionRegisterer);
    collect!(ComponentAliasRegisterer);
    collect!(ComponentMembersRegisterer);
}
