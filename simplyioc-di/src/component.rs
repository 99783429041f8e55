//! One of the basic blocks of the container is a [Component]. Components are injectable objects,
//! created once per container, which themselves can depend on other components.
//!
//! ## Registering concrete components
//!
//! Any type which wants to be managed by the container needs to implement `Component` and be
//! present in the registration table. For convenience, both can be automatically derived if the
//! `derive` feature is enabled:
//!
//! ```
//! use simplyioc_di::injection::Injected;
//! use simplyioc_di::instance_provider::ComponentInstancePtr;
//! use simplyioc_di::{component_alias, component_impl, injectable, Component};
//!
//! #[injectable]
//! trait Repository {}
//!
//! #[derive(Component)]
//! struct InMemoryRepository;
//!
//! #[component_alias]
//! impl Repository for InMemoryRepository {}
//!
//! #[derive(Component)]
//! #[component(no_default_constructor)]
//! struct Service {
//!     repository: ComponentInstancePtr<dyn Repository + Send + Sync>,
//!     // late-injected field, set after all beans exist
//!     #[inject]
//!     other: Injected<InMemoryRepository>,
//! }
//!
//! #[component_impl]
//! impl Service {
//!     #[autowired]
//!     fn new(repository: ComponentInstancePtr<dyn Repository + Send + Sync>) -> Self {
//!         Self {
//!             repository,
//!             other: Default::default(),
//!         }
//!     }
//! }
//! ```
//!
//! ### Supported `#[component]` struct configuration
//!
//! * `names = ["name"]` - use given name list as the component identifiers, instead of the
//! auto-generated snake case one; identifiers are used by the identifier resolution strategy
//! * `constructor = "expr"` - call `expr()` as the zero-argument constructor instead of
//! initializing every field with its default
//! * `no_default_constructor` - do not generate a zero-argument constructor; the component must then
//! provide an `#[autowired]` one
//!
//! ### Supported field configuration
//!
//! * `#[inject]` - the field is an injection point of type [Injected](crate::injection::Injected)
//! and gets populated after all components are created
//! * `#[inject(name = "name")]` - as above, with an explicit identifier for identifier resolution
//! * `#[component(default = "expr")]` - call `expr()` for initialization in the zero-argument
//! constructor; `Default::default()` is used otherwise
//!
//! ## Registering component aliases
//!
//! Component aliases are different types which refer to a concrete component type. Usually they
//! are `dyn Traits`, which makes it possible to request an abstract type instead of a concrete
//! one. Each injectable trait should be marked with `#[injectable]` and each implementation
//! registered with `#[component_alias]`. When multiple components implement the same trait, the
//! one created last (in fully-qualified type name order) is the one registered for the trait.
//!
//! ## Constructors and injection methods
//!
//! An inherent `impl` block marked with `#[component_impl]` can declare `#[autowired]`
//! constructors and `#[inject]` methods. The first `#[autowired]` constructor in declaration
//! order is used to create the component, with its parameters resolved while components are still
//! being created. `#[inject]` methods take `&self` and are called once all components exist.
//! Both can return `Result<_, ErrorPtr>` to signal failure. Parameters can be marked with
//! `#[inject(name = "name")]` to request a bean by an explicit identifier.

use crate::instance_provider::{ComponentInstanceAnyPtr, ComponentInstancePtr};

/// Base trait for components managed by the container. Please see the module-level documentation
/// for more information.
pub trait Component: ComponentDowncast<Self> + Sized {}

/// Helper trait for traits implemented by components, thus allowing injection of components based
/// on `dyn Trait` types. The type `C` refers to a concrete component type. Typically automatically
/// derived when using the `#[component_alias]` attribute.
pub trait ComponentDowncast<C: Component>: Injectable {
    fn downcast(
        source: ComponentInstanceAnyPtr,
    ) -> Result<ComponentInstancePtr<Self>, ComponentInstanceAnyPtr>;
}

/// Marker trait for injectable types - components and aliases.
pub trait Injectable: 'static {}
