use crate::component::Injectable;
use std::any::{Any, TypeId};
use std::error::Error;
#[cfg(not(feature = "threadsafe"))]
use std::rc::{Rc, Weak};
#[cfg(feature = "threadsafe")]
use std::sync::{Arc, Weak};

#[cfg(not(feature = "threadsafe"))]
pub type ComponentInstancePtr<T> = Rc<T>;
#[cfg(feature = "threadsafe")]
pub type ComponentInstancePtr<T> = Arc<T>;

/// Non-owning counterpart of [ComponentInstancePtr].
pub type ComponentInstanceWeakPtr<T> = Weak<T>;

#[cfg(not(feature = "threadsafe"))]
pub type ComponentInstanceAnyPtr = ComponentInstancePtr<dyn Any + 'static>;
#[cfg(feature = "threadsafe")]
pub type ComponentInstanceAnyPtr = ComponentInstancePtr<dyn Any + Send + Sync + 'static>;

#[cfg(not(feature = "threadsafe"))]
pub type ErrorPtr = Rc<dyn Error>;
#[cfg(feature = "threadsafe")]
pub type ErrorPtr = Arc<dyn Error + Send + Sync>;

/// Casts a type-erased component instance into a boxed `ComponentInstancePtr<T>`, where `T` is
/// either the concrete component type or one of its aliases. Returns the original instance if the
/// cast is not possible.
pub type CastFunction =
    fn(instance: ComponentInstanceAnyPtr) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr>;

/// Generic read-only provider for component instances.
pub trait ComponentInstanceProvider {
    /// Returns the instance registered for the given type along with a cast function able to
    /// convert it to `ComponentInstancePtr` of that type.
    fn primary_instance(&self, type_id: TypeId) -> Option<(ComponentInstanceAnyPtr, CastFunction)>;

    /// Returns the instance registered under the given identifier, castable to the given type.
    fn instance_by_name(
        &self,
        name: &str,
        type_id: TypeId,
    ) -> Option<(ComponentInstanceAnyPtr, CastFunction)>;
}

/// Helper trait for [ComponentInstanceProvider] providing strongly-typed access.
pub trait TypedComponentInstanceProvider {
    /// Typesafe version of [ComponentInstanceProvider::primary_instance].
    fn primary_instance_typed<T: Injectable + ?Sized>(&self) -> Option<ComponentInstancePtr<T>>;

    /// Typesafe version of [ComponentInstanceProvider::instance_by_name].
    fn instance_by_name_typed<T: Injectable + ?Sized>(
        &self,
        name: &str,
    ) -> Option<ComponentInstancePtr<T>>;
}

fn cast_instance<T: Injectable + ?Sized>(
    (instance, cast): (ComponentInstanceAnyPtr, CastFunction),
) -> Option<ComponentInstancePtr<T>> {
    cast(instance)
        .ok()
        .and_then(|p| p.downcast::<ComponentInstancePtr<T>>().ok())
        .map(|p| *p)
}

impl<CIP: ComponentInstanceProvider + ?Sized> TypedComponentInstanceProvider for CIP {
    fn primary_instance_typed<T: Injectable + ?Sized>(&self) -> Option<ComponentInstancePtr<T>> {
        self.primary_instance(TypeId::of::<T>())
            .and_then(cast_instance::<T>)
    }

    fn instance_by_name_typed<T: Injectable + ?Sized>(
        &self,
        name: &str,
    ) -> Option<ComponentInstancePtr<T>> {
        self.instance_by_name(name, TypeId::of::<T>())
            .and_then(cast_instance::<T>)
    }
}
