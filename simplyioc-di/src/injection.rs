//! Injection points and the plumbing used by generated code to pass resolved dependencies into
//! constructors, fields and methods.

use crate::component::Injectable;
use crate::error::ContainerError;
use crate::instance_provider::{
    ComponentInstanceAnyPtr, ComponentInstancePtr, ComponentInstanceWeakPtr,
};
use std::any::{type_name, Any, TypeId};
#[cfg(not(feature = "threadsafe"))]
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::{Debug, Formatter};
#[cfg(feature = "threadsafe")]
use std::sync::{PoisonError, RwLock};

/// A single value required by a constructor, field or method.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Dependency {
    pub type_id: TypeId,
    /// Fully-qualified name of the requested type.
    pub type_name: String,
    /// Field or parameter identifier. Only consulted when resolving by identifier.
    pub name: String,
}

impl Dependency {
    pub fn of<T: Injectable + ?Sized>(name: &str) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>().to_string(),
            name: name.to_string(),
        }
    }
}

/// Resolved dependencies, in declaration order, each being a boxed `ComponentInstancePtr<T>`.
#[derive(Debug, Default)]
pub struct InjectionArguments {
    values: VecDeque<Box<dyn Any>>,
}

impl InjectionArguments {
    pub fn new(values: Vec<Box<dyn Any>>) -> Self {
        Self {
            values: values.into(),
        }
    }

    /// Takes the next argument, which must be of the requested type.
    pub fn take<T: Injectable + ?Sized>(
        &mut self,
    ) -> Result<ComponentInstancePtr<T>, ContainerError> {
        self.values
            .pop_front()
            .and_then(|value| value.downcast::<ComponentInstancePtr<T>>().ok())
            .map(|value| *value)
            .ok_or_else(|| ContainerError::ArgumentMismatch(type_name::<T>().to_string()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Returns the concrete component behind a type-erased instance.
pub fn downcast_target<T: Injectable>(
    instance: &ComponentInstanceAnyPtr,
) -> Result<&T, ContainerError> {
    (**instance)
        .downcast_ref::<T>()
        .ok_or_else(|| ContainerError::ArgumentMismatch(type_name::<T>().to_string()))
}

/// A component field populated by the container after all components have been created. Holds a
/// non-owning handle - the container owns every bean, so mutually dependent fields do not keep
/// each other alive. [Injected::get] returns `None` before injection or after the container has
/// been dropped.
pub struct Injected<T: ?Sized> {
    #[cfg(feature = "threadsafe")]
    slot: RwLock<Option<ComponentInstanceWeakPtr<T>>>,
    #[cfg(not(feature = "threadsafe"))]
    slot: RefCell<Option<ComponentInstanceWeakPtr<T>>>,
}

impl<T: ?Sized> Injected<T> {
    /// Returns the injected instance.
    pub fn get(&self) -> Option<ComponentInstancePtr<T>> {
        #[cfg(feature = "threadsafe")]
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        #[cfg(not(feature = "threadsafe"))]
        let slot = self.slot.borrow();

        slot.as_ref().and_then(|instance| instance.upgrade())
    }

    /// Replaces the held instance. Usually called by the container, but can be used by `#[inject]`
    /// methods to store their arguments.
    pub fn set(&self, instance: &ComponentInstancePtr<T>) {
        let instance = Some(ComponentInstancePtr::downgrade(instance));

        #[cfg(feature = "threadsafe")]
        {
            *self.slot.write().unwrap_or_else(PoisonError::into_inner) = instance;
        }
        #[cfg(not(feature = "threadsafe"))]
        {
            *self.slot.borrow_mut() = instance;
        }
    }

    #[inline]
    pub fn is_injected(&self) -> bool {
        self.get().is_some()
    }
}

impl<T: ?Sized> Default for Injected<T> {
    fn default() -> Self {
        Self {
            slot: Default::default(),
        }
    }
}

impl<T: ?Sized> Debug for Injected<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injected")
            .field("type", &type_name::<T>())
            .field("injected", &self.is_injected())
            .finish()
    }
}

/// A field type which can receive an injected dependency. Used by generated code to learn the
/// requested type of `#[inject]` fields.
pub trait InjectionSlot {
    type Target: Injectable + ?Sized;

    fn inject(&self, instance: ComponentInstancePtr<Self::Target>);
}

impl<T: Injectable + ?Sized> InjectionSlot for Injected<T> {
    type Target = T;

    #[inline]
    fn inject(&self, instance: ComponentInstancePtr<T>) {
        self.set(&instance);
    }
}

#[cfg(test)]
mod tests {
    use crate::component::Injectable;
    use crate::error::ContainerError;
    use crate::injection::{InjectionArguments, InjectionSlot, Injected};
    use crate::instance_provider::ComponentInstancePtr;
    use std::any::Any;

    #[derive(Debug)]
    struct TestDependency(i8);

    impl Injectable for TestDependency {}

    #[test]
    fn should_take_arguments_in_order() {
        let first = ComponentInstancePtr::new(TestDependency(1));
        let second = ComponentInstancePtr::new(TestDependency(2));

        let mut arguments = InjectionArguments::new(vec![
            Box::new(first) as Box<dyn Any>,
            Box::new(second) as Box<dyn Any>,
        ]);

        assert_eq!(arguments.take::<TestDependency>().unwrap().0, 1);
        assert_eq!(arguments.take::<TestDependency>().unwrap().0, 2);
        assert!(arguments.is_empty());
    }

    #[test]
    fn should_reject_missing_argument() {
        let mut arguments = InjectionArguments::default();
        assert!(matches!(
            arguments.take::<TestDependency>().unwrap_err(),
            ContainerError::ArgumentMismatch(_)
        ));
    }

    #[test]
    fn should_reject_mismatched_argument() {
        let mut arguments = InjectionArguments::new(vec![Box::new(5) as Box<dyn Any>]);
        assert!(matches!(
            arguments.take::<TestDependency>().unwrap_err(),
            ContainerError::ArgumentMismatch(_)
        ));
    }

    #[test]
    fn should_hold_injected_instance_while_alive() {
        let field = Injected::<TestDependency>::default();
        assert!(!field.is_injected());

        let instance = ComponentInstancePtr::new(TestDependency(3));
        field.inject(instance.clone());

        assert!(ComponentInstancePtr::ptr_eq(&field.get().unwrap(), &instance));

        drop(instance);
        assert!(field.get().is_none());
    }
}
