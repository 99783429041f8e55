//! Beans - the single instances of components - are kept in a [BeanRegistry] for the whole
//! lifetime of a container.
//!
//! Note: a bean is stored under every [BeanKey] the active resolution strategy assigns to it. When
//! two beans claim the same key, e.g. two components implementing the same trait, the one
//! registered later replaces the earlier one for that key. Since beans are created in
//! fully-qualified type name order, that's the component whose name sorts last.

use crate::component_registry::ComponentDefinition;
use crate::instance_provider::ComponentInstanceAnyPtr;
use derivative::Derivative;
use fxhash::FxHashMap;
use std::any::TypeId;
use tracing::{debug, warn};

/// Key under which a bean can be looked up.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum BeanKey {
    Type(TypeId),
    Name(String),
}

/// A component instance along with its definition.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct Bean {
    #[derivative(Debug = "ignore")]
    pub instance: ComponentInstanceAnyPtr,
    pub definition: ComponentDefinition,
}

/// Mapping from [BeanKey]s to beans. Owns all beans of a container.
#[derive(Default, Debug)]
pub struct BeanRegistry {
    beans: Vec<Bean>,
    keys: FxHashMap<BeanKey, usize>,
}

impl BeanRegistry {
    /// Stores given bean under all given keys, replacing previous mappings for occupied keys.
    pub fn register<I: IntoIterator<Item = BeanKey>>(&mut self, keys: I, bean: Bean) {
        let index = self.beans.len();

        for key in keys {
            if let Some(previous) = self.keys.insert(key.clone(), index) {
                warn!(
                    "Bean {} replaces {} for key {:?}",
                    bean.definition.type_name, self.beans[previous].definition.type_name, key
                );
            } else {
                debug!("Registered bean {} under {:?}", bean.definition.type_name, key);
            }
        }

        self.beans.push(bean);
    }

    /// Returns the bean currently registered under given key.
    #[inline]
    pub fn lookup(&self, key: &BeanKey) -> Option<&Bean> {
        self.keys.get(key).map(|index| &self.beans[*index])
    }

    /// Returns all beans in registration order. Beans replaced for every key are still present.
    #[inline]
    pub fn beans(&self) -> &[Bean] {
        &self.beans
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.beans.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::bean_registry::{Bean, BeanKey, BeanRegistry};
    use crate::component_registry::ComponentDefinition;
    use crate::instance_provider::{ComponentInstanceAnyPtr, ComponentInstancePtr};
    use std::any::{Any, TypeId};

    fn cast(instance: ComponentInstanceAnyPtr) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
        Err(instance)
    }

    fn create_bean<T: 'static>(value: i8) -> Bean {
        Bean {
            instance: ComponentInstancePtr::new(value) as ComponentInstanceAnyPtr,
            definition: ComponentDefinition {
                type_id: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>().to_string(),
                namespace: "app".to_string(),
                names: vec![],
                constructors: vec![],
                fields: vec![],
                methods: vec![],
                aliases: vec![],
                cast,
            },
        }
    }

    #[test]
    fn should_lookup_registered_bean() {
        let mut registry = BeanRegistry::default();
        registry.register(
            [
                BeanKey::Type(TypeId::of::<u8>()),
                BeanKey::Name("first".to_string()),
            ],
            create_bean::<u8>(1),
        );

        let by_type = registry.lookup(&BeanKey::Type(TypeId::of::<u8>())).unwrap();
        let by_name = registry.lookup(&BeanKey::Name("first".to_string())).unwrap();
        assert!(ComponentInstancePtr::ptr_eq(
            &by_type.instance,
            &by_name.instance
        ));
        assert!(registry.lookup(&BeanKey::Type(TypeId::of::<u16>())).is_none());
    }

    #[test]
    fn should_replace_occupied_key() {
        let alias = BeanKey::Type(TypeId::of::<i64>());

        let mut registry = BeanRegistry::default();
        registry.register(
            [BeanKey::Type(TypeId::of::<u8>()), alias.clone()],
            create_bean::<u8>(1),
        );
        registry.register(
            [BeanKey::Type(TypeId::of::<u16>()), alias.clone()],
            create_bean::<u16>(2),
        );

        assert_eq!(
            registry.lookup(&alias).unwrap().definition.type_id,
            TypeId::of::<u16>()
        );
        assert!(registry
            .lookup(&BeanKey::Type(TypeId::of::<u8>()))
            .is_some());
        assert_eq!(registry.len(), 2);
    }
}
