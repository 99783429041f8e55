//! Validation of constructor dependencies before any bean is created.
//!
//! Constructor parameters must be satisfied when a component is created, so they form a directed
//! graph between components. A parameter no component provides can never be satisfied, regardless
//! of creation order, and a cycle in the graph can never be constructed.

use crate::component_registry::ConstructorDefinition;
use crate::error::ContainerError;
use crate::resolver::{BeanDeclaration, ResolutionStrategy};
use fxhash::FxHashMap;

#[derive(Copy, Clone, Eq, PartialEq)]
enum Visit {
    New,
    InProgress,
    Done,
}

/// Graph of constructor dependencies between declared beans. Node indices correspond to
/// declaration indices.
#[derive(Clone, Debug)]
pub struct ConstructorGraph {
    edges: Vec<Vec<usize>>,
}

impl ConstructorGraph {
    /// Builds the graph, using the same key rules as the bean registry. Beans are created in
    /// declaration order and resolve against the registry as populated so far, so a parameter is
    /// linked to the latest provider declared before the dependent bean. When no such provider
    /// exists, the final provider is used, which reveals dependencies on beans created later.
    pub fn build<S: ResolutionStrategy + ?Sized>(
        declarations: &[BeanDeclaration],
        strategy: &S,
    ) -> Result<Self, ContainerError> {
        let mut providers: FxHashMap<_, Vec<usize>> = FxHashMap::default();
        for (index, declaration) in declarations.iter().enumerate() {
            for key in strategy.registration_keys(declaration) {
                providers.entry(key).or_default().push(index);
            }
        }

        let edges = declarations
            .iter()
            .enumerate()
            .map(|(index, declaration)| {
                let constructor = selected_constructor(declaration)?;
                constructor
                    .parameters
                    .iter()
                    .map(|parameter| {
                        providers
                            .get(&strategy.dependency_key(parameter))
                            .and_then(|candidates| {
                                candidates
                                    .iter()
                                    .rev()
                                    .find(|candidate| **candidate < index)
                                    .or_else(|| candidates.last())
                                    .copied()
                            })
                            .ok_or_else(|| ContainerError::MisconfiguredComponent {
                                type_name: declaration.definition.type_name.clone(),
                                reason: format!(
                                    "constructor parameter '{}' of type {} is not provided by any component",
                                    parameter.name, parameter.type_name
                                ),
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { edges })
    }

    /// Returns the indices forming a cycle, starting and ending with the same node, if any.
    pub fn find_cycle(&self) -> Option<Vec<usize>> {
        let mut state = vec![Visit::New; self.edges.len()];
        let mut path = vec![];

        (0..self.edges.len()).find_map(|node| self.visit(node, &mut state, &mut path))
    }

    fn visit(
        &self,
        node: usize,
        state: &mut [Visit],
        path: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        match state[node] {
            Visit::Done => return None,
            Visit::InProgress => {
                let start = path.iter().position(|visited| *visited == node)?;
                let mut cycle = path[start..].to_vec();
                cycle.push(node);
                return Some(cycle);
            }
            Visit::New => {}
        }

        state[node] = Visit::InProgress;
        path.push(node);

        for next in &self.edges[node] {
            if let Some(cycle) = self.visit(*next, state, path) {
                return Some(cycle);
            }
        }

        path.pop();
        state[node] = Visit::Done;
        None
    }
}

/// Returns the constructor which will be used to create given bean, or a
/// [NoUsableConstructor](ContainerError::NoUsableConstructor) error.
pub fn selected_constructor(
    declaration: &BeanDeclaration,
) -> Result<&ConstructorDefinition, ContainerError> {
    declaration
        .definition
        .selected_constructor()
        .ok_or_else(|| {
            ContainerError::NoUsableConstructor(declaration.definition.type_name.clone())
        })
}

#[cfg(test)]
mod tests {
    use crate::component::Injectable;
    use crate::component_registry::{AliasDefinition, ComponentDefinition, ConstructorDefinition};
    use crate::dependency_graph::ConstructorGraph;
    use crate::error::ContainerError;
    use crate::injection::{Dependency, InjectionArguments};
    use crate::instance_provider::ComponentInstanceAnyPtr;
    use crate::resolver::{BeanDeclaration, TypeResolutionStrategy};
    use std::any::{Any, TypeId};

    struct A;
    struct B;
    struct C;
    struct Port;

    impl Injectable for A {}
    impl Injectable for B {}
    impl Injectable for C {}
    impl Injectable for Port {}

    fn cast(instance: ComponentInstanceAnyPtr) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
        Err(instance)
    }

    fn constructor(
        _arguments: InjectionArguments,
    ) -> Result<ComponentInstanceAnyPtr, ContainerError> {
        Err(ContainerError::NoUsableConstructor("".to_string()))
    }

    fn declare<T: 'static>(parameters: Vec<Dependency>) -> BeanDeclaration {
        ComponentDefinition {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>().to_string(),
            namespace: "app".to_string(),
            names: vec![],
            constructors: vec![ConstructorDefinition {
                name: "new".to_string(),
                is_autowired: !parameters.is_empty(),
                parameters,
                constructor,
            }],
            fields: vec![],
            methods: vec![],
            aliases: vec![],
            cast,
        }
        .into()
    }

    fn with_port(mut declaration: BeanDeclaration) -> BeanDeclaration {
        declaration.definition.aliases.push(AliasDefinition {
            type_id: TypeId::of::<Port>(),
            type_name: std::any::type_name::<Port>().to_string(),
            cast,
        });
        declaration
    }

    #[test]
    fn should_accept_acyclic_graph() {
        let declarations = vec![
            declare::<A>(vec![Dependency::of::<B>("b")]),
            declare::<B>(vec![Dependency::of::<C>("c")]),
            declare::<C>(vec![]),
        ];

        let graph = ConstructorGraph::build(&declarations, &TypeResolutionStrategy).unwrap();
        assert!(graph.find_cycle().is_none());
    }

    #[test]
    fn should_find_cycle() {
        let declarations = vec![
            declare::<A>(vec![Dependency::of::<B>("b")]),
            declare::<B>(vec![Dependency::of::<C>("c")]),
            declare::<C>(vec![Dependency::of::<A>("a")]),
        ];

        let graph = ConstructorGraph::build(&declarations, &TypeResolutionStrategy).unwrap();
        assert_eq!(graph.find_cycle().unwrap(), vec![0, 1, 2, 0]);
    }

    #[test]
    fn should_link_to_provider_created_earlier() {
        let declarations = vec![
            with_port(declare::<A>(vec![])),
            declare::<B>(vec![Dependency::of::<Port>("port")]),
            with_port(declare::<C>(vec![Dependency::of::<B>("b")])),
        ];

        let graph = ConstructorGraph::build(&declarations, &TypeResolutionStrategy).unwrap();
        assert!(graph.find_cycle().is_none());
    }

    #[test]
    fn should_link_to_later_provider_without_earlier_one() {
        let declarations = vec![
            declare::<A>(vec![Dependency::of::<Port>("port")]),
            with_port(declare::<B>(vec![Dependency::of::<A>("a")])),
        ];

        let graph = ConstructorGraph::build(&declarations, &TypeResolutionStrategy).unwrap();
        assert_eq!(graph.find_cycle().unwrap(), vec![0, 1, 0]);
    }

    #[test]
    fn should_find_self_dependency() {
        let declarations = vec![declare::<A>(vec![Dependency::of::<A>("a")])];

        let graph = ConstructorGraph::build(&declarations, &TypeResolutionStrategy).unwrap();
        assert_eq!(graph.find_cycle().unwrap(), vec![0, 0]);
    }

    #[test]
    fn should_reject_unprovided_parameter() {
        let declarations = vec![declare::<A>(vec![Dependency::of::<B>("b")])];

        assert!(matches!(
            ConstructorGraph::build(&declarations, &TypeResolutionStrategy).unwrap_err(),
            ContainerError::MisconfiguredComponent { .. }
        ));
    }

    #[test]
    fn should_reject_missing_constructor() {
        let mut declaration = declare::<A>(vec![]);
        declaration.definition.constructors.clear();

        assert!(matches!(
            ConstructorGraph::build(&[declaration], &TypeResolutionStrategy).unwrap_err(),
            ContainerError::NoUsableConstructor(..)
        ));
    }
}
