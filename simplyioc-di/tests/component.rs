#[cfg(feature = "derive")]
mod component_derive_test {
    use simplyioc_di::component_registry::{
        ComponentDefinitionRegistry, StaticComponentDefinitionRegistry,
        TypedComponentDefinitionRegistry,
    };
    use simplyioc_di::injection::Injected;
    use simplyioc_di::instance_provider::ComponentInstancePtr;
    use simplyioc_di::{component_alias, component_impl, injectable, Component};
    use std::any::{type_name, TypeId};

    #[cfg(feature = "threadsafe")]
    type TestTraitPtr = dyn TestTrait + Send + Sync;
    #[cfg(not(feature = "threadsafe"))]
    type TestTraitPtr = dyn TestTrait;

    #[injectable]
    trait TestTrait {}

    #[derive(Component)]
    struct TestDependency;

    #[component_alias]
    impl TestTrait for TestDependency {}

    #[allow(dead_code)]
    #[derive(Component)]
    struct TestFields {
        #[inject]
        dependency: Injected<TestDependency>,
        #[inject(name = "other_dependency")]
        named: Injected<TestTraitPtr>,
        #[component(default)]
        default: i8,
        #[component(default = "dummy_expr")]
        default_expr: i8,
    }

    #[allow(dead_code)]
    #[derive(Component)]
    #[component(names = ["dep2"])]
    struct TestTuple(#[component(default = "dummy_expr")] i8);

    #[derive(Component)]
    #[component(no_default_constructor)]
    struct TestMembers {
        _dependency: ComponentInstancePtr<TestDependency>,
    }

    #[component_impl]
    impl TestMembers {
        #[autowired]
        fn new(dependency: ComponentInstancePtr<TestDependency>) -> Self {
            Self {
                _dependency: dependency,
            }
        }

        #[inject]
        fn set_trait(&self, _trait_dependency: ComponentInstancePtr<TestTraitPtr>) {}
    }

    fn dummy_expr() -> i8 {
        -1
    }

    fn registry() -> StaticComponentDefinitionRegistry {
        StaticComponentDefinitionRegistry::new().unwrap()
    }

    #[test]
    fn should_register_all_components() {
        let registry = registry();

        assert_eq!(registry.all_definitions().len(), 4);
        assert!(registry
            .component_by_type_name(type_name::<TestTuple>())
            .is_some());
    }

    #[test]
    fn should_register_default_names_and_namespace() {
        let definition = registry()
            .component_by_type_typed::<TestDependency>()
            .unwrap();

        assert_eq!(definition.names, vec!["test_dependency"]);
        assert_eq!(definition.namespace, module_path!());
        assert_eq!(definition.type_name, type_name::<TestDependency>());
    }

    #[test]
    fn should_register_explicit_names() {
        let definition = registry().component_by_type_typed::<TestTuple>().unwrap();
        assert_eq!(definition.names, vec!["dep2"]);
    }

    #[test]
    fn should_register_alias() {
        let definition = registry()
            .component_by_type_typed::<TestDependency>()
            .unwrap();

        assert_eq!(definition.aliases.len(), 1);
        assert!(definition.cast_for(TypeId::of::<TestTraitPtr>()).is_some());
        assert!(definition.cast_for(TypeId::of::<TestTuple>()).is_none());
    }

    #[test]
    fn should_register_injected_fields() {
        let definition = registry().component_by_type_typed::<TestFields>().unwrap();

        let fields: Vec<_> = definition
            .fields
            .iter()
            .map(|field| {
                (
                    field.name.as_str(),
                    field.dependency.name.as_str(),
                    field.dependency.type_id,
                )
            })
            .collect();

        assert_eq!(
            fields,
            vec![
                ("dependency", "dependency", TypeId::of::<TestDependency>()),
                ("named", "other_dependency", TypeId::of::<TestTraitPtr>()),
            ]
        );

        let constructor = definition.selected_constructor().unwrap();
        assert!(!constructor.is_autowired);
        assert!(constructor.parameters.is_empty());
    }

    #[test]
    fn should_register_members() {
        let definition = registry().component_by_type_typed::<TestMembers>().unwrap();

        assert_eq!(definition.constructors.len(), 1);

        let constructor = definition.selected_constructor().unwrap();
        assert!(constructor.is_autowired);
        assert_eq!(constructor.name, "new");
        assert_eq!(constructor.parameters.len(), 1);
        assert_eq!(constructor.parameters[0].name, "dependency");
        assert_eq!(
            constructor.parameters[0].type_id,
            TypeId::of::<TestDependency>()
        );

        assert_eq!(definition.methods.len(), 1);
        assert_eq!(definition.methods[0].name, "set_trait");
        assert_eq!(definition.methods[0].parameters[0].name, "_trait_dependency");
        assert_eq!(
            definition.methods[0].parameters[0].type_id,
            TypeId::of::<TestTraitPtr>()
        );
    }
}
