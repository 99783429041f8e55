use simplyioc_di::container::Container;

mod dao {
    use simplyioc_di::{component_alias, injectable, Component};

    // this is a trait we would like to use in our component
    #[injectable]
    pub trait DataSource {
        fn data(&self) -> f64;
    }

    // a component providing fixed data
    #[derive(Component)]
    pub struct FixedDataSource;

    // we're telling the container to provide FixedDataSource when asked for dyn DataSource
    #[component_alias]
    impl DataSource for FixedDataSource {
        fn data(&self) -> f64 {
            2.0
        }
    }
}

mod metier {
    use crate::dao::DataSource;
    use simplyioc_di::instance_provider::ComponentInstancePtr;
    use simplyioc_di::{component_impl, Component};

    // this component has no zero-argument constructor, so the autowired one is mandatory
    #[derive(Component)]
    #[component(no_default_constructor)]
    pub struct Calculator {
        data_source: ComponentInstancePtr<dyn DataSource + Send + Sync>,
    }

    #[component_impl]
    impl Calculator {
        // parameters are resolved by type from components created so far; components are
        // created in fully-qualified type name order, so "dao" comes before "metier"
        #[autowired]
        fn new(data_source: ComponentInstancePtr<dyn DataSource + Send + Sync>) -> Self {
            Self { data_source }
        }

        pub fn compute(&self) -> f64 {
            self.data_source.data() * 23.0
        }
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    // the namespace of the root component is always scanned, other ones need to be listed
    let container = Container::new::<metier::Calculator>(&[concat!(module_path!(), "::dao")])
        .expect("error creating container");

    let calculator = container
        .bean::<metier::Calculator>()
        .expect("missing Calculator");

    // prints "46"
    println!("{}", calculator.compute());
}
