use simplyioc::application::Application;
use simplyioc::config::ApplicationConfig;

mod dao {
    use simplyioc_di::{component_alias, injectable, Component};

    #[injectable]
    pub trait DataSource {
        fn data(&self) -> f64;
    }

    #[derive(Component)]
    pub struct FixedDataSource;

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

    #[derive(Component)]
    #[component(no_default_constructor)]
    pub struct Calculator {
        data_source: ComponentInstancePtr<dyn DataSource + Send + Sync>,
    }

    #[component_impl]
    impl Calculator {
        #[autowired]
        fn new(data_source: ComponentInstancePtr<dyn DataSource + Send + Sync>) -> Self {
            Self { data_source }
        }

        pub fn compute(&self) -> f64 {
            self.data_source.data() * 23.0
        }
    }
}

mod runner {
    use crate::metier::Calculator;
    use simplyioc::runner::{ApplicationRunner, ErrorPtr};
    use simplyioc_di::instance_provider::ComponentInstancePtr;
    use simplyioc_di::{component_alias, component_impl, Component};

    // this is an application runner, which will run once all components are created; it needs to
    // be registered as ApplicationRunner, so the application can find it
    #[derive(Component)]
    #[component(no_default_constructor)]
    pub struct CalculatorRunner {
        calculator: ComponentInstancePtr<Calculator>,
    }

    #[component_impl]
    impl CalculatorRunner {
        // "runner" sorts after "metier", so the calculator is already there
        #[autowired]
        fn new(calculator: ComponentInstancePtr<Calculator>) -> Self {
            Self { calculator }
        }
    }

    #[component_alias]
    impl ApplicationRunner for CalculatorRunner {
        fn run(&self) -> Result<(), ErrorPtr> {
            println!("{}", self.calculator.compute());
            Ok(())
        }
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    // the same can be achieved with the SIMPLYIOC_EXTRA_NAMESPACES environment variable and
    // Application::bootstrap()
    let mut config = ApplicationConfig::default();
    config.extra_namespaces = vec![
        concat!(module_path!(), "::dao").to_string(),
        concat!(module_path!(), "::metier").to_string(),
    ];

    let application = Application::bootstrap_with_config::<runner::CalculatorRunner>(&config)
        .expect("unable to create application");

    // prints "46"
    application.run().expect("error running application");
}
