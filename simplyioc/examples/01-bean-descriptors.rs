// note: this example assumes you've analyzed the previous one

use simplyioc::application::Application;
use simplyioc::config::ApplicationConfig;
use std::any::type_name;
use std::fs;

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
        // with bean descriptors, the parameter name is the identifier of the bean to inject
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
    // beans are created in document order, so dependencies need to be listed first; normally the
    // document would be a file shipped with the application
    let descriptor = format!(
        r#"{{
            "beans": [
                {{ "id": "data_source", "class": "{}" }},
                {{ "id": "calculator", "class": "{}" }}
            ]
        }}"#,
        type_name::<dao::FixedDataSource>(),
        type_name::<metier::Calculator>(),
    );

    let descriptor_file = std::env::temp_dir().join("simplyioc-beans.json");
    fs::write(&descriptor_file, descriptor).expect("unable to write bean descriptors");

    let mut config = ApplicationConfig::default();
    config.descriptor_file = Some(descriptor_file.to_string_lossy().into_owned());

    // the root component is not used when creating beans from descriptors
    let application = Application::bootstrap_with_config::<metier::Calculator>(&config)
        .expect("unable to create application");

    let calculator = application
        .container()
        .bean_by_name::<metier::Calculator>("calculator")
        .expect("missing calculator");

    // prints "46"
    println!("{}", calculator.compute());
}
