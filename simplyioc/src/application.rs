//! Core application framework functionality.

use crate::config::ApplicationConfig;
use crate::descriptor::{BeanDescriptors, DescriptorError};
use crate::runner::ApplicationRunnerPtr;
use config::ConfigError;
use derive_more::Constructor;
use simplyioc_di::component::Component;
use simplyioc_di::container::{Container, ContainerBuilder};
use simplyioc_di::instance_provider::{
    ComponentInstanceProvider, ErrorPtr, TypedComponentInstanceProvider,
};
use simplyioc_di::resolver::IdentifierResolutionStrategy;
use simplyioc_di::ContainerError;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Error loading configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error("Error creating container: {0}")]
    Container(#[from] ContainerError),
    #[error("Runner error: {0}")]
    RunnerError(ErrorPtr),
}

/// Main entrypoint for the application. Bootstraps the container and runs the
/// [ApplicationRunner](crate::runner::ApplicationRunner).
#[derive(Constructor)]
pub struct Application<CIP: ComponentInstanceProvider = Container> {
    instance_provider: CIP,
}

impl Application<Container> {
    /// Creates an application with configuration loaded from the environment. See
    /// [Application::bootstrap_with_config].
    pub fn bootstrap<Root: Component>() -> Result<Self, ApplicationError> {
        let config = ApplicationConfig::init_from_environment()?;
        Self::bootstrap_with_config::<Root>(&config)
    }

    /// Creates an application with given configuration. Components are discovered by scanning the
    /// namespace of `Root` along with the configured extra namespaces, unless a descriptor file is
    /// configured. In such case, only the beans listed in the descriptor are created and `Root`
    /// is ignored.
    pub fn bootstrap_with_config<Root: Component>(
        config: &ApplicationConfig,
    ) -> Result<Self, ApplicationError> {
        if config.install_tracing_logger {
            install_tracing_logger();
        }

        let builder = ContainerBuilder::new()?.with_cycle_detection(config.detect_cycles);

        let container = if let Some(descriptor_file) = &config.descriptor_file {
            info!("Creating container from bean descriptors: {descriptor_file}");

            let beans = BeanDescriptors::load(descriptor_file)?.declared_beans()?;
            builder
                .with_resolution_strategy(Box::new(IdentifierResolutionStrategy))
                .build_declared(beans)?
        } else {
            builder
                .with_namespaces(&config.extra_namespaces)
                .with_resolution_strategy(config.resolution.strategy())
                .build::<Root>()?
        };

        Ok(Self::new(container))
    }

    #[inline]
    pub fn container(&self) -> &Container {
        &self.instance_provider
    }
}

impl<CIP: ComponentInstanceProvider> Application<CIP> {
    /// Runs the registered runner, if any. An application without a runner only creates its
    /// components.
    pub fn run(&self) -> Result<(), ApplicationError> {
        match self
            .instance_provider
            .primary_instance_typed::<ApplicationRunnerPtr>()
        {
            Some(runner) => {
                info!("Running application runner...");
                runner.run().map_err(ApplicationError::RunnerError)
            }
            None => {
                info!("No application runner registered.");
                Ok(())
            }
        }
    }
}

fn install_tracing_logger() {
    if let Err(error) = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        debug!("Not installing tracing logger: {error}");
    }
}
