//! Runner executing actual application logic.

#[cfg(test)]
use mockall::automock;
use simplyioc_di::injectable;
pub use simplyioc_di::instance_provider::ErrorPtr;

#[cfg(feature = "threadsafe")]
pub type ApplicationRunnerPtr = dyn ApplicationRunner + Send + Sync;

#[cfg(not(feature = "threadsafe"))]
pub type ApplicationRunnerPtr = dyn ApplicationRunner;

/// Runs application logic once the container is ready. The runner is looked up in the container by
/// the [Application](crate::application::Application), so it needs to be a component registered
/// as `ApplicationRunner` via `#[component_alias]`. When several components are registered as
/// runners, the last one created wins.
#[injectable]
#[cfg_attr(test, automock)]
pub trait ApplicationRunner {
    /// Runs any application code.
    fn run(&self) -> Result<(), ErrorPtr>;
}
