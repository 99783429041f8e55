//! Application framework based on [simplyioc_di] dependency injection.
//!
//! Instead of creating and passing services around in `main()`, an application declares its
//! components and lets the container wire them. [Application](application::Application) is the
//! entrypoint: it loads [configuration](config::ApplicationConfig), installs logging, builds the
//! container either by scanning namespaces or from a [bean descriptor](descriptor) document, and
//! finally executes the registered [ApplicationRunner](runner::ApplicationRunner).
//!
//! ### Features
//!
//! * `threadsafe` - use threadsafe pointers and `Send + Sync` trait bounds

pub mod application;
pub mod config;
pub mod descriptor;
pub mod runner;
