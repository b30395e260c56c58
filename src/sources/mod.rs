//! Interpreter registry source implementations.

mod defaults;
mod env;
mod registry_source;

pub use defaults::DefaultsSource;
pub use env::EnvSource;
pub use registry_source::RegistrySource;
