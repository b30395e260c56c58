//! Session assembly and interpreter resolution.

mod builder;
mod loader;
mod registry;
mod session;

pub use builder::WatchSessionBuilder;
pub use loader::RegistryLoader;
pub use registry::{InterpreterRegistry, ResolvedInterpreter, extension_of, resolve_interpreter};
pub use session::WatchSession;
