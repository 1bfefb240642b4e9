//! Factory-mediated activation
//!
//! - [`IClassFactory`] / [`ClassFactory`]: construct instances of a class
//! - [`ClassRegistry`]: look up class objects by class identity
//! - [`ModuleState`]: live-object and server-lock counters
//! - [`protocol`]: out-parameter status-code forms of the above

mod factory;
mod module_state;
pub mod protocol;
mod registry;

pub use factory::{ClassFactory, Constructor, IClassFactory};
pub use module_state::{ModuleState, ObjectToken};
pub use registry::{ClassRegistry, FactoryConstructor, FactoryMode};
