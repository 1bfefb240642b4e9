//! In-process COM-style object runtime
//!
//! This crate provides reference-counted, interface-polymorphic objects:
//! a caller holds typed views ("interfaces") onto one underlying object,
//! the object manages its own lifetime through an atomic count, and
//! instances are created indirectly through class factories.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ComRuntime (runtime)                     │
//! │  - RuntimeConfig / RuntimeBuilder                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ClassRegistry       │  ClassFactory      │  ModuleState    │
//! │  - CLSID → factory   │  - CreateInstance  │  - live objects │
//! │  - PerLookup/Shared  │  - LockServer      │  - server locks │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ComPtr<I>: negotiate / acquire / release                   │
//! │  Capability (tagged interface views) │ RefCount (atomic)    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Components: Calculator, SimpleCalculator                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Concepts
//!
//! - **IID**: interface identity, the key for negotiation
//! - **CLSID**: class identity, the key for registry lookup
//! - **Negotiate**: ask an object for another view of itself by IID
//! - **Release**: give up a reference; the last one destroys the object
//!
//! # Modules
//!
//! - [`types`]: identities, status codes and errors
//! - [`object`]: counted objects and interface handles
//! - [`activation`]: class factories, registry and module residency
//! - [`components`]: the calculator components

pub mod types;
pub mod object;
pub mod activation;
pub mod components;

mod runtime;

// Re-export main types and the runtime API
pub use types::{clsid, iid, ComError, Guid, HResult, Result};
pub use object::{Capability, ComClass, ComPtr, Interface, RefCount, Unknown};
pub use activation::{ClassFactory, ClassRegistry, FactoryMode, IClassFactory, ModuleState};
pub use components::{Calculator, ICalculator, ISimpleCalculator, SimpleCalculator};
pub use runtime::{ComRuntime, RuntimeBuilder, RuntimeConfig};
