//! High-level runtime API
//!
//! Owns one module and its class registry, and provides the outer
//! activation surface (`GetClassObject`, `CoCreateInstance`,
//! `DllCanUnloadNow`).

use std::sync::Arc;
use tracing::info;
use crate::activation::{ClassRegistry, FactoryMode, IClassFactory, ModuleState};
use crate::components::register_standard_components;
use crate::object::{ComClass, ComPtr, Interface, Unknown};
use crate::types::{Guid, Result};

/// Runtime configuration
#[derive(Clone, Debug, Default)]
pub struct RuntimeConfig {
    /// Maximum number of live factory-produced objects (`None`: unlimited)
    pub max_live_objects: Option<usize>,
    /// How class objects are produced on lookup
    pub factory_mode: FactoryMode,
}

impl RuntimeConfig {
    /// Create a configuration with the given factory mode
    pub fn new(factory_mode: FactoryMode) -> Self {
        Self {
            max_live_objects: None,
            factory_mode,
        }
    }
}

/// An in-process object runtime
///
/// Holds:
/// - the module residency counters
/// - the class registry
pub struct ComRuntime {
    config: RuntimeConfig,
    module: Arc<ModuleState>,
    registry: ClassRegistry,
}

impl ComRuntime {
    /// Create a runtime with no registered classes
    pub fn new(config: RuntimeConfig) -> Self {
        let module = Arc::new(ModuleState::with_quota(config.max_live_objects));
        let registry = ClassRegistry::new(module.clone(), config.factory_mode);
        info!(
            "Runtime created (factory mode {:?}, quota {:?})",
            config.factory_mode, config.max_live_objects
        );
        Self {
            config,
            module,
            registry,
        }
    }

    /// Start building a runtime
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Create a default runtime with the calculator components registered
    pub fn with_standard_components() -> Self {
        let runtime = Self::new(RuntimeConfig::default());
        register_standard_components(&runtime.registry);
        runtime
    }

    /// Get the configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Get the class registry
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// Get the module residency counters
    pub fn module(&self) -> &Arc<ModuleState> {
        &self.module
    }

    /// Register a class
    pub fn register_class<T, F>(&self, clsid: Guid, constructor: F)
    where
        T: ComClass,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.registry.register_class(clsid, constructor);
    }

    /// Look up the class object for `clsid`, viewed as `iid`
    pub fn get_class_object(&self, clsid: &Guid, iid: &Guid) -> Result<ComPtr<Unknown>> {
        self.registry.resolve_factory(clsid, iid)
    }

    /// Look up the factory for `clsid`
    pub fn class_factory(&self, clsid: &Guid) -> Result<ComPtr<dyn IClassFactory>> {
        self.registry.get_class_object(clsid)
    }

    /// Create one instance of `clsid` viewed as `J`
    pub fn create_instance<J: ?Sized + Interface>(&self, clsid: &Guid) -> Result<ComPtr<J>> {
        self.registry.create_instance(clsid)
    }

    /// Whether no objects are live and no server locks are held
    pub fn can_unload_now(&self) -> bool {
        self.module.can_unload()
    }
}

impl Default for ComRuntime {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

type Registration = Box<dyn FnOnce(&ClassRegistry) + Send>;

/// Builder for [`ComRuntime`]
#[derive(Default)]
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    standard_components: bool,
    registrations: Vec<Registration>,
}

impl RuntimeBuilder {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of live factory-produced objects
    pub fn max_live_objects(mut self, max: usize) -> Self {
        self.config.max_live_objects = Some(max);
        self
    }

    /// Set the factory production mode
    pub fn factory_mode(mut self, mode: FactoryMode) -> Self {
        self.config.factory_mode = mode;
        self
    }

    /// Register the calculator components
    pub fn standard_components(mut self) -> Self {
        self.standard_components = true;
        self
    }

    /// Register a class
    pub fn class<T, F>(mut self, clsid: Guid, constructor: F) -> Self
    where
        T: ComClass,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.registrations
            .push(Box::new(move |registry| registry.register_class(clsid, constructor)));
        self
    }

    /// Build the runtime
    pub fn build(self) -> ComRuntime {
        let runtime = ComRuntime::new(self.config);
        if self.standard_components {
            register_standard_components(runtime.registry());
        }
        for register in self.registrations {
            register(runtime.registry());
        }
        runtime
    }
}
