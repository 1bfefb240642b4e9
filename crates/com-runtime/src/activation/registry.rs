//! Class registry
//!
//! Maps class identities to factory constructors. The registry is an
//! ordinary value owned by its runtime; nothing here is global.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use parking_lot::RwLock;
use tracing::{debug, info};
use crate::object::{ComClass, ComPtr, Interface, Unknown};
use crate::types::{ComError, Guid, Result};
use super::factory::{ClassFactory, Constructor, IClassFactory};
use super::module_state::ModuleState;

/// Builds the class object for a registered class
pub type FactoryConstructor =
    Arc<dyn Fn(Guid, &Arc<ModuleState>) -> Result<ComPtr<dyn IClassFactory>> + Send + Sync>;

/// How class objects are produced on lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FactoryMode {
    /// Build a fresh factory for every lookup
    #[default]
    PerLookup,
    /// Build one factory per class and hand out views of it
    Shared,
}

struct ClassEntry {
    name: &'static str,
    constructor: FactoryConstructor,
    shared: Option<ComPtr<dyn IClassFactory>>,
}

/// Registered classes for one module
pub struct ClassRegistry {
    module: Arc<ModuleState>,
    mode: FactoryMode,
    classes: RwLock<HashMap<Guid, ClassEntry>>,
}

impl ClassRegistry {
    /// Create an empty registry whose products count against `module`
    pub fn new(module: Arc<ModuleState>, mode: FactoryMode) -> Self {
        Self {
            module,
            mode,
            classes: RwLock::new(HashMap::new()),
        }
    }

    /// Register a class produced by a [`ClassFactory`] around `constructor`
    pub fn register_class<T, F>(&self, clsid: Guid, constructor: F)
    where
        T: ComClass,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let constructor: Constructor<T> = Arc::new(constructor);
        self.register_factory(clsid, T::NAME, move |clsid, module| {
            ComPtr::new(ClassFactory::new(clsid, module.clone(), constructor.clone()))
        });
    }

    /// Register a class with a custom factory constructor
    ///
    /// Replaces any existing registration for `clsid`.
    pub fn register_factory<F>(&self, clsid: Guid, name: &'static str, constructor: F)
    where
        F: Fn(Guid, &Arc<ModuleState>) -> Result<ComPtr<dyn IClassFactory>> + Send + Sync + 'static,
    {
        let entry = ClassEntry {
            name,
            constructor: Arc::new(constructor),
            shared: None,
        };
        let previous = self.classes.write().insert(clsid, entry);
        if previous.is_some() {
            info!("Replaced class {} ({})", name, clsid);
        } else {
            info!("Registered class {} ({})", name, clsid);
        }
    }

    /// Remove a class, returning whether it was registered
    pub fn unregister_class(&self, clsid: &Guid) -> bool {
        // Drop the entry outside the lock: a cached factory may be destroyed
        let removed = self.classes.write().remove(clsid);
        match removed {
            Some(entry) => {
                info!("Unregistered class {} ({})", entry.name, clsid);
                true
            }
            None => false,
        }
    }

    /// Whether `clsid` is registered
    pub fn contains(&self, clsid: &Guid) -> bool {
        self.classes.read().contains_key(clsid)
    }

    /// Registered class identities, in ascending order
    pub fn classes(&self) -> Vec<Guid> {
        let mut classes: Vec<Guid> = self.classes.read().keys().copied().collect();
        classes.sort();
        classes
    }

    /// Module the registered classes count against
    pub fn module(&self) -> &Arc<ModuleState> {
        &self.module
    }

    /// Factory production mode
    pub fn factory_mode(&self) -> FactoryMode {
        self.mode
    }

    /// Look up the class object for `clsid` and return its `iid` view
    ///
    /// The caller receives exactly one reference to the factory.
    pub fn resolve_factory(&self, clsid: &Guid, iid: &Guid) -> Result<ComPtr<Unknown>> {
        let factory = self.class_object(clsid)?;
        factory.query(iid)
    }

    /// Typed form of [`ClassRegistry::resolve_factory`]
    pub fn get_class_object<J: ?Sized + Interface>(&self, clsid: &Guid) -> Result<ComPtr<J>> {
        self.resolve_factory(clsid, &J::IID)?
            .into_interface::<J>()
            .map_err(|_| ComError::NoInterface(J::IID))
    }

    /// Resolve the factory for `clsid`, create one instance viewed as `J`
    /// and release the factory
    pub fn create_instance<J: ?Sized + Interface>(&self, clsid: &Guid) -> Result<ComPtr<J>> {
        let factory = self.class_object(clsid)?;
        factory.create::<J>()
    }

    fn class_object(&self, clsid: &Guid) -> Result<ComPtr<dyn IClassFactory>> {
        let (name, constructor) = {
            let classes = self.classes.read();
            let entry = classes.get(clsid).ok_or(ComError::ClassNotAvailable(*clsid))?;
            if let Some(shared) = &entry.shared {
                return Ok(shared.clone());
            }
            (entry.name, entry.constructor.clone())
        };

        // The constructor runs without the table lock held
        debug!("Building class object for {} ({})", name, clsid);
        let factory = constructor(*clsid, &self.module)?;

        if self.mode == FactoryMode::Shared {
            let mut classes = self.classes.write();
            let entry = classes
                .get_mut(clsid)
                .ok_or(ComError::ClassNotAvailable(*clsid))?;
            // Keeps the first cached factory if another caller raced us
            return Ok(entry.shared.get_or_insert(factory).clone());
        }
        Ok(factory)
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new(Arc::new(ModuleState::new()), FactoryMode::default())
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("mode", &self.mode)
            .field("classes", &self.classes())
            .field("module", &self.module)
            .finish()
    }
}
