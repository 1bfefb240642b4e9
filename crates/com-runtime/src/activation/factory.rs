//! Class factories
//!
//! A class factory is itself a counted object exposing `IClassFactory`. It
//! holds no references to the instances it produces.

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use crate::object::{self, Capability, ComClass, ComPtr, Interface, Unknown};
use crate::types::{iid, ComError, Guid, HResult, Result};
use super::module_state::ModuleState;

/// Shared constructor producing fresh instances of a class
pub type Constructor<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Factory contract for one class
pub trait IClassFactory: Send + Sync {
    /// Create an instance and return the `iid` view as its only reference
    ///
    /// `outer` must be `None`: aggregation is not supported.
    fn create_instance(&self, outer: Option<&ComPtr<Unknown>>, iid: &Guid) -> Result<ComPtr<Unknown>>;

    /// Take (`true`) or give up (`false`) a server lock on the module
    fn lock_server(&self, lock: bool) -> HResult;
}

impl ComPtr<dyn IClassFactory> {
    /// Create an instance viewed as `J`
    pub fn create<J: ?Sized + Interface>(&self) -> Result<ComPtr<J>> {
        self.create_instance(None, &J::IID)?
            .into_interface::<J>()
            .map_err(|_| ComError::NoInterface(J::IID))
    }
}

/// Factory producing instances of `T` from a constructor
pub struct ClassFactory<T: ComClass> {
    clsid: Guid,
    module: Arc<ModuleState>,
    constructor: Constructor<T>,
}

impl<T: ComClass> ClassFactory<T> {
    /// Create a factory for `clsid` whose products count against `module`
    pub fn new(clsid: Guid, module: Arc<ModuleState>, constructor: Constructor<T>) -> Self {
        Self {
            clsid,
            module,
            constructor,
        }
    }

    /// Class identity this factory produces
    pub fn clsid(&self) -> Guid {
        self.clsid
    }
}

impl<T: ComClass> IClassFactory for ClassFactory<T> {
    fn create_instance(&self, outer: Option<&ComPtr<Unknown>>, iid: &Guid) -> Result<ComPtr<Unknown>> {
        if outer.is_some() {
            debug!("{} factory: aggregation requested, refusing", T::NAME);
            return Err(ComError::NoAggregation);
        }

        let token = self.module.admit()?;
        let instance = (self.constructor)();
        debug!("{} factory: CreateInstance for {}", T::NAME, iid);
        ComPtr::adopt(object::allocate(instance, Some(token)), iid)
    }

    fn lock_server(&self, lock: bool) -> HResult {
        let locks = if lock { self.module.lock() } else { self.module.unlock() };
        info!(
            "{} factory: LockServer {} (locks = {})",
            T::NAME,
            if lock { "LOCK" } else { "UNLOCK" },
            locks
        );
        HResult::S_OK
    }
}

impl<T: ComClass> ComClass for ClassFactory<T> {
    const NAME: &'static str = "ClassFactory";

    fn capability(&self, iid: &Guid) -> Option<Capability<'_>> {
        match *iid {
            iid::ICLASSFACTORY => Some(Capability::ClassFactory(self)),
            _ => None,
        }
    }
}

impl<T: ComClass> fmt::Debug for ClassFactory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassFactory")
            .field("class", &T::NAME)
            .field("clsid", &self.clsid)
            .finish()
    }
}
