//! Status-code call protocol
//!
//! Out-parameter forms of negotiation, construction and lookup. Each call
//! returns an [`HResult`] and writes its result through `out`:
//! - `out == None`: `E_POINTER`, nothing happens
//! - `*out` already holds a reference: `E_INVALIDARG`, nothing happens
//! - otherwise `*out` is filled only on success
//!
//! A failed call never touches the slot, so it never changes a count.

use tracing::trace;
use crate::object::{ComPtr, Interface, Unknown};
use crate::types::{Guid, HResult, Result};
use super::factory::IClassFactory;
use super::module_state::ModuleState;
use super::registry::ClassRegistry;

type OutPtr<'a> = Option<&'a mut Option<ComPtr<Unknown>>>;

fn complete(out: OutPtr<'_>, call: impl FnOnce() -> Result<ComPtr<Unknown>>) -> HResult {
    let Some(out) = out else {
        return HResult::E_POINTER;
    };
    if out.is_some() {
        trace!("out-parameter slot already occupied");
        return HResult::E_INVALIDARG;
    }
    match call() {
        Ok(ptr) => {
            *out = Some(ptr);
            HResult::S_OK
        }
        Err(e) => {
            trace!("out-parameter call failed: {}", e);
            e.code()
        }
    }
}

/// Negotiate `iid` on `object`
///
/// Returns `S_OK`, `E_NOINTERFACE`, `E_POINTER` or `E_INVALIDARG`.
pub fn query_interface<I: ?Sized + Interface>(object: &ComPtr<I>, iid: &Guid, out: OutPtr<'_>) -> HResult {
    complete(out, || object.query(iid))
}

/// Create an instance through `factory`
///
/// Returns `S_OK`, `E_NOINTERFACE`, `E_OUTOFMEMORY`,
/// `CLASS_E_NOAGGREGATION`, `E_POINTER` or `E_INVALIDARG`.
pub fn create_instance(
    factory: &dyn IClassFactory,
    outer: Option<&ComPtr<Unknown>>,
    iid: &Guid,
    out: OutPtr<'_>,
) -> HResult {
    complete(out, || factory.create_instance(outer, iid))
}

/// Look up the class object for `clsid` and negotiate `iid` on it
///
/// Returns `S_OK`, `CLASS_E_CLASSNOTAVAILABLE`, `E_NOINTERFACE`,
/// `E_POINTER` or `E_INVALIDARG`.
pub fn get_class_object(registry: &ClassRegistry, clsid: &Guid, iid: &Guid, out: OutPtr<'_>) -> HResult {
    complete(out, || registry.resolve_factory(clsid, iid))
}

/// `S_OK` when the module could be unloaded, `S_FALSE` otherwise
pub fn can_unload_now(module: &ModuleState) -> HResult {
    if module.can_unload() {
        HResult::S_OK
    } else {
        HResult::S_FALSE
    }
}
