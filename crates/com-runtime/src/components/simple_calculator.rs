//! Simple calculator component
//!
//! The minimal component: one interface with a single `add` operation,
//! created directly by [`create_simple_calculator`] rather than through a
//! class factory.

use tracing::debug;
use crate::object::{Capability, ComClass, ComPtr, Unknown};
use crate::types::{iid, ComError, Guid, HResult, Result};
use super::calculator::store;

/// Add-only calculator
pub trait ISimpleCalculator: Send + Sync {
    /// Add two integers; same status contract as [`super::ICalculator`]
    fn add(&self, a: i32, b: i32, result: Option<&mut i32>) -> HResult;
}

/// SimpleCalculator class (CLSID_SimpleCalculator)
#[derive(Debug, Default)]
pub struct SimpleCalculator;

impl SimpleCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl ISimpleCalculator for SimpleCalculator {
    fn add(&self, a: i32, b: i32, result: Option<&mut i32>) -> HResult {
        store(result, || {
            let sum = a.checked_add(b).ok_or(ComError::Overflow)?;
            debug!("SimpleCalculator Add: {} + {} = {}", a, b, sum);
            Ok(sum)
        })
    }
}

impl ComClass for SimpleCalculator {
    const NAME: &'static str = "SimpleCalculator";

    fn capability(&self, iid: &Guid) -> Option<Capability<'_>> {
        match *iid {
            iid::ISIMPLECALCULATOR => Some(Capability::SimpleCalculator(self)),
            _ => None,
        }
    }
}

/// Create a simple calculator and return the requested interface
///
/// The caller receives the only reference. Asking for an interface the
/// class does not implement fails with no instance left behind.
pub fn create_simple_calculator(iid: &Guid) -> Result<ComPtr<Unknown>> {
    debug!("creating SimpleCalculator for {}", iid);
    ComPtr::adopt(crate::object::allocate(SimpleCalculator::new(), None), iid)
}
