//! Calculator component
//!
//! Four integer operations behind `ICalculator`. The object holds no state
//! besides its count, so every operation is a pure function of its inputs.

use tracing::debug;
use crate::object::{Capability, ComClass};
use crate::types::{iid, ComError, Guid, HResult, Result};

/// Four-operation integer calculator
///
/// Every operation writes its result through `result` and reports a status:
/// - `E_POINTER` when `result` is `None`
/// - `DISP_E_DIVBYZERO` for a zero divisor
/// - `DISP_E_OVERFLOW` when the result does not fit in `i32`
///
/// `result` is left untouched on failure.
pub trait ICalculator: Send + Sync {
    fn add(&self, a: i32, b: i32, result: Option<&mut i32>) -> HResult;
    fn subtract(&self, a: i32, b: i32, result: Option<&mut i32>) -> HResult;
    fn multiply(&self, a: i32, b: i32, result: Option<&mut i32>) -> HResult;
    fn divide(&self, a: i32, b: i32, result: Option<&mut i32>) -> HResult;
}

/// Write a computed value to an output location
///
/// The location is checked before computing.
pub(crate) fn store(result: Option<&mut i32>, compute: impl FnOnce() -> Result<i32>) -> HResult {
    let Some(out) = result else {
        return HResult::E_POINTER;
    };
    match compute() {
        Ok(value) => {
            *out = value;
            HResult::S_OK
        }
        Err(e) => e.code(),
    }
}

/// Calculator class (CLSID_Calculator)
#[derive(Debug, Default)]
pub struct Calculator;

impl Calculator {
    /// Create a new calculator
    pub fn new() -> Self {
        Self
    }
}

impl ICalculator for Calculator {
    fn add(&self, a: i32, b: i32, result: Option<&mut i32>) -> HResult {
        store(result, || {
            let sum = a.checked_add(b).ok_or(ComError::Overflow)?;
            debug!("Add: {} + {} = {}", a, b, sum);
            Ok(sum)
        })
    }

    fn subtract(&self, a: i32, b: i32, result: Option<&mut i32>) -> HResult {
        store(result, || {
            let difference = a.checked_sub(b).ok_or(ComError::Overflow)?;
            debug!("Subtract: {} - {} = {}", a, b, difference);
            Ok(difference)
        })
    }

    fn multiply(&self, a: i32, b: i32, result: Option<&mut i32>) -> HResult {
        store(result, || {
            let product = a.checked_mul(b).ok_or(ComError::Overflow)?;
            debug!("Multiply: {} * {} = {}", a, b, product);
            Ok(product)
        })
    }

    fn divide(&self, a: i32, b: i32, result: Option<&mut i32>) -> HResult {
        store(result, || {
            if b == 0 {
                debug!("Divide: {} / {} = ERROR (division by zero)", a, b);
                return Err(ComError::DivideByZero);
            }
            // i32::MIN / -1 is the only other failing case
            let quotient = a.checked_div(b).ok_or(ComError::Overflow)?;
            debug!("Divide: {} / {} = {}", a, b, quotient);
            Ok(quotient)
        })
    }
}

impl ComClass for Calculator {
    const NAME: &'static str = "Calculator";

    fn capability(&self, iid: &Guid) -> Option<Capability<'_>> {
        match *iid {
            iid::ICALCULATOR => Some(Capability::Calculator(self)),
            _ => None,
        }
    }
}
