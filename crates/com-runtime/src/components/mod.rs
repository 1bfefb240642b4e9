//! Business-logic components
//!
//! - [`Calculator`]: `ICalculator`, created through a class factory
//! - [`SimpleCalculator`]: `ISimpleCalculator`, also created directly

mod calculator;
mod simple_calculator;

pub use calculator::{Calculator, ICalculator};
pub use simple_calculator::{create_simple_calculator, ISimpleCalculator, SimpleCalculator};

use crate::activation::ClassRegistry;
use crate::types::clsid;

/// Register every component in this module
pub fn register_standard_components(registry: &ClassRegistry) {
    registry.register_class(clsid::CALCULATOR, Calculator::new);
    registry.register_class(clsid::SIMPLE_CALCULATOR, SimpleCalculator::new);
}
