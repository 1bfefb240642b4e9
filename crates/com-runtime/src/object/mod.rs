//! Counted, interface-polymorphic objects
//!
//! - [`RefCount`]: the atomic count embedded in every object
//! - [`ComClass`]: a concrete class and its negotiation table
//! - [`Interface`] / [`Capability`]: interface tags and typed views
//! - [`ComPtr`]: an owned, counted handle onto one interface

mod cell;
mod interface;
mod ptr;
mod refcount;

pub(crate) use cell::allocate;
pub use interface::{Capability, ComClass, Interface, Unknown};
pub use ptr::ComPtr;
pub use refcount::RefCount;
