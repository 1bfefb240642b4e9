//! Core runtime types
//!
//! - Identity keys: [`Guid`] for IIDs and CLSIDs
//! - Status codes: [`HResult`]
//! - Errors: [`ComError`]

mod error;
mod identifiers;

pub use error::*;
pub use identifiers::Guid;

/// Well-known interface identifiers
pub mod iid {
    use super::Guid;

    /// IUnknown, the base polymorphic contract every object accepts
    pub const IUNKNOWN: Guid = Guid::from_u128(0x00000000_0000_0000_c000_000000000046);
    /// IClassFactory
    pub const ICLASSFACTORY: Guid = Guid::from_u128(0x00000001_0000_0000_c000_000000000046);
    /// ICalculator (four-operation calculator)
    pub const ICALCULATOR: Guid =
        Guid::from_values(0xAABBCCDD, 0x1234, 0x5678, [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0]);
    /// ISimpleCalculator (add only)
    pub const ISIMPLECALCULATOR: Guid =
        Guid::from_values(0x12345678, 0x1234, 0x5678, [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0]);
}

/// Well-known class identifiers
pub mod clsid {
    use super::Guid;

    /// Calculator component
    pub const CALCULATOR: Guid =
        Guid::from_values(0xDDCCBBAA, 0x4321, 0x8765, [0x21, 0x43, 0x65, 0x87, 0xA9, 0xCB, 0xED, 0x0F]);
    /// SimpleCalculator component
    pub const SIMPLE_CALCULATOR: Guid =
        Guid::from_values(0x87654321, 0x4321, 0x8765, [0x21, 0x43, 0x65, 0x87, 0xA9, 0xCB, 0xED, 0x0F]);
}
