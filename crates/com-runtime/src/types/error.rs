//! Status codes and error types

use std::fmt;
use thiserror::Error;
use super::Guid;

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, ComError>;

/// 32-bit status code
///
/// The high bit partitions codes into success and failure buckets;
/// callers branch on that partition and use the specific value for
/// diagnostics.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HResult(pub u32);

impl HResult {
    /// Operation successful
    pub const S_OK: Self = Self(0x0000_0000);
    /// Operation successful, returning false
    pub const S_FALSE: Self = Self(0x0000_0001);
    /// Unspecified error
    pub const E_FAIL: Self = Self(0x8000_4005);
    /// Required output location is null
    pub const E_POINTER: Self = Self(0x8000_4003);
    /// No such interface supported
    pub const E_NOINTERFACE: Self = Self(0x8000_4002);
    /// Out of memory
    pub const E_OUTOFMEMORY: Self = Self(0x8007_000E);
    /// Invalid argument
    pub const E_INVALIDARG: Self = Self(0x8007_0057);
    /// Class does not support aggregation
    pub const CLASS_E_NOAGGREGATION: Self = Self(0x8004_0110);
    /// No factory available for the class
    pub const CLASS_E_CLASSNOTAVAILABLE: Self = Self(0x8004_0111);
    /// Division by zero
    pub const DISP_E_DIVBYZERO: Self = Self(0x8002_0012);
    /// Arithmetic result out of range
    pub const DISP_E_OVERFLOW: Self = Self(0x8002_000A);

    /// Success bucket (high bit clear)
    pub const fn is_success(self) -> bool {
        self.0 & 0x8000_0000 == 0
    }

    /// Failure bucket (high bit set)
    pub const fn is_failure(self) -> bool {
        !self.is_success()
    }

    /// Convert into a `Result`
    ///
    /// Codes that name an identity in [`ComError`] (no interface, class not
    /// available) come back as [`ComError::Status`] since the identity is
    /// not carried by the code.
    pub fn ok(self) -> Result<()> {
        if self.is_success() {
            return Ok(());
        }
        Err(match self {
            Self::E_POINTER => ComError::InvalidPointer,
            Self::E_OUTOFMEMORY => ComError::OutOfMemory,
            Self::CLASS_E_NOAGGREGATION => ComError::NoAggregation,
            Self::DISP_E_DIVBYZERO => ComError::DivideByZero,
            Self::DISP_E_OVERFLOW => ComError::Overflow,
            other => ComError::Status(other),
        })
    }

    /// Symbolic name for well-known codes
    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::S_OK => "S_OK",
            Self::S_FALSE => "S_FALSE",
            Self::E_FAIL => "E_FAIL",
            Self::E_POINTER => "E_POINTER",
            Self::E_NOINTERFACE => "E_NOINTERFACE",
            Self::E_OUTOFMEMORY => "E_OUTOFMEMORY",
            Self::E_INVALIDARG => "E_INVALIDARG",
            Self::CLASS_E_NOAGGREGATION => "CLASS_E_NOAGGREGATION",
            Self::CLASS_E_CLASSNOTAVAILABLE => "CLASS_E_CLASSNOTAVAILABLE",
            Self::DISP_E_DIVBYZERO => "DISP_E_DIVBYZERO",
            Self::DISP_E_OVERFLOW => "DISP_E_OVERFLOW",
            _ => return None,
        })
    }
}

impl fmt::Debug for HResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}(0x{:08x})", name, self.0),
            None => write!(f, "HRESULT(0x{:08x})", self.0),
        }
    }
}

impl fmt::Display for HResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl From<Result<()>> for HResult {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => Self::S_OK,
            Err(e) => e.code(),
        }
    }
}

/// Runtime errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComError {
    /// A required output location was not supplied
    #[error("invalid pointer: output location is null")]
    InvalidPointer,

    /// The object does not implement the requested interface
    #[error("no such interface: IID {0}")]
    NoInterface(Guid),

    /// No factory is registered for the class
    #[error("class not available: CLSID {0}")]
    ClassNotAvailable(Guid),

    /// Aggregation was requested but is not supported
    #[error("aggregation not supported")]
    NoAggregation,

    /// Construction could not reserve resources
    #[error("out of memory")]
    OutOfMemory,

    /// Domain error: division by zero
    #[error("division by zero")]
    DivideByZero,

    /// Domain error: result does not fit the output type
    #[error("arithmetic overflow")]
    Overflow,

    /// Any other failure status
    #[error("failure status {0:?}")]
    Status(HResult),
}

impl ComError {
    /// Status code reported for this error
    pub fn code(&self) -> HResult {
        match self {
            Self::InvalidPointer => HResult::E_POINTER,
            Self::NoInterface(_) => HResult::E_NOINTERFACE,
            Self::ClassNotAvailable(_) => HResult::CLASS_E_CLASSNOTAVAILABLE,
            Self::NoAggregation => HResult::CLASS_E_NOAGGREGATION,
            Self::OutOfMemory => HResult::E_OUTOFMEMORY,
            Self::DivideByZero => HResult::DISP_E_DIVBYZERO,
            Self::Overflow => HResult::DISP_E_OVERFLOW,
            Self::Status(code) => *code,
        }
    }

    /// Whether this is a business-logic domain error
    pub fn is_domain_error(&self) -> bool {
        matches!(self, Self::DivideByZero | Self::Overflow)
    }
}

impl From<ComError> for HResult {
    fn from(error: ComError) -> Self {
        error.code()
    }
}
