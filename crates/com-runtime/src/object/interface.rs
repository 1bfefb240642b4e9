//! Interface tags and negotiation tables
//!
//! An object exposes its interfaces as [`Capability`] values: a tagged union
//! with one variant per known interface, each carrying a typed reference to
//! the object's implementation of that interface. Negotiation is a lookup
//! from IID to capability; views are extracted by the [`Interface`] impl of
//! the requested view type.

use std::fmt;
use crate::activation::IClassFactory;
use crate::components::{ICalculator, ISimpleCalculator};
use crate::types::{iid, Guid};

/// A typed view onto one interface of an object
#[derive(Clone, Copy)]
pub enum Capability<'a> {
    /// The base contract; carries no methods beyond counting and negotiation
    Unknown,
    /// IClassFactory
    ClassFactory(&'a (dyn IClassFactory + 'static)),
    /// ICalculator
    Calculator(&'a (dyn ICalculator + 'static)),
    /// ISimpleCalculator
    SimpleCalculator(&'a (dyn ISimpleCalculator + 'static)),
}

impl Capability<'_> {
    /// Interface identity of this view
    pub fn iid(&self) -> Guid {
        match self {
            Self::Unknown => iid::IUNKNOWN,
            Self::ClassFactory(_) => iid::ICLASSFACTORY,
            Self::Calculator(_) => iid::ICALCULATOR,
            Self::SimpleCalculator(_) => iid::ISIMPLECALCULATOR,
        }
    }

    /// Interface name of this view
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unknown => Unknown::NAME,
            Self::ClassFactory(_) => "IClassFactory",
            Self::Calculator(_) => "ICalculator",
            Self::SimpleCalculator(_) => "ISimpleCalculator",
        }
    }
}

impl fmt::Debug for Capability<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capability({})", self.name())
    }
}

/// A view type that can be negotiated by identity
///
/// Implemented for the trait objects of every interface (`dyn ICalculator`,
/// `dyn IClassFactory`, ...) and for [`Unknown`].
pub trait Interface: Send + Sync + 'static {
    /// Interface identity
    const IID: Guid;
    /// Interface name, for diagnostics
    const NAME: &'static str;

    /// Extract this view from a capability, if it is the matching variant
    fn from_capability(capability: Capability<'_>) -> Option<&'_ Self>;
}

/// The base view: identity, counting and negotiation only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unknown;

static UNKNOWN: Unknown = Unknown;

impl Interface for Unknown {
    const IID: Guid = iid::IUNKNOWN;
    const NAME: &'static str = "IUnknown";

    // Every interface view is also a base view
    fn from_capability(_capability: Capability<'_>) -> Option<&'_ Self> {
        Some(&UNKNOWN)
    }
}

impl Interface for dyn IClassFactory {
    const IID: Guid = iid::ICLASSFACTORY;
    const NAME: &'static str = "IClassFactory";

    fn from_capability(capability: Capability<'_>) -> Option<&'_ Self> {
        match capability {
            Capability::ClassFactory(factory) => Some(factory),
            _ => None,
        }
    }
}

impl Interface for dyn ICalculator {
    const IID: Guid = iid::ICALCULATOR;
    const NAME: &'static str = "ICalculator";

    fn from_capability(capability: Capability<'_>) -> Option<&'_ Self> {
        match capability {
            Capability::Calculator(calculator) => Some(calculator),
            _ => None,
        }
    }
}

impl Interface for dyn ISimpleCalculator {
    const IID: Guid = iid::ISIMPLECALCULATOR;
    const NAME: &'static str = "ISimpleCalculator";

    fn from_capability(capability: Capability<'_>) -> Option<&'_ Self> {
        match capability {
            Capability::SimpleCalculator(calculator) => Some(calculator),
            _ => None,
        }
    }
}

/// A concrete, counted object
///
/// Implementors declare which interfaces they support by mapping IIDs to
/// capabilities borrowed from `self`. IUnknown is answered by the runtime
/// before this is consulted, so it never needs to be listed.
///
/// Returned capabilities must borrow from `self` (or be `'static`): the
/// runtime keeps them for as long as the object is alive.
pub trait ComClass: Send + Sync + Sized + 'static {
    /// Class name, for diagnostics
    const NAME: &'static str;

    /// Look up the capability for an interface identity
    fn capability(&self, iid: &Guid) -> Option<Capability<'_>>;
}
