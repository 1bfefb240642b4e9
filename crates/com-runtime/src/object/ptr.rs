//! Owned interface handles
//!
//! A [`ComPtr<I>`] is one counted reference to an object, viewed through
//! interface `I`. It carries the whole polymorphic contract:
//! - negotiate: [`ComPtr::cast`] (typed) and [`ComPtr::query`] (by identity)
//! - acquire: [`ComPtr::acquire`] / `Clone`
//! - release: [`ComPtr::release`] / `Drop`
//!
//! Releasing consumes the handle, so a reference cannot be released twice
//! or used after it was given up.

use std::fmt;
use std::mem::ManuallyDrop;
use std::ops::Deref;
use std::ptr::NonNull;
use tracing::{debug, trace};
use crate::types::{iid, ComError, Guid, Result};
use super::cell::{self, Header};
use super::interface::{ComClass, Interface, Unknown};

/// One counted reference to an object, viewed as interface `I`
pub struct ComPtr<I: ?Sized + Interface> {
    cell: NonNull<Header>,
    view: NonNull<I>,
    iid: Guid,
}

// SAFETY: interfaces and classes are `Send + Sync`, and the count is atomic
unsafe impl<I: ?Sized + Interface> Send for ComPtr<I> {}
unsafe impl<I: ?Sized + Interface> Sync for ComPtr<I> {}

impl<I: ?Sized + Interface> ComPtr<I> {
    /// Construct an object and return its `I` view as the only reference
    ///
    /// If the class does not implement `I` the object is destroyed before
    /// this returns and no reference escapes.
    pub fn new<T: ComClass>(object: T) -> Result<Self> {
        Self::adopt(cell::allocate(object, None), &I::IID)
    }

    /// Take over the construction-time reference of a fresh cell
    pub(crate) fn adopt(cell: NonNull<Header>, iid: &Guid) -> Result<Self> {
        // SAFETY: we own the only reference to `cell`
        match unsafe { Self::view_of(cell, iid) } {
            Some(view) => Ok(Self { cell, view, iid: *iid }),
            None => {
                let class_name = unsafe { cell::header(cell) }.vtable.class_name;
                debug!("{} does not implement {}, discarding new instance", class_name, iid);
                // SAFETY: gives up the reference we own; nothing else can see it
                unsafe { cell::release(cell) };
                Err(ComError::NoInterface(*iid))
            }
        }
    }

    /// # Safety
    /// `cell` must be alive.
    unsafe fn view_of(cell: NonNull<Header>, iid: &Guid) -> Option<NonNull<I>> {
        let capability = unsafe { cell::resolve(cell, iid) }?;
        I::from_capability(capability).map(NonNull::from)
    }

    fn header(&self) -> &Header {
        // SAFETY: `self` holds a reference, so the cell is alive
        unsafe { cell::header(self.cell) }
    }

    /// Negotiate a typed view of the same object
    ///
    /// Success returns a new reference and increments the count; failure
    /// leaves the count untouched.
    pub fn cast<J: ?Sized + Interface>(&self) -> Result<ComPtr<J>> {
        self.negotiate(&J::IID)
    }

    /// Negotiate an interface by identity, returning a base view
    ///
    /// The returned handle remembers `iid` (see [`ComPtr::interface_id`])
    /// and can be turned into the typed view with
    /// [`ComPtr::into_interface`] without another increment.
    pub fn query(&self, iid: &Guid) -> Result<ComPtr<Unknown>> {
        self.negotiate(iid)
    }

    fn negotiate<J: ?Sized + Interface>(&self, iid: &Guid) -> Result<ComPtr<J>> {
        // SAFETY: `self` keeps the cell alive
        match unsafe { ComPtr::<J>::view_of(self.cell, iid) } {
            Some(view) => {
                let refs = self.header().refs.add_ref();
                trace!("{}: negotiated {} ({}), refs = {}", self.class_name(), J::NAME, iid, refs);
                Ok(ComPtr { cell: self.cell, view, iid: *iid })
            }
            None => {
                debug!("{}: no interface {}", self.class_name(), iid);
                Err(ComError::NoInterface(*iid))
            }
        }
    }

    /// The base view of the same object (always succeeds)
    pub fn to_unknown(&self) -> ComPtr<Unknown> {
        let refs = self.header().refs.add_ref();
        trace!("{}: negotiated IUnknown, refs = {}", self.class_name(), refs);
        ComPtr {
            cell: self.cell,
            view: NonNull::from(&Unknown),
            iid: iid::IUNKNOWN,
        }
    }

    /// Add a reference, returning the new handle and the new count
    pub fn acquire(&self) -> (Self, u32) {
        let refs = self.header().refs.add_ref();
        trace!("{}: acquire, refs = {}", self.class_name(), refs);
        (
            Self {
                cell: self.cell,
                view: self.view,
                iid: self.iid,
            },
            refs,
        )
    }

    /// Give up this reference, returning the new count
    ///
    /// When the count reaches zero the object is destroyed before this
    /// returns, and the result is 0.
    pub fn release(self) -> u32 {
        let this = ManuallyDrop::new(self);
        this.release_ref()
    }

    fn release_ref(&self) -> u32 {
        let class_name = self.class_name();
        // SAFETY: called once per handle, from `release` or `drop`
        let refs = unsafe { cell::release(self.cell) };
        trace!("{}: release, refs = {}", class_name, refs);
        refs
    }

    /// Current count shared by every view of the object
    pub fn ref_count(&self) -> u32 {
        self.header().refs.get()
    }

    /// Interface identity this handle was negotiated for
    pub fn interface_id(&self) -> Guid {
        self.iid
    }

    /// Class name of the underlying object
    pub fn class_name(&self) -> &'static str {
        self.header().vtable.class_name
    }

    /// Whether both handles view the same underlying object
    pub fn is_same_object<J: ?Sized + Interface>(&self, other: &ComPtr<J>) -> bool {
        self.cell == other.cell
    }
}

impl ComPtr<Unknown> {
    /// Re-type this reference as `J` without changing the count
    ///
    /// Returns the handle unchanged if the object does not implement `J`.
    pub fn into_interface<J: ?Sized + Interface>(self) -> std::result::Result<ComPtr<J>, Self> {
        // SAFETY: `self` keeps the cell alive
        match unsafe { ComPtr::<J>::view_of(self.cell, &J::IID) } {
            Some(view) => {
                let this = ManuallyDrop::new(self);
                Ok(ComPtr {
                    cell: this.cell,
                    view,
                    iid: J::IID,
                })
            }
            None => Err(self),
        }
    }
}

impl<I: ?Sized + Interface> Deref for ComPtr<I> {
    type Target = I;

    fn deref(&self) -> &I {
        // SAFETY: the view points into the cell, which `self` keeps alive
        unsafe { self.view.as_ref() }
    }
}

impl<I: ?Sized + Interface> Clone for ComPtr<I> {
    fn clone(&self) -> Self {
        self.acquire().0
    }
}

impl<I: ?Sized + Interface> Drop for ComPtr<I> {
    fn drop(&mut self) {
        self.release_ref();
    }
}

impl<I: ?Sized + Interface> fmt::Debug for ComPtr<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComPtr")
            .field("interface", &I::NAME)
            .field("iid", &self.iid)
            .field("class", &self.class_name())
            .field("refs", &self.ref_count())
            .finish()
    }
}
