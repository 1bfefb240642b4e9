//! Heap cells for counted objects
//!
//! Every object lives in a [`ComCell`]: a header (count plus a per-class
//! vtable) followed by the object itself. Handles point at the header; the
//! vtable recovers the concrete type for negotiation and destruction.

use std::ptr::NonNull;
use tracing::debug;
use crate::activation::ObjectToken;
use crate::types::{iid, Guid};
use super::interface::{Capability, ComClass};
use super::refcount::RefCount;

/// Per-class operations on a type-erased cell
pub(crate) struct ObjectVtable {
    pub(crate) class_name: &'static str,
    query: unsafe fn(NonNull<Header>, &Guid) -> Option<Capability<'static>>,
    destroy: unsafe fn(NonNull<Header>),
}

/// Type-erased prefix of every cell
pub(crate) struct Header {
    pub(crate) refs: RefCount,
    pub(crate) vtable: &'static ObjectVtable,
}

#[repr(C)]
struct ComCell<T> {
    // Must stay first: handles cast between the cell and its header
    header: Header,
    object: T,
    // Dropped after `object`: the live count falls once the object is gone
    token: Option<ObjectToken>,
}

impl<T: ComClass> ComCell<T> {
    const VTABLE: ObjectVtable = ObjectVtable {
        class_name: T::NAME,
        query: query_cell::<T>,
        destroy: destroy_cell::<T>,
    };
}

unsafe fn query_cell<T: ComClass>(header: NonNull<Header>, iid: &Guid) -> Option<Capability<'static>> {
    // SAFETY: `header` was produced by `allocate::<T>` and the cell is alive
    let cell = unsafe { &*header.cast::<ComCell<T>>().as_ptr() };
    cell.object.capability(iid)
}

unsafe fn destroy_cell<T: ComClass>(header: NonNull<Header>) {
    // SAFETY: `header` was produced by `Box::into_raw` in `allocate::<T>` and
    // the caller observed the final release
    let cell = unsafe { Box::from_raw(header.cast::<ComCell<T>>().as_ptr()) };
    debug!("{} destroyed", cell.header.vtable.class_name);
    drop(cell);
}

/// Move an object to the heap with a count of 1
///
/// The returned pointer owns the construction-time reference.
pub(crate) fn allocate<T: ComClass>(object: T, token: Option<ObjectToken>) -> NonNull<Header> {
    let cell = Box::new(ComCell {
        header: Header {
            refs: RefCount::new(),
            vtable: &ComCell::<T>::VTABLE,
        },
        object,
        token,
    });
    debug!("{} created, refs = 1", T::NAME);
    // SAFETY: Box::into_raw never returns null
    unsafe { NonNull::new_unchecked(Box::into_raw(cell)) }.cast()
}

/// Borrow the header of a live cell
///
/// # Safety
/// `cell` must come from [`allocate`] and the object must not be destroyed
/// while the borrow is used.
pub(crate) unsafe fn header<'a>(cell: NonNull<Header>) -> &'a Header {
    unsafe { &*cell.as_ptr() }
}

/// Resolve an interface identity on a live cell
///
/// IUnknown is answered here for every class. A capability whose identity
/// differs from `iid` is rejected. The count is not touched.
///
/// # Safety
/// Same as [`header`]; the returned capability must not be used after the
/// object is destroyed.
pub(crate) unsafe fn resolve(cell: NonNull<Header>, iid: &Guid) -> Option<Capability<'static>> {
    if *iid == iid::IUNKNOWN {
        return Some(Capability::Unknown);
    }
    let vtable = unsafe { header(cell) }.vtable;
    let capability = unsafe { (vtable.query)(cell, iid) }?;
    if capability.iid() != *iid {
        debug!(
            "{}: {} answered for {}, rejecting",
            vtable.class_name,
            capability.name(),
            iid
        );
        return None;
    }
    Some(capability)
}

/// Drop one reference, destroying the object when it was the last
///
/// # Safety
/// The caller must own one reference to `cell` and give it up here.
pub(crate) unsafe fn release(cell: NonNull<Header>) -> u32 {
    let header = unsafe { header(cell) };
    let remaining = header.refs.release();
    if remaining == 0 {
        let destroy = header.vtable.destroy;
        unsafe { destroy(cell) };
    }
    remaining
}
