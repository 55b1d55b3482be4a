//! Bookkeeping for memory the fake hands out as if libmpv had allocated it.
//!
//! Tracking is per thread so that tests running in parallel do not see each
//! other's buffers.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::ffi::{CString, c_char};

use mpvkit::mpv::sys::mpv_node;
use mpvkit::mpv::{Encoded, Format};

thread_local! {
	static STRINGS: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
	static NODES: RefCell<HashMap<usize, Encoded>> = RefCell::new(HashMap::new());
	static INVALID_FREES: Cell<usize> = const { Cell::new(0) };
}

/// Buffers handed out by the fake on this thread and not yet released.
pub fn outstanding_allocations() -> usize {
	STRINGS.with_borrow(HashSet::len) + NODES.with_borrow(HashMap::len)
}

/// Release calls on this thread that did not match a live buffer.
pub fn invalid_frees() -> usize {
	INVALID_FREES.get()
}

/// Hand out a string that must be released with `mpv_free`.
pub(crate) fn string(text: &str) -> *mut c_char {
	let raw = CString::new(text.replace('\0', "")).unwrap_or_default().into_raw();
	STRINGS.with_borrow_mut(|strings| strings.insert(raw as usize));
	raw
}

/// Hand out node contents that must be released with `mpv_free_node_contents`.
///
/// Scalar nodes own nothing and are not tracked.
pub(crate) fn node(encoded: Encoded) -> mpv_node {
	let cell = *encoded.node();
	if encoded.allocations() > 0 {
		NODES.with_borrow_mut(|nodes| nodes.insert(payload_key(&cell), encoded));
	}
	cell
}

pub(crate) fn free_string(ptr: *mut c_char) {
	if ptr.is_null() {
		return;
	}
	if STRINGS.with_borrow_mut(|strings| strings.remove(&(ptr as usize))) {
		// SAFETY: produced by `CString::into_raw` in `string`.
		drop(unsafe { CString::from_raw(ptr) });
	} else {
		INVALID_FREES.set(INVALID_FREES.get() + 1);
	}
}

pub(crate) fn free_node(cell: &mut mpv_node) {
	let owns_memory = matches!(
		Format::from_raw(cell.format),
		Some(Format::String | Format::OsdString | Format::NodeArray | Format::NodeMap)
	);
	if owns_memory && NODES.with_borrow_mut(|nodes| nodes.remove(&payload_key(cell))).is_none() {
		INVALID_FREES.set(INVALID_FREES.get() + 1);
	}
	*cell = mpv_node::zeroed();
}

fn payload_key(cell: &mpv_node) -> usize {
	// SAFETY: every payload variant is plain data.
	unsafe { cell.u.int64 as usize }
}
