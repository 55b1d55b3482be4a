use std::ffi::{CStr, CString, c_char, c_void};
use std::ptr::{self, NonNull};

use crate::mpv::sys::mpv_node;
use crate::mpv::{Format, Functions, Result, Value, WireRef, decode};

/// Owned string array in the NULL-terminated `const char**` shape of string commands.
pub struct CStringArray {
	_strings: Vec<CString>,
	ptrs: Vec<*const c_char>,
}

impl CStringArray {
	/// Copy `items` into NUL-terminated buffers.
	pub fn new<I, S>(items: I) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let strings = items.into_iter().map(|item| CString::new(item.as_ref())).collect::<std::result::Result<Vec<_>, _>>()?;
		let mut ptrs: Vec<*const c_char> = strings.iter().map(|item| item.as_ptr()).collect();
		ptrs.push(ptr::null());
		Ok(Self { _strings: strings, ptrs })
	}

	/// Number of strings, not counting the terminator.
	pub fn len(&self) -> usize {
		self.ptrs.len() - 1
	}

	/// Whether the array holds no strings.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Pointer to the first element; the last slot is null.
	///
	/// Native calls take `const char**` but never write through it.
	pub fn as_ptr(&self) -> *mut *const c_char {
		self.ptrs.as_ptr().cast_mut()
	}
}

/// Destination cell for `mpv_get_property` and the command-result calls.
///
/// On drop, releases whatever the native side wrote into it: the string for
/// string tags, the node contents for `Node`, nothing for scalars.
pub struct OutCell<'a> {
	cell: Box<mpv_node>,
	format: Format,
	functions: &'a Functions,
}

impl<'a> OutCell<'a> {
	/// Zeroed destination for a value of `format`.
	pub fn new(format: Format, functions: &'a Functions) -> Self {
		Self {
			cell: Box::new(mpv_node::zeroed()),
			format,
			functions,
		}
	}

	/// Tag the native side is asked to write.
	pub fn format(&self) -> Format {
		self.format
	}

	/// Pointer in the shape the native call expects for [`OutCell::format`].
	pub fn data_ptr(&mut self) -> *mut c_void {
		match self.format {
			Format::Node => ptr::from_mut::<mpv_node>(&mut self.cell).cast(),
			_ => ptr::addr_of_mut!(self.cell.u).cast(),
		}
	}

	/// Copy the written value out.
	///
	/// # Safety
	/// The native call that received [`OutCell::data_ptr`] must have succeeded.
	pub unsafe fn read(&mut self) -> Result<Value> {
		let data = self.data_ptr();
		// SAFETY: the cell holds a value of `format` written by the native side.
		unsafe { decode(WireRef::Indirect(data), self.format) }
	}
}

impl Drop for OutCell<'_> {
	fn drop(&mut self) {
		// SAFETY: the cell is zeroed or filled by the native side; both are valid to release.
		unsafe {
			match self.format {
				Format::String | Format::OsdString => {
					let text = self.cell.u.string;
					if !text.is_null() {
						(self.functions.free)(text.cast());
					}
				}
				Format::Node => (self.functions.free_node_contents)(ptr::from_mut::<mpv_node>(&mut self.cell)),
				_ => {}
			}
		}
	}
}

/// String allocated by the native side, freed with `mpv_free` on drop.
pub struct NativeString<'a> {
	ptr: NonNull<c_char>,
	functions: &'a Functions,
}

impl<'a> NativeString<'a> {
	/// Take ownership of `ptr`; `None` when it is null.
	///
	/// # Safety
	/// `ptr` must be null or a NUL-terminated string allocated by libmpv and not
	/// owned by anything else.
	pub unsafe fn from_raw(ptr: *mut c_char, functions: &'a Functions) -> Option<Self> {
		NonNull::new(ptr).map(|ptr| Self { ptr, functions })
	}

	/// Borrow the bytes.
	pub fn as_c_str(&self) -> &CStr {
		// SAFETY: owned NUL-terminated buffer.
		unsafe { CStr::from_ptr(self.ptr.as_ptr()) }
	}

	/// Copy into an owned string, replacing invalid UTF-8.
	pub fn to_string_lossy(&self) -> String {
		self.as_c_str().to_string_lossy().into_owned()
	}
}

impl Drop for NativeString<'_> {
	fn drop(&mut self) {
		// SAFETY: allocated by libmpv and released only here.
		unsafe { (self.functions.free)(self.ptr.as_ptr().cast()) }
	}
}

#[cfg(test)]
mod tests;
