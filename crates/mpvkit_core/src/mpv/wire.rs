use std::ffi::{c_char, c_int};

use crate::mpv::sys::{mpv_byte_array, mpv_node, mpv_node_list};
use crate::mpv::{Format, MpvError, Result};

#[cfg(not(target_endian = "little"))]
compile_error!("node cell payloads are read as little-endian addresses");

/// The eight union bytes of one node cell.
///
/// Container and byte-array cells store the address of their header in these
/// bytes; [`Payload::address`] is the only place that turns bytes into an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload([u8; 8]);

impl Payload {
	/// Wrap raw payload bytes.
	pub fn from_bytes(bytes: [u8; 8]) -> Self {
		Self(bytes)
	}

	/// Copy the payload out of a cell.
	pub fn of(cell: &mpv_node) -> Self {
		// Cells built here start from `mpv_node::zeroed`, and libmpv zero-initializes
		// every node it fills, so all eight bytes are initialized even for flags.
		Self(unsafe { cell.u.int64 }.to_le_bytes())
	}

	/// Raw payload bytes.
	pub fn bytes(self) -> [u8; 8] {
		self.0
	}

	/// Payload read as a little-endian address.
	pub fn address(self) -> usize {
		u64::from_le_bytes(self.0) as usize
	}

	/// Payload read as a native `int` flag.
	pub fn as_flag(self) -> bool {
		let mut raw = [0_u8; 4];
		raw.copy_from_slice(&self.0[..4]);
		c_int::from_le_bytes(raw) != 0
	}

	/// Payload read as a signed integer.
	pub fn as_i64(self) -> i64 {
		i64::from_le_bytes(self.0)
	}

	/// Payload read as a float.
	pub fn as_f64(self) -> f64 {
		f64::from_le_bytes(self.0)
	}

	/// Payload read as a string pointer.
	pub(crate) fn as_str_ptr(self) -> *const c_char {
		self.address() as *const c_char
	}

	/// Dereference the payload as a node-list header.
	///
	/// # Safety
	/// A non-zero address must point to a live `mpv_node_list` that outlives `'a`.
	pub(crate) unsafe fn list_header<'a>(self, format: Format) -> Result<&'a mpv_node_list> {
		let ptr = self.address() as *const mpv_node_list;
		// SAFETY: caller guarantees the address, null is rejected here.
		unsafe { ptr.as_ref() }.ok_or(MpvError::NullPointer {
			what: match format {
				Format::NodeMap => "node map header",
				_ => "node array header",
			},
		})
	}

	/// Dereference the payload as a byte-array header.
	///
	/// # Safety
	/// A non-zero address must point to a live `mpv_byte_array` that outlives `'a`.
	pub(crate) unsafe fn byte_array_header<'a>(self) -> Result<&'a mpv_byte_array> {
		let ptr = self.address() as *const mpv_byte_array;
		// SAFETY: caller guarantees the address, null is rejected here.
		unsafe { ptr.as_ref() }.ok_or(MpvError::NullPointer { what: "byte array header" })
	}
}

#[cfg(test)]
mod tests;
