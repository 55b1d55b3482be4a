use std::ffi::{CStr, c_char, c_int, c_void};
use std::slice;

use crate::mpv::sys::{mpv_byte_array, mpv_node, mpv_node_list};
use crate::mpv::{Format, MpvError, Node, NodeList, NodeMap, Payload, Result, Value};

/// How a native call hands over the data to decode.
#[derive(Debug, Clone, Copy)]
pub enum WireRef {
	/// The eight payload bytes of a cell, read in place.
	Payload(Payload),
	/// Pointer to a cell of the requested format, as written by
	/// `mpv_get_property` or carried by property events.
	Indirect(*const c_void),
}

/// Decode wire data of `format` into an owned host value.
///
/// Every string, list, map, and byte buffer is copied; nothing in the result
/// refers to native memory.
///
/// # Safety
/// `wire` must reference live, well-formed data of `format` for the duration
/// of the call: indirect pointers must point to a cell of that format, and
/// every address reachable from the payload must be valid.
pub unsafe fn decode(wire: WireRef, format: Format) -> Result<Value> {
	if format == Format::None {
		return Ok(Value::None);
	}

	match wire {
		WireRef::Payload(_) if format == Format::Node => Err(MpvError::MalformedWire {
			format,
			reason: "a node cell does not fit in a payload",
		}),
		// SAFETY: forwarded caller contract.
		WireRef::Payload(payload) => unsafe { decode_payload(payload, format) },
		WireRef::Indirect(ptr) if ptr.is_null() => Err(MpvError::NullPointer { what: "data cell" }),
		WireRef::Indirect(ptr) if format == Format::Node => {
			// SAFETY: caller guarantees `ptr` points to an `mpv_node`.
			let node = unsafe { decode_node(&*ptr.cast::<mpv_node>()) }?;
			Ok(Value::Node(Box::new(node)))
		}
		// SAFETY: caller guarantees `ptr` points to a cell of `format`.
		WireRef::Indirect(ptr) => unsafe { decode_payload(read_cell(ptr, format), format) },
	}
}

/// Decode a self-describing cell, driven by the tag embedded in it.
///
/// # Safety
/// Every address reachable from `cell` must be valid for the duration of the call.
pub unsafe fn decode_node(cell: &mpv_node) -> Result<Node> {
	let format = Format::from_raw(cell.format).ok_or(MpvError::UnknownFormat { raw: cell.format })?;
	if format == Format::Node {
		return Err(MpvError::MalformedWire {
			format,
			reason: "cells cannot nest a node tag",
		});
	}

	// SAFETY: forwarded caller contract.
	let data = unsafe { decode_payload(Payload::of(cell), format) }?;
	Node::with_format(data, format)
}

/// Copy a NUL-terminated native string, replacing invalid UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated buffer.
pub(crate) unsafe fn owned_str(ptr: *const c_char) -> Option<String> {
	if ptr.is_null() {
		return None;
	}
	// SAFETY: non-null and NUL-terminated per caller contract.
	Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

unsafe fn read_cell(ptr: *const c_void, format: Format) -> Payload {
	// SAFETY: caller guarantees `ptr` points to a cell of `format`.
	let bits: u64 = unsafe {
		match format {
			Format::Flag => ptr.cast::<c_int>().read() as u32 as u64,
			Format::Int64 => ptr.cast::<i64>().read() as u64,
			Format::Double => ptr.cast::<f64>().read().to_bits(),
			Format::String | Format::OsdString => ptr.cast::<*const c_char>().read() as usize as u64,
			Format::NodeArray | Format::NodeMap => ptr.cast::<*const mpv_node_list>().read() as usize as u64,
			Format::ByteArray => ptr.cast::<*const mpv_byte_array>().read() as usize as u64,
			Format::None | Format::Node => 0,
		}
	};
	Payload::from_bytes(bits.to_le_bytes())
}

unsafe fn decode_payload(payload: Payload, format: Format) -> Result<Value> {
	Ok(match format {
		Format::None => Value::None,
		Format::String | Format::OsdString => {
			// SAFETY: string payloads hold a NUL-terminated buffer address.
			let text = unsafe { owned_str(payload.as_str_ptr()) }.ok_or(MpvError::NullPointer { what: "string payload" })?;
			Value::String(text)
		}
		Format::Flag => Value::Flag(payload.as_flag()),
		Format::Int64 => Value::Int64(payload.as_i64()),
		Format::Double => Value::Double(payload.as_f64()),
		Format::Node => {
			return Err(MpvError::MalformedWire {
				format,
				reason: "a node cell does not fit in a payload",
			});
		}
		Format::NodeArray => {
			// SAFETY: forwarded caller contract.
			let header = unsafe { payload.list_header(format) }?;
			Value::NodeArray(unsafe { decode_list(header) }?)
		}
		Format::NodeMap => {
			// SAFETY: forwarded caller contract.
			let header = unsafe { payload.list_header(format) }?;
			Value::NodeMap(unsafe { decode_map(header) }?)
		}
		Format::ByteArray => {
			// SAFETY: forwarded caller contract.
			let header = unsafe { payload.byte_array_header() }?;
			Value::ByteArray(unsafe { copy_bytes(header) }?)
		}
	})
}

unsafe fn cells<'a>(header: &'a mpv_node_list, format: Format) -> Result<&'a [mpv_node]> {
	let count = usize::try_from(header.num).map_err(|_| MpvError::MalformedWire {
		format,
		reason: "negative element count",
	})?;
	if count == 0 {
		return Ok(&[]);
	}
	if header.values.is_null() {
		return Err(MpvError::MalformedWire {
			format,
			reason: "null values with non-zero count",
		});
	}
	// SAFETY: header describes `count` live cells.
	Ok(unsafe { slice::from_raw_parts(header.values, count) })
}

unsafe fn decode_list(header: &mpv_node_list) -> Result<NodeList> {
	// SAFETY: forwarded caller contract.
	let values = unsafe { cells(header, Format::NodeArray) }?;
	let mut out = Vec::with_capacity(values.len());
	for cell in values {
		out.push(unsafe { decode_node(cell) }?);
	}
	Ok(out)
}

/// Duplicate keys resolve to the last occurrence.
unsafe fn decode_map(header: &mpv_node_list) -> Result<NodeMap> {
	// SAFETY: forwarded caller contract.
	let values = unsafe { cells(header, Format::NodeMap) }?;
	if values.is_empty() {
		return Ok(NodeMap::new());
	}
	if header.keys.is_null() {
		return Err(MpvError::MalformedWire {
			format: Format::NodeMap,
			reason: "null keys with non-zero count",
		});
	}

	// SAFETY: a map header carries one key per value.
	let keys = unsafe { slice::from_raw_parts(header.keys, values.len()) };
	let mut out = NodeMap::new();
	for (key, cell) in keys.iter().zip(values) {
		let key = unsafe { owned_str(*key) }.ok_or(MpvError::NullPointer { what: "node map key" })?;
		out.insert(key, unsafe { decode_node(cell) }?);
	}
	Ok(out)
}

/// Sizes above `i32::MAX` are rejected: the copy path only takes a 32-bit count.
unsafe fn copy_bytes(header: &mpv_byte_array) -> Result<Vec<u8>> {
	if header.size < 0 {
		return Err(MpvError::MalformedWire {
			format: Format::ByteArray,
			reason: "negative size",
		});
	}
	if header.size > i64::from(i32::MAX) {
		return Err(MpvError::ByteArrayTooLarge { size: header.size });
	}
	if header.size == 0 {
		return Ok(Vec::new());
	}
	if header.data.is_null() {
		return Err(MpvError::NullPointer { what: "byte array data" });
	}

	// SAFETY: header describes `size` readable bytes; the range was checked above.
	let bytes = unsafe { slice::from_raw_parts(header.data.cast::<u8>(), header.size as usize) };
	Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests;
