use std::ffi::{CString, c_char, c_int, c_void};
use std::ptr;

use crate::mpv::sys::{mpv_byte_array, mpv_node, mpv_node_list};
use crate::mpv::{Format, MpvError, Node, Payload, Value, WireRef, decode, decode_node};

fn string_cell(text: &CString) -> mpv_node {
	let mut cell = mpv_node::zeroed();
	cell.u.string = text.as_ptr().cast_mut();
	cell.format = Format::String.as_raw();
	cell
}

fn int_cell(value: i64) -> mpv_node {
	let mut cell = mpv_node::zeroed();
	cell.u.int64 = value;
	cell.format = Format::Int64.as_raw();
	cell
}

#[test]
fn string_reads_through_both_conventions() {
	let text = CString::new("direct").expect("cstring");
	let cell = string_cell(&text);

	let direct = unsafe { decode(WireRef::Payload(Payload::of(&cell)), Format::String) }.expect("direct decode");
	assert_eq!(direct, Value::from("direct"));

	let slot: *const c_char = text.as_ptr();
	let indirect = unsafe { decode(WireRef::Indirect(ptr::from_ref(&slot).cast()), Format::String) }.expect("indirect decode");
	assert_eq!(indirect, Value::from("direct"));
}

#[test]
fn osd_string_decodes_as_text() {
	let text = CString::new("00:00:05").expect("cstring");
	let slot: *const c_char = text.as_ptr();
	let value = unsafe { decode(WireRef::Indirect(ptr::from_ref(&slot).cast()), Format::OsdString) }.expect("osd decode");
	assert_eq!(value, Value::from("00:00:05"));
}

#[test]
fn flag_reads_native_int() {
	let raw: c_int = 1;
	let value = unsafe { decode(WireRef::Indirect(ptr::from_ref(&raw).cast()), Format::Flag) }.expect("flag decode");
	assert_eq!(value, Value::Flag(true));

	let raw: c_int = 0;
	let value = unsafe { decode(WireRef::Indirect(ptr::from_ref(&raw).cast()), Format::Flag) }.expect("flag decode");
	assert_eq!(value, Value::Flag(false));
}

#[test]
fn double_reads_float_width() {
	let raw = 23.976_f64;
	let value = unsafe { decode(WireRef::Indirect(ptr::from_ref(&raw).cast()), Format::Double) }.expect("double decode");
	assert_eq!(value, Value::Double(23.976));

	let cell_bytes = Payload::from_bytes(1.5_f64.to_le_bytes());
	let direct = unsafe { decode(WireRef::Payload(cell_bytes), Format::Double) }.expect("direct double");
	assert_eq!(direct, Value::Double(1.5));
}

#[test]
fn none_never_touches_memory() {
	let garbage = 0xdead_beef_usize as *const c_void;
	let value = unsafe { decode(WireRef::Indirect(garbage), Format::None) }.expect("none decode");
	assert_eq!(value, Value::None);
}

#[test]
fn map_duplicate_keys_keep_last() {
	let key = CString::new("aid").expect("cstring");
	let mut keys = [key.as_ptr().cast_mut(), key.as_ptr().cast_mut()];
	let mut values = [int_cell(1), int_cell(2)];
	let mut header = mpv_node_list {
		num: 2,
		values: values.as_mut_ptr(),
		keys: keys.as_mut_ptr(),
	};
	let mut cell = mpv_node::zeroed();
	cell.u.list = &mut header;
	cell.format = Format::NodeMap.as_raw();

	let node = unsafe { decode_node(&cell) }.expect("map decodes");
	let map = node.data().as_map().expect("map value");
	assert_eq!(map.len(), 1);
	assert_eq!(map["aid"], Node::from(2_i64));
}

#[test]
fn list_decodes_exactly_count_elements() {
	let mut values = [int_cell(7), int_cell(8), int_cell(9)];
	let mut header = mpv_node_list {
		num: 2,
		values: values.as_mut_ptr(),
		keys: ptr::null_mut(),
	};
	let mut cell = mpv_node::zeroed();
	cell.u.list = &mut header;

	let value = unsafe { decode(WireRef::Payload(Payload::of(&cell)), Format::NodeArray) }.expect("list decodes");
	assert_eq!(value, Value::NodeArray(vec![Node::from(7_i64), Node::from(8_i64)]));
}

#[test]
fn empty_list_with_null_values_is_empty() {
	let mut header = mpv_node_list {
		num: 0,
		values: ptr::null_mut(),
		keys: ptr::null_mut(),
	};
	let mut cell = mpv_node::zeroed();
	cell.u.list = &mut header;
	let value = unsafe { decode(WireRef::Payload(Payload::of(&cell)), Format::NodeMap) }.expect("empty map decodes");
	assert_eq!(value, Value::NodeMap(Default::default()));
}

#[test]
fn malformed_lists_are_reported() {
	let mut header = mpv_node_list {
		num: -1,
		values: ptr::null_mut(),
		keys: ptr::null_mut(),
	};
	let mut cell = mpv_node::zeroed();
	cell.u.list = &mut header;
	let err = unsafe { decode(WireRef::Payload(Payload::of(&cell)), Format::NodeArray) }.expect_err("negative count");
	assert!(matches!(err, MpvError::MalformedWire { format: Format::NodeArray, .. }));

	let mut values = [int_cell(1)];
	let mut header = mpv_node_list {
		num: 1,
		values: values.as_mut_ptr(),
		keys: ptr::null_mut(),
	};
	cell.u.list = &mut header;
	let err = unsafe { decode(WireRef::Payload(Payload::of(&cell)), Format::NodeMap) }.expect_err("map without keys");
	assert!(matches!(err, MpvError::MalformedWire { format: Format::NodeMap, .. }));
}

#[test]
fn byte_array_copies_size_bytes() {
	let mut data = *b"hello world";
	let mut header = mpv_byte_array {
		data: data.as_mut_ptr().cast(),
		size: 5,
	};
	let mut cell = mpv_node::zeroed();
	cell.u.ba = &mut header;
	cell.format = Format::ByteArray.as_raw();

	let node = unsafe { decode_node(&cell) }.expect("byte array decodes");
	assert_eq!(node.format(), Format::ByteArray);
	assert_eq!(node.data().as_bytes(), Some(&b"hello"[..]));
	assert_eq!(node.data().as_bytes(), Some(&[0x68, 0x65, 0x6c, 0x6c, 0x6f][..]));
}

#[test]
fn byte_array_over_32_bits_is_rejected() {
	let mut header = mpv_byte_array {
		data: ptr::null_mut(),
		size: i64::from(i32::MAX) + 1,
	};
	let mut cell = mpv_node::zeroed();
	cell.u.ba = &mut header;
	let err = unsafe { decode(WireRef::Payload(Payload::of(&cell)), Format::ByteArray) }.expect_err("too large");
	assert!(matches!(err, MpvError::ByteArrayTooLarge { size } if size == 2_147_483_648));

	// SAFETY: `cell.u.ba` points at `header`, which is still alive.
	unsafe { (*cell.u.ba).size = -4 };
	let err = unsafe { decode(WireRef::Payload(Payload::of(&cell)), Format::ByteArray) }.expect_err("negative");
	assert!(matches!(err, MpvError::MalformedWire { format: Format::ByteArray, .. }));
}

#[test]
fn unknown_and_nested_node_tags_are_rejected() {
	let mut cell = mpv_node::zeroed();
	cell.format = 42;
	let err = unsafe { decode_node(&cell) }.expect_err("unknown tag");
	assert!(matches!(err, MpvError::UnknownFormat { raw: 42 }));

	cell.format = Format::Node.as_raw();
	let err = unsafe { decode_node(&cell) }.expect_err("nested node tag");
	assert!(matches!(err, MpvError::MalformedWire { format: Format::Node, .. }));

	let err = unsafe { decode(WireRef::Payload(Payload::of(&cell)), Format::Node) }.expect_err("node from payload");
	assert!(matches!(err, MpvError::MalformedWire { .. }));
}

#[test]
fn null_indirect_pointer_is_reported() {
	let err = unsafe { decode(WireRef::Indirect(ptr::null()), Format::Int64) }.expect_err("null cell");
	assert!(matches!(err, MpvError::NullPointer { what: "data cell" }));
}

#[test]
fn decoded_shapes_match_tags() {
	let text = CString::new("x").expect("cstring");
	let cells = [string_cell(&text), int_cell(3), mpv_node::zeroed()];
	for cell in &cells {
		let node = unsafe { decode_node(cell) }.expect("cell decodes");
		assert!(node.format().accepts(node.data()), "{:?}", node);
	}
}
