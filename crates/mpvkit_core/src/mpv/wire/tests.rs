use std::ptr;

use crate::mpv::sys::{mpv_byte_array, mpv_node, mpv_node_list};
use crate::mpv::{Format, MpvError, Payload};

#[test]
fn address_is_little_endian() {
	let payload = Payload::from_bytes([0x10, 0x32, 0x54, 0x76, 0, 0, 0, 0]);
	assert_eq!(payload.address(), 0x7654_3210);
}

#[test]
fn scalar_reads_share_the_same_bytes() {
	let mut cell = mpv_node::zeroed();
	cell.u.int64 = -5;
	assert_eq!(Payload::of(&cell).as_i64(), -5);

	let mut cell = mpv_node::zeroed();
	cell.u.double_ = 0.25;
	assert_eq!(Payload::of(&cell).as_f64(), 0.25);

	let mut cell = mpv_node::zeroed();
	cell.u.flag = 1;
	assert!(Payload::of(&cell).as_flag());
	assert!(!Payload::of(&mpv_node::zeroed()).as_flag());
}

#[test]
fn list_header_follows_address() {
	let mut values = [mpv_node::zeroed(); 2];
	let header = mpv_node_list {
		num: 2,
		values: values.as_mut_ptr(),
		keys: ptr::null_mut(),
	};
	let mut cell = mpv_node::zeroed();
	cell.u.list = &header as *const mpv_node_list as *mut mpv_node_list;

	let read = unsafe { Payload::of(&cell).list_header(Format::NodeArray) }.expect("header resolves");
	assert_eq!(read.num, 2);
	assert_eq!(read.values, values.as_mut_ptr());
}

#[test]
fn null_headers_are_reported() {
	let payload = Payload::of(&mpv_node::zeroed());
	let err = unsafe { payload.list_header(Format::NodeMap) }.expect_err("null map header");
	assert!(matches!(err, MpvError::NullPointer { what: "node map header" }));

	let err = unsafe { payload.byte_array_header() }.expect_err("null byte array header");
	assert!(matches!(err, MpvError::NullPointer { .. }));
}

#[test]
fn byte_array_header_follows_address() {
	let header = mpv_byte_array {
		data: ptr::null_mut(),
		size: 0,
	};
	let mut cell = mpv_node::zeroed();
	cell.u.ba = &header as *const mpv_byte_array as *mut mpv_byte_array;
	let read = unsafe { Payload::of(&cell).byte_array_header() }.expect("header resolves");
	assert_eq!(read.size, 0);
}
