//! `#[repr(C)]` mirrors of the libmpv client ABI.
//!
//! Names follow `mpv/client.h` so that the layouts can be checked against the header.

#![allow(non_camel_case_types, missing_docs)]

use std::ffi::{c_char, c_double, c_int, c_void};

/// Opaque client handle.
#[repr(C)]
pub struct mpv_handle {
	_private: [u8; 0],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub union mpv_node_u {
	pub string: *mut c_char,
	pub flag: c_int,
	pub int64: i64,
	pub double_: c_double,
	pub list: *mut mpv_node_list,
	pub ba: *mut mpv_byte_array,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct mpv_node {
	pub u: mpv_node_u,
	pub format: c_int,
}

impl mpv_node {
	/// Cell with every payload byte cleared and format `None`.
	pub const fn zeroed() -> Self {
		Self {
			u: mpv_node_u { int64: 0 },
			format: 0,
		}
	}
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct mpv_node_list {
	pub num: c_int,
	pub values: *mut mpv_node,
	pub keys: *mut *mut c_char,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct mpv_byte_array {
	pub data: *mut c_void,
	pub size: i64,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct mpv_event {
	pub event_id: c_int,
	pub error: c_int,
	pub reply_userdata: u64,
	pub data: *mut c_void,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct mpv_event_property {
	pub name: *const c_char,
	pub format: c_int,
	pub data: *mut c_void,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct mpv_event_log_message {
	pub prefix: *const c_char,
	pub level: *const c_char,
	pub text: *const c_char,
	pub log_level: c_int,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct mpv_event_client_message {
	pub num_args: c_int,
	pub args: *mut *const c_char,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct mpv_event_start_file {
	pub playlist_entry_id: i64,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct mpv_event_end_file {
	pub reason: c_int,
	pub error: c_int,
	pub playlist_entry_id: i64,
	pub playlist_insert_id: i64,
	pub playlist_insert_num_entries: c_int,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct mpv_event_hook {
	pub name: *const c_char,
	pub id: u64,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct mpv_event_command {
	pub result: mpv_node,
}
