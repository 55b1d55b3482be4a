use std::ffi::CStr;

use crate::mpv::{CStringArray, MpvError};

#[test]
fn string_array_is_null_terminated() {
	let array = CStringArray::new(["loadfile", "a.mkv", "append"]).expect("array builds");
	assert_eq!(array.len(), 3);

	let ptrs = unsafe { std::slice::from_raw_parts(array.as_ptr(), 4) };
	assert!(ptrs[3].is_null());
	let words: Vec<&str> = ptrs[..3]
		.iter()
		.map(|ptr| unsafe { CStr::from_ptr(*ptr) }.to_str().expect("utf-8"))
		.collect();
	assert_eq!(words, ["loadfile", "a.mkv", "append"]);
}

#[test]
fn empty_string_array_is_just_the_terminator() {
	let array = CStringArray::new(Vec::<String>::new()).expect("empty array builds");
	assert!(array.is_empty());
	assert!(unsafe { *array.as_ptr() }.is_null());
}

#[test]
fn interior_nul_is_rejected() {
	let err = CStringArray::new(["ok", "bad\0arg"]).err().expect("nul rejected");
	assert!(matches!(err, MpvError::InteriorNul(_)));
}
