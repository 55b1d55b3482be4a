use crate::mpv::{Api, LibraryConfig, MpvError};

#[test]
fn explicit_path_failure_is_loud() {
	let config = LibraryConfig::default().with_path("/nonexistent/mpvkit/libmpv.so");
	let err = Api::load(&config).err().expect("missing library is an error");
	match err {
		MpvError::LibraryLoad { path, .. } => assert_eq!(path, "/nonexistent/mpvkit/libmpv.so"),
		other => panic!("unexpected error: {other}"),
	}
}
