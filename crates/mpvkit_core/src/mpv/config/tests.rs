use std::ffi::OsString;
use std::path::PathBuf;

use crate::mpv::{DEFAULT_LIBRARY_NAMES, LibraryConfig};

#[test]
fn default_requires_api_two() {
	let config = LibraryConfig::default();
	assert_eq!(config.path, None);
	assert_eq!(config.min_api_version, (2, 0));
}

#[test]
fn builders_override_fields() {
	let config = LibraryConfig::default().with_path("/opt/mpv/libmpv.so").with_min_api_version(2, 1);
	assert_eq!(config.path, Some(PathBuf::from("/opt/mpv/libmpv.so")));
	assert_eq!(config.min_api_version, (2, 1));
}

#[test]
fn candidates_put_explicit_paths_first() {
	let config = LibraryConfig::default().with_path("/a/libmpv.so");
	let candidates = config.candidates(Some(OsString::from("/b/libmpv.so")));
	assert_eq!(candidates[0], (PathBuf::from("/a/libmpv.so"), true));
	assert_eq!(candidates[1], (PathBuf::from("/b/libmpv.so"), true));
	assert_eq!(candidates.len(), DEFAULT_LIBRARY_NAMES.len() + 2);
	assert!(candidates[2..].iter().all(|(_, explicit)| !explicit));
}

#[test]
fn empty_or_repeated_env_path_is_skipped() {
	let config = LibraryConfig::default();
	assert_eq!(config.candidates(Some(OsString::new())).len(), DEFAULT_LIBRARY_NAMES.len());

	let config = LibraryConfig::default().with_path("/a/libmpv.so");
	let candidates = config.candidates(Some(OsString::from("/a/libmpv.so")));
	assert_eq!(candidates.len(), DEFAULT_LIBRARY_NAMES.len() + 1);
	assert_eq!(candidates[1], (PathBuf::from(DEFAULT_LIBRARY_NAMES[0]), false));
}
