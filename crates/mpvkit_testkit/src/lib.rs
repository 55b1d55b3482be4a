//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

mod alloc;
mod fake;
mod state;

pub use alloc::{invalid_frees, outstanding_allocations};
pub use fake::{FAKE_API_VERSION, fake_api};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}
