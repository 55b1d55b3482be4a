use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable naming the libmpv shared library to load.
pub const LIBRARY_ENV_VAR: &str = "MPVKIT_LIBMPV";

/// Library names tried, in order, when no path is configured.
pub const DEFAULT_LIBRARY_NAMES: &[&str] = &["libmpv.so.2", "libmpv.so", "libmpv.2.dylib", "libmpv.dylib", "libmpv-2.dll", "mpv-2.dll"];

/// Where to find libmpv and which client API it must speak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
	/// Explicit library path, tried before anything else.
	pub path: Option<PathBuf>,
	/// Lowest acceptable client API version as `(major, minor)`.
	pub min_api_version: (u32, u32),
}

impl Default for LibraryConfig {
	fn default() -> Self {
		Self {
			path: None,
			min_api_version: (2, 0),
		}
	}
}

impl LibraryConfig {
	/// Default configuration with the path taken from [`LIBRARY_ENV_VAR`].
	pub fn from_env() -> Self {
		Self {
			path: env_path(env::var_os(LIBRARY_ENV_VAR)),
			..Self::default()
		}
	}

	/// Use an explicit library path.
	pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.path = Some(path.into());
		self
	}

	/// Require at least this client API version.
	pub fn with_min_api_version(mut self, major: u32, minor: u32) -> Self {
		self.min_api_version = (major, minor);
		self
	}

	/// Candidates in load order, each flagged when it was asked for explicitly.
	pub(crate) fn candidates(&self, env_value: Option<OsString>) -> Vec<(PathBuf, bool)> {
		let mut out: Vec<(PathBuf, bool)> = Vec::new();
		if let Some(path) = &self.path {
			out.push((path.clone(), true));
		}
		if let Some(path) = env_path(env_value)
			&& !out.iter().any(|(seen, _)| *seen == path)
		{
			out.push((path, true));
		}
		out.extend(DEFAULT_LIBRARY_NAMES.iter().map(|name| (PathBuf::from(name), false)));
		out
	}
}

fn env_path(value: Option<OsString>) -> Option<PathBuf> {
	value.filter(|value| !value.is_empty()).map(PathBuf::from)
}

#[cfg(test)]
mod tests;
