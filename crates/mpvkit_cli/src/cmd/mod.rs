use std::path::PathBuf;
use std::sync::Arc;

use mpvkit::mpv::{Api, Format, LibraryConfig, Mpv, MpvError};

/// Node command execution.
pub mod command;
/// Single property read.
pub mod get;
/// Single property write.
pub mod set;
/// Library version report.
pub mod version;
/// Event stream printer.
pub mod watch;

mod util;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

/// Command-line level failure.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
	/// Failure inside the binding or the native library.
	#[error(transparent)]
	Mpv(#[from] MpvError),
	/// Argument text could not be parsed for the requested format.
	#[error("cannot parse {value:?} as {format}: {reason}")]
	InvalidValue {
		/// Requested format.
		format: Format,
		/// Offending text.
		value: String,
		/// Parser message.
		reason: String,
	},
	/// Unknown log level name.
	#[error("unknown log level {0:?}")]
	LogLevel(String),
	/// JSON rendering failed.
	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

/// CLI result alias.
pub type Result<T> = std::result::Result<T, CliError>;

/// Loaded library and output mode shared by every subcommand.
pub struct Session {
	api: Arc<Api>,
	/// Print JSON instead of plain text.
	pub json: bool,
}

impl Session {
	/// Load libmpv from `lib`, the environment, or the default names.
	pub fn load(lib: Option<PathBuf>, json: bool) -> Result<Self> {
		let mut config = LibraryConfig::from_env();
		if let Some(lib) = lib {
			config = config.with_path(lib);
		}
		Ok(Self::new(Arc::new(Api::load(&config)?), json))
	}

	/// Use an already loaded function table.
	pub fn new(api: Arc<Api>, json: bool) -> Self {
		Self { api, json }
	}

	/// Loaded function table.
	pub fn api(&self) -> &Arc<Api> {
		&self.api
	}

	/// Create and initialize a player core.
	pub fn player(&self) -> Result<Mpv> {
		let mpv = Mpv::create(Arc::clone(&self.api))?;
		mpv.initialize()?;
		tracing::debug!(client = %mpv.client_name(), "player initialized");
		Ok(mpv)
	}
}

/// Format names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatArg {
	/// Plain string.
	String,
	/// On-screen-display string.
	Osd,
	/// Boolean flag.
	Flag,
	/// 64-bit integer.
	Int64,
	/// Floating point.
	Double,
	/// Self-describing node.
	Node,
}

impl From<FormatArg> for Format {
	fn from(value: FormatArg) -> Self {
		match value {
			FormatArg::String => Format::String,
			FormatArg::Osd => Format::OsdString,
			FormatArg::Flag => Format::Flag,
			FormatArg::Int64 => Format::Int64,
			FormatArg::Double => Format::Double,
			FormatArg::Node => Format::Node,
		}
	}
}
