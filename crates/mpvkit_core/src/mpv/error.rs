use std::fmt;

use thiserror::Error;

use crate::mpv::{ErrorCode, Format};

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, MpvError>;

/// Codec direction named by [`MpvError::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	/// Host value to wire cell.
	Encode,
	/// Wire cell to host value.
	Decode,
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Encode => "encode",
			Self::Decode => "decode",
		})
	}
}

/// Errors produced while encoding, decoding, loading, or calling into libmpv.
#[derive(Debug, Error)]
pub enum MpvError {
	/// Native call returned a negative status.
	#[error("mpv: {code}")]
	Native {
		/// Translated status.
		code: ErrorCode,
	},
	/// Value shape does not match the requested tag.
	#[error("format mismatch: {found} value cannot be used as {format}")]
	FormatMismatch {
		/// Requested tag.
		format: Format,
		/// Runtime kind of the offending value.
		found: &'static str,
	},
	/// No codec path exists for this tag and direction.
	#[error("{direction} of {format} is not supported")]
	Unsupported {
		/// Tag involved.
		format: Format,
		/// Direction attempted.
		direction: Direction,
	},
	/// Wire data read outside its documented shape.
	#[error("malformed {format} wire data: {reason}")]
	MalformedWire {
		/// Tag being decoded.
		format: Format,
		/// What was wrong.
		reason: &'static str,
	},
	/// Cell carried a tag outside the known table.
	#[error("unknown wire format tag {raw}")]
	UnknownFormat {
		/// Raw tag integer.
		raw: i32,
	},
	/// Required native pointer was null.
	#[error("null native pointer: {what}")]
	NullPointer {
		/// Which pointer.
		what: &'static str,
	},
	/// Byte array exceeds the 32-bit copy limit.
	#[error("byte array of {size} bytes exceeds the 32-bit copy limit")]
	ByteArrayTooLarge {
		/// Declared native size.
		size: i64,
	},
	/// Host string contains an interior NUL byte.
	#[error("string contains interior nul: {0}")]
	InteriorNul(#[from] std::ffi::NulError),
	/// No candidate library could be opened.
	#[error("libmpv not found (tried: {})", .tried.join(", "))]
	LibraryNotFound {
		/// Every candidate attempted, in order.
		tried: Vec<String>,
	},
	/// Explicitly configured library failed to load.
	#[error("failed to load {path}: {source}")]
	LibraryLoad {
		/// Library path or name.
		path: String,
		/// Loader failure.
		#[source]
		source: libloading::Error,
	},
	/// Loaded library lacks a required symbol.
	#[error("missing symbol {name}: {source}")]
	MissingSymbol {
		/// Symbol name.
		name: &'static str,
		/// Loader failure.
		#[source]
		source: libloading::Error,
	},
	/// Loaded library speaks an older client API.
	#[error("client api version {}.{} is older than required {}.{}", .found.0, .found.1, .required.0, .required.1)]
	ApiVersion {
		/// Reported `(major, minor)`.
		found: (u32, u32),
		/// Configured minimum `(major, minor)`.
		required: (u32, u32),
	},
	/// String getter returned no value.
	#[error("property {name} has no string value")]
	NoStringValue {
		/// Property name.
		name: String,
	},
	/// Native constructor returned null.
	#[error("{what} returned null")]
	CreateFailed {
		/// Constructor name.
		what: &'static str,
	},
}
