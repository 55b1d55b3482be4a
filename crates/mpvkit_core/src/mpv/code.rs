use std::ffi::c_int;
use std::fmt;

use crate::mpv::{MpvError, Result};

/// Status code returned by native calls and carried by event envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
	/// No error.
	Success,
	/// The event ring buffer is full.
	EventQueueFull,
	/// Memory allocation failed.
	NoMem,
	/// The core is not initialized.
	Uninitialized,
	/// Invalid or unsupported parameter value.
	InvalidParameter,
	/// Option does not exist.
	OptionNotFound,
	/// Option set with an unsupported format.
	OptionFormat,
	/// Option value could not be parsed.
	OptionError,
	/// Property does not exist.
	PropertyNotFound,
	/// Property accessed with an unsupported format.
	PropertyFormat,
	/// Property exists but is unavailable right now.
	PropertyUnavailable,
	/// Getting or setting a property failed.
	PropertyError,
	/// Running a command failed.
	Command,
	/// Loading failed.
	LoadingFailed,
	/// Audio output initialization failed.
	AoInitFailed,
	/// Video output initialization failed.
	VoInitFailed,
	/// No audio or video data to play.
	NothingToPlay,
	/// File format could not be identified.
	UnknownFormat,
	/// System requirements not fulfilled.
	Unsupported,
	/// The native function is a stub.
	NotImplemented,
	/// Unspecified failure.
	Generic,
	/// Code outside the known table.
	Unknown(c_int),
}

impl ErrorCode {
	/// Map a native status integer.
	pub fn from_raw(raw: c_int) -> Self {
		match raw {
			0 => Self::Success,
			-1 => Self::EventQueueFull,
			-2 => Self::NoMem,
			-3 => Self::Uninitialized,
			-4 => Self::InvalidParameter,
			-5 => Self::OptionNotFound,
			-6 => Self::OptionFormat,
			-7 => Self::OptionError,
			-8 => Self::PropertyNotFound,
			-9 => Self::PropertyFormat,
			-10 => Self::PropertyUnavailable,
			-11 => Self::PropertyError,
			-12 => Self::Command,
			-13 => Self::LoadingFailed,
			-14 => Self::AoInitFailed,
			-15 => Self::VoInitFailed,
			-16 => Self::NothingToPlay,
			-17 => Self::UnknownFormat,
			-18 => Self::Unsupported,
			-19 => Self::NotImplemented,
			-20 => Self::Generic,
			other => Self::Unknown(other),
		}
	}

	/// Return the native status integer.
	pub fn as_raw(self) -> c_int {
		match self {
			Self::Success => 0,
			Self::EventQueueFull => -1,
			Self::NoMem => -2,
			Self::Uninitialized => -3,
			Self::InvalidParameter => -4,
			Self::OptionNotFound => -5,
			Self::OptionFormat => -6,
			Self::OptionError => -7,
			Self::PropertyNotFound => -8,
			Self::PropertyFormat => -9,
			Self::PropertyUnavailable => -10,
			Self::PropertyError => -11,
			Self::Command => -12,
			Self::LoadingFailed => -13,
			Self::AoInitFailed => -14,
			Self::VoInitFailed => -15,
			Self::NothingToPlay => -16,
			Self::UnknownFormat => -17,
			Self::Unsupported => -18,
			Self::NotImplemented => -19,
			Self::Generic => -20,
			Self::Unknown(raw) => raw,
		}
	}

	/// Whether this is [`ErrorCode::Success`].
	pub fn is_success(self) -> bool {
		self == Self::Success
	}

	/// Fixed human-readable message.
	pub fn message(self) -> &'static str {
		match self {
			Self::Success => "success",
			Self::EventQueueFull => "event ringbuffer is full and can't receive any events",
			Self::NoMem => "memory allocation failed",
			Self::Uninitialized => "mpv core is not initialized",
			Self::InvalidParameter => "invalid or unsupported parameter value",
			Self::OptionNotFound => "option does not exist",
			Self::OptionFormat => "unsupported format of option",
			Self::OptionError => "provided option value could not be parsed",
			Self::PropertyNotFound => "accessed property does not exist",
			Self::PropertyFormat => "usage of unsupported property format",
			Self::PropertyUnavailable => "property exists, but is currently unavailable",
			Self::PropertyError => "something went wrong when setting or getting a property",
			Self::Command => "something went wrong while running a command",
			Self::LoadingFailed => "something went wrong while loading",
			Self::AoInitFailed => "initialization of audio output failed",
			Self::VoInitFailed => "initialization of video output failed",
			Self::NothingToPlay => "there is no audio or video data to play",
			Self::UnknownFormat => "cannot identify file format",
			Self::Unsupported => "system requirements not fulfilled",
			Self::NotImplemented => "function is not implemented",
			Self::Generic => "unknown error occurred",
			Self::Unknown(_) => "unrecognized error code",
		}
	}

	/// Convert a native status into a result.
	///
	/// Non-negative values are success; several calls return counts or ids.
	pub fn check(raw: c_int) -> Result<c_int> {
		if raw >= 0 {
			return Ok(raw);
		}
		Err(MpvError::Native { code: Self::from_raw(raw) })
	}

	/// `Ok(())` on success, the typed error otherwise.
	pub fn into_result(self) -> Result<()> {
		match self {
			Self::Success => Ok(()),
			code => Err(MpvError::Native { code }),
		}
	}
}

impl fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Unknown(raw) => write!(f, "{} ({raw})", self.message()),
			_ => f.write_str(self.message()),
		}
	}
}
