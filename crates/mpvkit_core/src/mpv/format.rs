use std::ffi::c_int;
use std::fmt;

use crate::mpv::Value;

/// Wire tag identifying which variant a value or cell occupies.
///
/// The integers are fixed by the native client API and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Format {
	/// Absent value, or a request that expects no data.
	#[default]
	None,
	/// UTF-8 text.
	String,
	/// Text formatted for on-screen display. Request-only, decodes as text.
	OsdString,
	/// Boolean stored as a native `int` holding 0 or 1.
	Flag,
	/// Signed 64-bit integer.
	Int64,
	/// 64-bit float.
	Double,
	/// Self-describing node cell.
	Node,
	/// Ordered node list.
	NodeArray,
	/// String-keyed node map.
	NodeMap,
	/// Raw byte buffer.
	ByteArray,
}

impl Format {
	/// Alias of [`Format::Flag`].
	pub const BOOLEAN: Format = Format::Flag;
	/// Alias of [`Format::Double`].
	pub const FLOAT64: Format = Format::Double;

	/// Map a native tag to a format.
	pub fn from_raw(raw: c_int) -> Option<Self> {
		Some(match raw {
			0 => Self::None,
			1 => Self::String,
			2 => Self::OsdString,
			3 => Self::Flag,
			4 => Self::Int64,
			5 => Self::Double,
			6 => Self::Node,
			7 => Self::NodeArray,
			8 => Self::NodeMap,
			9 => Self::ByteArray,
			_ => return None,
		})
	}

	/// Return the native tag integer.
	pub fn as_raw(self) -> c_int {
		match self {
			Self::None => 0,
			Self::String => 1,
			Self::OsdString => 2,
			Self::Flag => 3,
			Self::Int64 => 4,
			Self::Double => 5,
			Self::Node => 6,
			Self::NodeArray => 7,
			Self::NodeMap => 8,
			Self::ByteArray => 9,
		}
	}

	/// Return the tag a value naturally occupies.
	pub fn of(value: &Value) -> Self {
		match value {
			Value::None => Self::None,
			Value::String(_) => Self::String,
			Value::Flag(_) => Self::Flag,
			Value::Int64(_) => Self::Int64,
			Value::Double(_) => Self::Double,
			Value::Node(_) => Self::Node,
			Value::NodeArray(_) => Self::NodeArray,
			Value::NodeMap(_) => Self::NodeMap,
			Value::ByteArray(_) => Self::ByteArray,
		}
	}

	/// Whether the tag carries nested nodes.
	pub fn is_container(self) -> bool {
		matches!(self, Self::Node | Self::NodeArray | Self::NodeMap)
	}

	/// Whether `value` has the runtime shape this tag requires.
	pub fn accepts(self, value: &Value) -> bool {
		match self {
			Self::String | Self::OsdString => matches!(value, Value::String(_)),
			other => Self::of(value) == other,
		}
	}

	/// Render the tag as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::String => "string",
			Self::OsdString => "osd-string",
			Self::Flag => "flag",
			Self::Int64 => "int64",
			Self::Double => "double",
			Self::Node => "node",
			Self::NodeArray => "node-array",
			Self::NodeMap => "node-map",
			Self::ByteArray => "byte-array",
		}
	}
}

impl fmt::Display for Format {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Verbosity of a log message, and the threshold used when requesting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogLevel {
	/// Disable all messages.
	None,
	/// Critical or aborting errors.
	Fatal,
	/// Simple errors.
	Error,
	/// Possible problems.
	Warn,
	/// Informational messages.
	Info,
	/// Noisy informational messages.
	V,
	/// Very noisy technical information.
	Debug,
	/// Extremely noisy.
	Trace,
}

impl LogLevel {
	/// Every level, quietest first.
	pub const ALL: [LogLevel; 8] = [
		LogLevel::None,
		LogLevel::Fatal,
		LogLevel::Error,
		LogLevel::Warn,
		LogLevel::Info,
		LogLevel::V,
		LogLevel::Debug,
		LogLevel::Trace,
	];

	/// Map a native level onto the band it falls in.
	pub fn from_raw(raw: c_int) -> Self {
		match raw {
			i32::MIN..=0 => Self::None,
			1..=10 => Self::Fatal,
			11..=20 => Self::Error,
			21..=30 => Self::Warn,
			31..=40 => Self::Info,
			41..=50 => Self::V,
			51..=60 => Self::Debug,
			_ => Self::Trace,
		}
	}

	/// Return the native level integer.
	pub fn as_raw(self) -> c_int {
		match self {
			Self::None => 0,
			Self::Fatal => 10,
			Self::Error => 20,
			Self::Warn => 30,
			Self::Info => 40,
			Self::V => 50,
			Self::Debug => 60,
			Self::Trace => 70,
		}
	}

	/// Canonical lowercase name accepted by `mpv_request_log_messages`.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "no",
			Self::Fatal => "fatal",
			Self::Error => "error",
			Self::Warn => "warn",
			Self::Info => "info",
			Self::V => "v",
			Self::Debug => "debug",
			Self::Trace => "trace",
		}
	}

	/// Parse a canonical level name.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|level| level.as_str() == name)
	}
}

impl fmt::Display for LogLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Why playback of a playlist entry ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndFileReason {
	/// End of file reached.
	Eof,
	/// Stopped by a command or a new file load.
	Stop,
	/// The player is quitting.
	Quit,
	/// Playback failed; see the event's error code.
	Error,
	/// The file was a playlist or redirect and got replaced.
	Redirect,
	/// Reason not known to this binding.
	Unknown(c_int),
}

impl EndFileReason {
	/// Map a native reason integer.
	pub fn from_raw(raw: c_int) -> Self {
		match raw {
			0 => Self::Eof,
			2 => Self::Stop,
			3 => Self::Quit,
			4 => Self::Error,
			5 => Self::Redirect,
			other => Self::Unknown(other),
		}
	}

	/// Return the native reason integer.
	pub fn as_raw(self) -> c_int {
		match self {
			Self::Eof => 0,
			Self::Stop => 2,
			Self::Quit => 3,
			Self::Error => 4,
			Self::Redirect => 5,
			Self::Unknown(raw) => raw,
		}
	}

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Eof => "eof",
			Self::Stop => "stop",
			Self::Quit => "quit",
			Self::Error => "error",
			Self::Redirect => "redirect",
			Self::Unknown(_) => "unknown",
		}
	}
}

/// Kind tag of an event envelope.
///
/// Deprecated kinds stay listed so that older emitters still decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventId {
	/// Nothing happened (wait timed out or was woken up).
	None,
	/// The player is shutting down.
	Shutdown,
	/// Log message requested with `request_log_messages`.
	LogMessage,
	/// Reply to an asynchronous property get.
	GetPropertyReply,
	/// Reply to an asynchronous property set.
	SetPropertyReply,
	/// Reply to an asynchronous command.
	CommandReply,
	/// A playlist entry starts loading.
	StartFile,
	/// A playlist entry stopped playing.
	EndFile,
	/// A file was loaded and playback starts.
	FileLoaded,
	/// Deprecated track list change notification.
	TracksChanged,
	/// Deprecated track switch notification.
	TrackSwitched,
	/// Deprecated idle notification.
	Idle,
	/// Deprecated pause notification.
	Pause,
	/// Deprecated unpause notification.
	Unpause,
	/// Deprecated playback tick.
	Tick,
	/// Deprecated script input dispatch.
	ScriptInputDispatch,
	/// Message sent with the `script-message` family of commands.
	ClientMessage,
	/// Video output was reconfigured.
	VideoReconfig,
	/// Audio output was reconfigured.
	AudioReconfig,
	/// Deprecated chapter change notification.
	ChapterChange,
	/// A seek was initiated.
	Seek,
	/// Playback restarted after a seek or load.
	PlaybackRestart,
	/// An observed property changed.
	PropertyChange,
	/// Deprecated metadata update notification.
	MetadataUpdate,
	/// Events were dropped because the queue overflowed.
	QueueOverflow,
	/// A registered hook is running.
	Hook,
	/// Kind not known to this binding.
	Unknown(c_int),
}

impl EventId {
	/// Map a native event id.
	pub fn from_raw(raw: c_int) -> Self {
		match raw {
			0 => Self::None,
			1 => Self::Shutdown,
			2 => Self::LogMessage,
			3 => Self::GetPropertyReply,
			4 => Self::SetPropertyReply,
			5 => Self::CommandReply,
			6 => Self::StartFile,
			7 => Self::EndFile,
			8 => Self::FileLoaded,
			9 => Self::TracksChanged,
			10 => Self::TrackSwitched,
			11 => Self::Idle,
			12 => Self::Pause,
			13 => Self::Unpause,
			14 => Self::Tick,
			15 => Self::ScriptInputDispatch,
			16 => Self::ClientMessage,
			17 => Self::VideoReconfig,
			18 => Self::AudioReconfig,
			19 => Self::ChapterChange,
			20 => Self::Seek,
			21 => Self::PlaybackRestart,
			22 => Self::PropertyChange,
			23 => Self::MetadataUpdate,
			24 => Self::QueueOverflow,
			25 => Self::Hook,
			other => Self::Unknown(other),
		}
	}

	/// Return the native event id.
	pub fn as_raw(self) -> c_int {
		match self {
			Self::None => 0,
			Self::Shutdown => 1,
			Self::LogMessage => 2,
			Self::GetPropertyReply => 3,
			Self::SetPropertyReply => 4,
			Self::CommandReply => 5,
			Self::StartFile => 6,
			Self::EndFile => 7,
			Self::FileLoaded => 8,
			Self::TracksChanged => 9,
			Self::TrackSwitched => 10,
			Self::Idle => 11,
			Self::Pause => 12,
			Self::Unpause => 13,
			Self::Tick => 14,
			Self::ScriptInputDispatch => 15,
			Self::ClientMessage => 16,
			Self::VideoReconfig => 17,
			Self::AudioReconfig => 18,
			Self::ChapterChange => 19,
			Self::Seek => 20,
			Self::PlaybackRestart => 21,
			Self::PropertyChange => 22,
			Self::MetadataUpdate => 23,
			Self::QueueOverflow => 24,
			Self::Hook => 25,
			Self::Unknown(raw) => raw,
		}
	}

	/// Event name as reported by `mpv_event_name`.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Shutdown => "shutdown",
			Self::LogMessage => "log-message",
			Self::GetPropertyReply => "get-property-reply",
			Self::SetPropertyReply => "set-property-reply",
			Self::CommandReply => "command-reply",
			Self::StartFile => "start-file",
			Self::EndFile => "end-file",
			Self::FileLoaded => "file-loaded",
			Self::TracksChanged => "tracks-changed",
			Self::TrackSwitched => "track-switched",
			Self::Idle => "idle",
			Self::Pause => "pause",
			Self::Unpause => "unpause",
			Self::Tick => "tick",
			Self::ScriptInputDispatch => "script-input-dispatch",
			Self::ClientMessage => "client-message",
			Self::VideoReconfig => "video-reconfig",
			Self::AudioReconfig => "audio-reconfig",
			Self::ChapterChange => "chapter-change",
			Self::Seek => "seek",
			Self::PlaybackRestart => "playback-restart",
			Self::PropertyChange => "property-change",
			Self::MetadataUpdate => "metadata-update",
			Self::QueueOverflow => "event-queue-overflow",
			Self::Hook => "hook",
			Self::Unknown(_) => "unknown",
		}
	}

	/// Whether the kind is kept only for older emitters.
	pub fn is_deprecated(self) -> bool {
		matches!(
			self,
			Self::TracksChanged
				| Self::TrackSwitched
				| Self::Idle | Self::Pause
				| Self::Unpause | Self::Tick
				| Self::ScriptInputDispatch
				| Self::ChapterChange
				| Self::MetadataUpdate
		)
	}
}

impl fmt::Display for EventId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests;
