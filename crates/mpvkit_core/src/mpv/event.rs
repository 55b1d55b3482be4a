use std::ffi::c_void;
use std::slice;

use crate::mpv::decode::owned_str;
use crate::mpv::sys::{
	mpv_event, mpv_event_client_message, mpv_event_command, mpv_event_end_file, mpv_event_hook, mpv_event_log_message, mpv_event_property,
	mpv_event_start_file,
};
use crate::mpv::{EndFileReason, ErrorCode, EventId, Format, LogLevel, MpvError, Node, Result, Value, WireRef, decode, decode_node};

/// Decoded event envelope. Owns everything it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
	/// Userdata passed to the request that produced this event, or 0.
	pub reply_userdata: u64,
	/// Status attached to the event.
	pub error: ErrorCode,
	/// Kind tag.
	pub id: EventId,
	/// Kind-specific data.
	pub payload: EventPayload,
}

impl Event {
	/// Whether the wait returned without an event.
	pub fn is_none(&self) -> bool {
		self.id == EventId::None
	}

	/// The attached status as a result.
	pub fn result(&self) -> Result<()> {
		self.error.into_result()
	}

	/// Property data carried by property-change and get-property-reply events.
	pub fn property(&self) -> Option<&PropertyEvent> {
		match &self.payload {
			EventPayload::Property(property) => Some(property),
			_ => None,
		}
	}
}

/// Kind-specific data of an [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
	/// No data, or data this binding does not decode.
	Empty,
	/// Property change or asynchronous get reply.
	Property(PropertyEvent),
	/// Log line.
	LogMessage(LogMessageEvent),
	/// Arguments of a `script-message` sent to this client.
	ClientMessage(Vec<String>),
	/// Playlist entry starts loading.
	StartFile(StartFileEvent),
	/// Playlist entry stopped.
	EndFile(EndFileEvent),
	/// Hook invocation that must be continued.
	Hook(HookEvent),
	/// Result node of an asynchronous command.
	CommandReply(Node),
}

/// Property name together with its decoded value.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyEvent {
	/// Property name.
	pub name: String,
	/// Tag the value was delivered in.
	pub format: Format,
	/// Decoded value; [`Value::None`] when the property is unavailable.
	pub value: Value,
}

/// One log line from the player core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessageEvent {
	/// Module prefix, e.g. `cplayer`.
	pub prefix: String,
	/// Message text, usually ending in a newline.
	pub text: String,
	/// Message level.
	pub level: LogLevel,
}

impl LogMessageEvent {
	/// Forward this line to `tracing` at the matching level.
	pub fn emit(&self) {
		let text = self.text.trim_end();
		match self.level {
			LogLevel::None => {}
			LogLevel::Fatal | LogLevel::Error => tracing::error!(prefix = %self.prefix, "{text}"),
			LogLevel::Warn => tracing::warn!(prefix = %self.prefix, "{text}"),
			LogLevel::Info => tracing::info!(prefix = %self.prefix, "{text}"),
			LogLevel::V | LogLevel::Debug => tracing::debug!(prefix = %self.prefix, "{text}"),
			LogLevel::Trace => tracing::trace!(prefix = %self.prefix, "{text}"),
		}
	}
}

/// A playlist entry starts loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartFileEvent {
	/// Entry id as used by `playlist/N/id`.
	pub playlist_entry_id: i64,
}

/// A playlist entry stopped playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndFileEvent {
	/// Entry that ended.
	pub playlist_entry_id: i64,
	/// First entry inserted in its place when it was a playlist, or 0.
	pub playlist_insert_id: i64,
	/// Number of inserted entries.
	pub playlist_insert_num_entries: i32,
	/// Failure status when `reason` is [`EndFileReason::Error`].
	pub error: ErrorCode,
	/// Why playback ended.
	pub reason: EndFileReason,
}

/// Hook the client registered for with `hook_add`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookEvent {
	/// Hook name.
	pub name: String,
	/// Id to pass to `hook_continue`.
	pub id: u64,
}

/// Decode one native event envelope into an owned [`Event`].
///
/// An envelope with kind `None`, or with a non-success status, carries no
/// payload: its data pointer is never read.
///
/// # Safety
/// When `raw` has a data-bearing kind and a success status, `raw.data` must be
/// null or point to the payload structure for that kind, valid for the call.
pub unsafe fn decode_event(raw: &mpv_event) -> Result<Event> {
	let id = EventId::from_raw(raw.event_id);
	let error = ErrorCode::from_raw(raw.error);
	let payload = if id == EventId::None || !error.is_success() {
		EventPayload::Empty
	} else {
		// SAFETY: forwarded caller contract.
		unsafe { decode_payload(id, raw.data) }?
	};

	tracing::trace!(event = %id, reply_userdata = raw.reply_userdata, %error, "decoded event");
	Ok(Event {
		reply_userdata: raw.reply_userdata,
		error,
		id,
		payload,
	})
}

unsafe fn decode_payload(id: EventId, data: *mut c_void) -> Result<EventPayload> {
	if !carries_data(id) {
		return Ok(EventPayload::Empty);
	}
	if data.is_null() {
		return Err(MpvError::NullPointer { what: "event data" });
	}

	// SAFETY: `data` points to the payload structure for `id`.
	let payload = unsafe {
		match id {
			EventId::GetPropertyReply | EventId::PropertyChange => EventPayload::Property(property(&*data.cast::<mpv_event_property>())?),
			EventId::LogMessage => EventPayload::LogMessage(log_message(&*data.cast::<mpv_event_log_message>())),
			EventId::ClientMessage => EventPayload::ClientMessage(client_message(&*data.cast::<mpv_event_client_message>())?),
			EventId::StartFile => {
				let raw = &*data.cast::<mpv_event_start_file>();
				EventPayload::StartFile(StartFileEvent {
					playlist_entry_id: raw.playlist_entry_id,
				})
			}
			EventId::EndFile => {
				let raw = &*data.cast::<mpv_event_end_file>();
				EventPayload::EndFile(EndFileEvent {
					playlist_entry_id: raw.playlist_entry_id,
					playlist_insert_id: raw.playlist_insert_id,
					playlist_insert_num_entries: raw.playlist_insert_num_entries,
					error: ErrorCode::from_raw(raw.error),
					reason: EndFileReason::from_raw(raw.reason),
				})
			}
			EventId::Hook => {
				let raw = &*data.cast::<mpv_event_hook>();
				EventPayload::Hook(HookEvent {
					name: owned_str(raw.name).unwrap_or_default(),
					id: raw.id,
				})
			}
			EventId::CommandReply => EventPayload::CommandReply(decode_node(&(*data.cast::<mpv_event_command>()).result)?),
			_ => EventPayload::Empty,
		}
	};
	Ok(payload)
}

fn carries_data(id: EventId) -> bool {
	matches!(
		id,
		EventId::GetPropertyReply
			| EventId::PropertyChange
			| EventId::LogMessage
			| EventId::ClientMessage
			| EventId::StartFile
			| EventId::EndFile
			| EventId::Hook
			| EventId::CommandReply
	)
}

unsafe fn property(raw: &mpv_event_property) -> Result<PropertyEvent> {
	let format = Format::from_raw(raw.format).ok_or(MpvError::UnknownFormat { raw: raw.format })?;
	let value = if raw.data.is_null() {
		Value::None
	} else {
		// SAFETY: `data` points to a cell of `format`.
		unsafe { decode(WireRef::Indirect(raw.data), format) }?
	};
	Ok(PropertyEvent {
		// SAFETY: name is null or NUL-terminated.
		name: unsafe { owned_str(raw.name) }.unwrap_or_default(),
		format,
		value,
	})
}

unsafe fn log_message(raw: &mpv_event_log_message) -> LogMessageEvent {
	// SAFETY: every string field is null or NUL-terminated.
	unsafe {
		LogMessageEvent {
			prefix: owned_str(raw.prefix).unwrap_or_default(),
			text: owned_str(raw.text).unwrap_or_default(),
			level: LogLevel::from_raw(raw.log_level),
		}
	}
}

unsafe fn client_message(raw: &mpv_event_client_message) -> Result<Vec<String>> {
	let count = usize::try_from(raw.num_args).map_err(|_| MpvError::MalformedWire {
		format: Format::NodeArray,
		reason: "negative client message argument count",
	})?;
	if count == 0 {
		return Ok(Vec::new());
	}
	if raw.args.is_null() {
		return Err(MpvError::NullPointer { what: "client message arguments" });
	}

	// SAFETY: `args` holds `num_args` string pointers.
	let args = unsafe { slice::from_raw_parts(raw.args, count) };
	Ok(args.iter().map(|arg| unsafe { owned_str(*arg) }.unwrap_or_default()).collect())
}
