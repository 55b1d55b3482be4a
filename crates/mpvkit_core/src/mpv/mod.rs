mod api;
mod client;
mod code;
mod config;
mod decode;
mod encode;
mod error;
mod event;
mod format;
mod guard;
pub mod sys;
mod value;
mod wire;

/// Native function table and its loader.
pub use api::{Api, Functions};
/// Client handle and cross-thread wakeup handle.
pub use client::{Mpv, Waker};
/// Native error codes.
pub use code::ErrorCode;
/// Library discovery and version requirements.
pub use config::{DEFAULT_LIBRARY_NAMES, LIBRARY_ENV_VAR, LibraryConfig};
/// Wire-to-host decoding entry points.
pub use decode::{WireRef, decode, decode_node};
/// Host-to-wire encoding entry points.
pub use encode::{Encoded, encode, encode_node};
/// Error and result aliases.
pub use error::{Direction, MpvError, Result};
/// Decoded event envelope and payloads.
pub use event::{EndFileEvent, Event, EventPayload, HookEvent, LogMessageEvent, PropertyEvent, StartFileEvent, decode_event};
/// Closed wire enumerations.
pub use format::{EndFileReason, EventId, Format, LogLevel};
/// Scoped owners of native buffers.
pub use guard::{CStringArray, NativeString, OutCell};
/// Host-side dynamic value model.
pub use value::{Node, NodeList, NodeMap, Value};
/// Address-in-buffer payload helper.
pub use wire::Payload;
