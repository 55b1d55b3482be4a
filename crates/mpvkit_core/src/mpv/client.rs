use std::ffi::{CString, c_int};
use std::ptr::NonNull;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::mpv::decode::owned_str;
use crate::mpv::sys::mpv_handle;
use crate::mpv::{
	Api, CStringArray, Direction, ErrorCode, Event, EventId, Format, Functions, LogLevel, MpvError, NativeString, Node, OutCell, Result, Value, decode_event,
	encode, encode_node,
};

struct Handle {
	api: Arc<Api>,
	raw: NonNull<mpv_handle>,
	terminate: AtomicBool,
}

// SAFETY: every libmpv client function except `mpv_wait_event` is thread-safe,
// and `Mpv::wait_event` takes `&mut self`.
unsafe impl Send for Handle {}
// SAFETY: see above.
unsafe impl Sync for Handle {}

impl Drop for Handle {
	fn drop(&mut self) {
		let functions = self.api.functions();
		// SAFETY: last owner of a live handle.
		unsafe {
			if self.terminate.load(Ordering::Acquire) {
				(functions.terminate_destroy)(self.raw.as_ptr());
			} else {
				(functions.destroy)(self.raw.as_ptr());
			}
		}
	}
}

/// Client handle connected to a player core.
///
/// The native handle is destroyed when the last owner (this value or a
/// [`Waker`]) is dropped.
pub struct Mpv {
	handle: Arc<Handle>,
}

/// Thread-safe handle that can only interrupt [`Mpv::wait_event`].
#[derive(Clone)]
pub struct Waker {
	handle: Arc<Handle>,
}

impl Waker {
	/// Make a blocked or the next [`Mpv::wait_event`] return immediately.
	pub fn wake(&self) {
		// SAFETY: live handle.
		unsafe { (self.handle.api.functions().wakeup)(self.handle.raw.as_ptr()) }
	}
}

impl Mpv {
	/// Create a new, uninitialized player core and its first client.
	pub fn create(api: Arc<Api>) -> Result<Self> {
		// SAFETY: no preconditions.
		let raw = unsafe { (api.functions().create)() };
		Self::wrap(api, raw, "mpv_create")
	}

	fn wrap(api: Arc<Api>, raw: *mut mpv_handle, what: &'static str) -> Result<Self> {
		let raw = NonNull::new(raw).ok_or_else(|| {
			tracing::debug!(call = what, "native constructor returned null");
			MpvError::CreateFailed { what }
		})?;
		Ok(Self {
			handle: Arc::new(Handle {
				api,
				raw,
				terminate: AtomicBool::new(false),
			}),
		})
	}

	fn raw(&self) -> *mut mpv_handle {
		self.handle.raw.as_ptr()
	}

	fn functions(&self) -> &Functions {
		self.handle.api.functions()
	}

	fn check(&self, call: &'static str, raw: c_int) -> Result<c_int> {
		ErrorCode::check(raw).inspect_err(|err| tracing::debug!(call, %err, "native call failed"))
	}

	/// Loaded library this handle calls into.
	pub fn api(&self) -> &Arc<Api> {
		&self.handle.api
	}

	/// Connect another client to the same core.
	pub fn create_client(&self, name: &str) -> Result<Self> {
		let name = CString::new(name)?;
		// SAFETY: live handle and NUL-terminated name.
		let raw = unsafe { (self.functions().create_client)(self.raw(), name.as_ptr()) };
		Self::wrap(Arc::clone(&self.handle.api), raw, "mpv_create_client")
	}

	/// Connect a client that does not keep the core alive.
	pub fn create_weak_client(&self, name: &str) -> Result<Self> {
		let name = CString::new(name)?;
		// SAFETY: live handle and NUL-terminated name.
		let raw = unsafe { (self.functions().create_weak_client)(self.raw(), name.as_ptr()) };
		Self::wrap(Arc::clone(&self.handle.api), raw, "mpv_create_weak_client")
	}

	/// Initialize a core created with [`Mpv::create`].
	pub fn initialize(&self) -> Result<()> {
		// SAFETY: live handle.
		let raw = unsafe { (self.functions().initialize)(self.raw()) };
		self.check("mpv_initialize", raw).map(drop)
	}

	/// Shut the core down once the last owner of this handle is gone.
	pub fn terminate(self) {
		self.handle.terminate.store(true, Ordering::Release);
	}

	/// Unique name of this client.
	pub fn client_name(&self) -> String {
		// SAFETY: the name is owned by the live handle.
		unsafe { owned_str((self.functions().client_name)(self.raw())) }.unwrap_or_default()
	}

	/// Numeric id of this client.
	pub fn client_id(&self) -> i64 {
		// SAFETY: live handle.
		unsafe { (self.functions().client_id)(self.raw()) }
	}

	/// Load a config file into the core's options.
	pub fn load_config_file(&self, path: &str) -> Result<()> {
		let path = CString::new(path)?;
		// SAFETY: live handle and NUL-terminated path.
		let raw = unsafe { (self.functions().load_config_file)(self.raw(), path.as_ptr()) };
		self.check("mpv_load_config_file", raw).map(drop)
	}

	/// Monotonic core clock in microseconds.
	pub fn internal_time_us(&self) -> i64 {
		// SAFETY: live handle.
		unsafe { (self.functions().get_time_us)(self.raw()) }
	}

	/// Set an option before initialization.
	pub fn set_option(&self, name: &str, value: &Value, format: Format) -> Result<()> {
		let name = CString::new(name)?;
		let mut data = encode(value, format)?;
		// SAFETY: `data` stays alive across the call.
		let raw = unsafe { (self.functions().set_option)(self.raw(), name.as_ptr(), format.as_raw(), data.data_ptr()) };
		self.check("mpv_set_option", raw).map(drop)
	}

	/// Set an option from its string form.
	pub fn set_option_string(&self, name: &str, value: &str) -> Result<()> {
		let name = CString::new(name)?;
		let value = CString::new(value)?;
		// SAFETY: live handle and NUL-terminated strings.
		let raw = unsafe { (self.functions().set_option_string)(self.raw(), name.as_ptr(), value.as_ptr()) };
		self.check("mpv_set_option_string", raw).map(drop)
	}

	/// Set a property, encoded as `format`.
	pub fn set_property(&self, name: &str, value: &Value, format: Format) -> Result<()> {
		let name = CString::new(name)?;
		let mut data = encode(value, format)?;
		// SAFETY: `data` stays alive across the call.
		let raw = unsafe { (self.functions().set_property)(self.raw(), name.as_ptr(), format.as_raw(), data.data_ptr()) };
		self.check("mpv_set_property", raw).map(drop)
	}

	/// Set a property from its string form.
	pub fn set_property_string(&self, name: &str, value: &str) -> Result<()> {
		let name = CString::new(name)?;
		let value = CString::new(value)?;
		// SAFETY: live handle and NUL-terminated strings.
		let raw = unsafe { (self.functions().set_property_string)(self.raw(), name.as_ptr(), value.as_ptr()) };
		self.check("mpv_set_property_string", raw).map(drop)
	}

	/// Queue a property set; completion arrives as a set-property-reply event.
	pub fn set_property_async(&self, name: &str, value: &Value, format: Format, reply_userdata: u64) -> Result<()> {
		let name = CString::new(name)?;
		let mut data = encode(value, format)?;
		// SAFETY: the native side copies `data` before returning.
		let raw = unsafe { (self.functions().set_property_async)(self.raw(), reply_userdata, name.as_ptr(), format.as_raw(), data.data_ptr()) };
		self.check("mpv_set_property_async", raw).map(drop)
	}

	/// Read a property as `format`.
	///
	/// `None` and `ByteArray` have no get path and are rejected before any native call.
	pub fn get_property(&self, name: &str, format: Format) -> Result<Value> {
		if matches!(format, Format::None | Format::ByteArray) {
			return Err(MpvError::Unsupported {
				format,
				direction: Direction::Decode,
			});
		}

		let name = CString::new(name)?;
		let mut out = OutCell::new(format, self.functions());
		// SAFETY: `out` is a zeroed cell of `format`.
		let raw = unsafe { (self.functions().get_property)(self.raw(), name.as_ptr(), format.as_raw(), out.data_ptr()) };
		self.check("mpv_get_property", raw)?;
		// SAFETY: the call succeeded.
		unsafe { out.read() }
	}

	/// Read a property's string form.
	pub fn get_property_string(&self, name: &str) -> Result<String> {
		let cname = CString::new(name)?;
		// SAFETY: live handle and NUL-terminated name.
		let raw = unsafe { (self.functions().get_property_string)(self.raw(), cname.as_ptr()) };
		self.native_string(name, raw)
	}

	/// Read a property formatted for on-screen display.
	pub fn get_property_osd_string(&self, name: &str) -> Result<String> {
		let cname = CString::new(name)?;
		// SAFETY: live handle and NUL-terminated name.
		let raw = unsafe { (self.functions().get_property_osd_string)(self.raw(), cname.as_ptr()) };
		self.native_string(name, raw)
	}

	fn native_string(&self, name: &str, raw: *mut std::ffi::c_char) -> Result<String> {
		// SAFETY: `raw` was just returned by a string getter and is owned by us.
		let owned = unsafe { NativeString::from_raw(raw, self.functions()) }.ok_or_else(|| {
			tracing::debug!(property = name, "string getter returned null");
			MpvError::NoStringValue { name: name.to_owned() }
		})?;
		Ok(owned.to_string_lossy())
	}

	/// Queue a property read; the value arrives as a get-property-reply event.
	pub fn get_property_async(&self, name: &str, format: Format, reply_userdata: u64) -> Result<()> {
		let name = CString::new(name)?;
		// SAFETY: live handle and NUL-terminated name.
		let raw = unsafe { (self.functions().get_property_async)(self.raw(), reply_userdata, name.as_ptr(), format.as_raw()) };
		self.check("mpv_get_property_async", raw).map(drop)
	}

	/// Receive property-change events for `name`, tagged with `reply_userdata`.
	pub fn observe_property(&self, name: &str, format: Format, reply_userdata: u64) -> Result<()> {
		let name = CString::new(name)?;
		// SAFETY: live handle and NUL-terminated name.
		let raw = unsafe { (self.functions().observe_property)(self.raw(), reply_userdata, name.as_ptr(), format.as_raw()) };
		self.check("mpv_observe_property", raw).map(drop)
	}

	/// Stop every observation registered with `reply_userdata`; returns how many were removed.
	pub fn unobserve_property(&self, reply_userdata: u64) -> Result<usize> {
		// SAFETY: live handle.
		let raw = unsafe { (self.functions().unobserve_property)(self.raw(), reply_userdata) };
		Ok(self.check("mpv_unobserve_property", raw)?.unsigned_abs() as usize)
	}

	/// Run a command given as separate arguments.
	pub fn command<S: AsRef<str>>(&self, args: &[S]) -> Result<()> {
		let args = CStringArray::new(args)?;
		// SAFETY: `args` is NULL-terminated and alive across the call.
		let raw = unsafe { (self.functions().command)(self.raw(), args.as_ptr()) };
		self.check("mpv_command", raw).map(drop)
	}

	/// Run a command given in input.conf syntax.
	pub fn command_string(&self, command: &str) -> Result<()> {
		let command = CString::new(command)?;
		// SAFETY: live handle and NUL-terminated command.
		let raw = unsafe { (self.functions().command_string)(self.raw(), command.as_ptr()) };
		self.check("mpv_command_string", raw).map(drop)
	}

	/// Queue a command; completion arrives as a command-reply event.
	pub fn command_async<S: AsRef<str>>(&self, args: &[S], reply_userdata: u64) -> Result<()> {
		let args = CStringArray::new(args)?;
		// SAFETY: the native side copies `args` before returning.
		let raw = unsafe { (self.functions().command_async)(self.raw(), reply_userdata, args.as_ptr()) };
		self.check("mpv_command_async", raw).map(drop)
	}

	/// Run a command given as a node and return its result node.
	pub fn command_node(&self, args: &Node) -> Result<Node> {
		let mut encoded = encode_node(args)?;
		let mut out = OutCell::new(Format::Node, self.functions());
		// SAFETY: `encoded` and `out` stay alive across the call.
		let raw = unsafe { (self.functions().command_node)(self.raw(), encoded.data_ptr().cast(), out.data_ptr().cast()) };
		self.check("mpv_command_node", raw)?;
		// SAFETY: the call succeeded.
		node_result(unsafe { out.read() }?)
	}

	/// Queue a node command; the result arrives as a command-reply event.
	pub fn command_node_async(&self, args: &Node, reply_userdata: u64) -> Result<()> {
		let mut encoded = encode_node(args)?;
		// SAFETY: the native side copies `encoded` before returning.
		let raw = unsafe { (self.functions().command_node_async)(self.raw(), reply_userdata, encoded.data_ptr().cast()) };
		self.check("mpv_command_node_async", raw).map(drop)
	}

	/// Run a string command and return its result node.
	pub fn command_ret<S: AsRef<str>>(&self, args: &[S]) -> Result<Node> {
		let args = CStringArray::new(args)?;
		let mut out = OutCell::new(Format::Node, self.functions());
		// SAFETY: `args` and `out` stay alive across the call.
		let raw = unsafe { (self.functions().command_ret)(self.raw(), args.as_ptr(), out.data_ptr().cast()) };
		self.check("mpv_command_ret", raw)?;
		// SAFETY: the call succeeded.
		node_result(unsafe { out.read() }?)
	}

	/// Ask the core to abort async commands queued with `reply_userdata`.
	pub fn abort_async_command(&self, reply_userdata: u64) {
		// SAFETY: live handle.
		unsafe { (self.functions().abort_async_command)(self.raw(), reply_userdata) }
	}

	/// Enable or disable delivery of one event kind.
	pub fn request_event(&self, id: EventId, enable: bool) -> Result<()> {
		// SAFETY: live handle.
		let raw = unsafe { (self.functions().request_event)(self.raw(), id.as_raw(), c_int::from(enable)) };
		self.check("mpv_request_event", raw).map(drop)
	}

	/// Receive log-message events at `level` and above.
	pub fn request_log_messages(&self, level: LogLevel) -> Result<()> {
		let level = CString::new(level.as_str())?;
		// SAFETY: live handle and NUL-terminated level name.
		let raw = unsafe { (self.functions().request_log_messages)(self.raw(), level.as_ptr()) };
		self.check("mpv_request_log_messages", raw).map(drop)
	}

	/// Block for up to `timeout` seconds (negative waits forever) and decode the next event.
	///
	/// A wait that times out or is woken returns an event with id `None`.
	pub fn wait_event(&mut self, timeout: f64) -> Result<Event> {
		// SAFETY: only one wait is in flight per handle.
		let raw = unsafe { (self.functions().wait_event)(self.raw(), timeout) };
		if raw.is_null() {
			return Err(MpvError::NullPointer { what: "mpv_wait_event" });
		}
		// SAFETY: the envelope is valid until the next wait on this handle.
		unsafe { decode_event(&*raw) }
	}

	/// Interrupt a blocked [`Mpv::wait_event`].
	pub fn wakeup(&self) {
		// SAFETY: live handle.
		unsafe { (self.functions().wakeup)(self.raw()) }
	}

	/// Handle that can wake this client from other threads.
	pub fn waker(&self) -> Waker {
		Waker {
			handle: Arc::clone(&self.handle),
		}
	}

	/// Block until every queued async request has replied.
	pub fn wait_async_requests(&self) {
		// SAFETY: live handle.
		unsafe { (self.functions().wait_async_requests)(self.raw()) }
	}

	/// Register for hook `name`; invocations arrive as hook events.
	pub fn hook_add(&self, name: &str, priority: i32, reply_userdata: u64) -> Result<()> {
		let name = CString::new(name)?;
		// SAFETY: live handle and NUL-terminated name.
		let raw = unsafe { (self.functions().hook_add)(self.raw(), reply_userdata, name.as_ptr(), priority) };
		self.check("mpv_hook_add", raw).map(drop)
	}

	/// Let the core continue after a hook event with `id`.
	pub fn hook_continue(&self, id: u64) -> Result<()> {
		// SAFETY: live handle.
		let raw = unsafe { (self.functions().hook_continue)(self.raw(), id) };
		self.check("mpv_hook_continue", raw).map(drop)
	}
}

fn node_result(value: Value) -> Result<Node> {
	match value {
		Value::Node(node) => Ok(*node),
		other => Err(MpvError::FormatMismatch {
			format: Format::Node,
			found: other.kind(),
		}),
	}
}
