//! `extern "C"` entry points of the in-memory libmpv stand-in.

use std::any::Any;
use std::ffi::{CStr, CString, c_char, c_double, c_int, c_ulong, c_void};
use std::path::Path;
use std::ptr;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use mpvkit::mpv::sys::{
	mpv_event, mpv_event_client_message, mpv_event_command, mpv_event_end_file, mpv_event_hook, mpv_event_log_message, mpv_event_property,
	mpv_event_start_file, mpv_handle, mpv_node,
};
use mpvkit::mpv::{Api, ErrorCode, EventId, Format, Functions, Node, Value, WireRef, decode, decode_node, encode, encode_node};

use crate::alloc;
use crate::state::{Core, Pending, Shared, lock, parse_text};

/// Client API version reported by [`fake_api`].
pub const FAKE_API_VERSION: (u32, u32) = (2, 5);

/// Function table backed by an in-memory player core.
///
/// Properties are stored as host values, observed properties emit change
/// events, and commands such as `loadfile`, `script-message` and `quit` queue
/// the events a real player would. Strings and nodes handed out to the caller
/// are tracked per thread; see [`crate::outstanding_allocations`].
pub fn fake_api() -> Arc<Api> {
	Arc::new(Api::from_functions(Functions {
		client_api_version,
		error_string,
		event_name,
		free,
		free_node_contents,
		create,
		create_client,
		create_weak_client: create_client,
		initialize,
		destroy,
		terminate_destroy,
		client_name,
		client_id,
		load_config_file,
		get_time_us,
		set_option: set_property,
		set_option_string: set_property_string,
		set_property,
		set_property_string,
		set_property_async,
		get_property,
		get_property_string,
		get_property_osd_string: get_property_string,
		get_property_async,
		observe_property,
		unobserve_property,
		command,
		command_string,
		command_async,
		command_node,
		command_node_async,
		command_ret,
		abort_async_command,
		request_event,
		request_log_messages,
		wait_event,
		wakeup,
		wait_async_requests,
		hook_add,
		hook_continue,
	}))
}

struct Client {
	core: Shared,
	id: i64,
	name: CString,
	delivered: Mutex<Option<Delivered>>,
}

impl Client {
	fn open(core: Shared, name: &str) -> *mut mpv_handle {
		let id = lock(&core).add_client();
		let client = Client {
			core,
			id,
			name: CString::new(name).unwrap_or_default(),
			delivered: Mutex::new(None),
		};
		Box::into_raw(Box::new(client)).cast()
	}
}

/// Event envelope and every buffer it points into, kept until the next wait.
struct Delivered {
	event: Box<mpv_event>,
	keep: Vec<Box<dyn Any>>,
}

impl Delivered {
	fn new(id: EventId, error: ErrorCode, reply_userdata: u64) -> Self {
		Self {
			event: Box::new(mpv_event {
				event_id: id.as_raw(),
				error: error.as_raw(),
				reply_userdata,
				data: ptr::null_mut(),
			}),
			keep: Vec::new(),
		}
	}

	fn text(&mut self, text: &str) -> *const c_char {
		let owned = CString::new(text.replace('\0', "")).unwrap_or_default();
		let ptr = owned.as_ptr();
		self.keep.push(Box::new(owned));
		ptr
	}

	fn hold<T: 'static>(&mut self, value: T) -> *mut c_void {
		let mut boxed = Box::new(value);
		let ptr = ptr::from_mut::<T>(&mut boxed).cast();
		self.keep.push(boxed);
		ptr
	}

	fn with_data<T: 'static>(mut self, value: T) -> Self {
		self.event.data = self.hold(value);
		self
	}
}

fn deliver(event: Pending) -> Delivered {
	match event {
		Pending::Property {
			id,
			reply_userdata,
			name,
			format,
			value,
		} => match value {
			Err(error) => Delivered::new(id, error, reply_userdata),
			Ok(value) => {
				let mut out = Delivered::new(id, ErrorCode::Success, reply_userdata);
				let name = out.text(&name);
				let (format, data) = match encode(&value, format) {
					Ok(_) if value.is_none() => (Format::None, ptr::null_mut()),
					Ok(mut encoded) => {
						let data = encoded.data_ptr();
						out.keep.push(Box::new(encoded));
						(format, data)
					}
					Err(_) => (Format::None, ptr::null_mut()),
				};
				out.with_data(mpv_event_property {
					name,
					format: format.as_raw(),
					data,
				})
			}
		},
		Pending::SetReply { reply_userdata, error } => Delivered::new(EventId::SetPropertyReply, error, reply_userdata),
		Pending::CommandReply { reply_userdata, result } => match result {
			Err(error) => Delivered::new(EventId::CommandReply, error, reply_userdata),
			Ok(node) => {
				let mut out = Delivered::new(EventId::CommandReply, ErrorCode::Success, reply_userdata);
				let result = match encode_node(&node) {
					Ok(encoded) => {
						let cell = *encoded.node();
						out.keep.push(Box::new(encoded));
						cell
					}
					Err(_) => mpv_node::zeroed(),
				};
				out.with_data(mpv_event_command { result })
			}
		},
		Pending::Log { prefix, level, text } => {
			let mut out = Delivered::new(EventId::LogMessage, ErrorCode::Success, 0);
			let message = mpv_event_log_message {
				prefix: out.text(&prefix),
				level: out.text(level.as_str()),
				text: out.text(&text),
				log_level: level.as_raw(),
			};
			out.with_data(message)
		}
		Pending::ClientMessage(words) => {
			let mut out = Delivered::new(EventId::ClientMessage, ErrorCode::Success, 0);
			let mut args: Vec<*const c_char> = words.iter().map(|word| out.text(word)).collect();
			let message = mpv_event_client_message {
				num_args: c_int::try_from(args.len()).unwrap_or(c_int::MAX),
				args: args.as_mut_ptr(),
			};
			out.keep.push(Box::new(args));
			out.with_data(message)
		}
		Pending::StartFile(entry) => Delivered::new(EventId::StartFile, ErrorCode::Success, 0).with_data(mpv_event_start_file { playlist_entry_id: entry }),
		Pending::EndFile { entry, reason } => Delivered::new(EventId::EndFile, ErrorCode::Success, 0).with_data(mpv_event_end_file {
			reason: reason.as_raw(),
			error: ErrorCode::Success.as_raw(),
			playlist_entry_id: entry,
			playlist_insert_id: 0,
			playlist_insert_num_entries: 0,
		}),
		Pending::Hook { reply_userdata, name, id } => {
			let mut out = Delivered::new(EventId::Hook, ErrorCode::Success, reply_userdata);
			let name = out.text(&name);
			out.with_data(mpv_event_hook { name, id })
		}
		Pending::Bare(id) => Delivered::new(id, ErrorCode::Success, 0),
	}
}

unsafe fn client<'a>(handle: *mut mpv_handle) -> &'a Client {
	// SAFETY: every handle given out by this module points to a live `Client`.
	unsafe { &*handle.cast::<Client>() }
}

unsafe fn text(ptr: *const c_char) -> String {
	if ptr.is_null() {
		return String::new();
	}
	// SAFETY: NUL-terminated per the native contract.
	unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

unsafe fn words(mut args: *mut *const c_char) -> Vec<String> {
	let mut out = Vec::new();
	if args.is_null() {
		return out;
	}
	// SAFETY: NULL-terminated array of NUL-terminated strings.
	unsafe {
		while !(*args).is_null() {
			out.push(text(*args));
			args = args.add(1);
		}
	}
	out
}

fn status(result: Result<(), ErrorCode>) -> c_int {
	match result {
		Ok(()) => 0,
		Err(code) => code.as_raw(),
	}
}

/// Write `value` to a destination of `format` the way `mpv_get_property` does.
unsafe fn write_out(data: *mut c_void, value: Value, format: Format) -> Result<(), ErrorCode> {
	// SAFETY: `data` points to a destination of `format`.
	unsafe {
		match (format, value) {
			(Format::String | Format::OsdString, Value::String(text)) => data.cast::<*mut c_char>().write(alloc::string(&text)),
			(Format::Flag, Value::Flag(flag)) => data.cast::<c_int>().write(c_int::from(flag)),
			(Format::Int64, Value::Int64(int)) => data.cast::<i64>().write(int),
			(Format::Double, Value::Double(double)) => data.cast::<f64>().write(double),
			(Format::Node, Value::Node(node)) => data.cast::<mpv_node>().write(write_node(&node)?),
			_ => return Err(ErrorCode::PropertyFormat),
		}
	}
	Ok(())
}

fn write_node(node: &Node) -> Result<mpv_node, ErrorCode> {
	let encoded = encode_node(node).map_err(|_| ErrorCode::PropertyFormat)?;
	Ok(alloc::node(encoded))
}

fn command_words(args: *mut mpv_node) -> Result<Vec<String>, ErrorCode> {
	if args.is_null() {
		return Err(ErrorCode::InvalidParameter);
	}
	// SAFETY: the caller passes an encoded node.
	let node = unsafe { decode_node(&*args) }.map_err(|_| ErrorCode::InvalidParameter)?;
	let items = node.data().as_list().ok_or(ErrorCode::InvalidParameter)?;
	items
		.iter()
		.map(|item| match item.data() {
			Value::String(word) => Ok(word.clone()),
			Value::Int64(int) => Ok(int.to_string()),
			Value::Double(double) => Ok(double.to_string()),
			Value::Flag(flag) => Ok((if *flag { "yes" } else { "no" }).to_owned()),
			_ => Err(ErrorCode::InvalidParameter),
		})
		.collect()
}

unsafe extern "C" fn client_api_version() -> c_ulong {
	c_ulong::from((FAKE_API_VERSION.0 << 16) | FAKE_API_VERSION.1)
}

unsafe extern "C" fn error_string(code: c_int) -> *const c_char {
	static MESSAGES: OnceLock<Vec<(c_int, CString)>> = OnceLock::new();
	let messages = MESSAGES.get_or_init(|| {
		(-20..=0)
			.map(|raw| (raw, CString::new(ErrorCode::from_raw(raw).message()).unwrap_or_default()))
			.collect()
	});
	match messages.iter().find(|(raw, _)| *raw == code) {
		Some((_, message)) => message.as_ptr(),
		None => c"unknown error".as_ptr(),
	}
}

unsafe extern "C" fn event_name(id: c_int) -> *const c_char {
	static NAMES: OnceLock<Vec<CString>> = OnceLock::new();
	let names = NAMES.get_or_init(|| (0..=25).map(|raw| CString::new(EventId::from_raw(raw).as_str()).unwrap_or_default()).collect());
	usize::try_from(id).ok().and_then(|index| names.get(index)).map_or(ptr::null(), |name| name.as_ptr())
}

unsafe extern "C" fn free(data: *mut c_void) {
	alloc::free_string(data.cast());
}

unsafe extern "C" fn free_node_contents(node: *mut mpv_node) {
	// SAFETY: caller passes a cell filled by this module, or a zeroed one.
	if let Some(node) = unsafe { node.as_mut() } {
		alloc::free_node(node);
	}
}

unsafe extern "C" fn create() -> *mut mpv_handle {
	Client::open(Arc::new(Mutex::new(Core::new())), "main")
}

unsafe extern "C" fn create_client(handle: *mut mpv_handle, name: *const c_char) -> *mut mpv_handle {
	// SAFETY: live handle and NUL-terminated name.
	let (core, name) = unsafe { (Arc::clone(&client(handle).core), text(name)) };
	let name = if name.is_empty() { "client".to_owned() } else { name };
	Client::open(core, &name)
}

unsafe extern "C" fn initialize(handle: *mut mpv_handle) -> c_int {
	// SAFETY: live handle.
	let client = unsafe { client(handle) };
	status(lock(&client.core).initialize())
}

unsafe extern "C" fn destroy(handle: *mut mpv_handle) {
	// SAFETY: handle produced by `Client::open` and destroyed only once.
	let client = unsafe { Box::from_raw(handle.cast::<Client>()) };
	lock(&client.core).remove_client(client.id);
}

unsafe extern "C" fn terminate_destroy(handle: *mut mpv_handle) {
	// SAFETY: live handle.
	lock(&unsafe { client(handle) }.core).shutdown();
	// SAFETY: forwarded contract.
	unsafe { destroy(handle) }
}

unsafe extern "C" fn client_name(handle: *mut mpv_handle) -> *const c_char {
	// SAFETY: live handle; the name lives as long as the handle.
	unsafe { client(handle) }.name.as_ptr()
}

unsafe extern "C" fn client_id(handle: *mut mpv_handle) -> i64 {
	// SAFETY: live handle.
	unsafe { client(handle) }.id
}

unsafe extern "C" fn load_config_file(handle: *mut mpv_handle, path: *const c_char) -> c_int {
	// SAFETY: live handle and NUL-terminated path.
	let (client, path) = unsafe { (client(handle), text(path)) };
	status(lock(&client.core).load_config(Path::new(&path)))
}

unsafe extern "C" fn get_time_us(handle: *mut mpv_handle) -> i64 {
	// SAFETY: live handle.
	lock(&unsafe { client(handle) }.core).elapsed_us()
}

unsafe extern "C" fn set_property(handle: *mut mpv_handle, name: *const c_char, format: c_int, data: *mut c_void) -> c_int {
	// SAFETY: live handle and NUL-terminated name.
	let (client, name) = unsafe { (client(handle), text(name)) };
	let Some(format) = Format::from_raw(format) else {
		return ErrorCode::PropertyFormat.as_raw();
	};
	// SAFETY: `data` points to a value of `format`.
	match unsafe { decode(WireRef::Indirect(data), format) } {
		Ok(value) => {
			lock(&client.core).set(&name, value);
			0
		}
		Err(_) => ErrorCode::PropertyFormat.as_raw(),
	}
}

unsafe extern "C" fn set_property_string(handle: *mut mpv_handle, name: *const c_char, value: *const c_char) -> c_int {
	// SAFETY: live handle and NUL-terminated strings.
	let (client, name, value) = unsafe { (client(handle), text(name), text(value)) };
	lock(&client.core).set(&name, parse_text(&value));
	0
}

unsafe extern "C" fn set_property_async(handle: *mut mpv_handle, reply_userdata: u64, name: *const c_char, format: c_int, data: *mut c_void) -> c_int {
	// SAFETY: forwarded contract.
	let raw = unsafe { set_property(handle, name, format, data) };
	// SAFETY: live handle.
	let client = unsafe { client(handle) };
	lock(&client.core).push(
		client.id,
		Pending::SetReply {
			reply_userdata,
			error: ErrorCode::from_raw(raw),
		},
	);
	0
}

unsafe extern "C" fn get_property(handle: *mut mpv_handle, name: *const c_char, format: c_int, data: *mut c_void) -> c_int {
	// SAFETY: live handle and NUL-terminated name.
	let (client, name) = unsafe { (client(handle), text(name)) };
	let Some(format) = Format::from_raw(format) else {
		return ErrorCode::PropertyFormat.as_raw();
	};
	let value = lock(&client.core).get(&name, format);
	// SAFETY: `data` points to a destination of `format`.
	status(value.and_then(|value| unsafe { write_out(data, value, format) }))
}

unsafe extern "C" fn get_property_string(handle: *mut mpv_handle, name: *const c_char) -> *mut c_char {
	// SAFETY: live handle and NUL-terminated name.
	let (client, name) = unsafe { (client(handle), text(name)) };
	match lock(&client.core).get_text(&name) {
		Some(text) => alloc::string(&text),
		None => ptr::null_mut(),
	}
}

unsafe extern "C" fn get_property_async(handle: *mut mpv_handle, reply_userdata: u64, name: *const c_char, format: c_int) -> c_int {
	// SAFETY: live handle and NUL-terminated name.
	let (client, name) = unsafe { (client(handle), text(name)) };
	let Some(format) = Format::from_raw(format) else {
		return ErrorCode::PropertyFormat.as_raw();
	};
	let mut core = lock(&client.core);
	let value = core.get(&name, format);
	core.push(
		client.id,
		Pending::Property {
			id: EventId::GetPropertyReply,
			reply_userdata,
			name,
			format,
			value,
		},
	);
	0
}

unsafe extern "C" fn observe_property(handle: *mut mpv_handle, reply_userdata: u64, name: *const c_char, format: c_int) -> c_int {
	// SAFETY: live handle and NUL-terminated name.
	let (client, name) = unsafe { (client(handle), text(name)) };
	let Some(format) = Format::from_raw(format) else {
		return ErrorCode::PropertyFormat.as_raw();
	};
	lock(&client.core).observe(client.id, reply_userdata, &name, format);
	0
}

unsafe extern "C" fn unobserve_property(handle: *mut mpv_handle, reply_userdata: u64) -> c_int {
	// SAFETY: live handle.
	let client = unsafe { client(handle) };
	let removed = lock(&client.core).unobserve(client.id, reply_userdata);
	c_int::try_from(removed).unwrap_or(c_int::MAX)
}

fn run(client: &Client, args: &[String]) -> Result<Node, ErrorCode> {
	lock(&client.core).run(args)
}

unsafe extern "C" fn command(handle: *mut mpv_handle, args: *mut *const c_char) -> c_int {
	// SAFETY: live handle and NULL-terminated arguments.
	let (client, args) = unsafe { (client(handle), words(args)) };
	status(run(client, &args).map(drop))
}

unsafe extern "C" fn command_string(handle: *mut mpv_handle, args: *const c_char) -> c_int {
	// SAFETY: live handle and NUL-terminated command.
	let (client, line) = unsafe { (client(handle), text(args)) };
	let args: Vec<String> = line.split_whitespace().map(str::to_owned).collect();
	status(run(client, &args).map(drop))
}

unsafe extern "C" fn command_async(handle: *mut mpv_handle, reply_userdata: u64, args: *mut *const c_char) -> c_int {
	// SAFETY: live handle and NULL-terminated arguments.
	let (client, args) = unsafe { (client(handle), words(args)) };
	let result = run(client, &args);
	lock(&client.core).push(client.id, Pending::CommandReply { reply_userdata, result });
	0
}

unsafe extern "C" fn command_node(handle: *mut mpv_handle, args: *mut mpv_node, result: *mut mpv_node) -> c_int {
	// SAFETY: live handle.
	let client = unsafe { client(handle) };
	let reply = command_words(args).and_then(|args| run(client, &args)).and_then(|node| write_node(&node));
	match reply {
		Ok(cell) => {
			if !result.is_null() {
				// SAFETY: `result` points to a zeroed cell owned by the caller.
				unsafe { result.write(cell) };
			}
			0
		}
		Err(code) => code.as_raw(),
	}
}

unsafe extern "C" fn command_node_async(handle: *mut mpv_handle, reply_userdata: u64, args: *mut mpv_node) -> c_int {
	// SAFETY: live handle.
	let client = unsafe { client(handle) };
	let result = command_words(args).and_then(|args| run(client, &args));
	lock(&client.core).push(client.id, Pending::CommandReply { reply_userdata, result });
	0
}

unsafe extern "C" fn command_ret(handle: *mut mpv_handle, args: *mut *const c_char, result: *mut mpv_node) -> c_int {
	// SAFETY: live handle and NULL-terminated arguments.
	let (client, args) = unsafe { (client(handle), words(args)) };
	match run(client, &args).and_then(|node| write_node(&node)) {
		Ok(cell) => {
			if !result.is_null() {
				// SAFETY: `result` points to a zeroed cell owned by the caller.
				unsafe { result.write(cell) };
			}
			0
		}
		Err(code) => code.as_raw(),
	}
}

unsafe extern "C" fn abort_async_command(_handle: *mut mpv_handle, _reply_userdata: u64) {}

unsafe extern "C" fn request_event(handle: *mut mpv_handle, id: c_int, enable: c_int) -> c_int {
	// SAFETY: live handle.
	let client = unsafe { client(handle) };
	status(lock(&client.core).request_event(client.id, id, enable != 0))
}

unsafe extern "C" fn request_log_messages(handle: *mut mpv_handle, level: *const c_char) -> c_int {
	// SAFETY: live handle and NUL-terminated level name.
	let (client, level) = unsafe { (client(handle), text(level)) };
	status(lock(&client.core).request_log(client.id, &level))
}

unsafe extern "C" fn wait_event(handle: *mut mpv_handle, _timeout: c_double) -> *mut mpv_event {
	// SAFETY: live handle.
	let client = unsafe { client(handle) };
	let next = lock(&client.core).next_event(client.id);
	let delivered = match next {
		Some(event) => deliver(event),
		None => Delivered::new(EventId::None, ErrorCode::Success, 0),
	};

	let mut slot = client.delivered.lock().unwrap_or_else(PoisonError::into_inner);
	let delivered = slot.insert(delivered);
	ptr::from_mut::<mpv_event>(&mut delivered.event)
}

unsafe extern "C" fn wakeup(_handle: *mut mpv_handle) {}

unsafe extern "C" fn wait_async_requests(_handle: *mut mpv_handle) {}

unsafe extern "C" fn hook_add(handle: *mut mpv_handle, reply_userdata: u64, name: *const c_char, _priority: c_int) -> c_int {
	// SAFETY: live handle and NUL-terminated name.
	let (client, name) = unsafe { (client(handle), text(name)) };
	status(lock(&client.core).add_hook(client.id, reply_userdata, &name))
}

unsafe extern "C" fn hook_continue(handle: *mut mpv_handle, id: u64) -> c_int {
	// SAFETY: live handle.
	let client = unsafe { client(handle) };
	status(lock(&client.core).continue_hook(id))
}
