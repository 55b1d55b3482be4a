use std::env;
use std::ffi::{c_char, c_double, c_int, c_ulong, c_void};

use libloading::Library;

use crate::mpv::decode::owned_str;
use crate::mpv::sys::{mpv_event, mpv_handle, mpv_node};
use crate::mpv::{ErrorCode, EventId, LIBRARY_ENV_VAR, LibraryConfig, MpvError, Result};

macro_rules! functions {
	($($(#[$doc:meta])* $field:ident: fn($($arg:ty),* $(,)?) $(-> $ret:ty)?;)*) => {
		/// Entry points of the libmpv client API used by this crate.
		///
		/// Field names are the native symbol names without the `mpv_` prefix.
		#[derive(Clone, Copy)]
		pub struct Functions {
			$($(#[$doc])* pub $field: unsafe extern "C" fn($($arg),*) $(-> $ret)?,)*
		}

		impl Functions {
			/// Resolve every entry point from a loaded library.
			///
			/// # Safety
			/// `library` must be a libmpv build whose symbols have the declared signatures.
			unsafe fn resolve(library: &Library) -> Result<Self> {
				Ok(Self {
					$($field: unsafe { symbol(library, concat!("mpv_", stringify!($field), "\0")) }?,)*
				})
			}
		}
	};
}

functions! {
	/// `mpv_client_api_version`
	client_api_version: fn() -> c_ulong;
	/// `mpv_error_string`
	error_string: fn(c_int) -> *const c_char;
	/// `mpv_event_name`
	event_name: fn(c_int) -> *const c_char;
	/// `mpv_free`
	free: fn(*mut c_void);
	/// `mpv_free_node_contents`
	free_node_contents: fn(*mut mpv_node);
	/// `mpv_create`
	create: fn() -> *mut mpv_handle;
	/// `mpv_create_client`
	create_client: fn(*mut mpv_handle, *const c_char) -> *mut mpv_handle;
	/// `mpv_create_weak_client`
	create_weak_client: fn(*mut mpv_handle, *const c_char) -> *mut mpv_handle;
	/// `mpv_initialize`
	initialize: fn(*mut mpv_handle) -> c_int;
	/// `mpv_destroy`
	destroy: fn(*mut mpv_handle);
	/// `mpv_terminate_destroy`
	terminate_destroy: fn(*mut mpv_handle);
	/// `mpv_client_name`
	client_name: fn(*mut mpv_handle) -> *const c_char;
	/// `mpv_client_id`
	client_id: fn(*mut mpv_handle) -> i64;
	/// `mpv_load_config_file`
	load_config_file: fn(*mut mpv_handle, *const c_char) -> c_int;
	/// `mpv_get_time_us`
	get_time_us: fn(*mut mpv_handle) -> i64;
	/// `mpv_set_option`
	set_option: fn(*mut mpv_handle, *const c_char, c_int, *mut c_void) -> c_int;
	/// `mpv_set_option_string`
	set_option_string: fn(*mut mpv_handle, *const c_char, *const c_char) -> c_int;
	/// `mpv_set_property`
	set_property: fn(*mut mpv_handle, *const c_char, c_int, *mut c_void) -> c_int;
	/// `mpv_set_property_string`
	set_property_string: fn(*mut mpv_handle, *const c_char, *const c_char) -> c_int;
	/// `mpv_set_property_async`
	set_property_async: fn(*mut mpv_handle, u64, *const c_char, c_int, *mut c_void) -> c_int;
	/// `mpv_get_property`
	get_property: fn(*mut mpv_handle, *const c_char, c_int, *mut c_void) -> c_int;
	/// `mpv_get_property_string`
	get_property_string: fn(*mut mpv_handle, *const c_char) -> *mut c_char;
	/// `mpv_get_property_osd_string`
	get_property_osd_string: fn(*mut mpv_handle, *const c_char) -> *mut c_char;
	/// `mpv_get_property_async`
	get_property_async: fn(*mut mpv_handle, u64, *const c_char, c_int) -> c_int;
	/// `mpv_observe_property`
	observe_property: fn(*mut mpv_handle, u64, *const c_char, c_int) -> c_int;
	/// `mpv_unobserve_property`
	unobserve_property: fn(*mut mpv_handle, u64) -> c_int;
	/// `mpv_command`
	command: fn(*mut mpv_handle, *mut *const c_char) -> c_int;
	/// `mpv_command_string`
	command_string: fn(*mut mpv_handle, *const c_char) -> c_int;
	/// `mpv_command_async`
	command_async: fn(*mut mpv_handle, u64, *mut *const c_char) -> c_int;
	/// `mpv_command_node`
	command_node: fn(*mut mpv_handle, *mut mpv_node, *mut mpv_node) -> c_int;
	/// `mpv_command_node_async`
	command_node_async: fn(*mut mpv_handle, u64, *mut mpv_node) -> c_int;
	/// `mpv_command_ret`
	command_ret: fn(*mut mpv_handle, *mut *const c_char, *mut mpv_node) -> c_int;
	/// `mpv_abort_async_command`
	abort_async_command: fn(*mut mpv_handle, u64);
	/// `mpv_request_event`
	request_event: fn(*mut mpv_handle, c_int, c_int) -> c_int;
	/// `mpv_request_log_messages`
	request_log_messages: fn(*mut mpv_handle, *const c_char) -> c_int;
	/// `mpv_wait_event`
	wait_event: fn(*mut mpv_handle, c_double) -> *mut mpv_event;
	/// `mpv_wakeup`
	wakeup: fn(*mut mpv_handle);
	/// `mpv_wait_async_requests`
	wait_async_requests: fn(*mut mpv_handle);
	/// `mpv_hook_add`
	hook_add: fn(*mut mpv_handle, u64, *const c_char, c_int) -> c_int;
	/// `mpv_hook_continue`
	hook_continue: fn(*mut mpv_handle, u64) -> c_int;
}

unsafe fn symbol<T: Copy>(library: &Library, name: &'static str) -> Result<T> {
	// SAFETY: caller guarantees `T` matches the symbol's signature.
	match unsafe { library.get::<T>(name.as_bytes()) } {
		Ok(found) => Ok(*found),
		Err(source) => Err(MpvError::MissingSymbol {
			name: name.trim_end_matches('\0'),
			source,
		}),
	}
}

/// Loaded libmpv function table.
///
/// The library stays loaded for as long as the table lives; client handles
/// keep it alive through an `Arc`.
pub struct Api {
	functions: Functions,
	_library: Option<Library>,
}

impl Api {
	/// Find, load and version-check libmpv.
	///
	/// Explicit paths (the configured one, then [`LIBRARY_ENV_VAR`]) fail loudly;
	/// default names are tried in order until one opens.
	pub fn load(config: &LibraryConfig) -> Result<Self> {
		let mut tried = Vec::new();
		for (path, explicit) in config.candidates(env::var_os(LIBRARY_ENV_VAR)) {
			tracing::debug!(path = %path.display(), explicit, "loading libmpv");
			// SAFETY: running a shared library's initializers; libmpv has no unsound ones.
			let library = match unsafe { Library::new(&path) } {
				Ok(library) => library,
				Err(source) if explicit => {
					return Err(MpvError::LibraryLoad {
						path: path.display().to_string(),
						source,
					});
				}
				Err(err) => {
					tracing::debug!(path = %path.display(), %err, "candidate not loadable");
					tried.push(path.display().to_string());
					continue;
				}
			};

			// SAFETY: the library is libmpv; signatures follow `client.h`.
			let functions = unsafe { Functions::resolve(&library) }?;
			let api = Self {
				functions,
				_library: Some(library),
			};
			api.check_version(config.min_api_version)?;
			tracing::debug!(path = %path.display(), version = ?api.client_api_version(), "libmpv loaded");
			return Ok(api);
		}
		Err(MpvError::LibraryNotFound { tried })
	}

	/// Wrap a table that does not come from a dynamically loaded library.
	pub fn from_functions(functions: Functions) -> Self {
		Self { functions, _library: None }
	}

	/// Borrow the raw function table.
	pub fn functions(&self) -> &Functions {
		&self.functions
	}

	/// Client API version as `(major, minor)`.
	pub fn client_api_version(&self) -> (u32, u32) {
		// SAFETY: no preconditions.
		let raw = u64::from(unsafe { (self.functions.client_api_version)() });
		(((raw >> 16) & 0xffff) as u32, (raw & 0xffff) as u32)
	}

	/// Fail with [`MpvError::ApiVersion`] when the library is older than `required`.
	pub fn check_version(&self, required: (u32, u32)) -> Result<()> {
		let found = self.client_api_version();
		if found < required {
			return Err(MpvError::ApiVersion { found, required });
		}
		Ok(())
	}

	/// Message the library associates with `code`.
	pub fn error_string(&self, code: ErrorCode) -> String {
		// SAFETY: returns a static string for any input.
		unsafe { owned_str((self.functions.error_string)(code.as_raw())) }.unwrap_or_else(|| code.message().to_owned())
	}

	/// Name the library associates with `id`, if it knows the kind.
	pub fn event_name(&self, id: EventId) -> Option<String> {
		// SAFETY: returns a static string or null.
		unsafe { owned_str((self.functions.event_name)(id.as_raw())) }
	}
}

#[cfg(test)]
mod tests;
