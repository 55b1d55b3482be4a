//! Player core model behind the fake entry points.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::ffi::c_int;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use mpvkit::mpv::{EndFileReason, ErrorCode, EventId, Format, LogLevel, Node, NodeMap, Value};

pub(crate) type Shared = Arc<Mutex<Core>>;

pub(crate) fn lock(core: &Shared) -> MutexGuard<'_, Core> {
	core.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Event waiting in a client queue, rendered to native memory on delivery.
pub(crate) enum Pending {
	Property {
		id: EventId,
		reply_userdata: u64,
		name: String,
		format: Format,
		value: Result<Value, ErrorCode>,
	},
	SetReply {
		reply_userdata: u64,
		error: ErrorCode,
	},
	CommandReply {
		reply_userdata: u64,
		result: Result<Node, ErrorCode>,
	},
	Log {
		prefix: String,
		level: LogLevel,
		text: String,
	},
	ClientMessage(Vec<String>),
	StartFile(i64),
	EndFile {
		entry: i64,
		reason: EndFileReason,
	},
	Hook {
		reply_userdata: u64,
		name: String,
		id: u64,
	},
	Bare(EventId),
}

impl Pending {
	fn id(&self) -> EventId {
		match self {
			Self::Property { id, .. } => *id,
			Self::SetReply { .. } => EventId::SetPropertyReply,
			Self::CommandReply { .. } => EventId::CommandReply,
			Self::Log { .. } => EventId::LogMessage,
			Self::ClientMessage(_) => EventId::ClientMessage,
			Self::StartFile(_) => EventId::StartFile,
			Self::EndFile { .. } => EventId::EndFile,
			Self::Hook { .. } => EventId::Hook,
			Self::Bare(id) => *id,
		}
	}
}

struct Observer {
	reply_userdata: u64,
	name: String,
	format: Format,
}

#[derive(Default)]
struct ClientState {
	queue: VecDeque<Pending>,
	observers: Vec<Observer>,
	hooks: Vec<(u64, String)>,
	disabled: BTreeSet<c_int>,
	log_level: Option<LogLevel>,
}

pub(crate) struct Core {
	properties: BTreeMap<String, Value>,
	clients: BTreeMap<i64, ClientState>,
	next_client: i64,
	next_entry: i64,
	next_hook: u64,
	waiting_hooks: BTreeSet<u64>,
	initialized: bool,
	started: Instant,
}

impl Core {
	pub(crate) fn new() -> Self {
		let mut metadata = NodeMap::new();
		metadata.insert("title".to_owned(), Node::from("Big Buck Bunny"));
		let properties = BTreeMap::from([
			("pause".to_owned(), Value::Flag(false)),
			("volume".to_owned(), Value::Double(100.0)),
			("speed".to_owned(), Value::Double(1.0)),
			("playlist-count".to_owned(), Value::Int64(0)),
			("mpv-version".to_owned(), Value::from("mpv 0.38.0-fake")),
			("duration".to_owned(), Value::None),
			("metadata".to_owned(), Value::NodeMap(metadata)),
			("track-list".to_owned(), Value::NodeArray(Vec::new())),
		]);
		Self {
			properties,
			clients: BTreeMap::new(),
			next_client: 1,
			next_entry: 1,
			next_hook: 1,
			waiting_hooks: BTreeSet::new(),
			initialized: false,
			started: Instant::now(),
		}
	}

	pub(crate) fn add_client(&mut self) -> i64 {
		let id = self.next_client;
		self.next_client += 1;
		self.clients.insert(id, ClientState::default());
		id
	}

	pub(crate) fn remove_client(&mut self, id: i64) {
		self.clients.remove(&id);
	}

	pub(crate) fn initialize(&mut self) -> Result<(), ErrorCode> {
		if self.initialized {
			return Err(ErrorCode::InvalidParameter);
		}
		self.initialized = true;
		Ok(())
	}

	pub(crate) fn elapsed_us(&self) -> i64 {
		i64::try_from(self.started.elapsed().as_micros()).unwrap_or(i64::MAX)
	}

	pub(crate) fn load_config(&mut self, path: &Path) -> Result<(), ErrorCode> {
		let text = fs::read_to_string(path).map_err(|_| ErrorCode::InvalidParameter)?;
		for line in text.lines().map(str::trim) {
			if line.is_empty() || line.starts_with('#') {
				continue;
			}
			match line.split_once('=') {
				Some((name, value)) => self.set(name.trim(), parse_text(value.trim())),
				None => self.set(line, Value::Flag(true)),
			}
		}
		Ok(())
	}

	pub(crate) fn set(&mut self, name: &str, value: Value) {
		let value = match value {
			Value::Node(node) => node.into_data(),
			other => other,
		};
		self.properties.insert(name.to_owned(), value);
		self.notify(name);
	}

	pub(crate) fn get(&self, name: &str, format: Format) -> Result<Value, ErrorCode> {
		let value = self.properties.get(name).ok_or(ErrorCode::PropertyNotFound)?;
		if value.is_none() {
			return Err(ErrorCode::PropertyUnavailable);
		}
		convert(value, format).ok_or(ErrorCode::PropertyFormat)
	}

	pub(crate) fn get_text(&self, name: &str) -> Option<String> {
		self.properties.get(name).filter(|value| !value.is_none()).map(text_form)
	}

	pub(crate) fn push(&mut self, client: i64, event: Pending) {
		if let Some(state) = self.clients.get_mut(&client) {
			state.queue.push_back(event);
		}
	}

	fn broadcast(&mut self, event: impl Fn() -> Pending) {
		for state in self.clients.values_mut() {
			state.queue.push_back(event());
		}
	}

	pub(crate) fn next_event(&mut self, client: i64) -> Option<Pending> {
		let state = self.clients.get_mut(&client)?;
		while let Some(event) = state.queue.pop_front() {
			if !state.disabled.contains(&event.id().as_raw()) {
				return Some(event);
			}
		}
		None
	}

	pub(crate) fn observe(&mut self, client: i64, reply_userdata: u64, name: &str, format: Format) {
		let event = self.change_event(reply_userdata, name, format);
		if let Some(state) = self.clients.get_mut(&client) {
			state.observers.push(Observer {
				reply_userdata,
				name: name.to_owned(),
				format,
			});
			state.queue.push_back(event);
		}
	}

	pub(crate) fn unobserve(&mut self, client: i64, reply_userdata: u64) -> usize {
		let Some(state) = self.clients.get_mut(&client) else {
			return 0;
		};
		let before = state.observers.len();
		state.observers.retain(|observer| observer.reply_userdata != reply_userdata);
		before - state.observers.len()
	}

	fn notify(&mut self, name: &str) {
		let mut events = Vec::new();
		for (client, state) in &self.clients {
			for observer in state.observers.iter().filter(|observer| observer.name == name) {
				events.push((*client, observer.reply_userdata, observer.format));
			}
		}
		for (client, reply_userdata, format) in events {
			let event = self.change_event(reply_userdata, name, format);
			self.push(client, event);
		}
	}

	fn change_event(&self, reply_userdata: u64, name: &str, format: Format) -> Pending {
		let value = self.get(name, format).ok();
		Pending::Property {
			id: EventId::PropertyChange,
			reply_userdata,
			name: name.to_owned(),
			format: if value.is_some() { format } else { Format::None },
			value: Ok(value.unwrap_or_default()),
		}
	}

	pub(crate) fn request_event(&mut self, client: i64, id: c_int, enable: bool) -> Result<(), ErrorCode> {
		if !(0..=25).contains(&id) {
			return Err(ErrorCode::InvalidParameter);
		}
		let state = self.clients.get_mut(&client).ok_or(ErrorCode::InvalidParameter)?;
		if enable {
			state.disabled.remove(&id);
		} else {
			state.disabled.insert(id);
		}
		Ok(())
	}

	pub(crate) fn request_log(&mut self, client: i64, level: &str) -> Result<(), ErrorCode> {
		let level = LogLevel::from_name(level).ok_or(ErrorCode::InvalidParameter)?;
		let state = self.clients.get_mut(&client).ok_or(ErrorCode::InvalidParameter)?;
		state.log_level = (level != LogLevel::None).then_some(level);
		self.log("cplayer", LogLevel::Info, &format!("log level set to {level}\n"));
		Ok(())
	}

	fn log(&mut self, prefix: &str, level: LogLevel, text: &str) {
		for state in self.clients.values_mut() {
			if state.log_level.is_some_and(|threshold| level <= threshold) {
				state.queue.push_back(Pending::Log {
					prefix: prefix.to_owned(),
					level,
					text: text.to_owned(),
				});
			}
		}
	}

	pub(crate) fn add_hook(&mut self, client: i64, reply_userdata: u64, name: &str) -> Result<(), ErrorCode> {
		let state = self.clients.get_mut(&client).ok_or(ErrorCode::InvalidParameter)?;
		state.hooks.push((reply_userdata, name.to_owned()));
		Ok(())
	}

	pub(crate) fn continue_hook(&mut self, id: u64) -> Result<(), ErrorCode> {
		if self.waiting_hooks.remove(&id) {
			Ok(())
		} else {
			Err(ErrorCode::InvalidParameter)
		}
	}

	fn run_hooks(&mut self, name: &str) {
		let mut targets = Vec::new();
		for (client, state) in &self.clients {
			for (reply_userdata, _) in state.hooks.iter().filter(|(_, hook)| hook == name) {
				targets.push((*client, *reply_userdata));
			}
		}
		for (client, reply_userdata) in targets {
			let id = self.next_hook;
			self.next_hook += 1;
			self.waiting_hooks.insert(id);
			self.push(
				client,
				Pending::Hook {
					reply_userdata,
					name: name.to_owned(),
					id,
				},
			);
		}
	}

	pub(crate) fn shutdown(&mut self) {
		self.broadcast(|| Pending::Bare(EventId::Shutdown));
	}

	/// Run a command given as words; returns the command's result node.
	pub(crate) fn run(&mut self, args: &[String]) -> Result<Node, ErrorCode> {
		let (name, rest) = args.split_first().ok_or(ErrorCode::InvalidParameter)?;
		match (name.as_str(), rest) {
			("ignore", _) => Ok(Node::none()),
			("set", [property, value]) => {
				self.set(property, parse_text(value));
				Ok(Node::none())
			}
			("cycle", [property]) => {
				let current = self.get(property, Format::Flag)?;
				self.set(property, Value::Flag(!current.as_bool().unwrap_or_default()));
				Ok(Node::none())
			}
			("add", [property, amount]) => {
				let current = self.get(property, Format::Double)?.as_f64().unwrap_or_default();
				let amount: f64 = amount.parse().map_err(|_| ErrorCode::InvalidParameter)?;
				self.set(property, Value::Double(current + amount));
				Ok(Node::none())
			}
			("expand-text", [text]) => Ok(Node::from(self.expand(text))),
			("script-message", words) => {
				let words = words.to_vec();
				self.broadcast(|| Pending::ClientMessage(words.clone()));
				Ok(Node::none())
			}
			("loadfile", [path, ..]) => Ok(self.load_file(path)),
			("quit", _) => {
				self.shutdown();
				Ok(Node::none())
			}
			_ => Err(ErrorCode::InvalidParameter),
		}
	}

	fn load_file(&mut self, path: &str) -> Node {
		let entry = self.next_entry;
		self.next_entry += 1;
		let count = self.properties.get("playlist-count").and_then(Value::as_i64).unwrap_or_default();
		self.set("playlist-count", Value::Int64(count + 1));
		self.set("path", Value::from(path));

		self.run_hooks("on_load");
		self.broadcast(|| Pending::StartFile(entry));
		self.log("cplayer", LogLevel::Info, &format!("Playing: {path}\n"));
		self.broadcast(|| Pending::Bare(EventId::FileLoaded));
		self.broadcast(|| Pending::EndFile {
			entry,
			reason: EndFileReason::Eof,
		});

		let mut reply = NodeMap::new();
		reply.insert("playlist_entry_id".to_owned(), Node::from(entry));
		Node::from(reply)
	}

	fn expand(&self, text: &str) -> String {
		let mut out = String::new();
		let mut rest = text;
		while let Some(start) = rest.find("${") {
			out.push_str(&rest[..start]);
			let Some(len) = rest[start..].find('}') else {
				out.push_str(&rest[start..]);
				return out;
			};
			let name = &rest[start + 2..start + len];
			out.push_str(&self.get_text(name).unwrap_or_default());
			rest = &rest[start + len + 1..];
		}
		out.push_str(rest);
		out
	}
}

fn convert(value: &Value, format: Format) -> Option<Value> {
	match (format, value) {
		(Format::Node, value) => Some(Value::Node(Box::new(Node::new(value.clone())))),
		(Format::String | Format::OsdString, value) => Some(Value::String(text_form(value))),
		(Format::Double, Value::Int64(int)) => Some(Value::Double(*int as f64)),
		(format, value) if Format::of(value) == format => Some(value.clone()),
		_ => None,
	}
}

pub(crate) fn parse_text(text: &str) -> Value {
	match text {
		"yes" => Value::Flag(true),
		"no" => Value::Flag(false),
		_ => {
			if let Ok(int) = text.parse::<i64>() {
				Value::Int64(int)
			} else if let Ok(double) = text.parse::<f64>() {
				Value::Double(double)
			} else {
				Value::from(text)
			}
		}
	}
}

fn text_form(value: &Value) -> String {
	match value {
		Value::None | Value::ByteArray(_) => String::new(),
		Value::String(text) => text.clone(),
		Value::Flag(flag) => (if *flag { "yes" } else { "no" }).to_owned(),
		Value::Int64(int) => int.to_string(),
		Value::Double(double) => format!("{double:.6}"),
		Value::Node(node) => text_form(node.data()),
		Value::NodeArray(items) => {
			let items: Vec<String> = items.iter().map(|item| text_form(item.data())).collect();
			format!("[{}]", items.join(","))
		}
		Value::NodeMap(entries) => {
			let entries: Vec<String> = entries.iter().map(|(key, item)| format!("{key}={}", text_form(item.data()))).collect();
			format!("{{{}}}", entries.join(","))
		}
	}
}
