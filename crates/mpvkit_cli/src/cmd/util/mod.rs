use mpvkit::mpv::{Event, EventPayload, Format, Node, Value};
use serde_json::json;

use crate::cmd::{CliError, Result};

/// Print a pretty JSON document to stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(payload)?);
	Ok(())
}

/// Print a JSON document on a single line, for streamed output.
pub(crate) fn emit_json_line<T: serde::Serialize>(payload: &T) -> Result<()> {
	println!("{}", serde_json::to_string(payload)?);
	Ok(())
}

/// JSON view of a value. Byte arrays become number arrays; non-finite doubles become null.
pub(crate) fn value_to_json(value: &Value) -> serde_json::Value {
	match value {
		Value::None => serde_json::Value::Null,
		Value::String(text) => serde_json::Value::String(text.clone()),
		Value::Flag(flag) => serde_json::Value::Bool(*flag),
		Value::Int64(int) => json!(int),
		Value::Double(double) => serde_json::Number::from_f64(*double).map_or(serde_json::Value::Null, serde_json::Value::Number),
		Value::Node(node) => node_to_json(node),
		Value::NodeArray(list) => serde_json::Value::Array(list.iter().map(node_to_json).collect()),
		Value::NodeMap(map) => serde_json::Value::Object(map.iter().map(|(key, node)| (key.clone(), node_to_json(node))).collect()),
		Value::ByteArray(bytes) => serde_json::Value::Array(bytes.iter().map(|byte| json!(byte)).collect()),
	}
}

pub(crate) fn node_to_json(node: &Node) -> serde_json::Value {
	value_to_json(node.data())
}

/// Node tree for a JSON document. Integers that fit `i64` stay integers.
pub(crate) fn json_to_node(value: &serde_json::Value) -> Node {
	match value {
		serde_json::Value::Null => Node::none(),
		serde_json::Value::Bool(flag) => Node::from(*flag),
		serde_json::Value::Number(number) => match number.as_i64() {
			Some(int) => Node::from(int),
			None => Node::from(number.as_f64().unwrap_or(f64::NAN)),
		},
		serde_json::Value::String(text) => Node::from(text.as_str()),
		serde_json::Value::Array(items) => Node::from(items.iter().map(json_to_node).collect::<Vec<_>>()),
		serde_json::Value::Object(map) => Node::from(map.iter().map(|(key, item)| (key.clone(), json_to_node(item))).collect::<mpvkit::mpv::NodeMap>()),
	}
}

/// Plain-text rendering: strings print raw, everything else as compact JSON.
pub(crate) fn render_value(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		Value::Node(node) => render_value(node.data()),
		other => value_to_json(other).to_string(),
	}
}

/// Parse command-line text into a value of `format`.
///
/// `node` accepts a JSON document and falls back to a plain string when the
/// text is not JSON, so `mpvkit set title hello --format node` works.
pub(crate) fn parse_value(text: &str, format: Format) -> Result<Value> {
	let invalid = |reason: String| CliError::InvalidValue {
		format,
		value: text.to_owned(),
		reason,
	};

	match format {
		Format::String | Format::OsdString => Ok(Value::from(text)),
		Format::Flag => match text {
			"yes" | "true" | "1" => Ok(Value::Flag(true)),
			"no" | "false" | "0" => Ok(Value::Flag(false)),
			_ => Err(invalid("expected yes/no".to_owned())),
		},
		Format::Int64 => text.parse::<i64>().map(Value::Int64).map_err(|err| invalid(err.to_string())),
		Format::Double => text.parse::<f64>().map(Value::Double).map_err(|err| invalid(err.to_string())),
		Format::Node => {
			let node = serde_json::from_str::<serde_json::Value>(text).map_or_else(|_| Node::from(text), |doc| json_to_node(&doc));
			Ok(Value::Node(Box::new(node)))
		}
		Format::None | Format::NodeArray | Format::NodeMap | Format::ByteArray => Err(invalid("format cannot be parsed from text".to_owned())),
	}
}

/// Serializable form of a decoded event.
#[derive(Debug, serde::Serialize)]
pub(crate) struct EventJson {
	pub event: String,
	pub reply_userdata: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<serde_json::Value>,
}

pub(crate) fn event_to_json(event: &Event) -> EventJson {
	let data = match &event.payload {
		EventPayload::Empty => None,
		EventPayload::Property(property) => Some(json!({
			"name": property.name,
			"format": property.format.as_str(),
			"value": value_to_json(&property.value),
		})),
		EventPayload::LogMessage(message) => Some(json!({
			"prefix": message.prefix,
			"level": message.level.as_str(),
			"text": message.text,
		})),
		EventPayload::ClientMessage(args) => Some(json!(args)),
		EventPayload::StartFile(start) => Some(json!({ "playlist_entry_id": start.playlist_entry_id })),
		EventPayload::EndFile(end) => Some(json!({
			"playlist_entry_id": end.playlist_entry_id,
			"playlist_insert_id": end.playlist_insert_id,
			"playlist_insert_num_entries": end.playlist_insert_num_entries,
			"reason": end.reason.as_str(),
			"error": (!end.error.is_success()).then(|| end.error.to_string()),
		})),
		EventPayload::Hook(hook) => Some(json!({ "name": hook.name, "id": hook.id })),
		EventPayload::CommandReply(node) => Some(node_to_json(node)),
	};

	EventJson {
		event: event.id.as_str().to_owned(),
		reply_userdata: event.reply_userdata,
		error: (!event.error.is_success()).then(|| event.error.to_string()),
		data,
	}
}

/// One-line text rendering of a decoded event.
pub(crate) fn event_line(event: &Event) -> String {
	let mut line = event.id.to_string();
	match &event.payload {
		EventPayload::Empty => {}
		EventPayload::Property(property) => line.push_str(&format!(" {}={}", property.name, render_value(&property.value))),
		EventPayload::LogMessage(message) => line.push_str(&format!(" [{}] {}: {}", message.prefix, message.level, message.text.trim_end())),
		EventPayload::ClientMessage(args) => {
			for arg in args {
				line.push(' ');
				line.push_str(arg);
			}
		}
		EventPayload::StartFile(start) => line.push_str(&format!(" entry={}", start.playlist_entry_id)),
		EventPayload::EndFile(end) => line.push_str(&format!(" entry={} reason={}", end.playlist_entry_id, end.reason.as_str())),
		EventPayload::Hook(hook) => line.push_str(&format!(" {} id={}", hook.name, hook.id)),
		EventPayload::CommandReply(node) => line.push_str(&format!(" {}", render_value(node.data()))),
	}
	if event.reply_userdata != 0 {
		line.push_str(&format!(" (userdata {})", event.reply_userdata));
	}
	if !event.error.is_success() {
		line.push_str(&format!(" error: {}", event.error));
	}
	line
}
