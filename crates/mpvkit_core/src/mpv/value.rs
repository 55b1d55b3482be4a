use std::collections::BTreeMap;

use crate::mpv::{Format, MpvError, Result};

/// Ordered node sequence; positions are significant.
pub type NodeList = Vec<Node>;

/// String-keyed node mapping. Key order carries no meaning on the wire.
pub type NodeMap = BTreeMap<String, Node>;

/// Host-side dynamic value, one variant per wire format.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	/// No data.
	#[default]
	None,
	/// Text, used by both string tags.
	String(String),
	/// Boolean.
	Flag(bool),
	/// Signed integer.
	Int64(i64),
	/// Float.
	Double(f64),
	/// Nested self-describing node.
	Node(Box<Node>),
	/// Ordered node list.
	NodeArray(NodeList),
	/// Keyed node map.
	NodeMap(NodeMap),
	/// Raw bytes.
	ByteArray(Vec<u8>),
}

impl Value {
	/// Static label of the runtime variant.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::None => "none",
			Self::String(_) => "string",
			Self::Flag(_) => "flag",
			Self::Int64(_) => "int64",
			Self::Double(_) => "double",
			Self::Node(_) => "node",
			Self::NodeArray(_) => "node-array",
			Self::NodeMap(_) => "node-map",
			Self::ByteArray(_) => "byte-array",
		}
	}

	/// Whether this is [`Value::None`].
	pub fn is_none(&self) -> bool {
		matches!(self, Self::None)
	}

	/// Borrow text.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(v) => Some(v),
			_ => None,
		}
	}

	/// Read a flag.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Flag(v) => Some(*v),
			_ => None,
		}
	}

	/// Read an integer.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Int64(v) => Some(*v),
			_ => None,
		}
	}

	/// Read a float.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Double(v) => Some(*v),
			_ => None,
		}
	}

	/// Borrow a node list.
	pub fn as_list(&self) -> Option<&NodeList> {
		match self {
			Self::NodeArray(v) => Some(v),
			_ => None,
		}
	}

	/// Borrow a node map.
	pub fn as_map(&self) -> Option<&NodeMap> {
		match self {
			Self::NodeMap(v) => Some(v),
			_ => None,
		}
	}

	/// Borrow raw bytes.
	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			Self::ByteArray(v) => Some(v),
			_ => None,
		}
	}

	/// Borrow a nested node.
	pub fn as_node(&self) -> Option<&Node> {
		match self {
			Self::Node(v) => Some(v),
			_ => None,
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Flag(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int64(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Double(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<Vec<u8>> for Value {
	fn from(value: Vec<u8>) -> Self {
		Self::ByteArray(value)
	}
}

impl From<NodeList> for Value {
	fn from(value: NodeList) -> Self {
		Self::NodeArray(value)
	}
}

impl From<NodeMap> for Value {
	fn from(value: NodeMap) -> Self {
		Self::NodeMap(value)
	}
}

impl From<Node> for Value {
	fn from(value: Node) -> Self {
		Self::Node(Box::new(value))
	}
}

/// Dynamic `(format, value)` pair mirroring the native tagged union.
///
/// The tag always matches the shape of the data: `Format::None` holds
/// exactly [`Value::None`], and every other tag holds its own variant.
/// Only tags a node cell can carry are stored: `OsdString` becomes `String`,
/// and a [`Value::Node`] payload is unwrapped into the outer node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
	data: Value,
	format: Format,
}

impl Node {
	/// Build a node tagged with the value's natural format.
	pub fn new(data: Value) -> Self {
		match data {
			Value::Node(inner) => *inner,
			data => {
				let format = Format::of(&data);
				Self { data, format }
			}
		}
	}

	/// Build a node with an explicit tag, validating the value's shape.
	///
	/// `OsdString` is request-only and is stored as `String`.
	pub fn with_format(data: Value, format: Format) -> Result<Self> {
		if !format.accepts(&data) {
			return Err(MpvError::FormatMismatch { format, found: data.kind() });
		}
		Ok(match format {
			Format::OsdString => Self { data, format: Format::String },
			_ => Self::new(data),
		})
	}

	/// The empty node.
	pub fn none() -> Self {
		Self::default()
	}

	/// Node list of strings, the shape taken by node commands.
	pub fn string_list<I, S>(items: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::new(Value::NodeArray(items.into_iter().map(|item| Node::new(Value::String(item.into()))).collect()))
	}

	/// Borrow the value.
	pub fn data(&self) -> &Value {
		&self.data
	}

	/// Wire tag of the value.
	pub fn format(&self) -> Format {
		self.format
	}

	/// Take the value.
	pub fn into_data(self) -> Value {
		self.data
	}

	/// Look up a map entry.
	pub fn get(&self, key: &str) -> Option<&Node> {
		self.data.as_map().and_then(|map| map.get(key))
	}

	/// Look up a list element.
	pub fn at(&self, index: usize) -> Option<&Node> {
		self.data.as_list().and_then(|list| list.get(index))
	}
}

macro_rules! node_from {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for Node {
				fn from(value: $ty) -> Self {
					Self::new(Value::from(value))
				}
			}
		)*
	};
}

node_from!(bool, i64, f64, &str, String, Vec<u8>, NodeList, NodeMap);
