use std::ffi::{CString, c_char, c_int, c_void};
use std::ptr;

use crate::mpv::sys::{mpv_node, mpv_node_list};
use crate::mpv::{Direction, Format, MpvError, Node, NodeList, NodeMap, Result, Value};

/// Wire cell built from a host value, together with every buffer it points into.
///
/// The cell and the buffers stay at fixed addresses until the value is dropped,
/// which releases all of them exactly once. Native calls only borrow the memory.
pub struct Encoded {
	cell: Box<mpv_node>,
	format: Format,
	arena: Arena,
}

impl Encoded {
	/// Zeroed destination cell for a native call that writes a value of `format`.
	pub fn placeholder(format: Format) -> Self {
		let mut cell = Box::new(mpv_node::zeroed());
		cell.format = format.as_raw();
		Self {
			cell,
			format,
			arena: Arena::default(),
		}
	}

	/// Tag this value was encoded for.
	pub fn format(&self) -> Format {
		self.format
	}

	/// Borrow the encoded cell.
	pub fn node(&self) -> &mpv_node {
		&self.cell
	}

	/// Pointer in the shape native calls expect for [`Encoded::format`].
	///
	/// `Node` gets a pointer to the whole cell; every other tag gets a pointer to
	/// the cell's payload (`char**`, `int*`, `int64_t*`, `double*`, `mpv_node_list**`).
	pub fn data_ptr(&mut self) -> *mut c_void {
		match self.format {
			Format::Node => ptr::from_mut::<mpv_node>(&mut self.cell).cast(),
			_ => ptr::addr_of_mut!(self.cell.u).cast(),
		}
	}

	/// Number of native buffers owned besides the cell.
	pub fn allocations(&self) -> usize {
		self.arena.len()
	}
}

/// Encode `value` as a wire cell of `format`.
///
/// [`Value::None`] yields a zeroed destination cell for any tag.
pub fn encode(value: &Value, format: Format) -> Result<Encoded> {
	if value.is_none() {
		return Ok(Encoded::placeholder(format));
	}

	let mut arena = Arena::default();
	let cell = match (format, value) {
		(Format::Node, Value::Node(inner)) => encode_cell(&mut arena, inner)?,
		(Format::ByteArray, Value::ByteArray(_)) => {
			return Err(MpvError::Unsupported {
				format,
				direction: Direction::Encode,
			});
		}
		(format, value) if format != Format::Node && format.accepts(value) => {
			let mut cell = encode_payload(&mut arena, value)?;
			cell.format = format.as_raw();
			cell
		}
		(format, value) => return Err(MpvError::FormatMismatch { format, found: value.kind() }),
	};

	Ok(Encoded {
		cell: Box::new(cell),
		format,
		arena,
	})
}

/// Encode a node so that native calls taking `mpv_node*` can borrow it.
pub fn encode_node(node: &Node) -> Result<Encoded> {
	let mut arena = Arena::default();
	let cell = encode_cell(&mut arena, node)?;
	Ok(Encoded {
		cell: Box::new(cell),
		format: Format::Node,
		arena,
	})
}

fn encode_cell(arena: &mut Arena, node: &Node) -> Result<mpv_node> {
	let mut cell = encode_payload(arena, node.data())?;
	cell.format = node.format().as_raw();
	Ok(cell)
}

fn encode_payload(arena: &mut Arena, value: &Value) -> Result<mpv_node> {
	let mut cell = mpv_node::zeroed();
	match value {
		Value::None => {}
		Value::String(text) => cell.u.string = arena.string(text)?,
		Value::Flag(flag) => cell.u.flag = c_int::from(*flag),
		Value::Int64(int) => cell.u.int64 = *int,
		Value::Double(double) => cell.u.double_ = *double,
		Value::NodeArray(items) => cell.u.list = encode_list(arena, items)?,
		Value::NodeMap(entries) => cell.u.list = encode_map(arena, entries)?,
		Value::Node(_) | Value::ByteArray(_) => {
			return Err(MpvError::Unsupported {
				format: Format::of(value),
				direction: Direction::Encode,
			});
		}
	}
	Ok(cell)
}

fn encode_list(arena: &mut Arena, items: &NodeList) -> Result<*mut mpv_node_list> {
	let mut values = Vec::with_capacity(items.len());
	for item in items {
		values.push(encode_cell(arena, item)?);
	}

	let header = mpv_node_list {
		num: list_len(items.len())?,
		values: arena.cells(values),
		keys: ptr::null_mut(),
	};
	Ok(arena.header(header))
}

fn encode_map(arena: &mut Arena, entries: &NodeMap) -> Result<*mut mpv_node_list> {
	let mut values = Vec::with_capacity(entries.len());
	let mut keys = Vec::with_capacity(entries.len());
	for (key, item) in entries {
		keys.push(arena.string(key)?);
		values.push(encode_cell(arena, item)?);
	}

	let header = mpv_node_list {
		num: list_len(entries.len())?,
		values: arena.cells(values),
		keys: arena.keys(keys),
	};
	Ok(arena.header(header))
}

fn list_len(len: usize) -> Result<c_int> {
	c_int::try_from(len).map_err(|_| MpvError::MalformedWire {
		format: Format::NodeArray,
		reason: "list length exceeds native int",
	})
}

/// Owner of every buffer reachable from one encoded cell.
///
/// Heap contents of `CString` and `Box` do not move when the owners are pushed,
/// so pointers handed out stay valid until the arena drops.
#[derive(Default)]
struct Arena {
	strings: Vec<CString>,
	cells: Vec<Box<[mpv_node]>>,
	keys: Vec<Box<[*mut c_char]>>,
	headers: Vec<Box<mpv_node_list>>,
}

impl Arena {
	fn len(&self) -> usize {
		self.strings.len() + self.cells.len() + self.keys.len() + self.headers.len()
	}

	fn string(&mut self, text: &str) -> Result<*mut c_char> {
		let owned = CString::new(text)?;
		let ptr = owned.as_ptr().cast_mut();
		self.strings.push(owned);
		Ok(ptr)
	}

	fn cells(&mut self, values: Vec<mpv_node>) -> *mut mpv_node {
		if values.is_empty() {
			return ptr::null_mut();
		}
		let mut boxed = values.into_boxed_slice();
		let ptr = boxed.as_mut_ptr();
		self.cells.push(boxed);
		ptr
	}

	fn keys(&mut self, keys: Vec<*mut c_char>) -> *mut *mut c_char {
		if keys.is_empty() {
			return ptr::null_mut();
		}
		let mut boxed = keys.into_boxed_slice();
		let ptr = boxed.as_mut_ptr();
		self.keys.push(boxed);
		ptr
	}

	fn header(&mut self, header: mpv_node_list) -> *mut mpv_node_list {
		let mut boxed = Box::new(header);
		let ptr = ptr::from_mut::<mpv_node_list>(&mut boxed);
		self.headers.push(boxed);
		ptr
	}
}
