use crate::mpv::{EndFileReason, EventId, Format, LogLevel, Node, Value};

#[test]
fn format_tags_match_wire_constants() {
	let expected = [
		(Format::None, 0),
		(Format::String, 1),
		(Format::OsdString, 2),
		(Format::Flag, 3),
		(Format::Int64, 4),
		(Format::Double, 5),
		(Format::Node, 6),
		(Format::NodeArray, 7),
		(Format::NodeMap, 8),
		(Format::ByteArray, 9),
	];
	for (format, raw) in expected {
		assert_eq!(format.as_raw(), raw, "{format}");
		assert_eq!(Format::from_raw(raw), Some(format));
	}
	assert_eq!(Format::from_raw(10), None);
	assert_eq!(Format::from_raw(-1), None);
}

#[test]
fn aliases_share_tags() {
	assert_eq!(Format::BOOLEAN, Format::Flag);
	assert_eq!(Format::FLOAT64.as_raw(), 5);
}

#[test]
fn tag_of_follows_value_shape() {
	assert_eq!(Format::of(&Value::None), Format::None);
	assert_eq!(Format::of(&Value::from("x")), Format::String);
	assert_eq!(Format::of(&Value::from(true)), Format::Flag);
	assert_eq!(Format::of(&Value::from(1_i64)), Format::Int64);
	assert_eq!(Format::of(&Value::from(1.5)), Format::Double);
	assert_eq!(Format::of(&Value::NodeArray(Vec::new())), Format::NodeArray);
	assert_eq!(Format::of(&Value::Node(Box::new(Node::from(1_i64)))), Format::Node);
	assert_eq!(Format::of(&Value::ByteArray(vec![1])), Format::ByteArray);
}

#[test]
fn osd_string_accepts_text_only() {
	assert!(Format::OsdString.accepts(&Value::from("osd")));
	assert!(!Format::OsdString.accepts(&Value::from(3_i64)));
	assert!(Format::None.accepts(&Value::None));
	assert!(!Format::Int64.accepts(&Value::None));
}

#[test]
fn containers_are_node_kinds() {
	let containers: Vec<_> = (0..10).filter_map(Format::from_raw).filter(|format| format.is_container()).collect();
	assert_eq!(containers, vec![Format::Node, Format::NodeArray, Format::NodeMap]);
}

#[test]
fn log_level_names_and_bands() {
	assert_eq!(LogLevel::None.as_str(), "no");
	assert_eq!(LogLevel::V.as_str(), "v");
	assert_eq!(LogLevel::from_raw(40), LogLevel::Info);
	assert_eq!(LogLevel::from_raw(45), LogLevel::V);
	assert_eq!(LogLevel::from_raw(-3), LogLevel::None);
	assert_eq!(LogLevel::from_raw(900), LogLevel::Trace);
	for level in LogLevel::ALL {
		assert_eq!(LogLevel::from_raw(level.as_raw()), level);
		assert_eq!(LogLevel::from_name(level.as_str()), Some(level));
	}
	assert_eq!(LogLevel::from_name("verbose"), None);
}

#[test]
fn event_ids_keep_reserved_gaps() {
	for raw in 0..=25 {
		let id = EventId::from_raw(raw);
		assert_eq!(id.as_raw(), raw);
		assert!(!matches!(id, EventId::Unknown(_)), "id {raw} should be known");
	}
	assert_eq!(EventId::from_raw(22), EventId::PropertyChange);
	assert_eq!(EventId::from_raw(99), EventId::Unknown(99));
	assert!(EventId::Tick.is_deprecated());
	assert!(!EventId::Hook.is_deprecated());
	assert_eq!(EventId::QueueOverflow.as_str(), "event-queue-overflow");
}

#[test]
fn end_file_reason_skips_one() {
	assert_eq!(EndFileReason::from_raw(0), EndFileReason::Eof);
	assert_eq!(EndFileReason::from_raw(1), EndFileReason::Unknown(1));
	assert_eq!(EndFileReason::from_raw(5), EndFileReason::Redirect);
	assert_eq!(EndFileReason::Unknown(7).as_raw(), 7);
}
