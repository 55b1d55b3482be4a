#![allow(missing_docs)]

use mpvkit::mpv::{ErrorCode, EventId, EventPayload, Format, Mpv, MpvError, Node, Value};
use mpvkit_testkit::{fake_api, invalid_frees, outstanding_allocations};

fn player() -> Mpv {
	let mpv = Mpv::create(fake_api()).expect("fake core creates");
	mpv.initialize().expect("fake core initializes");
	mpv
}

#[test]
fn string_commands_forward_arguments() {
	let mpv = player();
	mpv.command(&["set", "volume", "30"]).expect("set command");
	assert_eq!(mpv.get_property("volume", Format::Double).expect("volume"), Value::Double(30.0));

	mpv.command_string("cycle pause").expect("cycle command");
	assert_eq!(mpv.get_property("pause", Format::Flag).expect("pause"), Value::Flag(true));

	mpv.command(&["add", "volume", "-5"]).expect("add command");
	assert_eq!(mpv.get_property("volume", Format::Double).expect("volume"), Value::Double(25.0));

	assert!(matches!(
		mpv.command(&["no-such-command"]),
		Err(MpvError::Native {
			code: ErrorCode::InvalidParameter
		})
	));
	assert!(mpv.command::<&str>(&[]).is_err());
}

#[test]
fn node_command_returns_result_node() {
	let mpv = player();
	let reply = mpv.command_node(&Node::string_list(["expand-text", "vol=${volume}"])).expect("node command");
	assert_eq!(reply, Node::from("vol=100.000000"));

	let reply = mpv.command_node(&Node::string_list(["loadfile", "a.mkv"])).expect("loadfile node command");
	assert_eq!(reply.get("playlist_entry_id"), Some(&Node::from(1_i64)));

	let reply = mpv.command_node(&Node::string_list(["ignore"])).expect("empty result");
	assert_eq!(reply, Node::none());

	assert_eq!(outstanding_allocations(), 0);
	assert_eq!(invalid_frees(), 0);
}

#[test]
fn node_command_accepts_mixed_scalars() {
	let mpv = player();
	let args = Node::from(vec![Node::from("set"), Node::from("speed"), Node::from(2_i64)]);
	mpv.command_node(&args).expect("mixed args");
	assert_eq!(mpv.get_property("speed", Format::Double).expect("speed"), Value::Double(2.0));
}

#[test]
fn command_ret_returns_result_node() {
	let mpv = player();
	let reply = mpv.command_ret(&["expand-text", "${mpv-version}"]).expect("command_ret");
	assert_eq!(reply.data(), &Value::from("mpv 0.38.0-fake"));
	assert_eq!(outstanding_allocations(), 0);
	assert_eq!(invalid_frees(), 0);
}

#[test]
fn async_commands_reply_with_nodes() {
	let mut mpv = player();
	mpv.command_node_async(&Node::string_list(["expand-text", "${pause}"]), 31).expect("async node command");
	mpv.command_async(&["no-such-command"], 32).expect("async command is queued");
	mpv.abort_async_command(32);
	mpv.wait_async_requests();

	let reply = mpv.wait_event(0.0).expect("reply decodes");
	assert_eq!(reply.id, EventId::CommandReply);
	assert_eq!(reply.reply_userdata, 31);
	assert_eq!(reply.payload, EventPayload::CommandReply(Node::from("no")));

	let failed = mpv.wait_event(0.0).expect("failed reply decodes");
	assert_eq!(failed.reply_userdata, 32);
	assert_eq!(failed.error, ErrorCode::InvalidParameter);
	assert_eq!(failed.payload, EventPayload::Empty);
}

#[test]
fn byte_array_command_args_are_rejected_before_the_call() {
	let mpv = player();
	let args = Node::from(vec![Node::from("set"), Node::from(b"raw".to_vec())]);
	assert!(matches!(mpv.command_node(&args), Err(MpvError::Unsupported { format: Format::ByteArray, .. })));
}
