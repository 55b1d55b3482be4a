#![allow(missing_docs)]

use std::thread;

use mpvkit::mpv::{EndFileReason, ErrorCode, Event, EventId, EventPayload, Format, LogLevel, Mpv, MpvError, Node, Value};
use mpvkit_testkit::{fake_api, invalid_frees, outstanding_allocations};

fn player() -> Mpv {
	let mpv = Mpv::create(fake_api()).expect("fake core creates");
	mpv.initialize().expect("fake core initializes");
	mpv
}

fn next(mpv: &mut Mpv) -> Event {
	mpv.wait_event(0.0).expect("event decodes")
}

fn drain(mpv: &mut Mpv) -> Vec<Event> {
	let mut events = Vec::new();
	loop {
		let event = next(mpv);
		if event.is_none() {
			return events;
		}
		events.push(event);
	}
}

#[test]
fn empty_queue_yields_none_event() {
	let mut mpv = player();
	let event = next(&mut mpv);
	assert!(event.is_none());
	assert_eq!(event.payload, EventPayload::Empty);
	assert!(event.result().is_ok());
}

#[test]
fn observed_pause_reports_changes() {
	let mut mpv = player();
	mpv.observe_property("pause", Format::Flag, 11).expect("observe");

	let initial = next(&mut mpv);
	assert_eq!(initial.id, EventId::PropertyChange);
	assert_eq!(initial.reply_userdata, 11);
	assert_eq!(initial.property().map(|property| &property.value), Some(&Value::Flag(false)));

	mpv.set_property("pause", &Value::Flag(true), Format::Flag).expect("pause set");
	let changed = next(&mut mpv);
	let property = changed.property().expect("property payload");
	assert_eq!(property.name, "pause");
	assert_eq!(property.format, Format::Flag);
	assert_eq!(property.value, Value::Flag(true));

	assert_eq!(mpv.unobserve_property(11).expect("unobserve"), 1);
	mpv.set_property("pause", &Value::Flag(false), Format::Flag).expect("pause set");
	assert!(next(&mut mpv).is_none());
}

#[test]
fn unavailable_observed_property_has_no_value() {
	let mut mpv = player();
	mpv.observe_property("duration", Format::Double, 1).expect("observe");
	let event = next(&mut mpv);
	let property = event.property().expect("property payload");
	assert_eq!(property.format, Format::None);
	assert_eq!(property.value, Value::None);
}

#[test]
fn node_observation_decodes_tree() {
	let mut mpv = player();
	mpv.observe_property("metadata", Format::Node, 2).expect("observe");
	let event = next(&mut mpv);
	let node = event.property().and_then(|property| property.value.as_node()).expect("node value");
	assert_eq!(node.get("title"), Some(&Node::from("Big Buck Bunny")));
}

#[test]
fn async_replies_carry_userdata() {
	let mut mpv = player();
	mpv.get_property_async("volume", Format::Double, 21).expect("async get");
	mpv.get_property_async("no-such-property", Format::Double, 22).expect("async get");
	mpv.set_property_async("speed", &Value::Double(1.5), Format::Double, 23).expect("async set");

	let events = drain(&mut mpv);
	assert_eq!(events.len(), 3);

	assert_eq!(events[0].id, EventId::GetPropertyReply);
	assert_eq!(events[0].reply_userdata, 21);
	assert_eq!(events[0].property().map(|property| &property.value), Some(&Value::Double(100.0)));

	assert_eq!(events[1].reply_userdata, 22);
	assert_eq!(events[1].error, ErrorCode::PropertyNotFound);
	assert_eq!(events[1].payload, EventPayload::Empty);
	assert!(matches!(
		events[1].result(),
		Err(MpvError::Native {
			code: ErrorCode::PropertyNotFound
		})
	));

	assert_eq!(events[2].id, EventId::SetPropertyReply);
	assert_eq!(events[2].reply_userdata, 23);
	assert!(events[2].result().is_ok());
}

#[test]
fn loadfile_emits_file_lifecycle() {
	let mut mpv = player();
	mpv.command(&["loadfile", "/media/intro.mkv"]).expect("loadfile");

	let ids: Vec<EventId> = drain(&mut mpv).iter().map(|event| event.id).collect();
	assert_eq!(ids, [EventId::StartFile, EventId::FileLoaded, EventId::EndFile]);

	mpv.command(&["loadfile", "/media/second.mkv"]).expect("loadfile");
	let events = drain(&mut mpv);
	assert!(matches!(events[0].payload, EventPayload::StartFile(start) if start.playlist_entry_id == 2));
	let EventPayload::EndFile(end) = &events[2].payload else {
		panic!("expected end-file payload");
	};
	assert_eq!(end.reason, EndFileReason::Eof);
	assert_eq!(end.error, ErrorCode::Success);
	assert_eq!(end.playlist_entry_id, 2);
	assert_eq!(mpv.get_property("playlist-count", Format::Int64).expect("count"), Value::Int64(2));
}

#[test]
fn disabled_events_are_skipped() {
	let mut mpv = player();
	mpv.request_event(EventId::FileLoaded, false).expect("disable");
	mpv.command(&["loadfile", "a.mkv"]).expect("loadfile");
	let ids: Vec<EventId> = drain(&mut mpv).iter().map(|event| event.id).collect();
	assert_eq!(ids, [EventId::StartFile, EventId::EndFile]);

	assert!(matches!(
		mpv.request_event(EventId::Unknown(400), true),
		Err(MpvError::Native {
			code: ErrorCode::InvalidParameter
		})
	));
}

#[test]
fn hooks_pause_loading_until_continued() {
	let mut mpv = player();
	mpv.hook_add("on_load", 0, 5).expect("hook added");
	mpv.command(&["loadfile", "a.mkv"]).expect("loadfile");

	let hook = next(&mut mpv);
	assert_eq!(hook.id, EventId::Hook);
	assert_eq!(hook.reply_userdata, 5);
	let EventPayload::Hook(hook) = hook.payload else {
		panic!("expected hook payload");
	};
	assert_eq!(hook.name, "on_load");
	mpv.hook_continue(hook.id).expect("hook continues");
	assert!(mpv.hook_continue(hook.id).is_err());
}

#[test]
fn log_messages_arrive_at_requested_level() {
	let mut mpv = player();
	mpv.request_log_messages(LogLevel::Info).expect("log request");
	mpv.command(&["loadfile", "clip.mkv"]).expect("loadfile");

	let logs: Vec<_> = drain(&mut mpv)
		.into_iter()
		.filter_map(|event| match event.payload {
			EventPayload::LogMessage(message) => Some(message),
			_ => None,
		})
		.collect();
	assert_eq!(logs.len(), 2);
	assert!(logs.iter().all(|message| message.prefix == "cplayer" && message.level == LogLevel::Info));
	assert_eq!(logs[1].text, "Playing: clip.mkv\n");
	logs[1].emit();

	mpv.request_log_messages(LogLevel::Error).expect("quieter");
	mpv.command(&["loadfile", "clip.mkv"]).expect("loadfile");
	assert!(drain(&mut mpv).iter().all(|event| event.id != EventId::LogMessage));
}

#[test]
fn script_messages_reach_every_client() {
	let mut mpv = player();
	let mut other = mpv.create_client("listener").expect("client connects");
	mpv.command(&["script-message", "seek-to", "12"]).expect("script message");

	for client in [&mut mpv, &mut other] {
		let event = next(client);
		assert_eq!(event.payload, EventPayload::ClientMessage(vec!["seek-to".to_owned(), "12".to_owned()]));
	}
}

#[test]
fn terminate_shuts_down_other_clients() {
	let mpv = player();
	let mut other = mpv.create_client("observer").expect("client connects");
	mpv.terminate();
	assert_eq!(next(&mut other).id, EventId::Shutdown);
}

#[test]
fn quit_command_emits_shutdown() {
	let mut mpv = player();
	mpv.command_string("quit").expect("quit");
	assert_eq!(next(&mut mpv).id, EventId::Shutdown);
}

#[test]
fn waker_is_usable_from_other_threads() {
	let mut mpv = player();
	let waker = mpv.waker();
	thread::spawn(move || waker.wake()).join().expect("waker thread");
	mpv.wakeup();
	assert!(next(&mut mpv).is_none());
}

#[test]
fn handles_are_thread_safe() {
	fn assert_send_sync<T: Send + Sync>() {}
	assert_send_sync::<Mpv>();
	assert_send_sync::<mpvkit::mpv::Waker>();
}

#[test]
fn delivered_events_leave_nothing_behind() {
	let mut mpv = player();
	mpv.observe_property("metadata", Format::Node, 1).expect("observe");
	mpv.command_async(&["expand-text", "${pause}"], 2).expect("async command");
	drain(&mut mpv);
	assert_eq!(outstanding_allocations(), 0);
	assert_eq!(invalid_frees(), 0);
}
