use mpvkit::mpv::{Event, EventId, EventPayload};

use super::{Args, WatchLimits, prepare, pump};
use crate::cmd::CliError;
use crate::cmd::test_support::fake_session;
use crate::cmd::util::event_line;

fn args() -> Args {
	Args {
		observe: Vec::new(),
		load: None,
		timeout: 0.0,
		max_events: None,
		log_level: None,
		follow: false,
	}
}

fn collect(args: &Args) -> Vec<Event> {
	let mut mpv = fake_session(false).player().expect("fake player");
	let limits = prepare(&mpv, args).expect("watch setup");
	let mut events = Vec::new();
	let count = pump(&mut mpv, limits, |event| {
		events.push(event.clone());
		Ok(())
	})
	.expect("events decode");
	assert_eq!(count, events.len());
	events
}

#[test]
fn observers_use_their_position_as_userdata() {
	let events = collect(&Args {
		observe: vec!["pause".to_owned(), "volume".to_owned()],
		..args()
	});
	let lines: Vec<String> = events.iter().map(event_line).collect();
	assert_eq!(lines, ["property-change pause=false (userdata 1)", "property-change volume=100.0 (userdata 2)"]);
}

#[test]
fn loading_a_file_streams_its_lifecycle() {
	let events = collect(&Args {
		load: Some("clip.mkv".to_owned()),
		log_level: Some("info".to_owned()),
		..args()
	});
	let ids: Vec<EventId> = events.iter().map(|event| event.id).collect();
	assert_eq!(
		ids,
		[EventId::LogMessage, EventId::StartFile, EventId::LogMessage, EventId::FileLoaded, EventId::EndFile]
	);
	assert!(matches!(&events[2].payload, EventPayload::LogMessage(message) if message.text == "Playing: clip.mkv\n"));
}

#[test]
fn event_limit_stops_early() {
	let events = collect(&Args {
		load: Some("clip.mkv".to_owned()),
		max_events: Some(2),
		..args()
	});
	assert_eq!(events.len(), 2);
	assert_eq!(events[0].id, EventId::StartFile);
}

#[test]
fn shutdown_ends_the_stream() {
	let session = fake_session(false);
	let mut mpv = session.player().expect("fake player");
	mpv.command(&["quit"]).expect("quit");
	let limits = WatchLimits {
		timeout: 0.0,
		max_events: None,
		follow: true,
	};
	let mut seen = Vec::new();
	pump(&mut mpv, limits, |event| {
		seen.push(event.id);
		Ok(())
	})
	.expect("shutdown decodes");
	assert_eq!(seen, [EventId::Shutdown]);
}

#[test]
fn unknown_log_level_is_rejected() {
	let mpv = fake_session(false).player().expect("fake player");
	let err = prepare(
		&mpv,
		&Args {
			log_level: Some("loud".to_owned()),
			..args()
		},
	)
	.expect_err("bad level");
	assert!(matches!(err, CliError::LogLevel(name) if name == "loud"));
}

#[test]
fn sink_errors_stop_the_loop() {
	let mut mpv = fake_session(false).player().expect("fake player");
	let limits = prepare(
		&mpv,
		&Args {
			observe: vec!["pause".to_owned(), "speed".to_owned()],
			..args()
		},
	)
	.expect("watch setup");
	let err = pump(&mut mpv, limits, |_| Err(CliError::LogLevel("sink".to_owned()))).expect_err("sink failure propagates");
	assert!(matches!(err, CliError::LogLevel(_)));
}
