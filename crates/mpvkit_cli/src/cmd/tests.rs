use mpvkit::mpv::{ErrorCode, Format, MpvError, Node, Value};

use crate::cmd::test_support::fake_session;
use crate::cmd::{CliError, FormatArg, command, get, set, version};

#[test]
fn version_reports_api_and_player() {
	let report = version::query(&fake_session(true));
	assert_eq!(report.client_api, "2.5");
	assert_eq!(report.mpv.as_deref(), Some("mpv 0.38.0-fake"));
}

#[test]
fn get_reads_in_the_requested_format() {
	let session = fake_session(false);
	assert_eq!(get::query(&session, "volume", Format::Double).expect("volume"), Value::Double(100.0));
	assert_eq!(get::query(&session, "pause", Format::String).expect("pause"), Value::from("no"));

	let metadata = get::query(&session, "metadata", Format::Node).expect("metadata");
	assert_eq!(metadata.as_node().and_then(|node| node.get("title")), Some(&Node::from("Big Buck Bunny")));
}

#[test]
fn get_surfaces_native_errors() {
	let err = get::query(&fake_session(false), "no-such-property", Format::Node).expect_err("missing property");
	assert!(matches!(
		err,
		CliError::Mpv(MpvError::Native {
			code: ErrorCode::PropertyNotFound
		})
	));
}

#[test]
fn set_parses_and_reads_back() {
	let mpv = fake_session(false).player().expect("fake player");
	let stored = set::apply(&mpv, "volume", "55.5", Format::Double).expect("double set");
	assert_eq!(stored.as_node().map(Node::data), Some(&Value::Double(55.5)));

	let stored = set::apply(&mpv, "title", "intro", Format::String).expect("string set");
	assert_eq!(stored.as_node().map(Node::data), Some(&Value::from("intro")));

	let stored = set::apply(&mpv, "user-data/tags", r#"["a","b"]"#, Format::Node).expect("node set");
	assert_eq!(stored.as_node(), Some(&Node::string_list(["a", "b"])));

	assert!(matches!(
		set::apply(&mpv, "pause", "maybe", Format::Flag),
		Err(CliError::InvalidValue { format: Format::Flag, .. })
	));
}

#[test]
fn command_returns_the_result_node() {
	let session = fake_session(false);
	let args = ["expand-text".to_owned(), "vol=${volume}".to_owned()];
	assert_eq!(command::execute(&session, &args).expect("expand-text"), Node::from("vol=100.000000"));
	assert!(command::execute(&session, &["no-such-command".to_owned()]).is_err());
}

#[test]
fn format_args_map_to_wire_formats() {
	assert_eq!(Format::from(FormatArg::Osd), Format::OsdString);
	assert_eq!(Format::from(FormatArg::Int64), Format::Int64);
	assert_eq!(Format::from(FormatArg::Node), Format::Node);
}
