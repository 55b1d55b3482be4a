use mpvkit::mpv::{Format, Value};

use crate::cmd::util::{emit_json, render_value, value_to_json};
use crate::cmd::{FormatArg, Result, Session};

#[derive(clap::Args)]
pub struct Args {
	/// Property name, e.g. `volume` or `metadata/title`.
	pub name: String,
	#[arg(long, value_enum, default_value_t = FormatArg::Node)]
	pub format: FormatArg,
}

/// Read one property and print it.
pub fn run(session: &Session, args: Args) -> Result<()> {
	let Args { name, format } = args;
	let format = Format::from(format);
	let value = query(session, &name, format)?;

	if session.json {
		return emit_json(&GetJson {
			name,
			format: format.as_str(),
			value: value_to_json(&value),
		});
	}

	println!("{}", render_value(&value));
	Ok(())
}

pub(crate) fn query(session: &Session, name: &str, format: Format) -> Result<Value> {
	let mpv = session.player()?;
	Ok(mpv.get_property(name, format)?)
}

#[derive(serde::Serialize)]
struct GetJson {
	name: String,
	format: &'static str,
	value: serde_json::Value,
}
