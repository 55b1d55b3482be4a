use mpvkit::mpv::{Format, Mpv, Value};

use crate::cmd::util::{emit_json, parse_value, render_value, value_to_json};
use crate::cmd::{FormatArg, Result, Session};

#[derive(clap::Args)]
pub struct Args {
	/// Property name.
	pub name: String,
	/// New value; parsed according to `--format`.
	pub value: String,
	#[arg(long, value_enum, default_value_t = FormatArg::String)]
	pub format: FormatArg,
}

/// Set one property on a fresh core and print the value read back.
pub fn run(session: &Session, args: Args) -> Result<()> {
	let Args { name, value, format } = args;
	let mpv = session.player()?;
	let stored = apply(&mpv, &name, &value, format.into())?;

	if session.json {
		return emit_json(&SetJson {
			name,
			value: value_to_json(&stored),
		});
	}

	println!("{name} = {}", render_value(&stored));
	Ok(())
}

/// Write `text` as `format`, then read the property back as a node.
pub(crate) fn apply(mpv: &Mpv, name: &str, text: &str, format: Format) -> Result<Value> {
	match format {
		Format::String => mpv.set_property_string(name, text)?,
		format => mpv.set_property(name, &parse_value(text, format)?, format)?,
	}
	tracing::debug!(name, %format, "property set");
	Ok(mpv.get_property(name, Format::Node)?)
}

#[derive(serde::Serialize)]
struct SetJson {
	name: String,
	value: serde_json::Value,
}
