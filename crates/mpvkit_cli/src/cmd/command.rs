use mpvkit::mpv::Node;

use crate::cmd::util::{emit_json, node_to_json, render_value};
use crate::cmd::{Result, Session};

#[derive(clap::Args)]
pub struct Args {
	/// Command name followed by its arguments, e.g. `expand-text '${volume}'`.
	#[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
	pub args: Vec<String>,
}

/// Run a command as a node list and print its result node.
pub fn run(session: &Session, args: Args) -> Result<()> {
	let reply = execute(session, &args.args)?;
	if session.json {
		return emit_json(&node_to_json(&reply));
	}

	if !reply.data().is_none() {
		println!("{}", render_value(reply.data()));
	}
	Ok(())
}

pub(crate) fn execute(session: &Session, args: &[String]) -> Result<Node> {
	let mpv = session.player()?;
	Ok(mpv.command_node(&Node::string_list(args.iter().map(String::as_str)))?)
}
