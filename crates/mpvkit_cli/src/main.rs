#![allow(missing_docs)]

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "mpvkit", about = "Query and drive libmpv from the command line")]
struct Cli {
	/// libmpv shared library to load instead of the default search.
	#[arg(long, global = true)]
	lib: Option<PathBuf>,
	/// Raise log verbosity (`-v` debug, `-vv` trace); `RUST_LOG` takes precedence.
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
	/// Print JSON instead of plain text.
	#[arg(long, global = true)]
	json: bool,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print the client API version of the loaded library.
	Version,
	/// Print a property.
	Get(cmd::get::Args),
	/// Set a property.
	Set(cmd::set::Args),
	/// Run a command and print its result node.
	Command(cmd::command::Args),
	/// Print decoded events.
	Watch(cmd::watch::Args),
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	if let Err(err) = run(cli) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_tracing(verbose: u8) {
	let fallback = match verbose {
		0 => "warn",
		1 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
	tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();
}

fn run(cli: Cli) -> cmd::Result<()> {
	let session = cmd::Session::load(cli.lib, cli.json)?;

	match cli.command {
		Commands::Version => cmd::version::run(&session),
		Commands::Get(args) => cmd::get::run(&session, args),
		Commands::Set(args) => cmd::set::run(&session, args),
		Commands::Command(args) => cmd::command::run(&session, args),
		Commands::Watch(args) => cmd::watch::run(&session, args),
	}
}
