use mpvkit::mpv::{Event, EventId, EventPayload, Format, LogLevel, Mpv};

use crate::cmd::util::{emit_json_line, event_line, event_to_json};
use crate::cmd::{CliError, Result, Session};

#[derive(clap::Args)]
pub struct Args {
	/// Property to observe as a node; repeatable. Userdata is the 1-based position.
	#[arg(long = "observe", value_name = "NAME")]
	pub observe: Vec<String>,
	/// File to load once observers are registered.
	#[arg(long)]
	pub load: Option<String>,
	/// Seconds to wait for each event.
	#[arg(long, default_value_t = 1.0)]
	pub timeout: f64,
	/// Stop after printing this many events.
	#[arg(long)]
	pub max_events: Option<usize>,
	/// Request log messages at this level (`fatal`, `error`, `warn`, `info`, `v`, `debug`, `trace`).
	#[arg(long)]
	pub log_level: Option<String>,
	/// Keep waiting when a wait times out instead of stopping.
	#[arg(long)]
	pub follow: bool,
}

/// Loop termination settings.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WatchLimits {
	pub timeout: f64,
	pub max_events: Option<usize>,
	pub follow: bool,
}

/// Print decoded events until shutdown, a timeout, or the event limit.
pub fn run(session: &Session, args: Args) -> Result<()> {
	let mut mpv = session.player()?;
	let limits = prepare(&mpv, &args)?;
	let json = session.json;

	let printed = pump(&mut mpv, limits, |event| {
		if json {
			emit_json_line(&event_to_json(event))
		} else {
			println!("{}", event_line(event));
			Ok(())
		}
	})?;
	tracing::debug!(printed, "watch finished");
	Ok(())
}

/// Register observers and log requests, then start loading `--load`.
pub(crate) fn prepare(mpv: &Mpv, args: &Args) -> Result<WatchLimits> {
	for (index, name) in args.observe.iter().enumerate() {
		mpv.observe_property(name, Format::Node, index as u64 + 1)?;
	}
	if let Some(name) = &args.log_level {
		let level = LogLevel::from_name(name).ok_or_else(|| CliError::LogLevel(name.clone()))?;
		mpv.request_log_messages(level)?;
	}
	if let Some(path) = &args.load {
		mpv.command(&["loadfile", path.as_str()])?;
	}

	Ok(WatchLimits {
		timeout: args.timeout,
		max_events: args.max_events,
		follow: args.follow,
	})
}

/// Drain events into `sink`; returns how many were handed over.
///
/// Log lines are also forwarded to `tracing` before reaching the sink.
pub(crate) fn pump(mpv: &mut Mpv, limits: WatchLimits, mut sink: impl FnMut(&Event) -> Result<()>) -> Result<usize> {
	let mut count = 0;
	loop {
		let event = mpv.wait_event(limits.timeout)?;
		if event.is_none() {
			if limits.follow {
				continue;
			}
			break;
		}

		if let EventPayload::LogMessage(message) = &event.payload {
			message.emit();
		}
		sink(&event)?;
		count += 1;

		if event.id == EventId::Shutdown || limits.max_events.is_some_and(|max| count >= max) {
			break;
		}
	}
	Ok(count)
}

#[cfg(test)]
mod tests;
