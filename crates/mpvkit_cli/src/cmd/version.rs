use crate::cmd::util::emit_json;
use crate::cmd::{CliError, Result, Session};

/// Print the client API version and, when a core starts, the player version.
pub fn run(session: &Session) -> Result<()> {
	let report = query(session);
	if session.json {
		return emit_json(&report);
	}

	println!("client api: {}", report.client_api);
	if let Some(mpv) = &report.mpv {
		println!("player: {mpv}");
	}
	Ok(())
}

pub(crate) fn query(session: &Session) -> VersionJson {
	let (major, minor) = session.api().client_api_version();
	let mpv = match session.player().and_then(|mpv| mpv.get_property_string("mpv-version").map_err(CliError::from)) {
		Ok(version) => Some(version),
		Err(err) => {
			tracing::debug!(%err, "player version unavailable");
			None
		}
	};

	VersionJson {
		client_api: format!("{major}.{minor}"),
		mpv,
	}
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct VersionJson {
	pub client_api: String,
	pub mpv: Option<String>,
}
