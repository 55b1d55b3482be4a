use mpvkit_testkit::fake_api;

use crate::cmd::Session;

pub(crate) fn fake_session(json: bool) -> Session {
	Session::new(fake_api(), json)
}
