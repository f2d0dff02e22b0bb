mod attribution;
mod session;

pub use attribution::{attribute, Attribution, RunReport};
pub use session::{EditingSession, EditingSessionOptions, DEFAULT_STAGE_NAME};
