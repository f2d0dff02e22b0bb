pub mod edit;
pub mod error;
pub mod focus;
pub mod id;
pub mod name;
pub mod types;

pub use error::{JuniorError, ProgramError};
pub use focus::EditFocus;
pub use id::{ActorId, HandlerId};
pub use name::{assess_name, NameValidity};
pub use types::*;
