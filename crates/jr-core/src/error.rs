use thiserror::Error;

use crate::id::{ActorId, HandlerId};

/// Error value shared by every layer above the model, tagged with a stable code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct JuniorError {
    pub code: String,
    pub message: String,
}

impl JuniorError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Recoverable failures of structural edits. The tree is never modified when
/// one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgramError {
    #[error("Name \"{name}\" is not allowed: {reason}")]
    NameInvalid { name: String, reason: String },
    #[error("New order does not match existing order: {reason}")]
    OrderMismatch { reason: String },
    #[error("No actor with id {actor_id}.")]
    UnknownActor { actor_id: ActorId },
    #[error("No handler with id {handler_id} in actor {actor_id}.")]
    UnknownHandler {
        actor_id: ActorId,
        handler_id: HandlerId,
    },
    #[error("The stage cannot be deleted.")]
    CannotDeleteStage,
    #[error("Index {index} is out of range for {len} item(s).")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Body line {index} contains a line break.")]
    MultilineBodyLine { index: usize },
    #[error("Malformed program: {reason}")]
    MalformedProgram { reason: String },
}

impl ProgramError {
    pub fn code(&self) -> &'static str {
        match self {
            ProgramError::NameInvalid { .. } => "PROGRAM_NAME_INVALID",
            ProgramError::OrderMismatch { .. } => "PROGRAM_ORDER_MISMATCH",
            ProgramError::UnknownActor { .. } => "PROGRAM_UNKNOWN_ACTOR",
            ProgramError::UnknownHandler { .. } => "PROGRAM_UNKNOWN_HANDLER",
            ProgramError::CannotDeleteStage => "PROGRAM_CANNOT_DELETE_STAGE",
            ProgramError::IndexOutOfRange { .. } => "PROGRAM_INDEX_OUT_OF_RANGE",
            ProgramError::MultilineBodyLine { .. } => "PROGRAM_MULTILINE_BODY_LINE",
            ProgramError::MalformedProgram { .. } => "PROGRAM_MALFORMED",
        }
    }
}

impl From<ProgramError> for JuniorError {
    fn from(error: ProgramError) -> Self {
        JuniorError::new(error.code(), error.to_string())
    }
}
