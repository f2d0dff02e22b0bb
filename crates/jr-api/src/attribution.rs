use std::sync::Arc;

use jr_compiler::{locate, FlattenedProgram};
use jr_core::{ActorId, HandlerId, StructuredProgram};
use jr_runtime::RunResult;
use serde::Serialize;

/// Where a failed run should be shown to the learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Attribution {
    #[serde(rename_all = "camelCase")]
    Located {
        actor_id: ActorId,
        actor_name: String,
        handler_id: HandlerId,
        line_within_handler: usize,
        message: String,
    },
    /// The error did not come from a line of user code.
    #[serde(rename_all = "camelCase")]
    Unattributable { message: String },
}

/// Outcome of one run, together with the exact snapshot that ran.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub snapshot: Arc<FlattenedProgram>,
    pub result: RunResult,
    pub attribution: Option<Attribution>,
}

/// Resolve a run result against the snapshot that produced it. `program` is
/// used only to look up the actor's display name.
pub fn attribute(
    program: &StructuredProgram,
    snapshot: &FlattenedProgram,
    result: &RunResult,
) -> Option<Attribution> {
    let RunResult::Failed {
        error_line,
        message,
        ..
    } = result
    else {
        return None;
    };

    let located = error_line.and_then(|line| locate(snapshot.source_map(), line));
    let attribution = match located {
        Some(found) => Attribution::Located {
            actor_id: found.actor_id,
            actor_name: program
                .actor(found.actor_id)
                .map(|actor| actor.name().to_string())
                .unwrap_or_default(),
            handler_id: found.handler_id,
            line_within_handler: found.line_within_handler,
            message: message.clone(),
        },
        None => Attribution::Unattributable {
            message: message.clone(),
        },
    };
    Some(attribution)
}
