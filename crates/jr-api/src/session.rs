use std::sync::Arc;

use jr_compiler::{flatten, FlattenedProgram};
use jr_core::{
    assess_name, ActorId, EditFocus, EventTrigger, HandlerId, NameValidity, ProgramError,
    StructuredProgram,
};
use jr_runtime::ExecutionHost;
use tracing::{debug, info};

use crate::attribution::{attribute, Attribution, RunReport};

pub const DEFAULT_STAGE_NAME: &str = "Stage";

#[derive(Debug, Clone, Default)]
pub struct EditingSessionOptions {
    pub stage_name: Option<String>,
}

/// The program being edited, the editor focus, and a cached flattening.
///
/// The cache is dropped by every successful edit and rebuilt on the next
/// request. Callers get an `Arc` snapshot, so a run in progress keeps the
/// text and map it started with however the tree changes afterwards.
#[derive(Debug, Clone)]
pub struct EditingSession {
    program: StructuredProgram,
    focus: EditFocus,
    flattened: Option<Arc<FlattenedProgram>>,
}

impl EditingSession {
    pub fn new(options: EditingSessionOptions) -> Result<Self, ProgramError> {
        let stage_name = options
            .stage_name
            .unwrap_or_else(|| DEFAULT_STAGE_NAME.to_string());
        Ok(Self::from_program(StructuredProgram::new(&stage_name)?))
    }

    pub fn from_program(program: StructuredProgram) -> Self {
        let focus = EditFocus::boot_for_program(&program);
        Self {
            program,
            focus,
            flattened: None,
        }
    }

    pub fn program(&self) -> &StructuredProgram {
        &self.program
    }

    pub fn into_program(self) -> StructuredProgram {
        self.program
    }

    pub fn focused_actor(&self) -> ActorId {
        self.focus.focused_actor()
    }

    pub fn set_focused_actor(&mut self, actor_id: ActorId) {
        self.focus.set_focused_actor(actor_id);
    }

    /// Judge a candidate name for a new actor against this program.
    pub fn assess_name(&self, candidate: &str) -> NameValidity {
        assess_name(candidate, &self.program.actor_names())
    }

    /// # Panics
    ///
    /// Panics if `claimed_id` is not the focused actor.
    pub fn delete_focused_actor(&mut self, claimed_id: ActorId) -> Result<ActorId, ProgramError> {
        let replacement = self
            .focus
            .delete_focused_actor(&mut self.program, claimed_id)?;
        self.invalidate();
        Ok(replacement)
    }

    pub fn insert_actor(&mut self, after_index: usize, name: &str) -> Result<ActorId, ProgramError> {
        self.edit(|program| program.insert_actor(after_index, name))
    }

    pub fn append_sprite(&mut self, name: &str) -> Result<ActorId, ProgramError> {
        self.edit(|program| program.append_sprite(name))
    }

    /// Delete any sprite. If it held focus, focus moves to the replacement.
    pub fn delete_actor(&mut self, actor_id: ActorId) -> Result<ActorId, ProgramError> {
        let replacement = self.edit(|program| program.delete_actor(actor_id))?;
        if self.focus.focused_actor() == actor_id {
            self.focus.set_focused_actor(replacement);
        }
        Ok(replacement)
    }

    pub fn rename_actor(&mut self, actor_id: ActorId, name: &str) -> Result<(), ProgramError> {
        self.edit(|program| program.rename_actor(actor_id, name))
    }

    pub fn reorder_actors(&mut self, new_order: &[ActorId]) -> Result<(), ProgramError> {
        self.edit(|program| program.reorder_actors(new_order))
    }

    pub fn insert_handler(
        &mut self,
        actor_id: ActorId,
        after_index: Option<usize>,
        trigger: EventTrigger,
    ) -> Result<HandlerId, ProgramError> {
        self.edit(|program| program.insert_handler(actor_id, after_index, trigger))
    }

    pub fn delete_handler(
        &mut self,
        actor_id: ActorId,
        handler_id: HandlerId,
    ) -> Result<(), ProgramError> {
        self.edit(|program| program.delete_handler(actor_id, handler_id))
    }

    pub fn reorder_handlers(
        &mut self,
        actor_id: ActorId,
        new_order: &[HandlerId],
    ) -> Result<(), ProgramError> {
        self.edit(|program| program.reorder_handlers(actor_id, new_order))
    }

    pub fn set_handler_body(
        &mut self,
        actor_id: ActorId,
        handler_id: HandlerId,
        lines: Vec<String>,
    ) -> Result<(), ProgramError> {
        self.edit(|program| program.set_handler_body(actor_id, handler_id, lines))
    }

    pub fn set_handler_body_text(
        &mut self,
        actor_id: ActorId,
        handler_id: HandlerId,
        text: &str,
    ) -> Result<(), ProgramError> {
        self.edit(|program| program.set_handler_body_text(actor_id, handler_id, text))
    }

    pub fn set_handler_trigger(
        &mut self,
        actor_id: ActorId,
        handler_id: HandlerId,
        trigger: EventTrigger,
    ) -> Result<(), ProgramError> {
        self.edit(|program| program.set_handler_trigger(actor_id, handler_id, trigger))
    }

    pub fn is_flattening_cached(&self) -> bool {
        self.flattened.is_some()
    }

    /// The flattening of the current tree, rebuilt if any edit happened
    /// since the last call.
    pub fn flattened(&mut self) -> Arc<FlattenedProgram> {
        if let Some(cached) = &self.flattened {
            return Arc::clone(cached);
        }
        let rebuilt = Arc::new(flatten(&self.program));
        self.flattened = Some(Arc::clone(&rebuilt));
        rebuilt
    }

    /// Run the current flattening and attribute any error to its handler.
    /// A located error moves focus to the actor that owns the handler.
    pub fn run(&mut self, host: &dyn ExecutionHost) -> RunReport {
        let snapshot = self.flattened();
        info!(lines = snapshot.line_count(), "running program");
        let result = host.run(snapshot.text());
        let attribution = attribute(&self.program, &snapshot, &result);

        if let Some(Attribution::Located { actor_id, .. }) = &attribution {
            self.focus.set_focused_actor(*actor_id);
        }

        RunReport {
            snapshot,
            result,
            attribution,
        }
    }

    fn edit<T>(
        &mut self,
        operation: impl FnOnce(&mut StructuredProgram) -> Result<T, ProgramError>,
    ) -> Result<T, ProgramError> {
        let outcome = operation(&mut self.program);
        match &outcome {
            Ok(_) => self.invalidate(),
            Err(error) => debug!(code = error.code(), %error, "edit rejected"),
        }
        outcome
    }

    fn invalidate(&mut self) {
        self.flattened = None;
    }
}
