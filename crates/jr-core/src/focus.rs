use tracing::debug;

use crate::error::ProgramError;
use crate::id::ActorId;
use crate::types::StructuredProgram;

/// Which actor the editor is focused on.
///
/// Setting focus does not consult the tree. Deleting requires the caller to
/// name the actor it believes is focused; a mismatch means the caller's view
/// has diverged from ours and is a bug in the caller, so it panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditFocus {
    focused_actor: ActorId,
}

impl EditFocus {
    pub fn new(focused_actor: ActorId) -> Self {
        Self { focused_actor }
    }

    /// Focus the stage of a freshly loaded program.
    pub fn boot_for_program(program: &StructuredProgram) -> Self {
        Self::new(program.stage().id())
    }

    pub fn focused_actor(&self) -> ActorId {
        self.focused_actor
    }

    pub fn set_focused_actor(&mut self, actor_id: ActorId) {
        debug!(%actor_id, "focus moved");
        self.focused_actor = actor_id;
    }

    /// Delete the focused actor and adopt the replacement focus.
    ///
    /// # Panics
    ///
    /// Panics if `claimed_id` is not the focused actor. Neither the program
    /// nor the focus is changed in that case.
    pub fn delete_focused_actor(
        &mut self,
        program: &mut StructuredProgram,
        claimed_id: ActorId,
    ) -> Result<ActorId, ProgramError> {
        assert!(
            claimed_id == self.focused_actor,
            "focus mismatch: trying to delete actor {} but actor {} is focused",
            claimed_id,
            self.focused_actor
        );

        let replacement = program.delete_actor(claimed_id)?;
        self.set_focused_actor(replacement);
        Ok(replacement)
    }
}
