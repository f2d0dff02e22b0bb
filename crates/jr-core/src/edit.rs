//! Structural edit operations on a [`StructuredProgram`].
//!
//! Every operation validates its arguments before touching the tree, so an
//! `Err` always leaves the program exactly as it was. Callers that want undo
//! keep a clone of the program from before the edit.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::error::ProgramError;
use crate::id::{ActorId, HandlerId};
use crate::name::{assess_name, NameValidity};
use crate::types::{Actor, ActorKind, EventTrigger, Handler, StructuredProgram};

impl StructuredProgram {
    /// Insert a new sprite with no handlers immediately after the actor at
    /// `after_index`. Index 0 (the stage) is a valid anchor.
    pub fn insert_actor(&mut self, after_index: usize, name: &str) -> Result<ActorId, ProgramError> {
        if after_index >= self.actors.len() {
            return Err(ProgramError::IndexOutOfRange {
                index: after_index,
                len: self.actors.len(),
            });
        }
        check_name(name, &self.actor_names())?;

        let actor = Actor::new(ActorKind::Sprite, name);
        let actor_id = actor.id;
        self.actors.insert(after_index + 1, actor);
        debug!(%actor_id, name, position = after_index + 1, "actor inserted");
        Ok(actor_id)
    }

    pub fn append_sprite(&mut self, name: &str) -> Result<ActorId, ProgramError> {
        self.insert_actor(self.actors.len() - 1, name)
    }

    /// Remove a sprite and all its handlers. Returns the id of the actor that
    /// should take focus: the previous actor in display order.
    pub fn delete_actor(&mut self, actor_id: ActorId) -> Result<ActorId, ProgramError> {
        if self.stage().id == actor_id {
            return Err(ProgramError::CannotDeleteStage);
        }
        let index = self.require_actor_index(actor_id)?;

        self.actors.remove(index);
        let replacement = self.actors[index - 1].id;
        debug!(%actor_id, %replacement, "actor deleted");
        Ok(replacement)
    }

    pub fn rename_actor(&mut self, actor_id: ActorId, name: &str) -> Result<(), ProgramError> {
        let index = self.require_actor_index(actor_id)?;
        let other_names = self
            .actors
            .iter()
            .filter(|actor| actor.id != actor_id)
            .map(|actor| actor.name.clone())
            .collect::<BTreeSet<_>>();
        check_name(name, &other_names)?;

        self.actors[index].name = name.to_string();
        debug!(%actor_id, name, "actor renamed");
        Ok(())
    }

    /// Permute the actors. The stage must stay at position 0.
    pub fn reorder_actors(&mut self, new_order: &[ActorId]) -> Result<(), ProgramError> {
        let current = self.actors.iter().map(|actor| actor.id).collect::<Vec<_>>();
        check_permutation(&current, new_order)?;
        if new_order.first() != Some(&self.stage().id) {
            return Err(ProgramError::OrderMismatch {
                reason: "the stage must stay first".to_string(),
            });
        }

        let mut by_id = std::mem::take(&mut self.actors)
            .into_iter()
            .map(|actor| (actor.id, actor))
            .collect::<HashMap<_, _>>();
        self.actors = new_order
            .iter()
            .filter_map(|actor_id| by_id.remove(actor_id))
            .collect();
        debug!(actors = self.actors.len(), "actors reordered");
        Ok(())
    }

    /// Insert an empty-bodied handler. `None` inserts at the front, `Some(i)`
    /// immediately after the handler at index `i`.
    pub fn insert_handler(
        &mut self,
        actor_id: ActorId,
        after_index: Option<usize>,
        trigger: EventTrigger,
    ) -> Result<HandlerId, ProgramError> {
        let actor = self.require_actor_mut(actor_id)?;
        let position = match after_index {
            None => 0,
            Some(index) if index < actor.handlers.len() => index + 1,
            Some(index) => {
                return Err(ProgramError::IndexOutOfRange {
                    index,
                    len: actor.handlers.len(),
                })
            }
        };

        let handler = Handler::new(trigger);
        let handler_id = handler.id;
        actor.handlers.insert(position, handler);
        debug!(%actor_id, %handler_id, position, "handler inserted");
        Ok(handler_id)
    }

    pub fn delete_handler(
        &mut self,
        actor_id: ActorId,
        handler_id: HandlerId,
    ) -> Result<(), ProgramError> {
        let actor = self.require_actor_mut(actor_id)?;
        let index = actor
            .handlers
            .iter()
            .position(|handler| handler.id == handler_id)
            .ok_or(ProgramError::UnknownHandler {
                actor_id,
                handler_id,
            })?;

        actor.handlers.remove(index);
        debug!(%actor_id, %handler_id, "handler deleted");
        Ok(())
    }

    pub fn reorder_handlers(
        &mut self,
        actor_id: ActorId,
        new_order: &[HandlerId],
    ) -> Result<(), ProgramError> {
        let actor = self.require_actor_mut(actor_id)?;
        let current = actor
            .handlers
            .iter()
            .map(|handler| handler.id)
            .collect::<Vec<_>>();
        check_permutation(&current, new_order)?;

        let mut by_id = std::mem::take(&mut actor.handlers)
            .into_iter()
            .map(|handler| (handler.id, handler))
            .collect::<HashMap<_, _>>();
        actor.handlers = new_order
            .iter()
            .filter_map(|handler_id| by_id.remove(handler_id))
            .collect();
        debug!(%actor_id, "handlers reordered");
        Ok(())
    }

    /// Replace one handler's body wholesale. Lines may not contain line breaks.
    pub fn set_handler_body(
        &mut self,
        actor_id: ActorId,
        handler_id: HandlerId,
        lines: Vec<String>,
    ) -> Result<(), ProgramError> {
        let handler = self.require_handler_mut(actor_id, handler_id)?;
        if let Some(index) = lines.iter().position(|line| line.contains(['\n', '\r'])) {
            return Err(ProgramError::MultilineBodyLine { index });
        }

        debug!(%actor_id, %handler_id, lines = lines.len(), "handler body replaced");
        handler.body = lines;
        Ok(())
    }

    /// Split `text` into lines and replace the handler's body with them.
    pub fn set_handler_body_text(
        &mut self,
        actor_id: ActorId,
        handler_id: HandlerId,
        text: &str,
    ) -> Result<(), ProgramError> {
        let lines = text.lines().map(str::to_string).collect();
        self.set_handler_body(actor_id, handler_id, lines)
    }

    pub fn set_handler_trigger(
        &mut self,
        actor_id: ActorId,
        handler_id: HandlerId,
        trigger: EventTrigger,
    ) -> Result<(), ProgramError> {
        let handler = self.require_handler_mut(actor_id, handler_id)?;
        handler.trigger = trigger;
        debug!(%actor_id, %handler_id, "handler trigger replaced");
        Ok(())
    }

    fn require_actor_index(&self, actor_id: ActorId) -> Result<usize, ProgramError> {
        self.actor_index(actor_id)
            .ok_or(ProgramError::UnknownActor { actor_id })
    }

    fn require_actor_mut(&mut self, actor_id: ActorId) -> Result<&mut Actor, ProgramError> {
        self.actors
            .iter_mut()
            .find(|actor| actor.id == actor_id)
            .ok_or(ProgramError::UnknownActor { actor_id })
    }

    fn require_handler_mut(
        &mut self,
        actor_id: ActorId,
        handler_id: HandlerId,
    ) -> Result<&mut Handler, ProgramError> {
        self.require_actor_mut(actor_id)?
            .handlers
            .iter_mut()
            .find(|handler| handler.id == handler_id)
            .ok_or(ProgramError::UnknownHandler {
                actor_id,
                handler_id,
            })
    }
}

fn check_name(name: &str, existing_names: &BTreeSet<String>) -> Result<(), ProgramError> {
    match assess_name(name, existing_names) {
        NameValidity::Valid => Ok(()),
        NameValidity::Invalid { reason } => Err(ProgramError::NameInvalid {
            name: name.to_string(),
            reason,
        }),
    }
}

fn check_permutation<T: Ord + Copy>(current: &[T], proposed: &[T]) -> Result<(), ProgramError> {
    if current.len() != proposed.len() {
        return Err(ProgramError::OrderMismatch {
            reason: format!("expected {} id(s), got {}", current.len(), proposed.len()),
        });
    }
    let proposed_set = proposed.iter().copied().collect::<BTreeSet<_>>();
    if proposed_set.len() != proposed.len() {
        return Err(ProgramError::OrderMismatch {
            reason: "an id appears more than once".to_string(),
        });
    }
    if proposed_set != current.iter().copied().collect::<BTreeSet<_>>() {
        return Err(ProgramError::OrderMismatch {
            reason: "the ids differ from the existing ones".to_string(),
        });
    }
    Ok(())
}
