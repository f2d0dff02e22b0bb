use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ProgramError;
use crate::id::{ActorId, HandlerId};
use crate::name::{assess_name, NameValidity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActorKind {
    Stage,
    Sprite,
}

/// The event that starts a handler. Flattening never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EventTrigger {
    GreenFlag,
    KeyPressed { key: String },
    Clicked,
    MessageReceived { message: String },
    StartAsClone,
}

impl EventTrigger {
    pub fn label(&self) -> String {
        match self {
            EventTrigger::GreenFlag => "when green flag clicked".to_string(),
            EventTrigger::KeyPressed { key } => format!("when key \"{}\" pressed", key),
            EventTrigger::Clicked => "when this actor clicked".to_string(),
            EventTrigger::MessageReceived { message } => {
                format!("when I receive \"{}\"", message)
            }
            EventTrigger::StartAsClone => "when I start as a clone".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handler {
    pub(crate) id: HandlerId,
    pub(crate) trigger: EventTrigger,
    pub(crate) body: Vec<String>,
}

impl Handler {
    pub(crate) fn new(trigger: EventTrigger) -> Self {
        Self {
            id: HandlerId::new(),
            trigger,
            body: Vec::new(),
        }
    }

    pub fn id(&self) -> HandlerId {
        self.id
    }

    pub fn trigger(&self) -> &EventTrigger {
        &self.trigger
    }

    pub fn body(&self) -> &[String] {
        &self.body
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub(crate) id: ActorId,
    pub(crate) kind: ActorKind,
    pub(crate) name: String,
    pub(crate) handlers: Vec<Handler>,
}

impl Actor {
    pub(crate) fn new(kind: ActorKind, name: &str) -> Self {
        Self {
            id: ActorId::new(),
            kind,
            name: name.to_string(),
            handlers: Vec::new(),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }

    pub fn handler(&self, handler_id: HandlerId) -> Option<&Handler> {
        self.handlers.iter().find(|handler| handler.id == handler_id)
    }

    pub fn is_stage(&self) -> bool {
        self.kind == ActorKind::Stage
    }
}

/// Root of the structured program: the stage first, then the sprites.
///
/// The fields are private so that every change goes through the edit
/// operations, which keep the stage at index 0 and all ids unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawStructuredProgram")]
pub struct StructuredProgram {
    pub(crate) actors: Vec<Actor>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStructuredProgram {
    actors: Vec<Actor>,
}

impl TryFrom<RawStructuredProgram> for StructuredProgram {
    type Error = ProgramError;

    fn try_from(raw: RawStructuredProgram) -> Result<Self, Self::Error> {
        let program = StructuredProgram { actors: raw.actors };
        program.validate()?;
        Ok(program)
    }
}

impl StructuredProgram {
    /// A program holding only a stage, with no handlers.
    pub fn new(stage_name: &str) -> Result<Self, ProgramError> {
        if let NameValidity::Invalid { reason } = assess_name(stage_name, &BTreeSet::new()) {
            return Err(ProgramError::NameInvalid {
                name: stage_name.to_string(),
                reason,
            });
        }
        Ok(Self {
            actors: vec![Actor::new(ActorKind::Stage, stage_name)],
        })
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn stage(&self) -> &Actor {
        &self.actors[0]
    }

    pub fn actor(&self, actor_id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id == actor_id)
    }

    pub fn actor_index(&self, actor_id: ActorId) -> Option<usize> {
        self.actors.iter().position(|actor| actor.id == actor_id)
    }

    pub fn handler(&self, actor_id: ActorId, handler_id: HandlerId) -> Option<&Handler> {
        self.actor(actor_id)
            .and_then(|actor| actor.handler(handler_id))
    }

    pub fn actor_names(&self) -> BTreeSet<String> {
        self.actors.iter().map(|actor| actor.name.clone()).collect()
    }

    pub fn handler_count(&self) -> usize {
        self.actors.iter().map(|actor| actor.handlers.len()).sum()
    }

    /// Check every structural invariant. Trees built through the edit
    /// operations always pass; this guards trees arriving from storage.
    pub fn validate(&self) -> Result<(), ProgramError> {
        let malformed = |reason: String| ProgramError::MalformedProgram { reason };

        let Some(first) = self.actors.first() else {
            return Err(malformed("program has no actors".to_string()));
        };
        if !first.is_stage() {
            return Err(malformed("first actor is not the stage".to_string()));
        }

        let mut actor_ids = BTreeSet::new();
        let mut handler_ids = BTreeSet::new();
        let mut names = BTreeSet::new();
        for (index, actor) in self.actors.iter().enumerate() {
            if index > 0 && actor.is_stage() {
                return Err(malformed(format!("actor {} is a second stage", index)));
            }
            if !actor_ids.insert(actor.id) {
                return Err(malformed(format!("duplicate actor id {}", actor.id)));
            }
            if let NameValidity::Invalid { reason } = assess_name(&actor.name, &names) {
                return Err(malformed(format!(
                    "actor name \"{}\" is invalid: {}",
                    actor.name, reason
                )));
            }
            names.insert(actor.name.clone());

            for handler in &actor.handlers {
                if !handler_ids.insert(handler.id) {
                    return Err(malformed(format!("duplicate handler id {}", handler.id)));
                }
                if let Some(line) = handler
                    .body
                    .iter()
                    .position(|line| line.contains(['\n', '\r']))
                {
                    return Err(malformed(format!(
                        "handler {} body line {} contains a line break",
                        handler.id, line
                    )));
                }
            }
        }

        Ok(())
    }
}
