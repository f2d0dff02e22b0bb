//! Stable identifiers for actors and handlers.
//!
//! Identifiers are random v4 UUIDs, allocated once and never reused. Display
//! order lives in the tree, not in the identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of an actor (the stage or a sprite).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(Uuid);

/// Identifier of one handler within an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerId(Uuid);

impl ActorId {
    /// Allocate a fresh identifier.
    pub fn new() -> Self {
        ActorId(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        ActorId(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl HandlerId {
    /// Allocate a fresh identifier.
    pub fn new() -> Self {
        HandlerId(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        HandlerId(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for HandlerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ActorId {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw).map(ActorId)
    }
}

impl FromStr for HandlerId {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw).map(HandlerId)
    }
}
