use jr_core::{HandlerId, StructuredProgram};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::source_map::{SourceMap, SourceMapEntry};

/// The whole program as one executable text, with the map back to handlers.
///
/// Always rebuilt from the tree in one go; never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedProgram {
    text: String,
    source_map: SourceMap,
}

impl FlattenedProgram {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    pub fn line_count(&self) -> usize {
        self.source_map.line_count()
    }

    /// 1-based line at which the handler's body starts. For an empty body this
    /// is where the next body would start.
    pub fn handler_start_line(&self, handler_id: HandlerId) -> Option<usize> {
        self.source_map
            .entries()
            .iter()
            .find(|entry| entry.handler_id == handler_id)
            .map(|entry| entry.start_line)
    }
}

/// Concatenate every handler body, actors in tree order and handlers in tree
/// order within each actor, one body line per text line.
///
/// Every handler gets exactly one map entry, including handlers with an empty
/// body. An empty handler's entry shares its start line with whatever follows.
pub fn flatten(program: &StructuredProgram) -> FlattenedProgram {
    let mut lines: Vec<&str> = Vec::new();
    let mut entries = Vec::with_capacity(program.handler_count());

    for actor in program.actors() {
        for handler in actor.handlers() {
            entries.push(SourceMapEntry {
                start_line: lines.len() + 1,
                actor_id: actor.id(),
                handler_id: handler.id(),
            });
            lines.extend(handler.body().iter().map(String::as_str));
        }
    }

    let line_count = lines.len();
    debug!(
        actors = program.actors().len(),
        handlers = entries.len(),
        lines = line_count,
        "program flattened"
    );

    FlattenedProgram {
        text: lines.join("\n"),
        source_map: SourceMap::new(entries, line_count),
    }
}
