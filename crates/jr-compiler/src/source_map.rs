use std::ops::Range;

use jr_core::{ActorId, HandlerId, JuniorError, StructuredProgram};
use serde::{Deserialize, Serialize};

/// Start of one handler's run of lines in the flattened text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMapEntry {
    /// 1-based, inclusive. The run ends where the next entry starts.
    pub start_line: usize,
    pub actor_id: ActorId,
    pub handler_id: HandlerId,
}

/// Entries ordered by start line, plus the total number of flattened lines
/// so that the last entry's run is bounded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    entries: Vec<SourceMapEntry>,
    line_count: usize,
}

impl SourceMap {
    pub fn new(entries: Vec<SourceMapEntry>, line_count: usize) -> Self {
        Self {
            entries,
            line_count,
        }
    }

    pub fn entries(&self) -> &[SourceMapEntry] {
        &self.entries
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Lines covered by entry `index`, as a 1-based half-open range. Empty
    /// for handlers without a body.
    pub fn line_range(&self, index: usize) -> Option<Range<usize>> {
        let entry = self.entries.get(index)?;
        let end = self
            .entries
            .get(index + 1)
            .map(|next| next.start_line)
            .unwrap_or(self.line_count + 1);
        Some(entry.start_line..end)
    }
}

/// Where an error line lands in the structured program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Located {
    pub actor_id: ActorId,
    pub handler_id: HandlerId,
    /// 1-based line within the handler's body.
    pub line_within_handler: usize,
}

/// Map a 1-based line of the flattened text back to its handler.
///
/// `None` means the line is not inside user code: before the first entry,
/// past the end of the text, or the map is empty.
pub fn locate(source_map: &SourceMap, error_line: usize) -> Option<Located> {
    if error_line == 0 || error_line > source_map.line_count {
        return None;
    }

    let after = source_map
        .entries
        .partition_point(|entry| entry.start_line <= error_line);
    let entry = source_map.entries.get(after.checked_sub(1)?)?;

    Some(Located {
        actor_id: entry.actor_id,
        handler_id: entry.handler_id,
        line_within_handler: error_line - entry.start_line + 1,
    })
}

/// Check that `source_map` is a faithful map of `program`: one entry per
/// handler in tree order, runs sized by the handler bodies, no gaps and no
/// overlaps.
pub fn verify_source_map(
    program: &StructuredProgram,
    source_map: &SourceMap,
) -> Result<(), JuniorError> {
    let expected = program
        .actors()
        .iter()
        .flat_map(|actor| {
            actor
                .handlers()
                .iter()
                .map(move |handler| (actor.id(), handler.id(), handler.body().len()))
        })
        .collect::<Vec<_>>();

    if expected.len() != source_map.entries.len() {
        return Err(JuniorError::new(
            "SOURCE_MAP_COVERAGE",
            format!(
                "Expected {} entries, found {}.",
                expected.len(),
                source_map.entries.len()
            ),
        ));
    }

    let mut next_line = 1usize;
    for (index, ((actor_id, handler_id, body_len), entry)) in
        expected.iter().zip(&source_map.entries).enumerate()
    {
        if entry.actor_id != *actor_id || entry.handler_id != *handler_id {
            return Err(JuniorError::new(
                "SOURCE_MAP_ORDER",
                format!("Entry {} does not match handler {}.", index, handler_id),
            ));
        }
        if entry.start_line != next_line {
            return Err(JuniorError::new(
                "SOURCE_MAP_GAP",
                format!(
                    "Entry {} starts at line {}, expected {}.",
                    index, entry.start_line, next_line
                ),
            ));
        }
        next_line += body_len;
    }

    if next_line != source_map.line_count + 1 {
        return Err(JuniorError::new(
            "SOURCE_MAP_LINE_COUNT",
            format!(
                "Handlers cover {} line(s) but the text has {}.",
                next_line - 1,
                source_map.line_count
            ),
        ));
    }

    Ok(())
}
