mod flatten;
mod source_map;

pub use flatten::{flatten, FlattenedProgram};
pub use source_map::{locate, verify_source_map, Located, SourceMap, SourceMapEntry};

#[cfg(test)]
mod tests;
