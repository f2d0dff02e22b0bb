use jr_core::StructuredProgram;
use serde::{Deserialize, Serialize};

pub(crate) const PROGRAM_FILE_SCHEMA: &str = "structured-program.v1";
pub(crate) const PROGRAM_FILE_SUFFIX: &str = ".program.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProgramFileV1 {
    pub(crate) schema_version: String,
    pub(crate) program: StructuredProgram,
}

impl ProgramFileV1 {
    pub(crate) fn new(program: StructuredProgram) -> Self {
        Self {
            schema_version: PROGRAM_FILE_SCHEMA.to_string(),
            program,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LoadedProgram {
    pub(crate) relative_path: String,
    pub(crate) program: StructuredProgram,
}
