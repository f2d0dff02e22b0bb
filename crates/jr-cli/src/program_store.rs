use std::fs;
use std::path::Path;

use jr_core::{JuniorError, StructuredProgram};

use crate::{
    map_cli_program_encode, map_cli_program_invalid, map_cli_program_read, map_cli_program_write,
    ProgramFileV1, PROGRAM_FILE_SCHEMA,
};

pub(crate) fn save_program_file(
    path: &Path,
    program: &StructuredProgram,
) -> Result<(), JuniorError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(map_cli_program_write)?;

    let payload = serde_json::to_string_pretty(&ProgramFileV1::new(program.clone()))
        .map_err(map_cli_program_encode)?;
    fs::write(path, payload).map_err(map_cli_program_write)
}

pub(crate) fn load_program_file(path: &Path) -> Result<StructuredProgram, JuniorError> {
    if !path.exists() {
        return Err(JuniorError::new(
            "CLI_PROGRAM_NOT_FOUND",
            format!("Program file does not exist: {}", path.display()),
        ));
    }

    let raw = fs::read_to_string(path).map_err(map_cli_program_read)?;
    let file: ProgramFileV1 = serde_json::from_str(&raw).map_err(map_cli_program_invalid)?;

    if file.schema_version != PROGRAM_FILE_SCHEMA {
        return Err(JuniorError::new(
            "CLI_PROGRAM_SCHEMA",
            format!("Unsupported program file schema: {}", file.schema_version),
        ));
    }

    Ok(file.program)
}
