use std::path::{Path, PathBuf};

use jr_core::JuniorError;
use walkdir::WalkDir;

use crate::{load_program_file, map_cli_programs_scan, LoadedProgram, PROGRAM_FILE_SUFFIX};

pub(crate) fn resolve_programs_dir(programs_dir: &str) -> Result<PathBuf, JuniorError> {
    let path = PathBuf::from(programs_dir);

    if !path.exists() {
        return Err(JuniorError::new(
            "CLI_PROGRAMS_DIR_NOT_FOUND",
            format!("programs-dir does not exist: {}", path.display()),
        ));
    }

    if !path.is_dir() {
        return Err(JuniorError::new(
            "CLI_PROGRAMS_DIR_NOT_DIR",
            format!("programs-dir is not a directory: {}", path.display()),
        ));
    }

    Ok(path)
}

/// Load every `*.program.json` under `programs_dir`, sorted by relative path.
pub(crate) fn load_programs_from_dir(programs_dir: &Path) -> Result<Vec<LoadedProgram>, JuniorError> {
    let mut programs = Vec::new();

    for entry in WalkDir::new(programs_dir)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(map_cli_programs_scan)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !path.to_string_lossy().ends_with(PROGRAM_FILE_SUFFIX) {
            continue;
        }

        let relative_path = path
            .strip_prefix(programs_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        let program = load_program_file(path).map_err(|error| {
            JuniorError::new(error.code, format!("{}: {}", relative_path, error.message))
        })?;
        programs.push(LoadedProgram {
            relative_path,
            program,
        });
    }

    if programs.is_empty() {
        return Err(JuniorError::new(
            "CLI_PROGRAMS_DIR_EMPTY",
            format!(
                "No {} files under {}",
                PROGRAM_FILE_SUFFIX,
                programs_dir.display()
            ),
        ));
    }

    Ok(programs)
}
