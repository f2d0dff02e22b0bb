use jr_core::JuniorError;
use std::fmt::Display;

fn map_error(code: &'static str, error: impl Display) -> JuniorError {
    JuniorError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: JuniorError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!("ERROR_MSG_JSON:{}", json_string(&error.message));
    1
}

pub(crate) fn json_string(text: &str) -> String {
    serde_json::to_string(text).expect("string json")
}

pub(crate) fn map_cli_program_read(error: std::io::Error) -> JuniorError {
    map_error("CLI_PROGRAM_READ", error)
}

pub(crate) fn map_cli_program_write(error: std::io::Error) -> JuniorError {
    map_error("CLI_PROGRAM_WRITE", error)
}

pub(crate) fn map_cli_program_invalid(error: serde_json::Error) -> JuniorError {
    map_error("CLI_PROGRAM_INVALID", error)
}

pub(crate) fn map_cli_program_encode(error: serde_json::Error) -> JuniorError {
    map_error("CLI_PROGRAM_ENCODE", error)
}

pub(crate) fn map_cli_programs_scan(error: walkdir::Error) -> JuniorError {
    map_error("CLI_PROGRAMS_SCAN", error)
}
