use std::collections::BTreeSet;
use std::path::Path;

use jr_api::{Attribution, EditingSession, RunReport, DEFAULT_STAGE_NAME};
use jr_compiler::{flatten, verify_source_map, FlattenedProgram};
use jr_core::{assess_name, JuniorError, NameValidity, StructuredProgram};
use jr_runtime::{RhaiHost, RhaiHostOptions};
use tracing::info;

use crate::{
    json_string, load_program_file, load_programs_from_dir, resolve_programs_dir,
    save_program_file, CheckArgs, CheckNameArgs, FlattenArgs, NewArgs, RunArgs,
};

pub(crate) fn run_flatten(args: FlattenArgs) -> Result<i32, JuniorError> {
    let program = load_program_file(Path::new(&args.program))?;
    let flattened = flatten(&program);
    emit_flattened(&flattened);
    Ok(0)
}

pub(crate) fn run_run(args: RunArgs) -> Result<i32, JuniorError> {
    let program = load_program_file(Path::new(&args.program))?;
    let host = RhaiHost::new(RhaiHostOptions {
        max_operations: args.max_operations,
        strict_variables: None,
    });

    let mut session = EditingSession::from_program(program);
    let report = session.run(&host);
    emit_run_report(&report);
    Ok(0)
}

pub(crate) fn run_check_name(args: CheckNameArgs) -> Result<i32, JuniorError> {
    let existing = args.existing.into_iter().collect::<BTreeSet<_>>();
    let validity = assess_name(&args.name, &existing);
    emit_name_validity(&validity);
    Ok(0)
}

pub(crate) fn run_new(args: NewArgs) -> Result<i32, JuniorError> {
    let stage_name = args.name.as_deref().unwrap_or(DEFAULT_STAGE_NAME);
    let program = StructuredProgram::new(stage_name)?;
    save_program_file(Path::new(&args.out), &program)?;
    info!(out = %args.out, "program written");

    println!("RESULT:OK");
    println!("STAGE:{}", program.stage().id());
    println!("PROGRAM_OUT:{}", args.out);
    Ok(0)
}

pub(crate) fn run_check(args: CheckArgs) -> Result<i32, JuniorError> {
    let programs_dir = resolve_programs_dir(&args.programs_dir)?;
    let programs = load_programs_from_dir(&programs_dir)?;

    let mut summaries = Vec::with_capacity(programs.len());
    for loaded in &programs {
        let flattened = flatten(&loaded.program);
        verify_source_map(&loaded.program, flattened.source_map()).map_err(|error| {
            JuniorError::new(
                error.code,
                format!("{}: {}", loaded.relative_path, error.message),
            )
        })?;
        summaries.push((loaded.relative_path.as_str(), flattened.line_count()));
    }
    info!(programs = summaries.len(), "programs checked");

    println!("RESULT:OK");
    for (relative_path, lines) in &summaries {
        println!("PROGRAM:{}|{}", relative_path, lines);
    }
    println!("CHECKED:{}", summaries.len());
    Ok(0)
}

fn emit_flattened(flattened: &FlattenedProgram) {
    println!("RESULT:OK");
    println!("LINES:{}", flattened.line_count());
    for entry in flattened.source_map().entries() {
        println!(
            "MAP:{}|{}|{}",
            entry.start_line, entry.actor_id, entry.handler_id
        );
    }
    println!("TEXT_JSON:{}", json_string(flattened.text()));
}

fn emit_run_report(report: &RunReport) {
    println!("RESULT:OK");
    for line in report.result.output() {
        println!("OUTPUT_JSON:{}", json_string(line));
    }

    match &report.attribution {
        None => println!("EVENT:SUCCESS"),
        Some(Attribution::Located {
            actor_id,
            actor_name,
            handler_id,
            line_within_handler,
            message,
        }) => {
            println!("EVENT:ERROR_LOCATED");
            println!("ACTOR:{}|{}", actor_id, actor_name);
            println!("HANDLER:{}", handler_id);
            println!("LINE:{}", line_within_handler);
            println!("MESSAGE_JSON:{}", json_string(message));
        }
        Some(Attribution::Unattributable { message }) => {
            println!("EVENT:ERROR_UNATTRIBUTED");
            println!("MESSAGE_JSON:{}", json_string(message));
        }
    }
}

fn emit_name_validity(validity: &NameValidity) {
    println!("RESULT:OK");
    match validity {
        NameValidity::Valid => println!("NAME:VALID"),
        NameValidity::Invalid { reason } => {
            println!("NAME:INVALID");
            println!("REASON_JSON:{}", json_string(reason));
        }
    }
}
