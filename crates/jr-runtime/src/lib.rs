//! Execution of flattened program text.
//!
//! The interpreter is a black box to the rest of the workspace: it takes one
//! text and either succeeds or fails at a 1-based line of that text.

use std::cell::RefCell;
use std::rc::Rc;

use rhai::Engine;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const DEFAULT_MAX_OPERATIONS: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RunResult {
    #[serde(rename_all = "camelCase")]
    Success { output: Vec<String> },
    /// `error_line` is `None` when the interpreter could not position the error.
    #[serde(rename_all = "camelCase")]
    Failed {
        error_line: Option<usize>,
        message: String,
        output: Vec<String>,
    },
}

impl RunResult {
    pub fn output(&self) -> &[String] {
        match self {
            RunResult::Success { output } | RunResult::Failed { output, .. } => output,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunResult::Success { .. })
    }
}

pub trait ExecutionHost {
    fn run(&self, source: &str) -> RunResult;
}

#[derive(Debug, Clone, Default)]
pub struct RhaiHostOptions {
    pub max_operations: Option<u64>,
    pub strict_variables: Option<bool>,
}

/// Runs program text with a fresh Rhai engine per run, collecting `print`
/// output instead of writing it to stdout.
#[derive(Debug, Clone)]
pub struct RhaiHost {
    max_operations: u64,
    strict_variables: bool,
}

impl Default for RhaiHost {
    fn default() -> Self {
        Self::new(RhaiHostOptions::default())
    }
}

impl RhaiHost {
    pub fn new(options: RhaiHostOptions) -> Self {
        Self {
            max_operations: options.max_operations.unwrap_or(DEFAULT_MAX_OPERATIONS),
            strict_variables: options.strict_variables.unwrap_or(true),
        }
    }

    fn build_engine(&self, output: Rc<RefCell<Vec<String>>>) -> Engine {
        let mut engine = Engine::new();
        engine.set_strict_variables(self.strict_variables);
        engine.set_max_operations(self.max_operations);
        engine.on_print(move |text| output.borrow_mut().push(text.to_string()));
        engine
    }
}

impl ExecutionHost for RhaiHost {
    fn run(&self, source: &str) -> RunResult {
        let output = Rc::new(RefCell::new(Vec::new()));
        let engine = self.build_engine(Rc::clone(&output));
        let result = engine.run(source);
        drop(engine);
        let output = output.take();

        match result {
            Ok(()) => {
                info!(printed = output.len(), "run finished");
                RunResult::Success { output }
            }
            Err(mut error) => {
                let error_line = error.take_position().line();
                let message = error.to_string();
                warn!(?error_line, %message, "run failed");
                RunResult::Failed {
                    error_line,
                    message,
                    output,
                }
            }
        }
    }
}
