//! # vpltools
//!
//! An automated grading harness for Moodle VPL programming assignments.
//!
//! Given a fixture directory holding a student submission and (optionally)
//! an instructor's key program, vpltools classifies the files, infers the
//! programming language, builds a runnable program with language-specific
//! toolchains, and offers a uniform "run with these arguments and this
//! stdin" interface for per-assignment test code to assert against. It
//! also regenerates the declarative `vpl_evaluate.cases` file the VPL
//! plugin consumes.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Generation of the `vpl_evaluate.cases` case-description file.
pub mod cases;
/// Separating student files from key, system, and ignored files.
pub mod classify;
/// Per-fixture configuration and process-wide runtime/tracing setup.
pub mod config;
/// Constant names and lists shared across the harness.
pub mod constants;
/// Language detection over classified file lists.
pub mod detect;
/// The error taxonomy for detection, compilation, and execution.
pub mod error;
/// Fixture orchestration: setup, role-aware runs, teardown artifacts.
pub mod harness;
/// The closed registry of supported languages.
pub mod language;
/// Scoped unmasking of disguised key source files.
pub mod mask;
/// Subprocess invocation with captured output and optional timeout.
pub mod process;
/// Program variants, one per supported language.
pub mod program;
/// Toolchain discovery and filesystem helpers.
pub mod util;

pub use cases::TestMethod;
pub use config::FixtureConfig;
pub use error::{Error, Result};
pub use harness::{Fixture, ProgramRole, RunFailure};
pub use language::SupportedLanguage;
pub use process::ExecutionResult;
pub use program::{BasicCheck, ImportFailure, ModuleHandle, Program};
