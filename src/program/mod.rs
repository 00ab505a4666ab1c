#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// C and C++ program variants.
pub mod c;
/// Java program variant: package refusal and entry-class discovery.
pub mod java;
/// Python program variant, import probe, and basic submission checks.
pub mod python;
/// SQL query variant.
pub mod sql;

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    language::SupportedLanguage,
    process::{self, ExecutionResult, ProcessError},
};

pub use c::{CProgram, CppProgram};
pub use java::JavaProgram;
pub use python::{BasicCheck, ImportFailure, ModuleHandle, PythonProgram};
pub use sql::SqlQuery;

/// Source files and naming shared by every program variant.
///
/// The directory is borrowed conceptually from the fixture; dropping a
/// program never deletes anything on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSet {
    /// The fixture directory holding the sources.
    pub dir:              PathBuf,
    /// Source file names, all carrying one language's extension.
    pub source_files:     Vec<String>,
    /// Requested executable name (`student_program` / `key_program`).
    /// Java replaces this with the discovered entry class.
    pub executable_name:  String,
    /// Output file name used by file-comparison test styles.
    pub output_file_name: Option<String>,
}

/// Everything a program run needs from the surrounding fixture.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Variables layered over the inherited environment (PATH with the
    /// fixture directory prepended).
    pub env:     Vec<(OsString, OsString)>,
    /// Optional wall-clock limit for the child process.
    pub timeout: Option<Duration>,
}

/// A program written in one of the supported languages: a student's
/// submission, or an instructor's key program.
///
/// Closed tagged union, one variant per [`SupportedLanguage`]. Each
/// variant knows its own compile command and run invocation; everything
/// else dispatches through here.
#[derive(Debug, Clone)]
pub enum Program {
    /// A C program.
    C(CProgram),
    /// A C++ program.
    Cpp(CppProgram),
    /// A Java program.
    Java(JavaProgram),
    /// A Python program.
    Python(PythonProgram),
    /// A SQL query.
    Sql(SqlQuery),
}

impl Program {
    /// Registry mapping a language tag to its variant constructor.
    pub fn new(language: SupportedLanguage, sources: SourceSet) -> Result<Program> {
        match language {
            SupportedLanguage::C => Ok(Program::C(CProgram::new(sources))),
            SupportedLanguage::Cpp => Ok(Program::Cpp(CppProgram::new(sources))),
            SupportedLanguage::Java => JavaProgram::new(sources).map(Program::Java),
            SupportedLanguage::Python => PythonProgram::new(sources).map(Program::Python),
            SupportedLanguage::Sql => SqlQuery::new(sources).map(Program::Sql),
        }
    }

    /// The language this program is written in.
    pub fn language(&self) -> SupportedLanguage {
        match self {
            Program::C(_) => SupportedLanguage::C,
            Program::Cpp(_) => SupportedLanguage::Cpp,
            Program::Java(_) => SupportedLanguage::Java,
            Program::Python(_) => SupportedLanguage::Python,
            Program::Sql(_) => SupportedLanguage::Sql,
        }
    }

    /// The shared source set behind whichever variant this is.
    pub fn sources(&self) -> &SourceSet {
        match self {
            Program::C(p) => &p.sources,
            Program::Cpp(p) => &p.sources,
            Program::Java(p) => &p.sources,
            Program::Python(p) => &p.sources,
            Program::Sql(p) => &p.sources,
        }
    }

    /// Source file names of this program.
    pub fn source_files(&self) -> &[String] {
        &self.sources().source_files
    }

    /// The fixture directory this program lives in.
    pub fn dir(&self) -> &Path {
        &self.sources().dir
    }

    /// The name the program is invoked by: the compiled binary for C/C++,
    /// the entry class for Java, the entry file for Python.
    pub fn executable_name(&self) -> &str {
        match self {
            Program::Java(p) => p.entry_class(),
            Program::Python(p) => p.entry_file(),
            other => &other.sources().executable_name,
        }
    }

    /// Output file name used by file-comparison test styles, if any.
    pub fn output_file_name(&self) -> Option<&str> {
        self.sources().output_file_name.as_deref()
    }

    /// The toolchain invocation that builds this program, or `None` for
    /// interpreted languages that need no build step.
    ///
    /// Java performs its package-declaration scan here, so an unsupported
    /// submission is refused before any toolchain runs.
    pub fn compilation_command(&self) -> Result<Option<Vec<String>>> {
        match self {
            Program::C(p) => p.compilation_command().map(Some),
            Program::Cpp(p) => p.compilation_command().map(Some),
            Program::Java(p) => p.compilation_command().map(Some),
            Program::Python(_) | Program::Sql(_) => Ok(None),
        }
    }

    /// Path of the artifact whose existence lets [`Program::compile`]
    /// skip the toolchain entirely.
    fn artifact_path(&self) -> PathBuf {
        match self {
            Program::Java(p) => p.sources.dir.join(format!("{}.class", p.entry_class())),
            Program::Python(p) => p.sources.dir.join(p.entry_file()),
            other => {
                let sources = other.sources();
                sources.dir.join(&sources.executable_name)
            }
        }
    }

    /// Compiles the program in its fixture directory.
    ///
    /// Idempotent: when the target artifact already exists and `recompile`
    /// is false, no toolchain is invoked. On a nonzero exit the harness
    /// gets a second chance through a bare `make` in the same directory,
    /// which supports assignments that ship their own Makefile. Both
    /// failing is fatal and carries the last attempt's captured output.
    pub fn compile(&self, recompile: bool) -> Result<()> {
        if self.artifact_path().exists() && !recompile {
            tracing::debug!(
                artifact = %self.artifact_path().display(),
                "artifact already present, skipping compilation"
            );
            return Ok(());
        }

        let Some(command) = self.compilation_command()? else {
            return Ok(());
        };

        tracing::info!(command = %command.join(" "), "compiling");
        let direct = run_build_step(&command, self.dir());

        let attempt = match direct {
            Ok(result) if result.success() => return Ok(()),
            Ok(result) => result,
            Err(err) => return Err(err),
        };

        // Second chance: the assignment may ship a Makefile with the
        // flags the generic command lacks.
        let make_command = vec!["make".to_string()];
        tracing::info!("direct compilation failed, falling back to make");
        match run_build_step(&make_command, self.dir()) {
            Ok(result) if result.success() => Ok(()),
            Ok(result) => Err(Error::CompilationFailed {
                command: result.command_line(),
                stdout:  result.stdout,
                stderr:  result.stderr,
            }),
            // make itself would not start; report the original failure,
            // which is the one the student can act on.
            Err(_) => Err(Error::CompilationFailed {
                command: attempt.command_line(),
                stdout:  attempt.stdout,
                stderr:  attempt.stderr,
            }),
        }
    }

    /// Executes the program in a subprocess with the given CLI arguments
    /// and stdin text, returning the captured outcome.
    ///
    /// SQL queries have no process-level run and yield
    /// [`Error::NotRunnable`]; their text goes to a database collaborator
    /// via [`SqlQuery::query_text`] instead.
    pub fn run(
        &self,
        cli_args: &[String],
        input: &str,
        ctx: &RunContext,
    ) -> Result<ExecutionResult> {
        let argv = match self {
            Program::C(p) => p.run_argv(cli_args),
            Program::Cpp(p) => p.run_argv(cli_args),
            Program::Java(p) => p.run_argv(cli_args)?,
            Program::Python(p) => p.run_argv(cli_args)?,
            Program::Sql(_) => return Err(Error::NotRunnable(SupportedLanguage::Sql)),
        };

        let result = process::run_captured(&argv, input, self.dir(), &ctx.env, ctx.timeout)?;
        Ok(result)
    }
}

/// Runs one build attempt with captured output, mapping a spawn failure
/// (toolchain missing from the jail) to a fatal error.
fn run_build_step(command: &[String], dir: &Path) -> Result<ExecutionResult> {
    match process::run_captured(command, "", dir, &[], None) {
        Ok(result) => Ok(result),
        Err(ProcessError::Spawn { program, source }) => Err(Error::Unknown(anyhow::anyhow!(
            "Could not invoke build tool `{program}`: {source}"
        ))),
        Err(other) => Err(Error::Unknown(other.into())),
    }
}
