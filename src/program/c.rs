#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use crate::{error::Result, util};

use super::SourceSet;

/// Represents a program written in C, e.g. a student's submission, or an
/// instructor's key program.
#[derive(Debug, Clone)]
pub struct CProgram {
    /// Sources and naming for this program.
    pub(crate) sources: SourceSet,
}

impl CProgram {
    /// Wraps an already-detected C source set.
    pub(crate) fn new(sources: SourceSet) -> CProgram {
        CProgram { sources }
    }

    /// `gcc -o {executable} {sources} -lm`, with gcc resolved on PATH.
    pub fn compilation_command(&self) -> Result<Vec<String>> {
        Ok(link_command(util::gcc_path()?, &self.sources))
    }

    /// The built binary, invoked by absolute path.
    pub fn run_argv(&self, cli_args: &[String]) -> Vec<String> {
        binary_argv(&self.sources, cli_args)
    }
}

/// Represents a program written in C++, e.g. a student's submission, or an
/// instructor's key program.
#[derive(Debug, Clone)]
pub struct CppProgram {
    /// Sources and naming for this program.
    pub(crate) sources: SourceSet,
}

impl CppProgram {
    /// Wraps an already-detected C++ source set.
    pub(crate) fn new(sources: SourceSet) -> CppProgram {
        CppProgram { sources }
    }

    /// `g++ -o {executable} {sources} -lm`, with g++ resolved on PATH.
    pub fn compilation_command(&self) -> Result<Vec<String>> {
        Ok(link_command(util::gpp_path()?, &self.sources))
    }

    /// The built binary, invoked by absolute path.
    pub fn run_argv(&self, cli_args: &[String]) -> Vec<String> {
        binary_argv(&self.sources, cli_args)
    }
}

/// Shared gcc/g++ command shape: all sources linked into one binary,
/// libm included.
fn link_command(compiler: String, sources: &SourceSet) -> Vec<String> {
    let mut command = vec![compiler, "-o".to_string(), sources.executable_name.clone()];
    command.extend(sources.source_files.iter().cloned());
    command.push("-lm".to_string());
    command
}

/// argv for running the compiled binary with the given arguments.
///
/// Absolute path: a bare name would be resolved through PATH, where
/// glibc hides ENOEXEC behind a `/bin/sh` fallback run.
fn binary_argv(sources: &SourceSet, cli_args: &[String]) -> Vec<String> {
    let binary = sources.dir.join(&sources.executable_name);
    let mut argv = vec![binary.display().to_string()];
    argv.extend(cli_args.iter().cloned());
    argv
}
