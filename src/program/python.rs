#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    constants::MAIN_FILE_BASE_NAME,
    error::{Error, Result},
    process::{self, ExecutionResult},
    util,
};

use super::SourceSet;

/// Represents a program written in Python, e.g. a student's submission,
/// or an instructor's key program.
#[derive(Debug, Clone)]
pub struct PythonProgram {
    /// Sources and naming for this program.
    pub(crate) sources: SourceSet,
    /// The file handed to the interpreter.
    entry_file:         String,
}

impl PythonProgram {
    /// Wraps a detected Python source set. One file is the entry point;
    /// several files need one literally named `main.py`.
    pub(crate) fn new(sources: SourceSet) -> Result<PythonProgram> {
        let main_file = format!("{MAIN_FILE_BASE_NAME}.py");
        let entry_file = match sources.source_files.as_slice() {
            [] => {
                return Err(Error::InvalidSourceSet("No input files found!".to_string()));
            }
            [only] => only.clone(),
            files => files
                .iter()
                .find(|file| *file == &main_file)
                .cloned()
                .ok_or_else(|| {
                    Error::InvalidSourceSet(format!(
                        "If you have more than 1 file, you must name one of them main.py! \
                         Found {files:?}"
                    ))
                })?,
        };

        Ok(PythonProgram {
            sources,
            entry_file,
        })
    }

    /// The file handed to the interpreter.
    pub fn entry_file(&self) -> &str {
        &self.entry_file
    }

    /// The entry file's import name (extension stripped).
    pub fn module_name(&self) -> &str {
        self.entry_file
            .strip_suffix(".py")
            .unwrap_or(&self.entry_file)
    }

    /// `python3 {entry_file} {args}`.
    pub fn run_argv(&self, cli_args: &[String]) -> Result<Vec<String>> {
        let mut argv = vec![util::python3_path()?, self.entry_file.clone()];
        argv.extend(cli_args.iter().cloned());
        Ok(argv)
    }

    /// Checks that the entry file can be imported as a module, so graders
    /// can call into it directly instead of spawning it per assertion.
    ///
    /// Import-time stdout is captured and discarded. A failed import is a
    /// legitimate outcome (a script with top-level argument parsing may
    /// only work standalone), so it comes back as an explicit
    /// [`ImportFailure`] the caller must branch on, never a silent `None`.
    pub fn probe_import(&self) -> Result<std::result::Result<ModuleHandle, ImportFailure>> {
        let module = self.module_name().to_string();
        let probe = run_snippet(
            &self.sources.dir,
            &format!("import importlib\nimportlib.import_module({module:?})"),
        )?;

        if probe.success() {
            Ok(Ok(ModuleHandle {
                module,
                dir: self.sources.dir.clone(),
            }))
        } else {
            tracing::debug!(module, "student module failed to import");
            Ok(Err(ImportFailure {
                module,
                traceback: probe.stderr,
            }))
        }
    }
}

/// Proof that a Python module imported cleanly, plus enough context to
/// evaluate expressions against it.
#[derive(Debug, Clone)]
pub struct ModuleHandle {
    /// Import name of the module.
    module: String,
    /// Directory the module lives in.
    dir:    PathBuf,
}

impl ModuleHandle {
    /// Import name of the module.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Evaluates `expr` with the module imported as `m`, e.g.
    /// `handle.call("m.main()")`, returning the captured outcome.
    pub fn call(&self, expr: &str) -> Result<ExecutionResult> {
        run_snippet(&self.dir, &format!("import {} as m\n{expr}", self.module))
    }

    /// True when the module defines `name` at top level.
    pub fn has_attribute(&self, name: &str) -> Result<bool> {
        let result = self.call(&format!(
            "import sys\nsys.exit(0 if hasattr(m, {name:?}) else 1)"
        ))?;
        Ok(result.success())
    }
}

/// Import could not complete; carries the interpreter's traceback.
#[derive(thiserror::Error, Debug, Clone)]
#[error("Could not import module `{module}`:\n{traceback}")]
pub struct ImportFailure {
    /// The module that failed to import.
    pub module:    String,
    /// Traceback text from the interpreter.
    pub traceback: String,
}

/// Runs a small Python snippet in `dir` with captured output.
fn run_snippet(dir: &PathBuf, code: &str) -> Result<ExecutionResult> {
    let argv = vec![util::python3_path()?, "-c".to_string(), code.to_string()];
    let result = process::run_captured(&argv, "", dir, &[], None)?;
    Ok(result)
}

/// The basic checks run against an imported student module before any
/// real tests. Instructors skip the ones an assignment doesn't want.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicCheck {
    /// The module must define a `main` function.
    HasMainFunction,
    /// The module must not define module-level (global) variables.
    HasNoGlobals,
}

/// Snippet listing module-level names that are neither dunders, callables,
/// nor imported modules.
const GLOBALS_SNIPPET: &str = "import sys\n\
    bad = [n for n, v in vars(m).items() \
    if not n.startswith('__') and not callable(v) and not isinstance(v, type(sys))]\n\
    print(', '.join(bad))\n\
    sys.exit(1 if bad else 0)";

/// Runs every basic check not listed in `skip` against the student's
/// imported module. Basic checks are not run on instructor solutions.
pub fn run_basic_checks(handle: &ModuleHandle, skip: &[BasicCheck]) -> Result<()> {
    if !skip.contains(&BasicCheck::HasMainFunction) && !handle.has_attribute("main")? {
        return Err(Error::BasicCheckFailed(
            "This assignment requires a main function!".to_string(),
        ));
    }

    if !skip.contains(&BasicCheck::HasNoGlobals) {
        let result = handle.call(GLOBALS_SNIPPET)?;
        if !result.success() {
            return Err(Error::BasicCheckFailed(format!(
                "Global variables are forbidden in this assignment! Found: {}",
                result.stdout.trim()
            )));
        }
    }

    Ok(())
}
