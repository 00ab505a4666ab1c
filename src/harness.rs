#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    cases::{self, TestMethod},
    classify,
    config::{self, FixtureConfig},
    constants::{
        KEY_OUTFILE_NAME, KEY_PROGRAM_NAME, STUDENT_OUTFILE_NAME, STUDENT_PROGRAM_NAME,
    },
    detect,
    error::{Error, Result},
    language::SupportedLanguage,
    mask::MaskGuard,
    process::ExecutionResult,
    program::{
        python::{self, ImportFailure, ModuleHandle},
        Program, RunContext,
    },
    util,
};

/// Whose program an operation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramRole {
    /// The submission under test.
    Student,
    /// The instructor's reference solution.
    Key,
}

impl fmt::Display for ProgramRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramRole::Student => f.write_str("student"),
            ProgramRole::Key => f.write_str("key"),
        }
    }
}

/// A program exited nonzero during a test run.
///
/// For the student role this is an ordinary, descriptive test failure.
/// For the key role it means the harness itself shipped a broken
/// reference solution, which students should report and instructors must
/// fix.
#[derive(Debug)]
pub struct RunFailure {
    /// Whose program crashed.
    pub role:   ProgramRole,
    /// The captured run, including command line and stderr.
    pub result: ExecutionResult,
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            ProgramRole::Student => writeln!(f, "Your program crashed!")?,
            ProgramRole::Key => writeln!(
                f,
                "The KEY program crashed. This is a defect in the assignment itself, not in \
                 your submission; please report it to your instructor."
            )?,
        }
        writeln!(f, "command = {}", self.result.command_line())?;
        writeln!(f, "exit code = {:?}", self.result.exit_code)?;
        write!(f, "stderr = {}", self.result.stderr)
    }
}

impl std::error::Error for RunFailure {}

/// One assignment's worth of grading state: the fixture directory, the
/// detected and compiled programs, and the environment runs execute in.
///
/// Construction does everything the original test-class setup did:
/// unmask key files, classify the directory, detect and compile the
/// student and key programs, and probe Python modules for importability.
/// Dropping the fixture restores masked key file names on every exit
/// path.
#[derive(Debug)]
pub struct Fixture {
    /// The fixture directory.
    dir:             PathBuf,
    /// Per-fixture configuration, owned.
    config:          FixtureConfig,
    /// The submission under test.
    student_program: Program,
    /// The instructor's solution, absent for pure compilation-check
    /// assignments.
    key_program:     Option<Program>,
    /// Import probe outcome for a Python student submission.
    student_module:  Option<std::result::Result<ModuleHandle, ImportFailure>>,
    /// Import probe outcome for a Python key program.
    key_module:      Option<std::result::Result<ModuleHandle, ImportFailure>>,
    /// Environment layered onto every run: PATH with the fixture
    /// directory prepended, so compiled binaries resolve by name.
    run_env:         Vec<(OsString, OsString)>,
    /// Keeps unmasked key files revealed until teardown.
    _mask_guard:     MaskGuard,
}

impl Fixture {
    /// Locates, detects, and compiles the programs in `dir`.
    ///
    /// Detection or compilation failure here aborts the whole fixture;
    /// every test method would have failed identically anyway.
    pub fn setup(dir: &Path, config: FixtureConfig) -> Result<Fixture> {
        config::init_tracing();
        let span = tracing::info_span!("fixture_setup", dir = %dir.display());
        let _enter = span.enter();

        let mask_guard = MaskGuard::unmask(dir, &config.key_source_files)?;

        let student_files = classify::find_student_files(dir, &config)?;
        let student_program = detect::detect_and_make_program(
            dir,
            &student_files,
            STUDENT_PROGRAM_NAME,
            Some(STUDENT_OUTFILE_NAME),
            &config.permitted(),
        )?;
        student_program.compile(false)?;

        let key_program = if config.key_source_files.is_empty() {
            tracing::debug!("no key source files declared; assuming no key program");
            None
        } else {
            // The permitted-language restriction binds students, not the
            // instructor's own solution.
            let program = detect::detect_and_make_program(
                dir,
                &config.key_source_files,
                KEY_PROGRAM_NAME,
                Some(KEY_OUTFILE_NAME),
                &SupportedLanguage::ALL,
            )?;
            program.compile(false)?;
            Some(program)
        };

        let run_env = fixture_env(dir)?;

        let student_module = match &student_program {
            Program::Python(p) => {
                let probe = p.probe_import()?;
                if let Ok(handle) = &probe {
                    python::run_basic_checks(handle, &config.skip_basic_checks)?;
                }
                Some(probe)
            }
            _ => None,
        };
        let key_module = match &key_program {
            Some(Program::Python(p)) => Some(p.probe_import()?),
            _ => None,
        };

        Ok(Fixture {
            dir: dir.to_path_buf(),
            config,
            student_program,
            key_program,
            student_module,
            key_module,
            run_env,
            _mask_guard: mask_guard,
        })
    }

    /// The fixture directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The submission under test.
    pub fn student_program(&self) -> &Program {
        &self.student_program
    }

    /// The instructor's solution, if the assignment has one.
    pub fn key_program(&self) -> Option<&Program> {
        self.key_program.as_ref()
    }

    /// Import probe outcome for a Python student submission; `None` for
    /// other languages. Callers must branch on the inner result rather
    /// than assume the module imported.
    pub fn student_module(&self) -> Option<&std::result::Result<ModuleHandle, ImportFailure>> {
        self.student_module.as_ref()
    }

    /// Import probe outcome for a Python key program.
    pub fn key_module(&self) -> Option<&std::result::Result<ModuleHandle, ImportFailure>> {
        self.key_module.as_ref()
    }

    /// The environment program runs execute with. Exposed so callers can
    /// spawn their own interactive sessions against the same PATH.
    pub fn run_env(&self) -> &[(OsString, OsString)] {
        &self.run_env
    }

    /// Executes the student's program with the given arguments and stdin.
    pub fn run_student_program(&self, cli_args: &[String], input: &str) -> Result<ExecutionResult> {
        self.run_program(ProgramRole::Student, cli_args, input)
    }

    /// Executes the key program with the given arguments and stdin.
    pub fn run_key_program(&self, cli_args: &[String], input: &str) -> Result<ExecutionResult> {
        self.run_program(ProgramRole::Key, cli_args, input)
    }

    /// Runs the program for `role`, recovering once from a stale binary.
    ///
    /// A fixture checked into version control can carry an executable
    /// built on another machine; the run then fails at exec time rather
    /// than with a test assertion. A stale binary shows up two ways: as a
    /// spawn error (missing file, missing exec bit), or as a completed
    /// `/bin/sh` fallback run when glibc's exec machinery absorbs an
    /// ENOEXEC artifact. Either one earns a forced recompile and a single
    /// retry. The 126/127 signature is only consulted for C/C++ binaries;
    /// for interpreted programs those codes are ordinary exits. Other
    /// nonzero exits become [`RunFailure`]s and timeouts propagate
    /// untouched.
    pub fn run_program(
        &self,
        role: ProgramRole,
        cli_args: &[String],
        input: &str,
    ) -> Result<ExecutionResult> {
        let program = match role {
            ProgramRole::Student => &self.student_program,
            ProgramRole::Key => self
                .key_program
                .as_ref()
                .context("this assignment has no key program")?,
        };

        let ctx = RunContext {
            env:     self.run_env.clone(),
            timeout: self.config.timeout,
        };

        let mut outcome = program.run(cli_args, input, &ctx);
        let stale = match &outcome {
            Ok(result) => {
                result.looks_unexecutable()
                    && matches!(program, Program::C(_) | Program::Cpp(_))
            }
            Err(Error::Process(err)) => err.is_stale_binary(),
            Err(_) => false,
        };
        if stale {
            tracing::warn!(%role, "stale binary suspected, recompiling");
            program.compile(true)?;
            outcome = program.run(cli_args, input, &ctx);
        }
        let result = outcome?;

        if result.success() {
            Ok(result)
        } else {
            if role == ProgramRole::Key {
                tracing::error!(command = %result.command_line(), "key program crashed");
            }
            Err(Error::RunFailed(RunFailure { role, result }))
        }
    }

    /// Writes the case-description file for the discovered test methods,
    /// honoring the configuration's cases-file and pylint switches. The
    /// pylint block only applies to Python submissions.
    pub fn write_cases_file(&self, test_methods: &[TestMethod]) -> Result<bool> {
        if !self.config.make_cases_file {
            return Ok(false);
        }

        let include_pylint =
            self.config.include_pylint && matches!(self.student_program, Program::Python(_));
        cases::make_cases_file(&self.dir, test_methods, include_pylint)
    }

    /// Deletes compiled artifacts so the next run starts clean: the
    /// student and key binaries, any `.class` files, and the output files
    /// of file-comparison cases.
    pub fn clean_artifacts(&self) -> Result<()> {
        let mut targets = vec![
            self.dir.join(STUDENT_PROGRAM_NAME),
            self.dir.join(KEY_PROGRAM_NAME),
            self.dir.join(STUDENT_OUTFILE_NAME),
            self.dir.join(KEY_OUTFILE_NAME),
        ];
        targets.extend(util::find_files("class", 1, &self.dir)?);

        for target in targets {
            if target.exists() {
                std::fs::remove_file(&target)
                    .with_context(|| format!("Could not delete {}", target.display()))?;
            }
        }
        Ok(())
    }
}

/// Builds the run environment: the parent's PATH with the fixture
/// directory prepended.
fn fixture_env(dir: &Path) -> Result<Vec<(OsString, OsString)>> {
    let parent_path = std::env::var_os("PATH").unwrap_or_default();
    let paths = std::iter::once(dir.to_path_buf())
        .chain(std::env::split_paths(&parent_path))
        .collect::<Vec<_>>();
    let joined = std::env::join_paths(paths).context("Could not extend PATH")?;
    Ok(vec![(OsString::from("PATH"), joined)])
}
