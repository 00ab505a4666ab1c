#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use crate::language::SupportedLanguage;

/// Errors raised while locating, building, or running submissions.
///
/// Detection and compilation variants abort the whole fixture (every test
/// method fails identically); execution variants are scoped to the single
/// test that triggered them.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No file of a supported, permitted language was found.
    #[error("No submission found, or couldn't infer programming language! Found files: {files:?}")]
    NoProgram {
        /// The files that matched no registered extension.
        files: Vec<String>,
    },

    /// No Java source in the submission defines a runnable entry point.
    #[error("Java program has no (public static void) main function! Sources: {files:?}")]
    NoMainMethod {
        /// The Java sources that were scanned.
        files: Vec<String>,
    },

    /// Source files of more than one supported language survived
    /// classification. Earlier revisions silently picked whichever the
    /// directory listing produced first; now the harness refuses to guess.
    #[error("Source files of multiple languages found ({languages:?}); cannot infer which is the submission")]
    AmbiguousLanguages {
        /// Every language with at least one matching file, sorted.
        languages: Vec<SupportedLanguage>,
    },

    /// The detected language is excluded by the assignment configuration.
    #[error("{detected} submissions are not accepted for this assignment; allowed languages: {permitted:?}")]
    LanguageNotPermitted {
        /// The language the submission was written in.
        detected:  SupportedLanguage,
        /// The languages the assignment accepts.
        permitted: Vec<SupportedLanguage>,
    },

    /// A construct the harness deliberately refuses to grade.
    #[error("{0}")]
    UnsupportedFeature(String),

    /// A source set that cannot form a runnable program (for instance
    /// several Python files with none named `main.py`).
    #[error("{0}")]
    InvalidSourceSet(String),

    /// A basic submission check (required main function, no module-level
    /// globals) failed against the imported student module.
    #[error("{0}")]
    BasicCheckFailed(String),

    /// Both the direct toolchain command and the `make` fallback failed.
    #[error("Compilation failed!\ncommand={command}\nstdout={stdout}\nstderr={stderr}")]
    CompilationFailed {
        /// The last command line attempted.
        command: String,
        /// Captured stdout of the last attempt.
        stdout:  String,
        /// Captured stderr of the last attempt.
        stderr:  String,
    },

    /// An operation that requires a process-level run was invoked on a
    /// variant that has none (SQL).
    #[error("{0} programs are not run as subprocesses")]
    NotRunnable(SupportedLanguage),

    /// A program exited nonzero. Framing depends on whose program it was:
    /// a student crash is a descriptive test failure, a key crash is a
    /// harness defect flagged for the instructor.
    #[error(transparent)]
    RunFailed(#[from] crate::harness::RunFailure),

    /// A subprocess-level failure: the child could not be started, or it
    /// outlived its wall-clock limit.
    #[error(transparent)]
    Process(#[from] crate::process::ProcessError),

    /// Anything else that went wrong in the surrounding plumbing.
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
