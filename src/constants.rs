#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::time::Duration;

/// File names reserved by the VPL jail itself. These are never part of a
/// submission and must be invisible to language detection.
pub const VPL_SYSTEM_FILES: [&str; 4] = [
    "vpl_test",
    ".vpl_tester",
    "vpl_execution",
    "vpl_evaluate.cases",
];

/// Extensions that can never belong to a runnable submission: images,
/// documents, databases, and other assignment data files.
pub const NON_EXECUTABLE_EXTENSIONS: [&str; 10] = [
    ".o", ".html", ".cases", ".old", ".txt", ".gif", ".png", ".pdf", ".db", ".DS_Store",
];

/// Prefix marking grader-internal files (`__pycache__` style names);
/// classified out of every submission.
pub const INTERNAL_FILE_PREFIX: &str = "__";

/// Suffix used to mask key source files so the VPL jail's auto-compilation
/// step does not mistake them for the submission. Stripped before key
/// detection and restored at teardown.
pub const MASK_SUFFIX: &str = ".hidden";

/// Executable name given to the compiled student submission.
pub const STUDENT_PROGRAM_NAME: &str = "student_program";

/// Output file name for file-comparison style test cases, student side.
pub const STUDENT_OUTFILE_NAME: &str = "student_outfile";

/// Executable name given to the compiled key program.
pub const KEY_PROGRAM_NAME: &str = "key_program";

/// Output file name for file-comparison style test cases, key side.
pub const KEY_OUTFILE_NAME: &str = "key_outfile";

/// Name of the generated case-description file consumed by VPL.
pub const CASES_FILE_NAME: &str = "vpl_evaluate.cases";

/// Wall-clock limit earlier harness revisions applied to every subprocess.
/// No longer the default; assignments opt in via
/// [`FixtureConfig`](crate::config::FixtureConfig).
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(10);

/// Base name that disambiguates the entry point of a multi-file submission.
pub const MAIN_FILE_BASE_NAME: &str = "main";
