#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use similar::TextDiff;

use crate::{constants::CASES_FILE_NAME, error::Result};

/// One discovered test method, identified the way the external grader
/// addresses it: module, test class, method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestMethod {
    /// Module containing the test class. Only the last dotted segment is
    /// written out; the grader cannot resolve nested package prefixes at
    /// runtime, so deeper paths would name tests it can never find.
    pub module: String,
    /// Name of the test class.
    pub class:  String,
    /// Name of the test method.
    pub method: String,
}

impl TestMethod {
    /// The module name as the grader will see it.
    fn grader_module(&self) -> &str {
        self.module.rsplit('.').next().unwrap_or(&self.module)
    }
}

/// Returns one case block invoking a single test method.
fn test_case_block(test: &TestMethod) -> String {
    let module = test.grader_module();
    format!(
        "Case = {method}\n\
         program to run = /usr/bin/python3\n\
         program arguments = -m unittest {module}.{class}.{method}\n\
         expected exit code = 0\n\
         output = /.*OK.*/i\n\
         grade reduction = 100%\n\n",
        method = test.method,
        class = test.class,
    )
}

/// Returns the optional static-analysis block invoking pylint on the
/// student's module. Informational only; it reduces no grade.
fn pylint_case_block(module_name: &str) -> String {
    format!(
        "Case = PyLint Style Check\n\
         program to run = /usr/bin/python3\n\
         program arguments = -m pylint {module_name}\n\
         output = /.*Your code has been rated at 10.00/10*/i\n\
         grade reduction = 0%\n"
    )
}

/// Writes `new_contents` to `file_path` only when it differs from what is
/// already there, returning whether a write happened.
///
/// Content equality, not timestamps: regenerating an identical file twice
/// leaves it untouched, so checked-in fixtures stay clean.
pub fn overwrite_file_if_different(file_path: &Path, new_contents: &str) -> Result<bool> {
    if let Ok(old_contents) = std::fs::read_to_string(file_path) {
        if old_contents == new_contents {
            tracing::debug!(path = %file_path.display(), "cases file unchanged");
            return Ok(false);
        }

        let diff = TextDiff::from_lines(old_contents.as_str(), new_contents);
        tracing::debug!(
            path = %file_path.display(),
            diff = %diff.unified_diff(),
            "cases file changed"
        );
    }

    std::fs::write(file_path, new_contents)
        .with_context(|| format!("Could not write {}", file_path.display()))?;
    Ok(true)
}

/// Where the cases file lives: alongside the student's module.
pub fn cases_file_path(fixture_dir: &Path) -> PathBuf {
    fixture_dir.join(CASES_FILE_NAME)
}

/// Writes or refreshes the case-description file in `fixture_dir`: one
/// block per element of `test_methods`, plus a pylint block when asked
/// for. Returns whether the file on disk changed.
pub fn make_cases_file(
    fixture_dir: &Path,
    test_methods: &[TestMethod],
    include_pylint: bool,
) -> Result<bool> {
    let mut contents = String::new();
    for test in test_methods {
        contents.push_str(&test_case_block(test));
    }

    if include_pylint {
        if let Some(first) = test_methods.first() {
            contents.push_str(&pylint_case_block(first.grader_module()));
        }
    }

    overwrite_file_if_different(&cases_file_path(fixture_dir), &contents)
}
