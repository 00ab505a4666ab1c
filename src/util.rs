#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;
use which::which;

/// Resolves a toolchain binary on PATH, with a readable error naming it.
fn toolchain_path(binary: &str, description: &str) -> Result<String> {
    which(binary)
        .map(|path| path.display().to_string())
        .with_context(|| format!("Cannot find {description} on path ({binary})"))
}

/// Finds and returns the path to the gcc binary.
pub fn gcc_path() -> Result<String> {
    toolchain_path("gcc", "a C compiler")
}

/// Finds and returns the path to the g++ binary.
pub fn gpp_path() -> Result<String> {
    toolchain_path("g++", "a C++ compiler")
}

/// Finds and returns the path to the javac binary.
pub fn javac_path() -> Result<String> {
    toolchain_path("javac", "a Java compiler")
}

/// Finds and returns the path to the java binary.
pub fn java_path() -> Result<String> {
    toolchain_path("java", "a Java runtime")
}

/// Finds and returns the path to the python3 binary.
pub fn python3_path() -> Result<String> {
    toolchain_path("python3", "a Python 3 interpreter")
}

/// A glob utility function to find paths to files with certain extension
///
/// * `extension`: the file extension to find paths for
/// * `search_depth`: how many folders deep to search for
/// * `root_dir`: the root directory where search starts
pub fn find_files(extension: &str, search_depth: i8, root_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pattern = root_dir.to_path_buf();

    for _ in 0..search_depth {
        pattern.push("**");
    }

    pattern.push(format!("*.{extension}"));
    let pattern = pattern
        .to_str()
        .context("Could not convert root_dir to string")?
        .to_string();

    Ok(glob(&pattern)
        .context("Could not create glob")?
        .filter_map(Result::ok)
        .collect())
}
