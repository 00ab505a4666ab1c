#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::sync::OnceLock;

use anyhow::Context;
use regex::Regex;

use crate::{
    error::{Error, Result},
    util,
};

use super::SourceSet;

/// Matches a top-level `package` declaration anywhere in a source file.
fn package_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*package\s+.*;").expect("valid package regex"))
}

/// Matches the standard runnable entry-point signature.
fn main_method_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"public\s+static\s+void\s+main").expect("valid main regex"))
}

/// Represents a program written in Java, e.g. a student's submission, or
/// an instructor's key program.
///
/// The grader's execution model is a flat, single-directory, no-package
/// class space; the entry class is whichever source file declares a
/// `public static void main`, discovered by content scan at construction.
#[derive(Debug, Clone)]
pub struct JavaProgram {
    /// Sources and naming for this program.
    pub(crate) sources: SourceSet,
    /// Class name `java` is invoked with.
    entry_class:        String,
}

impl JavaProgram {
    /// Wraps a detected Java source set, scanning for the entry class.
    pub(crate) fn new(sources: SourceSet) -> Result<JavaProgram> {
        let entry_class = find_main_class(&sources)?;
        Ok(JavaProgram {
            sources,
            entry_class,
        })
    }

    /// The class whose `main` gets invoked.
    pub fn entry_class(&self) -> &str {
        &self.entry_class
    }

    /// `javac {sources}`, refused up front when any source declares a
    /// package: packages are deliberately unsupported, and the student
    /// should hear that instead of a cryptic `NoClassDefFoundError`.
    pub fn compilation_command(&self) -> Result<Vec<String>> {
        for source_file in &self.sources.source_files {
            let contents = std::fs::read_to_string(self.sources.dir.join(source_file))
                .with_context(|| format!("Could not read Java source {source_file}"))?;
            if package_regex().is_match(&contents) {
                return Err(Error::UnsupportedFeature(
                    "Running Java packages is not supported by vpltools. Please remove the \
                     package statements."
                        .to_string(),
                ));
            }
        }

        let mut command = vec![util::javac_path()?];
        command.extend(self.sources.source_files.iter().cloned());
        Ok(command)
    }

    /// `java {entry_class} {args}`.
    pub fn run_argv(&self, cli_args: &[String]) -> Result<Vec<String>> {
        let mut argv = vec![util::java_path()?, self.entry_class.clone()];
        argv.extend(cli_args.iter().cloned());
        Ok(argv)
    }
}

/// Scans the sources in order for a `public static void main` signature;
/// the first file containing one becomes the run target.
fn find_main_class(sources: &SourceSet) -> Result<String> {
    for source_file in &sources.source_files {
        let contents = std::fs::read_to_string(sources.dir.join(source_file))
            .with_context(|| format!("Could not read Java source {source_file}"))?;
        if main_method_regex().is_match(&contents) {
            let class = source_file
                .split('.')
                .next()
                .unwrap_or(source_file)
                .to_string();
            return Ok(class);
        }
    }

    Err(Error::NoMainMethod {
        files: sources.source_files.clone(),
    })
}
