#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of languages a submission may be written in.
///
/// One value per language, constructed once as [`SupportedLanguage::ALL`]
/// and never mutated. Equality and hashing go through the variant itself,
/// which stands in for the language name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportedLanguage {
    /// C, compiled with gcc.
    C,
    /// C++, compiled with g++.
    Cpp,
    /// Java, compiled with javac and run on the JVM.
    Java,
    /// Python 3, interpreted.
    Python,
    /// A single SQL query, executed by a database collaborator.
    Sql,
}

impl SupportedLanguage {
    /// Every supported language, in the order extension matching runs.
    pub const ALL: [SupportedLanguage; 5] = [
        SupportedLanguage::C,
        SupportedLanguage::Cpp,
        SupportedLanguage::Java,
        SupportedLanguage::Python,
        SupportedLanguage::Sql,
    ];

    /// Human-readable language name.
    pub fn name(&self) -> &'static str {
        match self {
            SupportedLanguage::C => "C",
            SupportedLanguage::Cpp => "C++",
            SupportedLanguage::Java => "Java",
            SupportedLanguage::Python => "Python",
            SupportedLanguage::Sql => "SQL",
        }
    }

    /// Source file extension, dot included.
    pub fn extension(&self) -> &'static str {
        match self {
            SupportedLanguage::C => ".c",
            SupportedLanguage::Cpp => ".cpp",
            SupportedLanguage::Java => ".java",
            SupportedLanguage::Python => ".py",
            SupportedLanguage::Sql => ".sql",
        }
    }

    /// Returns true when `file_name` carries this language's extension.
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.ends_with(self.extension())
    }

    /// Looks up the language owning `file_name`'s extension, if any.
    pub fn of_file(file_name: &str) -> Option<SupportedLanguage> {
        SupportedLanguage::ALL
            .into_iter()
            .find(|lang| lang.matches(file_name))
    }

    /// True for languages that execute without a build step.
    pub fn is_interpreted(&self) -> bool {
        matches!(self, SupportedLanguage::Python | SupportedLanguage::Sql)
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
