#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use anyhow::Context;

use crate::error::{Error, Result};

use super::SourceSet;

/// Represents a SELECT query written in SQL (or some other statement that
/// produces a result set).
///
/// There is no compile step and no process-level run; the query text is
/// handed to a database collaborator. This variant exists to participate
/// in the uniform detection/build interface.
#[derive(Debug, Clone)]
pub struct SqlQuery {
    /// Sources and naming for this query.
    pub(crate) sources: SourceSet,
}

impl SqlQuery {
    /// Wraps a detected SQL source set; exactly one file is permitted.
    pub(crate) fn new(sources: SourceSet) -> Result<SqlQuery> {
        if sources.source_files.len() != 1 {
            return Err(Error::InvalidSourceSet(format!(
                "Too many SQL files! Only one SQL file is supported. Found:\n {:?}",
                sources.source_files
            )));
        }
        Ok(SqlQuery { sources })
    }

    /// The name of the single query file.
    pub fn query_file(&self) -> &str {
        &self.sources.source_files[0]
    }

    /// Reads and returns the query text for the database collaborator.
    pub fn query_text(&self) -> Result<String> {
        let path = self.sources.dir.join(self.query_file());
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Could not read SQL file {}", path.display()))?;
        Ok(text)
    }
}
