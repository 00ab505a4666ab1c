#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::Path;

use itertools::Itertools;

use crate::{
    error::{Error, Result},
    language::SupportedLanguage,
    program::{Program, SourceSet},
};

/// Partitions `file_list` into the single language in play and its source
/// files.
///
/// Files matching no registered extension (a README, data files) are
/// ignored. Files of two or more registered languages are an error:
/// earlier harness revisions locked in whichever language the directory
/// listing happened to produce first, which made the selected language an
/// accident of the filesystem.
pub fn detect_language(file_list: &[String]) -> Result<(SupportedLanguage, Vec<String>)> {
    let mut languages: Vec<SupportedLanguage> = Vec::new();
    let mut source_files: Vec<String> = Vec::new();

    for file in file_list {
        if let Some(language) = SupportedLanguage::of_file(file) {
            if !languages.contains(&language) {
                languages.push(language);
            }
            source_files.push(file.clone());
        }
    }

    match languages.as_slice() {
        [] => Err(Error::NoProgram {
            files: file_list.to_vec(),
        }),
        [language] => Ok((*language, source_files)),
        _ => Err(Error::AmbiguousLanguages {
            languages: languages
                .into_iter()
                .sorted_by_key(|lang| lang.name())
                .collect(),
        }),
    }
}

/// Searches `file_list` for files of a supported language and returns a
/// [`Program`] of the appropriate variant, named `executable_name`.
///
/// * `permitted`: languages the assignment accepts; detecting anything
///   else fails with the allowed set in the message.
pub fn detect_and_make_program(
    dir: &Path,
    file_list: &[String],
    executable_name: &str,
    output_file_name: Option<&str>,
    permitted: &[SupportedLanguage],
) -> Result<Program> {
    let (language, source_files) = detect_language(file_list)?;

    if !permitted.contains(&language) {
        return Err(Error::LanguageNotPermitted {
            detected:  language,
            permitted: permitted.to_vec(),
        });
    }

    tracing::info!(%language, ?source_files, "detected submission language");

    Program::new(
        language,
        SourceSet {
            dir:              dir.to_path_buf(),
            source_files,
            executable_name:  executable_name.to_string(),
            output_file_name: output_file_name.map(str::to_string),
        },
    )
}
