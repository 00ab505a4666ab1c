//! Tests for language detection over classified file lists.

use tempfile::TempDir;
use vpltools::{
    detect::{detect_and_make_program, detect_language},
    Error, Program, SupportedLanguage,
};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn detects_single_c_file() {
    let (language, sources) =
        detect_language(&names(&["prog.c", "README", "input.txt"])).expect("detect");
    assert_eq!(language, SupportedLanguage::C);
    assert_eq!(sources, names(&["prog.c"]));
}

#[test]
fn detects_multi_file_java_submission() {
    let (language, sources) =
        detect_language(&names(&["Main.java", "Helper.java"])).expect("detect");
    assert_eq!(language, SupportedLanguage::Java);
    assert_eq!(sources.len(), 2);
}

#[test]
fn no_recognized_files_is_an_error() {
    let err = detect_language(&names(&["notes.md", "data.csv"])).unwrap_err();
    match err {
        Error::NoProgram { files } => assert_eq!(files, names(&["notes.md", "data.csv"])),
        other => panic!("expected NoProgram, got {other:?}"),
    }
}

#[test]
fn empty_directory_is_an_error() {
    assert!(matches!(
        detect_language(&[]).unwrap_err(),
        Error::NoProgram { .. }
    ));
}

#[test]
fn mixed_languages_are_refused_not_guessed() {
    let err = detect_language(&names(&["prog.c", "prog.py"])).unwrap_err();
    match err {
        Error::AmbiguousLanguages { languages } => {
            assert_eq!(languages, vec![SupportedLanguage::C, SupportedLanguage::Python]);
        }
        other => panic!("expected AmbiguousLanguages, got {other:?}"),
    }
}

#[test]
fn ambiguity_report_is_sorted_regardless_of_listing_order() {
    let err = detect_language(&names(&["z.py", "a.java", "m.c"])).unwrap_err();
    match err {
        Error::AmbiguousLanguages { languages } => {
            assert_eq!(
                languages,
                vec![
                    SupportedLanguage::C,
                    SupportedLanguage::Java,
                    SupportedLanguage::Python
                ]
            );
        }
        other => panic!("expected AmbiguousLanguages, got {other:?}"),
    }
}

#[test]
fn permitted_language_restriction_rejects_others() {
    let dir = TempDir::new().expect("tempdir");
    let err = detect_and_make_program(
        dir.path(),
        &names(&["prog.py"]),
        "student_program",
        None,
        &[SupportedLanguage::Java],
    )
    .unwrap_err();

    match err {
        Error::LanguageNotPermitted { detected, permitted } => {
            assert_eq!(detected, SupportedLanguage::Python);
            assert_eq!(permitted, vec![SupportedLanguage::Java]);
        }
        other => panic!("expected LanguageNotPermitted, got {other:?}"),
    }
}

#[test]
fn builds_c_program_variant() {
    let dir = TempDir::new().expect("tempdir");
    let program = detect_and_make_program(
        dir.path(),
        &names(&["prog.c", "helper.c"]),
        "student_program",
        Some("student_outfile"),
        &SupportedLanguage::ALL,
    )
    .expect("make program");

    assert!(matches!(program, Program::C(_)));
    assert_eq!(program.executable_name(), "student_program");
    assert_eq!(program.output_file_name(), Some("student_outfile"));
    assert_eq!(program.source_files(), names(&["prog.c", "helper.c"]));
}

#[test]
fn multi_file_python_without_main_py_is_refused() {
    let dir = TempDir::new().expect("tempdir");
    let err = detect_and_make_program(
        dir.path(),
        &names(&["alpha.py", "beta.py"]),
        "student_program",
        None,
        &SupportedLanguage::ALL,
    )
    .unwrap_err();

    assert!(matches!(err, Error::InvalidSourceSet(_)));
    assert!(err.to_string().contains("main.py"));
}

#[test]
fn multi_file_python_with_main_py_uses_it_as_entry() {
    let dir = TempDir::new().expect("tempdir");
    let program = detect_and_make_program(
        dir.path(),
        &names(&["helper.py", "main.py"]),
        "student_program",
        None,
        &SupportedLanguage::ALL,
    )
    .expect("make program");

    assert_eq!(program.executable_name(), "main.py");
}

#[test]
fn several_sql_files_are_refused() {
    let dir = TempDir::new().expect("tempdir");
    let err = detect_and_make_program(
        dir.path(),
        &names(&["one.sql", "two.sql"]),
        "student_program",
        None,
        &SupportedLanguage::ALL,
    )
    .unwrap_err();

    assert!(matches!(err, Error::InvalidSourceSet(_)));
}

#[test]
fn sql_query_text_round_trips_from_disk() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("query.sql"), "SELECT * FROM enrollment;\n")
        .expect("write query");

    let program = detect_and_make_program(
        dir.path(),
        &names(&["query.sql"]),
        "student_program",
        None,
        &SupportedLanguage::ALL,
    )
    .expect("make program");

    let Program::Sql(query) = &program else {
        panic!("expected SQL variant");
    };
    assert_eq!(query.query_file(), "query.sql");
    assert_eq!(
        query.query_text().expect("read query"),
        "SELECT * FROM enrollment;\n"
    );
}
