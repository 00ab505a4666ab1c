//! End-to-end fixture tests for C submissions. Skipped when gcc is not
//! installed.

use std::path::Path;

use tempfile::TempDir;
use vpltools::{Error, Fixture, FixtureConfig, SupportedLanguage};

fn gcc_available() -> bool {
    which::which("gcc").is_ok()
}

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).expect("write source");
}

const ECHO_SUM: &str = r#"
#include <stdio.h>
int main(void) {
    int a, b;
    if (scanf("%d %d", &a, &b) != 2) return 1;
    printf("%d\n", a + b);
    return 0;
}
"#;

const CRASHER: &str = r#"
#include <stdio.h>
int main(void) {
    fprintf(stderr, "boom\n");
    return 3;
}
"#;

#[test]
fn compiles_and_runs_a_c_submission() {
    if !gcc_available() {
        eprintln!("gcc not found, skipping");
        return;
    }

    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "sum.c", ECHO_SUM);

    let fixture = Fixture::setup(dir.path(), FixtureConfig::default()).expect("setup");
    assert_eq!(
        fixture.student_program().language(),
        SupportedLanguage::C
    );
    assert!(dir.path().join("student_program").exists());

    let result = fixture
        .run_student_program(&[], "20 22\n")
        .expect("run student program");
    assert_eq!(result.stdout.trim(), "42");
}

#[test]
fn student_crash_is_reported_with_command_and_stderr() {
    if !gcc_available() {
        eprintln!("gcc not found, skipping");
        return;
    }

    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "crash.c", CRASHER);

    let fixture = Fixture::setup(dir.path(), FixtureConfig::default()).expect("setup");
    let err = fixture.run_student_program(&[], "").unwrap_err();

    match err {
        Error::RunFailed(failure) => {
            assert_eq!(failure.result.exit_code, Some(3));
            assert!(failure.result.stderr.contains("boom"));
            let message = failure.to_string();
            assert!(message.contains("Your program crashed!"));
            assert!(message.contains("student_program"));
        }
        other => panic!("expected RunFailed, got {other:?}"),
    }
}

#[test]
fn masked_key_program_compiles_and_runs_alongside_student() {
    if !gcc_available() {
        eprintln!("gcc not found, skipping");
        return;
    }

    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "sum.c", ECHO_SUM);
    write(dir.path(), "key.c.hidden", ECHO_SUM);

    let config = FixtureConfig::builder()
        .key_source_files(vec!["key.c".to_string()])
        .build();

    {
        let fixture = Fixture::setup(dir.path(), config).expect("setup");
        let student = fixture.run_student_program(&[], "1 2\n").expect("student");
        let key = fixture.run_key_program(&[], "1 2\n").expect("key");
        assert_eq!(student.stdout, key.stdout);
    }

    // Dropping the fixture masks the key source again.
    assert!(dir.path().join("key.c.hidden").exists());
    assert!(!dir.path().join("key.c").exists());
}

#[test]
fn corrupted_binary_is_recompiled_and_rerun() {
    if !gcc_available() {
        eprintln!("gcc not found, skipping");
        return;
    }

    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "sum.c", ECHO_SUM);

    let fixture = Fixture::setup(dir.path(), FixtureConfig::default()).expect("setup");
    let first = fixture.run_student_program(&[], "1 1\n").expect("first run");
    assert_eq!(first.stdout.trim(), "2");

    // A binary built on another machine: executable, but not for this
    // one. Overwriting keeps the exec bit the compiler set.
    write(dir.path(), "student_program", "this is not machine code\n");

    let recovered = fixture
        .run_student_program(&[], "20 22\n")
        .expect("recompile and retry after corrupt artifact");
    assert_eq!(recovered.stdout.trim(), "42");
}

#[test]
fn deleted_binary_is_recompiled_and_rerun() {
    if !gcc_available() {
        eprintln!("gcc not found, skipping");
        return;
    }

    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "sum.c", ECHO_SUM);

    let fixture = Fixture::setup(dir.path(), FixtureConfig::default()).expect("setup");
    std::fs::remove_file(dir.path().join("student_program")).expect("delete artifact");

    let recovered = fixture
        .run_student_program(&[], "20 22\n")
        .expect("recompile and retry after missing artifact");
    assert_eq!(recovered.stdout.trim(), "42");
    assert!(dir.path().join("student_program").exists());
}

#[cfg(unix)]
#[test]
fn binary_without_exec_bit_is_recompiled_and_rerun() {
    use std::os::unix::fs::PermissionsExt;

    if !gcc_available() {
        eprintln!("gcc not found, skipping");
        return;
    }

    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "sum.c", ECHO_SUM);

    let fixture = Fixture::setup(dir.path(), FixtureConfig::default()).expect("setup");
    let binary = dir.path().join("student_program");
    std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o644))
        .expect("strip exec bit");

    let recovered = fixture
        .run_student_program(&[], "20 22\n")
        .expect("recompile and retry after missing exec bit");
    assert_eq!(recovered.stdout.trim(), "42");
}

#[test]
fn compilation_failure_carries_compiler_output() {
    if !gcc_available() {
        eprintln!("gcc not found, skipping");
        return;
    }

    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "broken.c", "int main(void) { return 0");

    let err = Fixture::setup(dir.path(), FixtureConfig::default()).unwrap_err();
    match err {
        Error::CompilationFailed { stderr, .. } => assert!(!stderr.is_empty()),
        other => panic!("expected CompilationFailed, got {other:?}"),
    }
}

#[test]
fn clean_artifacts_removes_compiled_binaries() {
    if !gcc_available() {
        eprintln!("gcc not found, skipping");
        return;
    }

    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "sum.c", ECHO_SUM);

    let fixture = Fixture::setup(dir.path(), FixtureConfig::default()).expect("setup");
    assert!(dir.path().join("student_program").exists());
    fixture.clean_artifacts().expect("clean");
    assert!(!dir.path().join("student_program").exists());
}
