//! Tests for `vpl_evaluate.cases` generation.

use tempfile::TempDir;
use vpltools::{
    cases::{cases_file_path, make_cases_file, overwrite_file_if_different},
    TestMethod,
};

fn methods() -> Vec<TestMethod> {
    vec![
        TestMethod {
            module: "test_assignment".to_string(),
            class:  "TestAssignment".to_string(),
            method: "test_addition".to_string(),
        },
        TestMethod {
            module: "test_assignment".to_string(),
            class:  "TestAssignment".to_string(),
            method: "test_overflow".to_string(),
        },
    ]
}

#[test]
fn writes_one_block_per_test_method() {
    let dir = TempDir::new().expect("tempdir");
    let wrote = make_cases_file(dir.path(), &methods(), false).expect("write cases");
    assert!(wrote);

    let contents =
        std::fs::read_to_string(cases_file_path(dir.path())).expect("read cases file");
    assert_eq!(contents.matches("Case = ").count(), 2);
    assert!(contents.contains("Case = test_addition\n"));
    assert!(contents.contains(
        "program arguments = -m unittest test_assignment.TestAssignment.test_overflow\n"
    ));
    assert!(contents.contains("expected exit code = 0\n"));
    assert!(contents.contains("grade reduction = 100%\n"));
}

#[test]
fn nested_module_paths_are_flattened_for_the_grader() {
    let dir = TempDir::new().expect("tempdir");
    let methods = vec![TestMethod {
        module: "graders.unit.test_assignment".to_string(),
        class:  "TestAssignment".to_string(),
        method: "test_addition".to_string(),
    }];
    make_cases_file(dir.path(), &methods, false).expect("write cases");

    let contents =
        std::fs::read_to_string(cases_file_path(dir.path())).expect("read cases file");
    assert!(contents.contains(
        "program arguments = -m unittest test_assignment.TestAssignment.test_addition\n"
    ));
    assert!(!contents.contains("graders.unit"));
}

#[test]
fn pylint_block_is_appended_without_reducing_grade() {
    let dir = TempDir::new().expect("tempdir");
    make_cases_file(dir.path(), &methods(), true).expect("write cases");

    let contents =
        std::fs::read_to_string(cases_file_path(dir.path())).expect("read cases file");
    assert!(contents.contains("Case = PyLint Style Check\n"));
    assert!(contents.contains("program arguments = -m pylint test_assignment\n"));
    assert!(contents.contains("grade reduction = 0%\n"));
}

#[test]
fn regeneration_with_identical_content_does_not_rewrite() {
    let dir = TempDir::new().expect("tempdir");
    assert!(make_cases_file(dir.path(), &methods(), false).expect("first write"));
    assert!(!make_cases_file(dir.path(), &methods(), false).expect("second write"));
    assert!(make_cases_file(dir.path(), &methods(), true).expect("changed content"));
}

#[test]
fn overwrite_reports_whether_disk_changed() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("out.cases");

    assert!(overwrite_file_if_different(&path, "alpha").expect("create"));
    assert!(!overwrite_file_if_different(&path, "alpha").expect("no-op"));
    assert!(overwrite_file_if_different(&path, "beta").expect("update"));
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "beta");
}
