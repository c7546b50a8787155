use std::fs;

use cnpj_scan_engine::{estimate_directory, EstimateError, LocalEstimate};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn counts_files_lines_and_declarations_recursively() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("src").join("billing");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        nested.join("Invoice.java"),
        "public class Invoice {\n    public String formatCnpj(String raw) {\n    }\n    private boolean isValid (String cnpj) {\n    }\n}",
    )
    .unwrap();
    fs::write(temp.path().join("notes.txt"), "nothing here").unwrap();

    let estimate = estimate_directory(temp.path()).unwrap();

    assert_eq!(
        estimate,
        LocalEstimate {
            files: 2,
            lines: 7,
            methods: 2,
        }
    );
}

#[test]
fn skips_non_utf8_files() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("blob.bin"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
    fs::write(temp.path().join("A.cs"), "protected void Run() {}").unwrap();

    let estimate = estimate_directory(temp.path()).unwrap();
    assert_eq!(estimate.files, 1);
    assert_eq!(estimate.methods, 1);
}

#[test]
fn empty_directory_is_all_zero() {
    let temp = TempDir::new().unwrap();
    assert_eq!(estimate_directory(temp.path()).unwrap(), LocalEstimate::default());
}

#[test]
fn rejects_a_file_root() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("Main.java");
    fs::write(&file, "").unwrap();

    assert!(matches!(
        estimate_directory(&file),
        Err(EstimateError::NotADirectory(path)) if path == file
    ));
}
