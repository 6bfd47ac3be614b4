#[test]
fn missing_path_fails() {
    let dir = assert_fs::TempDir::new().unwrap();

    let output = crate::cli!()
        .arg("does-not-exist")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does-not-exist"));
}

#[test]
fn unknown_rule_fails() {
    let dir = assert_fs::TempDir::new().unwrap();

    let output = crate::cli!()
        .arg("--deny")
        .arg("NoSuchRule")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("NoSuchRule"));
}

#[test]
fn missing_config_file_fails() {
    let dir = assert_fs::TempDir::new().unwrap();

    crate::cli!()
        .arg("--config")
        .arg("missing.toml")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stdout("");
}
