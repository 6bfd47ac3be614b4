use crate::VirtualFileSystem;

#[test]
fn fixture() {
    let vfs = VirtualFileSystem::copy(crate::parent_directory!().join("in"));

    crate::cli!()
        .arg("--format")
        .arg("json")
        .current_dir(vfs.root())
        .assert()
        .code(1)
        .stdout(include_str!("stdout.log"))
        .stderr("");

    vfs.verify_against(crate::parent_directory!().join("in"));
}

#[test]
fn human_output() {
    let vfs = VirtualFileSystem::copy(crate::parent_directory!().join("in"));

    let output = crate::cli!()
        .arg(".")
        .current_dir(vfs.root())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    for expected in [
        "SchemaColumnCasing",
        "column `userId` is not snake_case",
        "Storage columns must be snake_case, use `user_id`.",
        "alias `session_id` is not camelCase",
        "Query aliases are API field names, use `sessionId`.",
        "incorrect mapping for `userName`",
        "The canonical column name for `userName` is `user_name`.",
        "object key `user_id` is not camelCase",
        "found 5 issues in 2 files",
    ] {
        assert!(stdout.contains(expected), "missing {expected:?} in:\n{stdout}");
    }
}
