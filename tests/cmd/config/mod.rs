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
}

#[test]
fn cli_overrides_config_file() {
    let vfs = VirtualFileSystem::copy(crate::parent_directory!().join("in"));

    crate::cli!()
        .arg("--format")
        .arg("json")
        .arg("--allow")
        .arg("SchemaColumnCasing")
        .current_dir(vfs.root())
        .assert()
        .success()
        .stdout("[]\n");

    let output = crate::cli!()
        .arg("--format")
        .arg("json")
        .arg("--deny")
        .arg("SchemaColumnCasing")
        .current_dir(vfs.root())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    pretty_assertions::assert_str_eq!(
        include_str!("stdout.log").replace("\"warning\"", "\"error\""),
        String::from_utf8(output.stdout).unwrap()
    );
}

#[test]
fn explicit_config_file() {
    let vfs = VirtualFileSystem::copy(crate::parent_directory!().join("in"));
    std::fs::write(
        vfs.root().join("strict.toml"),
        "[rules]\nSchemaColumnCasing = \"allow\"\n",
    )
    .unwrap();

    // default exclusions apply again, so the generated mapping is reported
    let output = crate::cli!()
        .arg("--format")
        .arg("json")
        .arg("--config")
        .arg("strict.toml")
        .current_dir(vfs.root())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    let issues: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rules: Vec<_> = issues
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["rule"].as_str().unwrap().to_owned())
        .collect();

    assert_eq!(
        rules,
        vec!["MappingConsistency", "ObjectKeyCasing"],
        "{issues:#}"
    );
}
