use crate::VirtualFileSystem;

#[test]
fn fixture() {
    let vfs = VirtualFileSystem::copy(crate::parent_directory!().join("in"));

    crate::cli!()
        .current_dir(vfs.root())
        .assert()
        .success()
        .stdout(include_str!("stdout.log"))
        .stderr("");

    vfs.verify_against(crate::parent_directory!().join("in"));
}

#[test]
fn verbose_lists_passing_files() {
    let vfs = VirtualFileSystem::copy(crate::parent_directory!().join("in"));

    crate::cli!()
        .arg("--verbose")
        .current_dir(vfs.root())
        .assert()
        .success()
        .stdout("ok: sql/schema.sql\nok: src/user.ts\nno issues found in 2 files\n");
}

#[test]
fn single_file() {
    let vfs = VirtualFileSystem::copy(crate::parent_directory!().join("in"));

    crate::cli!()
        .arg("src/user.ts")
        .arg("--format")
        .arg("json")
        .current_dir(vfs.root())
        .assert()
        .success()
        .stdout("[]\n");
}
