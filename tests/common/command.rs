use crate::common::file::{write_file, FileSpec};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with one commit: 1.txt, a/2.txt, a/b/3.txt
#[fixture]
pub fn committed_repository_dir(repository_dir: TempDir) -> TempDir {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    run_gitlet_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();
    gitlet_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_gitlet_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("gitlet").expect("Failed to find gitlet binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn gitlet_commit(dir: &Path, message: &str) -> Command {
    run_gitlet_command(dir, &["commit", "-m", message])
}

/// Read a metadata file (HEAD, index, config, refs/...) of a repository
pub fn read_meta_file(dir: &Path, name: &str) -> String {
    let mut path = dir.join(".gitlet");
    for part in name.split('/') {
        path = path.join(part);
    }
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

/// The hash a local branch currently points at
pub fn branch_hash(dir: &Path, branch: &str) -> String {
    read_meta_file(dir, &format!("refs/heads/{branch}"))
        .trim()
        .to_string()
}

/// The hash HEAD currently resolves to, following a branch attachment
pub fn head_hash(dir: &Path) -> String {
    let head = read_meta_file(dir, "HEAD");
    match head.trim().strip_prefix("ref: refs/heads/") {
        Some(branch) => branch_hash(dir, branch),
        None => head.trim().to_string(),
    }
}

/// Read a stored object by hash
pub fn read_object(dir: &Path, hash: &str) -> String {
    let path = dir.join(".gitlet").join("objects").join(hash);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read object {}: {}", path.display(), e))
}
