use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;
use common::{read_meta_file, repository_dir, run_gitlet_command};

#[rstest]
fn init_lays_out_repository_metadata(repository_dir: TempDir) {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Initialized empty Gitlet repository in",
        ));

    assert_eq!(
        read_meta_file(repository_dir.path(), "HEAD"),
        "ref: refs/heads/master\n"
    );
    assert!(read_meta_file(repository_dir.path(), "config").contains("bare = false"));
    assert!(repository_dir.path().join(".gitlet/objects").is_dir());
    assert!(repository_dir.path().join(".gitlet/refs/heads").is_dir());
}

#[rstest]
fn bare_init_lays_out_metadata_at_the_top_level(repository_dir: TempDir) {
    run_gitlet_command(repository_dir.path(), &["init", "--bare"])
        .assert()
        .success();

    let head = std::fs::read_to_string(repository_dir.path().join("HEAD")).unwrap();
    assert_eq!(head, "ref: refs/heads/master\n");
    let config = std::fs::read_to_string(repository_dir.path().join("config")).unwrap();
    assert!(config.contains("bare = true"));
    assert!(repository_dir.path().join("objects").is_dir());
    assert!(!repository_dir.path().join(".gitlet").exists());
}

#[rstest]
fn init_refuses_an_existing_repository(repository_dir: TempDir) {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already in a Gitlet repository"));
}

#[rstest]
fn worktree_commands_refuse_a_bare_repository(repository_dir: TempDir) {
    run_gitlet_command(repository_dir.path(), &["init", "--bare"])
        .assert()
        .success();

    run_gitlet_command(repository_dir.path(), &["status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "this operation must be run in a work tree",
        ));
}

#[rstest]
fn commands_refuse_to_run_outside_a_repository(repository_dir: TempDir) {
    run_gitlet_command(repository_dir.path(), &["status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a Gitlet repository"));
}
