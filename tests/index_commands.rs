use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;
use common::{
    committed_repository_dir, gitlet_commit, read_meta_file, repository_dir, run_gitlet_command,
    write_file, FileSpec,
};

#[rstest]
fn add_stages_files_from_nested_directories(repository_dir: TempDir) {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b.txt"),
        "first".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("top.txt"),
        "second".to_string(),
    ));

    run_gitlet_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    let index = read_meta_file(repository_dir.path(), "index");
    let lines = index.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("a/b.txt 0 "));
    assert!(lines[1].starts_with("top.txt 0 "));
}

#[rstest]
fn add_refuses_paths_matching_nothing(repository_dir: TempDir) {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_gitlet_command(repository_dir.path(), &["add", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("did not match any files"));
}

#[rstest]
fn update_index_refuses_directories(committed_repository_dir: TempDir) {
    run_gitlet_command(committed_repository_dir.path(), &["update-index", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("a is a directory - add files inside"));
}

#[rstest]
fn update_index_requires_the_add_flag_for_new_files(committed_repository_dir: TempDir) {
    write_file(FileSpec::new(
        committed_repository_dir.path().join("new.txt"),
        "fresh".to_string(),
    ));

    run_gitlet_command(committed_repository_dir.path(), &["update-index", "new.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "cannot add new.txt to index - use --add option",
        ));

    run_gitlet_command(
        committed_repository_dir.path(),
        &["update-index", "new.txt", "--add"],
    )
    .assert()
    .success();

    let index = read_meta_file(committed_repository_dir.path(), "index");
    assert!(index.lines().any(|line| line.starts_with("new.txt 0 ")));
}

#[rstest]
fn update_index_restages_known_files_without_the_add_flag(
    committed_repository_dir: TempDir,
) {
    write_file(FileSpec::new(
        committed_repository_dir.path().join("1.txt"),
        "changed".to_string(),
    ));

    let before = read_meta_file(committed_repository_dir.path(), "index");
    run_gitlet_command(committed_repository_dir.path(), &["update-index", "1.txt"])
        .assert()
        .success();
    let after = read_meta_file(committed_repository_dir.path(), "index");

    assert_ne!(before, after);
}

#[rstest]
fn update_index_remove_of_a_missing_unindexed_path_is_a_no_op(
    committed_repository_dir: TempDir,
) {
    let before = read_meta_file(committed_repository_dir.path(), "index");
    run_gitlet_command(
        committed_repository_dir.path(),
        &["update-index", "ghost.txt", "--remove"],
    )
    .assert()
    .success();
    let after = read_meta_file(committed_repository_dir.path(), "index");

    assert_eq!(before, after);
}

#[rstest]
fn update_index_remove_drops_deleted_files(committed_repository_dir: TempDir) {
    std::fs::remove_file(committed_repository_dir.path().join("1.txt")).unwrap();

    run_gitlet_command(
        committed_repository_dir.path(),
        &["update-index", "1.txt", "--remove"],
    )
    .assert()
    .success();

    let index = read_meta_file(committed_repository_dir.path(), "index");
    assert!(!index.contains("1.txt"));
}

#[rstest]
fn update_index_refuses_missing_files_without_the_remove_flag(
    committed_repository_dir: TempDir,
) {
    run_gitlet_command(committed_repository_dir.path(), &["update-index", "ghost.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "ghost.txt does not exist and --remove not passed",
        ));
}

#[rstest]
fn rm_unstages_and_deletes_a_committed_file(committed_repository_dir: TempDir) {
    run_gitlet_command(committed_repository_dir.path(), &["rm", "1.txt"])
        .assert()
        .success();

    assert!(!committed_repository_dir.path().join("1.txt").exists());
    let index = read_meta_file(committed_repository_dir.path(), "index");
    assert!(!index.contains("1.txt"));
}

#[rstest]
fn rm_refuses_directories_without_the_recursive_flag(committed_repository_dir: TempDir) {
    run_gitlet_command(committed_repository_dir.path(), &["rm", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not removing a recursively without -r"));

    run_gitlet_command(committed_repository_dir.path(), &["rm", "a", "-r"])
        .assert()
        .success();
    assert!(!committed_repository_dir.path().join("a").exists());
}

#[rstest]
fn rm_keeps_the_force_flag_reserved(committed_repository_dir: TempDir) {
    run_gitlet_command(committed_repository_dir.path(), &["rm", "1.txt", "-f"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported"));
}

#[rstest]
fn rm_refuses_files_with_unsaved_changes(committed_repository_dir: TempDir) {
    write_file(FileSpec::new(
        committed_repository_dir.path().join("1.txt"),
        "edited since the commit".to_string(),
    ));

    run_gitlet_command(committed_repository_dir.path(), &["rm", "1.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("these files have changes"));
}

#[rstest]
fn rm_refuses_paths_matching_nothing(committed_repository_dir: TempDir) {
    run_gitlet_command(committed_repository_dir.path(), &["rm", "ghost.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost.txt did not match any files"));
}

#[rstest]
fn write_tree_prints_the_root_tree_hash(committed_repository_dir: TempDir) {
    let output = run_gitlet_command(committed_repository_dir.path(), &["write-tree"])
        .output()
        .unwrap();
    let tree_hash = String::from_utf8(output.stdout).unwrap().trim().to_string();

    assert_eq!(tree_hash.len(), 40);
    let tree = common::read_object(committed_repository_dir.path(), &tree_hash);
    assert!(tree.contains("blob"));
    assert!(tree.lines().any(|line| line.ends_with(" 1.txt")));
    assert!(tree.lines().any(|line| line.ends_with(" a")));
}

#[rstest]
fn adding_from_a_subdirectory_stages_relative_to_the_root(repository_dir: TempDir) {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b.txt"),
        "nested".to_string(),
    ));

    run_gitlet_command(&repository_dir.path().join("a"), &["add", "b.txt"])
        .assert()
        .success();

    let index = read_meta_file(repository_dir.path(), "index");
    assert!(index.lines().any(|line| line.starts_with("a/b.txt 0 ")));

    gitlet_commit(repository_dir.path(), "nested add")
        .assert()
        .success();
}
