use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::Path;

mod common;
use common::{
    branch_hash, gitlet_commit, head_hash, read_meta_file, read_object, repository_dir,
    run_gitlet_command, write_file, FileSpec,
};

/// A repository whose master and feat branches both edited a/b.txt
///
/// History:
///
/// ```text
///       base (a/b.txt = "first")
///      /    \
///   master   feat
///   ("m1")  ("f1")
/// ```
fn diverge_on_same_file(dir: &Path) {
    run_gitlet_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("a").join("b.txt"), "first".to_string()));
    run_gitlet_command(dir, &["add", "a/b.txt"]).assert().success();
    gitlet_commit(dir, "base").assert().success();

    run_gitlet_command(dir, &["branch", "feat"]).assert().success();

    write_file(FileSpec::new(dir.join("a").join("b.txt"), "m1".to_string()));
    run_gitlet_command(dir, &["add", "a/b.txt"]).assert().success();
    gitlet_commit(dir, "master edit").assert().success();

    run_gitlet_command(dir, &["checkout", "feat"]).assert().success();
    write_file(FileSpec::new(dir.join("a").join("b.txt"), "f1".to_string()));
    run_gitlet_command(dir, &["add", "a/b.txt"]).assert().success();
    gitlet_commit(dir, "feat edit").assert().success();

    run_gitlet_command(dir, &["checkout", "master"]).assert().success();
}

#[rstest]
fn conflicting_merge_writes_markers_and_stages(repository_dir: TempDir) {
    let dir = repository_dir;
    diverge_on_same_file(dir.path());

    run_gitlet_command(dir.path(), &["merge", "feat"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Automatic merge failed. Fix conflicts and commit the result.",
        ));

    assert_eq!(
        std::fs::read_to_string(dir.path().join("a/b.txt")).unwrap(),
        "<<<<<<\nm1\n======\nf1\n>>>>>>\n"
    );

    let index = read_meta_file(dir.path(), "index");
    assert!(index.lines().any(|line| line.starts_with("a/b.txt 1 ")));
    assert!(index.lines().any(|line| line.starts_with("a/b.txt 2 ")));
    assert!(index.lines().any(|line| line.starts_with("a/b.txt 3 ")));
    assert!(!index.lines().any(|line| line.starts_with("a/b.txt 0 ")));

    assert!(dir.path().join(".gitlet/MERGE_HEAD").exists());
    let merge_msg = read_meta_file(dir.path(), "MERGE_MSG");
    assert!(merge_msg.starts_with("Merge feat into master"));
    assert!(merge_msg.contains("Conflicts:\na/b.txt"));
}

#[rstest]
fn committing_with_unresolved_conflicts_is_refused(repository_dir: TempDir) {
    let dir = repository_dir;
    diverge_on_same_file(dir.path());
    run_gitlet_command(dir.path(), &["merge", "feat"]).assert().success();

    run_gitlet_command(dir.path(), &["commit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("U a/b.txt"))
        .stderr(predicate::str::contains(
            "cannot commit because you have unmerged files",
        ));
}

#[rstest]
fn resolving_and_committing_finalizes_the_merge(repository_dir: TempDir) {
    let dir = repository_dir;
    diverge_on_same_file(dir.path());
    let master_tip = head_hash(dir.path());
    let feat_tip = branch_hash(dir.path(), "feat");

    run_gitlet_command(dir.path(), &["merge", "feat"]).assert().success();

    // keep the marker text as the resolution and stage it
    run_gitlet_command(dir.path(), &["add", "a/b.txt"]).assert().success();

    run_gitlet_command(dir.path(), &["commit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merge made by the three-way strategy."));

    assert!(!dir.path().join(".gitlet/MERGE_HEAD").exists());
    assert!(!dir.path().join(".gitlet/MERGE_MSG").exists());

    let merge_commit = read_object(dir.path(), &head_hash(dir.path()));
    assert!(merge_commit.contains(&format!("parent {master_tip}")));
    assert!(merge_commit.contains(&format!("parent {feat_tip}")));
    assert!(merge_commit.contains("    Merge feat into master"));
}

#[rstest]
fn fast_forward_merge_moves_the_branch_pointer(repository_dir: TempDir) {
    let dir = repository_dir;

    run_gitlet_command(dir.path(), &["init"]).assert().success();
    write_file(FileSpec::new(dir.path().join("base.txt"), "base".to_string()));
    run_gitlet_command(dir.path(), &["add", "."]).assert().success();
    gitlet_commit(dir.path(), "base").assert().success();

    run_gitlet_command(dir.path(), &["branch", "feat"]).assert().success();
    run_gitlet_command(dir.path(), &["checkout", "feat"]).assert().success();

    write_file(FileSpec::new(dir.path().join("feat.txt"), "ahead".to_string()));
    run_gitlet_command(dir.path(), &["add", "."]).assert().success();
    gitlet_commit(dir.path(), "feat ahead").assert().success();
    let feat_tip = head_hash(dir.path());

    run_gitlet_command(dir.path(), &["checkout", "master"]).assert().success();
    assert!(!dir.path().join("feat.txt").exists());

    run_gitlet_command(dir.path(), &["merge", "feat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fast-forward"));

    assert_eq!(branch_hash(dir.path(), "master"), feat_tip);
    assert!(!dir.path().join(".gitlet/MERGE_HEAD").exists());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("feat.txt")).unwrap(),
        "ahead"
    );
}

#[rstest]
fn merge_of_an_already_contained_commit_is_up_to_date(repository_dir: TempDir) {
    let dir = repository_dir;

    run_gitlet_command(dir.path(), &["init"]).assert().success();
    write_file(FileSpec::new(dir.path().join("base.txt"), "base".to_string()));
    run_gitlet_command(dir.path(), &["add", "."]).assert().success();
    gitlet_commit(dir.path(), "base").assert().success();
    run_gitlet_command(dir.path(), &["branch", "feat"]).assert().success();

    write_file(FileSpec::new(dir.path().join("more.txt"), "more".to_string()));
    run_gitlet_command(dir.path(), &["add", "."]).assert().success();
    gitlet_commit(dir.path(), "ahead of feat").assert().success();

    run_gitlet_command(dir.path(), &["merge", "feat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already up-to-date"));
}

#[rstest]
fn non_conflicting_divergence_merges_in_one_step(repository_dir: TempDir) {
    let dir = repository_dir;

    run_gitlet_command(dir.path(), &["init"]).assert().success();
    write_file(FileSpec::new(dir.path().join("right.txt"), "initial".to_string()));
    run_gitlet_command(dir.path(), &["add", "."]).assert().success();
    gitlet_commit(dir.path(), "base").assert().success();

    run_gitlet_command(dir.path(), &["branch", "feat"]).assert().success();

    // master gains a new file; feat edits the shared one
    write_file(FileSpec::new(dir.path().join("master-only.txt"), "new".to_string()));
    run_gitlet_command(dir.path(), &["add", "."]).assert().success();
    gitlet_commit(dir.path(), "master addition").assert().success();

    run_gitlet_command(dir.path(), &["checkout", "feat"]).assert().success();
    write_file(FileSpec::new(dir.path().join("right.txt"), "feat change".to_string()));
    run_gitlet_command(dir.path(), &["add", "."]).assert().success();
    gitlet_commit(dir.path(), "feat edit").assert().success();

    run_gitlet_command(dir.path(), &["checkout", "master"]).assert().success();
    run_gitlet_command(dir.path(), &["merge", "feat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merge made by the three-way strategy."));

    assert_eq!(
        std::fs::read_to_string(dir.path().join("master-only.txt")).unwrap(),
        "new"
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("right.txt")).unwrap(),
        "feat change"
    );
    assert!(!dir.path().join(".gitlet/MERGE_HEAD").exists());

    let merge_commit = read_object(dir.path(), &head_hash(dir.path()));
    assert_eq!(merge_commit.matches("parent ").count(), 2);
}

#[rstest]
fn merge_into_a_detached_head_is_unsupported(repository_dir: TempDir) {
    let dir = repository_dir;
    diverge_on_same_file(dir.path());
    let master_tip = head_hash(dir.path());

    run_gitlet_command(dir.path(), &["checkout", &master_tip])
        .assert()
        .success();

    run_gitlet_command(dir.path(), &["merge", "feat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported"));
}

#[rstest]
fn merge_refuses_to_clobber_unsaved_changes(repository_dir: TempDir) {
    let dir = repository_dir;
    diverge_on_same_file(dir.path());

    write_file(FileSpec::new(dir.path().join("a/b.txt"), "unsaved".to_string()));

    run_gitlet_command(dir.path(), &["merge", "feat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("local changes would be lost"));
}
