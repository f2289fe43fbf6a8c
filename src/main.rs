#![allow(dead_code)]

use crate::areas::repository::Repository;
use crate::commands::porcelain::clone::clone_repository;
use crate::commands::porcelain::init::init_repository;
use anyhow::Result;
use clap::{Parser, Subcommand};

mod areas;
mod artifacts;
mod commands;

#[derive(Parser)]
#[command(
    name = "gitlet",
    version = "0.1.0",
    about = "A miniature distributed version control system",
    long_about = "Gitlet is a miniature version control system modeled on Git: \
    a content-addressed object store, a staging index with conflict stages, \
    branches, three-way merges, and push/pull against sibling repositories \
    on the local filesystem."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Initialize a new repository in the current directory")]
    Init {
        #[arg(long, help = "Create a repository without a working copy")]
        bare: bool,
    },
    #[command(about = "Add files to the index, recursively")]
    Add {
        #[arg(index = 1, help = "The file or directory to stage")]
        path: String,
    },
    #[command(about = "Remove files from the index and the working copy")]
    Rm {
        #[arg(index = 1, help = "The file or directory to remove")]
        path: String,
        #[arg(short, help = "Remove directories recursively")]
        r: bool,
        #[arg(short, help = "Force removal (reserved)")]
        f: bool,
    },
    #[command(about = "Record the index as a new commit")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: Option<String>,
    },
    #[command(about = "List branches or create one at HEAD")]
    Branch {
        #[arg(index = 1, help = "The branch to create")]
        name: Option<String>,
    },
    #[command(about = "Switch to another branch or commit")]
    Checkout {
        #[arg(index = 1, help = "The branch name or commit hash")]
        target: String,
    },
    #[command(about = "Show changed files between two repository states")]
    Diff {
        #[arg(index = 1)]
        ref1: Option<String>,
        #[arg(index = 2)]
        ref2: Option<String>,
    },
    #[command(about = "Show the working tree status")]
    Status,
    #[command(about = "Merge another commit into the current branch")]
    Merge {
        #[arg(index = 1, help = "The branch name or commit hash to merge in")]
        target: String,
    },
    #[command(about = "Manage the set of remote repositories")]
    Remote {
        #[arg(index = 1, help = "The subcommand; only add is supported")]
        subcommand: String,
        #[arg(index = 2, help = "The remote name")]
        name: String,
        #[arg(index = 3, help = "The remote path")]
        url: String,
    },
    #[command(about = "Import a branch from a remote repository")]
    Fetch {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
    #[command(about = "Fetch a remote branch and merge it")]
    Pull {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
    #[command(about = "Publish a branch to a remote repository")]
    Push {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
        #[arg(short, help = "Allow non-fast-forward updates")]
        f: bool,
    },
    #[command(about = "Copy a repository into a new directory")]
    Clone {
        #[arg(index = 1, help = "The source repository path")]
        src: String,
        #[arg(index = 2, help = "The target directory")]
        dst: String,
        #[arg(long, help = "Clone into a bare repository")]
        bare: bool,
    },
    #[command(name = "update-index", about = "Stage or unstage a single path")]
    UpdateIndex {
        #[arg(index = 1)]
        path: String,
        #[arg(long, help = "Allow adding paths not yet in the index")]
        add: bool,
        #[arg(long, help = "Remove the path from the index")]
        remove: bool,
    },
    #[command(name = "write-tree", about = "Write the index as tree objects")]
    WriteTree,
    #[command(name = "update-ref", about = "Point a ref at a commit")]
    UpdateRef {
        #[arg(index = 1, help = "The ref to update")]
        r#ref: String,
        #[arg(index = 2, help = "The ref or hash to point it at")]
        to: String,
    },
}

fn open_repository() -> Result<Repository> {
    Repository::open_current(Box::new(std::io::stdout()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { bare } => {
            let cwd = std::env::current_dir()?;
            init_repository(&cwd, *bare, &mut std::io::stdout())?
        }
        Commands::Add { path } => open_repository()?.add(path)?,
        Commands::Rm { path, r, f } => open_repository()?.rm(path, *r, *f)?,
        Commands::Commit { message } => open_repository()?.commit(message.as_deref())?,
        Commands::Branch { name } => open_repository()?.branch(name.as_deref())?,
        Commands::Checkout { target } => open_repository()?.checkout(target)?,
        Commands::Diff { ref1, ref2 } => {
            open_repository()?.diff(ref1.as_deref(), ref2.as_deref())?
        }
        Commands::Status => open_repository()?.status()?,
        Commands::Merge { target } => open_repository()?.merge(target)?,
        Commands::Remote {
            subcommand,
            name,
            url,
        } => open_repository()?.remote(subcommand, name, url)?,
        Commands::Fetch { remote, branch } => open_repository()?.fetch(remote, branch)?,
        Commands::Pull { remote, branch } => open_repository()?.pull(remote, branch)?,
        Commands::Push { remote, branch, f } => open_repository()?.push(remote, branch, *f)?,
        Commands::Clone { src, dst, bare } => {
            clone_repository(src, dst, *bare, &mut std::io::stdout())?
        }
        Commands::UpdateIndex { path, add, remove } => {
            let mut repository = open_repository()?;
            let rooted = repository.path_from_root(path);
            repository.update_index(&rooted, *add, *remove)?
        }
        Commands::WriteTree => open_repository()?.write_tree()?,
        Commands::UpdateRef { r#ref, to } => open_repository()?.update_ref(r#ref, to)?,
    }

    Ok(())
}
