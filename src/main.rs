//! pit CLI - git-compatible object store plumbing

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pit::ops::{cat_file, commit_tree, fsck, hash_file, hash_reader, write_tree, CatMode};
use pit::{Hash, IoResultExt, Repo, Signature};

#[derive(Parser)]
#[command(name = "pit")]
#[command(about = "petit git - a minimal git-compatible object store")]
#[command(version)]
struct Cli {
    /// run as if started in this directory
    #[arg(short = 'C', global = true, default_value = ".")]
    dir: PathBuf,

    /// enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// initialize a new repository
    Init {
        /// working tree to create the repository in
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// compute the blob hash of a file, optionally storing it
    HashObject {
        /// write the blob into the object store
        #[arg(short)]
        write: bool,

        /// read the content from stdin
        #[arg(long, conflicts_with = "file")]
        stdin: bool,

        /// file to hash
        #[arg(required_unless_present = "stdin")]
        file: Option<PathBuf>,
    },

    /// show the content, type or size of an object
    #[command(group(ArgGroup::new("mode").args(["pretty", "kind", "size"])))]
    CatFile {
        /// pretty-print the object's content (the default)
        #[arg(short = 'p')]
        pretty: bool,

        /// show the object's type
        #[arg(short = 't')]
        kind: bool,

        /// show the object's size
        #[arg(short = 's')]
        size: bool,

        /// object hash
        object: String,
    },

    /// snapshot the working tree into tree objects
    WriteTree,

    /// create a commit object for a tree
    CommitTree {
        /// tree hash
        tree: String,

        /// parent commit hash
        #[arg(short = 'p')]
        parent: Option<String>,

        /// commit message
        #[arg(short = 'm')]
        message: String,

        /// author name (defaults to user.name from the config)
        #[arg(long, env = "PIT_AUTHOR_NAME")]
        author_name: Option<String>,

        /// author email (defaults to user.email from the config)
        #[arg(long, env = "PIT_AUTHOR_EMAIL")]
        author_email: Option<String>,
    },

    /// verify every stored object
    Fsck,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("PIT_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> pit::Result<ExitCode> {
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Init { path } => {
            let worktree = cli.dir.join(path);
            let repo = Repo::init(&worktree)?;
            writeln!(
                stdout,
                "initialized empty pit repository in {}",
                repo.path().display()
            )
            .with_path("<stdout>")?;
        }

        Commands::HashObject { write, stdin, file } => {
            // only touch the repository when writing
            let repo = if write {
                Some(Repo::discover(&cli.dir)?)
            } else {
                None
            };
            let store = repo.as_ref().map(Repo::store);

            let hash = match file {
                Some(file) if !stdin => hash_file(&cli.dir.join(file), store)?,
                _ => hash_reader(&mut io::stdin().lock(), store)?,
            };
            writeln!(stdout, "{}", hash).with_path("<stdout>")?;
        }

        Commands::CatFile {
            pretty: _,
            kind,
            size,
            object,
        } => {
            let repo = Repo::discover(&cli.dir)?;
            let hash: Hash = object.parse()?;
            let mode = if kind {
                CatMode::Type
            } else if size {
                CatMode::Size
            } else {
                CatMode::Pretty
            };
            cat_file(repo.store(), &hash, mode, &mut stdout)?;
        }

        Commands::WriteTree => {
            let repo = Repo::discover(&cli.dir)?;
            let hash = write_tree(&repo)?;
            writeln!(stdout, "{}", hash).with_path("<stdout>")?;
        }

        Commands::CommitTree {
            tree,
            parent,
            message,
            author_name,
            author_email,
        } => {
            let repo = Repo::discover(&cli.dir)?;
            let tree: Hash = tree.parse()?;
            let parent = parent.map(|p| p.parse::<Hash>()).transpose()?;

            let user = &repo.config().user;
            let author = match author_name.or_else(|| user.name.clone()) {
                Some(name) => {
                    let email = author_email
                        .or_else(|| user.email.clone())
                        .unwrap_or_default();
                    let author = match &user.timezone {
                        Some(timezone) => Signature::now_in(name, email, timezone.as_str())?,
                        None => Signature::now(name, email)?,
                    };
                    Some(author)
                }
                None => {
                    debug!("no author configured, writing commit without author lines");
                    None
                }
            };

            let hash = commit_tree(repo.store(), tree, parent, author, &message)?;
            writeln!(stdout, "{}", hash).with_path("<stdout>")?;
        }

        Commands::Fsck => {
            let repo = Repo::discover(&cli.dir)?;
            let report = fsck(repo.store())?;

            for corrupt in &report.corrupt_objects {
                writeln!(stdout, "corrupt {}: {}", corrupt.hash, corrupt.message)
                    .with_path("<stdout>")?;
            }
            writeln!(stdout, "checked {} objects", report.objects_checked)
                .with_path("<stdout>")?;

            if !report.is_ok() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    stdout.flush().with_path("<stdout>")?;
    Ok(ExitCode::SUCCESS)
}
