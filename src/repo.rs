use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::{Error, IoResultExt, Result};
use crate::store::ObjectStore;

/// name of the metadata directory inside a working tree
pub const METADATA_DIR: &str = ".pit";

/// git's metadata directory, never captured in trees either
pub const LEGACY_METADATA_DIR: &str = ".git";

const DEFAULT_HEAD: &str = "ref: refs/heads/main\n";
const DEFAULT_DESCRIPTION: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";

/// a pit repository: a working tree plus its `.pit` directory
pub struct Repo {
    worktree: PathBuf,
    path: PathBuf,
    config: Config,
    store: ObjectStore,
}

impl Repo {
    /// initialize a new repository in `worktree`
    pub fn init(worktree: &Path) -> Result<Self> {
        let path = worktree.join(METADATA_DIR);
        let config_path = path.join("config");
        if config_path.exists() {
            return Err(Error::RepoExists(path));
        }

        // create directory structure
        fs::create_dir_all(path.join("objects")).with_path(&path)?;
        fs::create_dir_all(path.join("refs/heads")).with_path(&path)?;
        fs::create_dir_all(path.join("refs/tags")).with_path(&path)?;

        write_if_missing(&path.join("HEAD"), DEFAULT_HEAD)?;
        write_if_missing(&path.join("description"), DEFAULT_DESCRIPTION)?;

        let config = Config::default();
        config.save(&config_path)?;

        debug!(path = %path.display(), "initialized repository");
        Ok(Self::from_parts(worktree.to_path_buf(), path, config))
    }

    /// open the repository whose working tree is `worktree`
    pub fn open(worktree: &Path) -> Result<Self> {
        let path = worktree.join(METADATA_DIR);
        let config_path = path.join("config");
        if !config_path.exists() {
            return Err(Error::NoRepo(worktree.to_path_buf()));
        }

        let config = Config::load(&config_path)?;
        Ok(Self::from_parts(worktree.to_path_buf(), path, config))
    }

    /// open the nearest repository at or above `start`
    pub fn discover(start: &Path) -> Result<Self> {
        let start = start.canonicalize().with_path(start)?;
        for dir in start.ancestors() {
            if dir.join(METADATA_DIR).join("config").is_file() {
                return Self::open(dir);
            }
        }
        Err(Error::NoRepo(start))
    }

    fn from_parts(worktree: PathBuf, path: PathBuf, config: Config) -> Self {
        let store =
            ObjectStore::with_compression(path.join("objects"), config.core.compression_level);
        Self {
            worktree,
            path,
            config,
            store,
        }
    }

    /// working tree root
    pub fn worktree(&self) -> &Path {
        &self.worktree
    }

    /// `.pit` directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// repository configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// mutable access to configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// save configuration changes
    ///
    /// the object store keeps the settings it was opened with until the
    /// repository is reopened.
    pub fn save_config(&self) -> Result<()> {
        self.config.save(&self.config_path())
    }

    /// path to the config file
    pub fn config_path(&self) -> PathBuf {
        self.path.join("config")
    }

    /// path to objects directory
    pub fn objects_path(&self) -> PathBuf {
        self.path.join("objects")
    }

    /// path to HEAD
    pub fn head_path(&self) -> PathBuf {
        self.path.join("HEAD")
    }

    /// the repository's object store
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if !path.exists() {
        fs::write(path, content).with_path(path)?;
    }
    Ok(())
}
