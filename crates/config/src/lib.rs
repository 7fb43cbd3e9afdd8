//! Configuration for building a repository index.
//!
//! Values are layered with [`figment`], later layers overriding earlier ones:
//!
//! 1. built-in defaults ([`Config::default`]),
//! 2. the user's configuration file (`config.toml` in the platform config
//!    directory for `shelf`), if it exists,
//! 3. an explicitly given file (TOML, YAML or JSON, by extension),
//! 4. `SHELF_`-prefixed environment variables, with `__` separating nested
//!    keys (`SHELF_REPOSITORY__ROOT=/srv/repo`).
//!
//! ```toml
//! [repository]
//! root = "/srv/repo"
//! archives = "debs"
//! multiversion = false
//!
//! [build]
//! compression = ["gzip", "xz"]
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use shelf_compress::Compression;
use std::path::{Component, Path, PathBuf};

/// Where the repository lives and how its archives are selected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Repository root; made absolute during validation.
    pub root: PathBuf,
    /// Directory of package archives, relative to `root`.
    pub archives: PathBuf,
    /// File suffix of package archives, without the dot.
    pub suffix: String,
    /// Only index archives of this architecture (all when unset).
    pub architecture: Option<String>,
    /// Index every version of a package instead of only the newest.
    pub multiversion: bool,
    /// Base file name of the generated index.
    pub index_name: String,
    /// File name of the manifest, which must already exist.
    pub manifest_name: String,
    /// apt-ftparchive configuration supplying manifest fields, relative to
    /// `root`.
    pub apt_conf: Option<PathBuf>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            archives: PathBuf::from("debs"),
            suffix: "deb".to_string(),
            architecture: None,
            multiversion: true,
            index_name: "Packages".to_string(),
            manifest_name: "Release".to_string(),
            apt_conf: None,
        }
    }
}

impl RepositoryConfig {
    #[must_use]
    pub fn archive_dir(&self) -> PathBuf {
        self.root.join(&self.archives)
    }

    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.manifest_name)
    }
}

/// How index artifacts are produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Formats to write the index in, in order.
    pub compression: Vec<Compression>,
    /// Bytes per read when hashing files.
    pub chunk_size: usize,
    /// Worker threads for scanning archives (rayon's default when unset).
    pub jobs: Option<usize>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            compression: vec![Compression::Gzip],
            chunk_size: 8192,
            jobs: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub repository: RepositoryConfig,
    pub build: BuildConfig,
}

impl Config {
    /// Load configuration from every layer, validating the result.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let user = ProjectDirs::from("", "", "shelf").map(|dirs| dirs.config_dir().join("config.toml"));
        Self::from_figment(Self::figment(user.as_deref(), file)?)
    }

    /// Assemble the provider stack without extracting it.
    ///
    /// `user` is optional and silently skipped when missing; `file` must
    /// exist.
    pub fn figment(user: Option<&Path>, file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(user) = user.filter(|path| path.is_file()) {
            tracing::debug!(path = %user.display(), "merging user configuration");
            figment = figment.merge(Toml::file(user));
        }
        if let Some(file) = file {
            if !file.is_file() {
                exn::bail!(ErrorKind::NotFound(file.to_path_buf()));
            }
            tracing::debug!(path = %file.display(), "merging configuration file");
            figment = match file.extension().and_then(|ext| ext.to_str()) {
                Some("yaml" | "yml") => figment.merge(Yaml::file(file)),
                Some("json") => figment.merge(Json::file(file)),
                _ => figment.merge(Toml::file(file)),
            };
        }
        Ok(figment.merge(Env::prefixed("SHELF_").split("__")))
    }

    /// Extract and validate a configuration from `figment`.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()
    }

    /// Check every value, normalizing where there is one obvious meaning
    /// (absolute root, suffix without a leading dot).
    pub fn validate(mut self) -> Result<Self> {
        let repository = &mut self.repository;
        if repository.root.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid("repository.root"));
        }
        repository.root = std::path::absolute(&repository.root).or_raise(|| ErrorKind::Invalid("repository.root"))?;
        if !is_contained(&repository.archives) {
            exn::bail!(ErrorKind::Invalid("repository.archives"));
        }
        if let Some(apt_conf) = &repository.apt_conf
            && (!is_contained(apt_conf) || apt_conf.as_os_str().is_empty())
        {
            exn::bail!(ErrorKind::Invalid("repository.apt_conf"));
        }
        repository.suffix = repository.suffix.trim_start_matches('.').to_string();
        if repository.suffix.is_empty() {
            exn::bail!(ErrorKind::Invalid("repository.suffix"));
        }
        if !is_file_name(&repository.index_name) {
            exn::bail!(ErrorKind::Invalid("repository.index_name"));
        }
        if !is_file_name(&repository.manifest_name) {
            exn::bail!(ErrorKind::Invalid("repository.manifest_name"));
        }
        if repository.architecture.as_deref().is_some_and(|arch| arch.trim().is_empty()) {
            exn::bail!(ErrorKind::Invalid("repository.architecture"));
        }
        if self.build.compression.is_empty() {
            exn::bail!(ErrorKind::Invalid("build.compression"));
        }
        if self.build.chunk_size == 0 {
            exn::bail!(ErrorKind::Invalid("build.chunk_size"));
        }
        if self.build.jobs == Some(0) {
            exn::bail!(ErrorKind::Invalid("build.jobs"));
        }
        Ok(self)
    }
}

/// Relative and never climbing out of the directory it is joined onto.
fn is_contained(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn is_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
