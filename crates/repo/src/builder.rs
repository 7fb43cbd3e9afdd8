//! The index build pipeline.
//!
//! A build scans the archive directory, renders the index, writes it once
//! per requested compression format and finally rewrites the manifest's
//! digest fields to describe exactly the files just written. Any failure
//! stops the pipeline before the manifest is touched.

use crate::error::{ErrorKind, Result};
use crate::index::{self, Index};
use crate::manifest::Manifest;
use crate::tree::PackageTree;
use exn::{OptionExt, ResultExt};
use rayon::prelude::*;
use shelf_archive::PackageRecord;
use shelf_compress::{Compression, Registry};
use shelf_config::{Config, RepositoryConfig};
use shelf_digest::{DigestKind, Digests, measure_file};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use tracing::instrument;
use walkdir::WalkDir;

/// Where a builder is in its pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BuildState {
    #[default]
    Idle,
    Scanning,
    Aggregating,
    Serializing,
    Compressing(Compression),
    Finalizing,
    Done,
    /// The build stopped during the boxed stage.
    Failed(Box<BuildState>),
}

impl Display for BuildState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            BuildState::Idle => f.write_str("idle"),
            BuildState::Scanning => f.write_str("scanning"),
            BuildState::Aggregating => f.write_str("aggregating"),
            BuildState::Serializing => f.write_str("serializing"),
            BuildState::Compressing(format) => write!(f, "compressing ({format})"),
            BuildState::Finalizing => f.write_str("finalizing"),
            BuildState::Done => f.write_str("done"),
            BuildState::Failed(stage) => write!(f, "failed while {stage}"),
        }
    }
}

/// One index file written by a build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub format: Compression,
    pub path: PathBuf,
    pub size: u64,
    pub digests: Digests,
}

impl Artifact {
    /// The manifest line for this artifact under `kind`:
    /// `<digest> <size> <file name relative to root>`.
    #[must_use]
    pub fn manifest_line(&self, kind: DigestKind, root: &Path) -> String {
        let name = self.path.strip_prefix(root).unwrap_or(&self.path);
        format!("{} {} {}", self.digests.get(kind), self.size, name.display())
    }
}

/// The outcome of a successful build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildReport {
    pub index: Index,
    /// In the order the formats were requested.
    pub artifacts: Vec<Artifact>,
}

/// Builds the package index and manifest of one repository.
///
/// Only one builder may work on a repository root at a time; nothing here
/// guards against concurrent builds.
pub struct IndexBuilder {
    repository: RepositoryConfig,
    formats: Vec<Compression>,
    chunk_size: usize,
    jobs: Option<usize>,
    codecs: Registry,
    manifest: Manifest,
    state: BuildState,
}

impl IndexBuilder {
    /// Load the repository's manifest (and apt.conf release fields, if
    /// configured) and prepare a builder using the built-in codecs.
    #[instrument(skip(config), fields(root = %config.repository.root.display()))]
    pub fn new(config: &Config) -> Result<Self> {
        let repository = config.repository.clone();
        let mut manifest = Manifest::load(repository.manifest_path())?;
        if let Some(apt_conf) = &repository.apt_conf {
            manifest.seed_from_apt_conf(repository.root.join(apt_conf))?;
        }
        manifest.clear_digest_fields();
        Ok(Self {
            repository,
            formats: config.build.compression.clone(),
            chunk_size: config.build.chunk_size,
            jobs: config.build.jobs,
            codecs: Registry::builtin(),
            manifest,
            state: BuildState::Idle,
        })
    }

    /// Replace the codec registry.
    #[must_use]
    pub fn with_codecs(mut self, codecs: Registry) -> Self {
        self.codecs = codecs;
        self
    }

    #[must_use]
    pub fn codecs(&self) -> &Registry {
        &self.codecs
    }

    #[must_use]
    pub fn state(&self) -> &BuildState {
        &self.state
    }

    #[must_use]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Read every archive in the archive directory into a tree.
    ///
    /// Archives are read in parallel but inserted in file name order, so when
    /// two archives carry the same name, version and architecture the one
    /// sorting last wins. One unreadable archive fails the whole scan.
    #[instrument(skip(self), fields(dir, archives))]
    pub fn scan(&self) -> Result<PackageTree> {
        let dir = self.repository.archive_dir();
        tracing::Span::current().record("dir", tracing::field::display(dir.display()));
        if !dir.is_dir() {
            exn::bail!(ErrorKind::NotFound(dir));
        }
        let suffix = format!(".{}", self.repository.suffix);
        let mut paths = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).follow_links(true).sort_by_file_name() {
            let entry = entry.or_raise(|| ErrorKind::Io(dir.clone()))?;
            if entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(&suffix) {
                paths.push(entry.into_path());
            }
        }
        tracing::Span::current().record("archives", paths.len());

        let records = self.read_all(&paths)?;
        let mut tree = PackageTree::new();
        for record in records {
            match &self.repository.architecture {
                Some(arch) if record.architecture() != arch => {
                    tracing::debug!(
                        path = %record.path().display(),
                        architecture = record.architecture(),
                        "skipping archive for another architecture"
                    );
                },
                _ => {
                    tree.insert(record);
                },
            }
        }
        Ok(tree)
    }

    fn read_all(&self, paths: &[PathBuf]) -> Result<Vec<PackageRecord>> {
        let read = |path: &PathBuf| {
            shelf_archive::read(path, self.chunk_size).or_raise(|| ErrorKind::MalformedArchive(path.clone()))
        };
        match self.jobs {
            Some(jobs) => rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .or_raise(|| ErrorKind::Configuration)?
                .install(|| paths.par_iter().map(read).collect()),
            None => paths.par_iter().map(read).collect(),
        }
    }

    /// [`build`](Self::build) with the configured formats.
    pub fn build_configured(&mut self) -> Result<BuildReport> {
        let formats = self.formats.clone();
        self.build(&formats)
    }

    /// Run the whole pipeline, writing `<index_name><ext>` for each of
    /// `formats` and then the manifest.
    ///
    /// Nothing is written when `formats` is empty or names a format without a
    /// registered codec. On failure [`state`](Self::state) names the stage
    /// that failed; index files written before the failure are left behind
    /// but the manifest is not rewritten.
    #[instrument(skip(self, formats), fields(root = %self.repository.root.display(), formats = formats.len()))]
    pub fn build(&mut self, formats: &[Compression]) -> Result<BuildReport> {
        self.state = BuildState::Idle;
        match self.run(formats) {
            Ok(report) => {
                self.state = BuildState::Done;
                tracing::info!(
                    paragraphs = report.index.paragraphs,
                    artifacts = ?report.artifacts.iter().map(|a| a.path.display().to_string()).collect::<Vec<_>>(),
                    "build complete"
                );
                Ok(report)
            },
            Err(err) => {
                let stage = std::mem::take(&mut self.state);
                let kind: &ErrorKind = &err;
                tracing::error!(%stage, error = %kind, "build failed");
                self.state = BuildState::Failed(Box::new(stage));
                Err(err)
            },
        }
    }

    fn run(&mut self, formats: &[Compression]) -> Result<BuildReport> {
        if formats.is_empty() {
            exn::bail!(ErrorKind::Configuration);
        }
        if let Some(format) = formats.iter().find(|format| !self.codecs.contains(**format)) {
            tracing::error!(%format, "no codec registered");
            exn::bail!(ErrorKind::Configuration);
        }
        self.manifest.clear_digest_fields();

        self.enter(BuildState::Scanning);
        let tree = self.scan()?;

        self.enter(BuildState::Aggregating);
        tracing::debug!(packages = tree.names().count(), records = tree.len(), "aggregated packages");

        self.enter(BuildState::Serializing);
        let index = index::render(&tree, &self.repository.root, self.repository.multiversion);

        let compressed: Vec<_> = formats
            .par_iter()
            .map(|format| {
                let codec = self.codecs.get(*format).ok_or_raise(|| ErrorKind::Configuration)?;
                codec.compress(index.text.as_bytes()).or_raise(|| ErrorKind::Compression(*format))
            })
            .collect();
        let mut artifacts = Vec::with_capacity(formats.len());
        for (format, bytes) in formats.iter().zip(compressed) {
            self.enter(BuildState::Compressing(*format));
            artifacts.push(self.write_artifact(*format, &bytes?)?);
        }

        self.enter(BuildState::Finalizing);
        for kind in DigestKind::ALL {
            let lines: Vec<_> =
                artifacts.iter().map(|artifact| artifact.manifest_line(kind, &self.repository.root)).collect();
            self.manifest.set_digest_lines(kind, &lines);
        }
        self.manifest.persist()?;
        Ok(BuildReport { index, artifacts })
    }

    fn enter(&mut self, state: BuildState) {
        tracing::info!(%state, "entering build stage");
        self.state = state;
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    fn write_artifact(&self, format: Compression, bytes: &[u8]) -> Result<Artifact> {
        let path = self.repository.root.join(format.file_name(&self.repository.index_name));
        std::fs::write(&path, bytes).or_raise(|| ErrorKind::Io(path.clone()))?;
        let measured = measure_file(&path, self.chunk_size).or_raise(|| ErrorKind::Io(path.clone()))?;
        tracing::debug!(path = %path.display(), "wrote index");
        Ok(Artifact {
            format,
            path,
            size: measured.size,
            digests: measured.digests,
        })
    }
}
