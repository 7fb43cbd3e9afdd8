//! Discovered packages grouped by name, then by version and architecture.

use shelf_archive::PackageRecord;
use std::collections::BTreeMap;

/// Grouping key of a record within one package name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageKey {
    pub version: String,
    pub architecture: String,
}

impl PackageKey {
    #[must_use]
    pub fn of(record: &PackageRecord) -> Self {
        Self {
            version: record.version().to_string(),
            architecture: record.architecture().to_string(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PackageTree {
    packages: BTreeMap<String, BTreeMap<PackageKey, PackageRecord>>,
}

impl PackageTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record`, replacing (and returning) any record already held for
    /// the same name, version and architecture.
    pub fn insert(&mut self, record: PackageRecord) -> Option<PackageRecord> {
        let key = PackageKey::of(&record);
        let versions = self.packages.entry(record.name().to_string()).or_default();
        let replaced = versions.insert(key, record)?;
        tracing::warn!(
            package = replaced.name(),
            version = replaced.version(),
            architecture = replaced.architecture(),
            replaced = %replaced.path().display(),
            "duplicate package; keeping the last one scanned"
        );
        Some(replaced)
    }

    /// Every package name, ascending.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// All records of `name`, newest version first.
    ///
    /// Records of equal version stay adjacent, ordered by architecture.
    #[must_use]
    pub fn ordered_versions(&self, name: &str) -> Vec<&PackageRecord> {
        let mut records: Vec<_> = self.packages.get(name).map(|v| v.values().collect()).unwrap_or_default();
        records.sort_by(|a, b| shelf_version::compare(b.version(), a.version()));
        records
    }

    /// The records of `name` that belong in the index.
    ///
    /// Without `multiversion` only the newest version survives, in every
    /// architecture it was found for.
    #[must_use]
    pub fn selected_versions(&self, name: &str, multiversion: bool) -> Vec<&PackageRecord> {
        let mut records = self.ordered_versions(name);
        if !multiversion && let Some(latest) = records.first().map(|r| r.version().to_string()) {
            let keep = records.iter().take_while(|r| r.version() == latest).count();
            records.truncate(keep);
        }
        records
    }
}
