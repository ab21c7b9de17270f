//! # Data repository collaborator
//!
//! The taster never talks to a concrete data butler: it goes through the
//! [`DataRepository`] trait, which exposes the handful of read-only metadata
//! lookups the probes need.
//!
//! ## Absence versus failure
//!
//! Every lookup returns a [`RepositoryError`] on failure, and the error says
//! whether the repository **answered "not here"** ([`RepositoryError::is_absence`])
//! or whether something is **wrong with the repository itself** (backend fault,
//! unreadable storage). Callers treat the former as a normal outcome and surface
//! the latter.
//!
//! ## Implementations
//!
//! * [`MemoryRepository`] – an in-memory repository assembled with a builder,
//!   used to describe small repositories in notebooks and tests.
//! * [`discover_tract_dirs`] – finds the tracts materialized under a coadd
//!   directory of an on-disk repository, where each tract is a directory named
//!   with its id.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::TractId;
use crate::skymap::{SkyMap, TractGeometry};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Dataset type not found: {0}")]
    DatasetNotFound(String),

    #[error("Index key `{key}` not found for dataset type {category}")]
    KeyNotFound { category: String, key: String },

    #[error("Repository object not found: {0}")]
    ObjectNotFound(String),

    #[error("Tract not found: {0}")]
    TractNotFound(TractId),

    #[error("Query on {0} returned nothing")]
    EmptyResult(String),

    #[error("Repository backend error: {0}")]
    Backend(String),

    #[error("Unable to read repository storage at {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RepositoryError {
    /// `true` when the repository answered that the requested thing does not exist.
    pub fn is_absence(&self) -> bool {
        matches!(
            self,
            RepositoryError::DatasetNotFound(_)
                | RepositoryError::KeyNotFound { .. }
                | RepositoryError::ObjectNotFound(_)
                | RepositoryError::TractNotFound(_)
                | RepositoryError::EmptyResult(_)
        )
    }
}

/// Value of one index key (e.g. a visit number or a filter name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexValue {
    Int(i64),
    Str(String),
}

impl fmt::Display for IndexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexValue::Int(n) => write!(f, "{n}"),
            IndexValue::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for IndexValue {
    fn from(n: i64) -> Self {
        IndexValue::Int(n)
    }
}

impl From<&str> for IndexValue {
    fn from(s: &str) -> Self {
        IndexValue::Str(s.to_string())
    }
}

/// Read-only view of a data repository.
///
/// Methods take `&self`: nothing here mutates the repository.
pub trait DataRepository {
    /// Index keys that address the datasets of `category`, in the repository's order.
    fn get_index_keys(&self, category: &str) -> Result<Vec<String>, RepositoryError>;

    /// Every value of `key` across the datasets of `category`. Values may repeat.
    fn query_values(&self, category: &str, key: &str) -> Result<Vec<IndexValue>, RepositoryError>;

    /// Fetch the whole-repository tract/patch index stored under `name`.
    fn get_skymap(&self, name: &str) -> Result<SkyMap, RepositoryError>;

    /// Sky corners of one tract.
    fn get_tract_geometry(&self, tract_id: TractId) -> Result<TractGeometry, RepositoryError>;

    /// Tracts that actually hold data of `category` in storage.
    ///
    /// This is narrower than the skymap: a tract can be indexed without any
    /// data having been produced for it.
    fn list_materialized_tracts(&self, category: &str) -> Result<Vec<TractId>, RepositoryError>;
}

impl<T: DataRepository + ?Sized> DataRepository for &T {
    fn get_index_keys(&self, category: &str) -> Result<Vec<String>, RepositoryError> {
        (**self).get_index_keys(category)
    }

    fn query_values(&self, category: &str, key: &str) -> Result<Vec<IndexValue>, RepositoryError> {
        (**self).query_values(category, key)
    }

    fn get_skymap(&self, name: &str) -> Result<SkyMap, RepositoryError> {
        (**self).get_skymap(name)
    }

    fn get_tract_geometry(&self, tract_id: TractId) -> Result<TractGeometry, RepositoryError> {
        (**self).get_tract_geometry(tract_id)
    }

    fn list_materialized_tracts(&self, category: &str) -> Result<Vec<TractId>, RepositoryError> {
        (**self).list_materialized_tracts(category)
    }
}

/// One dataset category of a [`MemoryRepository`]: its index keys and one row per dataset.
#[derive(Debug, Clone, Default)]
struct MemoryDataset {
    keys: Vec<String>,
    rows: Vec<BTreeMap<String, IndexValue>>,
}

/// In-memory [`DataRepository`].
///
/// Example
/// -----------------
/// ```rust
/// use stackclub::repository::{DataRepository, IndexValue, MemoryRepository};
///
/// let repo = MemoryRepository::new()
///     .with_dataset("calexp", &["visit", "filter"])
///     .with_row("calexp", &[("visit", IndexValue::Int(1)), ("filter", "r".into())]);
///
/// assert_eq!(repo.query_values("calexp", "visit").unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    datasets: BTreeMap<String, MemoryDataset>,
    skymaps: BTreeMap<String, SkyMap>,
    materialized: BTreeMap<String, BTreeSet<TractId>>,
    coadd_roots: BTreeMap<String, Utf8PathBuf>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a dataset category with its index keys.
    pub fn with_dataset(mut self, category: &str, keys: &[&str]) -> Self {
        let dataset = self.datasets.entry(category.to_string()).or_default();
        dataset.keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Add one dataset row to `category`, declaring the category on the fly with
    /// the row's keys if it is unknown.
    pub fn with_row(mut self, category: &str, row: &[(&str, IndexValue)]) -> Self {
        let dataset = self.datasets.entry(category.to_string()).or_default();
        if dataset.keys.is_empty() {
            dataset.keys = row.iter().map(|(k, _)| k.to_string()).collect();
        }
        dataset
            .rows
            .push(row.iter().map(|(k, v)| (k.to_string(), v.clone())).collect());
        self
    }

    /// Store a skymap under `name`.
    pub fn with_skymap(mut self, name: &str, skymap: SkyMap) -> Self {
        self.skymaps.insert(name.to_string(), skymap);
        self
    }

    /// Mark `tracts` as holding data of `category`.
    pub fn with_materialized_tracts(mut self, category: &str, tracts: &[TractId]) -> Self {
        self.materialized
            .entry(category.to_string())
            .or_default()
            .extend(tracts.iter().copied());
        self
    }

    /// Resolve the materialized tracts of `category` by scanning `root` on disk
    /// instead of the in-memory list.
    pub fn with_coadd_root(mut self, category: &str, root: impl Into<Utf8PathBuf>) -> Self {
        self.coadd_roots.insert(category.to_string(), root.into());
        self
    }

    fn dataset(&self, category: &str) -> Result<&MemoryDataset, RepositoryError> {
        self.datasets
            .get(category)
            .ok_or_else(|| RepositoryError::DatasetNotFound(category.to_string()))
    }
}

impl DataRepository for MemoryRepository {
    fn get_index_keys(&self, category: &str) -> Result<Vec<String>, RepositoryError> {
        Ok(self.dataset(category)?.keys.clone())
    }

    fn query_values(&self, category: &str, key: &str) -> Result<Vec<IndexValue>, RepositoryError> {
        let dataset = self.dataset(category)?;
        if !dataset.keys.iter().any(|k| k == key) {
            return Err(RepositoryError::KeyNotFound {
                category: category.to_string(),
                key: key.to_string(),
            });
        }
        if dataset.rows.is_empty() {
            return Err(RepositoryError::EmptyResult(category.to_string()));
        }
        Ok(dataset
            .rows
            .iter()
            .filter_map(|row| row.get(key).cloned())
            .collect())
    }

    fn get_skymap(&self, name: &str) -> Result<SkyMap, RepositoryError> {
        self.skymaps
            .get(name)
            .cloned()
            .ok_or_else(|| RepositoryError::ObjectNotFound(name.to_string()))
    }

    fn get_tract_geometry(&self, tract_id: TractId) -> Result<TractGeometry, RepositoryError> {
        self.skymaps
            .values()
            .find_map(|skymap| skymap.get(tract_id))
            .map(|tract| tract.geometry())
            .ok_or(RepositoryError::TractNotFound(tract_id))
    }

    fn list_materialized_tracts(&self, category: &str) -> Result<Vec<TractId>, RepositoryError> {
        if let Some(root) = self.coadd_roots.get(category) {
            return discover_tract_dirs(root);
        }
        self.materialized
            .get(category)
            .map(|tracts| tracts.iter().copied().collect())
            .ok_or_else(|| RepositoryError::DatasetNotFound(category.to_string()))
    }
}

static TRACT_DIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4,})").expect("tract directory pattern is valid"));

/// List the tracts materialized under a coadd directory.
///
/// Every sub-directory whose name contains a run of at least four digits is
/// taken as a tract directory, the digits giving the tract id. Plain files and
/// other directories are ignored.
///
/// Return
/// ----------
/// * The sorted, de-duplicated tract ids, or [`RepositoryError::Io`] if `root`
///   cannot be listed.
pub fn discover_tract_dirs(root: &Utf8Path) -> Result<Vec<TractId>, RepositoryError> {
    let io_err = |source| RepositoryError::Io {
        path: root.to_path_buf(),
        source,
    };

    let mut tracts = BTreeSet::new();
    for entry in root.read_dir_utf8().map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if !entry.file_type().map_err(io_err)?.is_dir() {
            continue;
        }
        let tract = TRACT_DIR
            .captures(entry.file_name())
            .and_then(|caps| caps[1].parse::<TractId>().ok());
        if let Some(tract) = tract {
            tracts.insert(tract);
        }
    }
    Ok(tracts.into_iter().collect())
}

#[cfg(test)]
mod repository_test {
    use super::*;
    use crate::skymap::{SkyPoint, TractInfo};

    fn repo() -> MemoryRepository {
        MemoryRepository::new()
            .with_row("raw", &[("visit", IndexValue::Int(1)), ("filter", "r".into())])
            .with_row("raw", &[("visit", IndexValue::Int(2)), ("filter", "r".into())])
            .with_dataset("wcs", &["visit"])
    }

    #[test]
    fn test_keys_and_values() {
        let repo = repo();
        assert_eq!(repo.get_index_keys("raw").unwrap(), vec!["visit", "filter"]);
        assert_eq!(
            repo.query_values("raw", "filter").unwrap(),
            vec![IndexValue::from("r"), IndexValue::from("r")]
        );
    }

    #[test]
    fn test_absences() {
        let repo = repo();

        let err = repo.get_index_keys("calexp").unwrap_err();
        assert!(err.is_absence());

        let err = repo.query_values("raw", "ccd").unwrap_err();
        assert!(matches!(err, RepositoryError::KeyNotFound { .. }));

        // declared but never filled
        let err = repo.query_values("wcs", "visit").unwrap_err();
        assert!(matches!(err, RepositoryError::EmptyResult(_)));

        assert!(repo.get_skymap("deepCoadd_skyMap").unwrap_err().is_absence());
        assert!(repo.get_tract_geometry(1).unwrap_err().is_absence());
    }

    #[test]
    fn test_backend_error_is_not_absence() {
        assert!(!RepositoryError::Backend("socket closed".into()).is_absence());
    }

    #[test]
    fn test_tract_geometry_from_skymap() {
        let tract = TractInfo::centered_on(42, SkyPoint::new(10., 5.), 1e-4, (2, 2), (100., 100.), 0.);
        let repo = MemoryRepository::new().with_skymap("deepCoadd_skyMap", SkyMap::new().with_tract(tract.clone()));
        assert_eq!(repo.get_tract_geometry(42).unwrap(), tract.geometry());
    }

    #[test]
    fn test_discover_tract_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(tmp.path()).unwrap();
        for dir in ["4851", "4852", "i_t4640_p0,0", "merged", "12"] {
            std::fs::create_dir(root.join(dir)).unwrap();
        }
        std::fs::write(root.join("4999"), b"not a tract").unwrap();

        assert_eq!(discover_tract_dirs(root).unwrap(), vec![4640, 4851, 4852]);
    }

    #[test]
    fn test_discover_missing_root() {
        let err = discover_tract_dirs(Utf8Path::new("/no/such/coadd/dir")).unwrap_err();
        assert!(!err.is_absence());
    }
}
