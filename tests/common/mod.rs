#![allow(dead_code)]

use std::cell::Cell;
use std::collections::{BTreeMap, HashSet};

use stackclub::constants::{TractId, DEEP_COADD_MERGE_DET, DEEP_COADD_SKYMAP};
use stackclub::repository::{DataRepository, IndexValue, MemoryRepository, RepositoryError};
use stackclub::skymap::{SkyMap, SkyPoint, TractGeometry, TractInfo};

/// Repository wrapper counting every query and able to fail on demand.
pub struct SpyRepository {
    inner: MemoryRepository,
    queries: Cell<usize>,
    broken: HashSet<String>,
    geometries: BTreeMap<TractId, TractGeometry>,
}

impl SpyRepository {
    pub fn new(inner: MemoryRepository) -> Self {
        SpyRepository {
            inner,
            queries: Cell::new(0),
            broken: HashSet::new(),
            geometries: BTreeMap::new(),
        }
    }

    /// Make every query on `category` fail with a backend error.
    pub fn with_broken(mut self, category: &str) -> Self {
        self.broken.insert(category.to_string());
        self
    }

    /// Serve `geometry` for its tract instead of projecting the skymap.
    pub fn with_geometry(mut self, geometry: TractGeometry) -> Self {
        self.geometries.insert(geometry.tract_id, geometry);
        self
    }

    pub fn queries(&self) -> usize {
        self.queries.get()
    }

    fn hit(&self, what: &str) -> Result<(), RepositoryError> {
        self.queries.set(self.queries.get() + 1);
        if self.broken.contains(what) {
            return Err(RepositoryError::Backend(format!("{what}: connection reset")));
        }
        Ok(())
    }
}

impl DataRepository for SpyRepository {
    fn get_index_keys(&self, category: &str) -> Result<Vec<String>, RepositoryError> {
        self.hit(category)?;
        self.inner.get_index_keys(category)
    }

    fn query_values(&self, category: &str, key: &str) -> Result<Vec<IndexValue>, RepositoryError> {
        self.hit(category)?;
        self.inner.query_values(category, key)
    }

    fn get_skymap(&self, name: &str) -> Result<SkyMap, RepositoryError> {
        self.hit(name)?;
        self.inner.get_skymap(name)
    }

    fn get_tract_geometry(&self, tract_id: TractId) -> Result<TractGeometry, RepositoryError> {
        self.hit(&format!("tract {tract_id}"))?;
        match self.geometries.get(&tract_id) {
            Some(geometry) => Ok(geometry.clone()),
            None => self.inner.get_tract_geometry(tract_id),
        }
    }

    fn list_materialized_tracts(&self, category: &str) -> Result<Vec<TractId>, RepositoryError> {
        self.hit(category)?;
        self.inner.list_materialized_tracts(category)
    }
}

/// One-degree tract on a 2x2 patch grid.
pub fn small_tract(id: TractId, ra: f64, dec: f64) -> TractInfo {
    TractInfo::centered_on(id, SkyPoint::new(ra, dec), 1e-3, (2, 2), (500., 500.), 20.)
}

/// A DC2-like repository: raw and src data, a skymap of three tracts of which
/// two hold merged coadds.
pub fn dc2_repository() -> MemoryRepository {
    let skymap = SkyMap::new()
        .with_tract(small_tract(4850, 56.0, -30.0))
        .with_tract(small_tract(4851, 55.0, -30.0))
        .with_tract(small_tract(4852, 54.0, -30.0));

    let mut repo = MemoryRepository::new()
        .with_dataset("raw", &["visit", "raft", "sensor", "filter"])
        .with_skymap(DEEP_COADD_SKYMAP, skymap)
        .with_materialized_tracts(DEEP_COADD_MERGE_DET, &[4851, 4852]);

    for (visit, filter) in [(219976, "r"), (219977, "r"), (220000, "i")] {
        for sensor in ["1,1", "1,2"] {
            repo = repo.with_row(
                "raw",
                &[
                    ("visit", IndexValue::Int(visit)),
                    ("raft", IndexValue::from("2,2")),
                    ("sensor", IndexValue::from(sensor)),
                    ("filter", IndexValue::from(filter)),
                ],
            );
        }
    }
    for id in 0..10 {
        repo = repo.with_row("src", &[("id", IndexValue::Int(id)), ("visit", IndexValue::Int(219976))]);
    }
    repo
}

/// Tract geometry with the given corner coordinates.
pub fn geometry(tract_id: TractId, ra: [f64; 4], dec: [f64; 4]) -> TractGeometry {
    TractGeometry {
        tract_id,
        corners: [0, 1, 2, 3].map(|i| SkyPoint::new(ra[i], dec[i])),
    }
}
