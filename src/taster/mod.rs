//! # Taster: what is in a repository, and how much
//!
//! A [`Taster`] is a probe session bound to one [`DataRepository`]. It answers:
//!
//! 1. **Which dataset categories exist?** ([`Taster::probe`]) – each category is
//!    probed once by reading its index keys and querying one of them.
//! 2. **Is there a skymap?** ([`Taster::probe_skymap`]) – the tract/patch index.
//! 3. **How much sky is covered?** ([`Taster::estimate_sky_area`]) – summed over
//!    the tracts that actually hold merged coadd data.
//! 4. **How many visits, sensors, filters, sources…?** ([`Taster::count_entities`])
//!
//! and then presents what it found: a label/value report
//! ([`Taster::render_report`]) and a tract coverage plot ([`Taster::plot_coverage`]).
//!
//! ## Failure policy
//!
//! A missing dataset category, skymap or tract is a **normal answer**, recorded as
//! absence. Every repository call is isolated: a failure never stops the probing
//! of the remaining categories or tracts. Failures that are *not* absences (a
//! broken backend, unreadable storage) are still treated as absence for the
//! outcome, but are logged at `warn` and kept in [`Taster::faults`] so that a
//! misconfigured repository does not look like an empty one.
//!
//! ## Caching
//!
//! Probe results, the skymap, the materialized tract list and the sky area are
//! computed once and cached for the lifetime of the session. Presentation
//! ([`Taster::report`], [`Taster::plot_coverage`]) never queries the repository,
//! except once to taste everything if nothing was probed before.
//!
//! ## Typical usage
//!
//! ```rust
//! use stackclub::repository::{IndexValue, MemoryRepository};
//! use stackclub::taster::{RepositoryKind, Taster, TasterConfig};
//!
//! let repo = MemoryRepository::new()
//!     .with_row("raw", &[("visit", IndexValue::Int(1)), ("filter", "r".into())]);
//!
//! let mut taster = Taster::new(repo, TasterConfig::new("demo", RepositoryKind::Generic));
//! let report = taster.render_report();
//! assert!(report.contains("## Repository: demo"));
//! ```
pub mod report;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    SquareDegree, TractId, CALEXP, DEEP_COADD, DEEP_COADD_FORCED_SRC, DEEP_COADD_MERGE_DET,
    DEEP_COADD_SKYMAP, RAW, SRC, WCS,
};
use crate::plotting::{draw_tract, PlotTarget};
use crate::repository::{DataRepository, RepositoryError};
use crate::skymap::SkyMap;
use crate::stackclub_errors::StackClubError;
use report::TasterReport;

/// Tally label of the number of materialized tracts
pub const NUMBER_OF_TRACTS: &str = "Number of tracts";
/// Tally label of the covered sky area
pub const SKY_AREA: &str = "Sky area (sq. deg.)";
/// Tally label of the number of distinct sources
pub const NUMBER_OF_SOURCES: &str = "Number of sources";

/// Flavour of repository, selecting dataset names and index keys.
///
/// Resolved once when the session is configured, from a string such as
/// `"hsc"` or `"lsstsim"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RepositoryKind {
    /// Simulated LSST camera data (DC2 runs), addressed by raft and sensor
    LsstSim,
    /// Hyper Suprime-Cam data, addressed by pointing, field and ccd
    Hsc,
    /// Any other camera: only the keys common to all of them
    #[default]
    Generic,
}

impl TryFrom<&str> for RepositoryKind {
    type Error = StackClubError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lsstsim" | "lsst_sim" | "dc2" => Ok(RepositoryKind::LsstSim),
            "hsc" => Ok(RepositoryKind::Hsc),
            "generic" => Ok(RepositoryKind::Generic),
            _ => Err(StackClubError::UnknownRepositoryKind(value.to_string())),
        }
    }
}

impl TryFrom<String> for RepositoryKind {
    type Error = StackClubError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RepositoryKind::try_from(value.as_str())
    }
}

impl From<RepositoryKind> for String {
    fn from(kind: RepositoryKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RepositoryKind::LsstSim => "lsstsim",
            RepositoryKind::Hsc => "hsc",
            RepositoryKind::Generic => "generic",
        };
        f.write_str(name)
    }
}

impl RepositoryKind {
    /// Dataset categories probed by [`Taster::probe_known`], in report order.
    pub fn known_categories(&self) -> &'static [&'static str] {
        &[
            RAW,
            CALEXP,
            SRC,
            WCS,
            DEEP_COADD,
            DEEP_COADD_MERGE_DET,
            DEEP_COADD_FORCED_SRC,
        ]
    }

    /// Name of the tract/patch index object.
    pub fn skymap_name(&self) -> &'static str {
        DEEP_COADD_SKYMAP
    }

    /// Category whose storage layout tells which tracts hold data.
    pub fn merged_coadd_category(&self) -> &'static str {
        DEEP_COADD_MERGE_DET
    }

    /// Category holding the single-visit images that are counted.
    pub fn imaging_category(&self) -> &'static str {
        match self {
            RepositoryKind::LsstSim | RepositoryKind::Hsc => RAW,
            RepositoryKind::Generic => CALEXP,
        }
    }

    /// `(tally label, index key)` pairs counted on the imaging category.
    pub fn imaging_dimensions(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            RepositoryKind::LsstSim => &[
                ("Number of visits", "visit"),
                ("Number of rafts", "raft"),
                ("Number of sensors", "sensor"),
                ("Number of filters", "filter"),
            ],
            RepositoryKind::Hsc => &[
                ("Number of visits", "visit"),
                ("Number of pointings", "pointing"),
                ("Number of sensors", "ccd"),
                ("Number of fields", "field"),
                ("Number of filters", "filter"),
            ],
            RepositoryKind::Generic => &[
                ("Number of visits", "visit"),
                ("Number of sensors", "ccd"),
                ("Number of filters", "filter"),
            ],
        }
    }

    pub fn source_category(&self) -> &'static str {
        SRC
    }

    pub fn source_id_key(&self) -> &'static str {
        "id"
    }
}

/// Configuration of a [`Taster`] session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TasterConfig {
    /// Name shown in the report heading
    pub repository_name: String,
    pub repository_kind: RepositoryKind,
    /// Log one `info` line per probed category
    pub verbose: bool,
}

impl Default for TasterConfig {
    fn default() -> Self {
        TasterConfig {
            repository_name: "repository".to_string(),
            repository_kind: RepositoryKind::Generic,
            verbose: false,
        }
    }
}

impl TasterConfig {
    pub fn new(repository_name: &str, repository_kind: RepositoryKind) -> Self {
        TasterConfig {
            repository_name: repository_name.to_string(),
            repository_kind,
            verbose: false,
        }
    }

    pub fn verbose(mut self, yes: bool) -> Self {
        self.verbose = yes;
        self
    }
}

/// Presence of each probed dataset category, in probe order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeResult {
    entries: Vec<(String, bool)>,
}

impl ProbeResult {
    pub fn get(&self, category: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|&(_, present)| present)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.get(category).is_some()
    }

    /// `true` only if `category` was probed and found.
    pub fn is_present(&self, category: &str) -> bool {
        self.get(category).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(c, p)| (c.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, category: &str, present: bool) {
        self.entries.push((category.to_string(), present));
    }
}

/// Value of one tally row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TallyValue {
    Count(usize),
    Area(SquareDegree),
    Text(String),
}

impl fmt::Display for TallyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TallyValue::Count(n) => write!(f, "{n}"),
            TallyValue::Area(a) => write!(f, "{a:.2}"),
            TallyValue::Text(s) => f.write_str(s),
        }
    }
}

/// Label → value rows, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TallyTable {
    rows: Vec<(String, TallyValue)>,
}

impl TallyTable {
    /// Insert a row, or replace the value of an existing label in place.
    pub fn insert(&mut self, label: &str, value: TallyValue) {
        match self.rows.iter_mut().find(|(l, _)| l == label) {
            Some((_, v)) => *v = value,
            None => self.rows.push((label.to_string(), value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&TallyValue> {
        self.rows.iter().find(|(l, _)| l == label).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TallyValue)> {
        self.rows.iter().map(|(l, v)| (l.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of [`Taster::estimate_sky_area`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkyArea {
    Available(SquareDegree),
    /// No skymap in the repository
    Unavailable,
}

impl SkyArea {
    pub fn value(&self) -> Option<SquareDegree> {
        match self {
            SkyArea::Available(a) => Some(*a),
            SkyArea::Unavailable => None,
        }
    }
}

impl fmt::Display for SkyArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkyArea::Available(a) => write!(f, "{a:.2}"),
            SkyArea::Unavailable => f.write_str("unavailable"),
        }
    }
}

/// Keep `Ok` values, turn failures into `None`.
///
/// Absences are only traced; other failures are logged at `warn` and recorded
/// in `faults` under `what`.
fn isolate<T>(
    faults: &mut Vec<(String, RepositoryError)>,
    what: &str,
    result: Result<T, RepositoryError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) if err.is_absence() => {
            tracing::debug!(what, reason = %err, "not found in repository");
            None
        }
        Err(err) => {
            tracing::warn!(what, error = %err, "repository query failed");
            faults.push((what.to_string(), err));
            None
        }
    }
}

/// Probe session over one repository.
pub struct Taster<R: DataRepository> {
    repo: R,
    config: TasterConfig,
    exists: ProbeResult,
    tally: TallyTable,
    faults: Vec<(String, RepositoryError)>,
    /// `None` until the skymap lookup was attempted
    skymap: Option<Option<SkyMap>>,
    sky_area: Option<SkyArea>,
    tracts: Vec<TractId>,
}

impl<R: DataRepository> Taster<R> {
    /// Open a probe session on `repo`. Nothing is queried yet.
    pub fn new(repo: R, config: TasterConfig) -> Self {
        Taster {
            repo,
            config,
            exists: ProbeResult::default(),
            tally: TallyTable::default(),
            faults: Vec::new(),
            skymap: None,
            sky_area: None,
            tracts: Vec::new(),
        }
    }

    pub fn config(&self) -> &TasterConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Categories probed so far and whether they exist.
    pub fn exists(&self) -> &ProbeResult {
        &self.exists
    }

    pub fn tally(&self) -> &TallyTable {
        &self.tally
    }

    /// Repository failures that were not plain absences, with what was being looked up.
    pub fn faults(&self) -> &[(String, RepositoryError)] {
        &self.faults
    }

    /// The skymap, if it was fetched and found.
    pub fn skymap(&self) -> Option<&SkyMap> {
        self.skymap.as_ref().and_then(Option::as_ref)
    }

    /// The cached sky area, if it was estimated.
    pub fn sky_area(&self) -> Option<SkyArea> {
        self.sky_area
    }

    /// Tracts found to hold merged coadd data by [`Taster::estimate_sky_area`],
    /// restricted to those whose geometry could be fetched.
    pub fn tracts(&self) -> &[TractId] {
        &self.tracts
    }

    /// Check one category: read its keys, then query the first key.
    fn look_for_dataset(&self, category: &str) -> Result<(), RepositoryError> {
        let keys = self.repo.get_index_keys(category)?;
        let key = keys
            .first()
            .ok_or_else(|| RepositoryError::EmptyResult(category.to_string()))?;
        let values = self.repo.query_values(category, key)?;
        if values.is_empty() {
            return Err(RepositoryError::EmptyResult(category.to_string()));
        }
        Ok(())
    }

    /// Probe the presence of each category not probed yet.
    ///
    /// Arguments
    /// -----------------
    /// * `categories`: dataset category names, e.g. `["raw", "calexp"]`.
    ///
    /// Return
    /// ----------
    /// * The accumulated [`ProbeResult`], with one entry per category ever probed.
    pub fn probe(&mut self, categories: &[&str]) -> &ProbeResult {
        for &category in categories {
            if self.exists.contains(category) {
                continue;
            }
            let found = self.look_for_dataset(category);
            let present = isolate(&mut self.faults, category, found).is_some();

            if self.config.verbose {
                if present {
                    tracing::info!("{category} dataset exists.");
                } else {
                    tracing::info!("{category} dataset doesn't exist.");
                }
            }
            self.exists.insert(category, present);
        }
        &self.exists
    }

    /// Probe every category the repository kind knows about.
    pub fn probe_known(&mut self) -> &ProbeResult {
        let categories = self.config.repository_kind.known_categories();
        self.probe(categories)
    }

    /// Fetch the skymap once; `None` if the repository has none.
    pub fn probe_skymap(&mut self) -> Option<&SkyMap> {
        if self.skymap.is_none() {
            let name = self.config.repository_kind.skymap_name();
            let skymap = isolate(&mut self.faults, name, self.repo.get_skymap(name));
            if self.config.verbose {
                match &skymap {
                    Some(s) => tracing::info!("{name} found with {} tracts.", s.len()),
                    None => tracing::info!("{name} doesn't exist."),
                }
            }
            self.skymap = Some(skymap);
        }
        self.skymap.as_ref().and_then(Option::as_ref)
    }

    /// Estimate the sky area covered by the tracts holding merged coadd data.
    ///
    /// The tracts are listed from storage, not taken from the skymap: a tract can
    /// be indexed and still be empty. Each tract contributes its
    /// [`TractGeometry::approximate_area`](crate::skymap::TractGeometry::approximate_area);
    /// tracts whose geometry cannot be fetched are left out of both the area and
    /// the tract count.
    ///
    /// Return
    /// ----------
    /// * [`SkyArea::Unavailable`] without a skymap, else the area in square degrees.
    ///   The first result is cached and returned by every later call.
    pub fn estimate_sky_area(&mut self) -> SkyArea {
        if let Some(area) = self.sky_area {
            return area;
        }

        let area = if self.probe_skymap().is_none() {
            SkyArea::Unavailable
        } else {
            let category = self.config.repository_kind.merged_coadd_category();
            let listed = isolate(
                &mut self.faults,
                category,
                self.repo.list_materialized_tracts(category),
            )
            .unwrap_or_default();

            let mut total = 0.0;
            let mut tracts = Vec::with_capacity(listed.len());
            for tract in listed {
                let what = format!("tract {tract}");
                let geometry = isolate(&mut self.faults, &what, self.repo.get_tract_geometry(tract));
                if let Some(geometry) = geometry {
                    total += geometry.approximate_area();
                    tracts.push(tract);
                }
            }

            self.tally
                .insert(NUMBER_OF_TRACTS, TallyValue::Count(tracts.len()));
            self.tracts = tracts;
            SkyArea::Available(total)
        };

        let value = match area {
            SkyArea::Available(a) => TallyValue::Area(a),
            SkyArea::Unavailable => TallyValue::Text(area.to_string()),
        };
        self.tally.insert(SKY_AREA, value);

        self.sky_area = Some(area);
        area
    }

    /// Count distinct values along the index dimensions of the present categories.
    ///
    /// Rows are added only for categories found present and dimensions whose query
    /// succeeds; anything else is left out of the table.
    pub fn count_entities(&mut self) -> &TallyTable {
        let kind = self.config.repository_kind;
        let imaging = kind.imaging_category();
        let source = kind.source_category();
        self.probe(&[imaging, source]);

        let mut counts = Vec::new();
        if self.exists.is_present(imaging) {
            for &(label, key) in kind.imaging_dimensions() {
                counts.push((label, imaging, key));
            }
        }
        if self.exists.is_present(source) {
            counts.push((NUMBER_OF_SOURCES, source, kind.source_id_key()));
        }

        for (label, category, key) in counts {
            let values = isolate(&mut self.faults, category, self.repo.query_values(category, key));
            if let Some(values) = values {
                let distinct: HashSet<_> = values.into_iter().collect();
                self.tally.insert(label, TallyValue::Count(distinct.len()));
            }
        }
        &self.tally
    }

    /// Probe everything: known categories, skymap, sky area and entity counts.
    pub fn taste(&mut self) -> &TallyTable {
        self.probe_known();
        self.estimate_sky_area();
        self.count_entities()
    }

    fn is_untouched(&self) -> bool {
        self.exists.is_empty() && self.skymap.is_none()
    }

    /// Report over what was found so far. Tastes the repository first if the
    /// session never queried it.
    pub fn report(&mut self) -> TasterReport<'_> {
        if self.is_untouched() {
            self.taste();
        }
        TasterReport::new(&self.config.repository_name, &self.exists, &self.tally)
    }

    /// The report as text: a markdown heading then the label/value table.
    pub fn render_report(&mut self) -> String {
        self.report().to_string()
    }

    /// Draw every materialized tract of the skymap onto `target`.
    ///
    /// Uses the cached skymap and tract list only (tasting first if the session
    /// never queried the repository).
    ///
    /// Return
    /// ----------
    /// * The number of tracts drawn; `0` without a skymap.
    pub fn plot_coverage(&mut self, target: &mut dyn PlotTarget) -> Result<usize, StackClubError> {
        if self.is_untouched() {
            self.taste();
        }
        let Some(skymap) = self.skymap() else {
            return Ok(0);
        };

        let mut drawn = 0;
        for &id in &self.tracts {
            match skymap.tract(id) {
                Ok(tract) => {
                    draw_tract(tract, None, target)?;
                    drawn += 1;
                }
                Err(err) => tracing::debug!(tract = id, %err, "tract not drawn"),
            }
        }
        target.set_title(&format!("{} tracts", self.config.repository_name));
        Ok(drawn)
    }
}

#[cfg(test)]
mod taster_test {
    use super::*;
    use crate::repository::{IndexValue, MemoryRepository};
    use crate::skymap::{SkyPoint, TractInfo};

    #[test]
    fn test_repository_kind_parsing() {
        assert_eq!(RepositoryKind::try_from("HSC"), Ok(RepositoryKind::Hsc));
        assert_eq!(RepositoryKind::try_from("dc2"), Ok(RepositoryKind::LsstSim));
        assert_eq!(
            RepositoryKind::try_from("/datasets/hsc/repo"),
            Err(StackClubError::UnknownRepositoryKind("/datasets/hsc/repo".into()))
        );
        assert_eq!(
            RepositoryKind::try_from(RepositoryKind::LsstSim.to_string()),
            Ok(RepositoryKind::LsstSim)
        );
    }

    #[test]
    fn test_tally_replaces_in_place() {
        let mut tally = TallyTable::default();
        tally.insert("a", TallyValue::Count(1));
        tally.insert("b", TallyValue::Count(2));
        tally.insert("a", TallyValue::Count(3));

        let rows: Vec<_> = tally.iter().map(|(l, v)| (l.to_string(), v.clone())).collect();
        assert_eq!(
            rows,
            vec![
                ("a".to_string(), TallyValue::Count(3)),
                ("b".to_string(), TallyValue::Count(2))
            ]
        );
    }

    #[test]
    fn test_tally_value_display() {
        assert_eq!(TallyValue::Count(12).to_string(), "12");
        assert_eq!(TallyValue::Area(1.23456).to_string(), "1.23");
        assert_eq!(SkyArea::Unavailable.to_string(), "unavailable");
    }

    #[test]
    fn test_probe_records_every_category() {
        let repo = MemoryRepository::new()
            .with_row("raw", &[("visit", IndexValue::Int(1))])
            .with_dataset("calexp", &["visit"]);
        let mut taster = Taster::new(repo, TasterConfig::default().verbose(true));

        let exists = taster.probe(&["raw", "calexp", "src"]);
        assert_eq!(exists.len(), 3);
        assert_eq!(exists.get("raw"), Some(true));
        // declared with no data
        assert_eq!(exists.get("calexp"), Some(false));
        assert_eq!(exists.get("src"), Some(false));
        assert!(taster.faults().is_empty());
    }

    #[test]
    fn test_probe_is_idempotent() {
        let repo = MemoryRepository::new().with_row("raw", &[("visit", IndexValue::Int(1))]);
        let mut taster = Taster::new(repo, TasterConfig::default());
        taster.probe(&["raw"]);
        taster.probe(&["raw", "raw"]);
        assert_eq!(taster.exists().len(), 1);
    }

    #[test]
    fn test_count_entities_hsc() {
        let row = |visit: i64, ccd: i64, filter: &str| {
            [
                ("visit", IndexValue::Int(visit)),
                ("pointing", IndexValue::Int(800)),
                ("ccd", IndexValue::Int(ccd)),
                ("field", IndexValue::from("SSP_WIDE")),
                ("filter", IndexValue::from(filter)),
            ]
        };
        let repo = MemoryRepository::new()
            .with_row("raw", &row(1, 10, "HSC-I"))
            .with_row("raw", &row(1, 11, "HSC-I"))
            .with_row("raw", &row(2, 10, "HSC-R"));
        let mut taster = Taster::new(repo, TasterConfig::new("hsc", RepositoryKind::Hsc));

        let tally = taster.count_entities();
        assert_eq!(tally.get("Number of visits"), Some(&TallyValue::Count(2)));
        assert_eq!(tally.get("Number of pointings"), Some(&TallyValue::Count(1)));
        assert_eq!(tally.get("Number of sensors"), Some(&TallyValue::Count(2)));
        assert_eq!(tally.get("Number of fields"), Some(&TallyValue::Count(1)));
        assert_eq!(tally.get("Number of filters"), Some(&TallyValue::Count(2)));
        // no src category: row omitted
        assert_eq!(tally.get(NUMBER_OF_SOURCES), None);
    }

    #[test]
    fn test_sky_area_unavailable_without_skymap() {
        let mut taster = Taster::new(MemoryRepository::new(), TasterConfig::default());
        assert_eq!(taster.estimate_sky_area(), SkyArea::Unavailable);
        assert_eq!(
            taster.tally().get(SKY_AREA),
            Some(&TallyValue::Text("unavailable".into()))
        );
        assert!(taster.tracts().is_empty());
    }

    #[test]
    fn test_sky_area_counts_only_materialized_tracts() {
        let tract = |id, ra| {
            TractInfo::centered_on(id, SkyPoint::new(ra, 0.0), 1e-3, (1, 1), (1000., 1000.), 0.)
        };
        let skymap = SkyMap::new().with_tract(tract(1, 10.0)).with_tract(tract(2, 20.0));
        let repo = MemoryRepository::new()
            .with_skymap(DEEP_COADD_SKYMAP, skymap)
            .with_materialized_tracts(DEEP_COADD_MERGE_DET, &[2]);
        let mut taster = Taster::new(repo, TasterConfig::default());

        let area = taster.estimate_sky_area().value().unwrap();
        // one tract of one degree on a side, on the equator
        assert!((area - 1.0).abs() < 1e-3, "area = {area}");
        assert_eq!(taster.tracts(), &[2]);
        assert_eq!(taster.tally().get(NUMBER_OF_TRACTS), Some(&TallyValue::Count(1)));
    }
}
