//! # Sky geometry plotting
//!
//! Draw tracts, patches, sensor footprints and survey boundaries as polygons on
//! a sky chart.
//!
//! ## Overview
//!
//! Every routine draws onto a [`PlotTarget`], the plotting collaborator. A scene
//! is composed by calling the routines in sequence on the same target, usually:
//!
//! 1. [`draw_tract`] for each tract (patch grid, outline and labels),
//! 2. [`draw_sensor_footprints`] for the CCDs of one visit,
//! 3. [`overlay_region_boundary`] / [`overlay_run1_1p_regions`] for reference footprints.
//!
//! The order only changes what is drawn on top, never the geometry.
//!
//! ## Projection
//!
//! Rectangles live in a pixel frame (a tract's, or a sensor's). [`to_polygon`]
//! maps their corners through a [`PixelToSky`] projection and **always closes**
//! the resulting path by repeating the first vertex, whatever the number of
//! corners.
//!
//! ## Chart convention
//!
//! Right ascension is plotted **decreasing** left-to-right and declination
//! increasing bottom-to-top, as on a sky chart seen from inside the sphere.
//!
//! ## See also
//! ------------
//! * [`chart::SkyChart`] – In-memory [`PlotTarget`] with SVG output.
//! * [`crate::skymap::TractInfo`] – Tract geometry consumed by [`draw_tract`].
pub mod chart;

use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use itertools::{Itertools, MinMaxResult};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, PATCH_LABEL_SIZE, PLOT_MARGIN, TRACT_LABEL_SIZE};
use crate::skymap::{PixelPoint, PixelToSky, SkyPoint, TractInfo};
use crate::stackclub_errors::StackClubError;

/// A path on the sky. Closed paths repeat their first vertex at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyPath {
    pub vertices: Vec<SkyPoint>,
    pub closed: bool,
}

impl SkyPath {
    /// Open polyline through `vertices`, as given.
    pub fn open(vertices: Vec<SkyPoint>) -> Self {
        SkyPath {
            vertices,
            closed: false,
        }
    }

    /// Closed polygon: `vertices` followed by a copy of the first one.
    pub fn closed(mut vertices: Vec<SkyPoint>) -> Self {
        if let Some(&first) = vertices.first() {
            vertices.push(first);
        }
        SkyPath {
            vertices,
            closed: true,
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// RA and Dec extents `((ra_min, ra_max), (dec_min, dec_max))`, `None` for an empty path.
    pub fn extent(&self) -> Option<((Degree, Degree), (Degree, Degree))> {
        let ra = bounds(self.vertices.iter().map(|v| v.ra))?;
        let dec = bounds(self.vertices.iter().map(|v| v.dec))?;
        Some((ra, dec))
    }
}

pub(crate) fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    match values.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}

/// How a path is stroked and filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    pub color: String,
    /// Fill opacity, `0.0` for an outline only
    pub fill_alpha: f64,
    pub line_width: f64,
    /// Legend entry, if any
    pub label: Option<String>,
}

impl Default for PathStyle {
    fn default() -> Self {
        PathStyle {
            color: "gray".to_string(),
            fill_alpha: 0.0,
            line_width: 1.0,
            label: None,
        }
    }
}

impl PathStyle {
    pub fn new(color: &str) -> Self {
        PathStyle {
            color: color.to_string(),
            ..Default::default()
        }
    }

    pub fn with_fill_alpha(mut self, alpha: f64) -> Self {
        self.fill_alpha = alpha;
        self
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

/// How a text annotation is rendered. Text is always centred on its anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub size: f64,
    pub color: String,
}

impl TextStyle {
    pub fn new(size: f64, color: &str) -> Self {
        TextStyle {
            size,
            color: color.to_string(),
        }
    }
}

/// Plotting collaborator: receives paths, annotations and axis settings.
///
/// Axis limits follow the matplotlib convention: `set_xlim(left, right)` may
/// be given `left > right` to mirror the axis.
pub trait PlotTarget {
    fn add_path(&mut self, path: &SkyPath, style: &PathStyle);
    fn add_text(&mut self, at: SkyPoint, text: &str, style: &TextStyle);
    fn set_xlim(&mut self, left: Degree, right: Degree);
    fn set_ylim(&mut self, bottom: Degree, top: Degree);
    fn xlim(&self) -> Option<(Degree, Degree)>;
    fn ylim(&self) -> Option<(Degree, Degree)>;
    fn set_xlabel(&mut self, label: &str);
    fn set_ylabel(&mut self, label: &str);
    fn set_title(&mut self, title: &str);
    fn set_grid(&mut self, on: bool);
}

/// Convert a rectangle (or any polygon) into a closed sky path.
///
/// Arguments
/// -----------------
/// * `corners`: polygon corners, in drawing order. At least 3.
/// * `projector`: pixel → sky transform. When `None`, the corners are already
///   sky positions and are read as `x = ra`, `y = dec`.
///
/// Return
/// ----------
/// * A closed [`SkyPath`] of `corners.len() + 1` vertices, the last equal to the first.
/// * [`StackClubError::DegeneratePolygon`] for fewer than 3 corners.
pub fn to_polygon(
    corners: &[PixelPoint],
    projector: Option<&dyn PixelToSky>,
) -> Result<SkyPath, StackClubError> {
    if corners.len() < 3 {
        return Err(StackClubError::DegeneratePolygon(corners.len()));
    }

    let vertices = corners
        .iter()
        .map(|&c| match projector {
            Some(wcs) => wcs.pixel_to_sky(c),
            None => SkyPoint::new(c.x, c.y),
        })
        .collect();

    Ok(SkyPath::closed(vertices))
}

/// Draw one tract with its patch grid.
///
/// Patches are drawn first, faintly filled and labelled `"x,y"`; then the tract
/// outline and its label at the projected centre (the tract id when `label` is
/// `None`). The axis limits are widened to contain the tract plus
/// [`PLOT_MARGIN`], RA decreasing left-to-right; limits already set on `target`
/// are kept if they are larger, so several tracts can share one chart. The
/// chart title is set to `"tract <id>"`.
///
/// Arguments
/// -----------------
/// * `tract`: tract box, projection and patch grid.
/// * `label`: text drawn at the tract centre.
/// * `target`: chart to draw on.
///
/// Return
/// ----------
/// * `Ok(())`, or the error of a degenerate projection.
pub fn draw_tract(
    tract: &TractInfo,
    label: Option<&str>,
    target: &mut dyn PlotTarget,
) -> Result<(), StackClubError> {
    let patch_style = PathStyle::default().with_fill_alpha(0.1);
    let patch_text = TextStyle::new(PATCH_LABEL_SIZE, "black");

    for patch in tract.patches() {
        let path = to_polygon(&patch.outer_bbox.corners(), Some(&tract.wcs))?;
        target.add_path(&path, &patch_style);

        let (x, y) = patch.index;
        let center = tract.wcs.pixel_to_sky(patch.outer_bbox.center());
        target.add_text(center, &format!("{x},{y}"), &patch_text);
    }

    let outline = to_polygon(&tract.bbox.corners(), Some(&tract.wcs))?;
    target.add_path(&outline, &PathStyle::new("blue").with_line_width(1.5));

    let tract_label = label.map_or_else(|| tract.id.to_string(), str::to_string);
    target.add_text(
        tract.center(),
        &tract_label,
        &TextStyle::new(TRACT_LABEL_SIZE, "blue"),
    );

    if let Some(((ra_min, ra_max), (dec_min, dec_max))) = outline.extent() {
        let (mut left, mut right) = (ra_max + PLOT_MARGIN, ra_min - PLOT_MARGIN);
        if let Some((l, r)) = target.xlim() {
            left = left.max(l);
            right = right.min(r);
        }
        let (mut bottom, mut top) = (dec_min - PLOT_MARGIN, dec_max + PLOT_MARGIN);
        if let Some((b, t)) = target.ylim() {
            bottom = bottom.min(b);
            top = top.max(t);
        }
        target.set_xlim(left, right);
        target.set_ylim(bottom, top);
    }

    target.set_grid(true);
    target.set_xlabel("RA (deg.)");
    target.set_ylabel("Dec (deg.)");
    target.set_title(&format!("tract {}", tract.id));
    Ok(())
}

/// Sky footprint of one sensor (CCD) for one exposure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorFootprint {
    /// Camera detector name, e.g. `"R:2,2 S:1,1"` or `"R22_S11"`
    pub detector_name: String,
    /// Corners in drawing order
    pub corners: Vec<SkyPoint>,
}

impl SensorFootprint {
    pub fn new(detector_name: &str, corners: Vec<SkyPoint>) -> Self {
        SensorFootprint {
            detector_name: detector_name.to_string(),
            corners,
        }
    }

    /// Build a footprint from corners listed in the camera simulator's order,
    /// which visits the rectangle as `0, 1, 3, 2`.
    pub fn from_simulated_corners(detector_name: &str, corners: [SkyPoint; 4]) -> Self {
        Self::new(
            detector_name,
            vec![corners[0], corners[1], corners[3], corners[2]],
        )
    }

    /// Location of this sensor's image file relative to the visit directory:
    /// `R<raft>/S<sensor>.fits`.
    pub fn data_path(&self) -> Result<Utf8PathBuf, StackClubError> {
        sensor_data_path(&self.detector_name)
    }
}

static DETECTOR_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"R:?(\d,?\d)[_ ]S:?(\d,?\d)").expect("detector name pattern is valid")
});

/// Relative path of a sensor image from its detector name.
///
/// `"R:2,2 S:1,1"` and `"R22_S11"` both give `R22/S11.fits`.
pub fn sensor_data_path(detector_name: &str) -> Result<Utf8PathBuf, StackClubError> {
    let caps = DETECTOR_NAME
        .captures(detector_name)
        .ok_or_else(|| StackClubError::InvalidDetectorName(detector_name.to_string()))?;

    let raft = format!("R{}", caps[1].replace(',', ""));
    let sensor = format!("S{}.fits", caps[2].replace(',', ""));
    Ok(Utf8PathBuf::from(raft).join(sensor))
}

/// Draw the footprints of the sensors that have image data on disk.
///
/// A sensor is drawn only if its file, located with [`sensor_data_path`] under
/// `data_root`, exists; sensors without data are skipped silently. Nothing is
/// drawn when an error is returned.
///
/// Arguments
/// -----------------
/// * `sensors`: footprints to draw.
/// * `data_root`: visit directory holding the `R??/S??.fits` files.
/// * `target`: chart to draw on.
/// * `color`: fill and edge color of the footprints.
///
/// Return
/// ----------
/// * The number of footprints drawn.
/// * [`StackClubError::InvalidDetectorName`] if a detector name cannot be parsed,
///   [`StackClubError::DegeneratePolygon`] for a footprint with fewer than 3 corners.
pub fn draw_sensor_footprints(
    sensors: &[SensorFootprint],
    data_root: &Utf8Path,
    target: &mut dyn PlotTarget,
    color: &str,
) -> Result<usize, StackClubError> {
    let style = PathStyle::new(color).with_fill_alpha(0.2);

    // every sensor is checked before anything is drawn
    let mut footprints = Vec::with_capacity(sensors.len());
    for sensor in sensors {
        let path = data_root.join(sensor.data_path()?);
        if !path.is_file() {
            tracing::debug!(sensor = %sensor.detector_name, %path, "no sensor data, footprint skipped");
            continue;
        }
        if sensor.corners.len() < 3 {
            return Err(StackClubError::DegeneratePolygon(sensor.corners.len()));
        }
        footprints.push(SkyPath::closed(sensor.corners.clone()));
    }

    for footprint in &footprints {
        target.add_path(footprint, &style);
    }
    Ok(footprints.len())
}

/// Draw a reference boundary as an open polyline through `(ra[i], dec[i])`.
///
/// The first vertex is not repeated: pass it again at the end to close the
/// outline.
///
/// Return
/// ----------
/// * [`StackClubError::MismatchedBoundary`] when the sequences differ in length
///   or hold fewer than 2 vertices.
pub fn overlay_region_boundary(
    ra: &[Degree],
    dec: &[Degree],
    target: &mut dyn PlotTarget,
    label: &str,
    color: &str,
) -> Result<(), StackClubError> {
    if ra.len() != dec.len() || ra.len() < 2 {
        return Err(StackClubError::MismatchedBoundary {
            ra: ra.len(),
            dec: dec.len(),
        });
    }

    let vertices = ra
        .iter()
        .zip(dec)
        .map(|(&ra, &dec)| SkyPoint::new(ra, dec))
        .collect();
    target.add_path(
        &SkyPath::open(vertices),
        &PathStyle::new(color).with_label(label),
    );
    Ok(())
}

/// A fixed survey footprint outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceRegion {
    pub label: &'static str,
    pub color: &'static str,
    pub ra: &'static [Degree],
    pub dec: &'static [Degree],
}

impl ReferenceRegion {
    pub fn overlay(&self, target: &mut dyn PlotTarget) -> Result<(), StackClubError> {
        overlay_region_boundary(self.ra, self.dec, target, self.label, self.color)
    }
}

/// Wide-Fast-Deep boundary of the DC2 Run 1.1p simulation.
pub const RUN1_1P_WFD: ReferenceRegion = ReferenceRegion {
    label: "protoDC2 WFD boundary",
    color: "green",
    ra: &[52.25, 52.11, 58.02, 57.87, 52.25],
    dec: &[-27.25, -32.25, -32.25, -27.25, -27.25],
};

/// Ultra-deep drilling field boundary of the DC2 Run 1.1p simulation.
pub const RUN1_1P_UDDF: ReferenceRegion = ReferenceRegion {
    label: "uDDF boundary",
    color: "red",
    ra: &[53.764, 52.486, 52.479, 53.771, 53.764],
    dec: &[-27.533, -27.533, -28.667, -28.667, -27.533],
};

/// Overlay both Run 1.1p regions.
pub fn overlay_run1_1p_regions(target: &mut dyn PlotTarget) -> Result<(), StackClubError> {
    RUN1_1P_WFD.overlay(target)?;
    RUN1_1P_UDDF.overlay(target)
}
