//! # Skymap geometry: tracts, patches and their projection on the sky
//!
//! A skymap tiles the sky into **tracts**, large rectangular regions each carrying
//! its own gnomonic (tangent-plane) projection. Each tract is cut into a grid of
//! **patches** that share the tract's projection and pixel frame.
//!
//! ## Overview
//!
//! - [`PixelPoint`] / [`Box2D`] – positions and rectangles in a tract pixel frame.
//! - [`SkyPoint`] – a position on the sky, RA/Dec in degrees.
//! - [`PixelToSky`] – the projection seam; [`TanWcs`] is the gnomonic implementation.
//! - [`TractInfo`] / [`PatchInfo`] – tract bounding box, projection and patch grid.
//! - [`SkyMap`] – tract id → [`TractInfo`] lookup, as served by the repository.
//! - [`TractGeometry`] – the four projected corners of one tract, used for area estimates.
//!
//! ## Conventions
//!
//! - Box corners are walked `(min,min) → (max,min) → (max,max) → (min,max)`.
//! - The pixel `x` axis points **west**: right ascension decreases as `x` grows,
//!   so an unrotated tract is drawn the right way round on a mirrored-RA chart.
//! - Right ascension is normalized to `[0, 360)` degrees.
use std::collections::BTreeMap;

use itertools::iproduct;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Pixel, SquareDegree, TractId, DEGRAD, RADEG};
use crate::stackclub_errors::StackClubError;

/// A position on the sky (equatorial, degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPoint {
    pub ra: Degree,
    pub dec: Degree,
}

impl SkyPoint {
    pub fn new(ra: Degree, dec: Degree) -> Self {
        SkyPoint { ra, dec }
    }
}

/// A position in a pixel frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: Pixel,
    pub y: Pixel,
}

impl PixelPoint {
    pub fn new(x: Pixel, y: Pixel) -> Self {
        PixelPoint { x, y }
    }
}

/// Axis-aligned floating-point rectangle in a pixel frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Box2D {
    pub min: PixelPoint,
    pub max: PixelPoint,
}

impl Box2D {
    /// Build a box from two opposite corners, in any order.
    pub fn from_corners(a: PixelPoint, b: PixelPoint) -> Self {
        Box2D {
            min: PixelPoint::new(a.x.min(b.x), a.y.min(b.y)),
            max: PixelPoint::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn width(&self) -> Pixel {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> Pixel {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(
            0.5 * (self.min.x + self.max.x),
            0.5 * (self.min.y + self.max.y),
        )
    }

    /// The four corners, counter-clockwise from `(min, min)`.
    pub fn corners(&self) -> [PixelPoint; 4] {
        [
            PixelPoint::new(self.min.x, self.min.y),
            PixelPoint::new(self.max.x, self.min.y),
            PixelPoint::new(self.max.x, self.max.y),
            PixelPoint::new(self.min.x, self.max.y),
        ]
    }

    /// Grow the box by `border` pixels on every side.
    pub fn grown(&self, border: Pixel) -> Self {
        Box2D {
            min: PixelPoint::new(self.min.x - border, self.min.y - border),
            max: PixelPoint::new(self.max.x + border, self.max.y + border),
        }
    }

    /// Intersection with `other`. Disjoint boxes collapse to an empty box at `other.min`.
    pub fn clipped_to(&self, other: &Box2D) -> Self {
        let min = PixelPoint::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y));
        let max = PixelPoint::new(
            self.max.x.min(other.max.x).max(min.x),
            self.max.y.min(other.max.y).max(min.y),
        );
        Box2D { min, max }
    }
}

/// Pixel → sky coordinate transform.
///
/// This is the seam through which every drawing routine projects pixel-frame
/// rectangles. Implementors must be pure: the same pixel always maps to the same
/// sky position.
pub trait PixelToSky {
    fn pixel_to_sky(&self, pixel: PixelPoint) -> SkyPoint;
}

/// Gnomonic (TAN) projection with a uniform pixel scale and no rotation.
///
/// Pixel `crpix` lands on the tangent point `crval`; `x` grows toward the west
/// and `y` toward the north.
///
/// The deprojection builds a point on the tangent plane in the local
/// (radial, east, north) basis of the tangent point, rotates it into the
/// equatorial frame and normalizes it back onto the sphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TanWcs {
    pub crval: SkyPoint,
    pub crpix: PixelPoint,
    /// Pixel scale in degrees per pixel
    pub scale: Degree,
}

impl TanWcs {
    pub fn new(crval: SkyPoint, crpix: PixelPoint, scale: Degree) -> Self {
        TanWcs {
            crval,
            crpix,
            scale,
        }
    }

    /// Columns are the radial, east and north unit vectors at the tangent point.
    fn local_basis(&self) -> Matrix3<f64> {
        let (sin_a, cos_a) = (self.crval.ra * RADEG).sin_cos();
        let (sin_d, cos_d) = (self.crval.dec * RADEG).sin_cos();

        let radial = Vector3::new(cos_d * cos_a, cos_d * sin_a, sin_d);
        let east = Vector3::new(-sin_a, cos_a, 0.0);
        let north = Vector3::new(-sin_d * cos_a, -sin_d * sin_a, cos_d);

        Matrix3::from_columns(&[radial, east, north])
    }
}

impl PixelToSky for TanWcs {
    fn pixel_to_sky(&self, pixel: PixelPoint) -> SkyPoint {
        let xi = -(pixel.x - self.crpix.x) * self.scale * RADEG;
        let eta = (pixel.y - self.crpix.y) * self.scale * RADEG;

        let direction = (self.local_basis() * Vector3::new(1.0, xi, eta)).normalize();

        let ra = direction.y.atan2(direction.x) * DEGRAD;
        let dec = direction.z.clamp(-1.0, 1.0).asin() * DEGRAD;
        SkyPoint::new(ra.rem_euclid(360.0), dec)
    }
}

/// One patch of a tract grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchInfo {
    /// Grid index `(x, y)` of the patch inside its tract
    pub index: (u32, u32),
    /// Patch area proper, without overlap
    pub inner_bbox: Box2D,
    /// Inner box grown by the patch border, clipped to the tract
    pub outer_bbox: Box2D,
}

/// A tract: bounding box in its own pixel frame, projection and patch grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TractInfo {
    pub id: TractId,
    pub bbox: Box2D,
    pub wcs: TanWcs,
    /// Number of patches along `x` and `y`
    pub num_patches: (u32, u32),
    /// Inner size of one patch in pixels
    pub patch_inner_dims: (Pixel, Pixel),
    /// Overlap border of the patches in pixels
    pub patch_border: Pixel,
}

impl TractInfo {
    /// Build a tract centred on `center`, with a `num_patches` grid of
    /// `patch_inner_dims` patches and the tract box starting at pixel `(0, 0)`.
    ///
    /// Arguments
    /// -----------------
    /// * `id`: tract identifier.
    /// * `center`: sky position of the tract centre, used as the tangent point.
    /// * `scale`: pixel scale in degrees per pixel.
    /// * `num_patches`: patch grid dimensions `(nx, ny)`.
    /// * `patch_inner_dims`: patch size in pixels `(width, height)`.
    /// * `patch_border`: overlap border of each patch in pixels.
    pub fn centered_on(
        id: TractId,
        center: SkyPoint,
        scale: Degree,
        num_patches: (u32, u32),
        patch_inner_dims: (Pixel, Pixel),
        patch_border: Pixel,
    ) -> Self {
        let width = num_patches.0 as f64 * patch_inner_dims.0;
        let height = num_patches.1 as f64 * patch_inner_dims.1;
        let bbox = Box2D::from_corners(PixelPoint::new(0.0, 0.0), PixelPoint::new(width, height));

        TractInfo {
            id,
            wcs: TanWcs::new(center, bbox.center(), scale),
            bbox,
            num_patches,
            patch_inner_dims,
            patch_border,
        }
    }

    /// Geometry of the patch at grid index `(x, y)`.
    ///
    /// Return
    /// ----------
    /// * The [`PatchInfo`] or [`StackClubError::PatchOutOfRange`] for an index outside the grid.
    pub fn patch_info(&self, x: u32, y: u32) -> Result<PatchInfo, StackClubError> {
        let (nx, ny) = self.num_patches;
        if x >= nx || y >= ny {
            return Err(StackClubError::PatchOutOfRange { x, y, nx, ny });
        }

        let (w, h) = self.patch_inner_dims;
        let min = PixelPoint::new(self.bbox.min.x + x as f64 * w, self.bbox.min.y + y as f64 * h);
        let max = PixelPoint::new(min.x + w, min.y + h);
        let inner_bbox = Box2D { min, max }.clipped_to(&self.bbox);
        let outer_bbox = inner_bbox.grown(self.patch_border).clipped_to(&self.bbox);

        Ok(PatchInfo {
            index: (x, y),
            inner_bbox,
            outer_bbox,
        })
    }

    /// Every patch of the grid, `x` major.
    pub fn patches(&self) -> impl Iterator<Item = PatchInfo> + '_ {
        let (nx, ny) = self.num_patches;
        iproduct!(0..nx, 0..ny).filter_map(move |(x, y)| self.patch_info(x, y).ok())
    }

    /// Sky position of the tract centre.
    pub fn center(&self) -> SkyPoint {
        self.wcs.pixel_to_sky(self.bbox.center())
    }

    /// Project the four tract box corners on the sky.
    pub fn geometry(&self) -> TractGeometry {
        TractGeometry {
            tract_id: self.id,
            corners: self.bbox.corners().map(|c| self.wcs.pixel_to_sky(c)),
        }
    }
}

/// Tract/patch index of a repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkyMap {
    tracts: BTreeMap<TractId, TractInfo>,
}

impl SkyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tract: TractInfo) {
        self.tracts.insert(tract.id, tract);
    }

    pub fn with_tract(mut self, tract: TractInfo) -> Self {
        self.insert(tract);
        self
    }

    pub fn get(&self, id: TractId) -> Option<&TractInfo> {
        self.tracts.get(&id)
    }

    /// Like [`SkyMap::get`], failing with [`StackClubError::TractNotInSkyMap`].
    pub fn tract(&self, id: TractId) -> Result<&TractInfo, StackClubError> {
        self.get(id).ok_or(StackClubError::TractNotInSkyMap(id))
    }

    /// All tract ids known to the index, ascending.
    pub fn tract_ids(&self) -> impl Iterator<Item = TractId> + '_ {
        self.tracts.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracts.is_empty()
    }
}

/// The four sky corners of one tract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TractGeometry {
    pub tract_id: TractId,
    pub corners: [SkyPoint; 4],
}

impl TractGeometry {
    /// Small-rectangle area estimate in square degrees.
    ///
    /// `|Δra| × cos(mean dec) × |Δdec|`, with `Δra` taken along the first edge
    /// (corner 0 → corner 1) and `Δdec` across the diagonal (corner 0 → corner 2).
    /// Valid only for tracts that neither contain a pole nor straddle RA = 0.
    pub fn approximate_area(&self) -> SquareDegree {
        let [c0, c1, c2, _] = self.corners;
        let delta_ra = (c1.ra - c0.ra).abs();
        let delta_dec = (c2.dec - c0.dec).abs();
        let mean_dec = self.corners.iter().map(|c| c.dec).sum::<f64>() / 4.0;

        delta_ra * (mean_dec * RADEG).cos() * delta_dec
    }
}

#[cfg(test)]
mod skymap_test {
    use super::*;
    use approx::assert_relative_eq;

    fn tract_at(ra: f64, dec: f64) -> TractInfo {
        TractInfo::centered_on(7, SkyPoint::new(ra, dec), 0.2 / 3600.0, (4, 3), (4000., 4000.), 100.)
    }

    #[test]
    fn test_box_corners_order() {
        let b = Box2D::from_corners(PixelPoint::new(10., 5.), PixelPoint::new(0., 0.));
        assert_eq!(
            b.corners(),
            [
                PixelPoint::new(0., 0.),
                PixelPoint::new(10., 0.),
                PixelPoint::new(10., 5.),
                PixelPoint::new(0., 5.),
            ]
        );
        assert_eq!(b.center(), PixelPoint::new(5., 2.5));
    }

    #[test]
    fn test_clip_disjoint_box_is_empty() {
        let a = Box2D::from_corners(PixelPoint::new(0., 0.), PixelPoint::new(1., 1.));
        let b = Box2D::from_corners(PixelPoint::new(5., 5.), PixelPoint::new(6., 6.));
        let c = a.clipped_to(&b);
        assert_eq!(c.width(), 0.0);
        assert_eq!(c.height(), 0.0);
    }

    #[test]
    fn test_tan_wcs_reference_pixel() {
        let wcs = TanWcs::new(SkyPoint::new(55.0, -30.0), PixelPoint::new(100., 200.), 1e-4);
        let sky = wcs.pixel_to_sky(PixelPoint::new(100., 200.));
        assert_relative_eq!(sky.ra, 55.0, epsilon = 1e-10);
        assert_relative_eq!(sky.dec, -30.0, epsilon = 1e-10);
    }

    #[test]
    fn test_tan_wcs_axes_orientation() {
        let wcs = TanWcs::new(SkyPoint::new(10.0, 0.0), PixelPoint::new(0., 0.), 1e-3);
        let east = wcs.pixel_to_sky(PixelPoint::new(-1000., 0.));
        let north = wcs.pixel_to_sky(PixelPoint::new(0., 1000.));

        // one degree offsets on the equator: the gnomonic distortion is tiny
        assert_relative_eq!(east.ra, 11.0, epsilon = 1e-3);
        assert_relative_eq!(east.dec, 0.0, epsilon = 1e-10);
        assert_relative_eq!(north.ra, 10.0, epsilon = 1e-10);
        assert_relative_eq!(north.dec, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_tan_wcs_wraps_ra() {
        let wcs = TanWcs::new(SkyPoint::new(0.0, 0.0), PixelPoint::new(0., 0.), 1e-3);
        let west = wcs.pixel_to_sky(PixelPoint::new(1000., 0.));
        assert_relative_eq!(west.ra, 359.0, epsilon = 1e-3);
    }

    #[test]
    fn test_patch_grid() {
        let tract = tract_at(60.0, -30.0);
        assert_eq!(tract.patches().count(), 12);

        let corner = tract.patch_info(0, 0).unwrap();
        assert_eq!(corner.inner_bbox.min, PixelPoint::new(0., 0.));
        // the outer box cannot leave the tract
        assert_eq!(corner.outer_bbox.min, PixelPoint::new(0., 0.));
        assert_eq!(corner.outer_bbox.max, PixelPoint::new(4100., 4100.));

        let inside = tract.patch_info(1, 1).unwrap();
        assert_eq!(inside.outer_bbox.min, PixelPoint::new(3900., 3900.));

        assert_eq!(
            tract.patch_info(4, 0),
            Err(StackClubError::PatchOutOfRange {
                x: 4,
                y: 0,
                nx: 4,
                ny: 3
            })
        );
    }

    #[test]
    fn test_tract_center_is_tangent_point() {
        let tract = tract_at(60.0, -30.0);
        let c = tract.center();
        assert_relative_eq!(c.ra, 60.0, epsilon = 1e-10);
        assert_relative_eq!(c.dec, -30.0, epsilon = 1e-10);
    }

    #[test]
    fn test_unit_square_area() {
        let geometry = TractGeometry {
            tract_id: 0,
            corners: [
                SkyPoint::new(10.0, 0.0),
                SkyPoint::new(9.0, 0.0),
                SkyPoint::new(9.0, -1.0),
                SkyPoint::new(10.0, -1.0),
            ],
        };
        assert_relative_eq!(geometry.approximate_area(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_area_shrinks_with_declination() {
        let at = |dec: f64| TractGeometry {
            tract_id: 0,
            corners: [
                SkyPoint::new(2.0, dec),
                SkyPoint::new(0.0, dec),
                SkyPoint::new(0.0, dec + 1.0),
                SkyPoint::new(2.0, dec + 1.0),
            ],
        };
        let equator = at(-0.5).approximate_area();
        let sixty = at(59.5).approximate_area();
        assert_relative_eq!(equator, 2.0, epsilon = 1e-12);
        assert_relative_eq!(sixty, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_skymap_lookup() {
        let skymap = SkyMap::new().with_tract(tract_at(1.0, 2.0));
        assert_eq!(skymap.len(), 1);
        assert_eq!(skymap.tract_ids().collect::<Vec<_>>(), vec![7]);
        assert!(skymap.tract(7).is_ok());
        assert_eq!(skymap.tract(8), Err(StackClubError::TractNotInSkyMap(8)));
    }
}
