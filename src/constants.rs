//! # Constants and type definitions for stackclub
//!
//! This module centralizes the **unit conversions**, **type aliases** and
//! **well-known dataset names** used throughout the crate.
//!
//! ## Overview
//!
//! - Angle conversions (degrees ↔ radians)
//! - Core type aliases shared by the taster and the plotting routines
//! - Dataset category names as the data butler spells them
//! - Drawing defaults (axis margin, label sizes)

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Radians → degrees
pub const DEGRAD: f64 = 180.0 / std::f64::consts::PI;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Pixel coordinate in a tract or sensor frame
pub type Pixel = f64;
/// Area in square degrees
pub type SquareDegree = f64;
/// Integer identifier of a skymap tract
pub type TractId = u32;

// -------------------------------------------------------------------------------------------------
// Dataset categories
// -------------------------------------------------------------------------------------------------

/// Raw, unprocessed images
pub const RAW: &str = "raw";
/// Calibrated single-visit exposures
pub const CALEXP: &str = "calexp";
/// Single-visit source catalogs
pub const SRC: &str = "src";
/// Single-visit WCS solutions
pub const WCS: &str = "wcs";
/// Coadded images
pub const DEEP_COADD: &str = "deepCoadd";
/// Detections merged across filters on the coadds
pub const DEEP_COADD_MERGE_DET: &str = "deepCoadd_mergeDet";
/// Forced photometry on the coadds
pub const DEEP_COADD_FORCED_SRC: &str = "deepCoadd_forced_src";
/// Tract/patch index of the coadds
pub const DEEP_COADD_SKYMAP: &str = "deepCoadd_skyMap";

// -------------------------------------------------------------------------------------------------
// Drawing defaults
// -------------------------------------------------------------------------------------------------

/// Margin added around a tract when setting the axis limits
pub const PLOT_MARGIN: Degree = 1.0;

/// Font size of a tract label
pub const TRACT_LABEL_SIZE: f64 = 16.0;

/// Font size of a patch label
pub const PATCH_LABEL_SIZE: f64 = 6.0;
