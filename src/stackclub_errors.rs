use thiserror::Error;

use crate::repository::RepositoryError;

#[derive(Error, Debug)]
pub enum StackClubError {
    #[error("Unknown repository kind: {0}")]
    UnknownRepositoryKind(String),

    #[error("Unrecognized search place: {0}")]
    UnrecognizedSearchPlace(String),

    #[error("Unrecognized object kind: {0}")]
    UnrecognizedObjectKind(String),

    #[error(
        "Cannot locate task/object `{0}` in the source by name. Either pass in an object, or give the kind of object it is."
    )]
    CannotLocateByName(String),

    #[error("Module path `{0}` has fewer than four dotted components")]
    InvalidModulePath(String),

    #[error("A polygon needs at least 3 corners, got {0}")]
    DegeneratePolygon(usize),

    #[error("Region boundary needs matching RA/Dec sequences of at least 2 vertices (got {ra} RA, {dec} Dec)")]
    MismatchedBoundary { ra: usize, dec: usize },

    #[error("Invalid detector name: {0}")]
    InvalidDetectorName(String),

    #[error("Tract {0} is not part of the skymap")]
    TractNotInSkyMap(u32),

    #[error("Patch ({x},{y}) is outside the {nx}x{ny} grid of the tract")]
    PatchOutOfRange { x: u32, y: u32, nx: u32, ny: u32 },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl PartialEq for StackClubError {
    fn eq(&self, other: &Self) -> bool {
        use StackClubError::*;
        match (self, other) {
            (UnknownRepositoryKind(a), UnknownRepositoryKind(b)) => a == b,
            (UnrecognizedSearchPlace(a), UnrecognizedSearchPlace(b)) => a == b,
            (UnrecognizedObjectKind(a), UnrecognizedObjectKind(b)) => a == b,
            (CannotLocateByName(a), CannotLocateByName(b)) => a == b,
            (InvalidModulePath(a), InvalidModulePath(b)) => a == b,
            (DegeneratePolygon(a), DegeneratePolygon(b)) => a == b,
            (
                MismatchedBoundary { ra: a, dec: b },
                MismatchedBoundary { ra: c, dec: d },
            ) => a == c && b == d,
            (InvalidDetectorName(a), InvalidDetectorName(b)) => a == b,
            (TractNotInSkyMap(a), TractNotInSkyMap(b)) => a == b,
            (
                PatchOutOfRange { x, y, nx, ny },
                PatchOutOfRange {
                    x: x2,
                    y: y2,
                    nx: nx2,
                    ny: ny2,
                },
            ) => x == x2 && y == y2 && nx == nx2 && ny == ny2,

            // io errors inside are not comparable: same variant is enough
            (Repository(_), Repository(_)) => true,

            _ => false,
        }
    }
}
