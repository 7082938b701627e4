//! Fire perimeter extraction from the level-set function.

use crate::FireKmlError;
use contour::ContourBuilder;
use geo::geometry::{Coord, LineString};
use wrfout::{Array2, C};

/// The zero level set of a level-set function.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelSet {
    /// Every sample is positive; nothing has ignited yet.
    Unignited,

    /// Closed `(lon, lat)` rings bounding the burnt area.
    ///
    /// Every ring is independent. Rings bounding unburnt islands are
    /// not subtracted from the ring that encloses them, so a
    /// donut-shaped front shows up as two overlapping filled rings.
    ///
    /// May be empty if the field has non-positive samples but no
    /// crossing could be traced (e.g. only NaN gaps).
    Perimeter(Vec<LineString<C>>),
}

impl LevelSet {
    pub fn is_unignited(&self) -> bool {
        matches!(self, LevelSet::Unignited)
    }

    /// Returns the perimeter rings, empty when unignited.
    pub fn rings(&self) -> &[LineString<C>] {
        match self {
            LevelSet::Unignited => &[],
            LevelSet::Perimeter(rings) => rings,
        }
    }

    pub fn into_rings(self) -> Vec<LineString<C>> {
        match self {
            LevelSet::Unignited => Vec::new(),
            LevelSet::Perimeter(rings) => rings,
        }
    }
}

/// Returns the zero isoline of `lfn`, burning where `lfn <= 0`, with
/// vertices located through the paired `lon`/`lat` arrays.
pub fn zero_level_set(lfn: &Array2, lon: &Array2, lat: &Array2) -> Result<LevelSet, FireKmlError> {
    for (what, coords) in [("longitude", lon), ("latitude", lat)] {
        if coords.shape() != lfn.shape() {
            return Err(FireKmlError::Shape {
                what,
                got: coords.shape(),
                expected: lfn.shape(),
            });
        }
    }

    if lfn.as_slice().iter().all(|v| *v > 0.0) {
        return Ok(LevelSet::Unignited);
    }

    let (rows, cols) = lfn.shape();
    // Contour polygons enclose values at or above the threshold, so
    // negate to enclose the burning side.
    let burning: Vec<C> = lfn.as_slice().iter().map(|v| -v).collect();
    let contours = ContourBuilder::new(cols, rows, true)
        .contours(&burning, &[0.0])
        .map_err(|e| FireKmlError::Contour(e.to_string()))?;

    let rings = contours
        .iter()
        .flat_map(|contour| contour.geometry().iter())
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
        .filter(|ring| ring.0.len() > 2)
        .map(|ring| to_geographic(ring, lon, lat))
        .collect();

    Ok(LevelSet::Perimeter(rings))
}

/// Maps a ring from contour grid space to geographic coordinates.
///
/// Grid space places sample `(row, col)` at `(col + 0.5, row + 0.5)`.
fn to_geographic(ring: &LineString<C>, lon: &Array2, lat: &Array2) -> LineString<C> {
    let mut geographic: LineString<C> = ring
        .coords()
        .map(|&Coord { x, y }| {
            let (row, col) = (y - 0.5, x - 0.5);
            Coord {
                x: bilinear(lon, row, col),
                y: bilinear(lat, row, col),
            }
        })
        .collect();
    geographic.close();
    geographic
}

/// Interpolates `grid` at fractional index `(row, col)`, clamped to
/// the grid.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn bilinear(grid: &Array2, row: C, col: C) -> C {
    let (rows, cols) = grid.shape();
    let row = row.clamp(0.0, (rows - 1) as C);
    let col = col.clamp(0.0, (cols - 1) as C);
    let (r0, c0) = (row.floor() as usize, col.floor() as usize);
    let (r1, c1) = ((r0 + 1).min(rows - 1), (c0 + 1).min(cols - 1));
    let (fr, fc) = (row - r0 as C, col - c0 as C);
    let south = grid.get(r0, c0) * (1.0 - fc) + grid.get(r0, c1) * fc;
    let north = grid.get(r1, c0) * (1.0 - fc) + grid.get(r1, c1) * fc;
    south * (1.0 - fr) + north * fr
}
