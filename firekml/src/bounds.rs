//! Geographic extent of overlay images.

use crate::FireKmlError;
use wrfout::{read_slice, Dataset, VarNames, C};

/// Edges of a north-up overlay image, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLonBox {
    pub north: C,
    pub south: C,
    pub east: C,
    pub west: C,
}

/// Computes the box an overlay image is stretched over.
pub trait BoundsProvider {
    fn bounds(&self, data: &dyn Dataset) -> Result<LatLonBox, FireKmlError>;
}

/// Bounds of a WRF atmosphere grid.
///
/// Uses the first and last grid centers along the southern row and
/// western column, padded by half a cell. Projection is ignored, so
/// the box is only an approximation for rotated or strongly
/// curvilinear grids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrfBounds {
    pub lon: String,
    pub lat: String,
}

impl WrfBounds {
    pub fn new(names: &VarNames) -> Self {
        Self {
            lon: names.atm_lon.clone(),
            lat: names.atm_lat.clone(),
        }
    }
}

impl Default for WrfBounds {
    fn default() -> Self {
        Self::new(&VarNames::default())
    }
}

impl BoundsProvider for WrfBounds {
    fn bounds(&self, data: &dyn Dataset) -> Result<LatLonBox, FireKmlError> {
        let lon = read_slice(data, &self.lon, 0)?;
        let lat = read_slice(data, &self.lat, 0)?;
        if lat.shape() != lon.shape() {
            return Err(FireKmlError::Shape {
                what: "latitude",
                got: lat.shape(),
                expected: lon.shape(),
            });
        }
        let (rows, cols) = lon.shape();
        if rows < 2 || cols < 2 {
            return Err(FireKmlError::Shape {
                what: "coordinate grid",
                got: (rows, cols),
                expected: (2, 2),
            });
        }
        let dx = lon.get(0, 1) - lon.get(0, 0);
        let dy = lat.get(1, 0) - lat.get(0, 0);
        Ok(LatLonBox {
            north: lat.get(rows - 1, 0) + dy / 2.0,
            south: lat.get(0, 0) - dy / 2.0,
            east: lon.get(0, cols - 1) + dx / 2.0,
            west: lon.get(0, 0) - dx / 2.0,
        })
    }
}

/// Bounds of a regular grid with 1-D coordinate variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegularBounds {
    pub lon: String,
    pub lat: String,
}

impl Default for RegularBounds {
    fn default() -> Self {
        Self {
            lon: "longitude".into(),
            lat: "latitude".into(),
        }
    }
}

impl BoundsProvider for RegularBounds {
    fn bounds(&self, data: &dyn Dataset) -> Result<LatLonBox, FireKmlError> {
        let ends = |name: &str| -> Result<(C, C), FireKmlError> {
            let values = data.read_values(name)?;
            match (values.first(), values.last()) {
                (Some(first), Some(last)) => Ok((*first, *last)),
                _ => Err(FireKmlError::Shape {
                    what: "coordinate axis",
                    got: (0, 0),
                    expected: (1, 1),
                }),
            }
        };
        let (west, east) = ends(&self.lon)?;
        let (south, north) = ends(&self.lat)?;
        Ok(LatLonBox {
            north,
            south,
            east,
            west,
        })
    }
}
