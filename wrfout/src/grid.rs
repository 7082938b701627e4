//! Fire grid / atmosphere grid reconciliation.

use crate::{Array2, WrfoutError};

/// Integer refinement of the fire grid relative to the atmosphere
/// grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubgridRatio {
    /// Fire grid cells per atmosphere node, west-east.
    pub srx: usize,

    /// Fire grid cells per atmosphere node, south-north.
    pub sry: usize,
}

impl SubgridRatio {
    /// Returns the ratio between a fire grid of shape `(fny, fnx)` and
    /// an atmosphere grid of `(south_north, west_east)` cells.
    ///
    /// The atmosphere grid has one more node than cells along each
    /// axis. A fire grid that is not an exact multiple of the node
    /// counts does not belong to the atmosphere grid.
    pub fn from_shapes(
        (fny, fnx): (usize, usize),
        (south_north, west_east): (usize, usize),
    ) -> Result<Self, WrfoutError> {
        let srx = ratio("west_east", fnx, west_east + 1)?;
        let sry = ratio("south_north", fny, south_north + 1)?;
        Ok(Self { srx, sry })
    }

    /// Returns `field` without its last `sry` rows and `srx` columns,
    /// leaving exactly the fire cells covering the atmosphere grid.
    pub fn trim(&self, field: &Array2) -> Result<Array2, WrfoutError> {
        let (rows, cols) = field.shape();
        if rows <= self.sry || cols <= self.srx {
            return Err(WrfoutError::Shape {
                name: "fire grid".into(),
                len: field.len(),
                shape: vec![rows, cols],
            });
        }
        Ok(field.slice(0..rows - self.sry, 0..cols - self.srx))
    }
}

fn ratio(axis: &'static str, fine: usize, coarse: usize) -> Result<usize, WrfoutError> {
    match fine.checked_rem(coarse) {
        Some(0) if fine >= coarse => Ok(fine / coarse),
        _ => Err(WrfoutError::GridMismatch {
            axis,
            fine,
            coarse,
        }),
    }
}
