use crate::{Array2, Dataset, NcFile, SubgridRatio, Times, VarNames, WrfoutError};
use log::debug;
use std::path::Path;

/// A WRF-Fire output file.
pub struct WrfFile<D = NcFile> {
    /// Where the variables come from.
    data: D,

    /// Variable and dimension lookup table.
    names: VarNames,

    /// Decoded `Times` entries.
    times: Times,
}

/// The level-set function and its coordinates, trimmed to the
/// atmosphere grid.
#[derive(Debug, Clone)]
pub struct LevelSetGrid {
    pub lfn: Array2,
    pub lon: Array2,
    pub lat: Array2,
    pub ratio: SubgridRatio,
}

impl WrfFile<NcFile> {
    /// Opens the NetCDF file at `path` with default WRF names.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, WrfoutError> {
        Self::new(NcFile::open(path)?, VarNames::default())
    }
}

impl<D: Dataset> WrfFile<D> {
    pub fn new(data: D, names: VarNames) -> Result<Self, WrfoutError> {
        let times = {
            let width = data
                .variable_dims(&names.times)
                .and_then(|dims| dims.last().map(|(_, len)| *len))
                .ok_or_else(|| WrfoutError::MissingVariable(names.times.clone()))?;
            Times::decode(&data.read_chars(&names.times)?, width)?
        };
        debug!("{} time steps", times.len());
        Ok(Self { data, names, times })
    }

    pub fn dataset(&self) -> &D {
        &self.data
    }

    pub fn names(&self) -> &VarNames {
        &self.names
    }

    pub fn times(&self) -> &Times {
        &self.times
    }

    /// Returns the number of time steps in the file.
    pub fn n_steps(&self) -> usize {
        self.times.len()
    }

    /// Returns the `units` attribute of `var`, if any.
    pub fn units(&self, var: &str) -> Option<String> {
        self.data.text_attribute(var, "units")
    }

    /// Returns true if `var` is defined on the fire grid.
    pub fn is_fire_grid(&self, var: &str) -> Result<bool, WrfoutError> {
        let dims = self
            .data
            .variable_dims(var)
            .ok_or_else(|| WrfoutError::MissingVariable(var.to_owned()))?;
        Ok(dims
            .last()
            .map_or(false, |(name, _)| self.names.is_subgrid_dim(name)))
    }

    /// Returns every value of `var` over all time steps.
    pub fn values(&self, var: &str) -> Result<Vec<f64>, WrfoutError> {
        self.data.read_values(var)
    }

    /// Returns the 2-D slice of `var` at `step`, as stored.
    pub fn slice(&self, var: &str, step: usize) -> Result<Array2, WrfoutError> {
        read_slice(&self.data, var, step)
    }

    /// Returns the 2-D slice of `var` at `step`, trimmed to the
    /// atmosphere grid if `var` lives on the fire grid.
    pub fn field(&self, var: &str, step: usize) -> Result<Array2, WrfoutError> {
        let slice = self.slice(var, step)?;
        if self.is_fire_grid(var)? {
            self.subgrid_ratio(slice.shape())?.trim(&slice)
        } else {
            Ok(slice)
        }
    }

    /// Returns the refinement of a fire grid field of `fine_shape`
    /// relative to this file's atmosphere grid.
    pub fn subgrid_ratio(&self, fine_shape: (usize, usize)) -> Result<SubgridRatio, WrfoutError> {
        let coarse_dim = |name: &str| {
            self.data
                .dimension_len(name)
                .ok_or_else(|| WrfoutError::MissingDimension(name.to_owned()))
        };
        let coarse = (
            coarse_dim(&self.names.south_north)?,
            coarse_dim(&self.names.west_east)?,
        );
        SubgridRatio::from_shapes(fine_shape, coarse)
    }

    /// Returns the level-set function at `step` with fire grid
    /// coordinates, all three trimmed identically.
    pub fn level_set(&self, step: usize) -> Result<LevelSetGrid, WrfoutError> {
        let lfn = self.slice(&self.names.lfn, step)?;
        let ratio = self.subgrid_ratio(lfn.shape())?;
        let lon = self.slice(&self.names.fire_lon, 0)?;
        let lat = self.slice(&self.names.fire_lat, 0)?;
        if lon.shape() != lfn.shape() || lat.shape() != lfn.shape() {
            return Err(WrfoutError::Shape {
                name: self.names.fire_lon.clone(),
                len: lon.len(),
                shape: vec![lfn.rows(), lfn.cols()],
            });
        }
        Ok(LevelSetGrid {
            lfn: ratio.trim(&lfn)?,
            lon: ratio.trim(&lon)?,
            lat: ratio.trim(&lat)?,
            ratio,
        })
    }
}

/// Returns the 2-D slice of `var` at `step` from `data`.
///
/// Variables without a time axis, or with a single step, return
/// their only slice for any `step`.
pub fn read_slice<D: Dataset + ?Sized>(
    data: &D,
    var: &str,
    step: usize,
) -> Result<Array2, WrfoutError> {
    let shape = data.variable_shape(var)?;
    let (steps, rows, cols) = match shape[..] {
        [rows, cols] => (1, rows, cols),
        [steps, rows, cols] => (steps, rows, cols),
        _ => {
            return Err(WrfoutError::Shape {
                name: var.to_owned(),
                len: shape.iter().product(),
                shape: shape.clone(),
            })
        }
    };
    let step = match steps {
        1 => 0,
        _ if step < steps => step,
        _ => {
            return Err(WrfoutError::StepOutOfRange {
                name: var.to_owned(),
                step,
                len: steps,
            })
        }
    };
    let values = if shape.len() == 2 {
        data.read_values(var)?
    } else {
        data.read_step(var, step)?
    };
    Array2::new(rows, cols, values)
}

#[cfg(test)]
mod tests {
    use super::WrfFile;
    use crate::{MemDataset, VarNames, WrfoutError};
    use assert_approx_eq::assert_approx_eq;

    fn times(n: usize) -> Vec<u8> {
        (0..n)
            .flat_map(|i| format!("2020-01-01_00:{:02}:00", i * 10).into_bytes())
            .collect()
    }

    /// Two atmosphere cells each way (3 nodes), ratio 2 => 6x6 fire
    /// grid, three steps.
    fn fixture() -> WrfFile<MemDataset> {
        let fire = 6 * 6;
        #[allow(clippy::cast_precision_loss)]
        let lfn: Vec<f64> = (0..3 * fire).map(|i| i as f64).collect();
        #[allow(clippy::cast_precision_loss)]
        let fxlong: Vec<f64> = (0..fire).map(|i| -120.0 + (i % 6) as f64 * 0.01).collect();
        #[allow(clippy::cast_precision_loss)]
        let fxlat: Vec<f64> = (0..fire).map(|i| 38.0 + (i / 6) as f64 * 0.01).collect();
        let ds = MemDataset::new()
            .dimension("Time", 3)
            .dimension("DateStrLen", 19)
            .dimension("south_north", 2)
            .dimension("west_east", 2)
            .dimension("south_north_subgrid", 6)
            .dimension("west_east_subgrid", 6)
            .chars("Times", &["Time", "DateStrLen"], times(3))
            .variable(
                "LFN",
                &["Time", "south_north_subgrid", "west_east_subgrid"],
                lfn,
            )
            .variable(
                "FXLONG",
                &["Time", "south_north_subgrid", "west_east_subgrid"],
                [fxlong.clone(), fxlong.clone(), fxlong].concat(),
            )
            .variable(
                "FXLAT",
                &["Time", "south_north_subgrid", "west_east_subgrid"],
                [fxlat.clone(), fxlat.clone(), fxlat].concat(),
            )
            .variable(
                "T2",
                &["Time", "south_north", "west_east"],
                vec![290.0; 3 * 4],
            )
            .attribute("T2", "units", "K");
        WrfFile::new(ds, VarNames::default()).unwrap()
    }

    #[test]
    fn test_times() {
        let f = fixture();
        assert_eq!(f.n_steps(), 3);
        assert_eq!(f.times().label(2), "2020-01-01T00:20:00");
    }

    #[test]
    fn test_slice_step() {
        let f = fixture();
        let s = f.slice("LFN", 2).unwrap();
        assert_eq!(s.shape(), (6, 6));
        assert_eq!(s.get(0, 0), 72.0);
        assert!(matches!(
            f.slice("LFN", 3),
            Err(WrfoutError::StepOutOfRange { step: 3, len: 3, .. })
        ));
    }

    #[test]
    fn test_field_trims_fire_grid_only() {
        let f = fixture();
        assert!(f.is_fire_grid("LFN").unwrap());
        assert!(!f.is_fire_grid("T2").unwrap());
        assert_eq!(f.field("LFN", 1).unwrap().shape(), (4, 4));
        assert_eq!(f.field("T2", 1).unwrap().shape(), (2, 2));
        assert_eq!(f.units("T2").as_deref(), Some("K"));
        assert_eq!(f.units("LFN"), None);
    }

    #[test]
    fn test_level_set_trims_coordinates() {
        let f = fixture();
        let grid = f.level_set(1).unwrap();
        assert_eq!(grid.ratio.srx, 2);
        assert_eq!(grid.lfn.shape(), (4, 4));
        assert_eq!(grid.lon.shape(), (4, 4));
        assert_eq!(grid.lat.shape(), (4, 4));
        assert_eq!(grid.lfn.get(0, 0), 36.0);
        assert_approx_eq!(grid.lat.get(3, 0), 38.03);
    }

    #[test]
    fn test_missing_times() {
        let ds = MemDataset::new();
        assert!(matches!(
            WrfFile::new(ds, VarNames::default()),
            Err(WrfoutError::MissingVariable(_))
        ));
    }
}
