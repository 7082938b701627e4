//! WRF-Fire output (`wrfout`) access.
//!
//! Reads the pieces of a WRF-Fire history file needed to draw fire
//! perimeters and field overlays: 2-D field slices, fire grid and
//! atmosphere grid coordinates, and per-step timestamps.
//!
//! # References
//!
//! 1. [WRF-Fire user guide](https://www2.mmm.ucar.edu/wrf/users/docs/user_guide_v4/v4.4/users_guide_chap5.html#_Running_WRF-Fire)
//! 1. [NetCDF users guide](https://docs.unidata.ucar.edu/nug/current/)

mod array;
mod dataset;
mod error;
mod file;
mod grid;
mod names;
mod times;

pub use crate::{
    array::{finite_min_max, Array2, C},
    dataset::{Dataset, MemDataset, NcFile},
    error::WrfoutError,
    file::{read_slice, LevelSetGrid, WrfFile},
    grid::SubgridRatio,
    names::VarNames,
    times::{iso, Steps, TimeWindow, Times, ISO_TIME_FORMAT, WRF_TIME_FORMAT},
};
pub use chrono;
