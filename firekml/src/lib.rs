//! Google Earth products from WRF-Fire output.
//!
//! - Fire perimeters: the zero level set of `LFN` as KML placemarks
//!   or a polygon shapefile.
//! - Ground overlays: pseudo-color images of any 2-D field, single
//!   shot or animated in a KMZ archive.

mod animation;
mod bounds;
mod cache;
mod colorbar;
mod colormap;
mod error;
pub mod kml;
mod level_set;
mod overlay;
mod perimeter;
mod scale;
mod shapefile;
#[cfg(test)]
mod testing;

pub use crate::{
    animation::{Animation, ArchiveSummary},
    bounds::{BoundsProvider, LatLonBox, RegularBounds, WrfBounds},
    cache::MinMaxCache,
    colorbar::colorbar_image,
    colormap::jet,
    error::FireKmlError,
    level_set::{zero_level_set, LevelSet},
    overlay::{
        encode_png, write_overlay_kml, Frame, OverlayRenderer, RenderConfig, DEFAULT_ALPHA,
        PROGRAM,
    },
    perimeter::{perimeter_placemarks, perimeters, write_perimeter_kml, Perimeter},
    scale::{ColorScale, LinearScale, LogScale, ScaleKind, LOG_FALLBACK_RANGE},
    shapefile::{write_perimeter_shapefile, ShapefileWriter},
};
use std::path::PathBuf;

/// Result of writing a product for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every file written.
    Written(Vec<PathBuf>),

    /// Nothing to show at the requested step; nothing was written.
    NoData,
}
