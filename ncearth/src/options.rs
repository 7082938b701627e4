use clap::{Args, Parser};
use std::path::PathBuf;

/// Convert WRF-Fire output to KML, KMZ and shapefiles for Google
/// Earth.
///
/// Outputs are written to the current directory.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub enum Cli {
    /// Write fire perimeters to fire_perimeter.kml.
    Perimeter(Perimeter),

    /// Write fire perimeters to fire.shp, fire.shx and fire.dbf.
    Shapefile(Shapefile),

    /// Write overlays of fields at one step to fire.kml, images to
    /// files/.
    Overlay(Overlay),

    /// Write an animated archive per field to fire_FIELD.kmz.
    Kmz(Kmz),

    /// Like kmz, with hidden copies of every image so viewers load
    /// them all up front, to fire_FIELD_preload.kmz.
    Preload(Preload),

    /// Write one document per step to kml/WRF-Fire_NNN.kml, images
    /// to kml/files/.
    Sequence(Sequence),
}

#[derive(Debug, Clone, Args)]
pub struct Perimeter {
    /// WRF-Fire output (wrfout) file.
    pub input: PathBuf,

    /// Time step, every step if absent.
    pub step: Option<usize>,
}

#[derive(Debug, Clone, Args)]
pub struct Shapefile {
    /// WRF-Fire output (wrfout) file.
    pub input: PathBuf,

    /// Time step, every step if absent.
    pub step: Option<usize>,
}

#[derive(Debug, Clone, Args)]
pub struct Overlay {
    /// WRF-Fire output (wrfout) file.
    pub input: PathBuf,

    /// Time step.
    pub step: usize,

    /// Fields to draw.
    #[arg(default_value = "FGRNHFX")]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct Kmz {
    /// WRF-Fire output (wrfout) file.
    pub input: PathBuf,

    /// Fields to animate, one archive each.
    #[arg(default_value = "FGRNHFX")]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct Preload {
    /// WRF-Fire output (wrfout) file.
    pub input: PathBuf,

    /// Fields to animate, one archive each.
    #[arg(default_value = "FGRNHFX")]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct Sequence {
    /// WRF-Fire output (wrfout) file.
    pub input: PathBuf,

    /// Fields to draw in every document.
    #[arg(default_value = "FGRNHFX")]
    pub fields: Vec<String>,
}
