use crate::options::{Perimeter, Shapefile};
use anyhow::{Context, Result};
use firekml::{write_perimeter_kml, write_perimeter_shapefile, Outcome};
use std::path::Path;
use wrfout::{Steps, WrfFile};

impl Perimeter {
    pub fn run(&self) -> Result<Outcome> {
        let file = WrfFile::open(&self.input)
            .with_context(|| format!("opening {}", self.input.display()))?;
        let outcome =
            write_perimeter_kml(&file, Steps::from(self.step), Path::new("fire_perimeter.kml"))?;
        Ok(outcome)
    }
}

impl Shapefile {
    pub fn run(&self) -> Result<Outcome> {
        let file = WrfFile::open(&self.input)
            .with_context(|| format!("opening {}", self.input.display()))?;
        let outcome = write_perimeter_shapefile(&file, Steps::from(self.step), Path::new("fire"))?;
        Ok(outcome)
    }
}
