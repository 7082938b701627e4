use crate::options::Overlay;
use anyhow::{Context, Result};
use firekml::{write_overlay_kml, MinMaxCache, Outcome, RenderConfig};
use std::path::Path;
use wrfout::WrfFile;

impl Overlay {
    pub fn run(&self) -> Result<Outcome> {
        let file = WrfFile::open(&self.input)
            .with_context(|| format!("opening {}", self.input.display()))?;
        let outcome = write_overlay_kml(
            &file,
            &self.fields,
            self.step,
            Path::new("fire.kml"),
            &RenderConfig::default(),
            true,
            &mut MinMaxCache::new(),
        )?;
        Ok(outcome)
    }
}
