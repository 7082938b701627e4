use crate::{
    options::{Kmz, Preload, Sequence},
    progress,
};
use anyhow::{Context, Result};
use firekml::{Animation, Outcome};
use indicatif::{MultiProgress, ProgressDrawTarget};
use std::path::{Path, PathBuf};
use wrfout::WrfFile;

impl Kmz {
    pub fn run(&self) -> Result<Outcome> {
        let file = WrfFile::open(&self.input)
            .with_context(|| format!("opening {}", self.input.display()))?;
        let progress_group = MultiProgress::with_draw_target(ProgressDrawTarget::stderr_with_hz(4));
        let mut animation = Animation::new(&file);
        let mut written = Vec::new();
        for field in &self.fields {
            let kmz_path = PathBuf::from(format!("fire_{field}.kmz"));
            let pb = progress_group.add(progress::steps("Animate", field, file.n_steps()));
            animation.set_progress(pb);
            animation
                .write_kmz(field, &kmz_path, true)
                .with_context(|| format!("writing {}", kmz_path.display()))?;
            written.push(kmz_path);
        }
        Ok(Outcome::Written(written))
    }
}

impl Preload {
    pub fn run(&self) -> Result<Outcome> {
        let file = WrfFile::open(&self.input)
            .with_context(|| format!("opening {}", self.input.display()))?;
        let progress_group = MultiProgress::with_draw_target(ProgressDrawTarget::stderr_with_hz(4));
        let mut animation = Animation::new(&file);
        let mut written = Vec::new();
        for field in &self.fields {
            let kmz_path = PathBuf::from(format!("fire_{field}_preload.kmz"));
            let pb = progress_group.add(progress::steps("Preload", field, file.n_steps()));
            animation.set_progress(pb);
            animation
                .write_preload(field, &kmz_path)
                .with_context(|| format!("writing {}", kmz_path.display()))?;
            written.push(kmz_path);
        }
        Ok(Outcome::Written(written))
    }
}

impl Sequence {
    pub fn run(&self) -> Result<Outcome> {
        let file = WrfFile::open(&self.input)
            .with_context(|| format!("opening {}", self.input.display()))?;
        let progress_group = MultiProgress::with_draw_target(ProgressDrawTarget::stderr_with_hz(4));
        let kml_dir = Path::new("kml");
        let pb = progress_group.add(progress::steps(
            "Sequence",
            &self.fields.join(", "),
            file.n_steps(),
        ));
        let summary = Animation::new(&file)
            .with_progress(pb)
            .write_sequence(&self.fields, kml_dir)?;
        Ok(Outcome::Written(
            summary
                .entries
                .iter()
                .filter(|entry| entry.ends_with(".kml"))
                .map(|entry| kml_dir.join(entry))
                .collect(),
        ))
    }
}
