//! Time-animated overlays.

use crate::{
    kml::{self, ScreenOverlay},
    overlay::{encode_png, render_step, PROGRAM},
    FireKmlError, Frame, MinMaxCache, OverlayRenderer, RenderConfig,
};
use image::DynamicImage;
use indicatif::ProgressBar;
use log::{debug, info};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};
use wrfout::{Dataset, NcFile, WrfFile};
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

/// What an animation writer produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Steps with an image.
    pub drawn: Vec<usize>,

    /// Steps left out for lack of data.
    pub skipped: Vec<usize>,

    /// Written entries, relative to the archive or output directory.
    pub entries: Vec<String>,
}

/// Writes every time step of a file as timed overlays.
pub struct Animation<'a, D = NcFile> {
    file: &'a WrfFile<D>,
    config: RenderConfig,
    cache: MinMaxCache,
    progress: ProgressBar,
}

/// An open KMZ archive, written one entry at a time.
struct Archive {
    zip: ZipWriter<BufWriter<File>>,
    options: FileOptions,
    entries: Vec<String>,
}

impl Archive {
    fn create(path: &Path) -> Result<Self, FireKmlError> {
        Ok(Self {
            zip: ZipWriter::new(BufWriter::new(File::create(path)?)),
            options: FileOptions::default().compression_method(CompressionMethod::Deflated),
            entries: Vec::new(),
        })
    }

    fn add(&mut self, name: String, bytes: &[u8]) -> Result<(), FireKmlError> {
        self.zip.start_file(name.as_str(), self.options)?;
        self.zip.write_all(bytes)?;
        self.entries.push(name);
        Ok(())
    }

    fn add_png(&mut self, name: String, image: &DynamicImage) -> Result<(), FireKmlError> {
        self.add(name, &encode_png(image)?)
    }

    /// Writes the root document named after `path` and closes the
    /// archive, returning every entry in archive order.
    fn finish(mut self, path: &Path, content: &[String]) -> Result<Vec<String>, FireKmlError> {
        let root = format!(
            "{}.kml",
            path.file_stem()
                .map_or_else(|| "doc".into(), |stem| stem.to_string_lossy())
        );
        let document = kml::folder_document(PROGRAM, &content.join("\n"));
        self.add(root, document.as_bytes())?;
        self.zip.finish()?.flush()?;
        Ok(self.entries)
    }
}

impl<'a, D: Dataset> Animation<'a, D> {
    pub fn new(file: &'a WrfFile<D>) -> Self {
        Self {
            file,
            config: RenderConfig::default(),
            cache: MinMaxCache::new(),
            progress: ProgressBar::hidden(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Reports one tick per time step to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Replaces the progress bar, keeping the cache.
    pub fn set_progress(&mut self, progress: ProgressBar) {
        self.progress = progress;
    }

    pub fn cache(&self) -> &MinMaxCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut MinMaxCache {
        &mut self.cache
    }

    /// Writes a KMZ archive animating `field` over every step.
    ///
    /// Steps without data are skipped. A legend is added if
    /// `colorbar` is set and at least one step was drawn.
    pub fn write_kmz(
        &mut self,
        field: &str,
        kmz_path: &Path,
        colorbar: bool,
    ) -> Result<ArchiveSummary, FireKmlError> {
        let renderer = OverlayRenderer::for_field(field, self.file.names(), self.config.clone());
        let mut archive = Archive::create(kmz_path)?;
        let (mut content, mut summary) = self.frames(&renderer, field, false, &mut archive)?;
        if colorbar && !summary.drawn.is_empty() {
            let href = renderer.href(&format!("colorbar_{field}.png"));
            let image = renderer.colorbar(self.file, field, &mut self.cache)?;
            archive.add_png(href.clone(), &DynamicImage::ImageRgb8(image))?;
            content.push(kml::screen_overlay(&ScreenOverlay {
                name: field.to_owned(),
                href,
            }));
        }
        summary.entries = archive.finish(kmz_path, &content)?;
        log_archive(kmz_path, &summary);
        Ok(summary)
    }

    /// Writes a KMZ archive of `field` where every timed overlay has
    /// an invisible untimed twin, so that viewers fetch all images
    /// before the animation is played.
    pub fn write_preload(
        &mut self,
        field: &str,
        kmz_path: &Path,
    ) -> Result<ArchiveSummary, FireKmlError> {
        let renderer = OverlayRenderer::for_field(field, self.file.names(), self.config.clone());
        let mut archive = Archive::create(kmz_path)?;
        let (content, mut summary) = self.frames(&renderer, field, true, &mut archive)?;
        summary.entries = archive.finish(kmz_path, &content)?;
        log_archive(kmz_path, &summary);
        Ok(summary)
    }

    /// Writes one document per step to `kml_dir`, named
    /// `WRF-Fire_001.kml` onwards, with images in a subdirectory.
    ///
    /// A step where none of `fields` has data writes no document.
    pub fn write_sequence(
        &mut self,
        fields: &[String],
        kml_dir: &Path,
    ) -> Result<ArchiveSummary, FireKmlError> {
        fs::create_dir_all(kml_dir)?;
        let n_steps = self.file.n_steps();
        self.progress.set_length(n_steps as u64);
        let mut summary = ArchiveSummary::default();
        for step in 0..n_steps {
            self.progress.set_message(self.file.times().label(step));
            match render_step(
                self.file,
                fields,
                step,
                kml_dir,
                &self.config,
                false,
                &mut self.cache,
            )? {
                Some(rendered) => {
                    let name = format!("{PROGRAM}_{:03}.kml", step + 1);
                    fs::write(
                        kml_dir.join(&name),
                        kml::folder_document(PROGRAM, &rendered.fragments.join("\n")),
                    )?;
                    debug!("wrote {name}");
                    summary.drawn.push(step);
                    summary.entries.push(name);
                    summary.entries.extend(rendered.hrefs);
                }
                None => {
                    info!("skipping step {step}, no data");
                    summary.skipped.push(step);
                }
            }
            self.progress.inc(1);
        }
        self.progress.finish();
        info!(
            "wrote {} documents to {kml_dir:?}, skipped {}",
            summary.drawn.len(),
            summary.skipped.len()
        );
        Ok(summary)
    }

    /// Renders every step of `field` into `archive`, adding an
    /// untimed twin of each overlay if `preload` is set.
    ///
    /// Each image is added to the archive as soon as it is drawn.
    /// Returns the overlay fragments and the drawn and skipped steps.
    fn frames(
        &mut self,
        renderer: &OverlayRenderer,
        field: &str,
        preload: bool,
        archive: &mut Archive,
    ) -> Result<(Vec<String>, ArchiveSummary), FireKmlError> {
        let n_steps = self.file.n_steps();
        let bounds = renderer.bounds(self.file)?;
        let mut content = Vec::new();
        let mut summary = ArchiveSummary::default();
        self.progress.set_length(n_steps as u64);
        for step in 0..n_steps {
            self.progress.set_message(self.file.times().label(step));
            match renderer.render_frame(self.file, field, step, &mut self.cache)? {
                Frame::Drawn(image) => {
                    debug!("{field}: drawing step {step} of {n_steps}");
                    let href = renderer.href(&format!("{field}_{step:05}.png"));
                    archive.add_png(href.clone(), &DynamicImage::ImageRgba8(image))?;
                    let window = Some(self.file.times().open_window(step));
                    let timed = renderer.ground_overlay(field, href.clone(), bounds, window);
                    content.push(kml::ground_overlay(&timed));
                    if preload {
                        let hidden = renderer.ground_overlay(field, href, bounds, None);
                        content.push(kml::ground_overlay(&hidden));
                    }
                    summary.drawn.push(step);
                }
                Frame::NoData => {
                    info!("{field}: skipping step {step} of {n_steps}, no data");
                    summary.skipped.push(step);
                }
            }
            self.progress.inc(1);
        }
        self.progress.finish();
        Ok((content, summary))
    }
}

fn log_archive(kmz_path: &Path, summary: &ArchiveSummary) {
    info!(
        "wrote {kmz_path:?}, {} frames, {} skipped",
        summary.drawn.len(),
        summary.skipped.len()
    );
}
