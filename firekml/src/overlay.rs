//! Pseudo-color ground overlays of field slices.

use crate::{
    colorbar::colorbar_image,
    colormap::jet,
    kml::{self, GroundOverlay, ScreenOverlay},
    BoundsProvider, ColorScale, FireKmlError, LatLonBox, MinMaxCache, Outcome, ScaleKind,
    WrfBounds,
};
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbImage, RgbaImage};
use log::{debug, info};
use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};
use wrfout::{Array2, Dataset, TimeWindow, VarNames, WrfFile, C};

/// Program name shown in overlay documents.
pub const PROGRAM: &str = "WRF-Fire";

/// Opacity of timed overlays, a little over half.
pub const DEFAULT_ALPHA: u8 = 143;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Image width in pixels. Height follows the field's aspect
    /// ratio.
    pub width_px: u32,

    /// Opacity of timed overlays.
    pub alpha: u8,

    /// Directory images are written to, relative to the document
    /// referencing them.
    pub image_dir: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width_px: 500,
            alpha: DEFAULT_ALPHA,
            image_dir: "files".into(),
        }
    }
}

/// One rendered time step of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Drawn(RgbaImage),

    /// The slice holds nothing the scale can show.
    NoData,
}

/// Renders fields with a color scale over a bounding box.
pub struct OverlayRenderer {
    scale: Box<dyn ColorScale>,
    bounds: Box<dyn BoundsProvider>,
    config: RenderConfig,
}

impl OverlayRenderer {
    pub fn new(
        scale: Box<dyn ColorScale>,
        bounds: Box<dyn BoundsProvider>,
        config: RenderConfig,
    ) -> Self {
        Self {
            scale,
            bounds,
            config,
        }
    }

    /// Returns a renderer for `field` of a WRF file, on the field's
    /// default scale.
    pub fn for_field(field: &str, names: &VarNames, config: RenderConfig) -> Self {
        Self::new(
            ScaleKind::for_field(field).into_scale(),
            Box::new(WrfBounds::new(names)),
            config,
        )
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn kind(&self) -> ScaleKind {
        self.scale.kind()
    }

    /// Returns the (min, max) of `field` over every time step.
    pub fn range<D: Dataset>(
        &self,
        file: &WrfFile<D>,
        field: &str,
        cache: &mut MinMaxCache,
    ) -> Result<(C, C), FireKmlError> {
        cache.get_or_try_insert_with(
            field,
            self.scale.kind(),
            || -> Result<(C, C), FireKmlError> { Ok(self.scale.range(&file.values(field)?)) },
        )
    }

    pub fn bounds<D: Dataset>(&self, file: &WrfFile<D>) -> Result<LatLonBox, FireKmlError> {
        self.bounds.bounds(file.dataset())
    }

    /// Renders `field` at `step`, north up.
    pub fn render_frame<D: Dataset>(
        &self,
        file: &WrfFile<D>,
        field: &str,
        step: usize,
        cache: &mut MinMaxCache,
    ) -> Result<Frame, FireKmlError> {
        let slice = file.field(field, step)?;
        if slice.len() == 0 || !self.scale.has_data(&slice) {
            debug!("{field} step {step} has no data");
            return Ok(Frame::NoData);
        }
        let range = self.range(file, field, cache)?;
        Ok(Frame::Drawn(self.rasterize(&slice.flipud(), range)))
    }

    /// Paints `north_up` with nearest-neighbour sampling.
    ///
    /// # Panics
    ///
    /// Panics if `north_up` is empty.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn rasterize(&self, north_up: &Array2, range: (C, C)) -> RgbaImage {
        let (rows, cols) = north_up.shape();
        let width = self.config.width_px.max(1);
        let height = ((f64::from(width) * rows as f64 / cols as f64).round() as u32).max(1);
        RgbaImage::from_fn(width, height, |x, y| {
            let col = (x as usize * cols / width as usize).min(cols - 1);
            let row = (y as usize * rows / height as usize).min(rows - 1);
            self.scale
                .normalize(north_up.get(row, col), range)
                .map_or(TRANSPARENT, jet)
        })
    }

    /// Renders the legend of `field`, labelled with its units.
    pub fn colorbar<D: Dataset>(
        &self,
        file: &WrfFile<D>,
        field: &str,
        cache: &mut MinMaxCache,
    ) -> Result<RgbImage, FireKmlError> {
        let range = self.range(file, field, cache)?;
        let units = file.units(field).unwrap_or_default();
        colorbar_image(field, &units, self.scale.kind(), range)
    }

    /// Returns the overlay record of one image.
    ///
    /// Untimed overlays are invisible; they only make viewers fetch
    /// the image.
    pub fn ground_overlay(
        &self,
        field: &str,
        href: String,
        bounds: LatLonBox,
        window: Option<TimeWindow>,
    ) -> GroundOverlay {
        GroundOverlay {
            name: field.to_owned(),
            href,
            alpha: if window.is_some() { self.config.alpha } else { 0 },
            bounds,
            window,
        }
    }

    /// Returns the archive or directory relative location of an
    /// image.
    pub fn href(&self, name: &str) -> String {
        format!("{}/{name}", self.config.image_dir)
    }
}

/// Encodes `image` as PNG.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, FireKmlError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(bytes)
}

/// Fragments and images of several fields at one step.
pub(crate) struct Rendered {
    pub fragments: Vec<String>,

    /// Image locations relative to the document.
    pub hrefs: Vec<String>,
}

/// Renders every field with data at `step`, writing images under
/// `dir`.
///
/// Fields without data are left out. Returns `None` if no field had
/// any.
pub(crate) fn render_step<D: Dataset>(
    file: &WrfFile<D>,
    fields: &[String],
    step: usize,
    dir: &Path,
    config: &RenderConfig,
    colorbar: bool,
    cache: &mut MinMaxCache,
) -> Result<Option<Rendered>, FireKmlError> {
    let mut rendered = Rendered {
        fragments: Vec::new(),
        hrefs: Vec::new(),
    };
    for field in fields {
        let renderer = OverlayRenderer::for_field(field, file.names(), config.clone());
        let image = match renderer.render_frame(file, field, step, cache)? {
            Frame::Drawn(image) => image,
            Frame::NoData => {
                info!("{field}: no data at step {step}");
                continue;
            }
        };
        fs::create_dir_all(dir.join(&config.image_dir))?;

        let href = renderer.href(&format!("{field}_{step:05}.png"));
        image.save(dir.join(&href))?;
        let overlay = renderer.ground_overlay(
            field,
            href.clone(),
            renderer.bounds(file)?,
            Some(file.times().open_window(step)),
        );
        rendered.fragments.push(kml::ground_overlay(&overlay));
        rendered.hrefs.push(href);

        if colorbar {
            let href = renderer.href(&format!("colorbar_{field}.png"));
            renderer
                .colorbar(file, field, cache)?
                .save(dir.join(&href))?;
            rendered.fragments.push(kml::screen_overlay(&ScreenOverlay {
                name: field.clone(),
                href: href.clone(),
            }));
            rendered.hrefs.push(href);
        }
    }
    Ok((!rendered.fragments.is_empty()).then_some(rendered))
}

/// Writes a document with one overlay of each field at `step` to
/// `kml_path`, images next to it.
pub fn write_overlay_kml<D: Dataset>(
    file: &WrfFile<D>,
    fields: &[String],
    step: usize,
    kml_path: &Path,
    config: &RenderConfig,
    colorbar: bool,
    cache: &mut MinMaxCache,
) -> Result<Outcome, FireKmlError> {
    let dir = kml_path.parent().unwrap_or_else(|| Path::new(""));
    let Some(rendered) = render_step(file, fields, step, dir, config, colorbar, cache)? else {
        return Ok(Outcome::NoData);
    };
    fs::write(
        kml_path,
        kml::folder_document(PROGRAM, &rendered.fragments.join("\n")),
    )?;
    info!("wrote {kml_path:?}");
    let mut written: Vec<PathBuf> = vec![kml_path.to_owned()];
    written.extend(rendered.hrefs.iter().map(|href| dir.join(href)));
    Ok(Outcome::Written(written))
}
