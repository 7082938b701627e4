//! Vertical legend images.

use crate::{colormap::jet, FireKmlError, ScaleKind};
use image::{Rgba, RgbImage};
use plotters::prelude::*;
use std::fmt::Display;
use wrfout::C;

const WIDTH: u32 = 200;
const HEIGHT: u32 = 500;

/// Number of color bands drawn.
const BANDS: u32 = 256;

/// Draws a `min..max` legend for `kind`.
///
/// `title` is drawn above the bar and `label`, usually the field's
/// units, along its axis.
pub fn colorbar_image(
    title: &str,
    label: &str,
    kind: ScaleKind,
    range: (C, C),
) -> Result<RgbImage, FireKmlError> {
    let mut buffer = vec![0; WIDTH as usize * HEIGHT as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 20))
            .margin(10)
            .set_label_area_size(LabelAreaPosition::Left, 110)
            .build_cartesian_2d(0.0..1.0, 0.0..1.0)
            .map_err(plot_err)?;

        let formatter = |t: &C| format_value(value_at(kind, range, *t));
        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh()
            .disable_y_mesh()
            .disable_x_axis()
            .y_labels(6)
            .y_label_formatter(&formatter);
        if !label.is_empty() {
            mesh.y_desc(label);
        }
        mesh.draw().map_err(plot_err)?;

        chart
            .draw_series((0..BANDS).map(|band| {
                let lo = C::from(band) / C::from(BANDS);
                let hi = C::from(band + 1) / C::from(BANDS);
                let Rgba([r, g, b, _]) = jet((lo + hi) / 2.0);
                Rectangle::new([(0.0, lo), (1.0, hi)], RGBColor(r, g, b).filled())
            }))
            .map_err(plot_err)?;

        root.present().map_err(plot_err)?;
    }
    RgbImage::from_raw(WIDTH, HEIGHT, buffer)
        .ok_or_else(|| FireKmlError::Plot("colorbar buffer has the wrong size".into()))
}

/// Returns the field value shown at normalized position `t`.
pub fn value_at(kind: ScaleKind, (min, max): (C, C), t: C) -> C {
    match kind {
        ScaleKind::Linear => min + t * (max - min),
        ScaleKind::Log => (min.ln() + t * (max.ln() - min.ln())).exp(),
    }
}

fn format_value(v: C) -> String {
    let magnitude = v.abs();
    if magnitude != 0.0 && !(1e-2..1e4).contains(&magnitude) {
        format!("{v:.2e}")
    } else {
        format!("{v:.2}")
    }
}

fn plot_err<E: Display>(e: E) -> FireKmlError {
    FireKmlError::Plot(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::{colorbar_image, format_value, value_at, HEIGHT, WIDTH};
    use crate::ScaleKind;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_value_at() {
        assert_approx_eq!(value_at(ScaleKind::Linear, (-2.0, 4.0), 0.5), 1.0);
        assert_approx_eq!(value_at(ScaleKind::Log, (10.0, 1000.0), 0.5), 100.0);
        assert_approx_eq!(value_at(ScaleKind::Log, (10.0, 1000.0), 1.0), 1000.0);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.0), "0.00");
        assert_eq!(format_value(12.5), "12.50");
        assert_eq!(format_value(150000.0), "1.50e5");
        assert_eq!(format_value(0.001), "1.00e-3");
    }

    #[test]
    fn test_colorbar_image() {
        let image = colorbar_image("FGRNHFX", "W m-2", ScaleKind::Log, (1.0, 1000.0)).unwrap();
        assert_eq!(image.dimensions(), (WIDTH, HEIGHT));
        assert_eq!((WIDTH, HEIGHT), (200, 500));
        // Bands fill the middle of the plot area, the corners stay white.
        assert_eq!(image.get_pixel(WIDTH - 1, HEIGHT - 1).0, [255, 255, 255]);
        assert_ne!(image.get_pixel(WIDTH - 30, HEIGHT / 2).0, [255, 255, 255]);
    }
}
