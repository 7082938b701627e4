//! Fire perimeter documents.

use crate::{
    kml::{self, PerimeterPlacemark},
    zero_level_set, FireKmlError, Outcome,
};
use geo::geometry::LineString;
use log::{debug, info, warn};
use std::{fs, path::Path};
use wrfout::{Dataset, Steps, WrfFile, C};

/// The fire front at one time step.
#[derive(Debug, Clone, PartialEq)]
pub struct Perimeter {
    pub step: usize,
    pub rings: Vec<LineString<C>>,
}

/// Returns the perimeter at every selected step where the fire has
/// ignited.
pub fn perimeters<D: Dataset>(
    file: &WrfFile<D>,
    steps: Steps,
) -> Result<Vec<Perimeter>, FireKmlError> {
    let mut perimeters = Vec::new();
    for step in steps.iter(file.n_steps()) {
        if step >= file.n_steps() {
            warn!("step {step} is past the last time stamp");
        }
        let grid = file.level_set(step)?;
        let level_set = zero_level_set(&grid.lfn, &grid.lon, &grid.lat)?;
        if level_set.is_unignited() {
            debug!("step {step}: not ignited");
            continue;
        }
        let rings = level_set.into_rings();
        debug!("step {step}: {} rings", rings.len());
        perimeters.push(Perimeter { step, rings });
    }
    Ok(perimeters)
}

/// Returns one placemark per ignited step.
pub fn perimeter_placemarks<D: Dataset>(
    file: &WrfFile<D>,
    steps: Steps,
) -> Result<Vec<String>, FireKmlError> {
    Ok(placemarks(file, &perimeters(file, steps)?))
}

fn placemarks<D: Dataset>(file: &WrfFile<D>, perimeters: &[Perimeter]) -> Vec<String> {
    perimeters
        .iter()
        .map(|Perimeter { step, rings }| {
            let label = file.times().label(*step);
            kml::placemark(&PerimeterPlacemark {
                label: &label,
                window: file.times().closed_window(*step),
                rings,
            })
        })
        .collect()
}

/// Writes the perimeter document for `steps` to `path`.
///
/// A single unignited step writes nothing and returns
/// [`Outcome::NoData`]. Unignited steps are left out otherwise.
pub fn write_perimeter_kml<D: Dataset>(
    file: &WrfFile<D>,
    steps: Steps,
    path: &Path,
) -> Result<Outcome, FireKmlError> {
    let perimeters = perimeters(file, steps)?;
    if steps.is_single() && perimeters.is_empty() {
        return Ok(Outcome::NoData);
    }
    let content = placemarks(file, &perimeters).join("\n");
    fs::write(path, kml::perimeter_document(&content))?;
    info!("wrote {} perimeters to {path:?}", perimeters.len());
    Ok(Outcome::Written(vec![path.to_owned()]))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::cast_precision_loss)]

    use super::{perimeter_placemarks, perimeters, write_perimeter_kml};
    use crate::{
        testing::{elements, fire_file},
        Outcome,
    };
    use tempfile::TempDir;
    use wrfout::Steps;

    /// Circular front centred on the fire grid, growing by two samples
    /// per step and not yet ignited at step 0.
    fn growing(step: usize, row: usize, col: usize) -> f64 {
        let radius = 2.0 * step as f64 - 0.5;
        (row as f64 - 8.0).hypot(col as f64 - 8.0) - radius
    }

    fn count(xml: &str, name: &str) -> usize {
        elements(xml).iter().filter(|n| *n == name).count()
    }

    #[test]
    fn test_unignited_everywhere() {
        let file = fire_file(3, |_, _, _| 1.0, |_, _, _| 0.0);
        assert!(perimeters(&file, Steps::All).unwrap().is_empty());
    }

    #[test]
    fn test_single_step_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fire_perimeter.kml");
        let corner = |_: usize, row: usize, col: usize| {
            if row < 5 && col < 5 {
                -1.0
            } else {
                1.0
            }
        };
        let file = fire_file(1, corner, |_, _, _| 0.0);
        let outcome = write_perimeter_kml(&file, Steps::All, &path).unwrap();
        assert_eq!(outcome, Outcome::Written(vec![path.clone()]));

        let doc = std::fs::read_to_string(&path).unwrap();
        assert_eq!(count(&doc, "Document"), 1);
        assert_eq!(count(&doc, "Placemark"), 1);
        assert!(count(&doc, "Polygon") >= 1);
        assert!(doc.contains("Fire perimeter at 2020-01-01T00:00:00"));
        // Terminal step collapses its window.
        assert!(doc.contains("<end>2020-01-01T00:00:00</end>"));
    }

    #[test]
    fn test_unignited_steps_are_left_out() {
        let file = fire_file(3, growing, |_, _, _| 0.0);
        let found = perimeters(&file, Steps::All).unwrap();
        assert_eq!(found.iter().map(|p| p.step).collect::<Vec<_>>(), vec![1, 2]);
        assert!(found.iter().all(|p| p.rings.len() == 1));

        let placemarks = perimeter_placemarks(&file, Steps::All).unwrap();
        assert_eq!(placemarks.len(), 2);
        assert!(placemarks[0].contains("<begin>2020-01-01T00:10:00</begin>"));
        assert!(placemarks[0].contains("<end>2020-01-01T00:20:00</end>"));
    }

    #[test]
    fn test_single_unignited_step() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fire_perimeter.kml");
        let file = fire_file(3, growing, |_, _, _| 0.0);
        assert_eq!(
            write_perimeter_kml(&file, Steps::One(0), &path).unwrap(),
            Outcome::NoData
        );
        assert!(!path.exists());
        assert!(matches!(
            write_perimeter_kml(&file, Steps::One(2), &path).unwrap(),
            Outcome::Written(_)
        ));
        assert_eq!(count(&std::fs::read_to_string(&path).unwrap(), "Placemark"), 1);
    }

    #[test]
    fn test_step_out_of_range() {
        let file = fire_file(2, growing, |_, _, _| 0.0);
        assert!(perimeters(&file, Steps::One(5)).is_err());
    }
}
