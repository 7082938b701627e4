//! Value to color normalization.

use std::fmt;
use wrfout::{finite_min_max, Array2, C};

/// Range used by the log scale when a series has no positive values.
pub const LOG_FALLBACK_RANGE: (C, C) = (1e-6, 1.0);

/// Fields rendered on a log scale by default.
const LOG_FIELDS: &[&str] = &["FGRNHFX", "GRNHFX"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleKind {
    Linear,
    Log,
}

impl ScaleKind {
    /// Returns the default scale for field `name`.
    pub fn for_field(name: &str) -> Self {
        if LOG_FIELDS.contains(&name) {
            ScaleKind::Log
        } else {
            ScaleKind::Linear
        }
    }

    pub fn into_scale(self) -> Box<dyn ColorScale> {
        match self {
            ScaleKind::Linear => Box::new(LinearScale),
            ScaleKind::Log => Box::new(LogScale),
        }
    }
}

impl fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleKind::Linear => f.write_str("linear"),
            ScaleKind::Log => f.write_str("log"),
        }
    }
}

/// Maps field values onto `[0, 1]` for colormapping.
pub trait ColorScale {
    fn kind(&self) -> ScaleKind;

    /// Returns the (min, max) of a whole series.
    fn range(&self, values: &[C]) -> (C, C);

    /// Returns false if `frame` holds nothing this scale can show.
    fn has_data(&self, frame: &Array2) -> bool;

    /// Returns `v` normalized against `range`, or `None` if `v` is
    /// masked and should be transparent.
    fn normalize(&self, v: C, range: (C, C)) -> Option<C>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScale;

impl ColorScale for LinearScale {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Linear
    }

    fn range(&self, values: &[C]) -> (C, C) {
        finite_min_max(values.iter().copied()).unwrap_or((0.0, 1.0))
    }

    fn has_data(&self, _frame: &Array2) -> bool {
        true
    }

    fn normalize(&self, v: C, (min, max): (C, C)) -> Option<C> {
        if !v.is_finite() {
            return None;
        }
        if max > min {
            Some((v - min) / (max - min))
        } else {
            Some(0.0)
        }
    }
}

/// Natural log normalization. Zero and negative values are masked.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogScale;

impl ColorScale for LogScale {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Log
    }

    fn range(&self, values: &[C]) -> (C, C) {
        let positive = finite_min_max(values.iter().copied().filter(|v| *v > 0.0));
        match (positive, finite_min_max(values.iter().copied())) {
            (Some((min, _)), Some((_, max))) => (min, max),
            _ => LOG_FALLBACK_RANGE,
        }
    }

    fn has_data(&self, frame: &Array2) -> bool {
        frame.max().map_or(false, |max| max > 0.0)
    }

    fn normalize(&self, v: C, (min, max): (C, C)) -> Option<C> {
        if !v.is_finite() || v <= 0.0 {
            return None;
        }
        if max > min {
            Some((v.ln() - min.ln()) / (max.ln() - min.ln()))
        } else {
            Some(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ColorScale, LinearScale, LogScale, ScaleKind, LOG_FALLBACK_RANGE};
    use assert_approx_eq::assert_approx_eq;
    use wrfout::Array2;

    #[test]
    fn test_for_field() {
        assert_eq!(ScaleKind::for_field("FGRNHFX"), ScaleKind::Log);
        assert_eq!(ScaleKind::for_field("GRNHFX"), ScaleKind::Log);
        assert_eq!(ScaleKind::for_field("T2"), ScaleKind::Linear);
        assert_eq!(ScaleKind::Log.into_scale().kind(), ScaleKind::Log);
        assert_eq!(ScaleKind::Log.to_string(), "log");
    }

    #[test]
    fn test_linear() {
        let s = LinearScale;
        let range = s.range(&[f64::NAN, 4.0, -2.0, 1.0]);
        assert_eq!(range, (-2.0, 4.0));
        assert_approx_eq!(s.normalize(1.0, range).unwrap(), 0.5);
        assert_eq!(s.normalize(f64::NAN, range), None);
        assert_eq!(s.normalize(3.0, (3.0, 3.0)), Some(0.0));
    }

    #[test]
    fn test_log_range_has_positive_min() {
        let s = LogScale;
        assert_eq!(s.range(&[0.0, -5.0, 10.0, 1000.0]), (10.0, 1000.0));
        assert_eq!(s.range(&[0.0, -5.0]), LOG_FALLBACK_RANGE);
        assert_eq!(s.range(&[]), LOG_FALLBACK_RANGE);
    }

    #[test]
    fn test_log_normalize() {
        let s = LogScale;
        let range = (10.0, 1000.0);
        assert_approx_eq!(s.normalize(100.0, range).unwrap(), 0.5);
        assert_eq!(s.normalize(0.0, range), None);
        assert_eq!(s.normalize(-1.0, range), None);
    }

    #[test]
    fn test_log_has_data() {
        let s = LogScale;
        assert!(!s.has_data(&Array2::from_fn(2, 2, |_, _| 0.0)));
        assert!(!s.has_data(&Array2::from_fn(2, 2, |_, _| -1.0)));
        assert!(s.has_data(&Array2::from_fn(2, 2, |r, _| r as f64)));
        assert!(LinearScale.has_data(&Array2::from_fn(2, 2, |_, _| 0.0)));
    }
}
