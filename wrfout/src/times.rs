//! Time step indexing.

use crate::WrfoutError;
use chrono::NaiveDateTime;

/// Layout of WRF `Times` entries.
pub const WRF_TIME_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Layout of KML `TimeSpan` entries.
pub const ISO_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Decoded timestamps of every step in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Times(Vec<NaiveDateTime>);

/// Visibility interval of one time step.
///
/// Either end may be open. A window with neither end carries no time
/// information at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeWindow {
    pub begin: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl TimeWindow {
    pub fn is_empty(&self) -> bool {
        self.begin.is_none() && self.end.is_none()
    }
}

/// Which time steps to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steps {
    /// A single step, by index.
    One(usize),
    /// Every step in the file.
    All,
}

impl Steps {
    /// Returns the step indices selected out of `n_steps`.
    ///
    /// `One` is returned as is even when it is out of range; callers
    /// decide how to degrade.
    pub fn iter(self, n_steps: usize) -> impl Iterator<Item = usize> {
        let (first, last) = match self {
            Steps::One(step) => (step, Some(step)),
            Steps::All => (0, n_steps.checked_sub(1)),
        };
        last.into_iter().flat_map(move |last| first..=last)
    }

    pub fn is_single(self) -> bool {
        matches!(self, Steps::One(_))
    }
}

impl From<Option<usize>> for Steps {
    fn from(step: Option<usize>) -> Self {
        step.map_or(Steps::All, Steps::One)
    }
}

impl Times {
    pub fn new(times: Vec<NaiveDateTime>) -> Self {
        Self(times)
    }

    /// Decodes `n_steps` fixed-width entries of `width` bytes.
    ///
    /// Entries are padded with NUL or spaces in some files; padding is
    /// ignored.
    pub fn decode(raw: &[u8], width: usize) -> Result<Self, WrfoutError> {
        if width == 0 {
            return Ok(Self(Vec::new()));
        }
        raw.chunks(width).map(parse).collect::<Result<_, _>>().map(Self)
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, step: usize) -> Option<NaiveDateTime> {
        self.0.get(step).copied()
    }

    pub fn as_slice(&self) -> &[NaiveDateTime] {
        &self.0
    }

    /// Returns the ISO-8601 timestamp of `step`, or an empty string
    /// when `step` is past the end of the series.
    pub fn label(&self, step: usize) -> String {
        self.get(step).map(iso).unwrap_or_default()
    }

    /// Returns `[t[step], t[step + 1]]`.
    ///
    /// The terminal step collapses to `[t, t]`. A step past the end of
    /// the series yields an empty window.
    pub fn closed_window(&self, step: usize) -> TimeWindow {
        match self.get(step) {
            Some(begin) => TimeWindow {
                begin: Some(begin),
                end: Some(self.get(step + 1).unwrap_or(begin)),
            },
            None => TimeWindow::default(),
        }
    }

    /// Returns the window used for animated overlays.
    ///
    /// The first step has no beginning and the terminal step has no
    /// end, so the first and last frames stay visible outside the
    /// simulated period.
    pub fn open_window(&self, step: usize) -> TimeWindow {
        if step >= self.len() {
            return TimeWindow::default();
        }
        TimeWindow {
            begin: if step > 0 { self.get(step) } else { None },
            end: self.get(step + 1),
        }
    }
}

/// Formats `t` as ISO-8601 without fractional seconds.
pub fn iso(t: NaiveDateTime) -> String {
    t.format(ISO_TIME_FORMAT).to_string()
}

fn parse(entry: &[u8]) -> Result<NaiveDateTime, WrfoutError> {
    let text = String::from_utf8_lossy(entry);
    let text = text.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());
    NaiveDateTime::parse_from_str(text, WRF_TIME_FORMAT)
        .map_err(|_| WrfoutError::Time(text.to_owned()))
}
