//! Shared test fixtures.

use quick_xml::{events::Event, Reader};
use wrfout::{MemDataset, VarNames, WrfFile};

/// Fire grid samples per side, before trimming.
pub const FIRE_N: usize = 20;

/// Atmosphere cells per side; `FIRE_N / (ATM_N + 1)` is the subgrid
/// ratio.
pub const ATM_N: usize = 4;

/// Returns the name of every element in `xml`, in document order.
///
/// # Panics
///
/// Panics if `xml` is not well formed.
pub fn elements(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut names = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) => {
                names.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("malformed xml at {}: {e}", reader.buffer_position()),
        }
    }
    names
}

/// Returns a WRF file with `n_steps` steps of `LFN` and `FGRNHFX`
/// given by `lfn(step, row, col)` and `heat(step, row, col)` on a
/// 0.001 degree fire grid, plus a constant `T2` on the atmosphere
/// grid.
pub fn fire_file(
    n_steps: usize,
    lfn: impl Fn(usize, usize, usize) -> f64,
    heat: impl Fn(usize, usize, usize) -> f64,
) -> WrfFile<MemDataset> {
    WrfFile::new(fire_dataset(n_steps, lfn, heat), VarNames::default())
        .expect("fixture is consistent")
}

/// The variables behind [`fire_file`].
#[allow(clippy::cast_precision_loss)]
pub fn fire_dataset(
    n_steps: usize,
    lfn: impl Fn(usize, usize, usize) -> f64,
    heat: impl Fn(usize, usize, usize) -> f64,
) -> MemDataset {
    let fire_dims = &["Time", "south_north_subgrid", "west_east_subgrid"];
    let atm_dims = &["Time", "south_north", "west_east"];
    let over_fire = |f: &dyn Fn(usize, usize, usize) -> f64| -> Vec<f64> {
        (0..n_steps * FIRE_N * FIRE_N)
            .map(|i| {
                let (step, rest) = (i / (FIRE_N * FIRE_N), i % (FIRE_N * FIRE_N));
                f(step, rest / FIRE_N, rest % FIRE_N)
            })
            .collect()
    };
    let over_atm = |f: &dyn Fn(usize, usize) -> f64| -> Vec<f64> {
        (0..n_steps * ATM_N * ATM_N)
            .map(|i| {
                let rest = i % (ATM_N * ATM_N);
                f(rest / ATM_N, rest % ATM_N)
            })
            .collect()
    };
    let times: Vec<u8> = (0..n_steps)
        .flat_map(|i| format!("2020-01-01_{:02}:{:02}:00", i / 6, (i % 6) * 10).into_bytes())
        .collect();

    MemDataset::new()
        .dimension("Time", n_steps)
        .dimension("DateStrLen", 19)
        .dimension("south_north", ATM_N)
        .dimension("west_east", ATM_N)
        .dimension("south_north_subgrid", FIRE_N)
        .dimension("west_east_subgrid", FIRE_N)
        .chars("Times", &["Time", "DateStrLen"], times)
        .variable("LFN", fire_dims, over_fire(&lfn))
        .variable("FGRNHFX", fire_dims, over_fire(&heat))
        .attribute("FGRNHFX", "units", "W m-2")
        .variable(
            "FXLONG",
            fire_dims,
            over_fire(&|_, _, col| -120.0 + col as f64 * 0.001),
        )
        .variable(
            "FXLAT",
            fire_dims,
            over_fire(&|_, row, _| 38.0 + row as f64 * 0.001),
        )
        .variable(
            "XLONG",
            atm_dims,
            over_atm(&|_, col| -120.0 + (col as f64 + 0.5) * 0.004),
        )
        .variable(
            "XLAT",
            atm_dims,
            over_atm(&|row, _| 38.0 + (row as f64 + 0.5) * 0.004),
        )
        .variable("T2", atm_dims, over_atm(&|_, _| 290.0))
        .attribute("T2", "units", "K")
}
