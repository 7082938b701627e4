use thiserror::Error;

#[derive(Error, Debug)]
pub enum WrfoutError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Netcdf(#[from] netcdf::Error),

    #[error("missing variable {0}")]
    MissingVariable(String),

    #[error("missing dimension {0}")]
    MissingDimension(String),

    #[error("{name} has {len} values, expected shape {shape:?}")]
    Shape {
        name: String,
        len: usize,
        shape: Vec<usize>,
    },

    #[error("fire grid {fine} is not a multiple of {coarse} {axis} nodes")]
    GridMismatch {
        axis: &'static str,
        fine: usize,
        coarse: usize,
    },

    #[error("step {step} out of range for {name} with {len} steps")]
    StepOutOfRange {
        name: String,
        step: usize,
        len: usize,
    },

    #[error("invalid timestamp {0:?}")]
    Time(String),
}
