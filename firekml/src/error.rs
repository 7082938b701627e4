use thiserror::Error;
use wrfout::WrfoutError;

#[derive(Error, Debug)]
pub enum FireKmlError {
    #[error("{0}")]
    Wrfout(#[from] WrfoutError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{what} shape {got:?} does not match {expected:?}")]
    Shape {
        what: &'static str,
        got: (usize, usize),
        expected: (usize, usize),
    },

    #[error("contouring failed, {0}")]
    Contour(String),

    #[error("{0}")]
    Image(#[from] image::ImageError),

    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("plotting failed, {0}")]
    Plot(String),
}
