//! Sources of gridded variables.
//!
//! [`Dataset`] is the seam between WRF-specific logic and storage.
//! [`NcFile`] reads NetCDF files from disk, [`MemDataset`] holds
//! variables in memory.

use crate::WrfoutError;
use log::debug;
use netcdf::AttributeValue;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

/// Read access to named dimensions and variables.
pub trait Dataset {
    /// Returns the length of dimension `name`, if present.
    fn dimension_len(&self, name: &str) -> Option<usize>;

    /// Returns the `(name, len)` of each dimension of variable `name`,
    /// slowest varying first.
    fn variable_dims(&self, name: &str) -> Option<Vec<(String, usize)>>;

    /// Returns all values of a numeric variable in row-major order.
    fn read_values(&self, name: &str) -> Result<Vec<f64>, WrfoutError>;

    /// Returns the values of a 3-D numeric variable at index `step`
    /// of its leading (time) axis, in row-major order.
    fn read_step(&self, name: &str, step: usize) -> Result<Vec<f64>, WrfoutError>;

    /// Returns all bytes of a character variable in row-major order.
    fn read_chars(&self, name: &str) -> Result<Vec<u8>, WrfoutError>;

    /// Returns a text attribute of variable `var`.
    fn text_attribute(&self, var: &str, attr: &str) -> Option<String>;

    /// Returns the shape of variable `name`.
    fn variable_shape(&self, name: &str) -> Result<Vec<usize>, WrfoutError> {
        self.variable_dims(name)
            .map(|dims| dims.into_iter().map(|(_, len)| len).collect())
            .ok_or_else(|| WrfoutError::MissingVariable(name.to_owned()))
    }
}

/// A NetCDF file opened for reading.
pub struct NcFile {
    path: PathBuf,
    file: netcdf::File,
}

impl NcFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, WrfoutError> {
        let path = path.as_ref().to_owned();
        debug!("opening {path:?}");
        let file = netcdf::open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn variable(&self, name: &str) -> Result<netcdf::Variable<'_>, WrfoutError> {
        self.file
            .variable(name)
            .ok_or_else(|| WrfoutError::MissingVariable(name.to_owned()))
    }
}

impl Dataset for NcFile {
    fn dimension_len(&self, name: &str) -> Option<usize> {
        self.file.dimension(name).map(|dim| dim.len())
    }

    fn variable_dims(&self, name: &str) -> Option<Vec<(String, usize)>> {
        self.file.variable(name).map(|var| {
            var.dimensions()
                .iter()
                .map(|dim| (dim.name(), dim.len()))
                .collect()
        })
    }

    fn read_values(&self, name: &str) -> Result<Vec<f64>, WrfoutError> {
        Ok(self.variable(name)?.get_values::<f64, _>(..)?)
    }

    fn read_step(&self, name: &str, step: usize) -> Result<Vec<f64>, WrfoutError> {
        Ok(self.variable(name)?.get_values::<f64, _>((step, .., ..))?)
    }

    fn read_chars(&self, name: &str) -> Result<Vec<u8>, WrfoutError> {
        Ok(self.variable(name)?.get_raw_values(..)?)
    }

    fn text_attribute(&self, var: &str, attr: &str) -> Option<String> {
        match self.file.variable(var)?.attribute_value(attr)? {
            Ok(AttributeValue::Str(text)) => Some(text),
            _ => None,
        }
    }
}

enum MemValues {
    Numeric(Vec<f64>),
    Chars(Vec<u8>),
}

struct MemVariable {
    dims: Vec<String>,
    values: MemValues,
    attributes: HashMap<String, String>,
}

/// An in-memory dataset.
///
/// ```
/// use wrfout::{Dataset, MemDataset};
///
/// let ds = MemDataset::new()
///     .dimension("south_north", 2)
///     .dimension("west_east", 3)
///     .variable("T2", &["south_north", "west_east"], vec![0.0; 6])
///     .attribute("T2", "units", "K");
/// assert_eq!(ds.variable_shape("T2").unwrap(), vec![2, 3]);
/// assert_eq!(ds.text_attribute("T2", "units").as_deref(), Some("K"));
/// ```
#[derive(Default)]
pub struct MemDataset {
    dimensions: HashMap<String, usize>,
    variables: HashMap<String, MemVariable>,
}

impl MemDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimension(mut self, name: &str, len: usize) -> Self {
        self.dimensions.insert(name.to_owned(), len);
        self
    }

    /// Adds a numeric variable over previously declared dimensions.
    pub fn variable(mut self, name: &str, dims: &[&str], values: Vec<f64>) -> Self {
        self.insert(name, dims, MemValues::Numeric(values));
        self
    }

    /// Adds a character variable over previously declared dimensions.
    pub fn chars(mut self, name: &str, dims: &[&str], bytes: Vec<u8>) -> Self {
        self.insert(name, dims, MemValues::Chars(bytes));
        self
    }

    /// Sets a text attribute on an existing variable.
    pub fn attribute(mut self, var: &str, attr: &str, value: &str) -> Self {
        if let Some(var) = self.variables.get_mut(var) {
            var.attributes.insert(attr.to_owned(), value.to_owned());
        }
        self
    }

    fn insert(&mut self, name: &str, dims: &[&str], values: MemValues) {
        let dims = dims.iter().map(|dim| (*dim).to_owned()).collect();
        self.variables.insert(
            name.to_owned(),
            MemVariable {
                dims,
                values,
                attributes: HashMap::new(),
            },
        );
    }

    fn checked<'a, T>(&self, name: &str, values: &'a [T]) -> Result<&'a [T], WrfoutError> {
        let shape = self.variable_shape(name)?;
        if shape.iter().product::<usize>() == values.len() {
            Ok(values)
        } else {
            Err(WrfoutError::Shape {
                name: name.to_owned(),
                len: values.len(),
                shape,
            })
        }
    }
}

impl Dataset for MemDataset {
    fn dimension_len(&self, name: &str) -> Option<usize> {
        self.dimensions.get(name).copied()
    }

    fn variable_dims(&self, name: &str) -> Option<Vec<(String, usize)>> {
        let var = self.variables.get(name)?;
        var.dims
            .iter()
            .map(|dim| self.dimension_len(dim).map(|len| (dim.clone(), len)))
            .collect()
    }

    fn read_values(&self, name: &str) -> Result<Vec<f64>, WrfoutError> {
        match self.variables.get(name).map(|var| &var.values) {
            Some(MemValues::Numeric(values)) => Ok(self.checked(name, values)?.to_vec()),
            Some(MemValues::Chars(bytes)) => Ok(self
                .checked(name, bytes)?
                .iter()
                .map(|b| f64::from(*b))
                .collect()),
            None => Err(WrfoutError::MissingVariable(name.to_owned())),
        }
    }

    fn read_step(&self, name: &str, step: usize) -> Result<Vec<f64>, WrfoutError> {
        let Some(MemValues::Numeric(values)) = self.variables.get(name).map(|var| &var.values)
        else {
            return Err(WrfoutError::MissingVariable(name.to_owned()));
        };
        let values = self.checked(name, values)?;
        let shape = self.variable_shape(name)?;
        let (steps, plane) = match shape[..] {
            [steps, rows, cols] => (steps, rows * cols),
            _ => {
                return Err(WrfoutError::Shape {
                    name: name.to_owned(),
                    len: values.len(),
                    shape,
                })
            }
        };
        if step >= steps {
            return Err(WrfoutError::StepOutOfRange {
                name: name.to_owned(),
                step,
                len: steps,
            });
        }
        Ok(values[step * plane..(step + 1) * plane].to_vec())
    }

    fn read_chars(&self, name: &str) -> Result<Vec<u8>, WrfoutError> {
        match self.variables.get(name).map(|var| &var.values) {
            Some(MemValues::Chars(bytes)) => Ok(self.checked(name, bytes)?.to_vec()),
            Some(MemValues::Numeric(_)) => Err(WrfoutError::MissingVariable(format!(
                "{name} (character data)"
            ))),
            None => Err(WrfoutError::MissingVariable(name.to_owned())),
        }
    }

    fn text_attribute(&self, var: &str, attr: &str) -> Option<String> {
        self.variables.get(var)?.attributes.get(attr).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::{Dataset, MemDataset};
    use crate::WrfoutError;

    #[test]
    fn test_undeclared_dimension_hides_variable() {
        let ds = MemDataset::new()
            .dimension("x", 2)
            .variable("V", &["y", "x"], vec![0.0; 2]);
        assert!(ds.variable_dims("V").is_none());
        assert!(matches!(
            ds.variable_shape("V"),
            Err(WrfoutError::MissingVariable(_))
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let ds = MemDataset::new()
            .dimension("x", 3)
            .variable("V", &["x"], vec![0.0; 2]);
        assert!(matches!(ds.read_values("V"), Err(WrfoutError::Shape { .. })));
    }

    #[test]
    fn test_read_step() {
        let ds = MemDataset::new()
            .dimension("Time", 3)
            .dimension("y", 2)
            .dimension("x", 2)
            .variable("V", &["Time", "y", "x"], (0..12).map(f64::from).collect())
            .variable("W", &["y", "x"], vec![0.0; 4]);
        assert_eq!(ds.read_step("V", 1).unwrap(), vec![4.0, 5.0, 6.0, 7.0]);
        assert!(matches!(
            ds.read_step("V", 3),
            Err(WrfoutError::StepOutOfRange { step: 3, len: 3, .. })
        ));
        assert!(matches!(ds.read_step("W", 0), Err(WrfoutError::Shape { .. })));
    }

    #[test]
    fn test_chars() {
        let ds = MemDataset::new()
            .dimension("Time", 1)
            .dimension("DateStrLen", 3)
            .chars("Times", &["Time", "DateStrLen"], b"abc".to_vec());
        assert_eq!(ds.read_chars("Times").unwrap(), b"abc".to_vec());
        assert!(ds.read_chars("missing").is_err());
    }
}
