//! In-memory gridded dataset model.
//!
//! A [`Dataset`] mirrors the NetCDF data model closely enough to round-trip
//! the forcing and template files used here:
//! - ordered named dimensions (one of which may be unlimited)
//! - ordered variables, each defined over a list of dimension names
//! - global attributes
//!
//! Variable values are stored row-major as `f64`. A variable with no values
//! is an attribute container (e.g. a CRS variable).

use serde::{Deserialize, Serialize};

use crate::attributes::{AttrValue, Attributes};
use crate::error::{DatasetError, DatasetResult};

/// A named dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
    pub unlimited: bool,
}

impl Dimension {
    pub fn new(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            len,
            unlimited: false,
        }
    }

    pub fn unlimited(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            len,
            unlimited: true,
        }
    }
}

/// A named variable with row-major values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub dims: Vec<String>,
    pub data: Vec<f64>,
    pub attributes: Attributes,
}

impl Variable {
    pub fn new(name: impl Into<String>, dims: &[&str], data: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            dims: dims.iter().map(|d| d.to_string()).collect(),
            data,
            attributes: Attributes::new(),
        }
    }

    /// Create an attribute-only variable with no dimensions and no values.
    pub fn container(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dims: Vec::new(),
            data: Vec::new(),
            attributes: Attributes::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.set(name, value);
        self
    }

    pub fn is_container(&self) -> bool {
        self.data.is_empty()
    }

    /// True when the trailing dimensions of this variable are `dims`.
    pub fn ends_with_dims(&self, dims: &[&str]) -> bool {
        self.dims.len() >= dims.len()
            && self.dims[self.dims.len() - dims.len()..]
                .iter()
                .zip(dims)
                .all(|(a, b)| a == b)
    }
}

/// A collection of dimensions, variables and global attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    dimensions: Vec<Dimension>,
    variables: Vec<Variable>,
    pub attributes: Attributes,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Length of a named dimension.
    pub fn dim_len(&self, name: &str) -> DatasetResult<usize> {
        self.dimension(name)
            .map(|d| d.len)
            .ok_or_else(|| DatasetError::MissingDimension(name.to_string()))
    }

    /// Add a dimension, replacing any existing dimension of the same name.
    pub fn add_dimension(&mut self, dim: Dimension) {
        match self.dimensions.iter_mut().find(|d| d.name == dim.name) {
            Some(existing) => *existing = dim,
            None => self.dimensions.push(dim),
        }
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables.iter_mut().find(|v| v.name == name)
    }

    /// Look up a variable or fail with `MissingVariable`.
    pub fn require_variable(&self, name: &str) -> DatasetResult<&Variable> {
        self.variable(name)
            .ok_or_else(|| DatasetError::MissingVariable(name.to_string()))
    }

    /// Insert or replace a variable.
    ///
    /// Every dimension the variable refers to must already exist and the
    /// value count must match the product of their lengths (container
    /// variables with no values are always accepted).
    pub fn set_variable(&mut self, var: Variable) -> DatasetResult<()> {
        let mut expected = 1usize;
        for dim in &var.dims {
            expected *= self.dim_len(dim)?;
        }
        if !var.data.is_empty() && var.data.len() != expected {
            return Err(DatasetError::ShapeMismatch {
                name: var.name.clone(),
                expected,
                actual: var.data.len(),
            });
        }

        match self.variables.iter_mut().find(|v| v.name == var.name) {
            Some(existing) => *existing = var,
            None => self.variables.push(var),
        }
        Ok(())
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attributes.set(name, value);
    }

    /// Rename dimensions and the coordinate variables sharing their names.
    ///
    /// Each pair is `(from, to)`. A pair whose `from` is missing but whose
    /// `to` already exists is treated as already applied; a pair where
    /// neither exists fails with `MissingDimension`.
    pub fn rename_dimensions(&mut self, renames: &[(&str, &str)]) -> DatasetResult<()> {
        for (from, to) in renames {
            if from == to {
                continue;
            }
            if self.dimension(from).is_none() {
                if self.dimension(to).is_some() {
                    continue;
                }
                return Err(DatasetError::MissingDimension(from.to_string()));
            }

            for dim in self.dimensions.iter_mut().filter(|d| d.name == *from) {
                dim.name = to.to_string();
            }
            for var in self.variables.iter_mut() {
                if var.name == *from {
                    var.name = to.to_string();
                }
                for dim in var.dims.iter_mut().filter(|d| d.as_str() == *from) {
                    *dim = to.to_string();
                }
            }
        }
        Ok(())
    }

    /// Extract the 2-D (row, column) plane of a 3-D variable at `index`
    /// along its leading dimension.
    ///
    /// Returns `(values, rows, cols)`. 2-D variables are returned whole when
    /// `index` is 0.
    pub fn time_slice(&self, name: &str, index: usize) -> DatasetResult<(Vec<f64>, usize, usize)> {
        let var = self.require_variable(name)?;
        let shape = var
            .dims
            .iter()
            .map(|d| self.dim_len(d))
            .collect::<DatasetResult<Vec<usize>>>()?;

        let (leading, rows, cols) = match shape.as_slice() {
            [t, r, c] => (*t, *r, *c),
            [r, c] => (1, *r, *c),
            _ => {
                return Err(DatasetError::ShapeMismatch {
                    name: name.to_string(),
                    expected: 3,
                    actual: shape.len(),
                })
            }
        };

        if index >= leading {
            let dim = if var.dims.len() == 3 {
                var.dims[0].clone()
            } else {
                String::from("<none>")
            };
            return Err(DatasetError::IndexOutOfRange {
                dim,
                index,
                len: leading,
            });
        }

        let plane = rows * cols;
        let start = index * plane;
        let values = var
            .data
            .get(start..start + plane)
            .ok_or_else(|| DatasetError::ShapeMismatch {
                name: name.to_string(),
                expected: leading * plane,
                actual: var.data.len(),
            })?
            .to_vec();

        Ok((values, rows, cols))
    }
}
