//! Reading NetCDF files into the in-memory dataset model.

use grid_common::{AttrValue, Attributes, Dataset, Dimension, Variable};
use netcdf::AttributeValue;
use tracing::{debug, info};

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::silence_hdf5_errors;

/// Which variables to load values for.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum VariableSelection {
    /// Every variable in the file
    #[default]
    All,
    /// Only the named variables; others are skipped entirely
    Only(Vec<String>),
}

impl VariableSelection {
    fn includes(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.iter().any(|n| n == name),
        }
    }
}

/// Options controlling how a file is read.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    pub variables: VariableSelection,
}

impl ReadOptions {
    /// Read every variable.
    pub fn all() -> Self {
        Self::default()
    }

    /// Read only the named variables.
    ///
    /// Useful for the CONUS template, whose 2-D fields are far larger than
    /// the `x`/`y`/`crs` variables alignment needs.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variables: VariableSelection::Only(names.into_iter().map(Into::into).collect()),
        }
    }
}

/// Open a local NetCDF file or an OPeNDAP URL and read it.
///
/// OPeNDAP access requires a libnetcdf built with DAP support.
pub fn open_dataset(location: &str, options: &ReadOptions) -> NetCdfResult<Dataset> {
    silence_hdf5_errors();

    let file = netcdf::open(location).map_err(|e| NetCdfError::Open {
        location: location.to_string(),
        reason: e.to_string(),
    })?;

    let dataset = read_file(&file, options)?;
    info!(
        location = %location,
        dimensions = dataset.dimensions().len(),
        variables = dataset.variables().len(),
        "Opened NetCDF dataset"
    );
    Ok(dataset)
}

/// Convert an open file into a [`Dataset`].
pub(crate) fn read_file(file: &netcdf::File, options: &ReadOptions) -> NetCdfResult<Dataset> {
    let mut dataset = Dataset::new();

    for dim in file.dimensions() {
        let converted = if dim.is_unlimited() {
            Dimension::unlimited(dim.name(), dim.len())
        } else {
            Dimension::new(dim.name(), dim.len())
        };
        dataset.add_dimension(converted);
    }

    for attr in file.attributes() {
        if let Some(value) = read_attribute(&attr)? {
            dataset.attributes.set(attr.name(), value);
        }
    }

    for var in file.variables() {
        let name = var.name();
        if !options.variables.includes(&name) {
            continue;
        }

        let mut attributes = Attributes::new();
        for attr in var.attributes() {
            if let Some(value) = read_attribute(&attr)? {
                attributes.set(attr.name(), value);
            }
        }

        // Scalar variables are grid-mapping containers in these files
        if var.dimensions().is_empty() {
            dataset.set_variable(Variable {
                name,
                dims: Vec::new(),
                data: Vec::new(),
                attributes,
            })?;
            continue;
        }

        let data = match var.get_values::<f64, _>(..) {
            Ok(values) => unpack(values, &mut attributes),
            Err(e) => {
                debug!(variable = %name, error = %e, "Variable is not numeric, keeping attributes only");
                Vec::new()
            }
        };

        dataset.set_variable(Variable {
            name,
            dims: var.dimensions().iter().map(|d| d.name()).collect(),
            data,
            attributes,
        })?;
    }

    Ok(dataset)
}

/// Replace fill values with NaN and apply `scale_factor`/`add_offset`.
///
/// The packing attributes are removed since the returned values are
/// already unpacked.
fn unpack(mut values: Vec<f64>, attributes: &mut Attributes) -> Vec<f64> {
    let fill = ["_FillValue", "missing_value"]
        .iter()
        .filter_map(|name| attributes.get(name).and_then(AttrValue::as_f64))
        .collect::<Vec<f64>>();
    let scale = attributes.remove("scale_factor").and_then(|v| v.as_f64());
    let offset = attributes.remove("add_offset").and_then(|v| v.as_f64());

    for value in values.iter_mut() {
        if fill.contains(value) {
            *value = f64::NAN;
        } else {
            *value = *value * scale.unwrap_or(1.0) + offset.unwrap_or(0.0);
        }
    }

    // Fill values are stored unpacked from now on
    if scale.is_some() || offset.is_some() {
        for name in ["_FillValue", "missing_value"] {
            if let Some(raw) = attributes.get(name).and_then(AttrValue::as_f64) {
                attributes.set(name, raw * scale.unwrap_or(1.0) + offset.unwrap_or(0.0));
            }
        }
    }

    values
}

fn read_attribute(attr: &netcdf::Attribute<'_>) -> NetCdfResult<Option<AttrValue>> {
    let value = attr.value().map_err(|e| NetCdfError::Read {
        name: attr.name().to_string(),
        reason: e.to_string(),
    })?;
    Ok(convert_attribute(value))
}

/// Map a libnetcdf attribute onto the dataset model.
///
/// Returns `None` for types the model has no use for.
pub(crate) fn convert_attribute(value: AttributeValue) -> Option<AttrValue> {
    let converted = match value {
        AttributeValue::Str(s) => AttrValue::Str(s),
        AttributeValue::Strs(s) => AttrValue::Str(s.join("\n")),
        AttributeValue::Double(v) => AttrValue::Double(v),
        AttributeValue::Doubles(v) => AttrValue::Doubles(v),
        AttributeValue::Float(v) => AttrValue::Double(v as f64),
        AttributeValue::Floats(v) => AttrValue::Doubles(v.into_iter().map(f64::from).collect()),
        AttributeValue::Schar(v) => AttrValue::Int(v as i64),
        AttributeValue::Uchar(v) => AttrValue::Int(v as i64),
        AttributeValue::Short(v) => AttrValue::Int(v as i64),
        AttributeValue::Ushort(v) => AttrValue::Int(v as i64),
        AttributeValue::Int(v) => AttrValue::Int(v as i64),
        AttributeValue::Uint(v) => AttrValue::Int(v as i64),
        AttributeValue::Longlong(v) => AttrValue::Int(v),
        AttributeValue::Shorts(v) => AttrValue::Ints(v.into_iter().map(i64::from).collect()),
        AttributeValue::Ints(v) => AttrValue::Ints(v.into_iter().map(i64::from).collect()),
        AttributeValue::Longlongs(v) => AttrValue::Ints(v),
        _ => return None,
    };
    Some(converted)
}
