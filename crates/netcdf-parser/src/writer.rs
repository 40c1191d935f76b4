//! Writing the in-memory dataset model to NetCDF-4.
//!
//! A plain dump: every dimension, every global attribute and every variable
//! (as `f64`) is written as-is. Variables without values become scalar or
//! unfilled variables that only carry attributes.

use std::path::Path;

use grid_common::{AttrValue, Dataset, Variable};
use netcdf::AttributeValue;
use tracing::info;

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::silence_hdf5_errors;

const FILL_ATTRIBUTES: [&str; 2] = ["_FillValue", "missing_value"];

/// Write `dataset` to a new NetCDF-4 file at `path`, replacing any existing file.
pub fn write_dataset(dataset: &Dataset, path: impl AsRef<Path>) -> NetCdfResult<()> {
    silence_hdf5_errors();

    let path = path.as_ref();
    let fail = |reason: String| NetCdfError::Write {
        path: path.display().to_string(),
        reason,
    };

    let mut file = netcdf::create(path).map_err(|e| fail(e.to_string()))?;

    for dim in dataset.dimensions() {
        let added = if dim.unlimited {
            file.add_unlimited_dimension(&dim.name).map(|_| ())
        } else {
            file.add_dimension(&dim.name, dim.len).map(|_| ())
        };
        added.map_err(|e| fail(format!("dimension {}: {}", dim.name, e)))?;
    }

    for (name, value) in dataset.attributes.iter() {
        file.add_attribute(name, to_netcdf_attribute(value))
            .map_err(|e| fail(format!("global attribute {}: {}", name, e)))?;
    }

    for var in dataset.variables() {
        let dims: Vec<&str> = var.dims.iter().map(String::as_str).collect();
        let mut nc_var = file
            .add_variable::<f64>(&var.name, &dims)
            .map_err(|e| fail(format!("variable {}: {}", var.name, e)))?;

        for (name, value) in var.attributes.iter() {
            let value = if FILL_ATTRIBUTES.contains(&name.as_str()) {
                // Fill values must share the variable's type
                value
                    .as_f64()
                    .map(AttributeValue::Double)
                    .unwrap_or_else(|| to_netcdf_attribute(value))
            } else {
                to_netcdf_attribute(value)
            };
            nc_var
                .put_attribute(name, value)
                .map_err(|e| fail(format!("attribute {}:{}: {}", var.name, name, e)))?;
        }

        if var.is_container() {
            continue;
        }

        let values = refill(var);
        let leading_unlimited = var
            .dims
            .first()
            .and_then(|d| dataset.dimension(d))
            .map(|d| d.unlimited)
            .unwrap_or(false);

        if leading_unlimited {
            if var.dims.len() > 4 {
                return Err(NetCdfError::Unsupported(format!(
                    "record variable {} of rank {}",
                    var.name,
                    var.dims.len()
                )));
            }
            let steps = dataset.dim_len(&var.dims[0])?;
            put_by_record(&mut nc_var, &values, steps)
                .map_err(|e| fail(format!("values of {}: {}", var.name, e)))?;
        } else {
            nc_var
                .put_values(&values, ..)
                .map_err(|e| fail(format!("values of {}: {}", var.name, e)))?;
        }
    }

    info!(
        path = %path.display(),
        variables = dataset.variables().len(),
        "Wrote NetCDF dataset"
    );
    Ok(())
}

/// Replace NaN with the variable's fill value, if it declares one.
fn refill(var: &Variable) -> Vec<f64> {
    let fill = FILL_ATTRIBUTES
        .iter()
        .find_map(|name| var.attributes.get(name).and_then(AttrValue::as_f64));
    match fill {
        Some(fill) => var
            .data
            .iter()
            .map(|&v| if v.is_nan() { fill } else { v })
            .collect(),
        None => var.data.clone(),
    }
}

/// Write a variable whose leading dimension is unlimited one record at a time.
///
/// Rank is at most 4.
fn put_by_record(
    var: &mut netcdf::VariableMut<'_>,
    values: &[f64],
    steps: usize,
) -> Result<(), netcdf::Error> {
    if steps == 0 {
        return Ok(());
    }
    let record = values.len() / steps;
    let rank = var.dimensions().len();

    for (t, chunk) in values.chunks(record).enumerate() {
        match rank {
            1 => var.put_value(chunk[0], [t])?,
            2 => var.put_values(chunk, (t, ..))?,
            3 => var.put_values(chunk, (t, .., ..))?,
            _ => var.put_values(chunk, (t, .., .., ..))?,
        }
    }
    Ok(())
}

/// Map a dataset attribute onto a libnetcdf attribute.
///
/// Integers that fit in 32 bits are written as `int` so classic CF readers
/// understand them.
fn to_netcdf_attribute(value: &AttrValue) -> AttributeValue {
    match value {
        AttrValue::Str(s) => AttributeValue::Str(s.clone()),
        AttrValue::Double(v) => AttributeValue::Double(*v),
        AttrValue::Doubles(v) => AttributeValue::Doubles(v.clone()),
        AttrValue::Int(v) => match i32::try_from(*v) {
            Ok(small) => AttributeValue::Int(small),
            Err(_) => AttributeValue::Longlong(*v),
        },
        AttrValue::Ints(v) => {
            match v.iter().map(|&i| i32::try_from(i)).collect::<Result<Vec<i32>, _>>() {
                Ok(small) => AttributeValue::Ints(small),
                Err(_) => AttributeValue::Longlongs(v.clone()),
            }
        }
    }
}
