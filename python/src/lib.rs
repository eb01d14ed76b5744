//! Python bindings for bitprob-rs using PyO3.

use bitprob_rs::probability::{self, DosageOptions};
use bitprob_rs::{BitWidth, UnpackError};
use pyo3::prelude::*;

fn value_error(e: UnpackError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
        "{} (code {})",
        e,
        i32::from(e.code())
    ))
}

/// Decode packed fields to renormalized 32-bit values.
///
/// Args:
///     data: packed block bytes (already decompressed)
///     bit_width: bits per field, 1 to 32
///     count: number of fields
///
/// Returns:
///     List of unsigned 32-bit integers
#[pyfunction]
fn decode(data: &[u8], bit_width: u32, count: usize) -> PyResult<Vec<u32>> {
    bitprob_rs::decode(data, bit_width, count).map_err(value_error)
}

/// Decode packed fields to probabilities in [0, 1].
#[pyfunction]
fn decode_probabilities(data: &[u8], bit_width: u32, count: usize) -> PyResult<Vec<f64>> {
    let width = BitWidth::new(bit_width).map_err(value_error)?;
    let values = bitprob_rs::decode(data, bit_width, count).map_err(value_error)?;
    Ok(probability::probabilities(&values, width))
}

/// Compute per-sample dosages from a diploid biallelic block.
///
/// Samples that are missing or below the probability threshold map to None.
#[pyfunction]
#[pyo3(signature = (data, bit_width, nb_samples, prob_threshold=0.9, missing=None))]
fn dosages(
    data: &[u8],
    bit_width: u32,
    nb_samples: usize,
    prob_threshold: f64,
    missing: Option<Vec<bool>>,
) -> PyResult<Vec<Option<f64>>> {
    let width = BitWidth::new(bit_width).map_err(value_error)?;
    let count = probability::stored_value_count(nb_samples).map_err(value_error)?;
    let values = bitprob_rs::decode(data, bit_width, count).map_err(value_error)?;
    let options = DosageOptions { prob_threshold };
    probability::dosages(&values, width, nb_samples, missing.as_deref(), &options)
        .map_err(value_error)
}

/// Bytes needed for `count` fields of `bit_width` bits.
#[pyfunction]
fn required_bytes(bit_width: u32, count: usize) -> PyResult<usize> {
    bitprob_rs::required_bytes(bit_width, count).map_err(value_error)
}

/// bitprob Python module.
#[pymodule]
fn bitprob(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(decode, m)?)?;
    m.add_function(wrap_pyfunction!(decode_probabilities, m)?)?;
    m.add_function(wrap_pyfunction!(dosages, m)?)?;
    m.add_function(wrap_pyfunction!(required_bytes, m)?)?;
    Ok(())
}
