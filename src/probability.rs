//! Consumer-side helpers for renormalized values.
//!
//! Packed genotype blocks store, for every diploid biallelic sample, the
//! probabilities of the first two genotypes (AA, AB) as `b`-bit integers
//! scaled so that `2^b - 1` means 1.0. The third probability (BB) is implied.

use crate::BitWidth;
use crate::error::UnpackError;

/// Recover the raw field from a value produced by [`crate::renormalize`].
#[inline]
pub fn raw_field(value: u32, width: BitWidth) -> u32 {
    value.swap_bytes() >> width.justify_shift()
}

/// Probability encoded by a renormalized value, `raw / (2^b - 1)`.
#[inline]
pub fn to_probability(value: u32, width: BitWidth) -> f64 {
    raw_field(value, width) as f64 / width.max_raw() as f64
}

pub fn probabilities(values: &[u32], width: BitWidth) -> Vec<f64> {
    values.iter().map(|&v| to_probability(v, width)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DosageOptions {
    /// Minimum probability the most likely genotype must reach for a dosage
    /// to be reported. `0.0` disables the filter.
    pub prob_threshold: f64,
}

impl Default for DosageOptions {
    fn default() -> Self {
        Self {
            prob_threshold: 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GenotypeProbabilities {
    pub hom_ref: f64,
    pub het: f64,
    pub hom_alt: f64,
}

impl GenotypeProbabilities {
    pub fn from_stored(hom_ref: f64, het: f64) -> Self {
        Self {
            hom_ref,
            het,
            hom_alt: 1.0 - hom_ref - het,
        }
    }

    /// Expected count of the second allele.
    pub fn dosage(&self) -> f64 {
        2.0 * self.hom_alt + self.het
    }

    pub fn is_confident(&self, threshold: f64) -> bool {
        self.hom_ref >= threshold || self.het >= threshold || self.hom_alt >= threshold
    }
}

/// Number of stored values for `nb_samples` diploid samples (two each).
///
/// Sample counts above `usize::MAX / 2` are rejected, reported against that
/// limit.
pub fn stored_value_count(nb_samples: usize) -> Result<usize, UnpackError> {
    nb_samples
        .checked_mul(2)
        .ok_or(UnpackError::SampleCountMismatch {
            expected: usize::MAX / 2,
            actual: nb_samples,
        })
}

/// Group decoded values into per-sample genotype probabilities.
///
/// `values` must hold two entries per sample.
pub fn genotype_probabilities(
    values: &[u32],
    width: BitWidth,
    nb_samples: usize,
) -> Result<Vec<GenotypeProbabilities>, UnpackError> {
    let expected = stored_value_count(nb_samples)?;
    if values.len() != expected {
        return Err(UnpackError::SampleCountMismatch {
            expected,
            actual: values.len(),
        });
    }

    Ok(values
        .chunks_exact(2)
        .map(|pair| {
            GenotypeProbabilities::from_stored(
                to_probability(pair[0], width),
                to_probability(pair[1], width),
            )
        })
        .collect())
}

/// Per-sample dosages; `None` for missing or low-confidence samples.
pub fn dosages(
    values: &[u32],
    width: BitWidth,
    nb_samples: usize,
    missing: Option<&[bool]>,
    options: &DosageOptions,
) -> Result<Vec<Option<f64>>, UnpackError> {
    if let Some(mask) = missing {
        if mask.len() != nb_samples {
            return Err(UnpackError::SampleCountMismatch {
                expected: nb_samples,
                actual: mask.len(),
            });
        }
    }

    let genotypes = genotype_probabilities(values, width, nb_samples)?;
    let result = genotypes
        .iter()
        .enumerate()
        .map(|(i, g)| {
            if missing.is_some_and(|m| m[i]) {
                return None;
            }
            if options.prob_threshold > 0.0 && !g.is_confident(options.prob_threshold) {
                return None;
            }
            Some(g.dosage())
        })
        .collect();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renormalize;

    fn bw(bits: u32) -> BitWidth {
        BitWidth::new(bits).unwrap()
    }

    #[test]
    fn test_raw_field_inverts_renormalize() {
        for bits in 1..=32 {
            let width = bw(bits);
            for raw in [0, 1, width.max_raw() / 2, width.max_raw()] {
                assert_eq!(raw_field(renormalize(raw, width), width), raw, "bits={}", bits);
            }
        }
    }

    #[test]
    fn test_probability_scale() {
        let width = bw(8);
        assert_eq!(to_probability(renormalize(255, width), width), 1.0);
        assert_eq!(to_probability(renormalize(0, width), width), 0.0);

        let width = bw(32);
        assert_eq!(to_probability(renormalize(u32::MAX, width), width), 1.0);
    }

    #[test]
    fn test_dosage_extremes() {
        assert_eq!(GenotypeProbabilities::from_stored(1.0, 0.0).dosage(), 0.0);
        assert_eq!(GenotypeProbabilities::from_stored(0.0, 1.0).dosage(), 1.0);
        assert_eq!(GenotypeProbabilities::from_stored(0.0, 0.0).dosage(), 2.0);
    }

    #[test]
    fn test_dosages_with_threshold_and_missing() {
        let width = bw(8);
        let raw = [255, 0, 0, 255, 0, 0, 100, 100];
        let values: Vec<u32> = raw.iter().map(|&r| renormalize(r, width)).collect();
        let missing = [false, false, true, false];

        let result = dosages(&values, width, 4, Some(&missing), &DosageOptions::default()).unwrap();
        assert_eq!(result[0], Some(0.0));
        assert_eq!(result[1], Some(1.0));
        assert_eq!(result[2], None);
        // 100/255 for both stored genotypes, nothing reaches 0.9.
        assert_eq!(result[3], None);

        let unfiltered = dosages(
            &values,
            width,
            4,
            None,
            &DosageOptions {
                prob_threshold: 0.0,
            },
        )
        .unwrap();
        assert_eq!(unfiltered[2], Some(2.0));
        let d = unfiltered[3].unwrap();
        let p = 100.0 / 255.0;
        assert!((d - (2.0 * (1.0 - 2.0 * p) + p)).abs() < 1e-12);
    }

    #[test]
    fn test_sample_count_too_large_for_two_values_each() {
        let width = bw(8);
        let nb_samples = usize::MAX / 2 + 1;
        assert_eq!(
            stored_value_count(nb_samples),
            Err(UnpackError::SampleCountMismatch {
                expected: usize::MAX / 2,
                actual: nb_samples,
            })
        );
        assert_eq!(stored_value_count(3), Ok(6));
        assert!(matches!(
            dosages(&[0, 0], width, nb_samples, None, &DosageOptions::default()),
            Err(UnpackError::SampleCountMismatch { .. })
        ));
        assert!(matches!(
            genotype_probabilities(&[0, 0], width, usize::MAX),
            Err(UnpackError::SampleCountMismatch { .. })
        ));
    }

    #[test]
    fn test_sample_count_mismatch() {
        let width = bw(8);
        assert_eq!(
            genotype_probabilities(&[0, 0, 0], width, 2),
            Err(UnpackError::SampleCountMismatch {
                expected: 4,
                actual: 3,
            })
        );
        assert_eq!(
            dosages(&[0, 0], width, 1, Some(&[false, true]), &DosageOptions::default()),
            Err(UnpackError::SampleCountMismatch {
                expected: 1,
                actual: 2,
            })
        );
    }
}
