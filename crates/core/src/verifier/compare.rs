//! Structural and numeric comparison of two datasets.
//!
//! Header stages fail fast on the first differing dimension or attribute.
//! Variable values are compared one pair at a time by the caller, which
//! collects every mismatching name before failing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::error::VerifyError;
use super::types::{AttributeValue, Dataset, Variable};

/// Closeness tolerance: `|a - b| <= atol + rtol * |b|`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            rtol: 1e-5,
            atol: 1e-8,
        }
    }
}

impl Tolerance {
    /// Whether two scalars are close. NaN is never close to anything.
    pub fn is_close(&self, a: f64, b: f64) -> bool {
        if a == b {
            // Covers equal infinities.
            return true;
        }
        (a - b).abs() <= self.atol + self.rtol * b.abs()
    }

    /// Element-wise closeness of equally long slices.
    pub fn all_close(&self, a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| self.is_close(*x, *y))
    }
}

/// Header stages in order: dimensions, global attributes, variable names.
pub fn compare_headers(left: &Dataset, right: &Dataset) -> Result<(), VerifyError> {
    compare_dimensions(&left.dimensions, &right.dimensions)?;
    compare_attributes(&left.attributes, &right.attributes)?;
    compare_variable_names(&left.variables, &right.variables)
}

pub fn compare_dimensions(
    left: &BTreeMap<String, usize>,
    right: &BTreeMap<String, usize>,
) -> Result<(), VerifyError> {
    if left.len() != right.len() {
        return Err(VerifyError::DimensionCountDiffers {
            left: left.len(),
            right: right.len(),
        });
    }
    if !left.keys().eq(right.keys()) {
        return Err(VerifyError::DimensionNamesDiffer);
    }
    for (name, len) in left {
        let other = right[name];
        if *len != other {
            return Err(VerifyError::DimensionLengthDiffers {
                name: name.clone(),
                left: *len,
                right: other,
            });
        }
    }
    debug!(count = left.len(), "Dimensions same");
    Ok(())
}

pub fn compare_attributes(
    left: &BTreeMap<String, AttributeValue>,
    right: &BTreeMap<String, AttributeValue>,
) -> Result<(), VerifyError> {
    if left.len() != right.len() {
        return Err(VerifyError::AttributeCountDiffers {
            left: left.len(),
            right: right.len(),
        });
    }
    if !left.keys().eq(right.keys()) {
        return Err(VerifyError::AttributeNamesDiffer);
    }
    if let Some(name) = left
        .iter()
        .find(|(name, value)| right.get(*name) != Some(*value))
        .map(|(name, _)| name)
    {
        return Err(VerifyError::AttributeDiffers { name: name.clone() });
    }
    debug!(count = left.len(), "Attributes same");
    Ok(())
}

/// Both files must declare the same set of variables.
pub fn compare_variable_names(
    left: &BTreeMap<String, Variable>,
    right: &BTreeMap<String, Variable>,
) -> Result<(), VerifyError> {
    if left.len() != right.len() {
        return Err(VerifyError::VariableCountDiffers {
            left: left.len(),
            right: right.len(),
        });
    }
    if !left.keys().eq(right.keys()) {
        return Err(VerifyError::VariableNamesDiffer);
    }
    Ok(())
}

/// Direct closeness first; on failure, retry as masked arrays.
pub fn variables_match(left: &Variable, right: &Variable, tolerance: Tolerance) -> bool {
    tolerance.all_close(&left.values, &right.values) || masked_match(left, right, tolerance)
}

/// Mask patterns must be identical and unmasked cells close.
fn masked_match(left: &Variable, right: &Variable, tolerance: Tolerance) -> bool {
    if left.values.len() != right.values.len() {
        return false;
    }
    let left_mask = left.mask_or_unmasked();
    let right_mask = right.mask_or_unmasked();
    if left_mask.len() != left.values.len() || left_mask != right_mask {
        return false;
    }
    left.values
        .iter()
        .zip(&right.values)
        .zip(&left_mask)
        .all(|((a, b), masked)| *masked || tolerance.is_close(*a, *b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::types::DataType;

    fn base() -> Dataset {
        Dataset::default()
            .with_dimension("lat", 2)
            .with_dimension("time", 3)
            .with_attribute("Conventions", AttributeValue::Text("CF-1.0".into()))
            .with_attribute("case_id", AttributeValue::Numbers(vec![7.0]))
            .with_variable(
                "TS",
                Variable::numeric(DataType::Float, vec![280.0, 281.5, 290.25]),
            )
            .with_variable("date_written", Variable::text())
    }

    #[test]
    fn test_identical_headers_match() {
        assert!(compare_headers(&base(), &base()).is_ok());
    }

    #[test]
    fn test_tolerance_semantics() {
        let tol = Tolerance::default();
        assert!(tol.is_close(1.0, 1.0 + 1e-6));
        assert!(!tol.is_close(1.0, 1.001));
        assert!(tol.is_close(0.0, 1e-9));
        assert!(!tol.is_close(f64::NAN, f64::NAN));
        assert!(tol.is_close(f64::INFINITY, f64::INFINITY));
        assert!(!tol.all_close(&[1.0, 2.0], &[1.0]));
        assert!(tol.all_close(&[], &[]));
    }

    #[test]
    fn test_dimension_count_mismatch() {
        let other = base().with_dimension("lev", 26);
        let err = compare_headers(&base(), &other).unwrap_err();
        assert!(matches!(
            err,
            VerifyError::DimensionCountDiffers { left: 2, right: 3 }
        ));
    }

    #[test]
    fn test_dimension_name_mismatch() {
        let mut other = base();
        other.dimensions.remove("lat");
        other.dimensions.insert("lon".into(), 2);
        let err = compare_headers(&base(), &other).unwrap_err();
        assert!(matches!(err, VerifyError::DimensionNamesDiffer));
    }

    #[test]
    fn test_dimension_length_mismatch() {
        let other = base().with_dimension("time", 4);
        let err = compare_headers(&base(), &other).unwrap_err();
        match err {
            VerifyError::DimensionLengthDiffers { name, left, right } => {
                assert_eq!(name, "time");
                assert_eq!((left, right), (3, 4));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_attribute_value_compared_exactly() {
        let other = base().with_attribute("case_id", AttributeValue::Numbers(vec![7.000001]));
        let err = compare_headers(&base(), &other).unwrap_err();
        assert!(matches!(err, VerifyError::AttributeDiffers { ref name } if name == "case_id"));
    }

    #[test]
    fn test_attributes_checked_before_variable_names() {
        let other = base()
            .with_attribute("Conventions", AttributeValue::Text("CF-1.6".into()))
            .with_variable("PRECT", Variable::numeric(DataType::Double, vec![1.0]));
        let err = compare_headers(&base(), &other).unwrap_err();
        assert!(matches!(err, VerifyError::AttributeDiffers { .. }));
    }

    #[test]
    fn test_variable_set_mismatch() {
        let other = base().with_variable("PRECT", Variable::numeric(DataType::Double, vec![1.0]));
        let err = compare_headers(&base(), &other).unwrap_err();
        assert!(matches!(
            err,
            VerifyError::VariableCountDiffers { left: 2, right: 3 }
        ));

        let mut renamed = base();
        let ts = renamed.variables.remove("TS").unwrap();
        renamed.variables.insert("T".into(), ts);
        let err = compare_headers(&base(), &renamed).unwrap_err();
        assert!(matches!(err, VerifyError::VariableNamesDiffer));
    }

    #[test]
    fn test_values_within_tolerance_match() {
        let left = Variable::numeric(DataType::Float, vec![280.0, 281.5, 290.25]);
        let right = Variable::numeric(DataType::Float, vec![280.000001, 281.5, 290.25]);
        assert!(variables_match(&left, &right, Tolerance::default()));

        let off = Variable::numeric(DataType::Float, vec![0.0, 281.5, 290.25]);
        assert!(!variables_match(&left, &off, Tolerance::default()));
    }

    #[test]
    fn test_materialized_mask_passes_on_retry() {
        // Original stored fill values without a mask; converter materialized it.
        let left = Variable::numeric(DataType::Float, vec![1.0, f64::NAN, 3.0])
            .with_mask(vec![false, true, false]);
        let right = Variable::numeric(DataType::Float, vec![1.0, 1e36, 3.0])
            .with_mask(vec![false, true, false]);
        assert!(variables_match(&left, &right, Tolerance::default()));
    }

    #[test]
    fn test_mask_pattern_difference_fails() {
        let left = Variable::numeric(DataType::Float, vec![1.0, f64::NAN, 3.0])
            .with_mask(vec![false, true, false]);
        let right = Variable::numeric(DataType::Float, vec![1.0, 2.0, 3.0]);
        assert!(!variables_match(&left, &right, Tolerance::default()));
    }

    #[test]
    fn test_unmasked_difference_fails_even_with_equal_masks() {
        let left = Variable::numeric(DataType::Float, vec![1.0, f64::NAN, 3.0])
            .with_mask(vec![false, true, false]);
        let right = Variable::numeric(DataType::Float, vec![1.5, f64::NAN, 3.0])
            .with_mask(vec![false, true, false]);
        assert!(!variables_match(&left, &right, Tolerance::default()));
    }
}
