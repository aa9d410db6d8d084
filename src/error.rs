// src/error.rs
use thiserror::Error;

/// Errors raised by the pricing engine and the grid evaluator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BsError {
    /// A model parameter outside its domain (S, K > 0; σ, T ≥ 0; all finite)
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameter {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Malformed axis or invalid base parameters for a grid request
    #[error("Invalid grid specification for '{field}': {reason}")]
    InvalidGridSpec { field: String, reason: String },
}

impl BsError {
    /// Re-label a parameter failure as a grid failure on `field`.
    pub fn into_grid_spec(self, field: &str) -> BsError {
        match self {
            BsError::InvalidParameter { .. } => BsError::InvalidGridSpec {
                field: field.to_string(),
                reason: self.to_string(),
            },
            grid @ BsError::InvalidGridSpec { .. } => grid,
        }
    }
}

/// Result type alias for bs-heatmap operations
pub type BsResult<T> = Result<T, BsError>;

/// Validation utilities
pub mod validation {
    use super::{BsError, BsResult};

    /// Validate that a parameter is finite and strictly positive
    pub fn validate_positive(name: &str, value: f64) -> BsResult<()> {
        validate_finite(name, value)?;
        if value <= 0.0 {
            Err(BsError::InvalidParameter {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is finite and non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> BsResult<()> {
        validate_finite(name, value)?;
        if value < 0.0 {
            Err(BsError::InvalidParameter {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> BsResult<()> {
        if !value.is_finite() {
            Err(BsError::InvalidParameter {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate a grid axis: non-empty, finite and strictly increasing.
    pub fn validate_axis(name: &str, axis: &[f64]) -> BsResult<()> {
        if axis.is_empty() {
            return Err(BsError::InvalidGridSpec {
                field: name.to_string(),
                reason: "axis must contain at least one value".to_string(),
            });
        }

        if let Some((idx, value)) = axis.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(BsError::InvalidGridSpec {
                field: name.to_string(),
                reason: format!("value {} at index {} is not finite", value, idx),
            });
        }

        if let Some(idx) = axis.windows(2).position(|w| w[1] <= w[0]) {
            return Err(BsError::InvalidGridSpec {
                field: name.to_string(),
                reason: format!(
                    "values must be strictly increasing ({} at index {} followed by {})",
                    axis[idx],
                    idx,
                    axis[idx + 1]
                ),
            });
        }

        Ok(())
    }
}
