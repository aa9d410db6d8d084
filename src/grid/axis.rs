// src/grid/axis.rs
//! Axis construction for heatmap requests.
//!
//! The evaluator accepts any strictly increasing axis; the helpers here only
//! produce the evenly spaced ranges a dashboard typically asks for.

use crate::error::{validation::*, BsError, BsResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default number of points per heatmap axis.
pub const DEFAULT_AXIS_POINTS: usize = 25;

/// `points` evenly spaced values from `start` to `end`, both inclusive.
///
/// A single point yields `[start]`.
pub fn linspace(start: f64, end: f64, points: usize) -> BsResult<Vec<f64>> {
    for (name, value) in [("start", start), ("end", end)] {
        if !value.is_finite() {
            return Err(BsError::InvalidGridSpec {
                field: name.to_string(),
                reason: format!("axis bound {} is not finite", value),
            });
        }
    }

    match points {
        0 => Err(BsError::InvalidGridSpec {
            field: "points".to_string(),
            reason: "axis must contain at least one value".to_string(),
        }),
        1 => Ok(vec![start]),
        n => {
            let step = (end - start) / (n - 1) as f64;
            let mut axis: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            // Pin the last point so rounding cannot overshoot the bound
            axis[n - 1] = end;
            Ok(axis)
        }
    }
}

/// Spot and volatility ranges of a heatmap request
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeatmapRange {
    pub spot_min: f64,
    pub spot_max: f64,
    pub vol_min: f64,
    pub vol_max: f64,
    pub points: usize,
}

impl Default for HeatmapRange {
    fn default() -> Self {
        HeatmapRange::around_spot(100.0)
    }
}

impl HeatmapRange {
    /// Dashboard defaults: spot ±30% around `spot`, volatility 10%..40%.
    pub fn around_spot(spot: f64) -> Self {
        HeatmapRange {
            spot_min: 0.7 * spot,
            spot_max: 1.3 * spot,
            vol_min: 0.10,
            vol_max: 0.40,
            points: DEFAULT_AXIS_POINTS,
        }
    }

    pub fn validate(&self) -> BsResult<()> {
        let checks = [
            validate_positive("spot_min", self.spot_min),
            validate_positive("spot_max", self.spot_max),
            validate_non_negative("vol_min", self.vol_min),
            validate_non_negative("vol_max", self.vol_max),
        ];
        for check in checks {
            check.map_err(|e| e.into_grid_spec("heatmap_range"))?;
        }

        if self.points == 0 {
            return Err(BsError::InvalidGridSpec {
                field: "points".to_string(),
                reason: "axis must contain at least one value".to_string(),
            });
        }

        // A multi-point axis needs room to increase
        if self.points > 1 {
            if self.spot_max <= self.spot_min {
                return Err(BsError::InvalidGridSpec {
                    field: "spot_axis".to_string(),
                    reason: format!(
                        "spot_max ({}) must exceed spot_min ({})",
                        self.spot_max, self.spot_min
                    ),
                });
            }
            if self.vol_max <= self.vol_min {
                return Err(BsError::InvalidGridSpec {
                    field: "vol_axis".to_string(),
                    reason: format!(
                        "vol_max ({}) must exceed vol_min ({})",
                        self.vol_max, self.vol_min
                    ),
                });
            }
        }

        Ok(())
    }

    /// Validated `(spot_axis, vol_axis)`.
    pub fn axes(&self) -> BsResult<(Vec<f64>, Vec<f64>)> {
        self.validate()?;
        let spot_axis = linspace(self.spot_min, self.spot_max, self.points)?;
        let vol_axis = linspace(self.vol_min, self.vol_max, self.points)?;
        Ok((spot_axis, vol_axis))
    }
}
