// src/grid/evaluator.rs
//! Spot × volatility grid evaluation
//!
//! # Layout
//!
//! Every matrix has shape `(vol_axis.len(), spot_axis.len())`:
//! ```text
//! cell (i, j) = price_and_greeks(base with σ = vol_axis[i], S = spot_axis[j])
//! ```
//! Rows follow volatility, columns follow spot, for both calls and puts.
//!
//! # P&L
//!
//! With a purchase price `P` supplied for a side, its P&L matrix is
//! ```text
//! pnl(i, j) = price(i, j) - P
//! ```
//!
//! Cells are independent, so evaluation is spread over the rayon pool when
//! [`GridConfig::parallel`] is set. The numbers do not depend on the mode.

use crate::analytics::bs_analytic::{
    price_and_greeks, Greek, GreekSet, OptionParameters, OptionType, PricingResult,
};
use crate::error::{validation::*, BsError, BsResult};
use ndarray::Array2;
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Price each side was bought at; `None` skips that side's P&L matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PurchasePrices {
    pub call: Option<f64>,
    pub put: Option<f64>,
}

impl PurchasePrices {
    pub fn none() -> Self {
        PurchasePrices::default()
    }

    pub fn new(call: f64, put: f64) -> Self {
        PurchasePrices {
            call: Some(call),
            put: Some(put),
        }
    }

    pub fn get(&self, option_type: OptionType) -> Option<f64> {
        match option_type {
            OptionType::Call => self.call,
            OptionType::Put => self.put,
        }
    }

    /// Purchase prices must be finite and non-negative.
    ///
    /// Failures are grid errors, keyed by `call_purchase_price` or
    /// `put_purchase_price`.
    pub fn validate(&self) -> BsResult<()> {
        let sides = [
            ("call_purchase_price", self.call),
            ("put_purchase_price", self.put),
        ];
        for (field, paid) in sides {
            if let Some(paid) = paid {
                validate_non_negative(field, paid).map_err(|e| e.into_grid_spec(field))?;
            }
        }
        Ok(())
    }
}

/// Optional outputs and execution mode of a grid request
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridConfig {
    /// Greek matrices produced next to the price matrix
    pub greeks: GreekSet,
    /// Evaluate cells on the rayon thread pool
    pub parallel: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            greeks: GreekSet::NONE,
            parallel: true,
        }
    }
}

/// Matrices for one option side
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptionSurface {
    pub option_type: OptionType,
    pub price: Array2<f64>,
    pub purchase_price: Option<f64>,
    pub pnl: Option<Array2<f64>>,
    /// Requested Greek matrices in [`Greek::ALL`] order
    pub greeks: Vec<(Greek, Array2<f64>)>,
}

impl OptionSurface {
    pub fn greek(&self, greek: Greek) -> Option<&Array2<f64>> {
        self.greeks
            .iter()
            .find(|(g, _)| *g == greek)
            .map(|(_, matrix)| matrix)
    }
}

/// Output of [`evaluate_grid`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridResult {
    pub spot_axis: Vec<f64>,
    pub vol_axis: Vec<f64>,
    pub call: OptionSurface,
    pub put: OptionSurface,
}

impl GridResult {
    /// `(rows, cols)` = `(vol_axis.len(), spot_axis.len())`
    pub fn shape(&self) -> (usize, usize) {
        (self.vol_axis.len(), self.spot_axis.len())
    }

    pub fn surface(&self, option_type: OptionType) -> &OptionSurface {
        match option_type {
            OptionType::Call => &self.call,
            OptionType::Put => &self.put,
        }
    }
}

/// Evaluate call and put prices (and P&L) over a spot × volatility grid.
///
/// Equivalent to [`evaluate_grid_with`] using [`GridConfig::default`].
pub fn evaluate_grid(
    base: OptionParameters,
    spot_axis: &[f64],
    vol_axis: &[f64],
    purchase: PurchasePrices,
) -> BsResult<GridResult> {
    evaluate_grid_with(base, spot_axis, vol_axis, purchase, &GridConfig::default())
}

/// Evaluate a spot × volatility grid with explicit options.
///
/// Strike, expiry and rate come from `base`; its spot and volatility are
/// replaced cell by cell.
///
/// # Errors
///
/// `BsError::InvalidGridSpec` if `base` is invalid, if an axis is empty,
/// not strictly increasing, or leaves the model domain (spot ≤ 0, σ < 0), or
/// if a purchase price is negative or not finite.
///
/// Nothing is returned unless every cell evaluates.
pub fn evaluate_grid_with(
    base: OptionParameters,
    spot_axis: &[f64],
    vol_axis: &[f64],
    purchase: PurchasePrices,
    config: &GridConfig,
) -> BsResult<GridResult> {
    validate_request(&base, spot_axis, vol_axis)?;
    purchase.validate()?;

    let shape = (vol_axis.len(), spot_axis.len());
    let n_cells = shape.0 * shape.1;

    tracing::debug!(
        rows = shape.0,
        cols = shape.1,
        parallel = config.parallel,
        greeks = ?config.greeks,
        "evaluating option grid"
    );

    let price_cell = |idx: usize| -> BsResult<(PricingResult, PricingResult)> {
        let (i, j) = (idx / shape.1, idx % shape.1);
        let params = base.with_volatility(vol_axis[i]).with_spot(spot_axis[j]);
        Ok((
            price_and_greeks(params, OptionType::Call)?,
            price_and_greeks(params, OptionType::Put)?,
        ))
    };

    // Row-major: idx = i * cols + j
    let cells: Vec<(PricingResult, PricingResult)> = if config.parallel {
        (0..n_cells)
            .into_par_iter()
            .map(price_cell)
            .collect::<BsResult<_>>()?
    } else {
        (0..n_cells).map(price_cell).collect::<BsResult<_>>()?
    };

    let cells = Array2::from_shape_vec(shape, cells).map_err(|e| BsError::InvalidGridSpec {
        field: "shape".to_string(),
        reason: e.to_string(),
    })?;

    let call = build_surface(&cells, OptionType::Call, purchase.call, config.greeks);
    let put = build_surface(&cells, OptionType::Put, purchase.put, config.greeks);

    Ok(GridResult {
        spot_axis: spot_axis.to_vec(),
        vol_axis: vol_axis.to_vec(),
        call,
        put,
    })
}

fn validate_request(base: &OptionParameters, spot_axis: &[f64], vol_axis: &[f64]) -> BsResult<()> {
    base.validate().map_err(|e| e.into_grid_spec("base"))?;

    validate_axis("spot_axis", spot_axis)?;
    validate_axis("vol_axis", vol_axis)?;

    // Axes are strictly increasing, so the first entry bounds the rest
    if spot_axis[0] <= 0.0 {
        return Err(BsError::InvalidGridSpec {
            field: "spot_axis".to_string(),
            reason: format!("spot levels must be positive, got {}", spot_axis[0]),
        });
    }
    if vol_axis[0] < 0.0 {
        return Err(BsError::InvalidGridSpec {
            field: "vol_axis".to_string(),
            reason: format!("volatility levels must be non-negative, got {}", vol_axis[0]),
        });
    }

    Ok(())
}

fn build_surface(
    cells: &Array2<(PricingResult, PricingResult)>,
    option_type: OptionType,
    purchase_price: Option<f64>,
    greeks: GreekSet,
) -> OptionSurface {
    let side = |pair: &(PricingResult, PricingResult)| -> PricingResult {
        match option_type {
            OptionType::Call => pair.0,
            OptionType::Put => pair.1,
        }
    };

    let price = cells.map(|pair| side(pair).price);
    let pnl = purchase_price.map(|paid| price.mapv(|value| value - paid));
    let greeks = greeks
        .selected()
        .map(|greek| (greek, cells.map(|pair| side(pair).greek(greek))))
        .collect();

    OptionSurface {
        option_type,
        price,
        purchase_price,
        pnl,
        greeks,
    }
}
