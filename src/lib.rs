//! # bs-heatmap: Black-Scholes Prices, Greeks and Heatmap Grids
//!
//! Closed-form valuation of European calls and puts under the Black-Scholes
//! model, plus the batched evaluation behind price and P&L heatmaps.
//!
//! ## Key Features
//!
//! - **Pricing Engine**: price, Delta, Gamma, Vega, Theta and Rho for one option
//! - **Explicit Edge Cases**: `T = 0` or `σ = 0` price at intrinsic value, invalid
//!   inputs are rejected
//! - **Grid Evaluator**: spot × volatility matrices of price, P&L and selected Greeks
//! - **Parallel**: grid cells are independent and evaluated with Rayon
//! - **Payoff Diagrams**: expiry P&L of a long option bought at its model price
//!
//! ## Quick Start
//!
//! ```rust
//! use bs_heatmap::analytics::bs_analytic::{price_and_greeks, OptionParameters, OptionType};
//! use bs_heatmap::grid::evaluator::{evaluate_grid, PurchasePrices};
//!
//! let params = OptionParameters::new(100.0, 100.0, 1.0, 0.05, 0.2).expect("Valid parameters");
//! let call = price_and_greeks(params, OptionType::Call).expect("Valid parameters");
//! assert!((call.price - 10.4506).abs() < 1e-3);
//!
//! // Rows follow volatility, columns follow spot
//! let grid = evaluate_grid(
//!     params,
//!     &[90.0, 100.0, 110.0],
//!     &[0.1, 0.2],
//!     PurchasePrices::new(8.0, 5.0),
//! )
//! .expect("Valid grid");
//! assert_eq!(grid.call.price.dim(), (2, 3));
//! ```
//!
//! ## Units
//!
//! Vega is reported per volatility point, Theta per calendar day and Rho per
//! rate point. See [`analytics::bs_analytic`] for the raw accessors.

pub mod error;
pub mod math_utils;
pub mod analytics;
pub mod grid;
pub mod output;

pub use analytics::bs_analytic::{
    price_and_greeks, Greek, GreekSet, OptionParameters, OptionType, PricingResult,
};
pub use error::{BsError, BsResult};
pub use grid::evaluator::{
    evaluate_grid, evaluate_grid_with, GridConfig, GridResult, PurchasePrices,
};
