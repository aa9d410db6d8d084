//! Expiry payoffs and payoff-diagram P&L
//!
//! # Mathematical Definitions
//!
//! - **Call**: max(S_T - K, 0) - right to buy at strike K
//! - **Put**: max(K - S_T, 0) - right to sell at strike K
//!
//! A long position bought at the Black-Scholes premium V₀ ends with
//! ```text
//! P&L(S_T) = payoff(S_T) - V₀
//! ```
//! which is what a payoff diagram plots against the terminal spot.

use crate::analytics::bs_analytic::{price_and_greeks, OptionParameters, OptionType};
use crate::error::{validation::*, BsError, BsResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// European payoff at expiry
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Payoff {
    /// European call option: max(S_T - K, 0)
    EuropeanCall { k: f64 },

    /// European put option: max(K - S_T, 0)
    EuropeanPut { k: f64 },
}

impl Payoff {
    pub fn new(option_type: OptionType, k: f64) -> Self {
        match option_type {
            OptionType::Call => Payoff::EuropeanCall { k },
            OptionType::Put => Payoff::EuropeanPut { k },
        }
    }

    pub fn strike(&self) -> f64 {
        match self {
            Payoff::EuropeanCall { k } | Payoff::EuropeanPut { k } => *k,
        }
    }

    /// Payoff for a terminal spot `s_t`; never negative.
    pub fn calculate(&self, s_t: f64) -> f64 {
        match self {
            Payoff::EuropeanCall { k } => (s_t - k).max(0.0),
            Payoff::EuropeanPut { k } => (k - s_t).max(0.0),
        }
    }

    /// Terminal spot at which a position bought for `premium` breaks even.
    pub fn breakeven(&self, premium: f64) -> f64 {
        match self {
            Payoff::EuropeanCall { k } => k + premium,
            Payoff::EuropeanPut { k } => k - premium,
        }
    }
}

/// Profit/loss at expiry of a long option bought at its model price
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PayoffCurve {
    pub option_type: OptionType,
    pub strike: f64,
    /// Spot at valuation time (marker on the diagram)
    pub spot: f64,
    /// Black-Scholes price paid for the option
    pub premium: f64,
    /// Terminal spots, strictly increasing
    pub spots: Vec<f64>,
    /// `payoff(spots[i]) - premium`
    pub pnl: Vec<f64>,
}

impl PayoffCurve {
    pub fn breakeven(&self) -> f64 {
        Payoff::new(self.option_type, self.strike).breakeven(self.premium)
    }

    /// Worst outcome of the long position: the premium is lost.
    pub fn max_loss(&self) -> f64 {
        -self.premium
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.spots.iter().copied().zip(self.pnl.iter().copied())
    }
}

/// Build the expiry P&L curve for a long option priced at `params`.
///
/// # Errors
///
/// - `BsError::InvalidParameter` if `params` is outside the model domain
/// - `BsError::InvalidGridSpec` if `spots` is empty, not strictly
///   increasing, or contains a non-positive value
pub fn payoff_curve(
    params: OptionParameters,
    option_type: OptionType,
    spots: &[f64],
) -> BsResult<PayoffCurve> {
    let premium = price_and_greeks(params, option_type)?.price;

    validate_axis("spots", spots)?;
    if spots[0] <= 0.0 {
        return Err(BsError::InvalidGridSpec {
            field: "spots".to_string(),
            reason: format!("terminal spots must be positive, got {}", spots[0]),
        });
    }

    let payoff = Payoff::new(option_type, params.strike);
    let pnl = spots.iter().map(|&s_t| payoff.calculate(s_t) - premium).collect();

    Ok(PayoffCurve {
        option_type,
        strike: params.strike,
        spot: params.spot,
        premium,
        spots: spots.to_vec(),
        pnl,
    })
}
