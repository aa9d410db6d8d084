// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes formulas for European options and Greeks
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model, the underlying asset follows:
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//!
//! European calls and puts have closed-form prices in terms of
//! ```text
//! d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T)
//! d₂ = d₁ - σ√T
//! ```
//! and the standard normal CDF Φ(x) / PDF φ(x).
//!
//! # Reporting Conventions
//!
//! | Greek | unit |
//! |-------|------|
//! | Delta | per 1.0 move in spot |
//! | Gamma | per 1.0 move in spot |
//! | Vega  | per 1 volatility point (raw / [`VEGA_SCALE`]) |
//! | Theta | per calendar day (raw / [`THETA_DAYS_PER_YEAR`]) |
//! | Rho   | per 1 rate point (raw / [`RHO_SCALE`]) |
//!
//! The unscaled partial derivatives are available through the
//! `raw_*` accessors on [`PricingResult`].
//!
//! # Degenerate Inputs
//!
//! With `T = 0` or `σ = 0` the formula for d₁ divides by zero. Such options
//! are priced at intrinsic value, Delta becomes the in-the-money indicator
//! and Gamma, Vega, Theta and Rho are zero.

use crate::error::{validation::*, BsResult};
use crate::math_utils::{norm_cdf, norm_pdf};
use bitflags::bitflags;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Vega is reported per 1 volatility point.
pub const VEGA_SCALE: f64 = 100.0;
/// Theta is reported per calendar day.
pub const THETA_DAYS_PER_YEAR: f64 = 365.0;
/// Rho is reported per 1 rate point.
pub const RHO_SCALE: f64 = 100.0;

/// European option side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Both sides, in the order the grid evaluator reports them.
    pub const BOTH: [OptionType; 2] = [OptionType::Call, OptionType::Put];

    pub fn name(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inputs of a single Black-Scholes valuation.
///
/// Fields are public for struct-literal construction; every pricing entry
/// point calls [`OptionParameters::validate`] before evaluating a formula.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptionParameters {
    pub spot: f64,           // S, > 0
    pub strike: f64,         // K, > 0
    pub time_to_expiry: f64, // T in years, ≥ 0
    pub rate: f64,           // r, continuously compounded, may be negative
    pub volatility: f64,     // σ, annualized, ≥ 0
}

impl Default for OptionParameters {
    fn default() -> Self {
        OptionParameters {
            spot: 100.0,
            strike: 100.0,
            time_to_expiry: 1.0,
            rate: 0.05,
            volatility: 0.2,
        }
    }
}

impl OptionParameters {
    /// Build and validate a parameter set.
    pub fn new(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        rate: f64,
        volatility: f64,
    ) -> BsResult<Self> {
        let params = OptionParameters {
            spot,
            strike,
            time_to_expiry,
            rate,
            volatility,
        };
        params.validate()?;
        Ok(params)
    }

    /// Validate the model domain: S, K > 0; T, σ ≥ 0; r finite.
    pub fn validate(&self) -> BsResult<()> {
        validate_positive("spot", self.spot)?;
        validate_positive("strike", self.strike)?;
        validate_non_negative("time_to_expiry", self.time_to_expiry)?;
        validate_finite("rate", self.rate)?;
        validate_non_negative("volatility", self.volatility)?;
        Ok(())
    }

    /// Copy of `self` with the spot replaced.
    pub fn with_spot(self, spot: f64) -> Self {
        OptionParameters { spot, ..self }
    }

    /// Copy of `self` with the volatility replaced.
    pub fn with_volatility(self, volatility: f64) -> Self {
        OptionParameters { volatility, ..self }
    }

    /// True when d₁/d₂ are undefined (no time value left).
    ///
    /// Tests the product σ√T, which can underflow to zero even when both
    /// factors are positive.
    pub fn is_degenerate(&self) -> bool {
        self.volatility * self.time_to_expiry.sqrt() == 0.0
    }

    /// e^(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.time_to_expiry).exp()
    }
}

/// Price and Greeks of one option, in the units listed in the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PricingResult {
    pub price: f64,
    pub delta: f64,
    pub gamma: f64,
    pub vega: f64,
    pub theta: f64,
    pub rho: f64,
}

impl PricingResult {
    /// ∂V/∂σ per 1.0 of volatility
    pub fn raw_vega(&self) -> f64 {
        self.vega * VEGA_SCALE
    }

    /// ∂V/∂t per year
    pub fn raw_theta(&self) -> f64 {
        self.theta * THETA_DAYS_PER_YEAR
    }

    /// ∂V/∂r per 1.0 of rate
    pub fn raw_rho(&self) -> f64 {
        self.rho * RHO_SCALE
    }

    pub fn greek(&self, greek: Greek) -> f64 {
        match greek {
            Greek::Delta => self.delta,
            Greek::Gamma => self.gamma,
            Greek::Vega => self.vega,
            Greek::Theta => self.theta,
            Greek::Rho => self.rho,
        }
    }
}

/// Individual sensitivities, used to address Greek heatmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Greek {
    Delta,
    Gamma,
    Vega,
    Theta,
    Rho,
}

impl Greek {
    pub const ALL: [Greek; 5] = [
        Greek::Delta,
        Greek::Gamma,
        Greek::Vega,
        Greek::Theta,
        Greek::Rho,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Greek::Delta => "delta",
            Greek::Gamma => "gamma",
            Greek::Vega => "vega",
            Greek::Theta => "theta",
            Greek::Rho => "rho",
        }
    }

    pub fn flag(&self) -> GreekSet {
        match self {
            Greek::Delta => GreekSet::DELTA,
            Greek::Gamma => GreekSet::GAMMA,
            Greek::Vega => GreekSet::VEGA,
            Greek::Theta => GreekSet::THETA,
            Greek::Rho => GreekSet::RHO,
        }
    }
}

impl fmt::Display for Greek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct GreekSet: u32 {
        const NONE  = 0;
        const DELTA = 1 << 0;
        const GAMMA = 1 << 1;
        const VEGA  = 1 << 2;
        const THETA = 1 << 3;
        const RHO   = 1 << 4;
    }
}

impl GreekSet {
    /// Selected Greeks in [`Greek::ALL`] order.
    pub fn selected(self) -> impl Iterator<Item = Greek> {
        Greek::ALL
            .into_iter()
            .filter(move |greek| self.contains(greek.flag()))
    }
}

/// Compute (d₁, d₂) for non-degenerate parameters.
///
/// # Formula
/// ```text
/// d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T)
/// d₂ = d₁ - σ√T
/// ```
///
/// Callers must check [`OptionParameters::is_degenerate`] first; with
/// `σ√T = 0` the result is not finite.
pub fn d1_d2(params: &OptionParameters) -> (f64, f64) {
    let sigma_sqrt_t = params.volatility * params.time_to_expiry.sqrt();
    let d1 = ((params.spot / params.strike).ln()
        + (params.rate + 0.5 * params.volatility * params.volatility) * params.time_to_expiry)
        / sigma_sqrt_t;
    (d1, d1 - sigma_sqrt_t)
}

/// Immediate-exercise value: max(S−K, 0) for calls, max(K−S, 0) for puts.
pub fn intrinsic_value(spot: f64, strike: f64, option_type: OptionType) -> f64 {
    match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    }
}

/// Black-Scholes price and Greeks for one European option.
///
/// # Formulas
/// ```text
/// C = S*Φ(d₁) - K*e^(-rT)*Φ(d₂)
/// P = K*e^(-rT)*Φ(-d₂) - S*Φ(-d₁)
///
/// Δ_call = Φ(d₁)                    Δ_put = Φ(d₁) - 1
/// Γ      = φ(d₁) / (S*σ*√T)
/// ν      = S*φ(d₁)*√T
/// Θ_call = -S*φ(d₁)*σ/(2√T) - r*K*e^(-rT)*Φ(d₂)
/// Θ_put  = -S*φ(d₁)*σ/(2√T) + r*K*e^(-rT)*Φ(-d₂)
/// ρ_call = K*T*e^(-rT)*Φ(d₂)       ρ_put = -K*T*e^(-rT)*Φ(-d₂)
/// ```
/// ν, Θ and ρ are scaled to the reporting units before they are returned.
///
/// # Errors
///
/// `BsError::InvalidParameter` when `params` is outside the model domain.
pub fn price_and_greeks(
    params: OptionParameters,
    option_type: OptionType,
) -> BsResult<PricingResult> {
    params.validate()?;

    if params.is_degenerate() {
        return Ok(expiry_result(&params, option_type));
    }

    let OptionParameters {
        spot: s,
        strike: k,
        time_to_expiry: t,
        rate: r,
        volatility: sigma,
    } = params;

    let (d1, d2) = d1_d2(&params);
    let sqrt_t = t.sqrt();
    let sigma_sqrt_t = sigma * sqrt_t;
    let discounted_strike = k * params.discount_factor();
    let pdf_d1 = norm_pdf(d1);

    // Shared by both sides
    // S*σ√T can underflow to 0 once d₁ is infinite and φ(d₁) is 0
    let gamma = if pdf_d1 == 0.0 {
        0.0
    } else {
        pdf_d1 / (s * sigma_sqrt_t)
    };
    let vega = s * pdf_d1 * sqrt_t;
    let time_decay = -(s * pdf_d1 * sigma) / (2.0 * sqrt_t);

    let (price, delta, theta, rho) = match option_type {
        OptionType::Call => {
            let nd1 = norm_cdf(d1);
            let nd2 = norm_cdf(d2);
            (
                s * nd1 - discounted_strike * nd2,
                nd1,
                time_decay - r * discounted_strike * nd2,
                t * discounted_strike * nd2,
            )
        }
        OptionType::Put => {
            let n_minus_d1 = norm_cdf(-d1);
            let n_minus_d2 = norm_cdf(-d2);
            (
                discounted_strike * n_minus_d2 - s * n_minus_d1,
                norm_cdf(d1) - 1.0,
                time_decay + r * discounted_strike * n_minus_d2,
                -t * discounted_strike * n_minus_d2,
            )
        }
    };

    Ok(PricingResult {
        // Deep out-of-the-money prices can round to tiny negatives
        price: price.max(0.0),
        delta,
        gamma,
        vega: vega / VEGA_SCALE,
        theta: theta / THETA_DAYS_PER_YEAR,
        rho: rho / RHO_SCALE,
    })
}

/// Price only. Shorthand for `price_and_greeks(..)?.price`.
pub fn price(params: OptionParameters, option_type: OptionType) -> BsResult<f64> {
    price_and_greeks(params, option_type).map(|result| result.price)
}

/// Valuation when T = 0 or σ = 0 (or σ√T underflows).
///
/// With σ = 0 and T > 0 the price is the undiscounted intrinsic value, not
/// the forward limit max(S - K*e^(-rT), 0). Put-call parity does not hold on
/// that edge, and a σ = 0 heatmap row can jump against the σ > 0 row next to
/// it (e.g. put at S = 80, K = 100, r = 5%: 20.00 at σ = 0, 15.12 at σ = 0.1%).
fn expiry_result(params: &OptionParameters, option_type: OptionType) -> PricingResult {
    tracing::trace!(
        spot = params.spot,
        strike = params.strike,
        time_to_expiry = params.time_to_expiry,
        volatility = params.volatility,
        "degenerate parameters, pricing at intrinsic value"
    );

    // At-the-money counts as out of the money
    let delta = match option_type {
        OptionType::Call if params.spot > params.strike => 1.0,
        OptionType::Put if params.spot < params.strike => -1.0,
        _ => 0.0,
    };

    PricingResult {
        price: intrinsic_value(params.spot, params.strike, option_type),
        delta,
        ..PricingResult::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BsError;
    use approx::assert_abs_diff_eq;

    fn atm() -> OptionParameters {
        OptionParameters::default()
    }

    #[test]
    fn test_reference_prices() {
        let call = price_and_greeks(atm(), OptionType::Call).unwrap();
        let put = price_and_greeks(atm(), OptionType::Put).unwrap();

        assert_abs_diff_eq!(call.price, 10.450583572185565, epsilon = 1e-9);
        assert_abs_diff_eq!(put.price, 5.573526022256971, epsilon = 1e-9);
        assert_abs_diff_eq!(call.delta, 0.6368306511756191, epsilon = 1e-9);
        assert_abs_diff_eq!(put.delta, -0.3631693488243809, epsilon = 1e-9);
    }

    #[test]
    fn test_reporting_units() {
        let call = price_and_greeks(atm(), OptionType::Call).unwrap();

        // Vega per vol point, theta per day, rho per rate point
        assert_abs_diff_eq!(call.vega, 0.3752403469169379, epsilon = 1e-9);
        assert_abs_diff_eq!(call.raw_vega(), 37.52403469169379, epsilon = 1e-7);
        assert_abs_diff_eq!(call.theta, -0.01757267820941972, epsilon = 1e-9);
        assert_abs_diff_eq!(call.raw_theta(), -6.414027546438197, epsilon = 1e-7);
        assert_abs_diff_eq!(call.rho, 0.5323248154537634, epsilon = 1e-9);
        assert_abs_diff_eq!(call.raw_rho(), 53.232481545376345, epsilon = 1e-7);
    }

    #[test]
    fn test_gamma_and_vega_shared_between_sides() {
        let params = OptionParameters::new(110.0, 100.0, 0.5, 0.03, 0.25).unwrap();
        let call = price_and_greeks(params, OptionType::Call).unwrap();
        let put = price_and_greeks(params, OptionType::Put).unwrap();

        assert_eq!(call.gamma, put.gamma);
        assert_eq!(call.vega, put.vega);
        assert_abs_diff_eq!(call.delta - put.delta, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_time_prices_at_intrinsic() {
        let itm = OptionParameters::new(120.0, 100.0, 0.0, 0.05, 0.2).unwrap();

        let call = price_and_greeks(itm, OptionType::Call).unwrap();
        assert_eq!(call.price, 20.0);
        assert_eq!(call.delta, 1.0);
        assert_eq!(call.gamma, 0.0);
        assert_eq!(call.vega, 0.0);
        assert_eq!(call.theta, 0.0);
        assert_eq!(call.rho, 0.0);

        let put = price_and_greeks(itm, OptionType::Put).unwrap();
        assert_eq!(put.price, 0.0);
        assert_eq!(put.delta, 0.0);
    }

    #[test]
    fn test_zero_volatility_prices_at_intrinsic() {
        let otm_call = OptionParameters::new(80.0, 100.0, 1.0, 0.05, 0.0).unwrap();

        let call = price_and_greeks(otm_call, OptionType::Call).unwrap();
        assert_eq!(call.price, 0.0);
        assert_eq!(call.delta, 0.0);

        let put = price_and_greeks(otm_call, OptionType::Put).unwrap();
        assert_eq!(put.price, 20.0);
        assert_eq!(put.delta, -1.0);
        assert_eq!(put.gamma, 0.0);
        assert_eq!(put.vega, 0.0);
        assert_eq!(put.theta, 0.0);
        assert_eq!(put.rho, 0.0);
    }

    #[test]
    fn test_at_the_money_expiry_delta_is_zero() {
        let params = OptionParameters::new(100.0, 100.0, 0.0, 0.05, 0.2).unwrap();
        for option_type in OptionType::BOTH {
            let result = price_and_greeks(params, option_type).unwrap();
            assert_eq!(result.price, 0.0);
            assert_eq!(result.delta, 0.0);
        }
    }

    #[test]
    fn test_underflowing_sigma_sqrt_t_is_degenerate() {
        // σ√T ≈ 1e-325 rounds to zero although σ and T are both positive
        let atm_tiny = OptionParameters::new(100.0, 100.0, 1e-250, 0.0, 1e-200).unwrap();
        assert!(atm_tiny.is_degenerate());

        for option_type in OptionType::BOTH {
            let result = price_and_greeks(atm_tiny, option_type).unwrap();
            assert_eq!(result, PricingResult::default());
        }

        let itm_call = price_and_greeks(atm_tiny.with_spot(101.0), OptionType::Call).unwrap();
        assert_eq!(itm_call.price, 1.0);
        assert_eq!(itm_call.delta, 1.0);
        assert_eq!(itm_call.gamma, 0.0);
    }

    #[test]
    fn test_subnormal_sigma_sqrt_t_greeks_are_finite() {
        // σ√T = 1e-310 stays non-zero, but S*σ√T underflows
        let params = OptionParameters::new(1e-20, 1.0, 1e-300, 0.05, 1e-160).unwrap();
        assert!(!params.is_degenerate());

        for option_type in OptionType::BOTH {
            let result = price_and_greeks(params, option_type).unwrap();
            for value in [
                result.price,
                result.delta,
                result.gamma,
                result.vega,
                result.theta,
                result.rho,
            ] {
                assert!(value.is_finite(), "{}: {:?}", option_type, result);
            }
            assert_eq!(result.gamma, 0.0);
        }
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let cases = [
            ("spot", atm().with_spot(0.0)),
            ("strike", OptionParameters { strike: -5.0, ..atm() }),
            ("volatility", atm().with_volatility(-0.1)),
            ("time_to_expiry", OptionParameters { time_to_expiry: -1.0, ..atm() }),
            ("rate", OptionParameters { rate: f64::NAN, ..atm() }),
        ];

        for (name, params) in cases {
            match price_and_greeks(params, OptionType::Call) {
                Err(BsError::InvalidParameter { parameter, .. }) => assert_eq!(parameter, name),
                other => panic!("expected InvalidParameter for {}, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_negative_rate_is_valid() {
        let params = OptionParameters::new(100.0, 100.0, 1.0, -0.01, 0.2).unwrap();
        let call = price_and_greeks(params, OptionType::Call).unwrap();
        let put = price_and_greeks(params, OptionType::Put).unwrap();
        let parity = params.spot - params.strike * params.discount_factor();
        assert_abs_diff_eq!(call.price - put.price, parity, epsilon = 1e-9);
    }

    #[test]
    fn test_deep_out_of_the_money_is_finite_and_non_negative() {
        let params = OptionParameters::new(0.01, 1e6, 1.0 / 365.0, 0.05, 0.001).unwrap();
        let call = price_and_greeks(params, OptionType::Call).unwrap();
        assert!(call.price >= 0.0);
        assert!(call.price.is_finite());
        assert!(call.gamma.is_finite());
        assert_abs_diff_eq!(call.delta, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_greek_set_selection_order() {
        let set = GreekSet::THETA | GreekSet::DELTA;
        let selected: Vec<Greek> = set.selected().collect();
        assert_eq!(selected, vec![Greek::Delta, Greek::Theta]);
        assert_eq!(GreekSet::NONE.selected().count(), 0);
        assert_eq!(GreekSet::all().selected().count(), 5);
    }

    #[test]
    fn test_greek_lookup() {
        let result = price_and_greeks(atm(), OptionType::Put).unwrap();
        assert_eq!(result.greek(Greek::Delta), result.delta);
        assert_eq!(result.greek(Greek::Rho), result.rho);
    }
}
