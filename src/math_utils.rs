// src/math_utils.rs
use statrs::function::erf;
use std::f64::consts::{PI, SQRT_2};

/// Standard normal cumulative distribution function Φ(x).
///
/// Evaluated through `erfc` so that the lower tail keeps full relative
/// precision instead of cancelling in `1 + erf(x)`.
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erf::erfc(-x / SQRT_2)
}

/// Standard normal probability density function φ(x) = e^(-x²/2) / √(2π)
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

pub struct Timer {
    start_time: std::time::Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            start_time: std::time::Instant::now(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = std::time::Instant::now();
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}
