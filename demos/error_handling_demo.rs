// demos/error_handling_demo.rs
use bs_heatmap::analytics::bs_analytic::{price_and_greeks, OptionParameters, OptionType};
use bs_heatmap::error::BsError;
use bs_heatmap::grid::axis::HeatmapRange;
use bs_heatmap::grid::evaluator::{evaluate_grid, PurchasePrices};

fn main() {
    println!("Error Handling Demo for bs-heatmap");
    println!("==================================\n");

    let base = OptionParameters::default();

    // Test 1: Zero spot
    println!("1. Testing zero spot price...");
    report(price_and_greeks(base.with_spot(0.0), OptionType::Call).map(|r| r.price));

    // Test 2: Negative strike
    println!("\n2. Testing negative strike...");
    report(OptionParameters::new(100.0, -5.0, 1.0, 0.05, 0.2).map(|p| p.strike));

    // Test 3: Negative volatility
    println!("\n3. Testing negative volatility...");
    report(price_and_greeks(base.with_volatility(-0.1), OptionType::Put).map(|r| r.price));

    // Test 4: Degenerate but valid parameters
    println!("\n4. Testing expired option (T = 0)...");
    let expired = OptionParameters {
        spot: 120.0,
        time_to_expiry: 0.0,
        ..base
    };
    match price_and_greeks(expired, OptionType::Call) {
        Ok(result) => println!(
            "   ✓ Priced at intrinsic value {:.2} (delta {}, gamma {})",
            result.price, result.delta, result.gamma
        ),
        Err(e) => println!("   Unexpected error: {}", e),
    }

    // Test 5: Non-monotonic axis
    println!("\n5. Testing non-monotonic spot axis...");
    let unordered = [90.0, 110.0, 100.0];
    report(evaluate_grid(base, &unordered, &[0.2], PurchasePrices::none()).map(|g| g.shape()));

    // Test 6: Empty volatility axis
    println!("\n6. Testing empty volatility axis...");
    report(evaluate_grid(base, &[100.0], &[], PurchasePrices::none()).map(|g| g.shape()));

    // Test 7: Invalid base parameters in a grid request
    println!("\n7. Testing grid with invalid base parameters...");
    let bad_base = OptionParameters {
        time_to_expiry: -0.5,
        ..base
    };
    report(evaluate_grid(bad_base, &[100.0], &[0.2], PurchasePrices::none()).map(|g| g.shape()));

    // Test 8: Inverted heatmap range
    println!("\n8. Testing inverted heatmap range...");
    let inverted = HeatmapRange {
        vol_min: 0.5,
        vol_max: 0.1,
        ..HeatmapRange::default()
    };
    report(inverted.axes().map(|(spots, vols)| (spots.len(), vols.len())));

    println!("\nError handling demo complete!");
}

fn report<T: std::fmt::Debug>(result: Result<T, BsError>) {
    match result {
        Ok(value) => println!("   Unexpected: Should have failed! Got {:?}", value),
        Err(e @ BsError::InvalidParameter { .. }) => println!("   ✓ InvalidParameter: {}", e),
        Err(e @ BsError::InvalidGridSpec { .. }) => println!("   ✓ InvalidGridSpec: {}", e),
    }
}
