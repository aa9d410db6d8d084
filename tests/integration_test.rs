// tests/integration_test.rs
use bs_heatmap::analytics::bs_analytic::{
    price_and_greeks, Greek, GreekSet, OptionParameters, OptionType,
};
use bs_heatmap::analytics::payoff::payoff_curve;
use bs_heatmap::error::BsError;
use bs_heatmap::grid::axis::{linspace, HeatmapRange};
use bs_heatmap::grid::evaluator::{evaluate_grid, evaluate_grid_with, GridConfig, PurchasePrices};

#[test]
fn test_grid_cells_match_engine() {
    let base = OptionParameters::new(100.0, 105.0, 0.75, 0.02, 0.3).expect("Valid parameters");
    // Uneven spacing on purpose
    let spot_axis = [60.0, 85.0, 99.5, 100.0, 140.0];
    let vol_axis = [0.0, 0.05, 0.2, 0.9];

    let grid =
        evaluate_grid(base, &spot_axis, &vol_axis, PurchasePrices::none()).expect("Valid grid");
    assert_eq!(grid.shape(), (vol_axis.len(), spot_axis.len()));
    assert_eq!(grid.call.price.dim(), (4, 5));
    assert_eq!(grid.put.price.dim(), (4, 5));

    for (i, &vol) in vol_axis.iter().enumerate() {
        for (j, &spot) in spot_axis.iter().enumerate() {
            let params = base.with_spot(spot).with_volatility(vol);
            let call = price_and_greeks(params, OptionType::Call).expect("Valid parameters");
            let put = price_and_greeks(params, OptionType::Put).expect("Valid parameters");
            assert_eq!(grid.call.price[[i, j]], call.price, "call cell ({}, {})", i, j);
            assert_eq!(grid.put.price[[i, j]], put.price, "put cell ({}, {})", i, j);
        }
    }
}

#[test]
fn test_parallel_and_sequential_agree() {
    let base = OptionParameters::default();
    let (spot_axis, vol_axis) = HeatmapRange::around_spot(base.spot).axes().expect("Valid range");
    let purchase = PurchasePrices::new(10.0, 5.0);

    let parallel = GridConfig {
        greeks: GreekSet::all(),
        parallel: true,
    };
    let sequential = GridConfig {
        parallel: false,
        ..parallel
    };

    let a =
        evaluate_grid_with(base, &spot_axis, &vol_axis, purchase, &parallel).expect("Valid grid");
    let b =
        evaluate_grid_with(base, &spot_axis, &vol_axis, purchase, &sequential).expect("Valid grid");

    assert_eq!(a, b);
    assert_eq!(a.call.price.dim(), (25, 25));
    assert_eq!(a.call.greeks.len(), Greek::ALL.len());
}

#[test]
fn test_pnl_scenario() {
    let base = OptionParameters::new(100.0, 100.0, 1.0, 0.05, 0.2).expect("Valid parameters");
    let grid = evaluate_grid(base, &[100.0], &[0.2], PurchasePrices { call: Some(8.0), put: None })
        .expect("Valid grid");

    let pnl = grid.call.pnl.as_ref().expect("Call P&L requested");
    println!("\nCall P&L at purchase price 8.00: {:.6}", pnl[[0, 0]]);
    assert!((pnl[[0, 0]] - 2.4506).abs() < 1e-3);
}

#[test]
fn test_pnl_is_price_minus_purchase_everywhere() {
    let base = OptionParameters::default();
    let spot_axis = linspace(70.0, 130.0, 7).expect("Valid axis");
    let vol_axis = linspace(0.1, 0.4, 4).expect("Valid axis");
    let purchase = PurchasePrices::new(9.5, 4.25);

    let grid = evaluate_grid(base, &spot_axis, &vol_axis, purchase).expect("Valid grid");

    for option_type in OptionType::BOTH {
        let surface = grid.surface(option_type);
        let paid = purchase.get(option_type).expect("Purchase price supplied");
        let pnl = surface.pnl.as_ref().expect("P&L requested");
        for (value, price) in pnl.iter().zip(surface.price.iter()) {
            assert_eq!(*value, price - paid);
        }
    }
}

#[test]
fn test_heatmap_monotonic_along_axes() {
    let base = OptionParameters::default();
    let (spot_axis, vol_axis) = HeatmapRange::default().axes().expect("Valid range");
    let grid =
        evaluate_grid(base, &spot_axis, &vol_axis, PurchasePrices::none()).expect("Valid grid");

    for row in grid.call.price.rows() {
        assert!(row.iter().zip(row.iter().skip(1)).all(|(a, b)| b >= a));
    }
    for row in grid.put.price.rows() {
        assert!(row.iter().zip(row.iter().skip(1)).all(|(a, b)| b <= a));
    }
    for column in grid.call.price.columns() {
        assert!(column.iter().zip(column.iter().skip(1)).all(|(a, b)| b >= a));
    }
}

#[test]
fn test_no_partial_results_on_failure() {
    let base = OptionParameters::default();
    let result = evaluate_grid(base, &[50.0, 100.0, 100.0], &[0.2], PurchasePrices::none());
    assert!(matches!(result, Err(BsError::InvalidGridSpec { .. })));

    let bad_base = OptionParameters {
        strike: 0.0,
        ..base
    };
    match evaluate_grid(bad_base, &[100.0], &[0.2], PurchasePrices::none()) {
        Err(BsError::InvalidGridSpec { field, reason }) => {
            assert_eq!(field, "base");
            assert!(reason.contains("strike"));
        }
        other => panic!("expected InvalidGridSpec, got {:?}", other),
    }
}

#[test]
fn test_payoff_curve_brackets_breakeven() {
    let params = OptionParameters::default();
    let spots = linspace(0.5 * params.spot, 1.5 * params.spot, 300).expect("Valid axis");
    let curve = payoff_curve(params, OptionType::Call, &spots).expect("Valid curve");

    assert_eq!(curve.pnl.len(), 300);
    let below = curve.points().filter(|(s, _)| *s < curve.breakeven()).all(|(_, pnl)| pnl < 0.0);
    let above = curve.points().filter(|(s, _)| *s > curve.breakeven()).all(|(_, pnl)| pnl > 0.0);
    assert!(below && above);
}
