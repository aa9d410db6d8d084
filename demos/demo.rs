// demos/demo.rs
use bs_heatmap::analytics::bs_analytic::{
    price_and_greeks, Greek, GreekSet, OptionParameters, OptionType,
};
use bs_heatmap::analytics::payoff::payoff_curve;
use bs_heatmap::grid::axis::{linspace, HeatmapRange};
use bs_heatmap::grid::evaluator::{evaluate_grid_with, GridConfig, GridResult, PurchasePrices};
use bs_heatmap::math_utils::Timer;
use bs_heatmap::output;
use ndarray::Array2;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let csv_dir = if args.len() > 2 && args[1] == "--csv" {
        Some(PathBuf::from(&args[2]))
    } else {
        None
    };

    let params = OptionParameters::default();
    println!("Running bs-heatmap Demo\n");
    println!(
        "S = {:.2}, K = {:.2}, T = {:.2}y, r = {:.2}%, σ = {:.2}%\n",
        params.spot,
        params.strike,
        params.time_to_expiry,
        params.rate * 100.0,
        params.volatility * 100.0
    );

    run_option_pricer(params);
    run_payoff_diagram(params, csv_dir.as_ref());
    run_heatmaps(params, csv_dir.as_ref());
}

fn run_option_pricer(params: OptionParameters) {
    println!("--- Option Pricer ---");
    println!(
        "{:<6} {:>10} {:>10} {:>10} {:>14} {:>15} {:>13}",
        "Type", "Price", "Delta", "Gamma", "Vega (per 1%)", "Theta (per day)", "Rho (per 1%)"
    );

    for option_type in OptionType::BOTH {
        match price_and_greeks(params, option_type) {
            Ok(result) => println!(
                "{:<6} {:>10.4} {:>10.4} {:>10.4} {:>14.4} {:>15.4} {:>13.4}",
                option_type.name(),
                result.price,
                result.delta,
                result.gamma,
                result.vega,
                result.theta,
                result.rho
            ),
            Err(e) => println!("{:<6} error: {}", option_type.name(), e),
        }
    }
    println!();
}

fn run_payoff_diagram(params: OptionParameters, csv_dir: Option<&PathBuf>) {
    println!("--- Payoff Diagram ---");

    let spots = match linspace(0.5 * params.spot, 1.5 * params.spot, 300) {
        Ok(spots) => spots,
        Err(e) => {
            println!("error: {}", e);
            return;
        }
    };

    for option_type in OptionType::BOTH {
        let curve = match payoff_curve(params, option_type, &spots) {
            Ok(curve) => curve,
            Err(e) => {
                println!("{}: error: {}", option_type, e);
                continue;
            }
        };

        println!(
            "{:<4}: premium {:.4}, breakeven {:.4}, max loss {:.4}, P&L at {:.0} = {:.4}",
            option_type.name(),
            curve.premium,
            curve.breakeven(),
            curve.max_loss(),
            spots[spots.len() - 1],
            curve.pnl[curve.pnl.len() - 1]
        );

        if let Some(dir) = csv_dir {
            let path = dir.join(format!("payoff_{}.csv", option_type.name()));
            match output::write_payoff_curve_to_csv(&path, &curve) {
                Ok(()) => println!("      written to {}", path.display()),
                Err(e) => println!("      could not write {}: {}", path.display(), e),
            }
        }
    }
    println!();
}

fn run_heatmaps(params: OptionParameters, csv_dir: Option<&PathBuf>) {
    println!("--- Sensitivity and P&L Heatmaps ---");

    let (spot_axis, vol_axis) = match HeatmapRange::around_spot(params.spot).axes() {
        Ok(axes) => axes,
        Err(e) => {
            println!("error: {}", e);
            return;
        }
    };

    // Bought at today's model value, as a dashboard pre-fills it
    let purchase = PurchasePrices {
        call: price_and_greeks(params, OptionType::Call).ok().map(|r| r.price),
        put: price_and_greeks(params, OptionType::Put).ok().map(|r| r.price),
    };
    let config = GridConfig {
        greeks: GreekSet::DELTA | GreekSet::VEGA,
        ..GridConfig::default()
    };

    let mut timer = Timer::new();
    timer.start();
    let grid = match evaluate_grid_with(params, &spot_axis, &vol_axis, purchase, &config) {
        Ok(grid) => grid,
        Err(e) => {
            println!("error: {}", e);
            return;
        }
    };
    let elapsed = timer.elapsed_ms();
    let (rows, cols) = grid.shape();
    println!("Evaluated {}x{} grid in {:.3} ms\n", rows, cols, elapsed);

    for option_type in OptionType::BOTH {
        let surface = grid.surface(option_type);
        print_matrix(&format!("{} value", option_type), &grid, &surface.price);
        if let Some(pnl) = &surface.pnl {
            print_matrix(&format!("{} P&L", option_type), &grid, pnl);
        }
        if let Some(delta) = surface.greek(Greek::Delta) {
            print_matrix(&format!("{} delta", option_type), &grid, delta);
        }

        if let Some(dir) = csv_dir {
            write_csv(dir, &format!("{}_value.csv", option_type.name()), &grid, &surface.price);
            if let Some(pnl) = &surface.pnl {
                write_csv(dir, &format!("{}_pnl.csv", option_type.name()), &grid, pnl);
            }
            for (greek, matrix) in &surface.greeks {
                let name = format!("{}_{}.csv", option_type.name(), greek.name());
                write_csv(dir, &name, &grid, matrix);
            }
        }
    }
}

/// Print every sixth row/column so the table fits a terminal.
fn print_matrix(title: &str, grid: &GridResult, matrix: &Array2<f64>) {
    const STRIDE: usize = 6;

    println!("{}", title);
    print!("{:>8}", "σ \\ S");
    for spot in grid.spot_axis.iter().step_by(STRIDE) {
        print!("{:>10.2}", spot);
    }
    println!();

    for (vol, row) in grid.vol_axis.iter().zip(matrix.rows()).step_by(STRIDE) {
        print!("{:>7.1}%", vol * 100.0);
        for value in row.iter().step_by(STRIDE) {
            print!("{:>10.4}", value);
        }
        println!();
    }
    println!();
}

fn write_csv(dir: &Path, name: &str, grid: &GridResult, matrix: &Array2<f64>) {
    let path = dir.join(name);
    match output::write_matrix_to_csv(&path, &grid.spot_axis, &grid.vol_axis, matrix) {
        Ok(()) => println!("written {}", path.display()),
        Err(e) => println!("could not write {}: {}", path.display(), e),
    }
}
