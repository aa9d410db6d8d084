// scripts/benchmark.rs
use bs_heatmap::analytics::bs_analytic::{price_and_greeks, GreekSet, OptionParameters, OptionType};
use bs_heatmap::grid::axis::linspace;
use bs_heatmap::grid::evaluator::{evaluate_grid_with, GridConfig, PurchasePrices};
use bs_heatmap::math_utils::Timer;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, LogNormal, Uniform};
use std::env;
use std::fs::File;
use std::io::Write;
use std::process::Command;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_model: String,
    cpu_cores: usize,
    rust_version: String,
    rustc_flags: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_model: Self::get_cpu_model(),
            cpu_cores: num_cpus::get(),
            rust_version: Self::get_rust_version(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }

    fn get_cpu_model() -> String {
        #[cfg(target_os = "linux")]
        {
            std::fs::read_to_string("/proc/cpuinfo")
                .ok()
                .and_then(|content| {
                    content
                        .lines()
                        .find(|line| line.starts_with("model name"))
                        .and_then(|line| line.split(':').nth(1))
                        .map(|s| s.trim().to_string())
                })
                .unwrap_or_else(|| "Unknown CPU".to_string())
        }

        #[cfg(target_os = "macos")]
        {
            Command::new("sysctl")
                .args(["-n", "machdep.cpu.brand_string"])
                .output()
                .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
                .unwrap_or_else(|_| "Unknown CPU".to_string())
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            "Unknown CPU".to_string()
        }
    }

    fn get_rust_version() -> String {
        Command::new("rustc")
            .arg("--version")
            .output()
            .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
            .unwrap_or_else(|_| "Unknown Rust version".to_string())
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    evaluations: usize,
    time_ms: f64,
    throughput_per_sec: f64,
    value: f64,
    reference_value: Option<f64>,
    abs_error: Option<f64>,
}

/// Random but reproducible parameter sets across the practical range.
fn random_parameters(n: usize, seed: u64) -> Vec<OptionParameters> {
    let mut rng = StdRng::seed_from_u64(seed);
    let spot = LogNormal::new(100f64.ln(), 0.5).expect("Valid lognormal");
    let moneyness = Uniform::new(0.5, 1.5);
    let expiry = Uniform::new(1.0 / 365.0, 5.0);
    let rate = Uniform::new(-0.01, 0.10);
    let vol = Uniform::new(0.05, 1.0);

    (0..n)
        .map(|_| {
            let s = spot.sample(&mut rng);
            OptionParameters {
                spot: s,
                strike: s * moneyness.sample(&mut rng),
                time_to_expiry: expiry.sample(&mut rng),
                rate: rate.sample(&mut rng),
                volatility: vol.sample(&mut rng),
            }
        })
        .collect()
}

fn run_single_point_benchmarks() -> Vec<BenchmarkResult> {
    let mut results = Vec::new();

    for &n in &[10_000, 100_000, 1_000_000] {
        info!(options = n, "pricing random parameter sets");
        let params = random_parameters(n, 42);

        let mut timer = Timer::new();
        timer.start();
        let mut worst_parity = 0.0f64;
        for p in &params {
            let call = price_and_greeks(*p, OptionType::Call).expect("Valid parameters");
            let put = price_and_greeks(*p, OptionType::Put).expect("Valid parameters");
            let parity = p.spot - p.strike * p.discount_factor();
            worst_parity = worst_parity.max((call.price - put.price - parity).abs());
        }
        let time_ms = timer.elapsed_ms();

        results.push(BenchmarkResult {
            name: format!("Call+Put with Greeks ({}k)", n / 1000),
            evaluations: 2 * n,
            time_ms,
            throughput_per_sec: 2.0 * n as f64 / (time_ms / 1000.0),
            value: worst_parity,
            reference_value: Some(0.0),
            abs_error: Some(worst_parity),
        });
    }

    // Textbook reference point
    let atm = OptionParameters::default();
    let call = price_and_greeks(atm, OptionType::Call).expect("Valid parameters");
    results.push(BenchmarkResult {
        name: "ATM Call Reference".to_string(),
        evaluations: 1,
        time_ms: 0.0,
        throughput_per_sec: 0.0,
        value: call.price,
        reference_value: Some(10.450583572185565),
        abs_error: Some((call.price - 10.450583572185565).abs()),
    });

    results
}

fn run_grid_benchmarks() -> Vec<BenchmarkResult> {
    let mut results = Vec::new();
    let base = OptionParameters::default();
    let purchase = PurchasePrices::new(10.0, 5.0);

    for &points in &[10, 25, 100, 500] {
        let spot_axis = linspace(0.7 * base.spot, 1.3 * base.spot, points).expect("Valid axis");
        let vol_axis = linspace(0.10, 0.40, points).expect("Valid axis");
        let (i, j) = (points / 2, points / 2);
        let centre = base.with_spot(spot_axis[j]).with_volatility(vol_axis[i]);
        let reference = price_and_greeks(centre, OptionType::Call).expect("Valid parameters").price;

        for (label, parallel) in [("sequential", false), ("parallel", true)] {
            info!(points, parallel, "evaluating grid");
            let config = GridConfig {
                greeks: GreekSet::all(),
                parallel,
            };

            let mut timer = Timer::new();
            timer.start();
            let grid = evaluate_grid_with(base, &spot_axis, &vol_axis, purchase, &config)
                .expect("Valid grid");
            let time_ms = timer.elapsed_ms();

            let cells = points * points;
            let value = grid.call.price[[i, j]];
            results.push(BenchmarkResult {
                name: format!("Grid {}x{} ({})", points, points, label),
                evaluations: 2 * cells,
                time_ms,
                throughput_per_sec: 2.0 * cells as f64 / (time_ms / 1000.0),
                value,
                reference_value: Some(reference),
                abs_error: Some((value - reference).abs()),
            });
        }
    }

    results
}

fn write_results_to_csv(results: &[BenchmarkResult], system_info: &SystemInfo, filename: &str) {
    let mut file = File::create(filename).expect("Could not create CSV file");

    writeln!(file, "# System Information").unwrap();
    writeln!(file, "# OS: {}", system_info.os).unwrap();
    writeln!(file, "# CPU: {}", system_info.cpu_model).unwrap();
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores).unwrap();
    writeln!(file, "# Rust Version: {}", system_info.rust_version).unwrap();
    writeln!(file, "# RUSTFLAGS: {}", system_info.rustc_flags).unwrap();
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads).unwrap();
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .unwrap();
    writeln!(file, "#").unwrap();

    writeln!(
        file,
        "Benchmark,Evaluations,Time_ms,Throughput_per_sec,Value,Reference_Value,Abs_Error"
    )
    .unwrap();

    for result in results {
        writeln!(
            file,
            "{},{},{:.3},{:.0},{:.10},{},{}",
            result.name,
            result.evaluations,
            result.time_ms,
            result.throughput_per_sec,
            result.value,
            result
                .reference_value
                .map(|v| format!("{:.10}", v))
                .unwrap_or_else(|| "N/A".to_string()),
            result
                .abs_error
                .map(|e| format!("{:.3e}", e))
                .unwrap_or_else(|| "N/A".to_string())
        )
        .unwrap();
    }

    println!("Results written to {}", filename);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("bs-heatmap Benchmark Suite");
    println!("==========================\n");

    let system_info = SystemInfo::gather();

    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU: {}", system_info.cpu_model);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  Rust Version: {}", system_info.rust_version);
    println!("  RUSTFLAGS: {}", system_info.rustc_flags);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!();

    let mut all_results = run_single_point_benchmarks();
    all_results.extend(run_grid_benchmarks());

    println!("\n{:=<96}", "");
    println!("BENCHMARK RESULTS");
    println!("{:=<96}", "");
    println!(
        "{:<36} {:>10} {:>12} {:>14} {:>10} {:>10}",
        "Benchmark", "Evals", "Time (ms)", "Evals/sec", "Value", "Abs Error"
    );
    println!("{:-<96}", "");

    for result in &all_results {
        println!(
            "{:<36} {:>10} {:>12.3} {:>14.0} {:>10.4} {:>10}",
            result.name,
            result.evaluations,
            result.time_ms,
            result.throughput_per_sec,
            result.value,
            result
                .abs_error
                .map(|e| format!("{:.1e}", e))
                .unwrap_or_else(|| "N/A".to_string())
        );
    }

    println!("{:=<96}", "");

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("benchmark_results_{}.csv", timestamp);
    write_results_to_csv(&all_results, &system_info, &filename);

    println!("\nBenchmark complete!");
    println!("To reproduce: cargo run --bin benchmark --release");
}
