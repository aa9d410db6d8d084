// src/output.rs
use crate::analytics::payoff::PayoffCurve;
use ndarray::Array2;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write a heatmap matrix as CSV: one header row of spot levels, then one
/// row per volatility level.
pub fn write_matrix_to_csv<P: AsRef<Path>>(
    path: P,
    spot_axis: &[f64],
    vol_axis: &[f64],
    matrix: &Array2<f64>,
) -> io::Result<()> {
    if matrix.dim() != (vol_axis.len(), spot_axis.len()) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "matrix shape {:?} does not match axes ({}, {})",
                matrix.dim(),
                vol_axis.len(),
                spot_axis.len()
            ),
        ));
    }

    let mut file = BufWriter::new(File::create(path)?);
    write!(file, "vol\\spot")?;
    for spot in spot_axis {
        write!(file, ",{}", spot)?;
    }
    writeln!(file)?;

    for (vol, row) in vol_axis.iter().zip(matrix.rows()) {
        write!(file, "{}", vol)?;
        for value in row {
            write!(file, ",{}", value)?;
        }
        writeln!(file)?;
    }
    file.flush()
}

pub fn write_payoff_curve_to_csv<P: AsRef<Path>>(path: P, curve: &PayoffCurve) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "spot_at_expiry,pnl")?;
    for (spot, pnl) in curve.points() {
        writeln!(file, "{},{}", spot, pnl)?;
    }
    file.flush()
}
