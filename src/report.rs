//! Human-readable and JSON output of an [`AnalysisResult`].

use std::io::Write;

use crate::digest::AnalysisResult;

/// Formats an integer with `,` between groups of three digits.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn write_summary<W: Write>(out: &mut W, result: &AnalysisResult) -> std::io::Result<()> {
    writeln!(
        out,
        "Number of fragments in range {}-{}: {}",
        group_thousands(result.window.lower()),
        group_thousands(result.window.upper()),
        group_thousands(result.fragments_in_range_count() as u64)
    )?;
    writeln!(
        out,
        "Fraction of genome represented: {:.5} ({:.2}%) ({}/{} bp)",
        result.coverage_fraction,
        result.coverage_percent(),
        group_thousands(result.bp_in_range),
        group_thousands(result.total_genome_length)
    )
}

pub fn write_json<W: Write>(out: &mut W, result: &AnalysisResult) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, result)?;
    writeln!(out)?;
    Ok(())
}
