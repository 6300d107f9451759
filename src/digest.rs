//! Fragment derivation for a two-enzyme digest and coverage aggregation.
//!
//! Cut positions are 0-based offsets of the first base after the top-strand
//! cut. A fragment is kept only when its two bounding cuts come from
//! different enzymes.

use serde::Serialize;

use crate::error::DigestError;

/// Which of the two enzymes produced a cut, in the order they were requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EnzymeTag {
    First,
    Second,
}

/// A cut offset tagged with the enzyme that made it.
///
/// Ordering is by position, then by tag, so coincident cuts always sort
/// `First` before `Second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CutPosition {
    pub position: u64,
    pub enzyme: EnzymeTag,
}

impl CutPosition {
    pub fn new(position: u64, enzyme: EnzymeTag) -> Self {
        Self { position, enzyme }
    }
}

/// Inclusive fragment-size window `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeWindow {
    lower: u64,
    upper: u64,
}

impl SizeWindow {
    /// Builds a window from user-supplied bounds. Negative or inverted bounds
    /// are rejected.
    pub fn new(lower: i64, upper: i64) -> Result<Self, DigestError> {
        if lower < 0 || upper < 0 || lower > upper {
            return Err(DigestError::InvalidRange { lower, upper });
        }
        Ok(Self {
            lower: lower as u64,
            upper: upper as u64,
        })
    }

    pub fn lower(&self) -> u64 {
        self.lower
    }

    pub fn upper(&self) -> u64 {
        self.upper
    }

    pub fn contains(&self, length: u64) -> bool {
        length >= self.lower && length <= self.upper
    }
}

/// Tags both enzymes' cuts, merges them and sorts by position.
///
/// A position reported more than once for the same enzyme counts as one cut.
pub fn tag_cut_positions(first: &[u64], second: &[u64]) -> Vec<CutPosition> {
    let mut cuts: Vec<CutPosition> = first
        .iter()
        .map(|&p| CutPosition::new(p, EnzymeTag::First))
        .chain(second.iter().map(|&p| CutPosition::new(p, EnzymeTag::Second)))
        .collect();
    cuts.sort_unstable();
    cuts.dedup();
    cuts
}

/// Lengths of fragments between adjacent cuts made by different enzymes.
/// `cuts` must be sorted.
pub fn double_cut_fragments(cuts: &[CutPosition]) -> Vec<u64> {
    cuts.windows(2)
        .filter(|pair| pair[0].enzyme != pair[1].enzyme)
        .map(|pair| pair[1].position - pair[0].position)
        .collect()
}

/// Derives the double-cut fragment lengths for one sequence.
///
/// Fails if any cut lies outside `[0, length)`.
pub fn digest_sequence(
    name: &str,
    length: u64,
    first: &[u64],
    second: &[u64],
) -> Result<Vec<u64>, DigestError> {
    if let Some(&position) = first.iter().chain(second).find(|&&p| p >= length) {
        return Err(DigestError::CutOutOfBounds {
            sequence: name.to_string(),
            position,
            length,
        });
    }
    let cuts = tag_cut_positions(first, second);
    Ok(double_cut_fragments(&cuts))
}

/// Running totals for one analysis. Workers each fill their own and the
/// results are merged before finalizing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestAccumulator {
    sequence_count: usize,
    total_genome_length: u64,
    fragment_lengths: Vec<u64>,
}

impl DigestAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one sequence's length and its double-cut fragments.
    pub fn add_sequence(&mut self, length: u64, fragments: Vec<u64>) {
        self.sequence_count += 1;
        self.total_genome_length += length;
        self.fragment_lengths.extend(fragments);
    }

    pub fn merge(&mut self, other: DigestAccumulator) {
        self.sequence_count += other.sequence_count;
        self.total_genome_length += other.total_genome_length;
        self.fragment_lengths.extend(other.fragment_lengths);
    }

    pub fn sequence_count(&self) -> usize {
        self.sequence_count
    }

    pub fn total_genome_length(&self) -> u64 {
        self.total_genome_length
    }

    pub fn fragment_lengths(&self) -> &[u64] {
        &self.fragment_lengths
    }

    /// Applies the size window and computes coverage.
    pub fn finalize(self, window: SizeWindow) -> Result<AnalysisResult, DigestError> {
        if self.sequence_count == 0 {
            return Err(DigestError::NoSequences);
        }
        if self.total_genome_length == 0 {
            return Err(DigestError::DivisionUndefined);
        }
        let fragments_in_range: Vec<u64> = self
            .fragment_lengths
            .iter()
            .copied()
            .filter(|&len| window.contains(len))
            .collect();
        let bp_in_range: u64 = fragments_in_range.iter().sum();
        let coverage_fraction = bp_in_range as f64 / self.total_genome_length as f64;

        Ok(AnalysisResult {
            window,
            sequence_count: self.sequence_count,
            total_genome_length: self.total_genome_length,
            fragment_lengths: self.fragment_lengths,
            fragments_in_range,
            bp_in_range,
            coverage_fraction,
        })
    }
}

/// Final statistics of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub window: SizeWindow,
    pub sequence_count: usize,
    pub total_genome_length: u64,
    pub fragment_lengths: Vec<u64>,
    pub fragments_in_range: Vec<u64>,
    pub bp_in_range: u64,
    pub coverage_fraction: f64,
}

impl AnalysisResult {
    pub fn fragments_in_range_count(&self) -> usize {
        self.fragments_in_range.len()
    }

    pub fn coverage_percent(&self) -> f64 {
        self.coverage_fraction * 100.0
    }
}
