//! Estimates how much of a genome a two-enzyme digest puts into a fragment size window.

pub mod digest;
pub mod enzyme;
pub mod error;
pub mod fasta;
pub mod pipeline;
pub mod report;

pub use digest::{AnalysisResult, CutPosition, DigestAccumulator, EnzymeTag, SizeWindow};
pub use enzyme::{CutSiteSearch, EnzymeCatalog, EnzymeResolver, RestrictionEnzyme};
pub use error::DigestError;
pub use pipeline::{analyze_sequences, run_digest, DigestConfig};

/// IUPAC-aware reverse complement of a DNA sequence or recognition site.
///
/// - A ↔ T, G ↔ C
/// - ambiguity codes map to their complement class (R ↔ Y, K ↔ M, B ↔ V, D ↔ H;
///   W, S and N are self-complementary)
/// - any other character becomes N
/// - output is upper case
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement_base(b)).collect()
}

/// Complement of a single IUPAC nucleotide code, upper-cased.
pub fn complement_base(base: u8) -> u8 {
    match base.to_ascii_uppercase() {
        b'A' => b'T',
        b'T' => b'A',
        b'G' => b'C',
        b'C' => b'G',
        b'R' => b'Y',
        b'Y' => b'R',
        b'K' => b'M',
        b'M' => b'K',
        b'B' => b'V',
        b'V' => b'B',
        b'D' => b'H',
        b'H' => b'D',
        b'W' => b'W',
        b'S' => b'S',
        _ => b'N',
    }
}

/// True if the concrete sequence base `base` is allowed by the IUPAC code `code`.
///
/// Only A/C/G/T in the sequence can match; an N in the sequence never does.
pub fn iupac_matches(code: u8, base: u8) -> bool {
    let base = base.to_ascii_uppercase();
    let allowed: &[u8] = match code.to_ascii_uppercase() {
        b'A' => b"A",
        b'C' => b"C",
        b'G' => b"G",
        b'T' => b"T",
        b'R' => b"AG",
        b'Y' => b"CT",
        b'S' => b"CG",
        b'W' => b"AT",
        b'K' => b"GT",
        b'M' => b"AC",
        b'B' => b"CGT",
        b'D' => b"AGT",
        b'H' => b"ACT",
        b'V' => b"ACG",
        b'N' => b"ACGT",
        _ => return false,
    };
    allowed.contains(&base)
}
