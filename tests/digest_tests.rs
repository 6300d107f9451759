use double_digest::digest::{digest_sequence, double_cut_fragments, tag_cut_positions};
use double_digest::fasta::SequenceRecord;
use double_digest::{
    analyze_sequences, CutSiteSearch, DigestAccumulator, DigestError, EnzymeCatalog, EnzymeResolver,
    SizeWindow,
};

/// Cut-site search that returns fixed positions keyed by sequence content.
struct FixedCuts {
    name: &'static str,
    cuts: Vec<(String, Vec<u64>)>,
}

impl CutSiteSearch for FixedCuts {
    fn name(&self) -> &str {
        self.name
    }

    fn cut_positions(&self, sequence: &[u8]) -> Vec<u64> {
        let key = std::str::from_utf8(sequence).unwrap();
        self.cuts
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    }
}

fn seq_of(len: usize, tag: char) -> String {
    std::iter::repeat(tag).take(len).collect()
}

#[test]
fn test_alternating_cuts_example() {
    let fragments = digest_sequence("seq", 1000, &[100, 500], &[300, 700]).unwrap();
    assert_eq!(fragments, vec![200, 200, 200]);

    let mut acc = DigestAccumulator::new();
    acc.add_sequence(1000, fragments);
    let result = acc.finalize(SizeWindow::new(150, 250).unwrap()).unwrap();
    assert_eq!(result.fragments_in_range, vec![200, 200, 200]);
    assert_eq!(result.bp_in_range, 600);
    assert!((result.coverage_fraction - 0.6).abs() < 1e-12);
    assert!((result.coverage_percent() - 60.0).abs() < 1e-9);
}

#[test]
fn test_coincident_cuts_record_zero_length_fragment() {
    // ties sort first enzyme before second, so the pair differs
    let fragments = digest_sequence("seq", 1000, &[400], &[400]).unwrap();
    assert_eq!(fragments, vec![0]);

    let mut acc = DigestAccumulator::new();
    acc.add_sequence(1000, fragments);
    let result = acc.finalize(SizeWindow::new(0, 10).unwrap()).unwrap();
    assert_eq!(result.fragments_in_range_count(), 1);
    assert_eq!(result.bp_in_range, 0);
    assert_eq!(result.coverage_fraction, 0.0);
}

#[test]
fn test_coincident_cuts_between_same_enzyme_runs() {
    // (100,A) (400,A) (400,B) (700,B): only the A->B boundary counts
    let fragments = digest_sequence("seq", 1000, &[100, 400], &[400, 700]).unwrap();
    assert_eq!(fragments, vec![0]);
}

#[test]
fn test_argument_order_irrelevant_without_coincident_cuts() {
    let ab = digest_sequence("seq", 1000, &[100, 900], &[400, 650]).unwrap();
    let ba = digest_sequence("seq", 1000, &[400, 650], &[100, 900]).unwrap();
    assert_eq!(ab, vec![300, 250]);
    assert_eq!(ab, ba);
}

#[test]
fn test_repeated_runs_are_identical() {
    let first = [812, 5, 377, 377, 90, 640];
    let second = [377, 12, 999, 640, 641];
    let expected = digest_sequence("seq", 1000, &first, &second).unwrap();
    for _ in 0..20 {
        assert_eq!(digest_sequence("seq", 1000, &first, &second).unwrap(), expected);
    }
}

#[test]
fn test_no_fragment_between_same_enzyme_cuts() {
    let cuts = tag_cut_positions(&[10, 20, 30, 500], &[40, 50]);
    let fragments = double_cut_fragments(&cuts);
    let differing = cuts
        .windows(2)
        .filter(|pair| pair[0].enzyme != pair[1].enzyme)
        .count();
    assert_eq!(fragments.len(), differing);
    // 30->40 and 50->500; 10->20, 20->30 and 40->50 are single-enzyme
    assert_eq!(fragments, vec![10, 450]);
}

#[test]
fn test_uncut_sequence_contributes_nothing() {
    assert!(digest_sequence("seq", 500, &[], &[]).unwrap().is_empty());
}

#[test]
fn test_single_enzyme_sequence_contributes_nothing() {
    assert!(digest_sequence("seq", 500, &[10, 200, 300], &[]).unwrap().is_empty());
    assert!(digest_sequence("seq", 500, &[], &[10, 200, 300]).unwrap().is_empty());
}

#[test]
fn test_range_filter_and_sum_invariant() {
    let mut acc = DigestAccumulator::new();
    acc.add_sequence(5000, vec![0, 99, 100, 150, 300, 301, 1200]);
    let result = acc.finalize(SizeWindow::new(100, 300).unwrap()).unwrap();

    let expected: Vec<u64> = result
        .fragment_lengths
        .iter()
        .copied()
        .filter(|&l| (100..=300).contains(&l))
        .collect();
    assert_eq!(result.fragments_in_range, expected);
    assert_eq!(result.fragments_in_range, vec![100, 150, 300]);
    let reconstructed = result.coverage_fraction * result.total_genome_length as f64;
    assert!((reconstructed - result.bp_in_range as f64).abs() < 1e-6);
}

#[test]
fn test_sequences_do_not_share_fragments() {
    let a = seq_of(100, 'A');
    let c = seq_of(100, 'C');
    let first = FixedCuts {
        name: "X",
        cuts: vec![(a.clone(), vec![90])],
    };
    let second = FixedCuts {
        name: "Y",
        cuts: vec![(c.clone(), vec![10])],
    };
    // joined, 90 (X) and 110 (Y) would make a 20 bp fragment
    let records = vec![SequenceRecord::new("a", a.as_bytes()), SequenceRecord::new("c", c.as_bytes())];
    let result = analyze_sequences(&records, &first, &second, SizeWindow::new(0, 1000).unwrap()).unwrap();
    assert!(result.fragment_lengths.is_empty());
    assert_eq!(result.total_genome_length, 200);
    assert_eq!(result.sequence_count, 2);
    assert_eq!(result.coverage_fraction, 0.0);
}

#[test]
fn test_analyze_sequences_accumulates_across_sequences() {
    let a = seq_of(1000, 'A');
    let c = seq_of(500, 'C');
    let first = FixedCuts {
        name: "X",
        cuts: vec![(a.clone(), vec![100, 500]), (c.clone(), vec![50])],
    };
    let second = FixedCuts {
        name: "Y",
        cuts: vec![(a.clone(), vec![300, 700]), (c.clone(), vec![450])],
    };
    let records = vec![SequenceRecord::new("a", a.as_bytes()), SequenceRecord::new("c", c.as_bytes())];
    let result = analyze_sequences(&records, &first, &second, SizeWindow::new(150, 450).unwrap()).unwrap();
    assert_eq!(result.fragment_lengths, vec![200, 200, 200, 400]);
    assert_eq!(result.bp_in_range, 1000);
    assert_eq!(result.total_genome_length, 1500);
}

#[test]
fn test_analyze_sequences_errors() {
    let none = FixedCuts { name: "X", cuts: vec![] };
    let window = SizeWindow::new(0, 10).unwrap();
    assert!(matches!(
        analyze_sequences(&[], &none, &none, window),
        Err(DigestError::NoSequences)
    ));
    let empty = vec![SequenceRecord::new("empty", Vec::<u8>::new())];
    assert!(matches!(
        analyze_sequences(&empty, &none, &none, window),
        Err(DigestError::DivisionUndefined)
    ));
}

#[test]
fn test_out_of_bounds_cut_aborts() {
    let a = seq_of(10, 'A');
    let bad = FixedCuts {
        name: "X",
        cuts: vec![(a.clone(), vec![10])],
    };
    let records = vec![SequenceRecord::new("a", a.as_bytes())];
    let err = analyze_sequences(&records, &bad, &bad, SizeWindow::new(0, 10).unwrap()).unwrap_err();
    assert!(matches!(err, DigestError::CutOutOfBounds { ref sequence, .. } if sequence == "a"));
}

#[test]
fn test_site_at_sequence_start_makes_no_fragment() {
    // MluCI cuts before the first base of a leading AATT; HindIII cuts at 101
    let mut seq = vec![b'T'; 300];
    seq[..4].copy_from_slice(b"AATT");
    seq[100..106].copy_from_slice(b"AAGCTT");
    let catalog = EnzymeCatalog::builtin().unwrap();
    let (hind, mluc) = catalog
        .resolve_pair(&["HindIII".to_string(), "MluCI".to_string()])
        .unwrap();
    assert_eq!(hind.cut_positions(&seq), vec![101]);
    assert!(mluc.cut_positions(&seq).is_empty());

    let records = vec![SequenceRecord::new("start", seq)];
    let result = analyze_sequences(&records, &hind, &mluc, SizeWindow::new(0, 300).unwrap()).unwrap();
    assert!(result.fragment_lengths.is_empty());
    assert_eq!(result.bp_in_range, 0);
}
