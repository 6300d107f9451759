//! Runs a double digest over every sequence of an input file.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, info};

use crate::digest::{digest_sequence, AnalysisResult, DigestAccumulator, SizeWindow};
use crate::enzyme::{CutSiteSearch, EnzymeResolver};
use crate::error::DigestError;
use crate::fasta::{FastaSource, SequenceRecord};

/// Everything a run needs, usually straight from the command line.
#[derive(Debug, Clone)]
pub struct DigestConfig {
    pub input: PathBuf,
    pub lower_bound: i64,
    pub upper_bound: i64,
    pub enzymes: [String; 2],
    pub threads: usize,
    pub batch_size: usize,
}

impl DigestConfig {
    pub fn new(input: impl Into<PathBuf>, lower_bound: i64, upper_bound: i64, enzymes: [String; 2]) -> Self {
        Self {
            input: input.into(),
            lower_bound,
            upper_bound,
            enzymes,
            threads: 1,
            batch_size: 64,
        }
    }
}

fn digest_record<E: CutSiteSearch>(
    record: &SequenceRecord,
    first: &E,
    second: &E,
) -> Result<Vec<u64>, DigestError> {
    let first_cuts = first.cut_positions(&record.sequence);
    let second_cuts = second.cut_positions(&record.sequence);
    debug!(
        "{}: {} {} cuts, {} {} cuts",
        record.name,
        first_cuts.len(),
        first.name(),
        second_cuts.len(),
        second.name()
    );
    digest_sequence(&record.name, record.length(), &first_cuts, &second_cuts)
}

fn digest_batch<E: CutSiteSearch>(
    batch: &[SequenceRecord],
    first: &E,
    second: &E,
) -> Result<DigestAccumulator, DigestError> {
    let mut acc = DigestAccumulator::new();
    for record in batch {
        let fragments = digest_record(record, first, second)?;
        acc.add_sequence(record.length(), fragments);
    }
    Ok(acc)
}

/// Single-threaded analysis of sequences already in memory.
pub fn analyze_sequences<E: CutSiteSearch>(
    records: &[SequenceRecord],
    first: &E,
    second: &E,
    window: SizeWindow,
) -> Result<AnalysisResult, DigestError> {
    digest_batch(records, first, second)?.finalize(window)
}

/// Reads `config.input`, digests every sequence with both enzymes on a pool of
/// worker threads and returns the coverage statistics.
///
/// The size window is validated and both enzymes resolved before the input is
/// opened. The first error from any thread aborts the run.
pub fn run_digest<R>(config: &DigestConfig, resolver: &R) -> Result<AnalysisResult, DigestError>
where
    R: EnzymeResolver,
    R::Enzyme: 'static,
{
    let window = SizeWindow::new(config.lower_bound, config.upper_bound)?;

    info!("Checking desired enzymes...");
    let (first, second) = resolver.resolve_pair(&config.enzymes)?;
    info!(
        "Successfully loaded enzymes '{}' and '{}'",
        first.name(),
        second.name()
    );
    let enzymes = Arc::new((first, second));

    info!("Reading input from fasta file '{}'...", config.input.display());
    let mut source = FastaSource::open(&config.input)?;

    let threads = config.threads.max(1);
    let batch_size = config.batch_size.max(1);

    let (batch_tx, batch_rx): (Sender<Vec<SequenceRecord>>, Receiver<Vec<SequenceRecord>>) =
        bounded(threads * 2);
    let (output_tx, output_rx): (
        Sender<Result<DigestAccumulator, DigestError>>,
        Receiver<Result<DigestAccumulator, DigestError>>,
    ) = bounded(threads * 2);

    // Reader thread
    let reader_handle = thread::spawn(move || -> Result<(), DigestError> {
        let mut read_count = 0usize;
        loop {
            let batch = source.next_batch(batch_size)?;
            if batch.is_empty() {
                break;
            }
            read_count += batch.len();
            debug!("Read {} sequences...", read_count);
            if batch_tx.send(batch).is_err() {
                // collector gave up, its error is reported instead
                break;
            }
        }
        info!("Finished reading {} sequences", read_count);
        Ok(())
    });

    // Worker threads
    let mut worker_handles = Vec::with_capacity(threads);
    for _ in 0..threads {
        let rx = batch_rx.clone();
        let tx = output_tx.clone();
        let enzymes = Arc::clone(&enzymes);
        worker_handles.push(thread::spawn(move || {
            let (first, second) = &*enzymes;
            while let Ok(batch) = rx.recv() {
                let result = digest_batch(&batch, first, second);
                let failed = result.is_err();
                if tx.send(result).is_err() || failed {
                    break;
                }
            }
        }));
    }
    drop(batch_rx);
    drop(output_tx);

    // Single aggregation point
    let mut total = DigestAccumulator::new();
    let mut failure = None;
    for result in output_rx.iter() {
        match result {
            Ok(acc) => total.merge(acc),
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }
    // Unblocks any worker still sending.
    drop(output_rx);

    for handle in worker_handles {
        if handle.join().is_err() && failure.is_none() {
            failure = Some(DigestError::Worker("digest worker panicked".to_string()));
        }
    }
    let reader_result = reader_handle
        .join()
        .map_err(|_| DigestError::Worker("reader thread panicked".to_string()))
        .and_then(|r| r);

    if let Some(e) = failure {
        return Err(e);
    }
    reader_result?;

    info!(
        "Total length fasta sequences: {} bp in {} sequences",
        crate::report::group_thousands(total.total_genome_length()),
        total.sequence_count()
    );
    total.finalize(window)
}
