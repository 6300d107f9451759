//! FASTA input, plain or gzip-compressed.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use bio::io::fasta;
use flate2::read::MultiGzDecoder;

use crate::error::DigestError;

#[derive(Debug, Clone)]
pub struct SequenceRecord {
    pub name: String,
    pub sequence: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(name: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
        }
    }

    pub fn length(&self) -> u64 {
        self.sequence.len() as u64
    }
}

pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead + Send>, DigestError> {
    let file = File::open(path).map_err(|e| DigestError::io(e, path))?;

    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let decoder = MultiGzDecoder::new(file);
        Ok(Box::new(BufReader::with_capacity(2 << 20, decoder)))
    } else {
        Ok(Box::new(BufReader::with_capacity(2 << 20, file)))
    }
}

/// Streams records out of a FASTA file in file order.
pub struct FastaSource {
    path: PathBuf,
    records: fasta::Records<Box<dyn BufRead + Send>>,
}

impl FastaSource {
    pub fn open(path: &Path) -> Result<Self, DigestError> {
        let reader = open_reader(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            records: fasta::Reader::from_bufread(reader).records(),
        })
    }

    /// Reads up to `batch_size` records. An empty batch means end of input.
    pub fn next_batch(&mut self, batch_size: usize) -> Result<Vec<SequenceRecord>, DigestError> {
        let mut batch = Vec::with_capacity(batch_size);
        for _ in 0..batch_size {
            match self.next() {
                Some(record) => batch.push(record?),
                None => break,
            }
        }
        Ok(batch)
    }
}

impl Iterator for FastaSource {
    type Item = Result<SequenceRecord, DigestError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(DigestError::io(e, &self.path))),
        };
        // an empty header is allowed, only the sequence is checked
        if !record.seq().is_ascii() {
            return Some(Err(DigestError::Fasta(format!(
                "record '{}' in {}: non-ASCII characters in sequence",
                record.id(),
                self.path.display()
            ))));
        }
        Some(Ok(SequenceRecord::new(record.id(), record.seq())))
    }
}

/// Loads every record of a FASTA file into memory.
pub fn read_sequences(path: &Path) -> Result<Vec<SequenceRecord>, DigestError> {
    FastaSource::open(path)?.collect()
}
