//! Restriction enzyme lookup and cut-site search.

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::DigestError;
use crate::{iupac_matches, reverse_complement};

const BUILTIN_ENZYMES_JSON: &str = include_str!("../assets/enzymes.json");

/// Anything that can report where it cuts a sequence.
///
/// Positions are 0-based offsets of the first base after the top-strand cut,
/// unordered, and always within `[0, sequence.len())`. The built-in search
/// never reports offset 0.
pub trait CutSiteSearch: Send + Sync {
    fn name(&self) -> &str;
    fn cut_positions(&self, sequence: &[u8]) -> Vec<u64>;
}

/// Turns an enzyme name into something that can search for cut sites.
pub trait EnzymeResolver {
    type Enzyme: CutSiteSearch;

    fn resolve(&self, name: &str) -> Result<Self::Enzyme, DigestError>;

    /// Resolves both enzymes of a double digest, failing on the first unknown name.
    fn resolve_pair(
        &self,
        names: &[String; 2],
    ) -> Result<(Self::Enzyme, Self::Enzyme), DigestError> {
        let first = self.resolve(&names[0])?;
        let second = self.resolve(&names[1])?;
        Ok((first, second))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RestrictionEnzyme {
    pub name: String,
    /// Recognition site, IUPAC codes allowed.
    pub sequence: String,
    /// Top-strand cut, counted from the first base of the site.
    pub cut: isize,
    /// Bottom-strand cut minus top-strand cut.
    pub overlap: isize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip)]
    is_palindromic: bool,
}

impl RestrictionEnzyme {
    pub fn new(name: &str, sequence: &str, cut: isize, overlap: isize) -> Result<Self, DigestError> {
        let mut re = Self {
            name: name.to_string(),
            sequence: sequence.to_string(),
            cut,
            overlap,
            note: None,
            is_palindromic: false,
        };
        re.normalize()?;
        Ok(re)
    }

    /// Upper-cases the site, checks it and caches palindromicity.
    fn normalize(&mut self) -> Result<(), DigestError> {
        self.sequence = self.sequence.to_ascii_uppercase();
        if self.sequence.is_empty() {
            return Err(DigestError::Catalog(format!(
                "enzyme '{}' has an empty recognition site",
                self.name
            )));
        }
        if let Some(bad) = self
            .sequence
            .bytes()
            .find(|&b| !b"ACGTRYSWKMBDHVN".contains(&b))
        {
            return Err(DigestError::Catalog(format!(
                "enzyme '{}' has invalid character '{}' in its recognition site",
                self.name, bad as char
            )));
        }
        self.check_palindromic();
        Ok(())
    }

    pub fn check_palindromic(&mut self) {
        self.is_palindromic = self.sequence.as_bytes() == reverse_complement(self.sequence.as_bytes());
    }

    pub fn is_palindromic(&self) -> bool {
        self.is_palindromic
    }

    fn site_starts(pattern: &[u8], sequence: &[u8]) -> Vec<usize> {
        if pattern.len() > sequence.len() {
            return vec![];
        }
        (0..=sequence.len() - pattern.len())
            .filter(|&start| {
                pattern
                    .iter()
                    .zip(&sequence[start..start + pattern.len()])
                    .all(|(&code, &base)| iupac_matches(code, base))
            })
            .collect()
    }
}

impl CutSiteSearch for RestrictionEnzyme {
    fn name(&self) -> &str {
        &self.name
    }

    fn cut_positions(&self, sequence: &[u8]) -> Vec<u64> {
        let site = self.sequence.as_bytes();
        let site_len = site.len() as isize;
        let seq_len = sequence.len() as isize;

        let mut cuts: Vec<isize> = Self::site_starts(site, sequence)
            .into_iter()
            .map(|start| start as isize + self.cut)
            .collect();

        // A site on the bottom strand puts the enzyme's bottom-strand cut on our top strand.
        if !self.is_palindromic {
            let rc_site = reverse_complement(site);
            cuts.extend(
                Self::site_starts(&rc_site, sequence)
                    .into_iter()
                    .map(|start| start as isize + site_len - self.cut - self.overlap),
            );
        }

        // a cut before the first base leaves the sequence whole
        cuts.into_iter()
            .filter(|&pos| pos > 0 && pos < seq_len)
            .map(|pos| pos as u64)
            .collect()
    }
}

/// A named set of restriction enzymes.
#[derive(Clone, Debug)]
pub struct EnzymeCatalog {
    enzymes: Vec<RestrictionEnzyme>,
}

impl EnzymeCatalog {
    /// The catalog shipped with the binary.
    pub fn builtin() -> Result<Self, DigestError> {
        Self::from_json_text(BUILTIN_ENZYMES_JSON)
    }

    pub fn from_json_text(json_text: &str) -> Result<Self, DigestError> {
        let mut enzymes: Vec<RestrictionEnzyme> = serde_json::from_str(json_text)
            .map_err(|e| DigestError::Catalog(format!("bad enzyme JSON: {e}")))?;
        for re in enzymes.iter_mut() {
            re.normalize()?;
        }
        debug!("Loaded {} restriction enzymes", enzymes.len());
        Ok(Self { enzymes })
    }

    pub fn from_path(path: &Path) -> Result<Self, DigestError> {
        let text = fs::read_to_string(path).map_err(|e| DigestError::io(e, path))?;
        info!("Using enzyme catalog '{}'", path.display());
        Self::from_json_text(&text)
    }

    pub fn enzymes(&self) -> &[RestrictionEnzyme] {
        &self.enzymes
    }

    pub fn names(&self) -> Vec<&str> {
        self.enzymes.iter().map(|re| re.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&RestrictionEnzyme> {
        self.enzymes.iter().find(|re| re.name == name)
    }
}

impl EnzymeResolver for EnzymeCatalog {
    type Enzyme = RestrictionEnzyme;

    fn resolve(&self, name: &str) -> Result<RestrictionEnzyme, DigestError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| DigestError::UnknownEnzyme(name.to_string()))
    }
}
