//! Sequence records and the corpus container handed to the pipeline.
//!
//! The upstream acquisition step delivers already-extracted random regions;
//! this module only normalises case, enforces identifier uniqueness, and
//! exposes the corpus-level summaries the null models need.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

/// A single clone from a selection experiment.
///
/// Holds the extracted random region only; primer trimming happens upstream.
/// The region is normalised to uppercase at construction so window scanning
/// can match raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// Identifier, unique within a corpus.
    pub id: Arc<str>,
    /// Extracted random-region sequence, uppercase.
    pub random_region: Arc<str>,
}

impl SequenceRecord {
    /// Construct a new record, uppercasing the random region.
    pub fn new(id: impl Into<Arc<str>>, random_region: impl AsRef<str>) -> Self {
        let region = random_region.as_ref().to_ascii_uppercase();
        Self {
            id: id.into(),
            random_region: Arc::from(region),
        }
    }

    /// Region length in bases.
    pub fn len(&self) -> usize {
        self.random_region.len()
    }

    /// Whether the random region is empty.
    pub fn is_empty(&self) -> bool {
        self.random_region.is_empty()
    }

    /// Fraction of G/C bases over the whole region (0.0 for empty regions).
    pub fn gc_fraction(&self) -> f64 {
        if self.random_region.is_empty() {
            return 0.0;
        }
        let gc = self
            .random_region
            .bytes()
            .filter(|b| matches!(b, b'G' | b'C'))
            .count();
        gc as f64 / self.random_region.len() as f64
    }
}

/// Errors that can occur while assembling a corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Two records share the same identifier.
    #[error("duplicate sequence identifier '{0}'")]
    DuplicateId(Arc<str>),
}

/// Ordered collection of sequence records for one analysis run.
///
/// Records are addressed by their dense index throughout the pipeline;
/// identifiers are resolved back only at report assembly.
#[derive(Debug, Clone)]
pub struct SequenceCorpus {
    records: Vec<SequenceRecord>,
}

impl SequenceCorpus {
    /// Build a corpus, rejecting duplicate identifiers.
    pub fn new(records: Vec<SequenceRecord>) -> Result<Self, CorpusError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(Arc::clone(&record.id)) {
                return Err(CorpusError::DuplicateId(Arc::clone(&record.id)));
            }
        }
        Ok(Self { records })
    }

    /// Build a corpus from `(id, random_region)` pairs.
    pub fn from_pairs<I, S, R>(pairs: I) -> Result<Self, CorpusError>
    where
        I: IntoIterator<Item = (S, R)>,
        S: Into<Arc<str>>,
        R: AsRef<str>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(id, region)| SequenceRecord::new(id, region))
                .collect(),
        )
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the corpus holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in input order.
    pub fn records(&self) -> &[SequenceRecord] {
        &self.records
    }

    /// Record at a dense index.
    pub fn record(&self, index: u32) -> &SequenceRecord {
        &self.records[index as usize]
    }

    /// Identifier of the record at a dense index.
    pub fn id(&self, index: u32) -> &Arc<str> {
        &self.records[index as usize].id
    }

    /// Mean random-region length across the corpus.
    pub fn mean_region_length(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let total: usize = self.records.iter().map(SequenceRecord::len).sum();
        total as f64 / self.records.len() as f64
    }

    /// Mean per-record GC fraction, the base-composition summary used by the
    /// GC-aware null model.
    pub fn gc_fraction(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let total: f64 = self.records.iter().map(SequenceRecord::gc_fraction).sum();
        total / self.records.len() as f64
    }
}
