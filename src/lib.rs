//! # Motif Discovery & Enrichment Statistics
//!
//! This library discovers short nucleotide motifs that are statistically
//! over-represented across a collection of related sequences (e.g., clones
//! from a SELEX selection round) and ranks them by corrected significance
//! and fold enrichment over a random-sequence null model.
//!
//! ## Pipeline
//!
//! 1. **Enumeration**: distinct k-mers per sequence for each length in the
//!    configured range (presence, not multiplicity)
//! 2. **Aggregation**: map-reduce union into motif → supporting-sequence
//!    sets, filtered by minimum support
//! 3. **Significance**: one-sided binomial upper-tail p-value per motif
//!    under a uniform-base (or caller-supplied) null model
//! 4. **Correction**: Benjamini–Hochberg across all tested motifs
//! 5. **Redundancy**: subsumed fragments dropped, identical-support
//!    overlapping motifs optionally merged into a consensus
//! 6. **Report**: deterministic ordering by adjusted p-value, fold
//!    enrichment, motif
//!
//! The computation is pure and synchronous: identical input and
//! configuration always produce a byte-identical rendered report,
//! regardless of worker scheduling.
//!
//! ## Usage Example
//!
//! ```
//! use aptamotif::{AnalysisConfig, MotifAnalyzer, SequenceCorpus};
//!
//! let corpus = SequenceCorpus::from_pairs([
//!     ("clone-1", "GGATCCAAA"),
//!     ("clone-2", "GGATCCTTT"),
//!     ("clone-3", "AAAAAAAA"),
//! ])?;
//! let analyzer = MotifAnalyzer::new(AnalysisConfig {
//!     min_motif_length: 6,
//!     max_motif_length: 6,
//!     ..AnalysisConfig::default()
//! })?;
//! let report = analyzer.analyze(&corpus)?;
//! assert_eq!(report.records()[0].motif, "GGATCC");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod corpus;     // Sequence records and corpus container
pub mod kmer;       // Sliding-window k-mer enumeration
pub mod occurrence; // Map-reduce occurrence aggregation
pub mod statistics; // Null models, binomial test, BH correction
pub mod redundancy; // Subsumption and overlap-merge resolution
pub mod report;     // Record assembly, ordering, rendering

// Re-exports for convenience
pub use corpus::{CorpusError, SequenceCorpus, SequenceRecord};
pub use kmer::motif_positions;
pub use occurrence::MotifObservation;
pub use report::{EnrichmentRecord, EnrichmentReport, FoldEnrichment};
pub use statistics::{GcAwareNull, NullModel, UniformNull};

use thiserror::Error;
use tracing::{debug, info};

/// Configuration for one analysis run.
///
/// All fields have sensible defaults; construct with struct-update syntax
/// over [`AnalysisConfig::default`]. Validation happens in
/// [`MotifAnalyzer::new`], before any enumeration.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Shortest motif length to enumerate (default 5).
    pub min_motif_length: usize,

    /// Longest motif length to enumerate (default 15).
    pub max_motif_length: usize,

    /// Minimum number of sequences that must share a motif for it to be
    /// tested (default 2).
    pub min_sequences: usize,

    /// Significance cutoff applied to adjusted p-values (default 0.05).
    pub fdr_threshold: f64,

    /// Size of the null-model alphabet (default 4).
    pub alphabet_size: usize,

    /// Whether identical-support overlapping motifs are merged into a
    /// consensus (default true).
    pub merge_overlapping: bool,

    /// Minimum suffix/prefix overlap required for a merge; `None` falls
    /// back to `min_motif_length`.
    pub merge_overlap_min_length: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_motif_length: 5,
            max_motif_length: 15,
            min_sequences: 2,
            fdr_threshold: 0.05,
            alphabet_size: 4,
            merge_overlapping: true,
            merge_overlap_min_length: None,
        }
    }
}

impl AnalysisConfig {
    /// Check every constraint the pipeline relies on.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.min_motif_length < 1 || self.min_motif_length > self.max_motif_length {
            return Err(AnalysisError::InvalidLengthRange {
                min: self.min_motif_length,
                max: self.max_motif_length,
            });
        }
        if self.min_sequences < 1 {
            return Err(AnalysisError::InvalidMinSequences(self.min_sequences));
        }
        if !(self.fdr_threshold > 0.0 && self.fdr_threshold < 1.0) {
            return Err(AnalysisError::InvalidFdrThreshold(self.fdr_threshold));
        }
        if self.alphabet_size < 2 {
            return Err(AnalysisError::InvalidAlphabetSize(self.alphabet_size));
        }
        Ok(())
    }

    pub(crate) fn effective_merge_overlap(&self) -> usize {
        self.merge_overlap_min_length
            .unwrap_or(self.min_motif_length)
    }
}

/// Errors that can abort an analysis run.
///
/// Degenerate data conditions (invalid windows, underflowing p-values,
/// zero expected counts) are absorbed locally and reflected in report
/// fields instead; only configuration problems and an empty corpus are
/// fatal.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Motif length range is empty or starts below 1.
    #[error("invalid motif length range: min {min} must be >= 1 and <= max {max}")]
    InvalidLengthRange {
        /// Configured minimum motif length.
        min: usize,
        /// Configured maximum motif length.
        max: usize,
    },

    /// Minimum sequence support below 1.
    #[error("minimum sequence support must be >= 1, got {0}")]
    InvalidMinSequences(usize),

    /// FDR threshold outside the open interval (0, 1).
    #[error("FDR threshold must lie in (0, 1), got {0}")]
    InvalidFdrThreshold(f64),

    /// Null-model alphabet too small to be meaningful.
    #[error("alphabet size must be >= 2, got {0}")]
    InvalidAlphabetSize(usize),

    /// No sequences supplied; no null model can be constructed.
    #[error("corpus contains no sequences")]
    EmptyCorpus,
}

/// Main analysis orchestrator.
///
/// Holds a validated configuration and runs the full discovery pipeline
/// over a corpus.
#[derive(Debug, Clone)]
pub struct MotifAnalyzer {
    config: AnalysisConfig,
}

impl MotifAnalyzer {
    /// Create an analyzer, validating the configuration up front.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run the full pipeline under the default uniform-base null model.
    pub fn analyze(&self, corpus: &SequenceCorpus) -> Result<EnrichmentReport, AnalysisError> {
        let model = UniformNull::new(self.config.alphabet_size);
        self.analyze_with_model(corpus, &model)
    }

    /// Run the full pipeline under a caller-supplied null model, e.g.
    /// [`GcAwareNull`] fitted to the corpus.
    pub fn analyze_with_model(
        &self,
        corpus: &SequenceCorpus,
        model: &dyn NullModel,
    ) -> Result<EnrichmentReport, AnalysisError> {
        if corpus.is_empty() {
            return Err(AnalysisError::EmptyCorpus);
        }

        info!(
            sequences = corpus.len(),
            min_len = self.config.min_motif_length,
            max_len = self.config.max_motif_length,
            "starting motif analysis"
        );

        let index = occurrence::OccurrenceIndex::build(corpus, &self.config);
        let skipped_windows = index.skipped_windows();

        let scored = statistics::score_observations(index.into_observations(), corpus, model);

        // Correction is a synchronization barrier: it needs the complete
        // p-value set, and its denominator is fixed before redundancy runs.
        let corrected = statistics::benjamini_hochberg(scored);
        let tested_motifs = corrected.len();

        let resolved = redundancy::resolve(corrected, corpus, model, &self.config);

        let report =
            report::assemble(resolved, corpus, tested_motifs, skipped_windows, &self.config);
        debug!(
            records = report.len(),
            tested = tested_motifs,
            "analysis complete"
        );
        Ok(report)
    }
}
