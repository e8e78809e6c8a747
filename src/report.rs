//! Final report assembly: per-motif enrichment records with a
//! deterministic ordering, plus plain-text rendering for export and
//! fingerprinting.

use std::cmp::Ordering;
use std::fmt;
use std::io::Write;

use crate::corpus::SequenceCorpus;
use crate::statistics::CorrectedMotif;
use crate::AnalysisConfig;

/// Observed-over-expected support ratio.
///
/// `Undefined` marks the case where the expected count is zero (the motif is
/// longer than any usable window); the record still renders and sorts, it
/// just carries no meaningful ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FoldEnrichment {
    /// Observed count divided by expected count.
    Ratio(f64),
    /// Expected count is zero; no ratio exists.
    Undefined,
}

impl FoldEnrichment {
    /// The ratio, if defined.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Ratio(value) => Some(*value),
            Self::Undefined => None,
        }
    }

    /// Whether the ratio is undefined.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Comparison value for the report ordering: `Undefined` compares
    /// greater than any finite ratio.
    fn ordering_value(&self) -> f64 {
        self.value().unwrap_or(f64::INFINITY)
    }
}

impl fmt::Display for FoldEnrichment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ratio(value) => write!(f, "{value:.4}"),
            Self::Undefined => write!(f, "undefined"),
        }
    }
}

/// One motif's final analysis outcome.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnrichmentRecord {
    /// Motif string.
    pub motif: String,
    /// Number of supporting sequences.
    pub count: usize,
    /// Support expected under the null model.
    pub expected_count: f64,
    /// Observed-over-expected ratio, or the undefined sentinel.
    pub fold_enrichment: FoldEnrichment,
    /// Fraction of corpus sequences containing the motif.
    pub frequency: f64,
    /// One-sided binomial upper-tail p-value.
    pub raw_p_value: f64,
    /// Benjamini–Hochberg adjusted p-value.
    pub adjusted_p_value: f64,
    /// Whether the adjusted p-value clears the configured FDR threshold.
    pub significant: bool,
    /// Fraction of G/C bases in the motif.
    pub gc_content: f64,
    /// Identifiers of the supporting sequences, in corpus order.
    pub sequence_ids: Vec<String>,
}

impl EnrichmentRecord {
    /// Motif length in bases.
    pub fn length(&self) -> usize {
        self.motif.len()
    }
}

/// Report ordering: ascending adjusted p-value, ties broken by descending
/// fold enrichment (`Undefined` greatest), then lexicographic motif.
fn record_order(a: &EnrichmentRecord, b: &EnrichmentRecord) -> Ordering {
    a.adjusted_p_value
        .total_cmp(&b.adjusted_p_value)
        .then_with(|| {
            b.fold_enrichment
                .ordering_value()
                .total_cmp(&a.fold_enrichment.ordering_value())
        })
        .then_with(|| a.motif.cmp(&b.motif))
}

fn gc_content(motif: &str) -> f64 {
    if motif.is_empty() {
        return 0.0;
    }
    let gc = motif.bytes().filter(|b| matches!(b, b'G' | b'C')).count();
    gc as f64 / motif.len() as f64
}

/// Ordered enrichment records plus run-level diagnostics.
#[derive(Debug, Clone)]
pub struct EnrichmentReport {
    records: Vec<EnrichmentRecord>,
    num_sequences: usize,
    tested_motifs: usize,
    skipped_windows: u64,
}

impl EnrichmentReport {
    /// Records in report order.
    pub fn records(&self) -> &[EnrichmentRecord] {
        &self.records
    }

    /// Iterate records in report order.
    pub fn iter(&self) -> impl Iterator<Item = &EnrichmentRecord> {
        self.records.iter()
    }

    /// Records flagged significant, in report order.
    pub fn significant(&self) -> impl Iterator<Item = &EnrichmentRecord> {
        self.records.iter().filter(|record| record.significant)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the report holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of sequences in the analysed corpus.
    pub fn num_sequences(&self) -> usize {
        self.num_sequences
    }

    /// Number of motifs that entered the multiple-testing correction. Fixed
    /// before redundancy resolution, so it can exceed `len()`.
    pub fn tested_motifs(&self) -> usize {
        self.tested_motifs
    }

    /// Advisory count of enumeration windows skipped over non-alphabet
    /// characters.
    pub fn skipped_windows(&self) -> u64 {
        self.skipped_windows
    }

    /// Render the report as a tab-separated table.
    pub fn render_tsv(&self) -> String {
        use fmt::Write as _;

        let mut out = String::from(
            "Motif\tLength\tCount\tExpected_Count\tFold_Enrichment\tFrequency\tP_value\tFDR\tSignificant\tGC_Content\tSequences\n",
        );
        for record in &self.records {
            let _ = writeln!(
                out,
                "{motif}\t{length}\t{count}\t{expected:.4}\t{fold}\t{frequency:.4}\t{p:.6e}\t{fdr:.6e}\t{significant}\t{gc:.4}\t{ids}",
                motif = record.motif,
                length = record.length(),
                count = record.count,
                expected = record.expected_count,
                fold = record.fold_enrichment,
                frequency = record.frequency,
                p = record.raw_p_value,
                fdr = record.adjusted_p_value,
                significant = record.significant,
                gc = record.gc_content,
                ids = record.sequence_ids.join(","),
            );
        }
        out
    }

    /// Write the tab-separated table to a writer.
    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(self.render_tsv().as_bytes())?;
        writer.flush()
    }

    /// Binary presence/absence matrix: one row per corpus sequence (sorted
    /// by identifier, as exports expect), one column per report record in
    /// report order. Presence means the motif occurs anywhere in the
    /// sequence's random region.
    pub fn presence_matrix(&self, corpus: &SequenceCorpus) -> Vec<(String, Vec<bool>)> {
        let mut rows: Vec<(String, Vec<bool>)> = corpus
            .records()
            .iter()
            .map(|record| {
                let region = record.random_region.as_ref();
                let row = self
                    .records
                    .iter()
                    .map(|r| region.contains(&r.motif))
                    .collect();
                (record.id.to_string(), row)
            })
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows
    }
}

/// Assemble the final report from redundancy-resolved candidates.
pub(crate) fn assemble(
    resolved: Vec<CorrectedMotif>,
    corpus: &SequenceCorpus,
    tested_motifs: usize,
    skipped_windows: u64,
    config: &AnalysisConfig,
) -> EnrichmentReport {
    let num_sequences = corpus.len();
    let mut records: Vec<EnrichmentRecord> = resolved
        .into_iter()
        .map(|candidate| {
            let count = candidate.observation.count();
            let fold_enrichment = if candidate.expected_count > 0.0 {
                FoldEnrichment::Ratio(count as f64 / candidate.expected_count)
            } else {
                FoldEnrichment::Undefined
            };
            let sequence_ids = candidate
                .observation
                .sequence_ids
                .iter()
                .map(|&index| corpus.id(index).to_string())
                .collect();

            EnrichmentRecord {
                gc_content: gc_content(&candidate.observation.motif),
                motif: candidate.observation.motif,
                count,
                expected_count: candidate.expected_count,
                fold_enrichment,
                frequency: count as f64 / num_sequences as f64,
                raw_p_value: candidate.p_value,
                adjusted_p_value: candidate.adjusted_p_value,
                significant: candidate.adjusted_p_value < config.fdr_threshold,
                sequence_ids,
            }
        })
        .collect();

    records.sort_by(record_order);

    EnrichmentReport {
        records,
        num_sequences,
        tested_motifs,
        skipped_windows,
    }
}
