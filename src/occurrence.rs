//! Aggregation of per-sequence k-mer emissions into a global occurrence
//! index.
//!
//! Enumeration is embarrassingly parallel across sequences: each worker
//! produces an immutable partial map for one sequence, and the partials are
//! combined with a commutative, associative union. Support lists are sorted
//! once at finalisation, so the shape of the reduction tree cannot leak into
//! the output.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::debug;

use crate::corpus::SequenceCorpus;
use crate::kmer;
use crate::AnalysisConfig;

/// A motif together with the sequences that contain it.
///
/// Support is stored as sorted dense indices into the corpus, which gives
/// deterministic iteration and cheap subset tests downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotifObservation {
    /// Motif string over the uppercase A/C/G/T alphabet.
    pub motif: String,
    /// Sorted dense corpus indices of the supporting sequences.
    pub sequence_ids: Vec<u32>,
}

impl MotifObservation {
    /// Number of supporting sequences.
    pub fn count(&self) -> usize {
        self.sequence_ids.len()
    }
}

/// Immutable partial result of one enumeration worker.
#[derive(Debug, Default)]
struct PartialIndex {
    motifs: BTreeMap<String, Vec<u32>>,
    skipped_windows: u64,
}

fn merge_partials(mut left: PartialIndex, mut right: PartialIndex) -> PartialIndex {
    // Fold the smaller side into the larger to keep the reduction cheap.
    if right.motifs.len() > left.motifs.len() {
        std::mem::swap(&mut left, &mut right);
    }
    for (motif, ids) in right.motifs {
        left.motifs.entry(motif).or_default().extend(ids);
    }
    left.skipped_windows += right.skipped_windows;
    left
}

/// Global motif → support mapping, filtered by minimum sequence support.
#[derive(Debug)]
pub(crate) struct OccurrenceIndex {
    observations: Vec<MotifObservation>,
    skipped_windows: u64,
}

impl OccurrenceIndex {
    /// Enumerate the corpus and aggregate per-sequence motif sets, retaining
    /// only motifs supported by at least `config.min_sequences` sequences.
    pub(crate) fn build(corpus: &SequenceCorpus, config: &AnalysisConfig) -> Self {
        let merged = corpus
            .records()
            .par_iter()
            .enumerate()
            .map(|(index, record)| {
                let scan = kmer::scan_sequence(
                    record.random_region.as_ref(),
                    config.min_motif_length,
                    config.max_motif_length,
                );
                let motifs = scan
                    .motifs
                    .into_iter()
                    .map(|motif| (motif, vec![index as u32]))
                    .collect();
                PartialIndex {
                    motifs,
                    skipped_windows: scan.skipped_windows,
                }
            })
            .reduce(PartialIndex::default, merge_partials);

        let candidates = merged.motifs.len();
        let observations: Vec<MotifObservation> = merged
            .motifs
            .into_iter()
            .filter(|(_, ids)| ids.len() >= config.min_sequences)
            .map(|(motif, mut sequence_ids)| {
                sequence_ids.sort_unstable();
                MotifObservation {
                    motif,
                    sequence_ids,
                }
            })
            .collect();

        debug!(
            candidates,
            retained = observations.len(),
            skipped_windows = merged.skipped_windows,
            "occurrence index built"
        );

        Self {
            observations,
            skipped_windows: merged.skipped_windows,
        }
    }

    /// Number of surviving motifs.
    pub(crate) fn len(&self) -> usize {
        self.observations.len()
    }

    /// Advisory count of windows skipped over non-alphabet characters.
    pub(crate) fn skipped_windows(&self) -> u64 {
        self.skipped_windows
    }

    /// Consume the index, yielding observations in motif order.
    pub(crate) fn into_observations(self) -> Vec<MotifObservation> {
        self.observations
    }
}
