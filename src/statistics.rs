//! Significance scoring under a random-sequence null model, plus
//! Benjamini–Hochberg multiple-testing correction.
//!
//! For a motif of length `k` the null model supplies the probability that
//! one fixed window position holds that exact motif. The per-sequence
//! occurrence probability follows from the mean usable-window count, and the
//! reported p-value is the one-sided binomial upper tail over the corpus:
//! enrichment only, never depletion.

use rayon::prelude::*;
use statrs::distribution::{Binomial, DiscreteCDF};
use tracing::debug;

use crate::corpus::SequenceCorpus;
use crate::occurrence::MotifObservation;

/// Null-model probability of a motif occupying one fixed window position.
///
/// The pipeline defaults to [`UniformNull`]; swapping the model changes only
/// this per-position probability, never the test itself.
pub trait NullModel: Sync {
    /// Probability that one window position holds exactly `motif`.
    fn motif_probability(&self, motif: &str) -> f64;
}

/// Uniform base composition: every base has probability `1/alphabet_size`.
#[derive(Debug, Clone, Copy)]
pub struct UniformNull {
    alphabet_size: usize,
}

impl UniformNull {
    /// Uniform null over an alphabet of the given size.
    pub fn new(alphabet_size: usize) -> Self {
        Self { alphabet_size }
    }
}

impl NullModel for UniformNull {
    fn motif_probability(&self, motif: &str) -> f64 {
        (1.0 / self.alphabet_size as f64).powi(motif.len() as i32)
    }
}

/// GC-aware base composition: G and C each carry probability `gc/2`, A and T
/// each `(1 - gc)/2`. Useful when the selected pool drifts away from
/// uniform base usage.
#[derive(Debug, Clone, Copy)]
pub struct GcAwareNull {
    gc_fraction: f64,
}

impl GcAwareNull {
    /// GC-aware null with the given G+C fraction, clamped to `[0, 1]`.
    pub fn new(gc_fraction: f64) -> Self {
        Self {
            gc_fraction: gc_fraction.clamp(0.0, 1.0),
        }
    }

    /// GC-aware null fitted to the corpus-wide mean GC fraction.
    pub fn from_corpus(corpus: &SequenceCorpus) -> Self {
        Self::new(corpus.gc_fraction())
    }
}

impl NullModel for GcAwareNull {
    fn motif_probability(&self, motif: &str) -> f64 {
        let p_gc = self.gc_fraction / 2.0;
        let p_at = (1.0 - self.gc_fraction) / 2.0;
        motif
            .bytes()
            .map(|base| match base {
                b'G' | b'C' => p_gc,
                b'A' | b'T' => p_at,
                _ => 0.0,
            })
            .product()
    }
}

/// A motif observation with its raw significance statistics.
#[derive(Debug, Clone)]
pub(crate) struct ScoredMotif {
    pub(crate) observation: MotifObservation,
    pub(crate) expected_count: f64,
    pub(crate) p_value: f64,
}

/// A scored motif after multiple-testing correction.
#[derive(Debug, Clone)]
pub(crate) struct CorrectedMotif {
    pub(crate) observation: MotifObservation,
    pub(crate) expected_count: f64,
    pub(crate) p_value: f64,
    pub(crate) adjusted_p_value: f64,
}

/// Probability that a motif with per-position probability `p_pos` occurs at
/// least once among `windows` usable positions: `1 - (1 - p_pos)^windows`,
/// evaluated in log space so small `p_pos` does not underflow.
fn sequence_probability(p_pos: f64, windows: f64) -> f64 {
    if windows <= 0.0 || p_pos <= 0.0 {
        return 0.0;
    }
    if p_pos >= 1.0 {
        return 1.0;
    }
    (-(windows * (-p_pos).ln_1p()).exp_m1()).min(1.0)
}

/// One-sided upper tail `P(X >= observed)` for `X ~ Binomial(n, p)`.
///
/// An underflowed tail is clamped to the smallest positive `f64` so strict
/// ordering survives into the correction step.
fn binomial_survival(observed: u64, n: u64, p: f64) -> f64 {
    if observed == 0 {
        return 1.0;
    }
    let Ok(binomial) = Binomial::new(p.clamp(0.0, 1.0), n) else {
        return 1.0;
    };
    let tail = binomial.sf(observed - 1);
    if tail <= 0.0 {
        f64::MIN_POSITIVE
    } else {
        tail.min(1.0)
    }
}

/// Score one observation against the null model.
///
/// When the motif is longer than any usable window (`p_seq = 0`) there is no
/// evidence either way: the p-value is exactly 1 and the expected count 0.
pub(crate) fn score_observation(
    observation: MotifObservation,
    corpus: &SequenceCorpus,
    model: &dyn NullModel,
) -> ScoredMotif {
    let k = observation.motif.len();
    let num_sequences = corpus.len();
    let windows = (corpus.mean_region_length() - k as f64 + 1.0).max(0.0);

    let p_pos = model.motif_probability(&observation.motif).clamp(0.0, 1.0);
    let p_seq = sequence_probability(p_pos, windows);
    let expected_count = p_seq * num_sequences as f64;
    let p_value = if p_seq <= 0.0 {
        1.0
    } else {
        binomial_survival(observation.count() as u64, num_sequences as u64, p_seq)
    };

    ScoredMotif {
        observation,
        expected_count,
        p_value,
    }
}

/// Score every observation. Scoring is independent per motif and runs in
/// parallel; output order follows input order.
pub(crate) fn score_observations(
    observations: Vec<MotifObservation>,
    corpus: &SequenceCorpus,
    model: &dyn NullModel,
) -> Vec<ScoredMotif> {
    let scored: Vec<ScoredMotif> = observations
        .into_par_iter()
        .map(|observation| score_observation(observation, corpus, model))
        .collect();
    debug!(motifs = scored.len(), "significance scoring complete");
    scored
}

/// Benjamini–Hochberg correction over the full set of tested motifs.
///
/// Candidates are ranked ascending by raw p-value (ties broken by motif
/// string), assigned `p * m / rank`, then forced non-increasing from the
/// bottom rank upward and clipped at 1. The returned vector is in rank
/// order; every adjusted value is >= its raw p-value.
pub(crate) fn benjamini_hochberg(mut scored: Vec<ScoredMotif>) -> Vec<CorrectedMotif> {
    scored.sort_by(|a, b| {
        a.p_value
            .total_cmp(&b.p_value)
            .then_with(|| a.observation.motif.cmp(&b.observation.motif))
    });

    let m = scored.len();
    let mut running = 1.0_f64;
    let mut adjusted = vec![0.0_f64; m];
    for rank in (1..=m).rev() {
        let raw_adjusted = scored[rank - 1].p_value * m as f64 / rank as f64;
        running = running.min(raw_adjusted);
        adjusted[rank - 1] = running;
    }

    scored
        .into_iter()
        .zip(adjusted)
        .map(|(motif, adjusted_p_value)| CorrectedMotif {
            observation: motif.observation,
            expected_count: motif.expected_count,
            p_value: motif.p_value,
            adjusted_p_value,
        })
        .collect()
}
