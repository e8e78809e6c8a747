//! Redundancy resolution among overlapping candidate motifs.
//!
//! Two passes run after statistics are computed. The subsumption pass drops
//! any motif that is a contiguous substring of a retained longer motif and
//! whose support set adds no discriminating information (a subset of the
//! longer motif's support). The optional merge pass consolidates motifs with
//! identical support whose strings overlap suffix-to-prefix into a single
//! consensus candidate. Neither pass adds hypotheses to the correction: the
//! BH denominator is fixed before this module runs.

use itertools::Itertools;
use tracing::debug;

use crate::corpus::SequenceCorpus;
use crate::occurrence::MotifObservation;
use crate::statistics::{self, CorrectedMotif, NullModel};
use crate::AnalysisConfig;

/// True when every element of `sub` occurs in `sup`; both slices sorted.
fn is_subset(sub: &[u32], sup: &[u32]) -> bool {
    let mut sup_iter = sup.iter();
    sub.iter()
        .all(|needle| sup_iter.any(|candidate| candidate == needle))
}

/// Longest suffix of `left` equal to a prefix of `right`, at least
/// `min_overlap` long and strictly shorter than both strings.
fn suffix_prefix_overlap(left: &str, right: &str, min_overlap: usize) -> Option<usize> {
    let longest = left.len().min(right.len()).saturating_sub(1);
    (min_overlap.max(1)..=longest)
        .rev()
        .find(|&overlap| left[left.len() - overlap..] == right[..overlap])
}

/// Drop motifs subsumed by a retained longer motif. Candidates are
/// processed longest-first, ties broken lexicographically.
fn drop_subsumed(mut candidates: Vec<CorrectedMotif>) -> Vec<CorrectedMotif> {
    candidates.sort_by(|a, b| {
        b.observation
            .motif
            .len()
            .cmp(&a.observation.motif.len())
            .then_with(|| a.observation.motif.cmp(&b.observation.motif))
    });

    let mut retained: Vec<CorrectedMotif> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let subsumed = retained.iter().any(|kept| {
            kept.observation.motif.len() > candidate.observation.motif.len()
                && kept.observation.motif.contains(&candidate.observation.motif)
                && is_subset(
                    &candidate.observation.sequence_ids,
                    &kept.observation.sequence_ids,
                )
        });
        if !subsumed {
            retained.push(candidate);
        }
    }
    retained
}

/// The best applicable merge among the candidates: indices of the left and
/// right constituents plus the merged string. Longest overlap wins; ties
/// fall to the lexicographically smaller merged string.
fn find_best_merge(
    candidates: &[CorrectedMotif],
    min_overlap: usize,
) -> Option<(usize, usize, String)> {
    let mut best: Option<(usize, usize, String, usize)> = None;

    for ((i, a), (j, b)) in candidates.iter().enumerate().tuple_combinations() {
        if a.observation.sequence_ids != b.observation.sequence_ids {
            continue;
        }
        for (left_index, right_index) in [(i, j), (j, i)] {
            let left = &candidates[left_index].observation.motif;
            let right = &candidates[right_index].observation.motif;
            let Some(overlap) = suffix_prefix_overlap(left, right, min_overlap) else {
                continue;
            };
            let merged = format!("{left}{}", &right[overlap..]);
            if candidates
                .iter()
                .any(|existing| existing.observation.motif == merged)
            {
                continue;
            }
            let better = match &best {
                None => true,
                Some((_, _, best_merged, best_overlap)) => {
                    overlap > *best_overlap || (overlap == *best_overlap && merged < *best_merged)
                }
            };
            if better {
                best = Some((left_index, right_index, merged, overlap));
            }
        }
    }

    best.map(|(left, right, merged, _)| (left, right, merged))
}

/// Re-score a merged consensus at its new length and inherit the more
/// conservative adjusted p-value of its constituents, floored at the
/// re-scored raw p-value so `adjusted >= raw` is preserved.
fn rescore_merged(
    merged_motif: String,
    left: &CorrectedMotif,
    right: &CorrectedMotif,
    corpus: &SequenceCorpus,
    model: &dyn NullModel,
) -> CorrectedMotif {
    let observation = MotifObservation {
        motif: merged_motif,
        sequence_ids: left.observation.sequence_ids.clone(),
    };
    let rescored = statistics::score_observation(observation, corpus, model);
    let adjusted_p_value = left
        .adjusted_p_value
        .max(right.adjusted_p_value)
        .max(rescored.p_value);

    CorrectedMotif {
        observation: rescored.observation,
        expected_count: rescored.expected_count,
        p_value: rescored.p_value,
        adjusted_p_value,
    }
}

/// Merge identical-support overlapping motifs until no pair qualifies.
fn merge_overlapping(
    mut candidates: Vec<CorrectedMotif>,
    corpus: &SequenceCorpus,
    model: &dyn NullModel,
    min_overlap: usize,
) -> Vec<CorrectedMotif> {
    loop {
        candidates.sort_by(|a, b| a.observation.motif.cmp(&b.observation.motif));
        let Some((left_index, right_index, merged_motif)) =
            find_best_merge(&candidates, min_overlap)
        else {
            return candidates;
        };

        let merged = rescore_merged(
            merged_motif,
            &candidates[left_index],
            &candidates[right_index],
            corpus,
            model,
        );
        debug!(motif = %merged.observation.motif, "merged overlapping motifs");

        let (first, second) = if left_index < right_index {
            (left_index, right_index)
        } else {
            (right_index, left_index)
        };
        candidates.remove(second);
        candidates.remove(first);
        candidates.push(merged);
    }
}

/// Apply the full redundancy policy: subsumption drop, then (if enabled)
/// overlap merging to a fixpoint, then a final subsumption pass so merged
/// consensus motifs also absorb the fragments they now cover.
pub(crate) fn resolve(
    candidates: Vec<CorrectedMotif>,
    corpus: &SequenceCorpus,
    model: &dyn NullModel,
    config: &AnalysisConfig,
) -> Vec<CorrectedMotif> {
    let before = candidates.len();
    let mut retained = drop_subsumed(candidates);

    if config.merge_overlapping {
        retained = merge_overlapping(retained, corpus, model, config.effective_merge_overlap());
        retained = drop_subsumed(retained);
    }

    debug!(before, after = retained.len(), "redundancy resolved");
    retained
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::SequenceCorpus;
    use crate::statistics::UniformNull;
    use test_case::test_case;

    fn corrected(motif: &str, ids: &[u32]) -> CorrectedMotif {
        CorrectedMotif {
            observation: MotifObservation {
                motif: motif.to_owned(),
                sequence_ids: ids.to_vec(),
            },
            expected_count: 0.5,
            p_value: 0.01,
            adjusted_p_value: 0.02,
        }
    }

    fn corpus() -> SequenceCorpus {
        SequenceCorpus::from_pairs([("s1", "CCTATGGAC"), ("s2", "CCTATGGTT")]).expect("unique ids")
    }

    fn config(merge: bool, min_overlap: usize) -> AnalysisConfig {
        AnalysisConfig {
            merge_overlapping: merge,
            merge_overlap_min_length: Some(min_overlap),
            ..AnalysisConfig::default()
        }
    }

    #[test_case(&[0, 1], &[0, 1, 2], true ; "strict subset")]
    #[test_case(&[0, 1], &[0, 1], true ; "equal sets")]
    #[test_case(&[0, 3], &[0, 1, 2], false ; "disjoint element")]
    #[test_case(&[], &[0], true ; "empty subset")]
    fn subset_test(sub: &[u32], sup: &[u32], expected: bool) {
        assert_eq!(is_subset(sub, sup), expected);
    }

    #[test_case("CCTAT", "TATGG", 1, Some(3) ; "three base overlap")]
    #[test_case("CCTAT", "TATGG", 4, None ; "below minimum")]
    #[test_case("AAAA", "AAAA", 1, Some(3) ; "self overlap capped below length")]
    #[test_case("ACGT", "TTTT", 1, Some(1) ; "single base")]
    #[test_case("ACGT", "CCCC", 1, None ; "no overlap")]
    fn overlap_detection(left: &str, right: &str, min: usize, expected: Option<usize>) {
        assert_eq!(suffix_prefix_overlap(left, right, min), expected);
    }

    #[test]
    fn substring_with_subset_support_is_dropped() {
        let kept = resolve(
            vec![corrected("GGATCC", &[0, 1]), corrected("GATCC", &[0])],
            &corpus(),
            &UniformNull::new(4),
            &config(false, 3),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].observation.motif, "GGATCC");
    }

    #[test]
    fn substring_with_extra_support_is_kept() {
        // GATCC occurs in a sequence the longer motif does not cover.
        let kept = resolve(
            vec![corrected("GGATCC", &[0, 1]), corrected("GATCC", &[0, 2])],
            &corpus(),
            &UniformNull::new(4),
            &config(false, 3),
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn non_substring_is_kept() {
        let kept = resolve(
            vec![corrected("GGATCC", &[0, 1]), corrected("TTTTT", &[0])],
            &corpus(),
            &UniformNull::new(4),
            &config(false, 3),
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn identical_support_overlapping_motifs_merge() {
        let kept = resolve(
            vec![corrected("CCTAT", &[0, 1]), corrected("TATGG", &[0, 1])],
            &corpus(),
            &UniformNull::new(4),
            &config(true, 3),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].observation.motif, "CCTATGG");
        assert_eq!(kept[0].observation.sequence_ids, vec![0, 1]);
        assert!(kept[0].adjusted_p_value >= kept[0].p_value);
    }

    #[test]
    fn merge_respects_minimum_overlap() {
        let kept = resolve(
            vec![corrected("CCTAT", &[0, 1]), corrected("TATGG", &[0, 1])],
            &corpus(),
            &UniformNull::new(4),
            &config(true, 4),
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn merge_requires_identical_support() {
        let kept = resolve(
            vec![corrected("CCTAT", &[0, 1]), corrected("TATGG", &[0])],
            &corpus(),
            &UniformNull::new(4),
            &config(true, 3),
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn merge_chain_converges_to_single_consensus() {
        let kept = resolve(
            vec![
                corrected("CCTAT", &[0, 1]),
                corrected("CTATG", &[0, 1]),
                corrected("TATGG", &[0, 1]),
            ],
            &corpus(),
            &UniformNull::new(4),
            &config(true, 3),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].observation.motif, "CCTATGG");
    }
}
