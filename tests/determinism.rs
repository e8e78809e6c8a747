use std::collections::HashSet;

use blake3::hash;

use aptamotif::{AnalysisConfig, MotifAnalyzer, SequenceCorpus};

mod common;
use common::{planted_corpus, random_corpus};

fn fingerprint(corpus: &SequenceCorpus, config: AnalysisConfig) -> blake3::Hash {
    let analyzer = MotifAnalyzer::new(config).expect("configuration is valid");
    let report = analyzer.analyze(corpus).expect("analysis succeeds");
    hash(report.render_tsv().as_bytes())
}

#[test]
fn repeated_runs_produce_identical_reports() {
    let mut fingerprints = HashSet::new();
    for _ in 0..5 {
        // Rebuild the corpus and analyzer each round so no state can leak
        // between runs.
        let config = AnalysisConfig {
            min_motif_length: 4,
            max_motif_length: 8,
            ..AnalysisConfig::default()
        };
        fingerprints.insert(fingerprint(&planted_corpus(), config));
    }
    assert_eq!(fingerprints.len(), 1, "outputs diverged across runs");
}

#[test]
fn determinism_holds_on_random_corpora() {
    for seed in [7_u64, 42, 1234] {
        let mut fingerprints = HashSet::new();
        for _ in 0..3 {
            let corpus = random_corpus(seed, 30, 25);
            let config = AnalysisConfig {
                min_motif_length: 5,
                max_motif_length: 6,
                ..AnalysisConfig::default()
            };
            fingerprints.insert(fingerprint(&corpus, config));
        }
        assert_eq!(
            fingerprints.len(),
            1,
            "outputs diverged across runs for seed {seed}"
        );
    }
}
