//! Statistical calibration: on uniform-random corpora the corrected
//! pipeline should flag essentially nothing at the default FDR threshold.

use aptamotif::{AnalysisConfig, MotifAnalyzer};

mod common;
use common::random_corpus;

#[test]
fn significant_fraction_stays_near_the_fdr_on_null_corpora() {
    let analyzer = MotifAnalyzer::new(AnalysisConfig {
        min_motif_length: 5,
        max_motif_length: 5,
        merge_overlapping: false,
        ..AnalysisConfig::default()
    })
    .expect("configuration is valid");

    let mut tested = 0_usize;
    let mut significant = 0_usize;
    for seed in 0..10_u64 {
        let corpus = random_corpus(seed, 50, 40);
        let report = analyzer.analyze(&corpus).expect("analysis succeeds");
        tested += report.tested_motifs();
        significant += report.significant().count();
    }

    assert!(tested > 1000, "calibration needs a meaningful test count");
    let fraction = significant as f64 / tested as f64;
    assert!(
        fraction <= 0.05,
        "random corpora produced {significant}/{tested} significant motifs ({fraction:.4})"
    );
}
