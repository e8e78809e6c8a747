use aptamotif::SequenceCorpus;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

const BASES: [char; 4] = ['A', 'C', 'G', 'T'];

/// Route pipeline tracing to the test writer when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Corpus with a planted GGATCC motif in most records, plus unrelated
/// background sequence and one record carrying an ambiguous base.
pub fn planted_corpus() -> SequenceCorpus {
    SequenceCorpus::from_pairs([
        ("clone-01", "TTACGGATCCTTGAACCAGT"),
        ("clone-02", "GGATCCTTAACCGGTTAACC"),
        ("clone-03", "ACACACGGATCCGTGTGTGT"),
        ("clone-04", "TTTTGGATCCAAAACCCGGG"),
        ("clone-05", "CAGTNGGATCCTTACGATCA"),
        ("clone-06", "ACGTACGTACGTACGTACGT"),
        ("clone-07", "TTTTTTTTTTTTTTTTTTTT"),
        ("clone-08", "CCCGGGTTTAAACCCGGGTT"),
    ])
    .expect("identifiers are unique")
}

/// Corpus of uniform-random sequences for null-model calibration.
pub fn random_corpus(seed: u64, num_sequences: usize, region_length: usize) -> SequenceCorpus {
    let mut rng = StdRng::seed_from_u64(seed);
    let pairs: Vec<(String, String)> = (0..num_sequences)
        .map(|index| {
            let region: String = (0..region_length)
                .map(|_| BASES[rng.random_range(0..BASES.len())])
                .collect();
            (format!("seq-{index:03}"), region)
        })
        .collect();
    SequenceCorpus::from_pairs(pairs).expect("identifiers are unique")
}
