//! Sliding-window k-mer enumeration over random regions.
//!
//! A window is counted once per sequence (presence, not multiplicity), and a
//! window containing any byte outside uppercase A/C/G/T is skipped rather
//! than treated as an error. Skips are tallied so the caller can surface an
//! advisory diagnostic.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::corpus::SequenceCorpus;

fn is_base(byte: u8) -> bool {
    matches!(byte, b'A' | b'C' | b'G' | b'T')
}

/// Distinct valid windows of one sequence, across all configured lengths.
#[derive(Debug, Default)]
pub(crate) struct WindowScan {
    pub(crate) motifs: BTreeSet<String>,
    pub(crate) skipped_windows: u64,
}

/// Enumerate every distinct valid window of each length in
/// `min_len..=max_len`. Runs in O(region length) per length: the scan tracks
/// the most recent invalid byte, so each window is validated in constant time.
pub(crate) fn scan_sequence(region: &str, min_len: usize, max_len: usize) -> WindowScan {
    let bytes = region.as_bytes();
    let mut scan = WindowScan::default();

    for k in min_len..=max_len {
        if k == 0 || bytes.len() < k {
            continue;
        }
        let mut last_invalid: Option<usize> = None;
        for (end, &byte) in bytes.iter().enumerate() {
            if !is_base(byte) {
                last_invalid = Some(end);
            }
            if end + 1 < k {
                continue;
            }
            let start = end + 1 - k;
            if last_invalid.is_some_and(|bad| bad >= start) {
                scan.skipped_windows += 1;
            } else {
                scan.motifs.insert(region[start..=end].to_owned());
            }
        }
    }

    scan
}

/// Every (overlapping) start offset of `motif` in each sequence that
/// contains it, keyed by sequence identifier. Sequences without an
/// occurrence are absent from the map. An empty motif yields an empty map.
pub fn motif_positions(corpus: &SequenceCorpus, motif: &str) -> BTreeMap<Arc<str>, Vec<usize>> {
    let mut positions = BTreeMap::new();
    if motif.is_empty() {
        return positions;
    }

    for record in corpus.records() {
        let region = record.random_region.as_ref();
        let mut offsets = Vec::new();
        let mut start = 0;
        while let Some(found) = region[start..].find(motif) {
            offsets.push(start + found);
            start += found + 1;
        }
        if !offsets.is_empty() {
            positions.insert(Arc::clone(&record.id), offsets);
        }
    }

    positions
}
