//! Level-by-level reduction of transaction digests to a Merkle root.
//!
//! Nodes are paired left to right and each pair is replaced by
//! `double_hash(left || right)`. When a level has an odd number of nodes the
//! last one is paired with itself. That rule is applied afresh on every
//! level, so a duplicated node can be duplicated again higher up. This is
//! the Bitcoin behaviour; some other Merkle implementations promote the
//! lone node instead, and roots will differ from those.

use crate::digest::Digest;
use crate::error::{MerkleError, Result};
use crate::hash::hash_pair;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// One tier of the tree. Level 0 holds the leaves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Level {
    pub index: usize,
    pub nodes: Vec<Digest>,
}

/// A single pairwise combination, with every digest in display order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairStep {
    /// Level the two children live on.
    pub level: usize,
    /// Zero-based position of the pair within its level.
    pub pair: usize,
    pub left: String,
    pub right: String,
    pub parent: String,
    /// `right` is a copy of `left` because the level had odd length.
    pub duplicated: bool,
}

/// Root plus the full trace of how it was reached. Serialize-only: the
/// readable form is [`MerkleReport`](crate::report::MerkleReport).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reduction {
    pub root: Digest,
    pub levels: Vec<Level>,
    pub steps: Vec<PairStep>,
}

impl Reduction {
    pub fn root_hex(&self) -> String {
        self.root.to_display_hex()
    }

    /// Number of hashing rounds performed; zero for a single leaf.
    pub fn depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, |l| l.nodes.len())
    }

    pub fn steps_at(&self, level: usize) -> impl Iterator<Item = &PairStep> {
        self.steps.iter().filter(move |s| s.level == level)
    }
}

/// Reduce `leaves` (internal order) to a root, recording every level and pair.
pub fn reduce(leaves: &[Digest]) -> Result<Reduction> {
    if leaves.is_empty() {
        return Err(MerkleError::EmptyInput);
    }
    let mut levels = vec![Level { index: 0, nodes: leaves.to_vec() }];
    let mut steps = Vec::with_capacity(leaves.len());
    loop {
        let current = &levels[levels.len() - 1];
        if current.nodes.len() <= 1 {
            break;
        }
        let (next, level_steps) = reduce_level(current);
        steps.extend(level_steps);
        levels.push(next);
    }
    let root = levels[levels.len() - 1].nodes[0];
    debug!(leaves = leaves.len(), depth = levels.len() - 1, root = %root, "merkle root computed");
    Ok(Reduction { root, levels, steps })
}

fn reduce_level(level: &Level) -> (Level, Vec<PairStep>) {
    let nodes = &level.nodes;
    debug!(
        level = level.index,
        width = nodes.len(),
        duplicated = nodes.len() % 2 == 1,
        "reducing level"
    );
    let mut next = Vec::with_capacity(nodes.len().div_ceil(2));
    let mut steps = Vec::with_capacity(nodes.len().div_ceil(2));
    for (pair, (left, right, duplicated)) in pairs(nodes).enumerate() {
        let parent = hash_pair(&left, &right);
        trace!(level = level.index, pair, %left, %right, %parent, "pair");
        steps.push(PairStep {
            level: level.index,
            pair,
            left: left.to_display_hex(),
            right: right.to_display_hex(),
            parent: parent.to_display_hex(),
            duplicated,
        });
        next.push(parent);
    }
    (Level { index: level.index + 1, nodes: next }, steps)
}

/// Left-to-right pairs of a level. An unpaired last node is paired with
/// itself and flagged.
fn pairs(nodes: &[Digest]) -> impl Iterator<Item = (Digest, Digest, bool)> + '_ {
    nodes.chunks(2).map(|chunk| {
        let left = chunk[0];
        match chunk.get(1) {
            Some(&right) => (left, right, false),
            None => (left, left, true),
        }
    })
}

/// Parents of one level, without tracing.
pub fn next_level(nodes: &[Digest]) -> Vec<Digest> {
    pairs(nodes).map(|(l, r, _)| hash_pair(&l, &r)).collect()
}

/// Root only, without building a trace.
pub fn root(leaves: &[Digest]) -> Result<Digest> {
    if leaves.is_empty() {
        return Err(MerkleError::EmptyInput);
    }
    let mut layer = leaves.to_vec();
    while layer.len() > 1 {
        layer = next_level(&layer);
    }
    Ok(layer[0])
}

/// Parse display-order hex strings into internal-order leaves.
/// The first bad entry is reported with its position.
pub fn parse_leaves<S: AsRef<str>>(hexes: &[S]) -> Result<Vec<Digest>> {
    hexes
        .iter()
        .enumerate()
        .map(|(index, h)| {
            Digest::from_display_hex(h.as_ref())
                .map_err(|e| MerkleError::InvalidLeaf { index, source: Box::new(e) })
        })
        .collect()
}

/// Display-order hex in, root out.
pub fn root_from_hex<S: AsRef<str>>(hexes: &[S]) -> Result<Digest> {
    root(&parse_leaves(hexes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::double_hash;

    fn leaf(n: u8) -> Digest {
        double_hash(&[n])
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(reduce(&[]).unwrap_err(), MerkleError::EmptyInput);
        assert_eq!(root(&[]).unwrap_err(), MerkleError::EmptyInput);
    }

    #[test]
    fn single_leaf_is_its_own_root() {
        let d = leaf(1);
        let r = reduce(&[d]).unwrap();
        assert_eq!(r.root, d);
        assert_eq!(r.depth(), 0);
        assert_eq!(r.levels.len(), 1);
        assert!(r.steps.is_empty());
    }

    #[test]
    fn two_leaves_make_one_pair() {
        let (a, b) = (leaf(1), leaf(2));
        let r = reduce(&[a, b]).unwrap();
        assert_eq!(r.root, hash_pair(&a, &b));
        assert_eq!(r.steps.len(), 1);
        assert_eq!(r.steps[0].level, 0);
        assert!(!r.steps[0].duplicated);
        assert_eq!(r.steps[0].left, a.to_display_hex());
        assert_eq!(r.steps[0].parent, r.root_hex());
    }

    #[test]
    fn odd_level_duplicates_last_node() {
        let (a, b, c) = (leaf(1), leaf(2), leaf(3));
        let r = reduce(&[a, b, c]).unwrap();
        let ab = hash_pair(&a, &b);
        let cc = hash_pair(&c, &c);
        assert_eq!(r.levels[1].nodes, vec![ab, cc]);
        assert_eq!(r.root, hash_pair(&ab, &cc));
        let dup: Vec<_> = r.steps_at(0).filter(|s| s.duplicated).collect();
        assert_eq!(dup.len(), 1);
        assert_eq!(dup[0].left, dup[0].right);
        assert_eq!(dup[0].pair, 1);
    }

    #[test]
    fn duplication_reapplies_on_higher_levels() {
        // 5 leaves: widths 5 -> 3 -> 2 -> 1, odd at levels 0 and 1.
        let leaves: Vec<_> = (0..5).map(leaf).collect();
        let r = reduce(&leaves).unwrap();
        let widths: Vec<_> = r.levels.iter().map(|l| l.nodes.len()).collect();
        assert_eq!(widths, vec![5, 3, 2, 1]);
        let dup_levels: Vec<_> = r.steps.iter().filter(|s| s.duplicated).map(|s| s.level).collect();
        assert_eq!(dup_levels, vec![0, 1]);

        let l1_last = hash_pair(&leaves[4], &leaves[4]);
        assert_eq!(r.levels[1].nodes[2], l1_last);
        assert_eq!(r.levels[2].nodes[1], hash_pair(&l1_last, &l1_last));
    }

    #[test]
    fn trace_and_plain_root_agree() {
        for n in 1..=17u8 {
            let leaves: Vec<_> = (0..n).map(leaf).collect();
            assert_eq!(reduce(&leaves).unwrap().root, root(&leaves).unwrap(), "n={n}");
        }
    }

    #[test]
    fn next_level_pairs_and_duplicates() {
        let (a, b, c) = (leaf(1), leaf(2), leaf(3));
        assert_eq!(next_level(&[a, b]), vec![hash_pair(&a, &b)]);
        assert_eq!(next_level(&[a, b, c]), vec![hash_pair(&a, &b), hash_pair(&c, &c)]);
        assert!(next_level(&[]).is_empty());
    }

    #[test]
    fn hand_built_reduction_without_levels_does_not_panic() {
        let r = Reduction { root: leaf(1), levels: vec![], steps: vec![] };
        assert_eq!(r.depth(), 0);
        assert_eq!(r.leaf_count(), 0);
        assert_eq!(r.steps_at(0).count(), 0);
    }

    #[test]
    fn caller_leaves_are_untouched() {
        let leaves: Vec<_> = (0..4).map(leaf).collect();
        let copy = leaves.clone();
        let _ = reduce(&leaves).unwrap();
        assert_eq!(leaves, copy);
    }

    #[test]
    fn parse_leaves_reports_position() {
        let good = leaf(9).to_display_hex();
        let err = parse_leaves(&[good.as_str(), "xyz"]).unwrap_err();
        assert!(matches!(err, MerkleError::InvalidLeaf { index: 1, .. }));
        assert!(err.is_format_error());
        assert_eq!(err.input(), Some("xyz"));
    }
}
