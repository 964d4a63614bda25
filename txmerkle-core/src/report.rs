use crate::merkle::{PairStep, Reduction};
use serde::{Deserialize, Serialize};

/// Display-order summary of a reduction, for JSON output.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MerkleReport {
    pub leaf_count: usize,
    pub depth: usize,
    pub merkle_root_hex: String,
    pub levels: Vec<Vec<String>>,
    pub steps: Vec<PairStep>,
}

impl From<&Reduction> for MerkleReport {
    fn from(r: &Reduction) -> Self {
        Self {
            leaf_count: r.leaf_count(),
            depth: r.depth(),
            merkle_root_hex: r.root_hex(),
            levels: r
                .levels
                .iter()
                .map(|l| l.nodes.iter().map(|d| d.to_display_hex()).collect())
                .collect(),
            steps: r.steps.clone(),
        }
    }
}

impl MerkleReport {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
