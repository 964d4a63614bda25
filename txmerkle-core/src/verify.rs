use crate::digest::Digest;
use crate::error::Result;
use crate::merkle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    pub leaf_count: usize,
    pub computed: Digest,
    pub expected: Digest,
    pub merkle_ok: bool,
}

/// Recompute the root over `leaves` and compare against a claimed
/// display-order root.
pub fn verify_root(leaves: &[Digest], expected_hex: &str) -> Result<VerifyReport> {
    let expected = Digest::from_display_hex(expected_hex)?;
    let computed = merkle::root(leaves)?;
    Ok(VerifyReport { leaf_count: leaves.len(), computed, expected, merkle_ok: computed == expected })
}
