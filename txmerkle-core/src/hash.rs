use crate::digest::Digest;
use sha2::{Digest as _, Sha256};

/// SHA-256 applied twice. Operates on the raw bytes as given; no byte-order
/// normalization happens here.
pub fn double_hash(data: &[u8]) -> Digest {
    let first = Sha256::digest(data);
    Digest::from_internal(Sha256::digest(first).into())
}

/// Parent of two nodes: `double_hash(left || right)`, both in internal order.
pub fn hash_pair(left: &Digest, right: &Digest) -> Digest {
    let mut cat = [0u8; 64];
    cat[..32].copy_from_slice(left.as_bytes());
    cat[32..].copy_from_slice(right.as_bytes());
    double_hash(&cat)
}
