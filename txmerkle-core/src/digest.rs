//! 32-byte digests and the two byte orders they travel in.
//!
//! Hashing always works on *internal* order. Humans, block explorers and
//! RPC interfaces print the same bytes reversed (*display* order). A
//! [`Digest`] always holds internal order; the hex helpers convert at the
//! edges.

use crate::error::{MerkleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DIGEST_LEN: usize = 32;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Wrap bytes that are already in internal order.
    pub const fn from_internal(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a display-order hex string and reverse it into internal order.
    pub fn from_display_hex(s: &str) -> Result<Self> {
        let mut bytes = hex::decode(s)
            .map_err(|source| MerkleError::InvalidHex { input: s.to_string(), source })?;
        if bytes.len() != DIGEST_LEN {
            return Err(MerkleError::InvalidLength { input: s.to_string(), len: bytes.len() });
        }
        bytes.reverse();
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }

    /// Reverse back to display order and hex-encode (lowercase).
    pub fn to_display_hex(&self) -> String {
        let mut rev = self.0;
        rev.reverse();
        hex::encode(rev)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_display_hex())
    }
}

impl FromStr for Digest {
    type Err = MerkleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_display_hex(s)
    }
}

impl TryFrom<String> for Digest {
    type Error = MerkleError;

    fn try_from(s: String) -> Result<Self> {
        Self::from_display_hex(&s)
    }
}

impl From<Digest> for String {
    fn from(d: Digest) -> String {
        d.to_display_hex()
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
