pub mod batch;
pub mod digest;
pub mod error;
pub mod hash;
pub mod merkle;
pub mod report;
pub mod verify;

pub use digest::Digest;
pub use error::{MerkleError, Result};
