use crate::digest::Digest;
use crate::error::Result;
use crate::merkle;
use rayon::prelude::*;

/// Compute roots for many independent trees (e.g. one per block) in parallel.
/// Results come back in input order; one bad tree does not affect the others.
pub fn reduce_many<T>(trees: &[T]) -> Vec<Result<Digest>>
where
    T: AsRef<[Digest]> + Sync,
{
    trees.par_iter().map(|t| merkle::root(t.as_ref())).collect()
}
