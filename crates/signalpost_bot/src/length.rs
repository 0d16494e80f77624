//! Weighted choice of the generated copy's target length.

use crate::LengthBucket;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

/// A drawn target length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthChoice {
    /// Target length in characters
    pub length: u32,
    /// Whether this is the longest bucket, which is rationed to once a day
    pub is_largest: bool,
}

/// Draw a target length from `buckets`.
///
/// The longest bucket is left out when it was already used today. If that
/// leaves nothing to draw from, it stays in. Returns `None` only for an empty
/// bucket list.
pub fn choose_length<R: Rng + ?Sized>(
    buckets: &[LengthBucket],
    largest_used_today: bool,
    rng: &mut R,
) -> Option<LengthChoice> {
    let largest = buckets.iter().map(|b| b.length).max()?;

    let mut candidates: Vec<&LengthBucket> = buckets
        .iter()
        .filter(|b| !(largest_used_today && b.length == largest))
        .collect();
    if candidates.is_empty() {
        candidates = buckets.iter().collect();
    }

    let index = WeightedIndex::new(candidates.iter().map(|b| b.weight)).ok()?;
    let length = candidates[index.sample(rng)].length;
    Some(LengthChoice {
        length,
        is_largest: length == largest,
    })
}
