use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;

use crate::models::{ItemId, UserId, UserSignature};

use super::RatingIndex;

/// Modulus of the hash family, 2^31 - 1
const MERSENNE_PRIME: u64 = (1 << 31) - 1;

/// MinHash sketches of users' rated-item sets
///
/// Each of the `K` hash functions is `h(x) = (a * x + b) mod p` with `a` and
/// `b` drawn once from a seeded generator, so a given item set always yields
/// the same signature for the same seed.
#[derive(Debug, Clone)]
pub struct SignatureGenerator {
    coefficients: Vec<(u64, u64)>,
}

impl SignatureGenerator {
    pub fn new(hash_functions: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let coefficients = (0..hash_functions)
            .map(|_| {
                let a = rng.gen_range(1..MERSENNE_PRIME);
                let b = rng.gen_range(0..MERSENNE_PRIME);
                (a, b)
            })
            .collect();
        Self { coefficients }
    }

    pub fn hash_functions(&self) -> usize {
        self.coefficients.len()
    }

    /// Signature of one item set; every slot stays `u64::MAX` for an empty set
    pub fn signature(&self, items: impl IntoIterator<Item = ItemId> + Clone) -> UserSignature {
        self.coefficients
            .iter()
            .map(|&(a, b)| {
                items
                    .clone()
                    .into_iter()
                    .map(|item| (a * u64::from(item) + b) % MERSENNE_PRIME)
                    .min()
                    .unwrap_or(u64::MAX)
            })
            .collect()
    }

    /// Signatures for every user in the index
    pub fn generate(&self, index: &RatingIndex) -> HashMap<UserId, UserSignature> {
        let start = std::time::Instant::now();
        let signatures: HashMap<UserId, UserSignature> = index
            .users()
            .map(|(user_id, items)| (user_id, self.signature(items.keys().copied())))
            .collect();

        tracing::info!(
            users = signatures.len(),
            hash_functions = self.hash_functions(),
            elapsed_ms = start.elapsed().as_millis(),
            "User signatures generated"
        );
        signatures
    }
}

/// Estimated Jaccard similarity: the fraction of slots where two signatures agree
///
/// `None` when the signatures are empty or differ in length.
pub fn estimate_jaccard(a: &[u64], b: &[u64]) -> Option<f64> {
    if a.is_empty() || a.len() != b.len() {
        return None;
    }
    let agreeing = a.iter().zip(b).filter(|(x, y)| x == y).count();
    Some(agreeing as f64 / a.len() as f64)
}
