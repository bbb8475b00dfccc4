//! Feature hash index.
//!
//! Geometric hashing over point-pair signatures: each [`Signature`] maps to
//! the models that produced it, and each model to every pair/frame sample
//! that landed in that bin. Signatures are quantized, so unrelated geometry
//! shares bins; the index only guarantees that every stored sample
//! with a given signature is returned for it.
//!
//! The index is built once by a single writer and then shared read-only for
//! concurrent lookups.

mod build;
mod matching;

use hashbrown::HashMap;

use crate::feature::{PairFrame, Signature};
use crate::model::ModelId;

pub use build::IndexStats;
pub use matching::{Correspondence, MatchError};

/// Samples stored for one signature, keyed by model.
pub type ModelFrames = HashMap<ModelId, Vec<PairFrame>>;

#[derive(Debug, Default, Clone)]
pub struct FeatureHashIndex {
    buckets: HashMap<Signature, ModelFrames>,
}

impl FeatureHashIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `frames` under `model_id` in the bucket for `signature`.
    ///
    /// Existing samples are never replaced; repeated inserts accumulate.
    pub fn insert<I>(&mut self, signature: Signature, model_id: &ModelId, frames: I)
    where
        I: IntoIterator<Item = PairFrame>,
    {
        let bucket = self.buckets.entry(signature).or_default();
        match bucket.get_mut(model_id) {
            Some(stored) => stored.extend(frames),
            None => {
                bucket.insert(model_id.clone(), frames.into_iter().collect());
            }
        }
    }

    /// Every model that produced `signature`, with all of its samples.
    /// Yields nothing for an unknown signature.
    pub fn lookup(&self, signature: &Signature) -> impl Iterator<Item = (&ModelId, &[PairFrame])> {
        self.buckets
            .get(signature)
            .into_iter()
            .flat_map(|models| models.iter().map(|(id, frames)| (id, frames.as_slice())))
    }

    /// Samples of a single model for `signature`.
    pub fn find_model(&self, signature: &Signature, model_id: &ModelId) -> Option<&[PairFrame]> {
        self.buckets
            .get(signature)?
            .get(model_id)
            .map(|frames| frames.as_slice())
    }

    pub fn contains(&self, signature: &Signature) -> bool {
        self.buckets.contains_key(signature)
    }

    /// Number of distinct signatures.
    pub fn signature_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of stored samples across all signatures and models.
    pub fn frame_count(&self) -> usize {
        self.buckets
            .values()
            .flat_map(|models| models.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Distinct models present in the index, sorted.
    pub fn models(&self) -> Vec<&ModelId> {
        let mut models: Vec<&ModelId> = self
            .buckets
            .values()
            .flat_map(|models| models.keys())
            .collect();
        models.sort();
        models.dedup();
        models
    }
}
