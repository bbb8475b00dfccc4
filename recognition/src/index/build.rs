use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::RecognitionConfig;
use crate::feature::{compute_feature, PairFrame, PairRejection, Signature};
use crate::model::ModelId;
use crate::point::{OrientedPoint, PointPair};

use super::FeatureHashIndex;

/// Outcome counts for one [`FeatureHashIndex::index_model`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Unordered point pairs examined.
    pub pairs: usize,
    /// Samples added to the index.
    pub inserted: usize,
    /// Pairs whose points coincide.
    pub degenerate: usize,
    /// Pairs outside the configured distance range.
    pub out_of_range: usize,
    /// Pairs with a valid feature but no well-defined local frame.
    pub degenerate_frames: usize,
}

#[derive(Default)]
struct Counters {
    degenerate: AtomicUsize,
    out_of_range: AtomicUsize,
    degenerate_frames: AtomicUsize,
}

impl FeatureHashIndex {
    /// Decompose a model into point pairs and add every valid pair to the index.
    ///
    /// All unordered pairs `(i, j)` with `i < j` are considered; feature
    /// extraction puts each into canonical order before its frame is built.
    /// Pairs are processed per anchor point `i` on the rayon pool, with at
    /// most `config.max_anchors_in_flight` anchors at once. Insertion order
    /// is deterministic.
    pub fn index_model(
        &mut self,
        model_id: &ModelId,
        points: &[OrientedPoint],
        config: &RecognitionConfig,
    ) -> IndexStats {
        config.validate();

        let n = points.len();
        let min_sq = config.min_distance_sq();
        let max_sq = config.max_distance_sq();
        let step = config.angle_bins_per_radian;
        let counters = Counters::default();

        let samples: Vec<(Signature, PairFrame)> = common::parallel::par_flat_map_limited(
            n,
            config.max_anchors_in_flight,
            |i| {
                let mut out = Vec::new();
                for j in i + 1..n {
                    let mut pair = PointPair::new(points[i], points[j]);
                    let descriptor = match compute_feature(&mut pair, min_sq, max_sq) {
                        Ok(descriptor) => descriptor,
                        Err(PairRejection::Degenerate) => {
                            counters.degenerate.fetch_add(1, Ordering::Relaxed);
                            continue;
                        }
                        Err(PairRejection::OutOfRange { .. }) => {
                            counters.out_of_range.fetch_add(1, Ordering::Relaxed);
                            continue;
                        }
                    };
                    match PairFrame::from_pair(pair) {
                        Ok(sample) => out.push((descriptor.signature(step), sample)),
                        Err(err) => {
                            tracing::trace!(pair = %pair.describe(), %err, "Skipping pair");
                            counters.degenerate_frames.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
                out
            },
        );

        let stats = IndexStats {
            pairs: n * n.saturating_sub(1) / 2,
            inserted: samples.len(),
            degenerate: counters.degenerate.into_inner(),
            out_of_range: counters.out_of_range.into_inner(),
            degenerate_frames: counters.degenerate_frames.into_inner(),
        };

        for (signature, sample) in samples {
            self.insert(signature, model_id, std::iter::once(sample));
        }

        tracing::info!(
            model = %model_id.object_name(),
            points = n,
            pairs = stats.pairs,
            inserted = stats.inserted,
            degenerate = stats.degenerate,
            out_of_range = stats.out_of_range,
            degenerate_frames = stats.degenerate_frames,
            signatures = self.signature_count(),
            "Indexed model"
        );

        stats
    }
}
