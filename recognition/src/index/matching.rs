use glam::Mat4;
use thiserror::Error;

use crate::config::RecognitionConfig;
use crate::feature::{compute_feature, FrameError, LocalFrame, PairFrame, PairRejection};
use crate::model::ModelId;
use crate::point::PointPair;

use super::FeatureHashIndex;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MatchError {
    #[error(transparent)]
    Rejected(#[from] PairRejection),
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// A stored model sample whose signature matches a scene pair.
#[derive(Debug, Clone, Copy)]
pub struct Correspondence<'a> {
    pub model_id: &'a ModelId,
    pub model_sample: &'a PairFrame,
    /// Maps model coordinates onto the scene: `scene_frame * model_frame^-1`.
    pub pose: Mat4,
}

impl FeatureHashIndex {
    /// Candidate model poses explained by one scene pair.
    ///
    /// The scene pair goes through the same feature extraction and frame
    /// construction as the indexed model pairs. Rejected pairs return an
    /// error so the caller can skip them; a signature with no stored samples
    /// returns an empty list.
    pub fn correspondences(
        &self,
        scene_pair: PointPair,
        config: &RecognitionConfig,
    ) -> Result<Vec<Correspondence<'_>>, MatchError> {
        let mut pair = scene_pair;
        let descriptor =
            compute_feature(&mut pair, config.min_distance_sq(), config.max_distance_sq())?;
        let scene_frame = LocalFrame::from_pair(&pair)?;
        let signature = descriptor.signature(config.angle_bins_per_radian);

        let scene = scene_frame.matrix();
        let matches: Vec<Correspondence<'_>> = self
            .lookup(&signature)
            .flat_map(|(model_id, samples)| {
                samples.iter().map(move |sample| Correspondence {
                    model_id,
                    model_sample: sample,
                    pose: scene * sample.frame.inverse(),
                })
            })
            .collect();

        tracing::trace!(%signature, candidates = matches.len(), "Scene pair lookup");

        Ok(matches)
    }
}
