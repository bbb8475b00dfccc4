//! Recognition - point-pair feature hashing for 3D object recognition.
//!
//! The crate holds the two structures a recognition pipeline is built on:
//!
//! - a geometric hash index mapping quantized point-pair signatures to the
//!   model pairs and local frames that produced them
//! - a conflict graph that resolves overlapping detection hypotheses by
//!   suppressing the weaker one of each conflicting pair
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use recognition::{ConflictGraph, FeatureHashIndex, ModelId, PointPair, RecognitionConfig};
//!
//! let config = RecognitionConfig::default();
//! let mut index = FeatureHashIndex::new();
//! index.index_model(&ModelId::new("mug", 0), &model_points, &config);
//!
//! // Online: every scene pair proposes model poses.
//! let candidates = index.correspondences(PointPair::new(a, b), &config)?;
//!
//! // Hypotheses built from the votes go into the conflict graph.
//! let mut graph = ConflictGraph::new();
//! graph.add_node(ModelId::new("mug", 0), votes, explained.len(), explained);
//! graph.connect_overlapping();
//! graph.suppress_all();
//! let detections = graph.accepted();
//! ```

mod config;
pub mod conflict;
pub mod feature;
pub mod index;
mod model;
mod point;
pub mod record;
pub mod resolution;

// ============================================================================
// Core types
// ============================================================================

pub use config::RecognitionConfig;
pub use model::ModelId;
pub use point::{OrientedPoint, PointPair};

// ============================================================================
// Features
// ============================================================================

pub use feature::{
    compute_feature, Descriptor, FrameError, LocalFrame, PairFrame, PairRejection, Signature,
};

// ============================================================================
// Index and conflict resolution
// ============================================================================

pub use conflict::{ConflictEdge, ConflictGraph, ConflictNode, ExplainedPoint};
pub use index::{Correspondence, FeatureHashIndex, IndexStats, MatchError};
pub use record::{read_pair_frames, RecordError};
pub use resolution::{cloud_resolution, NearestNeighbors};

#[cfg(test)]
mod tests;
