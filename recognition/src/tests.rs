//! End-to-end: index two models, match a moved copy of one of them and
//! resolve the resulting hypotheses.

use glam::{Mat4, Quat, Vec3};
use hashbrown::{HashMap, HashSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{
    ConflictGraph, ExplainedPoint, FeatureHashIndex, ModelId, OrientedPoint, PointPair,
    RecognitionConfig,
};

fn random_cloud(rng: &mut StdRng, n: usize) -> Vec<OrientedPoint> {
    (0..n)
        .map(|_| {
            let position = Vec3::new(
                rng.random_range(-0.1..0.1),
                rng.random_range(-0.1..0.1),
                rng.random_range(-0.1..0.1),
            );
            let normal = Vec3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(0.2..1.0),
            )
            .normalize();
            OrientedPoint::new(position, normal)
        })
        .collect()
}

#[test]
fn test_recognize_moved_model() {
    common::log_setup::setup_test_logging();

    let mut rng = StdRng::seed_from_u64(2024);
    let config = RecognitionConfig::default();
    let mug = ModelId::new("mug", 0);
    let bowl = ModelId::new("bowl", 0);
    let mug_points = random_cloud(&mut rng, 25);
    let bowl_points = random_cloud(&mut rng, 25);

    let mut index = FeatureHashIndex::new();
    index.index_model(&mug, &mug_points, &config);
    index.index_model(&bowl, &bowl_points, &config);
    assert_eq!(index.models(), vec![&bowl, &mug]);

    let rotation = Quat::from_rotation_z(0.8) * Quat::from_rotation_x(-0.3);
    let truth = Mat4::from_rotation_translation(rotation, Vec3::new(1.0, 0.5, 2.0));
    let scene: Vec<OrientedPoint> = mug_points
        .iter()
        .map(|p| OrientedPoint::new(truth.transform_point3(p.position), rotation * p.normal))
        .collect();

    // Count, per model, the scene pairs that agree with the true pose and the
    // scene points they involve.
    let mut votes: HashMap<ModelId, usize> = HashMap::new();
    let mut explained: HashMap<ModelId, HashSet<ExplainedPoint>> = HashMap::new();
    for i in 0..scene.len() {
        for j in i + 1..scene.len() {
            let Ok(matches) = index.correspondences(PointPair::new(scene[i], scene[j]), &config)
            else {
                continue;
            };
            for c in matches.iter().filter(|c| c.pose.abs_diff_eq(truth, 1e-3)) {
                *votes.entry(c.model_id.clone()).or_default() += 1;
                let points = explained.entry(c.model_id.clone()).or_default();
                points.insert(ExplainedPoint::new(i, i));
                points.insert(ExplainedPoint::new(j, j));
            }
        }
    }

    assert!(votes.get(&mug).copied().unwrap_or(0) > 100);
    assert_eq!(votes.get(&bowl), None);

    let mut graph = ConflictGraph::new();
    let mug_points_explained = explained.remove(&mug).unwrap();
    let true_node = graph.add_node(
        mug.clone(),
        votes[&mug],
        mug_points_explained.len(),
        mug_points_explained.clone(),
    );
    // A weaker hypothesis claiming part of the same evidence.
    let partial: HashSet<ExplainedPoint> = mug_points_explained.iter().take(5).copied().collect();
    let spurious = graph.add_node(bowl.clone(), 3, partial.len(), partial);
    // An unrelated hypothesis elsewhere in the scene.
    let elsewhere = graph.add_node(
        bowl.clone(),
        10,
        4,
        (100..104).map(|s| ExplainedPoint::new(s, s)).collect(),
    );

    assert_eq!(graph.connect_overlapping(), 1);
    graph.suppress_all();

    assert!(graph.is_suppressed(spurious));
    assert_eq!(graph.accepted(), vec![true_node, elsewhere]);
    assert_eq!(graph.model_of(true_node), mug);
}
