//! Point cloud resolution: the mean distance from each point to its nearest
//! neighbour.
//!
//! Nearest-neighbour search is supplied by the caller through
//! [`NearestNeighbors`]; any k-d tree or brute-force search will do.

use glam::Vec3;

/// Exact k-nearest-neighbour queries over a fixed point set.
pub trait NearestNeighbors {
    /// Up to `k` neighbours of the point at `index` as `(index, squared distance)`,
    /// nearest first. The query point itself is included when it is part of
    /// the set.
    fn k_nearest(&self, index: usize, k: usize) -> Vec<(usize, f32)>;
}

/// Mean nearest-neighbour distance over all finite points of `points`.
///
/// `search` must index the same point set. Points without a neighbour are
/// ignored; returns 0 when no point qualifies.
pub fn cloud_resolution<S>(points: &[Vec3], search: &S) -> f32
where
    S: NearestNeighbors + ?Sized,
{
    let mut total = 0.0f64;
    let mut counted = 0usize;

    for (idx, point) in points.iter().enumerate() {
        if !point.is_finite() {
            continue;
        }
        let neighbors = search.k_nearest(idx, 2);
        if let [_, (_, dist_sq)] = neighbors.as_slice() {
            total += (*dist_sq as f64).sqrt();
            counted += 1;
        }
    }

    if counted == 0 {
        return 0.0;
    }
    (total / counted as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BruteForce<'a>(&'a [Vec3]);

    impl NearestNeighbors for BruteForce<'_> {
        fn k_nearest(&self, index: usize, k: usize) -> Vec<(usize, f32)> {
            let query = self.0[index];
            let mut all: Vec<(usize, f32)> = self
                .0
                .iter()
                .enumerate()
                .filter(|(_, p)| p.is_finite())
                .map(|(i, p)| (i, p.distance_squared(query)))
                .collect();
            all.sort_by(|a, b| a.1.total_cmp(&b.1));
            all.truncate(k);
            all
        }
    }

    #[test]
    fn test_regular_grid_resolution() {
        let points: Vec<Vec3> = (0..5)
            .flat_map(|x| (0..5).map(move |y| Vec3::new(x as f32 * 0.5, y as f32 * 0.5, 0.0)))
            .collect();

        let resolution = cloud_resolution(&points, &BruteForce(&points));

        assert!((resolution - 0.5).abs() < 1e-6, "got {resolution}");
    }

    #[test]
    fn test_non_finite_points_are_skipped() {
        let points = vec![
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(f32::NAN, 0.0, 0.0),
        ];

        let resolution = cloud_resolution(&points, &BruteForce(&points));

        assert!((resolution - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_inputs_give_zero() {
        assert_eq!(cloud_resolution(&[], &BruteForce(&[])), 0.0);
        let single = [Vec3::ONE];
        assert_eq!(cloud_resolution(&single, &BruteForce(&single)), 0.0);
    }
}
