//! Great-circle nearest-neighbor search over swath points.
//!
//! Points are stored as unit vectors on the sphere in an R-tree. Chord length
//! is monotonic in great-circle distance, so Euclidean nearest neighbors in
//! 3-D are great-circle nearest neighbors.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// Unit vector for (lon, lat) in degrees.
pub(crate) fn unit_vector(lon: f64, lat: f64) -> [f64; 3] {
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
    [cos_lat * cos_lon, cos_lat * sin_lon, sin_lat]
}

/// Chord length on the unit sphere between two unit vectors.
pub(crate) fn chord(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Chord length on a sphere of `radius` spanning great-circle `distance`.
pub(crate) fn chord_for_arc(distance: f64, radius: f64) -> f64 {
    if distance >= std::f64::consts::PI * radius {
        2.0 * radius
    } else {
        2.0 * radius * (distance / (2.0 * radius)).sin()
    }
}

/// A swath point in the index.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IndexedPoint {
    pub xyz: [f64; 3],
    /// Position in the caller's (flattened) input arrays
    pub index: usize,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.xyz)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let d = chord(&self.xyz, point);
        d * d
    }
}

/// R-tree of valid swath points on the unit sphere.
pub(crate) struct SphereIndex {
    tree: RTree<IndexedPoint>,
}

impl SphereIndex {
    pub fn new(points: Vec<IndexedPoint>) -> Self {
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Nearest point to `query` within `max_chord` (unit sphere).
    ///
    /// Every point whose chord distance is within `tolerance` of the best
    /// one counts as a tie; the lowest input index among them is returned
    /// together with its chord distance.
    pub fn nearest_within(
        &self,
        query: &[f64; 3],
        max_chord: f64,
        tolerance: f64,
    ) -> Option<(usize, f64)> {
        let mut candidates = self.tree.nearest_neighbor_iter_with_distance_2(query);
        let (first, d2) = candidates.next()?;
        let best = d2.sqrt();
        if best > max_chord {
            return None;
        }

        let mut chosen = (first.index, best);
        for (point, d2) in candidates {
            let d = d2.sqrt();
            if d > best + tolerance || d > max_chord {
                break;
            }
            if point.index < chosen.0 {
                chosen = (point.index, d);
            }
        }
        Some(chosen)
    }
}
