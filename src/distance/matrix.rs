//! Dense integer distance matrix.

use crate::models::Node;

/// Largest stored distance. Rounded distances beyond it (including infinite
/// ones) are clamped, so a few of them can be added without overflow.
pub const MAX_DISTANCE: i64 = i64::MAX / 4;

/// A dense n×n distance matrix stored in row-major order.
///
/// Distances are Euclidean distances rounded to the nearest integer, the
/// TSPLIB `EUC_2D` convention used by the CVRP benchmark literature.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::Node;
/// use u_cvrp::distance::DistanceMatrix;
///
/// let nodes = vec![
///     Node::depot(0.0, 0.0),
///     Node::new(1, 3.0, 4.0, 10),
///     Node::new(2, 6.0, 8.0, 20),
/// ];
/// let dm = DistanceMatrix::from_nodes(&nodes);
/// assert_eq!(dm.get(0, 1), 5);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<i64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size * size],
            size,
        }
    }

    /// Computes the rounded Euclidean matrix from node coordinates.
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let n = nodes.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = (nodes[i].distance_to(&nodes[j]).round() as i64).min(MAX_DISTANCE);
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Returns the distance from node `from` to node `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from node `from` to node `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: i64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of nodes in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the nearest of `candidates` to `from`, first one on ties.
    ///
    /// Returns `None` if `candidates` is empty.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates.iter().copied().min_by_key(|&c| self.get(from, c))
    }
}
