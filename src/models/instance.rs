//! CVRP instance.

use crate::distance::DistanceMatrix;

use super::Node;

/// An immutable CVRP instance: depot, customers, capacity, distances.
///
/// Built once, then shared read-only by every search component.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::{Instance, Node};
///
/// let instance = Instance::new(
///     30,
///     vec![
///         Node::depot(0.0, 0.0),
///         Node::new(1, 3.0, 4.0, 10),
///         Node::new(2, 6.0, 8.0, 20),
///     ],
/// );
/// assert_eq!(instance.dimension(), 3);
/// assert_eq!(instance.num_customers(), 2);
/// assert_eq!(instance.dist(0, 2), 10);
/// ```
#[derive(Debug, Clone)]
pub struct Instance {
    capacity: i32,
    nodes: Vec<Node>,
    distances: DistanceMatrix,
}

impl Instance {
    /// Creates an instance and precomputes its rounded Euclidean distances.
    pub fn new(capacity: i32, nodes: Vec<Node>) -> Self {
        let distances = DistanceMatrix::from_nodes(&nodes);
        Self {
            capacity,
            nodes,
            distances,
        }
    }

    /// Node count including the depot.
    pub fn dimension(&self) -> usize {
        self.nodes.len()
    }

    /// Number of customers (excluding the depot).
    pub fn num_customers(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Vehicle capacity.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// All nodes, index 0 is the depot.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The node at `index`.
    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// The depot node.
    pub fn depot(&self) -> &Node {
        &self.nodes[0]
    }

    /// Demand of the node at `index`.
    #[inline]
    pub fn demand(&self, index: usize) -> i32 {
        self.nodes[index].demand()
    }

    /// Distance between two nodes.
    #[inline]
    pub fn dist(&self, from: usize, to: usize) -> i64 {
        self.distances.get(from, to)
    }

    /// The precomputed distance table.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Customer indices `1..dimension`.
    pub fn customers(&self) -> impl Iterator<Item = usize> {
        1..self.nodes.len()
    }

    /// Cost of serving `customer` on its own route: depot → customer → depot.
    pub fn round_trip(&self, customer: usize) -> i64 {
        self.dist(0, customer) + self.dist(customer, 0)
    }

    /// Returns `true` if `customer` fits in an empty vehicle.
    pub fn fits_alone(&self, customer: usize) -> bool {
        self.fits(0, customer)
    }

    /// Returns `true` if adding `customer` to a vehicle carrying `load`
    /// stays within capacity.
    ///
    /// The sum is taken in `i64`, so demands near `i32::MAX` compare
    /// correctly instead of overflowing.
    pub fn fits(&self, load: i32, customer: usize) -> bool {
        i64::from(load) + i64::from(self.demand(customer)) <= i64::from(self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Instance {
        Instance::new(
            15,
            vec![
                Node::depot(0.0, 0.0),
                Node::new(1, 3.0, 4.0, 10),
                Node::new(2, 0.0, 8.0, 20),
            ],
        )
    }

    #[test]
    fn test_instance_accessors() {
        let inst = sample();
        assert_eq!(inst.dimension(), 3);
        assert_eq!(inst.num_customers(), 2);
        assert_eq!(inst.capacity(), 15);
        assert_eq!(inst.demand(2), 20);
        assert_eq!(inst.depot().id(), 0);
        assert_eq!(inst.customers().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_round_trip() {
        let inst = sample();
        assert_eq!(inst.round_trip(1), 10);
        assert_eq!(inst.round_trip(2), 16);
    }

    #[test]
    fn test_fits_alone() {
        let inst = sample();
        assert!(inst.fits_alone(1));
        assert!(!inst.fits_alone(2));
    }

    #[test]
    fn test_fits_with_load() {
        let inst = sample();
        assert!(inst.fits(5, 1));
        assert!(!inst.fits(6, 1));
    }

    #[test]
    fn test_fits_near_i32_max() {
        let inst = Instance::new(
            i32::MAX,
            vec![Node::depot(0.0, 0.0), Node::new(1, 1.0, 0.0, 2_000_000_000)],
        );
        assert!(inst.fits_alone(1));
        assert!(!inst.fits(2_000_000_000, 1));
    }

    #[test]
    fn test_empty_instance() {
        let inst = Instance::new(10, vec![Node::depot(0.0, 0.0)]);
        assert_eq!(inst.num_customers(), 0);
        assert_eq!(inst.customers().count(), 0);
    }
}
