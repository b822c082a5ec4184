//! Node type.

use serde::Serialize;

/// A location in a CVRP instance: the depot or a customer.
///
/// Node 0 is the depot by convention and carries zero demand. Nodes are
/// immutable once an [`Instance`](super::Instance) has been built.
///
/// # Examples
///
/// ```
/// use u_cvrp::models::Node;
///
/// let depot = Node::depot(35.0, 35.0);
/// assert_eq!(depot.id(), 0);
/// assert_eq!(depot.demand(), 0);
///
/// let c = Node::new(1, 41.0, 49.0, 10);
/// assert_eq!(c.id(), 1);
/// assert_eq!(c.demand(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    id: usize,
    x: f64,
    y: f64,
    demand: i32,
}

impl Node {
    /// Creates a new node. Negative demands are clamped to zero.
    pub fn new(id: usize, x: f64, y: f64, demand: i32) -> Self {
        Self {
            id,
            x,
            y,
            demand: demand.max(0),
        }
    }

    /// Creates a depot at the given coordinates (id=0, demand=0).
    pub fn depot(x: f64, y: f64) -> Self {
        Self::new(0, x, y, 0)
    }

    /// Node index (0 = depot).
    pub fn id(&self) -> usize {
        self.id
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Units to deliver at this node.
    pub fn demand(&self) -> i32 {
        self.demand
    }

    /// Returns `true` for the depot.
    pub fn is_depot(&self) -> bool {
        self.id == 0
    }

    /// Unrounded Euclidean distance to another node.
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
