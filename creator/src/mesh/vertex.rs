use glam::DVec3;

use super::edge::EdgeId;

#[derive(Default, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Debug)]
pub struct VertId(pub usize);

impl From<usize> for VertId {
    fn from(value: usize) -> Self {
        VertId(value)
    }
}

impl From<VertId> for usize {
    fn from(value: VertId) -> Self {
        value.0
    }
}

/// A hull vertex. Its incidence list only ever grows; edges that leave the
/// hull stay listed and are skipped by liveness checks.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub position: DVec3,
    pub in_hull: bool,
    /// Index of the small sphere emitted for this vertex, set during
    /// assembly.
    pub small_sphere: Option<usize>,
    neighbours: Vec<EdgeId>,
}

impl Vertex {
    pub fn new(position: DVec3) -> Self {
        Vertex {
            position,
            in_hull: true,
            small_sphere: None,
            neighbours: Vec::new(),
        }
    }

    pub fn add_neighbour(&mut self, e: EdgeId) {
        self.neighbours.push(e);
    }

    pub fn neighbours(&self) -> &[EdgeId] {
        &self.neighbours
    }
}
