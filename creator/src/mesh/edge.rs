use super::triangle::FaceId;
use super::vertex::VertId;

#[derive(Default, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Debug)]
pub struct EdgeId(pub usize);

impl From<usize> for EdgeId {
    fn from(value: usize) -> Self {
        EdgeId(value)
    }
}

impl From<EdgeId> for usize {
    fn from(value: EdgeId) -> Self {
        value.0
    }
}

/// A hull edge between two vertices, bordered by exactly two faces while it
/// is part of the hull.
#[derive(Debug, Clone)]
pub struct Edge {
    pub vertex1: VertId,
    pub vertex2: VertId,
    pub face1: FaceId,
    pub face2: FaceId,
    pub in_hull: bool,
    /// Index of the torus patch emitted for this edge, set during assembly.
    pub torus: Option<usize>,
}

impl Edge {
    pub fn new(vertex1: VertId, vertex2: VertId, face1: FaceId, face2: FaceId) -> Self {
        Edge {
            vertex1,
            vertex2,
            face1,
            face2,
            in_hull: true,
            torus: None,
        }
    }

    pub fn connects(&self, a: VertId, b: VertId) -> bool {
        (self.vertex1 == a && self.vertex2 == b) || (self.vertex1 == b && self.vertex2 == a)
    }

    pub fn touches(&self, v: VertId) -> bool {
        self.vertex1 == v || self.vertex2 == v
    }

    pub fn other_face(&self, f: FaceId) -> FaceId {
        if self.face1 == f {
            self.face2
        } else {
            self.face1
        }
    }

    pub fn has_face(&self, f: FaceId) -> bool {
        self.face1 == f || self.face2 == f
    }
}
