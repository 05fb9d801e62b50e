use super::edge::EdgeId;
use super::vertex::VertId;

#[derive(Default, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Debug)]
pub struct FaceId(pub usize);

impl From<usize> for FaceId {
    fn from(value: usize) -> Self {
        FaceId(value)
    }
}

impl From<FaceId> for usize {
    fn from(value: FaceId) -> Self {
        value.0
    }
}

/// A hull face. The edge slots follow the winding: `e1` connects
/// `p1`-`p2`, `e2` connects `p2`-`p3` and `e3` connects `p3`-`p1`.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub p1: VertId,
    pub p2: VertId,
    pub p3: VertId,
    pub e1: EdgeId,
    pub e2: EdgeId,
    pub e3: EdgeId,
    pub in_hull: bool,
    /// Index of the big sphere emitted for this face, set during assembly.
    pub big_sphere: Option<usize>,
}

impl Triangle {
    pub fn new(
        p1: VertId,
        p2: VertId,
        p3: VertId,
        e1: EdgeId,
        e2: EdgeId,
        e3: EdgeId,
    ) -> Self {
        Triangle {
            p1,
            p2,
            p3,
            e1,
            e2,
            e3,
            in_hull: true,
            big_sphere: None,
        }
    }

    pub fn vertices(&self) -> [VertId; 3] {
        [self.p1, self.p2, self.p3]
    }

    pub fn edges(&self) -> [EdgeId; 3] {
        [self.e1, self.e2, self.e3]
    }

    /// The vertex of this face that is neither `a` nor `b`.
    pub fn third_vertex(&self, a: VertId, b: VertId) -> VertId {
        if self.p1 != a && self.p1 != b {
            self.p1
        } else if self.p2 != a && self.p2 != b {
            self.p2
        } else {
            self.p3
        }
    }

    /// The edge slot of this face that is neither `x` nor `y`.
    pub fn edge_excluding(&self, x: EdgeId, y: EdgeId) -> EdgeId {
        if self.e1 != x && self.e1 != y {
            self.e1
        } else if self.e2 != x && self.e2 != y {
            self.e2
        } else {
            self.e3
        }
    }

    /// Swaps a reissued edge into the slot that held its predecessor.
    pub fn replace_edge(&mut self, old: EdgeId, new: EdgeId) {
        if self.e1 == old {
            self.e1 = new;
        } else if self.e2 == old {
            self.e2 = new;
        } else if self.e3 == old {
            self.e3 = new;
        }
    }
}
