use std::collections::HashMap;

use glam::DVec3;

use common::TriMesh;

use crate::geometry;

use super::edge::{Edge, EdgeId};
use super::triangle::{FaceId, Triangle};
use super::vertex::{VertId, Vertex};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MeshError {
    #[error("edge between vertices {0:?} and {1:?} appears in more than two faces")]
    NonManifold(VertId, VertId),
    #[error("edge between vertices {0:?} and {1:?} borders only one face, the surface is not closed")]
    Open(VertId, VertId),
    #[error("no hull edge connects vertices {0:?} and {1:?}")]
    MissingEdge(VertId, VertId),
    #[error("faces {0:?} and {1:?} have no edge slot connecting {2:?} and {3:?}")]
    MissingSlot(FaceId, FaceId, VertId, VertId),
    #[error("face {0:?} references retired edge {1:?}")]
    DeadEdgeRef(FaceId, EdgeId),
    #[error("edge {0:?} references retired face {1:?}")]
    DeadFaceRef(EdgeId, FaceId),
    #[error("edge {0:?} is not an edge slot of face {1:?}")]
    UnlinkedEdge(EdgeId, FaceId),
    #[error("face {0:?} references retired vertex {1:?}")]
    DeadVertRef(FaceId, VertId),
}

/// Flat-arena triangle hull. Entities are only ever appended; leaving the
/// hull flips `in_hull` and nothing else, so indices stored elsewhere stay
/// valid (and merely go stale).
pub struct HullMesh {
    verts: Vec<Vertex>,
    edges: Vec<Edge>,
    faces: Vec<Triangle>,
    centroid: DVec3,
}

impl HullMesh {
    /// Builds the connectivity arena from a triangle soup. Faces are
    /// rewound so they are counter-clockwise seen from outside the body,
    /// edges are deduplicated on their vertex pair, and each vertex learns
    /// its incident edges in ascending edge order.
    pub fn from_tris(tris: &TriMesh, alpha: f64, epsilon: f64) -> Result<Self, MeshError> {
        let centroid = tris.verts.iter().sum::<DVec3>() / tris.verts.len().max(1) as f64;

        let mut verts: Vec<Vertex> = tris.verts.iter().map(|&p| Vertex::new(p)).collect();
        let mut faces = Vec::with_capacity(tris.tri_count());

        let mut protos: Vec<(VertId, VertId)> = Vec::new();
        let mut incident: Vec<Vec<FaceId>> = Vec::new();
        let mut by_pair: HashMap<(VertId, VertId), EdgeId> = HashMap::new();

        for (f, tri) in tris.indices.chunks_exact(3).enumerate() {
            let fid = FaceId(f);
            let a = VertId(tri[0] as usize);
            let mut b = VertId(tri[1] as usize);
            let mut c = VertId(tri[2] as usize);

            if !geometry::is_ccw(
                a.position_in(&verts),
                c.position_in(&verts),
                b.position_in(&verts),
                centroid,
                alpha,
                epsilon,
            ) {
                std::mem::swap(&mut b, &mut c);
            }

            let mut slots = [EdgeId(0); 3];
            for (k, (u, v)) in [(a, b), (b, c), (c, a)].into_iter().enumerate() {
                let pair = if u < v { (u, v) } else { (v, u) };
                let eid = *by_pair.entry(pair).or_insert_with(|| {
                    protos.push((u, v));
                    incident.push(Vec::with_capacity(2));
                    EdgeId(protos.len() - 1)
                });
                incident[eid.0].push(fid);
                if incident[eid.0].len() > 2 {
                    return Err(MeshError::NonManifold(u, v));
                }
                slots[k] = eid;
            }
            faces.push(Triangle::new(a, b, c, slots[0], slots[1], slots[2]));
        }

        let mut edges = Vec::with_capacity(protos.len());
        for (i, &(v1, v2)) in protos.iter().enumerate() {
            match incident[i][..] {
                [f1, f2] => edges.push(Edge::new(v1, v2, f1, f2)),
                _ => return Err(MeshError::Open(v1, v2)),
            }
        }

        for (i, e) in edges.iter().enumerate() {
            verts[e.vertex1.0].add_neighbour(EdgeId(i));
            verts[e.vertex2.0].add_neighbour(EdgeId(i));
        }

        Ok(HullMesh {
            verts,
            edges,
            faces,
            centroid,
        })
    }

    pub fn centroid(&self) -> DVec3 {
        self.centroid
    }

    pub fn verts(&self) -> &[Vertex] {
        &self.verts
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn faces(&self) -> &[Triangle] {
        &self.faces
    }

    pub fn vert(&self, v: VertId) -> &Vertex {
        &self.verts[v.0]
    }

    pub fn vert_mut(&mut self, v: VertId) -> &mut Vertex {
        &mut self.verts[v.0]
    }

    pub fn edge(&self, e: EdgeId) -> &Edge {
        &self.edges[e.0]
    }

    pub fn edge_mut(&mut self, e: EdgeId) -> &mut Edge {
        &mut self.edges[e.0]
    }

    pub fn face(&self, f: FaceId) -> &Triangle {
        &self.faces[f.0]
    }

    pub fn face_mut(&mut self, f: FaceId) -> &mut Triangle {
        &mut self.faces[f.0]
    }

    pub fn position(&self, v: VertId) -> DVec3 {
        self.verts[v.0].position
    }

    pub fn push_edge(&mut self, e: Edge) -> EdgeId {
        self.edges.push(e);
        EdgeId(self.edges.len() - 1)
    }

    pub fn push_face(&mut self, f: Triangle) -> FaceId {
        self.faces.push(f);
        FaceId(self.faces.len() - 1)
    }

    pub fn next_edge_id(&self) -> EdgeId {
        EdgeId(self.edges.len())
    }

    pub fn next_face_id(&self) -> FaceId {
        FaceId(self.faces.len())
    }

    /// Appends `e` to the incidence lists of both its endpoints.
    pub fn register_edge(&mut self, e: EdgeId) {
        let (v1, v2) = {
            let edge = self.edge(e);
            (edge.vertex1, edge.vertex2)
        };
        self.verts[v1.0].add_neighbour(e);
        self.verts[v2.0].add_neighbour(e);
    }

    /// First live edge out of `a` that reaches `b`.
    pub fn find_hull_edge(&self, a: VertId, b: VertId) -> Result<EdgeId, MeshError> {
        self.vert(a)
            .neighbours()
            .iter()
            .copied()
            .find(|&e| {
                let edge = self.edge(e);
                edge.in_hull && edge.connects(a, b)
            })
            .ok_or(MeshError::MissingEdge(a, b))
    }

    /// Whether a live edge joins `a` and `b`.
    pub fn hull_connected(&self, a: VertId, b: VertId) -> bool {
        self.find_hull_edge(a, b).is_ok()
    }

    /// Whether two edges border a common face.
    pub fn edges_share_face(&self, e1: EdgeId, e2: EdgeId) -> bool {
        let a = self.edge(e1);
        let b = self.edge(e2);
        b.has_face(a.face1) || b.has_face(a.face2)
    }

    /// The slot of `f1` or `f2` whose edge joins `x` and `y`.
    pub fn edge_between(
        &self,
        f1: FaceId,
        f2: FaceId,
        x: VertId,
        y: VertId,
    ) -> Result<EdgeId, MeshError> {
        self.face(f1)
            .edges()
            .into_iter()
            .chain(self.face(f2).edges())
            .find(|&e| self.edge(e).connects(x, y))
            .ok_or(MeshError::MissingSlot(f1, f2, x, y))
    }

    /// Rebinds the face slot of `e` that points at a retired face to `f`.
    /// Used when a retired face is replaced by a freshly appended one.
    pub fn update_dead_face_ref(&mut self, e: EdgeId, f: FaceId) {
        let face1 = self.edges[e.0].face1;
        if !self.faces[face1.0].in_hull {
            self.edges[e.0].face1 = f;
        } else {
            self.edges[e.0].face2 = f;
        }
    }

    pub fn live_vert_count(&self) -> usize {
        self.verts.iter().filter(|v| v.in_hull).count()
    }

    pub fn live_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.in_hull).count()
    }

    pub fn live_face_count(&self) -> usize {
        self.faces.iter().filter(|f| f.in_hull).count()
    }

    pub fn max_edge_length(&self) -> f64 {
        self.edges
            .iter()
            .filter(|e| e.in_hull)
            .map(|e| self.position(e.vertex1).distance(self.position(e.vertex2)))
            .fold(0.0, f64::max)
    }

    /// Full connectivity audit of the live hull: live faces reference live
    /// edges and vertices that link back, live edges are slots of both
    /// their live faces.
    pub fn assert_hull_valid(&self) -> Result<(), MeshError> {
        for (i, face) in self.faces.iter().enumerate() {
            if !face.in_hull {
                continue;
            }
            let fid = FaceId(i);
            for v in face.vertices() {
                if !self.vert(v).in_hull {
                    return Err(MeshError::DeadVertRef(fid, v));
                }
            }
            for e in face.edges() {
                if !self.edge(e).in_hull {
                    return Err(MeshError::DeadEdgeRef(fid, e));
                }
                if !self.edge(e).has_face(fid) {
                    return Err(MeshError::UnlinkedEdge(e, fid));
                }
            }
        }
        for (i, edge) in self.edges.iter().enumerate() {
            if !edge.in_hull {
                continue;
            }
            let eid = EdgeId(i);
            for f in [edge.face1, edge.face2] {
                if !self.face(f).in_hull {
                    return Err(MeshError::DeadFaceRef(eid, f));
                }
                if !self.face(f).edges().contains(&eid) {
                    return Err(MeshError::UnlinkedEdge(eid, f));
                }
            }
        }
        Ok(())
    }
}

impl VertId {
    fn position_in(self, verts: &[Vertex]) -> DVec3 {
        verts[self.0].position
    }
}
