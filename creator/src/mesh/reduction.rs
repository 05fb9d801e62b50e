use std::collections::BinaryHeap;

use glam::DVec3;
use log::{debug, info, warn};

use crate::geometry;

use super::candidate::{Candidate, CandidateKind};
use super::edge::{Edge, EdgeId};
use super::hull_mesh::{HullMesh, MeshError};
use super::triangle::{FaceId, Triangle};
use super::vertex::VertId;

/// How a popped candidate was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// The edge was replaced by the opposite diagonal of its quad.
    InvertedEdge(EdgeId),
    /// A degree-3 vertex was removed and its fan closed with one triangle.
    DisappearedVertex(VertId),
    /// A degree-2 vertex and its doubled-edge pocket were removed.
    DisappearedUnderEdge(VertId),
    /// The candidate was consumed without changing the hull.
    Rejected,
}

#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub radius: f64,
    pub op: Operation,
}

/// Greedy hull decimation. Repeatedly takes the live candidate with the
/// largest circumradius off the heap and rewrites the surrounding
/// connectivity, until every live candidate fits the target radius or the
/// hull is down to a tetrahedron.
pub struct Simplifier {
    mesh: HullMesh,
    heap: BinaryHeap<Candidate>,
    active_vertexes: usize,
    target_radius: f64,
    epsilon: f64,
}

impl Simplifier {
    pub fn new(mesh: HullMesh, target_radius: f64, epsilon: f64) -> Self {
        let mut s = Simplifier {
            active_vertexes: mesh.live_vert_count(),
            mesh,
            heap: BinaryHeap::new(),
            target_radius,
            epsilon,
        };
        s.fill_heap();
        s
    }

    pub fn mesh(&self) -> &HullMesh {
        &self.mesh
    }

    pub fn into_mesh(self) -> HullMesh {
        self.mesh
    }

    pub fn active_vertexes(&self) -> usize {
        self.active_vertexes
    }

    fn fill_heap(&mut self) {
        for (i, face) in self.mesh.faces().iter().enumerate() {
            let s = geometry::circumsphere_3(
                self.mesh.position(face.p1),
                self.mesh.position(face.p2),
                self.mesh.position(face.p3),
            );
            self.heap.push(Candidate::triangle(s.radius, FaceId(i)));
        }
        for i in 0..self.mesh.edges().len() {
            let radius = self.edge_radius(EdgeId(i));
            self.heap.push(Candidate::edge(radius, EdgeId(i)));
        }
    }

    /// Circumradius of the four vertices spanned by an edge and its two
    /// bordering faces.
    fn edge_radius(&self, e: EdgeId) -> f64 {
        let edge = self.mesh.edge(e);
        let c = self
            .mesh
            .face(edge.face1)
            .third_vertex(edge.vertex1, edge.vertex2);
        let d = self
            .mesh
            .face(edge.face2)
            .third_vertex(edge.vertex1, edge.vertex2);
        geometry::circumsphere_4(
            self.mesh.position(edge.vertex1),
            self.mesh.position(edge.vertex2),
            self.mesh.position(c),
            self.mesh.position(d),
        )
        .radius
    }

    fn candidate_live(&self, c: &Candidate) -> bool {
        match c.kind {
            CandidateKind::Edge(e) => {
                let edge = self.mesh.edge(e);
                edge.in_hull
                    && self.mesh.vert(edge.vertex1).in_hull
                    && self.mesh.vert(edge.vertex2).in_hull
                    && self.mesh.face(edge.face1).in_hull
                    && self.mesh.face(edge.face2).in_hull
            }
            CandidateKind::Triangle(f) => self.mesh.face(f).in_hull,
        }
    }

    /// Discards stale entries, then returns the live top without popping it.
    fn peek_live(&mut self) -> Option<Candidate> {
        loop {
            match self.heap.peek() {
                None => return None,
                Some(c) if !self.candidate_live(c) => {
                    self.heap.pop();
                }
                Some(c) => return Some(*c),
            }
        }
    }

    /// Performs one decimation step. Returns `None` once every live
    /// candidate fits the target radius, the heap is drained, or the hull
    /// has reached its tetrahedral floor.
    pub fn step(&mut self) -> Result<Option<Step>, MeshError> {
        self.mesh.assert_hull_valid()?;

        let Some(top) = self.peek_live() else {
            return Ok(None);
        };
        if top.radius <= self.target_radius {
            return Ok(None);
        }
        if self.active_vertexes <= 4 && matches!(top.kind, CandidateKind::Triangle(_)) {
            return Ok(None);
        }
        self.heap.pop();

        let op = match top.kind {
            CandidateKind::Edge(e) => self.change_topology(e, top.radius)?,
            CandidateKind::Triangle(f) => self.disappear_under_edge(f, top.radius)?,
        };
        Ok(Some(Step {
            radius: top.radius,
            op,
        }))
    }

    /// Runs decimation to completion.
    pub fn run(&mut self) -> Result<(), MeshError> {
        while let Some(step) = self.step()? {
            debug!(
                "radius {:.6}: {:?}, {} vertices remain",
                step.radius, step.op, self.active_vertexes
            );
        }
        info!(
            "decimated to {} vertices, {} edges, {} faces",
            self.mesh.live_vert_count(),
            self.mesh.live_edge_count(),
            self.mesh.live_face_count()
        );
        Ok(())
    }

    /// Resolves a popped edge candidate: either one of its endpoints
    /// disappears or the edge is flipped to the opposite diagonal.
    fn change_topology(&mut self, e: EdgeId, radius: f64) -> Result<Operation, MeshError> {
        let edge = self.mesh.edge(e).clone();
        let (a, b) = (edge.vertex1, edge.vertex2);
        let (f1, f2) = (edge.face1, edge.face2);
        let c = self.mesh.face(f1).third_vertex(a, b);
        let d = self.mesh.face(f2).third_vertex(a, b);

        let fg = (
            self.mesh.edge_between(f1, f2, a, c)?,
            self.mesh.edge_between(f1, f2, a, d)?,
        );
        let hj = (
            self.mesh.edge_between(f1, f2, b, c)?,
            self.mesh.edge_between(f1, f2, b, d)?,
        );

        if !self.mesh.hull_connected(c, d) {
            self.invert_edge(e, radius, c, d, fg, hj);
            return Ok(Operation::InvertedEdge(e));
        }
        let cd = self.mesh.find_hull_edge(c, d)?;

        if self.active_vertexes == 4 {
            if self.point_in_circumsphere(a, b, c, d) {
                self.disappear_vertex(e, radius, a, d, c, b, hj, cd)?;
                return Ok(Operation::DisappearedVertex(a));
            }
            if self.point_in_circumsphere(b, a, c, d) {
                self.disappear_vertex(e, radius, b, c, d, a, fg, cd)?;
                return Ok(Operation::DisappearedVertex(b));
            }
            debug!("no endpoint of {e:?} may vanish at the tetrahedral floor");
            return Ok(Operation::Rejected);
        }

        // the endpoint whose far edges close into a third face is the one
        // with a full fan around it
        if self.mesh.edges_share_face(fg.1, cd) {
            if self.check_torii(e, fg.0, fg.1) {
                self.disappear_vertex(e, radius, a, d, c, b, hj, cd)?;
                Ok(Operation::DisappearedVertex(a))
            } else {
                self.invert_edge(e, radius, c, d, fg, hj);
                Ok(Operation::InvertedEdge(e))
            }
        } else {
            if self.check_torii(e, hj.0, hj.1) {
                self.disappear_vertex(e, radius, b, c, d, a, fg, cd)?;
                Ok(Operation::DisappearedVertex(b))
            } else {
                self.invert_edge(e, radius, c, d, fg, hj);
                Ok(Operation::InvertedEdge(e))
            }
        }
    }

    /// Whether `p` lies strictly inside the circumsphere of the other
    /// three, i.e. the hull of the other three still covers it.
    fn point_in_circumsphere(&self, p: VertId, b: VertId, c: VertId, d: VertId) -> bool {
        geometry::circumsphere_3(
            self.mesh.position(b),
            self.mesh.position(c),
            self.mesh.position(d),
        )
        .contains(self.mesh.position(p))
    }

    /// Normal of the supporting-sphere patch over `f`, oriented by the
    /// `a`-to-`b` traversal of the edge.
    fn patch_normal(&self, a: VertId, b: VertId, f: FaceId) -> DVec3 {
        let face = self.mesh.face(f);
        let s = geometry::sphere_through_points(
            self.mesh.position(face.p1),
            self.mesh.position(face.p2),
            self.mesh.position(face.p3),
            self.target_radius,
            self.epsilon,
        );
        (self.mesh.position(a) - s.center)
            .cross(self.mesh.position(b) - s.center)
            .normalize()
    }

    /// Whether the torus patch over `e` has collapsed to zero thickness:
    /// the supporting patches on its two sides meet with anti-parallel
    /// normals.
    fn torus_thickness(&self, e: EdgeId) -> bool {
        let edge = self.mesh.edge(e);
        let n1 = self.patch_normal(edge.vertex1, edge.vertex2, edge.face1);
        let n2 = self.patch_normal(edge.vertex2, edge.vertex1, edge.face2);
        let d = n1.dot(n2) + 1.0;
        d * d <= self.epsilon
    }

    /// A vertex may only disappear when the popped edge and both far edges
    /// of the vanishing fan carry degenerate torus patches.
    fn check_torii(&self, e: EdgeId, e1: EdgeId, e2: EdgeId) -> bool {
        self.torus_thickness(e) && self.torus_thickness(e1) && self.torus_thickness(e2)
    }

    /// Reissues `old` under a fresh index with its dead face slot already
    /// rebound to `new_face`. The fresh edge only re-enters the heap when
    /// its circumradius undercuts the candidate that caused the reissue.
    fn remake_edge(&mut self, old: EdgeId, new_face: FaceId, max_radius: f64) -> EdgeId {
        let copy = self.mesh.edge(old).clone();
        let new = self.mesh.push_edge(copy);

        let outer = self.mesh.edge(new).other_face(new_face);
        self.mesh.face_mut(outer).replace_edge(old, new);

        let radius = self.edge_radius(new);
        if radius < max_radius {
            self.heap.push(Candidate::edge(radius, new));
        } else {
            warn!(
                "reissued edge {new:?} has circumradius {radius:.6} above its producing \
                 candidate {max_radius:.6}, not re-queued"
            );
        }
        self.mesh.register_edge(new);
        new
    }

    /// Replaces edge `a`-`b` with the opposite diagonal `c`-`d` of the quad
    /// around it. The diagonal deliberately gets no heap entry of its own.
    fn invert_edge(
        &mut self,
        e: EdgeId,
        radius: f64,
        c: VertId,
        d: VertId,
        fg: (EdgeId, EdgeId),
        hj: (EdgeId, EdgeId),
    ) {
        let edge = self.mesh.edge(e).clone();
        let (a, b) = (edge.vertex1, edge.vertex2);
        let (f1, f2) = (edge.face1, edge.face2);

        self.mesh.edge_mut(e).in_hull = false;
        self.mesh.face_mut(f1).in_hull = false;
        self.mesh.face_mut(f2).in_hull = false;

        let t0 = self.mesh.next_face_id();
        let t1 = FaceId(t0.0 + 1);
        let cd = self.mesh.push_edge(Edge::new(c, d, t0, t1));
        self.mesh.register_edge(cd);

        self.mesh.update_dead_face_ref(fg.0, t1);
        self.mesh.update_dead_face_ref(fg.1, t1);
        self.mesh.update_dead_face_ref(hj.0, t0);
        self.mesh.update_dead_face_ref(hj.1, t0);

        // slots for the four fan edges reissued right below
        self.mesh.push_face(Triangle::new(
            b,
            c,
            d,
            EdgeId(cd.0 + 3),
            cd,
            EdgeId(cd.0 + 4),
        ));
        self.mesh.push_face(Triangle::new(
            a,
            d,
            c,
            EdgeId(cd.0 + 2),
            cd,
            EdgeId(cd.0 + 1),
        ));

        for (p1, p2, p3, t) in [(b, c, d, t0), (a, d, c, t1)] {
            let s = geometry::circumsphere_3(
                self.mesh.position(p1),
                self.mesh.position(p2),
                self.mesh.position(p3),
            );
            if s.radius > radius {
                warn!(
                    "flip triangle {t:?} has circumradius {:.6} above its producing \
                     candidate {radius:.6}",
                    s.radius
                );
            }
            self.heap.push(Candidate::triangle(s.radius, t));
        }

        self.remake_edge(fg.0, t1, radius);
        self.remake_edge(fg.1, t1, radius);
        self.remake_edge(hj.0, t0, radius);
        self.remake_edge(hj.1, t0, radius);

        for old in [fg.0, fg.1, hj.0, hj.1] {
            self.mesh.edge_mut(old).in_hull = false;
        }
    }

    /// Removes the degree-3 vertex `v1` together with its three edges and
    /// three faces, and closes the hole with the single triangle
    /// `(v4, v3, v2)`.
    ///
    /// `far` holds the two edges joining `v4` to `v2` and `v3`, `e_cd` the
    /// edge joining `v2` and `v3`; all three are reissued for the closing
    /// triangle.
    fn disappear_vertex(
        &mut self,
        e: EdgeId,
        radius: f64,
        v1: VertId,
        v2: VertId,
        v3: VertId,
        v4: VertId,
        far: (EdgeId, EdgeId),
        e_cd: EdgeId,
    ) -> Result<(), MeshError> {
        let edge = self.mesh.edge(e).clone();
        let (f1, f2) = (edge.face1, edge.face2);

        self.mesh.vert_mut(v1).in_hull = false;
        self.active_vertexes -= 1;

        let fan: Vec<EdgeId> = self.mesh.vert(v1).neighbours().to_vec();
        let fan_edges: Vec<EdgeId> = fan
            .into_iter()
            .filter(|&n| self.mesh.edge(n).in_hull)
            .collect();
        self.mesh.face_mut(f1).in_hull = false;
        self.mesh.face_mut(f2).in_hull = false;
        // the fan's third face is whichever face of a fan edge is still live
        for &n in &fan_edges {
            let ne = self.mesh.edge(n);
            let dead = if !self.mesh.face(ne.face1).in_hull {
                ne.face2
            } else {
                ne.face1
            };
            self.mesh.face_mut(dead).in_hull = false;
        }
        for n in fan_edges {
            self.mesh.edge_mut(n).in_hull = false;
        }

        // pair the two far edges with their slots by endpoint
        let (e_43, e_42) = if self.mesh.edge(far.0).connects(v4, v3) {
            (far.0, far.1)
        } else {
            (far.1, far.0)
        };
        if !self.mesh.edge(e_42).connects(v4, v2) || !self.mesh.edge(e_cd).connects(v2, v3) {
            return Err(MeshError::MissingEdge(v4, v2));
        }

        let t0 = self.mesh.next_face_id();
        let base = self.mesh.next_edge_id();
        self.mesh.push_face(Triangle::new(
            v4,
            v3,
            v2,
            base,
            EdgeId(base.0 + 1),
            EdgeId(base.0 + 2),
        ));

        self.mesh.update_dead_face_ref(e_43, t0);
        self.mesh.update_dead_face_ref(e_cd, t0);
        self.mesh.update_dead_face_ref(e_42, t0);

        let s = geometry::circumsphere_3(
            self.mesh.position(v2),
            self.mesh.position(v3),
            self.mesh.position(v4),
        );
        if s.radius > radius {
            warn!(
                "closing triangle {t0:?} has circumradius {:.6} above its producing \
                 candidate {radius:.6}",
                s.radius
            );
        }
        self.heap.push(Candidate::triangle(s.radius, t0));

        self.remake_edge(e_43, t0, radius);
        self.remake_edge(e_cd, t0, radius);
        self.remake_edge(e_42, t0, radius);

        for old in [e_43, e_cd, e_42] {
            self.mesh.edge_mut(old).in_hull = false;
        }
        Ok(())
    }

    /// Resolves a popped triangle candidate. The face must share two of its
    /// edges with a single partner face, forming a pocket hinged on a
    /// degree-2 vertex; that vertex is removed and the surrounding quad is
    /// re-covered with two triangles.
    fn disappear_under_edge(&mut self, f: FaceId, radius: f64) -> Result<Operation, MeshError> {
        let face = self.mesh.face(f).clone();
        let slots = face.edges();
        let across = [
            self.mesh.edge(slots[0]).other_face(f),
            self.mesh.edge(slots[1]).other_face(f),
            self.mesh.edge(slots[2]).other_face(f),
        ];

        let (i, j) = if across[0] == across[1] {
            (0, 1)
        } else if across[0] == across[2] {
            (0, 2)
        } else if across[1] == across[2] {
            (1, 2)
        } else {
            warn!("triangle candidate {f:?} has no pocket partner, skipped");
            return Ok(Operation::Rejected);
        };
        let pocket = across[i];
        let k = 3 - i - j;

        // hinge vertex shared by the doubled slots, then the rest of the
        // face in winding order
        let ps = face.vertices();
        let a_idx = match (i, j) {
            (0, 1) => 1,
            (0, 2) => 0,
            _ => 2,
        };
        let a = ps[a_idx];
        let b = ps[(a_idx + 1) % 3];
        let c = ps[(a_idx + 2) % 3];

        let e_out = slots[k];
        let e4 = self.mesh.face(pocket).edge_excluding(slots[i], slots[j]);
        let f3 = self.mesh.edge(e_out).other_face(f);
        let f4 = self.mesh.edge(e4).other_face(pocket);
        let d = self.mesh.face(f3).third_vertex(b, c);
        let e_vtx = self.mesh.face(f4).third_vertex(b, c);

        // fan edges of the two outer faces, keyed on which one reaches `b`
        let pick = |mesh: &HullMesh, fid: FaceId, shared: EdgeId, near: VertId| {
            let es = mesh.face(fid).edges();
            let mut rest = es.into_iter().filter(|&x| x != shared);
            let (x, y) = match (rest.next(), rest.next()) {
                (Some(x), Some(y)) => (x, y),
                _ => return Err(MeshError::DeadEdgeRef(fid, shared)),
            };
            if mesh.edge(x).touches(near) {
                Ok((x, y))
            } else {
                Ok((y, x))
            }
        };
        let ef3 = pick(&self.mesh, f3, e_out, b)?;
        let ef4 = pick(&self.mesh, f4, e4, b)?;

        self.mesh.vert_mut(a).in_hull = false;
        self.active_vertexes -= 1;
        for dead in [f, pocket, f3, f4] {
            self.mesh.face_mut(dead).in_hull = false;
        }

        let t0 = self.mesh.next_face_id();
        let t1 = FaceId(t0.0 + 1);
        let base = self.mesh.next_edge_id();
        let bc = EdgeId(base.0 + 4);

        self.mesh.push_face(Triangle::new(
            b,
            d,
            c,
            base,
            EdgeId(base.0 + 1),
            bc,
        ));
        self.mesh.push_face(Triangle::new(
            b,
            c,
            e_vtx,
            bc,
            EdgeId(base.0 + 3),
            EdgeId(base.0 + 2),
        ));

        self.mesh.update_dead_face_ref(ef3.0, t0);
        self.mesh.update_dead_face_ref(ef3.1, t0);
        self.mesh.update_dead_face_ref(ef4.0, t1);
        self.mesh.update_dead_face_ref(ef4.1, t1);

        self.remake_edge(ef3.0, t0, radius);
        self.remake_edge(ef3.1, t0, radius);
        self.remake_edge(ef4.0, t1, radius);
        self.remake_edge(ef4.1, t1, radius);

        for old in [slots[i], slots[j], e_out, e4, ef3.0, ef3.1, ef4.0, ef4.1] {
            self.mesh.edge_mut(old).in_hull = false;
        }

        let pushed = self.mesh.push_edge(Edge::new(b, c, t1, t0));
        debug_assert_eq!(pushed, bc);
        self.mesh.register_edge(bc);
        let er = self.edge_radius(bc);
        if er < radius {
            self.heap.push(Candidate::edge(er, bc));
        } else {
            warn!(
                "quad diagonal {bc:?} has circumradius {er:.6} above its producing \
                 candidate {radius:.6}, not queued"
            );
        }

        Ok(Operation::DisappearedUnderEdge(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::TriMesh;

    const EPS: f64 = 1e-8;

    fn tetrahedron() -> TriMesh {
        let verts = [
            [1.0, 1.0, 1.0],
            [1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
        ];
        let indices = [0, 1, 2, 0, 3, 1, 0, 2, 3, 1, 3, 2];
        TriMesh::from_slices(&verts, &indices)
    }

    fn cube() -> TriMesh {
        let verts = [
            [-0.5, -0.5, -0.5],
            [0.5, -0.5, -0.5],
            [0.5, 0.5, -0.5],
            [-0.5, 0.5, -0.5],
            [-0.5, -0.5, 0.5],
            [0.5, -0.5, 0.5],
            [0.5, 0.5, 0.5],
            [-0.5, 0.5, 0.5],
        ];
        let indices = [
            0, 2, 1, 0, 3, 2, 4, 5, 6, 4, 6, 7, 0, 1, 5, 0, 5, 4, 2, 3, 7, 2, 7, 6, 0, 4, 7, 0,
            7, 3, 1, 2, 6, 1, 6, 5,
        ];
        TriMesh::from_slices(&verts, &indices)
    }

    /// A tetrahedron with a fifth vertex raised over face 0-1-2 so that the
    /// four points of the resulting fan sit on a common sphere whose radius
    /// barely exceeds the 1.9 target the tests run with. The fan's support
    /// spheres then coincide and the vertex qualifies for removal.
    fn capped_tetrahedron() -> TriMesh {
        let quad_radius = 1.9_f64 * 1.001;
        // face 0-1-2 has circumradius sqrt(8/3) and outward axis
        // (1, 1, -1)/sqrt(3) at plane offset 1/sqrt(3)
        let depth = (quad_radius * quad_radius - 8.0 / 3.0).sqrt();
        let offset = 1.0 / 3.0_f64.sqrt() - depth + quad_radius;
        let apex = offset / 3.0_f64.sqrt();
        let verts = [
            [1.0, 1.0, 1.0],
            [1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
            [apex, apex, -apex],
        ];
        let indices = [
            0, 1, 4, 1, 2, 4, 2, 0, 4, // fan over the split face
            0, 3, 1, 0, 2, 3, 1, 3, 2,
        ];
        TriMesh::from_slices(&verts, &indices)
    }

    fn drive(tris: &TriMesh, target_radius: f64) -> (Simplifier, Vec<Step>) {
        let mesh = HullMesh::from_tris(tris, target_radius, EPS).unwrap();
        let mut simplifier = Simplifier::new(mesh, target_radius, EPS);
        let mut steps = Vec::new();
        while let Some(step) = simplifier.step().unwrap() {
            steps.push(step);
        }
        (simplifier, steps)
    }

    #[test]
    fn loose_target_leaves_hull_untouched() {
        let (s, steps) = drive(&tetrahedron(), 299.98);
        assert!(steps.is_empty());
        assert_eq!(s.mesh().live_vert_count(), 4);
        assert_eq!(s.active_vertexes(), 4);
    }

    #[test]
    fn tetrahedral_floor_rejects_every_candidate() {
        // every circumradius of the regular tetrahedron exceeds the target,
        // but no vertex of a tetrahedron sits inside the circumsphere of
        // the other three
        let (s, steps) = drive(&tetrahedron(), 0.9);
        assert!(!steps.is_empty());
        assert!(steps.iter().all(|s| s.op == Operation::Rejected));
        assert_eq!(s.mesh().live_vert_count(), 4);
        assert_eq!(s.mesh().live_edge_count(), 6);
        assert_eq!(s.mesh().live_face_count(), 4);
    }

    #[test]
    fn cube_face_diagonals_are_flipped() {
        // the diagonal of each cube face spans two coplanar triangles, so
        // its circumradius degenerates to an enormous value and it is
        // flipped; every other candidate already fits the target
        let (s, steps) = drive(&cube(), 0.9);
        assert_eq!(steps.len(), 6);
        assert!(steps
            .iter()
            .all(|s| matches!(s.op, Operation::InvertedEdge(_))));
        assert_eq!(s.mesh().live_vert_count(), 8);
        assert_eq!(s.mesh().live_edge_count(), 18);
        assert_eq!(s.mesh().live_face_count(), 12);
        s.mesh().assert_hull_valid().unwrap();
    }

    #[test]
    fn cap_vertex_disappears() {
        let (s, steps) = drive(&capped_tetrahedron(), 1.9);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].op, Operation::DisappearedVertex(VertId(4)));
        assert_eq!(s.mesh().live_vert_count(), 4);
        assert_eq!(s.mesh().live_edge_count(), 6);
        assert_eq!(s.mesh().live_face_count(), 4);
        assert!(!s.mesh().vert(VertId(4)).in_hull);
        s.mesh().assert_hull_valid().unwrap();
    }

    #[test]
    fn popped_radii_never_increase() {
        let (_, steps) = drive(&cube(), 0.9);
        for pair in steps.windows(2) {
            assert!(pair[0].radius >= pair[1].radius);
        }
    }

    #[test]
    fn hull_flags_are_monotonic() {
        let tris = capped_tetrahedron();
        let mesh = HullMesh::from_tris(&tris, 1.9, EPS).unwrap();
        let mut simplifier = Simplifier::new(mesh, 1.9, EPS);

        let mut retired: Vec<bool> = vec![false; simplifier.mesh().verts().len()];
        while let Some(_) = simplifier.step().unwrap() {
            for (i, v) in simplifier.mesh().verts().iter().enumerate() {
                if retired[i] {
                    assert!(!v.in_hull, "vertex {i} came back into the hull");
                }
                if !v.in_hull {
                    retired[i] = true;
                }
            }
        }
    }
}
