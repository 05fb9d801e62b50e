//! Assembly of the final surface model from a decimated hull: one small
//! sphere per vertex, one big sphere per face and one torus patch per edge,
//! all indexed in a single global space (small spheres first, then big
//! spheres, then tori).

use anyhow::{ensure, Context, Result};
use glam::DVec3;

use crate::mesh::{EdgeId, FaceId, HullMesh, VertId};
use crate::{geometry, SchParams, EPSILON};

/// Half-angle cone bounding the arc of a torus that a neighbouring patch
/// can see.
#[derive(Debug, Clone, PartialEq)]
pub struct Cone {
    pub axis: DVec3,
    pub cos_angle: f64,
}

#[derive(Debug, Clone)]
pub struct SmallSphere {
    pub center: DVec3,
    pub radius: f64,
    /// Per incident torus: the torus's global index and the limiting cone
    /// seen from this sphere.
    pub cones: Vec<(usize, Cone)>,
}

#[derive(Debug, Clone)]
pub struct BigSphere {
    pub center: DVec3,
    pub radius: f64,
    /// Global indices of the three small spheres under this patch.
    pub vertices: [usize; 3],
    /// Per face edge: the bordering torus's global index and the separating
    /// plane normal.
    pub planes: [(usize, DVec3); 3],
}

#[derive(Debug, Clone)]
pub struct Torus {
    pub center: DVec3,
    pub normal: DVec3,
    pub ext_radius: f64,
    /// Per endpoint: the small sphere's index and its limiting cone.
    pub cones: [(usize, Cone); 2],
    /// Per bordering face: the big sphere's global index and the separating
    /// plane normal.
    pub planes: [(usize, DVec3); 2],
}

#[derive(Debug, Clone)]
pub struct SchModel {
    pub radius: f64,
    pub big_radius: f64,
    pub small_spheres: Vec<SmallSphere>,
    pub big_spheres: Vec<BigSphere>,
    pub tori: Vec<Torus>,
}

impl SchModel {
    /// Number of small spheres, the base of the big-sphere index range.
    pub fn small_count(&self) -> usize {
        self.small_spheres.len()
    }

    /// Base of the torus index range.
    pub fn torus_base(&self) -> usize {
        self.small_spheres.len() + self.big_spheres.len()
    }

    /// Walks the decimated hull and emits every surface patch. Assigns the
    /// per-entity model indices on the mesh as it goes.
    pub fn assemble(mesh: &mut HullMesh, params: &SchParams) -> Result<SchModel> {
        let alpha = params.alpha();

        let mut small_spheres = Vec::new();
        for i in 0..mesh.verts().len() {
            if !mesh.verts()[i].in_hull {
                continue;
            }
            mesh.vert_mut(VertId(i)).small_sphere = Some(small_spheres.len());
            small_spheres.push(SmallSphere {
                center: mesh.position(VertId(i)),
                radius: params.r,
                cones: Vec::new(),
            });
        }
        let s_base = small_spheres.len();

        let mut big_spheres = Vec::new();
        for i in 0..mesh.faces().len() {
            if !mesh.faces()[i].in_hull {
                continue;
            }
            let face = mesh.face(FaceId(i)).clone();
            let support = geometry::sphere_through_points(
                mesh.position(face.p1),
                mesh.position(face.p2),
                mesh.position(face.p3),
                alpha,
                EPSILON,
            );
            let vertices = [
                small_index(mesh, face.p1)?,
                small_index(mesh, face.p2)?,
                small_index(mesh, face.p3)?,
            ];
            mesh.face_mut(FaceId(i)).big_sphere = Some(big_spheres.len());
            big_spheres.push(BigSphere {
                center: support.center,
                radius: params.big_r,
                vertices,
                planes: [(0, DVec3::ZERO); 3],
            });
        }
        let t_base = s_base + big_spheres.len();

        let mut tori = Vec::new();
        for i in 0..mesh.edges().len() {
            if !mesh.edges()[i].in_hull {
                continue;
            }
            let edge = mesh.edge(EdgeId(i)).clone();
            let bs = mesh
                .face(edge.face1)
                .big_sphere
                .context("live edge borders a face with no big sphere")?;
            let ca = mesh.position(edge.vertex1);
            let cb = mesh.position(edge.vertex2);
            let center = (ca + cb) / 2.0;
            let normal = (ca - cb).normalize();
            let cos_angle = ca.distance(cb) / (2.0 * alpha);

            mesh.edge_mut(EdgeId(i)).torus = Some(tori.len());
            tori.push(Torus {
                center,
                normal,
                ext_radius: center.distance(big_spheres[bs].center),
                cones: [
                    (
                        small_index(mesh, edge.vertex1)?,
                        Cone {
                            axis: normal,
                            cos_angle,
                        },
                    ),
                    (
                        small_index(mesh, edge.vertex2)?,
                        Cone {
                            axis: -normal,
                            cos_angle,
                        },
                    ),
                ],
                planes: [(0, DVec3::ZERO); 2],
            });
        }

        // separating planes, one per face edge, shared with the torus on
        // the other side
        let mut torus_planes: Vec<Vec<(usize, DVec3)>> = vec![Vec::new(); tori.len()];
        for i in 0..mesh.faces().len() {
            if !mesh.faces()[i].in_hull {
                continue;
            }
            let face = mesh.face(FaceId(i)).clone();
            let bs = face
                .big_sphere
                .context("live face has no big sphere")?;
            let center = big_spheres[bs].center;
            let pairs = [
                (face.e1, face.p1, face.p2),
                (face.e2, face.p2, face.p3),
                (face.e3, face.p3, face.p1),
            ];
            for (slot, (e, pa, pb)) in pairs.into_iter().enumerate() {
                let t = mesh
                    .edge(e)
                    .torus
                    .context("live face borders an edge with no torus")?;
                let n = (mesh.position(pa) - center)
                    .cross(mesh.position(pb) - center)
                    .normalize();
                big_spheres[bs].planes[slot] = (t_base + t, n);
                torus_planes[t].push((s_base + bs, n));
            }
        }
        for (t, planes) in torus_planes.into_iter().enumerate() {
            ensure!(
                planes.len() == 2,
                "torus {t} is bordered by {} faces instead of 2",
                planes.len()
            );
            tori[t].planes = [planes[0], planes[1]];
        }

        // limiting cones seen from each small sphere, one per incident
        // torus, picked by matching sphere index
        for i in 0..mesh.verts().len() {
            if !mesh.verts()[i].in_hull {
                continue;
            }
            let ss = small_index(mesh, VertId(i))?;
            let incident: Vec<EdgeId> = mesh
                .vert(VertId(i))
                .neighbours()
                .iter()
                .copied()
                .filter(|&e| mesh.edge(e).in_hull)
                .collect();
            for e in incident {
                let t = mesh
                    .edge(e)
                    .torus
                    .context("live edge has no torus")?;
                let torus = &tori[t];
                let cone = if torus.cones[0].0 == ss {
                    torus.cones[0].1.clone()
                } else {
                    torus.cones[1].1.clone()
                };
                small_spheres[ss].cones.push((t_base + t, cone));
            }
        }

        Ok(SchModel {
            radius: params.r,
            big_radius: params.big_r,
            small_spheres,
            big_spheres,
            tori,
        })
    }
}

fn small_index(mesh: &HullMesh, v: VertId) -> Result<usize> {
    mesh.vert(v)
        .small_sphere
        .context("live vertex has no small sphere")
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::TriMesh;

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

    fn assembled_tetrahedron(params: &SchParams) -> SchModel {
        let mut mesh = HullMesh::from_tris(&tetrahedron(), params.alpha(), EPSILON).unwrap();
        SchModel::assemble(&mut mesh, params).unwrap()
    }

    #[test]
    fn one_patch_per_hull_entity() {
        let params = SchParams {
            r: 0.02,
            big_r: 300.0,
        };
        let model = assembled_tetrahedron(&params);
        assert_eq!(model.small_spheres.len(), 4);
        assert_eq!(model.big_spheres.len(), 4);
        assert_eq!(model.tori.len(), 6);
        assert_eq!(model.radius, 0.02);
        assert_eq!(model.big_radius, 300.0);
    }

    #[test]
    fn big_sphere_supports_its_three_vertices() {
        let params = SchParams {
            r: 0.02,
            big_r: 300.0,
        };
        let model = assembled_tetrahedron(&params);
        let alpha = params.alpha();
        for bs in &model.big_spheres {
            for &v in &bs.vertices {
                let d = bs.center.distance(model.small_spheres[v].center);
                assert!((d - alpha).abs() < 1e-5, "support distance {d}");
            }
        }
    }

    #[test]
    fn torus_indices_partition_the_global_space() {
        let params = SchParams {
            r: 0.02,
            big_r: 300.0,
        };
        let model = assembled_tetrahedron(&params);
        let t_base = model.torus_base();
        let t_end = t_base + model.tori.len();

        for ss in &model.small_spheres {
            // a tetrahedron vertex touches three tori
            assert_eq!(ss.cones.len(), 3);
            for &(t, _) in &ss.cones {
                assert!((t_base..t_end).contains(&t));
            }
        }
        for bs in &model.big_spheres {
            for &(t, n) in &bs.planes {
                assert!((t_base..t_end).contains(&t));
                assert!((n.length() - 1.0).abs() < 1e-9);
            }
            for &v in &bs.vertices {
                assert!(v < model.small_count());
            }
        }
        for torus in &model.tori {
            for &(f, _) in &torus.planes {
                assert!((model.small_count()..t_base).contains(&f));
            }
            assert!(torus.ext_radius >= 0.0);
        }
    }

    #[test]
    fn endpoint_cones_point_along_the_edge() {
        let params = SchParams {
            r: 0.02,
            big_r: 300.0,
        };
        let model = assembled_tetrahedron(&params);
        for torus in &model.tori {
            let (a, ref cone_a) = torus.cones[0];
            let (b, ref cone_b) = torus.cones[1];
            assert_ne!(a, b);
            assert!(cone_a.axis.distance(-cone_b.axis) < 1e-12);
            assert_eq!(cone_a.cos_angle, cone_b.cos_angle);
            let span = model.small_spheres[a]
                .center
                .distance(model.small_spheres[b].center);
            assert!((cone_a.cos_angle - span / (2.0 * params.alpha())).abs() < 1e-12);
        }
    }
}
