//! Strictly convex hull generation: decimates a closed triangle mesh and
//! covers the survivors with small spheres, big spheres and torus patches
//! so that the result bounds the body with a strictly convex, smooth
//! surface.

use anyhow::{Context, Result};
use log::info;

use common::TriMesh;

pub mod geometry;
pub mod mesh;
pub mod model;
pub mod output;

pub use model::SchModel;

/// Geometric tolerance shared by the whole pipeline.
pub const EPSILON: f64 = 1e-8;

#[derive(Debug, Clone, Copy)]
pub struct SchParams {
    /// Radius of the small spheres placed on surviving vertices.
    pub r: f64,
    /// Radius of the big spheres supporting the surviving faces.
    pub big_r: f64,
}

impl Default for SchParams {
    fn default() -> Self {
        SchParams {
            r: 0.02,
            big_r: 300.0,
        }
    }
}

impl SchParams {
    /// Radius of the supporting spheres, the decimation target.
    pub fn alpha(&self) -> f64 {
        self.big_r - self.r
    }
}

#[derive(thiserror::Error, Debug)]
#[error(
    "body spans {max_distance:.6} but the supporting spheres only cover {limit:.6}, \
     increase R or decrease r"
)]
pub struct InfeasibleParameters {
    pub max_distance: f64,
    pub limit: f64,
}

/// Full pipeline: build the hull connectivity, decimate it to the target
/// radius and assemble the surface patches.
pub fn create_sch(tris: &TriMesh, params: &SchParams) -> Result<SchModel> {
    let hull = mesh::HullMesh::from_tris(tris, params.alpha(), EPSILON)
        .context("input is not a closed triangle mesh")?;

    let max_distance = hull.max_edge_length();
    let limit = 2.0 * params.alpha();
    if max_distance >= limit {
        return Err(InfeasibleParameters {
            max_distance,
            limit,
        }
        .into());
    }
    info!(
        "hull has {} vertices, {} edges, {} faces, longest edge {:.6}",
        hull.live_vert_count(),
        hull.live_edge_count(),
        hull.live_face_count(),
        max_distance
    );

    let mut simplifier = mesh::Simplifier::new(hull, params.alpha(), EPSILON);
    simplifier.run().context("hull decimation failed")?;

    let mut hull = simplifier.into_mesh();
    SchModel::assemble(&mut hull, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infeasible_radii_are_reported() {
        let verts = [
            [1.0, 1.0, 1.0],
            [1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
        ];
        let indices = [0, 1, 2, 0, 3, 1, 0, 2, 3, 1, 3, 2];
        let tris = TriMesh::from_slices(&verts, &indices);
        // edges are 2*sqrt(2) long but 2*alpha is only 1.8
        let params = SchParams { r: 0.1, big_r: 1.0 };
        let err = create_sch(&tris, &params).unwrap_err();
        assert!(err.downcast_ref::<InfeasibleParameters>().is_some());
    }

    #[test]
    fn default_params_match_the_cli_defaults() {
        let params = SchParams::default();
        assert_eq!(params.r, 0.02);
        assert_eq!(params.big_r, 300.0);
        assert!((params.alpha() - 299.98).abs() < 1e-12);
    }
}
