use anyhow::Context;
use glam::DVec3;
use obj::Obj;

/// Raw triangle soup: positions plus index triples, no orientation
/// consistency assumed.
pub struct TriMesh {
    pub verts: Box<[DVec3]>,
    pub indices: Box<[u32]>,
}

impl TriMesh {
    pub fn from_obj(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let obj =
            Obj::load(&path).with_context(|| format!("Failed to load OBJ {:?}", path.as_ref()))?;

        let verts: Box<[DVec3]> = obj
            .data
            .position
            .iter()
            .map(|&[x, y, z]| DVec3::new(x as f64, y as f64, z as f64))
            .collect();

        let mut indices = Vec::new();
        for object in &obj.data.objects {
            for group in &object.groups {
                for poly in &group.polys {
                    anyhow::ensure!(
                        poly.0.len() == 3,
                        "Polygon with {} corners in {:?}, triangulate the mesh first",
                        poly.0.len(),
                        path.as_ref()
                    );
                    for corner in &poly.0 {
                        indices.push(corner.0 as u32);
                    }
                }
            }
        }

        Ok(TriMesh {
            verts,
            indices: indices.into(),
        })
    }

    /// Construct directly from slices, mainly for tests and embedding.
    pub fn from_slices(verts: &[[f64; 3]], indices: &[u32]) -> Self {
        TriMesh {
            verts: verts.iter().map(|&[x, y, z]| DVec3::new(x, y, z)).collect(),
            indices: indices.into(),
        }
    }

    pub fn tri_count(&self) -> usize {
        self.indices.len() / 3
    }
}
