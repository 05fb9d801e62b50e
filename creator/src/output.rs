//! Plain-text serialization of the surface model. Blocks appear in global
//! index order: the two radii, then small spheres with their limiting
//! cones, big spheres with their support points and separating planes, and
//! torus patches, each preceded by a `1` marker line.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use glam::DVec3;

use crate::model::{BigSphere, Cone, SchModel, SmallSphere, Torus};

pub fn write_model(model: &SchModel, w: &mut impl Write) -> io::Result<()> {
    writeln!(w, "{} {}", model.radius, model.big_radius)?;

    writeln!(w, " {}", model.small_spheres.len())?;
    for ss in &model.small_spheres {
        writeln!(
            w,
            "{} {} {} {}",
            ss.radius, ss.center.x, ss.center.y, ss.center.z
        )?;
        writeln!(w, "{}", ss.cones.len())?;
        for (t, cone) in &ss.cones {
            writeln!(
                w,
                "{} {} {} {} {}",
                t, cone.cos_angle, cone.axis.x, cone.axis.y, cone.axis.z
            )?;
        }
    }

    writeln!(w, "{}", model.big_spheres.len())?;
    for bs in &model.big_spheres {
        writeln!(
            w,
            "{} {} {} {}",
            bs.radius, bs.center.x, bs.center.y, bs.center.z
        )?;
        let mut support = Vec::with_capacity(9);
        for &v in &bs.vertices {
            let c = model.small_spheres[v].center;
            support.extend([c.x, c.y, c.z]);
        }
        let support: Vec<String> = support.iter().map(f64::to_string).collect();
        writeln!(w, "{}", support.join(" "))?;
        for (t, n) in &bs.planes {
            writeln!(w, "{} {} {} {}", t, n.x, n.y, n.z)?;
        }
    }

    writeln!(w, "{}", model.tori.len())?;
    for torus in &model.tori {
        writeln!(w, "1")?;
        writeln!(
            w,
            "{} {} {} {} {} {} {} {}",
            torus.ext_radius,
            model.big_radius,
            torus.center.x,
            torus.center.y,
            torus.center.z,
            torus.normal.x,
            torus.normal.y,
            torus.normal.z
        )?;
        for (ss, cone) in &torus.cones {
            writeln!(
                w,
                "{} {} {} {} {}",
                ss, cone.cos_angle, cone.axis.x, cone.axis.y, cone.axis.z
            )?;
        }
        for (bs, n) in &torus.planes {
            writeln!(w, "{} {} {} {}", bs, n.x, n.y, n.z)?;
        }
    }
    Ok(())
}

pub fn write_to_file(model: &SchModel, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    let mut w = BufWriter::new(file);
    write_model(model, &mut w)
        .with_context(|| format!("failed to write model to {}", path.display()))?;
    w.flush()?;
    Ok(())
}

struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(s: &'a str) -> Self {
        Tokens {
            inner: s.split_whitespace(),
        }
    }

    fn f64(&mut self) -> Result<f64> {
        let tok = self.inner.next().context("unexpected end of model file")?;
        tok.parse()
            .with_context(|| format!("expected a number, found {tok:?}"))
    }

    fn usize(&mut self) -> Result<usize> {
        let tok = self.inner.next().context("unexpected end of model file")?;
        tok.parse()
            .with_context(|| format!("expected an index, found {tok:?}"))
    }

    fn vec3(&mut self) -> Result<DVec3> {
        Ok(DVec3::new(self.f64()?, self.f64()?, self.f64()?))
    }

    fn cone(&mut self) -> Result<(usize, Cone)> {
        let idx = self.usize()?;
        let cos_angle = self.f64()?;
        let axis = self.vec3()?;
        Ok((idx, Cone { axis, cos_angle }))
    }

    fn plane(&mut self) -> Result<(usize, DVec3)> {
        Ok((self.usize()?, self.vec3()?))
    }
}

/// Reads a model back from its text form. Support-point coordinates on the
/// big-sphere lines are resolved to small-sphere indices by exact match.
pub fn parse_model(s: &str) -> Result<SchModel> {
    let mut t = Tokens::new(s);

    let radius = t.f64()?;
    let big_radius = t.f64()?;

    let mut small_spheres = Vec::new();
    for _ in 0..t.usize()? {
        let r = t.f64()?;
        let center = t.vec3()?;
        let mut cones = Vec::new();
        for _ in 0..t.usize()? {
            cones.push(t.cone()?);
        }
        small_spheres.push(SmallSphere {
            center,
            radius: r,
            cones,
        });
    }

    let mut big_spheres = Vec::new();
    for _ in 0..t.usize()? {
        let r = t.f64()?;
        let center = t.vec3()?;
        let mut vertices = [0usize; 3];
        for v in &mut vertices {
            let p = t.vec3()?;
            *v = small_spheres
                .iter()
                .position(|ss| ss.center == p)
                .context("big sphere support point matches no small sphere")?;
        }
        let planes = [t.plane()?, t.plane()?, t.plane()?];
        big_spheres.push(BigSphere {
            center,
            radius: r,
            vertices,
            planes,
        });
    }

    let mut tori = Vec::new();
    for _ in 0..t.usize()? {
        let marker = t.usize()?;
        if marker != 1 {
            bail!("expected torus marker 1, found {marker}");
        }
        let ext_radius = t.f64()?;
        let _big_radius = t.f64()?;
        let center = t.vec3()?;
        let normal = t.vec3()?;
        let cones = [t.cone()?, t.cone()?];
        let planes = [t.plane()?, t.plane()?];
        tori.push(Torus {
            center,
            normal,
            ext_radius,
            cones,
            planes,
        });
    }

    Ok(SchModel {
        radius,
        big_radius,
        small_spheres,
        big_spheres,
        tori,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::HullMesh;
    use crate::{SchParams, EPSILON};
    use common::TriMesh;

    fn tetrahedron_model() -> SchModel {
        let verts = [
            [1.0, 1.0, 1.0],
            [1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
        ];
        let indices = [0, 1, 2, 0, 3, 1, 0, 2, 3, 1, 3, 2];
        let tris = TriMesh::from_slices(&verts, &indices);
        let params = SchParams {
            r: 0.02,
            big_r: 300.0,
        };
        let mut mesh = HullMesh::from_tris(&tris, params.alpha(), EPSILON).unwrap();
        SchModel::assemble(&mut mesh, &params).unwrap()
    }

    #[test]
    fn header_carries_both_radii() {
        let model = tetrahedron_model();
        let mut buf = Vec::new();
        write_model(&model, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("0.02 300"));
        assert_eq!(lines.next(), Some(" 4"));
    }

    #[test]
    fn only_the_small_sphere_count_is_indented() {
        let model = tetrahedron_model();
        let mut buf = Vec::new();
        write_model(&model, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        // header, " 4", then four small spheres of five lines each (centre,
        // cone count, three cones); big spheres and tori follow the same
        // five- and six-line block shapes
        assert_eq!(lines[1], " 4");
        assert_eq!(lines[22], "4");
        assert_eq!(lines[43], "6");
        assert_eq!(lines.len(), 80);
    }

    #[test]
    fn text_round_trip_is_lossless() {
        let model = tetrahedron_model();
        let mut buf = Vec::new();
        write_model(&model, &mut buf).unwrap();
        let parsed = parse_model(&String::from_utf8(buf).unwrap()).unwrap();

        assert_eq!(parsed.radius, model.radius);
        assert_eq!(parsed.big_radius, model.big_radius);
        assert_eq!(parsed.small_spheres.len(), model.small_spheres.len());
        assert_eq!(parsed.big_spheres.len(), model.big_spheres.len());
        assert_eq!(parsed.tori.len(), model.tori.len());

        for (a, b) in parsed.small_spheres.iter().zip(&model.small_spheres) {
            assert_eq!(a.center, b.center);
            assert_eq!(a.radius, b.radius);
            assert_eq!(a.cones, b.cones);
        }
        for (a, b) in parsed.big_spheres.iter().zip(&model.big_spheres) {
            assert_eq!(a.center, b.center);
            assert_eq!(a.vertices, b.vertices);
            assert_eq!(a.planes, b.planes);
        }
        for (a, b) in parsed.tori.iter().zip(&model.tori) {
            assert_eq!(a.center, b.center);
            assert_eq!(a.normal, b.normal);
            assert_eq!(a.ext_radius, b.ext_radius);
            assert_eq!(a.cones, b.cones);
            assert_eq!(a.planes, b.planes);
        }
    }

    #[test]
    fn truncated_input_is_an_error() {
        let model = tetrahedron_model();
        let mut buf = Vec::new();
        write_model(&model, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let truncated = &text[..text.len() / 2];
        assert!(parse_model(truncated).is_err());
    }
}
