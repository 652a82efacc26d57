//! Wavefront OBJ format support.
//!
//! Saving writes the `.obj` file plus a companion `.mtl` material file next
//! to it. Material names are derived from the output file stem. Texture
//! images themselves are never written; a material's recorded filename is
//! referenced from `map_Kd` as-is.
//!
//! Loading is a plain text parse of `v` / `vt` / `f` / `usemtl` records,
//! sufficient to round-trip this crate's own output (faces with `v/t`
//! references are grouped into materials; normals and object groups are
//! ignored).

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point2, Point3};

use super::{Exporter, Format};
use crate::error::{MeshError, Result};
use crate::mesh::{MaterialId, TriMesh, UvId, VertexId};

/// OBJ exporter for the format registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjExporter;

impl ObjExporter {
    /// Create the exporter.
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for ObjExporter {
    fn format(&self) -> Format {
        Format::Obj
    }

    fn export(&self, mesh: &TriMesh, path: &Path) -> Result<()> {
        save(mesh, path)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh")
        .to_string()
}

fn material_name(stem: &str, index: usize) -> String {
    format!("{stem}_{index}")
}

/// Save a mesh to an OBJ file, writing the companion `.mtl` file beside it.
///
/// # Example
///
/// ```no_run
/// use meshport::io::obj;
/// use meshport::mesh::TriMesh;
///
/// let mesh = TriMesh::new();
/// obj::save(&mesh, "output.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let stem = file_stem(path);
    let mtl_path = path.with_extension("mtl");
    write_material_file(mesh, &mtl_path, &stem)?;

    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    writeln!(w, "# Wavefront OBJ file produced by meshport")?;
    writeln!(w)?;
    writeln!(
        w,
        "mtllib {}",
        mtl_path.file_name().and_then(|n| n.to_str()).unwrap_or("mesh.mtl")
    )?;
    writeln!(w)?;

    // Vertex list is 1-based and shared by every material group.
    writeln!(w, "# Model has {} vertices", mesh.num_vertices())?;
    let mut vmap: HashMap<VertexId, usize> = HashMap::new();
    for (i, vid) in mesh.vertex_ids().enumerate() {
        vmap.insert(vid, i + 1);
        let v = mesh
            .position(vid)
            .ok_or(MeshError::UnknownVertex { vertex: vid.index() })?;
        writeln!(w, "v\t{} {} {}", v.x, v.y, v.z)?;
    }
    writeln!(w)?;

    // vt indices are cumulative across the whole file, so each material's
    // map picks up where the previous one stopped.
    let mut next_uv = 1;
    let mut max_mid = 0;
    for mid in mesh.material_ids() {
        let mat = mesh
            .material(mid)
            .ok_or(MeshError::UnknownMaterial { material: mid.index() })?;
        let mname = material_name(&stem, mid.index());
        max_mid = max_mid.max(mid.index() + 1);

        writeln!(w, "# {} UV coordinates on material '{mname}'", mat.num_uvs())?;
        let mut uvmap: HashMap<UvId, usize> = HashMap::new();
        for uvid in mat.uv_ids() {
            uvmap.insert(uvid, next_uv);
            next_uv += 1;
            let uv = mat.uv(uvid).ok_or(MeshError::UnknownUv {
                material: mid.index(),
                uv: uvid.index(),
            })?;
            writeln!(w, "vt\t{} {} {}", uv.x, uv.y, 0.0)?;
        }
        writeln!(w)?;

        writeln!(w, "# Mesh '{mname}' with {} faces", mat.num_faces())?;
        writeln!(w, "usemtl {mname}")?;
        for fid in mat.faces() {
            let vs = mesh
                .face_vertices(fid)
                .ok_or(MeshError::UnknownFace { face: fid.index() })?;
            let uvs = mat
                .face_uvs(fid)
                .ok_or(MeshError::UnknownFace { face: fid.index() })?;
            writeln!(
                w,
                "f\t{}/{} {}/{} {}/{}",
                vmap[&vs[0]], uvmap[&uvs[0]], vmap[&vs[1]], uvmap[&uvs[1]], vmap[&vs[2]], uvmap[&uvs[2]]
            )?;
        }
        writeln!(w)?;
    }

    // Faces without a material go under a trailing pseudo-material with no
    // texture coordinates.
    if mesh.has_unmapped_faces() {
        let mname = material_name(&stem, max_mid);
        let remainder: Vec<_> = mesh.unmapped_faces().collect();
        writeln!(w, "# Mesh '{mname}' with {} faces", remainder.len())?;
        writeln!(w, "usemtl {mname}")?;
        for fid in remainder {
            let vs = mesh
                .face_vertices(fid)
                .ok_or(MeshError::UnknownFace { face: fid.index() })?;
            writeln!(w, "f\t{} {} {}", vmap[&vs[0]], vmap[&vs[1]], vmap[&vs[2]])?;
        }
        writeln!(w)?;
    }

    w.flush()?;
    Ok(())
}

// One record per material, plus a pseudo record when unmapped faces exist.
fn write_material_file(mesh: &TriMesh, path: &Path, stem: &str) -> Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    writeln!(w, "# Wavefront OBJ material file produced by meshport")?;
    writeln!(w)?;

    let mut max_mid = 0;
    for mid in mesh.material_ids() {
        let mat = mesh
            .material(mid)
            .ok_or(MeshError::UnknownMaterial { material: mid.index() })?;
        max_mid = max_mid.max(mid.index() + 1);
        writeln!(w, "newmtl {}", material_name(stem, mid.index()))?;
        writeln!(w, "illum 1")?;
        if let Some(texture) = mat.texture() {
            writeln!(w, "map_Kd {texture}")?;
        }
        writeln!(w)?;
    }

    if mesh.has_unmapped_faces() {
        writeln!(w, "newmtl {}", material_name(stem, max_mid))?;
        writeln!(w, "illum 1")?;
    }

    w.flush()?;
    Ok(())
}

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use meshport::io::obj;
///
/// let mesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let err = |lineno: usize, message: String| MeshError::LoadError {
        path: path.to_path_buf(),
        message: format!("line {}: {message}", lineno + 1),
    };

    let mut mesh = TriMesh::new();
    let mut vertices: Vec<VertexId> = Vec::new();
    let mut uvs: Vec<Point2<f64>> = Vec::new();
    // Materials are created lazily on the first textured face so that
    // pseudo-material groups without UVs don't produce empty materials.
    let mut materials: HashMap<String, MaterialId> = HashMap::new();
    let mut uv_ids: HashMap<(MaterialId, usize), UvId> = HashMap::new();
    let mut current: Option<String> = None;

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        let keyword = match parts.next() {
            Some(k) => k,
            None => continue,
        };

        match keyword {
            "v" => {
                let p = parse_floats::<3>(&mut parts)
                    .ok_or_else(|| err(lineno, "malformed vertex".to_string()))?;
                vertices.push(mesh.add_vertex(Point3::new(p[0], p[1], p[2])));
            }
            "vt" => {
                let p = parse_floats::<2>(&mut parts)
                    .ok_or_else(|| err(lineno, "malformed texture coordinate".to_string()))?;
                uvs.push(Point2::new(p[0], p[1]));
            }
            "usemtl" => {
                current = Some(parts.collect::<Vec<_>>().join(" "));
            }
            "f" => {
                let corners: Vec<(usize, Option<usize>)> = parts
                    .map(parse_corner)
                    .collect::<Option<_>>()
                    .ok_or_else(|| err(lineno, "malformed face".to_string()))?;
                if corners.len() < 3 {
                    return Err(err(lineno, "face with fewer than 3 vertices".to_string()));
                }
                // Fan-triangulate polygons.
                for i in 1..corners.len() - 1 {
                    let tri = [corners[0], corners[i], corners[i + 1]];
                    add_triangle(
                        &mut mesh,
                        &vertices,
                        &uvs,
                        &mut materials,
                        &mut uv_ids,
                        current.as_deref(),
                        tri,
                    )
                    .map_err(|e| err(lineno, e.to_string()))?;
                }
            }
            // Normals, smoothing groups, objects, and material libraries
            // carry nothing we model.
            "vn" | "s" | "o" | "g" | "mtllib" => {}
            other => {
                log::debug!("ignoring OBJ record '{other}'");
            }
        }
    }

    log::debug!(
        "loaded {}: {} vertices, {} faces, {} materials",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces(),
        mesh.num_materials()
    );
    Ok(mesh)
}

fn add_triangle(
    mesh: &mut TriMesh,
    vertices: &[VertexId],
    uvs: &[Point2<f64>],
    materials: &mut HashMap<String, MaterialId>,
    uv_ids: &mut HashMap<(MaterialId, usize), UvId>,
    current: Option<&str>,
    corners: [(usize, Option<usize>); 3],
) -> Result<()> {
    let mut vs = [VertexId::new(0); 3];
    for (slot, &(vi, _)) in vs.iter_mut().zip(&corners) {
        *slot = *vertices
            .get(vi.checked_sub(1).ok_or(MeshError::UnknownVertex { vertex: vi })?)
            .ok_or(MeshError::UnknownVertex { vertex: vi })?;
    }
    let fid = mesh.add_face(vs)?;

    let textured = current.is_some() && corners.iter().all(|&(_, t)| t.is_some());
    if !textured {
        return Ok(());
    }

    let name = current.unwrap_or_default();
    let mid = match materials.get(name) {
        Some(&mid) => mid,
        None => {
            let mid = mesh.add_material();
            materials.insert(name.to_string(), mid);
            mid
        }
    };

    let mut face_uvs = [UvId::new(0); 3];
    for (slot, &(_, ti)) in face_uvs.iter_mut().zip(&corners) {
        let ti = ti.unwrap_or_default();
        let idx = ti.checked_sub(1).ok_or(MeshError::UnknownUv {
            material: mid.index(),
            uv: ti,
        })?;
        let uv = *uvs.get(idx).ok_or(MeshError::UnknownUv {
            material: mid.index(),
            uv: ti,
        })?;
        *slot = match uv_ids.get(&(mid, idx)) {
            Some(&uvid) => uvid,
            None => {
                let uvid = mesh.add_uv(mid, uv)?;
                uv_ids.insert((mid, idx), uvid);
                uvid
            }
        };
    }
    mesh.map_face(mid, fid, face_uvs)
}

fn parse_floats<const N: usize>(parts: &mut std::str::SplitWhitespace<'_>) -> Option<[f64; N]> {
    let mut out = [0.0; N];
    for slot in &mut out {
        *slot = parts.next()?.parse().ok()?;
    }
    Some(out)
}

// A face corner is `v`, `v/t`, `v//n`, or `v/t/n`; only v and t are kept.
fn parse_corner(token: &str) -> Option<(usize, Option<usize>)> {
    let mut fields = token.split('/');
    let v: usize = fields.next()?.parse().ok()?;
    let t = match fields.next() {
        Some("") | None => None,
        Some(t) => Some(t.parse().ok()?),
    };
    Some((v, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mesh() -> TriMesh {
        let mut mesh = TriMesh::new();
        let vs: Vec<_> = [
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (0.5, 1.0, 0.0),
            (1.5, 1.0, 0.0),
            (2.0, 0.0, 0.0),
        ]
        .iter()
        .map(|&(x, y, z)| mesh.add_vertex(Point3::new(x, y, z)))
        .collect();
        let f0 = mesh.add_face([vs[0], vs[1], vs[2]]).unwrap();
        let f1 = mesh.add_face([vs[1], vs[3], vs[2]]).unwrap();
        // f2 stays unmapped.
        mesh.add_face([vs[1], vs[4], vs[3]]).unwrap();

        let m = mesh.add_material();
        mesh.set_texture(m, "skin.png").unwrap();
        let uv: Vec<_> = [(0.0, 0.0), (1.0, 0.0), (0.5, 1.0), (1.0, 1.0)]
            .iter()
            .map(|&(u, v)| mesh.add_uv(m, Point2::new(u, v)).unwrap())
            .collect();
        mesh.map_face(m, f0, [uv[0], uv[1], uv[2]]).unwrap();
        mesh.map_face(m, f1, [uv[1], uv[3], uv[2]]).unwrap();
        mesh
    }

    #[test]
    fn test_save_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.obj");
        save(&sample_mesh(), &path).unwrap();

        let obj = std::fs::read_to_string(&path).unwrap();
        assert!(obj.contains("mtllib sample.mtl"));
        assert_eq!(obj.matches("\nv\t").count(), 5);
        assert_eq!(obj.matches("\nvt\t").count(), 4);
        assert!(obj.contains("usemtl sample_0"));
        // Unmapped remainder under the pseudo-material, untextured.
        assert!(obj.contains("usemtl sample_1"));
        assert!(obj.contains("f\t2 5 4"));

        let mtl = std::fs::read_to_string(dir.path().join("sample.mtl")).unwrap();
        assert!(mtl.contains("newmtl sample_0"));
        assert!(mtl.contains("map_Kd skin.png"));
        assert!(mtl.contains("newmtl sample_1"));
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.obj");
        let mesh = sample_mesh();
        save(&mesh, &path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.num_vertices(), mesh.num_vertices());
        assert_eq!(loaded.num_faces(), mesh.num_faces());
        assert_eq!(loaded.num_materials(), 1);

        // Positions survive the text round trip.
        let orig: Vec<_> = mesh.vertex_ids().map(|v| *mesh.position(v).unwrap()).collect();
        let back: Vec<_> = loaded
            .vertex_ids()
            .map(|v| *loaded.position(v).unwrap())
            .collect();
        for (a, b) in orig.iter().zip(&back) {
            assert!((a - b).norm() < 1e-9);
        }

        // Mapped/unmapped split survives too.
        let mid = loaded.material_ids().next().unwrap();
        assert_eq!(loaded.material(mid).unwrap().num_faces(), 2);
        assert_eq!(loaded.unmapped_faces().count(), 1);
        assert_eq!(loaded.material(mid).unwrap().num_uvs(), 4);
    }

    #[test]
    fn test_load_fan_triangulation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.obj");
        std::fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .unwrap();

        let mesh = load(&path).unwrap();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 2);
    }

    #[test]
    fn test_load_rejects_bad_face_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nf 1 2 9\n").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, MeshError::LoadError { .. }));
    }

    #[test]
    fn test_parse_corner_variants() {
        assert_eq!(parse_corner("7"), Some((7, None)));
        assert_eq!(parse_corner("7/3"), Some((7, Some(3))));
        assert_eq!(parse_corner("7//2"), Some((7, None)));
        assert_eq!(parse_corner("7/3/2"), Some((7, Some(3))));
        assert_eq!(parse_corner("x"), None);
    }
}
