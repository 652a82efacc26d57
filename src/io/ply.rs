//! PLY (Stanford polygon) format support, ASCII flavor, export only.
//!
//! Only geometry is written: a vertex element with `x y z` properties and a
//! face element with a vertex index list. Materials and UVs have no standard
//! PLY representation and are dropped.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{Exporter, Format};
use crate::error::{MeshError, Result};
use crate::mesh::{TriMesh, VertexId};

/// PLY exporter for the format registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlyExporter;

impl PlyExporter {
    /// Create the exporter.
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for PlyExporter {
    fn format(&self) -> Format {
        Format::Ply
    }

    fn export(&self, mesh: &TriMesh, path: &Path) -> Result<()> {
        save(mesh, path)
    }
}

/// Save a mesh to an ASCII PLY file.
///
/// # Example
///
/// ```no_run
/// use meshport::io::ply;
/// use meshport::mesh::TriMesh;
///
/// let mesh = TriMesh::new();
/// ply::save(&mesh, "output.ply").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    writeln!(w, "ply")?;
    writeln!(w, "format ascii 1.0")?;
    writeln!(w, "comment produced by meshport")?;
    writeln!(w, "element vertex {}", mesh.num_vertices())?;
    writeln!(w, "property float x")?;
    writeln!(w, "property float y")?;
    writeln!(w, "property float z")?;
    writeln!(w, "element face {}", mesh.num_faces())?;
    writeln!(w, "property list uchar int vertex_index")?;
    writeln!(w, "end_header")?;

    // PLY faces index into the vertex element, 0-based in file order.
    let mut vmap: HashMap<VertexId, usize> = HashMap::new();
    for (i, vid) in mesh.vertex_ids().enumerate() {
        vmap.insert(vid, i);
        let v = mesh
            .position(vid)
            .ok_or(MeshError::UnknownVertex { vertex: vid.index() })?;
        writeln!(w, "{} {} {}", v.x, v.y, v.z)?;
    }

    for fid in mesh.face_ids() {
        let vs = mesh
            .face_vertices(fid)
            .ok_or(MeshError::UnknownFace { face: fid.index() })?;
        writeln!(w, "3 {} {} {}", vmap[&vs[0]], vmap[&vs[1]], vmap[&vs[2]])?;
    }

    w.flush()?;
    Ok(())
}
