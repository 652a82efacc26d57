//! IDTF (Intermediate Data Text Format) export.
//!
//! Produces the textual scene document consumed by U3D conversion tools:
//! a model node per sub-mesh segment, the model resource list holding each
//! segment's `MESH` block, shader/material/texture resource lists, and the
//! shading modifier.
//!
//! A mesh with N materials becomes N independent segments, plus one more
//! for any faces that belong to no material (that remainder segment never
//! carries texture coordinates). Each segment gets its own
//! [`SerializationIndex`] with numbering starting at 0.
//!
//! Texture images are not written here. Materials record a relative
//! filename which flows into the `TEXTURE_PATH` entries; persisting the
//! image bytes under that name is the caller's concern.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{Exporter, Format};
use crate::error::{MeshError, Result};
use crate::mesh::{MaterialId, TriMesh};
use crate::serialize::{tab, EmitOptions, SerializationIndex, SubMesh};

/// IDTF exporter for the format registry.
#[derive(Debug, Clone, Default)]
pub struct IdtfExporter {
    options: EmitOptions,
}

impl IdtfExporter {
    /// Create an exporter with default emit options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the Z-up axis remap for emitted positions.
    pub fn with_axis_remap(mut self, remap: bool) -> Self {
        self.options.axis_remap = remap;
        self
    }
}

impl Exporter for IdtfExporter {
    fn format(&self) -> Format {
        Format::Idtf
    }

    fn export(&self, mesh: &TriMesh, path: &Path) -> Result<()> {
        save_with(mesh, path, &self.options)
    }
}

/// Save a mesh to an IDTF file with default options.
///
/// # Example
///
/// ```no_run
/// use meshport::io::idtf;
/// use meshport::mesh::TriMesh;
///
/// let mesh = TriMesh::new();
/// idtf::save(&mesh, "output.idtf").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    save_with(mesh, path.as_ref(), &EmitOptions::default())
}

/// Save a mesh to an IDTF file with explicit emit options.
pub fn save_with(mesh: &TriMesh, path: &Path, opts: &EmitOptions) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_document(mesh, opts, &mut writer).map_err(|e| match e {
        MeshError::Io(io) => MeshError::SaveError {
            path: path.to_path_buf(),
            message: io.to_string(),
        },
        other => other,
    })?;
    writer.flush()?;
    Ok(())
}

/// One output segment: the owning material (if any) and its index.
struct Segment {
    material: Option<MaterialId>,
    index: SerializationIndex,
}

/// Split the mesh into independent output segments: one per material, plus
/// the unmapped remainder. A mesh without materials is a single segment.
fn build_segments(mesh: &TriMesh) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    if mesh.num_materials() == 0 {
        segments.push(Segment {
            material: None,
            index: SerializationIndex::build(mesh, SubMesh::All)?,
        });
        return Ok(segments);
    }

    for mid in mesh.material_ids() {
        segments.push(Segment {
            material: Some(mid),
            index: SerializationIndex::build(mesh, SubMesh::Material(mid))?,
        });
    }
    if mesh.has_unmapped_faces() {
        segments.push(Segment {
            material: None,
            index: SerializationIndex::build(mesh, SubMesh::Unmapped)?,
        });
    }
    Ok(segments)
}

/// Write the complete IDTF document to a sink.
pub fn write_document<W: Write>(mesh: &TriMesh, opts: &EmitOptions, w: &mut W) -> Result<()> {
    let segments = build_segments(mesh)?;
    let names: Vec<String> = (1..=segments.len()).map(|i| format!("Model{i:02}")).collect();

    // Textured materials in ascending id order; shader i maps to texture i.
    let textures: Vec<(MaterialId, String)> = mesh
        .material_ids()
        .filter_map(|mid| {
            mesh.material(mid)
                .and_then(|m| m.texture())
                .map(|t| (mid, t.to_string()))
        })
        .collect();

    log::debug!(
        "IDTF document: {} segment(s), {} texture(s)",
        segments.len(),
        textures.len()
    );

    writeln!(w, "FILE_FORMAT \"IDTF\"")?;
    writeln!(w, "FORMAT_VERSION 100")?;
    writeln!(w)?;

    for name in &names {
        node_model(w, name)?;
    }

    let t = tab(1);
    writeln!(w, "RESOURCE_LIST \"MODEL\" {{")?;
    writeln!(w, "{t}RESOURCE_COUNT {}", segments.len())?;
    for (i, (segment, name)) in segments.iter().zip(&names).enumerate() {
        writeln!(w, "{t}RESOURCE {i} {{")?;
        writeln!(w, "{}RESOURCE_NAME \"{name}\"", tab(2))?;
        writeln!(w, "{}MODEL_TYPE \"MESH\"", tab(2))?;
        segment.index.emit(mesh, opts, w)?;
        writeln!(w, "{t}}}")?;
    }
    writeln!(w, "}}")?;
    writeln!(w)?;

    resource_list_shader(w, textures.len())?;
    resource_list_material(w)?;
    resource_list_texture(w, &textures)?;

    for (segment, name) in segments.iter().zip(&names) {
        let shader = segment
            .material
            .and_then(|mid| textures.iter().position(|&(tm, _)| tm == mid))
            .unwrap_or(0);
        modifier_shading(w, name, shader)?;
    }
    Ok(())
}

fn node_model<W: Write>(w: &mut W, name: &str) -> Result<()> {
    let (t, tt, ttt, tttt) = (tab(1), tab(2), tab(3), tab(4));
    writeln!(w, "NODE \"MODEL\" {{")?;
    writeln!(w, "{t}NODE_NAME \"{name}\"")?;
    writeln!(w, "{t}PARENT_LIST {{")?;
    writeln!(w, "{tt}PARENT_COUNT 1")?;
    writeln!(w, "{tt}PARENT 0 {{")?;
    writeln!(w, "{ttt}PARENT_NAME \"<NULL>\"")?;
    writeln!(w, "{ttt}PARENT_TM {{")?;
    writeln!(w, "{tttt}1.000000 0.000000 0.000000 0.000000")?;
    writeln!(w, "{tttt}0.000000 1.000000 0.000000 0.000000")?;
    writeln!(w, "{tttt}0.000000 0.000000 1.000000 0.000000")?;
    writeln!(w, "{tttt}0.000000 0.000000 0.000000 1.000000")?;
    writeln!(w, "{ttt}}}")?;
    writeln!(w, "{tt}}}")?;
    writeln!(w, "{t}}}")?;
    writeln!(w, "{t}RESOURCE_NAME \"{name}\"")?;
    writeln!(w, "}}")?;
    writeln!(w)?;
    Ok(())
}

// One shader per texture map; at least one shader even when untextured.
fn resource_list_shader<W: Write>(w: &mut W, num_textures: usize) -> Result<()> {
    let (t, tt, ttt, tttt) = (tab(1), tab(2), tab(3), tab(4));
    let has_textures = num_textures > 0;
    let count = num_textures.max(1);
    writeln!(w, "RESOURCE_LIST \"SHADER\" {{")?;
    writeln!(w, "{t}RESOURCE_COUNT {count}")?;
    for i in 0..count {
        writeln!(w, "{t}RESOURCE {i} {{")?;
        writeln!(w, "{tt}RESOURCE_NAME \"ModelShader{i}\"")?;
        writeln!(w, "{tt}SHADER_MATERIAL_NAME \"Mat01\"")?;
        writeln!(w, "{tt}SHADER_ACTIVE_TEXTURE_COUNT {}", usize::from(has_textures))?;
        if has_textures {
            writeln!(w, "{tt}SHADER_TEXTURE_LAYER_LIST {{")?;
            writeln!(w, "{ttt}TEXTURE_LAYER 0 {{")?;
            writeln!(w, "{tttt}TEXTURE_NAME \"Texture{i}\"")?;
            writeln!(w, "{ttt}}}")?;
            writeln!(w, "{tt}}}")?;
        }
        writeln!(w, "{t}}}")?;
    }
    writeln!(w, "}}")?;
    writeln!(w)?;
    Ok(())
}

// All shaders reference the same flat white material record.
fn resource_list_material<W: Write>(w: &mut W) -> Result<()> {
    let (t, tt) = (tab(1), tab(2));
    writeln!(w, "RESOURCE_LIST \"MATERIAL\" {{")?;
    writeln!(w, "{t}RESOURCE_COUNT 1")?;
    writeln!(w, "{t}RESOURCE 0 {{")?;
    writeln!(w, "{tt}RESOURCE_NAME \"Mat01\"")?;
    writeln!(w, "{tt}MATERIAL_AMBIENT 1.0 1.0 1.0")?;
    writeln!(w, "{tt}MATERIAL_DIFFUSE 1.0 1.0 1.0")?;
    writeln!(w, "{tt}MATERIAL_SPECULAR 0.0 0.0 0.0")?;
    writeln!(w, "{tt}MATERIAL_EMISSIVE 0.0 0.0 0.0")?;
    writeln!(w, "{tt}MATERIAL_REFLECTIVITY 0.000000")?;
    writeln!(w, "{tt}MATERIAL_OPACITY 1.000000")?;
    writeln!(w, "{t}}}")?;
    writeln!(w, "}}")?;
    writeln!(w)?;
    Ok(())
}

fn resource_list_texture<W: Write>(w: &mut W, textures: &[(MaterialId, String)]) -> Result<()> {
    if textures.is_empty() {
        return Ok(());
    }
    let (t, tt) = (tab(1), tab(2));
    writeln!(w, "RESOURCE_LIST \"TEXTURE\" {{")?;
    writeln!(w, "{t}RESOURCE_COUNT {}", textures.len())?;
    for (i, (_, filename)) in textures.iter().enumerate() {
        writeln!(w, "{t}RESOURCE {i} {{")?;
        writeln!(w, "{tt}RESOURCE_NAME \"Texture{i}\"")?;
        writeln!(w, "{tt}TEXTURE_PATH \"{filename}\"")?;
        writeln!(w, "{t}}}")?;
    }
    writeln!(w, "}}")?;
    writeln!(w)?;
    Ok(())
}

fn modifier_shading<W: Write>(w: &mut W, name: &str, shader: usize) -> Result<()> {
    let (t, tt, ttt, tttt, ttttt) = (tab(1), tab(2), tab(3), tab(4), tab(5));
    writeln!(w, "MODIFIER \"SHADING\" {{")?;
    writeln!(w, "{t}MODIFIER_NAME \"{name}\"")?;
    writeln!(w, "{t}PARAMETERS {{")?;
    writeln!(w, "{tt}SHADER_LIST_COUNT 1")?;
    writeln!(w, "{tt}SHADER_LIST_LIST {{")?;
    writeln!(w, "{ttt}SHADER_LIST 0 {{")?;
    writeln!(w, "{tttt}SHADER_COUNT 1")?;
    writeln!(w, "{tttt}SHADER_NAME_LIST {{")?;
    writeln!(w, "{ttttt}SHADER 0 NAME: \"ModelShader{shader}\"")?;
    writeln!(w, "{tttt}}}")?;
    writeln!(w, "{ttt}}}")?;
    writeln!(w, "{tt}}}")?;
    writeln!(w, "{t}}}")?;
    writeln!(w, "}}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point2, Point3};

    fn write_to_string(mesh: &TriMesh, opts: &EmitOptions) -> String {
        let mut out = Vec::new();
        write_document(mesh, opts, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn count_occurrences(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    fn textured_two_material_mesh() -> TriMesh {
        let mut mesh = TriMesh::new();
        let vs: Vec<_> = (0..9)
            .map(|i| mesh.add_vertex(Point3::new(i as f64, (i % 3) as f64, 0.0)))
            .collect();
        let f0 = mesh.add_face([vs[0], vs[1], vs[2]]).unwrap();
        let f1 = mesh.add_face([vs[3], vs[4], vs[5]]).unwrap();
        // Third face stays unmapped.
        mesh.add_face([vs[6], vs[7], vs[8]]).unwrap();

        for (mid_idx, fid) in [(0, f0), (1, f1)] {
            let mid = mesh.add_material();
            mesh.set_texture(mid, format!("model_M{mid_idx}.tga")).unwrap();
            let uvs: Vec<_> = (0..3)
                .map(|i| mesh.add_uv(mid, Point2::new(i as f64 * 0.5, 0.0)).unwrap())
                .collect();
            mesh.map_face(mid, fid, [uvs[0], uvs[1], uvs[2]]).unwrap();
        }
        mesh
    }

    #[test]
    fn test_document_structure_untextured() {
        let mut mesh = TriMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(0.5, 1.0, 0.0));
        mesh.add_face([a, b, c]).unwrap();

        let out = write_to_string(&mesh, &EmitOptions::default());

        assert!(out.starts_with("FILE_FORMAT \"IDTF\"\nFORMAT_VERSION 100\n"));
        assert_eq!(count_occurrences(&out, "NODE \"MODEL\""), 1);
        assert!(out.contains("RESOURCE_COUNT 1"));
        assert!(out.contains("MODEL_TYPE \"MESH\""));
        // One placeholder shader with no texture layers.
        assert!(out.contains("SHADER_ACTIVE_TEXTURE_COUNT 0"));
        assert!(!out.contains("RESOURCE_LIST \"TEXTURE\""));
        assert!(out.contains("MODIFIER \"SHADING\""));
    }

    #[test]
    fn test_one_segment_per_material_plus_remainder() {
        let mesh = textured_two_material_mesh();
        let out = write_to_string(&mesh, &EmitOptions::default());

        // 2 materials + 1 unmapped remainder.
        assert_eq!(count_occurrences(&out, "NODE \"MODEL\""), 3);
        assert!(out.contains("RESOURCE_COUNT 3"));
        assert_eq!(count_occurrences(&out, "MESH {"), 3);
        // Every segment is single-material, so each holds exactly one face
        // and numbers its vertices from 0.
        assert_eq!(count_occurrences(&out, "FACE_COUNT 1"), 3);
        assert_eq!(count_occurrences(&out, "MODEL_POSITION_COUNT 3"), 3);
        // The remainder segment has no UV data.
        assert_eq!(count_occurrences(&out, "MODEL_TEXTURE_COORD_COUNT 3"), 2);
        assert_eq!(count_occurrences(&out, "MODEL_TEXTURE_COORD_COUNT 0"), 1);
        assert_eq!(count_occurrences(&out, "MODIFIER \"SHADING\""), 3);
    }

    #[test]
    fn test_texture_resource_list() {
        let mesh = textured_two_material_mesh();
        let out = write_to_string(&mesh, &EmitOptions::default());

        assert!(out.contains("RESOURCE_LIST \"TEXTURE\""));
        assert!(out.contains("TEXTURE_PATH \"model_M0.tga\""));
        assert!(out.contains("TEXTURE_PATH \"model_M1.tga\""));
        // One shader per texture map.
        assert!(out.contains("RESOURCE_NAME \"ModelShader0\""));
        assert!(out.contains("RESOURCE_NAME \"ModelShader1\""));
        assert!(out.contains("SHADER 0 NAME: \"ModelShader1\""));
    }

    #[test]
    fn test_empty_mesh_document() {
        let mesh = TriMesh::new();
        let out = write_to_string(&mesh, &EmitOptions::default());
        assert!(out.contains("FACE_COUNT 0"));
        assert!(out.contains("RESOURCE_COUNT 1"));
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.idtf");

        let mesh = textured_two_material_mesh();
        let exporter = IdtfExporter::new().with_axis_remap(true);
        exporter.export(&mesh, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("FILE_FORMAT \"IDTF\""));
    }
}
