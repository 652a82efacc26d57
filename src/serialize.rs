//! Deduplicated index construction and mesh block emission.
//!
//! This module is the heart of the crate: it converts a [`TriMesh`] (or one
//! material's sub-mesh) into a self-consistent, 0-based, deduplicated index
//! space and emits it as the parallel lists of an IDTF `MESH` block.
//!
//! The two steps are separate on purpose. The output format requires final
//! counts in its header before any body line, so [`SerializationIndex::build`]
//! must fully complete before [`SerializationIndex::emit`] writes anything.
//! An index is built fresh for each output segment and discarded after.
//!
//! # Example
//!
//! ```
//! use meshport::mesh::TriMesh;
//! use meshport::serialize::{EmitOptions, SerializationIndex, SubMesh};
//! use nalgebra::Point3;
//!
//! let mut mesh = TriMesh::new();
//! let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
//! let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
//! let c = mesh.add_vertex(Point3::new(0.5, 1.0, 0.0));
//! mesh.add_face([a, b, c]).unwrap();
//!
//! let index = SerializationIndex::build(&mesh, SubMesh::All).unwrap();
//! assert_eq!(index.num_vertices(), 3);
//!
//! let mut out = Vec::new();
//! index.emit(&mesh, &EmitOptions::default(), &mut out).unwrap();
//! ```

use std::collections::BTreeSet;
use std::io::Write;

use indexmap::IndexMap;

use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, MaterialId, TriMesh, UvId, VertexId};

/// The face set a [`SerializationIndex`] is built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubMesh {
    /// Every face in the mesh.
    All,
    /// The faces owned by one material.
    Material(MaterialId),
    /// The faces that belong to no material. UVs are never indexed for
    /// this selection.
    Unmapped,
}

/// Options applied during emission.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmitOptions {
    /// Remap every emitted position `(x, y, z)` to `(x, z, -y)` for
    /// consumers with a Z-up convention. Never applied to UVs.
    pub axis_remap: bool,
}

/// The deduplicated, 0-based numbering built fresh for one output pass.
///
/// Slot assignment is first-seen-wins while scanning the face set in
/// ascending face-id order: a vertex id seen via a later face reuses its
/// existing slot. UV slots are keyed by `(material, uv-id)` so the same
/// raw UV value under two different materials occupies two distinct slots.
#[derive(Debug, Clone)]
pub struct SerializationIndex {
    face_order: Vec<FaceId>,
    vertex_slots: IndexMap<VertexId, usize>,
    uv_slots: IndexMap<(MaterialId, UvId), usize>,
    material_slots: IndexMap<MaterialId, usize>,
}

impl SerializationIndex {
    /// Build the index for the given face selection.
    ///
    /// An empty selection is not an error; it yields an empty index.
    /// Fails only if `SubMesh::Material` names an unknown material.
    pub fn build(mesh: &TriMesh, selection: SubMesh) -> Result<Self> {
        let faces: Vec<FaceId> = match selection {
            SubMesh::All => mesh.face_ids().collect(),
            SubMesh::Material(mid) => mesh
                .material(mid)
                .ok_or(MeshError::UnknownMaterial { material: mid.index() })?
                .faces()
                .collect(),
            SubMesh::Unmapped => mesh.unmapped_faces().collect(),
        };

        // Materials present in the selection, slotted in ascending id order.
        let mids: BTreeSet<MaterialId> =
            faces.iter().filter_map(|&fid| mesh.face_material(fid)).collect();
        let mut material_slots = IndexMap::with_capacity(mids.len());
        for mid in mids {
            let slot = material_slots.len();
            material_slots.insert(mid, slot);
        }

        let mut index = SerializationIndex {
            face_order: Vec::with_capacity(faces.len()),
            vertex_slots: IndexMap::new(),
            uv_slots: IndexMap::new(),
            material_slots,
        };

        for fid in faces {
            let vertices = mesh
                .face_vertices(fid)
                .ok_or(MeshError::UnknownFace { face: fid.index() })?;
            index.face_order.push(fid);
            for vid in vertices {
                let next = index.vertex_slots.len();
                index.vertex_slots.entry(vid).or_insert(next);
            }
            if let Some((mid, uvs)) = mesh.face_uvs(fid) {
                for uvid in uvs {
                    let next = index.uv_slots.len();
                    index.uv_slots.entry((mid, uvid)).or_insert(next);
                }
            }
        }

        Ok(index)
    }

    /// The stable sequence of face ids being emitted.
    pub fn face_order(&self) -> &[FaceId] {
        &self.face_order
    }

    /// Number of faces in the selection.
    pub fn num_faces(&self) -> usize {
        self.face_order.len()
    }

    /// Iterate over vertex ids in slot order.
    pub fn vertex_order(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_slots.keys().copied()
    }

    /// Number of distinct vertices referenced by the selection.
    pub fn num_vertices(&self) -> usize {
        self.vertex_slots.len()
    }

    /// The 0-based output slot of a vertex id.
    pub fn vertex_slot(&self, vid: VertexId) -> Option<usize> {
        self.vertex_slots.get(&vid).copied()
    }

    /// Iterate over `(material, uv-id)` pairs in slot order.
    pub fn uv_order(&self) -> impl Iterator<Item = (MaterialId, UvId)> + '_ {
        self.uv_slots.keys().copied()
    }

    /// Number of distinct `(material, uv-id)` pairs referenced.
    pub fn num_uvs(&self) -> usize {
        self.uv_slots.len()
    }

    /// The 0-based output slot of a UV id under its material.
    pub fn uv_slot(&self, mid: MaterialId, uvid: UvId) -> Option<usize> {
        self.uv_slots.get(&(mid, uvid)).copied()
    }

    /// Whether the selection carries any UV data.
    pub fn has_uvs(&self) -> bool {
        !self.uv_slots.is_empty()
    }

    /// Number of shading groups emitted (at least one).
    pub fn num_shading_groups(&self) -> usize {
        self.material_slots.len().max(1)
    }

    /// The shading tag for a face's material context.
    ///
    /// 0 when the selection has one logical material or none; otherwise
    /// the material's position in the selection's ascending material list.
    pub fn shading_slot(&self, mid: Option<MaterialId>) -> usize {
        if self.material_slots.len() <= 1 {
            return 0;
        }
        mid.and_then(|m| self.material_slots.get(&m).copied()).unwrap_or(0)
    }

    // ==================== Emission ====================

    /// Write the selection as an IDTF `MESH` block.
    ///
    /// Writes the header counts first, then the per-face parallel lists
    /// (positions, synthetic normals, shading tags, optional texture
    /// coordinates), then the vertex position, placeholder normal, and UV
    /// coordinate lists. Does not mutate the mesh or the index; fails only
    /// if the sink does, or if the mesh no longer matches the index.
    pub fn emit<W: Write>(&self, mesh: &TriMesh, opts: &EmitOptions, w: &mut W) -> Result<()> {
        writeln!(w, "{}MESH {{", tab(2))?;
        self.write_header(w)?;
        self.write_shading_description_list(w)?;
        self.write_face_position_list(mesh, w)?;
        self.write_face_normal_list(w)?;
        self.write_face_shading_list(mesh, w)?;
        self.write_face_texture_coord_list(mesh, w)?;
        self.write_position_list(mesh, opts, w)?;
        self.write_normal_list(w)?;
        self.write_texture_coord_list(mesh, w)?;
        writeln!(w, "{}}}", tab(2))?;
        Ok(())
    }

    fn write_header<W: Write>(&self, w: &mut W) -> Result<()> {
        let t = tab(3);
        writeln!(w, "{t}FACE_COUNT {}", self.num_faces())?;
        writeln!(w, "{t}MODEL_POSITION_COUNT {}", self.num_vertices())?;
        writeln!(w, "{t}MODEL_NORMAL_COUNT {}", self.num_faces() * 3)?;
        writeln!(w, "{t}MODEL_DIFFUSE_COLOR_COUNT 0")?;
        writeln!(w, "{t}MODEL_SPECULAR_COLOR_COUNT 0")?;
        writeln!(w, "{t}MODEL_TEXTURE_COORD_COUNT {}", self.num_uvs())?;
        writeln!(w, "{t}MODEL_BONE_COUNT 0")?;
        writeln!(w, "{t}MODEL_SHADING_COUNT {}", self.num_shading_groups())?;
        Ok(())
    }

    fn write_shading_description_list<W: Write>(&self, w: &mut W) -> Result<()> {
        let (t, tt, ttt, tttt) = (tab(3), tab(4), tab(5), tab(6));
        let has_uvs = self.has_uvs();
        writeln!(w, "{t}MODEL_SHADING_DESCRIPTION_LIST {{")?;
        for i in 0..self.num_shading_groups() {
            writeln!(w, "{tt}SHADING_DESCRIPTION {i} {{")?;
            writeln!(w, "{ttt}TEXTURE_LAYER_COUNT {}", usize::from(has_uvs))?;
            if has_uvs {
                writeln!(w, "{ttt}TEXTURE_COORD_DIMENSION_LIST {{")?;
                writeln!(w, "{tttt}TEXTURE_LAYER 0 DIMENSION: 2")?;
                writeln!(w, "{ttt}}}")?;
            }
            writeln!(w, "{ttt}SHADER_ID 0")?;
            writeln!(w, "{tt}}}")?;
        }
        writeln!(w, "{t}}}")?;
        Ok(())
    }

    // For each face, the vertex triple remapped to MODEL_POSITION_LIST slots.
    fn write_face_position_list<W: Write>(&self, mesh: &TriMesh, w: &mut W) -> Result<()> {
        let (t, tt) = (tab(3), tab(4));
        writeln!(w, "{t}MESH_FACE_POSITION_LIST {{")?;
        for &fid in &self.face_order {
            let vs = mesh
                .face_vertices(fid)
                .ok_or(MeshError::UnknownFace { face: fid.index() })?;
            let [s0, s1, s2] = [
                self.require_vertex_slot(vs[0])?,
                self.require_vertex_slot(vs[1])?,
                self.require_vertex_slot(vs[2])?,
            ];
            writeln!(w, "{tt}{s0} {s1} {s2}")?;
        }
        writeln!(w, "{t}}}")?;
        Ok(())
    }

    // Normals are not deduplicated: face i owns the private slot triple
    // (3i, 3i+1, 3i+2).
    fn write_face_normal_list<W: Write>(&self, w: &mut W) -> Result<()> {
        let (t, tt) = (tab(3), tab(4));
        writeln!(w, "{t}MESH_FACE_NORMAL_LIST {{")?;
        for i in 0..self.num_faces() {
            writeln!(w, "{tt}{} {} {}", 3 * i, 3 * i + 1, 3 * i + 2)?;
        }
        writeln!(w, "{t}}}")?;
        Ok(())
    }

    fn write_face_shading_list<W: Write>(&self, mesh: &TriMesh, w: &mut W) -> Result<()> {
        let (t, tt) = (tab(3), tab(4));
        writeln!(w, "{t}MESH_FACE_SHADING_LIST {{")?;
        for &fid in &self.face_order {
            writeln!(w, "{tt}{}", self.shading_slot(mesh.face_material(fid)))?;
        }
        writeln!(w, "{t}}}")?;
        Ok(())
    }

    // Faces without a material context keep their position in the running
    // face numbering but get no entry.
    fn write_face_texture_coord_list<W: Write>(&self, mesh: &TriMesh, w: &mut W) -> Result<()> {
        if !self.has_uvs() {
            return Ok(());
        }
        let (t, tt, ttt) = (tab(3), tab(4), tab(5));
        writeln!(w, "{t}MESH_FACE_TEXTURE_COORD_LIST {{")?;
        for (i, &fid) in self.face_order.iter().enumerate() {
            if let Some((mid, uvs)) = mesh.face_uvs(fid) {
                let [s0, s1, s2] = [
                    self.require_uv_slot(mid, uvs[0])?,
                    self.require_uv_slot(mid, uvs[1])?,
                    self.require_uv_slot(mid, uvs[2])?,
                ];
                writeln!(w, "{tt}FACE {i} {{")?;
                writeln!(w, "{ttt}TEXTURE_LAYER 0 TEX_COORD: {s0} {s1} {s2}")?;
                writeln!(w, "{tt}}}")?;
            }
        }
        writeln!(w, "{t}}}")?;
        Ok(())
    }

    fn write_position_list<W: Write>(
        &self,
        mesh: &TriMesh,
        opts: &EmitOptions,
        w: &mut W,
    ) -> Result<()> {
        let (t, tt) = (tab(3), tab(4));
        writeln!(w, "{t}MODEL_POSITION_LIST {{")?;
        for vid in self.vertex_order() {
            let p = mesh
                .position(vid)
                .ok_or(MeshError::UnknownVertex { vertex: vid.index() })?;
            let (x, y, z) = if opts.axis_remap {
                (p.x, p.z, -p.y)
            } else {
                (p.x, p.y, p.z)
            };
            writeln!(w, "{tt}{x:.6} {y:.6} {z:.6}")?;
        }
        writeln!(w, "{t}}}")?;
        Ok(())
    }

    // Placeholder zero vectors, three per face. True normals are not
    // modeled; the slot count must still match MODEL_NORMAL_COUNT.
    fn write_normal_list<W: Write>(&self, w: &mut W) -> Result<()> {
        let (t, tt) = (tab(3), tab(4));
        writeln!(w, "{t}MODEL_NORMAL_LIST {{")?;
        for _ in 0..self.num_faces() {
            for _ in 0..3 {
                writeln!(w, "{tt}0.000000 0.000000 0.000000")?;
            }
        }
        writeln!(w, "{t}}}")?;
        Ok(())
    }

    // 2D coordinates padded with two trailing zero fields.
    fn write_texture_coord_list<W: Write>(&self, mesh: &TriMesh, w: &mut W) -> Result<()> {
        if !self.has_uvs() {
            return Ok(());
        }
        let (t, tt) = (tab(3), tab(4));
        writeln!(w, "{t}MODEL_TEXTURE_COORD_LIST {{")?;
        for (mid, uvid) in self.uv_order() {
            let uv = mesh
                .material(mid)
                .and_then(|m| m.uv(uvid))
                .ok_or(MeshError::UnknownUv {
                    material: mid.index(),
                    uv: uvid.index(),
                })?;
            writeln!(w, "{tt}{:.6} {:.6} 0.000000 0.000000", uv.x, uv.y)?;
        }
        writeln!(w, "{t}}}")?;
        Ok(())
    }

    fn require_vertex_slot(&self, vid: VertexId) -> Result<usize> {
        self.vertex_slot(vid)
            .ok_or(MeshError::UnknownVertex { vertex: vid.index() })
    }

    fn require_uv_slot(&self, mid: MaterialId, uvid: UvId) -> Result<usize> {
        self.uv_slot(mid, uvid).ok_or(MeshError::UnknownUv {
            material: mid.index(),
            uv: uvid.index(),
        })
    }
}

/// Indentation for IDTF emission, `n` tab characters (`n <= 8`).
pub(crate) fn tab(n: usize) -> &'static str {
    const TABS: &str = "\t\t\t\t\t\t\t\t";
    &TABS[..n]
}
