//! The triangle mesh model.
//!
//! [`TriMesh`] is the in-memory representation every exporter consumes:
//! id-keyed tables of vertices, triangular faces, and materials. Element
//! tables are ordered maps, so iteration is always in ascending id order
//! and repeatable across calls. The mesh is treated as read-only for the
//! duration of any one export.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;

use nalgebra::{Point2, Point3};

use super::id::{FaceId, MaterialId, UvId, VertexId};
use crate::error::{MeshError, Result};

/// A material: a subset of the mesh's faces with per-face UV coordinates
/// and an optional texture image reference.
///
/// Materials partition the faces they own; a face belongs to at most one
/// material. UV ids are scoped to the owning material's UV table.
#[derive(Debug, Clone, Default)]
pub struct Material {
    faces: BTreeSet<FaceId>,
    uvs: BTreeMap<UvId, Point2<f64>>,
    face_uvs: BTreeMap<FaceId, [UvId; 3]>,
    texture: Option<String>,
    next_uv: u32,
}

impl Material {
    /// Iterate over the faces owned by this material, in ascending id order.
    pub fn faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.iter().copied()
    }

    /// Number of faces owned by this material.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Whether this material owns the given face.
    pub fn owns_face(&self, face: FaceId) -> bool {
        self.faces.contains(&face)
    }

    /// Iterate over this material's UV ids, in ascending id order.
    pub fn uv_ids(&self) -> impl Iterator<Item = UvId> + '_ {
        self.uvs.keys().copied()
    }

    /// Number of UV coordinates in this material's table.
    pub fn num_uvs(&self) -> usize {
        self.uvs.len()
    }

    /// Look up a UV coordinate.
    pub fn uv(&self, uv: UvId) -> Option<&Point2<f64>> {
        self.uvs.get(&uv)
    }

    /// The UV triple for a face owned by this material, ordered like the
    /// face's vertex triple.
    pub fn face_uvs(&self, face: FaceId) -> Option<[UvId; 3]> {
        self.face_uvs.get(&face).copied()
    }

    /// The recorded texture image filename, if any.
    ///
    /// This is a relative filename only; reading and writing the image
    /// itself is the responsibility of an external collaborator.
    pub fn texture(&self) -> Option<&str> {
        self.texture.as_deref()
    }
}

/// A triangulated 3D surface model: vertices, triangular faces, and
/// optional per-material UV texture coordinates.
///
/// Ids are opaque and not necessarily contiguous. All mutators validate
/// their inputs and return an error rather than silently dropping data.
///
/// # Example
///
/// ```
/// use meshport::mesh::TriMesh;
/// use nalgebra::Point3;
///
/// let mut mesh = TriMesh::new();
/// let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
/// let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
/// let c = mesh.add_vertex(Point3::new(0.5, 1.0, 0.0));
/// let f = mesh.add_face([a, b, c]).unwrap();
///
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.face_vertices(f), Some([a, b, c]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    vertices: BTreeMap<VertexId, Point3<f64>>,
    faces: BTreeMap<FaceId, [VertexId; 3]>,
    materials: BTreeMap<MaterialId, Material>,
    face_material: HashMap<FaceId, MaterialId>,
    next_vertex: u32,
    next_face: u32,
    next_material: u32,
}

impl TriMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Vertices ====================

    /// Add a vertex, returning its id.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        let vid = VertexId::new(self.next_vertex as usize);
        self.next_vertex += 1;
        self.vertices.insert(vid, position);
        vid
    }

    /// Insert a vertex with an explicit id.
    ///
    /// Ids need not be contiguous. Inserting an existing id replaces its
    /// position.
    pub fn insert_vertex(&mut self, vid: VertexId, position: Point3<f64>) {
        self.next_vertex = self.next_vertex.max(vid.index() as u32 + 1);
        self.vertices.insert(vid, position);
    }

    /// Look up a vertex position.
    pub fn position(&self, vid: VertexId) -> Option<&Point3<f64>> {
        self.vertices.get(&vid)
    }

    /// Iterate over all vertex ids, in ascending id order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    // ==================== Faces ====================

    /// Add a triangular face, returning its id.
    ///
    /// Fails if any vertex id is unknown or the triple is degenerate.
    pub fn add_face(&mut self, vertices: [VertexId; 3]) -> Result<FaceId> {
        for &vid in &vertices {
            if !self.vertices.contains_key(&vid) {
                return Err(MeshError::UnknownVertex { vertex: vid.index() });
            }
        }
        let [v0, v1, v2] = vertices;
        if v0 == v1 || v1 == v2 || v0 == v2 {
            return Err(MeshError::DegenerateFace {
                v0: v0.index(),
                v1: v1.index(),
                v2: v2.index(),
            });
        }

        let fid = FaceId::new(self.next_face as usize);
        self.next_face += 1;
        self.faces.insert(fid, vertices);
        Ok(fid)
    }

    /// The vertex triple of a face.
    pub fn face_vertices(&self, fid: FaceId) -> Option<[VertexId; 3]> {
        self.faces.get(&fid).copied()
    }

    /// Iterate over all face ids, in ascending id order.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.keys().copied()
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    // ==================== Materials ====================

    /// Add an empty material, returning its id.
    pub fn add_material(&mut self) -> MaterialId {
        let mid = MaterialId::new(self.next_material as usize);
        self.next_material += 1;
        self.materials.insert(mid, Material::default());
        mid
    }

    /// Look up a material.
    pub fn material(&self, mid: MaterialId) -> Option<&Material> {
        self.materials.get(&mid)
    }

    /// Iterate over all material ids, in ascending id order.
    pub fn material_ids(&self) -> impl Iterator<Item = MaterialId> + '_ {
        self.materials.keys().copied()
    }

    /// Number of materials.
    pub fn num_materials(&self) -> usize {
        self.materials.len()
    }

    /// Record the texture image filename for a material.
    ///
    /// Only the name is stored; no image data is read or written.
    pub fn set_texture(&mut self, mid: MaterialId, filename: impl Into<String>) -> Result<()> {
        let mat = self
            .materials
            .get_mut(&mid)
            .ok_or(MeshError::UnknownMaterial { material: mid.index() })?;
        mat.texture = Some(filename.into());
        Ok(())
    }

    /// Add a UV coordinate to a material's table, returning its id.
    pub fn add_uv(&mut self, mid: MaterialId, uv: Point2<f64>) -> Result<UvId> {
        let mat = self
            .materials
            .get_mut(&mid)
            .ok_or(MeshError::UnknownMaterial { material: mid.index() })?;
        let uvid = UvId::new(mat.next_uv as usize);
        mat.next_uv += 1;
        mat.uvs.insert(uvid, uv);
        Ok(uvid)
    }

    /// Assign a face to a material with a UV triple ordered like the
    /// face's vertex triple.
    ///
    /// Fails if the face or material is unknown, the face already belongs
    /// to a material, or any UV id is not in the material's table.
    pub fn map_face(&mut self, mid: MaterialId, fid: FaceId, uvs: [UvId; 3]) -> Result<()> {
        if !self.faces.contains_key(&fid) {
            return Err(MeshError::UnknownFace { face: fid.index() });
        }
        if let Some(&owner) = self.face_material.get(&fid) {
            return Err(MeshError::FaceAlreadyMapped {
                face: fid.index(),
                material: owner.index(),
            });
        }
        let mat = self
            .materials
            .get_mut(&mid)
            .ok_or(MeshError::UnknownMaterial { material: mid.index() })?;
        for &uvid in &uvs {
            if !mat.uvs.contains_key(&uvid) {
                return Err(MeshError::UnknownUv {
                    material: mid.index(),
                    uv: uvid.index(),
                });
            }
        }

        mat.faces.insert(fid);
        mat.face_uvs.insert(fid, uvs);
        self.face_material.insert(fid, mid);
        Ok(())
    }

    /// The material owning a face, if any.
    pub fn face_material(&self, fid: FaceId) -> Option<MaterialId> {
        self.face_material.get(&fid).copied()
    }

    /// The material and UV triple of a face, if the face is mapped.
    pub fn face_uvs(&self, fid: FaceId) -> Option<(MaterialId, [UvId; 3])> {
        let mid = self.face_material(fid)?;
        let uvs = self.materials.get(&mid)?.face_uvs(fid)?;
        Some((mid, uvs))
    }

    /// Iterate over faces that belong to no material, in ascending id order.
    pub fn unmapped_faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.face_ids().filter(|fid| !self.face_material.contains_key(fid))
    }

    /// Whether any face belongs to no material.
    pub fn has_unmapped_faces(&self) -> bool {
        self.face_material.len() < self.faces.len()
    }

    // ==================== Queries ====================

    /// Axis-aligned bounding box over all vertices, as (min, max).
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut iter = self.vertices.values();
        let first = iter.next()?;
        let (mut min, mut max) = (*first, *first);
        for p in iter {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Some((min, max))
    }
}
