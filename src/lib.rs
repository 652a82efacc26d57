//! # Meshport
//!
//! A triangle mesh export library centered on deterministic, deduplicated
//! index serialization.
//!
//! Meshport builds an in-memory triangle mesh with per-material UV layers,
//! computes compact serialization indices over it, and writes the result to
//! text formats. The IDTF writer is the primary target; OBJ and PLY writers
//! share the same mesh model.
//!
//! ## Features
//!
//! - **Flat mesh model**: id-keyed vertex, face, and material tables with
//!   repeatable ascending-id iteration
//! - **Serialization indices**: first-encounter vertex ordering and scoped
//!   UV deduplication per emitted sub-mesh
//! - **Multiple file formats**: IDTF, OBJ (with `.mtl` companion), PLY
//! - **Explicit exporter registry**: per-call configuration, no globals
//!
//! ## Quick Start
//!
//! ```no_run
//! use meshport::prelude::*;
//!
//! // Load a mesh
//! let mesh = meshport::io::load("model.obj").unwrap();
//!
//! // Query mesh properties
//! println!("Vertices: {}", mesh.num_vertices());
//! println!("Faces: {}", mesh.num_faces());
//! println!("Materials: {}", mesh.num_materials());
//!
//! // Save the mesh
//! meshport::io::save(&mesh, "output.idtf").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use meshport::prelude::*;
//! use nalgebra::{Point2, Point3};
//!
//! let mut mesh = TriMesh::new();
//!
//! let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
//! let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
//! let c = mesh.add_vertex(Point3::new(0.5, 1.0, 0.0));
//! let f = mesh.add_face([a, b, c]).unwrap();
//!
//! // Texture it through a material with its own UV table.
//! let skin = mesh.add_material();
//! mesh.set_texture(skin, "skin.tga").unwrap();
//! let u0 = mesh.add_uv(skin, Point2::new(0.0, 0.0)).unwrap();
//! let u1 = mesh.add_uv(skin, Point2::new(1.0, 0.0)).unwrap();
//! let u2 = mesh.add_uv(skin, Point2::new(0.5, 1.0)).unwrap();
//! mesh.map_face(skin, f, [u0, u1, u2]).unwrap();
//!
//! assert_eq!(mesh.num_faces(), 1);
//! assert!(!mesh.has_unmapped_faces());
//! ```
//!
//! ## Serialization Indices
//!
//! Writers that emit parallel lists (positions, faces, texture coordinates)
//! build a [`SerializationIndex`] first, then emit from it:
//!
//! ```
//! use meshport::prelude::*;
//! use nalgebra::Point3;
//!
//! # let mut mesh = TriMesh::new();
//! # let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
//! # let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
//! # let c = mesh.add_vertex(Point3::new(0.5, 1.0, 0.0));
//! # mesh.add_face([a, b, c]).unwrap();
//! let index = SerializationIndex::build(&mesh, SubMesh::All).unwrap();
//! assert_eq!(index.num_faces(), 1);
//! assert_eq!(index.num_vertices(), 3);
//!
//! let mut out = Vec::new();
//! index.emit(&mesh, &EmitOptions::default(), &mut out).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod io;
pub mod mesh;
pub mod serialize;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use meshport::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{FaceId, Material, MaterialId, TriMesh, UvId, VertexId};
    pub use crate::serialize::{EmitOptions, SerializationIndex, SubMesh};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::{Point2, Point3};

    #[test]
    fn test_textured_triangle_end_to_end() {
        let mut mesh = TriMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(0.5, 1.0, 0.0));
        let f = mesh.add_face([a, b, c]).unwrap();

        let m = mesh.add_material();
        let u0 = mesh.add_uv(m, Point2::new(0.0, 0.0)).unwrap();
        let u1 = mesh.add_uv(m, Point2::new(1.0, 0.0)).unwrap();
        let u2 = mesh.add_uv(m, Point2::new(0.5, 1.0)).unwrap();
        mesh.map_face(m, f, [u0, u1, u2]).unwrap();

        let index = SerializationIndex::build(&mesh, SubMesh::Material(m)).unwrap();
        assert_eq!(index.num_faces(), 1);
        assert_eq!(index.num_vertices(), 3);
        assert_eq!(index.num_uvs(), 3);

        let mut out = Vec::new();
        index.emit(&mesh, &EmitOptions::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("FACE_COUNT 1"));
        assert!(text.contains("MODEL_POSITION_COUNT 3"));
    }
}
