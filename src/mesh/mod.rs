//! Core mesh data structures.
//!
//! This module provides the triangle mesh model that all exporters consume.
//!
//! # Overview
//!
//! The primary type is [`TriMesh`]: ordered, id-keyed tables of vertices,
//! triangular faces, and materials. Unlike connectivity-oriented
//! representations, `TriMesh` is a flat face-vertex store tuned for
//! serialization: iteration over any element table is in ascending id
//! order and repeatable, which the exporters rely on for deterministic
//! output.
//!
//! # Id Types
//!
//! Mesh elements are identified by type-safe id wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`FaceId`] - Identifies a face
//! - [`MaterialId`] - Identifies a material
//! - [`UvId`] - Identifies a UV coordinate within one material's table
//!
//! # Construction
//!
//! ```
//! use meshport::mesh::TriMesh;
//! use nalgebra::{Point2, Point3};
//!
//! let mut mesh = TriMesh::new();
//! let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
//! let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
//! let c = mesh.add_vertex(Point3::new(0.5, 1.0, 0.0));
//! let f = mesh.add_face([a, b, c]).unwrap();
//!
//! // Attach a material with per-face UVs.
//! let m = mesh.add_material();
//! let u0 = mesh.add_uv(m, Point2::new(0.0, 0.0)).unwrap();
//! let u1 = mesh.add_uv(m, Point2::new(1.0, 0.0)).unwrap();
//! let u2 = mesh.add_uv(m, Point2::new(0.5, 1.0)).unwrap();
//! mesh.map_face(m, f, [u0, u1, u2]).unwrap();
//! ```

mod id;
mod model;

pub use id::{FaceId, MaterialId, UvId, VertexId};
pub use model::{Material, TriMesh};
