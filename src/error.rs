//! Error types for meshport.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building or exporting a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A face references a vertex id that is not in the mesh.
    #[error("face references unknown vertex {vertex}")]
    UnknownVertex {
        /// The unknown vertex id.
        vertex: usize,
    },

    /// A face has duplicate vertex ids (degenerate triangle).
    #[error("degenerate face ({v0}, {v1}, {v2})")]
    DegenerateFace {
        /// First vertex id.
        v0: usize,
        /// Second vertex id.
        v1: usize,
        /// Third vertex id.
        v2: usize,
    },

    /// An operation referenced a face id that is not in the mesh.
    #[error("unknown face {face}")]
    UnknownFace {
        /// The unknown face id.
        face: usize,
    },

    /// An operation referenced a material id that is not in the mesh.
    #[error("unknown material {material}")]
    UnknownMaterial {
        /// The unknown material id.
        material: usize,
    },

    /// A UV triple referenced a UV id that the material does not own.
    #[error("material {material} has no UV coordinate {uv}")]
    UnknownUv {
        /// The material id.
        material: usize,
        /// The unknown UV id.
        uv: usize,
    },

    /// A face was mapped to a second material.
    #[error("face {face} already belongs to material {material}")]
    FaceAlreadyMapped {
        /// The face id.
        face: usize,
        /// The material that already owns the face.
        material: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading a mesh from a file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving a mesh to a file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}
