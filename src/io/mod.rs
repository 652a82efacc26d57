//! Mesh file export and import.
//!
//! This module provides the format registry and per-format modules.
//!
//! # Supported Formats
//!
//! | Format | Extension | Save | Load | Notes |
//! |--------|-----------|------|------|-------|
//! | IDTF | `.idtf` | ✓ | ✗ | Intermediate Data Text Format |
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | With companion `.mtl` file |
//! | PLY | `.ply` | ✓ | ✗ | ASCII Stanford polygon format |
//!
//! # Usage
//!
//! The easiest way to save a mesh is automatic format detection:
//!
//! ```no_run
//! use meshport::io::{load, save};
//!
//! let mesh = load("model.obj").unwrap();
//! save(&mesh, "output.idtf").unwrap();
//! ```
//!
//! Exporters are selected through an [`ExporterRegistry`] built explicitly
//! by the caller; there is no process-wide registry. Callers that need a
//! non-default exporter configuration construct their own:
//!
//! ```no_run
//! use meshport::io::{idtf::IdtfExporter, ExporterRegistry};
//! use meshport::mesh::TriMesh;
//!
//! let mut registry = ExporterRegistry::with_defaults();
//! registry.register(Box::new(IdtfExporter::new().with_axis_remap(true)));
//!
//! let mesh = TriMesh::new();
//! registry.save(&mesh, "out.idtf").unwrap();
//! ```

pub mod idtf;
pub mod obj;
pub mod ply;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::TriMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Intermediate Data Text Format.
    Idtf,
    /// Wavefront OBJ format.
    Obj,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "idtf" => Some(Format::Idtf),
            "obj" => Some(Format::Obj),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Idtf => "idtf",
            Format::Obj => "obj",
            Format::Ply => "ply",
        }
    }

    /// Human-readable format name.
    pub fn description(self) -> &'static str {
        match self {
            Format::Idtf => "Intermediate Data Text Format",
            Format::Obj => "Wavefront OBJ",
            Format::Ply => "Polygon File Format",
        }
    }
}

/// Capability to serialize a mesh to a destination path for one format.
pub trait Exporter {
    /// The format tag this exporter handles.
    fn format(&self) -> Format;

    /// Write the mesh to the destination path.
    fn export(&self, mesh: &TriMesh, path: &Path) -> Result<()>;
}

/// An explicitly constructed mapping from format tag to exporter.
///
/// Registering a second exporter for a format replaces the first, so a
/// configured exporter can override a default.
pub struct ExporterRegistry {
    exporters: Vec<Box<dyn Exporter>>,
}

impl ExporterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { exporters: Vec::new() }
    }

    /// Create a registry with all built-in exporters in their default
    /// configuration.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(idtf::IdtfExporter::new()));
        registry.register(Box::new(obj::ObjExporter::new()));
        registry.register(Box::new(ply::PlyExporter::new()));
        registry
    }

    /// Register an exporter, replacing any existing one for its format.
    pub fn register(&mut self, exporter: Box<dyn Exporter>) {
        let format = exporter.format();
        self.exporters.retain(|e| e.format() != format);
        self.exporters.push(exporter);
    }

    /// Look up the exporter for a format.
    pub fn get(&self, format: Format) -> Option<&dyn Exporter> {
        self.exporters
            .iter()
            .find(|e| e.format() == format)
            .map(|e| e.as_ref())
    }

    /// Iterate over the registered formats.
    pub fn formats(&self) -> impl Iterator<Item = Format> + '_ {
        self.exporters.iter().map(|e| e.format())
    }

    /// Save a mesh with format detection from the path's extension.
    pub fn save<P: AsRef<Path>>(&self, mesh: &TriMesh, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = Format::from_path(path)
            .and_then(|f| self.get(f).map(|_| f))
            .ok_or_else(|| MeshError::UnsupportedFormat {
                extension: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("(none)")
                    .to_string(),
            })?;
        log::debug!("saving {} as {}", path.display(), format.description());
        self.get(format)
            .ok_or_else(|| MeshError::UnsupportedFormat {
                extension: format.extension().to_string(),
            })?
            .export(mesh, path)
    }
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Save a mesh to a file with automatic format detection.
///
/// Uses the default exporter configuration; build an [`ExporterRegistry`]
/// for anything else.
pub fn save<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    ExporterRegistry::with_defaults().save(mesh, path)
}

/// Load a mesh from a file with automatic format detection.
///
/// Only OBJ is currently loadable; the other formats are export-only.
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    match format {
        Format::Obj => obj::load(path),
        Format::Idtf | Format::Ply => Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: format!("{} files are export-only", format.description()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_extension("idtf"), Some(Format::Idtf));
        assert_eq!(Format::from_extension("OBJ"), Some(Format::Obj));
        assert_eq!(Format::from_path("scene/model.ply"), Some(Format::Ply));
        assert_eq!(Format::from_extension("stl"), None);
        assert_eq!(Format::from_path("noextension"), None);
    }

    #[test]
    fn test_registry_dispatch() {
        let registry = ExporterRegistry::with_defaults();
        assert!(registry.get(Format::Idtf).is_some());
        assert!(registry.get(Format::Obj).is_some());
        assert!(registry.get(Format::Ply).is_some());
        assert_eq!(registry.formats().count(), 3);
    }

    #[test]
    fn test_registry_replacement() {
        let mut registry = ExporterRegistry::with_defaults();
        registry.register(Box::new(idtf::IdtfExporter::new().with_axis_remap(true)));
        // Still exactly one IDTF exporter.
        assert_eq!(
            registry.formats().filter(|&f| f == Format::Idtf).count(),
            1
        );
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let registry = ExporterRegistry::with_defaults();
        let err = registry.save(&TriMesh::new(), "mesh.xyz").unwrap_err();
        assert!(matches!(err, MeshError::UnsupportedFormat { .. }));
    }
}
