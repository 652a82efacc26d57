//! Id types for mesh elements.
//!
//! This module provides type-safe id wrappers for vertices, faces, materials,
//! and UV coordinates. Ids are opaque keys into the mesh's element tables;
//! they are stable for the lifetime of the mesh and need not be contiguous.

use std::fmt::{self, Debug};

/// A type-safe vertex id.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// A type-safe face id.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

/// A type-safe material id.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct MaterialId(u32);

/// A type-safe UV coordinate id, scoped to one material's UV table.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct UvId(u32);

macro_rules! impl_id_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new id from a raw value.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index <= u32::MAX as usize, "id {} too large", index);
                Self(index as u32)
            }

            /// Get the raw id value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.0)
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_id_type!(VertexId, "V");
impl_id_type!(FaceId, "F");
impl_id_type!(MaterialId, "M");
impl_id_type!(UvId, "UV");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id() {
        let v = VertexId::new(42);
        assert_eq!(v.index(), 42);
    }

    #[test]
    fn test_type_safety() {
        // These are different types and cannot be mixed
        let v = VertexId::new(0);
        let f = FaceId::new(0);
        let m = MaterialId::new(0);

        // All have the same raw value but are distinct types
        assert_eq!(v.index(), f.index());
        assert_eq!(f.index(), m.index());
    }

    #[test]
    fn test_debug_format() {
        let v = VertexId::new(42);
        assert_eq!(format!("{:?}", v), "V(42)");
        let uv = UvId::new(7);
        assert_eq!(format!("{:?}", uv), "UV(7)");
    }
}
