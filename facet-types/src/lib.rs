//! Core facet types for ReliefForge.
//!
//! This crate provides the foundational value types shared by the STL
//! codec and the relief builder:
//!
//! - [`Facet`] - One triangle: normal, three vertices, attribute word
//! - [`FacetMesh`] - An ordered triangle soup with STL metadata
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f32`, the
//! precision the STL format stores on the wire. Downstream crates
//! (relief-mesh) assume millimeters.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**:
//! - X: width (left/right)
//! - Y: depth (front/back)
//! - Z: height (up/down)
//!
//! Facet winding is **counter-clockwise (CCW) when viewed from
//! outside**. Normals point outward by the right-hand rule.
//!
//! # Example
//!
//! ```
//! use facet_types::{Facet, FacetMesh, Point3};
//!
//! let mut mesh = FacetMesh::new();
//! mesh.push_facet(Facet::from_vertices(
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ));
//!
//! assert_eq!(mesh.facet_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod facet;
mod mesh;

pub use facet::Facet;
pub use mesh::{FacetMesh, BINARY_HEADER_LEN};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
