//! Heightfield relief (lithophane) mesh generation for ReliefForge.
//!
//! Converts a 2D greyscale sample grid into a closed, watertight
//! solid: the relief top surface encodes sample intensity as
//! extrusion depth, a flat base sits at z = 0, and vertical walls
//! close the perimeter. The result is a plain facet soup consumable
//! by `stl-codec`.
//!
//! # Example
//!
//! ```
//! use relief_mesh::{build_relief, ReliefParams, SampleGrid};
//!
//! let grid = SampleGrid::filled(0, 4, 4);
//! let params = ReliefParams::new()
//!     .with_size_mm(30.0, 30.0)
//!     .with_border_mm(0.0);
//!
//! let mesh = build_relief(&grid, &params).unwrap();
//! assert!(!mesh.is_empty());
//! ```
//!
//! # Tone Mapping
//!
//! A sample value `v` (0-255) maps to extrusion height
//! `z(v) = thickest - v * (thickest - thinnest) / 255`: darker
//! samples come out thicker. The `invert` flag mirrors the mapping;
//! `two_tone` collapses the grid to two levels first; a non-zero
//! border pads the grid with a constant full-depth rim that the
//! invert flag does not touch.
//!
//! # Quality Standards
//!
//! - Zero clippy/doc warnings
//! - Zero `unwrap`/`expect` in library code

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod build;
mod error;
mod grid;
mod params;

pub use build::build_relief;
pub use error::{ReliefError, ReliefResult};
pub use grid::SampleGrid;
pub use params::ReliefParams;
