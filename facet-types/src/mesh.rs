//! Facet soup mesh with STL metadata.

use std::io::{self, Write};

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Facet;

/// Length of the opaque binary STL header in bytes.
pub const BINARY_HEADER_LEN: usize = 80;

/// An ordered list of facets with optional STL metadata.
///
/// Unlike an indexed mesh, a `FacetMesh` stores no shared-vertex
/// topology: this mirrors the STL format, which is an unstructured
/// triangle list. Facet order carries no meaning but is preserved so
/// decode/encode round-trips reproduce the input.
///
/// The `header` field holds the 80-byte comment block of a binary
/// file (opaque bytes, not text); `name` holds the solid name of an
/// ASCII file and defaults to the empty string.
///
/// # Example
///
/// ```
/// use facet_types::{Facet, FacetMesh, Point3};
///
/// let mut mesh = FacetMesh::new();
/// mesh.push_facet(Facet::from_vertices(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ));
/// assert_eq!(mesh.facet_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FacetMesh {
    /// The facets, in decode or construction order.
    pub facets: Vec<Facet>,

    /// Opaque 80-byte header from a binary STL file, if any.
    #[cfg_attr(feature = "serde", serde(with = "serde_header"))]
    pub header: Option<[u8; BINARY_HEADER_LEN]>,

    /// Solid name from an ASCII STL file. Empty when absent.
    pub name: String,
}

impl FacetMesh {
    /// Create a new empty mesh.
    ///
    /// # Example
    ///
    /// ```
    /// use facet_types::FacetMesh;
    ///
    /// let mesh = FacetMesh::new();
    /// assert!(mesh.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            facets: Vec::new(),
            header: None,
            name: String::new(),
        }
    }

    /// Create a mesh with pre-allocated facet capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(facet_count: usize) -> Self {
        Self {
            facets: Vec::with_capacity(facet_count),
            header: None,
            name: String::new(),
        }
    }

    /// Create a mesh from an existing facet list.
    ///
    /// # Example
    ///
    /// ```
    /// use facet_types::{Facet, FacetMesh, Point3};
    ///
    /// let facets = vec![Facet::from_vertices(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// )];
    /// let mesh = FacetMesh::from_facets(facets);
    /// assert_eq!(mesh.facet_count(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub const fn from_facets(facets: Vec<Facet>) -> Self {
        Self {
            facets,
            header: None,
            name: String::new(),
        }
    }

    /// Number of facets in the mesh.
    #[inline]
    #[must_use]
    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    /// True when the mesh contains no facets.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Append one facet.
    #[inline]
    pub fn push_facet(&mut self, facet: Facet) {
        self.facets.push(facet);
    }

    /// Append a four-point face as two facets.
    ///
    /// The quad is split along its 1-3 diagonal: facets are emitted
    /// from points (0, 1, 2) and (0, 2, 3), following the right-hand
    /// rule for the outward normal.
    ///
    /// # Example
    ///
    /// ```
    /// use facet_types::{FacetMesh, Point3};
    ///
    /// let mut mesh = FacetMesh::new();
    /// mesh.push_quad([
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(1.0, 1.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// ]);
    /// assert_eq!(mesh.facet_count(), 2);
    /// ```
    pub fn push_quad(&mut self, points: [Point3<f32>; 4]) {
        self.push_facet(Facet::with_computed_normal(points[0], points[1], points[2]));
        self.push_facet(Facet::with_computed_normal(points[0], points[2], points[3]));
    }

    /// Write a human-readable facet listing.
    ///
    /// Intended for debugging small meshes; one block per facet with
    /// the normal, vertices, and attribute word.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn dump<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for facet in &self.facets {
            let n = facet.normal;
            let [p1, p2, p3] = facet.vertices;
            writeln!(writer, "Facet:")?;
            writeln!(writer, "  Normal: {} {} {}", n.x, n.y, n.z)?;
            writeln!(writer, "  P1:     {} {} {}", p1.x, p1.y, p1.z)?;
            writeln!(writer, "  P2:     {} {} {}", p2.x, p2.y, p2.z)?;
            writeln!(writer, "  P3:     {} {} {}", p3.x, p3.y, p3.z)?;
            writeln!(writer, "  Attr:   {:#06X}", facet.attribute)?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod serde_header {
    //! Serde helper for `Option<[u8; 80]>`, which has no built-in impl.

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::BINARY_HEADER_LEN;

    pub fn serialize<S: Serializer>(
        header: &Option<[u8; BINARY_HEADER_LEN]>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        header.as_ref().map(|h| h.to_vec()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<[u8; BINARY_HEADER_LEN]>, D::Error> {
        let bytes: Option<Vec<u8>> = Option::deserialize(deserializer)?;
        match bytes {
            None => Ok(None),
            Some(v) => <[u8; BINARY_HEADER_LEN]>::try_from(v.as_slice())
                .map(Some)
                .map_err(|_| serde::de::Error::invalid_length(v.len(), &"80 bytes")),
        }
    }
}
