//! Facet type: one STL triangle record.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One STL facet: a normal, three vertices, and an attribute word.
///
/// The normal may be the zero vector when unspecified; the winding of
/// the vertices then determines the outward direction by the
/// right-hand rule. The attribute word exists only in the binary
/// format and is always zero for ASCII-origin data.
///
/// # Example
///
/// ```
/// use facet_types::{Facet, Point3};
///
/// let facet = Facet::from_vertices(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// // Normal points in +Z direction
/// let n = facet.computed_normal().unwrap();
/// assert!((n.z - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Facet {
    /// Stored normal vector. Zero when unspecified or unnormalized.
    pub normal: Vector3<f32>,
    /// The three vertices in CCW winding viewed from outside.
    pub vertices: [Point3<f32>; 3],
    /// Attribute byte count (binary format only, usually 0).
    pub attribute: u16,
}

impl Facet {
    /// Create a facet from an explicit normal, vertices, and attribute.
    #[inline]
    #[must_use]
    pub const fn new(normal: Vector3<f32>, vertices: [Point3<f32>; 3], attribute: u16) -> Self {
        Self {
            normal,
            vertices,
            attribute,
        }
    }

    /// Create a facet from three vertices with a zero normal and
    /// zero attribute.
    ///
    /// # Example
    ///
    /// ```
    /// use facet_types::{Facet, Point3};
    ///
    /// let facet = Facet::from_vertices(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// );
    /// assert_eq!(facet.attribute, 0);
    /// assert_eq!(facet.normal, facet_types::Vector3::zeros());
    /// ```
    #[inline]
    #[must_use]
    pub fn from_vertices(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        Self {
            normal: Vector3::zeros(),
            vertices: [v0, v1, v2],
            attribute: 0,
        }
    }

    /// Create a facet from three vertices with the normal computed
    /// from the winding.
    ///
    /// Degenerate facets get a zero normal.
    #[inline]
    #[must_use]
    pub fn with_computed_normal(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        let mut facet = Self::from_vertices(v0, v1, v2);
        facet.normal = facet.computed_normal().unwrap_or_else(Vector3::zeros);
        facet
    }

    /// Compute the unit face normal from the vertex winding by the
    /// right-hand rule.
    ///
    /// Returns `None` for degenerate facets (zero area).
    ///
    /// # Example
    ///
    /// ```
    /// use facet_types::{Facet, Point3};
    ///
    /// // Collinear points
    /// let degen = Facet::from_vertices(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(2.0, 0.0, 0.0),
    /// );
    /// assert!(degen.computed_normal().is_none());
    /// ```
    #[must_use]
    pub fn computed_normal(&self) -> Option<Vector3<f32>> {
        let e1 = self.vertices[1] - self.vertices[0];
        let e2 = self.vertices[2] - self.vertices[0];
        let n = e1.cross(&e2);
        let len_sq = n.norm_squared();
        // Squared magnitude, so the cutoff must be squared too or
        // small-but-valid triangles would read as degenerate.
        if len_sq > f32::EPSILON * f32::EPSILON {
            Some(n / len_sq.sqrt())
        } else {
            None
        }
    }

    /// Create a new facet with reversed winding (flipped normal).
    #[inline]
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            normal: -self.normal,
            vertices: [self.vertices[0], self.vertices[2], self.vertices[1]],
            attribute: self.attribute,
        }
    }
}
