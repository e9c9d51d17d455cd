//! Binary STL decoding and encoding.
//!
//! Layout:
//!
//! ```text
//! UINT8[80]    – Header (opaque, often contains file info)
//! UINT32       – Number of facets (little-endian)
//! foreach facet
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (usually 0)
//! end
//! ```
//!
//! All floats are little-endian IEEE-754 single precision.

use std::io::{ErrorKind, Read, Write};

use facet_types::{Facet, FacetMesh, Point3, Vector3, BINARY_HEADER_LEN};

use crate::error::{StlError, StlResult};

/// Size of one facet record: 12 floats plus the attribute word.
pub(crate) const FACET_RECORD_LEN: usize = 50;

/// Minimum length of a valid binary STL: header plus facet count.
pub(crate) const MIN_BINARY_LEN: u64 = (BINARY_HEADER_LEN + 4) as u64;

/// Decode a binary STL stream positioned at the start of the header.
///
/// The decoded facet count must equal the count declared in the
/// length field; a stream that ends mid-record fails with
/// [`StlError::TruncatedRecord`]. Bytes after the declared facets are
/// ignored.
///
/// # Errors
///
/// Returns [`StlError::FormatUndetermined`] when the stream is too
/// short to hold the header and length field,
/// [`StlError::TruncatedRecord`] when it ends inside the facet list,
/// or [`StlError::Io`] for other stream failures.
pub fn decode_binary<R: Read>(reader: &mut R) -> StlResult<FacetMesh> {
    let mut header = [0u8; BINARY_HEADER_LEN];
    read_exact_or(reader, &mut header, StlError::FormatUndetermined)?;

    let mut count_bytes = [0u8; 4];
    read_exact_or(reader, &mut count_bytes, StlError::FormatUndetermined)?;
    let declared = u32::from_le_bytes(count_bytes);

    let mut mesh = FacetMesh::with_capacity(declared as usize);
    mesh.header = Some(header);

    let mut record = [0u8; FACET_RECORD_LEN];
    for decoded in 0..declared {
        read_exact_or(
            reader,
            &mut record,
            StlError::TruncatedRecord { declared, decoded },
        )?;

        let normal = read_vector(&record[0..12]);
        let v1 = read_point(&record[12..24]);
        let v2 = read_point(&record[24..36]);
        let v3 = read_point(&record[36..48]);
        let attribute = u16::from_le_bytes([record[48], record[49]]);

        mesh.push_facet(Facet::new(normal, [v1, v2, v3], attribute));
    }

    Ok(mesh)
}

/// Encode a mesh as binary STL.
///
/// The mesh's stored header is written verbatim; an all-zero header
/// is substituted when absent. Facet normals and attributes are
/// written exactly as stored.
///
/// # Errors
///
/// Returns [`StlError::Io`] when the writer fails.
pub fn encode_binary<W: Write>(mesh: &FacetMesh, writer: &mut W) -> StlResult<()> {
    let header = mesh.header.unwrap_or([0u8; BINARY_HEADER_LEN]);
    writer.write_all(&header)?;

    #[allow(clippy::cast_possible_truncation)]
    // Facet count: meshes beyond u32 facets are unsupported by the format
    let count = mesh.facet_count() as u32;
    writer.write_all(&count.to_le_bytes())?;

    for facet in &mesh.facets {
        write_triplet(writer, facet.normal.x, facet.normal.y, facet.normal.z)?;
        for v in &facet.vertices {
            write_triplet(writer, v.x, v.y, v.z)?;
        }
        writer.write_all(&facet.attribute.to_le_bytes())?;
    }

    Ok(())
}

/// Fill `buf` from the reader, mapping a short read to `on_eof`.
fn read_exact_or<R: Read>(reader: &mut R, buf: &mut [u8], on_eof: StlError) -> StlResult<()> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(on_eof),
        Err(e) => Err(StlError::Io(e)),
    }
}

/// Read three little-endian f32 values as a vector.
fn read_vector(buf: &[u8]) -> Vector3<f32> {
    Vector3::new(read_f32(buf, 0), read_f32(buf, 4), read_f32(buf, 8))
}

/// Read three little-endian f32 values as a point.
fn read_point(buf: &[u8]) -> Point3<f32> {
    Point3::new(read_f32(buf, 0), read_f32(buf, 4), read_f32(buf, 8))
}

fn read_f32(buf: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

/// Write three f32 values in little-endian.
fn write_triplet<W: Write>(writer: &mut W, x: f32, y: f32, z: f32) -> StlResult<()> {
    writer.write_all(&x.to_le_bytes())?;
    writer.write_all(&y.to_le_bytes())?;
    writer.write_all(&z.to_le_bytes())?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    /// Build the bytes of a binary STL with the given declared count
    /// and actual records.
    fn binary_stl(declared: u32, facets: &[[f32; 12]]) -> Vec<u8> {
        let mut bytes = vec![0u8; BINARY_HEADER_LEN];
        bytes.extend_from_slice(&declared.to_le_bytes());
        for facet in facets {
            for f in facet {
                bytes.extend_from_slice(&f.to_le_bytes());
            }
            bytes.extend_from_slice(&0u16.to_le_bytes());
        }
        bytes
    }

    const ONE_TRIANGLE: [f32; 12] = [
        0.0, 0.0, 1.0, // normal
        0.0, 0.0, 0.0, // v1
        1.0, 0.0, 0.0, // v2
        0.0, 1.0, 0.0, // v3
    ];

    #[test]
    fn decode_single_facet() {
        let bytes = binary_stl(1, &[ONE_TRIANGLE]);
        let mesh = decode_binary(&mut bytes.as_slice());
        assert!(mesh.is_ok());
        let mesh = mesh.unwrap_or_default();
        assert_eq!(mesh.facet_count(), 1);
        let facet = mesh.facets[0];
        assert_eq!(facet.normal, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(facet.vertices[1], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(facet.attribute, 0);
    }

    #[test]
    fn decode_preserves_header() {
        let mut bytes = binary_stl(0, &[]);
        bytes[0] = b'R';
        bytes[1] = b'F';
        let mesh = decode_binary(&mut bytes.as_slice()).unwrap_or_default();
        let header = mesh.header.unwrap_or([0; BINARY_HEADER_LEN]);
        assert_eq!(&header[..2], b"RF");
    }

    #[test]
    fn truncated_record_reports_counts() {
        let bytes = binary_stl(2, &[ONE_TRIANGLE]);
        let err = decode_binary(&mut bytes.as_slice());
        assert!(matches!(
            err,
            Err(StlError::TruncatedRecord {
                declared: 2,
                decoded: 1
            })
        ));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut bytes = binary_stl(1, &[ONE_TRIANGLE]);
        bytes.extend_from_slice(b"junk after the facet list");
        let mesh = decode_binary(&mut bytes.as_slice()).unwrap_or_default();
        assert_eq!(mesh.facet_count(), 1);
    }

    #[test]
    fn short_header_is_undetermined() {
        let bytes = vec![0u8; 40];
        let err = decode_binary(&mut bytes.as_slice());
        assert!(matches!(err, Err(StlError::FormatUndetermined)));
    }

    #[test]
    fn encode_roundtrip_preserves_attribute() {
        let facet = Facet::new(
            Vector3::new(0.0, 0.0, 1.0),
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            7,
        );
        let mesh = FacetMesh::from_facets(vec![facet]);

        let mut bytes = Vec::new();
        encode_binary(&mesh, &mut bytes).ok();
        let decoded = decode_binary(&mut bytes.as_slice()).unwrap_or_default();

        assert_eq!(decoded.facet_count(), 1);
        assert_eq!(decoded.facets[0], facet);
    }

    #[test]
    fn encode_without_header_writes_zeros() {
        let mesh = FacetMesh::new();
        let mut bytes = Vec::new();
        encode_binary(&mesh, &mut bytes).ok();
        assert_eq!(bytes.len(), BINARY_HEADER_LEN + 4);
        assert!(bytes[..BINARY_HEADER_LEN].iter().all(|&b| b == 0));
    }
}
