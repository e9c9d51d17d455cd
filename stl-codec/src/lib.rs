//! STL file format support for ReliefForge.
//!
//! This crate reads and writes STL meshes in both binary and ASCII
//! encodings, with automatic format detection:
//!
//! - A stream whose first six bytes are not the literal `"solid "` is
//!   binary.
//! - Otherwise the 50-byte window at offset 80 (one binary facet
//!   record) is inspected; any byte ≥ 128 means the `solid ` prefix
//!   was coincidental binary header data.
//! - Otherwise the stream is ASCII.
//!
//! # Example
//!
//! ```no_run
//! use stl_codec::{load_stl, save_stl, StlFormat};
//!
//! let mesh = load_stl("model.stl").unwrap();
//! save_stl(&mesh, "output.stl", StlFormat::Binary).unwrap();
//! ```
//!
//! Streams work too; any `BufRead + Seek` source will do:
//!
//! ```
//! use std::io::Cursor;
//! use stl_codec::{decode, StlFormat};
//!
//! let mut cursor = Cursor::new(b"solid test\nendsolid test\n".to_vec());
//! let mesh = decode(&mut cursor).unwrap();
//! assert!(mesh.is_empty());
//! ```
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

mod ascii;
mod binary;
mod error;
mod reader;

pub use ascii::{decode_ascii, encode_ascii};
pub use binary::{decode_binary, encode_binary};
pub use error::{StlError, StlResult};
pub use reader::StlReader;

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use facet_types::{FacetMesh, BINARY_HEADER_LEN};

use crate::binary::{FACET_RECORD_LEN, MIN_BINARY_LEN};

/// The two STL encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StlFormat {
    /// 80-byte header, facet count, fixed 50-byte records.
    Binary,
    /// Line-oriented `solid`/`facet`/`endsolid` text.
    Ascii,
}

/// Classify a stream as binary or ASCII STL without consuming it.
///
/// The stream position is restored before returning, on success and
/// failure alike.
///
/// # Errors
///
/// Returns [`StlError::FormatUndetermined`] when the stream is
/// shorter than a minimal binary header (84 bytes) and does not open
/// as ASCII, or [`StlError::Io`] for stream failures.
pub fn detect_format<R: Read + Seek>(reader: &mut R) -> StlResult<StlFormat> {
    let pos = reader.stream_position()?;
    let result = probe_format(reader);
    reader.seek(SeekFrom::Start(pos))?;
    result
}

fn probe_format<R: Read + Seek>(reader: &mut R) -> StlResult<StlFormat> {
    reader.seek(SeekFrom::Start(0))?;
    let mut prefix = [0u8; 6];
    let prefix_len = read_up_to(reader, &mut prefix)?;
    let starts_solid = prefix_len == prefix.len() && &prefix == b"solid ";

    if !starts_solid {
        // Definitely not ASCII; only a plausible binary length rescues it
        let len = reader.seek(SeekFrom::End(0))?;
        if len < MIN_BINARY_LEN {
            return Err(StlError::FormatUndetermined);
        }
        return Ok(StlFormat::Binary);
    }

    // The 80-byte binary header is free-form and may coincidentally
    // start with "solid ", so inspect one facet record for non-ASCII
    // bytes.
    reader.seek(SeekFrom::Start(BINARY_HEADER_LEN as u64))?;
    let mut record = [0u8; FACET_RECORD_LEN];
    let record_len = read_up_to(reader, &mut record)?;
    if record[..record_len].iter().any(|&b| b >= 128) {
        Ok(StlFormat::Binary)
    } else {
        Ok(StlFormat::Ascii)
    }
}

/// Fill as much of `buf` as the stream allows, returning the count.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> StlResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Decode an STL stream, auto-detecting its encoding.
///
/// Reads the mesh from the start of the stream regardless of the
/// current position.
///
/// # Errors
///
/// Propagates [`detect_format`] errors plus the decode errors of the
/// detected form.
pub fn decode<R: BufRead + Seek>(reader: &mut R) -> StlResult<FacetMesh> {
    let format = detect_format(reader)?;
    reader.seek(SeekFrom::Start(0))?;
    match format {
        StlFormat::Binary => decode_binary(reader),
        StlFormat::Ascii => decode_ascii(reader),
    }
}

/// Encode a mesh in the requested format.
///
/// # Errors
///
/// Returns [`StlError::Io`] when the writer fails.
pub fn encode<W: Write>(mesh: &FacetMesh, format: StlFormat, writer: &mut W) -> StlResult<()> {
    match format {
        StlFormat::Binary => encode_binary(mesh, writer),
        StlFormat::Ascii => encode_ascii(mesh, writer),
    }
}

/// Load a mesh from an STL file, auto-detecting its encoding.
///
/// # Errors
///
/// Returns [`StlError::FileNotFound`] when the path does not exist,
/// plus any [`decode`] error.
///
/// # Example
///
/// ```no_run
/// use stl_codec::load_stl;
///
/// let mesh = load_stl("model.stl").unwrap();
/// println!("Loaded {} facets", mesh.facet_count());
/// ```
pub fn load_stl<P: AsRef<Path>>(path: P) -> StlResult<FacetMesh> {
    let mut reader = BufReader::new(open_file(path.as_ref())?);
    decode(&mut reader)
}

/// Save a mesh to an STL file in the requested format.
///
/// # Errors
///
/// Returns [`StlError::Io`] when the file cannot be written.
pub fn save_stl<P: AsRef<Path>>(mesh: &FacetMesh, path: P, format: StlFormat) -> StlResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    encode(mesh, format, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub(crate) fn open_file(path: &Path) -> StlResult<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StlError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            StlError::Io(e)
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use facet_types::{Facet, Point3};

    fn test_triangle_mesh() -> FacetMesh {
        FacetMesh::from_facets(vec![Facet::with_computed_normal(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )])
    }

    #[test]
    fn detect_ascii() {
        let mut cursor = Cursor::new(b"solid test\nendsolid test\n".to_vec());
        assert_eq!(detect_format(&mut cursor).unwrap(), StlFormat::Ascii);
    }

    #[test]
    fn detect_binary_without_solid_prefix() {
        // 84+ arbitrary bytes that do not start with "solid "
        let bytes = vec![0xAAu8; 134];
        let mut cursor = Cursor::new(bytes);
        assert_eq!(detect_format(&mut cursor).unwrap(), StlFormat::Binary);
    }

    #[test]
    fn detect_binary_with_coincidental_solid_header() {
        // Binary file whose header happens to start with "solid "
        let mut bytes = vec![0u8; 134];
        bytes[..6].copy_from_slice(b"solid ");
        // Non-ASCII byte inside the first facet record window
        bytes[100] = 0xFF;
        let mut cursor = Cursor::new(bytes);
        assert_eq!(detect_format(&mut cursor).unwrap(), StlFormat::Binary);
    }

    #[test]
    fn detect_short_stream_is_undetermined() {
        let mut cursor = Cursor::new(vec![0xAAu8; 20]);
        assert!(matches!(
            detect_format(&mut cursor),
            Err(StlError::FormatUndetermined)
        ));
    }

    #[test]
    fn detect_restores_position() {
        let mut cursor = Cursor::new(b"solid test\nendsolid test\n".to_vec());
        cursor.set_position(4);
        detect_format(&mut cursor).unwrap();
        assert_eq!(cursor.position(), 4);

        // Position is restored on the error path too
        let mut short = Cursor::new(vec![1u8, 2, 3]);
        short.set_position(2);
        assert!(detect_format(&mut short).is_err());
        assert_eq!(short.position(), 2);
    }

    #[test]
    fn decode_dispatches_on_format() {
        let mesh = test_triangle_mesh();

        for format in [StlFormat::Binary, StlFormat::Ascii] {
            let mut bytes = Vec::new();
            encode(&mesh, format, &mut bytes).unwrap();
            let mut cursor = Cursor::new(bytes);
            let decoded = decode(&mut cursor).unwrap();
            assert_eq!(decoded.facet_count(), 1);
        }
    }

    #[test]
    fn load_nonexistent_file() {
        let result = load_stl("nonexistent_file_12345.stl");
        assert!(matches!(
            result,
            Err(StlError::FileNotFound { path }) if path.to_string_lossy().contains("nonexistent")
        ));
    }

    #[test]
    fn file_roundtrip_both_formats() {
        let mesh = test_triangle_mesh();
        let dir = tempfile::tempdir().unwrap();

        for (name, format) in [("b.stl", StlFormat::Binary), ("a.stl", StlFormat::Ascii)] {
            let path = dir.path().join(name);
            save_stl(&mesh, &path, format).unwrap();
            let loaded = load_stl(&path).unwrap();
            assert_eq!(loaded.facet_count(), mesh.facet_count());
            let v = loaded.facets[0].vertices[1];
            assert!((v.x - 1.0).abs() < 1e-5);
        }
    }
}
