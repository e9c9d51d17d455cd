//! Caching STL reader session.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use facet_types::{FacetMesh, BINARY_HEADER_LEN};

use crate::error::StlResult;
use crate::{decode_ascii, decode_binary, detect_format, open_file, StlFormat};

/// A reading session over one STL source.
///
/// Owns its stream and caches the detected format, binary header, and
/// declared facet count, so metadata queries and the eventual
/// [`read_mesh`](Self::read_mesh) call probe the stream only once.
/// Each session holds its own state; nothing is shared across
/// instances.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use stl_codec::{StlFormat, StlReader};
///
/// let mut reader = StlReader::new(Cursor::new(b"solid x\nendsolid x\n".to_vec()));
/// assert_eq!(reader.format().unwrap(), StlFormat::Ascii);
/// assert!(reader.header().unwrap().is_none());
///
/// let mesh = reader.read_mesh().unwrap();
/// assert!(mesh.is_empty());
/// ```
#[derive(Debug)]
pub struct StlReader<R> {
    reader: R,
    format: Option<StlFormat>,
    header: Option<[u8; BINARY_HEADER_LEN]>,
    declared_len: Option<u32>,
}

impl StlReader<BufReader<File>> {
    /// Open a file-backed session.
    ///
    /// # Errors
    ///
    /// Returns [`StlError::FileNotFound`](crate::StlError::FileNotFound)
    /// when the path does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> StlResult<Self> {
        Ok(Self::new(BufReader::new(open_file(path.as_ref())?)))
    }
}

impl<R: BufRead + Seek> StlReader<R> {
    /// Create a session over any buffered seekable stream.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            format: None,
            header: None,
            declared_len: None,
        }
    }

    /// The detected encoding, probing the stream on first call.
    ///
    /// For binary sources this also caches the 80-byte header and the
    /// declared facet count.
    ///
    /// # Errors
    ///
    /// Propagates [`detect_format`] errors.
    pub fn format(&mut self) -> StlResult<StlFormat> {
        if let Some(format) = self.format {
            return Ok(format);
        }

        let format = detect_format(&mut self.reader)?;
        if format == StlFormat::Binary {
            let pos = self.reader.stream_position()?;
            self.reader.seek(SeekFrom::Start(0))?;

            let mut header = [0u8; BINARY_HEADER_LEN];
            self.reader.read_exact(&mut header)?;
            let mut count = [0u8; 4];
            self.reader.read_exact(&mut count)?;

            self.header = Some(header);
            self.declared_len = Some(u32::from_le_bytes(count));
            self.reader.seek(SeekFrom::Start(pos))?;
        }
        self.format = Some(format);
        Ok(format)
    }

    /// The 80-byte header of a binary source, `None` for ASCII.
    ///
    /// # Errors
    ///
    /// Propagates detection errors from [`format`](Self::format).
    pub fn header(&mut self) -> StlResult<Option<[u8; BINARY_HEADER_LEN]>> {
        self.format()?;
        Ok(self.header)
    }

    /// The facet count declared by a binary source, `None` for ASCII
    /// (where the count is unknown until the mesh is read).
    ///
    /// # Errors
    ///
    /// Propagates detection errors from [`format`](Self::format).
    pub fn declared_len(&mut self) -> StlResult<Option<u32>> {
        self.format()?;
        Ok(self.declared_len)
    }

    /// Decode the full mesh from the start of the stream.
    ///
    /// # Errors
    ///
    /// Propagates detection and decode errors.
    pub fn read_mesh(&mut self) -> StlResult<FacetMesh> {
        let format = self.format()?;
        self.reader.seek(SeekFrom::Start(0))?;
        match format {
            StlFormat::Binary => decode_binary(&mut self.reader),
            StlFormat::Ascii => decode_ascii(&mut self.reader),
        }
    }

    /// Consume the session, returning the underlying stream.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
