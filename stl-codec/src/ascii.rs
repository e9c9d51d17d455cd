//! ASCII STL decoding and encoding.
//!
//! The grammar, one production per line (keywords are case-sensitive,
//! lines are trimmed and split on whitespace):
//!
//! ```text
//! solid       := "solid" [name]
//! facet       := "facet" "normal" f f f
//!                "outer" "loop"
//!                vertex vertex vertex
//!                "endloop"
//!                "endfacet"
//! vertex      := "vertex" f f f
//! end         := "endsolid" [name]
//! ```
//!
//! The parser is a strict line-oriented state machine:
//! `ExpectSolid -> ExpectFacetOrEnd -> (facet body) -> ExpectFacetOrEnd
//! -> Done`. `endsolid` is the normal terminal state, not an error.

use std::io::{BufRead, Write};

use facet_types::{Facet, FacetMesh, Point3, Vector3};

use crate::error::{StlError, StlResult};

/// Decode an ASCII STL stream positioned at the `solid` line.
///
/// The solid name is captured (defaulting to empty); every decoded
/// facet gets attribute 0 since the ASCII format has no slot for it.
///
/// # Errors
///
/// Returns [`StlError::MalformedHeader`] when the first line does not
/// open with `solid`, [`StlError::UnexpectedToken`] for any line that
/// does not match the production expected at that point, and
/// [`StlError::NumberFormat`] for unparseable numeric tokens.
pub fn decode_ascii<R: BufRead>(reader: &mut R) -> StlResult<FacetMesh> {
    let mut lines = LineCursor::new(reader);

    let mut mesh = FacetMesh::new();
    mesh.name = parse_solid_line(&mut lines)?;

    // One facet block per iteration; `endsolid` is the sentinel that
    // ends the loop normally.
    while let Some(facet) = parse_facet_or_end(&mut lines)? {
        mesh.push_facet(facet);
    }

    Ok(mesh)
}

/// Encode a mesh as ASCII STL.
///
/// Facet normals are written exactly as stored; `{:.6e}` formatting
/// round-trips through [`decode_ascii`] within f32 tolerance.
///
/// # Errors
///
/// Returns [`StlError::Io`] when the writer fails.
pub fn encode_ascii<W: Write>(mesh: &FacetMesh, writer: &mut W) -> StlResult<()> {
    writeln!(writer, "solid {}", mesh.name)?;

    for facet in &mesh.facets {
        let n = facet.normal;
        writeln!(writer, "  facet normal {:.6e} {:.6e} {:.6e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for v in &facet.vertices {
            writeln!(writer, "      vertex {:.6e} {:.6e} {:.6e}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid {}", mesh.name)?;

    Ok(())
}

/// Line iterator that trims, skips blank lines, and tracks 1-based
/// line numbers for diagnostics.
struct LineCursor<'a, R> {
    reader: &'a mut R,
    line_no: usize,
}

impl<'a, R: BufRead> LineCursor<'a, R> {
    fn new(reader: &'a mut R) -> Self {
        Self { reader, line_no: 0 }
    }

    /// Next non-blank line, trimmed. `None` at end of stream.
    fn next_line(&mut self) -> StlResult<Option<String>> {
        loop {
            let mut raw = String::new();
            if self.reader.read_line(&mut raw)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
    }

    /// Next non-blank line, or an `UnexpectedToken` error naming the
    /// expected production when the stream ends first.
    fn require_line(&mut self, expected: &'static str) -> StlResult<String> {
        self.next_line()?.ok_or(StlError::UnexpectedToken {
            line_no: self.line_no + 1,
            expected,
            found: "(end of input)".to_string(),
        })
    }
}

/// Consume the opening `solid [name]` line, returning the name.
fn parse_solid_line<R: BufRead>(lines: &mut LineCursor<'_, R>) -> StlResult<String> {
    let line = lines.next_line()?.unwrap_or_default();
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("solid") {
        return Err(StlError::MalformedHeader { line });
    }
    Ok(tokens.collect::<Vec<_>>().join(" "))
}

/// Parse one facet block, or `None` when `endsolid` is reached.
///
/// A fresh facet is allocated per call; nothing is carried across
/// iterations.
fn parse_facet_or_end<R: BufRead>(lines: &mut LineCursor<'_, R>) -> StlResult<Option<Facet>> {
    let line = lines.require_line("facet or endsolid")?;
    let tokens: Vec<&str> = line.split_whitespace().collect();

    if tokens.first() == Some(&"endsolid") {
        return Ok(None);
    }

    if tokens.len() != 5 || tokens[0] != "facet" || tokens[1] != "normal" {
        return Err(StlError::UnexpectedToken {
            line_no: lines.line_no,
            expected: "facet or endsolid",
            found: line,
        });
    }
    let normal = Vector3::new(
        parse_float(tokens[2], lines.line_no)?,
        parse_float(tokens[3], lines.line_no)?,
        parse_float(tokens[4], lines.line_no)?,
    );

    expect_keywords(lines, "outer loop", &["outer", "loop"])?;

    let v1 = parse_vertex(lines)?;
    let v2 = parse_vertex(lines)?;
    let v3 = parse_vertex(lines)?;

    expect_keywords(lines, "endloop", &["endloop"])?;
    expect_keywords(lines, "endfacet", &["endfacet"])?;

    // ASCII has no attribute slot
    Ok(Some(Facet::new(normal, [v1, v2, v3], 0)))
}

/// Consume a `vertex f f f` line.
fn parse_vertex<R: BufRead>(lines: &mut LineCursor<'_, R>) -> StlResult<Point3<f32>> {
    let line = lines.require_line("vertex")?;
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 4 || tokens[0] != "vertex" {
        return Err(StlError::UnexpectedToken {
            line_no: lines.line_no,
            expected: "vertex",
            found: line,
        });
    }
    Ok(Point3::new(
        parse_float(tokens[1], lines.line_no)?,
        parse_float(tokens[2], lines.line_no)?,
        parse_float(tokens[3], lines.line_no)?,
    ))
}

/// Consume a line that must consist of exactly the given keywords.
fn expect_keywords<R: BufRead>(
    lines: &mut LineCursor<'_, R>,
    expected: &'static str,
    keywords: &[&str],
) -> StlResult<()> {
    let line = lines.require_line(expected)?;
    if line.split_whitespace().eq(keywords.iter().copied()) {
        Ok(())
    } else {
        Err(StlError::UnexpectedToken {
            line_no: lines.line_no,
            expected,
            found: line,
        })
    }
}

fn parse_float(token: &str, line_no: usize) -> StlResult<f32> {
    token.parse().map_err(|source| StlError::NumberFormat {
        line_no,
        token: token.to_string(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    const ONE_FACET: &str = "solid x\n\
        facet normal 0 0 1\n\
        outer loop\n\
        vertex 0 0 0\n\
        vertex 1 0 0\n\
        vertex 0 1 0\n\
        endloop\n\
        endfacet\n\
        endsolid x\n";

    #[test]
    fn decode_single_facet() {
        let mesh = decode_ascii(&mut ONE_FACET.as_bytes()).unwrap();
        assert_eq!(mesh.name, "x");
        assert_eq!(mesh.facet_count(), 1);
        let facet = mesh.facets[0];
        assert_eq!(facet.normal, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(facet.vertices[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(facet.vertices[1], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(facet.vertices[2], Point3::new(0.0, 1.0, 0.0));
        assert_eq!(facet.attribute, 0);
    }

    #[test]
    fn empty_solid_decodes() {
        let text = "solid test\nendsolid test\n";
        let mesh = decode_ascii(&mut text.as_bytes()).unwrap();
        assert_eq!(mesh.name, "test");
        assert!(mesh.is_empty());
    }

    #[test]
    fn nameless_solid_gets_empty_name() {
        let text = "solid\nendsolid\n";
        let mesh = decode_ascii(&mut text.as_bytes()).unwrap();
        assert_eq!(mesh.name, "");
    }

    #[test]
    fn missing_solid_is_malformed_header() {
        let text = "garbage line\n";
        let err = decode_ascii(&mut text.as_bytes());
        assert!(matches!(
            err,
            Err(StlError::MalformedHeader { line }) if line == "garbage line"
        ));
    }

    #[test]
    fn stray_line_is_unexpected_token() {
        let text = "solid x\nnot a facet\n";
        let err = decode_ascii(&mut text.as_bytes());
        match err {
            Err(StlError::UnexpectedToken {
                line_no,
                expected,
                found,
            }) => {
                assert_eq!(line_no, 2);
                assert_eq!(expected, "facet or endsolid");
                assert_eq!(found, "not a facet");
            }
            other => panic!("expected UnexpectedToken, got {other:?}"),
        }
    }

    #[test]
    fn truncated_stream_is_unexpected_token() {
        let text = "solid x\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\n";
        let err = decode_ascii(&mut text.as_bytes());
        assert!(matches!(
            err,
            Err(StlError::UnexpectedToken {
                expected: "vertex",
                ..
            })
        ));
    }

    #[test]
    fn bad_number_is_number_format() {
        let text = "solid x\nfacet normal 0 0 z\n";
        let err = decode_ascii(&mut text.as_bytes());
        assert!(matches!(
            err,
            Err(StlError::NumberFormat { line_no: 2, token, .. }) if token == "z"
        ));
    }

    #[test]
    fn keywords_are_case_sensitive() {
        let text = "solid x\nFACET normal 0 0 1\n";
        let err = decode_ascii(&mut text.as_bytes());
        assert!(matches!(err, Err(StlError::UnexpectedToken { .. })));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let text = "solid x\n\n   \nendsolid x\n";
        let mesh = decode_ascii(&mut text.as_bytes()).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn encode_roundtrip_within_tolerance() {
        let facet = Facet::new(
            Vector3::new(0.0, 0.0, 1.0),
            [
                Point3::new(0.125, -3.5, 0.0),
                Point3::new(1.0, 0.0, 2.75),
                Point3::new(0.0, 1.0, 0.333_333_34),
            ],
            // Attribute is not representable in ASCII and must come
            // back as 0
            9,
        );
        let mut mesh = FacetMesh::from_facets(vec![facet]);
        mesh.name = "part".to_string();

        let mut text = Vec::new();
        encode_ascii(&mesh, &mut text).unwrap();
        let decoded = decode_ascii(&mut text.as_slice()).unwrap();

        assert_eq!(decoded.name, "part");
        assert_eq!(decoded.facet_count(), 1);
        let out = decoded.facets[0];
        assert_eq!(out.attribute, 0);
        for i in 0..3 {
            let a = facet.vertices[i];
            let b = out.vertices[i];
            approx::assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
            approx::assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
            approx::assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
        }
    }

    #[test]
    fn encode_empty_name_keeps_solid_space() {
        let mesh = FacetMesh::new();
        let mut text = Vec::new();
        encode_ascii(&mesh, &mut text).unwrap();
        // The "solid " prefix is what format detection probes for
        assert!(text.starts_with(b"solid \n") || text.starts_with(b"solid "));
    }
}
