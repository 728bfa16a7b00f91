// Copyright 2026 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mesh storage, the Medit `.mesh` reader, and the exact point-in-triangle
//! predicate.

use std::fs;
use std::io::Read;
use std::path::Path;

use bramble_rtree::Rect;
use kurbo::Point;
use thiserror::Error;

/// A mesh vertex. `z` is zero for two-dimensional meshes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate, zero for 2-D meshes.
    pub z: f64,
}

impl Vertex {
    /// Planar projection of this vertex.
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A triangle as three zero-based vertex indices.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Triangle(pub [usize; 3]);

/// A triangulated mesh: vertices plus triangles indexing into them.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions.
    pub vertices: Vec<Vertex>,
    /// Triangles, each holding three valid indices into `vertices`.
    pub triangles: Vec<Triangle>,
}

/// Failure while reading a Medit mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Underlying I/O failure.
    #[error("i/o error reading mesh")]
    Io(#[from] std::io::Error),
    /// A token was not the number the grammar required.
    #[error("line {line}: expected {expected}, found `{found}`")]
    Parse {
        /// Line the offending token sits on (1-based).
        line: usize,
        /// What the grammar wanted here.
        expected: &'static str,
        /// The token actually found, or `end of file`.
        found: String,
    },
    /// A section keyword this reader does not understand.
    #[error("line {line}: unexpected token `{token}`")]
    UnexpectedToken {
        /// Line the token sits on (1-based).
        line: usize,
        /// The unrecognized token.
        token: String,
    },
    /// A required section never appeared.
    #[error("missing `{0}` section")]
    MissingSection(&'static str),
    /// A triangle referenced a vertex outside `1..=count`.
    #[error("line {line}: vertex index {index} out of range (1..={count})")]
    VertexIndexOutOfRange {
        /// Line of the triangle record (1-based).
        line: usize,
        /// The out-of-range 1-based index.
        index: i64,
        /// Number of vertices in the file.
        count: usize,
    },
    /// `Dimension` was neither 2 nor 3.
    #[error("unsupported dimension {0}")]
    UnsupportedDimension(i64),
}

/// Token cursor over the whole file, tracking 1-based line numbers.
struct Tokens<'a> {
    toks: Vec<(&'a str, usize)>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let mut toks = Vec::new();
        for (i, line) in text.lines().enumerate() {
            // Everything after `#` is a comment.
            let line = line.split('#').next().unwrap_or("");
            for t in line.split_whitespace() {
                toks.push((t, i + 1));
            }
        }
        Self { toks, pos: 0 }
    }

    fn next_token(&mut self) -> Option<(&'a str, usize)> {
        let t = self.toks.get(self.pos).copied();
        self.pos += 1;
        t
    }

    fn last_line(&self) -> usize {
        self.toks.last().map(|&(_, l)| l).unwrap_or(1)
    }

    fn take_i64(&mut self, expected: &'static str) -> Result<(i64, usize), MeshError> {
        match self.next_token() {
            Some((t, line)) => t.parse().map(|v| (v, line)).map_err(|_| MeshError::Parse {
                line,
                expected,
                found: t.to_owned(),
            }),
            None => Err(MeshError::Parse {
                line: self.last_line(),
                expected,
                found: "end of file".to_owned(),
            }),
        }
    }

    fn take_f64(&mut self, expected: &'static str) -> Result<f64, MeshError> {
        match self.next_token() {
            Some((t, line)) => t.parse().map_err(|_| MeshError::Parse {
                line,
                expected,
                found: t.to_owned(),
            }),
            None => Err(MeshError::Parse {
                line: self.last_line(),
                expected,
                found: "end of file".to_owned(),
            }),
        }
    }

    fn take_count(&mut self, expected: &'static str) -> Result<usize, MeshError> {
        let (v, line) = self.take_i64(expected)?;
        usize::try_from(v).map_err(|_| MeshError::Parse {
            line,
            expected,
            found: v.to_string(),
        })
    }
}

impl Mesh {
    /// Read a Medit `.mesh` file from disk.
    pub fn from_medit_path(path: impl AsRef<Path>) -> Result<Self, MeshError> {
        Self::from_medit_str(&fs::read_to_string(path)?)
    }

    /// Read a Medit mesh from any reader.
    pub fn from_medit_reader(mut r: impl Read) -> Result<Self, MeshError> {
        let mut text = String::new();
        r.read_to_string(&mut text)?;
        Self::from_medit_str(&text)
    }

    /// Parse Medit mesh text.
    ///
    /// Handles `MeshVersionFormatted`, `Dimension` (2 or 3), `Vertices`,
    /// `Triangles`, `Edges` (skipped), and `End`. `Dimension` must precede
    /// `Vertices`; triangle indices are 1-based in the file and validated.
    pub fn from_medit_str(text: &str) -> Result<Self, MeshError> {
        let mut toks = Tokens::new(text);
        let mut dimension: Option<usize> = None;
        let mut vertices: Option<Vec<Vertex>> = None;
        let mut triangles: Option<Vec<Triangle>> = None;

        while let Some((tok, line)) = toks.next_token() {
            match tok {
                "MeshVersionFormatted" => {
                    let _ = toks.take_i64("format version")?;
                }
                "Dimension" => {
                    let (d, _) = toks.take_i64("dimension")?;
                    if d != 2 && d != 3 {
                        return Err(MeshError::UnsupportedDimension(d));
                    }
                    dimension = Some(if d == 3 { 3 } else { 2 });
                }
                "Vertices" => {
                    let dim = dimension.ok_or(MeshError::MissingSection("Dimension"))?;
                    let n = toks.take_count("vertex count")?;
                    let mut out = Vec::with_capacity(n);
                    for _ in 0..n {
                        let x = toks.take_f64("vertex coordinate")?;
                        let y = toks.take_f64("vertex coordinate")?;
                        let z = if dim == 3 {
                            toks.take_f64("vertex coordinate")?
                        } else {
                            0.0
                        };
                        let _reference = toks.take_i64("vertex reference")?;
                        out.push(Vertex { x, y, z });
                    }
                    vertices = Some(out);
                }
                "Triangles" => {
                    let verts = vertices.as_ref().ok_or(MeshError::MissingSection("Vertices"))?;
                    let n = toks.take_count("triangle count")?;
                    let mut out = Vec::with_capacity(n);
                    for _ in 0..n {
                        let mut ids = [0_usize; 3];
                        for slot in &mut ids {
                            let (v, vline) = toks.take_i64("vertex index")?;
                            let idx = usize::try_from(v)
                                .ok()
                                .filter(|&x| (1..=verts.len()).contains(&x));
                            match idx {
                                Some(x) => *slot = x - 1,
                                None => {
                                    return Err(MeshError::VertexIndexOutOfRange {
                                        line: vline,
                                        index: v,
                                        count: verts.len(),
                                    });
                                }
                            }
                        }
                        let _reference = toks.take_i64("triangle reference")?;
                        out.push(Triangle(ids));
                    }
                    triangles = Some(out);
                }
                "Edges" => {
                    // Present in many Medit files; irrelevant for point location.
                    let n = toks.take_count("edge count")?;
                    for _ in 0..n * 3 {
                        let _ = toks.take_i64("edge field")?;
                    }
                }
                "End" => break,
                other => {
                    return Err(MeshError::UnexpectedToken {
                        line,
                        token: other.to_owned(),
                    });
                }
            }
        }

        Ok(Self {
            vertices: vertices.ok_or(MeshError::MissingSection("Vertices"))?,
            triangles: triangles.ok_or(MeshError::MissingSection("Triangles"))?,
        })
    }

    /// The three corner points of triangle `i`, projected to the plane.
    pub fn triangle_points(&self, i: usize) -> [Point; 3] {
        let Triangle([a, b, c]) = self.triangles[i];
        [
            self.vertices[a].point(),
            self.vertices[b].point(),
            self.vertices[c].point(),
        ]
    }

    /// Minimum bounding rectangle of triangle `i`.
    pub fn triangle_rect(&self, i: usize) -> Rect<2> {
        let [a, b, c] = self.triangle_points(i);
        Rect::new(
            [a.x.min(b.x).min(c.x), a.y.min(b.y).min(c.y)],
            [a.x.max(b.x).max(c.x), a.y.max(b.y).max(c.y)],
        )
    }

    /// Bounding rectangle of the whole mesh; [`Rect::NULL`] when empty.
    pub fn bounds(&self) -> Rect<2> {
        self.vertices.iter().fold(Rect::NULL, |acc, v| {
            acc.union(&Rect::point([v.x, v.y]))
        })
    }
}

/// Exact 2-D point-in-triangle test via barycentric coordinates.
///
/// Closed: points on an edge or a corner are inside. Degenerate triangles
/// (zero area) contain nothing.
pub fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;

    let dot00 = v0.dot(v0);
    let dot01 = v0.dot(v1);
    let dot02 = v0.dot(v2);
    let dot11 = v1.dot(v1);
    let dot12 = v1.dot(v2);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom == 0.0 {
        return false;
    }
    let u = (dot11 * dot02 - dot01 * dot12) / denom;
    let v = (dot00 * dot12 - dot01 * dot02) / denom;
    u >= 0.0 && v >= 0.0 && u + v <= 1.0
}
