//! Simplified Wavefront OBJ subset.
//!
//! Recognized line tags: `v` (position, 3-4 floats), `vt` (texture
//! coordinate, 1-3 floats), `f` (triangle, 3 one-based vertex indices
//! with optional `/vt` suffix), `l` (polyline, 2+ one-based indices),
//! `#` comment. Anything else is ignored.
//!
//! A missing file or a malformed line is *reported, not thrown*:
//! [`load_obj`] logs the problem and yields an empty mesh so a batch
//! scene load keeps going. The strict parser is public for tests.

use std::path::Path;

use log::warn;
use thiserror::Error;

use super::{Edge, EdgeStyle, Face, FaceStyle, Mesh, Vertex};
use crate::math::{Vec3, vec3};
use crate::render::color::{Rgba, rgb};
use crate::render::texture::TextureId;

#[derive(Error, Debug, PartialEq)]
pub enum ObjError {
    #[error("line {line}: `{tag}` needs at least {need} fields")]
    MissingFields { line: usize, tag: String, need: usize },

    #[error("line {line}: bad number `{token}`")]
    BadNumber { line: usize, token: String },

    #[error("line {line}: bad index `{token}`")]
    BadIndex { line: usize, token: String },

    #[error("line {line}: index {index} out of range (1..={count})")]
    IndexOutOfRange { line: usize, index: usize, count: usize },
}

/// Load `path`, recovering to an empty mesh on any failure.
pub fn load_obj(path: &Path, texture: Option<TextureId>) -> Mesh {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            warn!("obj: cannot read {}: {e}", path.display());
            return Mesh::default();
        }
    };
    match parse_obj(&text, texture) {
        Ok(mesh) => mesh,
        Err(e) => {
            warn!("obj: parse error in {}: {e}", path.display());
            Mesh::default()
        }
    }
}

/// Strict parser over the subset grammar.
pub fn parse_obj(text: &str, texture: Option<TextureId>) -> Result<Mesh, ObjError> {
    const DEFAULT_GREY: Rgba = rgb(0xB0, 0xB0, 0xB0);

    let mut positions: Vec<Vec3> = Vec::new();
    let mut tex_coords: Vec<Vec3> = Vec::new();
    // (line, position index, optional vt index), both zero-based.
    let mut faces: Vec<(usize, [(usize, Option<usize>); 3])> = Vec::new();
    let mut lines: Vec<(usize, Vec<usize>)> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        let tag = fields.next().unwrap();
        let rest: Vec<&str> = fields.collect();
        match tag {
            "v" => {
                if rest.len() < 3 {
                    return Err(ObjError::MissingFields {
                        line,
                        tag: "v".into(),
                        need: 3,
                    });
                }
                let mut c = [0.0f32; 3];
                for (i, slot) in c.iter_mut().enumerate() {
                    *slot = parse_f32(rest[i], line)?;
                }
                // An optional 4th float (w) is accepted and ignored.
                positions.push(vec3(c[0], c[1], c[2]));
            }
            "vt" => {
                if rest.is_empty() {
                    return Err(ObjError::MissingFields {
                        line,
                        tag: "vt".into(),
                        need: 1,
                    });
                }
                let mut c = [0.0f32; 3];
                for (i, slot) in c.iter_mut().enumerate().take(rest.len().min(3)) {
                    *slot = parse_f32(rest[i], line)?;
                }
                tex_coords.push(vec3(c[0], c[1], c[2]));
            }
            "f" => {
                if rest.len() != 3 {
                    return Err(ObjError::MissingFields {
                        line,
                        tag: "f".into(),
                        need: 3,
                    });
                }
                let mut refs = [(0usize, None); 3];
                for (i, tok) in rest.iter().enumerate() {
                    refs[i] = parse_face_token(tok, line)?;
                }
                faces.push((line, refs));
            }
            "l" => {
                if rest.len() < 2 {
                    return Err(ObjError::MissingFields {
                        line,
                        tag: "l".into(),
                        need: 2,
                    });
                }
                let mut chain = Vec::with_capacity(rest.len());
                for tok in &rest {
                    chain.push(parse_index(tok, line)?);
                }
                lines.push((line, chain));
            }
            _ => {} // unknown tag: ignored
        }
    }

    let mut mesh = Mesh::default();
    mesh.vertices = positions.iter().map(|&p| Vertex::new(p)).collect();

    for (line, refs) in faces {
        let mut v = [0u32; 3];
        let mut uv = [Vec3::ZERO; 3];
        let mut all_uv = true;
        for (i, (pi, ti)) in refs.iter().enumerate() {
            v[i] = check_index(*pi, positions.len(), line)? as u32;
            match ti {
                Some(t) => uv[i] = tex_coords[check_index(*t, tex_coords.len(), line)?],
                None => all_uv = false,
            }
        }
        let style = match texture {
            Some(id) if all_uv => FaceStyle::Textured { t: uv, texture: id },
            _ => FaceStyle::solid(DEFAULT_GREY),
        };
        mesh.faces.push(Face { v, style });
    }

    for (line, chain) in lines {
        for pair in chain.windows(2) {
            let a = check_index(pair[0], positions.len(), line)? as u32;
            let b = check_index(pair[1], positions.len(), line)? as u32;
            mesh.edges.push(Edge {
                v: [a, b],
                style: EdgeStyle::Solid(DEFAULT_GREY),
            });
        }
    }

    Ok(mesh)
}

fn parse_f32(tok: &str, line: usize) -> Result<f32, ObjError> {
    tok.parse().map_err(|_| ObjError::BadNumber {
        line,
        token: tok.to_string(),
    })
}

/// One-based index token; zero-based on the way out.
fn parse_index(tok: &str, line: usize) -> Result<usize, ObjError> {
    let n: usize = tok.parse().map_err(|_| ObjError::BadIndex {
        line,
        token: tok.to_string(),
    })?;
    if n == 0 {
        return Err(ObjError::BadIndex {
            line,
            token: tok.to_string(),
        });
    }
    Ok(n - 1)
}

/// `i`, `i/t` or `i/t/n`; only the position and texture refs are kept.
fn parse_face_token(tok: &str, line: usize) -> Result<(usize, Option<usize>), ObjError> {
    let mut parts = tok.split('/');
    let pos = parse_index(parts.next().unwrap_or(""), line)?;
    let tex = match parts.next() {
        Some("") | None => None,
        Some(t) => Some(parse_index(t, line)?),
    };
    Ok((pos, tex))
}

fn check_index(zero_based: usize, count: usize, line: usize) -> Result<usize, ObjError> {
    if zero_based >= count {
        return Err(ObjError::IndexOutOfRange {
            line,
            index: zero_based + 1,
            count,
        });
    }
    Ok(zero_based)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3;

    const TRI: &str = "\
# a lone triangle
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
f 1/1 2/2 3/3
l 1 2 3
";

    #[test]
    fn parses_vertices_faces_and_polylines() {
        let mesh = parse_obj(TRI, None).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.faces.len(), 1);
        assert_eq!(mesh.faces[0].v, [0, 1, 2]);
        // `l 1 2 3` yields two chained edges.
        assert_eq!(mesh.edges.len(), 2);
        assert_eq!(mesh.edges[1].v, [1, 2]);
    }

    #[test]
    fn texture_id_turns_faces_textured() {
        let mesh = parse_obj(TRI, Some(3)).unwrap();
        match mesh.faces[0].style {
            FaceStyle::Textured { t, texture } => {
                assert_eq!(texture, 3);
                assert_eq!(t[2], vec3(0.0, 1.0, 0.0));
            }
            other => panic!("expected textured style, got {other:?}"),
        }
    }

    #[test]
    fn unknown_tags_are_ignored() {
        let mesh = parse_obj("o thing\nv 0 0 0\nv 1 1 1\nusemtl x\nl 1 2\n", None).unwrap();
        assert_eq!(mesh.vertices.len(), 2);
        assert_eq!(mesh.edges.len(), 1);
    }

    #[test]
    fn one_based_indices_enforced() {
        assert_eq!(
            parse_obj("v 0 0 0\nf 0 1 1\n", None),
            Err(ObjError::BadIndex {
                line: 2,
                token: "0".into()
            })
        );
        assert!(matches!(
            parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n", None),
            Err(ObjError::IndexOutOfRange { index: 4, .. })
        ));
    }

    #[test]
    fn missing_file_recovers_to_empty_mesh() {
        let mesh = load_obj(Path::new("/nonexistent/model.obj"), None);
        assert!(mesh.is_empty());
    }

    #[test]
    fn bad_float_is_an_error() {
        assert_eq!(
            parse_obj("v 0 zero 0\n", None),
            Err(ObjError::BadNumber {
                line: 1,
                token: "zero".into()
            })
        );
    }
}
