/// Wavefront OBJ loader for the `v` / `f` subset
use std::fs;
use std::path::Path;

use log::debug;
use nom::{
    branch::alt,
    bytes::complete::{take_till, take_till1},
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, eof, map_res, opt},
    multi::many1,
    number::complete::double,
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::LoadError;
use crate::geometry::{Mesh, Triangle};
use crate::vector::Vector3D;

/// One meaningful line of an OBJ file
enum Statement {
    Vertex(Vector3D),
    /// 1-based vertex indices, not yet checked against the vertex list
    Face([usize; 3]),
    Ignored,
}

/// Read and parse an OBJ file
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    debug!("loading mesh from {}", path.display());
    parse_obj(&text)
}

/// Parse OBJ text into a mesh.
///
/// Faces may refer to vertices defined later in the file. Only the first
/// three entries of a face are used, and only the vertex index of each.
pub fn parse_obj(input: &str) -> Result<Mesh, LoadError> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for (number, line) in input.lines().enumerate() {
        let number = number + 1;
        match parse_line(line, number)? {
            Statement::Vertex(v) => vertices.push(v),
            Statement::Face(indices) => faces.push((number, indices)),
            Statement::Ignored => {}
        }
    }

    let mut mesh = Mesh::with_capacity(faces.len());
    for (line, indices) in faces {
        let mut points = [Vector3D::zero(); 3];
        for (point, &index) in points.iter_mut().zip(&indices) {
            *point = *index
                .checked_sub(1)
                .and_then(|i| vertices.get(i))
                .ok_or(LoadError::FaceIndex {
                    line,
                    index,
                    vertex_count: vertices.len(),
                })?;
        }
        let [a, b, c] = points;
        mesh.add_triangle(Triangle::new(a, b, c));
    }

    debug!(
        "parsed OBJ: {} vertices, {} triangles",
        vertices.len(),
        mesh.len()
    );
    Ok(mesh)
}

fn parse_line(line: &str, number: usize) -> Result<Statement, LoadError> {
    let content = line.find('#').map_or(line, |i| &line[..i]).trim();
    if content.is_empty() {
        return Ok(Statement::Ignored);
    }

    let error = |message: &str| LoadError::Parse {
        line: number,
        message: message.to_string(),
    };

    let (rest, word) = keyword(content).map_err(|_| error("expected a keyword"))?;
    match word {
        "v" => vertex(rest)
            .map(|(_, v)| Statement::Vertex(v))
            .map_err(|_| error("expected three vertex coordinates")),
        "f" => {
            let (_, indices) = face(rest).map_err(|_| error("invalid face index"))?;
            match indices[..] {
                [a, b, c, ..] => Ok(Statement::Face([a, b, c])),
                _ => Err(error("face needs at least three vertices")),
            }
        }
        _ => Ok(Statement::Ignored),
    }
}

fn keyword(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

fn coordinate(input: &str) -> IResult<&str, f64> {
    preceded(space1, double)(input)
}

/// `x y z`, optionally followed by more values (`w`, vertex colours)
fn vertex(input: &str) -> IResult<&str, Vector3D> {
    let (input, (x, y, z)) = tuple((coordinate, coordinate, coordinate))(input)?;
    let (input, _) = alt((space1, eof))(input)?;
    Ok((input, Vector3D::new(x, y, z)))
}

/// `v`, `v/vt`, `v//vn` or `v/vt/vn`; keeps `v`
fn face_index(input: &str) -> IResult<&str, usize> {
    let (input, index) = map_res(digit1, |s: &str| s.parse::<usize>())(input)?;
    let (input, _) = opt(preceded(char('/'), take_till(|c: char| c.is_whitespace())))(input)?;
    Ok((input, index))
}

fn face(input: &str) -> IResult<&str, Vec<usize>> {
    let (input, indices) = many1(preceded(space1, face_index))(input)?;
    let (input, _) = all_consuming(space0)(input)?;
    Ok((input, indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRAHEDRON: &str = "\
# a tetrahedron
o tetra
v 0 0 0
v 1.0 0.0 0.0
v 0 1 0
v 0 0 -1.5e0
vn 0 0 1
s off

f 1 3 2
f 1 2 4
f 2 3 4
f 1 4 3
";

    #[test]
    fn test_parse_obj() {
        let mesh = parse_obj(TETRAHEDRON).unwrap();
        assert_eq!(mesh.len(), 4);
        let first = mesh.triangles()[0];
        assert_eq!(first.points[0], Vector3D::new(0.0, 0.0, 0.0));
        assert_eq!(first.points[1], Vector3D::new(0.0, 1.0, 0.0));
        assert_eq!(first.points[2], Vector3D::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.triangles()[1].points[2].z, -1.5);
    }

    #[test]
    fn test_slash_forms_keep_vertex_index() {
        let input = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/4/7 2//8 3/6\n";
        let mesh = parse_obj(input).unwrap();
        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.triangles()[0].points[1], Vector3D::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_extra_face_entries_are_ignored() {
        let input = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let mesh = parse_obj(input).unwrap();
        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.triangles()[0].points[2], Vector3D::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_forward_references_and_trailing_comments() {
        let input = "f 1 2 3 # before the vertices\nv 0 0 0\nv 1 0 0 1.0\nv 0 1 0\n";
        let mesh = parse_obj(input).unwrap();
        assert_eq!(mesh.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let mesh = parse_obj("# nothing here\n\n").unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_missing_coordinate() {
        let err = parse_obj("v 0 0 0\nv 1 2\n").unwrap_err();
        match err {
            LoadError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_bad_face_entries() {
        for input in ["f 1 x 3\n", "f -1 2 3\n", "f 1 2\n", "f\n", "f 1 2 3x\n"] {
            let err = parse_obj(input).unwrap_err();
            assert!(matches!(err, LoadError::Parse { line: 1, .. }), "{}", input);
        }
    }

    #[test]
    fn test_out_of_range_face_index() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\n\nf 1 2 4\n").unwrap_err();
        match err {
            LoadError::FaceIndex {
                line,
                index,
                vertex_count,
            } => assert_eq!((line, index, vertex_count), (5, 4, 3)),
            other => panic!("unexpected error: {}", other),
        }

        let err = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n").unwrap_err();
        assert!(matches!(err, LoadError::FaceIndex { index: 0, .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_obj("/nonexistent/raster3d/mesh.obj").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
