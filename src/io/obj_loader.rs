use crate::core::geometry::Vertex;
use crate::io::error::{Attribute, ObjError};
use crate::scene::mesh::Mesh;
use log::{debug, info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// How malformed numeric text and short attribute lines are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Malformed numbers become 0 and missing components are zero-filled.
    #[default]
    Lenient,
    /// Malformed numbers and missing components are errors.
    Strict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub parse_mode: ParseMode,
}

impl LoadOptions {
    pub fn strict() -> Self {
        Self {
            parse_mode: ParseMode::Strict,
        }
    }

    pub fn lenient() -> Self {
        Self {
            parse_mode: ParseMode::Lenient,
        }
    }
}

/// Identity of an output vertex: the 1-based `p/t/n` indices of a face corner.
///
/// Corners with equal keys share one vertex. Spatially identical corners with
/// different uv or normal indices do not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VertexKey {
    pub position: i64,
    pub uv: i64,
    pub normal: i64,
}

/// Loads an OBJ file and returns a single indexed Mesh.
///
/// Supports `v`, `vt`, `vn` and triangle/quad `f p/t/n` directives. Every other
/// directive is skipped with a debug diagnostic.
pub fn load_obj<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Mesh, ObjError> {
    let path = path.as_ref();
    info!("Loading OBJ file: {}", path.display());

    let file = File::open(path).map_err(|source| ObjError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;

    load_obj_from_reader(BufReader::new(file), options)
}

/// Same as [`load_obj`], reading from any buffered source.
pub fn load_obj_from_reader<R: BufRead>(reader: R, options: &LoadOptions) -> Result<Mesh, ObjError> {
    let mut builder = MeshBuilder::new(*options);

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|source| ObjError::Read {
            line: line_no,
            source,
        })?;
        builder.process_line(line_no, &line)?;
    }

    Ok(builder.finish())
}

/// Parses OBJ text already held in memory.
pub fn parse_obj(text: &str, options: &LoadOptions) -> Result<Mesh, ObjError> {
    load_obj_from_reader(text.as_bytes(), options)
}

/// Attribute pools, dedup table and output mesh for a single load pass.
struct MeshBuilder {
    options: LoadOptions,
    positions: Vec<Point3<f32>>,
    uvs: Vec<Vector2<f32>>,
    normals: Vec<Vector3<f32>>,
    dedup: HashMap<VertexKey, u32>,
    mesh: Mesh,
    skipped_lines: usize,
}

impl MeshBuilder {
    fn new(options: LoadOptions) -> Self {
        Self {
            options,
            positions: Vec::new(),
            uvs: Vec::new(),
            normals: Vec::new(),
            dedup: HashMap::new(),
            mesh: Mesh::default(),
            skipped_lines: 0,
        }
    }

    fn process_line(&mut self, line_no: usize, line: &str) -> Result<(), ObjError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&directive, args)) = tokens.split_first() else {
            return Ok(());
        };

        match directive {
            "v" => {
                let [x, y, z] = self.parse_components::<3>(line_no, "v", args)?;
                self.positions.push(Point3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = self.parse_components::<2>(line_no, "vt", args)?;
                self.uvs.push(Vector2::new(u, v));
            }
            "vn" => {
                let [x, y, z] = self.parse_components::<3>(line_no, "vn", args)?;
                self.normals.push(Vector3::new(x, y, z));
            }
            "f" => self.process_face(line_no, args)?,
            _ => {
                debug!("Skipped line {}: [{}]", line_no, line);
                self.skipped_lines += 1;
            }
        }

        Ok(())
    }

    fn process_face(&mut self, line_no: usize, corners: &[&str]) -> Result<(), ObjError> {
        // Arity is checked before any corner is resolved.
        if corners.len() != 3 && corners.len() != 4 {
            return Err(ObjError::UnsupportedFaceArity {
                line: line_no,
                corners: corners.len(),
            });
        }

        let keys = corners
            .iter()
            .map(|token| self.parse_corner(line_no, token))
            .collect::<Result<Vec<_>, _>>()?;

        let offsets = keys
            .iter()
            .map(|&key| self.resolve(line_no, key))
            .collect::<Result<Vec<_>, _>>()?;

        self.mesh
            .indices
            .extend_from_slice(&[offsets[0], offsets[1], offsets[2]]);
        if offsets.len() == 4 {
            // Fan split along the 0-2 diagonal: (0,1,2) + (0,2,3).
            self.mesh
                .indices
                .extend_from_slice(&[offsets[0], offsets[2], offsets[3]]);
        }

        Ok(())
    }

    /// Returns the output offset for `key`, emitting a new vertex on first use.
    fn resolve(&mut self, line_no: usize, key: VertexKey) -> Result<u32, ObjError> {
        if let Some(&offset) = self.dedup.get(&key) {
            return Ok(offset);
        }

        let vertex = Vertex::new(
            lookup(&self.positions, key.position, Attribute::Position, line_no)?,
            lookup(&self.uvs, key.uv, Attribute::Uv, line_no)?,
            lookup(&self.normals, key.normal, Attribute::Normal, line_no)?,
        );

        let offset = next_offset(self.mesh.vertices.len(), line_no)?;
        self.mesh.vertices.push(vertex);
        self.dedup.insert(key, offset);
        Ok(offset)
    }

    /// Splits a `p/t/n` corner. Absent or empty fields parse to 0.
    fn parse_corner(&self, line_no: usize, token: &str) -> Result<VertexKey, ObjError> {
        let mut fields = token.split('/');
        let mut next = || match fields.next() {
            None | Some("") => Ok(0),
            Some(text) => self.parse_index(line_no, text),
        };

        Ok(VertexKey {
            position: next()?,
            uv: next()?,
            normal: next()?,
        })
    }

    fn parse_components<const N: usize>(
        &self,
        line_no: usize,
        directive: &'static str,
        args: &[&str],
    ) -> Result<[f32; N], ObjError> {
        if args.len() < N {
            if self.options.parse_mode == ParseMode::Strict {
                return Err(ObjError::MissingComponents {
                    line: line_no,
                    directive,
                    expected: N,
                    found: args.len(),
                });
            }
            warn!(
                "Line {}: '{}' has {} of {} components, filling the rest with 0",
                line_no,
                directive,
                args.len(),
                N
            );
        }

        // Trailing tokens (e.g. the optional `w` of a position) are ignored.
        let mut values = [0.0; N];
        for (value, token) in values.iter_mut().zip(args) {
            *value = self.parse_float(line_no, token)?;
        }
        Ok(values)
    }

    fn parse_float(&self, line_no: usize, token: &str) -> Result<f32, ObjError> {
        match token.parse::<f32>() {
            Ok(value) => Ok(value),
            Err(_) if self.options.parse_mode == ParseMode::Lenient => {
                warn!("Line {}: '{}' is not a number, using 0", line_no, token);
                Ok(0.0)
            }
            Err(_) => Err(ObjError::InvalidNumber {
                line: line_no,
                token: token.to_string(),
            }),
        }
    }

    fn parse_index(&self, line_no: usize, text: &str) -> Result<i64, ObjError> {
        match text.parse::<i64>() {
            Ok(index) => Ok(index),
            Err(_) if self.options.parse_mode == ParseMode::Lenient => {
                warn!("Line {}: '{}' is not an index, using 0", line_no, text);
                Ok(0)
            }
            Err(_) => Err(ObjError::InvalidNumber {
                line: line_no,
                token: text.to_string(),
            }),
        }
    }

    fn finish(self) -> Mesh {
        info!(
            "OBJ loaded successfully. {} vertices, {} triangles ({} lines skipped)",
            self.mesh.vertex_count(),
            self.mesh.triangle_count(),
            self.skipped_lines
        );
        self.mesh
    }
}

/// Offset the next emitted vertex gets in a `u32` index buffer.
fn next_offset(vertex_count: usize, line: usize) -> Result<u32, ObjError> {
    u32::try_from(vertex_count).map_err(|_| ObjError::TooManyVertices { line })
}

/// Resolves a 1-based OBJ index against its pool.
fn lookup<T: Copy>(pool: &[T], index: i64, attribute: Attribute, line: usize) -> Result<T, ObjError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| pool.get(i))
        .copied()
        .ok_or_else(|| ObjError::IndexOutOfRange {
            line,
            attribute,
            index,
            len: pool.len(),
        })
}
