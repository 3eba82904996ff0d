use crate::scene::mesh::MeshError;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Attribute pool a face corner indexes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    Uv,
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::Position => "position",
            Attribute::Uv => "uv",
            Attribute::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Errors that abort loading an OBJ file. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("cannot open OBJ file '{}': {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: read failed: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: face has {corners} corners, only triangles and quads are supported")]
    UnsupportedFaceArity { line: usize, corners: usize },

    #[error("line {line}: {attribute} index {index} is out of range (pool holds {len})")]
    IndexOutOfRange {
        line: usize,
        attribute: Attribute,
        index: i64,
        len: usize,
    },

    #[error("line {line}: '{token}' is not a valid number")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: '{directive}' expects {expected} components, found {found}")]
    MissingComponents {
        line: usize,
        directive: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: vertex count exceeds the u32 index range")]
    TooManyVertices { line: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse TOML in '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset '{name}': {source}")]
    Load {
        name: String,
        #[source]
        source: ObjError,
    },

    #[error("asset '{name}': {source}")]
    Mesh {
        name: String,
        #[source]
        source: MeshError,
    },
}
