pub mod assets;
pub mod mesh;
pub mod tangents;
pub mod utils;
