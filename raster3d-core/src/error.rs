/// Error types for the math layer and the mesh loader
use thiserror::Error;

/// Failures of the vector/matrix layer
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MathError {
    #[error("cannot normalize a vector of zero or non-finite length")]
    ZeroLength,

    #[error("degenerate camera basis: eye equals target or up is parallel to the view direction")]
    DegenerateBasis,

    #[error("invalid projection: fov {fov}°, aspect {aspect}, near {near}, far {far}")]
    InvalidProjection {
        fov: f64,
        aspect: f64,
        near: f64,
        far: f64,
    },
}

/// Failures while reading a mesh source
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read mesh source: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: face refers to vertex {index}, but only {vertex_count} are defined")]
    FaceIndex {
        line: usize,
        index: usize,
        vertex_count: usize,
    },
}
