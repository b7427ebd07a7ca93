use thiserror::Error;

/// failures that abort construction, or that a sampling call surfaces to its caller.
///
/// material sampling failures are not errors, they come back as `None` from `Material::sample`
/// and end the path that requested them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("material id {0} does not exist in the material table")]
    UnknownMaterial(usize),
    #[error("geometry id {0} does not exist in the scene")]
    UnknownGeometry(usize),
    #[error("unknown path tracer kind {0:?}")]
    UnknownStrategy(String),
    #[error("pixel ({x}, {y}) is outside a {width}x{height} frame")]
    PixelOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}
