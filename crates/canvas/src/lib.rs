use thiserror::Error;

mod history;
pub use history::*;
mod surface;
pub use surface::*;

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("snapshot payload is {len} bytes, expected {expected}")]
    SnapshotSize { len: usize, expected: usize },
    #[error("snapshot is for a {width}x{height} surface")]
    SnapshotDimensions { width: u32, height: u32 },
}
