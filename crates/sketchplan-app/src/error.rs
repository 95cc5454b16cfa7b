//! Drawing errors

use sketchplan_engine::SketchError;
use thiserror::Error;

use crate::layer::LayerId;

#[derive(Debug, Error)]
pub enum DrawError {
    #[error("Unknown layer: {0}")]
    UnknownLayer(LayerId),

    #[error("No drawing tool is active")]
    NoActiveTool,

    #[error("Sketch error: {0}")]
    Sketch(#[from] SketchError),
}
