//! Sketchplan drawing application
//!
//! Drawing tools for plan scenes built on the sketch engine: a
//! [`DrawingController`] that turns pointer input into graphics on
//! destination layers, live sketch highlighting, the symbol catalog, and the
//! RON configuration.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod feedback;
pub mod input;
pub mod layer;
pub mod replay;
pub mod symbol;

pub use catalog::{PortalItem, SymbolGallery, SymbolGroup, SymbolGroupId, SymbolPlacement};
pub use config::{ConfigManager, DrawConfig, SharedConfig, create_shared_config};
pub use controller::{DrawRequest, DrawingController};
pub use error::DrawError;
pub use feedback::SketchHighlighter;
pub use input::{InputAdapter, PointerInput};
pub use layer::{DestinationLayer, ElevationMode, Graphic, GraphicsLayer, LayerId, LayerRegistry};
pub use replay::{ReplayError, ReplayScript, ReplaySummary};
pub use symbol::{Color, FillSymbol, LineSymbol, Symbol};
