//! Drawing tools
//!
//! The controller runs one drawing tool at a time. A tool is a sketch
//! operation bound to a destination layer: pointer input feeds the operation,
//! and when the tool closes its finished geometries become graphics on the
//! layer.

use std::sync::Arc;

use futures::executor::block_on;
use glam::Vec2;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sketchplan_engine::{
    ConstraintRegion, FeedbackSink, Geometry, GeometryDraft, GeometryKind, OperationHandle,
    OperationId, PointerHub, PumpReport, SessionPolicy, SketchOperation,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::SymbolPlacement;
use crate::config::SharedConfig;
use crate::error::DrawError;
use crate::feedback::SketchHighlighter;
use crate::input::{InputAdapter, PointerInput};
use crate::layer::{DestinationLayer, Graphic, LayerId, LayerRegistry};
use crate::symbol::Symbol;

/// What to draw and where to put it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawRequest {
    pub kind: GeometryKind,
    pub layer: LayerId,
    /// Symbol for the finished graphics; the layer's symbol when unset
    #[serde(default)]
    pub symbol: Option<Symbol>,
}

impl DrawRequest {
    pub fn new(kind: GeometryKind, layer: LayerId) -> Self {
        Self {
            kind,
            layer,
            symbol: None,
        }
    }

    pub fn with_symbol(mut self, symbol: Symbol) -> Self {
        self.symbol = Some(symbol);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseMode {
    Done,
    Cancel,
    TearDown,
}

struct ActiveTool {
    request: DrawRequest,
    operation: SketchOperation<PointerHub>,
    handle: OperationHandle,
}

/// Runs drawing tools against a scene's constraint region and layers
pub struct DrawingController {
    region: Arc<ConstraintRegion>,
    config: SharedConfig,
    layers: LayerRegistry,
    hub: PointerHub,
    highlighter: Arc<Mutex<SketchHighlighter>>,
    tool: Option<ActiveTool>,
}

impl DrawingController {
    /// Create a controller with the configured layers
    pub fn new(region: Arc<ConstraintRegion>, config: SharedConfig) -> Self {
        let (layers, feedback) = {
            let manager = config.read();
            (
                LayerRegistry::from_config(&manager.config().layers),
                manager.config().feedback,
            )
        };

        Self {
            region,
            config,
            layers,
            hub: PointerHub::new(),
            highlighter: Arc::new(Mutex::new(SketchHighlighter::new(feedback))),
            tool: None,
        }
    }

    /// Replace the configured layers
    pub fn with_layers(mut self, layers: LayerRegistry) -> Self {
        self.layers = layers;
        self
    }

    pub fn layers(&self) -> &LayerRegistry {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerRegistry {
        &mut self.layers
    }

    pub fn layer(&self, id: &LayerId) -> Option<&dyn DestinationLayer> {
        self.layers.get(id)
    }

    pub fn highlighter(&self) -> Arc<Mutex<SketchHighlighter>> {
        Arc::clone(&self.highlighter)
    }

    pub fn region(&self) -> &ConstraintRegion {
        &self.region
    }

    pub fn is_drawing(&self) -> bool {
        self.tool.is_some()
    }

    /// Request of the active tool
    pub fn active_request(&self) -> Option<&DrawRequest> {
        self.tool.as_ref().map(|tool| &tool.request)
    }

    pub fn active_operation(&self) -> Option<OperationId> {
        self.tool.as_ref().map(|tool| tool.handle.id)
    }

    /// Draft of the sketch in progress
    pub fn draft(&self) -> Option<&GeometryDraft> {
        let tool = self.tool.as_ref()?;
        tool.operation.active_session().map(|session| session.draft())
    }

    /// Start a drawing tool.
    ///
    /// An active tool is torn down first; what it already finished still
    /// goes to its layer.
    pub fn start(&mut self, request: DrawRequest) -> Result<OperationId, DrawError> {
        if !self.layers.contains(&request.layer) {
            return Err(DrawError::UnknownLayer(request.layer));
        }
        if self.tool.is_some() {
            debug!("Tearing down active tool before starting a new one");
            self.close_tool(CloseMode::TearDown)?;
        }

        let feedback = self.config.read().config().feedback;
        self.highlighter.lock().set_config(feedback);

        let sink: Box<dyn FeedbackSink> = Box::new(Arc::clone(&self.highlighter));
        let (operation, handle) = SketchOperation::start(
            request.kind,
            Arc::clone(&self.region),
            self.hub.clone(),
            sink,
            SessionPolicy::default(),
        );
        let id = handle.id;
        info!(
            "Drawing {} on layer {} (operation {})",
            request.kind.name(),
            request.layer,
            id
        );

        self.tool = Some(ActiveTool {
            request,
            operation,
            handle,
        });
        Ok(id)
    }

    pub fn start_street(&mut self) -> Result<OperationId, DrawError> {
        self.start(DrawRequest::new(GeometryKind::Polyline, LayerId::streets()))
    }

    pub fn start_walking_path(&mut self) -> Result<OperationId, DrawError> {
        self.start(DrawRequest::new(GeometryKind::Polyline, LayerId::trails()))
    }

    pub fn start_planting_zone(&mut self) -> Result<OperationId, DrawError> {
        self.start(DrawRequest::new(GeometryKind::Polygon, LayerId::zones()))
    }

    /// Feed pointer input to the active tool
    pub fn pointer(&mut self, input: PointerInput) -> Result<PumpReport, DrawError> {
        let adapter = InputAdapter::from_config(&self.config.read().config().input);
        let tool = self.tool.as_mut().ok_or(DrawError::NoActiveTool)?;

        for event in adapter.translate(input) {
            if !self.hub.emit(event) {
                debug!("Pointer input {:?} had no sketch to go to", input);
            }
        }

        match tool.operation.pump() {
            Ok(report) => Ok(report),
            Err(error) => {
                warn!("Drawing tool stopped: {}", error);
                self.tool = None;
                self.hub.unbind();
                Err(error.into())
            }
        }
    }

    /// Close the active tool and add its geometries to the layer.
    ///
    /// Returns the number of graphics added.
    pub fn finish_tool(&mut self) -> Result<usize, DrawError> {
        self.close_tool(CloseMode::Done)
    }

    /// Cancel the active tool. The sketch in progress is discarded;
    /// sketches it already finished are still added to the layer.
    pub fn cancel_tool(&mut self) -> Result<usize, DrawError> {
        self.close_tool(CloseMode::Cancel)
    }

    /// Place a gallery symbol once on a layer
    pub fn place_symbol(
        &mut self,
        placement: SymbolPlacement,
        layer: &LayerId,
        position: Vec2,
    ) -> Result<Uuid, DrawError> {
        let target = self
            .layers
            .get_mut(layer)
            .ok_or_else(|| DrawError::UnknownLayer(layer.clone()))?;

        let graphic = Graphic::point(position, Symbol::WebStyle(placement.symbol));
        let id = graphic.id;
        target.add(graphic);
        info!("Placed {} symbol on layer {}", placement.group, layer);
        Ok(id)
    }

    fn close_tool(&mut self, mode: CloseMode) -> Result<usize, DrawError> {
        let ActiveTool {
            request,
            mut operation,
            handle,
        } = self.tool.take().ok_or(DrawError::NoActiveTool)?;

        match mode {
            CloseMode::Done => operation.done()?,
            CloseMode::Cancel => operation.cancel()?,
            CloseMode::TearDown => {}
        }
        drop(operation);
        self.hub.unbind();

        let result = block_on(handle.completion)?;
        debug!(
            "Operation {} ended {:?} after {} sessions",
            result.operation,
            result.ending,
            result.sessions.len()
        );
        self.deliver(&request, result.geometries)
    }

    fn deliver(&mut self, request: &DrawRequest, geometries: Vec<Geometry>) -> Result<usize, DrawError> {
        let layer = self
            .layers
            .get_mut(&request.layer)
            .ok_or_else(|| DrawError::UnknownLayer(request.layer.clone()))?;

        let symbol = request
            .symbol
            .clone()
            .unwrap_or_else(|| layer.default_symbol().clone());
        let count = layer.add_geometries(geometries, &symbol);
        info!("Added {} {} graphics to layer {}", count, request.kind.name(), request.layer);
        Ok(count)
    }
}

impl std::fmt::Debug for DrawingController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingController")
            .field("layers", &self.layers)
            .field("active", &self.active_request())
            .finish()
    }
}
