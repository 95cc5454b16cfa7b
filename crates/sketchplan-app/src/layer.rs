//! Destination layers for finished sketches and placed symbols

use std::collections::HashMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use sketchplan_core::{Geometry, GeometryKind};
use uuid::Uuid;

use crate::config::LayerConfig;
use crate::symbol::Symbol;

/// Identifier of a destination layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn streets() -> Self {
        Self::new("streets")
    }

    pub fn trails() -> Self {
        Self::new("trails")
    }

    pub fn zones() -> Self {
        Self::new("zones")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How graphics are placed relative to the scene surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElevationMode {
    /// Draped on the ground
    #[default]
    OnTheGround,
    /// Offset by each vertex's z above the ground
    RelativeToGround,
}

impl ElevationMode {
    pub fn draped(draped: bool) -> Self {
        if draped {
            ElevationMode::OnTheGround
        } else {
            ElevationMode::RelativeToGround
        }
    }
}

/// Shape carried by a graphic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GraphicShape {
    Sketch(Geometry),
    Point {
        position: Vec2,
        #[serde(default)]
        z: Option<f32>,
    },
}

/// A shape with the symbol it is drawn with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graphic {
    pub id: Uuid,
    pub shape: GraphicShape,
    pub symbol: Symbol,
}

impl Graphic {
    pub fn sketch(geometry: Geometry, symbol: Symbol) -> Self {
        Self {
            id: Uuid::new_v4(),
            shape: GraphicShape::Sketch(geometry),
            symbol,
        }
    }

    pub fn point(position: Vec2, symbol: Symbol) -> Self {
        Self {
            id: Uuid::new_v4(),
            shape: GraphicShape::Point { position, z: None },
            symbol,
        }
    }

    /// Geometry kind, if the graphic holds a sketch
    pub fn kind(&self) -> Option<GeometryKind> {
        match &self.shape {
            GraphicShape::Sketch(geometry) => Some(geometry.kind),
            GraphicShape::Point { .. } => None,
        }
    }
}

/// Target for finished geometries and placed symbols
pub trait DestinationLayer: Send + Sync {
    fn id(&self) -> &LayerId;

    fn title(&self) -> &str;

    fn elevation(&self) -> ElevationMode;

    /// Symbol used when a drawing request does not name one
    fn default_symbol(&self) -> &Symbol;

    fn graphics(&self) -> &[Graphic];

    fn add(&mut self, graphic: Graphic);

    /// Add one graphic per geometry, returning how many were added
    fn add_geometries(&mut self, geometries: Vec<Geometry>, symbol: &Symbol) -> usize {
        let count = geometries.len();
        for geometry in geometries {
            self.add(Graphic::sketch(geometry, symbol.clone()));
        }
        count
    }
}

/// In-memory graphics layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphicsLayer {
    pub id: LayerId,
    pub title: String,
    pub elevation: ElevationMode,
    pub symbol: Symbol,
    #[serde(default)]
    pub graphics: Vec<Graphic>,
}

impl GraphicsLayer {
    pub fn new(id: LayerId, title: impl Into<String>, symbol: Symbol) -> Self {
        Self {
            id,
            title: title.into(),
            elevation: ElevationMode::default(),
            symbol,
            graphics: Vec::new(),
        }
    }

    pub fn from_config(config: &LayerConfig) -> Self {
        Self {
            id: config.id.clone(),
            title: config.title.clone(),
            elevation: config.elevation,
            symbol: config.symbol.clone(),
            graphics: Vec::new(),
        }
    }

    pub fn with_elevation(mut self, elevation: ElevationMode) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn clear(&mut self) {
        self.graphics.clear();
    }
}

impl DestinationLayer for GraphicsLayer {
    fn id(&self) -> &LayerId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn elevation(&self) -> ElevationMode {
        self.elevation
    }

    fn default_symbol(&self) -> &Symbol {
        &self.symbol
    }

    fn graphics(&self) -> &[Graphic] {
        &self.graphics
    }

    fn add(&mut self, graphic: Graphic) {
        tracing::debug!("Layer {} received {} graphic", self.id, graphic.symbol.name());
        self.graphics.push(graphic);
    }
}

/// Destination layers keyed by id
#[derive(Default)]
pub struct LayerRegistry {
    layers: HashMap<LayerId, Box<dyn DestinationLayer>>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build graphics layers for every configured layer
    pub fn from_config(layers: &[LayerConfig]) -> Self {
        let mut registry = Self::new();
        for config in layers {
            registry.insert(GraphicsLayer::from_config(config));
        }
        registry
    }

    /// Add a layer, replacing any layer with the same id
    pub fn insert(&mut self, layer: impl DestinationLayer + 'static) {
        let id = layer.id().clone();
        if self.layers.insert(id.clone(), Box::new(layer)).is_some() {
            tracing::warn!("Replaced layer {}", id);
        }
    }

    pub fn get(&self, id: &LayerId) -> Option<&dyn DestinationLayer> {
        self.layers.get(id).map(|layer| layer.as_ref())
    }

    pub fn get_mut(&mut self, id: &LayerId) -> Option<&mut (dyn DestinationLayer + 'static)> {
        self.layers.get_mut(id).map(|layer| layer.as_mut())
    }

    pub fn contains(&self, id: &LayerId) -> bool {
        self.layers.contains_key(id)
    }

    /// Layer ids in sorted order
    pub fn ids(&self) -> Vec<LayerId> {
        let mut ids: Vec<LayerId> = self.layers.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl fmt::Debug for LayerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerRegistry")
            .field("layers", &self.ids())
            .finish()
    }
}
