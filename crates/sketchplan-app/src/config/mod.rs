//! Drawing configuration
//!
//! Feedback colors, input snapping, destination layers and symbol catalog
//! rules. Stored as RON in the OS config directory.

mod manager;

pub use manager::{ConfigError, ConfigManager, SharedConfig, create_shared_config};

use serde::{Deserialize, Serialize};

use crate::catalog::SymbolGroupId;
use crate::layer::{ElevationMode, LayerId};
use crate::symbol::{Color, FillSymbol, LineSymbol, Symbol};

/// Colors used to highlight the sketch in progress
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FeedbackConfig {
    /// Color while the sketch is inside the region
    pub valid_color: Color,
    /// Color while the sketch leaves the region
    pub violation_color: Color,
    /// Sketch line width in points
    pub width: f32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            valid_color: Color::rgb(0xb2, 0xb3, 0xb2),
            violation_color: Color::rgb(0xff, 0x00, 0x00),
            width: 20.0,
        }
    }
}

/// Pointer input preferences
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InputConfig {
    /// Snap pointer positions to the grid
    pub snap_to_grid: bool,
    /// Grid spacing in map units
    pub grid_spacing: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            snap_to_grid: false,
            grid_spacing: 1.0,
        }
    }
}

/// A destination layer created at startup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerConfig {
    pub id: LayerId,
    pub title: String,
    #[serde(default)]
    pub elevation: ElevationMode,
    /// Symbol for graphics drawn on this layer
    pub symbol: Symbol,
}

fn path_symbol() -> Symbol {
    Symbol::Line(LineSymbol::new(Color::rgb(0xcb, 0xcb, 0xcb), 20.0))
}

fn default_layers() -> Vec<LayerConfig> {
    vec![
        LayerConfig {
            id: LayerId::streets(),
            title: "Streets".to_string(),
            elevation: ElevationMode::OnTheGround,
            symbol: path_symbol(),
        },
        LayerConfig {
            id: LayerId::trails(),
            title: "Walking paths".to_string(),
            elevation: ElevationMode::OnTheGround,
            symbol: path_symbol(),
        },
        LayerConfig {
            id: LayerId::zones(),
            title: "Planting zones".to_string(),
            elevation: ElevationMode::OnTheGround,
            symbol: Symbol::Fill(FillSymbol {
                color: Color::rgba(0x6b, 0x8e, 0x23, 0xb4),
                outline: Some(LineSymbol::new(Color::rgb(0x55, 0x6b, 0x2f), 2.0)),
            }),
        },
    ]
}

/// How a catalog style is recognized
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StyleMatch {
    /// Style name taken from the item's type keywords
    StyleName(String),
    /// Item title, for styles published without a style name
    StyleTitle(String),
}

/// Maps a catalog style to a symbol group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupRule {
    pub group: SymbolGroupId,
    pub style: StyleMatch,
}

impl GroupRule {
    pub fn style_name(group: SymbolGroupId, name: &str) -> Self {
        Self {
            group,
            style: StyleMatch::StyleName(name.to_string()),
        }
    }

    pub fn style_title(group: SymbolGroupId, title: &str) -> Self {
        Self {
            group,
            style: StyleMatch::StyleTitle(title.to_string()),
        }
    }
}

/// Symbol catalog settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    pub rules: Vec<GroupRule>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                GroupRule::style_name(SymbolGroupId::Icons, "EsriIconsStyle"),
                GroupRule::style_name(SymbolGroupId::Trees, "EsriRealisticTreesStyle"),
                GroupRule::style_name(SymbolGroupId::Vehicles, "EsriRealisticTransportationStyle"),
                GroupRule::style_title(SymbolGroupId::Events, "webstyle_evenementen2"),
            ],
        }
    }
}

/// Complete drawing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrawConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub feedback: FeedbackConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default = "default_layers")]
    pub layers: Vec<LayerConfig>,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            version: 0,
            feedback: FeedbackConfig::default(),
            input: InputConfig::default(),
            layers: default_layers(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl DrawConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            ..Default::default()
        }
    }

    pub fn layer(&self, id: &LayerId) -> Option<&LayerConfig> {
        self.layers.iter().find(|layer| &layer.id == id)
    }
}
