//! Symbol catalog
//!
//! Groups point symbols from already fetched style items into the gallery
//! categories. Nothing here talks to the network: callers hand in portal
//! items with their style JSON.

mod gallery;
mod group;

pub use gallery::{SymbolGallery, SymbolPlacement};
pub use group::SymbolGroup;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::symbol::WebStyleSymbol;

/// Keyword shared by every style item that carries no style name
const GENERIC_STYLE_KEYWORD: &str = "Esri Style";

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid style data for '{title}': {source}")]
    InvalidStyleData {
        title: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Gallery category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolGroupId {
    Icons,
    Trees,
    Vehicles,
    Events,
}

impl SymbolGroupId {
    pub const ALL: [SymbolGroupId; 4] = [
        SymbolGroupId::Icons,
        SymbolGroupId::Trees,
        SymbolGroupId::Vehicles,
        SymbolGroupId::Events,
    ];
}

impl fmt::Display for SymbolGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Thumbnail {
    pub href: String,
}

/// One symbol entry in a style's data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleEntry {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pub dimensionality: Option<String>,
}

/// Style data as published with a style item
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleData {
    #[serde(default)]
    pub items: Vec<StyleEntry>,
}

/// A fetched style item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalItem {
    pub title: String,
    #[serde(default)]
    pub type_keywords: Vec<String>,
    #[serde(default)]
    pub data: StyleData,
}

impl PortalItem {
    pub fn new(title: impl Into<String>, type_keywords: Vec<String>, data: StyleData) -> Self {
        Self {
            title: title.into(),
            type_keywords,
            data,
        }
    }

    /// Build an item from its style JSON (`{"items": [...]}`)
    pub fn from_json(
        title: impl Into<String>,
        type_keywords: Vec<String>,
        json: &str,
    ) -> Result<Self, CatalogError> {
        let title = title.into();
        let data = serde_json::from_str(json).map_err(|source| CatalogError::InvalidStyleData {
            title: title.clone(),
            source,
        })?;
        Ok(Self {
            title,
            type_keywords,
            data,
        })
    }

    /// Style name from the first `Esri...Style` keyword, or empty
    pub fn style_name(&self) -> &str {
        self.type_keywords
            .iter()
            .find(|keyword| is_style_keyword(keyword))
            .map(String::as_str)
            .unwrap_or("")
    }
}

fn is_style_keyword(keyword: &str) -> bool {
    keyword.len() >= "EsriStyle".len()
        && keyword.starts_with("Esri")
        && keyword.ends_with("Style")
        && keyword != GENERIC_STYLE_KEYWORD
}

/// A symbol that can be placed from the gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolItem {
    pub name: String,
    /// Style the symbol is fetched from
    pub style: String,
    pub thumbnail_href: Option<String>,
}

impl SymbolItem {
    pub fn new(entry: &StyleEntry, style: &str) -> Self {
        Self {
            name: entry.name.clone(),
            style: style.to_string(),
            thumbnail_href: entry.thumbnail.as_ref().map(|t| t.href.clone()),
        }
    }

    pub fn symbol(&self) -> WebStyleSymbol {
        WebStyleSymbol {
            style_name: self.style.clone(),
            name: self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_style_name_skips_generic_keyword() {
        let item = PortalItem::new(
            "Trees",
            keywords(&["Esri Style", "Web Style", "EsriRealisticTreesStyle"]),
            StyleData::default(),
        );
        assert_eq!(item.style_name(), "EsriRealisticTreesStyle");
    }

    #[test]
    fn test_style_name_empty_without_match() {
        let item = PortalItem::new(
            "webstyle_evenementen2",
            keywords(&["Esri Style", "Web Style", "Style"]),
            StyleData::default(),
        );
        assert_eq!(item.style_name(), "");
    }

    #[test]
    fn test_from_json() {
        let item = PortalItem::from_json(
            "Icons",
            keywords(&["EsriIconsStyle"]),
            r#"{"items": [{"name": "Pushpin", "thumbnail": {"href": "pin.png"}, "dimensionality": "flat"}]}"#,
        )
        .unwrap();

        assert_eq!(item.data.items.len(), 1);
        let symbol = SymbolItem::new(&item.data.items[0], item.style_name());
        assert_eq!(symbol.thumbnail_href.as_deref(), Some("pin.png"));
        assert_eq!(
            symbol.symbol(),
            WebStyleSymbol {
                style_name: "EsriIconsStyle".into(),
                name: "Pushpin".into(),
            }
        );
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = PortalItem::from_json("Broken", Vec::new(), "{items").unwrap_err();
        assert!(err.to_string().contains("Broken"));
    }
}
