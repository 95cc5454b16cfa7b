//! Symbols collected for one gallery category

use super::{PortalItem, SymbolGroupId, SymbolItem};
use crate::config::{GroupRule, StyleMatch};

/// Symbols of one gallery category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolGroup {
    pub category: SymbolGroupId,
    pub items: Vec<SymbolItem>,
}

impl SymbolGroup {
    pub fn new(category: SymbolGroupId) -> Self {
        Self {
            category,
            items: Vec::new(),
        }
    }

    /// Collect the symbols of every portal item a rule assigns to `category`.
    ///
    /// An item matched by style name contributes its entries under that style
    /// name; an item matched by title contributes them under its title.
    pub fn from_portal_items(
        category: SymbolGroupId,
        portal_items: &[PortalItem],
        rules: &[GroupRule],
    ) -> Self {
        let mut group = Self::new(category);
        let rules: Vec<&StyleMatch> = rules
            .iter()
            .filter(|rule| rule.group == category)
            .map(|rule| &rule.style)
            .collect();

        for item in portal_items {
            let style_name = item.style_name();
            for style in &rules {
                let style = match style {
                    StyleMatch::StyleName(name) if !style_name.is_empty() && name == style_name => {
                        style_name
                    }
                    StyleMatch::StyleTitle(title) if title == &item.title => item.title.as_str(),
                    _ => continue,
                };
                group
                    .items
                    .extend(item.data.items.iter().map(|entry| SymbolItem::new(entry, style)));
            }
        }

        tracing::debug!("Symbol group {} has {} items", category, group.items.len());
        group
    }

    pub fn find(&self, name: &str) -> Option<&SymbolItem> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{StyleData, StyleEntry};
    use crate::config::CatalogConfig;

    fn entry(name: &str) -> StyleEntry {
        StyleEntry {
            name: name.to_string(),
            title: None,
            thumbnail: None,
            dimensionality: Some("volumetric".to_string()),
        }
    }

    fn portal_items() -> Vec<PortalItem> {
        vec![
            PortalItem::new(
                "Icons",
                vec!["Esri Style".into(), "EsriIconsStyle".into()],
                StyleData {
                    items: vec![entry("Pushpin"), entry("Flag")],
                },
            ),
            PortalItem::new(
                "Realistic Trees",
                vec!["Esri Style".into(), "EsriRealisticTreesStyle".into()],
                StyleData {
                    items: vec![entry("Oak"), entry("Birch"), entry("Maple")],
                },
            ),
            PortalItem::new(
                "webstyle_evenementen2",
                vec!["Web Style".into()],
                StyleData {
                    items: vec![entry("Stage")],
                },
            ),
        ]
    }

    #[test]
    fn test_groups_by_style_name() {
        let rules = CatalogConfig::default().rules;
        let trees = SymbolGroup::from_portal_items(SymbolGroupId::Trees, &portal_items(), &rules);

        assert_eq!(trees.len(), 3);
        assert!(trees.items.iter().all(|i| i.style == "EsriRealisticTreesStyle"));
        assert_eq!(trees.find("Birch").map(|i| i.name.as_str()), Some("Birch"));
    }

    #[test]
    fn test_groups_by_title() {
        let rules = CatalogConfig::default().rules;
        let events = SymbolGroup::from_portal_items(SymbolGroupId::Events, &portal_items(), &rules);

        assert_eq!(events.len(), 1);
        assert_eq!(events.items[0].style, "webstyle_evenementen2");
    }

    #[test]
    fn test_unmatched_category_is_empty() {
        let rules = CatalogConfig::default().rules;
        let vehicles =
            SymbolGroup::from_portal_items(SymbolGroupId::Vehicles, &portal_items(), &rules);
        assert!(vehicles.is_empty());
    }
}
