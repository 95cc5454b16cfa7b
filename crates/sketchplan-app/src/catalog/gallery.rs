//! Symbol gallery selection

use serde::{Deserialize, Serialize};

use super::{PortalItem, SymbolGroup, SymbolGroupId, SymbolItem};
use crate::config::GroupRule;
use crate::symbol::WebStyleSymbol;

/// A symbol picked from the gallery, ready to be placed once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolPlacement {
    pub group: SymbolGroupId,
    pub symbol: WebStyleSymbol,
}

/// Gallery state: the groups and what the user has selected
#[derive(Debug, Clone, Default)]
pub struct SymbolGallery {
    groups: Vec<SymbolGroup>,
    selected_group_id: Option<SymbolGroupId>,
    selected_symbol: Option<SymbolItem>,
}

impl SymbolGallery {
    pub fn new(groups: Vec<SymbolGroup>) -> Self {
        Self {
            groups,
            selected_group_id: None,
            selected_symbol: None,
        }
    }

    /// Build one group per category from the fetched portal items
    pub fn from_portal_items(portal_items: &[PortalItem], rules: &[GroupRule]) -> Self {
        Self::new(
            SymbolGroupId::ALL
                .iter()
                .map(|&category| SymbolGroup::from_portal_items(category, portal_items, rules))
                .collect(),
        )
    }

    pub fn groups(&self) -> &[SymbolGroup] {
        &self.groups
    }

    pub fn selected_group_id(&self) -> Option<SymbolGroupId> {
        self.selected_group_id
    }

    pub fn select_group(&mut self, id: Option<SymbolGroupId>) {
        self.selected_group_id = id;
    }

    /// The group matching the selected group id
    pub fn selected_group(&self) -> Option<&SymbolGroup> {
        let id = self.selected_group_id?;
        self.groups.iter().find(|group| group.category == id)
    }

    /// Items shown in the gallery grid
    pub fn visible_items(&self) -> &[SymbolItem] {
        self.selected_group()
            .map(|group| group.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn selected_symbol(&self) -> Option<&SymbolItem> {
        self.selected_symbol.as_ref()
    }

    /// Pick a symbol from the visible group.
    ///
    /// Closes the group and returns a single placement. Returns `None` when
    /// no group is open or the symbol is not in it.
    pub fn select_symbol(&mut self, name: &str) -> Option<SymbolPlacement> {
        let group = self.selected_group()?;
        let category = group.category;
        let item = group.find(name)?.clone();

        self.selected_group_id = None;
        tracing::info!("Selected symbol {} from {}", item.name, category);
        let placement = SymbolPlacement {
            group: category,
            symbol: item.symbol(),
        };
        self.selected_symbol = Some(item);
        Some(placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{StyleData, StyleEntry};
    use crate::config::CatalogConfig;

    fn gallery() -> SymbolGallery {
        let icons = PortalItem::new(
            "Icons",
            vec!["EsriIconsStyle".into()],
            StyleData {
                items: vec![StyleEntry {
                    name: "Pushpin".into(),
                    title: None,
                    thumbnail: None,
                    dimensionality: None,
                }],
            },
        );
        SymbolGallery::from_portal_items(&[icons], &CatalogConfig::default().rules)
    }

    #[test]
    fn test_selected_group_follows_id() {
        let mut gallery = gallery();
        assert_eq!(gallery.groups().len(), 4);
        assert!(gallery.selected_group().is_none());
        assert!(gallery.visible_items().is_empty());

        gallery.select_group(Some(SymbolGroupId::Icons));
        assert_eq!(
            gallery.selected_group().map(|g| g.category),
            Some(SymbolGroupId::Icons)
        );
        assert_eq!(gallery.visible_items().len(), 1);

        gallery.select_group(Some(SymbolGroupId::Trees));
        assert!(gallery.visible_items().is_empty());
    }

    #[test]
    fn test_select_symbol_closes_group() {
        let mut gallery = gallery();
        gallery.select_group(Some(SymbolGroupId::Icons));

        let placement = gallery.select_symbol("Pushpin").unwrap();
        assert_eq!(placement.group, SymbolGroupId::Icons);
        assert_eq!(placement.symbol.style_name, "EsriIconsStyle");
        assert!(gallery.selected_group_id().is_none());
        assert_eq!(gallery.selected_symbol().map(|s| s.name.as_str()), Some("Pushpin"));

        // Nothing is open any more, so a second pick yields nothing
        assert!(gallery.select_symbol("Pushpin").is_none());
    }

    #[test]
    fn test_select_unknown_symbol() {
        let mut gallery = gallery();
        gallery.select_group(Some(SymbolGroupId::Icons));
        assert!(gallery.select_symbol("Anchor").is_none());
        assert_eq!(gallery.selected_group_id(), Some(SymbolGroupId::Icons));
    }
}
