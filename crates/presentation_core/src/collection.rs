//! Category-filtered view over a static catalog of cards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use shared::domain::ItemId;

pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub category: String,
    /// Rendering fields; never inspected by the collection.
    #[serde(default)]
    pub display: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
}

#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    categories: Vec<String>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for item in &items {
            if !categories.iter().any(|known| known == &item.category) {
                categories.push(item.category.clone());
            }
        }
        Self { items, categories }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// `"All"` followed by each item category in first-appearance order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|known| known == category)
    }
}

/// Items that leave and join the visible set on a filter change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterTransition {
    pub entering: Vec<ItemId>,
    pub exiting: Vec<ItemId>,
}

impl FilterTransition {
    pub fn is_empty(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FilterableCollection {
    catalog: Catalog,
    selected: String,
}

impl FilterableCollection {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            selected: ALL_CATEGORIES.to_string(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selected_category(&self) -> &str {
        &self.selected
    }

    pub fn set_filter(&mut self, category: &str) -> Result<FilterTransition, FilterError> {
        if !self.catalog.has_category(category) {
            return Err(FilterError::UnknownCategory(category.to_string()));
        }
        if self.selected == category {
            return Ok(FilterTransition::default());
        }

        let before: Vec<ItemId> = self.visible_items().map(|item| item.id).collect();
        self.selected = category.to_string();
        let after: Vec<ItemId> = self.visible_items().map(|item| item.id).collect();

        let before_set: HashSet<ItemId> = before.iter().copied().collect();
        let after_set: HashSet<ItemId> = after.iter().copied().collect();
        let transition = FilterTransition {
            entering: after
                .into_iter()
                .filter(|id| !before_set.contains(id))
                .collect(),
            exiting: before
                .into_iter()
                .filter(|id| !after_set.contains(id))
                .collect(),
        };
        debug!(
            category,
            entering = transition.entering.len(),
            exiting = transition.exiting.len(),
            "filter changed"
        );
        Ok(transition)
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &CatalogItem> + '_ {
        let show_all = self.selected == ALL_CATEGORIES;
        self.catalog
            .items
            .iter()
            .filter(move |item| show_all || item.category == self.selected)
    }
}

#[cfg(test)]
#[path = "tests/collection_tests.rs"]
mod tests;
