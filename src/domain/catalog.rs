//! Catalog - Demo Categories and Items
//!
//! A validated, ordered catalog. Construction is the only place items are
//! checked, so the sequencer can index without guarding every access.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::config::{InteractiveTypewriterConfig, TypewriterCategory, TypewriterItem};
use crate::domain::media::MediaRef;
use crate::error::{Error, Result};

/// One demo query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    /// Text typed character by character
    pub display: String,
    /// Text revealed once loading completes
    pub result: String,
    /// Media shown while typing and loading
    pub initial_media: Option<MediaRef>,
    /// Media shown with the result
    pub result_media: Option<MediaRef>,
}

impl Item {
    /// Number of characters to reveal
    pub fn display_len(&self) -> usize {
        self.display.chars().count()
    }

    /// The first `chars` characters of the display text
    pub fn display_prefix(&self, chars: usize) -> &str {
        match self.display.char_indices().nth(chars) {
            Some((end, _)) => &self.display[..end],
            None => &self.display,
        }
    }

    fn normalize(category: &str, raw: &TypewriterItem) -> Result<Self> {
        if raw.display.is_empty() {
            return Err(Error::EmptyDisplayText {
                category: category.to_string(),
                item: raw.id.clone(),
            });
        }

        let result = raw
            .command
            .clone()
            .or_else(|| raw.href.clone())
            .unwrap_or_default();
        let initial_media = raw.initial_src.clone().or_else(|| raw.result_src.clone());
        let result_media = raw.result_src.clone().or_else(|| raw.initial_src.clone());

        Ok(Self {
            id: raw.id.clone(),
            display: raw.display.clone(),
            result,
            initial_media,
            result_media,
        })
    }
}

/// A named group of items, shown as one tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub items: Vec<Item>,
}

/// Validated, non-empty catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoCatalog {
    categories: Vec<Category>,
}

impl DemoCatalog {
    /// Validate categories
    ///
    /// Rejects an empty catalog, empty categories, empty display text and
    /// duplicate ids within a collection.
    pub fn new(categories: Vec<Category>) -> Result<Self> {
        if categories.is_empty() {
            return Err(Error::EmptyCatalog {
                detail: "no categories".to_string(),
            });
        }

        let mut category_ids = HashSet::new();
        for category in &categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(Error::DuplicateId {
                    scope: "category".to_string(),
                    id: category.id.clone(),
                });
            }
            if category.items.is_empty() {
                return Err(Error::EmptyCatalog {
                    detail: format!("category '{}' has no items", category.id),
                });
            }

            let mut item_ids = HashSet::new();
            for item in &category.items {
                if !item_ids.insert(item.id.as_str()) {
                    return Err(Error::DuplicateId {
                        scope: format!("item in category '{}'", category.id),
                        id: item.id.clone(),
                    });
                }
                if item.display.is_empty() {
                    return Err(Error::EmptyDisplayText {
                        category: category.id.clone(),
                        item: item.id.clone(),
                    });
                }
            }
        }

        Ok(Self { categories })
    }

    /// Build from the `interactiveTypewriter` config section
    pub fn from_config(config: &InteractiveTypewriterConfig) -> Result<Self> {
        let categories = config
            .categories
            .iter()
            .map(Self::normalize_category)
            .collect::<Result<Vec<_>>>()?;
        let catalog = Self::new(categories)?;
        debug!(
            categories = catalog.len(),
            items = catalog.item_count(),
            "Catalog built from config"
        );
        Ok(catalog)
    }

    fn normalize_category(raw: &TypewriterCategory) -> Result<Category> {
        let items = raw
            .items
            .iter()
            .map(|item| Item::normalize(&raw.id, item))
            .collect::<Result<Vec<_>>>()?;
        Ok(Category {
            id: raw.id.clone(),
            name: raw.name.clone(),
            items,
        })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn item(&self, category: usize, item: usize) -> Option<&Item> {
        self.categories.get(category)?.items.get(item)
    }

    /// Number of categories (never zero)
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total items across all categories
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    pub fn position_of(&self, category_id: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.id == category_id)
    }
}

// ==================== Built-in Catalog ====================

fn media_item(id: &str, display: &str, command: &str, initial: &str, result: &str) -> Item {
    Item {
        id: id.to_string(),
        display: display.to_string(),
        result: command.to_string(),
        initial_media: Some(MediaRef::parse(initial)),
        result_media: Some(MediaRef::parse(result)),
    }
}

/// Compiled-in catalog of the mobile demo page
pub fn mobile_catalog() -> DemoCatalog {
    DemoCatalog {
        categories: vec![
            Category {
                id: "detection".to_string(),
                name: "Detection".to_string(),
                items: vec![
                    media_item(
                        "cars",
                        "Find all cars",
                        "detect: car",
                        "/vehicles.mp4",
                        "/cars_detect.mp4",
                    ),
                    media_item(
                        "trucks",
                        "Locate all trucks",
                        "detect: truck",
                        "/vehicles.mp4",
                        "/trucks_detect.mp4",
                    ),
                ],
            },
            Category {
                id: "vqa".to_string(),
                name: "Visual Q&A".to_string(),
                items: vec![
                    media_item(
                        "gauge",
                        "What temperature does the gauge read?",
                        "The gauge reads 53 °C.",
                        "@gauge.png",
                        "@gauge.png",
                    ),
                    media_item(
                        "cyclist_color",
                        "What color is the cyclist in the front?",
                        "The cyclist in the front is wearing blue.",
                        "@cyclist.jpg",
                        "@cyclist.jpg",
                    ),
                    media_item(
                        "cyclist_count",
                        "How many cyclists are there?",
                        "There are four cyclists in the image.",
                        "@cyclist.jpg",
                        "@cyclist.jpg",
                    ),
                ],
            },
            Category {
                id: "caption".to_string(),
                name: "Captioning".to_string(),
                items: vec![media_item(
                    "1",
                    "Describe this image (short)",
                    "A shelf holds six wine bottles, including Merryvale, Napa Valley Sauvignon Blanc, and Chateau Dorado, with a cluster of grapes and a warm, inviting glow.",
                    "@merry.avif",
                    "@merry.avif",
                )],
            },
        ],
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn item(id: &str, display: &str) -> Item {
        Item {
            id: id.to_string(),
            display: display.to_string(),
            result: format!("result of {id}"),
            initial_media: Some(MediaRef::parse("/initial.mp4")),
            result_media: Some(MediaRef::parse("@result.png")),
        }
    }

    pub(crate) fn category(id: &str, items: Vec<Item>) -> Category {
        Category {
            id: id.to_string(),
            name: id.to_uppercase(),
            items,
        }
    }

    /// `[{A: [x, y]}, {B: [z]}]`
    pub(crate) fn two_category_catalog() -> DemoCatalog {
        DemoCatalog::new(vec![
            category("A", vec![item("x", "ab"), item("y", "cde")]),
            category("B", vec![item("z", "f")]),
        ])
        .expect("valid catalog")
    }

    #[test]
    fn rejects_empty_catalog() {
        let err = DemoCatalog::new(Vec::new()).expect_err("empty");
        assert!(matches!(err, Error::EmptyCatalog { .. }));
    }

    #[test]
    fn rejects_empty_category() {
        let err = DemoCatalog::new(vec![category("A", vec![item("x", "ab")]), category("B", vec![])])
            .expect_err("empty category");
        assert!(matches!(err, Error::EmptyCatalog { .. }));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = DemoCatalog::new(vec![category("A", vec![item("x", "a"), item("x", "b")])])
            .expect_err("duplicate item");
        assert!(matches!(err, Error::DuplicateId { .. }));

        let err = DemoCatalog::new(vec![
            category("A", vec![item("x", "a")]),
            category("A", vec![item("y", "b")]),
        ])
        .expect_err("duplicate category");
        assert!(matches!(err, Error::DuplicateId { .. }));
    }

    #[test]
    fn same_item_id_allowed_across_categories() {
        let catalog = DemoCatalog::new(vec![
            category("A", vec![item("1", "a")]),
            category("B", vec![item("1", "b")]),
        ]);
        assert!(catalog.is_ok());
    }

    #[test]
    fn rejects_empty_display_text() {
        let err = DemoCatalog::new(vec![category("A", vec![item("x", "")])]).expect_err("empty text");
        assert!(matches!(err, Error::EmptyDisplayText { .. }));
    }

    #[test]
    fn default_config_normalizes_short_items() {
        let catalog =
            DemoCatalog::from_config(&InteractiveTypewriterConfig::default()).expect("valid");
        assert_eq!(catalog.len(), 3);
        let first = catalog.item(0, 0).expect("item");
        assert_eq!(first.display, "detect: truck");
        assert_eq!(first.result, "/");
        assert_eq!(first.initial_media, None);
    }

    #[test]
    fn missing_result_media_falls_back_to_initial() {
        let raw = TypewriterItem {
            id: "1".to_string(),
            display: "Find all cars".to_string(),
            command: Some("detect: car".to_string()),
            href: None,
            initial_src: Some(MediaRef::parse("/vehicles.mp4")),
            result_src: None,
        };
        let item = Item::normalize("detection", &raw).expect("valid");
        assert_eq!(item.result_media, Some(MediaRef::Video("/vehicles.mp4".to_string())));
        assert_eq!(item.result, "detect: car");
    }

    #[test]
    fn display_prefix_counts_characters() {
        let item = item("gauge", "53 °C");
        assert_eq!(item.display_len(), 5);
        assert_eq!(item.display_prefix(4), "53 °");
        assert_eq!(item.display_prefix(0), "");
        assert_eq!(item.display_prefix(99), "53 °C");
    }

    #[test]
    fn mobile_catalog_is_valid() {
        let catalog = mobile_catalog();
        assert!(DemoCatalog::new(catalog.categories().to_vec()).is_ok());
        assert_eq!(catalog.item_count(), 6);
        assert_eq!(catalog.position_of("vqa"), Some(1));
    }
}
