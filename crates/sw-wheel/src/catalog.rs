//! Category catalog: ordered category → items mapping
//!
//! The catalog is the data both wheels are drawn from. Order matters: it is
//! the segment order on the wheel, so the map keeps insertion order and
//! round-trips through JSON objects without re-sorting.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{WheelError, WheelResult};

/// Catalog shared between the machine and whoever edits it
pub type SharedCategories = Arc<RwLock<CategoryMap>>;

/// One category and its items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub items: Vec<String>,
}

/// Ordered mapping from category name to item names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap {
    categories: Vec<Category>,
}

const DEFAULT_CATALOG: [(&str, &[&str]); 4] = [
    (
        "Food",
        &["Hot pot", "Barbecue", "Sushi", "Fast food", "Noodles", "Salad"],
    ),
    (
        "Exercise",
        &["Running", "Yoga", "Swimming", "Cycling", "Push-ups"],
    ),
    (
        "Study",
        &["Programming", "English", "Design", "History", "Math"],
    ),
    (
        "Relax",
        &["Music", "Movie", "Nap", "Walk", "Video games"],
    ),
];

fn clean_name(raw: &str) -> WheelResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(WheelError::BlankName);
    }
    Ok(name.to_string())
}

impl CategoryMap {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog a new player starts with
    pub fn starter() -> Self {
        Self {
            categories: DEFAULT_CATALOG
                .iter()
                .map(|(name, items)| Category {
                    name: name.to_string(),
                    items: items.iter().map(|i| i.to_string()).collect(),
                })
                .collect(),
        }
    }

    /// Wrap in a shared handle
    pub fn into_shared(self) -> SharedCategories {
        Arc::new(RwLock::new(self))
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Category names in wheel order
    pub fn names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    /// Items of a category
    pub fn items(&self, category: &str) -> Option<&[String]> {
        self.position(category)
            .map(|idx| self.categories[idx].items.as_slice())
    }

    pub fn contains(&self, category: &str) -> bool {
        self.position(category).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    fn position(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == category)
    }

    /// Add an empty category at the end
    pub fn add_category(&mut self, name: &str) -> WheelResult<()> {
        let name = clean_name(name)?;
        if self.contains(&name) {
            return Err(WheelError::DuplicateCategory(name));
        }
        self.categories.push(Category {
            name,
            items: Vec::new(),
        });
        Ok(())
    }

    /// Remove a category, returning its items
    pub fn remove_category(&mut self, name: &str) -> WheelResult<Vec<String>> {
        let idx = self
            .position(name)
            .ok_or_else(|| WheelError::UnknownCategory(name.to_string()))?;
        Ok(self.categories.remove(idx).items)
    }

    /// Append an item to a category
    pub fn add_item(&mut self, category: &str, item: &str) -> WheelResult<()> {
        let item = clean_name(item)?;
        let idx = self
            .position(category)
            .ok_or_else(|| WheelError::UnknownCategory(category.to_string()))?;
        let items = &mut self.categories[idx].items;
        if items.contains(&item) {
            return Err(WheelError::DuplicateItem {
                category: category.to_string(),
                item,
            });
        }
        items.push(item);
        Ok(())
    }

    /// Remove the item at `index`, returning it
    pub fn remove_item(&mut self, category: &str, index: usize) -> WheelResult<String> {
        let idx = self
            .position(category)
            .ok_or_else(|| WheelError::UnknownCategory(category.to_string()))?;
        let items = &mut self.categories[idx].items;
        if index >= items.len() {
            return Err(WheelError::ItemIndexOutOfRange {
                category: category.to_string(),
                index,
                len: items.len(),
            });
        }
        Ok(items.remove(index))
    }

    /// Insert or replace a category wholesale (used when loading)
    pub fn insert(&mut self, name: impl Into<String>, items: Vec<String>) {
        let name = name.into();
        match self.position(&name) {
            Some(idx) => self.categories[idx].items = items,
            None => self.categories.push(Category { name, items }),
        }
    }
}

// JSON shape is a plain object: {"Food": ["Sushi", ...], ...}

impl Serialize for CategoryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.items)?;
        }
        map.end()
    }
}

struct CategoryMapVisitor;

impl<'de> Visitor<'de> for CategoryMapVisitor {
    type Value = CategoryMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping category names to item lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<CategoryMap, A::Error> {
        let mut map = CategoryMap::new();
        while let Some((name, items)) = access.next_entry::<String, Vec<String>>()? {
            map.insert(name, items);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for CategoryMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CategoryMapVisitor)
    }
}
