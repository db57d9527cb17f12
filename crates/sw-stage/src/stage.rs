//! SpinStage: The explicit phases of a two-wheel round
//!
//! A round always walks the same path: spin the category wheel, show the
//! chosen category, spin that category's item wheel, show the final task.

use serde::{Deserialize, Serialize};

/// Canonical round phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinStage {
    /// Waiting for the category wheel to be spun
    #[default]
    AwaitingCategorySpin,

    /// Category wheel settled; category is on display
    CategoryRevealed,

    /// Waiting for the item wheel of the chosen category to be spun
    AwaitingItemSpin,

    /// Item wheel settled; final category/item pair is on display
    ResultRevealed,
}

/// Which wheel is on screen for a spin stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelKind {
    /// Wheel segments are category names
    Category,
    /// Wheel segments are the items of the selected category
    Item,
}

impl SpinStage {
    /// All stages in round order
    pub const ALL: [SpinStage; 4] = [
        SpinStage::AwaitingCategorySpin,
        SpinStage::CategoryRevealed,
        SpinStage::AwaitingItemSpin,
        SpinStage::ResultRevealed,
    ];

    /// Wheel that can be spun in this stage, if any
    pub fn wheel(self) -> Option<WheelKind> {
        match self {
            SpinStage::AwaitingCategorySpin => Some(WheelKind::Category),
            SpinStage::AwaitingItemSpin => Some(WheelKind::Item),
            SpinStage::CategoryRevealed | SpinStage::ResultRevealed => None,
        }
    }

    /// Can `spin()` be issued in this stage?
    pub fn accepts_spin(self) -> bool {
        self.wheel().is_some()
    }

    /// Stage reached when a spin started in this stage settles
    pub fn after_spin(self) -> Option<SpinStage> {
        match self {
            SpinStage::AwaitingCategorySpin => Some(SpinStage::CategoryRevealed),
            SpinStage::AwaitingItemSpin => Some(SpinStage::ResultRevealed),
            _ => None,
        }
    }

    /// Does this stage carry a selected category?
    pub fn has_category(self) -> bool {
        !matches!(self, SpinStage::AwaitingCategorySpin)
    }

    /// Does this stage carry a selected item?
    pub fn has_item(self) -> bool {
        matches!(self, SpinStage::ResultRevealed)
    }

    /// Is this the end of a round?
    pub fn is_terminal(self) -> bool {
        matches!(self, SpinStage::ResultRevealed)
    }

    /// Stable snake_case name
    pub fn type_name(self) -> &'static str {
        match self {
            SpinStage::AwaitingCategorySpin => "awaiting_category_spin",
            SpinStage::CategoryRevealed => "category_revealed",
            SpinStage::AwaitingItemSpin => "awaiting_item_spin",
            SpinStage::ResultRevealed => "result_revealed",
        }
    }

    /// Heading shown above the wheel
    pub fn title(self, category: Option<&str>) -> String {
        match self {
            SpinStage::AwaitingCategorySpin => "Step 1: pick a category".to_string(),
            SpinStage::CategoryRevealed => "Step 1 result".to_string(),
            SpinStage::AwaitingItemSpin => match category {
                Some(category) => format!("Step 2: what's inside {}?", category),
                None => "Step 2: pick an item".to_string(),
            },
            SpinStage::ResultRevealed => "Final result".to_string(),
        }
    }
}

impl std::fmt::Display for SpinStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spin_stages() {
        let spinnable: Vec<_> = SpinStage::ALL
            .iter()
            .filter(|s| s.accepts_spin())
            .collect();
        assert_eq!(
            spinnable,
            vec![&SpinStage::AwaitingCategorySpin, &SpinStage::AwaitingItemSpin]
        );
        assert_eq!(
            SpinStage::AwaitingCategorySpin.after_spin(),
            Some(SpinStage::CategoryRevealed)
        );
        assert_eq!(
            SpinStage::AwaitingItemSpin.after_spin(),
            Some(SpinStage::ResultRevealed)
        );
        assert_eq!(SpinStage::ResultRevealed.after_spin(), None);
    }

    #[test]
    fn test_selection_flags() {
        assert!(!SpinStage::AwaitingCategorySpin.has_category());
        assert!(SpinStage::CategoryRevealed.has_category());
        assert!(SpinStage::AwaitingItemSpin.has_category());
        assert!(SpinStage::ResultRevealed.has_item());
        assert!(!SpinStage::AwaitingItemSpin.has_item());
    }

    #[test]
    fn test_title() {
        assert_eq!(
            SpinStage::AwaitingItemSpin.title(Some("Food")),
            "Step 2: what's inside Food?"
        );
        assert_eq!(SpinStage::ResultRevealed.title(None), "Final result");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&SpinStage::CategoryRevealed).unwrap();
        assert_eq!(json, "\"category_revealed\"");
        let back: SpinStage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SpinStage::CategoryRevealed);
    }
}
