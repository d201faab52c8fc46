use serde::{Deserialize, Serialize};

/// Inventory health badge derived from quantity and restock threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    /// Nothing left on the shelf
    Out,
    /// At or below the restock threshold
    Low,
    /// Above threshold but within 150% of it
    Medium,
    Good,
}

impl StockStatus {
    pub fn classify(quantity: u32, threshold: u32) -> Self {
        if quantity == 0 {
            StockStatus::Out
        } else if quantity <= threshold {
            StockStatus::Low
        } else if u64::from(quantity) * 2 <= u64::from(threshold) * 3 {
            StockStatus::Medium
        } else {
            StockStatus::Good
        }
    }

    /// Returns true if the shopkeeper should restock
    pub fn needs_restock(&self) -> bool {
        matches!(self, StockStatus::Out | StockStatus::Low)
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Out => "Out of Stock",
            StockStatus::Low => "Low Stock",
            StockStatus::Medium => "Medium Stock",
            StockStatus::Good => "Good Stock",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(StockStatus::classify(0, 8), StockStatus::Out);
        assert_eq!(StockStatus::classify(8, 8), StockStatus::Low);
        assert_eq!(StockStatus::classify(12, 8), StockStatus::Medium);
        assert_eq!(StockStatus::classify(13, 8), StockStatus::Good);
    }

    #[test]
    fn test_zero_threshold_is_good_when_stocked() {
        assert_eq!(StockStatus::classify(1, 0), StockStatus::Good);
        assert!(!StockStatus::classify(1, 0).needs_restock());
        assert!(StockStatus::classify(0, 0).needs_restock());
    }
}
