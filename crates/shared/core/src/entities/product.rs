use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::StockStatus;
use crate::values::{ProductId, Timestamp};

/// A stock-keeping line in a shop's inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Units on hand; never negative by construction
    pub quantity: u32,
    /// Unit label ("kg", "liters", "packets")
    pub unit: String,
    pub category: String,
    /// Restock alert level
    pub threshold: u32,
    /// Perishables carry an expiry; staples such as salt do not
    pub expires_at: Option<Timestamp>,
}

impl Product {
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        quantity: u32,
        unit: impl Into<String>,
        category: impl Into<String>,
        threshold: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            unit: unit.into(),
            category: category.into(),
            threshold,
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: Timestamp) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Remove up to `amount` units, flooring at zero.
    ///
    /// Returns the quantity actually removed.
    pub fn decrease(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.quantity);
        self.quantity -= removed;
        removed
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }

    /// Returns true if the quantity is at or below the restock threshold
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.threshold
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.quantity, self.threshold)
    }

    /// Whole days left before expiry, rounded up.
    ///
    /// Zero or negative once the expiry has passed; `None` for products
    /// without an expiry date.
    pub fn days_until_expiry(&self, now: Timestamp) -> Option<i64> {
        const DAY_SECS: i64 = 24 * 60 * 60;
        self.expires_at.map(|expiry| {
            let secs = (expiry - now).num_seconds();
            (secs + DAY_SECS - 1).div_euclid(DAY_SECS)
        })
    }

    /// Returns true if the product expires within `window` of `now`
    pub fn expires_within(&self, now: Timestamp, window: Duration) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now + window)
    }
}

/// A product typed in by the shopkeeper before it joins the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub quantity: u32,
    pub unit: String,
    pub category: String,
    pub threshold: u32,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

impl ProductDraft {
    pub fn new(
        name: impl Into<String>,
        quantity: u32,
        unit: impl Into<String>,
        category: impl Into<String>,
        threshold: u32,
    ) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
            category: category.into(),
            threshold,
            expires_at: None,
        }
    }

    /// Check the draft has the fields the add-products form requires
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("product name is required".to_string());
        }
        if self.threshold == 0 {
            return Err(format!("{}: restock threshold must be positive", self.name));
        }
        if self.unit.trim().is_empty() {
            return Err(format!("{}: unit is required", self.name));
        }
        Ok(())
    }

    /// Turn the draft into an inventory line under the given identifier
    pub fn into_product(self, id: impl Into<ProductId>) -> Product {
        Product {
            id: id.into(),
            name: self.name.trim().to_string(),
            quantity: self.quantity,
            unit: self.unit,
            category: self.category,
            threshold: self.threshold,
            expires_at: self.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn cooking_oil() -> Product {
        Product::new("4", "Cooking Oil", 12, "liters", "Oils", 8)
    }

    #[test]
    fn test_decrease_floors_at_zero() {
        let mut oil = cooking_oil();

        assert_eq!(oil.decrease(3), 3);
        assert_eq!(oil.quantity, 9);

        assert_eq!(oil.decrease(20), 9);
        assert_eq!(oil.quantity, 0);

        assert_eq!(oil.decrease(2), 0);
        assert_eq!(oil.quantity, 0);
        assert!(oil.is_out_of_stock());
    }

    #[test]
    fn test_days_until_expiry_rounds_up() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let oil = cooking_oil().with_expiry(now + Duration::days(5) - Duration::hours(3));

        assert_eq!(oil.days_until_expiry(now), Some(5));
        assert_eq!(oil.days_until_expiry(now + Duration::days(6)), Some(-1));
        assert!(oil.expires_within(now, Duration::days(5)));
        assert!(!oil.expires_within(now, Duration::days(2)));
    }

    #[test]
    fn test_no_expiry() {
        let salt = Product::new("7", "Salt", 15, "kg", "Condiments", 8);
        let now = Utc::now();

        assert_eq!(salt.days_until_expiry(now), None);
        assert!(!salt.expires_within(now, Duration::days(365)));
    }

    #[test]
    fn test_draft_validation() {
        let draft = ProductDraft::new("Jaggery", 10, "kg", "Sweeteners", 4);
        assert!(draft.validate().is_ok());

        let unnamed = ProductDraft::new("   ", 10, "kg", "Sweeteners", 4);
        assert!(unnamed.validate().is_err());

        let no_threshold = ProductDraft::new("Jaggery", 10, "kg", "Sweeteners", 0);
        assert!(no_threshold.validate().is_err());
    }

    #[test]
    fn test_draft_into_product_trims_name() {
        let product = ProductDraft::new(" Jaggery ", 0, "kg", "Sweeteners", 4).into_product("p-1");

        assert_eq!(product.id, "p-1");
        assert_eq!(product.name, "Jaggery");
        assert_eq!(product.stock_status(), StockStatus::Out);
    }
}
