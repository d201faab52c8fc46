//! Seed data for a simulated shop and its neighbourhood
//!
//! Expiry dates and request arrival times are stored relative to the
//! moment the simulator is built, so the same catalog always reads
//! "expires in 5 days" or "received 10 minutes ago" on start.

use chrono::Duration;
use kirana_core::{
    Product, RequestStatus, SwapOffer, SwapRequest, Timestamp, TipKind, TipTemplate, Urgency,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, SimError};

/// Initial inventory line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSeed {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub unit: String,
    pub category: String,
    pub threshold: u32,
    #[serde(default)]
    pub expires_in_days: Option<i64>,
}

impl ProductSeed {
    fn new(
        id: &str,
        name: &str,
        quantity: u32,
        unit: &str,
        category: &str,
        threshold: u32,
        expires_in_days: Option<i64>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
            category: category.to_string(),
            threshold,
            expires_in_days,
        }
    }

    pub fn build(&self, start: Timestamp) -> Product {
        let product = Product::new(
            self.id.clone(),
            self.name.clone(),
            self.quantity,
            self.unit.clone(),
            self.category.clone(),
            self.threshold,
        );
        match self.expires_in_days {
            Some(days) => product.with_expiry(start + Duration::days(days)),
            None => product,
        }
    }
}

/// Incoming swap request waiting when the simulator starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSeed {
    pub id: String,
    pub from_node: String,
    pub requesting_product: String,
    pub offering_product: String,
    pub requested_quantity: u32,
    pub offered_quantity: u32,
    pub unit: String,
    pub distance: String,
    pub estimated_time: String,
    pub received_minutes_ago: i64,
}

impl RequestSeed {
    pub fn build(&self, start: Timestamp) -> SwapRequest {
        SwapRequest {
            id: self.id.clone(),
            from_node: self.from_node.clone(),
            requesting_product: self.requesting_product.clone(),
            offering_product: self.offering_product.clone(),
            requested_quantity: self.requested_quantity,
            offered_quantity: self.offered_quantity,
            unit: self.unit.clone(),
            distance: self.distance.clone(),
            estimated_time: self.estimated_time.clone(),
            status: RequestStatus::Pending,
            received_at: start - Duration::minutes(self.received_minutes_ago),
        }
    }
}

/// Everything a simulator starts from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<ProductSeed>,
    pub tip_pool: Vec<TipTemplate>,
    /// Offers visible from the start
    pub offers: Vec<SwapOffer>,
    /// Offers released once by the late-offers task
    pub late_offers: Vec<SwapOffer>,
    pub requests: Vec<RequestSeed>,
    /// Short names a shop can be assigned to ("Alpha" -> "Node Alpha")
    pub node_names: Vec<String>,
    pub node_type: String,
    pub node_location: String,
}

impl Catalog {
    /// Load a catalog from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| SimError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse a catalog from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Self =
            serde_json::from_str(json).map_err(|e| SimError::Parse(format!("catalog: {}", e)))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<()> {
        if self.node_names.is_empty() {
            return Err(SimError::InvalidConfig(
                "catalog needs at least one node name".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for product in &self.products {
            if !seen.insert(product.id.as_str()) {
                return Err(SimError::InvalidConfig(format!(
                    "duplicate product id {}",
                    product.id
                )));
            }
        }

        let mut seen = HashSet::new();
        for offer in self.offers.iter().chain(&self.late_offers) {
            if !seen.insert(offer.id.as_str()) {
                return Err(SimError::InvalidConfig(format!("duplicate offer id {}", offer.id)));
            }
        }
        Ok(())
    }

    pub fn with_tip_pool(mut self, tip_pool: Vec<TipTemplate>) -> Self {
        self.tip_pool = tip_pool;
        self
    }

    pub fn with_products(mut self, products: Vec<ProductSeed>) -> Self {
        self.products = products;
        self
    }

    /// Materialise the inventory relative to `start`
    pub fn inventory(&self, start: Timestamp) -> Vec<Product> {
        self.products.iter().map(|seed| seed.build(start)).collect()
    }

    /// Materialise the incoming requests relative to `start`
    pub fn incoming_requests(&self, start: Timestamp) -> Vec<SwapRequest> {
        self.requests.iter().map(|seed| seed.build(start)).collect()
    }
}

impl Default for Catalog {
    /// A neighbourhood kirana store in Mumbai
    fn default() -> Self {
        Self {
            products: default_products(),
            tip_pool: default_tip_pool(),
            offers: vec![
                offer("1", "Node Charlie", "Sugar 2kg", 30, "units", "1.2 km", "15 mins", true),
                offer("2", "Node Beta", "Dal (Lentils)", 15, "kg", "0.8 km", "12 mins", true),
                offer("3", "Node Echo", "Cooking Oil", 8, "liters", "2.1 km", "25 mins", true),
                offer("4", "Node Alpha", "Tea Powder", 5, "kg", "1.5 km", "18 mins", false),
            ],
            late_offers: vec![
                offer("5", "Node Gamma", "Wheat Flour", 20, "kg", "1.8 km", "22 mins", true),
                offer("6", "Node Delta", "Basmati Rice", 25, "kg", "0.9 km", "14 mins", true),
            ],
            requests: default_requests(),
            node_names: ["Alpha", "Beta", "Gamma", "Delta", "Echo"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
            node_type: "Micro-warehouse".to_string(),
            node_location: "Mumbai, Maharashtra".to_string(),
        }
    }
}

fn default_products() -> Vec<ProductSeed> {
    vec![
        ProductSeed::new("1", "Basmati Rice", 45, "kg", "Grains", 20, Some(45)),
        ProductSeed::new("2", "Sugar", 25, "kg", "Sweeteners", 15, Some(120)),
        ProductSeed::new("3", "Wheat Flour", 60, "kg", "Grains", 25, Some(30)),
        ProductSeed::new("4", "Cooking Oil", 12, "liters", "Oils", 8, Some(5)),
        ProductSeed::new("5", "Dal (Lentils)", 18, "kg", "Pulses", 10, Some(90)),
        ProductSeed::new("6", "Tea Powder", 8, "kg", "Beverages", 5, Some(180)),
        ProductSeed::new("7", "Salt", 15, "kg", "Condiments", 8, None),
        ProductSeed::new("8", "Onions", 22, "kg", "Vegetables", 12, Some(3)),
        ProductSeed::new("9", "Milk & Curd", 15, "liters", "Dairy", 8, Some(2)),
        ProductSeed::new("10", "Biscuits", 25, "packets", "Snacks", 10, Some(7)),
    ]
}

fn default_tip_pool() -> Vec<TipTemplate> {
    use TipKind::*;
    use Urgency::*;

    let tip = |kind, message: &str, product: &str, urgency| {
        TipTemplate::new(kind, message, urgency).for_product(product)
    };

    vec![
        tip(Restock, "Replenish Rice - demand spike predicted", "Basmati Rice", High),
        tip(Swap, "Swap 30 units of Sugar with Node Charlie", "Sugar", Medium),
        tip(Forecast, "High demand for Cooking Oil expected tomorrow", "Cooking Oil", Medium),
        tip(Alert, "Low stock alert: Tea Powder below threshold", "Tea Powder", High),
        tip(Forecast, "Festival season: increase Wheat Flour stock", "Wheat Flour", Low),
        tip(Swap, "Node Beta has excess Dal - request swap?", "Dal (Lentils)", Low),
        tip(Alert, "Onion prices rising - stock up now", "Onions", Medium),
        tip(Forecast, "Rain predicted - Salt demand may increase", "Salt", Low),
        tip(
            Expiry,
            "Dairy products expiring in 2 days - discount pricing recommended",
            "Milk & Curd",
            High,
        ),
        tip(Expiry, "Fresh vegetables near expiry - promote for quick sale", "Onions", Medium),
        tip(
            Expiry,
            "Packaged snacks expiring next week - bundle deals suggested",
            "Biscuits",
            Low,
        ),
        tip(Expiry, "Cooking oil expires in 5 days - clear inventory soon", "Cooking Oil", Medium),
    ]
}

fn default_requests() -> Vec<RequestSeed> {
    let request = |id: &str, from: &str, wants: &str, gives: &str, qty: (u32, u32), route: (&str, &str), ago| {
        RequestSeed {
            id: id.to_string(),
            from_node: from.to_string(),
            requesting_product: wants.to_string(),
            offering_product: gives.to_string(),
            requested_quantity: qty.0,
            offered_quantity: qty.1,
            unit: "kg".to_string(),
            distance: route.0.to_string(),
            estimated_time: route.1.to_string(),
            received_minutes_ago: ago,
        }
    };

    vec![
        request("req-1", "Node Alpha", "Basmati Rice", "Wheat Flour", (15, 20), ("1.1 km", "16 mins"), 10),
        request("req-2", "Node Gamma", "Sugar", "Dal (Lentils)", (10, 12), ("2.3 km", "28 mins"), 5),
        request("req-3", "Node Beta", "Tea Powder", "Salt", (3, 8), ("0.7 km", "11 mins"), 2),
    ]
}

#[allow(clippy::too_many_arguments)]
fn offer(
    id: &str,
    from_node: &str,
    product: &str,
    quantity: u32,
    unit: &str,
    distance: &str,
    estimated_time: &str,
    available: bool,
) -> SwapOffer {
    SwapOffer {
        id: id.to_string(),
        from_node: from_node.to_string(),
        product: product.to_string(),
        quantity,
        unit: unit.to_string(),
        distance: distance.to_string(),
        estimated_time: estimated_time.to_string(),
        available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_default_catalog_shape() {
        let catalog = Catalog::default();

        assert_eq!(catalog.products.len(), 10);
        assert_eq!(catalog.tip_pool.len(), 12);
        assert_eq!(catalog.offers.len(), 4);
        assert_eq!(catalog.late_offers.len(), 2);
        assert_eq!(catalog.requests.len(), 3);
        assert_eq!(catalog.node_names.len(), 5);
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_relative_dates_resolve_against_start() {
        let start = Utc.with_ymd_and_hms(2024, 10, 1, 9, 0, 0).unwrap();
        let catalog = Catalog::default();

        let inventory = catalog.inventory(start);
        let oil = inventory.iter().find(|p| p.name == "Cooking Oil").unwrap();
        assert_eq!(oil.days_until_expiry(start), Some(5));

        let salt = inventory.iter().find(|p| p.name == "Salt").unwrap();
        assert_eq!(salt.expires_at, None);

        let requests = catalog.incoming_requests(start);
        assert_eq!(requests[0].received_at, start - Duration::minutes(10));
        assert!(requests.iter().all(|r| r.is_pending()));
    }

    #[test]
    fn test_json_round_trip_of_default() {
        let json = serde_json::to_string(&Catalog::default()).unwrap();
        let parsed = Catalog::from_json(&json).unwrap();
        assert_eq!(parsed, Catalog::default());
    }

    #[test]
    fn test_rejects_duplicate_offer_ids() {
        let mut catalog = Catalog::default();
        catalog.late_offers[0].id = "1".to_string();

        assert!(matches!(catalog.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_empty_node_names() {
        let mut catalog = Catalog::default();
        catalog.node_names.clear();

        assert!(matches!(catalog.validate(), Err(SimError::InvalidConfig(_))));
    }
}
