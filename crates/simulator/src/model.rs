// Re-export domain types from kirana-core
pub use kirana_core::{
    NodeInfo, OfferFilter, Product, ProductDraft, ProductId, RequestStatus, StockStatus,
    SwapOffer, SwapRequest, Timestamp, Tip, TipKind, TipTemplate, Urgency,
};

use serde::{Deserialize, Serialize};

/// Quantity change applied by one simulated sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockChange {
    pub product_id: ProductId,
    pub name: String,
    pub before: u32,
    pub after: u32,
}

impl StockChange {
    pub fn sold(&self) -> u32 {
        self.before - self.after
    }
}

/// Result of acting on an offer or request by identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The state transition happened
    Applied,
    /// Already in a terminal state; nothing changed
    Unchanged,
    NotFound,
}

/// Every collection at one instant, without simulated latency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub taken_at: Timestamp,
    pub inventory: Vec<Product>,
    pub tips: Vec<Tip>,
    pub offers: Vec<SwapOffer>,
    pub requests: Vec<SwapRequest>,
}

impl MarketSnapshot {
    pub fn pending_requests(&self) -> usize {
        self.requests.iter().filter(|r| r.is_pending()).count()
    }

    pub fn available_offers(&self) -> usize {
        self.offers.iter().filter(|o| o.available).count()
    }

    /// Products at or below their restock threshold
    pub fn low_stock(&self) -> Vec<&Product> {
        self.inventory
            .iter()
            .filter(|p| p.stock_status().needs_restock())
            .collect()
    }
}
