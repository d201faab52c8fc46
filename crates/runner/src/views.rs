//! Views - polling consumers of the simulator
//!
//! Each view keeps only what it needs between polls: the inventory view
//! remembers quantities to highlight changes, the carousel remembers
//! which tip is on screen.

use kirana_core::{OfferFilter, Product, ProductId, SwapOffer, SwapRequest, Tip};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Detects which products changed quantity between two inventory polls
#[derive(Debug, Default)]
pub struct InventoryWatcher {
    previous: HashMap<ProductId, u32>,
    polls: u64,
}

impl InventoryWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a poll and return the ids whose quantity moved since the last one.
    ///
    /// The first poll has nothing to compare against and reports no changes;
    /// products that appear for the first time are not reported either.
    pub fn observe(&mut self, inventory: &[Product]) -> Vec<ProductId> {
        let changed = inventory
            .iter()
            .filter(|product| {
                self.previous
                    .get(&product.id)
                    .is_some_and(|quantity| *quantity != product.quantity)
            })
            .map(|product| product.id.clone())
            .collect();

        self.previous = inventory
            .iter()
            .map(|product| (product.id.clone(), product.quantity))
            .collect();
        self.polls += 1;
        changed
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }
}

/// Rotating display over the latest polled tips
#[derive(Debug, Default)]
pub struct TipCarousel {
    tips: Vec<Tip>,
    index: usize,
}

impl TipCarousel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tips after a poll; the index wraps if the list shrank
    pub fn update(&mut self, tips: Vec<Tip>) {
        self.tips = tips;
        if self.index >= self.tips.len() {
            self.index = 0;
        }
    }

    /// Advance to the next tip, wrapping around
    pub fn rotate(&mut self) -> Option<&Tip> {
        if self.tips.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.tips.len();
        self.current()
    }

    pub fn current(&self) -> Option<&Tip> {
        self.tips.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.tips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tips.is_empty()
    }
}

/// Counts shown in the marketplace header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceSummary {
    /// Offers matching the filter
    pub visible_offers: usize,
    pub available_offers: usize,
    pub pending_requests: usize,
}

impl MarketplaceSummary {
    pub fn from_poll(filter: &OfferFilter, offers: &[SwapOffer], requests: &[SwapRequest]) -> Self {
        Self {
            visible_offers: filter.apply(offers).len(),
            available_offers: offers.iter().filter(|offer| offer.available).count(),
            pending_requests: requests.iter().filter(|request| request.is_pending()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kirana_core::{TipKind, TipTemplate, Urgency};
    use kirana_sim::Catalog;

    fn tips(n: usize) -> Vec<Tip> {
        (0..n)
            .map(|i| {
                let template = TipTemplate::new(TipKind::Forecast, format!("tip {}", i), Urgency::Low);
                Tip::from_template(&template, format!("tip-{}", i), Utc::now())
            })
            .collect()
    }

    #[test]
    fn test_watcher_reports_changed_quantities() {
        let catalog = Catalog::default();
        let mut inventory = catalog.inventory(Utc::now());
        let mut watcher = InventoryWatcher::new();

        assert!(watcher.observe(&inventory).is_empty());

        inventory[3].decrease(3);
        inventory[7].decrease(1);
        let changed = watcher.observe(&inventory);
        assert_eq!(changed, vec![inventory[3].id.clone(), inventory[7].id.clone()]);

        assert!(watcher.observe(&inventory).is_empty());
        assert_eq!(watcher.polls(), 3);
    }

    #[test]
    fn test_watcher_ignores_new_products() {
        let mut watcher = InventoryWatcher::new();
        let mut inventory = vec![Product::new("1", "Rice", 10, "kg", "Grains", 5)];
        watcher.observe(&inventory);

        inventory.push(Product::new("2", "Jaggery", 4, "kg", "Sweeteners", 2));
        assert!(watcher.observe(&inventory).is_empty());
    }

    #[test]
    fn test_carousel_wraps() {
        let mut carousel = TipCarousel::new();
        assert!(carousel.rotate().is_none());

        carousel.update(tips(3));
        assert_eq!(carousel.current().unwrap().id, "tip-0");
        assert_eq!(carousel.rotate().unwrap().id, "tip-1");
        assert_eq!(carousel.rotate().unwrap().id, "tip-2");
        assert_eq!(carousel.rotate().unwrap().id, "tip-0");
    }

    #[test]
    fn test_carousel_resets_when_list_shrinks() {
        let mut carousel = TipCarousel::new();
        carousel.update(tips(5));
        for _ in 0..4 {
            carousel.rotate();
        }
        assert_eq!(carousel.index(), 4);

        carousel.update(tips(2));
        assert_eq!(carousel.index(), 0);
        assert_eq!(carousel.len(), 2);
    }

    #[test]
    fn test_marketplace_summary() {
        let catalog = Catalog::default();
        let requests = catalog.incoming_requests(Utc::now());

        let summary = MarketplaceSummary::from_poll(&OfferFilter::new("oil"), &catalog.offers, &requests);

        assert_eq!(summary.visible_offers, 1);
        assert_eq!(summary.available_offers, 3);
        assert_eq!(summary.pending_requests, 3);
    }
}
