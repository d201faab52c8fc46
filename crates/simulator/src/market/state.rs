use kirana_core::{
    NodeInfo, Product, ProductDraft, RequestStatus, SwapOffer, SwapRequest, Tip,
};
use kirana_ports::Clock;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::Arc;
use uuid::Uuid;

use super::TipRotator;
use crate::catalog::Catalog;
use crate::config::SimulatorConfig;
use crate::error::{Result, SimError};
use crate::model::{MarketSnapshot, StockChange, SwapOutcome};

/// The four live collections plus the bookkeeping that mutates them
///
/// Plain synchronous state: every method is one unit of work. The
/// [`Simulator`](crate::Simulator) wraps it in a lock and adds latency
/// and scheduling.
pub struct MarketState {
    inventory: Vec<Product>,
    /// Most recent first
    tips: VecDeque<Tip>,
    offers: Vec<SwapOffer>,
    /// Second batch, released once by the late-offers task
    late_offers: Vec<SwapOffer>,
    requests: Vec<SwapRequest>,
    rotator: TipRotator,
    node_names: Vec<String>,
    node_type: String,
    node_location: String,
    max_tips: usize,
    max_decrease: u32,
    rng: StdRng,
    clock: Arc<dyn Clock>,
}

impl MarketState {
    pub fn new(catalog: &Catalog, config: &SimulatorConfig, clock: Arc<dyn Clock>) -> Self {
        let start = clock.now();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            inventory: catalog.inventory(start),
            tips: VecDeque::with_capacity(config.max_tips),
            offers: catalog.offers.clone(),
            late_offers: catalog.late_offers.clone(),
            requests: catalog.incoming_requests(start),
            rotator: TipRotator::new(catalog.tip_pool.clone()),
            node_names: catalog.node_names.clone(),
            node_type: catalog.node_type.clone(),
            node_location: catalog.node_location.clone(),
            max_tips: config.max_tips,
            max_decrease: config.max_decrease,
            rng,
            clock,
        }
    }

    pub fn inventory(&self) -> &[Product] {
        &self.inventory
    }

    pub fn tips(&self) -> Vec<Tip> {
        self.tips.iter().cloned().collect()
    }

    pub fn offers(&self) -> &[SwapOffer] {
        &self.offers
    }

    pub fn requests(&self) -> &[SwapRequest] {
        &self.requests
    }

    pub fn snapshot(&self) -> MarketSnapshot {
        MarketSnapshot {
            taken_at: self.clock.now(),
            inventory: self.inventory.clone(),
            tips: self.tips(),
            offers: self.offers.clone(),
            requests: self.requests.clone(),
        }
    }

    /// Simulate a sale: a uniformly chosen product loses 1..=max_decrease units.
    ///
    /// `None` when the inventory is empty or the drawn product is sold out.
    pub fn simulate_inventory_decrease(&mut self) -> Option<StockChange> {
        if self.inventory.is_empty() {
            return None;
        }

        let index = self.rng.gen_range(0..self.inventory.len());
        let amount = self.rng.gen_range(1..=self.max_decrease);
        self.decrease_product(index, amount)
    }

    /// Remove `amount` units from the product at `index`, flooring at zero
    pub fn decrease_product(&mut self, index: usize, amount: u32) -> Option<StockChange> {
        let product = self.inventory.get_mut(index)?;
        if product.quantity == 0 {
            return None;
        }

        let before = product.quantity;
        product.decrease(amount);
        Some(StockChange {
            product_id: product.id.clone(),
            name: product.name.clone(),
            before,
            after: product.quantity,
        })
    }

    /// Issue the next tip and keep only the most recent `max_tips`
    pub fn add_tip(&mut self) -> Result<Tip> {
        let now = self.clock.now();
        let tip = self.rotator.issue(now).ok_or(SimError::EmptyTipPool)?;

        self.tips.push_front(tip.clone());
        self.tips.truncate(self.max_tips);
        Ok(tip)
    }

    /// Append the late batch of offers, skipping ids already on the market.
    ///
    /// Returns how many offers were added.
    pub fn add_late_offers(&mut self) -> usize {
        let before = self.offers.len();
        for offer in &self.late_offers {
            if !self.offers.iter().any(|existing| existing.id == offer.id) {
                self.offers.push(offer.clone());
            }
        }
        self.offers.len() - before
    }

    /// Take an offer off the market
    pub fn request_swap(&mut self, offer_id: &str) -> SwapOutcome {
        match self.offers.iter_mut().find(|offer| offer.id == offer_id) {
            Some(offer) => {
                if offer.mark_requested() {
                    SwapOutcome::Applied
                } else {
                    SwapOutcome::Unchanged
                }
            }
            None => SwapOutcome::NotFound,
        }
    }

    /// Answer a pending incoming request
    pub fn respond_to_request(&mut self, request_id: &str, status: RequestStatus) -> SwapOutcome {
        match self.requests.iter_mut().find(|request| request.id == request_id) {
            Some(request) => {
                if request.respond(status) {
                    SwapOutcome::Applied
                } else {
                    SwapOutcome::Unchanged
                }
            }
            None => SwapOutcome::NotFound,
        }
    }

    /// Pick a node uniformly from the catalog's names
    pub fn assign_node(&mut self) -> Result<NodeInfo> {
        let name = self
            .node_names
            .choose(&mut self.rng)
            .ok_or_else(|| SimError::InvalidConfig("no node names to assign".to_string()))?;

        Ok(NodeInfo::assigned(
            name,
            self.node_type.clone(),
            self.node_location.clone(),
        ))
    }

    /// Add shopkeeper-entered products. One invalid draft rejects the batch.
    pub fn register_products(&mut self, drafts: Vec<ProductDraft>) -> Result<Vec<Product>> {
        for draft in &drafts {
            draft.validate().map_err(SimError::InvalidProduct)?;
        }

        let created: Vec<Product> = drafts
            .into_iter()
            .map(|draft| draft.into_product(Uuid::new_v4().to_string()))
            .collect();
        self.inventory.extend(created.iter().cloned());
        Ok(created)
    }

    pub fn pending_requests(&self) -> usize {
        self.requests.iter().filter(|r| r.is_pending()).count()
    }
}
