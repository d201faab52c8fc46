//! Session - full headless run against a live simulator
//!
//! Ties together all components:
//! - Bootstrap and onboarding
//! - Simulator lifecycle
//! - Polling views (inventory, tip carousel, marketplace)
//! - Scripted shopkeeper

use crate::{
    bootstrap::{SessionBootstrap, ShopDetails},
    shopkeeper::{Shopkeeper, ShopkeeperAction},
    views::{InventoryWatcher, MarketplaceSummary, TipCarousel},
};
use kirana_core::OfferFilter;
use kirana_sim::model::MarketSnapshot;
use kirana_sim::{Catalog, OnboardedShop, Result, Simulator, SimulatorConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{MissedTickBehavior, interval, sleep};

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub simulator: SimulatorConfig,
    pub catalog: Catalog,
    pub shop: ShopDetails,
    /// How long the simulator runs once onboarding is done
    pub duration: Duration,
    pub inventory_poll: Duration,
    pub tips_poll: Duration,
    pub marketplace_poll: Duration,
    pub carousel_rotation: Duration,
    /// Delay before the shopkeeper acts; `None` keeps the shopkeeper idle
    pub shopkeeper_delay: Option<Duration>,
    /// Marketplace search text
    pub offer_search: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            simulator: SimulatorConfig::default(),
            catalog: Catalog::default(),
            shop: ShopDetails::default(),
            duration: Duration::from_secs(30),
            inventory_poll: Duration::from_secs(2),
            tips_poll: Duration::from_secs(2),
            marketplace_poll: Duration::from_secs(5),
            carousel_rotation: Duration::from_secs(4),
            shopkeeper_delay: Some(Duration::from_secs(3)),
            offer_search: String::new(),
        }
    }
}

impl SessionConfig {
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_simulator(mut self, simulator: SimulatorConfig) -> Self {
        self.simulator = simulator;
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_offer_search(mut self, search: impl Into<String>) -> Self {
        self.offer_search = search.into();
        self
    }

    pub fn without_shopkeeper(mut self) -> Self {
        self.shopkeeper_delay = None;
        self
    }
}

/// What the views and the shopkeeper observed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub inventory_polls: u64,
    /// Quantity changes highlighted by the inventory view
    pub stock_changes_seen: u64,
    pub tip_polls: u64,
    /// Distinct tip ids shown by the carousel
    pub tips_seen: usize,
    pub carousel_rotations: u64,
    pub marketplace_polls: u64,
    pub last_marketplace: Option<MarketplaceSummary>,
    pub actions: Vec<ShopkeeperAction>,
}

/// Session results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub shop: OnboardedShop,
    pub stats: SessionStats,
    /// Scheduled tasks still armed when the simulator was stopped
    pub tasks_cancelled: usize,
    pub final_snapshot: MarketSnapshot,
    pub success: bool,
}

/// Headless storefront session
pub struct Session {
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Onboard, run the simulator with all views for the configured duration, then stop
    pub async fn run(self) -> Result<SessionReport> {
        let config = self.config;
        let bootstrap =
            SessionBootstrap::new(config.simulator.clone(), &config.catalog, &config.shop).await?;
        let simulator = bootstrap.simulator;

        simulator.start().await?;

        let stats = Arc::new(RwLock::new(SessionStats::default()));
        let mut handles = vec![
            tokio::spawn(Self::run_inventory_view(
                simulator.clone(),
                config.inventory_poll,
                stats.clone(),
            )),
            tokio::spawn(Self::run_tip_view(
                simulator.clone(),
                config.tips_poll,
                config.carousel_rotation,
                stats.clone(),
            )),
            tokio::spawn(Self::run_marketplace_view(
                simulator.clone(),
                config.marketplace_poll,
                OfferFilter::new(config.offer_search.clone()),
                stats.clone(),
            )),
        ];
        if let Some(delay) = config.shopkeeper_delay {
            handles.push(tokio::spawn(Self::run_shopkeeper(
                simulator.clone(),
                delay,
                Shopkeeper::new(OfferFilter::new(config.offer_search.clone())),
                stats.clone(),
            )));
        }

        log::info!("Session running for {:?}...", config.duration);
        sleep(config.duration).await;

        log::info!("Session complete, shutting down...");
        for handle in &handles {
            handle.abort();
        }
        let tasks_cancelled = simulator.stop().await;

        let stats = stats.read().await.clone();
        let final_snapshot = simulator.snapshot().await;

        log::info!(
            "Session finished: {} stock changes seen, {} tips shown, {} shopkeeper actions, {} low-stock products",
            stats.stock_changes_seen,
            stats.tips_seen,
            stats.actions.len(),
            final_snapshot.low_stock().len()
        );

        Ok(SessionReport {
            shop: bootstrap.shop,
            stats,
            tasks_cancelled,
            final_snapshot,
            success: true,
        })
    }

    fn ticker(period: Duration) -> tokio::time::Interval {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }

    async fn run_inventory_view(simulator: Arc<Simulator>, period: Duration, stats: Arc<RwLock<SessionStats>>) {
        let mut watcher = InventoryWatcher::new();
        let mut ticker = Self::ticker(period);

        loop {
            ticker.tick().await;
            let inventory = simulator.inventory().await;
            let changed = watcher.observe(&inventory);

            for id in &changed {
                if let Some(product) = inventory.iter().find(|p| &p.id == id) {
                    log::debug!(
                        "[Inventory] {} now {} {} ({})",
                        product.name,
                        product.quantity,
                        product.unit,
                        product.stock_status().label()
                    );
                }
            }

            let mut s = stats.write().await;
            s.inventory_polls = watcher.polls();
            s.stock_changes_seen += changed.len() as u64;
        }
    }

    async fn run_tip_view(
        simulator: Arc<Simulator>,
        poll: Duration,
        rotation: Duration,
        stats: Arc<RwLock<SessionStats>>,
    ) {
        let mut carousel = TipCarousel::new();
        let mut seen = HashSet::new();
        let mut poll_ticker = Self::ticker(poll);
        let mut rotate_ticker = Self::ticker(rotation);
        // The first rotation tick is immediate; skip it so the first tip stays on screen
        rotate_ticker.tick().await;

        loop {
            tokio::select! {
                _ = poll_ticker.tick() => {
                    let tips = simulator.ai_tips().await;
                    seen.extend(tips.iter().map(|tip| tip.id.clone()));
                    carousel.update(tips);

                    let mut s = stats.write().await;
                    s.tip_polls += 1;
                    s.tips_seen = seen.len();
                }
                _ = rotate_ticker.tick() => {
                    if let Some(tip) = carousel.rotate() {
                        log::debug!("[Tips] {:?} ({:?}): {}", tip.kind, tip.urgency, tip.message);
                        stats.write().await.carousel_rotations += 1;
                    }
                }
            }
        }
    }

    async fn run_marketplace_view(
        simulator: Arc<Simulator>,
        period: Duration,
        filter: OfferFilter,
        stats: Arc<RwLock<SessionStats>>,
    ) {
        let mut ticker = Self::ticker(period);

        loop {
            ticker.tick().await;
            let offers = simulator.swap_offers().await;
            let requests = simulator.incoming_requests().await;
            let summary = MarketplaceSummary::from_poll(&filter, &offers, &requests);

            log::debug!(
                "[Marketplace] {} offers shown, {} available, {} pending requests",
                summary.visible_offers,
                summary.available_offers,
                summary.pending_requests
            );

            let mut s = stats.write().await;
            s.marketplace_polls += 1;
            s.last_marketplace = Some(summary);
        }
    }

    async fn run_shopkeeper(
        simulator: Arc<Simulator>,
        delay: Duration,
        shopkeeper: Shopkeeper,
        stats: Arc<RwLock<SessionStats>>,
    ) {
        sleep(delay).await;
        let actions = shopkeeper.act(&simulator).await;
        stats.write().await.actions.extend(actions);
    }
}
