use kirana_clock::{ManualClock, ManualScheduler, SystemClock, TokioScheduler};
use kirana_core::{
    NodeInfo, Product, ProductDraft, RequestStatus, SwapOffer, SwapRequest, Tip,
};
use kirana_ports::{Clock, TaskHandle, TaskScheduler, task};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use crate::catalog::Catalog;
use crate::config::SimulatorConfig;
use crate::error::Result;
use crate::market::MarketState;
use crate::model::{MarketSnapshot, StockChange, SwapOutcome};

/// Simulated backend for one shop
///
/// Owns the market state and the tasks that keep it moving. Any number
/// of views may poll the accessors concurrently; writes come from the
/// scheduled tasks and from explicit shopkeeper actions.
pub struct Simulator {
    /// Shared with the scheduled tasks
    state: Arc<RwLock<MarketState>>,

    /// Source of timed work (tokio timers or simulated time)
    scheduler: Arc<dyn TaskScheduler>,

    config: SimulatorConfig,

    /// Handles of the armed tasks; `None` while stopped
    running: Mutex<Option<Vec<TaskHandle>>>,
}

impl Simulator {
    /// Create a simulator over the given seed data, clock and scheduler
    pub fn new(
        config: SimulatorConfig,
        catalog: &Catalog,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn TaskScheduler>,
    ) -> Result<Self> {
        config.validate()?;
        catalog.validate()?;

        info!(
            "Creating simulator: {} products, {} tip templates, {} offers, {} requests ({}, {})",
            catalog.products.len(),
            catalog.tip_pool.len(),
            catalog.offers.len(),
            catalog.requests.len(),
            clock.name(),
            scheduler.name()
        );

        let state = MarketState::new(catalog, &config, clock);

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            scheduler,
            config,
            running: Mutex::new(None),
        })
    }

    /// Wall-clock simulator with the default catalog; needs a tokio runtime to start
    pub fn live(config: SimulatorConfig) -> Result<Self> {
        Self::new(
            config,
            &Catalog::default(),
            Arc::new(SystemClock::new()),
            TokioScheduler::new(),
        )
    }

    /// Simulated-time simulator; drive it with `ManualScheduler::advance`
    pub fn manual(config: SimulatorConfig, catalog: &Catalog) -> Result<(Self, Arc<ManualScheduler>)> {
        let clock = ManualClock::new(None);
        let scheduler = ManualScheduler::new(clock.clone());
        let simulator = Self::new(config, catalog, clock, scheduler.clone())?;
        Ok((simulator, scheduler))
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    // ─── Read accessors ──────────────────────────────────────────────────────

    pub async fn inventory(&self) -> Vec<Product> {
        self.delay(self.config.read_latency()).await;
        self.state.read().await.inventory().to_vec()
    }

    /// Most recent tip first
    pub async fn ai_tips(&self) -> Vec<Tip> {
        self.delay(self.config.read_latency()).await;
        self.state.read().await.tips()
    }

    pub async fn swap_offers(&self) -> Vec<SwapOffer> {
        self.delay(self.config.read_latency()).await;
        self.state.read().await.offers().to_vec()
    }

    pub async fn incoming_requests(&self) -> Vec<SwapRequest> {
        self.delay(self.config.read_latency()).await;
        self.state.read().await.requests().to_vec()
    }

    /// All collections at once, without read latency
    pub async fn snapshot(&self) -> MarketSnapshot {
        self.state.read().await.snapshot()
    }

    // ─── Simulated activity ──────────────────────────────────────────────────

    pub async fn simulate_inventory_decrease(&self) -> Option<StockChange> {
        Self::decrease_stock(&self.state).await
    }

    pub async fn add_ai_tip(&self) -> Option<Tip> {
        Self::issue_tip(&self.state).await
    }

    /// Release the late batch of swap offers. Returns how many appeared.
    pub async fn add_additional_swap_offers(&self) -> usize {
        Self::release_late_offers(&self.state).await
    }

    async fn decrease_stock(state: &RwLock<MarketState>) -> Option<StockChange> {
        let change = state.write().await.simulate_inventory_decrease();
        if let Some(change) = &change {
            debug!(
                "Sold {} {}: {} -> {}",
                change.sold(),
                change.name,
                change.before,
                change.after
            );
        }
        change
    }

    async fn issue_tip(state: &RwLock<MarketState>) -> Option<Tip> {
        match state.write().await.add_tip() {
            Ok(tip) => {
                debug!("New AI tip {} [{:?}]: {}", tip.id, tip.kind, tip.message);
                Some(tip)
            }
            Err(e) => {
                warn!("Skipping AI tip: {}", e);
                None
            }
        }
    }

    async fn release_late_offers(state: &RwLock<MarketState>) -> usize {
        let added = state.write().await.add_late_offers();
        info!("{} additional swap offers nearby", added);
        added
    }

    // ─── Shopkeeper actions ──────────────────────────────────────────────────

    /// Request a swap offer. Always resolves true; unknown ids are ignored.
    pub async fn request_swap(&self, offer_id: &str) -> bool {
        self.delay(self.config.action_latency()).await;
        let outcome = self.state.write().await.request_swap(offer_id);
        Self::log_outcome("Swap request for offer", offer_id, outcome);
        true
    }

    /// Accept an incoming request. Always resolves true; answered or unknown
    /// requests are left unchanged.
    pub async fn accept_swap_request(&self, request_id: &str) -> bool {
        self.respond(request_id, RequestStatus::Accepted).await
    }

    /// Decline an incoming request. Same contract as `accept_swap_request`.
    pub async fn decline_swap_request(&self, request_id: &str) -> bool {
        self.respond(request_id, RequestStatus::Declined).await
    }

    async fn respond(&self, request_id: &str, status: RequestStatus) -> bool {
        self.delay(self.config.action_latency()).await;
        let outcome = self
            .state
            .write()
            .await
            .respond_to_request(request_id, status);
        Self::log_outcome(&format!("{:?} request", status), request_id, outcome);
        true
    }

    fn log_outcome(action: &str, id: &str, outcome: SwapOutcome) {
        match outcome {
            SwapOutcome::Applied => info!("{} {}", action, id),
            SwapOutcome::Unchanged => debug!("{} {}: already settled", action, id),
            SwapOutcome::NotFound => debug!("{} {}: not found", action, id),
        }
    }

    /// Assign the shop to a random network node
    pub async fn node_assignment(&self) -> Result<NodeInfo> {
        self.delay(self.config.assignment_latency()).await;
        let node = self.state.write().await.assign_node()?;
        info!("Assigned to {} ({})", node.name, node.location);
        Ok(node)
    }

    /// Add shopkeeper-entered products to the live inventory
    pub async fn register_products(&self, drafts: Vec<ProductDraft>) -> Result<Vec<Product>> {
        let created = self.state.write().await.register_products(drafts)?;
        info!("Registered {} new products", created.len());
        Ok(created)
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────────

    /// Start background activity.
    ///
    /// Adds one tip immediately, then arms the inventory, tip and
    /// late-offers tasks. Returns false without arming anything if the
    /// simulation is already running.
    pub async fn start(&self) -> Result<bool> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            debug!("Simulation already running");
            return Ok(false);
        }

        let mut handles = Vec::with_capacity(3);
        if let Err(e) = self.arm_tasks(&mut handles) {
            for handle in &handles {
                self.scheduler.cancel(handle.id);
            }
            return Err(e);
        }

        Self::issue_tip(&self.state).await;

        info!(
            "Simulation started: sales every {:?}, tips every {:?}, extra offers after {:?}",
            self.config.inventory_decrease_interval(),
            self.config.tip_interval(),
            self.config.late_offers_delay()
        );
        *running = Some(handles);
        Ok(true)
    }

    fn arm_tasks(&self, handles: &mut Vec<TaskHandle>) -> Result<()> {
        let state = self.state.clone();
        handles.push(self.scheduler.schedule_repeating(
            "inventory-decrease",
            self.config.inventory_decrease_interval(),
            task(move || {
                let state = state.clone();
                async move {
                    Self::decrease_stock(&state).await;
                }
            }),
        )?);

        let state = self.state.clone();
        handles.push(self.scheduler.schedule_repeating(
            "ai-tip",
            self.config.tip_interval(),
            task(move || {
                let state = state.clone();
                async move {
                    Self::issue_tip(&state).await;
                }
            }),
        )?);

        let state = self.state.clone();
        handles.push(self.scheduler.schedule_once(
            "late-offers",
            self.config.late_offers_delay(),
            task(move || {
                let state = state.clone();
                async move {
                    Self::release_late_offers(&state).await;
                }
            }),
        )?);

        Ok(())
    }

    /// Cancel every armed task. Returns how many were still live.
    ///
    /// The simulator may be started again afterwards.
    pub async fn stop(&self) -> usize {
        let mut running = self.running.lock().await;
        match running.take() {
            Some(handles) => {
                let cancelled = handles
                    .iter()
                    .filter(|handle| self.scheduler.cancel(handle.id))
                    .count();
                info!("Simulation stopped ({} tasks cancelled)", cancelled);
                cancelled
            }
            None => 0,
        }
    }

    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Simulated latency, measured on the scheduler's clock
    pub(crate) async fn delay(&self, latency: Duration) {
        if !latency.is_zero() {
            self.scheduler.delay(latency).await;
        }
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        if let Some(handles) = self.running.get_mut().take() {
            for handle in handles {
                self.scheduler.cancel(handle.id);
            }
        }
    }
}
