//! Bootstrap - simulator construction and shop onboarding
//!
//! Handles the setup a session needs before any view starts polling:
//! - Building a wall-clock simulator over the catalog
//! - Verifying the shop's phone number
//! - Submitting the profile and taking the node assignment

use kirana_clock::{SystemClock, TokioScheduler};
use kirana_sim::{Catalog, OnboardedShop, OnboardingFlow, Result, Simulator, SimulatorConfig};
use std::sync::Arc;

/// Shop details entered during onboarding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopDetails {
    pub phone: String,
    pub name: String,
    pub location: String,
}

impl Default for ShopDetails {
    fn default() -> Self {
        Self {
            phone: "+91 98765 43210".to_string(),
            name: "Sharma General Store".to_string(),
            location: "Andheri West, Mumbai".to_string(),
        }
    }
}

/// An onboarded shop with its simulator, ready to start
pub struct SessionBootstrap {
    pub simulator: Arc<Simulator>,
    pub shop: OnboardedShop,
}

impl SessionBootstrap {
    /// Build a live simulator and onboard the shop onto it
    pub async fn new(config: SimulatorConfig, catalog: &Catalog, details: &ShopDetails) -> Result<Self> {
        let simulator = Simulator::new(
            config,
            catalog,
            Arc::new(SystemClock::new()),
            TokioScheduler::new(),
        )?;
        Self::onboard(Arc::new(simulator), details).await
    }

    /// Onboard onto an existing simulator
    pub async fn onboard(simulator: Arc<Simulator>, details: &ShopDetails) -> Result<Self> {
        log::info!("Onboarding {} ({})", details.name, details.location);

        let shop = {
            let mut flow = OnboardingFlow::new(&simulator);
            flow.verify_phone(&details.phone).await?;
            flow.submit_profile(&details.name, &details.location).await?;
            flow.complete()?
        };

        Ok(Self { simulator, shop })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kirana_sim::SimError;

    #[tokio::test(start_paused = true)]
    async fn test_bootstrap_onboards_shop() {
        let bootstrap = SessionBootstrap::new(SimulatorConfig::default(), &Catalog::default(), &ShopDetails::default())
            .await
            .unwrap();

        assert!(bootstrap.shop.node.assigned);
        assert_eq!(bootstrap.shop.node.location, "Mumbai, Maharashtra");
        assert_eq!(bootstrap.shop.profile.name, "Sharma General Store");
        assert!(!bootstrap.simulator.is_running().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bootstrap_rejects_short_phone() {
        let details = ShopDetails {
            phone: "12345".to_string(),
            ..Default::default()
        };

        let result = SessionBootstrap::new(SimulatorConfig::default(), &Catalog::default(), &details).await;

        assert!(matches!(result, Err(SimError::InvalidPhoneNumber(_))));
    }
}
