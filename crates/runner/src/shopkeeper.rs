//! Shopkeeper - scripted user actions
//!
//! Requests the first marketplace offer that matches its search and
//! answers the oldest pending swap request. A request is accepted only
//! when giving away the requested quantity keeps the product above its
//! restock threshold.

use kirana_core::{OfferFilter, Product, RequestStatus, SwapOffer, SwapRequest};
use kirana_sim::Simulator;
use serde::{Deserialize, Serialize};

/// Something the shopkeeper did during a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ShopkeeperAction {
    RequestedOffer { offer_id: String, product: String },
    AcceptedRequest { request_id: String, product: String },
    DeclinedRequest { request_id: String, product: String },
}

#[derive(Debug, Clone, Default)]
pub struct Shopkeeper {
    filter: OfferFilter,
}

impl Shopkeeper {
    /// Only available offers are ever requested, whatever the filter says
    pub fn new(filter: OfferFilter) -> Self {
        Self {
            filter: filter.available_only(),
        }
    }

    pub fn filter(&self) -> &OfferFilter {
        &self.filter
    }

    pub fn pick_offer<'a>(&self, offers: &'a [SwapOffer]) -> Option<&'a SwapOffer> {
        offers.iter().find(|offer| self.filter.matches(offer))
    }

    /// Decide how to answer a request given the current stock
    pub fn judge(&self, request: &SwapRequest, inventory: &[Product]) -> RequestStatus {
        let held = inventory
            .iter()
            .find(|product| product.name.eq_ignore_ascii_case(&request.requesting_product));

        match held {
            Some(product)
                if product.quantity >= request.requested_quantity
                    && product.quantity - request.requested_quantity >= product.threshold =>
            {
                RequestStatus::Accepted
            }
            _ => RequestStatus::Declined,
        }
    }

    pub async fn request_first_offer(&self, simulator: &Simulator) -> Option<ShopkeeperAction> {
        let offers = simulator.swap_offers().await;
        let offer = self.pick_offer(&offers)?;

        simulator.request_swap(&offer.id).await;
        Some(ShopkeeperAction::RequestedOffer {
            offer_id: offer.id.clone(),
            product: offer.product.clone(),
        })
    }

    pub async fn answer_first_request(&self, simulator: &Simulator) -> Option<ShopkeeperAction> {
        let requests = simulator.incoming_requests().await;
        let request = requests.iter().find(|request| request.is_pending())?;
        let inventory = simulator.inventory().await;

        let request_id = request.id.clone();
        let product = request.requesting_product.clone();
        match self.judge(request, &inventory) {
            RequestStatus::Accepted => {
                simulator.accept_swap_request(&request_id).await;
                Some(ShopkeeperAction::AcceptedRequest { request_id, product })
            }
            _ => {
                simulator.decline_swap_request(&request_id).await;
                Some(ShopkeeperAction::DeclinedRequest { request_id, product })
            }
        }
    }

    /// One round: request an offer, then answer a request
    pub async fn act(&self, simulator: &Simulator) -> Vec<ShopkeeperAction> {
        let mut actions = Vec::with_capacity(2);
        actions.extend(self.request_first_offer(simulator).await);
        actions.extend(self.answer_first_request(simulator).await);

        for action in &actions {
            log::info!("[Shopkeeper] {:?}", action);
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kirana_sim::{Catalog, SimulatorConfig};

    fn request(product: &str, quantity: u32) -> SwapRequest {
        let mut request = Catalog::default().incoming_requests(Utc::now()).remove(0);
        request.requesting_product = product.to_string();
        request.requested_quantity = quantity;
        request
    }

    #[test]
    fn test_judge_keeps_stock_above_threshold() {
        let shopkeeper = Shopkeeper::default();
        let inventory = vec![Product::new("1", "Basmati Rice", 45, "kg", "Grains", 20)];

        assert_eq!(shopkeeper.judge(&request("Basmati Rice", 25), &inventory), RequestStatus::Accepted);
        assert_eq!(shopkeeper.judge(&request("basmati rice", 26), &inventory), RequestStatus::Declined);
        assert_eq!(shopkeeper.judge(&request("Basmati Rice", 50), &inventory), RequestStatus::Declined);
        assert_eq!(shopkeeper.judge(&request("Saffron", 1), &inventory), RequestStatus::Declined);
    }

    #[test]
    fn test_pick_offer_skips_unavailable() {
        let offers = Catalog::default().offers;

        let tea = Shopkeeper::new(OfferFilter::new("tea"));
        assert!(tea.pick_offer(&offers).is_none());

        let any = Shopkeeper::new(OfferFilter::default());
        assert_eq!(any.pick_offer(&offers).unwrap().id, "1");

        let oil = Shopkeeper::new(OfferFilter::new("OIL"));
        assert_eq!(oil.pick_offer(&offers).unwrap().id, "3");
    }

    #[tokio::test(start_paused = true)]
    async fn test_act_against_simulator() {
        let (simulator, _scheduler) =
            Simulator::manual(SimulatorConfig::default().with_seed(3), &Catalog::default()).unwrap();
        let shopkeeper = Shopkeeper::new(OfferFilter::new("dal"));

        let actions = shopkeeper.act(&simulator).await;

        assert_eq!(
            actions,
            vec![
                ShopkeeperAction::RequestedOffer {
                    offer_id: "2".to_string(),
                    product: "Dal (Lentils)".to_string(),
                },
                ShopkeeperAction::AcceptedRequest {
                    request_id: "req-1".to_string(),
                    product: "Basmati Rice".to_string(),
                },
            ]
        );

        let snapshot = simulator.snapshot().await;
        assert!(!snapshot.offers.iter().find(|o| o.id == "2").unwrap().available);
        assert_eq!(snapshot.requests[0].status, RequestStatus::Accepted);

        // Sugar 25 - 10 lands exactly on the threshold of 15
        let action = shopkeeper.answer_first_request(&simulator).await;
        assert_eq!(
            action,
            Some(ShopkeeperAction::AcceptedRequest {
                request_id: "req-2".to_string(),
                product: "Sugar".to_string(),
            })
        );
    }
}
