use serde::{Deserialize, Serialize};

/// Stock a neighbouring node is willing to swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOffer {
    pub id: String,
    pub from_node: String,
    /// Free-text product description ("Sugar 2kg")
    pub product: String,
    pub quantity: u32,
    pub unit: String,
    pub distance: String,
    pub estimated_time: String,
    pub available: bool,
}

impl SwapOffer {
    /// Take the offer off the market.
    ///
    /// Returns true only on the transition from available to unavailable.
    pub fn mark_requested(&mut self) -> bool {
        std::mem::replace(&mut self.available, false)
    }
}

/// Marketplace search: product substring plus an availability toggle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferFilter {
    pub search: String,
    pub available_only: bool,
}

impl OfferFilter {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            available_only: false,
        }
    }

    pub fn available_only(mut self) -> Self {
        self.available_only = true;
        self
    }

    pub fn matches(&self, offer: &SwapOffer) -> bool {
        let matches_search = offer
            .product
            .to_lowercase()
            .contains(&self.search.to_lowercase());
        matches_search && (!self.available_only || offer.available)
    }

    pub fn apply<'a>(&self, offers: &'a [SwapOffer]) -> Vec<&'a SwapOffer> {
        offers.iter().filter(|offer| self.matches(offer)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(id: &str, product: &str, available: bool) -> SwapOffer {
        SwapOffer {
            id: id.to_string(),
            from_node: "Node Charlie".to_string(),
            product: product.to_string(),
            quantity: 30,
            unit: "units".to_string(),
            distance: "1.2 km".to_string(),
            estimated_time: "15 mins".to_string(),
            available,
        }
    }

    #[test]
    fn test_mark_requested_is_one_way() {
        let mut sugar = offer("1", "Sugar 2kg", true);

        assert!(sugar.mark_requested());
        assert!(!sugar.available);
        assert!(!sugar.mark_requested());
        assert!(!sugar.available);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let offers = vec![
            offer("1", "Sugar 2kg", true),
            offer("2", "Dal (Lentils)", true),
            offer("4", "Tea Powder", false),
        ];

        let sugar = OfferFilter::new("SUGAR").apply(&offers);
        assert_eq!(sugar.len(), 1);
        assert_eq!(sugar[0].id, "1");

        assert_eq!(OfferFilter::default().apply(&offers).len(), 3);
        assert_eq!(OfferFilter::default().available_only().apply(&offers).len(), 2);
        assert!(OfferFilter::new("tea").available_only().apply(&offers).is_empty());
    }
}
