use serde::{Deserialize, Serialize};

use crate::values::Timestamp;

/// Lifecycle of an incoming swap request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
}

impl RequestStatus {
    /// Returns true once the shopkeeper has answered
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Accepted | RequestStatus::Declined)
    }
}

/// A swap proposed to this shop by a neighbouring node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub id: String,
    pub from_node: String,
    /// What the neighbour wants from us
    pub requesting_product: String,
    /// What the neighbour gives in return
    pub offering_product: String,
    pub requested_quantity: u32,
    pub offered_quantity: u32,
    pub unit: String,
    pub distance: String,
    pub estimated_time: String,
    pub status: RequestStatus,
    pub received_at: Timestamp,
}

impl SwapRequest {
    /// Move a pending request to a terminal status.
    ///
    /// Returns false without touching the request when it is already
    /// answered or when `status` is not terminal.
    pub fn respond(&mut self, status: RequestStatus) -> bool {
        if self.status.is_terminal() || !status.is_terminal() {
            return false;
        }
        self.status = status;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn pending() -> SwapRequest {
        SwapRequest {
            id: "req-1".to_string(),
            from_node: "Node Alpha".to_string(),
            requesting_product: "Basmati Rice".to_string(),
            offering_product: "Wheat Flour".to_string(),
            requested_quantity: 15,
            offered_quantity: 20,
            unit: "kg".to_string(),
            distance: "1.1 km".to_string(),
            estimated_time: "16 mins".to_string(),
            status: RequestStatus::Pending,
            received_at: Utc::now(),
        }
    }

    #[test]
    fn test_accept_is_terminal() {
        let mut request = pending();

        assert!(request.respond(RequestStatus::Accepted));
        assert_eq!(request.status, RequestStatus::Accepted);

        assert!(!request.respond(RequestStatus::Declined));
        assert_eq!(request.status, RequestStatus::Accepted);
    }

    #[test]
    fn test_cannot_reopen() {
        let mut request = pending();

        assert!(!request.respond(RequestStatus::Pending));
        assert!(request.is_pending());

        assert!(request.respond(RequestStatus::Declined));
        assert!(!request.respond(RequestStatus::Pending));
        assert_eq!(request.status, RequestStatus::Declined);
    }
}
