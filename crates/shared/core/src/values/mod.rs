use chrono::{DateTime, Utc};

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Identifier of a product in a shop's inventory
pub type ProductId = String;
