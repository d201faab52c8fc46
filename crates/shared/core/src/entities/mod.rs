mod node;
mod product;
mod stock_status;
mod swap_offer;
mod swap_request;
mod tip;

pub use node::NodeInfo;
pub use product::{Product, ProductDraft};
pub use stock_status::StockStatus;
pub use swap_offer::{OfferFilter, SwapOffer};
pub use swap_request::{RequestStatus, SwapRequest};
pub use tip::{Tip, TipKind, TipTemplate, Urgency};
