//! Kirana Mesh Core Domain
//!
//! Pure domain types for the hyperlocal retail network simulator.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    // Inventory
    Product,
    ProductDraft,
    StockStatus,
    // AI insights
    Tip,
    TipKind,
    TipTemplate,
    Urgency,
    // Swap marketplace
    OfferFilter,
    RequestStatus,
    SwapOffer,
    SwapRequest,
    // Onboarding
    NodeInfo,
};
pub use values::{ProductId, Timestamp};
