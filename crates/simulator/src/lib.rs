//! Kirana Sim - simulated backend for a hyperlocal retail network
//!
//! Holds a shop's inventory, a rotating feed of AI insights, the swap
//! marketplace and incoming swap requests, and keeps them moving with
//! scheduled tasks so polling views see a "live" network.
//!
//! ## Lifecycle
//!
//! ```text
//! Simulator::new ──> start ──> (scheduled tasks mutate MarketState) ──> stop ──> drop
//!                      ▲                                                 │
//!                      └──────────────── restart allowed ────────────────┘
//! ```
//!
//! Tasks armed by `start`:
//! - inventory decrease every 5s
//! - AI tip every 8s
//! - one-shot release of extra swap offers after 12s

// Application layer
pub mod application;

// Market state and rules
pub mod market;

// Seed data and settings
pub mod catalog;
pub mod config;

// Cross-cutting concerns
pub mod error;
pub mod model;

// Re-export main types for convenience
pub use application::{OnboardedShop, OnboardingFlow, OnboardingStep, ShopProfile, Simulator};
pub use catalog::Catalog;
pub use config::SimulatorConfig;
pub use error::{Result, SimError};
pub use market::{MarketState, TipRotator};
