//! Kirana Runner - headless demo session
//!
//! Plays the part of the storefront app against a live simulator:
//!
//! - **Bootstrap**: builds the simulator and walks the onboarding flow
//! - **Views**: polling consumers (inventory list, tip carousel, marketplace)
//! - **Shopkeeper**: scripted user requesting offers and answering requests
//! - **Session**: full orchestration for a fixed duration
//!
//! ## Architecture
//!
//! ```text
//!   ┌────────────────┐  ┌────────────────┐  ┌────────────────┐
//!   │ Inventory view │  │  Tip carousel  │  │  Marketplace   │
//!   │   (poll 2s)    │  │   (poll 2s)    │  │   (poll 5s)    │
//!   └───────┬────────┘  └───────┬────────┘  └───────┬────────┘
//!           │ reads             │ reads             │ reads
//!           ▼                   ▼                   ▼
//!   ┌──────────────────────────────────────────────────────────┐
//!   │                       Simulator                          │
//!   │  inventory · tips · offers · requests  (RwLock)          │
//!   └──────────────────────────────────────────────────────────┘
//!           ▲                                       ▲
//!           │ scheduled tasks                       │ actions
//!   ┌───────┴────────┐                      ┌───────┴────────┐
//!   │ TokioScheduler │                      │   Shopkeeper   │
//!   └────────────────┘                      └────────────────┘
//! ```

pub mod bootstrap;
pub mod session;
pub mod shopkeeper;
pub mod views;

// Re-export main types
pub use bootstrap::{SessionBootstrap, ShopDetails};
pub use session::{Session, SessionConfig, SessionReport, SessionStats};
pub use shopkeeper::{Shopkeeper, ShopkeeperAction};
pub use views::{InventoryWatcher, MarketplaceSummary, TipCarousel};
