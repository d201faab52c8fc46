mod state;
mod tips;

pub use state::MarketState;
pub use tips::TipRotator;
