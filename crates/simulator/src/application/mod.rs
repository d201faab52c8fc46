mod onboarding;
mod simulator;

pub use onboarding::{OnboardedShop, OnboardingFlow, OnboardingStep, ShopProfile};
pub use simulator::Simulator;
