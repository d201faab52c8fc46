use kirana_ports::SchedulerError;
use thiserror::Error;

use crate::application::OnboardingStep;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Tip pool is empty")]
    EmptyTipPool,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    #[error("Shop profile incomplete: {0}")]
    IncompleteProfile(String),

    #[error("Onboarding out of order: expected {expected} step, currently at {actual}")]
    OnboardingStep {
        expected: OnboardingStep,
        actual: OnboardingStep,
    },

    #[error("Failed to read {path}: {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse {0}")]
    Parse(String),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}

pub type Result<T> = std::result::Result<T, SimError>;
