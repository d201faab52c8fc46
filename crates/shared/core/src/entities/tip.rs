use serde::{Deserialize, Serialize};

use crate::values::Timestamp;

/// Category of an AI insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipKind {
    Restock,
    Swap,
    Forecast,
    Alert,
    Expiry,
}

/// How soon the shopkeeper should act on a tip
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Entry of the fixed insight pool; becomes a `Tip` when issued
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipTemplate {
    pub kind: TipKind,
    pub message: String,
    #[serde(default)]
    pub product: Option<String>,
    pub urgency: Urgency,
}

impl TipTemplate {
    pub fn new(kind: TipKind, message: impl Into<String>, urgency: Urgency) -> Self {
        Self {
            kind,
            message: message.into(),
            product: None,
            urgency,
        }
    }

    pub fn for_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    /// Identity used to detect back-to-back repeats
    pub fn key(&self) -> (TipKind, &str) {
        (self.kind, &self.message)
    }
}

/// An issued AI insight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    pub id: String,
    pub kind: TipKind,
    pub message: String,
    pub product: Option<String>,
    pub urgency: Urgency,
    pub created_at: Timestamp,
}

impl Tip {
    pub fn from_template(template: &TipTemplate, id: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            id: id.into(),
            kind: template.kind,
            message: template.message.clone(),
            product: template.product.clone(),
            urgency: template.urgency,
            created_at,
        }
    }

    pub fn key(&self) -> (TipKind, &str) {
        (self.kind, &self.message)
    }
}
