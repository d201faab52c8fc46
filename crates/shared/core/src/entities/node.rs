use serde::{Deserialize, Serialize};

/// Network node a shop is attached to after onboarding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub id: String,
    pub name: String,
    pub node_type: String,
    pub location: String,
    pub assigned: bool,
}

impl NodeInfo {
    /// Build an assigned node from its short name ("Alpha" -> id "alpha", name "Node Alpha")
    pub fn assigned(
        short_name: &str,
        node_type: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: short_name.to_lowercase(),
            name: format!("Node {}", short_name),
            node_type: node_type.into(),
            location: location.into(),
            assigned: true,
        }
    }
}
